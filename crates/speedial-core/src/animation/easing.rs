//! Easing curves mapping linear progress in `[0, 1]` to eased progress.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DAMPING: f64 = 0.8;
pub const DEFAULT_VELOCITY: f64 = 0.6;

// ln(1000): the spring envelope decays to 0.1% by the end of the duration
const SETTLE_LOG: f64 = 6.907_755_278_982_137;
const MIN_DAMPING: f64 = 0.05;

/// Available easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Easing {
    /// No easing.
    Linear,
    /// Quadratic ease-out, for hosts that want to avoid overshoot.
    EaseOut,
    /// Cubic ease-out.
    EaseOutCubic,
    /// Damped spring fitted to the transition duration.
    ///
    /// `damping` is the damping ratio (below 1 overshoots), `velocity` the
    /// initial velocity in units of the total distance per duration.
    Spring { damping: f64, velocity: f64 },
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Spring {
            damping: DEFAULT_DAMPING,
            velocity: DEFAULT_VELOCITY,
        }
    }
}

/// Apply an easing curve to a progress value.
///
/// Input is clamped to `[0, 1]`. The result is exactly 0 at the start and
/// exactly 1 at the end; in between a spring may overshoot 1.
pub fn ease(easing: Easing, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 || t == 1.0 {
        return t;
    }

    match easing {
        Easing::Linear => t,
        Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        Easing::Spring { damping, velocity } => spring(damping, velocity, t),
    }
}

fn spring(damping: f64, velocity: f64, t: f64) -> f64 {
    let zeta = damping.max(MIN_DAMPING);

    if zeta < 1.0 {
        let omega = SETTLE_LOG / zeta;
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let envelope = (-zeta * omega * t).exp();
        let b = (velocity - zeta * omega) / omega_d;
        1.0 + envelope * (-(omega_d * t).cos() + b * (omega_d * t).sin())
    } else {
        // critically damped and beyond
        let omega = SETTLE_LOG;
        let envelope = (-omega * t).exp();
        1.0 + envelope * (-1.0 + (velocity - omega) * t)
    }
}
