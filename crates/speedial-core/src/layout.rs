use crate::geometry::Offset;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

pub const DEFAULT_ARC_RADIUS: f64 = 100.0;

const FULL_CIRCLE_EPSILON: f64 = 1e-9;

/// Distance of each satellite from the main center, computed per index.
///
/// In config this is either a plain number (`radius = 100`) or a table
/// describing a spiral (`radius = { base = 40, step = 10, jitter = 50 }`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Radius {
    Fixed(f64),
    Spiral { base: f64, step: f64, jitter: f64 },
}

impl Radius {
    pub fn at<R: Rng>(&self, index: usize, rng: &mut R) -> f64 {
        match *self {
            Radius::Fixed(r) => r,
            Radius::Spiral { base, step, jitter } => {
                let noise = if jitter > 0.0 {
                    rng.random_range(0.0..jitter)
                } else {
                    0.0
                };
                base + index as f64 * step + noise
            }
        }
    }
}

impl Default for Radius {
    fn default() -> Self {
        Radius::Fixed(DEFAULT_ARC_RADIUS)
    }
}

/// Equally spaced arc around the main element, the fallback whenever the
/// item source declines to place an item itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcLayout {
    pub radius: Radius,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Default for ArcLayout {
    fn default() -> Self {
        Self {
            radius: Radius::default(),
            start_angle: 0.0,
            end_angle: TAU,
        }
    }
}

impl ArcLayout {
    pub fn new(radius: Radius, start_angle: f64, end_angle: f64) -> Self {
        Self {
            radius,
            start_angle,
            end_angle,
        }
    }

    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn is_full_circle(&self) -> bool {
        self.span().abs() >= TAU - FULL_CIRCLE_EPSILON
    }

    /// A full ring spreads `total` items over `total` gaps so the seam
    /// doesn't double up; a partial arc includes both endpoints.
    pub fn angle(&self, index: usize, total: usize) -> f64 {
        let denom = if self.is_full_circle() {
            total
        } else {
            total.saturating_sub(1)
        };
        if denom == 0 {
            return self.start_angle;
        }
        self.start_angle + index as f64 * self.span() / denom as f64
    }

    pub fn position(&self, index: usize, total: usize) -> Offset {
        self.position_with(index, total, &mut rand::rng())
    }

    pub fn position_with<R: Rng>(&self, index: usize, total: usize, rng: &mut R) -> Offset {
        Offset::polar(self.radius.at(index, rng), self.angle(index, total))
    }
}
