//! One timed run between the collapsed and expanded scenes.

use std::time::Duration;

use super::easing::{Easing, ease};
use crate::element::Scene;
use crate::geometry::Offset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Expanding,
    Collapsing,
}

impl Direction {
    /// The `active` flag collaborators receive for this direction.
    pub fn is_active(&self) -> bool {
        matches!(self, Direction::Expanding)
    }

    pub fn reversed(&self) -> Self {
        match self {
            Direction::Expanding => Direction::Collapsing,
            Direction::Collapsing => Direction::Expanding,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionState {
    /// Still animating; `progress` is the eased progress.
    Running { progress: f64 },
    /// Reached the target scene during this advance.
    Finished,
}

impl TransitionState {
    pub fn is_running(&self) -> bool {
        matches!(self, TransitionState::Running { .. })
    }
}

/// Captures both endpoints up front; the live scene is always derived from
/// them, never accumulated frame to frame.
#[derive(Debug, Clone)]
pub struct Transition {
    direction: Direction,
    duration: Duration,
    easing: Easing,
    elapsed: Duration,
    from: Scene,
    to: Scene,
}

impl Transition {
    pub fn new(
        direction: Direction,
        duration: Duration,
        easing: Easing,
        from: Scene,
        to: Scene,
    ) -> Self {
        Self {
            direction,
            duration,
            easing,
            elapsed: Duration::ZERO,
            from,
            to,
        }
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn target(&self) -> &Scene {
        &self.to
    }

    /// Linear progress in `[0, 1]`.
    pub fn raw_progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.raw_progress() >= 1.0
    }

    pub fn advance(&mut self, dt: Duration) -> TransitionState {
        self.elapsed = self.elapsed.saturating_add(dt);

        if self.is_finished() {
            TransitionState::Finished
        } else {
            TransitionState::Running {
                progress: ease(self.easing, self.raw_progress()),
            }
        }
    }

    /// Edits both endpoints; the next frame reflects the change.
    pub fn restyle(&mut self, edit: impl Fn(&mut Scene)) {
        edit(&mut self.from);
        edit(&mut self.to);
    }

    /// Shifts both endpoints, used when the host moves the widget mid-run.
    pub fn translate(&mut self, delta: Offset) {
        self.from.translate(delta);
        self.to.translate(delta);
    }

    /// The scene at the current progress.
    pub fn frame(&self) -> Scene {
        if self.is_finished() {
            return self.to.clone();
        }
        Scene::lerp(&self.from, &self.to, ease(self.easing, self.raw_progress()))
    }
}
