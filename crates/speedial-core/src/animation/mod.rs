//! Timed transitions between widget scenes.
//!
//! The host owns the clock: it calls [`Transition::advance`] (through the
//! controller) once per frame and draws the resulting scene.

mod easing;
mod transition;

pub use easing::{DEFAULT_DAMPING, DEFAULT_VELOCITY, Easing, ease};
pub use transition::{Direction, Transition, TransitionState};
