//! Toolkit-independent core of the speed-dial action button.
//!
//! [`ActionButton`] owns the widget state and the expand/collapse state
//! machine. Hosts supply data and behavior through the traits in
//! [`collaborator`], drive animation with [`ActionButton::advance`] and draw
//! [`ActionButton::scene`] back to front: backdrop, satellites, main element.

pub mod animation;
pub mod collaborator;
pub mod controller;
pub mod element;
pub mod error;
pub mod geometry;
pub mod layout;

pub use collaborator::{AnimationCustomizer, Configured, InteractionSink, ItemSource};
pub use controller::{ActionButton, HitTarget, Settings, Status, ToggleOutcome, TogglePolicy};
pub use error::ActionButtonError;
