//! Contracts for the objects that feed and customize an [`ActionButton`].
//!
//! Every optional method has a default that declines, so implementors only
//! write the parts they care about. Declining is always explicit: lookups
//! return `None`, configuration hooks return [`Configured::Declined`], and the
//! widget then applies its built-in behavior.

use crate::controller::ActionButton;
use crate::element::{Backdrop, MainElement, Satellite, SatelliteStyle};
use crate::geometry::Offset;
use std::time::Duration;

/// Outcome of a configuration hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Configured {
    /// The collaborator set the end state itself; the default is skipped.
    Handled,
    /// The collaborator left the element alone; the default applies.
    Declined,
}

impl Configured {
    pub fn is_handled(&self) -> bool {
        matches!(self, Configured::Handled)
    }
}

/// Supplies the satellites. Without one the widget refuses to expand.
pub trait ItemSource {
    /// How many satellites the next expansion creates.
    fn item_count(&self) -> usize;

    /// Look of the satellite at `index`; `None` gets a synthesized circle.
    fn item_view(&self, _index: usize) -> Option<SatelliteStyle> {
        None
    }

    /// Expanded position relative to the main center; `None` uses the arc layout.
    fn item_position(&self, _index: usize) -> Option<Offset> {
        None
    }
}

/// Receives the widget's user-facing events.
pub trait InteractionSink {
    /// A satellite was tapped. The widget does not collapse on its own;
    /// call [`ActionButton::toggle`] here to close it.
    fn item_clicked(&self, button: &mut ActionButton, index: usize);

    /// Fired when a transition completes, before the new status is committed.
    fn did_become_active(&self, _active: bool) {}
}

/// Overrides pieces of the expand/collapse animation.
///
/// The configure hooks run while the target scene is being built: whatever
/// they leave on the element is what the transition animates towards.
pub trait AnimationCustomizer {
    fn transition_duration(&self, _active: bool) -> Option<Duration> {
        None
    }

    fn configure_main(&self, _main: &mut MainElement, _active: bool) -> Configured {
        Configured::Declined
    }

    /// The satellite's position is assigned after this hook and can't be overridden here.
    fn configure_item(&self, _item: &mut Satellite, _index: usize, _active: bool) -> Configured {
        Configured::Declined
    }

    fn configure_backdrop(&self, _backdrop: &mut Backdrop, _active: bool) -> Configured {
        Configured::Declined
    }
}
