use crate::animation::{Direction, Easing, Transition};
use crate::collaborator::{AnimationCustomizer, Configured, InteractionSink, ItemSource};
use crate::element::{
    Backdrop, DEFAULT_ITEM_RADIUS, MainElement, Satellite, SatelliteStyle, Scene,
};
use crate::error::ActionButtonError;
use crate::geometry::{Offset, Point, Rect};
use crate::layout::ArcLayout;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::f64::consts::FRAC_PI_2;
use std::rc::{Rc, Weak};
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};

pub const DEFAULT_DURATION: Duration = Duration::from_millis(300);
pub const DEFAULT_ROTATION: f64 = FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Collapsed,
    Transitioning(Direction),
    Expanded,
}

impl Status {
    pub fn is_active(&self) -> bool {
        matches!(self, Status::Expanded)
    }
}

/// What `toggle()` does while a transition is still running.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum TogglePolicy {
    /// Ignore the toggle.
    #[default]
    Reject,
    /// Run the reverse transition once the current one completes.
    Queue,
    /// Start the reverse transition right away from wherever the scene is.
    Preempt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started(Direction),
    Queued(Direction),
    Rejected,
    /// Already in (or heading to) the requested state.
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Main,
    Satellite(usize),
    Backdrop,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub layout: ArcLayout,
    pub duration: Duration,
    pub easing: Easing,
    /// Default main-element turn per transition, radians.
    pub rotation: f64,
    /// Radius of synthesized satellites.
    pub item_radius: f64,
    pub toggle_policy: TogglePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            layout: ArcLayout::default(),
            duration: DEFAULT_DURATION,
            easing: Easing::default(),
            rotation: DEFAULT_ROTATION,
            item_radius: DEFAULT_ITEM_RADIUS,
            toggle_policy: TogglePolicy::default(),
        }
    }
}

/// The speed-dial widget: a main button that fans satellites out around
/// itself over a dimmed backdrop.
///
/// The widget is clock-agnostic. A toggle builds the target scene and
/// starts a [`Transition`]; the host then calls [`ActionButton::advance`]
/// every frame and draws [`ActionButton::scene`]. Status flips only when the
/// transition completes.
///
/// Collaborators are held weakly. Keep the `Rc` alive elsewhere; once it is
/// dropped the widget treats the role as unset.
#[derive(Debug)]
pub struct ActionButton {
    status: Status,
    scene: Scene,
    settings: Settings,
    surface: Option<Rect>,
    transition: Option<Transition>,
    pending: Option<Direction>,
    item_source: Option<Weak<dyn ItemSource>>,
    interaction_sink: Option<Weak<dyn InteractionSink>>,
    animation_customizer: Option<Weak<dyn AnimationCustomizer>>,
}

impl Default for ActionButton {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl ActionButton {
    pub fn new(settings: Settings) -> Self {
        Self {
            status: Status::Collapsed,
            scene: Scene::default(),
            settings,
            surface: None,
            transition: None,
            pending: None,
            item_source: None,
            interaction_sink: None,
            animation_customizer: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn main(&self) -> &MainElement {
        &self.scene.main
    }

    pub fn backdrop(&self) -> &Backdrop {
        &self.scene.backdrop
    }

    pub fn satellites(&self) -> &[Satellite] {
        &self.scene.satellites
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn surface(&self) -> Option<Rect> {
        self.surface
    }

    // ---- collaborators ----

    pub fn set_item_source<S: ItemSource + 'static>(&mut self, source: &Rc<S>) {
        let weak: Weak<S> = Rc::downgrade(source);
        self.item_source = Some(weak);
    }

    pub fn set_interaction_sink<S: InteractionSink + 'static>(&mut self, sink: &Rc<S>) {
        let weak: Weak<S> = Rc::downgrade(sink);
        self.interaction_sink = Some(weak);
    }

    /// Also lets the customizer style the resting backdrop.
    pub fn set_animation_customizer<C: AnimationCustomizer + 'static>(
        &mut self,
        customizer: &Rc<C>,
    ) {
        customizer.configure_backdrop(&mut self.scene.backdrop, false);
        let weak: Weak<C> = Rc::downgrade(customizer);
        self.animation_customizer = Some(weak);
    }

    fn item_source(&self) -> Option<Rc<dyn ItemSource>> {
        self.item_source.as_ref()?.upgrade()
    }

    fn interaction_sink(&self) -> Option<Rc<dyn InteractionSink>> {
        self.interaction_sink.as_ref()?.upgrade()
    }

    fn animation_customizer(&self) -> Option<Rc<dyn AnimationCustomizer>> {
        self.animation_customizer.as_ref()?.upgrade()
    }

    // ---- geometry ----

    /// Applies `edit` to the live scene and to both ends of a running
    /// transition, so the change outlives the next frame.
    pub fn restyle(&mut self, edit: impl Fn(&mut Scene)) {
        edit(&mut self.scene);
        if let Some(transition) = self.transition.as_mut() {
            transition.restyle(&edit);
        }
    }

    /// Bounds of the overlay surface; the backdrop is sized to it.
    pub fn set_surface(&mut self, surface: Rect) {
        self.surface = Some(surface);
        self.restyle(|scene| {
            if scene.backdrop.visible {
                scene.backdrop.frame = Some(surface);
            }
        });
    }

    /// Moves the main element, carrying any satellites along.
    pub fn set_main_center(&mut self, center: Point) {
        let delta = center - self.scene.main.center;
        self.scene.translate(delta);
        if let Some(transition) = self.transition.as_mut() {
            transition.translate(delta);
        }
    }

    pub fn hit_test(&self, point: Point) -> Option<HitTarget> {
        if self.scene.main.contains(point) {
            return Some(HitTarget::Main);
        }
        if !self.is_active() {
            return None;
        }
        if let Some(item) = self.scene.satellites.iter().find(|s| s.contains(point)) {
            return Some(HitTarget::Satellite(item.index));
        }
        self.scene
            .backdrop
            .contains(point)
            .then_some(HitTarget::Backdrop)
    }

    /// Rectangles the host should route input to; everything else passes
    /// through to whatever lies beneath the overlay.
    pub fn input_region(&self) -> Vec<Rect> {
        match (self.is_active(), self.scene.backdrop.frame) {
            (true, Some(frame)) => vec![frame],
            (true, None) => std::iter::once(self.scene.main.bounds())
                .chain(self.scene.satellites.iter().map(Satellite::bounds))
                .collect(),
            (false, _) => vec![self.scene.main.bounds()],
        }
    }

    // ---- input ----

    /// Routes a tap to the element under `point`.
    pub fn tap(&mut self, point: Point) -> Result<Option<HitTarget>, ActionButtonError> {
        let target = self.hit_test(point);
        match target {
            Some(HitTarget::Main | HitTarget::Backdrop) => {
                self.toggle()?;
            }
            Some(HitTarget::Satellite(index)) => self.click_item(index)?,
            None => {}
        }
        Ok(target)
    }

    /// Reports a satellite click to the interaction sink. Never toggles.
    pub fn click_item(&mut self, index: usize) -> Result<(), ActionButtonError> {
        let count = self.scene.satellites.len();
        if index >= count {
            return Err(ActionButtonError::ItemOutOfRange { index, count });
        }

        match self.interaction_sink() {
            Some(sink) => sink.item_clicked(self, index),
            None => log::warn!("Interaction sink not found, click on item {index} dropped"),
        }
        Ok(())
    }

    // ---- state ----

    pub fn toggle(&mut self) -> Result<ToggleOutcome, ActionButtonError> {
        match self.status {
            Status::Collapsed => self.begin(Direction::Expanding),
            Status::Expanded => self.begin(Direction::Collapsing),
            Status::Transitioning(running) => self.toggle_while_busy(running),
        }
    }

    pub fn expand(&mut self) -> Result<ToggleOutcome, ActionButtonError> {
        match self.status {
            Status::Collapsed => self.begin(Direction::Expanding),
            Status::Expanded | Status::Transitioning(Direction::Expanding) => {
                self.pending = None;
                Ok(ToggleOutcome::Unchanged)
            }
            Status::Transitioning(running) => self.toggle_while_busy(running),
        }
    }

    pub fn collapse(&mut self) -> Result<ToggleOutcome, ActionButtonError> {
        match self.status {
            Status::Expanded => self.begin(Direction::Collapsing),
            Status::Collapsed | Status::Transitioning(Direction::Collapsing) => {
                self.pending = None;
                Ok(ToggleOutcome::Unchanged)
            }
            Status::Transitioning(running) => self.toggle_while_busy(running),
        }
    }

    fn toggle_while_busy(
        &mut self,
        running: Direction,
    ) -> Result<ToggleOutcome, ActionButtonError> {
        let reversal = running.reversed();
        match self.settings.toggle_policy {
            TogglePolicy::Reject => {
                log::debug!("Toggle ignored, {running:?} in progress");
                Ok(ToggleOutcome::Rejected)
            }
            TogglePolicy::Queue => {
                self.pending = Some(reversal);
                Ok(ToggleOutcome::Queued(reversal))
            }
            TogglePolicy::Preempt => {
                self.pending = None;
                self.begin(reversal)
            }
        }
    }

    /// Builds the target scene for `direction` and starts animating towards it.
    fn begin(&mut self, direction: Direction) -> Result<ToggleOutcome, ActionButtonError> {
        let active = direction.is_active();

        let source = if active {
            let source = self
                .item_source()
                .ok_or(ActionButtonError::MissingItemSource)?;
            self.provision(source.as_ref());
            self.show_backdrop();
            Some(source)
        } else {
            None
        };

        let from = self.scene.clone();
        let mut to = from.clone();
        let customizer = self.animation_customizer();
        let declined = |result: Option<Configured>| !result.is_some_and(|c| c.is_handled());

        let duration = customizer
            .as_ref()
            .and_then(|c| c.transition_duration(active))
            .unwrap_or(self.settings.duration);

        if declined(customizer.as_ref().map(|c| c.configure_main(&mut to.main, active))) {
            to.main.rotate(self.settings.rotation, active);
        }

        if declined(
            customizer
                .as_ref()
                .map(|c| c.configure_backdrop(&mut to.backdrop, active)),
        ) {
            to.backdrop.opacity = if active { 1.0 } else { 0.0 };
        }

        let center = to.main.center;
        let total = to.satellites.len();
        for (index, item) in to.satellites.iter_mut().enumerate() {
            if declined(
                customizer
                    .as_ref()
                    .map(|c| c.configure_item(&mut *item, index, active)),
            ) {
                item.opacity = if active { 1.0 } else { 0.0 };
            }
            item.center = match &source {
                Some(source) => center + self.resolve_position(source.as_ref(), index, total),
                None => center,
            };
        }

        log::debug!(
            "Starting {direction:?} over {}ms with {total} items",
            duration.as_millis()
        );

        self.status = Status::Transitioning(direction);
        self.transition = Some(Transition::new(
            direction,
            duration,
            self.settings.easing,
            from,
            to,
        ));

        if duration.is_zero() {
            self.advance(Duration::ZERO);
        }

        Ok(ToggleOutcome::Started(direction))
    }

    fn resolve_position(&self, source: &dyn ItemSource, index: usize, total: usize) -> Offset {
        source
            .item_position(index)
            .unwrap_or_else(|| self.settings.layout.position(index, total))
    }

    /// Replaces the satellites with a fresh set stacked under the main
    /// element, fully transparent.
    fn provision(&mut self, source: &dyn ItemSource) -> usize {
        self.remove_satellites();

        let count = source.item_count();
        let center = self.scene.main.center;
        let main_color = self.scene.main.color;
        let item_radius = self.settings.item_radius;
        let mut rng = rand::rng();

        for index in 0..count {
            let style = source
                .item_view(index)
                .unwrap_or_else(|| SatelliteStyle::circle(main_color, item_radius, &mut rng));
            self.scene
                .satellites
                .push(Satellite::new(index, style, center));
        }
        count
    }

    fn remove_satellites(&mut self) {
        self.scene.satellites.clear();
    }

    fn show_backdrop(&mut self) {
        match self.surface {
            Some(surface) => self.scene.backdrop.frame = Some(surface),
            None => log::warn!("Surface bounds not set, backdrop left unsized"),
        }
        self.scene.backdrop.visible = true;
    }

    /// Steps the running transition by `dt`. Returns whether a transition is
    /// still running afterwards.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };

        let state = transition.advance(dt);
        self.scene = transition.frame();

        if !state.is_running() {
            let direction = transition.direction();
            self.transition = None;
            self.complete(direction);
        }
        self.transition.is_some()
    }

    fn complete(&mut self, direction: Direction) {
        let active = direction.is_active();

        if let Some(sink) = self.interaction_sink() {
            sink.did_become_active(active);
        }

        self.status = if active {
            Status::Expanded
        } else {
            Status::Collapsed
        };

        if !active {
            self.remove_satellites();
            self.scene.backdrop.visible = false;
        }
        log::debug!("Transition complete, now {:?}", self.status);

        if let Some(next) = self.pending.take()
            && next != direction
            && let Err(e) = self.begin(next)
        {
            log::error!("Queued {next:?} failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Radius;
    use palette::Srgba;
    use std::cell::{Cell, RefCell};
    use std::f64::consts::TAU;

    const FRAME: Duration = Duration::from_millis(16);

    struct Items {
        count: Cell<usize>,
    }

    impl Items {
        fn new(count: usize) -> Rc<Self> {
            Rc::new(Self {
                count: Cell::new(count),
            })
        }
    }

    impl ItemSource for Items {
        fn item_count(&self) -> usize {
            self.count.get()
        }
    }

    #[derive(Default)]
    struct Recorder {
        clicks: RefCell<Vec<usize>>,
        became: RefCell<Vec<bool>>,
        toggle_on_click: bool,
    }

    impl InteractionSink for Recorder {
        fn item_clicked(&self, button: &mut ActionButton, index: usize) {
            self.clicks.borrow_mut().push(index);
            if self.toggle_on_click {
                button.toggle().unwrap();
            }
        }

        fn did_become_active(&self, active: bool) {
            self.became.borrow_mut().push(active);
        }
    }

    fn button_with(count: usize) -> (ActionButton, Rc<Items>) {
        let items = Items::new(count);
        let mut button = ActionButton::default();
        button.set_surface(Rect::new(0.0, 0.0, 800.0, 600.0));
        button.set_main_center(Point::new(400.0, 300.0));
        button.set_item_source(&items);
        (button, items)
    }

    fn settle(button: &mut ActionButton) {
        while button.advance(FRAME) {}
    }

    #[test]
    fn test_expand_places_five_items_on_ring() {
        let (mut button, _items) = button_with(5);

        assert_eq!(
            button.toggle().unwrap(),
            ToggleOutcome::Started(Direction::Expanding)
        );
        assert_eq!(button.status(), Status::Transitioning(Direction::Expanding));
        settle(&mut button);

        assert_eq!(button.status(), Status::Expanded);
        assert_eq!(button.satellites().len(), 5);

        let center = button.main().center;
        for (i, item) in button.satellites().iter().enumerate() {
            let offset = item.center - center;
            let expected = (i as f64 * 72.0).to_radians();
            assert!((offset.length() - 100.0).abs() < 1e-6);
            assert!((offset.angle().rem_euclid(TAU) - expected).abs() < 1e-6);
            assert_eq!(item.opacity, 1.0);
        }
        assert_eq!(button.backdrop().opacity, 1.0);
        assert!(button.backdrop().visible);
    }

    #[test]
    fn test_satellites_start_at_center_transparent() {
        let (mut button, _items) = button_with(3);
        button.toggle().unwrap();

        for item in button.satellites() {
            assert_eq!(item.center, button.main().center);
            assert_eq!(item.opacity, 0.0);
        }
        assert!(button.backdrop().visible);
    }

    #[test]
    fn test_round_trip_restores_collapsed_state() {
        let (mut button, _items) = button_with(4);

        button.toggle().unwrap();
        settle(&mut button);
        assert!((button.main().rotation - FRAC_PI_2).abs() < 1e-9);

        button.toggle().unwrap();
        assert!(button.backdrop().visible);
        settle(&mut button);

        assert_eq!(button.status(), Status::Collapsed);
        assert!(button.satellites().is_empty());
        assert!(!button.backdrop().visible);
        assert_eq!(button.backdrop().opacity, 0.0);
        assert!(button.main().rotation.abs() < 1e-9);
    }

    #[test]
    fn test_backdrop_visible_throughout_collapse() {
        let (mut button, _items) = button_with(2);
        button.toggle().unwrap();
        settle(&mut button);
        button.toggle().unwrap();

        while button.advance(FRAME) {
            assert!(button.backdrop().visible);
            assert_eq!(button.satellites().len(), 2);
        }
        assert!(!button.backdrop().visible);
    }

    #[test]
    fn test_collapse_when_collapsed_is_noop() {
        let (mut button, _items) = button_with(3);

        assert_eq!(button.collapse().unwrap(), ToggleOutcome::Unchanged);
        assert_eq!(button.status(), Status::Collapsed);
        assert!(!button.is_animating());
        assert!(button.satellites().is_empty());
    }

    #[test]
    fn test_expand_when_expanded_is_noop() {
        let (mut button, _items) = button_with(3);
        button.expand().unwrap();
        settle(&mut button);

        assert_eq!(button.expand().unwrap(), ToggleOutcome::Unchanged);
        assert!(!button.is_animating());
        assert_eq!(button.satellites().len(), 3);
    }

    #[test]
    fn test_zero_items() {
        let (mut button, _items) = button_with(0);

        button.toggle().unwrap();
        assert!(button.backdrop().visible);
        settle(&mut button);
        assert_eq!(button.status(), Status::Expanded);
        assert!(button.satellites().is_empty());
        assert!((button.main().rotation - FRAC_PI_2).abs() < 1e-9);

        button.toggle().unwrap();
        settle(&mut button);
        assert_eq!(button.status(), Status::Collapsed);
        assert!(!button.backdrop().visible);
        assert!(button.main().rotation.abs() < 1e-9);
    }

    #[test]
    fn test_missing_item_source_aborts_expand() {
        let mut button = ActionButton::default();

        assert_eq!(button.toggle(), Err(ActionButtonError::MissingItemSource));
        assert_eq!(button.status(), Status::Collapsed);
        assert!(button.satellites().is_empty());
        assert!(!button.backdrop().visible);
        assert!(!button.is_animating());
    }

    #[test]
    fn test_dropped_item_source_is_absent() {
        let (mut button, items) = button_with(3);
        drop(items);

        assert_eq!(button.toggle(), Err(ActionButtonError::MissingItemSource));
        assert_eq!(button.status(), Status::Collapsed);
    }

    #[test]
    fn test_missing_surface_still_expands() {
        let items = Items::new(2);
        let mut button = ActionButton::default();
        button.set_item_source(&items);

        button.toggle().unwrap();
        settle(&mut button);

        assert_eq!(button.status(), Status::Expanded);
        assert!(button.backdrop().visible);
        assert_eq!(button.backdrop().frame, None);
    }

    #[test]
    fn test_item_count_is_read_per_expansion() {
        let (mut button, items) = button_with(3);
        button.toggle().unwrap();
        settle(&mut button);
        assert_eq!(button.satellites().len(), 3);

        items.count.set(6);
        button.toggle().unwrap();
        settle(&mut button);
        button.toggle().unwrap();
        settle(&mut button);

        assert_eq!(button.satellites().len(), 6);
        let indices: Vec<_> = button.satellites().iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    }

    struct FadeOnlySecond;

    impl AnimationCustomizer for FadeOnlySecond {
        fn configure_item(&self, item: &mut Satellite, index: usize, _active: bool) -> Configured {
            if index == 2 {
                item.opacity = 0.5;
                Configured::Handled
            } else {
                Configured::Declined
            }
        }
    }

    #[test]
    fn test_item_override_is_exclusive_per_index() {
        let (mut button, _items) = button_with(5);
        let customizer = Rc::new(FadeOnlySecond);
        button.set_animation_customizer(&customizer);

        button.toggle().unwrap();
        settle(&mut button);

        let opacities: Vec<_> = button.satellites().iter().map(|s| s.opacity).collect();
        assert_eq!(opacities, vec![1.0, 1.0, 0.5, 1.0, 1.0]);

        // positions are still assigned for the overridden item
        let offset = button.satellites()[2].center - button.main().center;
        assert!((offset.length() - 100.0).abs() < 1e-6);

        button.toggle().unwrap();
        while button.advance(FRAME) {
            if let Some(target) = button.transition().map(|t| t.target()) {
                assert_eq!(target.satellites[2].opacity, 0.5);
                assert_eq!(target.satellites[0].opacity, 0.0);
            }
        }
    }

    struct CustomMain;

    impl AnimationCustomizer for CustomMain {
        fn transition_duration(&self, active: bool) -> Option<Duration> {
            Some(if active {
                Duration::from_millis(100)
            } else {
                Duration::ZERO
            })
        }

        fn configure_main(&self, main: &mut MainElement, active: bool) -> Configured {
            main.radius = if active { 40.0 } else { 28.0 };
            Configured::Handled
        }

        fn configure_backdrop(&self, backdrop: &mut Backdrop, active: bool) -> Configured {
            backdrop.color = Srgba::new(0.2, 0.4, 0.6, 0.4);
            backdrop.opacity = if active { 0.7 } else { 0.0 };
            Configured::Handled
        }
    }

    #[test]
    fn test_main_and_backdrop_overrides_skip_defaults() {
        let (mut button, _items) = button_with(1);
        let customizer = Rc::new(CustomMain);
        button.set_animation_customizer(&customizer);

        button.toggle().unwrap();
        assert_eq!(
            button.transition().map(|t| t.duration()),
            Some(Duration::from_millis(100))
        );
        settle(&mut button);

        assert_eq!(button.main().rotation, 0.0);
        assert_eq!(button.main().radius, 40.0);
        assert_eq!(button.backdrop().opacity, 0.7);

        // zero duration completes synchronously
        button.toggle().unwrap();
        assert_eq!(button.status(), Status::Collapsed);
        assert!(!button.is_animating());
        assert!(button.satellites().is_empty());
    }

    struct Placed;

    impl ItemSource for Placed {
        fn item_count(&self) -> usize {
            2
        }

        fn item_view(&self, index: usize) -> Option<SatelliteStyle> {
            (index == 0).then(|| {
                SatelliteStyle::new(30.0, Srgba::new(1.0, 1.0, 1.0, 1.0)).with_label("first")
            })
        }

        fn item_position(&self, index: usize) -> Option<Offset> {
            (index == 1).then_some(Offset::new(0.0, -150.0))
        }
    }

    #[test]
    fn test_item_source_overrides_view_and_position() {
        let source = Rc::new(Placed);
        let mut button = ActionButton::default();
        button.set_item_source(&source);
        button.toggle().unwrap();
        settle(&mut button);

        let first = &button.satellites()[0];
        assert_eq!(first.radius, 30.0);
        assert_eq!(first.label.as_deref(), Some("first"));
        // two items on a full circle: first at angle 0
        assert!((first.center.x - 100.0).abs() < 1e-6);

        let second = &button.satellites()[1];
        assert_eq!(second.radius, DEFAULT_ITEM_RADIUS);
        assert_eq!(second.center, Point::new(0.0, -150.0));
    }

    #[test]
    fn test_spiral_layout_setting() {
        let (mut button, _items) = button_with(4);
        button.settings_mut().layout = ArcLayout::new(
            Radius::Spiral {
                base: 40.0,
                step: 10.0,
                jitter: 0.0,
            },
            0.0,
            TAU,
        );
        button.toggle().unwrap();
        settle(&mut button);

        let center = button.main().center;
        let radii: Vec<_> = button
            .satellites()
            .iter()
            .map(|s| (s.center - center).length().round())
            .collect();
        assert_eq!(radii, vec![40.0, 50.0, 60.0, 70.0]);
    }

    #[test]
    fn test_backdrop_tap_toggles_like_main() {
        let (mut button, _items) = button_with(3);
        let main = button.main().center;

        assert_eq!(button.tap(main).unwrap(), Some(HitTarget::Main));
        settle(&mut button);
        assert_eq!(button.status(), Status::Expanded);

        assert_eq!(
            button.tap(Point::new(10.0, 10.0)).unwrap(),
            Some(HitTarget::Backdrop)
        );
        assert_eq!(button.status(), Status::Transitioning(Direction::Collapsing));
        settle(&mut button);
        assert_eq!(button.status(), Status::Collapsed);
    }

    #[test]
    fn test_only_main_reachable_while_collapsed() {
        let (mut button, _items) = button_with(3);

        assert_eq!(button.hit_test(Point::new(10.0, 10.0)), None);
        assert_eq!(button.tap(Point::new(10.0, 10.0)).unwrap(), None);
        assert_eq!(button.input_region(), vec![button.main().bounds()]);

        button.toggle().unwrap();
        settle(&mut button);
        assert_eq!(
            button.input_region(),
            vec![Rect::new(0.0, 0.0, 800.0, 600.0)]
        );
    }

    #[test]
    fn test_item_click_is_reported_without_toggle() {
        let (mut button, _items) = button_with(5);
        let sink = Rc::new(Recorder::default());
        button.set_interaction_sink(&sink);
        button.toggle().unwrap();
        settle(&mut button);

        let target = button.satellites()[3].center;
        assert_eq!(button.tap(target).unwrap(), Some(HitTarget::Satellite(3)));

        assert_eq!(*sink.clicks.borrow(), vec![3]);
        assert_eq!(button.status(), Status::Expanded);
        assert_eq!(*sink.became.borrow(), vec![true]);
    }

    #[test]
    fn test_sink_may_collapse_on_click() {
        let (mut button, _items) = button_with(2);
        let sink = Rc::new(Recorder {
            toggle_on_click: true,
            ..Default::default()
        });
        button.set_interaction_sink(&sink);
        button.toggle().unwrap();
        settle(&mut button);

        button.click_item(1).unwrap();
        assert_eq!(button.status(), Status::Transitioning(Direction::Collapsing));
        settle(&mut button);

        assert_eq!(button.status(), Status::Collapsed);
        assert_eq!(*sink.became.borrow(), vec![true, false]);
    }

    #[test]
    fn test_click_out_of_range() {
        let (mut button, _items) = button_with(2);
        assert_eq!(
            button.click_item(0),
            Err(ActionButtonError::ItemOutOfRange { index: 0, count: 0 })
        );
    }

    #[test]
    fn test_reject_policy_ignores_toggle_mid_transition() {
        let (mut button, _items) = button_with(3);
        button.toggle().unwrap();
        button.advance(FRAME);

        assert_eq!(button.toggle().unwrap(), ToggleOutcome::Rejected);
        settle(&mut button);
        assert_eq!(button.status(), Status::Expanded);
    }

    #[test]
    fn test_queue_policy_runs_reversal_after_completion() {
        let (mut button, _items) = button_with(3);
        button.settings_mut().toggle_policy = TogglePolicy::Queue;
        button.toggle().unwrap();
        button.advance(FRAME);

        assert_eq!(
            button.toggle().unwrap(),
            ToggleOutcome::Queued(Direction::Collapsing)
        );
        while button.status() == Status::Transitioning(Direction::Expanding) {
            button.advance(FRAME);
        }
        assert_eq!(button.status(), Status::Transitioning(Direction::Collapsing));
        settle(&mut button);
        assert_eq!(button.status(), Status::Collapsed);
        assert!(button.satellites().is_empty());
    }

    #[test]
    fn test_expand_cancels_queued_collapse() {
        let (mut button, _items) = button_with(3);
        button.settings_mut().toggle_policy = TogglePolicy::Queue;
        button.toggle().unwrap();
        button.advance(FRAME);
        button.toggle().unwrap();

        assert_eq!(button.expand().unwrap(), ToggleOutcome::Unchanged);
        settle(&mut button);
        assert_eq!(button.status(), Status::Expanded);
        assert_eq!(button.satellites().len(), 3);
    }

    #[test]
    fn test_collapse_cancels_queued_expand() {
        let (mut button, _items) = button_with(3);
        button.settings_mut().toggle_policy = TogglePolicy::Queue;
        button.toggle().unwrap();
        settle(&mut button);
        button.toggle().unwrap();
        button.advance(FRAME);
        assert_eq!(
            button.toggle().unwrap(),
            ToggleOutcome::Queued(Direction::Expanding)
        );

        assert_eq!(button.collapse().unwrap(), ToggleOutcome::Unchanged);
        settle(&mut button);
        assert_eq!(button.status(), Status::Collapsed);
        assert!(button.satellites().is_empty());
    }

    #[test]
    fn test_resize_mid_transition_sizes_backdrop() {
        let (mut button, _items) = button_with(3);
        button.toggle().unwrap();
        button.advance(FRAME);

        let screen = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        button.set_surface(screen);
        button.advance(FRAME);
        assert_eq!(button.backdrop().frame, Some(screen));

        settle(&mut button);
        assert_eq!(button.backdrop().frame, Some(screen));
        assert_eq!(button.input_region(), vec![screen]);
    }

    #[test]
    fn test_restyle_mid_transition_survives_completion() {
        let (mut button, _items) = button_with(3);
        button.toggle().unwrap();
        button.advance(FRAME);

        let tint = Srgba::new(0.1, 0.2, 0.3, 0.5);
        button.restyle(|scene| {
            scene.main.radius = 50.0;
            scene.backdrop.color = tint;
        });
        assert_eq!(button.main().radius, 50.0);

        settle(&mut button);
        assert_eq!(button.main().radius, 50.0);
        assert_eq!(button.backdrop().color, tint);
        assert!(button.hit_test(button.main().center + Offset::new(45.0, 0.0)).is_some());
    }

    #[test]
    fn test_preempt_policy_reverses_immediately() {
        let (mut button, _items) = button_with(3);
        button.settings_mut().toggle_policy = TogglePolicy::Preempt;
        button.settings_mut().easing = Easing::Linear;
        button.toggle().unwrap();
        button.advance(Duration::from_millis(150));

        assert_eq!(
            button.toggle().unwrap(),
            ToggleOutcome::Started(Direction::Collapsing)
        );
        settle(&mut button);

        assert_eq!(button.status(), Status::Collapsed);
        assert!(button.satellites().is_empty());
        assert!(!button.backdrop().visible);
    }

    #[test]
    fn test_moving_main_carries_satellites() {
        let (mut button, _items) = button_with(2);
        button.toggle().unwrap();
        settle(&mut button);
        let before = button.satellites()[0].center - button.main().center;

        button.set_main_center(Point::new(100.0, 100.0));
        let after = button.satellites()[0].center - button.main().center;
        assert_eq!(before, after);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("queue".parse::<TogglePolicy>().unwrap(), TogglePolicy::Queue);
        assert_eq!(
            "Preempt".parse::<TogglePolicy>().unwrap(),
            TogglePolicy::Preempt
        );
        let parsed: TogglePolicy = serde_json::from_str("\"REJECT\"").unwrap();
        assert_eq!(parsed, TogglePolicy::Reject);
    }
}
