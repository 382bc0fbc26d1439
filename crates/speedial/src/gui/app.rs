use crate::config::{self, Config};
use crate::events::{AppEvent, Command};
use crate::gui::menu::{self, Launcher};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use speedial_core::geometry::{Point, Rect};
use speedial_core::{ActionButton, ActionButtonError, ToggleOutcome};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

pub struct AppModel {
    pub button: Rc<RefCell<ActionButton>>,
    pub launcher: Rc<Launcher>,
    pub config: Config,
    pub colors: ThemeColors,
    /// Set while a frame-clock tick callback is installed.
    pub ticking: Rc<Cell<bool>>,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Tap(Point),
    Toggle,
    Expand,
    Collapse,
    Resize(f64, f64),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Command(Command::Toggle) => AppMsg::Toggle,
            AppEvent::Command(Command::Expand) => AppMsg::Expand,
            AppEvent::Command(Command::Collapse) => AppMsg::Collapse,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

fn log_outcome(action: &str, result: Result<ToggleOutcome, ActionButtonError>) {
    match result {
        Ok(outcome) => log::debug!("{action}: {outcome:?}"),
        Err(e) => log::error!("{action} failed: {e}"),
    }
}

/// Time since the previous frame; frame clock times are in microseconds.
fn frame_delta(previous: Option<i64>, now: i64) -> Duration {
    previous
        .map(|prev| Duration::from_micros(now.saturating_sub(prev).max(0) as u64))
        .unwrap_or_default()
}

/// Advances one frame; `Break` once nothing is left to animate.
fn step(button: &RefCell<ActionButton>, dt: Duration) -> glib::ControlFlow {
    if button.borrow_mut().advance(dt) {
        glib::ControlFlow::Continue
    } else {
        glib::ControlFlow::Break
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Speedial"),
            add_css_class: "speedial-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Collapse);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "overlay"]
            gtk::Overlay {
                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "speedial-drawing-area",

                    connect_resize[sender] => move |_, width, height| {
                        sender.input(AppMsg::Resize(width as f64, height as f64));
                    },

                    add_controller = gtk::GestureClick {
                        set_button: gtk::gdk::BUTTON_PRIMARY,
                        connect_released[sender] => move |_, _, x, y| {
                            sender.input(AppMsg::Tap(Point::new(x, y)));
                        }
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let colors = ThemeColors::default();
        let launcher = Rc::new(Launcher::new(&config, colors.item));
        let mut button = ActionButton::new(config.settings());
        button.set_item_source(&launcher);
        button.set_interaction_sink(&launcher);
        button.set_animation_customizer(&launcher);

        let model = AppModel {
            button: Rc::new(RefCell::new(button)),
            launcher,
            config,
            colors,
            ticking: Rc::new(Cell::new(false)),
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        model.colors = ThemeColors::from_context(&widgets.drawing_area.style_context());
        model.launcher.set_item_color(model.colors.item);
        model.apply_style();

        let button_draw = model.button.clone();
        let launcher_draw = model.launcher.clone();
        let colors = model.colors;
        widgets
            .drawing_area
            .set_draw_func(move |_, cr, _, _| {
                if let Err(e) = menu::draw(cr, &button_draw.borrow(), &launcher_draw, &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(true);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Tap(point) => {
                let result = self.button.borrow_mut().tap(point);
                match result {
                    Ok(Some(target)) => log::debug!("Tapped {:?}", target),
                    Ok(None) => {}
                    Err(e) => log::error!("Tap failed: {}", e),
                }
            }
            AppMsg::Toggle => log_outcome("Toggle", self.button.borrow_mut().toggle()),
            AppMsg::Expand => log_outcome("Expand", self.button.borrow_mut().expand()),
            AppMsg::Collapse => log_outcome("Collapse", self.button.borrow_mut().collapse()),
            AppMsg::Resize(width, height) => {
                self.button
                    .borrow_mut()
                    .set_surface(Rect::new(0.0, 0.0, width, height));
                self.reposition();
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.config = new_config;
                    self.launcher.reload(&self.config);
                    *self.button.borrow_mut().settings_mut() = self.config.settings();
                    self.apply_style();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
        self.refresh();
        self.ensure_ticking();
    }
}

impl AppModel {
    /// Pushes the config's look onto the live button.
    fn apply_style(&self) {
        {
            let radius = self.config.button.radius;
            let main_color = self
                .config
                .button
                .color
                .map(|c| c.with_alpha(1.0))
                .unwrap_or(self.colors.accent);
            let backdrop_color = self
                .config
                .backdrop
                .color
                .with_alpha(self.config.backdrop.alpha);

            self.button.borrow_mut().restyle(|scene| {
                scene.main.radius = radius;
                scene.main.color = main_color;
                scene.backdrop.color = backdrop_color;
            });
        }
        self.reposition();
    }

    fn reposition(&self) {
        let mut button = self.button.borrow_mut();
        if let Some(surface) = button.surface() {
            let inset = self.config.button.margin + self.config.button.radius;
            button.set_main_center(self.config.button.anchor.anchor(surface, inset));
        }
    }

    /// Drives a running transition from the frame clock. The callback removes
    /// itself once the button settles so an idle overlay stops redrawing.
    fn ensure_ticking(&self) {
        if self.ticking.get() || !self.button.borrow().is_animating() {
            return;
        }
        self.ticking.set(true);

        let button = self.button.clone();
        let root = self.root.clone();
        let ticking = self.ticking.clone();
        let last_frame = Cell::new(None::<i64>);
        self.drawing_area.add_tick_callback(move |area, clock| {
            let now = clock.frame_time();
            let dt = frame_delta(last_frame.replace(Some(now)), now);

            let flow = step(&button, dt);
            area.queue_draw();
            if matches!(flow, glib::ControlFlow::Break) {
                window::set_input_region(&root, &button.borrow().input_region());
                ticking.set(false);
            }
            flow
        });
    }

    fn refresh(&self) {
        self.drawing_area.queue_draw();
        window::set_input_region(&self.root, &self.button.borrow().input_region());
    }
}
