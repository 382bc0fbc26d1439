use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, Layer, LayerShell};
use speedial_core::geometry::Rect;

/// Full-screen transparent overlay; the input region decides which parts
/// actually receive pointer events.
pub fn init_layer_shell(window: &gtk::ApplicationWindow) {
    window.init_layer_shell();
    window.set_layer(Layer::Overlay);
    window.set_namespace(Some("speedial"));
    window.set_exclusive_zone(-1);
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(gtk4_layer_shell::KeyboardMode::OnDemand);
}

fn to_rectangle_int(rect: &Rect) -> cairo::RectangleInt {
    let x = rect.x.floor();
    let y = rect.y.floor();
    cairo::RectangleInt::new(
        x as i32,
        y as i32,
        (rect.x + rect.width - x).ceil() as i32,
        (rect.y + rect.height - y).ceil() as i32,
    )
}

/// Restricts pointer input to `rects` so clicks elsewhere reach the
/// windows underneath.
pub fn set_input_region(window: &gtk::ApplicationWindow, rects: &[Rect]) {
    let Some(surface) = window.surface() else {
        return;
    };

    let region = cairo::Region::create();
    for rect in rects {
        if let Err(e) = region.union_rectangle(&to_rectangle_int(rect)) {
            log::error!("Failed to build input region: {}", e);
            return;
        }
    }
    surface.set_input_region(&region);
}
