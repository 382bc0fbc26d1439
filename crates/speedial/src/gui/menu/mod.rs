pub mod model;
pub mod view;

pub use model::{Entry, Launcher};
pub use view::draw;

pub const ICON_SIZE: i32 = 256;
/// Share of a satellite's diameter an icon may cover.
pub const ICON_FILL: f64 = 0.6;
pub const LABEL_FONT_SIZE: f64 = 11.0;
/// Arm length of the "+" glyph relative to the main radius.
pub const GLYPH_ARM: f64 = 0.4;
pub const GLYPH_WIDTH: f64 = 3.0;
