use crate::geometry::{Offset, Point, Rect};
use palette::{FromColor, Hsv, Srgb, Srgba};
use rand::Rng;
use std::path::PathBuf;

pub const DEFAULT_MAIN_RADIUS: f64 = 28.0;
pub const DEFAULT_ITEM_RADIUS: f64 = 20.0;
pub const DEFAULT_ITEM_ALPHA: f64 = 0.8;
pub const BACKDROP_ALPHA: f64 = 0.3;

// floor so a gray main color still yields colored items
const MIN_ITEM_SATURATION: f64 = 0.45;

/// The always-visible trigger button.
#[derive(Debug, Clone, PartialEq)]
pub struct MainElement {
    pub center: Point,
    pub radius: f64,
    /// Radians, accumulated across transitions.
    pub rotation: f64,
    pub color: Srgba<f64>,
}

impl Default for MainElement {
    fn default() -> Self {
        Self {
            center: Point::default(),
            radius: DEFAULT_MAIN_RADIUS,
            rotation: 0.0,
            color: Srgba::new(0.90, 0.22, 0.27, 1.0),
        }
    }
}

impl MainElement {
    pub fn bounds(&self) -> Rect {
        Rect::around(self.center, self.radius)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.center.distance_to(p) <= self.radius
    }

    /// Turns forward by `angle` when opening and back by it when closing,
    /// so an open/close pair leaves the orientation unchanged.
    pub fn rotate(&mut self, angle: f64, active: bool) {
        self.rotation += if active { angle } else { -angle };
    }
}

/// Full-surface dimming layer shown while the widget is open.
#[derive(Debug, Clone, PartialEq)]
pub struct Backdrop {
    pub frame: Option<Rect>,
    pub color: Srgba<f64>,
    pub opacity: f64,
    pub visible: bool,
}

impl Default for Backdrop {
    fn default() -> Self {
        Self {
            frame: None,
            color: Srgba::new(0.0, 0.0, 0.0, BACKDROP_ALPHA),
            opacity: 0.0,
            visible: false,
        }
    }
}

impl Backdrop {
    pub fn contains(&self, p: Point) -> bool {
        self.frame.is_some_and(|f| f.contains(p))
    }
}

/// How an item source wants a satellite to look.
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteStyle {
    pub radius: f64,
    pub color: Srgba<f64>,
    pub label: Option<String>,
    pub icon: Option<PathBuf>,
}

impl SatelliteStyle {
    pub fn new(radius: f64, color: Srgba<f64>) -> Self {
        Self {
            radius,
            color,
            label: None,
            icon: None,
        }
    }

    /// Plain translucent circle with a random hue that keeps the main
    /// element's brightness.
    pub fn circle<R: Rng>(main_color: Srgba<f64>, radius: f64, rng: &mut R) -> Self {
        let base: Hsv<palette::encoding::Srgb, f64> = Hsv::from_color(main_color.color);
        let hsv = Hsv::<palette::encoding::Srgb, f64>::new(
            rng.random_range(0.0..360.0),
            base.saturation.max(MIN_ITEM_SATURATION),
            base.value,
        );
        let rgb: Srgb<f64> = Srgb::from_color(hsv);

        Self::new(
            radius,
            Srgba::new(rgb.red, rgb.green, rgb.blue, DEFAULT_ITEM_ALPHA),
        )
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<PathBuf>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// An item button; only exists between the start of an expansion and the
/// end of the following collapse.
#[derive(Debug, Clone, PartialEq)]
pub struct Satellite {
    pub index: usize,
    pub center: Point,
    pub radius: f64,
    pub color: Srgba<f64>,
    pub opacity: f64,
    pub label: Option<String>,
    pub icon: Option<PathBuf>,
}

impl Satellite {
    pub fn new(index: usize, style: SatelliteStyle, center: Point) -> Self {
        Self {
            index,
            center,
            radius: style.radius,
            color: style.color,
            opacity: 0.0,
            label: style.label,
            icon: style.icon,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::around(self.center, self.radius)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.center.distance_to(p) <= self.radius
    }
}

/// Everything the widget draws, captured as transition endpoints.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub main: MainElement,
    pub backdrop: Backdrop,
    pub satellites: Vec<Satellite>,
}

impl Scene {
    /// Moves the main element and every satellite; the backdrop stays put.
    pub fn translate(&mut self, delta: Offset) {
        self.main.center = self.main.center + delta;
        for item in &mut self.satellites {
            item.center = item.center + delta;
        }
    }

    /// Numeric properties are interpolated; flags, frames, labels and icons
    /// take the target value immediately.
    pub fn lerp(from: &Scene, to: &Scene, t: f64) -> Scene {
        let main = MainElement {
            center: from.main.center.lerp(to.main.center, t),
            radius: lerp(from.main.radius, to.main.radius, t),
            rotation: lerp(from.main.rotation, to.main.rotation, t),
            color: lerp_color(from.main.color, to.main.color, t),
        };

        let backdrop = Backdrop {
            opacity: lerp(from.backdrop.opacity, to.backdrop.opacity, t).clamp(0.0, 1.0),
            color: lerp_color(from.backdrop.color, to.backdrop.color, t),
            ..to.backdrop.clone()
        };

        let satellites = to
            .satellites
            .iter()
            .enumerate()
            .map(|(i, target)| match from.satellites.get(i) {
                Some(origin) => Satellite {
                    center: origin.center.lerp(target.center, t),
                    radius: lerp(origin.radius, target.radius, t),
                    color: lerp_color(origin.color, target.color, t),
                    opacity: lerp(origin.opacity, target.opacity, t).clamp(0.0, 1.0),
                    ..target.clone()
                },
                None => target.clone(),
            })
            .collect();

        Scene {
            main,
            backdrop,
            satellites,
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_color(a: Srgba<f64>, b: Srgba<f64>, t: f64) -> Srgba<f64> {
    Srgba::new(
        lerp(a.color.red, b.color.red, t),
        lerp(a.color.green, b.color.green, t),
        lerp(a.color.blue, b.color.blue, t),
        lerp(a.alpha, b.alpha, t),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_circle_style_defaults() {
        let mut rng = StdRng::seed_from_u64(1);
        let style =
            SatelliteStyle::circle(MainElement::default().color, DEFAULT_ITEM_RADIUS, &mut rng);

        assert_eq!(style.radius, 20.0);
        assert_eq!(style.color.alpha, DEFAULT_ITEM_ALPHA);
        assert!(style.label.is_none());
        assert!(style.icon.is_none());
    }

    #[test]
    fn test_circle_style_from_gray_is_still_colored() {
        let mut rng = StdRng::seed_from_u64(3);
        let gray = Srgba::new(0.5, 0.5, 0.5, 1.0);
        let style = SatelliteStyle::circle(gray, 20.0, &mut rng);
        let c = style.color.color;

        assert!(c.red != c.green || c.green != c.blue);
    }

    #[test]
    fn test_satellite_starts_transparent() {
        let style = SatelliteStyle::new(12.0, Srgba::new(1.0, 1.0, 1.0, 1.0)).with_label("a");
        let sat = Satellite::new(4, style, Point::new(3.0, 4.0));

        assert_eq!(sat.opacity, 0.0);
        assert_eq!(sat.index, 4);
        assert_eq!(sat.label.as_deref(), Some("a"));
        assert!(sat.contains(Point::new(10.0, 4.0)));
        assert!(!sat.contains(Point::new(20.0, 4.0)));
    }

    #[test]
    fn test_scene_lerp_midpoint() {
        let from = Scene::default();
        let mut to = from.clone();
        to.main.rotation = 1.0;
        to.backdrop.opacity = 1.0;
        to.backdrop.visible = true;

        let mid = Scene::lerp(&from, &to, 0.5);
        assert_eq!(mid.main.rotation, 0.5);
        assert_eq!(mid.backdrop.opacity, 0.5);
        assert!(mid.backdrop.visible);
    }
}
