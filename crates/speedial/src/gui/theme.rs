use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

/// Colors taken from the active GTK theme, used where the config is silent.
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    pub accent: Srgba<f64>,
    pub item: Srgba<f64>,
    pub label: Srgba<f64>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            accent: Srgba::new(0.21, 0.52, 0.89, 1.0),
            item: Srgba::new(0.15, 0.15, 0.15, 0.8),
            label: Srgba::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let fallback = Self::default();
        Self {
            accent: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                fallback.accent,
                Some(1.0),
            ),
            item: Self::lookup_color(
                context,
                "theme_bg_color",
                fallback.item,
                Some(speedial_core::element::DEFAULT_ITEM_ALPHA),
            ),
            label: Self::lookup_color(context, "theme_selected_fg_color", fallback.label, None),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.speedial-window, .speedial-drawing-area {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
