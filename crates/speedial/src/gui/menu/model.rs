use crate::config::{self, Config, ExecCommand, ItemConfig, ItemLabel, SETUP_EXEC};
use crate::gui::menu::ICON_SIZE;
use crate::sys::launch;
use gdk_pixbuf::Pixbuf;
use palette::Srgba;
use speedial_core::element::SatelliteStyle;
use speedial_core::geometry::Offset;
use speedial_core::layout::DEFAULT_ARC_RADIUS;
use speedial_core::{ActionButton, AnimationCustomizer, InteractionSink, ItemSource};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One configured launcher item.
#[derive(Debug, Clone, Default)]
pub struct Entry {
    pub label: Option<ItemLabel>,
    pub color: Option<Srgba<f64>>,
    pub icon: Option<PathBuf>,
    pub exec: Option<ExecCommand>,
    pub placement: Option<Offset>,
}

impl Entry {
    pub fn from_config(cfg: &ItemConfig) -> Self {
        Self {
            label: cfg.label.clone(),
            color: cfg
                .color
                .map(|c| c.with_alpha(speedial_core::element::DEFAULT_ITEM_ALPHA)),
            icon: cfg.icon.clone(),
            exec: cfg.exec.clone(),
            placement: cfg.angle.map(|deg| {
                Offset::polar(cfg.distance.unwrap_or(DEFAULT_ARC_RADIUS), deg.to_radians())
            }),
        }
    }

    /// `None` when nothing about the look was configured, leaving the
    /// widget to synthesize a plain circle.
    pub fn style(&self, radius: f64, fallback: Srgba<f64>) -> Option<SatelliteStyle> {
        if self.color.is_none() && self.label.is_none() && self.icon.is_none() {
            return None;
        }

        let mut style = SatelliteStyle::new(radius, self.color.unwrap_or(fallback));
        if let Some(label) = &self.label {
            style = style.with_label(label.as_str());
        }
        if let Some(icon) = &self.icon {
            style = style.with_icon(icon.clone());
        }
        Some(style)
    }

    fn activate(&self) {
        let Some(exec) = &self.exec else {
            log::debug!("Item {:?} has no command", self.label);
            return;
        };

        if exec.as_str() == SETUP_EXEC {
            match config::write_default_config() {
                Ok(path) => {
                    if let Err(e) = std::process::Command::new("xdg-open").arg(&path).spawn() {
                        log::error!("Failed to open {}: {}", path.display(), e);
                    }
                }
                Err(e) => log::error!("Failed to write default config: {}", e),
            }
        } else if let Err(e) = launch::spawn(exec) {
            log::error!("Failed to launch '{}': {}", exec, e);
        }
    }
}

/// Icons keyed by file path. Failed loads are remembered so a broken path
/// is reported once.
#[derive(Debug, Default)]
pub struct IconCache {
    icons: RefCell<HashMap<PathBuf, Option<Pixbuf>>>,
}

impl IconCache {
    pub fn get(&self, path: &Path) -> Option<Pixbuf> {
        self.icons
            .borrow_mut()
            .entry(path.to_path_buf())
            .or_insert_with(|| Self::load(path))
            .clone()
    }

    pub fn clear(&self) {
        self.icons.borrow_mut().clear();
    }

    fn load(path: &Path) -> Option<Pixbuf> {
        Pixbuf::from_file_at_scale(path, ICON_SIZE, ICON_SIZE, true)
            .map_err(|e| log::warn!("Failed to load icon {}: {}", path.display(), e))
            .ok()
    }
}

/// Feeds the action button from the config file and launches the command
/// behind a tapped item.
///
/// Interior mutability lets a config reload swap everything out while the
/// button keeps its weak references.
#[derive(Debug)]
pub struct Launcher {
    entries: RefCell<Vec<Entry>>,
    icons: IconCache,
    item_radius: Cell<f64>,
    item_color: Cell<Srgba<f64>>,
    expand_duration: Cell<Duration>,
    collapse_duration: Cell<Duration>,
}

impl Launcher {
    pub fn new(config: &Config, item_color: Srgba<f64>) -> Self {
        let launcher = Self {
            entries: RefCell::new(Vec::new()),
            icons: IconCache::default(),
            item_radius: Cell::new(config.layout.item_radius),
            item_color: Cell::new(item_color),
            expand_duration: Cell::new(config.animation.expand),
            collapse_duration: Cell::new(config.animation.collapse),
        };
        launcher.reload(config);
        launcher
    }

    /// Takes effect at the next expansion.
    pub fn reload(&self, config: &Config) {
        *self.entries.borrow_mut() = config.items.iter().map(Entry::from_config).collect();
        self.icons.clear();
        for entry in self.entries.borrow().iter() {
            if let Some(path) = &entry.icon {
                self.icons.get(path);
            }
        }
        self.item_radius.set(config.layout.item_radius);
        self.expand_duration.set(config.animation.expand);
        self.collapse_duration.set(config.animation.collapse);
    }

    pub fn set_item_color(&self, color: Srgba<f64>) {
        self.item_color.set(color);
    }

    /// Looked up by path, so a satellite keeps its own icon even when a
    /// reload reorders the entries under it.
    pub fn icon(&self, path: &Path) -> Option<Pixbuf> {
        self.icons.get(path)
    }

    pub fn entry(&self, index: usize) -> Option<Entry> {
        self.entries.borrow().get(index).cloned()
    }
}

impl ItemSource for Launcher {
    fn item_count(&self) -> usize {
        self.entries.borrow().len()
    }

    fn item_view(&self, index: usize) -> Option<SatelliteStyle> {
        self.entries
            .borrow()
            .get(index)?
            .style(self.item_radius.get(), self.item_color.get())
    }

    fn item_position(&self, index: usize) -> Option<Offset> {
        self.entries.borrow().get(index)?.placement
    }
}

impl InteractionSink for Launcher {
    fn item_clicked(&self, button: &mut ActionButton, index: usize) {
        if let Some(entry) = self.entry(index) {
            entry.activate();
        }

        if let Err(e) = button.collapse() {
            log::error!("Failed to collapse after launch: {}", e);
        }
    }

    fn did_become_active(&self, active: bool) {
        log::debug!("Speed dial {}", if active { "opened" } else { "closed" });
    }
}

impl AnimationCustomizer for Launcher {
    fn transition_duration(&self, active: bool) -> Option<Duration> {
        Some(if active {
            self.expand_duration.get()
        } else {
            self.collapse_duration.get()
        })
    }
}
