use crate::events::AppEvent;
use async_channel::Sender;
use derive_more::{AsRef, Deref, Display, From, Into};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::{Srgb, Srgba};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, DurationSecondsWithFrac, SerializeDisplay, serde_as};
use speedial_core::animation::Easing;
use speedial_core::geometry::{Point, Rect};
use speedial_core::layout::{ArcLayout, Radius};
use speedial_core::{Settings, TogglePolicy};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

/// Magic `exec` value of the item shown before any config exists.
pub const SETUP_EXEC: &str = "SPEEDIAL_SETUP";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    #[strum(serialize = "top-left", serialize = "topleft", serialize = "tl")]
    TopLeft,
    #[strum(serialize = "top-right", serialize = "topright", serialize = "tr")]
    TopRight,
    #[strum(serialize = "bottom-left", serialize = "bottomleft", serialize = "bl")]
    BottomLeft,
    #[default]
    #[strum(serialize = "bottom-right", serialize = "bottomright", serialize = "br")]
    BottomRight,
}

impl Corner {
    /// Where the main center sits inside `bounds`, `inset` away from both edges.
    pub fn anchor(&self, bounds: Rect, inset: f64) -> Point {
        let left = bounds.x + inset;
        let right = bounds.x + bounds.width - inset;
        let top = bounds.y + inset;
        let bottom = bounds.y + bounds.height - inset;

        match self {
            Corner::TopLeft => Point::new(left, top),
            Corner::TopRight => Point::new(right, top),
            Corner::BottomLeft => Point::new(left, bottom),
            Corner::BottomRight => Point::new(right, bottom),
        }
    }
}

/// `#rrggbb` color as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr, SerializeDisplay)]
pub struct HexColor(Srgb<u8>);

impl HexColor {
    pub fn with_alpha(self, alpha: f64) -> Srgba<f64> {
        let c: Srgb<f64> = self.0.into_format();
        Srgba::new(c.red, c.green, c.blue, alpha)
    }
}

impl FromStr for HexColor {
    type Err = palette::rgb::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.red, self.0.green, self.0.blue)
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ExecCommand(String);

crate::impl_string_newtype!(ExecCommand);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ItemLabel(String);

crate::impl_string_newtype!(ItemLabel);

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ButtonConfig {
    pub anchor: Corner,
    pub margin: f64,
    pub radius: f64,
    /// Falls back to the GTK theme's accent color.
    pub color: Option<HexColor>,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            anchor: Corner::default(),
            margin: 32.0,
            radius: speedial_core::element::DEFAULT_MAIN_RADIUS,
            color: None,
        }
    }
}

/// Arc span in degrees; converted to radians for the core layout.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub radius: Radius,
    pub start: f64,
    pub end: f64,
    pub item_radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            radius: Radius::default(),
            start: 0.0,
            end: 360.0,
            item_radius: speedial_core::element::DEFAULT_ITEM_RADIUS,
        }
    }
}

impl LayoutConfig {
    pub fn arc(&self) -> ArcLayout {
        ArcLayout::new(self.radius, self.start.to_radians(), self.end.to_radians())
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnimationConfig {
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub expand: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub collapse: Duration,
    /// Degrees the main button turns per transition.
    pub rotation: f64,
    pub easing: Easing,
    pub policy: TogglePolicy,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            expand: speedial_core::controller::DEFAULT_DURATION,
            collapse: speedial_core::controller::DEFAULT_DURATION,
            rotation: speedial_core::controller::DEFAULT_ROTATION.to_degrees(),
            easing: Easing::default(),
            policy: TogglePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackdropConfig {
    pub color: HexColor,
    pub alpha: f64,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            color: HexColor(Srgb::new(0, 0, 0)),
            alpha: speedial_core::element::BACKDROP_ALPHA,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ItemConfig {
    pub label: Option<ItemLabel>,
    pub color: Option<HexColor>,
    pub icon: Option<PathBuf>,
    pub exec: Option<ExecCommand>,
    /// Fixed direction in degrees, bypassing the arc layout.
    pub angle: Option<f64>,
    /// Distance from the main center when `angle` is set.
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub button: ButtonConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub backdrop: BackdropConfig,
    #[serde(default)]
    pub items: Vec<ItemConfig>,
}

impl Config {
    pub fn settings(&self) -> Settings {
        Settings {
            layout: self.layout.arc(),
            duration: self.animation.expand,
            easing: self.animation.easing,
            rotation: self.animation.rotation.to_radians(),
            item_radius: self.layout.item_radius,
            toggle_policy: self.animation.policy,
        }
    }

    fn setup() -> Self {
        Config {
            items: vec![ItemConfig {
                label: Some(ItemLabel::new("Setup")),
                exec: Some(ExecCommand::new(SETUP_EXEC)),
                ..Default::default()
            }],
            ..Default::default()
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "speedial", "speedial")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("SPEEDIAL").separator("__"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_setup() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        return Config::setup();
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using setup menu: {}", e);
            Config::setup()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
