use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub loops: LoopConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Preview mode pins the horizontal offset at the centre
    #[serde(default)]
    pub preview: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            preview: false,
        }
    }
}

/// Shared by the render loop and the gesture loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Ticks per second for both loops
    #[serde(default = "default_fps")]
    pub fps: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self { fps: default_fps() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Number of horizontal pages (must be >= 1)
    #[serde(default = "default_page_count")]
    pub page_count: u32,
    /// Vertical travel (px) beyond which a gesture is not horizontal
    #[serde(default = "default_vertical_deviation_limit")]
    pub fling_vertical_deviation_limit: f32,
    /// Minimum horizontal travel (px) for a velocity fling
    #[serde(default = "default_distance_threshold")]
    pub fling_distance_threshold: f32,
    /// Minimum horizontal velocity (px/s) for a velocity fling
    #[serde(default = "default_velocity_threshold")]
    pub fling_velocity_threshold: f32,
    /// Fraction of the screen width that counts as a page drag
    #[serde(default = "default_fraction_threshold")]
    pub fling_fraction_threshold: f32,
    /// Offset units the easing animator moves per gesture tick
    #[serde(default = "default_easing_step")]
    pub easing_step: f32,
    /// Velocity clamp (px/s)
    #[serde(default = "default_max_fling_velocity")]
    pub max_fling_velocity: f32,
    /// Samples older than this (relative to the newest) are ignored
    #[serde(default = "default_velocity_horizon_ms")]
    pub velocity_horizon_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            page_count: default_page_count(),
            fling_vertical_deviation_limit: default_vertical_deviation_limit(),
            fling_distance_threshold: default_distance_threshold(),
            fling_velocity_threshold: default_velocity_threshold(),
            fling_fraction_threshold: default_fraction_threshold(),
            easing_step: default_easing_step(),
            max_fling_velocity: default_max_fling_velocity(),
            velocity_horizon_ms: default_velocity_horizon_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Degrees the orbiting circle advances per render tick
    #[serde(default = "default_rotation_step")]
    pub rotation_step_deg: f32,
    #[serde(default = "default_background_color")]
    pub background_color: u32,
    #[serde(default = "default_ring_color")]
    pub ring_color: u32,
    #[serde(default = "default_accent_color")]
    pub accent_color: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            rotation_step_deg: default_rotation_step(),
            background_color: default_background_color(),
            ring_color: default_ring_color(),
            accent_color: default_accent_color(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("swipewall")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Above this the whole-millisecond period rounds down to zero
pub const MAX_FPS: u32 = 1000;

fn default_fps() -> u32 {
    30
}

fn default_page_count() -> u32 {
    4
}

fn default_vertical_deviation_limit() -> f32 {
    250.0
}

fn default_distance_threshold() -> f32 {
    25.0
}

fn default_velocity_threshold() -> f32 {
    500.0
}

fn default_fraction_threshold() -> f32 {
    0.4
}

fn default_easing_step() -> f32 {
    100.0
}

fn default_max_fling_velocity() -> f32 {
    8000.0
}

fn default_velocity_horizon_ms() -> u64 {
    100
}

fn default_rotation_step() -> f32 {
    1.0
}

fn default_background_color() -> u32 {
    0xff8a_a8a0
}

fn default_ring_color() -> u32 {
    0xff5e_736d
}

fn default_accent_color() -> u32 {
    0xffa2_bd3a
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl LoopConfig {
    /// Frame period, `1000 / fps` whole milliseconds
    pub fn period(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// when the file does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<Self>(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Reject values the loops and the tracker cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if self.loops.fps == 0 || self.loops.fps > MAX_FPS {
            return Err(crate::Error::Config(format!(
                "loops.fps must be between 1 and {MAX_FPS}"
            )));
        }
        if self.gesture.page_count == 0 {
            return Err(crate::Error::Config(
                "gesture.page_count must be at least 1".to_string(),
            ));
        }
        if self.gesture.easing_step <= 0.0 {
            return Err(crate::Error::Config(
                "gesture.easing_step must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/swipewall/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("swipewall")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the log file path used by the terminal host
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("swipewall.log")
    }
}
