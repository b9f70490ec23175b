//! Panel policy configuration
//!
//! All thresholds and timings that shape the panel's behavior live here,
//! so they can be tuned (and tested at their boundaries) without touching
//! the derivation code. Stored as JSON in the user's config directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Policy constants for the panel
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PanelConfig {
    // ========== Derived View ==========
    /// More visible records than this and groups start collapsed
    pub collapse_threshold: usize,

    // ========== Render Gate ==========
    /// More visible records than this and thumbnails load lazily
    pub lazy_load_threshold: usize,
    /// Catalogs at least this large only apply the released size value
    pub deferred_size_threshold: usize,
    /// Quiet period after the last scroll event before scrolling counts as ended
    pub scroll_debounce_ms: u64,

    // ========== Provider ==========
    /// How long a catalog request may take before it is reported as failed
    pub provider_timeout_ms: u64,
    /// Lowercase extensions the local provider catalogs
    pub image_extensions: Vec<String>,

    // ========== Presentation ==========
    pub default_image_size: u16,
    pub min_image_size: u16,
    pub max_image_size: u16,
    pub image_size_step: u16,
    /// Thumbnail background swatches, `#rrggbb`
    pub background_colors: Vec<String>,
    /// Index into `background_colors`
    pub default_background: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            collapse_threshold: 1200,
            lazy_load_threshold: 150,
            deferred_size_threshold: 200,
            scroll_debounce_ms: 300,
            provider_timeout_ms: 15_000,
            image_extensions: [
                "png", "jpg", "jpeg", "gif", "svg", "webp", "bmp", "ico", "tif", "tiff", "avif",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            default_image_size: 100,
            min_image_size: 10,
            max_image_size: 600,
            image_size_step: 5,
            background_colors: [
                "#ffffff", "#cccccc", "#999999", "#333333", "#a89a89", "#a9e4af", "#f1a8a4",
                "#64bbe2", "#8488b6",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            default_background: 1,
        }
    }
}

impl PanelConfig {
    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Convert to a pretty JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read a config file. A missing file is not an error: defaults apply.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(json) => Ok(Self::from_json(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load from `path` (or the default location), falling back to defaults
    /// with a warning when the file cannot be used.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
            return Self::default();
        };

        match Self::read(&path) {
            Ok(config) => {
                log::debug!("Config loaded from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("⚠️  Ignoring config {}: {e}", path.display());
                Self::default()
            }
        }
    }
}

/// `<config_dir>/preview-images/config.json`
///
/// - Linux: ~/.config/preview-images/config.json
/// - macOS: ~/Library/Application Support/preview-images/config.json
/// - Windows: %APPDATA%\preview-images\config.json
pub fn default_config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("preview-images");
    path.push("config.json");
    Some(path)
}
