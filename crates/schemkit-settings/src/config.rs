//! Configuration and settings management for SchemKit
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in the platform config directory.
//!
//! Configuration is organized into logical sections:
//! - Canvas settings (size, grid)
//! - Asset location
//! - Interaction tuning (click debounce, preview opacity)
//! - Storage location for presets
//! - Keyboard shortcut bindings

use schemkit_core::constants::{
    CLICK_DEBOUNCE_MS, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_GRID_CELL_SIZE,
    PREVIEW_OPACITY,
};
use schemkit_core::GridSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{SettingsError, SettingsResult};

/// Application directory name under the platform config dir.
const APP_DIR_NAME: &str = "schemkit";

/// Canvas settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Canvas width in pixels
    pub width: f64,
    /// Canvas height in pixels
    pub height: f64,
    /// Grid cell size in canvas units
    pub grid_cell_size: f64,
    /// Draw the background grid pattern
    pub grid_visible: bool,
}

impl CanvasSettings {
    /// Grid settings derived from this section.
    pub fn grid(&self) -> GridSettings {
        GridSettings::new(self.grid_cell_size, self.grid_visible)
    }
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            grid_cell_size: DEFAULT_GRID_CELL_SIZE,
            grid_visible: true,
        }
    }
}

/// Symbol asset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Directory symbol asset paths are resolved against
    pub directory: PathBuf,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("assets"),
        }
    }
}

/// Pointer interaction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Clicks within this many milliseconds of the last committed click are ignored
    pub click_debounce_ms: u64,
    /// Opacity of the placement preview (0.0 - 1.0)
    pub preview_opacity: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            click_debounce_ms: CLICK_DEBOUNCE_MS,
            preview_opacity: PREVIEW_OPACITY,
        }
    }
}

/// Key-value storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Storage directory; the platform config dir is used when unset
    pub directory: Option<PathBuf>,
    /// Directory the export shortcut writes `circuit-design.json` to
    pub export_directory: Option<PathBuf>,
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Canvas settings
    pub canvas: CanvasSettings,
    /// Asset settings
    pub assets: AssetSettings,
    /// Interaction settings
    pub interaction: InteractionSettings,
    /// Storage settings
    pub storage: StorageSettings,
    /// Shortcut overrides: action name -> key binding (e.g. "export" -> "Ctrl+E")
    pub shortcuts: BTreeMap<String, String>,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config directory for SchemKit.
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no config or home directory".to_string())
            })
    }

    /// Creates the config directory if needed and returns it.
    pub fn ensure_config_dir() -> SettingsResult<PathBuf> {
        let dir = Self::config_dir()?;
        std::fs::create_dir_all(&dir)
            .map_err(|e| SettingsError::ConfigDirectory(format!("{}: {}", dir.display(), e)))?;
        Ok(dir)
    }

    /// Default location of the config file.
    pub fn default_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Directory presets and other key-value entries are stored in.
    pub fn storage_dir(&self) -> SettingsResult<PathBuf> {
        match &self.storage.directory {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("storage")),
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)?
        } else {
            return Err(SettingsError::LoadError(
                "Config file must be .json or .toml".to_string(),
            ));
        };

        config.validate()?;
        Ok(config)
    }

    /// Load config from file, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)?
        } else {
            return Err(SettingsError::SaveError(
                "Config file must be .json or .toml".to_string(),
            ));
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.canvas.width) || !positive(self.canvas.height) {
            return Err(SettingsError::InvalidSetting {
                key: "canvas".to_string(),
                reason: "dimensions must be > 0".to_string(),
            });
        }

        if !positive(self.canvas.grid_cell_size) {
            return Err(SettingsError::InvalidSetting {
                key: "canvas.grid_cell_size".to_string(),
                reason: "must be > 0".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.interaction.preview_opacity) {
            return Err(SettingsError::InvalidSetting {
                key: "interaction.preview_opacity".to_string(),
                reason: "must be between 0 and 1".to_string(),
            });
        }

        Ok(())
    }
}
