//! Configuration settings for breathe.
//!
//! Settings are loaded from `~/.breathe/config.yaml`. Every field has a
//! default, so a partial file (or no file at all) is fine.

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::BreatheError;
use crate::features::breathing::{Preset, PresetCatalog};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Breathing session settings.
    pub breathing: BreathingConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Identity sessions are recorded under. Defaults to `$USER`.
    #[serde(default)]
    pub user: Option<String>,
}

/// Breathing session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreathingConfig {
    /// Preset used when `breathe start` is given none.
    #[serde(default = "default_preset")]
    pub default_preset: String,
    /// Stop sessions automatically after this many seconds.
    #[serde(default)]
    pub session_limit_seconds: Option<u64>,
    /// Length of `breathe quick`.
    #[serde(default = "default_quick_session_seconds")]
    pub quick_session_seconds: u64,
    /// Milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Additional presets.
    #[serde(default)]
    pub custom_presets: Vec<Preset>,
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

fn default_preset() -> String {
    "box-breathing".to_string()
}

const fn default_quick_session_seconds() -> u64 {
    60
}

/// Slowest accepted tick: one countdown second per minute.
pub const MAX_TICK_INTERVAL_MS: u64 = 60_000;

const fn default_tick_interval_ms() -> u64 {
    1000
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            user: None,
        }
    }
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            default_preset: default_preset(),
            session_limit_seconds: None,
            quick_session_seconds: default_quick_session_seconds(),
            tick_interval_ms: default_tick_interval_ms(),
            custom_presets: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// holds invalid values.
    pub fn load() -> Result<Self, BreatheError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// holds invalid values.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, BreatheError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            BreatheError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            BreatheError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })?;

        config.validate().map_err(|e| {
            BreatheError::Config(format!("Invalid config file {}: {e}", path.display()))
        })?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), BreatheError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| BreatheError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            BreatheError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Check values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::Validation` describing the first bad value.
    pub fn validate(&self) -> Result<(), BreatheError> {
        if self.breathing.tick_interval_ms == 0 {
            return Err(BreatheError::Validation(
                "breathing.tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.breathing.tick_interval_ms > MAX_TICK_INTERVAL_MS {
            return Err(BreatheError::Validation(format!(
                "breathing.tick_interval_ms must be at most {MAX_TICK_INTERVAL_MS}"
            )));
        }
        if self.breathing.quick_session_seconds == 0 {
            return Err(BreatheError::Validation(
                "breathing.quick_session_seconds must be greater than zero".to_string(),
            ));
        }
        for preset in &self.breathing.custom_presets {
            preset.validate()?;
        }
        Ok(())
    }

    /// Built-in presets plus the custom ones from this config.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::Validation` if a custom preset is malformed.
    pub fn catalog(&self) -> Result<PresetCatalog, BreatheError> {
        PresetCatalog::with_custom(&self.breathing.custom_presets)
    }

    /// Who recorded sessions belong to.
    #[must_use]
    pub fn user_id(&self) -> String {
        self.general
            .user
            .clone()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| std::env::var("USER").ok().filter(|u| !u.is_empty()))
            .unwrap_or_else(|| "local".to_string())
    }

    /// Tick interval as a `Duration`.
    #[must_use]
    pub const fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.breathing.tick_interval_ms)
    }
}
