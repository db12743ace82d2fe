//! Configuration management for Gleaner.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/gleaner/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General application settings
    pub general: GeneralConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Scraping behavior settings
    pub scraping: ScrapingConfig,
}

impl AppConfig {
    /// Load configuration from the default path, falling back to defaults if
    /// the file is not found.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if
    /// the file is not found.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `GLEANER_HEADLESS`: Override browser headless mode (true/false)
    /// - `GLEANER_DB_PATH`: Override the SQLite database path
    /// - `GLEANER_DATA_DIR`: Override the URL-list data directory
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides to an already-loaded config.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("GLEANER_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Ok(val) = std::env::var("GLEANER_DB_PATH") {
            self.general.db_path = PathBuf::from(val);
            tracing::debug!("Override general.db_path from env");
        }

        if let Ok(val) = std::env::var("GLEANER_DATA_DIR") {
            self.general.data_dir = PathBuf::from(val);
            tracing::debug!("Override general.data_dir from env");
        }
    }

    /// Save configuration to disk, creating the config directory if needed.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/gleaner/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("dev", "gleaner", "gleaner").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Validate cross-field constraints.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scraping.pace_min_secs > self.scraping.pace_max_secs {
            return Err(ConfigError::InvalidValue {
                field: "scraping.pace_min_secs".to_string(),
                reason: "must not exceed pace_max_secs".to_string(),
            });
        }
        if self.scraping.settle_min_ms > self.scraping.settle_max_ms {
            return Err(ConfigError::InvalidValue {
                field: "scraping.settle_min_ms".to_string(),
                reason: "must not exceed settle_max_ms".to_string(),
            });
        }
        if self.scraping.channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scraping.channel_capacity".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory holding the per-site URL list files
    pub data_dir: PathBuf,
    /// Path to the SQLite database the offers land in
    pub db_path: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            db_path: PathBuf::from("data/jobs.db"),
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run the browser headless. Challenge pages need an operator, so this is
    /// typically disabled for attended runs.
    pub headless: bool,
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,
    /// Fixed user agent; a randomized one is picked when absent
    pub user_agent: Option<String>,
    /// Explicit browser executable path
    pub executable: Option<PathBuf>,
    /// Persistent browser profile directory, kept across runs so solved
    /// challenges stay solved
    pub user_data_dir: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 900,
            user_agent: None,
            executable: None,
            user_data_dir: None,
        }
    }
}

/// Scraping behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapingConfig {
    /// Minimum pause between two page visits of one scraper, in seconds
    pub pace_min_secs: u64,
    /// Maximum pause between two page visits of one scraper, in seconds
    pub pace_max_secs: u64,
    /// Delay between consecutive scraper starts in concurrent mode, in seconds
    pub stagger_secs: u64,
    /// Minimum post-load settle delay before capturing markup, in milliseconds
    pub settle_min_ms: u64,
    /// Maximum post-load settle delay before capturing markup, in milliseconds
    pub settle_max_ms: u64,
    /// Capacity of the fan-in channel between scrapers and the consumer
    pub channel_capacity: usize,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            pace_min_secs: 5,
            pace_max_secs: 10,
            stagger_secs: 5,
            settle_min_ms: 300,
            settle_max_ms: 1100,
            channel_capacity: 64,
        }
    }
}
