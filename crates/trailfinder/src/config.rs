//! Configuration management for trailfinder.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::elevation::Viewport;
use crate::error::{Error, Result};
use crate::filter::{FilterParams, MissingAltitude, DEFAULT_ALTITUDE_MAX_M, DEFAULT_GAIN_MAX_M};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "trailfinder";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "trails.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `TRAILFINDER_`)
/// 2. TOML config file at `~/.config/trailfinder/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Filter configuration.
    pub filter: FilterConfig,
    /// Elevation chart configuration.
    pub chart: ChartConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/trailfinder/trails.db`
    pub database_path: Option<PathBuf>,
}

/// Filter selector limits and policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Top of the elevation gain selector, in metres.
    pub gain_max_m: f64,
    /// Top of the altitude selector, in metres.
    pub altitude_max_m: f64,
    /// What to do with trails that lack highest/lowest point data.
    pub missing_altitude: MissingAltitude,
}

/// Elevation chart dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Chart width in drawing units.
    pub width: f64,
    /// Chart height in drawing units.
    pub height: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            gain_max_m: DEFAULT_GAIN_MAX_M,
            altitude_max_m: DEFAULT_ALTITUDE_MAX_M,
            missing_altitude: MissingAltitude::default(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        let Viewport { width, height } = Viewport::DETAIL;
        Self { width, height }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("TRAILFINDER_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("filter.gain_max_m", self.filter.gain_max_m),
            ("filter.altitude_max_m", self.filter.altitude_max_m),
            ("chart.width", self.chart.width),
            ("chart.height", self.chart.height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::ConfigValidation {
                    message: format!("{name} must be a positive number, got {value}"),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Filter parameters with every selector at its widest.
    #[must_use]
    pub fn widest_filter(&self) -> FilterParams {
        let mut params = FilterParams::widest(self.filter.gain_max_m, self.filter.altitude_max_m);
        params.missing_altitude = self.filter.missing_altitude;
        params
    }

    /// The configured chart viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.chart.width, self.chart.height)
    }
}
