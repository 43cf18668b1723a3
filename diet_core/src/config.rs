//! Configuration file support for Dieta.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/dieta/config.toml`.

use crate::history::Timeframe;
use crate::planner::DEFAULT_TOLERANCE;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub planner: PlannerConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Meal planning parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Fractional calorie band around each meal target, in (0, 1]
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    #[serde(default)]
    pub timeframe: Timeframe,
}

fn home_dir_or(fallback: &str) -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(fallback))
        .unwrap_or_else(|| PathBuf::from(fallback))
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| home_dir_or(".local/share"))
        .join("dieta")
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| home_dir_or(".config"))
            .join("dieta")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let tolerance = self.planner.tolerance;
        if !(tolerance > 0.0 && tolerance <= 1.0) {
            return Err(Error::Config(format!(
                "planner.tolerance must be in (0, 1], got {}",
                tolerance
            )));
        }
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
