//! Configuration management for qrattend.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "qrattend";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "attendance.db";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "QRATTEND_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `QRATTEND_`, `__` between levels)
/// 2. TOML config file at `~/.config/qrattend/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Student registry configuration.
    pub registry: RegistryConfig,
    /// QR image generation configuration.
    pub qr: QrConfig,
    /// Image scanning configuration.
    pub scan: ScanConfig,
    /// Report export configuration.
    pub report: ReportConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/qrattend/attendance.db`
    pub database_path: Option<PathBuf>,
}

/// Registry-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Regex a roll number must match to be registered.
    pub roll_number_pattern: String,
}

/// QR generation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    /// Directory that receives one `qr_<roll>.png` per student.
    pub output_dir: PathBuf,
    /// Pixel size of one QR module.
    pub module_size: u32,
    /// Surround the code with the standard quiet zone.
    pub quiet_zone: bool,
}

/// Scan-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File extensions considered during a scan (case-insensitive).
    pub extensions: Vec<String>,
    /// Log decoded roll numbers that match no student at warn level.
    /// When off they are skipped silently.
    pub report_unknown: bool,
}

/// Report-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Default CSV export destination.
    pub output_path: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            roll_number_pattern: r"^[A-Za-z0-9_.-]+$".to_string(),
        }
    }
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("QR_Codes"),
            module_size: 10,
            quiet_zone: true,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["png".to_string(), "jpg".to_string()],
            report_unknown: false,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("attendance_report.csv"),
        }
    }
}

impl Config {
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
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

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
        if self.qr.module_size == 0 {
            return Err(Error::ConfigValidation {
                message: "qr.module_size must be greater than 0".to_string(),
            });
        }

        if self.scan.extensions.iter().all(|ext| ext.trim().is_empty()) {
            return Err(Error::ConfigValidation {
                message: "scan.extensions must list at least one extension".to_string(),
            });
        }

        if regex::Regex::new(&self.registry.roll_number_pattern).is_err() {
            return Err(Error::ConfigValidation {
                message: format!(
                    "invalid regex pattern: {}",
                    self.registry.roll_number_pattern
                ),
            });
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
}
