//! Application configuration loaded from config.toml
//!
//! The file lists the lottery types to seed on start-up and, optionally, the
//! scheduler cadence. Example:
//!
//! ```toml
//! [[lottery_types]]
//! code = "SSQ"
//! name = "Double Color Ball"
//! description = "6 red balls from 33, 1 blue ball from 16"
//!
//! [scheduler]
//! sync_interval_hours = 24
//! integrity_interval_minutes = 60
//! ```

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{path::Path, time::Duration};

/// Path used when `LOTTERY_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Longest accepted sync interval: one year.
pub const MAX_SYNC_INTERVAL_HOURS: u64 = 365 * 24;

/// Longest accepted integrity check interval: one year.
pub const MAX_INTEGRITY_INTERVAL_MINUTES: u64 = 365 * 24 * 60;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Lottery types to seed
    #[serde(default)]
    pub lottery_types: Vec<LotteryTypeConfig>,
    /// Background job cadence
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// Configuration for a single lottery type
#[derive(Debug, Deserialize, Clone)]
pub struct LotteryTypeConfig {
    /// Unique short code
    pub code: String,
    /// Display name
    pub name: String,
    /// Optional rules description
    #[serde(default)]
    pub description: Option<String>,
}

/// How often the background jobs run
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Hours between crawler syncs
    pub sync_interval_hours: u64,
    /// Minutes between integrity checks
    pub integrity_interval_minutes: u64,
}

impl SchedulerConfig {
    /// Time between crawler syncs.
    #[must_use]
    pub const fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_hours.saturating_mul(60 * 60))
    }

    /// Time between integrity checks.
    #[must_use]
    pub const fn integrity_interval(&self) -> Duration {
        Duration::from_secs(self.integrity_interval_minutes.saturating_mul(60))
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sync_interval_hours: 24,
            integrity_interval_minutes: 60,
        }
    }
}

/// Loads the application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
/// - A scheduler interval is zero or longer than a year
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses and validates configuration text
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    let scheduler = &config.scheduler;
    if !(1..=MAX_SYNC_INTERVAL_HOURS).contains(&scheduler.sync_interval_hours) {
        return Err(Error::Config {
            message: format!(
                "sync_interval_hours must be between 1 and {MAX_SYNC_INTERVAL_HOURS}: {}",
                scheduler.sync_interval_hours
            ),
        });
    }
    if !(1..=MAX_INTEGRITY_INTERVAL_MINUTES).contains(&scheduler.integrity_interval_minutes) {
        return Err(Error::Config {
            message: format!(
                "integrity_interval_minutes must be between 1 and {MAX_INTEGRITY_INTERVAL_MINUTES}: {}",
                scheduler.integrity_interval_minutes
            ),
        });
    }

    Ok(config)
}

/// Loads configuration from `LOTTERY_CONFIG`, or ./config.toml when unset
pub fn load_default_config() -> Result<AppConfig> {
    let path =
        std::env::var("LOTTERY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config(path)
}
