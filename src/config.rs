//! Runtime settings.
//!
//! Precedence, highest first: CLI flags, `KM_*` environment variables, the
//! TOML file passed with `--config`, built-in defaults.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::kpi::ZeroPolicy;

pub const ENV_REPORTING_YEAR: &str = "KM_REPORTING_YEAR";
pub const ENV_CUSTODIAN_SECRET: &str = "KM_CUSTODIAN_SECRET";
pub const ENV_LOG_LEVEL: &str = "KM_LOG_LEVEL";
pub const ENV_DATASET: &str = "KM_DATASET";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Year used by the `Retiring<Year>` quick filter and summary count.
    pub reporting_year: i32,
    /// Shared secret for custodian mode; empty disables it.
    pub custodian_secret: String,
    /// CSV file replacing the built-in dataset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,
    pub zero_policy: ZeroPolicy,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// trace, debug, info, warn or error.
    pub level: String,
    pub json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reporting_year: Local::now().year(),
            custodian_secret: String::new(),
            dataset: None,
            zero_policy: ZeroPolicy::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Reads the optional TOML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env(|name| std::env::var(name).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let settings: Settings = toml::from_str(&content)?;
        debug!(path = %path.display(), "loaded settings file");
        Ok(settings)
    }

    /// `lookup` resolves an environment variable name.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(year) = lookup(ENV_REPORTING_YEAR) {
            self.reporting_year = year.trim().parse().map_err(|_| {
                Error::Config(format!("{ENV_REPORTING_YEAR} must be a year, got {year:?}"))
            })?;
        }
        if let Some(secret) = lookup(ENV_CUSTODIAN_SECRET) {
            self.custodian_secret = secret;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(dataset) = lookup(ENV_DATASET) {
            self.dataset = Some(PathBuf::from(dataset));
        }
        Ok(())
    }
}
