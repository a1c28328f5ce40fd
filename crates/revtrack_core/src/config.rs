//! Tracker configuration and per-user display settings.
//!
//! # Responsibility
//! - Describe where data comes from and how reminders/logging behave.
//! - Load that description from a JSON file with every field defaulted.
//!
//! # Invariants
//! - `reminder_window_days` is at least 1.
//! - A missing config file is an error; a missing field never is.

use crate::logging::default_log_level;
use crate::views::DEFAULT_REMINDER_WINDOW_DAYS;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DATA_PATH: &str = "data.json";

/// Config loading errors.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Table density preferred on list pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Compact,
    Comfortable,
}

/// Settings page values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub email_notifications: bool,
    pub default_view: ViewMode,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            default_view: ViewMode::Compact,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// JSON payload with `users` and `documents`.
    pub data_path: PathBuf,
    pub reminder_window_days: u32,
    pub log_level: String,
    /// Absolute directory for rolling logs; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub settings: UserSettings,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            reminder_window_days: DEFAULT_REMINDER_WINDOW_DAYS,
            log_level: default_log_level().to_string(),
            log_dir: None,
            settings: UserSettings::default(),
        }
    }
}

impl TrackerConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reminder_window_days == 0 {
            return Err(ConfigError::Invalid(
                "reminder_window_days must be at least 1".to_string(),
            ));
        }
        if self.data_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_path cannot be empty".to_string()));
        }
        Ok(())
    }
}
