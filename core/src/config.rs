use crate::errors::{CheckerError, CheckerResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name under `~/.config`
pub const APP_NAME: &str = "symptom-checker";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "warn";

pub const ENV_BASE_URL: &str = "SYMPTOM_CHECKER_URL";
pub const ENV_TIMEOUT_SECS: &str = "SYMPTOM_CHECKER_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "SYMPTOM_CHECKER_LOG_LEVEL";

/// Configuration for the symptom checker client
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CheckerConfig {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            request_timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

impl CheckerConfig {
    /// A config with nothing set, for layering
    pub fn empty() -> Self {
        Self {
            base_url: None,
            request_timeout_secs: None,
            log_level: None,
        }
    }

    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> CheckerResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                CheckerError::Config(format!("Failed to read config file: {}", e))
            })?;

            let config: Self = toml::from_str(&content).map_err(|e| {
                CheckerError::Config(format!("Failed to parse config file: {}", e))
            })?;

            Ok(Self::default().merge(&config))
        } else {
            Ok(Self::default())
        }
    }

    /// Loads the config file from its default location
    pub fn load_from_default() -> CheckerResult<Self> {
        Self::load_from_file(&get_default_config_file(APP_NAME)?)
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> CheckerResult<()> {
        let content = toml::to_string(self).map_err(|e| {
            CheckerError::Config(format!("Failed to serialize config: {}", e))
        })?;

        // Ensure the directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CheckerError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, content)
            .map_err(|e| CheckerError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Reads overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`; unparsable values are ignored
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            base_url: non_empty(ENV_BASE_URL),
            request_timeout_secs: non_empty(ENV_TIMEOUT_SECS)
                .and_then(|value| value.trim().parse().ok()),
            log_level: non_empty(ENV_LOG_LEVEL),
        }
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
        }
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> CheckerResult<String> {
        let url = self
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim()
            .trim_end_matches('/');

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CheckerError::Config(format!(
                "Base URL must start with http:// or https://, got '{}'",
                url
            )));
        }
        Ok(url.to_string())
    }

    /// Timeout applied to every backend call
    pub fn request_timeout(&self) -> CheckerResult<Duration> {
        match self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS) {
            0 => Err(CheckerError::Config(
                "Request timeout must be at least one second".to_string(),
            )),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> CheckerResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        CheckerError::Config("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> CheckerResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}
