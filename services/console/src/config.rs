//! services/console/src/config.rs
//!
//! Defines the console's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Host part of every endpoint, e.g. `https://api.example.com/v2`.
    pub api_base: String,
    /// The catalog's path segment, inserted after `/api/`.
    pub api_path: String,
    pub cookie_path: PathBuf,
    pub request_timeout: Duration,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Remote API ---
        let api_base = lookup("API_BASE")
            .ok_or_else(|| ConfigError::MissingVar("API_BASE".to_string()))?
            .trim_end_matches('/')
            .to_string();
        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "API_BASE".to_string(),
                format!("'{}' is not an http(s) URL", api_base),
            ));
        }

        let api_path = lookup("API_PATH")
            .ok_or_else(|| ConfigError::MissingVar("API_PATH".to_string()))?
            .trim_matches('/')
            .to_string();
        if api_path.is_empty() {
            return Err(ConfigError::InvalidValue(
                "API_PATH".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let timeout_str = lookup("API_TIMEOUT_SECS").unwrap_or_else(|| "30".to_string());
        let timeout_secs = timeout_str.parse::<u64>().map_err(|_| {
            ConfigError::InvalidValue(
                "API_TIMEOUT_SECS".to_string(),
                format!("'{}' is not a whole number of seconds", timeout_str),
            )
        })?;

        // --- Local State and Logging ---
        let cookie_path = lookup("COOKIE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".hex_cookie"));

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_base,
            api_path,
            cookie_path,
            request_timeout: Duration::from_secs(timeout_secs),
            log_level,
        })
    }
}
