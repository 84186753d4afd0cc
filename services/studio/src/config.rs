//! services/studio/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use tracing::Level;

pub const DEFAULT_EVALUATION_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub log_level: Level,
    pub storage_path: PathBuf,
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub evaluation_model: String,
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
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let storage_path = var("STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./design_review_storage.json"));

        // --- Load API Key (optional; evaluations fail at call time without it) ---
        let gemini_api_key = var("GEMINI_API_KEY")
            .or_else(|| var("API_KEY"))
            .filter(|key| !key.trim().is_empty());

        let gemini_api_base =
            var("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string());
        if !gemini_api_base.starts_with("http://") && !gemini_api_base.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "GEMINI_API_BASE".to_string(),
                format!("'{}' is not an http(s) URL", gemini_api_base),
            ));
        }

        let evaluation_model =
            var("EVALUATION_MODEL").unwrap_or_else(|| DEFAULT_EVALUATION_MODEL.to_string());

        Ok(Self {
            log_level,
            storage_path,
            gemini_api_key,
            gemini_api_base,
            evaluation_model,
        })
    }
}
