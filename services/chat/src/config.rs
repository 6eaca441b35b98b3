use chat_core::DEFAULT_INSTRUCTIONS;
use openai_realtime::ConnectOptions;
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Debug)]
pub struct Config {
    /// Endpoint and bearer credential for the Realtime API.
    pub realtime: ConnectOptions,
    pub instructions: String,
    /// Whether the `multiply` tool is declared to the model.
    pub tools_enabled: bool,
    pub log_level: Level,
    /// The env file that was loaded, if any.
    pub env_file: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from environment variables, reading `.env` in the
    /// working directory first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if cfg!(test) {
            Self::from_vars(None)
        } else {
            Self::from_env_file(Path::new(".env"))
        }
    }

    /// Like [`Config::from_env`], but reads the given env file instead of `.env`.
    ///
    /// A missing file is not an error. Variables already set in the process
    /// environment take precedence over the file.
    pub fn from_env_file(path: &Path) -> Result<Self, ConfigError> {
        let env_file = dotenvy::from_path(path).ok().map(|_| path.to_path_buf());
        Self::from_vars(env_file)
    }

    fn from_vars(env_file: Option<PathBuf>) -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .map_err(|_| ConfigError::MissingVar("OPENAI_KEY".to_string()))?;
        if api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "OPENAI_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let url = std::env::var("OPENAI_URL")
            .map_err(|_| ConfigError::MissingVar("OPENAI_URL".to_string()))?;
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(ConfigError::InvalidValue(
                "OPENAI_URL".to_string(),
                format!("'{}' is not a ws:// or wss:// URL", url),
            ));
        }

        let instructions = std::env::var("CHAT_INSTRUCTIONS")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_INSTRUCTIONS.to_string());

        let tools_enabled = match std::env::var("ENABLE_TOOLS") {
            Ok(value) => parse_flag(&value).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "ENABLE_TOOLS".to_string(),
                    format!("'{}' is not a boolean", value),
                )
            })?,
            Err(_) => true,
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            realtime: ConnectOptions {
                url,
                api_key: SecretString::from(api_key),
            },
            instructions,
            tools_enabled,
            log_level,
            env_file,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
