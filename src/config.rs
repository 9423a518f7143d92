//! Engine configuration from the environment

use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming the model artifact
pub const MODEL_PATH_VAR: &str = "EMOS_MODEL_PATH";

/// Environment variable holding the log level / filter
pub const LOG_LEVEL_VAR: &str = "EMOS_LOG_LEVEL";

/// Artifact location when none is configured
pub const DEFAULT_MODEL_PATH: &str = "models/mental_health_model.json";

/// Log level when none is configured
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime settings shared by the CLI and embedding shells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub model_path: PathBuf,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl EngineConfig {
    /// Read settings from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model_path = match lookup(MODEL_PATH_VAR) {
            Some(value) => PathBuf::from(non_blank(MODEL_PATH_VAR, value)?),
            None => PathBuf::from(DEFAULT_MODEL_PATH),
        };

        let log_level = match lookup(LOG_LEVEL_VAR) {
            Some(value) => non_blank(LOG_LEVEL_VAR, value)?,
            None => DEFAULT_LOG_LEVEL.to_string(),
        };

        Ok(Self {
            model_path,
            log_level,
        })
    }

    /// Replace the model path when an override is given
    pub fn with_model_path(mut self, model_path: Option<PathBuf>) -> Self {
        if let Some(path) = model_path {
            self.model_path = path;
        }
        self
    }
}

fn non_blank(var: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Blank { var });
    }
    Ok(trimmed.to_string())
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is set but empty")]
    Blank { var: &'static str },
}
