//! Configuration loading and validation for marketmind.
//!
//! Loads configuration from a TOML file (`marketmind.toml` in the working
//! directory by default) with environment variable overrides. Missing file
//! means defaults: the only setting with no workable default is the API key,
//! which is read from `OPENAI_API_KEY`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// The root configuration structure.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the LLM backend (env `OPENAI_API_KEY` takes precedence)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model to use for the reasoning step
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,

    /// Maximum tokens per LLM response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Directory holding one `<TICKER>.csv` per company
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Python interpreter used by the REPL tool
    #[serde(default = "default_python_bin")]
    pub python_bin: String,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_python_bin() -> String {
    "python3".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: 0.0,
            max_tokens: None,
            data_dir: default_data_dir(),
            python_bin: default_python_bin(),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("data_dir", &self.data_dir)
            .field("python_bin", &self.python_bin)
            .finish()
    }
}

impl AppConfig {
    /// Load from `marketmind.toml` in the working directory, falling back to
    /// defaults when the file does not exist, then apply env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("marketmind.toml"))
    }

    /// Load from an explicit path, falling back to defaults when missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }

        Ok(config)
    }
}
