//! Configuration loading for the ARKIVA TUI.
//!
//! Connection fields are required. The `[summary]` section may be omitted
//! and falls back to [`SummaryConfig::default`].

use crate::reveal::RevealTiming;
use arkiva_cache::GenerationPolicy;
use arkiva_core::{ArkivaError, DocumentId};
use arkiva_llm::BackendConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    pub error_log_path: PathBuf,
    /// Document ids offered in the picker.
    pub documents: Vec<i64>,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub bearer_token: Option<String>,
}

/// Cache and animation settings for summaries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SummaryConfig {
    pub cache_ttl_ms: u64,
    /// Omit for unbounded.
    pub max_generations: Option<u32>,
    pub placeholder_interval_ms: u64,
    pub reveal_interval_ms: u64,
    pub reveal_step: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            cache_ttl_ms: 10 * 60 * 1000,
            max_generations: None,
            placeholder_interval_ms: 150,
            reveal_interval_ms: 15,
            reveal_step: 1,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or ARKIVA_TUI_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error(transparent)]
    Policy(#[from] ArkivaError),
}

impl SummaryConfig {
    pub fn policy(&self) -> GenerationPolicy {
        GenerationPolicy {
            ttl: Duration::from_millis(self.cache_ttl_ms),
            max_generations: self.max_generations,
        }
    }

    pub fn timing(&self) -> RevealTiming {
        RevealTiming {
            placeholder_interval: Duration::from_millis(self.placeholder_interval_ms),
            reveal_interval: Duration::from_millis(self.reveal_interval_ms),
            reveal_step: self.reveal_step,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.placeholder_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "summary.placeholder_interval_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.reveal_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "summary.reveal_interval_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.reveal_step == 0 {
            return Err(ConfigError::InvalidValue {
                field: "summary.reveal_step",
                reason: "must be > 0".to_string(),
            });
        }
        self.policy().validate()?;
        self.timing().validate()?;
        Ok(())
    }
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.error_log_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "error_log_path",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(token) = &self.auth.bearer_token {
            if token.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "auth.bearer_token",
                    reason: "must not be empty when set".to_string(),
                });
            }
        }
        self.summary.validate()
    }

    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.api_base_url.clone(),
            bearer_token: self.auth.bearer_token.clone(),
            timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }

    pub fn document_ids(&self) -> Vec<DocumentId> {
        self.documents.iter().copied().map(DocumentId::new).collect()
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var("ARKIVA_TUI_CONFIG").ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
