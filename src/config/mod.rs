//! Configuration loading and validation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::models::{GameId, VariableId};
use crate::rotation::RotationParams;
use crate::upstream::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_SERIES_ID};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Upstream service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Curated series whose games are offered
    #[serde(default = "default_series_id")]
    pub series_id: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Retry attempts for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First retry delay in milliseconds; doubles per attempt
    #[serde(default = "default_backoff_initial_ms")]
    pub backoff_initial_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_series_id() -> String {
    DEFAULT_SERIES_ID.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_initial_ms() -> u64 {
    500
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            series_id: default_series_id(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            backoff_initial_ms: default_backoff_initial_ms(),
        }
    }
}

/// Server configuration for the proxy layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Selection persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Whether the "remember my selection" feature is offered at all
    #[serde(default = "default_persistence_enabled")]
    pub enabled: bool,

    /// Directory holding the persisted selection
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

fn default_persistence_enabled() -> bool {
    true
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("./data/state")
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: default_persistence_enabled(),
            state_dir: default_state_dir(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub rotation: RotationParams,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Per-game override of which sub-category variable becomes active,
    /// keyed by game id. Without an entry the first sub-category variable
    /// in upstream order wins.
    #[serde(default)]
    pub variable_overrides: HashMap<String, String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Upstream timeout must be greater than 0".to_string(),
            ));
        }

        if Url::parse(&self.upstream.base_url).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "Invalid upstream base URL: {}",
                self.upstream.base_url
            )));
        }

        if self.rotation.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "Rotation page size must be greater than 0".to_string(),
            ));
        }

        if self.rotation.interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Rotation interval must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Build the upstream client configuration.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let base_url = Url::parse(&self.upstream.base_url).map_err(|e| {
            ConfigError::ValidationError(format!(
                "Invalid upstream base URL {}: {}",
                self.upstream.base_url, e
            ))
        })?;
        Ok(ClientConfig {
            base_url,
            series_id: self.upstream.series_id.clone(),
            timeout: Duration::from_secs(self.upstream.timeout_seconds),
            max_retries: self.upstream.max_retries,
            backoff_initial: Duration::from_millis(self.upstream.backoff_initial_ms),
            ..ClientConfig::default()
        })
    }

    /// Variable override table with typed ids.
    pub fn variable_overrides(&self) -> HashMap<GameId, VariableId> {
        self.variable_overrides
            .iter()
            .map(|(game, variable)| {
                (GameId::from(game.as_str()), VariableId::from(variable.as_str()))
            })
            .collect()
    }
}
