use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config_defaults::{
    clamp_cooldown_seconds, clamp_log_capacity, clamp_response_bytes, default_action_delay_ms,
    default_api_key_env, default_cooldown_seconds, default_endpoint, default_log_capacity,
    default_max_response_bytes, default_model, default_settle_delay_ms,
};

/// Settings loaded from `config.toml`.
///
/// Config keys (TOML): `log_capacity`, `[classifier]`, `[timing]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommanderConfig {
    /// Number of command log entries kept on screen.
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
    #[serde(default)]
    pub classifier: ClassifierSettings,
    #[serde(default)]
    pub timing: TimingSettings,
}

impl CommanderConfig {
    pub(super) fn normalized(mut self) -> Self {
        self.log_capacity = clamp_log_capacity(self.log_capacity);
        self.classifier.max_response_bytes =
            clamp_response_bytes(self.classifier.max_response_bytes);
        self.timing.cooldown_seconds = clamp_cooldown_seconds(self.timing.cooldown_seconds);
        self.timing.quota_cooldown_seconds =
            clamp_cooldown_seconds(self.timing.quota_cooldown_seconds);
        self.classifier.endpoint = self.classifier.endpoint.trim_end_matches('/').to_string();
        self
    }
}

impl Default for CommanderConfig {
    fn default() -> Self {
        Self {
            log_capacity: default_log_capacity(),
            classifier: ClassifierSettings::default(),
            timing: TimingSettings::default(),
        }
    }
}

/// Where and how the inference service is called.
///
/// Config keys: `endpoint`, `model`, `api_key_env`, `max_response_bytes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// Base URL of the generative language API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable consulted first for the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

/// Delays and cooldown windows of the recognition cycle.
///
/// Config keys: `action_delay_ms`, `settle_delay_ms`, `cooldown_seconds`,
/// `quota_cooldown_seconds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingSettings {
    /// Time spent "performing" a state-changing action.
    #[serde(default = "default_action_delay_ms")]
    pub action_delay_ms: u64,
    /// Pause after an action before the detected gesture is cleared.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Lockout after every recognition attempt.
    #[serde(default = "default_cooldown_seconds")]
    pub cooldown_seconds: u32,
    /// Lockout after the service reports quota exhaustion.
    #[serde(default = "default_cooldown_seconds")]
    pub quota_cooldown_seconds: u32,
}

impl TimingSettings {
    pub fn action_delay(&self) -> Duration {
        Duration::from_millis(self.action_delay_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            action_delay_ms: default_action_delay_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            cooldown_seconds: default_cooldown_seconds(),
            quota_cooldown_seconds: default_cooldown_seconds(),
        }
    }
}

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No suitable config directory available")]
    NoConfigDir,
    #[error("Could not create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config for {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
}
