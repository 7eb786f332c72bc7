//! Application settings

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use crate::providers;
use crate::session::DEFAULT_MAX_PAIRS;
use crate::types::ProviderConfig;

/// Environment variables that override file settings
pub const ENV_PROVIDER: &str = "LLM_PROVIDER";
pub const ENV_MODEL: &str = "LLM_MODEL";
pub const ENV_API_KEY: &str = "LLM_API_KEY";
pub const ENV_LISTEN: &str = "KUBEBRIDGE_LISTEN";

/// Complete configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub assistant: AssistantSettings,
}

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Socket address to bind
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Render commands instead of running them
    #[serde(default)]
    pub dry_run: bool,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            dry_run: false,
        }
    }
}

/// Conversation window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// User/assistant pairs kept as context
    #[serde(default = "default_max_pairs")]
    pub max_pairs: usize,
}

fn default_max_pairs() -> usize {
    DEFAULT_MAX_PAIRS
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_pairs: default_max_pairs(),
        }
    }
}

/// Query processing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSettings {
    /// Upper bound on one provider call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Tags rendered into every system prompt (e.g., cluster: staging)
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            context: BTreeMap::new(),
        }
    }
}

impl AssistantSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a lookup function; blank values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(vendor) = get(ENV_PROVIDER) {
            self.provider.vendor = vendor.trim().to_lowercase();
        }
        if let Some(model) = get(ENV_MODEL) {
            self.provider.model = model.trim().to_string();
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.provider.credential = Some(key);
        }
        if let Some(listen) = get(ENV_LISTEN) {
            self.server.listen = listen.trim().to_string();
        }
    }

    /// Check every setting, reporting the first invalid one
    pub fn validate(&self) -> ConfigResult<()> {
        let provider = &self.provider;
        if !providers::is_supported(&provider.vendor) {
            return Err(ConfigError::invalid(
                "provider.vendor",
                format!(
                    "unsupported vendor '{}' (supported: {})",
                    provider.vendor,
                    providers::supported_vendors().join(", ")
                ),
            ));
        }
        if provider.model.trim().is_empty() {
            return Err(ConfigError::invalid("provider.model", "must not be empty"));
        }
        if !(0.0..=2.0).contains(&provider.temperature) {
            return Err(ConfigError::invalid(
                "provider.temperature",
                format!("{} is outside 0.0..=2.0", provider.temperature),
            ));
        }
        if provider.max_tokens == 0 {
            return Err(ConfigError::invalid("provider.max_tokens", "must be positive"));
        }
        if self.session.max_pairs == 0 {
            return Err(ConfigError::invalid("session.max_pairs", "must be positive"));
        }
        if self.assistant.timeout_secs == 0 {
            return Err(ConfigError::invalid("assistant.timeout_secs", "must be positive"));
        }
        self.listen_addr()?;
        Ok(())
    }

    /// Parsed listen address
    pub fn listen_addr(&self) -> ConfigResult<SocketAddr> {
        self.server
            .listen
            .parse()
            .map_err(|e| ConfigError::invalid("server.listen", format!("{}", e)))
    }
}
