//! Provider configuration and metadata types

use serde::{Deserialize, Serialize};

/// How a provider obtains tool calls from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// The vendor API returns structured function calls
    Native,
    /// Tool calls are written into the text using the `TOOL_CALL:` marker
    Marker,
}

/// Provider configuration
///
/// Fixed once a provider has been constructed from it.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Vendor identifier (e.g., "openai", "gemini", "openrouter", "mock")
    pub vendor: String,
    /// Model name as used by the vendor API
    pub model: String,
    /// API credential; resolved from the secret store when absent
    #[serde(rename = "api_key", default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Verify the vendor's TLS certificate
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,
    /// Custom API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Override the vendor's default tool-calling mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_mode: Option<ToolMode>,
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f32 {
    0.7
}

fn default_tls_verify() -> bool {
    true
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new("gemini", "gemini-1.5-flash")
    }
}

impl ProviderConfig {
    /// Create a configuration with default sampling settings
    pub fn new(vendor: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            model: model.into(),
            credential: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            tls_verify: default_tls_verify(),
            api_base: None,
            tool_mode: None,
        }
    }

    /// Set the API credential
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Set the API base URL
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Set the tool-calling mode
    pub fn with_tool_mode(mut self, mode: ToolMode) -> Self {
        self.tool_mode = Some(mode);
        self
    }

    /// Disable TLS certificate verification
    pub fn insecure(mut self) -> Self {
        self.tls_verify = false;
        self
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("vendor", &self.vendor)
            .field("model", &self.model)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("tls_verify", &self.tls_verify)
            .field("api_base", &self.api_base)
            .field("tool_mode", &self.tool_mode)
            .finish()
    }
}

/// Provider metadata (static information about a provider)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// Provider identifier
    pub id: String,
    /// Display name
    pub display_name: String,
    /// Default API base URL
    pub default_api_base: String,
    /// Whether API key is required
    pub requires_api_key: bool,
    /// How tool calls are obtained from this provider
    pub tool_mode: ToolMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_builder() {
        let config = ProviderConfig::new("openrouter", "openai/gpt-4o-mini")
            .with_credential("sk-test")
            .with_tool_mode(ToolMode::Marker)
            .insecure();

        assert_eq!(config.vendor, "openrouter");
        assert_eq!(config.credential.as_deref(), Some("sk-test"));
        assert_eq!(config.tool_mode, Some(ToolMode::Marker));
        assert!(!config.tls_verify);
        assert_eq!(config.max_tokens, 2048);
    }

    #[test]
    fn test_debug_redacts_credential() {
        let config = ProviderConfig::new("openai", "gpt-4o").with_credential("sk-secret");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_yaml_defaults() {
        let config: ProviderConfig =
            serde_yaml::from_str("vendor: openai\nmodel: gpt-4o\napi_key: sk-1\n").unwrap();
        assert_eq!(config.credential.as_deref(), Some("sk-1"));
        assert!(config.tls_verify);
        assert_eq!(config.temperature, 0.7);
        assert!(config.tool_mode.is_none());
    }
}
