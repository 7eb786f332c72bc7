//! Model providers
//!
//! This module hides every vendor behind the [`Provider`] trait.
//!
//! ## Architecture
//!
//! - [`GenaiProvider`]: vendors with a native adapter in the `genai` crate
//!   (OpenAI, Anthropic, Gemini, Ollama, Groq, ...), using native function calling.
//! - [`ChatCompletionsProvider`]: OpenAI-compatible HTTP endpoints (OpenRouter,
//!   Mistral, anything with an explicit `api_base`), native or marker tool calls.
//! - [`MockProvider`]: scripted responses for tests and offline use.
//!
//! Credentials come from the configuration or, failing that, from a
//! [`SecretStore`](crate::secrets::SecretStore).

mod traits;
mod error;
mod genai_adapter;
mod genai_provider;
mod chat_completions;
pub mod marker;
pub mod prompt;
mod mock;

pub use traits::{Provider, Query, Response};
pub use error::{ProviderError, ProviderResult};
pub use genai_adapter::{default_api_base, is_genai_native};
pub use genai_provider::GenaiProvider;
pub use chat_completions::ChatCompletionsProvider;
pub use mock::{MockMode, MockProvider};

use std::sync::Arc;

use crate::logging::Logger;
use crate::secrets::SecretStore;
use crate::types::ProviderConfig;

/// Vendors served over the OpenAI-compatible HTTP API
const CHAT_COMPLETIONS_VENDORS: &[&str] = &["openrouter", "mistral", "custom"];

/// Vendors that accept requests without a key
const KEYLESS_VENDORS: &[&str] = &["ollama", "mock", "custom"];

/// Create a provider for the configured vendor
///
/// A missing credential is looked up in `secrets` under the vendor name.
/// A configured `api_base` always selects the chat-completions adapter.
pub fn create_provider(
    config: &ProviderConfig,
    secrets: &dyn SecretStore,
    logger: Arc<dyn Logger>,
) -> ProviderResult<Arc<dyn Provider>> {
    let vendor = config.vendor.to_lowercase();
    if !is_supported(&vendor) {
        return Err(ProviderError::UnsupportedVendor(config.vendor.clone()));
    }

    let mut config = config.clone();
    config.vendor = vendor.clone();
    if config.credential.is_none() {
        config.credential = secrets.get(&vendor);
    }
    let keyless = KEYLESS_VENDORS.contains(&vendor.as_str()) || config.api_base.is_some();
    if config.credential.is_none() && !keyless {
        return Err(ProviderError::missing_api_key(&vendor));
    }

    logger.info(&format!(
        "Using provider {} with model {}",
        vendor, config.model
    ));

    let provider: Arc<dyn Provider> = match vendor.as_str() {
        "mock" => Arc::new(MockProvider::echo(logger).with_model(config.model.clone())),
        v if is_genai_native(v) && config.api_base.is_none() => {
            Arc::new(GenaiProvider::new(config, logger))
        }
        _ => Arc::new(ChatCompletionsProvider::new(config, logger)?),
    };
    Ok(provider)
}

/// Whether a vendor identifier has an adapter
pub fn is_supported(vendor: &str) -> bool {
    let vendor = vendor.to_lowercase();
    vendor == "mock"
        || is_genai_native(&vendor)
        || CHAT_COMPLETIONS_VENDORS.contains(&vendor.as_str())
}

/// List all supported vendor identifiers
pub fn supported_vendors() -> Vec<&'static str> {
    let mut vendors = vec![
        // Native genai vendors
        "openai",
        "anthropic",
        "gemini",
        "ollama",
        "groq",
        "xai",
        "deepseek",
        "cohere",
        "fireworks",
        "together",
    ];
    // OpenAI-compatible HTTP
    vendors.extend_from_slice(CHAT_COMPLETIONS_VENDORS);
    // Testing
    vendors.push("mock");
    vendors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::secrets::MemorySecretStore;
    use crate::types::ToolMode;

    fn logger() -> Arc<dyn Logger> {
        Arc::new(NoOpLogger)
    }

    #[test]
    fn test_supported_vendors_are_supported() {
        for vendor in supported_vendors() {
            assert!(is_supported(vendor), "{} should be supported", vendor);
        }
        assert!(!is_supported("watson"));
    }

    #[test]
    fn test_unsupported_vendor() {
        let config = ProviderConfig::new("watson", "granite");
        let result = create_provider(&config, &MemorySecretStore::new(), logger());
        assert!(matches!(result, Err(ProviderError::UnsupportedVendor(_))));
    }

    #[test]
    fn test_missing_key() {
        let config = ProviderConfig::new("openrouter", "openai/gpt-4o-mini");
        let result = create_provider(&config, &MemorySecretStore::new(), logger());
        assert!(matches!(result, Err(ProviderError::MissingApiKey { .. })));
    }

    #[test]
    fn test_key_from_secret_store() {
        let secrets = MemorySecretStore::with_secrets([("openrouter", "or-key")]);
        let config = ProviderConfig::new("OpenRouter", "openai/gpt-4o-mini");
        let provider = create_provider(&config, &secrets, logger()).unwrap();

        assert_eq!(provider.name(), "openrouter");
        assert_eq!(provider.metadata().tool_mode, ToolMode::Marker);
    }

    #[test]
    fn test_genai_vendor_selected() {
        let config = ProviderConfig::new("gemini", "gemini-1.5-flash").with_credential("g");
        let provider = create_provider(&config, &MemorySecretStore::new(), logger()).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.metadata().tool_mode, ToolMode::Native);
    }

    #[test]
    fn test_mock_needs_no_key() {
        let config = ProviderConfig::new("mock", "scripted");
        let provider = create_provider(&config, &MemorySecretStore::new(), logger()).unwrap();
        assert_eq!(provider.model(), "scripted");
    }
}
