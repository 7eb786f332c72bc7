//! Environment variable secret store

use std::collections::HashMap;
use std::env;

use once_cell::sync::Lazy;

use super::traits::SecretStore;

/// Vendor identifiers mapped to the variables holding their keys, in lookup order
static VENDOR_VARS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    m.insert("openai", &["OPENAI_API_KEY"]);
    m.insert("anthropic", &["ANTHROPIC_API_KEY"]);
    m.insert("gemini", &["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("google", &["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("openrouter", &["OPENROUTER_API_KEY"]);
    m.insert("mistral", &["MISTRAL_API_KEY"]);
    m.insert("groq", &["GROQ_API_KEY"]);
    m.insert("xai", &["XAI_API_KEY"]);
    m.insert("deepseek", &["DEEPSEEK_API_KEY"]);
    m.insert("cohere", &["COHERE_API_KEY", "CO_API_KEY"]);
    m.insert("fireworks", &["FIREWORKS_API_KEY"]);
    m.insert("together", &["TOGETHER_API_KEY"]);
    m.insert("ollama", &[]);
    m
});

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read-only store backed by the process environment
///
/// Lookup order for a key:
/// 1. the key itself as a variable name (`OPENAI_API_KEY`)
/// 2. the variables mapped to a vendor identifier (`gemini` -> `GEMINI_API_KEY`, `GOOGLE_API_KEY`)
/// 3. `<KEY>_API_KEY`
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn new() -> Self {
        Self
    }

    /// Variables consulted for a vendor
    pub fn vars_for_vendor(vendor: &str) -> Option<&'static [&'static str]> {
        VENDOR_VARS.get(vendor.to_lowercase().as_str()).copied()
    }
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = non_empty_var(key) {
            return Some(value);
        }

        if let Some(vars) = Self::vars_for_vendor(key) {
            if let Some(value) = vars.iter().find_map(|v| non_empty_var(v)) {
                return Some(value);
            }
        }

        non_empty_var(&format!("{}_API_KEY", key.to_uppercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::SecretStoreError;

    #[test]
    fn test_env_store_read_only() {
        let store = EnvSecretStore::new();
        assert_eq!(
            store.set("openai", "sk"),
            Err(SecretStoreError::ReadOnly {
                store: "env".to_string()
            })
        );
    }

    #[test]
    fn test_env_store_direct_variable() {
        env::set_var("KUBEBRIDGE_TEST_SECRET_DIRECT", "direct");
        let store = EnvSecretStore::new();
        assert_eq!(store.get("KUBEBRIDGE_TEST_SECRET_DIRECT"), Some("direct".to_string()));
        env::remove_var("KUBEBRIDGE_TEST_SECRET_DIRECT");
    }

    #[test]
    fn test_env_store_vendor_mapping() {
        env::set_var("CO_API_KEY", "co-test");
        let store = EnvSecretStore::new();
        // COHERE_API_KEY unset, falls through to the alias
        if env::var("COHERE_API_KEY").is_err() {
            assert_eq!(store.get("Cohere"), Some("co-test".to_string()));
        }
        env::remove_var("CO_API_KEY");
    }

    #[test]
    fn test_env_store_suffix_fallback() {
        env::set_var("KBTESTVENDOR_API_KEY", "suffix");
        let store = EnvSecretStore::new();
        assert_eq!(store.get("kbtestvendor"), Some("suffix".to_string()));
        env::remove_var("KBTESTVENDOR_API_KEY");
    }

    #[test]
    fn test_env_store_blank_values_ignored() {
        env::set_var("KUBEBRIDGE_TEST_SECRET_BLANK", "  ");
        let store = EnvSecretStore::new();
        assert!(store.get("KUBEBRIDGE_TEST_SECRET_BLANK").is_none());
        assert!(store.require("KUBEBRIDGE_TEST_SECRET_BLANK").is_err());
        env::remove_var("KUBEBRIDGE_TEST_SECRET_BLANK");
    }

    #[test]
    fn test_ollama_needs_no_key() {
        assert_eq!(EnvSecretStore::vars_for_vendor("ollama"), Some(&[][..]));
    }
}
