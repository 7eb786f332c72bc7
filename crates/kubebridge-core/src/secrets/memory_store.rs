//! Credentials held in process memory

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::{SecretStore, SecretStoreResult};

/// Writable store for tests and for embedding callers that resolve keys
/// themselves
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store, keyed by vendor identifier
    pub fn with_secrets<K, V>(initial: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        store.secrets.write().extend(
            initial
                .into_iter()
                .map(|(k, v)| (k.into().to_lowercase(), v.into())),
        );
        store
    }

    /// Forget a credential, returning it when present
    pub fn remove(&self, key: &str) -> Option<String> {
        self.secrets.write().remove(&key.to_lowercase())
    }
}

impl SecretStore for MemorySecretStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.secrets
            .read()
            .get(&key.to_lowercase())
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> SecretStoreResult<()> {
        self.secrets
            .write()
            .insert(key.to_lowercase(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::SecretStoreError;

    #[test]
    fn test_keys_are_case_insensitive() {
        let store = MemorySecretStore::with_secrets([("OpenRouter", "or-key")]);
        assert_eq!(store.get("openrouter"), Some("or-key".to_string()));

        store.set("GEMINI", "g-key").unwrap();
        assert_eq!(store.require("gemini").unwrap(), "g-key");
    }

    #[test]
    fn test_remove_and_blank_values() {
        let store = MemorySecretStore::new();
        store.set("openai", "   ").unwrap();
        assert_eq!(
            store.require("openai"),
            Err(SecretStoreError::Missing("openai".to_string()))
        );

        store.set("openai", "sk-1").unwrap();
        assert_eq!(store.remove("openai"), Some("sk-1".to_string()));
        assert!(store.get("openai").is_none());
    }
}
