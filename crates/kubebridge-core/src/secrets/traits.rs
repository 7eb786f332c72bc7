//! Credential store trait

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretStoreError {
    #[error("The {store} secret store cannot be written")]
    ReadOnly { store: String },

    #[error("No credential found for '{0}'")]
    Missing(String),
}

pub type SecretStoreResult<T> = Result<T, SecretStoreError>;

/// Source of vendor credentials
///
/// Keys are vendor identifiers ("openai", "openrouter") or literal variable
/// names ("OPENAI_API_KEY"); each store decides how to map them. Blank
/// values count as absent.
pub trait SecretStore: Send + Sync {
    /// Short identifier used in error messages
    fn name(&self) -> &str;

    fn get(&self, key: &str) -> Option<String>;

    /// Save a credential; stores are read-only unless they override this
    fn set(&self, _key: &str, _value: &str) -> SecretStoreResult<()> {
        Err(SecretStoreError::ReadOnly {
            store: self.name().to_string(),
        })
    }

    fn require(&self, key: &str) -> SecretStoreResult<String> {
        self.get(key)
            .ok_or_else(|| SecretStoreError::Missing(key.to_string()))
    }
}
