//! Credential lookup
//!
//! Provider construction asks a [`SecretStore`] for the vendor's key when the
//! configuration does not carry one.

mod traits;
mod env_store;
mod memory_store;

pub use traits::{SecretStore, SecretStoreError, SecretStoreResult};
pub use env_store::EnvSecretStore;
pub use memory_store::MemorySecretStore;
