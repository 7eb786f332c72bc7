//! Configuration
//!
//! A YAML file with `provider`, `server`, `session` and `assistant`
//! sections, overridable from the environment:
//!
//! ```yaml
//! provider:
//!   vendor: openrouter
//!   model: openai/gpt-4o-mini
//! server:
//!   listen: 0.0.0.0:8080
//! session:
//!   max_pairs: 10
//! assistant:
//!   timeout_secs: 30
//! ```

mod error;
mod file;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use file::ConfigFile;
pub use settings::{
    AppConfig, AssistantSettings, ServerSettings, SessionSettings, ENV_API_KEY, ENV_LISTEN,
    ENV_MODEL, ENV_PROVIDER,
};
