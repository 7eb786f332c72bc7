//! kubebridge core
//!
//! Bridges a language model to a Kubernetes cluster through a small message
//! protocol. A client asks for the tool catalogue, calls tools by name, and
//! gets results back; free-text requests go through a model provider whose
//! tool calls are translated into concrete `kubectl` commands.
//!
//! ## Flow
//!
//! ```text
//! Envelope -> Router ──callTool──> Translator -> Backend
//!                │                     ▲
//!                └─query──> Assistant ─┘ (Provider + Session)
//! ```
//!
//! ```rust,ignore
//! use kubebridge_core::{kubernetes_registry, DryRunBackend, ResourceCatalog, Router};
//!
//! let registry = Arc::new(kubernetes_registry()?);
//! let router = Router::new(registry, ResourceCatalog::kubernetes(), Arc::new(DryRunBackend), logger);
//! let response = router.dispatch("default", request).await;
//! ```

pub mod assistant;
pub mod backend;
pub mod config;
pub mod logging;
pub mod protocol;
pub mod providers;
pub mod registry;
pub mod resources;
pub mod router;
pub mod secrets;
pub mod session;
pub mod translator;
pub mod types;

// Re-export commonly used types
pub use types::{
    ChatMessage, ContentBlock, MessageRole, ProviderConfig, ProviderMetadata, ToolCall,
    ToolMode, ToolResult,
};

pub use registry::{
    kubernetes_registry, ParameterSpec, RegistryError, ToolDescriptor, ToolRegistry, QUERY_TOOL,
};

pub use translator::{CanonicalCommand, TranslateError, Translator};

pub use session::{Session, Turn, TurnRole};

pub use providers::{create_provider, Provider, ProviderError, ProviderResult, Query, Response};

pub use assistant::Assistant;

pub use backend::{Backend, BackendError, DryRunBackend, KubectlBackend};

pub use resources::{ResourceCatalog, ResourceUri};

pub use protocol::{Envelope, ErrorKind, ErrorPayload, MessageType, ProtocolError};

pub use router::{Router, DEFAULT_CONNECTION};

pub use secrets::{EnvSecretStore, MemorySecretStore, SecretStore};

pub use logging::{ConsoleLogger, Logger, NoOpLogger, TracingLogger};

pub use config::{AppConfig, ConfigError, ConfigFile};
