//! Core types shared by the router, the providers and the translator.

mod message;
mod model;
mod tool;

pub use message::{ChatMessage, MessageRole};
pub use model::{ProviderConfig, ProviderMetadata, ToolMode};
pub use tool::{ContentBlock, EmbeddedContent, ImageContent, ToolCall, ToolResult};
