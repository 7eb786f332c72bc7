//! Provider trait definition

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::error::{ProviderError, ProviderResult};
use crate::registry::ToolDescriptor;
use crate::session::Turn;
use crate::types::{ProviderMetadata, ToolCall};

/// Everything a provider needs for one tool-aware request
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// The user's request
    pub text: String,
    /// Tools the model may call
    pub tools: Vec<ToolDescriptor>,
    /// Prior turns, oldest first
    pub history: Vec<Turn>,
    /// Free-form context tags rendered into the system prompt
    pub context: BTreeMap<String, String>,
}

impl Query {
    /// Create a query with no tools, history or context
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set the tools offered to the model
    pub fn with_tools(mut self, tools: Vec<ToolDescriptor>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the conversation history
    pub fn with_history(mut self, history: Vec<Turn>) -> Self {
        self.history = history;
        self
    }

    /// Add a context tag
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Normalized model response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// Text reply (may be empty when the model only called tools)
    pub content: String,
    /// Tool calls in the order the model issued them
    pub tool_calls: Vec<ToolCall>,
}

impl Response {
    /// A text-only response
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Attach tool calls
    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCall>) -> Self {
        self.tool_calls = tool_calls;
        self
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Reject responses that carry neither text nor tool calls
    pub(crate) fn non_empty(self, provider: &str) -> ProviderResult<Self> {
        if self.content.trim().is_empty() && self.tool_calls.is_empty() {
            return Err(ProviderError::empty_response(provider));
        }
        Ok(self)
    }
}

/// Provider trait for model backends
///
/// Each vendor adapter (genai-backed, chat-completions, mock) implements this
/// trait. Callers never branch on the vendor behind it.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Vendor identifier (e.g., "openai", "openrouter")
    fn name(&self) -> &str;

    /// Model name sent to the vendor
    fn model(&self) -> &str;

    /// Get provider metadata
    fn metadata(&self) -> ProviderMetadata;

    /// Generate a reply with tools available to the model
    async fn generate_with_tools(&self, query: &Query) -> ProviderResult<Response>;

    /// Generate a plain text reply
    async fn generate(&self, prompt: &str) -> ProviderResult<String> {
        let response = self.generate_with_tools(&Query::new(prompt)).await?;
        if response.content.trim().is_empty() {
            return Err(ProviderError::empty_response(self.name()));
        }
        Ok(response.content)
    }
}
