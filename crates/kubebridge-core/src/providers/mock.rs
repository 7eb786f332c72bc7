//! Mock provider for testing
//!
//! Provides deterministic, configurable responses without network
//! dependencies. Every query it receives is recorded so tests can inspect
//! the tools and history a caller sent.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{ProviderError, ProviderResult};
use super::marker;
use super::traits::{Provider, Query, Response};
use crate::logging::Logger;
use crate::types::{ProviderMetadata, ToolCall, ToolMode};

/// Mock response mode
#[derive(Debug, Clone, Default)]
pub enum MockMode {
    /// Echo back the query text
    #[default]
    Echo,
    /// Return a fixed text response
    Fixed(String),
    /// Return the given text and tool calls
    ToolCalls {
        content: String,
        calls: Vec<ToolCall>,
    },
    /// Parse tool calls out of the text with the marker convention
    Marker(String),
    /// Return the responses in order, repeating the last one
    Script(Vec<Response>),
    /// Fail as if the vendor answered with this status
    Status { status: u16, body: String },
    /// Fail as if the vendor could not be reached
    Unavailable(String),
    /// Return zero candidates
    Empty,
    /// Sleep before echoing (for timeout tests)
    Delay(Duration),
}

/// Mock provider for tests and offline runs
pub struct MockProvider {
    mode: MockMode,
    model: String,
    calls: AtomicUsize,
    queries: Mutex<Vec<Query>>,
    logger: Arc<dyn Logger>,
}

impl MockProvider {
    /// Create with a specific mode
    pub fn new(mode: MockMode, logger: Arc<dyn Logger>) -> Self {
        Self {
            mode,
            model: "mock-model".to_string(),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
            logger,
        }
    }

    /// Create an echo provider
    pub fn echo(logger: Arc<dyn Logger>) -> Self {
        Self::new(MockMode::Echo, logger)
    }

    /// Create a fixed response provider
    pub fn fixed(response: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::new(MockMode::Fixed(response.into()), logger)
    }

    /// Create a provider that always returns these tool calls
    pub fn tool_calls(
        content: impl Into<String>,
        calls: Vec<ToolCall>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self::new(
            MockMode::ToolCalls {
                content: content.into(),
                calls,
            },
            logger,
        )
    }

    /// Set the reported model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Number of requests served so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Queries received, oldest first
    pub fn queries(&self) -> Vec<Query> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            id: "mock".to_string(),
            display_name: "Mock Provider".to_string(),
            default_api_base: "http://localhost:0/mock".to_string(),
            requires_api_key: false,
            tool_mode: match self.mode {
                MockMode::Marker(_) => ToolMode::Marker,
                _ => ToolMode::Native,
            },
        }
    }

    async fn generate_with_tools(&self, query: &Query) -> ProviderResult<Response> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().push(query.clone());
        self.logger.debug(&format!(
            "[MockProvider] request #{} with {} tools",
            index + 1,
            query.tools.len()
        ));

        let response = match &self.mode {
            MockMode::Echo => Response::text(query.text.clone()),
            MockMode::Fixed(text) => Response::text(text.clone()),
            MockMode::ToolCalls { content, calls } => {
                Response::text(content.clone()).with_tool_calls(calls.clone())
            }
            MockMode::Marker(text) => Response::text(marker::strip_markers(text))
                .with_tool_calls(marker::extract_tool_calls(text)),
            MockMode::Script(responses) => match responses.get(index).or(responses.last()) {
                Some(response) => response.clone(),
                None => return Err(ProviderError::empty_response("mock")),
            },
            MockMode::Status { status, body } => {
                return Err(ProviderError::api("mock", *status, body.clone()))
            }
            MockMode::Unavailable(message) => {
                return Err(ProviderError::unavailable("mock", message.clone()))
            }
            MockMode::Empty => return Err(ProviderError::empty_response("mock")),
            MockMode::Delay(delay) => {
                tokio::time::sleep(*delay).await;
                Response::text(query.text.clone())
            }
        };

        response.non_empty("mock")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use serde_json::json;

    fn logger() -> Arc<dyn Logger> {
        Arc::new(NoOpLogger)
    }

    #[tokio::test]
    async fn test_echo() {
        let provider = MockProvider::echo(logger());
        assert_eq!(provider.generate("get pods").await.unwrap(), "get pods");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.queries()[0].text, "get pods");
    }

    #[tokio::test]
    async fn test_tool_calls_mode() {
        let call = ToolCall::from_value("get_pods", json!({"namespace": "dev"}));
        let provider = MockProvider::tool_calls("", vec![call.clone()], logger());

        let response = provider.generate_with_tools(&Query::new("pods in dev")).await.unwrap();
        assert_eq!(response.tool_calls, vec![call]);
    }

    #[tokio::test]
    async fn test_script_repeats_last() {
        let provider = MockProvider::new(
            MockMode::Script(vec![Response::text("one"), Response::text("two")]),
            logger(),
        );
        let q = Query::new("x");
        assert_eq!(provider.generate_with_tools(&q).await.unwrap().content, "one");
        assert_eq!(provider.generate_with_tools(&q).await.unwrap().content, "two");
        assert_eq!(provider.generate_with_tools(&q).await.unwrap().content, "two");
    }

    #[tokio::test]
    async fn test_failure_modes() {
        let q = Query::new("x");

        let err = MockProvider::new(MockMode::Empty, logger())
            .generate_with_tools(&q)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse { .. }));

        let err = MockProvider::new(
            MockMode::Status {
                status: 500,
                body: "boom".into(),
            },
            logger(),
        )
        .generate_with_tools(&q)
        .await
        .unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 500, .. }));

        let err = MockProvider::fixed("  ", logger())
            .generate_with_tools(&q)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse { .. }));
    }

    #[tokio::test]
    async fn test_marker_mode() {
        let provider = MockProvider::new(
            MockMode::Marker("ok\nTOOL_CALL: {\"name\": \"get_pods\"}".into()),
            logger(),
        );
        assert_eq!(provider.metadata().tool_mode, ToolMode::Marker);

        let response = provider.generate_with_tools(&Query::new("x")).await.unwrap();
        assert_eq!(response.content, "ok");
        assert_eq!(response.tool_calls[0].name, "get_pods");
    }
}
