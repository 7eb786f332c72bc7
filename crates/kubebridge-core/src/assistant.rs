//! Query processing over a model provider
//!
//! The assistant owns the conversation [`Session`]. Each query snapshots the
//! history under the lock, calls the provider with the lock released, then
//! records the user/assistant pair in one critical section. Concurrent
//! queries therefore never interleave an append with a clear.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::logging::Logger;
use crate::providers::{Provider, ProviderError, ProviderResult, Query, Response};
use crate::registry::ToolRegistry;
use crate::session::{Session, Turn, DEFAULT_MAX_PAIRS};

/// Default upper bound on one provider call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Turns free text into a model response with tool calls
pub struct Assistant {
    provider: Arc<dyn Provider>,
    registry: Arc<ToolRegistry>,
    session: Mutex<Session>,
    context: BTreeMap<String, String>,
    timeout: Duration,
    logger: Arc<dyn Logger>,
}

impl Assistant {
    pub fn new(
        provider: Arc<dyn Provider>,
        registry: Arc<ToolRegistry>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            provider,
            registry,
            session: Mutex::new(Session::new(DEFAULT_MAX_PAIRS)),
            context: BTreeMap::new(),
            timeout: DEFAULT_TIMEOUT,
            logger,
        }
    }

    /// Bound each provider call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Keep at most this many user/assistant pairs
    pub fn with_max_pairs(mut self, max_pairs: usize) -> Self {
        self.session = Mutex::new(Session::new(max_pairs));
        self
    }

    /// Add a context tag sent with every query
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Add several context tags
    pub fn with_context_tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.context.extend(tags);
        self
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Send one query, recording the exchange on success
    ///
    /// A failed or timed-out call leaves the history untouched.
    pub async fn process(&self, text: &str) -> ProviderResult<Response> {
        let history = self.session.lock().snapshot();

        let mut query = Query::new(text)
            .with_tools(self.registry.model_tools())
            .with_history(history);
        query.context = self.context.clone();

        self.logger.debug(&format!(
            "[Assistant] query with {} history turns via {}",
            query.history.len(),
            self.provider.name()
        ));

        let response = tokio::time::timeout(self.timeout, self.provider.generate_with_tools(&query))
            .await
            .map_err(|_| {
                ProviderError::unavailable(
                    self.provider.name(),
                    format!("no response within {}s", self.timeout.as_secs_f64()),
                )
            })??;

        self.session
            .lock()
            .record_exchange(text, transcript_entry(&response));

        Ok(response)
    }

    /// Owned copy of the history
    pub fn history(&self) -> Vec<Turn> {
        self.session.lock().snapshot()
    }

    pub fn clear_history(&self) {
        self.session.lock().clear();
    }
}

/// What the session remembers of a response
fn transcript_entry(response: &Response) -> String {
    let mut lines = Vec::new();
    if !response.content.trim().is_empty() {
        lines.push(response.content.trim().to_string());
    }
    for call in &response.tool_calls {
        lines.push(format!(
            "[called {} {}]",
            call.name,
            serde_json::Value::Object(call.arguments.clone())
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::providers::{MockMode, MockProvider};
    use crate::registry::kubernetes_registry;
    use crate::session::TurnRole;
    use crate::types::ToolCall;
    use serde_json::json;

    fn assistant(provider: Arc<MockProvider>) -> Assistant {
        Assistant::new(
            provider,
            Arc::new(kubernetes_registry().unwrap()),
            Arc::new(NoOpLogger),
        )
    }

    #[tokio::test]
    async fn test_process_records_exchange() {
        let provider = Arc::new(MockProvider::fixed("There are 3 pods.", Arc::new(NoOpLogger)));
        let assistant = assistant(provider.clone());

        let response = assistant.process("how many pods?").await.unwrap();
        assert_eq!(response.content, "There are 3 pods.");

        let history = assistant.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], Turn::user("how many pods?"));
        assert_eq!(history[1].role, TurnRole::Assistant);
    }

    #[tokio::test]
    async fn test_query_carries_model_tools_and_history() {
        let provider = Arc::new(MockProvider::echo(Arc::new(NoOpLogger)));
        let assistant = assistant(provider.clone()).with_context("cluster", "staging");

        assistant.process("first").await.unwrap();
        assistant.process("second").await.unwrap();

        let queries = provider.queries();
        assert_eq!(queries.len(), 2);
        assert!(queries[0].history.is_empty());
        assert_eq!(queries[1].history.len(), 2);
        assert_eq!(queries[1].context.get("cluster").map(String::as_str), Some("staging"));
        // The assistant's own query tool is never offered to the model
        assert_eq!(queries[0].tools.len(), 7);
        assert!(queries[0].tools.iter().all(|t| !t.internal));
    }

    #[tokio::test]
    async fn test_history_bounded() {
        let provider = Arc::new(MockProvider::echo(Arc::new(NoOpLogger)));
        let assistant = assistant(provider).with_max_pairs(2);

        for n in 0..5 {
            assistant.process(&format!("q{}", n)).await.unwrap();
        }
        let history = assistant.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0], Turn::user("q3"));
        assert_eq!(history[2], Turn::user("q4"));
    }

    #[tokio::test]
    async fn test_failure_leaves_history_untouched() {
        let provider = Arc::new(MockProvider::new(MockMode::Empty, Arc::new(NoOpLogger)));
        let assistant = assistant(provider);

        let err = assistant.process("anything").await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse { .. }));
        assert!(assistant.history().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_is_unavailable() {
        let provider = Arc::new(MockProvider::new(
            MockMode::Delay(Duration::from_secs(5)),
            Arc::new(NoOpLogger),
        ));
        let assistant = assistant(provider).with_timeout(Duration::from_millis(20));

        let err = assistant.process("slow").await.unwrap_err();
        assert!(err.is_unavailable());
        assert!(assistant.history().is_empty());
    }

    #[tokio::test]
    async fn test_tool_only_response_is_remembered() {
        let call = ToolCall::from_value("get_pods", json!({"namespace": "dev"}));
        let provider = Arc::new(MockProvider::tool_calls("", vec![call], Arc::new(NoOpLogger)));
        let assistant = assistant(provider);

        assistant.process("pods in dev").await.unwrap();
        let history = assistant.history();
        assert!(history[1].content.contains("get_pods"));
    }

    #[tokio::test]
    async fn test_clear_history() {
        let provider = Arc::new(MockProvider::echo(Arc::new(NoOpLogger)));
        let assistant = assistant(provider);
        assistant.process("hello").await.unwrap();
        assistant.clear_history();
        assert!(assistant.history().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_queries_keep_pairs_together() {
        let provider = Arc::new(MockProvider::echo(Arc::new(NoOpLogger)));
        let assistant = Arc::new(assistant(provider).with_max_pairs(50));

        let handles: Vec<_> = (0..20)
            .map(|n| {
                let assistant = Arc::clone(&assistant);
                tokio::spawn(async move { assistant.process(&format!("q{}", n)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let history = assistant.history();
        assert_eq!(history.len(), 40);
        for pair in history.chunks(2) {
            assert_eq!(pair[0].role, TurnRole::User);
            assert_eq!(pair[1].role, TurnRole::Assistant);
            // Echo provider: the reply equals the question
            assert_eq!(pair[0].content, pair[1].content);
        }
    }
}
