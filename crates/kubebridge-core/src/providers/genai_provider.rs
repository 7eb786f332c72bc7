//! GenaiProvider - native function calling through the genai crate
//!
//! Handles every vendor genai ships an adapter for. The streamed reply is
//! aggregated into one [`Response`]: text chunks are concatenated and the
//! captured tool calls are read from the final event.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use genai::chat::{ChatRequest, ChatStreamEvent};
use genai::{webc, Client};

use crate::logging::Logger;
use crate::types::{ProviderConfig, ProviderMetadata, ToolMode};

use super::error::{ProviderError, ProviderResult};
use super::genai_adapter::{
    create_client, default_api_base, from_genai_tool_call, is_genai_native, to_genai_messages,
    to_genai_options, to_genai_tools,
};
use super::prompt;
use super::traits::{Provider, Query, Response};

/// Status reported when the vendor's reply was an error without one
const UNKNOWN_STATUS: u16 = 502;

/// Provider backed by genai for all natively supported vendors
pub struct GenaiProvider {
    config: ProviderConfig,
    client: Client,
    logger: Arc<dyn Logger>,
}

impl GenaiProvider {
    /// Create a new GenaiProvider
    pub fn new(config: ProviderConfig, logger: Arc<dyn Logger>) -> Self {
        let client = create_client(&config);
        Self {
            config,
            client,
            logger,
        }
    }

    /// Check if this provider can handle the given vendor
    pub fn supports(vendor: &str) -> bool {
        is_genai_native(vendor)
    }

    /// Extract model name from a model string (e.g., "openai/gpt-4o" -> "gpt-4o")
    pub fn extract_model_name(model: &str) -> &str {
        model.split('/').nth(1).unwrap_or(model)
    }

}

/// Map a genai failure onto the provider error taxonomy.
///
/// Vendor statuses become `Api` with the real status, failures to reach the
/// vendor become `Unavailable`.
fn map_genai_error(vendor: &str, err: genai::Error) -> ProviderError {
    match err {
        genai::Error::HttpError { status, body, .. } => {
            ProviderError::api(vendor, status.as_u16(), body)
        }
        genai::Error::WebModelCall { webc_error, .. }
        | genai::Error::WebAdapterCall { webc_error, .. } => map_webc_error(vendor, webc_error),
        genai::Error::WebStream { error, cause, .. } => {
            match error.downcast_ref::<genai::Error>() {
                Some(genai::Error::HttpError { status, body, .. }) => {
                    ProviderError::api(vendor, status.as_u16(), body.clone())
                }
                _ => ProviderError::unavailable(vendor, cause),
            }
        }
        genai::Error::NoChatResponse { .. } => ProviderError::empty_response(vendor),
        genai::Error::RequiresApiKey { .. }
        | genai::Error::NoAuthResolver { .. }
        | genai::Error::NoAuthData { .. } => ProviderError::missing_api_key(vendor),
        genai::Error::ChatResponse { body, .. } => {
            ProviderError::api(vendor, UNKNOWN_STATUS, body.to_string())
        }
        genai::Error::StreamParse { .. }
        | genai::Error::ChatResponseGeneration { .. }
        | genai::Error::InvalidJsonResponseElement { .. }
        | genai::Error::SerdeJson(_) => ProviderError::invalid_response(vendor, err.to_string()),
        other => ProviderError::api(vendor, UNKNOWN_STATUS, other.to_string()),
    }
}

fn map_webc_error(vendor: &str, err: webc::Error) -> ProviderError {
    match err {
        webc::Error::ResponseFailedStatus { status, body, .. } => {
            ProviderError::api(vendor, status.as_u16(), body)
        }
        webc::Error::Reqwest(e) => ProviderError::unavailable(vendor, e.to_string()),
        other => ProviderError::invalid_response(vendor, other.to_string()),
    }
}

#[async_trait]
impl Provider for GenaiProvider {
    fn name(&self) -> &str {
        &self.config.vendor
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            id: self.config.vendor.clone(),
            display_name: self.config.vendor.clone(),
            default_api_base: default_api_base(&self.config.vendor).to_string(),
            requires_api_key: !matches!(self.config.vendor.as_str(), "ollama"),
            tool_mode: ToolMode::Native,
        }
    }

    async fn generate_with_tools(&self, query: &Query) -> ProviderResult<Response> {
        let model_name = Self::extract_model_name(&self.config.model);
        self.logger.debug(&format!(
            "[GenaiProvider] request: vendor={}, model={}, tools={}, history={}",
            self.config.vendor,
            model_name,
            query.tools.len(),
            query.history.len()
        ));

        let messages = to_genai_messages(prompt::conversation(query, ToolMode::Native));
        let mut chat_req = ChatRequest::new(messages);
        if !query.tools.is_empty() {
            chat_req = chat_req.with_tools(to_genai_tools(&query.tools));
        }
        let options = to_genai_options(&self.config);

        let chat_stream = self
            .client
            .exec_chat_stream(model_name, chat_req, Some(&options))
            .await
            .map_err(|e| map_genai_error(&self.config.vendor, e))?;

        let mut stream = Box::pin(chat_stream.stream);
        let mut response = Response::default();

        while let Some(event) = stream.next().await {
            match event.map_err(|e| map_genai_error(&self.config.vendor, e))? {
                ChatStreamEvent::Chunk(chunk) => response.content.push_str(&chunk.content),
                ChatStreamEvent::End(end) => {
                    if let Some(tool_calls) = end.captured_tool_calls() {
                        response
                            .tool_calls
                            .extend(tool_calls.iter().map(|tc| from_genai_tool_call(tc)));
                    }
                }
                _ => {}
            }
        }

        self.logger.debug(&format!(
            "[GenaiProvider] reply: {} chars, {} tool calls",
            response.content.len(),
            response.tool_calls.len()
        ));

        response.non_empty(&self.config.vendor)
    }
}
