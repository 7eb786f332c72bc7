//! ChatCompletionsProvider - OpenAI-compatible HTTP endpoints over reqwest
//!
//! Serves vendors genai has no native adapter for (OpenRouter, Mistral) and
//! any configured `api_base`. Tool calls come either from the vendor's
//! `tool_calls` array or, in marker mode, from the reply text.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::logging::Logger;
use crate::registry::ToolDescriptor;
use crate::types::{ProviderConfig, ProviderMetadata, ToolCall, ToolMode};

use super::error::{ProviderError, ProviderResult};
use super::genai_adapter::default_api_base;
use super::marker;
use super::prompt;
use super::traits::{Provider, Query, Response};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Title reported to OpenRouter's dashboard
const OPENROUTER_TITLE: &str = "kubebridge";

#[derive(Debug, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    #[serde(default)]
    id: Option<String>,
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: Value,
}

impl WireToolCall {
    fn into_tool_call(self) -> ToolCall {
        // Arguments normally arrive as a JSON-encoded string
        let arguments = match self.function.arguments {
            Value::String(raw) if raw.trim().is_empty() => Value::Object(Map::new()),
            Value::String(raw) => {
                serde_json::from_str(&raw).unwrap_or_else(|_| json!({ "raw": raw }))
            }
            other => other,
        };
        let call = ToolCall::from_value(self.function.name, arguments);
        match self.id {
            Some(id) => call.with_id(id),
            None => call,
        }
    }
}

/// Provider for OpenAI-compatible chat completion APIs
pub struct ChatCompletionsProvider {
    config: ProviderConfig,
    api_base: String,
    mode: ToolMode,
    client: Client,
    logger: Arc<dyn Logger>,
}

impl ChatCompletionsProvider {
    /// Create a provider; fails only if the HTTP client cannot be built
    pub fn new(config: ProviderConfig, logger: Arc<dyn Logger>) -> ProviderResult<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .danger_accept_invalid_certs(!config.tls_verify)
            .build()
            .map_err(|e| {
                ProviderError::unavailable(&config.vendor, format!("HTTP client: {}", e))
            })?;

        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| default_api_base(&config.vendor).to_string());
        let mode = config
            .tool_mode
            .unwrap_or_else(|| Self::default_tool_mode(&config.vendor));

        if !config.tls_verify {
            logger.warn(&format!(
                "[ChatCompletionsProvider] TLS verification disabled for {}",
                api_base
            ));
        }

        Ok(Self {
            config,
            api_base,
            mode,
            client,
            logger,
        })
    }

    /// Tool mode used when the configuration does not choose one
    pub fn default_tool_mode(vendor: &str) -> ToolMode {
        match vendor.to_lowercase().as_str() {
            "openrouter" => ToolMode::Marker,
            _ => ToolMode::Native,
        }
    }

    pub fn tool_mode(&self) -> ToolMode {
        self.mode
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    fn build_request(&self, query: &Query) -> Value {
        let messages: Vec<Value> = prompt::conversation(query, self.mode)
            .into_iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        let mut body = json!({
            "model": self.config.model,
            "messages": messages,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        if self.mode == ToolMode::Native && !query.tools.is_empty() {
            let tools: Vec<Value> = query.tools.iter().map(function_schema).collect();
            body["tools"] = json!(tools);
        }

        body
    }

    fn parse_response(&self, raw: &str) -> ProviderResult<Response> {
        let vendor = &self.config.vendor;
        let body: CompletionBody = serde_json::from_str(raw)
            .map_err(|e| ProviderError::invalid_response(vendor, e.to_string()))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::empty_response(vendor))?;
        let text = choice.message.content.unwrap_or_default();

        let response = match self.mode {
            ToolMode::Native => Response::text(text.trim()).with_tool_calls(
                choice
                    .message
                    .tool_calls
                    .into_iter()
                    .map(WireToolCall::into_tool_call)
                    .collect(),
            ),
            ToolMode::Marker => {
                Response::text(marker::strip_markers(&text))
                    .with_tool_calls(marker::extract_tool_calls(&text))
            }
        };

        response.non_empty(vendor)
    }
}

fn function_schema(tool: &ToolDescriptor) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.input_schema(),
        }
    })
}

#[async_trait]
impl Provider for ChatCompletionsProvider {
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
            requires_api_key: self.config.api_base.is_none(),
            tool_mode: self.mode,
        }
    }

    async fn generate_with_tools(&self, query: &Query) -> ProviderResult<Response> {
        let vendor = &self.config.vendor;
        let url = self.endpoint();
        self.logger.debug(&format!(
            "[ChatCompletionsProvider] POST {} (model={}, mode={:?}, tools={})",
            url,
            self.config.model,
            self.mode,
            query.tools.len()
        ));

        let mut request = self.client.post(&url).json(&self.build_request(query));
        if let Some(key) = &self.config.credential {
            request = request.bearer_auth(key);
        }
        if vendor.eq_ignore_ascii_case("openrouter") {
            request = request.header("X-Title", OPENROUTER_TITLE);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ProviderError::unavailable(vendor, e.to_string()))?;

        let status = resp.status();
        let raw = resp
            .text()
            .await
            .map_err(|e| ProviderError::unavailable(vendor, e.to_string()))?;

        if !status.is_success() {
            self.logger.warn(&format!(
                "[ChatCompletionsProvider] {} returned {}",
                vendor, status
            ));
            return Err(ProviderError::api(vendor, status.as_u16(), raw));
        }

        self.parse_response(&raw)
    }
}
