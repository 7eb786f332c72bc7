//! Protocol router
//!
//! Turns one request [`Envelope`] into one response envelope. The router
//! never fails outward: every error, including a panic inside a handler,
//! comes back as an `error` envelope carrying the request id.
//!
//! ## Connection lifecycle
//!
//! ```text
//! Uninitialized --initialize(2024-11-05)--> Ready
//!       |                                     |
//!       +-- ping -> pong                      +-- any request
//!       +-- other -> "connection not initialized"
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::RwLock;
use serde_json::{json, Value};

use crate::assistant::Assistant;
use crate::backend::Backend;
use crate::logging::Logger;
use crate::protocol::{
    Capabilities, Envelope, ErrorKind, ErrorPayload, InitializeRequest, InitializeResponse,
    ListResourcesResponse, ListToolsResponse, MessageType, PeerInfo, ProtocolError,
    ReadResourceRequest, ReadResourceResponse, ResourceCapabilities, ToolCapabilities,
    PROTOCOL_VERSION,
};
use crate::registry::{ToolAction, ToolRegistry};
use crate::resources::ResourceCatalog;
use crate::translator::{TranslateError, Translator};
use crate::types::{ContentBlock, ToolCall, ToolResult};

/// Connection key used when the transport supplies none
pub const DEFAULT_CONNECTION: &str = "default";

/// Lifecycle of one logical connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    Ready { client: Option<PeerInfo> },
}

type HandlerResult = Result<Envelope, ProtocolError>;

/// Dispatches protocol messages to the registry, translator and backend
pub struct Router {
    translator: Translator,
    resources: ResourceCatalog,
    backend: Arc<dyn Backend>,
    assistant: Option<Arc<Assistant>>,
    connections: RwLock<HashMap<String, ConnectionState>>,
    server_info: PeerInfo,
    logger: Arc<dyn Logger>,
}

impl Router {
    pub fn new(
        registry: Arc<ToolRegistry>,
        resources: ResourceCatalog,
        backend: Arc<dyn Backend>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            translator: Translator::new(registry),
            resources,
            backend,
            assistant: None,
            connections: RwLock::new(HashMap::new()),
            server_info: PeerInfo::new("kubebridge", env!("CARGO_PKG_VERSION")),
            logger,
        }
    }

    /// Attach the assistant that serves the query tool
    pub fn with_assistant(mut self, assistant: Arc<Assistant>) -> Self {
        self.assistant = Some(assistant);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        self.translator.registry()
    }

    pub fn assistant(&self) -> Option<&Arc<Assistant>> {
        self.assistant.as_ref()
    }

    /// Current state of a connection; unknown keys are uninitialized
    pub fn connection_state(&self, connection: &str) -> ConnectionState {
        self.connections
            .read()
            .get(connection)
            .cloned()
            .unwrap_or(ConnectionState::Uninitialized)
    }

    /// Handle one request and produce its response
    pub async fn dispatch(&self, connection: &str, request: Envelope) -> Envelope {
        let id = request.id.clone();
        let handled = AssertUnwindSafe(self.handle(connection, &request))
            .catch_unwind()
            .await;

        match handled {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                crate::log_debug!(self.logger, "[Router] {} {} failed: {}", request.kind, id, err);
                Envelope::error(&id, err.payload())
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                crate::log_error!(self.logger, "[Router] handler panicked on {}: {}", request.kind, message);
                Envelope::error(
                    &id,
                    ErrorPayload::new(ErrorKind::InternalError, format!("Internal error: {}", message)),
                )
            }
        }
    }

    async fn handle(&self, connection: &str, request: &Envelope) -> HandlerResult {
        let Some(message_type) = request.message_type() else {
            return Err(ProtocolError::UnsupportedType(request.kind.to_string()));
        };

        match message_type {
            MessageType::Ping => return Ok(Envelope::response(MessageType::Pong, &request.id, None)),
            MessageType::Initialize => return self.initialize(connection, request),
            _ => {}
        }

        if !matches!(self.connection_state(connection), ConnectionState::Ready { .. }) {
            return Err(ProtocolError::NotInitialized);
        }

        match message_type {
            MessageType::ListTools => {
                let tools = self.registry().advertised();
                respond(message_type, request, &ListToolsResponse { tools })
            }
            MessageType::ListResources => {
                let resources = self.resources.list();
                respond(message_type, request, &ListResourcesResponse { resources })
            }
            MessageType::ReadResource => self.read_resource(request).await,
            MessageType::CallTool => self.call_tool(request).await,
            // Response-only types are not valid requests
            other => Err(ProtocolError::UnsupportedType(other.to_string())),
        }
    }

    fn initialize(&self, connection: &str, request: &Envelope) -> HandlerResult {
        let init: InitializeRequest = request
            .decode()
            .map_err(|e| ProtocolError::decode(MessageType::Initialize, e))?;

        if init.protocol_version != PROTOCOL_VERSION {
            return Err(ProtocolError::VersionMismatch {
                requested: init.protocol_version,
                supported: PROTOCOL_VERSION.to_string(),
            });
        }

        if let Some(client) = &init.client_info {
            self.logger.info(&format!(
                "[Router] connection '{}' initialized by {} {}",
                connection, client.name, client.version
            ));
        }
        self.connections.write().insert(
            connection.to_string(),
            ConnectionState::Ready {
                client: init.client_info,
            },
        );

        let response = InitializeResponse {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: Capabilities {
                resources: Some(ResourceCapabilities { subscribe: false }),
                tools: Some(ToolCapabilities { call: true }),
            },
            server_info: self.server_info.clone(),
        };
        respond(MessageType::Initialization, request, &response)
    }

    async fn read_resource(&self, request: &Envelope) -> HandlerResult {
        let read: ReadResourceRequest = request
            .decode()
            .map_err(|e| ProtocolError::decode(MessageType::ReadResource, e))?;
        let (uri, descriptor) = self.resources.resolve(&read.uri)?;

        let content = self
            .backend
            .read_resource(&uri)
            .await
            .map_err(|source| ProtocolError::Backend {
                operation: MessageType::ReadResource.to_string(),
                arguments: json!({ "uri": read.uri }),
                source,
            })?;

        let response = ReadResourceResponse {
            uri: descriptor.uri.clone(),
            mime_type: descriptor.mime_type.clone(),
            content,
        };
        respond(MessageType::ReadResource, request, &response)
    }

    async fn call_tool(&self, request: &Envelope) -> HandlerResult {
        let call: ToolCall = request
            .decode()
            .map_err(|e| ProtocolError::decode(MessageType::CallTool, e))?;

        let descriptor = self
            .registry()
            .get(&call.name)
            .map_err(|_| TranslateError::UnknownTool(call.name.clone()))?;

        let result = match descriptor.action {
            ToolAction::Command(_) => self.run_command(&call).await?,
            ToolAction::Query => self.run_query(&call).await?,
        };
        respond(MessageType::CallTool, request, &result)
    }

    async fn run_command(&self, call: &ToolCall) -> Result<ToolResult, ProtocolError> {
        let command = self.translator.translate(call)?;
        crate::log_info!(self.logger, "[Router] {} -> {}", call.name, command);

        self.backend
            .execute(&command)
            .await
            .map_err(|source| ProtocolError::Backend {
                operation: call.name.clone(),
                arguments: Value::Object(call.arguments.clone()),
                source,
            })
    }

    /// Run the assistant, then every tool call the model made
    ///
    /// Failures of individual model tool calls are reported inside the
    /// result; only assistant failures become error envelopes.
    async fn run_query(&self, call: &ToolCall) -> Result<ToolResult, ProtocolError> {
        let assistant = self.assistant.as_ref().ok_or(ProtocolError::NoAssistant)?;
        let validated = self.translator.validate(call)?;
        let text = validated.string("query").unwrap_or_default();

        let response = assistant.process(text).await?;

        let mut blocks = vec![ContentBlock::text(response.content.clone())];
        let mut failed = false;
        for model_call in &response.tool_calls {
            let outcome = match self.translator.translate(model_call) {
                Ok(command) => match self.backend.execute(&command).await {
                    Ok(result) => {
                        failed |= result.is_error();
                        format!("$ {}\n{}", command, result.joined_text())
                    }
                    Err(err) => {
                        failed = true;
                        format!("$ {}\nerror: {}", command, err)
                    }
                },
                Err(err) => {
                    failed = true;
                    format!("{}: {}", model_call.name, err)
                }
            };
            blocks.push(ContentBlock::text(outcome));
        }

        Ok(if failed {
            ToolResult::error(blocks)
        } else {
            ToolResult::new(blocks)
        })
    }
}

fn respond<T: serde::Serialize>(kind: MessageType, request: &Envelope, payload: &T) -> HandlerResult {
    let data = serde_json::to_value(payload)
        .map_err(|e| ProtocolError::Internal(format!("failed to encode {}: {}", kind, e)))?;
    Ok(Envelope::response(kind, &request.id, Some(data)))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
