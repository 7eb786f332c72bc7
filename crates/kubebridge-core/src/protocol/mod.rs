//! Wire protocol: envelopes, payloads and the error taxonomy
//!
//! Every message is an [`Envelope`] `{type, id, timestamp, data}`. Requests
//! and responses share the shape; a response echoes the request `id`.
//!
//! | request         | response         | payload                                |
//! |-----------------|------------------|----------------------------------------|
//! | `initialize`    | `initialization` | [`InitializeRequest`] / [`InitializeResponse`] |
//! | `ping`          | `pong`           | none                                   |
//! | `listTools`     | `listTools`      | [`ListToolsResponse`]                  |
//! | `listResources` | `listResources`  | [`ListResourcesResponse`]              |
//! | `readResource`  | `readResource`   | [`ReadResourceRequest`] / [`ReadResourceResponse`] |
//! | `callTool`      | `callTool`       | [`ToolCall`](crate::types::ToolCall) / [`ToolResult`](crate::types::ToolResult) |
//!
//! Failures come back as an `error` envelope carrying an [`ErrorPayload`].

mod envelope;
mod error;
mod payload;

pub use envelope::{Envelope, EnvelopeType, MessageType};
pub use error::{ErrorKind, ErrorPayload, ProtocolError};
pub use payload::{
    Capabilities, InitializeRequest, InitializeResponse, ListResourcesResponse, ListToolsResponse,
    PeerInfo, ReadResourceRequest, ReadResourceResponse, ResourceCapabilities, ToolCapabilities,
    PROTOCOL_VERSION,
};
