//! Message envelope

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ErrorPayload;

/// Closed set of message types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageType {
    Initialize,
    Initialization,
    Ping,
    Pong,
    ListResources,
    ReadResource,
    ListTools,
    CallTool,
    Error,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Initialize => "initialize",
            MessageType::Initialization => "initialization",
            MessageType::Ping => "ping",
            MessageType::Pong => "pong",
            MessageType::ListResources => "listResources",
            MessageType::ReadResource => "readResource",
            MessageType::ListTools => "listTools",
            MessageType::CallTool => "callTool",
            MessageType::Error => "error",
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `type` field as received
///
/// Unknown strings are kept verbatim so the router can reject them with a
/// proper error envelope instead of failing the whole decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeType {
    Known(MessageType),
    Unsupported(String),
}

impl From<MessageType> for EnvelopeType {
    fn from(t: MessageType) -> Self {
        EnvelopeType::Known(t)
    }
}

impl std::fmt::Display for EnvelopeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvelopeType::Known(t) => write!(f, "{}", t),
            EnvelopeType::Unsupported(s) => f.write_str(s),
        }
    }
}

/// Typed request/response wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: EnvelopeType,
    /// Caller-chosen correlation id, echoed on the response
    #[serde(default)]
    pub id: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    /// Create an envelope stamped with the current time
    pub fn new(kind: impl Into<EnvelopeType>, id: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            timestamp: Utc::now(),
            data,
        }
    }

    /// Build a request carrying a serializable payload
    pub fn request<T: Serialize>(
        kind: MessageType,
        id: impl Into<String>,
        payload: &T,
    ) -> serde_json::Result<Self> {
        Ok(Self::new(kind, id, Some(serde_json::to_value(payload)?)))
    }

    /// Build a response for the request with the given id
    pub fn response(kind: MessageType, request_id: &str, data: Option<Value>) -> Self {
        Self::new(kind, request_id, data)
    }

    /// Build an error response for the request with the given id
    pub fn error(request_id: &str, payload: ErrorPayload) -> Self {
        let data = serde_json::to_value(&payload).ok();
        Self::new(MessageType::Error, request_id, data)
    }

    /// The message type if it is one of the known types
    pub fn message_type(&self) -> Option<MessageType> {
        match self.kind {
            EnvelopeType::Known(t) => Some(t),
            EnvelopeType::Unsupported(_) => None,
        }
    }

    /// Decode the payload into the shape expected for this type
    ///
    /// A missing payload decodes as JSON `null`.
    pub fn decode<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(self.data.clone().unwrap_or(Value::Null))
    }

    /// The error payload if this is an error envelope
    pub fn error_payload(&self) -> Option<ErrorPayload> {
        if self.message_type() != Some(MessageType::Error) {
            return None;
        }
        self.decode().ok()
    }
}
