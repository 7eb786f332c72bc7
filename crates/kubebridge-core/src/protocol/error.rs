//! Protocol error taxonomy
//!
//! Component errors are funnelled into [`ProtocolError`] at the router
//! boundary, which maps each onto a wire-level [`ErrorKind`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::backend::BackendError;
use crate::providers::ProviderError;
use crate::registry::RegistryError;
use crate::resources::ResourceError;
use crate::translator::TranslateError;

/// Error kinds carried in the `type` field of an error payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    DecodeError,
    UnsupportedType,
    VersionMismatch,
    UnknownTool,
    MissingArgument,
    ValidationError,
    DuplicateTool,
    NotFound,
    ProviderUnavailable,
    ProviderError,
    EmptyResponse,
    BackendOperationError,
    InternalError,
}

/// Payload of an `error` envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorPayload {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Failure of a single dispatch
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed {message_type} payload: {source}")]
    Decode {
        message_type: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported message type: {0}")]
    UnsupportedType(String),

    #[error("connection not initialized")]
    NotInitialized,

    #[error("Protocol version {requested} is not supported (expected {supported})")]
    VersionMismatch { requested: String, supported: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("{operation} failed: {source}")]
    Backend {
        operation: String,
        arguments: Value,
        #[source]
        source: BackendError,
    },

    #[error("no assistant configured")]
    NoAssistant,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProtocolError {
    pub fn decode(message_type: impl std::fmt::Display, source: serde_json::Error) -> Self {
        Self::Decode {
            message_type: message_type.to_string(),
            source,
        }
    }

    /// Wire kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProtocolError::Decode { .. } => ErrorKind::DecodeError,
            ProtocolError::UnsupportedType(_) | ProtocolError::NotInitialized => {
                ErrorKind::UnsupportedType
            }
            ProtocolError::VersionMismatch { .. } => ErrorKind::VersionMismatch,
            ProtocolError::Registry(RegistryError::DuplicateTool(_)) => ErrorKind::DuplicateTool,
            ProtocolError::Registry(RegistryError::NotFound(_)) => ErrorKind::NotFound,
            ProtocolError::Translate(err) => match err {
                TranslateError::UnknownTool(_) => ErrorKind::UnknownTool,
                TranslateError::MissingArgument { .. } => ErrorKind::MissingArgument,
                TranslateError::ValidationError { .. } | TranslateError::NotExecutable { .. } => {
                    ErrorKind::ValidationError
                }
            },
            ProtocolError::Resource(ResourceError::Malformed(_)) => ErrorKind::DecodeError,
            ProtocolError::Resource(ResourceError::NotFound(_)) => ErrorKind::NotFound,
            ProtocolError::Provider(err) => match err {
                ProviderError::Unavailable { .. } => ErrorKind::ProviderUnavailable,
                _ => ErrorKind::ProviderError,
            },
            ProtocolError::Backend { .. } => ErrorKind::BackendOperationError,
            ProtocolError::NoAssistant => ErrorKind::NotFound,
            ProtocolError::Internal(_) => ErrorKind::InternalError,
        }
    }

    /// Error payload for the response envelope
    pub fn payload(&self) -> ErrorPayload {
        let payload = ErrorPayload::new(self.kind(), self.to_string());
        match self {
            ProtocolError::Translate(TranslateError::MissingArgument { param })
            | ProtocolError::Translate(TranslateError::ValidationError { param, .. }) => {
                payload.with_data(json!({ "param": param }))
            }
            ProtocolError::Provider(ProviderError::Api { status, body, .. }) => {
                payload.with_data(json!({ "status": status, "body": body }))
            }
            ProtocolError::Provider(ProviderError::EmptyResponse { .. }) => {
                payload.with_data(json!({ "reason": "EmptyResponse" }))
            }
            ProtocolError::Backend {
                operation,
                arguments,
                ..
            } => payload.with_data(json!({ "operation": operation, "arguments": arguments })),
            ProtocolError::VersionMismatch { supported, .. } => {
                payload.with_data(json!({ "supported": supported }))
            }
            _ => payload,
        }
    }
}
