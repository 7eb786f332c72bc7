//! Typed payloads carried in the `data` field

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::AdvertisedTool;
use crate::resources::ResourceDescriptor;

/// The only protocol version this router speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Identity of a client or server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerInfo {
    pub name: String,
    pub version: String,
}

impl PeerInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCapabilities {
    #[serde(default)]
    pub subscribe: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCapabilities {
    #[serde(default)]
    pub call: bool,
}

/// Capability flags exchanged during initialization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceCapabilities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolCapabilities>,
}

/// `initialize` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeRequest {
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: Capabilities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_info: Option<PeerInfo>,
}

impl InitializeRequest {
    /// Request for the supported version with the given client identity
    pub fn new(client: PeerInfo) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: Capabilities {
                resources: Some(ResourceCapabilities { subscribe: false }),
                tools: Some(ToolCapabilities { call: true }),
            },
            client_info: Some(client),
        }
    }
}

/// `initialization` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResponse {
    pub protocol_version: String,
    pub capabilities: Capabilities,
    pub server_info: PeerInfo,
}

/// `readResource` request payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadResourceRequest {
    pub uri: String,
}

/// `readResource` response payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadResourceResponse {
    pub uri: String,
    pub mime_type: String,
    pub content: Value,
}

/// `listTools` response payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListToolsResponse {
    pub tools: Vec<AdvertisedTool>,
}

/// `listResources` response payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResourcesResponse {
    pub resources: Vec<ResourceDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initialize_wire_shape() {
        let value = serde_json::to_value(InitializeRequest::new(PeerInfo::new("cli", "1.0"))).unwrap();
        assert_eq!(value["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(value["capabilities"]["tools"]["call"], true);
        assert_eq!(value["clientInfo"]["name"], "cli");
    }

    #[test]
    fn test_initialize_minimal_decode() {
        let req: InitializeRequest =
            serde_json::from_value(json!({"protocolVersion": "2024-11-05"})).unwrap();
        assert!(req.client_info.is_none());
        assert_eq!(req.capabilities, Capabilities::default());
    }

    #[test]
    fn test_initialize_requires_version() {
        let result: Result<InitializeRequest, _> =
            serde_json::from_value(json!({"clientInfo": {"name": "cli", "version": "1"}}));
        assert!(result.is_err());
    }
}
