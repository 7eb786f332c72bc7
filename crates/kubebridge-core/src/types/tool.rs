//! Tool invocation and tool result types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A concrete request to invoke a tool, either decoded from a `callTool`
/// payload or extracted from a provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call identifier, when the vendor supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name of the tool being called
    pub name: String,
    /// Argument values keyed by parameter name
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    /// Create a tool call without a call id
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            id: None,
            name: name.into(),
            arguments,
        }
    }

    /// Build a tool call from a JSON value; non-object values yield no arguments
    pub fn from_value(name: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(name, arguments)
    }

    /// Attach the provider call id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Get a raw argument value by key
    pub fn argument(&self, key: &str) -> Option<&Value> {
        self.arguments.get(key)
    }
}

/// Image content attached to a tool result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    pub uri: String,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Structured data embedded in a tool result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedContent {
    pub mime_type: String,
    pub data: Value,
}

/// One typed block of tool output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
    Image { image: ImageContent },
    Embedded { embedded: EmbeddedContent },
}

impl ContentBlock {
    /// Create a text block
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    /// Get the text if this is a text block
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// Result of a tool invocation returned to the caller.
///
/// The block sequence is fixed at construction; there are no mutating
/// accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_error: bool,
}

impl ToolResult {
    /// Create a successful result from content blocks
    pub fn new(content: Vec<ContentBlock>) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    /// Create a successful single-text result
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![ContentBlock::text(text)])
    }

    /// Create a result that reports a failure as content
    pub fn error(content: Vec<ContentBlock>) -> Self {
        Self {
            content,
            is_error: true,
        }
    }

    /// Content blocks in order
    pub fn content(&self) -> &[ContentBlock] {
        &self.content
    }

    /// Whether this result represents an error
    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Concatenate all text blocks, one per line
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_call_payload_decoding() {
        let call: ToolCall = serde_json::from_value(json!({
            "name": "scale_deployment",
            "arguments": { "name": "myapp", "replicas": 5 }
        }))
        .unwrap();

        assert_eq!(call.name, "scale_deployment");
        assert!(call.id.is_none());
        assert_eq!(call.argument("name"), Some(&json!("myapp")));
        assert_eq!(call.argument("missing"), None);
    }

    #[test]
    fn test_tool_call_without_arguments() {
        let call: ToolCall = serde_json::from_value(json!({ "name": "get_pods" })).unwrap();
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn test_tool_call_from_non_object_value() {
        let call = ToolCall::from_value("get_pods", json!("not an object"));
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn test_tool_result_wire_shape() {
        let result = ToolResult::text("Found 2 pods");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({ "content": [{ "type": "text", "text": "Found 2 pods" }] })
        );

        let failed = ToolResult::error(vec![ContentBlock::text("boom")]);
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["isError"], json!(true));
    }

    #[test]
    fn test_image_block_serialization() {
        let block = ContentBlock::Image {
            image: ImageContent {
                uri: "file:///graph.png".to_string(),
                mime_type: "image/png".to_string(),
                width: Some(640),
                height: None,
            },
        };
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "image");
        assert_eq!(value["image"]["mimeType"], "image/png");
        assert!(value["image"].get("height").is_none());
    }

    #[test]
    fn test_joined_text_skips_non_text_blocks() {
        let result = ToolResult::new(vec![
            ContentBlock::text("first"),
            ContentBlock::Embedded {
                embedded: EmbeddedContent {
                    mime_type: "application/json".to_string(),
                    data: json!({ "k": 1 }),
                },
            },
            ContentBlock::text("second"),
        ]);
        assert_eq!(result.joined_text(), "first\nsecond");
    }
}
