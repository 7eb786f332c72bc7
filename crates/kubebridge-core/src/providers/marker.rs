//! Textual tool-call convention for vendors without native function calling
//!
//! The model is asked to write one line per call:
//!
//! ```text
//! TOOL_CALL: {"name": "scale_deployment", "arguments": {"name": "api", "replicas": 3}}
//! ```
//!
//! Extraction is best effort. Lines that do not parse are skipped, and text
//! without markers yields no calls.

use serde::Deserialize;
use serde_json::Value;

use crate::registry::ToolDescriptor;
use crate::types::ToolCall;

/// Line prefix introducing a tool call
pub const MARKER: &str = "TOOL_CALL:";

#[derive(Deserialize)]
struct MarkerPayload {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Extract every well-formed marker line, in order
pub fn extract_tool_calls(text: &str) -> Vec<ToolCall> {
    text.lines()
        .filter_map(|line| line.trim_start().strip_prefix(MARKER))
        .filter_map(|payload| serde_json::from_str::<MarkerPayload>(payload.trim()).ok())
        .filter(|payload| !payload.name.trim().is_empty())
        .map(|payload| ToolCall::from_value(payload.name, payload.arguments))
        .collect()
}

/// The text with all marker lines removed
pub fn strip_markers(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with(MARKER))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Instructions appended to the system prompt in marker mode
pub fn instructions(tools: &[ToolDescriptor]) -> String {
    let mut out = String::from(
        "You can call tools. To call one, write a line starting with ",
    );
    out.push_str(MARKER);
    out.push_str(
        " followed by a JSON object with \"name\" and \"arguments\". \
         Write one line per call. Available tools:\n",
    );
    for tool in tools {
        out.push_str(&format!(
            "- {}: {} Parameters: {}\n",
            tool.name,
            tool.description,
            tool.input_schema()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_in_order() {
        let text = "Sure, scaling now.\n\
                    TOOL_CALL: {\"name\": \"scale_deployment\", \"arguments\": {\"name\": \"api\", \"replicas\": 3}}\n\
                      TOOL_CALL: {\"name\": \"get_pods\"}\n\
                    Done.";
        let calls = extract_tool_calls(text);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name, "scale_deployment");
        assert_eq!(calls[0].argument("replicas"), Some(&json!(3)));
        assert_eq!(calls[1].name, "get_pods");
        assert!(calls[1].arguments.is_empty());
    }

    #[test]
    fn test_no_markers_is_empty_not_error() {
        assert!(extract_tool_calls("There are 3 pods running.").is_empty());
        assert!(extract_tool_calls("").is_empty());
    }

    #[test]
    fn test_malformed_markers_skipped() {
        let text = "TOOL_CALL: not json\n\
                    TOOL_CALL: {\"arguments\": {}}\n\
                    TOOL_CALL: {\"name\": \"describe_pod\", \"arguments\": {\"name\": \"web-1\"}}";
        let calls = extract_tool_calls(text);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "describe_pod");
    }

    #[test]
    fn test_strip_markers() {
        let text = "Listing pods.\nTOOL_CALL: {\"name\": \"get_pods\"}\n";
        assert_eq!(strip_markers(text), "Listing pods.");
    }

    #[test]
    fn test_instructions_list_tools() {
        let tools = vec![ToolDescriptor::command("get_pods", "List pods", "get", "pods")];
        let text = instructions(&tools);
        assert!(text.contains(MARKER));
        assert!(text.contains("- get_pods: List pods"));
    }
}
