//! Vendor-neutral conversation assembly

use super::marker;
use super::traits::Query;
use crate::types::{ChatMessage, ToolMode};

const PREAMBLE: &str = "You operate a Kubernetes cluster on the user's behalf. \
Use the available tools to act on the cluster, and answer briefly.";

/// System prompt for a query
pub fn system_prompt(query: &Query, mode: ToolMode) -> String {
    let mut prompt = PREAMBLE.to_string();

    if !query.context.is_empty() {
        prompt.push_str("\n\nContext:");
        for (key, value) in &query.context {
            prompt.push_str(&format!("\n- {}: {}", key, value));
        }
    }

    if mode == ToolMode::Marker && !query.tools.is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str(&marker::instructions(&query.tools));
    }

    prompt
}

/// System prompt, then history oldest first, then the query text
pub fn conversation(query: &Query, mode: ToolMode) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(query.history.len() + 2);
    messages.push(ChatMessage::system(system_prompt(query, mode)));
    messages.extend(query.history.iter().map(ChatMessage::from));
    messages.push(ChatMessage::user(query.text.clone()));
    messages
}
