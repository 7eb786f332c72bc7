//! Adapter between kubebridge types and genai types
//!
//! Conversion functions plus client construction. Credentials are resolved
//! before the client is built and handed to genai through an `AuthResolver`,
//! so genai never reads vendor environment variables on its own.

use std::future::Future;
use std::pin::Pin;

use genai::chat::{
    ChatMessage as GenaiMessage, ChatOptions as GenaiOptions, MessageContent as GenaiContent,
    Tool as GenaiTool, ToolCall as GenaiToolCall,
};
use genai::resolver::{AuthData, AuthResolver, Endpoint, ServiceTargetResolver};
use genai::{adapter::AdapterKind, Client, ModelIden, ServiceTarget};

use crate::registry::ToolDescriptor;
use crate::types::{ChatMessage, MessageRole, ProviderConfig, ToolCall};

// ============================================================================
// Request Conversion: kubebridge -> genai
// ============================================================================

/// Convert a ChatMessage to a genai ChatMessage
pub fn to_genai_message(msg: ChatMessage) -> GenaiMessage {
    let content = GenaiContent::from(msg.content);
    match msg.role {
        MessageRole::System => GenaiMessage::system(content),
        MessageRole::User => GenaiMessage::user(content),
        MessageRole::Assistant => GenaiMessage::assistant(content),
    }
}

/// Convert messages to genai messages
pub fn to_genai_messages(messages: Vec<ChatMessage>) -> Vec<GenaiMessage> {
    messages.into_iter().map(to_genai_message).collect()
}

/// Convert a tool descriptor to a genai Tool
pub fn to_genai_tool(tool: &ToolDescriptor) -> GenaiTool {
    GenaiTool::new(&tool.name)
        .with_description(&tool.description)
        .with_schema(tool.input_schema())
}

/// Convert tool descriptors to genai tools
pub fn to_genai_tools(tools: &[ToolDescriptor]) -> Vec<GenaiTool> {
    tools.iter().map(to_genai_tool).collect()
}

/// Chat options from the provider configuration
pub fn to_genai_options(config: &ProviderConfig) -> GenaiOptions {
    GenaiOptions::default()
        .with_temperature(config.temperature as f64)
        .with_max_tokens(config.max_tokens)
        // Tool calls are read from the End event
        .with_capture_tool_calls(true)
}

// ============================================================================
// Response Conversion: genai -> kubebridge
// ============================================================================

/// Convert a genai ToolCall to a ToolCall
pub fn from_genai_tool_call(tc: &GenaiToolCall) -> ToolCall {
    ToolCall::from_value(tc.fn_name.clone(), tc.fn_arguments.clone()).with_id(tc.call_id.clone())
}

// ============================================================================
// Vendor Resolution
// ============================================================================

/// Vendors served through genai's native adapters
pub const GENAI_VENDORS: &[&str] = &[
    "openai",
    "anthropic",
    "gemini",
    "ollama",
    "groq",
    "xai",
    "deepseek",
    "cohere",
    "fireworks",
    "together",
];

/// Check if a vendor is natively supported by genai
pub fn is_genai_native(vendor: &str) -> bool {
    GENAI_VENDORS.contains(&vendor.to_lowercase().as_str())
}

/// genai adapter for a vendor
pub fn vendor_adapter_kind(vendor: &str) -> Option<AdapterKind> {
    let kind = match vendor.to_lowercase().as_str() {
        "openai" => AdapterKind::OpenAI,
        "anthropic" => AdapterKind::Anthropic,
        "gemini" | "google" => AdapterKind::Gemini,
        "ollama" => AdapterKind::Ollama,
        "groq" => AdapterKind::Groq,
        "xai" => AdapterKind::Xai,
        "deepseek" => AdapterKind::DeepSeek,
        "cohere" => AdapterKind::Cohere,
        "fireworks" => AdapterKind::Fireworks,
        "together" => AdapterKind::Together,
        _ => return None,
    };
    Some(kind)
}

/// Default API base for a vendor
pub fn default_api_base(vendor: &str) -> &'static str {
    match vendor.to_lowercase().as_str() {
        "openai" => "https://api.openai.com/v1/",
        "anthropic" => "https://api.anthropic.com/v1/",
        "gemini" | "google" => "https://generativelanguage.googleapis.com/v1beta/",
        "ollama" => "http://localhost:11434/v1/",
        "groq" => "https://api.groq.com/openai/v1/",
        "xai" => "https://api.x.ai/v1/",
        "deepseek" => "https://api.deepseek.com/",
        "cohere" => "https://api.cohere.com/v1/",
        "fireworks" => "https://api.fireworks.ai/inference/v1/",
        "together" => "https://api.together.xyz/v1/",
        "openrouter" => "https://openrouter.ai/api/v1/",
        "mistral" => "https://api.mistral.ai/v1/",
        _ => "https://api.openai.com/v1/",
    }
}

// ============================================================================
// Client Creation
// ============================================================================

/// Create a genai Client pinned to the configured vendor
///
/// genai infers the adapter from the model name. When that guess disagrees
/// with the configured vendor (e.g., a Llama model served by Groq), the
/// service target is rewritten to the vendor's adapter and endpoint. An
/// explicit `api_base` replaces the vendor's default endpoint.
pub fn create_client(config: &ProviderConfig) -> Client {
    let credential = config.credential.clone();

    let auth_resolver = AuthResolver::from_resolver_async_fn(
        move |_model_iden: ModelIden| -> Pin<
            Box<dyn Future<Output = genai::resolver::Result<Option<AuthData>>> + Send>,
        > {
            let credential = credential.clone();
            // None lets keyless vendors such as Ollama through
            Box::pin(async move { Ok(credential.map(AuthData::from_single)) })
        },
    );

    let vendor = config.vendor.to_lowercase();
    let api_base = config.api_base.as_deref().map(|base| {
        if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        }
    });
    let target_resolver = ServiceTargetResolver::from_resolver_fn(
        move |target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
            let Some(kind) = vendor_adapter_kind(&vendor) else {
                return Ok(target);
            };
            if target.model.adapter_kind == kind && api_base.is_none() {
                return Ok(target);
            }

            let ServiceTarget { model, auth, .. } = target;
            let endpoint = match &api_base {
                Some(base) => Endpoint::from_owned(base.clone()),
                None => Endpoint::from_static(default_api_base(&vendor)),
            };
            Ok(ServiceTarget {
                endpoint,
                auth,
                model: ModelIden::new(kind, model.model_name.clone()),
            })
        },
    );

    Client::builder()
        .with_auth_resolver(auth_resolver)
        .with_service_target_resolver(target_resolver)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ParameterSpec;
    use genai::chat::ChatRole as GenaiRole;

    #[test]
    fn test_message_conversion() {
        let genai_msg = to_genai_message(ChatMessage::user("list pods"));
        assert!(matches!(genai_msg.role, GenaiRole::User));

        let genai_msg = to_genai_message(ChatMessage::system("rules"));
        assert!(matches!(genai_msg.role, GenaiRole::System));
    }

    #[test]
    fn test_tool_conversion() {
        let tool = ToolDescriptor::command("delete_pod", "Delete a pod", "delete", "pod")
            .param(ParameterSpec::string("name", "Pod name").required());

        let genai_tool = to_genai_tool(&tool);
        assert_eq!(genai_tool.name, "delete_pod");
    }

    #[test]
    fn test_vendor_detection() {
        assert!(is_genai_native("openai"));
        assert!(is_genai_native("Gemini"));
        assert!(!is_genai_native("openrouter"));
        assert!(!is_genai_native("mistral"));
        assert!(vendor_adapter_kind("groq").is_some());
        assert!(vendor_adapter_kind("openrouter").is_none());
    }
}
