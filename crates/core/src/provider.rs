//! Provider trait — the abstraction over LLM backends.
//!
//! A Provider knows how to send a conversation (plus the registered tool
//! schemas) to an LLM and get one assistant message back, possibly carrying
//! tool-call requests with stable ids. Prompt formatting, model selection,
//! and credentials live behind this seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::Message;

/// Configuration for a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "gpt-4o-mini")
    pub model: String,

    /// The conversation messages
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Available tools the model can call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,

    /// Stop sequences
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

fn default_temperature() -> f32 {
    0.0
}

/// A tool definition sent to the LLM so it knows what tools it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does and when to use it
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated assistant message (content plus zero-or-more tool calls)
    pub message: Message,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The reasoning node calls `complete()` without knowing which backend is
/// configured. A failure here is fatal to the run — there is no fallback
/// reasoning path.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_definition_serialization() {
        let tool = ToolDefinition {
            name: "stock_data".into(),
            description: "Look up stock performance data".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "company_ticker": { "type": "string", "description": "The ticker symbol" },
                    "num_days": { "type": "integer", "description": "Days of data required" }
                },
                "required": ["company_ticker", "num_days"]
            }),
        };
        let json = serde_json::to_string(&tool).unwrap();
        assert!(json.contains("stock_data"));
        assert!(json.contains("company_ticker"));
    }

    #[test]
    fn request_defaults_to_deterministic_temperature() {
        let json = serde_json::json!({
            "model": "gpt-4o-mini",
            "messages": [],
        });
        let req: ProviderRequest = serde_json::from_value(json).unwrap();
        assert!(req.temperature.abs() < f32::EPSILON);
        assert!(req.tools.is_empty());
        assert!(req.stop.is_empty());
    }
}
