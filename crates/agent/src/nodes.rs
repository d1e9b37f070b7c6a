//! The reasoning and action nodes.
//!
//! A node reads the shared state and returns a delta of messages; it never
//! mutates the state directly. The reasoning node is the only fallible one —
//! a provider failure has no fallback and aborts the run. The action node
//! contains everything: unresolvable tool names and tool failures alike
//! become tool-result messages.

use std::sync::Arc;

use marketmind_core::error::Error;
use marketmind_core::message::Message;
use marketmind_core::provider::{Provider, ProviderRequest};
use marketmind_core::state::AgentState;
use marketmind_core::tool::ToolRegistry;
use tracing::{debug, warn};

/// Issues the model call with the registry's schemas bound.
pub struct ReasoningNode {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    tools: Arc<ToolRegistry>,
}

impl ReasoningNode {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools,
        }
    }

    /// Set the maximum tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Call the LLM with the full history and tool schemas.
    ///
    /// Returns a one-element delta: the assistant message, which may carry
    /// zero, one, or many tool-call requests.
    pub async fn run(&self, state: &AgentState) -> Result<Vec<Message>, Error> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: state.messages.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: self.tools.definitions(),
            stop: vec![],
        };

        debug!(
            model = %self.model,
            messages = state.messages.len(),
            tools = request.tools.len(),
            "Running reasoning node"
        );

        let response = self.provider.complete(request).await?;

        debug!(
            tool_calls = response.message.tool_calls.len(),
            "Reasoning node produced assistant message"
        );

        Ok(vec![response.message])
    }
}

/// Resolves and executes the tool calls requested by the latest assistant
/// message.
pub struct ActionNode {
    tools: Arc<ToolRegistry>,
}

impl ActionNode {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }

    /// Execute each requested tool call, in request order.
    ///
    /// Produces exactly one tool-result message per request, each carrying
    /// the originating call id — downstream consumers pair results to
    /// requests by id, not by position. This node never fails the run:
    /// an unknown tool name becomes a synthesized result message, and tool
    /// execution is infallible by contract.
    pub async fn run(&self, state: &AgentState) -> Vec<Message> {
        let Some(assistant) = state.last_assistant() else {
            return Vec::new();
        };

        let mut delta = Vec::with_capacity(assistant.tool_calls.len());
        for call in &assistant.tool_calls {
            let Some(tool) = self.tools.get(&call.name) else {
                warn!(tool = %call.name, "Requested tool is not registered");
                delta.push(Message::tool_result(
                    &call.id,
                    format!("Failed to execute. Error: Tool '{}' is not available.", call.name),
                ));
                continue;
            };

            let start = std::time::Instant::now();
            let outcome = tool.execute(call.arguments.clone()).await;
            debug!(
                tool = %call.name,
                call_id = %call.id,
                success = outcome.is_success(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Executed tool call"
            );

            delta.push(Message::tool_result(&call.id, outcome.into_text()));
        }
        delta
    }
}
