//! Tool trait — the abstraction over agent capabilities.
//!
//! Tools are what give the agent the ability to act in the world: look up
//! Wikipedia, run Python code, read stock data. The contract is uniform:
//! a tool's result is always text, success or failure alike, and is always
//! folded into the conversation rather than aborting the run. [`ToolOutcome`]
//! makes that containment a type-level invariant — `execute` cannot fail.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::provider::ToolDefinition;

/// The outcome of a tool execution.
///
/// Both variants carry human-readable text destined for a tool-result
/// message. Failures render with a distinct prefix unless the tool supplied
/// its own sentinel text (see [`ToolOutcome::failure_sentinel`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    Success(String),
    Failure(String),
}

impl ToolOutcome {
    /// A failure rendered with the uniform `Failed to execute.` prefix.
    pub fn failure(description: impl std::fmt::Display) -> Self {
        Self::Failure(format!("Failed to execute. Error: {description}"))
    }

    /// A failure whose text is a sentinel matched verbatim downstream
    /// (e.g. "No results found on Wikipedia."). No prefix is added.
    pub fn failure_sentinel(text: impl Into<String>) -> Self {
        Self::Failure(text.into())
    }

    /// The text to fold into the conversation, success or failure alike.
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// The core Tool trait.
///
/// Each tool (wikipedia, python_repl, stock_data) implements this trait.
/// Tools are registered in the [`ToolRegistry`] and made available to the
/// reasoning step via their definitions. `execute` must never panic or
/// propagate an error: any internal failure is converted into a
/// [`ToolOutcome::Failure`].
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "stock_data").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, arguments: serde_json::Value) -> ToolOutcome;

    /// Convert this tool into a ToolDefinition for sending to the LLM.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools.
///
/// Built once per run from the declared tool set. The action node uses it to:
/// 1. Look up tools by exact name when the LLM requests them
/// 2. Get tool definitions to bind to the reasoning step
///
/// An unknown name is a dispatch error handled by the caller — it is never
/// passed to any tool's `execute`.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name().to_string();
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name, Arc::new(tool));
    }

    /// Resolve a tool by exact name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// All tool definitions, in registration order (for sending to the LLM).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| t.definition())
            .collect()
    }

    /// All registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" }
                },
                "required": ["text"]
            })
        }
        async fn execute(&self, arguments: serde_json::Value) -> ToolOutcome {
            match arguments["text"].as_str() {
                Some(text) => ToolOutcome::Success(text.to_string()),
                None => ToolOutcome::failure("Missing 'text' argument"),
            }
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn registry_definitions_in_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);
        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
        assert_eq!(registry.names(), vec!["echo"]);
    }

    #[tokio::test]
    async fn execute_success_carries_text() {
        let tool = EchoTool;
        let outcome = tool.execute(serde_json::json!({"text": "hello"})).await;
        assert!(outcome.is_success());
        assert_eq!(outcome.text(), "hello");
    }

    #[tokio::test]
    async fn execute_failure_is_contained_text() {
        let tool = EchoTool;
        let outcome = tool.execute(serde_json::json!({})).await;
        assert!(!outcome.is_success());
        assert!(outcome.text().starts_with("Failed to execute. Error:"));
    }

    #[test]
    fn failure_sentinel_has_no_prefix() {
        let outcome = ToolOutcome::failure_sentinel("No results found on Wikipedia.");
        assert_eq!(outcome.text(), "No results found on Wikipedia.");
    }
}
