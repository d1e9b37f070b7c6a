//! Built-in tool implementations for marketmind.
//!
//! Three tools give the agent its capabilities:
//! - `wikipedia` — factual lookup via the MediaWiki API
//! - `python_repl` — code execution in a persistent interpreter session
//! - `stock_data` — per-ticker CSV retrieval with a day-window filter
//!
//! Every tool contains its own failures: `execute` always returns a
//! [`ToolOutcome`] whose text is folded into the conversation, so no tool
//! can abort a run.

pub mod python;
pub mod stock_data;
pub mod wikipedia;

use std::path::PathBuf;

use marketmind_core::tool::{ToolOutcome, ToolRegistry};

pub use python::PythonReplTool;
pub use stock_data::StockDataTool;
pub use wikipedia::WikipediaTool;

/// Create the default tool registry with all built-in tools.
///
/// The registry (and with it the Python session) is scoped to whoever holds
/// it — the CLI builds one per run, so interpreter state does not leak
/// across runs.
pub fn default_registry(data_dir: PathBuf, python_bin: impl Into<String>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(WikipediaTool::new());
    registry.register(PythonReplTool::new(python_bin));
    registry.register(StockDataTool::new(data_dir));
    registry
}

/// Pull a required string argument out of a tool's JSON arguments.
pub(crate) fn require_str<'a>(
    arguments: &'a serde_json::Value,
    key: &str,
) -> Result<&'a str, ToolOutcome> {
    arguments[key]
        .as_str()
        .ok_or_else(|| ToolOutcome::failure(format!("Missing '{key}' argument")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_all_three_tools() {
        let registry = default_registry(PathBuf::from("data"), "python3");
        assert_eq!(registry.names(), vec!["wikipedia", "python_repl", "stock_data"]);
    }

    #[test]
    fn require_str_reports_missing_argument() {
        let args = serde_json::json!({});
        let err = require_str(&args, "query").unwrap_err();
        assert!(err.text().contains("Missing 'query' argument"));
    }
}
