//! `marketmind run` — one agent turn over a user message.

use std::path::PathBuf;
use std::sync::Arc;

use marketmind_agent::AgentMachine;
use marketmind_config::AppConfig;
use marketmind_core::message::{Message, Role};
use marketmind_providers::OpenAiCompatProvider;

pub async fn run(message: String, data_dir: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for the API key early — give a clear error
    let Some(api_key) = config.api_key.clone() else {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set the OPENAI_API_KEY environment variable, or add");
        eprintln!("  `api_key = \"sk-...\"` to marketmind.toml.");
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    };

    let provider = Arc::new(OpenAiCompatProvider::new(
        "openai",
        &config.base_url,
        api_key,
    ));

    // The registry (and the Python session inside it) lives for this run only.
    let data_dir = data_dir.unwrap_or_else(|| config.data_dir.clone());
    let tools = Arc::new(marketmind_tools::default_registry(
        data_dir,
        config.python_bin.clone(),
    ));

    let mut machine = AgentMachine::new(provider, &config.model, config.temperature, tools);
    if let Some(max_tokens) = config.max_tokens {
        machine = machine.with_max_tokens(max_tokens);
    }

    let state = machine.run(Message::user(message)).await?;

    for msg in &state.messages {
        let role = match msg.role {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Tool => "tool",
        };
        if msg.content.is_empty() && !msg.tool_calls.is_empty() {
            let names: Vec<&str> = msg.tool_calls.iter().map(|c| c.name.as_str()).collect();
            println!("[{role}] (requested tools: {})", names.join(", "));
        } else {
            println!("[{role}] {}", msg.content);
        }
    }

    Ok(())
}
