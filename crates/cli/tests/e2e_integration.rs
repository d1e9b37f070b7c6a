//! End-to-end integration tests for the marketmind agent.
//!
//! These drive the full state machine with a scripted provider and the real
//! tool implementations: stock retrieval over a temp CSV fixture and the
//! Wikipedia tool against a local canned HTTP backend.

use std::io::Write;
use std::sync::Arc;

use marketmind_agent::AgentMachine;
use marketmind_core::error::ProviderError;
use marketmind_core::message::{Message, Role, ToolCallRequest};
use marketmind_core::provider::{Provider, ProviderRequest, ProviderResponse};
use marketmind_core::tool::ToolRegistry;
use marketmind_tools::{StockDataTool, WikipediaTool};

// ── Mock Provider ────────────────────────────────────────────────────────

/// A provider that always answers with the same scripted assistant message.
struct ScriptedProvider {
    message: Message,
}

impl ScriptedProvider {
    fn tool_call(name: &str, arguments: serde_json::Value) -> Self {
        Self {
            message: Message::assistant("").with_tool_calls(vec![ToolCallRequest::new(
                "call_1", name, arguments,
            )]),
        }
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        // The reasoning node must bind the registry's schemas.
        assert!(!request.tools.is_empty(), "tool schemas not bound");
        Ok(ProviderResponse {
            message: self.message.clone(),
            usage: None,
            model: "e2e-model".into(),
        })
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────

/// Six consecutive days of AAPL data (span = 5 days, latest 2024-03-06).
const AAPL_CSV: &str = "\
Date,Open,Close
2024-03-01,170.0,171.2
2024-03-02,171.2,172.8
2024-03-03,172.8,171.9
2024-03-04,171.9,173.5
2024-03-05,173.5,174.1
2024-03-06,174.1,175.0
";

fn stock_fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let mut file = std::fs::File::create(dir.path().join("AAPL.csv")).unwrap();
    file.write_all(AAPL_CSV.as_bytes()).unwrap();
    dir
}

fn stock_registry(dir: &tempfile::TempDir) -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(StockDataTool::new(dir.path()));
    Arc::new(registry)
}

/// Serve the given JSON bodies to successive HTTP requests on a local port.
///
/// The n-th connection gets `bodies[n]`; once the list is exhausted the last
/// body is repeated. `Connection: close` forces the client onto a fresh
/// connection per request, so bodies line up with requests one-to-one.
async fn canned_json_server(bodies: &'static [&'static str]) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut served = 0usize;
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let body = bodies[served.min(bodies.len() - 1)];
            served += 1;
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            // Read until the end of the request headers.
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
        }
    });

    format!("http://{addr}/w/api.php")
}

// ── Scenarios ────────────────────────────────────────────────────────────

#[tokio::test]
async fn stock_query_yields_windowed_table() {
    let dir = stock_fixture();
    let provider = Arc::new(ScriptedProvider::tool_call(
        "stock_data",
        serde_json::json!({"company_ticker": "AAPL", "num_days": 4}),
    ));
    let machine = AgentMachine::new(provider, "e2e-model", 0.0, stock_registry(&dir));

    let state = machine
        .run(Message::user("stock performance of last 4 days for AAPL"))
        .await
        .unwrap();

    let roles: Vec<Role> = state.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::Tool]);

    let result = &state.messages[2];
    assert_eq!(result.tool_call_id.as_deref(), Some("call_1"));
    // Every row's date is within the last 4 available days.
    for in_window in ["2024-03-03", "2024-03-04", "2024-03-05", "2024-03-06"] {
        assert!(result.content.contains(in_window), "missing {in_window}");
    }
    for out_of_window in ["2024-03-01", "2024-03-02"] {
        assert!(!result.content.contains(out_of_window), "unexpected {out_of_window}");
    }
}

#[tokio::test]
async fn unknown_ticker_reaches_end_with_sentinel() {
    let dir = stock_fixture();
    let provider = Arc::new(ScriptedProvider::tool_call(
        "stock_data",
        serde_json::json!({"company_ticker": "ZZZZ", "num_days": 2}),
    ));
    let machine = AgentMachine::new(provider, "e2e-model", 0.0, stock_registry(&dir));

    let state = machine.run(Message::user("how is ZZZZ doing?")).await.unwrap();

    assert_eq!(state.messages.len(), 3);
    assert_eq!(
        state.messages[2].content,
        "Sorry, but data for company ZZZZ is not available. Try Apple, Amazon, Meta, Microsoft, Tesla."
    );
}

#[tokio::test]
async fn wikipedia_zero_hits_yields_no_results_sentinel() {
    // opensearch response with an empty title list
    let api_url = canned_json_server(&[r#"["xyzzyplugh",[],[],[]]"#]).await;

    let mut registry = ToolRegistry::new();
    registry.register(WikipediaTool::with_api_url(api_url));

    let provider = Arc::new(ScriptedProvider::tool_call(
        "wikipedia",
        serde_json::json!({"query": "xyzzyplugh"}),
    ));
    let machine = AgentMachine::new(provider, "e2e-model", 0.0, Arc::new(registry));

    let state = machine
        .run(Message::user("what is xyzzyplugh?"))
        .await
        .unwrap();

    assert_eq!(state.messages.len(), 3);
    assert_eq!(state.messages[2].content, "No results found on Wikipedia.");
}

#[tokio::test]
async fn wikipedia_hit_yields_summary_message() {
    // First request: opensearch with one title hit. Second: the extract.
    let api_url = canned_json_server(&[
        r#"["apple",["Apple Inc."],[""],["https://en.wikipedia.org/wiki/Apple_Inc."]]"#,
        r#"{"query":{"pages":{"856":{"pageid":856,"title":"Apple Inc.","extract":"Apple Inc. is an American technology company."}}}}"#,
    ])
    .await;

    let mut registry = ToolRegistry::new();
    registry.register(WikipediaTool::with_api_url(api_url));

    let provider = Arc::new(ScriptedProvider::tool_call(
        "wikipedia",
        serde_json::json!({"query": "apple"}),
    ));
    let machine = AgentMachine::new(provider, "e2e-model", 0.0, Arc::new(registry));

    let state = machine.run(Message::user("what is Apple?")).await.unwrap();

    let roles: Vec<Role> = state.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::Tool]);

    let result = &state.messages[2];
    assert_eq!(result.tool_call_id.as_deref(), Some("call_1"));
    assert!(
        result.content.starts_with("Successfully executed:\nWikipedia summary: "),
        "unexpected framing: {}",
        result.content
    );
    assert!(result.content.contains("Apple Inc. is an American technology company."));
}

#[tokio::test]
async fn text_only_answer_produces_no_tool_messages() {
    let dir = stock_fixture();
    let provider = Arc::new(ScriptedProvider {
        message: Message::assistant("Apple is a company."),
    });
    let machine = AgentMachine::new(provider, "e2e-model", 0.0, stock_registry(&dir));

    let state = machine.run(Message::user("tell me about Apple")).await.unwrap();
    let roles: Vec<Role> = state.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant]);
}
