//! Wikipedia tool — factual lookup via the MediaWiki API.
//!
//! Two-step lookup: an opensearch query for candidate titles, then a
//! plain-text intro extract for the top hit, limited to eight sentences and
//! following exactly one redirect. No retries. Zero candidates is a named
//! failure (`No results found on Wikipedia.`), distinct from transport or
//! parse failures which get the generic `Failed to execute.` prefix.

use async_trait::async_trait;
use marketmind_core::tool::{Tool, ToolOutcome};
use tracing::debug;

const NO_RESULTS: &str = "No results found on Wikipedia.";
const SUMMARY_SENTENCES: u32 = 8;

pub struct WikipediaTool {
    client: reqwest::Client,
    api_url: String,
}

impl Default for WikipediaTool {
    fn default() -> Self {
        Self::new()
    }
}

impl WikipediaTool {
    pub fn new() -> Self {
        Self::with_api_url("https://en.wikipedia.org/w/api.php")
    }

    /// Point the tool at a different MediaWiki endpoint (used in tests).
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, String> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "opensearch"),
                ("search", query),
                ("limit", "5"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let body: serde_json::Value = response.json().await.map_err(|e| e.to_string())?;
        Ok(parse_search_titles(&body))
    }

    async fn fetch_summary(&self, title: &str) -> Result<Option<String>, String> {
        let sentences = SUMMARY_SENTENCES.to_string();
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("exsentences", sentences.as_str()),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let body: serde_json::Value = response.json().await.map_err(|e| e.to_string())?;
        Ok(parse_extract(&body))
    }
}

/// The opensearch response shape is `[query, [titles], [descriptions], [urls]]`.
fn parse_search_titles(body: &serde_json::Value) -> Vec<String> {
    body.get(1)
        .and_then(|titles| titles.as_array())
        .map(|titles| {
            titles
                .iter()
                .filter_map(|t| t.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Pull the extract text out of a `query.pages.<pageid>.extract` response.
fn parse_extract(body: &serde_json::Value) -> Option<String> {
    let pages = body.get("query")?.get("pages")?.as_object()?;
    let page = pages.values().next()?;
    let extract = page.get("extract")?.as_str()?;
    if extract.is_empty() {
        None
    } else {
        Some(extract.to_string())
    }
}

#[async_trait]
impl Tool for WikipediaTool {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn description(&self) -> &str {
        "Use this to search Wikipedia for factual information. Returns a short summary of the best-matching article."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The Wikipedia search to execute to find key summary information"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolOutcome {
        let query = match crate::require_str(&arguments, "query") {
            Ok(query) => query,
            Err(outcome) => return outcome,
        };

        debug!(query = %query, "Searching Wikipedia");

        let titles = match self.search(query).await {
            Ok(titles) => titles,
            Err(e) => return ToolOutcome::failure(e),
        };

        let Some(title) = titles.first() else {
            return ToolOutcome::failure_sentinel(NO_RESULTS);
        };

        match self.fetch_summary(title).await {
            Ok(Some(summary)) => {
                ToolOutcome::Success(format!("Successfully executed:\nWikipedia summary: {summary}"))
            }
            Ok(None) => ToolOutcome::failure(format!("No summary available for page '{title}'")),
            Err(e) => ToolOutcome::failure(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_search_titles_takes_second_element() {
        let body = serde_json::json!([
            "apple",
            ["Apple Inc.", "Apple"],
            ["desc one", "desc two"],
            ["https://en.wikipedia.org/wiki/Apple_Inc."]
        ]);
        let titles = parse_search_titles(&body);
        assert_eq!(titles, vec!["Apple Inc.", "Apple"]);
    }

    #[test]
    fn parse_search_titles_empty_results() {
        let body = serde_json::json!(["zzzzqqqq", [], [], []]);
        assert!(parse_search_titles(&body).is_empty());
    }

    #[test]
    fn parse_extract_reads_first_page() {
        let body = serde_json::json!({
            "query": {
                "pages": {
                    "856": { "pageid": 856, "title": "Apple Inc.", "extract": "Apple Inc. is an American company." }
                }
            }
        });
        assert_eq!(
            parse_extract(&body).as_deref(),
            Some("Apple Inc. is an American company.")
        );
    }

    #[test]
    fn parse_extract_missing_or_empty_is_none() {
        assert!(parse_extract(&serde_json::json!({})).is_none());

        let empty = serde_json::json!({
            "query": { "pages": { "1": { "extract": "" } } }
        });
        assert!(parse_extract(&empty).is_none());
    }

    #[tokio::test]
    async fn missing_query_is_contained() {
        let tool = WikipediaTool::new();
        let outcome = tool.execute(serde_json::json!({})).await;
        assert!(!outcome.is_success());
        assert!(outcome.text().starts_with("Failed to execute. Error:"));
    }

    #[tokio::test]
    async fn unreachable_backend_is_contained() {
        // Nothing listens here; the transport error must surface as failure
        // text, never as a panic or propagated error.
        let tool = WikipediaTool::with_api_url("http://127.0.0.1:9/w/api.php");
        let outcome = tool.execute(serde_json::json!({"query": "rust"})).await;
        assert!(!outcome.is_success());
        assert!(outcome.text().starts_with("Failed to execute. Error:"));
    }
}
