//! Stock data tool — per-ticker CSV retrieval with a day-window filter.
//!
//! One CSV per ticker lives under the data directory (`AAPL.csv`, `MSFT.csv`,
//! ...), first column `Date` in `YYYY-MM-DD`, remaining columns opaque and
//! passed through into the rendered table. The ticker lookup is
//! case-insensitive. Two named failures keep their own sentinels: dataset
//! not available, and requested window exceeding the dataset's span.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use marketmind_core::error::ToolError;
use marketmind_core::tool::{Tool, ToolOutcome};
use tracing::debug;

pub struct StockDataTool {
    data_dir: PathBuf,
}

/// One parsed CSV: the header cells and the date-keyed rows, unsorted.
struct Dataset {
    header: Vec<String>,
    rows: Vec<(NaiveDate, Vec<String>)>,
}

impl Dataset {
    fn parse(raw: &str) -> Result<Self, ToolError> {
        let mut lines = raw.lines().filter(|l| !l.trim().is_empty());

        let header: Vec<String> = lines
            .next()
            .ok_or_else(|| ToolError::ExecutionFailed("Dataset is empty".into()))?
            .split(',')
            .map(|c| c.trim().to_string())
            .collect();

        if header.first().map(String::as_str) != Some("Date") {
            return Err(ToolError::ExecutionFailed(
                "Dataset must have 'Date' as its first column".into(),
            ));
        }

        let mut rows = Vec::new();
        for line in lines {
            let mut cells = line.split(',').map(|c| c.trim().to_string());
            let date_cell = cells.next().unwrap_or_default();
            let date = NaiveDate::parse_from_str(&date_cell, "%Y-%m-%d").map_err(|e| {
                ToolError::ExecutionFailed(format!("Invalid date '{date_cell}': {e}"))
            })?;
            rows.push((date, cells.collect()));
        }

        if rows.is_empty() {
            return Err(ToolError::ExecutionFailed("Dataset has no rows".into()));
        }

        Ok(Self { header, rows })
    }

    fn span_days(&self) -> i64 {
        let min = self.rows.iter().map(|(d, _)| *d).min().unwrap_or_default();
        let max = self.rows.iter().map(|(d, _)| *d).max().unwrap_or_default();
        (max - min).num_days()
    }

    fn max_date(&self) -> NaiveDate {
        self.rows.iter().map(|(d, _)| *d).max().unwrap_or_default()
    }
}

/// Render rows as a markdown table, dates ascending.
fn render_table(header: &[String], rows: &[(NaiveDate, Vec<String>)]) -> String {
    let mut sorted: Vec<_> = rows.to_vec();
    sorted.sort_by_key(|(date, _)| *date);

    let mut table = String::new();
    table.push_str(&format!("| {} |\n", header.join(" | ")));
    table.push_str(&format!(
        "|{}|\n",
        header.iter().map(|_| "---").collect::<Vec<_>>().join("|")
    ));
    for (date, cells) in &sorted {
        table.push_str(&format!("| {} | {} |\n", date, cells.join(" | ")));
    }
    table
}

impl StockDataTool {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    async fn retrieve(&self, ticker: &str, num_days: i64) -> Result<String, ToolError> {
        let path = self.data_dir.join(format!("{}.csv", ticker.to_uppercase()));
        if !path.exists() {
            return Err(ToolError::DataNotAvailable(ticker.to_string()));
        }

        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("Failed to read {}: {e}", path.display())))?;

        let dataset = Dataset::parse(&raw)?;

        if num_days > dataset.span_days() {
            return Err(ToolError::RangeExceeded);
        }

        let cutoff = dataset.max_date() - chrono::Duration::days(num_days);
        let filtered: Vec<_> = dataset
            .rows
            .iter()
            .filter(|(date, _)| *date > cutoff)
            .cloned()
            .collect();

        debug!(ticker = %ticker, num_days, rows = filtered.len(), "Retrieved stock data");

        Ok(format!(
            "Successfully executed the stock performance data retrieval tool to retrieve the last *{num_days} days* of data for company **{}**:\n\n{}",
            ticker.to_uppercase(),
            render_table(&dataset.header, &filtered)
        ))
    }
}

#[async_trait]
impl Tool for StockDataTool {
    fn name(&self) -> &str {
        "stock_data"
    }

    fn description(&self) -> &str {
        "Use this to look up stock performance data for companies from a local dataset (one CSV per ticker). You may need to convert company names into ticker symbols to call this, e.g. Apple Inc. -> AAPL, and to convert weeks, months, and years into days. Example tickers: AAPL, AMZN, META, MSFT, TSLA."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "company_ticker": {
                    "type": "string",
                    "description": "The ticker symbol of the company to retrieve stock performance data"
                },
                "num_days": {
                    "type": "integer",
                    "description": "Number of days of stock data required"
                }
            },
            "required": ["company_ticker", "num_days"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolOutcome {
        let ticker = match crate::require_str(&arguments, "company_ticker") {
            Ok(ticker) => ticker,
            Err(outcome) => return outcome,
        };
        let Some(num_days) = arguments["num_days"].as_i64() else {
            return ToolOutcome::failure("Missing or non-integer 'num_days' argument");
        };

        match self.retrieve(ticker, num_days).await {
            Ok(text) => ToolOutcome::Success(text),
            // The named failures are sentinels matched verbatim downstream.
            Err(e @ (ToolError::DataNotAvailable(_) | ToolError::RangeExceeded)) => {
                ToolOutcome::failure_sentinel(e.to_string())
            }
            Err(e) => ToolOutcome::failure(e),
        }
    }
}
