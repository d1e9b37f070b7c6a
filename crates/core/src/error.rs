//! Error types for the marketmind domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Each bounded context has
//! its own error enum; the propagation policy is asymmetric by design:
//! anything originating inside a tool is contained at the tool boundary and
//! surfaced as conversation text, while a provider failure is fatal to the
//! run and propagates out of the state machine.

use thiserror::Error;

/// The top-level error type for all marketmind operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure of the external language-model call. Fatal: there is no
    /// fallback reasoning path, so this aborts the run.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures that can arise inside a tool's `execute`.
///
/// These never cross the tool boundary as errors: each tool converts them to
/// failure text via [`crate::tool::ToolOutcome`]. The named variants exist so
/// the stock tool's sentinels stay distinct from generic failures.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Sorry, but data for company {0} is not available. Try Apple, Amazon, Meta, Microsoft, Tesla.")]
    DataNotAvailable(String),

    #[error("Sorry, but this time period exceeds the data available. Please reduce it to continue.")]
    RangeExceeded,

    #[error("{0}")]
    ExecutionFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn data_not_available_names_the_ticker() {
        let err = ToolError::DataNotAvailable("ZZZZ".into());
        let msg = err.to_string();
        assert!(msg.contains("ZZZZ"));
        assert!(msg.contains("not available"));
    }

    #[test]
    fn range_exceeded_is_distinct_from_not_available() {
        let range = ToolError::RangeExceeded.to_string();
        let missing = ToolError::DataNotAvailable("AAPL".into()).to_string();
        assert_ne!(range, missing);
        assert!(range.contains("exceeds the data available"));
    }
}
