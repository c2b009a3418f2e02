use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Transport-timeout class failure. Never retried.
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("metric set fetch failed: {0}")]
    Fetch(String),

    #[error("unsupported metric set: {0}")]
    UnsupportedMetricSet(String),

    #[error("invalid time input `{input}`: expected format {expected}")]
    InvalidTimeInput {
        input: String,
        expected: &'static str,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ReportError {
    /// True for the one error class the retry loop must not swallow.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ReportError::Timeout(_))
    }
}

/// Helper for mapping any collaborator error into a retryable fetch error
pub fn fetch_error<E: ToString>(err: E) -> ReportError {
    ReportError::Fetch(err.to_string())
}
