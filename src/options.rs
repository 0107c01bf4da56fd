/// Configures warehouse transport behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of session-open retries after the initial attempt.
    /// Only the open request is ever retried; statement requests are not.
    pub open_max_retries: usize,
    /// Base retry backoff in milliseconds (exponential strategy).
    pub retry_backoff_ms: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            open_max_retries: 0,
            retry_backoff_ms: 250,
        }
    }
}
