use std::time::Duration;

/// Configures HTTP timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Retry backoff step in milliseconds (linear strategy: step × attempt).
    pub retry_backoff_ms: u64,
    /// Wraps `search_by_upload` in the retry executor as well.
    ///
    /// Off by default: only upload, delete and status calls are retried.
    pub retry_search: bool,
}

impl ClientOptions {
    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            max_retries: 2,
            retry_backoff_ms: 500,
            retry_search: false,
        }
    }
}
