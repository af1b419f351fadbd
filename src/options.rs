use std::time::Duration;

/// Configures attempt count, backoff bounds and the per-attempt timeout.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Total number of attempts, including the first. Values below 1 are
    /// treated as 1.
    pub attempts: u32,
    /// Base backoff interval; doubled for each further attempt before
    /// jitter is applied.
    pub base_wait: Duration,
    /// Ceiling on the backoff interval. Zero disables the clamp.
    pub max_wait: Duration,
    /// Timeout handed to the transport for each attempt. A request-level
    /// timeout takes precedence.
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            attempts: 1,
            base_wait: Duration::from_millis(1000),
            max_wait: Duration::from_secs(30),
            timeout: Duration::from_secs(1),
        }
    }
}
