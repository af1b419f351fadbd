/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum RetryError {
    /// Request could not be materialized (URL parse, header assembly,
    /// transport construction). Never retried.
    #[error("request build error: {0}")]
    Build(String),
    /// Structured body could not be marshaled to JSON.
    #[error("body encode error: {0}")]
    Encode(serde_json::Error),
    /// Network or request execution error from `reqwest`, including
    /// per-attempt timeouts. Subject to the retry predicate.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Final response body could not be decoded into the bound target.
    #[error("decode error: {0}")]
    Decode(String),
    /// The request's cancellation token fired during a send or a backoff
    /// wait.
    #[error("request cancelled")]
    Cancelled,
}
