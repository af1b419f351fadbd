//! `retry-http` is a resilient HTTP request layer on top of `reqwest`.
//!
//! A [`Request`] describes one logical call: method, URL, header and query
//! sources, body, retry predicate, cancellation token and a decode target.
//! [`RetryClient::execute`] drives the attempt loop, sleeping a jittered
//! exponential backoff between attempts and decoding the final response
//! into the caller's bound target.

mod backoff;
mod body;
mod client;
mod decode;
mod error;
mod options;
mod params;
mod request;
mod response;

pub use body::Body;
pub use client::RetryClient;
pub use decode::DecodeTarget;
pub use error::RetryError;
pub use options::ClientOptions;
pub use params::{Field, FieldValue, ParamSink, ParamSource};
pub use request::{default_retry, Request, RetryPredicate};
pub use response::Response;

// Re-exported so callers can name methods, statuses and tokens without
// pinning their own copies of the underlying crates.
pub use reqwest::{Method, StatusCode};
pub use tokio_util::sync::CancellationToken;

pub type Result<T> = std::result::Result<T, RetryError>;
