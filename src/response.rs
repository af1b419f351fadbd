use std::fmt;

use reqwest::{header::HeaderMap, StatusCode, Url};

use crate::{Result, RetryError};

/// Fully-buffered snapshot of one HTTP response.
///
/// The body is drained into memory when the snapshot is taken, so the
/// retry predicate, the decoder and post-receive hooks each see the
/// complete content regardless of prior reads.
#[derive(Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    body: Vec<u8>,
}

impl Response {
    pub(crate) fn new(status: StatusCode, headers: HeaderMap, url: Url, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            url,
            body,
        }
    }

    pub(crate) async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let body = response
            .bytes()
            .await
            .map_err(RetryError::Transport)?
            .to_vec();

        Ok(Self::new(status, headers, url, body))
    }

    /// Response status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Final URL of the exchange.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Complete response body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("url", &self.url.as_str())
            .field("body_len", &self.body.len())
            .finish()
    }
}
