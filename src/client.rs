use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::{backoff, decode, ClientOptions, Request, Response, Result, RetryError};

/// Retry-driving HTTP client.
///
/// Holds only configuration and the transport handle; attempt state lives
/// inside each [`RetryClient::execute`] call, so one instance can be
/// cloned and shared across tasks.
#[derive(Clone, Debug)]
pub struct RetryClient {
    http: reqwest::Client,
    options: ClientOptions,
}

impl RetryClient {
    /// Creates a client with default options and a fresh transport.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            options: ClientOptions::default(),
        }
    }

    /// Applies client options such as attempt count and backoff bounds.
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the underlying transport.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Rebuilds the transport trusting an additional root certificate.
    pub fn with_tls_certificate(mut self, certificate: reqwest::Certificate) -> Result<Self> {
        self.http = reqwest::Client::builder()
            .add_root_certificate(certificate)
            .build()
            .map_err(|err| RetryError::Build(format!("tls client build failed: {err}")))?;
        Ok(self)
    }

    /// Drives the attempt loop for one request.
    ///
    /// At most `options.attempts` sends are performed. Between attempts
    /// the jittered backoff sleep races the request's cancellation token;
    /// the token winning surfaces [`RetryError::Cancelled`] instead of a
    /// stale earlier response. After the loop the final response body is
    /// decoded into the bound target and post-receive hooks run in order.
    pub async fn execute(&self, mut request: Request<'_>) -> Result<Response> {
        let attempts = self.options.attempts.max(1);
        let cancel = request.cancellation().clone();

        let mut attempt = 0u32;
        let mut held: Option<Response> = None;
        let mut last_error: Option<RetryError> = None;

        loop {
            // Construction failures abort the call; they are never retried.
            let transport_request = request.materialize(self.options.timeout)?;

            match self.send(transport_request, &cancel).await {
                Ok(response) => {
                    held = Some(response);
                    last_error = None;
                }
                Err(RetryError::Cancelled) => return Err(RetryError::Cancelled),
                Err(err) => {
                    held = None;
                    last_error = Some(err);
                }
            }

            attempt += 1;
            if !request.should_retry(held.as_ref(), last_error.as_ref()) || attempt >= attempts {
                break;
            }

            let wait = backoff::compute_wait(&self.options, attempt);
            #[cfg(feature = "tracing")]
            tracing::debug!(
                attempt,
                wait_ms = wait.as_millis() as u64,
                "retrying after backoff"
            );

            tokio::select! {
                _ = sleep(wait) => {}
                _ = cancel.cancelled() => return Err(RetryError::Cancelled),
            }
        }

        let Some(response) = held else {
            // The loop runs at least once, so a missing response always
            // carries the attempt's transport error.
            return Err(last_error
                .unwrap_or_else(|| RetryError::Build("no attempt was performed".to_owned())));
        };

        if let Some(target) = request.take_bind() {
            // Decode failure discards the otherwise-successful response.
            decode::decode_into(response.body(), target)?;
        }

        request.run_post_hooks(&response);
        Ok(response)
    }

    async fn send(
        &self,
        transport_request: reqwest::Request,
        cancel: &CancellationToken,
    ) -> Result<Response> {
        tokio::select! {
            outcome = self.http.execute(transport_request) => {
                let response = outcome.map_err(RetryError::Transport)?;
                Response::from_reqwest(response).await
            }
            _ = cancel.cancelled() => Err(RetryError::Cancelled),
        }
    }
}

impl Default for RetryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::RetryClient;
    use crate::ClientOptions;

    #[test]
    fn default_options_are_applied() {
        let client = RetryClient::new();
        assert_eq!(client.options, ClientOptions::default());
        assert_eq!(client.options.attempts, 1);
        assert_eq!(client.options.base_wait, Duration::from_millis(1000));
    }

    #[test]
    fn with_options_overrides_defaults() {
        let options = ClientOptions {
            attempts: 3,
            base_wait: Duration::from_millis(10),
            max_wait: Duration::from_millis(100),
            timeout: Duration::from_secs(5),
        };
        let client = RetryClient::new().with_options(options.clone());
        assert_eq!(client.options, options);
    }
}
