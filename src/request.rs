use std::fmt;
use std::time::Duration;

use reqwest::{Method, Url};
use tokio_util::sync::CancellationToken;

use crate::{
    body::Body,
    decode::DecodeTarget,
    params::{self, Field, ParamSource},
    Response, Result, RetryError,
};

const HTTP_SCHEME: &str = "http://";
const HTTPS_SCHEME: &str = "https://";

/// Caller-supplied decision on whether a completed attempt warrants
/// another one.
pub type RetryPredicate<'a> =
    Box<dyn Fn(Option<&Response>, Option<&RetryError>) -> bool + Send + Sync + 'a>;

type RequestHook<'a> = Box<dyn Fn(&mut reqwest::Request) + Send + Sync + 'a>;
type ResponseHook<'a> = Box<dyn FnMut(&Response) + Send + 'a>;

/// Description of one logical request: method, URL, header/query sources,
/// body, retry predicate, cancellation token, hooks and the decode target.
///
/// Built through chained setters and then consumed by
/// [`RetryClient::execute`](crate::RetryClient::execute); headers, query
/// and body are re-encoded fresh for every attempt.
pub struct Request<'a> {
    method: Method,
    url: String,
    body: Option<Body>,
    header_fields: Vec<Field>,
    query_fields: Vec<Field>,
    retry: Option<RetryPredicate<'a>>,
    cancel: CancellationToken,
    timeout: Option<Duration>,
    pre_hooks: Vec<RequestHook<'a>>,
    post_hooks: Vec<ResponseHook<'a>>,
    bind: Option<DecodeTarget<'a>>,
}

impl<'a> Request<'a> {
    /// Describes a request, prefixing `http://` when the URL carries no
    /// scheme.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self::with_scheme(method, url.into(), HTTP_SCHEME)
    }

    /// Describes a request, prefixing `https://` when the URL carries no
    /// scheme.
    pub fn new_tls(method: Method, url: impl Into<String>) -> Self {
        Self::with_scheme(method, url.into(), HTTPS_SCHEME)
    }

    fn with_scheme(method: Method, url: String, scheme: &str) -> Self {
        let url = if url.contains("://") {
            url
        } else {
            format!("{scheme}{url}")
        };

        Self {
            method,
            url,
            body: None,
            header_fields: Vec::new(),
            query_fields: Vec::new(),
            retry: None,
            cancel: CancellationToken::new(),
            timeout: None,
            pre_hooks: Vec::new(),
            post_hooks: Vec::new(),
            bind: None,
        }
    }

    /// Attaches a cancellation token; firing it aborts the in-flight send
    /// and any backoff wait.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Projects `source` into request headers.
    pub fn with_headers(mut self, source: &impl ParamSource) -> Self {
        self.header_fields = source.fields();
        self
    }

    /// Projects `source` into URL query parameters.
    pub fn with_query(mut self, source: &impl ParamSource) -> Self {
        self.query_fields = source.fields();
        self
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Overrides the per-attempt timeout for this request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Binds the target the final response body is decoded into.
    pub fn bind(mut self, target: DecodeTarget<'a>) -> Self {
        self.bind = Some(target);
        self
    }

    /// Sets the retry predicate. Without one, no attempt is ever retried.
    pub fn with_retry<F>(mut self, predicate: F) -> Self
    where
        F: Fn(Option<&Response>, Option<&RetryError>) -> bool + Send + Sync + 'a,
    {
        self.retry = Some(Box::new(predicate));
        self
    }

    /// Registers a pre-send mutator, run on every materialized attempt.
    pub fn on_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut reqwest::Request) + Send + Sync + 'a,
    {
        self.pre_hooks.push(Box::new(hook));
        self
    }

    /// Registers a post-receive hook, run once on the final response after
    /// decoding.
    pub fn on_response<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&Response) + Send + 'a,
    {
        self.post_hooks.push(Box::new(hook));
        self
    }

    pub(crate) fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub(crate) fn should_retry(
        &self,
        response: Option<&Response>,
        error: Option<&RetryError>,
    ) -> bool {
        self.retry
            .as_ref()
            .is_some_and(|predicate| predicate(response, error))
    }

    pub(crate) fn take_bind(&mut self) -> Option<DecodeTarget<'a>> {
        self.bind.take()
    }

    pub(crate) fn run_post_hooks(&mut self, response: &Response) {
        for hook in &mut self.post_hooks {
            hook(response);
        }
    }

    /// Materializes one transport-level request.
    pub(crate) fn materialize(&self, default_timeout: Duration) -> Result<reqwest::Request> {
        let mut url = Url::parse(&self.url)
            .map_err(|err| RetryError::Build(format!("invalid url '{}': {err}", self.url)))?;

        if !self.query_fields.is_empty() {
            let mut pairs: Vec<(String, String)> = Vec::new();
            params::emit(&self.query_fields, &mut pairs)?;
            let mut serializer = url.query_pairs_mut();
            for (name, value) in &pairs {
                serializer.append_pair(name, value);
            }
        }

        let mut request = reqwest::Request::new(self.method.clone(), url);
        params::emit(&self.header_fields, request.headers_mut())?;

        if let Some(body) = &self.body {
            *request.body_mut() = Some(body.to_bytes()?.into());
        }

        *request.timeout_mut() = Some(self.timeout.unwrap_or(default_timeout));

        for hook in &self.pre_hooks {
            hook(&mut request);
        }

        Ok(request)
    }
}

impl fmt::Debug for Request<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("has_retry", &self.retry.is_some())
            .finish()
    }
}

/// Default retry predicate: retry on a transport error, on a missing
/// response, or on a status outside `[200, 300)`.
pub fn default_retry(response: Option<&Response>, error: Option<&RetryError>) -> bool {
    if error.is_some() {
        return true;
    }

    let Some(response) = response else {
        return true;
    };

    let status = response.status().as_u16();
    status < 200 || status >= 300
}
