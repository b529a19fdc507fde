//! Blocking backend built on [`ureq`].

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};
use ureq::{Agent, RequestBuilder};

use super::{Backend, Method, REQUEST_TIMEOUT, Request};
use crate::error::{Error, Result};
use crate::response::map_response;

/// Executes requests on the calling thread.
///
/// The underlying agent is shared by all calls; each call builds its own
/// headers, body and token.
#[derive(Debug, Clone)]
pub struct BlockingBackend {
    agent: Agent,
}

impl BlockingBackend {
    /// A backend with the standard 30 second timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    /// A backend with a custom whole-request timeout.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: Agent::new_with_config(config),
        }
    }

    fn send(&self, request: &Request) -> std::result::Result<(u16, String), ureq::Error> {
        let body = request.body_text();
        let result = match request.method {
            Method::Get => send_without_body(self.agent.get(&request.url), request, body),
            Method::Delete => send_without_body(self.agent.delete(&request.url), request, body),
            Method::Post => send_with_body(self.agent.post(&request.url), request, body),
            Method::Put => send_with_body(self.agent.put(&request.url), request, body),
        };
        let mut response = result?;
        let status = response.status().as_u16();
        // No size cap, matching the async backend.
        let text = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_string()?;
        Ok((status, text))
    }
}

impl Default for BlockingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for BlockingBackend {
    type Response = Result<Value>;

    fn process_request(&self, request: Request) -> Result<Value> {
        debug!(method = %request.method, url = %request.url, "sending request");
        match self.send(&request) {
            Ok((status, body)) => {
                debug!(status, url = %request.url, "response received");
                map_response(status, &body)
            }
            Err(e) => {
                let timed_out = matches!(e, ureq::Error::Timeout(_));
                warn!(url = %request.url, timed_out, error = %e, "request failed");
                Err(Error::transport(e.to_string(), timed_out))
            }
        }
    }

    fn reject(&self, error: Error) -> Result<Value> {
        Err(error)
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, request: &Request) -> RequestBuilder<B> {
    for (name, value) in request.headers() {
        builder = builder.header(name, value);
    }
    builder
}

type UreqResult = std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error>;

fn send_without_body(
    builder: RequestBuilder<ureq::typestate::WithoutBody>,
    request: &Request,
    body: Option<String>,
) -> UreqResult {
    let builder = with_headers(builder, request);
    match body {
        // The platform takes DELETE bodies for role removal.
        Some(text) => builder.force_send_body().send(text),
        None => builder.call(),
    }
}

fn send_with_body(
    builder: RequestBuilder<ureq::typestate::WithBody>,
    request: &Request,
    body: Option<String>,
) -> UreqResult {
    let builder = with_headers(builder, request);
    match body {
        Some(text) => builder.send(text),
        None => builder.send_empty(),
    }
}
