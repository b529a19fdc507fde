//! Async backend built on [`reqwest`] and a tokio runtime.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, debug_span, warn};

use super::{Backend, Method, REQUEST_TIMEOUT, Request};
use crate::error::{Error, Result};
use crate::response::map_response;

/// Executes requests as tasks on a tokio runtime.
///
/// `process_request` starts the request and returns at once; the returned
/// [`PendingResponse`] resolves exactly once with the mapped outcome.
#[derive(Debug, Clone)]
pub struct AsyncBackend {
    client: reqwest::Client,
    runtime: Handle,
}

impl AsyncBackend {
    /// A backend on the current tokio runtime with the standard 30 second timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] outside a tokio runtime.
    pub fn new() -> Result<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    /// A backend on the current tokio runtime with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] outside a tokio runtime or if the HTTP
    /// client cannot be built.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| Error::Configuration(format!("async backend needs a tokio runtime: {e}")))?;
        Self::with_runtime(runtime, timeout)
    }

    /// A backend that spawns onto an explicit runtime handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the HTTP client cannot be built.
    pub fn with_runtime(runtime: Handle, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("http client: {e}")))?;
        Ok(Self { client, runtime })
    }
}

impl Backend for AsyncBackend {
    type Response = PendingResponse;

    fn process_request(&self, request: Request) -> PendingResponse {
        let span = debug_span!("chatkit_request", method = %request.method, url = %request.url);
        let client = self.client.clone();
        let task = self.runtime.spawn(execute(client, request).instrument(span));
        PendingResponse {
            state: State::InFlight(task),
        }
    }

    fn reject(&self, error: Error) -> PendingResponse {
        PendingResponse {
            state: State::Ready(Some(error)),
        }
    }
}

async fn execute(client: reqwest::Client, request: Request) -> Result<Value> {
    let mut builder = client.request(to_reqwest(request.method), &request.url);
    for (name, value) in request.headers() {
        builder = builder.header(name, value);
    }
    if let Some(text) = request.body_text() {
        builder = builder.body(text);
    }

    debug!("sending request");
    let response = builder.send().await.map_err(transport_error)?;
    let status = response.status().as_u16();
    let body = response.text().await.map_err(transport_error)?;
    debug!(status, "response received");
    map_response(status, &body)
}

fn transport_error(e: reqwest::Error) -> Error {
    let timed_out = e.is_timeout();
    warn!(timed_out, error = %e, "request failed");
    Error::transport(e.to_string(), timed_out)
}

const fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Put => reqwest::Method::PUT,
        Method::Post => reqwest::Method::POST,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Handle to an in-flight request.
///
/// Await it for the mapped result. Dropping it detaches the request: the call
/// still completes on the runtime and its result is discarded.
#[derive(Debug)]
pub struct PendingResponse {
    state: State,
}

#[derive(Debug)]
enum State {
    Ready(Option<Error>),
    InFlight(JoinHandle<Result<Value>>),
}

impl PendingResponse {
    /// Whether the outcome is already available without polling the runtime.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        match &self.state {
            State::Ready(_) => true,
            State::InFlight(task) => task.is_finished(),
        }
    }
}

impl Future for PendingResponse {
    type Output = Result<Value>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.state {
            State::Ready(error) => Poll::Ready(Err(error.take().unwrap_or_else(|| {
                Error::transport("pending response polled after completion", false)
            }))),
            State::InFlight(task) => {
                let Poll::Ready(joined) = Pin::new(task).poll(cx) else {
                    return Poll::Pending;
                };
                // The join handle must not be polled again once it has yielded.
                this.state = State::Ready(None);
                Poll::Ready(joined.unwrap_or_else(|e| {
                    Err(Error::transport(format!("request task: {e}"), false))
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::token::TokenGenerator;

    #[tokio::test]
    async fn sends_headers_and_body() {
        let server = MockServer::start().await;
        let token = TokenGenerator::from_strings("v1:us1:i", "k:s")
            .unwrap()
            .generate(Some("alice"), false)
            .unwrap();
        Mock::given(method("PUT"))
            .and(path("/rooms/1"))
            .and(header("content-type", "application/json"))
            .and(header(
                "authorization",
                format!("Bearer {}", token.token).as_str(),
            ))
            .and(body_json(json!({"name": "general"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
            .expect(1)
            .mount(&server)
            .await;

        let backend = AsyncBackend::new().unwrap();
        let request = Request::new(Method::Put, format!("{}/rooms/1", server.uri()))
            .body(json!({"name": "general"}))
            .token(token);
        assert_eq!(backend.process_request(request).await.unwrap(), json!({"id": "1"}));
    }

    #[tokio::test]
    async fn status_errors_match_blocking_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
            .mount(&server)
            .await;

        let backend = AsyncBackend::new().unwrap();
        let err = backend
            .process_request(Request::new(Method::Get, server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadAuth(body) if body == "expired"));
    }

    #[tokio::test]
    async fn invalid_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let backend = AsyncBackend::new().unwrap();
        let err = backend
            .process_request(Request::new(Method::Get, server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[tokio::test]
    async fn timeout_resolves_handle_with_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{}")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let backend = AsyncBackend::with_timeout(Duration::from_millis(200)).unwrap();
        let pending = backend.process_request(Request::new(Method::Get, server.uri()));
        let outcome = tokio::time::timeout(Duration::from_secs(3), pending)
            .await
            .expect("handle must resolve");
        assert!(matches!(outcome, Err(Error::Transport { timed_out: true, .. })));
    }

    #[tokio::test]
    async fn dropped_handle_still_completes_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let backend = AsyncBackend::new().unwrap();
        drop(backend.process_request(Request::new(Method::Post, server.uri())));

        for _ in 0..50 {
            if !server.received_requests().await.unwrap_or_default().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejected_handle_is_immediately_ready() {
        let backend = AsyncBackend::new().unwrap();
        let pending = backend.reject(Error::InvalidArgument("empty id".into()));
        assert!(pending.is_finished());
        assert!(matches!(pending.await, Err(Error::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn polling_a_resolved_handle_again_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let backend = AsyncBackend::new().unwrap();
        let mut pending =
            backend.process_request(Request::new(Method::Get, format!("{}/x", server.uri())));
        assert_eq!((&mut pending).await.unwrap(), json!({"ok": true}));
        assert!(pending.is_finished());

        let again = std::future::poll_fn(|cx| Pin::new(&mut pending).poll(cx)).await;
        assert!(matches!(again, Err(Error::Transport { timed_out: false, .. })));
    }

    #[test]
    fn construction_outside_runtime_is_configuration_error() {
        assert!(matches!(AsyncBackend::new(), Err(Error::Configuration(_))));
    }
}
