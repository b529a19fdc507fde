//! Pluggable HTTP backends.
//!
//! A [`Backend`] performs exactly one request/response cycle and hands the raw
//! status and body to [`map_response`](crate::response::map_response), so
//! classification is identical whichever backend runs the call.
//!
//! - [`BlockingBackend`] (feature `blocking`) runs on the calling thread.
//! - [`AsyncBackend`] (feature `async`) spawns the request on a tokio runtime
//!   and returns a [`PendingResponse`] immediately.

#[cfg(feature = "blocking")]
mod blocking;
#[cfg(feature = "async")]
mod nonblocking;

use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::error::Error;
use crate::token::Token;

#[cfg(feature = "blocking")]
pub use blocking::BlockingBackend;
#[cfg(feature = "async")]
pub use nonblocking::{AsyncBackend, PendingResponse};

/// Fixed per-request timeout used by the default backend constructors.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP methods the platform uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET.
    Get,
    /// PUT.
    Put,
    /// POST.
    Post,
    /// DELETE.
    Delete,
}

impl Method {
    /// Upper-case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outgoing request, owned by the call that built it.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Fully-qualified URL including any query string.
    pub url: String,
    /// JSON body. `None` sends no body at all, which differs from `{}`.
    pub body: Option<Value>,
    /// Bearer token; `None` omits the `Authorization` header.
    pub token: Option<Token>,
}

impl Request {
    /// A request with no body and no token.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            token: None,
        }
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a bearer token.
    #[must_use]
    pub fn token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Headers every backend sends for this request.
    #[must_use]
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Content-Type", "application/json".to_owned())];
        if let Some(token) = &self.token {
            headers.push(("Authorization", format!("Bearer {}", token.token)));
        }
        headers
    }

    /// Serialized body text, if any.
    #[must_use]
    pub fn body_text(&self) -> Option<String> {
        self.body.as_ref().map(Value::to_string)
    }
}

/// A transport that executes one [`Request`].
///
/// The associated `Response` is what callers of the facade receive: a plain
/// `Result` for blocking backends, a future for async ones.
pub trait Backend: Send + Sync {
    /// What a dispatched call evaluates to.
    type Response;

    /// Perform the HTTP exchange and map the outcome.
    fn process_request(&self, request: Request) -> Self::Response;

    /// Deliver a failure detected before any I/O in this backend's shape.
    fn reject(&self, error: Error) -> Self::Response;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenGenerator;

    #[test]
    fn headers_include_bearer_only_with_token() {
        let req = Request::new(Method::Get, "https://example.test/x");
        assert_eq!(
            req.headers(),
            vec![("Content-Type", "application/json".to_owned())]
        );

        let token = TokenGenerator::from_strings("v1:us1:i", "k:s")
            .unwrap()
            .generate(None, true)
            .unwrap();
        let expected = format!("Bearer {}", token.token);
        let req = req.token(token);
        assert_eq!(req.headers()[1], ("Authorization", expected));
    }

    #[test]
    fn missing_body_differs_from_empty_object() {
        let req = Request::new(Method::Post, "https://example.test/x");
        assert_eq!(req.body_text(), None);
        let req = req.body(serde_json::json!({}));
        assert_eq!(req.body_text().as_deref(), Some("{}"));
    }

    #[test]
    fn method_names_are_upper_case() {
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert_eq!(Method::Put.as_str(), "PUT");
    }
}
