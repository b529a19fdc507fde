//! Chatkit client, the primary entry point for the SDK.
//!
//! Every resource operation builds an [`ApiCall`], declares the token it needs
//! through [`Auth`], and hands the prepared [`Request`] to the backend. Argument
//! validation happens first; a failure is delivered through
//! [`Backend::reject`] so no network call is attempted.

mod cursors;
mod messages;
mod roles;
mod rooms;
mod users;

use std::sync::OnceLock;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::credentials::{ApiKey, InstanceLocator};
use crate::endpoint::{Endpoints, Query, Service, segment};
use crate::error::{Error, Result};
use crate::token::{AuthenticationResponse, Token, TokenGenerator};
use crate::transport::{Backend, Method, Request};

/// Largest page size the list endpoints accept.
pub const MAX_PAGE_SIZE: u32 = 100;

static LOGGER_INIT: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/// Install a `tracing` fmt subscriber filtered by `level` (default `info`).
///
/// Only the first call installs anything; every later call, concurrent or not,
/// reports that first outcome.
pub fn init_logger(level: Option<&str>) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    LOGGER_INIT
        .get_or_init(|| {
            let filter = EnvFilter::builder().parse_lossy(level.unwrap_or("info"));
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| e.to_string())
        })
        .clone()
        .map_err(|e| Error::Configuration(format!("logger: {e}")))
}

/// Which token, if any, a call carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// No `Authorization` header.
    None,
    /// A token acting as the given user.
    Subject(String),
    /// A superuser token for administrative calls.
    Superuser,
}

/// A declared call against one service endpoint.
#[derive(Debug, Clone)]
pub struct ApiCall {
    method: Method,
    service: Service,
    path: String,
    query: Query,
    body: Option<Value>,
    auth: Auth,
}

impl ApiCall {
    /// Declare a call. `path` is relative to the instance root.
    #[must_use]
    pub fn new(method: Method, service: Service, path: impl Into<String>, auth: Auth) -> Self {
        Self {
            method,
            service,
            path: path.into(),
            query: Query::new(),
            body: None,
            auth,
        }
    }

    /// Declare a GET.
    #[must_use]
    pub fn get(service: Service, path: impl Into<String>, auth: Auth) -> Self {
        Self::new(Method::Get, service, path, auth)
    }

    /// Declare a PUT.
    #[must_use]
    pub fn put(service: Service, path: impl Into<String>, auth: Auth) -> Self {
        Self::new(Method::Put, service, path, auth)
    }

    /// Declare a POST.
    #[must_use]
    pub fn post(service: Service, path: impl Into<String>, auth: Auth) -> Self {
        Self::new(Method::Post, service, path, auth)
    }

    /// Declare a DELETE.
    #[must_use]
    pub fn delete(service: Service, path: impl Into<String>, auth: Auth) -> Self {
        Self::new(Method::Delete, service, path, auth)
    }

    /// Set the query string parameters.
    #[must_use]
    pub fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Set the JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// The declared token requirement.
    #[must_use]
    pub const fn auth(&self) -> &Auth {
        &self.auth
    }
}

/// A Chatkit client over a chosen [`Backend`].
///
/// Each method returns `B::Response`: a `Result<Value>` with
/// [`BlockingBackend`](crate::BlockingBackend), a
/// [`PendingResponse`](crate::PendingResponse) with
/// [`AsyncBackend`](crate::AsyncBackend).
#[derive(Debug, Clone)]
pub struct ChatKit<B> {
    tokens: TokenGenerator,
    endpoints: Endpoints,
    backend: B,
}

impl<B: Backend> ChatKit<B> {
    /// Create a client on the default host for `instance_locator`.
    pub fn new(instance_locator: &str, key: &str, backend: B) -> Result<Self> {
        ChatKitBuilder::new()
            .instance_locator(instance_locator)
            .key(key)
            .build(backend)
    }

    /// The backend requests are sent through.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// The parsed instance locator.
    pub const fn locator(&self) -> &InstanceLocator {
        self.tokens.locator()
    }

    /// The scheme and host requests go to.
    pub fn base_url(&self) -> &str {
        self.endpoints.base()
    }

    /// Mint a token for direct use.
    pub fn generate_token(&self, subject: Option<&str>, superuser: bool) -> Result<Token> {
        self.tokens.generate(subject, superuser)
    }

    /// Issue a token an end-user client can authenticate with.
    pub fn authenticate_user(&self, user_id: &str) -> Result<AuthenticationResponse> {
        self.tokens.authenticate_user(user_id)
    }

    /// Dispatch an arbitrary declared call.
    pub fn call(&self, call: ApiCall) -> B::Response {
        self.submit(|| Ok(call))
    }

    /// Build the call, prepare the request and dispatch it, or reject without I/O.
    fn submit(&self, build: impl FnOnce() -> Result<ApiCall>) -> B::Response {
        match build().and_then(|call| self.prepare(call)) {
            Ok(request) => self.backend.process_request(request),
            Err(e) => {
                debug!(error = %e, "call rejected before dispatch");
                self.backend.reject(e)
            }
        }
    }

    fn prepare(&self, call: ApiCall) -> Result<Request> {
        let url = self.endpoints.build(call.service, &call.path, &call.query);
        let mut request = Request::new(call.method, url);
        if let Some(body) = call.body {
            request = request.body(body);
        }
        let token = match &call.auth {
            Auth::None => None,
            Auth::Subject(user_id) => Some(self.tokens.generate(Some(user_id), false)?),
            Auth::Superuser => Some(self.tokens.generate(None, true)?),
        };
        if let Some(token) = token {
            request = request.token(token);
        }
        Ok(request)
    }
}

impl ChatKit<()> {
    /// Start building a client. The backend is supplied to
    /// [`ChatKitBuilder::build`].
    #[must_use]
    pub fn builder() -> ChatKitBuilder {
        ChatKitBuilder::new()
    }
}

/// Builder for constructing a [`ChatKit`].
#[derive(Debug, Clone, Default)]
pub struct ChatKitBuilder {
    instance_locator: Option<String>,
    key: Option<String>,
    base_url: Option<String>,
}

impl ChatKitBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `version:cluster:instance-id` locator (required).
    #[must_use]
    pub fn instance_locator(mut self, locator: impl Into<String>) -> Self {
        self.instance_locator = Some(locator.into());
        self
    }

    /// Set the `key-id:key-secret` API key (required).
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Send requests to this base URL instead of `https://<cluster>.pusherplatform.io`.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Parse the credentials and build the client.
    pub fn build<B: Backend>(self, backend: B) -> Result<ChatKit<B>> {
        let locator = self
            .instance_locator
            .as_deref()
            .ok_or_else(|| Error::Configuration("instance locator is required".into()))
            .and_then(InstanceLocator::parse)?;
        let key = self
            .key
            .as_deref()
            .ok_or_else(|| Error::Configuration("API key is required".into()))
            .and_then(ApiKey::parse)?;
        let endpoints = match self.base_url.as_deref() {
            Some(url) => Endpoints::with_base_url(&locator, url)?,
            None => Endpoints::new(&locator),
        };
        Ok(ChatKit {
            tokens: TokenGenerator::new(locator, key),
            endpoints,
            backend,
        })
    }
}

#[cfg(feature = "blocking")]
impl ChatKit<crate::transport::BlockingBackend> {
    /// A client using the blocking backend with its default timeout.
    pub fn blocking(instance_locator: &str, key: &str) -> Result<Self> {
        Self::new(
            instance_locator,
            key,
            crate::transport::BlockingBackend::new(),
        )
    }
}

#[cfg(feature = "async")]
impl ChatKit<crate::transport::AsyncBackend> {
    /// A client using the async backend on the current tokio runtime.
    pub fn nonblocking(instance_locator: &str, key: &str) -> Result<Self> {
        Self::new(
            instance_locator,
            key,
            crate::transport::AsyncBackend::new()?,
        )
    }
}

/// Reject empty identifiers and encode the rest as one path segment.
fn path_id(label: &str, value: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::InvalidArgument(format!("{label} must not be empty")));
    }
    Ok(segment(value))
}

fn check_limit(limit: Option<u32>) -> Result<()> {
    match limit {
        Some(n) if n == 0 || n > MAX_PAGE_SIZE => Err(Error::InvalidArgument(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}, got {n}"
        ))),
        _ => Ok(()),
    }
}

fn to_body<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| Error::InvalidArgument(format!("body: {e}")))
}

fn require_ids(label: &str, ids: &[&str]) -> Result<Vec<String>> {
    if ids.is_empty() {
        return Err(Error::InvalidArgument(format!("{label} must not be empty")));
    }
    ids.iter()
        .map(|id| {
            if id.trim().is_empty() {
                Err(Error::InvalidArgument(format!("{label} contains an empty id")))
            } else {
                Ok((*id).to_owned())
            }
        })
        .collect()
}
