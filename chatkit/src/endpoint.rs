//! URL construction for the platform's services.

use std::fmt;
use std::str::FromStr;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::form_urlencoded;

use crate::credentials::InstanceLocator;
use crate::error::{Error, Result};

/// Characters left as-is inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A logical sub-API of the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Core users/rooms/messages API.
    Api,
    /// Roles and permissions.
    Authorizer,
    /// Read cursors.
    Cursors,
}

impl Service {
    /// Every known service.
    pub const ALL: [Self; 3] = [Self::Api, Self::Authorizer, Self::Cursors];

    /// Service name used in the URL path.
    #[must_use]
    pub const fn service_name(self) -> &'static str {
        match self {
            Self::Api => "chatkit",
            Self::Authorizer => "chatkit_authorizer",
            Self::Cursors => "chatkit_cursors",
        }
    }

    /// Service version used in the URL path.
    #[must_use]
    pub const fn service_version(self) -> &'static str {
        "v2"
    }

    /// Logical name (`api`, `authorizer`, `cursors`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Authorizer => "authorizer",
            Self::Cursors => "cursors",
        }
    }
}

impl FromStr for Service {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|svc| svc.as_str() == s)
            .ok_or_else(|| Error::Configuration(format!("unknown service: {s:?}")))
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// Rendered as-is.
    Text(String),
    /// Repeats the key once per element, in order.
    List(Vec<String>),
    /// Rendered as `true` / `false`.
    Bool(bool),
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

impl From<&[&str]> for QueryValue {
    fn from(v: &[&str]) -> Self {
        Self::List(v.iter().map(|s| (*s).to_owned()).collect())
    }
}

macro_rules! query_number {
    ($($t:ty),*) => {
        $(impl From<$t> for QueryValue {
            fn from(v: $t) -> Self {
                Self::Text(v.to_string())
            }
        })*
    };
}

query_number!(u16, u32, u64, usize, i32, i64);

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, QueryValue)>,
}

impl Query {
    /// An empty query.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a parameter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Append a parameter only when `value` is `Some`.
    #[must_use]
    pub fn with_opt<V: Into<QueryValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.push(key, v);
        }
        self
    }

    /// Append a parameter in place.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Whether no parameters were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Form-encode the parameters (space becomes `+`).
    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            match value {
                QueryValue::Text(v) => {
                    out.append_pair(key, v);
                }
                QueryValue::List(items) => {
                    for v in items {
                        out.append_pair(key, v);
                    }
                }
                QueryValue::Bool(b) => {
                    out.append_pair(key, if *b { "true" } else { "false" });
                }
            }
        }
        out.finish()
    }
}

/// Percent-encode one identifier for use as a single path segment.
#[must_use]
pub fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SEGMENT).to_string()
}

/// Builds fully-qualified service URLs for one instance.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: String,
    instance_id: String,
}

impl Endpoints {
    /// Endpoints on the locator's default `https://<cluster>.pusherplatform.io` host.
    #[must_use]
    pub fn new(locator: &InstanceLocator) -> Self {
        Self {
            base: format!("https://{}", locator.host()),
            instance_id: locator.instance_id().to_owned(),
        }
    }

    /// Endpoints on an explicit base URL (scheme + host + optional port).
    pub fn with_base_url(locator: &InstanceLocator, base_url: &str) -> Result<Self> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| Error::Configuration(format!("bad base URL {base_url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(Error::Configuration(format!(
                "base URL must be http(s) with a host: {base_url:?}"
            )));
        }
        Ok(Self {
            base: parsed.as_str().trim_end_matches('/').to_owned(),
            instance_id: locator.instance_id().to_owned(),
        })
    }

    /// The scheme and host requests are sent to.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Compose `<base>/services/<name>/<version>/<instance-id>/<path>[?query]`.
    #[must_use]
    pub fn build(&self, service: Service, path: &str, query: &Query) -> String {
        let mut url = format!(
            "{}/services/{}/{}/{}/{}",
            self.base,
            service.service_name(),
            service.service_version(),
            self.instance_id,
            path.trim_start_matches('/'),
        );
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.encode());
        }
        url
    }

    /// Like [`build`](Self::build), resolving the service by its logical name.
    pub fn build_named(&self, service: &str, path: &str, query: &Query) -> Result<String> {
        Ok(self.build(service.parse()?, path, query))
    }
}
