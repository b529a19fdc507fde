//! Instance locator and API key parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A parsed `version:cluster:instance-id` instance locator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceLocator {
    version: String,
    cluster: String,
    instance_id: String,
}

impl InstanceLocator {
    /// Parse a locator string.
    ///
    /// Extra trailing segments are tolerated; fewer than three, or an empty
    /// cluster or instance id, is a configuration error.
    pub fn parse(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.trim().split(':').collect();
        if parts.len() < 3 {
            return Err(Error::Configuration(format!(
                "instance locator must look like version:cluster:instance-id, got {} segment(s)",
                parts.len()
            )));
        }
        if parts[1].is_empty() || parts[2].is_empty() {
            return Err(Error::Configuration(
                "instance locator has an empty cluster or instance id".into(),
            ));
        }
        Ok(Self {
            version: parts[0].to_owned(),
            cluster: parts[1].to_owned(),
            instance_id: parts[2].to_owned(),
        })
    }

    /// API version segment (e.g. `v1`).
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Cluster segment, which selects the host.
    #[must_use]
    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    /// Instance id segment, used in paths and the `instance` claim.
    #[must_use]
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Default API host for this locator's cluster.
    #[must_use]
    pub fn host(&self) -> String {
        format!("{}.pusherplatform.io", self.cluster)
    }
}

impl FromStr for InstanceLocator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for InstanceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.version, self.cluster, self.instance_id)
    }
}

/// A parsed `key-id:key-secret` API key.
///
/// The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    id: String,
    secret: String,
}

impl ApiKey {
    /// Parse a key string. It must contain exactly one `:`.
    pub fn parse(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.trim().split(':').collect();
        let [id, secret] = parts.as_slice() else {
            return Err(Error::Configuration(format!(
                "API key must look like key-id:key-secret, got {} segment(s)",
                parts.len()
            )));
        };
        if id.is_empty() || secret.is_empty() {
            return Err(Error::Configuration(
                "API key has an empty id or secret".into(),
            ));
        }
        Ok(Self {
            id: (*id).to_owned(),
            secret: (*secret).to_owned(),
        })
    }

    /// Key id, which becomes the token issuer.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

impl FromStr for ApiKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
