//! Profile configuration persistence.

use std::fs;
use std::path::PathBuf;

use chatkit::{ApiKey, BlockingBackend, ChatKit, Error};

/// Base config directory for all profiles.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chatkit-cli")
}

/// Path of a profile's `profile.conf`.
pub fn profile_path(name: &str) -> PathBuf {
    config_dir().join(name).join("profile.conf")
}

/// Persistent per-profile credentials stored as `profile.conf`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    pub instance_locator: String,
    pub key: String,
}

impl ProfileConfig {
    /// Parse `key=value` lines. Unknown keys and blank lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut cfg = Self::default();
        for line in text.lines() {
            if let Some((k, v)) = line.trim().split_once('=') {
                match k.trim() {
                    "instance_locator" => v.trim().clone_into(&mut cfg.instance_locator),
                    "key" => v.trim().clone_into(&mut cfg.key),
                    _ => {}
                }
            }
        }
        cfg
    }

    pub fn render(&self) -> String {
        format!(
            "instance_locator={}\nkey={}\n",
            self.instance_locator, self.key
        )
    }

    /// Load a profile; a missing file yields an empty config.
    pub fn load(profile: &str) -> chatkit::Result<Self> {
        let path = profile_path(profile);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .map_err(|e| Error::Configuration(format!("load {}: {e}", path.display())))?;
        Ok(Self::parse(&text))
    }

    /// Save to `<config_dir>/<profile>/profile.conf`.
    pub fn save(&self, profile: &str) -> chatkit::Result<PathBuf> {
        let path = profile_path(profile);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| Error::Configuration(format!("mkdir: {e}")))?;
        }
        fs::write(&path, self.render())
            .map_err(|e| Error::Configuration(format!("write config: {e}")))?;
        Ok(path)
    }

    /// Replace fields with any values given on the command line.
    #[must_use]
    pub fn with_overrides(mut self, locator: Option<&str>, key: Option<&str>) -> Self {
        if let Some(l) = locator {
            l.clone_into(&mut self.instance_locator);
        }
        if let Some(k) = key {
            k.clone_into(&mut self.key);
        }
        self
    }

    /// Key id only; the secret is never printed.
    pub fn key_id(&self) -> String {
        ApiKey::parse(&self.key).map_or_else(|_| "<unset>".into(), |k| k.id().to_owned())
    }

    /// Build a blocking client from these credentials.
    pub fn client(&self) -> chatkit::Result<ChatKit<BlockingBackend>> {
        if self.instance_locator.is_empty() || self.key.is_empty() {
            return Err(Error::Configuration(
                "no credentials: pass --locator and --key or run `chatkit config set`".into(),
            ));
        }
        ChatKit::blocking(&self.instance_locator, &self.key)
    }
}
