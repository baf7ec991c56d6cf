//! Connection settings for one target instance.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// Base URL and static credentials for one instance.
///
/// Deserializable so callers can keep it in whatever config format they
/// already use; this crate never reads files or environment variables.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    pub instance: String,
    pub username: String,
    pub password: String,
    /// Request timeout for the bundled reqwest transport. `None` leaves the
    /// transport's own default in place.
    #[serde(default, rename = "timeout_secs", deserialize_with = "secs_opt")]
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(
        instance: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            instance: instance.into(),
            username: username.into(),
            password: password.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Instance URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.instance.trim_end_matches('/')
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("instance", &self.instance)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn secs_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let secs: Option<u64> = Option::deserialize(deserializer)?;
    Ok(secs.map(Duration::from_secs))
}
