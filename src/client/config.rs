//! Connection settings for [`ConnClient`](super::ConnClient).

use serde_json::Value;
use std::time::Duration;

/// Default user agent sent with every invocation.
pub const DEFAULT_USER_AGENT: &str = concat!("connector-validator/", env!("CARGO_PKG_VERSION"));

/// Everything needed to address one connector.
///
/// # Examples
///
/// ```rust
/// use connector_validator::client::ClientConfig;
/// use serde_json::json;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("https://connectors.example.com/platform", "c0ffee")
///     .with_version(4)
///     .with_config(json!({"baseUrl": "https://app.example.com"}))
///     .with_timeout(Duration::from_secs(30));
///
/// assert_eq!(config.version, Some(4));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the connector runtime; its own path is kept
    pub endpoint: String,
    /// Connector reference (id or alias)
    pub connector_ref: String,
    /// Pinned connector version; `None` invokes the `latest` tag
    pub version: Option<i64>,
    /// Connector configuration sent with every command
    pub config: Value,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>, connector_ref: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            connector_ref: connector_ref.into(),
            version: None,
            config: Value::Object(Default::default()),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("http://localhost:3000", "ref");
        assert_eq!(config.version, None);
        assert_eq!(config.config, json!({}));
        assert!(config.timeout.is_none());
        assert!(config.user_agent.starts_with("connector-validator/"));
    }
}
