//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// Base URL used when `EDU_API_BASE` is unset.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api/v1";

/// Environment variable overriding the API base URL.
pub const API_BASE_ENV: &str = "EDU_API_BASE";

/// Environment variable for the connect timeout, in whole seconds.
pub const CONNECT_TIMEOUT_ENV: &str = "EDU_CONNECT_TIMEOUT_SECS";

/// Environment variable overriding the session file location.
pub const SESSION_FILE_ENV: &str = "EDU_SESSION_FILE";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the API gateway and its transport.
///
/// # Example
///
/// ```ignore
/// use edu_client::config::GatewayConfig;
///
/// let config = GatewayConfig::default()
///     .with_base_url("https://edu.example.com/api/v1")
///     .with_connect_timeout(Duration::from_secs(3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Prefix joined with every request path
    pub base_url: String,
    /// Time allowed to establish a connection.
    ///
    /// There is no whole-request timeout; streams stay open as long as the
    /// server keeps sending.
    pub connect_timeout: Duration,
    /// Session file, or `None` for `~/.edu-client/session.json`
    pub session_file: Option<PathBuf>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            session_file: None,
        }
    }
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Create config from `EDU_API_BASE`, `EDU_CONNECT_TIMEOUT_SECS` and
    /// `EDU_SESSION_FILE`. Unset or empty variables keep the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(url) = non_empty_var(API_BASE_ENV) {
            config = config.with_base_url(url);
        }

        if let Some(raw) = non_empty_var(CONNECT_TIMEOUT_ENV) {
            match raw.parse::<u64>() {
                Ok(secs) => config = config.with_connect_timeout(Duration::from_secs(secs)),
                Err(_) => warn!("Ignoring invalid {}={:?}", CONNECT_TIMEOUT_ENV, raw),
            }
        }

        if let Some(path) = non_empty_var(SESSION_FILE_ENV) {
            config = config.with_session_file(path);
        }

        config
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
