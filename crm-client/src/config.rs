//! Client configuration

use std::time::Duration;

use crate::api::CrmApi;
use crate::error::ClientResult;
use crate::http::NetworkHttpClient;

/// Backend address used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5002";

/// Quiet period before an audience change triggers a preview
pub const DEFAULT_PREVIEW_DEBOUNCE: Duration = Duration::from_millis(500);

/// How often the connection monitor probes the backend
pub const DEFAULT_CONNECTION_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Client configuration for connecting to the CRM API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:5002")
    pub base_url: String,

    /// Session cookie forwarded on every request (`name=value`)
    pub session_cookie: Option<String>,

    /// Request timeout
    pub timeout: Duration,

    /// Debounce window for audience previews
    pub preview_debounce: Duration,

    /// Poll interval for [`crate::session::ConnectionMonitor`]
    pub connection_check_interval: Duration,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            session_cookie: None,
            timeout: Duration::from_secs(30),
            preview_debounce: DEFAULT_PREVIEW_DEBOUNCE,
            connection_check_interval: DEFAULT_CONNECTION_CHECK_INTERVAL,
        }
    }

    /// Read configuration from the environment
    ///
    /// - `CRM_API_URL`
    /// - `CRM_SESSION_COOKIE`
    /// - `CRM_TIMEOUT_SECS`
    /// - `CRM_PREVIEW_DEBOUNCE_MS`
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("CRM_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        );
        config.session_cookie = std::env::var("CRM_SESSION_COOKIE")
            .ok()
            .filter(|c| !c.trim().is_empty());
        if let Some(secs) = std::env::var("CRM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = std::env::var("CRM_PREVIEW_DEBOUNCE_MS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.preview_debounce = Duration::from_millis(ms);
        }
        config
    }

    /// Set the session cookie
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_preview_debounce(mut self, debounce: Duration) -> Self {
        self.preview_debounce = debounce;
        self
    }

    pub fn with_connection_check_interval(mut self, interval: Duration) -> Self {
        self.connection_check_interval = interval;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<NetworkHttpClient> {
        NetworkHttpClient::new(self)
    }

    /// Create the typed API facade over a network client
    pub fn build_api(&self) -> ClientResult<CrmApi<NetworkHttpClient>> {
        Ok(CrmApi::new(self.build_http_client()?))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
