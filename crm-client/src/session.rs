//! Session shell
//!
//! The transport only reports a lost session. [`SessionGuard`] turns that into
//! an access decision and [`ConnectionMonitor`] watches it in the background.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::CrmApi;
use crate::http::HttpClient;
use crate::{ClientConfig, ClientResult};

/// Outcome of a session check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Send the user to the login entry point
    Redirect { login_url: String },
}

#[derive(Debug, Clone)]
pub struct SessionGuard {
    has_cookie: bool,
}

impl SessionGuard {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            has_cookie: config
                .session_cookie
                .as_deref()
                .is_some_and(|c| !c.trim().is_empty()),
        }
    }

    /// Whether a session cookie is configured at all
    pub fn has_cookie(&self) -> bool {
        self.has_cookie
    }

    /// Ask the backend whether the session is valid
    ///
    /// Network failures are returned as errors, not as a redirect.
    pub async fn require<H: HttpClient>(&self, api: &CrmApi<H>) -> ClientResult<Access> {
        if !self.has_cookie {
            tracing::debug!("No session cookie configured");
        }
        if api.check_auth().await? {
            Ok(Access::Granted)
        } else {
            Ok(Access::Redirect {
                login_url: api.login_url(),
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Unknown,
    Connected,
    Disconnected,
    Unauthenticated,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Unauthenticated => "unauthenticated",
        };
        f.write_str(s)
    }
}

/// Shortest accepted poll period
pub const MIN_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Periodic backend reachability probe
pub struct ConnectionMonitor {
    status: watch::Receiver<ConnectionStatus>,
    handle: JoinHandle<()>,
}

impl ConnectionMonitor {
    /// Probe immediately, then once per `interval` until `shutdown` fires
    ///
    /// Intervals below [`MIN_CHECK_INTERVAL`] are raised to it.
    pub fn spawn<H: HttpClient + 'static>(
        api: Arc<CrmApi<H>>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        if interval < MIN_CHECK_INTERVAL {
            tracing::warn!(
                requested_ms = interval.as_millis() as u64,
                "Connection check interval too short, using {}s",
                MIN_CHECK_INTERVAL.as_secs()
            );
        }
        let interval = interval.max(MIN_CHECK_INTERVAL);
        let (tx, status) = watch::channel(ConnectionStatus::Unknown);
        let handle = tokio::spawn(Self::run(api, interval, shutdown, tx));
        Self { status, handle }
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.clone()
    }

    /// Wait for the monitor task to finish after shutdown
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            tracing::warn!("Connection monitor task failed: {e}");
        }
    }

    async fn run<H: HttpClient>(
        api: Arc<CrmApi<H>>,
        interval: Duration,
        shutdown: CancellationToken,
        tx: watch::Sender<ConnectionStatus>,
    ) {
        tracing::info!(interval_secs = interval.as_secs(), "Connection monitor started");
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let status = match api.check_auth().await {
                        Ok(true) => ConnectionStatus::Connected,
                        Ok(false) => ConnectionStatus::Unauthenticated,
                        Err(_) => ConnectionStatus::Disconnected,
                    };
                    let changed = tx.send_if_modified(|current| {
                        let changed = *current != status;
                        *current = status;
                        changed
                    });
                    if changed {
                        tracing::info!(%status, "Connection status changed");
                    }
                }
            }
        }

        tracing::info!("Connection monitor stopped");
    }
}
