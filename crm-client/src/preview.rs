//! Audience size preview
//!
//! [`AudiencePreviewer`] asks the remote matcher how many customers an
//! audience selects and keeps the answer in a `watch` channel. Every request
//! is stamped with a generation number taken from the state itself; a
//! response is applied only while its generation is still the newest, so a
//! slow answer for an old rule set can never overwrite a newer one.
//!
//! [`AudiencePreviewer::spawn_debounced`] drives previews from rule editor
//! changes with a trailing debounce.

use std::sync::Arc;
use std::time::Duration;

use shared::Audience;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::api::CrmApi;
use crate::collections::format_count;
use crate::config::DEFAULT_PREVIEW_DEBOUNCE;
use crate::http::HttpClient;
use crate::notice::Notice;
use crate::{ClientConfig, ClientError, ClientResult};

/// Sleep target while nothing is scheduled
const IDLE_PARK: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewStatus {
    /// No rules, nothing computed
    Idle,
    /// Request in flight; the previous size stays visible
    Loading,
    Ready,
    Failed(Notice),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewState {
    pub status: PreviewStatus,
    pub audience_size: Option<u64>,
    pub generation: u64,
}

impl PreviewState {
    pub fn is_loading(&self) -> bool {
        self.status == PreviewStatus::Loading
    }

    /// Text for the preview panel
    pub fn describe(&self, has_rules: bool) -> String {
        if !has_rules {
            return "Add rules to see your audience size".to_string();
        }
        match (&self.status, self.audience_size) {
            (PreviewStatus::Loading, Some(size)) => {
                format!("{} customers match your criteria (updating...)", format_count(size))
            }
            (PreviewStatus::Loading, None) => "Calculating audience size...".to_string(),
            (_, Some(size)) => format!("{} customers match your criteria", format_count(size)),
            (_, None) => "Preview the audience to see its size".to_string(),
        }
    }
}

impl Default for PreviewState {
    fn default() -> Self {
        Self {
            status: PreviewStatus::Idle,
            audience_size: None,
            generation: 0,
        }
    }
}

/// Audience preview client
pub struct AudiencePreviewer<H> {
    api: Arc<CrmApi<H>>,
    state: Arc<watch::Sender<PreviewState>>,
    debounce: Duration,
}

impl<H> Clone for AudiencePreviewer<H> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
            debounce: self.debounce,
        }
    }
}

impl<H: HttpClient + 'static> AudiencePreviewer<H> {
    pub fn new(api: Arc<CrmApi<H>>) -> Self {
        let (state, _) = watch::channel(PreviewState::default());
        Self {
            api,
            state: Arc::new(state),
            debounce: DEFAULT_PREVIEW_DEBOUNCE,
        }
    }

    /// Previewer using the configured debounce window
    pub fn from_config(api: Arc<CrmApi<H>>, config: &ClientConfig) -> Self {
        Self::new(api).with_debounce(config.preview_debounce)
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn state(&self) -> PreviewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PreviewState> {
        self.state.subscribe()
    }

    /// Preview immediately, bypassing the debounce
    ///
    /// Returns `Ok(None)` for an empty audience (no request is made) and also
    /// when a newer preview superseded this one before it finished.
    pub async fn preview_now(&self, audience: &Audience) -> ClientResult<Option<u64>> {
        match self.begin(audience) {
            Some(generation) => self.run(generation, audience).await,
            None => Ok(None),
        }
    }

    /// Start a new generation
    ///
    /// An empty audience resets the state to idle and yields no generation,
    /// which also invalidates whatever is still in flight.
    fn begin(&self, audience: &Audience) -> Option<u64> {
        let mut generation = 0;
        let empty = audience.is_empty();
        self.state.send_modify(|state| {
            state.generation += 1;
            generation = state.generation;
            if empty {
                state.status = PreviewStatus::Idle;
                state.audience_size = None;
            } else {
                state.status = PreviewStatus::Loading;
            }
        });
        (!empty).then_some(generation)
    }

    async fn run(&self, generation: u64, audience: &Audience) -> ClientResult<Option<u64>> {
        let result = self
            .api
            .preview_audience(audience)
            .await
            .map_err(ClientError::for_session_flow);

        let applied = self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            match &result {
                Ok(size) => {
                    state.status = PreviewStatus::Ready;
                    state.audience_size = Some(*size);
                }
                Err(e) => {
                    state.status = PreviewStatus::Failed(Notice::for_preview(e));
                    state.audience_size = None;
                }
            }
            true
        });

        if !applied {
            tracing::debug!(generation, "Discarding stale audience preview");
            return Ok(None);
        }
        result.map(Some)
    }

    /// Follow `changes` and preview after each quiet period
    ///
    /// A change inside the window reschedules the preview. A change while a
    /// request is in flight cancels that request, so at most one preview is
    /// outstanding. An empty audience clears the state at once.
    pub fn spawn_debounced(
        &self,
        changes: watch::Receiver<Audience>,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        let previewer = self.clone();
        tokio::spawn(previewer.run_debounced(changes, shutdown))
    }

    async fn run_debounced(self, mut changes: watch::Receiver<Audience>, shutdown: CancellationToken) {
        tracing::debug!(debounce_ms = self.debounce.as_millis() as u64, "Audience previewer started");

        let mut deadline: Option<Instant> = None;
        let mut in_flight: Option<CancellationToken> = None;

        if !changes.borrow_and_update().is_empty() {
            deadline = Some(Instant::now() + self.debounce);
        }

        loop {
            let sleep_until = deadline.unwrap_or_else(|| Instant::now() + IDLE_PARK);

            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::debug!("Audience previewer shutting down");
                    break;
                }

                _ = tokio::time::sleep_until(sleep_until), if deadline.is_some() => {
                    deadline = None;
                    let audience = changes.borrow_and_update().clone();
                    if let Some(token) = in_flight.take() {
                        token.cancel();
                    }
                    if let Some(generation) = self.begin(&audience) {
                        let token = shutdown.child_token();
                        in_flight = Some(token.clone());
                        let previewer = self.clone();
                        tokio::spawn(async move {
                            tokio::select! {
                                _ = token.cancelled() => {
                                    tracing::debug!(generation, "Audience preview cancelled");
                                }
                                _ = previewer.run(generation, &audience) => {}
                            }
                        });
                    }
                }

                changed = changes.changed() => {
                    if changed.is_err() {
                        tracing::debug!("Rule editor dropped, audience previewer stopping");
                        break;
                    }
                    if let Some(token) = in_flight.take() {
                        token.cancel();
                    }
                    let empty = changes.borrow_and_update().is_empty();
                    if empty {
                        deadline = None;
                        self.begin(&Audience::new());
                    } else {
                        deadline = Some(Instant::now() + self.debounce);
                    }
                }
            }
        }

        if let Some(token) = in_flight.take() {
            token.cancel();
        }
    }
}
