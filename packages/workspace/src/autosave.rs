//! # Auto-save Coordinator
//!
//! Decides when a mutation's persistence happens and prevents overlapping
//! save calls.
//!
//! - A save requested while another is in flight is **skipped**, not
//!   queued - rapid structural edits must not amplify into a write storm.
//!   Every payload carries the document version, so a later save always
//!   supersedes the skipped one.
//! - The debounced variant coalesces a burst of requests into one trailing
//!   call after a quiet period (~1.5s by default).
//! - Saves are optimistic: failures land in `save_error` for the UI, the
//!   in-memory tree is untouched.

use crate::client::{ClientError, PersistenceClient};
use chrono::{DateTime, Utc};
use pagewright_model::SavePageRequest;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Observable save state for the UI
#[derive(Debug, Clone, Default)]
pub struct SaveState {
    pub is_saving: bool,
    pub last_saved: Option<DateTime<Utc>>,
    pub save_error: Option<String>,
}

/// What happened to one save request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveAttempt {
    /// Save completed server-side
    Completed,
    /// Another save was in flight; this request was dropped
    Skipped,
    /// The call failed; error recorded in state, tree untouched
    Failed,
    /// Authentication expired; caller must redirect to login
    AuthRequired,
}

/// Coordinates page-structure saves against the persistence client
pub struct AutosaveCoordinator {
    client: Arc<dyn PersistenceClient>,
    state: Mutex<SaveState>,
}

impl AutosaveCoordinator {
    pub fn new(client: Arc<dyn PersistenceClient>) -> Self {
        Self {
            client,
            state: Mutex::new(SaveState::default()),
        }
    }

    pub fn state(&self) -> SaveState {
        self.state.lock().expect("save state poisoned").clone()
    }

    /// Attempt a save now. Skipped (not queued) when one is in flight.
    pub async fn save_now(&self, payload: SavePageRequest) -> SaveAttempt {
        {
            let mut state = self.state.lock().expect("save state poisoned");
            if state.is_saving {
                debug!(version = payload.version, "Save in flight; skipping request");
                return SaveAttempt::Skipped;
            }
            state.is_saving = true;
        }

        let result = self.client.save_page(&payload).await;

        let mut state = self.state.lock().expect("save state poisoned");
        state.is_saving = false;

        match result {
            Ok(response) if response.success => {
                state.last_saved = Some(Utc::now());
                state.save_error = None;
                debug!(version = payload.version, "Page saved");
                SaveAttempt::Completed
            }
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| "Save rejected".to_string());
                warn!(%message, "Save rejected by server");
                state.save_error = Some(message);
                SaveAttempt::Failed
            }
            Err(ClientError::AuthRequired) => {
                warn!("Save failed: not authenticated");
                state.save_error = Some(ClientError::AuthRequired.to_string());
                SaveAttempt::AuthRequired
            }
            Err(error) => {
                warn!(%error, "Save failed; keeping in-memory state");
                state.save_error = Some(error.to_string());
                SaveAttempt::Failed
            }
        }
    }
}

/// Trailing-edge debouncer: bursts of save requests inside the quiet
/// window collapse into the one most-recent payload.
pub struct DebouncedSaver {
    tx: mpsc::UnboundedSender<SavePageRequest>,
    handle: JoinHandle<()>,
}

impl DebouncedSaver {
    pub const DEFAULT_QUIET: Duration = Duration::from_millis(1500);

    pub fn spawn(coordinator: Arc<AutosaveCoordinator>, quiet: Duration) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<SavePageRequest>();

        let handle = tokio::spawn(async move {
            while let Some(mut payload) = rx.recv().await {
                // Absorb newer payloads until the channel stays quiet
                loop {
                    match tokio::time::timeout(quiet, rx.recv()).await {
                        Ok(Some(newer)) => payload = newer,
                        Ok(None) => {
                            // Sender dropped: flush and stop
                            coordinator.save_now(payload).await;
                            return;
                        }
                        Err(_) => break,
                    }
                }
                coordinator.save_now(payload).await;
            }
        });

        Self { tx, handle }
    }

    /// Request a save; the payload may be superseded by a newer one before
    /// the quiet window elapses
    pub fn request(&self, payload: SavePageRequest) {
        let _ = self.tx.send(payload);
    }

    /// Drop the sender and wait for the final flush
    pub async fn shutdown(self) {
        drop(self.tx);
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use async_trait::async_trait;
    use pagewright_model::{
        CssGenerateRequest, CssGenerateResponse, LoadResponse, PageContent,
        SaveNodeSettingsRequest, SaveResponse, SaveWidgetSettingsRequest,
    };
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Recording test double: remembers saved versions, optionally slow or
    /// failing
    #[derive(Default)]
    struct RecordingClient {
        saved_versions: Mutex<Vec<u64>>,
        delay: Option<Duration>,
        fail: AtomicBool,
    }

    impl RecordingClient {
        fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::default()
            }
        }

        fn versions(&self) -> Vec<u64> {
            self.saved_versions.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PersistenceClient for RecordingClient {
        async fn load_page(&self, _page_id: &str) -> Result<LoadResponse, ClientError> {
            Ok(LoadResponse {
                content: PageContent::new(),
                widgets: None,
            })
        }

        async fn save_page(&self, request: &SavePageRequest) -> Result<SaveResponse, ClientError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(ClientError::Server {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            self.saved_versions.lock().unwrap().push(request.version);
            Ok(SaveResponse {
                success: true,
                message: None,
            })
        }

        async fn publish_page(&self, _page_id: &str) -> Result<SaveResponse, ClientError> {
            Ok(SaveResponse {
                success: true,
                message: None,
            })
        }

        async fn save_widget_settings(
            &self,
            _page_id: &str,
            _widget_id: &str,
            _request: &SaveWidgetSettingsRequest,
        ) -> Result<SaveResponse, ClientError> {
            Ok(SaveResponse {
                success: true,
                message: None,
            })
        }

        async fn save_section_settings(
            &self,
            _page_id: &str,
            _section_id: &str,
            _request: &SaveNodeSettingsRequest,
        ) -> Result<SaveResponse, ClientError> {
            Ok(SaveResponse {
                success: true,
                message: None,
            })
        }

        async fn save_column_settings(
            &self,
            _page_id: &str,
            _column_id: &str,
            _request: &SaveNodeSettingsRequest,
        ) -> Result<SaveResponse, ClientError> {
            Ok(SaveResponse {
                success: true,
                message: None,
            })
        }

        async fn generate_css(
            &self,
            _request: &CssGenerateRequest,
        ) -> Result<CssGenerateResponse, ClientError> {
            Ok(CssGenerateResponse { css: String::new() })
        }

        async fn generate_css_bulk(
            &self,
            _requests: &[CssGenerateRequest],
        ) -> Result<Vec<CssGenerateResponse>, ClientError> {
            Ok(Vec::new())
        }
    }

    fn payload(version: u64) -> SavePageRequest {
        SavePageRequest {
            page_id: "page-1".to_string(),
            content: Default::default(),
            widgets: BTreeMap::new(),
            is_published: false,
            version,
        }
    }

    #[tokio::test]
    async fn test_save_records_state() {
        let client = Arc::new(RecordingClient::default());
        let coordinator = AutosaveCoordinator::new(client.clone());

        let attempt = coordinator.save_now(payload(1)).await;
        assert_eq!(attempt, SaveAttempt::Completed);
        assert_eq!(client.versions(), vec![1]);

        let state = coordinator.state();
        assert!(!state.is_saving);
        assert!(state.last_saved.is_some());
        assert!(state.save_error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_save_is_skipped_not_queued() {
        let client = Arc::new(RecordingClient::slow(Duration::from_secs(1)));
        let coordinator = Arc::new(AutosaveCoordinator::new(client.clone()));

        let first = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.save_now(payload(1)).await })
        };
        // Let the first save take the in-flight slot
        tokio::time::sleep(Duration::from_millis(10)).await;

        let second = coordinator.save_now(payload(2)).await;
        assert_eq!(second, SaveAttempt::Skipped);

        assert_eq!(first.await.unwrap(), SaveAttempt::Completed);
        assert_eq!(client.versions(), vec![1]);
    }

    #[tokio::test]
    async fn test_failed_save_sets_error_and_clears_flag() {
        let client = Arc::new(RecordingClient::default());
        client.fail.store(true, Ordering::SeqCst);
        let coordinator = AutosaveCoordinator::new(client.clone());

        let attempt = coordinator.save_now(payload(1)).await;
        assert_eq!(attempt, SaveAttempt::Failed);

        let state = coordinator.state();
        assert!(!state.is_saving);
        assert!(state.save_error.unwrap().contains("boom"));
        assert!(client.versions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_coalesces_burst_into_trailing_call() {
        let client = Arc::new(RecordingClient::default());
        let coordinator = Arc::new(AutosaveCoordinator::new(client.clone()));
        let saver = DebouncedSaver::spawn(coordinator, Duration::from_millis(1500));

        // A rapid burst inside the quiet window
        for version in 1..=5 {
            saver.request(payload(version));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        // Quiet period elapses: exactly one save, the newest payload
        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(client.versions(), vec![5]);

        saver.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_separate_bursts_save_separately() {
        let client = Arc::new(RecordingClient::default());
        let coordinator = Arc::new(AutosaveCoordinator::new(client.clone()));
        let saver = DebouncedSaver::spawn(coordinator, Duration::from_millis(1500));

        saver.request(payload(1));
        tokio::time::sleep(Duration::from_millis(2000)).await;

        saver.request(payload(2));
        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert_eq!(client.versions(), vec![1, 2]);
        saver.shutdown().await;
    }
}
