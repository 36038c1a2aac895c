//! Editing-session collaborator interface.
//!
//! Conflict avoidance only: the service tracks who is editing a page and
//! lets a second editor take over. The content tree does not depend on
//! its answers beyond optionally blocking entry into edit mode, so the
//! interface stays deliberately thin.

use crate::client::ClientError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAck {
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,
}

/// Someone currently holding an editing session on a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorPresence {
    pub user: String,
    pub started_at: DateTime<Utc>,
}

#[async_trait]
pub trait EditingSessionClient: Send + Sync {
    async fn start_session(&self, page_id: &str) -> Result<SessionAck, ClientError>;

    async fn heartbeat(&self, page_id: &str) -> Result<SessionAck, ClientError>;

    async fn end_session(&self, page_id: &str) -> Result<SessionAck, ClientError>;

    /// Forcibly claim the editing session from its current holder
    async fn takeover(&self, page_id: &str) -> Result<SessionAck, ClientError>;

    async fn get_editors(&self, page_id: &str) -> Result<Vec<EditorPresence>, ClientError>;
}
