//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Placement rule violation: {0}")]
    Placement(#[from] crate::drag::PlacementError),

    #[error("Integrity error: {0}")]
    Integrity(#[from] pagewright_model::IntegrityError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
