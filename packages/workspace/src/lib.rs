//! # Pagewright Workspace
//!
//! Persistence side of the editor: the collaborator HTTP client, the
//! auto-save coordinator that decides when a mutation hits the backend,
//! and the [`EditorWorkspace`] glue that routes applied mutations to the
//! right save path.
//!
//! Structural changes (add/remove/reorder/move) save immediately; pure
//! settings edits wait for an explicit user save. Saves are optimistic:
//! a failure is logged and reflected in save state, never rolled back into
//! the tree.

mod autosave;
mod client;
mod session;
mod workspace;

pub use autosave::{AutosaveCoordinator, DebouncedSaver, SaveAttempt, SaveState};
pub use client::{ClientError, HttpPersistenceClient, PersistenceClient};
pub use session::{EditingSessionClient, EditorPresence, SessionAck};
pub use workspace::EditorWorkspace;
