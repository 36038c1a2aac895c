//! # Pagewright Editor
//!
//! Core page-editing engine: the content-tree store, structural mutations,
//! drag-and-drop resolution, and the navigation outline.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: sections → columns → widgets         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: PageDocument lifecycle + mutations  │
//! │  - Apply mutations with validation          │
//! │  - Dirty tracking against saved snapshot    │
//! │  - Widget snapshots for discard/revert      │
//! │  - Drag gestures → mutation intents         │
//! │  - Outline projection for the sidebar       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ workspace: autosave + persistence client    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is the single source of truth**: the outline and the drag
//!    resolver only read it; every change funnels through one mutation set
//! 2. **Mutations are atomic**: validate first, then apply fully or not at
//!    all - a failed drag leaves the tree untouched
//! 3. **Structural ambiguity degrades to a no-op**: a stale drag target is
//!    logged and ignored, never surfaced as an error
//! 4. **Optimistic persistence**: saves are fire-and-forget; the in-memory
//!    tree is never rolled back on a failed save
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagewright_editor::{Mutation, PageDocument};
//!
//! let mut doc = PageDocument::new("page-1");
//!
//! // Drop a heading on the empty canvas: auto-wraps into a new section
//! let outcome = doc.apply(Mutation::WrapWidgetInSection {
//!     template: heading_template(),
//!     index: None,
//! });
//!
//! assert!(doc.is_dirty());
//! ```

mod document;
mod drag;
mod errors;
mod mutations;
mod outline;

pub use document::{Outcome, PageDocument, WidgetSnapshot};
pub use drag::{resolve_drop, DragPayload, DragState, DropTarget, PlacementError, Resolution};
pub use errors::EditorError;
pub use mutations::{Applied, Breakpoint, Mutation, MutationError, Persistence, SectionPartial};
pub use outline::{
    build_outline, filter_outline, OutlineDrop, OutlineKind, OutlineNode, RapidOpBreaker,
};

// Re-export common types for convenience
pub use pagewright_model::{Column, PageContent, Section, SettingsMap, Widget, WidgetTemplate};
