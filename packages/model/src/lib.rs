//! # Pagewright Model
//!
//! The page content tree: sections → columns → widgets.
//!
//! This crate holds the pure data model shared by every other pagewright
//! package. It knows nothing about editing, drag-and-drop or persistence
//! scheduling - only the shape of a page, how to walk it, and how to split
//! it into the layout/widget wire payloads the backend stores separately.

pub mod content;
pub mod settings;
pub mod wire;

pub use content::*;
pub use settings::*;
pub use wire::*;
