//! Registration-time errors.
//!
//! Field *validation* failures are plain data (string lists) and never use
//! this type; only programmer-facing schema problems raise hard errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("Field kind name must not be empty")]
    EmptyKindName,

    #[error("Field kind already registered: {0}")]
    DuplicateKind(String),

    #[error("Malformed field definition '{name}': {reason}")]
    MalformedDefinition { name: String, reason: String },
}
