//! # Pagewright Fields
//!
//! Declarative field-type system for widget/section/column settings.
//!
//! Every setting a widget exposes is described by a [`FieldDefinition`]
//! naming a field kind (`text`, `color`, `spacing`, `repeater`, ...). The
//! [`FieldRegistry`] maps kind names to [`FieldKind`] implementations, each
//! providing four pure operations:
//!
//! - `validate` - semantic checks against declared rules, returned as a
//!   list of human-readable strings (never thrown)
//! - `sanitize` - coercion/cleanup of raw values
//! - `render` - merge declared config with a stored value into the exact
//!   structure a settings UI needs
//! - `schema` - static shape metadata for tooling introspection
//!
//! The same declarative configuration drives validation here and CSS
//! generation in `pagewright-compiler-css`.
//!
//! Unknown kinds degrade gracefully: `validate` reports the unknown kind as
//! a single error, `sanitize` passes the value through unchanged, `render`
//! yields nothing. Only malformed registrations (empty or duplicate kind
//! names) are hard errors.

pub mod condition;
pub mod definition;
pub mod error;
pub mod kinds;
pub mod registry;
pub mod render;
pub mod rules;
pub mod schema;
pub mod shorthand;
pub mod units;

pub use condition::{ConditionOperator, FieldCondition};
pub use definition::FieldDefinition;
pub use error::FieldError;
pub use registry::{FieldKind, FieldRegistry};
pub use render::{RenderDescriptor, SchemaDescriptor, ValueType};
pub use rules::FieldRules;
pub use schema::{PopulatedGroup, PopulatedSchema, SettingsGroup, WidgetSchema};
pub use shorthand::{format_spacing, parse_spacing, Spacing};
pub use units::{CssLength, CssUnit};
