//! Render and schema descriptors.
//!
//! A `RenderDescriptor` is the resolved control payload handed to a
//! settings UI: declared config merged with the current value, default
//! fallback applied, condition evaluated. A `SchemaDescriptor` is static
//! shape metadata for tooling and API introspection.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// JSON shape a field kind stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Any,
}

/// Resolved control payload for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderDescriptor {
    pub kind: String,
    pub name: String,
    pub label: String,

    /// Current value, or the declared default when nothing is stored
    pub value: Value,

    pub default: Value,
    pub required: bool,

    /// Condition outcome against sibling values (hidden controls stay in
    /// the payload so the UI can animate them in without a refetch)
    pub visible: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Option key → label table for select-style controls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<String, String>>,

    /// Numeric/length constraints the control should enforce live
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub constraints: Map<String, Value>,
}

/// Static shape metadata for one field kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    pub kind: String,
    pub value_type: ValueType,

    /// Nested property shapes for object-valued kinds
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, ValueType>,
}

impl SchemaDescriptor {
    pub fn scalar(kind: &str, value_type: ValueType) -> Self {
        Self {
            kind: kind.to_string(),
            value_type,
            properties: BTreeMap::new(),
        }
    }

    pub fn object<I>(kind: &str, properties: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, ValueType)>,
    {
        Self {
            kind: kind.to_string(),
            value_type: ValueType::Object,
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}
