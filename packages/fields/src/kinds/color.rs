//! Hex color fields.

use crate::registry::{FieldKind, FieldRegistry};
use crate::render::{SchemaDescriptor, ValueType};
use crate::rules::FieldRules;
use serde_json::Value;

pub const DEFAULT_COLOR: &str = "#000000";

/// Normalize a color token to `#RRGGBB` uppercase. Accepts an optional
/// leading `#` and 3-digit shorthand; anything else is rejected.
pub fn normalize_hex(input: &str) -> Option<String> {
    let digits = input.trim().trim_start_matches('#');

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };

    if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    Some(format!("#{}", expanded.to_ascii_uppercase()))
}

/// Strict `#RRGGBB` check used at validation time (no shorthand leniency)
pub fn is_canonical_hex(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(u8::is_ascii_hexdigit)
}

#[derive(Debug)]
pub struct ColorField;

impl FieldKind for ColorField {
    fn kind(&self) -> &'static str {
        "color"
    }

    fn validate(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Vec<String> {
        match value.as_str() {
            Some(s) if is_canonical_hex(s) => Vec::new(),
            _ => vec!["Must be a hex color like #3366FF".to_string()],
        }
    }

    fn sanitize(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Value {
        let normalized = value
            .as_str()
            .and_then(normalize_hex)
            .unwrap_or_else(|| DEFAULT_COLOR.to_string());
        Value::String(normalized)
    }

    fn schema(&self) -> SchemaDescriptor {
        SchemaDescriptor::scalar("color", ValueType::String)
    }
}
