//! Icon fields: a `library:name` reference into the icon catalog.

use crate::registry::{FieldKind, FieldRegistry};
use crate::render::{SchemaDescriptor, ValueType};
use crate::rules::FieldRules;
use serde_json::Value;

#[derive(Debug)]
pub struct IconField;

impl IconField {
    fn is_valid_reference(reference: &str) -> bool {
        !reference.is_empty()
            && reference.split(':').count() <= 2
            && reference
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
    }
}

impl FieldKind for IconField {
    fn kind(&self) -> &'static str {
        "icon"
    }

    fn validate(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Vec<String> {
        match value.as_str() {
            Some(s) if Self::is_valid_reference(s.trim()) => Vec::new(),
            Some(s) => vec![format!("\"{}\" is not a valid icon reference", s)],
            None => vec!["Must be an icon reference".to_string()],
        }
    }

    fn sanitize(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Value {
        match value {
            Value::String(s) => Value::String(s.trim().to_string()),
            other => other.clone(),
        }
    }

    fn schema(&self) -> SchemaDescriptor {
        SchemaDescriptor::scalar("icon", ValueType::String)
    }
}
