//! Boolean toggle fields.

use crate::registry::{FieldKind, FieldRegistry};
use crate::render::{SchemaDescriptor, ValueType};
use crate::rules::FieldRules;
use serde_json::Value;

#[derive(Debug)]
pub struct ToggleField;

impl ToggleField {
    /// The legacy wire represents "on" many ways
    fn is_truthy(value: &Value) -> bool {
        match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64() == Some(1.0),
            Value::String(s) => {
                matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "yes" | "on" | "true")
            }
            _ => false,
        }
    }
}

impl FieldKind for ToggleField {
    fn kind(&self) -> &'static str {
        "toggle"
    }

    fn validate(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Vec<String> {
        match value {
            Value::Bool(_) | Value::Number(_) | Value::String(_) => Vec::new(),
            _ => vec!["Must be a yes/no value".to_string()],
        }
    }

    fn sanitize(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Value {
        Value::Bool(Self::is_truthy(value))
    }

    fn schema(&self) -> SchemaDescriptor {
        SchemaDescriptor::scalar("toggle", ValueType::Boolean)
    }
}
