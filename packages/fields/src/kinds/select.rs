//! Select fields: one (or many) of a declared option table.

use crate::registry::{FieldKind, FieldRegistry};
use crate::render::{SchemaDescriptor, ValueType};
use crate::rules::FieldRules;
use serde_json::Value;

#[derive(Debug)]
pub struct SelectField;

impl SelectField {
    fn check_membership(key: &Value, rules: &FieldRules, errors: &mut Vec<String>) {
        let Some(options) = &rules.options else {
            // No option table declared: nothing to check against
            return;
        };

        match key.as_str() {
            Some(key) if options.contains_key(key) => {}
            Some(key) => errors.push(format!("\"{}\" is not one of the allowed options", key)),
            None => errors.push("Option keys must be text".to_string()),
        }
    }
}

impl FieldKind for SelectField {
    fn kind(&self) -> &'static str {
        "select"
    }

    fn validate(&self, value: &Value, rules: &FieldRules, _registry: &FieldRegistry) -> Vec<String> {
        let mut errors = Vec::new();

        match value {
            Value::Array(items) if rules.multiple => {
                for item in items {
                    Self::check_membership(item, rules, &mut errors);
                }
            }
            Value::Array(_) => {
                errors.push("Multiple values are not allowed here".to_string());
            }
            other => Self::check_membership(other, rules, &mut errors),
        }

        errors
    }

    fn sanitize(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Value {
        match value {
            Value::String(s) => Value::String(s.trim().to_string()),
            // Multi-select: drop duplicates, keep first-seen order
            Value::Array(items) => {
                let mut seen = std::collections::HashSet::new();
                Value::Array(
                    items
                        .iter()
                        .filter(|item| match item.as_str() {
                            Some(s) => seen.insert(s.to_string()),
                            None => true,
                        })
                        .cloned()
                        .collect(),
                )
            }
            other => other.clone(),
        }
    }

    fn schema(&self) -> SchemaDescriptor {
        SchemaDescriptor::scalar("select", ValueType::String)
    }
}
