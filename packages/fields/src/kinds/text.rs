//! Plain text fields (`text`, `textarea`).

use crate::registry::{FieldKind, FieldRegistry};
use crate::render::{SchemaDescriptor, ValueType};
use crate::rules::FieldRules;
use serde_json::Value;

/// Single- or multi-line text. The two kinds share semantics; only the
/// control the UI picks differs.
#[derive(Debug)]
pub struct TextField {
    kind: &'static str,
}

impl TextField {
    pub fn single_line() -> Self {
        Self { kind: "text" }
    }

    pub fn multi_line() -> Self {
        Self { kind: "textarea" }
    }
}

impl FieldKind for TextField {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn validate(&self, value: &Value, rules: &FieldRules, _registry: &FieldRegistry) -> Vec<String> {
        let mut errors = Vec::new();

        let Some(text) = value.as_str() else {
            return vec!["Must be text".to_string()];
        };

        let length = text.chars().count();
        if let Some(min) = rules.min_length {
            if length < min {
                errors.push(format!("Must be at least {} characters", min));
            }
        }
        if let Some(max) = rules.max_length {
            if length > max {
                errors.push(format!("Must be at most {} characters", max));
            }
        }

        errors
    }

    fn sanitize(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Value {
        match value {
            Value::String(s) => Value::String(s.trim().replace('\0', "")),
            // Scalars coerce to their display form
            Value::Number(n) => Value::String(n.to_string()),
            Value::Bool(b) => Value::String(b.to_string()),
            other => other.clone(),
        }
    }

    fn schema(&self) -> SchemaDescriptor {
        SchemaDescriptor::scalar(self.kind, ValueType::String)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> FieldRegistry {
        FieldRegistry::with_builtins()
    }

    #[test]
    fn test_sanitize_trims_and_strips_nul() {
        let field = TextField::single_line();
        assert_eq!(
            field.sanitize(&json!("  hi\0 there  "), &FieldRules::default(), &registry()),
            json!("hi there")
        );
        assert_eq!(field.sanitize(&json!(42), &FieldRules::default(), &registry()), json!("42"));
        assert_eq!(field.sanitize(&json!(true), &FieldRules::default(), &registry()), json!("true"));
    }

    #[test]
    fn test_length_rules() {
        let field = TextField::single_line();
        let rules = FieldRules::default().with_length(Some(2), Some(5));

        assert!(field.validate(&json!("abc"), &rules, &registry()).is_empty());
        assert_eq!(
            field.validate(&json!("a"), &rules, &registry()),
            vec!["Must be at least 2 characters"]
        );
        assert_eq!(
            field.validate(&json!("abcdef"), &rules, &registry()),
            vec!["Must be at most 5 characters"]
        );
    }

    #[test]
    fn test_non_string_rejected() {
        let field = TextField::single_line();
        assert_eq!(
            field.validate(&json!({"a": 1}), &FieldRules::default(), &registry()),
            vec!["Must be text"]
        );
    }
}
