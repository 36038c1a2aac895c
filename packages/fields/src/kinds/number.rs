//! Numeric fields.

use crate::registry::{FieldKind, FieldRegistry};
use crate::render::{SchemaDescriptor, ValueType};
use crate::rules::FieldRules;
use serde_json::Value;

const STEP_EPSILON: f64 = 1e-9;

#[derive(Debug)]
pub struct NumberField;

impl NumberField {
    fn as_number(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FieldKind for NumberField {
    fn kind(&self) -> &'static str {
        "number"
    }

    fn validate(&self, value: &Value, rules: &FieldRules, _registry: &FieldRegistry) -> Vec<String> {
        let mut errors = Vec::new();

        let Some(number) = Self::as_number(value) else {
            return vec!["Must be a number".to_string()];
        };

        if let Some(min) = rules.min {
            if number < min {
                errors.push(format!("Must be at least {}", min));
            }
        }
        if let Some(max) = rules.max {
            if number > max {
                errors.push(format!("Must be at most {}", max));
            }
        }
        if let Some(step) = rules.step {
            if step > 0.0 {
                let offset = rules.min.unwrap_or(0.0);
                let remainder = ((number - offset) % step).abs();
                if remainder > STEP_EPSILON && (step - remainder).abs() > STEP_EPSILON {
                    errors.push(format!("Must be a multiple of {}", step));
                }
            }
        }

        errors
    }

    fn sanitize(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Value {
        match value {
            Value::Number(_) => value.clone(),
            // Coerce numeric strings, preserving int vs float
            Value::String(s) => {
                let trimmed = s.trim();
                if let Ok(int) = trimmed.parse::<i64>() {
                    Value::from(int)
                } else if let Ok(float) = trimmed.parse::<f64>() {
                    Value::from(float)
                } else {
                    value.clone()
                }
            }
            other => other.clone(),
        }
    }

    fn schema(&self) -> SchemaDescriptor {
        SchemaDescriptor::scalar("number", ValueType::Number)
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
    fn test_sanitize_preserves_int_vs_float() {
        let field = NumberField;
        assert_eq!(field.sanitize(&json!("42"), &FieldRules::default(), &registry()), json!(42));
        assert_eq!(field.sanitize(&json!("3.5"), &FieldRules::default(), &registry()), json!(3.5));
        assert_eq!(field.sanitize(&json!(" 7 "), &FieldRules::default(), &registry()), json!(7));
        assert_eq!(
            field.sanitize(&json!("not-a-number"), &FieldRules::default(), &registry()),
            json!("not-a-number")
        );
    }

    #[test]
    fn test_range_validation() {
        let field = NumberField;
        let rules = FieldRules::default().with_range(Some(8.0), Some(96.0));

        assert!(field.validate(&json!(16), &rules, &registry()).is_empty());
        assert_eq!(
            field.validate(&json!(4), &rules, &registry()),
            vec!["Must be at least 8"]
        );
        assert_eq!(
            field.validate(&json!(100), &rules, &registry()),
            vec!["Must be at most 96"]
        );
    }

    #[test]
    fn test_step_remainder() {
        let field = NumberField;
        let rules = FieldRules::default()
            .with_range(Some(0.0), None)
            .with_step(0.5);

        assert!(field.validate(&json!(1.5), &rules, &registry()).is_empty());
        assert!(field.validate(&json!(2), &rules, &registry()).is_empty());
        assert_eq!(
            field.validate(&json!(1.3), &rules, &registry()),
            vec!["Must be a multiple of 0.5"]
        );
    }

    #[test]
    fn test_step_respects_min_offset() {
        let field = NumberField;
        let rules = FieldRules::default()
            .with_range(Some(1.0), None)
            .with_step(2.0);

        // Valid values are 1, 3, 5, ...
        assert!(field.validate(&json!(5), &rules, &registry()).is_empty());
        assert!(!field.validate(&json!(4), &rules, &registry()).is_empty());
    }

    #[test]
    fn test_numeric_string_accepted() {
        let field = NumberField;
        assert!(field
            .validate(&json!("12"), &FieldRules::default(), &registry())
            .is_empty());
        assert_eq!(
            field.validate(&json!([1]), &FieldRules::default(), &registry()),
            vec!["Must be a number"]
        );
    }
}
