//! Single-length (`dimension`) and box-side (`spacing`) fields.

use crate::registry::{base_descriptor, FieldKind, FieldRegistry};
use crate::render::{RenderDescriptor, SchemaDescriptor, ValueType};
use crate::rules::FieldRules;
use crate::shorthand::Spacing;
use crate::units::{CssLength, CssUnit};
use pagewright_model::SettingsMap;
use serde_json::Value;

fn allowed_units(rules: &FieldRules) -> Vec<&str> {
    match &rules.units {
        Some(units) => units.iter().map(String::as_str).collect(),
        None => CssUnit::ALL.iter().map(|u| u.as_str()).collect(),
    }
}

/// A single CSS length, stored canonically as `{value, unit}`
#[derive(Debug)]
pub struct DimensionField;

impl FieldKind for DimensionField {
    fn kind(&self) -> &'static str {
        "dimension"
    }

    fn validate(&self, value: &Value, rules: &FieldRules, _registry: &FieldRegistry) -> Vec<String> {
        let mut errors = Vec::new();

        let Some(length) = CssLength::from_value(value) else {
            return vec!["Must be a length like 10px or 1.5em".to_string()];
        };

        let units = allowed_units(rules);
        if !units.contains(&length.unit.as_str()) {
            errors.push(format!(
                "Unit \"{}\" is not allowed here (use {})",
                length.unit,
                units.join(", ")
            ));
        }

        if let Some(min) = rules.min {
            if length.value < min {
                errors.push(format!("Must be at least {}", min));
            }
        }
        if let Some(max) = rules.max {
            if length.value > max {
                errors.push(format!("Must be at most {}", max));
            }
        }

        errors
    }

    fn sanitize(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Value {
        match CssLength::from_value(value) {
            Some(length) => length.to_value(),
            None => value.clone(),
        }
    }

    fn render(
        &self,
        definition: &crate::definition::FieldDefinition,
        value: Option<&Value>,
        siblings: &SettingsMap,
    ) -> RenderDescriptor {
        let mut descriptor = base_descriptor(definition, value, siblings);
        let units: Vec<Value> = allowed_units(&definition.rules)
            .into_iter()
            .map(Value::from)
            .collect();
        descriptor
            .constraints
            .insert("units".to_string(), Value::Array(units));
        descriptor
    }

    fn schema(&self) -> SchemaDescriptor {
        SchemaDescriptor::object(
            "dimension",
            [("value", ValueType::Number), ("unit", ValueType::String)],
        )
    }
}

/// Per-side lengths (padding/margin). Accepts CSS shorthand strings and
/// canonicalizes to a `{top, right, bottom, left}` object.
#[derive(Debug)]
pub struct SpacingField;

impl FieldKind for SpacingField {
    fn kind(&self) -> &'static str {
        "spacing"
    }

    fn validate(&self, value: &Value, rules: &FieldRules, _registry: &FieldRegistry) -> Vec<String> {
        let Some(spacing) = Spacing::from_value(value) else {
            return vec!["Must be spacing like \"10px 5px\" or per-side values".to_string()];
        };

        let mut errors = Vec::new();
        let units = allowed_units(rules);
        for (side, length) in [
            ("top", spacing.top),
            ("right", spacing.right),
            ("bottom", spacing.bottom),
            ("left", spacing.left),
        ] {
            if !units.contains(&length.unit.as_str()) {
                errors.push(format!("Unit \"{}\" is not allowed for {}", length.unit, side));
            }
            if let Some(min) = rules.min {
                if length.value < min {
                    errors.push(format!("{} must be at least {}", side, min));
                }
            }
            if let Some(max) = rules.max {
                if length.value > max {
                    errors.push(format!("{} must be at most {}", side, max));
                }
            }
        }

        errors
    }

    fn sanitize(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Value {
        match Spacing::from_value(value) {
            Some(spacing) => spacing.to_value(),
            None => value.clone(),
        }
    }

    fn schema(&self) -> SchemaDescriptor {
        SchemaDescriptor::object(
            "spacing",
            [
                ("top", ValueType::Object),
                ("right", ValueType::Object),
                ("bottom", ValueType::Object),
                ("left", ValueType::Object),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::FieldDefinition;
    use serde_json::json;

    fn registry() -> FieldRegistry {
        FieldRegistry::with_builtins()
    }

    #[test]
    fn test_dimension_validates_unit_whitelist() {
        let field = DimensionField;
        let mut rules = FieldRules::default();
        rules.units = Some(vec!["px".to_string(), "%".to_string()]);

        assert!(field.validate(&json!("10px"), &rules, &registry()).is_empty());
        assert!(field.validate(&json!("50%"), &rules, &registry()).is_empty());
        let errors = field.validate(&json!("2em"), &rules, &registry());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("\"em\" is not allowed"));
    }

    #[test]
    fn test_dimension_sanitize_canonicalizes_strings() {
        let field = DimensionField;
        assert_eq!(
            field.sanitize(&json!("12px"), &FieldRules::default(), &registry()),
            json!({"value": 12.0, "unit": "px"})
        );
        assert_eq!(field.sanitize(&json!("banana"), &FieldRules::default(), &registry()), json!("banana"));
    }

    #[test]
    fn test_dimension_render_includes_units() {
        let field = DimensionField;
        let definition = FieldDefinition::new("dimension", "font_size", "Font size");
        let descriptor = field.render(&definition, None, &SettingsMap::new());

        let units = descriptor.constraints.get("units").unwrap();
        assert!(units.as_array().unwrap().contains(&json!("px")));
    }

    #[test]
    fn test_spacing_accepts_shorthand_and_object() {
        let field = SpacingField;
        let rules = FieldRules::default();

        assert!(field
            .validate(&json!("10px 5px"), &rules, &registry())
            .is_empty());
        assert!(field
            .validate(
                &json!({"top": "1px", "right": "2px", "bottom": "3px", "left": "4px"}),
                &rules,
                &registry()
            )
            .is_empty());
        assert!(!field.validate(&json!(true), &rules, &registry()).is_empty());
    }

    #[test]
    fn test_spacing_sanitize_expands_shorthand() {
        let field = SpacingField;
        let out = field.sanitize(&json!("10px 5px"), &FieldRules::default(), &registry());

        assert_eq!(out["top"], json!({"value": 10.0, "unit": "px"}));
        assert_eq!(out["right"], json!({"value": 5.0, "unit": "px"}));
        assert_eq!(out["bottom"], json!({"value": 10.0, "unit": "px"}));
        assert_eq!(out["left"], json!({"value": 5.0, "unit": "px"}));
    }

    #[test]
    fn test_spacing_range_applies_per_side() {
        let field = SpacingField;
        let rules = FieldRules::default().with_range(Some(0.0), None);

        let errors = field.validate(&json!("10px -4px"), &rules, &registry());
        assert!(errors.iter().any(|e| e.contains("right must be at least 0")));
        assert!(errors.iter().any(|e| e.contains("left must be at least 0")));
    }
}
