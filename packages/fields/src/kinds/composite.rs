//! Composite kinds: `group` (named children) and `repeater` (arrays of
//! child records). Both delegate to the registry per child field.

use crate::registry::{FieldKind, FieldRegistry};
use crate::render::{SchemaDescriptor, ValueType};
use crate::rules::FieldRules;
use pagewright_model::SettingsMap;
use serde_json::{Map, Value};

/// Validate one object's worth of child fields. Children whose visibility
/// condition is not met by their siblings are skipped entirely.
fn validate_children(
    children: &[crate::definition::FieldDefinition],
    values: &Map<String, Value>,
    registry: &FieldRegistry,
) -> Vec<String> {
    let siblings = SettingsMap::from(values.clone());
    let mut errors = Vec::new();

    for child in children {
        if let Some(condition) = &child.condition {
            if !condition.is_met(&siblings) {
                continue;
            }
        }
        errors.extend(registry.validate_value(child, values.get(&child.name)));
    }

    errors
}

fn sanitize_children(
    children: &[crate::definition::FieldDefinition],
    values: &Map<String, Value>,
    registry: &FieldRegistry,
) -> Map<String, Value> {
    let mut out = values.clone();
    for child in children {
        if let Some(value) = values.get(&child.name) {
            out.insert(child.name.clone(), registry.sanitize_field(child, value));
        }
    }
    out
}

/// A named cluster of child fields stored as one object
#[derive(Debug)]
pub struct GroupField;

impl FieldKind for GroupField {
    fn kind(&self) -> &'static str {
        "group"
    }

    fn validate(&self, value: &Value, rules: &FieldRules, registry: &FieldRegistry) -> Vec<String> {
        let Some(map) = value.as_object() else {
            return vec!["Must be a settings group".to_string()];
        };

        match &rules.fields {
            Some(children) => validate_children(children, map, registry),
            None => Vec::new(),
        }
    }

    fn sanitize(&self, value: &Value, rules: &FieldRules, registry: &FieldRegistry) -> Value {
        match (value.as_object(), &rules.fields) {
            (Some(map), Some(children)) => {
                Value::Object(sanitize_children(children, map, registry))
            }
            _ => value.clone(),
        }
    }

    fn schema(&self) -> SchemaDescriptor {
        SchemaDescriptor::scalar("group", ValueType::Object)
    }
}

/// An ordered array of child records, each validated against the declared
/// child schema; errors are keyed by item index.
#[derive(Debug)]
pub struct RepeaterField;

impl FieldKind for RepeaterField {
    fn kind(&self) -> &'static str {
        "repeater"
    }

    fn validate(&self, value: &Value, rules: &FieldRules, registry: &FieldRegistry) -> Vec<String> {
        let Some(items) = value.as_array() else {
            return vec!["Must be a list of items".to_string()];
        };

        let mut errors = Vec::new();

        if let Some(min) = rules.min_items {
            if items.len() < min {
                errors.push(format!("Needs at least {} items", min));
            }
        }
        if let Some(max) = rules.max_items {
            if items.len() > max {
                errors.push(format!("Allows at most {} items", max));
            }
        }

        if let Some(children) = &rules.fields {
            for (index, item) in items.iter().enumerate() {
                match item.as_object() {
                    Some(map) => {
                        for error in validate_children(children, map, registry) {
                            errors.push(format!("items[{}]: {}", index, error));
                        }
                    }
                    None => errors.push(format!("items[{}]: must be an object", index)),
                }
            }
        }

        errors
    }

    fn sanitize(&self, value: &Value, rules: &FieldRules, registry: &FieldRegistry) -> Value {
        let Some(items) = value.as_array() else {
            return value.clone();
        };

        Value::Array(
            items
                .iter()
                .map(|item| match (item.as_object(), &rules.fields) {
                    (Some(map), Some(children)) => {
                        Value::Object(sanitize_children(children, map, registry))
                    }
                    _ => item.clone(),
                })
                .collect(),
        )
    }

    fn schema(&self) -> SchemaDescriptor {
        SchemaDescriptor::scalar("repeater", ValueType::Array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::FieldCondition;
    use crate::definition::FieldDefinition;
    use serde_json::json;

    fn registry() -> FieldRegistry {
        FieldRegistry::with_builtins()
    }

    fn item_schema() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("text", "title", "Title").required(),
            FieldDefinition::new("link", "url", "URL"),
        ]
    }

    #[test]
    fn test_repeater_length_bounds() {
        let field = RepeaterField;
        let rules = FieldRules::default().with_items(Some(1), Some(2));

        assert!(field
            .validate(&json!([{"title": "a"}]), &rules, &registry())
            .is_empty());
        assert_eq!(
            field.validate(&json!([]), &rules, &registry()),
            vec!["Needs at least 1 items"]
        );
        assert_eq!(
            field.validate(&json!([{}, {}, {}]), &rules, &registry()),
            vec!["Allows at most 2 items"]
        );
    }

    #[test]
    fn test_repeater_recurses_with_item_index() {
        let field = RepeaterField;
        let rules = FieldRules::default().with_fields(item_schema());

        let errors = field.validate(
            &json!([
                {"title": "ok", "url": "/a"},
                {"url": "https://example.com"},
            ]),
            &rules,
            &registry(),
        );

        assert_eq!(errors, vec!["items[1]: Title is required"]);
    }

    #[test]
    fn test_repeater_rejects_non_object_items() {
        let field = RepeaterField;
        let rules = FieldRules::default().with_fields(item_schema());

        let errors = field.validate(&json!(["plain"]), &rules, &registry());
        assert_eq!(errors, vec!["items[0]: must be an object"]);
    }

    #[test]
    fn test_group_validates_children() {
        let field = GroupField;
        let rules = FieldRules::default().with_fields(item_schema());

        assert!(field
            .validate(&json!({"title": "hi"}), &rules, &registry())
            .is_empty());
        assert_eq!(
            field.validate(&json!({}), &rules, &registry()),
            vec!["Title is required"]
        );
    }

    #[test]
    fn test_repeater_sanitize_recurses_into_items() {
        let field = RepeaterField;
        let children = vec![
            FieldDefinition::new("text", "title", "Title"),
            FieldDefinition::new("color", "tint", "Tint"),
        ];
        let rules = FieldRules::default().with_fields(children);

        let out = field.sanitize(
            &json!([{"title": "  hi  ", "tint": "abc"}]),
            &rules,
            &registry(),
        );

        assert_eq!(out[0]["title"], json!("hi"));
        assert_eq!(out[0]["tint"], json!("#AABBCC"));
    }

    #[test]
    fn test_group_skips_children_with_unmet_conditions() {
        let field = GroupField;
        let conditional = FieldDefinition::new("color", "tint", "Tint")
            .required()
            .with_condition(FieldCondition::eq("mode", json!("tinted")));
        let rules = FieldRules::default().with_fields(vec![conditional]);

        // Condition unmet: required tint is not enforced
        assert!(field
            .validate(&json!({"mode": "plain"}), &rules, &registry())
            .is_empty());

        // Condition met: required tint is enforced
        assert_eq!(
            field.validate(&json!({"mode": "tinted"}), &rules, &registry()),
            vec!["Tint is required"]
        );
    }
}
