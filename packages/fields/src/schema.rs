//! Per-widget settings schemas.
//!
//! A widget declares three field groups (general/style/advanced). The
//! schema is never persisted; when a settings panel opens, the stored
//! settings maps are merged into the definitions to produce the populated
//! control payloads, and on save the same schema drives validation and
//! sanitization.

use crate::definition::FieldDefinition;
use crate::registry::FieldRegistry;
use crate::render::RenderDescriptor;
use pagewright_model::SettingsMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

/// The three settings tabs every widget exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsGroup {
    General,
    Style,
    Advanced,
}

/// Declarative schema for one widget kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSchema {
    pub widget_kind: String,

    #[serde(default)]
    pub general: Vec<FieldDefinition>,

    #[serde(default)]
    pub style: Vec<FieldDefinition>,

    #[serde(default)]
    pub advanced: Vec<FieldDefinition>,
}

/// One populated group: control payloads in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulatedGroup {
    pub group: SettingsGroup,
    pub fields: Vec<RenderDescriptor>,
}

/// All three groups, populated for a settings panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulatedSchema {
    pub widget_kind: String,
    pub general: PopulatedGroup,
    pub style: PopulatedGroup,
    pub advanced: PopulatedGroup,
}

impl WidgetSchema {
    pub fn new(widget_kind: impl Into<String>) -> Self {
        Self {
            widget_kind: widget_kind.into(),
            general: Vec::new(),
            style: Vec::new(),
            advanced: Vec::new(),
        }
    }

    pub fn group(&self, group: SettingsGroup) -> &[FieldDefinition] {
        match group {
            SettingsGroup::General => &self.general,
            SettingsGroup::Style => &self.style,
            SettingsGroup::Advanced => &self.advanced,
        }
    }

    /// Merge stored values into the schema to produce the settings-panel
    /// payload. Unknown field kinds are dropped from the output (the rest
    /// of the panel still renders).
    #[instrument(skip(self, registry, general, style, advanced), fields(widget = %self.widget_kind))]
    pub fn populate(
        &self,
        registry: &FieldRegistry,
        general: &SettingsMap,
        style: &SettingsMap,
        advanced: &SettingsMap,
    ) -> PopulatedSchema {
        PopulatedSchema {
            widget_kind: self.widget_kind.clone(),
            general: populate_group(registry, SettingsGroup::General, &self.general, general),
            style: populate_group(registry, SettingsGroup::Style, &self.style, style),
            advanced: populate_group(registry, SettingsGroup::Advanced, &self.advanced, advanced),
        }
    }

    /// Validate one group's stored values. Returns problems keyed by field
    /// name; an empty map means the group saves cleanly.
    pub fn validate_group(
        &self,
        registry: &FieldRegistry,
        group: SettingsGroup,
        values: &SettingsMap,
    ) -> BTreeMap<String, Vec<String>> {
        let mut errors = BTreeMap::new();

        for definition in self.group(group) {
            if let Some(condition) = &definition.condition {
                if !condition.is_met(values) {
                    continue;
                }
            }

            let field_errors = registry.validate_value(definition, values.get(&definition.name));
            if !field_errors.is_empty() {
                errors.insert(definition.name.clone(), field_errors);
            }
        }

        errors
    }

    /// Sanitize one group's values in place, field by field
    pub fn sanitize_group(
        &self,
        registry: &FieldRegistry,
        group: SettingsGroup,
        values: &SettingsMap,
    ) -> SettingsMap {
        let mut out = values.clone();

        for definition in self.group(group) {
            if let Some(value) = values.get(&definition.name) {
                out.insert(
                    definition.name.clone(),
                    registry.sanitize_field(definition, value),
                );
            }
        }

        out
    }
}

fn populate_group(
    registry: &FieldRegistry,
    group: SettingsGroup,
    definitions: &[FieldDefinition],
    values: &SettingsMap,
) -> PopulatedGroup {
    let fields = definitions
        .iter()
        .filter_map(|definition| {
            registry.render_field(definition, values.get(&definition.name), values)
        })
        .collect();

    PopulatedGroup { group, fields }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::FieldCondition;
    use crate::rules::FieldRules;
    use serde_json::json;

    fn heading_schema() -> WidgetSchema {
        let mut schema = WidgetSchema::new("heading");
        schema.general = vec![
            FieldDefinition::new("text", "text", "Text")
                .required()
                .with_default(json!("Heading")),
            FieldDefinition::new("select", "level", "Level")
                .with_default(json!("h2"))
                .with_rules(FieldRules::default().with_options([("h1", "H1"), ("h2", "H2")])),
        ];
        schema.style = vec![
            FieldDefinition::new("color", "color", "Color").with_default(json!("#000000")),
            FieldDefinition::new("color", "hover_color", "Hover color")
                .with_condition(FieldCondition::eq("hover_enabled", json!(true))),
        ];
        schema
    }

    fn values(v: serde_json::Value) -> SettingsMap {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_populate_merges_values_over_defaults() {
        let schema = heading_schema();
        let registry = FieldRegistry::with_builtins();

        let populated = schema.populate(
            &registry,
            &values(json!({"text": "Welcome"})),
            &SettingsMap::new(),
            &SettingsMap::new(),
        );

        let text = &populated.general.fields[0];
        assert_eq!(text.value, json!("Welcome"));

        // Unset field falls back to its default
        let level = &populated.general.fields[1];
        assert_eq!(level.value, json!("h2"));
        assert!(level.options.as_ref().unwrap().contains_key("h1"));
    }

    #[test]
    fn test_populate_evaluates_conditions() {
        let schema = heading_schema();
        let registry = FieldRegistry::with_builtins();

        let populated = schema.populate(
            &registry,
            &SettingsMap::new(),
            &values(json!({"hover_enabled": true})),
            &SettingsMap::new(),
        );
        assert!(populated.style.fields[1].visible);

        let populated = schema.populate(
            &registry,
            &SettingsMap::new(),
            &values(json!({"hover_enabled": false})),
            &SettingsMap::new(),
        );
        assert!(!populated.style.fields[1].visible);
    }

    #[test]
    fn test_validate_group_keys_errors_by_field() {
        let schema = heading_schema();
        let registry = FieldRegistry::with_builtins();

        let errors = schema.validate_group(
            &registry,
            SettingsGroup::General,
            &values(json!({"level": "h7"})),
        );

        assert_eq!(errors["text"], vec!["Text is required"]);
        assert_eq!(
            errors["level"],
            vec!["\"h7\" is not one of the allowed options"]
        );
    }

    #[test]
    fn test_validate_group_clean_values() {
        let schema = heading_schema();
        let registry = FieldRegistry::with_builtins();

        let errors = schema.validate_group(
            &registry,
            SettingsGroup::General,
            &values(json!({"text": "Hi", "level": "h1"})),
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_sanitize_group() {
        let schema = heading_schema();
        let registry = FieldRegistry::with_builtins();

        let out = schema.sanitize_group(
            &registry,
            SettingsGroup::Style,
            &values(json!({"color": "ff0000"})),
        );
        assert_eq!(out.get("color"), Some(&json!("#FF0000")));
    }
}
