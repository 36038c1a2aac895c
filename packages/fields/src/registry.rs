//! The field-kind registry: a pure lookup table from kind name to
//! implementation. Built-ins are installed by the constructor; callers may
//! register additional kinds. Explicitly constructed and passed around -
//! no global state - so multiple editors and isolated tests can each hold
//! their own.

use crate::definition::FieldDefinition;
use crate::error::FieldError;
use crate::render::{RenderDescriptor, SchemaDescriptor};
use crate::rules::FieldRules;
use pagewright_model::SettingsMap;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// One field kind's implementation. All operations are pure: they never
/// panic on malformed input and never touch state outside their arguments.
pub trait FieldKind: Send + Sync + fmt::Debug {
    /// Kind name this implementation is registered under
    fn kind(&self) -> &'static str;

    /// Semantic checks against the declared rules. Returns human-readable
    /// problems; an empty list means the value is acceptable. Composite
    /// kinds recurse through the registry for their children.
    fn validate(&self, value: &Value, rules: &FieldRules, registry: &FieldRegistry) -> Vec<String>;

    /// Coerce/clean a raw value into this kind's canonical shape.
    /// Composite kinds use the rules' child schema to recurse.
    fn sanitize(&self, value: &Value, rules: &FieldRules, registry: &FieldRegistry) -> Value;

    /// Merge declared config with a current value into a control payload.
    /// The default implementation covers scalar kinds; kinds with extra
    /// constraints override and extend it.
    fn render(
        &self,
        definition: &FieldDefinition,
        value: Option<&Value>,
        siblings: &SettingsMap,
    ) -> RenderDescriptor {
        base_descriptor(definition, value, siblings)
    }

    /// Static shape metadata
    fn schema(&self) -> SchemaDescriptor;
}

/// Shared descriptor scaffolding: default fallback, condition evaluation,
/// placeholder, option table and numeric constraints from the rules.
pub fn base_descriptor(
    definition: &FieldDefinition,
    value: Option<&Value>,
    siblings: &SettingsMap,
) -> RenderDescriptor {
    let mut constraints = serde_json::Map::new();
    let rules = &definition.rules;

    if let Some(min) = rules.min {
        constraints.insert("min".to_string(), min.into());
    }
    if let Some(max) = rules.max {
        constraints.insert("max".to_string(), max.into());
    }
    if let Some(step) = rules.step {
        constraints.insert("step".to_string(), step.into());
    }
    if let Some(min_length) = rules.min_length {
        constraints.insert("min_length".to_string(), min_length.into());
    }
    if let Some(max_length) = rules.max_length {
        constraints.insert("max_length".to_string(), max_length.into());
    }

    let visible = definition
        .condition
        .as_ref()
        .map(|c| c.is_met(siblings))
        .unwrap_or(true);

    RenderDescriptor {
        kind: definition.kind.clone(),
        name: definition.name.clone(),
        label: definition.label.clone(),
        value: value.cloned().unwrap_or_else(|| definition.default.clone()),
        default: definition.default.clone(),
        required: rules.required,
        visible,
        placeholder: definition.config_str("placeholder").map(str::to_string),
        options: rules.options.clone(),
        constraints,
    }
}

/// Registry of field kinds
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    kinds: HashMap<String, Arc<dyn FieldKind>>,
}

impl FieldRegistry {
    /// Registry with every builtin kind installed
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        crate::kinds::register_builtins(&mut registry);
        registry
    }

    /// Registry with no kinds (tests, fully-custom setups)
    pub fn empty() -> Self {
        Self {
            kinds: HashMap::new(),
        }
    }

    /// Register a kind. Empty names and duplicates are programmer errors
    /// and the only hard failures in this crate.
    pub fn register(&mut self, implementation: Arc<dyn FieldKind>) -> Result<(), FieldError> {
        let name = implementation.kind();
        if name.is_empty() {
            return Err(FieldError::EmptyKindName);
        }
        if self.kinds.contains_key(name) {
            return Err(FieldError::DuplicateKind(name.to_string()));
        }

        debug!(kind = name, "Registering field kind");
        self.kinds.insert(name.to_string(), implementation);
        Ok(())
    }

    pub fn get(&self, kind: &str) -> Option<&dyn FieldKind> {
        self.kinds.get(kind).map(Arc::as_ref)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    pub fn kind_names(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    /// Validate a stored value against a definition. A missing value is an
    /// error only when the field is required; an unknown kind yields one
    /// descriptive error instead of panicking.
    pub fn validate_value(
        &self,
        definition: &FieldDefinition,
        value: Option<&Value>,
    ) -> Vec<String> {
        let label = if definition.label.is_empty() {
            &definition.name
        } else {
            &definition.label
        };

        let present = value.map(is_present).unwrap_or(false);
        if !present {
            if definition.rules.required {
                return vec![format!("{} is required", label)];
            }
            return Vec::new();
        }
        let value = value.expect("present implies Some");

        match self.get(&definition.kind) {
            Some(kind) => kind.validate(value, &definition.rules, self),
            None => vec![format!("Unknown field type \"{}\"", definition.kind)],
        }
    }

    /// Sanitize a value through its kind with no extra rules; unknown
    /// kinds pass the value through unchanged
    pub fn sanitize_value(&self, kind: &str, value: &Value) -> Value {
        match self.get(kind) {
            Some(implementation) => implementation.sanitize(value, &FieldRules::default(), self),
            None => value.clone(),
        }
    }

    /// Sanitize a value for a full definition, so composite kinds see
    /// their child schema
    pub fn sanitize_field(&self, definition: &FieldDefinition, value: &Value) -> Value {
        match self.get(&definition.kind) {
            Some(implementation) => implementation.sanitize(value, &definition.rules, self),
            None => value.clone(),
        }
    }

    /// Render a field into its control payload; `None` for unknown kinds
    pub fn render_field(
        &self,
        definition: &FieldDefinition,
        value: Option<&Value>,
        siblings: &SettingsMap,
    ) -> Option<RenderDescriptor> {
        self.get(&definition.kind)
            .map(|kind| kind.render(definition, value, siblings))
    }

    /// Shape metadata for a kind; `None` for unknown kinds
    pub fn schema_for(&self, kind: &str) -> Option<SchemaDescriptor> {
        self.get(kind).map(|implementation| implementation.schema())
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Whether a stored value counts as "set" for required-field purposes
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_kind_degrades_gracefully() {
        let registry = FieldRegistry::with_builtins();
        let definition = FieldDefinition::new("holographic", "wow", "Wow");

        let errors = registry.validate_value(&definition, Some(&json!("x")));
        assert_eq!(errors, vec!["Unknown field type \"holographic\""]);

        // Sanitize passes through, render yields nothing
        assert_eq!(
            registry.sanitize_value("holographic", &json!([1, 2])),
            json!([1, 2])
        );
        assert!(registry
            .render_field(&definition, None, &SettingsMap::new())
            .is_none());
    }

    #[test]
    fn test_missing_optional_value_is_fine() {
        let registry = FieldRegistry::with_builtins();
        let definition = FieldDefinition::new("text", "title", "Title");

        assert!(registry.validate_value(&definition, None).is_empty());
        assert!(registry
            .validate_value(&definition, Some(&Value::Null))
            .is_empty());
    }

    #[test]
    fn test_missing_required_value_reports_label() {
        let registry = FieldRegistry::with_builtins();
        let definition = FieldDefinition::new("text", "title", "Title").required();

        assert_eq!(
            registry.validate_value(&definition, None),
            vec!["Title is required"]
        );
        assert_eq!(
            registry.validate_value(&definition, Some(&json!(""))),
            vec!["Title is required"]
        );
    }

    #[test]
    fn test_duplicate_registration_is_hard_error() {
        let mut registry = FieldRegistry::with_builtins();
        let result = registry.register(Arc::new(crate::kinds::text::TextField::single_line()));
        assert_eq!(result, Err(FieldError::DuplicateKind("text".to_string())));
    }
}
