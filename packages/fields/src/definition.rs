//! Field definitions: the declarative descriptor a widget schema is built
//! from. Immutable after construction; never persisted - definitions are
//! merged with stored values at read time to populate the settings UI.

use crate::condition::FieldCondition;
use crate::rules::FieldRules;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field kind name, e.g. `"text"`, `"color"`, `"repeater"`
    #[serde(rename = "type")]
    pub kind: String,

    /// Key under which the value is stored in the settings map
    pub name: String,

    #[serde(default)]
    pub label: String,

    /// Default value when nothing is stored
    #[serde(default)]
    pub default: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<FieldCondition>,

    #[serde(default)]
    pub rules: FieldRules,

    /// Kind-specific configuration (placeholder text, icon library, ...)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub config: Map<String, Value>,
}

impl FieldDefinition {
    pub fn new(kind: impl Into<String>, name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            label: label.into(),
            default: Value::Null,
            condition: None,
            rules: FieldRules::default(),
            config: Map::new(),
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = default;
        self
    }

    pub fn with_rules(mut self, rules: FieldRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_condition(mut self, condition: FieldCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }

    pub fn required(mut self) -> Self {
        self.rules.required = true;
        self
    }

    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }
}
