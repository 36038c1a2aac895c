//! Conditional field visibility.
//!
//! A field may declare that it is only relevant when a sibling field holds
//! a particular value, e.g. the `gradient` controls of a background field
//! only show when `background_type == "gradient"`.

use pagewright_model::SettingsMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionOperator {
    #[default]
    Eq,
    Ne,
    In,
    NotIn,
    Truthy,
}

/// `{field, value, operator}` - evaluated against sibling values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCondition {
    pub field: String,

    #[serde(default)]
    pub value: Value,

    #[serde(default)]
    pub operator: ConditionOperator,
}

impl FieldCondition {
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            value,
            operator: ConditionOperator::Eq,
        }
    }

    /// Evaluate against the current values of the surrounding group
    pub fn is_met(&self, values: &SettingsMap) -> bool {
        let current = values.get(&self.field).unwrap_or(&Value::Null);

        match self.operator {
            ConditionOperator::Eq => current == &self.value,
            ConditionOperator::Ne => current != &self.value,
            ConditionOperator::In => match &self.value {
                Value::Array(candidates) => candidates.contains(current),
                _ => false,
            },
            ConditionOperator::NotIn => match &self.value {
                Value::Array(candidates) => !candidates.contains(current),
                _ => true,
            },
            ConditionOperator::Truthy => is_truthy(current),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty() && s != "0" && s != "false",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(v: Value) -> SettingsMap {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_eq_and_ne() {
        let cond = FieldCondition::eq("background_type", json!("gradient"));

        assert!(cond.is_met(&values(json!({"background_type": "gradient"}))));
        assert!(!cond.is_met(&values(json!({"background_type": "color"}))));
        assert!(!cond.is_met(&values(json!({}))));

        let cond = FieldCondition {
            field: "mode".to_string(),
            value: json!("off"),
            operator: ConditionOperator::Ne,
        };
        assert!(cond.is_met(&values(json!({"mode": "on"}))));
        assert!(!cond.is_met(&values(json!({"mode": "off"}))));
    }

    #[test]
    fn test_in_operator() {
        let cond = FieldCondition {
            field: "align".to_string(),
            value: json!(["left", "right"]),
            operator: ConditionOperator::In,
        };

        assert!(cond.is_met(&values(json!({"align": "left"}))));
        assert!(!cond.is_met(&values(json!({"align": "center"}))));
    }

    #[test]
    fn test_truthy_operator() {
        let cond = FieldCondition {
            field: "enabled".to_string(),
            value: Value::Null,
            operator: ConditionOperator::Truthy,
        };

        assert!(cond.is_met(&values(json!({"enabled": true}))));
        assert!(cond.is_met(&values(json!({"enabled": "yes"}))));
        assert!(!cond.is_met(&values(json!({"enabled": false}))));
        assert!(!cond.is_met(&values(json!({"enabled": ""}))));
        assert!(!cond.is_met(&values(json!({}))));
    }
}
