//! Border and box-shadow fields.

use crate::kinds::color::normalize_hex;
use crate::registry::{FieldKind, FieldRegistry};
use crate::render::{SchemaDescriptor, ValueType};
use crate::rules::FieldRules;
use crate::shorthand::Spacing;
use crate::units::CssLength;
use serde_json::Value;

const BORDER_STYLES: [&str; 5] = ["none", "solid", "dashed", "dotted", "double"];

#[derive(Debug)]
pub struct BorderField;

impl FieldKind for BorderField {
    fn kind(&self) -> &'static str {
        "border"
    }

    fn validate(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Vec<String> {
        let Some(map) = value.as_object() else {
            return vec!["Must be a border object".to_string()];
        };

        let mut errors = Vec::new();

        if let Some(width) = map.get("width") {
            if CssLength::from_value(width).is_none() && Spacing::from_value(width).is_none() {
                errors.push("border width must be a length or per-side lengths".to_string());
            }
        }

        if let Some(style) = map.get("style") {
            match style.as_str() {
                Some(s) if BORDER_STYLES.contains(&s) => {}
                _ => errors.push(format!(
                    "border style must be one of: {}",
                    BORDER_STYLES.join(", ")
                )),
            }
        }

        if let Some(color) = map.get("color") {
            if color.as_str().and_then(normalize_hex).is_none() {
                errors.push("border color must be a hex color".to_string());
            }
        }

        if let Some(radius) = map.get("radius") {
            if CssLength::from_value(radius).is_none() && Spacing::from_value(radius).is_none() {
                errors.push("border radius must be a length or per-corner lengths".to_string());
            }
        }

        errors
    }

    fn sanitize(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Value {
        let Some(map) = value.as_object() else {
            return value.clone();
        };

        let mut out = map.clone();
        if let Some(normalized) = map
            .get("color")
            .and_then(Value::as_str)
            .and_then(normalize_hex)
        {
            out.insert("color".to_string(), Value::String(normalized));
        }

        Value::Object(out)
    }

    fn schema(&self) -> SchemaDescriptor {
        SchemaDescriptor::object(
            "border",
            [
                ("width", ValueType::Any),
                ("style", ValueType::String),
                ("color", ValueType::String),
                ("radius", ValueType::Any),
            ],
        )
    }
}

#[derive(Debug)]
pub struct ShadowField;

impl FieldKind for ShadowField {
    fn kind(&self) -> &'static str {
        "shadow"
    }

    fn validate(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Vec<String> {
        let Some(map) = value.as_object() else {
            return vec!["Must be a shadow object".to_string()];
        };

        let mut errors = Vec::new();

        for part in ["x", "y", "blur", "spread"] {
            if let Some(offset) = map.get(part) {
                if !offset.is_number() && CssLength::from_value(offset).is_none() {
                    errors.push(format!("shadow {} must be a length", part));
                }
            }
        }

        if map.get("blur").and_then(Value::as_f64).map(|b| b < 0.0) == Some(true) {
            errors.push("shadow blur cannot be negative".to_string());
        }

        if let Some(color) = map.get("color") {
            if color.as_str().and_then(normalize_hex).is_none() {
                errors.push("shadow color must be a hex color".to_string());
            }
        }

        if let Some(inset) = map.get("inset") {
            if !inset.is_boolean() {
                errors.push("shadow inset must be true or false".to_string());
            }
        }

        errors
    }

    fn sanitize(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Value {
        let Some(map) = value.as_object() else {
            return value.clone();
        };

        let mut out = map.clone();
        if let Some(normalized) = map
            .get("color")
            .and_then(Value::as_str)
            .and_then(normalize_hex)
        {
            out.insert("color".to_string(), Value::String(normalized));
        }

        Value::Object(out)
    }

    fn schema(&self) -> SchemaDescriptor {
        SchemaDescriptor::object(
            "shadow",
            [
                ("x", ValueType::Number),
                ("y", ValueType::Number),
                ("blur", ValueType::Number),
                ("spread", ValueType::Number),
                ("color", ValueType::String),
                ("inset", ValueType::Boolean),
            ],
        )
    }
}
