//! Typography fields: a nested object of font properties.

use crate::kinds::color::normalize_hex;
use crate::registry::{FieldKind, FieldRegistry};
use crate::render::{SchemaDescriptor, ValueType};
use crate::rules::FieldRules;
use crate::units::CssLength;
use serde_json::{Map, Value};

const TEXT_TRANSFORMS: [&str; 4] = ["none", "uppercase", "lowercase", "capitalize"];
const FONT_STYLES: [&str; 3] = ["normal", "italic", "oblique"];
const TEXT_DECORATIONS: [&str; 4] = ["none", "underline", "line-through", "overline"];
const LENGTH_PARTS: [&str; 3] = ["font_size", "line_height", "letter_spacing"];

#[derive(Debug)]
pub struct TypographyField;

impl TypographyField {
    fn check_keyword(map: &Map<String, Value>, key: &str, allowed: &[&str], errors: &mut Vec<String>) {
        if let Some(value) = map.get(key) {
            match value.as_str() {
                Some(s) if allowed.contains(&s) => {}
                _ => errors.push(format!(
                    "{} must be one of: {}",
                    key.replace('_', " "),
                    allowed.join(", ")
                )),
            }
        }
    }

    fn valid_weight(value: &Value) -> bool {
        match value {
            Value::Number(n) => matches!(
                n.as_f64().map(|w| w as i64),
                Some(100 | 200 | 300 | 400 | 500 | 600 | 700 | 800 | 900)
            ),
            Value::String(s) => {
                matches!(s.as_str(), "normal" | "bold" | "lighter" | "bolder")
                    || s.parse::<i64>().map(|w| (100..=900).contains(&w) && w % 100 == 0).unwrap_or(false)
            }
            _ => false,
        }
    }
}

impl FieldKind for TypographyField {
    fn kind(&self) -> &'static str {
        "typography"
    }

    fn validate(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Vec<String> {
        let Some(map) = value.as_object() else {
            return vec!["Must be a typography object".to_string()];
        };

        let mut errors = Vec::new();

        if let Some(family) = map.get("font_family") {
            if !family.is_string() {
                errors.push("font family must be text".to_string());
            }
        }

        for part in LENGTH_PARTS {
            if let Some(length) = map.get(part) {
                if CssLength::from_value(length).is_none() {
                    errors.push(format!("{} must be a length", part.replace('_', " ")));
                }
            }
        }

        if let Some(weight) = map.get("font_weight") {
            if !Self::valid_weight(weight) {
                errors.push("font weight must be 100-900 or a keyword".to_string());
            }
        }

        Self::check_keyword(map, "text_transform", &TEXT_TRANSFORMS, &mut errors);
        Self::check_keyword(map, "font_style", &FONT_STYLES, &mut errors);
        Self::check_keyword(map, "text_decoration", &TEXT_DECORATIONS, &mut errors);

        if let Some(color) = map.get("color") {
            match color.as_str().and_then(normalize_hex) {
                Some(_) => {}
                None => errors.push("color must be a hex color".to_string()),
            }
        }

        errors
    }

    fn sanitize(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Value {
        let Some(map) = value.as_object() else {
            return value.clone();
        };

        let mut out = map.clone();

        // Canonicalize length parts to {value, unit}
        for part in LENGTH_PARTS {
            if let Some(raw) = map.get(part) {
                if let Some(length) = CssLength::from_value(raw) {
                    out.insert(part.to_string(), length.to_value());
                }
            }
        }

        if let Some(color) = map.get("color").and_then(Value::as_str) {
            if let Some(normalized) = normalize_hex(color) {
                out.insert("color".to_string(), Value::String(normalized));
            }
        }

        if let Some(Value::String(family)) = map.get("font_family") {
            out.insert(
                "font_family".to_string(),
                Value::String(family.trim().to_string()),
            );
        }

        Value::Object(out)
    }

    fn schema(&self) -> SchemaDescriptor {
        SchemaDescriptor::object(
            "typography",
            [
                ("font_family", ValueType::String),
                ("font_size", ValueType::Object),
                ("line_height", ValueType::Object),
                ("letter_spacing", ValueType::Object),
                ("font_weight", ValueType::Any),
                ("font_style", ValueType::String),
                ("text_transform", ValueType::String),
                ("text_decoration", ValueType::String),
                ("color", ValueType::String),
            ],
        )
    }
}
