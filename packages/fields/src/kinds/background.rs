//! Background fields: color, gradient, or image, discriminated by `type`.

use crate::kinds::color::normalize_hex;
use crate::registry::{FieldKind, FieldRegistry};
use crate::render::{SchemaDescriptor, ValueType};
use crate::rules::FieldRules;
use serde_json::{Map, Value};

const BACKGROUND_TYPES: [&str; 4] = ["none", "color", "gradient", "image"];
const GRADIENT_TYPES: [&str; 2] = ["linear", "radial"];
const IMAGE_SIZES: [&str; 3] = ["auto", "cover", "contain"];
const IMAGE_REPEATS: [&str; 4] = ["no-repeat", "repeat", "repeat-x", "repeat-y"];

#[derive(Debug)]
pub struct BackgroundField;

impl BackgroundField {
    fn validate_gradient(gradient: &Value, errors: &mut Vec<String>) {
        let Some(map) = gradient.as_object() else {
            errors.push("gradient must be an object".to_string());
            return;
        };

        if let Some(kind) = map.get("type").and_then(Value::as_str) {
            if !GRADIENT_TYPES.contains(&kind) {
                errors.push(format!("\"{}\" is not a gradient type", kind));
            }
        }

        if let Some(angle) = map.get("angle") {
            match angle.as_f64() {
                Some(a) if (0.0..=360.0).contains(&a) => {}
                _ => errors.push("gradient angle must be 0-360".to_string()),
            }
        }

        match map.get("stops").and_then(Value::as_array) {
            Some(stops) if stops.len() >= 2 => {
                for (i, stop) in stops.iter().enumerate() {
                    let color_ok = stop
                        .get("color")
                        .and_then(Value::as_str)
                        .and_then(normalize_hex)
                        .is_some();
                    if !color_ok {
                        errors.push(format!("gradient stop {} needs a hex color", i + 1));
                    }
                    if let Some(position) = stop.get("position") {
                        match position.as_f64() {
                            Some(p) if (0.0..=100.0).contains(&p) => {}
                            _ => errors.push(format!("gradient stop {} position must be 0-100", i + 1)),
                        }
                    }
                }
            }
            _ => errors.push("gradient needs at least 2 stops".to_string()),
        }
    }

    fn validate_image(image: &Value, errors: &mut Vec<String>) {
        let Some(map) = image.as_object() else {
            errors.push("image must be an object".to_string());
            return;
        };

        if map.get("url").and_then(Value::as_str).unwrap_or("").is_empty() {
            errors.push("image needs a url".to_string());
        }
        if let Some(size) = map.get("size").and_then(Value::as_str) {
            if !IMAGE_SIZES.contains(&size) {
                errors.push(format!("\"{}\" is not an image size", size));
            }
        }
        if let Some(repeat) = map.get("repeat").and_then(Value::as_str) {
            if !IMAGE_REPEATS.contains(&repeat) {
                errors.push(format!("\"{}\" is not an image repeat mode", repeat));
            }
        }
    }

    fn sanitize_stops(map: &mut Map<String, Value>) {
        let Some(Value::Object(gradient)) = map.get_mut("gradient") else {
            return;
        };
        let Some(Value::Array(stops)) = gradient.get_mut("stops") else {
            return;
        };

        for stop in stops {
            if let Value::Object(stop) = stop {
                if let Some(normalized) = stop
                    .get("color")
                    .and_then(Value::as_str)
                    .and_then(normalize_hex)
                {
                    stop.insert("color".to_string(), Value::String(normalized));
                }
            }
        }
    }
}

impl FieldKind for BackgroundField {
    fn kind(&self) -> &'static str {
        "background"
    }

    fn validate(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Vec<String> {
        let Some(map) = value.as_object() else {
            return vec!["Must be a background object".to_string()];
        };

        let mut errors = Vec::new();
        let kind = map.get("type").and_then(Value::as_str).unwrap_or("none");

        if !BACKGROUND_TYPES.contains(&kind) {
            return vec![format!("\"{}\" is not a background type", kind)];
        }

        match kind {
            "color" => {
                let ok = map
                    .get("color")
                    .and_then(Value::as_str)
                    .and_then(normalize_hex)
                    .is_some();
                if !ok {
                    errors.push("background color must be a hex color".to_string());
                }
            }
            "gradient" => match map.get("gradient") {
                Some(gradient) => Self::validate_gradient(gradient, &mut errors),
                None => errors.push("gradient settings are missing".to_string()),
            },
            "image" => match map.get("image") {
                Some(image) => Self::validate_image(image, &mut errors),
                None => errors.push("image settings are missing".to_string()),
            },
            _ => {}
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
        Self::sanitize_stops(&mut out);

        Value::Object(out)
    }

    fn schema(&self) -> SchemaDescriptor {
        SchemaDescriptor::object(
            "background",
            [
                ("type", ValueType::String),
                ("color", ValueType::String),
                ("gradient", ValueType::Object),
                ("image", ValueType::Object),
            ],
        )
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
    fn test_color_background() {
        let field = BackgroundField;
        assert!(field
            .validate(
                &json!({"type": "color", "color": "#AABBCC"}),
                &FieldRules::default(),
                &registry()
            )
            .is_empty());
        assert_eq!(
            field.validate(
                &json!({"type": "color", "color": "red"}),
                &FieldRules::default(),
                &registry()
            ),
            vec!["background color must be a hex color"]
        );
    }

    #[test]
    fn test_gradient_background() {
        let field = BackgroundField;
        let good = json!({
            "type": "gradient",
            "gradient": {
                "type": "linear",
                "angle": 45,
                "stops": [
                    {"color": "#000000", "position": 0},
                    {"color": "#FFFFFF", "position": 100},
                ],
            },
        });
        assert!(field
            .validate(&good, &FieldRules::default(), &registry())
            .is_empty());

        let one_stop = json!({
            "type": "gradient",
            "gradient": {"type": "linear", "stops": [{"color": "#000000"}]},
        });
        assert_eq!(
            field.validate(&one_stop, &FieldRules::default(), &registry()),
            vec!["gradient needs at least 2 stops"]
        );
    }

    #[test]
    fn test_image_background() {
        let field = BackgroundField;
        let missing_url = json!({"type": "image", "image": {"size": "cover"}});
        assert_eq!(
            field.validate(&missing_url, &FieldRules::default(), &registry()),
            vec!["image needs a url"]
        );
    }

    #[test]
    fn test_sanitize_normalizes_nested_colors() {
        let field = BackgroundField;
        let out = field.sanitize(
            &json!({
                "type": "gradient",
                "color": "abc",
                "gradient": {"stops": [{"color": "fff"}, {"color": "#000"}]},
            }),
            &FieldRules::default(),
            &registry(),
        );

        assert_eq!(out["color"], json!("#AABBCC"));
        assert_eq!(out["gradient"]["stops"][0]["color"], json!("#FFFFFF"));
        assert_eq!(out["gradient"]["stops"][1]["color"], json!("#000000"));
    }

    #[test]
    fn test_unknown_background_type() {
        let field = BackgroundField;
        assert_eq!(
            field.validate(&json!({"type": "video"}), &FieldRules::default(), &registry()),
            vec!["\"video\" is not a background type"]
        );
    }
}
