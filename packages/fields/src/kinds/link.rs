//! Link fields: a URL plus optional target/rel.

use crate::registry::{FieldKind, FieldRegistry};
use crate::render::{SchemaDescriptor, ValueType};
use crate::rules::FieldRules;
use serde_json::Value;
use url::Url;

#[derive(Debug)]
pub struct LinkField;

impl LinkField {
    fn url_of(value: &Value) -> Option<&str> {
        match value {
            Value::String(s) => Some(s),
            Value::Object(map) => map.get("url").and_then(Value::as_str),
            _ => None,
        }
    }

    /// Relative page links and fragments are fine; anything with a scheme
    /// must parse as a real URL
    fn check_url(url: &str, errors: &mut Vec<String>) {
        let url = url.trim();
        if url.is_empty() {
            return;
        }

        let relative = url.starts_with('/')
            || url.starts_with('#')
            || url.starts_with('?')
            || url.starts_with("./")
            || url.starts_with("../");
        if relative {
            return;
        }

        if Url::parse(url).is_err() {
            errors.push(format!("\"{}\" is not a valid URL", url));
        }
    }
}

impl FieldKind for LinkField {
    fn kind(&self) -> &'static str {
        "link"
    }

    fn validate(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Vec<String> {
        let mut errors = Vec::new();

        match Self::url_of(value) {
            Some(url) => Self::check_url(url, &mut errors),
            None => errors.push("Must be a URL or a link object".to_string()),
        }

        if let Value::Object(map) = value {
            if let Some(target) = map.get("target").and_then(Value::as_str) {
                if !matches!(target, "_self" | "_blank") {
                    errors.push(format!("\"{}\" is not a valid link target", target));
                }
            }
        }

        errors
    }

    fn sanitize(&self, value: &Value, _rules: &FieldRules, _registry: &FieldRegistry) -> Value {
        match value {
            Value::String(s) => Value::String(s.trim().to_string()),
            Value::Object(map) => {
                let mut out = map.clone();
                if let Some(Value::String(url)) = out.get("url").cloned() {
                    out.insert("url".to_string(), Value::String(url.trim().to_string()));
                }
                Value::Object(out)
            }
            other => other.clone(),
        }
    }

    fn schema(&self) -> SchemaDescriptor {
        SchemaDescriptor::object(
            "link",
            [
                ("url", ValueType::String),
                ("target", ValueType::String),
                ("rel", ValueType::String),
            ],
        )
    }
}
