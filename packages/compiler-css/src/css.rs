//! Virtual CSS document: rules collected during generation, serialized to
//! CSS text at the end.

use std::collections::BTreeMap;

/// CSS rule with selector and properties
#[derive(Debug, Clone, PartialEq)]
pub struct CssRule {
    pub selector: String,

    /// Sorted for deterministic output
    pub properties: BTreeMap<String, String>,

    pub media_query: Option<String>,
}

impl CssRule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            properties: BTreeMap::new(),
            media_query: None,
        }
    }

    pub fn with_media_query(mut self, media_query: impl Into<String>) -> Self {
        self.media_query = Some(media_query.into());
        self
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(property.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// CSS document - collection of CSS rules
#[derive(Debug, Clone, Default)]
pub struct VirtualCssDocument {
    pub rules: Vec<CssRule>,
}

impl VirtualCssDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty rules are dropped rather than serialized as `{}` blocks
    pub fn add_rule(&mut self, rule: CssRule) {
        if !rule.is_empty() {
            self.rules.push(rule);
        }
    }

    pub fn extend(&mut self, rules: Vec<CssRule>) {
        for rule in rules {
            self.add_rule(rule);
        }
    }

    /// Convert to CSS text
    pub fn to_css(&self) -> String {
        let mut css = String::new();

        for rule in &self.rules {
            let indent = if rule.media_query.is_some() {
                if let Some(media_query) = &rule.media_query {
                    css.push_str(media_query);
                    css.push_str(" {\n");
                }
                "  "
            } else {
                ""
            };

            css.push_str(indent);
            css.push_str(&rule.selector);
            css.push_str(" {\n");

            for (key, value) in &rule.properties {
                css.push_str(indent);
                css.push_str("  ");
                css.push_str(key);
                css.push_str(": ");
                css.push_str(value);
                css.push_str(";\n");
            }

            css.push_str(indent);
            css.push_str("}\n");

            if rule.media_query.is_some() {
                css.push_str("}\n");
            }
            css.push('\n');
        }

        css
    }
}
