//! Style-settings → CSS mapping.
//!
//! The generator reads the same declarative value shapes the field kinds
//! store (spacing objects/shorthands, `{value, unit}` dimensions, nested
//! typography/background/border objects) and emits CSS rules per node.
//! Unknown or malformed values are skipped - CSS generation never fails on
//! a bad setting, it just contributes nothing for it.

use crate::css::{CssRule, VirtualCssDocument};
use pagewright_fields::{format_spacing, CssLength, Spacing};
use pagewright_model::{PageContent, Section, SettingsMap};
use serde_json::Value;
use tracing::{debug, info, instrument};

const TABLET_QUERY: &str = "@media (max-width: 1024px)";
const MOBILE_QUERY: &str = "@media (max-width: 767px)";

/// CSS generator for page nodes
#[derive(Debug, Default)]
pub struct CssGenerator;

impl CssGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate CSS for the whole tree (bulk form)
    #[instrument(skip(self, content), fields(sections = content.sections.len()))]
    pub fn generate_page(&self, content: &PageContent) -> VirtualCssDocument {
        info!("Starting page CSS generation");
        let mut doc = VirtualCssDocument::new();

        for section in &content.sections {
            self.generate_section(section, &mut doc);
        }

        info!(rules = doc.rules.len(), "Page CSS generation complete");
        doc
    }

    /// Generate CSS rules for one section, its columns and widgets
    pub fn generate_section(&self, section: &Section, doc: &mut VirtualCssDocument) {
        let selector = section_selector(&section.id);
        doc.add_rule(rule_from_settings(selector.clone(), &section.settings, None));

        if let Some(tablet) = &section.responsive.tablet {
            doc.add_rule(rule_from_settings(
                selector.clone(),
                tablet,
                Some(TABLET_QUERY),
            ));
        }
        if let Some(mobile) = &section.responsive.mobile {
            doc.add_rule(rule_from_settings(
                selector.clone(),
                mobile,
                Some(MOBILE_QUERY),
            ));
        }

        for column in &section.columns {
            let mut rule = rule_from_settings(column_selector(&column.id), &column.settings, None);
            // Width is structural, not a setting, but renders with the rest
            rule.set("width", column.width.clone());
            doc.add_rule(rule);

            for widget in &column.widgets {
                let mut rule =
                    rule_from_settings(widget_selector(&widget.id), &widget.style, None);
                if !widget.is_visible {
                    rule.set("display", "none");
                }
                doc.add_rule(rule);
            }
        }
    }

    /// Single-node form, mirroring the shape of the `/css/generate`
    /// collaborator endpoint
    pub fn generate_node(&self, node_kind: &str, node_id: &str, settings: &SettingsMap) -> String {
        let selector = match node_kind {
            "section" => section_selector(node_id),
            "column" => column_selector(node_id),
            _ => widget_selector(node_id),
        };

        let mut doc = VirtualCssDocument::new();
        doc.add_rule(rule_from_settings(selector, settings, None));
        doc.to_css()
    }
}

fn section_selector(id: &str) -> String {
    format!("#pw-section-{}", id)
}

fn column_selector(id: &str) -> String {
    format!("#pw-column-{}", id)
}

fn widget_selector(id: &str) -> String {
    format!("#pw-widget-{}", id)
}

fn rule_from_settings(
    selector: String,
    settings: &SettingsMap,
    media_query: Option<&str>,
) -> CssRule {
    let mut rule = CssRule::new(selector);
    if let Some(media_query) = media_query {
        rule = rule.with_media_query(media_query);
    }

    for (key, value) in settings.iter() {
        apply_setting(&mut rule, key, value);
    }

    rule
}

/// Map one setting onto CSS properties. Editor-internal keys (leading
/// underscore) and unrecognized shapes contribute nothing.
fn apply_setting(rule: &mut CssRule, key: &str, value: &Value) {
    if key.starts_with('_') {
        return;
    }

    match key {
        "padding" | "margin" => {
            if let Some(spacing) = Spacing::from_value(value) {
                rule.set(key, format_spacing(&spacing));
            }
        }

        "width" | "height" | "max_width" | "min_height" | "gap" | "font_size" => {
            if let Some(length) = CssLength::from_value(value) {
                rule.set(key.replace('_', "-"), length.to_string());
            }
        }

        "color" | "background_color" => {
            if let Some(color) = value.as_str() {
                rule.set(key.replace('_', "-"), color.to_string());
            }
        }

        "align" | "text_align" => {
            if let Some(align) = value.as_str() {
                rule.set("text-align", align.to_string());
            }
        }

        "typography" => apply_typography(rule, value),
        "background" => apply_background(rule, value),
        "border" => apply_border(rule, value),
        "shadow" => apply_shadow(rule, value),

        other => {
            debug!(setting = other, "No CSS mapping for setting");
        }
    }
}

fn apply_typography(rule: &mut CssRule, value: &Value) {
    let Some(map) = value.as_object() else {
        return;
    };

    if let Some(family) = map.get("font_family").and_then(Value::as_str) {
        rule.set("font-family", family.to_string());
    }
    for (key, property) in [
        ("font_size", "font-size"),
        ("line_height", "line-height"),
        ("letter_spacing", "letter-spacing"),
    ] {
        if let Some(length) = map.get(key).and_then(CssLength::from_value) {
            rule.set(property, length.to_string());
        }
    }
    if let Some(weight) = map.get("font_weight") {
        match weight {
            Value::Number(n) => rule.set("font-weight", n.to_string()),
            Value::String(s) => rule.set("font-weight", s.clone()),
            _ => {}
        }
    }
    for (key, property) in [
        ("text_transform", "text-transform"),
        ("font_style", "font-style"),
        ("text_decoration", "text-decoration"),
    ] {
        if let Some(keyword) = map.get(key).and_then(Value::as_str) {
            rule.set(property, keyword.to_string());
        }
    }
    if let Some(color) = map.get("color").and_then(Value::as_str) {
        rule.set("color", color.to_string());
    }
}

fn apply_background(rule: &mut CssRule, value: &Value) {
    let Some(map) = value.as_object() else {
        return;
    };

    match map.get("type").and_then(Value::as_str).unwrap_or("none") {
        "color" => {
            if let Some(color) = map.get("color").and_then(Value::as_str) {
                rule.set("background-color", color.to_string());
            }
        }
        "gradient" => {
            if let Some(gradient) = gradient_image(map.get("gradient")) {
                rule.set("background-image", gradient);
            }
        }
        "image" => {
            let Some(image) = map.get("image").and_then(Value::as_object) else {
                return;
            };
            if let Some(url) = image.get("url").and_then(Value::as_str) {
                rule.set("background-image", format!("url(\"{}\")", url));
            }
            if let Some(size) = image.get("size").and_then(Value::as_str) {
                rule.set("background-size", size.to_string());
            }
            if let Some(position) = image.get("position").and_then(Value::as_str) {
                rule.set("background-position", position.to_string());
            }
            if let Some(repeat) = image.get("repeat").and_then(Value::as_str) {
                rule.set("background-repeat", repeat.to_string());
            }
        }
        _ => {}
    }
}

fn gradient_image(gradient: Option<&Value>) -> Option<String> {
    let map = gradient?.as_object()?;
    let stops = map.get("stops")?.as_array()?;
    if stops.len() < 2 {
        return None;
    }

    let rendered: Vec<String> = stops
        .iter()
        .filter_map(|stop| {
            let color = stop.get("color")?.as_str()?;
            match stop.get("position").and_then(Value::as_f64) {
                Some(position) => Some(format!("{} {}%", color, position)),
                None => Some(color.to_string()),
            }
        })
        .collect();
    if rendered.len() < 2 {
        return None;
    }

    match map.get("type").and_then(Value::as_str).unwrap_or("linear") {
        "radial" => Some(format!("radial-gradient({})", rendered.join(", "))),
        _ => {
            let angle = map.get("angle").and_then(Value::as_f64).unwrap_or(180.0);
            Some(format!("linear-gradient({}deg, {})", angle, rendered.join(", ")))
        }
    }
}

fn apply_border(rule: &mut CssRule, value: &Value) {
    let Some(map) = value.as_object() else {
        return;
    };

    let style = map.get("style").and_then(Value::as_str).unwrap_or("solid");
    if style != "none" {
        if let Some(width) = map.get("width").and_then(CssLength::from_value) {
            let color = map.get("color").and_then(Value::as_str).unwrap_or("#000000");
            rule.set("border", format!("{} {} {}", width, style, color));
        }
    } else {
        rule.set("border", "none".to_string());
    }

    if let Some(radius) = map.get("radius") {
        if let Some(length) = CssLength::from_value(radius) {
            rule.set("border-radius", length.to_string());
        } else if let Some(spacing) = Spacing::from_value(radius) {
            rule.set("border-radius", format_spacing(&spacing));
        }
    }
}

fn apply_shadow(rule: &mut CssRule, value: &Value) {
    let Some(map) = value.as_object() else {
        return;
    };

    let length = |key: &str| -> String {
        map.get(key)
            .and_then(CssLength::from_value)
            .map(|l| l.to_string())
            .unwrap_or_else(|| "0".to_string())
    };

    let color = map.get("color").and_then(Value::as_str).unwrap_or("#000000");
    let inset = map.get("inset").and_then(Value::as_bool).unwrap_or(false);

    let mut shadow = format!(
        "{} {} {} {} {}",
        length("x"),
        length("y"),
        length("blur"),
        length("spread"),
        color
    );
    if inset {
        shadow = format!("inset {}", shadow);
    }

    rule.set("box-shadow", shadow);
}
