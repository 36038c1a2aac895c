//! # Pagewright CSS Compiler
//!
//! Turns the declarative style settings stored on sections, columns and
//! widgets into CSS text, so the editor preview stays visually in sync
//! without a full page reload. The value shapes it reads are the same ones
//! the field-type system validates and sanitizes.

mod css;
mod generator;

pub use css::{CssRule, VirtualCssDocument};
pub use generator::CssGenerator;

use pagewright_model::{PageContent, SettingsMap};

/// Compile a whole page's tree to CSS (bulk form)
pub fn compile_page_css(content: &PageContent) -> String {
    CssGenerator::new().generate_page(content).to_css()
}

/// Compile one node's settings to CSS, mirroring the single-node
/// `/css/generate` collaborator shape
pub fn compile_node_css(node_kind: &str, node_id: &str, settings: &SettingsMap) -> String {
    CssGenerator::new().generate_node(node_kind, node_id, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewright_model::{Column, Section, Widget};
    use serde_json::json;

    fn settings(v: serde_json::Value) -> SettingsMap {
        serde_json::from_value(v).unwrap()
    }

    fn sample_page() -> PageContent {
        let widget: Widget = serde_json::from_value(json!({
            "id": "w1",
            "type": "heading",
            "style": {"color": "#FF0000", "padding": "8px 16px"},
        }))
        .unwrap();

        let mut column = Column::full_width("c1".to_string());
        column.width = "50%".to_string();
        column.widgets.push(widget);

        let mut section = Section::with_columns("s1".to_string(), vec![column]);
        section.settings = settings(json!({"background_color": "#FAFAFA"}));
        section.responsive.mobile = Some(settings(json!({"padding": "8px"})));

        PageContent {
            sections: vec![section],
        }
    }

    #[test]
    fn test_compile_page_covers_all_nodes() {
        let css = compile_page_css(&sample_page());

        assert!(css.contains("#pw-section-s1 {"));
        assert!(css.contains("background-color: #FAFAFA;"));
        assert!(css.contains("#pw-column-c1 {"));
        assert!(css.contains("width: 50%;"));
        assert!(css.contains("#pw-widget-w1 {"));
        assert!(css.contains("color: #FF0000;"));
        assert!(css.contains("padding: 8px 16px;"));
    }

    #[test]
    fn test_responsive_settings_emit_media_queries() {
        let css = compile_page_css(&sample_page());

        assert!(css.contains("@media (max-width: 767px) {"));
        assert!(css.contains("padding: 8px;"));
    }

    #[test]
    fn test_hidden_widget_gets_display_none() {
        let mut page = sample_page();
        page.sections[0].columns[0].widgets[0].is_visible = false;

        let css = compile_page_css(&page);
        assert!(css.contains("display: none;"));
    }

    #[test]
    fn test_compile_node_css_matches_endpoint_shape() {
        let css = compile_node_css("column", "c9", &settings(json!({"padding": "12px"})));
        assert!(css.contains("#pw-column-c9 {"));
        assert!(css.contains("padding: 12px;"));
    }
}
