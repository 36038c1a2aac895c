//! Wire payloads for the persistence backend.
//!
//! Layout and widget settings are stored separately server-side, so a full
//! save splits the tree into a lightweight layout structure (widget stubs
//! only) plus a flat `widget id → full record` map with computed
//! `sort_order`. Loading reverses the split: widget records are hydrated
//! back into their stubs by id.

use crate::content::{PageContent, Widget};
use crate::settings::SettingsMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `{id, type}` placeholder for a widget inside the layout tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetStub {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,
}

/// Column with widget stubs instead of full widgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub id: String,
    pub width: String,

    #[serde(default)]
    pub widgets: Vec<WidgetStub>,

    #[serde(default)]
    pub settings: SettingsMap,
}

/// Section with stub columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionLayout {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub columns: Vec<ColumnLayout>,

    #[serde(default)]
    pub settings: SettingsMap,
}

/// The layout half of a page save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LayoutTree {
    pub sections: Vec<SectionLayout>,
}

/// Full widget record as persisted to the widget store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetRecord {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub general: SettingsMap,

    #[serde(default)]
    pub style: SettingsMap,

    #[serde(default)]
    pub advanced: SettingsMap,

    pub is_visible: bool,
    pub is_enabled: bool,
    pub version: String,

    /// Position within the owning column
    pub sort_order: usize,
}

/// A page split into its two persistence halves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPage {
    pub layout: LayoutTree,
    pub widgets: BTreeMap<String, WidgetRecord>,
}

/// Split the tree into layout + widget records for persistence
pub fn extract_widgets(content: &PageContent) -> ExtractedPage {
    let mut widgets = BTreeMap::new();
    let mut layout = LayoutTree::default();

    for section in &content.sections {
        let mut columns = Vec::with_capacity(section.columns.len());

        for column in &section.columns {
            let mut stubs = Vec::with_capacity(column.widgets.len());

            for (sort_order, widget) in column.widgets.iter().enumerate() {
                stubs.push(WidgetStub {
                    id: widget.id.clone(),
                    kind: widget.kind.clone(),
                });
                widgets.insert(widget.id.clone(), widget_record(widget, sort_order));
            }

            columns.push(ColumnLayout {
                id: column.id.clone(),
                width: column.width.clone(),
                widgets: stubs,
                settings: column.settings.clone(),
            });
        }

        layout.sections.push(SectionLayout {
            id: section.id.clone(),
            kind: section.kind.clone(),
            columns,
            settings: section.settings.clone(),
        });
    }

    ExtractedPage { layout, widgets }
}

fn widget_record(widget: &Widget, sort_order: usize) -> WidgetRecord {
    WidgetRecord {
        id: widget.id.clone(),
        kind: widget.kind.clone(),
        general: widget.general.clone(),
        style: widget.style.clone(),
        advanced: widget.advanced.clone(),
        is_visible: widget.is_visible,
        is_enabled: widget.is_enabled,
        version: widget.version.clone(),
        sort_order,
    }
}

/// Merge separately-loaded widget records into a content tree whose widget
/// entries may be bare stubs (empty settings). Records are matched by id;
/// unmatched records are ignored.
pub fn hydrate_widgets(content: &mut PageContent, records: &[WidgetRecord]) {
    for record in records {
        if let Some(widget) = content.find_widget_mut(&record.id) {
            widget.general = record.general.clone();
            widget.style = record.style.clone();
            widget.advanced = record.advanced.clone();
            widget.is_visible = record.is_visible;
            widget.is_enabled = record.is_enabled;
            widget.version = record.version.clone();
        }
    }
}

// ---------------------------------------------------------------------------
// Request / response bodies (§6 collaborator interfaces)
// ---------------------------------------------------------------------------

/// `GET /content/{pageId}` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadResponse {
    pub content: PageContent,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widgets: Option<Vec<WidgetRecord>>,
}

/// `POST /save` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePageRequest {
    pub page_id: String,
    pub content: LayoutTree,
    pub widgets: BTreeMap<String, WidgetRecord>,
    pub is_published: bool,

    /// Monotonic document version; lets the backend ignore stale writes
    /// from out-of-order save completion
    pub version: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /widgets/{pageId}/{widgetId}/save-all-settings` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveWidgetSettingsRequest {
    /// Required only on first creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_type: Option<String>,

    pub general: SettingsMap,
    pub style: SettingsMap,
    pub advanced: SettingsMap,
}

/// Section/column `save-all-settings` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveNodeSettingsRequest {
    pub settings: SettingsMap,
}

/// `POST /publish` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    pub page_id: String,
}

/// `POST /css/generate` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CssGenerateRequest {
    #[serde(rename = "type")]
    pub node_kind: String,

    pub id: String,
    pub settings: SettingsMap,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CssGenerateResponse {
    pub css: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Column, Section};
    use serde_json::json;

    fn page_with_one_widget(general: serde_json::Value) -> PageContent {
        let widget: Widget = serde_json::from_value(json!({
            "id": "w1",
            "type": "heading",
            "general": general,
        }))
        .unwrap();

        let mut column = Column::full_width("c1".to_string());
        column.widgets.push(widget);

        PageContent {
            sections: vec![Section::with_columns("s1".to_string(), vec![column])],
        }
    }

    #[test]
    fn test_extract_splits_layout_and_widgets() {
        let page = page_with_one_widget(json!({"text": "Hi"}));
        let extracted = extract_widgets(&page);

        // Layout carries only the stub
        let stub = &extracted.layout.sections[0].columns[0].widgets[0];
        assert_eq!(stub.id, "w1");
        assert_eq!(stub.kind, "heading");

        // Widget map carries the full record with sort_order
        let record = &extracted.widgets["w1"];
        assert_eq!(record.sort_order, 0);
        assert_eq!(record.general.get_str("text"), Some("Hi"));
    }

    #[test]
    fn test_extract_coerces_empty_array_general_to_object() {
        // Scenario D: a widget whose `general` arrived as `[]`
        let page = page_with_one_widget(json!([]));
        let extracted = extract_widgets(&page);

        let emitted = serde_json::to_value(&extracted.widgets["w1"]).unwrap();
        assert_eq!(emitted["general"], json!({}));
        assert!(emitted["general"].is_object());
    }

    #[test]
    fn test_sort_order_follows_column_position() {
        let mut page = page_with_one_widget(json!({}));
        let w2: Widget =
            serde_json::from_value(json!({"id": "w2", "type": "button"})).unwrap();
        page.sections[0].columns[0].widgets.push(w2);

        let extracted = extract_widgets(&page);
        assert_eq!(extracted.widgets["w1"].sort_order, 0);
        assert_eq!(extracted.widgets["w2"].sort_order, 1);
    }

    #[test]
    fn test_hydrate_fills_stub_widgets() {
        let mut page = page_with_one_widget(json!({}));
        let record = WidgetRecord {
            id: "w1".to_string(),
            kind: "heading".to_string(),
            general: SettingsMap::from_value(json!({"text": "Loaded"})),
            style: SettingsMap::new(),
            advanced: SettingsMap::new(),
            is_visible: false,
            is_enabled: true,
            version: "1.0.0".to_string(),
            sort_order: 0,
        };

        hydrate_widgets(&mut page, &[record]);

        let widget = page.find_widget("w1").unwrap();
        assert_eq!(widget.general.get_str("text"), Some("Loaded"));
        assert!(!widget.is_visible);
    }
}
