//! The page content tree.
//!
//! A page is an ordered list of sections; a section owns ordered columns; a
//! column owns ordered widgets. Order is significant everywhere and fully
//! determines render order. Ownership is exclusive: a widget lives in
//! exactly one column, a column in exactly one section.

use crate::settings::SettingsMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Root aggregate: the whole editable page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PageContent {
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Top-level horizontal block ("container" in drag contexts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,

    /// Always `"section"` on the wire
    #[serde(rename = "type", default = "Section::kind_name")]
    pub kind: String,

    pub columns: Vec<Column>,

    #[serde(default)]
    pub settings: SettingsMap,

    #[serde(default, skip_serializing_if = "ResponsiveSettings::is_empty")]
    pub responsive: ResponsiveSettings,
}

/// Per-breakpoint style overrides for a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResponsiveSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet: Option<SettingsMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<SettingsMap>,
}

impl ResponsiveSettings {
    pub fn is_empty(&self) -> bool {
        self.tablet.is_none() && self.mobile.is_none()
    }
}

/// Vertical slot inside a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,

    /// Sibling-relative CSS length, e.g. `"50%"`. Not rebalanced when
    /// siblings are added or removed; see `rebalance_columns`.
    pub width: String,

    #[serde(default)]
    pub widgets: Vec<Widget>,

    #[serde(default)]
    pub settings: SettingsMap,
}

/// A single content unit (heading, image, button, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub general: SettingsMap,

    #[serde(default)]
    pub style: SettingsMap,

    #[serde(default)]
    pub advanced: SettingsMap,

    #[serde(default = "default_true")]
    pub is_visible: bool,

    #[serde(default = "default_true")]
    pub is_enabled: bool,

    #[serde(default = "Widget::default_version")]
    pub version: String,
}

fn default_true() -> bool {
    true
}

/// Declarative widget template from the widget catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetTemplate {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub default_general: SettingsMap,

    #[serde(default)]
    pub default_style: SettingsMap,

    #[serde(default)]
    pub default_advanced: SettingsMap,
}

/// Placement class of a widget template, derived from its kind.
/// Structural kinds have tighter drop rules than plain content widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatePlacement {
    /// Ordinary content widget: may target columns, widgets, or the canvas
    Standard,
    /// Section-like widget: may only target the canvas or a section
    Section,
    /// Container-like widget: may never land inside a column
    Container,
}

impl WidgetTemplate {
    pub fn placement(&self) -> TemplatePlacement {
        match self.kind.as_str() {
            "section" => TemplatePlacement::Section,
            "container" => TemplatePlacement::Container,
            _ => TemplatePlacement::Standard,
        }
    }
}

/// Where a widget currently sits in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetLocation {
    pub section_id: String,
    pub column_id: String,
    pub index: usize,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrityError {
    #[error("Duplicate section id: {0}")]
    DuplicateSection(String),

    #[error("Duplicate column id: {0}")]
    DuplicateColumn(String),

    #[error("Duplicate widget id: {0}")]
    DuplicateWidget(String),
}

impl Section {
    fn kind_name() -> String {
        "section".to_string()
    }

    /// New section with the given columns
    pub fn with_columns(id: String, columns: Vec<Column>) -> Self {
        Self {
            id,
            kind: Self::kind_name(),
            columns,
            settings: SettingsMap::new(),
            responsive: ResponsiveSettings::default(),
        }
    }

    /// New single-column section (the auto-wrap shape)
    pub fn single_column(section_id: String, column_id: String) -> Self {
        Self::with_columns(section_id, vec![Column::full_width(column_id)])
    }
}

impl Column {
    pub fn full_width(id: String) -> Self {
        Self {
            id,
            width: "100%".to_string(),
            widgets: Vec::new(),
            settings: SettingsMap::new(),
        }
    }
}

impl Widget {
    fn default_version() -> String {
        "1.0.0".to_string()
    }

    /// Construct a widget from a catalog template. Template defaults are
    /// deep-copied; the wire coercion in `SettingsMap` already guarantees
    /// they are objects even when the catalog serialized them as `[]`.
    pub fn from_template(id: String, template: &WidgetTemplate) -> Self {
        Self {
            id,
            kind: template.kind.clone(),
            general: template.default_general.clone(),
            style: template.default_style.clone(),
            advanced: template.default_advanced.clone(),
            is_visible: true,
            is_enabled: true,
            version: Self::default_version(),
        }
    }
}

impl PageContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section_index(&self, section_id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == section_id)
    }

    pub fn find_section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn find_section_mut(&mut self, section_id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == section_id)
    }

    pub fn find_column(&self, column_id: &str) -> Option<&Column> {
        self.sections
            .iter()
            .flat_map(|s| s.columns.iter())
            .find(|c| c.id == column_id)
    }

    pub fn find_column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.columns.iter_mut())
            .find(|c| c.id == column_id)
    }

    /// Section that owns the given column
    pub fn section_of_column(&self, column_id: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.columns.iter().any(|c| c.id == column_id))
    }

    pub fn find_widget(&self, widget_id: &str) -> Option<&Widget> {
        self.widgets().find(|w| w.id == widget_id)
    }

    pub fn find_widget_mut(&mut self, widget_id: &str) -> Option<&mut Widget> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.columns.iter_mut())
            .flat_map(|c| c.widgets.iter_mut())
            .find(|w| w.id == widget_id)
    }

    /// Locate a widget: owning section, owning column, position in column
    pub fn locate_widget(&self, widget_id: &str) -> Option<WidgetLocation> {
        for section in &self.sections {
            for column in &section.columns {
                if let Some(index) = column.widgets.iter().position(|w| w.id == widget_id) {
                    return Some(WidgetLocation {
                        section_id: section.id.clone(),
                        column_id: column.id.clone(),
                        index,
                    });
                }
            }
        }
        None
    }

    /// Resolve any node id (section, column, or widget) to the index of its
    /// owning section. Used by drag resolution when the drop target only
    /// carries a descendant id.
    pub fn owning_section_index(&self, node_id: &str) -> Option<usize> {
        self.sections.iter().position(|s| {
            s.id == node_id
                || s.columns
                    .iter()
                    .any(|c| c.id == node_id || c.widgets.iter().any(|w| w.id == node_id))
        })
    }

    /// Iterate all widgets in render order
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.sections
            .iter()
            .flat_map(|s| s.columns.iter())
            .flat_map(|c| c.widgets.iter())
    }

    pub fn widget_count(&self) -> usize {
        self.widgets().count()
    }

    /// Check structural invariants: no duplicate ids at any level, which
    /// together with the tree shape means every widget id appears in at
    /// most one column and every column id in at most one section.
    pub fn validate_integrity(&self) -> Result<(), IntegrityError> {
        let mut section_ids = std::collections::HashSet::new();
        let mut column_ids = std::collections::HashSet::new();
        let mut widget_ids = std::collections::HashSet::new();

        for section in &self.sections {
            if !section_ids.insert(&section.id) {
                return Err(IntegrityError::DuplicateSection(section.id.clone()));
            }
            for column in &section.columns {
                if !column_ids.insert(&column.id) {
                    return Err(IntegrityError::DuplicateColumn(column.id.clone()));
                }
                for widget in &column.widgets {
                    if !widget_ids.insert(&widget.id) {
                        return Err(IntegrityError::DuplicateWidget(widget.id.clone()));
                    }
                }
            }
        }

        Ok(())
    }

    /// Highest sequential counter among ids generated for the given page
    /// seed. Lets an id generator resume past ids present in loaded
    /// content instead of colliding with them.
    pub fn id_watermark(&self, seed: &str) -> u32 {
        let marker = format!("-{}-", seed);
        let mut max = 0;
        for id in self.node_ids() {
            if let Some(pos) = id.rfind(&marker) {
                if let Ok(n) = id[pos + marker.len()..].parse::<u32>() {
                    max = max.max(n);
                }
            }
        }
        max
    }

    fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().flat_map(|s| {
            std::iter::once(s.id.as_str()).chain(s.columns.iter().flat_map(|c| {
                std::iter::once(c.id.as_str()).chain(c.widgets.iter().map(|w| w.id.as_str()))
            }))
        })
    }
}

/// Redistribute a section's column widths equally, e.g. 3 columns → each
/// `"33.333%"`. Never called implicitly: adding or removing a column
/// preserves sibling widths verbatim, and only the explicit column-layout
/// operation opts into rebalancing.
pub fn rebalance_columns(section: &mut Section) {
    let count = section.columns.len();
    if count == 0 {
        return;
    }

    let width = if 100 % count == 0 {
        format!("{}%", 100 / count)
    } else {
        format!("{:.3}%", 100.0 / count as f64)
    };

    for column in &mut section.columns {
        column.width = width.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn widget(id: &str) -> Widget {
        Widget {
            id: id.to_string(),
            kind: "heading".to_string(),
            general: SettingsMap::new(),
            style: SettingsMap::new(),
            advanced: SettingsMap::new(),
            is_visible: true,
            is_enabled: true,
            version: "1.0.0".to_string(),
        }
    }

    fn sample_page() -> PageContent {
        let mut c1 = Column::full_width("c1".to_string());
        c1.widgets = vec![widget("w1"), widget("w2")];
        let c2 = Column::full_width("c2".to_string());

        PageContent {
            sections: vec![Section::with_columns("s1".to_string(), vec![c1, c2])],
        }
    }

    #[test]
    fn test_locate_widget() {
        let page = sample_page();

        let loc = page.locate_widget("w2").unwrap();
        assert_eq!(loc.section_id, "s1");
        assert_eq!(loc.column_id, "c1");
        assert_eq!(loc.index, 1);

        assert!(page.locate_widget("missing").is_none());
    }

    #[test]
    fn test_owning_section_index_resolves_descendants() {
        let page = sample_page();

        assert_eq!(page.owning_section_index("s1"), Some(0));
        assert_eq!(page.owning_section_index("c2"), Some(0));
        assert_eq!(page.owning_section_index("w1"), Some(0));
        assert_eq!(page.owning_section_index("nope"), None);
    }

    #[test]
    fn test_integrity_detects_duplicate_widget() {
        let mut page = sample_page();
        page.sections[0].columns[1].widgets.push(widget("w1"));

        assert_eq!(
            page.validate_integrity(),
            Err(IntegrityError::DuplicateWidget("w1".to_string()))
        );
    }

    #[test]
    fn test_integrity_ok_on_sample() {
        assert!(sample_page().validate_integrity().is_ok());
    }

    #[test]
    fn test_widget_deserialization_defaults() {
        let widget: Widget = serde_json::from_value(json!({
            "id": "w9",
            "type": "button",
            "general": [],
        }))
        .unwrap();

        assert!(widget.is_visible);
        assert!(widget.is_enabled);
        assert_eq!(widget.version, "1.0.0");
        assert!(widget.general.is_empty());
        assert!(widget.style.is_empty());
    }

    #[test]
    fn test_template_placement_classes() {
        let template = |kind: &str| WidgetTemplate {
            kind: kind.to_string(),
            label: String::new(),
            default_general: SettingsMap::new(),
            default_style: SettingsMap::new(),
            default_advanced: SettingsMap::new(),
        };

        assert_eq!(template("heading").placement(), TemplatePlacement::Standard);
        assert_eq!(template("section").placement(), TemplatePlacement::Section);
        assert_eq!(
            template("container").placement(),
            TemplatePlacement::Container
        );
    }

    #[test]
    fn test_rebalance_columns() {
        let mut section = Section::with_columns(
            "s1".to_string(),
            vec![
                Column::full_width("c1".to_string()),
                Column::full_width("c2".to_string()),
            ],
        );

        rebalance_columns(&mut section);
        assert_eq!(section.columns[0].width, "50%");
        assert_eq!(section.columns[1].width, "50%");

        section.columns.push(Column::full_width("c3".to_string()));
        rebalance_columns(&mut section);
        assert_eq!(section.columns[0].width, "33.333%");
    }

    #[test]
    fn test_id_watermark() {
        let mut page = PageContent::new();
        page.sections.push(Section::single_column(
            "section-abc123-3".to_string(),
            "column-abc123-7".to_string(),
        ));
        page.sections[0].columns[0]
            .widgets
            .push(widget("widget-abc123-12"));

        assert_eq!(page.id_watermark("abc123"), 12);
        assert_eq!(page.id_watermark("other"), 0);
    }
}
