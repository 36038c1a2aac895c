//! # Page Document
//!
//! The single state container for one page being edited.
//!
//! A PageDocument owns the content tree, the last-persisted snapshot used
//! for dirty tracking, the current widget selection, and per-widget
//! settings snapshots that back the discard-changes flow. Every structural
//! change goes through [`PageDocument::apply`], so dirty tracking and
//! persistence classification stay centralized.
//!
//! Documents are explicitly constructed and passed around - there is no
//! global instance, so multiple editors can coexist and tests get isolated
//! state.

use crate::mutations::{Applied, Mutation, Persistence};
use pagewright_common::IdGenerator;
use pagewright_model::{
    extract_widgets, ExtractedPage, PageContent, SavePageRequest, SettingsMap, Widget,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Deep copy of a widget's settings taken when editing starts; restored on
/// "discard changes"
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSnapshot {
    pub general: SettingsMap,
    pub style: SettingsMap,
    pub advanced: SettingsMap,
}

/// Result of asking the document to apply a mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Applied(Applied),

    /// The mutation could not be resolved against the current tree
    /// (stale drag context, deleted target). Logged, tree untouched.
    Noop { reason: String },
}

impl Outcome {
    pub fn persistence(&self) -> Persistence {
        match self {
            Outcome::Applied(applied) => applied.persistence,
            Outcome::Noop { .. } => Persistence::None,
        }
    }
}

/// Editable page document
#[derive(Debug)]
pub struct PageDocument {
    page_id: String,

    /// Current tree
    content: PageContent,

    /// Last loaded/saved tree; dirtiness is defined against this
    original: PageContent,

    /// Widget whose settings panel is open
    selected_widget: Option<String>,

    /// Settings snapshots keyed by widget id, lifetime bounded to one
    /// editing session of that widget
    snapshots: HashMap<String, WidgetSnapshot>,

    ids: IdGenerator,

    /// Monotonic version, bumped on every effective mutation; attached to
    /// save payloads so stale writes are detectable
    version: u64,
}

impl PageDocument {
    /// Empty document for a new page
    pub fn new(page_id: impl Into<String>) -> Self {
        let page_id = page_id.into();
        let ids = IdGenerator::new(&page_id);
        Self {
            page_id,
            content: PageContent::new(),
            original: PageContent::new(),
            selected_widget: None,
            snapshots: HashMap::new(),
            ids,
            version: 0,
        }
    }

    /// Document over loaded content. The id generator fast-forwards past
    /// ids already present so new nodes never collide.
    pub fn from_content(page_id: impl Into<String>, content: PageContent) -> Self {
        let page_id = page_id.into();
        let mut ids = IdGenerator::new(&page_id);
        ids.advance_past(content.id_watermark(ids.seed()));

        Self {
            page_id,
            original: content.clone(),
            content,
            selected_widget: None,
            snapshots: HashMap::new(),
            ids,
            version: 0,
        }
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    pub fn content(&self) -> &PageContent {
        &self.content
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Dirty iff the serialized tree differs from the last loaded/saved
    /// snapshot
    pub fn is_dirty(&self) -> bool {
        serde_json::to_string(&self.content).ok() != serde_json::to_string(&self.original).ok()
    }

    /// Apply a mutation. Structural ambiguity (stale ids, vanished
    /// targets) is logged and reported as a no-op - the tree is never
    /// partially mutated and the user is never shown an error for it.
    pub fn apply(&mut self, mutation: Mutation) -> Outcome {
        match mutation.apply(&mut self.content, &mut self.ids) {
            Ok(applied) => {
                if applied.persistence != Persistence::None {
                    self.version += 1;
                }

                // A removal may have taken the selected widget with it
                if let Some(selected) = &self.selected_widget {
                    if self.content.find_widget(selected).is_none() {
                        debug!(widget = %selected, "Selected widget removed; clearing selection");
                        self.selected_widget = None;
                    }
                }

                Outcome::Applied(applied)
            }
            Err(error) => {
                warn!(%error, "Mutation degraded to no-op");
                Outcome::Noop {
                    reason: error.to_string(),
                }
            }
        }
    }

    // -- selection + snapshots ------------------------------------------------

    /// Select a widget for editing. The first selection of a widget takes
    /// a deep settings snapshot for the discard-changes flow.
    pub fn select_widget(&mut self, widget_id: &str) -> bool {
        let Some(widget) = self.content.find_widget(widget_id) else {
            return false;
        };

        self.snapshots
            .entry(widget_id.to_string())
            .or_insert_with(|| WidgetSnapshot {
                general: widget.general.clone(),
                style: widget.style.clone(),
                advanced: widget.advanced.clone(),
            });
        self.selected_widget = Some(widget_id.to_string());
        true
    }

    /// The widget whose settings panel is open. Reads through to the tree,
    /// so an open panel always reflects the latest applied updates.
    pub fn selected_widget(&self) -> Option<&Widget> {
        self.selected_widget
            .as_deref()
            .and_then(|id| self.content.find_widget(id))
    }

    pub fn selected_widget_id(&self) -> Option<&str> {
        self.selected_widget.as_deref()
    }

    /// Restore a widget's settings from its snapshot (discard changes).
    /// Returns false when no snapshot exists or the widget is gone.
    pub fn revert_widget(&mut self, widget_id: &str) -> bool {
        let Some(snapshot) = self.snapshots.get(widget_id).cloned() else {
            return false;
        };
        let Some(widget) = self.content.find_widget_mut(widget_id) else {
            return false;
        };

        widget.general = snapshot.general;
        widget.style = snapshot.style;
        widget.advanced = snapshot.advanced;
        true
    }

    /// Drop a widget's snapshot (panel closed or settings saved)
    pub fn clear_snapshot(&mut self, widget_id: &str) {
        self.snapshots.remove(widget_id);
    }

    pub fn has_snapshot(&self, widget_id: &str) -> bool {
        self.snapshots.contains_key(widget_id)
    }

    /// Close the settings panel; discards to the snapshot unless `keep`
    pub fn close_panel(&mut self, keep: bool) {
        if let Some(widget_id) = self.selected_widget.take() {
            if !keep {
                self.revert_widget(&widget_id);
            }
            self.clear_snapshot(&widget_id);
        }
    }

    // -- persistence boundaries ----------------------------------------------

    /// Reset the dirty baseline after a successful full save
    pub fn mark_saved(&mut self) {
        self.original = self.content.clone();
    }

    /// Discard every unsaved change, restoring the last loaded/saved tree
    pub fn reset_changes(&mut self) {
        self.content = self.original.clone();
        self.snapshots.clear();

        if let Some(selected) = &self.selected_widget {
            if self.content.find_widget(selected).is_none() {
                self.selected_widget = None;
            }
        }
    }

    /// Split the tree into the layout/widget wire payloads
    pub fn extract(&self) -> ExtractedPage {
        extract_widgets(&self.content)
    }

    /// Full-save request body
    pub fn save_payload(&self, is_published: bool) -> SavePageRequest {
        let ExtractedPage { layout, widgets } = self.extract();
        SavePageRequest {
            page_id: self.page_id.clone(),
            content: layout,
            widgets,
            is_published,
            version: self.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutations::SectionPartial;
    use pagewright_model::WidgetTemplate;
    use serde_json::json;

    fn template(kind: &str) -> WidgetTemplate {
        serde_json::from_value(json!({ "type": kind })).unwrap()
    }

    fn doc_with_widget() -> (PageDocument, String) {
        let mut doc = PageDocument::new("page-1");
        let outcome = doc.apply(Mutation::WrapWidgetInSection {
            template: template("heading"),
            index: None,
        });
        let Outcome::Applied(applied) = outcome else {
            panic!("wrap failed");
        };
        let widget_id = applied.created_widget.unwrap();
        (doc, widget_id)
    }

    #[test]
    fn test_clean_after_construction() {
        let doc = PageDocument::new("page-1");
        assert!(!doc.is_dirty());
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_dirty_after_mutation_clean_after_save() {
        let (mut doc, _) = doc_with_widget();
        assert!(doc.is_dirty());
        assert_eq!(doc.version(), 1);

        doc.mark_saved();
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_noop_mutation_keeps_tree_clean() {
        let mut doc = PageDocument::new("page-1");
        let outcome = doc.apply(Mutation::RemoveWidget {
            widget_id: "ghost".to_string(),
        });

        assert!(matches!(outcome, Outcome::Noop { .. }));
        assert!(!doc.is_dirty());
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_reset_changes_restores_baseline() {
        let (mut doc, _) = doc_with_widget();
        doc.mark_saved();
        let saved = serde_json::to_string(doc.content()).unwrap();

        doc.apply(Mutation::AddSection {
            partial: SectionPartial::default(),
        });
        assert!(doc.is_dirty());

        doc.reset_changes();
        assert!(!doc.is_dirty());
        assert_eq!(serde_json::to_string(doc.content()).unwrap(), saved);
    }

    #[test]
    fn test_select_snapshots_once_and_reverts() {
        let (mut doc, widget_id) = doc_with_widget();
        assert!(doc.select_widget(&widget_id));
        assert!(doc.has_snapshot(&widget_id));

        doc.apply(Mutation::UpdateWidget {
            widget_id: widget_id.clone(),
            general: Some(serde_json::from_value(json!({"text": "Edited"})).unwrap()),
            style: None,
            advanced: None,
            is_visible: None,
            is_enabled: None,
        });

        // Selecting again does not re-snapshot the edited state
        assert!(doc.select_widget(&widget_id));
        assert_eq!(
            doc.selected_widget().unwrap().general.get_str("text"),
            Some("Edited")
        );

        assert!(doc.revert_widget(&widget_id));
        assert!(doc
            .selected_widget()
            .unwrap()
            .general
            .get_str("text")
            .is_none());
    }

    #[test]
    fn test_close_panel_discard_vs_keep() {
        let (mut doc, widget_id) = doc_with_widget();
        doc.select_widget(&widget_id);

        doc.apply(Mutation::UpdateWidget {
            widget_id: widget_id.clone(),
            general: Some(serde_json::from_value(json!({"text": "Edited"})).unwrap()),
            style: None,
            advanced: None,
            is_visible: None,
            is_enabled: None,
        });

        doc.close_panel(false); // discard
        assert!(doc.selected_widget_id().is_none());
        assert!(!doc.has_snapshot(&widget_id));
        assert!(doc
            .content()
            .find_widget(&widget_id)
            .unwrap()
            .general
            .get_str("text")
            .is_none());

        // Keep path
        doc.select_widget(&widget_id);
        doc.apply(Mutation::UpdateWidget {
            widget_id: widget_id.clone(),
            general: Some(serde_json::from_value(json!({"text": "Kept"})).unwrap()),
            style: None,
            advanced: None,
            is_visible: None,
            is_enabled: None,
        });
        doc.close_panel(true);
        assert_eq!(
            doc.content()
                .find_widget(&widget_id)
                .unwrap()
                .general
                .get_str("text"),
            Some("Kept")
        );
    }

    #[test]
    fn test_removing_selected_widget_clears_selection() {
        let (mut doc, widget_id) = doc_with_widget();
        doc.select_widget(&widget_id);

        doc.apply(Mutation::RemoveWidget {
            widget_id: widget_id.clone(),
        });

        assert!(doc.selected_widget_id().is_none());
    }

    #[test]
    fn test_loaded_content_does_not_collide_ids() {
        let (doc, _) = doc_with_widget();
        let content = doc.content().clone();

        let mut reloaded = PageDocument::from_content("page-1", content);
        let outcome = reloaded.apply(Mutation::AddSection {
            partial: SectionPartial::default(),
        });

        let Outcome::Applied(applied) = outcome else {
            panic!("add failed");
        };
        let new_id = applied.created_section.unwrap();
        assert!(reloaded.content().validate_integrity().is_ok());
        assert_ne!(Some(new_id.as_str()), reloaded.content().sections.first().map(|s| s.id.as_str()));
    }

    #[test]
    fn test_save_payload_carries_version() {
        let (mut doc, _) = doc_with_widget();
        doc.apply(Mutation::AddSection {
            partial: SectionPartial::default(),
        });

        let payload = doc.save_payload(false);
        assert_eq!(payload.version, 2);
        assert_eq!(payload.page_id, "page-1");
        assert_eq!(payload.widgets.len(), 1);
    }
}
