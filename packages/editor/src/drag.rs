//! # Drag-and-Drop Resolution
//!
//! Stateless decision engine mapping a (dragged payload, drop target) pair
//! plus the current tree to a structural mutation intent.
//!
//! Payloads and targets are closed tagged unions, so the rule match below
//! is exhaustive-checked by the compiler instead of duck-typed off a
//! `type` string. Rules are evaluated in priority order; the first match
//! wins:
//!
//!  1. Section on a section drop zone → reorder sections
//!  2. Widget template on a widget drop zone → wrap in a new section at
//!     the zone's position
//!  3. Placement gate - structural template kinds have restricted targets
//!  4. Widget template on the bare canvas → auto-wrap in a new section
//!  5. Widget template on a column or widget → insert into that column
//!  6. Existing widget on a widget drop zone → reorder or cross-column move
//!  7. Existing widget on another widget → same, using the target's context
//!  8. Existing widget on a bare column → cross-column move, append
//!  9. Section on a section/descendant → reorder sections
//! 10. Anything else → ignore (cancelled drag)
//!
//! Index adjustment: every move is remove-then-insert, so when an item
//! moves forward past its own slot (source index < raw target index) the
//! effective insert index drops by one to preserve the visual intent.
//!
//! The resolver never mutates the tree. A resolution either carries
//! mutations for the store, an explicit placement rejection for the user,
//! or nothing.

use crate::mutations::{Mutation, SectionPartial};
use pagewright_model::{PageContent, TemplatePlacement, WidgetTemplate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DragPayload {
    /// An existing widget, with its position at drag start
    Widget {
        widget_id: String,
        column_id: String,
        section_id: String,
        index: usize,
    },

    /// A fresh widget from the catalog panel
    WidgetTemplate { template: WidgetTemplate },

    /// An existing section
    Section { section_id: String },

    /// A fresh section from the catalog panel
    SectionTemplate,
}

/// What the pointer is over at drop time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DropTarget {
    /// Empty canvas space outside any section
    Canvas,

    /// A column body
    Column {
        column_id: String,
        section_id: String,
    },

    /// An existing widget ("insert near me")
    Widget {
        widget_id: String,
        column_id: String,
        section_id: String,
        index: usize,
    },

    /// Synthetic insertion marker inside a column (`column_id` set) or
    /// between sections on the canvas (`column_id` absent)
    WidgetDropZone {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        section_id: Option<String>,
        index: usize,
    },

    /// Synthetic insertion marker between sections
    SectionDropZone { index: usize },

    /// A section body
    Section { section_id: String },

    /// Any node that carries a container id (header bars, resize handles)
    Container { node_id: String },
}

/// A drag that violates a declared placement constraint; surfaced to the
/// user naming the rule
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    #[error("Section widgets can only be dropped on the canvas or another section")]
    SectionWidgetTarget,

    #[error("Container widgets cannot be dropped inside a column")]
    ContainerWidgetInColumn,
}

/// Outcome of resolving a drop
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Apply these mutations, in order
    Mutate(Vec<Mutation>),

    /// Reject with a user-facing notice
    Reject(PlacementError),

    /// Nothing happened (cancelled or unresolvable drag)
    Ignore,
}

/// Remove-then-insert compensation: moving an item forward past its own
/// slot shifts the target left by one
fn adjust_index(source: usize, raw_target: usize) -> usize {
    if source < raw_target {
        raw_target - 1
    } else {
        raw_target
    }
}

/// Resolve a drag-end event into a mutation intent using a snapshot of the
/// current tree. Never mutates; never panics on stale context.
pub fn resolve_drop(
    payload: &DragPayload,
    target: Option<&DropTarget>,
    content: &PageContent,
) -> Resolution {
    let Some(target) = target else {
        return Resolution::Ignore; // rule 10: dropped on nothing
    };

    debug!(?payload, ?target, "Resolving drop");

    // Rule 1: section dragged onto a section drop zone
    if let (DragPayload::Section { section_id }, DropTarget::SectionDropZone { index }) =
        (payload, target)
    {
        return resolve_section_reorder(content, section_id, *index);
    }

    // Section template dropped between sections
    if let (DragPayload::SectionTemplate, DropTarget::SectionDropZone { index }) =
        (payload, target)
    {
        return Resolution::Mutate(vec![Mutation::InsertSectionAt {
            index: *index,
            partial: SectionPartial::default(),
        }]);
    }
    if let (DragPayload::SectionTemplate, DropTarget::Canvas) = (payload, target) {
        return Resolution::Mutate(vec![Mutation::AddSection {
            partial: SectionPartial::default(),
        }]);
    }

    // Rule 2: widget template on a canvas-level widget drop zone wraps a
    // new section at the zone's position; inside a column it inserts there
    if let (
        DragPayload::WidgetTemplate { template },
        DropTarget::WidgetDropZone {
            column_id,
            index,
            ..
        },
    ) = (payload, target)
    {
        return match column_id {
            None => Resolution::Mutate(vec![Mutation::WrapWidgetInSection {
                template: template.clone(),
                index: Some(*index),
            }]),
            Some(column_id) => match check_placement(template, target) {
                Err(rejection) => Resolution::Reject(rejection),
                Ok(()) => Resolution::Mutate(vec![Mutation::AddWidget {
                    template: template.clone(),
                    column_id: column_id.clone(),
                    index: Some(*index),
                }]),
            },
        };
    }

    if let DragPayload::WidgetTemplate { template } = payload {
        // Rule 3: placement gate for structural template kinds
        if let Err(rejection) = check_placement(template, target) {
            return Resolution::Reject(rejection);
        }

        match target {
            // Section-kind templates materialize as sections
            DropTarget::Canvas if template.placement() == TemplatePlacement::Section => {
                return Resolution::Mutate(vec![Mutation::AddSection {
                    partial: SectionPartial::default(),
                }]);
            }
            DropTarget::Section { section_id }
                if template.placement() == TemplatePlacement::Section =>
            {
                // Insert directly after the target section
                let index = content
                    .section_index(section_id)
                    .map(|i| i + 1)
                    .unwrap_or(content.sections.len());
                return Resolution::Mutate(vec![Mutation::InsertSectionAt {
                    index,
                    partial: SectionPartial::default(),
                }]);
            }

            // Rule 4: auto-wrap on the bare canvas
            DropTarget::Canvas => {
                return Resolution::Mutate(vec![Mutation::WrapWidgetInSection {
                    template: template.clone(),
                    index: None,
                }]);
            }

            // Rule 5: insert into an existing column, or next to a widget
            DropTarget::Column { column_id, .. } => {
                return Resolution::Mutate(vec![Mutation::AddWidget {
                    template: template.clone(),
                    column_id: column_id.clone(),
                    index: None,
                }]);
            }
            DropTarget::Widget {
                column_id, index, ..
            } => {
                return Resolution::Mutate(vec![Mutation::AddWidget {
                    template: template.clone(),
                    column_id: column_id.clone(),
                    index: Some(index + 1),
                }]);
            }

            _ => return Resolution::Ignore,
        }
    }

    if let DragPayload::Widget {
        widget_id,
        column_id: source_column,
        index: source_index,
        ..
    } = payload
    {
        match target {
            // Rule 6: widget on an in-column drop zone
            DropTarget::WidgetDropZone {
                column_id: Some(target_column),
                index,
                ..
            } => {
                return resolve_widget_placement(
                    widget_id,
                    source_column,
                    *source_index,
                    target_column,
                    *index,
                );
            }

            // Rule 7: widget dropped on another widget - same logic, using
            // the target widget's recorded context
            DropTarget::Widget {
                widget_id: target_widget,
                column_id: target_column,
                index,
                ..
            } => {
                if target_widget == widget_id {
                    return Resolution::Ignore; // dropped on itself
                }
                return resolve_widget_placement(
                    widget_id,
                    source_column,
                    *source_index,
                    target_column,
                    *index,
                );
            }

            // Rule 8: widget on a bare column → append semantics
            DropTarget::Column {
                column_id: target_column,
                ..
            } => {
                if target_column == source_column {
                    return Resolution::Ignore;
                }
                return Resolution::Mutate(vec![Mutation::MoveWidget {
                    widget_id: widget_id.clone(),
                    from_column_id: source_column.clone(),
                    to_column_id: target_column.clone(),
                    index: None,
                }]);
            }

            _ => return Resolution::Ignore,
        }
    }

    // Rule 9: section dragged onto another section or any descendant
    // carrying a container id
    if let DragPayload::Section { section_id } = payload {
        let target_node = match target {
            DropTarget::Section {
                section_id: target_section,
            } => Some(target_section),
            DropTarget::Container { node_id } => Some(node_id),
            _ => None,
        };

        if let Some(target_node) = target_node {
            if target_node == section_id {
                return Resolution::Ignore;
            }
            if let Some(raw_target) = content.owning_section_index(target_node) {
                return resolve_section_reorder(content, section_id, raw_target);
            }
        }
    }

    // Rule 10: nothing matched
    Resolution::Ignore
}

/// Same-column reorder vs cross-column move, with index compensation for
/// the same-column case
fn resolve_widget_placement(
    widget_id: &str,
    source_column: &str,
    source_index: usize,
    target_column: &str,
    raw_target: usize,
) -> Resolution {
    if source_column == target_column {
        let new_index = adjust_index(source_index, raw_target);
        if new_index == source_index {
            return Resolution::Ignore;
        }
        Resolution::Mutate(vec![Mutation::ReorderWidgets {
            column_id: source_column.to_string(),
            old_index: source_index,
            new_index,
        }])
    } else {
        Resolution::Mutate(vec![Mutation::MoveWidget {
            widget_id: widget_id.to_string(),
            from_column_id: source_column.to_string(),
            to_column_id: target_column.to_string(),
            index: Some(raw_target),
        }])
    }
}

fn resolve_section_reorder(
    content: &PageContent,
    section_id: &str,
    raw_target: usize,
) -> Resolution {
    let Some(source_index) = content.section_index(section_id) else {
        return Resolution::Ignore; // stale drag context
    };

    let new_index = adjust_index(source_index, raw_target);
    if new_index == source_index {
        return Resolution::Ignore;
    }

    Resolution::Mutate(vec![Mutation::ReorderSections {
        old_index: source_index,
        new_index,
    }])
}

/// Rule 3: the placement gate. Section-kind templates may only target the
/// canvas or a section; container-kind templates may never target a
/// column. Checked before any fall-through to auto-wrap or column insert.
fn check_placement(template: &WidgetTemplate, target: &DropTarget) -> Result<(), PlacementError> {
    match template.placement() {
        TemplatePlacement::Section => match target {
            DropTarget::Canvas | DropTarget::Section { .. } => Ok(()),
            _ => Err(PlacementError::SectionWidgetTarget),
        },
        TemplatePlacement::Container => match target {
            DropTarget::Column { .. } | DropTarget::WidgetDropZone { column_id: Some(_), .. } => {
                Err(PlacementError::ContainerWidgetInColumn)
            }
            _ => Ok(()),
        },
        TemplatePlacement::Standard => Ok(()),
    }
}

/// Ephemeral per-gesture state, reset when the drag ends or cancels.
/// Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragState {
    pub payload: Option<DragPayload>,
    pub active_target: Option<DropTarget>,

    /// Set when the pointer has left the section the drag started in
    pub cross_container: bool,
}

impl DragState {
    pub fn begin(&mut self, payload: DragPayload) {
        *self = Self {
            payload: Some(payload),
            active_target: None,
            cross_container: false,
        };
    }

    pub fn hover(&mut self, target: DropTarget) {
        if let (Some(DragPayload::Widget { section_id, .. }), Some(over)) =
            (&self.payload, target_section(&target))
        {
            if over != section_id {
                self.cross_container = true;
            }
        }
        self.active_target = Some(target);
    }

    pub fn is_dragging(&self) -> bool {
        self.payload.is_some()
    }

    /// Resolve against the tree and reset. Cancelled gestures resolve to
    /// `Ignore` and leave no trace.
    pub fn end(&mut self, content: &PageContent) -> Resolution {
        let resolution = match &self.payload {
            Some(payload) => resolve_drop(payload, self.active_target.as_ref(), content),
            None => Resolution::Ignore,
        };
        self.reset();
        resolution
    }

    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

fn target_section(target: &DropTarget) -> Option<&String> {
    match target {
        DropTarget::Column { section_id, .. } | DropTarget::Widget { section_id, .. } => {
            Some(section_id)
        }
        DropTarget::WidgetDropZone { section_id, .. } => section_id.as_ref(),
        DropTarget::Section { section_id } => Some(section_id),
        _ => None,
    }
}
