//! # Tree Mutations
//!
//! High-level semantic operations on the page content tree.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: Each mutation represents one user-level
//!    structural operation
//! 2. **Validated**: Every mutation checks its preconditions before
//!    touching the tree - apply fully succeeds or leaves no trace
//! 3. **Centralized**: The drag resolver and the outline never mutate the
//!    tree themselves; they emit these mutations
//!
//! ## Index Semantics
//!
//! Reorders are remove-then-insert splices: `reorder(old, new)` removes the
//! item at `old` and inserts it at `new` (clamped). `reorder(i, i)` is a
//! strict no-op. Drop-zone index compensation (the −1 when dragging an item
//! forward past its own slot) happens in the drag resolver, which owns the
//! gesture context - by the time a mutation exists, indices are literal.
//!
//! ## Persistence Classes
//!
//! Every applied mutation reports whether it is a structural change (saved
//! immediately by the autosave coordinator), a settings-only change (saved
//! on explicit user action), or a no-op.

use pagewright_common::IdGenerator;
use pagewright_model::{
    Column, PageContent, Section, SettingsMap, Widget, WidgetTemplate,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Responsive breakpoint a settings update targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

/// Caller-supplied overrides for a new section. Anything left out gets a
/// default: a generated id and a single full-width column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SectionPartial {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub settings: SettingsMap,

    /// Column widths, one column per entry; empty means one `"100%"` column
    #[serde(default)]
    pub column_widths: Vec<String>,
}

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Append a section to the page
    AddSection { partial: SectionPartial },

    /// Insert a section at a specific position
    InsertSectionAt {
        index: usize,
        partial: SectionPartial,
    },

    /// Remove a section and everything in it
    RemoveSection { section_id: String },

    /// Move a section to a new position (remove-then-insert)
    ReorderSections { old_index: usize, new_index: usize },

    /// Instantiate a widget template into an existing column
    AddWidget {
        template: WidgetTemplate,
        column_id: String,
        /// Position within the column; append when absent
        index: Option<usize>,
    },

    /// Instantiate a widget template inside a brand-new single-column
    /// section (the canvas auto-wrap affordance). `index` splices the new
    /// section into the page; append when absent.
    WrapWidgetInSection {
        template: WidgetTemplate,
        index: Option<usize>,
    },

    /// Shallow-merge settings updates into a widget
    UpdateWidget {
        widget_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        general: Option<SettingsMap>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<SettingsMap>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        advanced: Option<SettingsMap>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_visible: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_enabled: Option<bool>,
    },

    /// Remove a widget from whichever column holds it
    RemoveWidget { widget_id: String },

    /// Move a widget within its column (remove-then-insert)
    ReorderWidgets {
        column_id: String,
        old_index: usize,
        new_index: usize,
    },

    /// Transfer a widget between columns, atomically. The widget object
    /// moves by value: never duplicated, never orphaned. `index` positions
    /// it in the destination; append when absent.
    MoveWidget {
        widget_id: String,
        from_column_id: String,
        to_column_id: String,
        index: Option<usize>,
    },

    /// Merge settings into a section, optionally at a responsive breakpoint
    UpdateSectionSettings {
        section_id: String,
        settings: SettingsMap,
        #[serde(default)]
        breakpoint: Breakpoint,
    },

    /// Merge settings into a column
    UpdateColumnSettings {
        column_id: String,
        settings: SettingsMap,
    },

    /// Set one column's width (sibling widths are preserved verbatim)
    SetColumnWidth { column_id: String, width: String },

    /// Redistribute a section's column widths equally - the only operation
    /// that touches sibling widths
    RebalanceColumns { section_id: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Widget not found: {0}")]
    WidgetNotFound(String),

    #[error("Widget {widget_id} is not in column {column_id}")]
    WidgetNotInColumn {
        widget_id: String,
        column_id: String,
    },

    #[error("Index {index} is out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Persistence class of an applied mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Layout changed: persist the page structure immediately
    Structural,
    /// Only settings changed: saved by explicit user action
    SettingsOnly,
    /// Nothing changed (e.g. reorder to the same index)
    None,
}

/// What a successful apply did
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub persistence: Persistence,

    /// Id of a widget this mutation created, if any (drives the two-phase
    /// widget-then-page save)
    pub created_widget: Option<String>,

    /// Id of a section this mutation created, if any
    pub created_section: Option<String>,
}

impl Applied {
    fn structural() -> Self {
        Self {
            persistence: Persistence::Structural,
            created_widget: None,
            created_section: None,
        }
    }

    fn settings_only() -> Self {
        Self {
            persistence: Persistence::SettingsOnly,
            created_widget: None,
            created_section: None,
        }
    }

    fn noop() -> Self {
        Self {
            persistence: Persistence::None,
            created_widget: None,
            created_section: None,
        }
    }
}

impl Mutation {
    /// Apply to the tree with validation. Ids for created nodes come from
    /// the document's generator so they are unique and deterministic.
    pub fn apply(
        &self,
        content: &mut PageContent,
        ids: &mut IdGenerator,
    ) -> Result<Applied, MutationError> {
        self.validate(content)?;

        match self {
            Mutation::AddSection { partial } => {
                let index = content.sections.len();
                Ok(Self::apply_insert_section(content, ids, index, partial))
            }

            Mutation::InsertSectionAt { index, partial } => {
                Ok(Self::apply_insert_section(content, ids, *index, partial))
            }

            Mutation::RemoveSection { section_id } => {
                content.sections.retain(|s| &s.id != section_id);
                Ok(Applied::structural())
            }

            Mutation::ReorderSections {
                old_index,
                new_index,
            } => {
                if old_index == new_index {
                    return Ok(Applied::noop());
                }
                let section = content.sections.remove(*old_index);
                let insert = (*new_index).min(content.sections.len());
                content.sections.insert(insert, section);
                Ok(Applied::structural())
            }

            Mutation::AddWidget {
                template,
                column_id,
                index,
            } => {
                let widget = Widget::from_template(ids.next("widget"), template);
                let widget_id = widget.id.clone();

                let column = content
                    .find_column_mut(column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?;
                let insert = index.unwrap_or(column.widgets.len()).min(column.widgets.len());
                column.widgets.insert(insert, widget);

                Ok(Applied {
                    created_widget: Some(widget_id),
                    ..Applied::structural()
                })
            }

            Mutation::WrapWidgetInSection { template, index } => {
                let section_id = ids.next("section");
                let column_id = ids.next("column");
                let widget = Widget::from_template(ids.next("widget"), template);
                let widget_id = widget.id.clone();

                let mut section = Section::single_column(section_id.clone(), column_id);
                section.columns[0].widgets.push(widget);

                let insert = index.unwrap_or(content.sections.len()).min(content.sections.len());
                content.sections.insert(insert, section);

                Ok(Applied {
                    created_widget: Some(widget_id),
                    created_section: Some(section_id),
                    ..Applied::structural()
                })
            }

            Mutation::UpdateWidget {
                widget_id,
                general,
                style,
                advanced,
                is_visible,
                is_enabled,
            } => {
                let widget = content
                    .find_widget_mut(widget_id)
                    .ok_or_else(|| MutationError::WidgetNotFound(widget_id.clone()))?;

                if let Some(general) = general {
                    widget.general.merge(general);
                }
                if let Some(style) = style {
                    widget.style.merge(style);
                }
                if let Some(advanced) = advanced {
                    widget.advanced.merge(advanced);
                }
                if let Some(is_visible) = is_visible {
                    widget.is_visible = *is_visible;
                }
                if let Some(is_enabled) = is_enabled {
                    widget.is_enabled = *is_enabled;
                }

                Ok(Applied::settings_only())
            }

            Mutation::RemoveWidget { widget_id } => {
                for section in &mut content.sections {
                    for column in &mut section.columns {
                        column.widgets.retain(|w| &w.id != widget_id);
                    }
                }
                Ok(Applied::structural())
            }

            Mutation::ReorderWidgets {
                column_id,
                old_index,
                new_index,
            } => {
                if old_index == new_index {
                    return Ok(Applied::noop());
                }
                let column = content
                    .find_column_mut(column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?;
                let widget = column.widgets.remove(*old_index);
                let insert = (*new_index).min(column.widgets.len());
                column.widgets.insert(insert, widget);
                Ok(Applied::structural())
            }

            Mutation::MoveWidget {
                widget_id,
                from_column_id,
                to_column_id,
                index,
            } => {
                // Phase 1: detach from the source column, capturing the
                // widget by value
                let source = content
                    .find_column_mut(from_column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(from_column_id.clone()))?;
                let position = source
                    .widgets
                    .iter()
                    .position(|w| &w.id == widget_id)
                    .ok_or_else(|| MutationError::WidgetNotInColumn {
                        widget_id: widget_id.clone(),
                        column_id: from_column_id.clone(),
                    })?;
                let widget = source.widgets.remove(position);

                // Phase 2: insert the same widget into the destination.
                // validate() already proved the destination exists, so the
                // widget cannot be lost between the phases.
                let destination = content
                    .find_column_mut(to_column_id)
                    .expect("destination column checked by validate");
                let insert = index
                    .unwrap_or(destination.widgets.len())
                    .min(destination.widgets.len());
                destination.widgets.insert(insert, widget);

                Ok(Applied::structural())
            }

            Mutation::UpdateSectionSettings {
                section_id,
                settings,
                breakpoint,
            } => {
                let section = content
                    .find_section_mut(section_id)
                    .ok_or_else(|| MutationError::SectionNotFound(section_id.clone()))?;

                match breakpoint {
                    Breakpoint::Desktop => section.settings.merge(settings),
                    Breakpoint::Tablet => merge_breakpoint(&mut section.responsive.tablet, settings),
                    Breakpoint::Mobile => merge_breakpoint(&mut section.responsive.mobile, settings),
                }

                Ok(Applied::settings_only())
            }

            Mutation::UpdateColumnSettings {
                column_id,
                settings,
            } => {
                let column = content
                    .find_column_mut(column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?;
                column.settings.merge(settings);
                Ok(Applied::settings_only())
            }

            Mutation::SetColumnWidth { column_id, width } => {
                let column = content
                    .find_column_mut(column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?;
                column.width = width.clone();
                Ok(Applied::structural())
            }

            Mutation::RebalanceColumns { section_id } => {
                let section = content
                    .find_section_mut(section_id)
                    .ok_or_else(|| MutationError::SectionNotFound(section_id.clone()))?;
                pagewright_model::rebalance_columns(section);
                Ok(Applied::structural())
            }
        }
    }

    fn apply_insert_section(
        content: &mut PageContent,
        ids: &mut IdGenerator,
        index: usize,
        partial: &SectionPartial,
    ) -> Applied {
        let section_id = partial
            .id
            .clone()
            .unwrap_or_else(|| ids.next("section"));

        let columns = if partial.column_widths.is_empty() {
            vec![Column::full_width(ids.next("column"))]
        } else {
            partial
                .column_widths
                .iter()
                .map(|width| {
                    let mut column = Column::full_width(ids.next("column"));
                    column.width = width.clone();
                    column
                })
                .collect()
        };

        let mut section = Section::with_columns(section_id.clone(), columns);
        section.settings = partial.settings.clone();

        let insert = index.min(content.sections.len());
        content.sections.insert(insert, section);

        Applied {
            created_section: Some(section_id),
            ..Applied::structural()
        }
    }

    /// Validate without applying
    pub fn validate(&self, content: &PageContent) -> Result<(), MutationError> {
        match self {
            Mutation::AddSection { .. } | Mutation::WrapWidgetInSection { .. } => Ok(()),

            Mutation::InsertSectionAt { .. } => Ok(()), // index clamps

            Mutation::RemoveSection { section_id }
            | Mutation::RebalanceColumns { section_id }
            | Mutation::UpdateSectionSettings { section_id, .. } => content
                .find_section(section_id)
                .map(|_| ())
                .ok_or_else(|| MutationError::SectionNotFound(section_id.clone())),

            Mutation::ReorderSections {
                old_index,
                new_index,
            } => {
                let len = content.sections.len();
                if *old_index >= len {
                    return Err(MutationError::IndexOutOfBounds {
                        index: *old_index,
                        len,
                    });
                }
                if *new_index > len {
                    return Err(MutationError::IndexOutOfBounds {
                        index: *new_index,
                        len,
                    });
                }
                Ok(())
            }

            Mutation::AddWidget { column_id, .. }
            | Mutation::UpdateColumnSettings { column_id, .. }
            | Mutation::SetColumnWidth { column_id, .. } => content
                .find_column(column_id)
                .map(|_| ())
                .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone())),

            Mutation::UpdateWidget { widget_id, .. } | Mutation::RemoveWidget { widget_id } => {
                content
                    .find_widget(widget_id)
                    .map(|_| ())
                    .ok_or_else(|| MutationError::WidgetNotFound(widget_id.clone()))
            }

            Mutation::ReorderWidgets {
                column_id,
                old_index,
                new_index,
            } => {
                let column = content
                    .find_column(column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(column_id.clone()))?;
                let len = column.widgets.len();
                if *old_index >= len {
                    return Err(MutationError::IndexOutOfBounds {
                        index: *old_index,
                        len,
                    });
                }
                if *new_index > len {
                    return Err(MutationError::IndexOutOfBounds {
                        index: *new_index,
                        len,
                    });
                }
                Ok(())
            }

            Mutation::MoveWidget {
                widget_id,
                from_column_id,
                to_column_id,
                ..
            } => {
                let source = content
                    .find_column(from_column_id)
                    .ok_or_else(|| MutationError::ColumnNotFound(from_column_id.clone()))?;
                if !source.widgets.iter().any(|w| &w.id == widget_id) {
                    return Err(MutationError::WidgetNotInColumn {
                        widget_id: widget_id.clone(),
                        column_id: from_column_id.clone(),
                    });
                }
                content
                    .find_column(to_column_id)
                    .map(|_| ())
                    .ok_or_else(|| MutationError::ColumnNotFound(to_column_id.clone()))
            }
        }
    }

    /// Persistence class this mutation would report if applied (same-index
    /// reorders downgrade to `None` at apply time)
    pub fn persistence(&self) -> Persistence {
        match self {
            Mutation::UpdateWidget { .. }
            | Mutation::UpdateSectionSettings { .. }
            | Mutation::UpdateColumnSettings { .. } => Persistence::SettingsOnly,
            _ => Persistence::Structural,
        }
    }
}

fn merge_breakpoint(slot: &mut Option<SettingsMap>, settings: &SettingsMap) {
    match slot {
        Some(existing) => existing.merge(settings),
        None => *slot = Some(settings.clone()),
    }
}
