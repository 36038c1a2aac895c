//! # Navigation Outline
//!
//! Read-only projection of the content tree for the structure sidebar:
//! section → column → widget, each node labeled and carrying its
//! breadcrumb path. The outline is never a second source of truth - drags
//! initiated from it translate back into the same store mutations as
//! canvas drags, through a deliberately narrower drop vocabulary so
//! outline gestures cannot interfere with canvas-level drop zones.

use crate::mutations::Mutation;
use pagewright_model::{PageContent, Section, Widget};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlineKind {
    Section,
    Column,
    Widget,
}

/// One node of the projected tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub id: String,
    pub label: String,
    pub kind: OutlineKind,

    /// Breadcrumb of ancestor labels, root first
    pub path: Vec<String>,

    pub children: Vec<OutlineNode>,
}

fn section_label(section: &Section, position: usize) -> String {
    section
        .settings
        .get_str("_title")
        .map(str::to_string)
        .unwrap_or_else(|| format!("Section {}", position + 1))
}

fn widget_label(widget: &Widget) -> String {
    widget
        .general
        .get_str("_title")
        .map(str::to_string)
        .unwrap_or_else(|| {
            let mut chars = widget.kind.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => widget.kind.clone(),
            }
        })
}

/// Project the content tree into outline nodes in a single top-down pass
pub fn build_outline(content: &PageContent) -> Vec<OutlineNode> {
    content
        .sections
        .iter()
        .enumerate()
        .map(|(position, section)| {
            let label = section_label(section, position);
            let children = section
                .columns
                .iter()
                .enumerate()
                .map(|(column_position, column)| {
                    let column_label = format!("Column {}", column_position + 1);
                    let widgets = column
                        .widgets
                        .iter()
                        .map(|widget| OutlineNode {
                            id: widget.id.clone(),
                            label: widget_label(widget),
                            kind: OutlineKind::Widget,
                            path: vec![label.clone(), column_label.clone()],
                            children: Vec::new(),
                        })
                        .collect();

                    OutlineNode {
                        id: column.id.clone(),
                        label: column_label,
                        kind: OutlineKind::Column,
                        path: vec![label.clone()],
                        children: widgets,
                    }
                })
                .collect();

            OutlineNode {
                id: section.id.clone(),
                label,
                kind: OutlineKind::Section,
                path: Vec::new(),
                children,
            }
        })
        .collect()
}

/// Search-filter the outline: case-insensitive substring match on label or
/// kind. Non-matching leaves are pruned; any ancestor with a matching
/// descendant stays so the hit remains reachable.
pub fn filter_outline(nodes: &[OutlineNode], query: &str) -> Vec<OutlineNode> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return nodes.to_vec();
    }

    nodes
        .iter()
        .filter_map(|node| filter_node(node, &query))
        .collect()
}

fn filter_node(node: &OutlineNode, query: &str) -> Option<OutlineNode> {
    let children: Vec<OutlineNode> = node
        .children
        .iter()
        .filter_map(|child| filter_node(child, query))
        .collect();

    let self_matches = node.label.to_lowercase().contains(query)
        || kind_name(node.kind).contains(query);

    if self_matches || !children.is_empty() {
        Some(OutlineNode {
            children,
            ..node.clone()
        })
    } else {
        None
    }
}

fn kind_name(kind: OutlineKind) -> &'static str {
    match kind {
        OutlineKind::Section => "section",
        OutlineKind::Column => "column",
        OutlineKind::Widget => "widget",
    }
}

/// Drop gestures the outline supports - a narrower vocabulary than the
/// canvas, translated into the same store mutations
#[derive(Debug, Clone, PartialEq)]
pub enum OutlineDrop {
    /// Section row dragged to a new position among sections
    SectionToIndex { section_id: String, index: usize },

    /// Widget row dragged to a position within a column (its own or
    /// another)
    WidgetToColumn {
        widget_id: String,
        column_id: String,
        index: usize,
    },
}

impl OutlineDrop {
    /// Translate to a store mutation against the current tree; `None` for
    /// stale rows (node no longer present)
    pub fn to_mutation(&self, content: &PageContent) -> Option<Mutation> {
        match self {
            OutlineDrop::SectionToIndex { section_id, index } => {
                let old_index = content.section_index(section_id)?;
                let new_index = if old_index < *index {
                    index.saturating_sub(1)
                } else {
                    *index
                };
                Some(Mutation::ReorderSections {
                    old_index,
                    new_index,
                })
            }

            OutlineDrop::WidgetToColumn {
                widget_id,
                column_id,
                index,
            } => {
                let location = content.locate_widget(widget_id)?;
                content.find_column(column_id)?;

                if &location.column_id == column_id {
                    let new_index = if location.index < *index {
                        index.saturating_sub(1)
                    } else {
                        *index
                    };
                    Some(Mutation::ReorderWidgets {
                        column_id: column_id.clone(),
                        old_index: location.index,
                        new_index,
                    })
                } else {
                    Some(Mutation::MoveWidget {
                        widget_id: widget_id.clone(),
                        from_column_id: location.column_id,
                        to_column_id: column_id.clone(),
                        index: Some(*index),
                    })
                }
            }
        }
    }
}

/// Guard against feedback loops from malformed drop-zone geometry: when
/// too many drag-end operations complete inside a short window, further
/// operations are blocked until the window drains and drag state must be
/// force-reset by the caller.
#[derive(Debug)]
pub struct RapidOpBreaker {
    threshold: usize,
    window: Duration,
    completions: VecDeque<Instant>,
}

impl RapidOpBreaker {
    pub fn new(threshold: usize, window: Duration) -> Self {
        Self {
            threshold,
            window,
            completions: VecDeque::new(),
        }
    }

    /// Record a drag-end completion at `now`; returns false when the
    /// breaker is tripped and the operation must be dropped
    pub fn allow(&mut self, now: Instant) -> bool {
        while let Some(front) = self.completions.front() {
            if now.duration_since(*front) > self.window {
                self.completions.pop_front();
            } else {
                break;
            }
        }

        if self.completions.len() >= self.threshold {
            warn!(
                threshold = self.threshold,
                "Rapid drag operations blocked; resetting drag state"
            );
            return false;
        }

        self.completions.push_back(now);
        true
    }

    pub fn reset(&mut self) {
        self.completions.clear();
    }
}

impl Default for RapidOpBreaker {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(1))
    }
}
