//! # Editor Workspace
//!
//! Glue between the page document and persistence: applies mutations,
//! classifies their persistence needs, and runs the save flows.
//!
//! Mutation → save routing:
//! - structural outcomes save the page structure immediately
//! - mutations that created a widget first save that widget's settings
//!   record, then the page structure (two-phase; the structure save only
//!   makes sense once the widget record exists server-side)
//! - settings-only outcomes do nothing until the user saves explicitly
//!
//! All saves are optimistic. A failed call is logged and recorded in the
//! coordinator's state; the in-memory tree keeps the user's work. Each
//! payload carries the monotonically increasing document version so the
//! backend can ignore writes that complete out of order.

use crate::autosave::{AutosaveCoordinator, SaveAttempt};
use crate::client::{ClientError, PersistenceClient};
use pagewright_editor::{Mutation, Outcome, PageDocument, Persistence};
use pagewright_model::{
    hydrate_widgets, SaveNodeSettingsRequest, SaveWidgetSettingsRequest,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct EditorWorkspace {
    document: PageDocument,
    client: Arc<dyn PersistenceClient>,
    coordinator: Arc<AutosaveCoordinator>,
}

impl EditorWorkspace {
    /// Workspace over an empty page
    pub fn new(page_id: impl Into<String>, client: Arc<dyn PersistenceClient>) -> Self {
        Self {
            document: PageDocument::new(page_id),
            coordinator: Arc::new(AutosaveCoordinator::new(client.clone())),
            client,
        }
    }

    /// Load a page from the backend and build a workspace over it
    #[instrument(skip(client))]
    pub async fn load(
        page_id: &str,
        client: Arc<dyn PersistenceClient>,
    ) -> Result<Self, ClientError> {
        let response = client.load_page(page_id).await?;

        let mut content = response.content;
        if let Some(records) = &response.widgets {
            hydrate_widgets(&mut content, records);
        }

        info!(sections = content.sections.len(), "Page loaded");
        Ok(Self {
            document: PageDocument::from_content(page_id, content),
            coordinator: Arc::new(AutosaveCoordinator::new(client.clone())),
            client,
        })
    }

    pub fn document(&self) -> &PageDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut PageDocument {
        &mut self.document
    }

    pub fn coordinator(&self) -> &Arc<AutosaveCoordinator> {
        &self.coordinator
    }

    /// Apply a mutation and run whatever persistence it calls for
    pub async fn apply(&mut self, mutation: Mutation) -> Outcome {
        let outcome = self.document.apply(mutation);

        if let Outcome::Applied(applied) = &outcome {
            // Two-phase: a freshly created widget saves its settings
            // record before the structure that references it
            if let Some(widget_id) = applied.created_widget.clone() {
                self.save_new_widget(&widget_id).await;
            }

            if applied.persistence == Persistence::Structural {
                self.save_structure().await;
            }
        }

        outcome
    }

    /// Phase one of widget creation. Failure is logged and the structure
    /// save proceeds anyway - there is no compensating rollback, the next
    /// explicit save retries the record.
    async fn save_new_widget(&self, widget_id: &str) {
        let Some(widget) = self.document.content().find_widget(widget_id) else {
            return;
        };

        let request = SaveWidgetSettingsRequest {
            widget_type: Some(widget.kind.clone()),
            general: widget.general.clone(),
            style: widget.style.clone(),
            advanced: widget.advanced.clone(),
        };

        if let Err(error) = self
            .client
            .save_widget_settings(self.document.page_id(), widget_id, &request)
            .await
        {
            warn!(%error, widget = widget_id, "Widget settings save failed; keeping in-memory state");
        }
    }

    /// Immediate structure save; marks the document clean on success
    async fn save_structure(&mut self) {
        let payload = self.document.save_payload(false);
        if self.coordinator.save_now(payload).await == SaveAttempt::Completed {
            self.document.mark_saved();
        }
    }

    /// Explicit user save: full page (layout + every widget record)
    pub async fn save_all(&mut self) -> SaveAttempt {
        let payload = self.document.save_payload(false);
        let attempt = self.coordinator.save_now(payload).await;
        if attempt == SaveAttempt::Completed {
            self.document.mark_saved();
            if let Some(widget_id) = self.document.selected_widget_id() {
                let widget_id = widget_id.to_string();
                self.document.clear_snapshot(&widget_id);
            }
        }
        attempt
    }

    /// Publish the page
    pub async fn publish(&mut self) -> Result<(), ClientError> {
        // Structure must be current before the publish flag flips
        let payload = self.document.save_payload(true);
        let response = self.client.save_page(&payload).await?;
        if !response.success {
            return Err(ClientError::Server {
                status: 200,
                message: response.message.unwrap_or_else(|| "Publish rejected".to_string()),
            });
        }

        self.client.publish_page(self.document.page_id()).await?;
        self.document.mark_saved();
        Ok(())
    }

    /// Explicitly save the open widget's settings, then drop its snapshot
    /// (the panel's save button)
    pub async fn save_selected_widget(&mut self) -> Result<(), ClientError> {
        let Some(widget) = self.document.selected_widget() else {
            return Ok(());
        };
        let widget_id = widget.id.clone();

        let request = SaveWidgetSettingsRequest {
            widget_type: None,
            general: widget.general.clone(),
            style: widget.style.clone(),
            advanced: widget.advanced.clone(),
        };

        self.client
            .save_widget_settings(self.document.page_id(), &widget_id, &request)
            .await?;
        self.document.clear_snapshot(&widget_id);
        Ok(())
    }

    /// Save a section's settings record
    pub async fn save_section_settings(&self, section_id: &str) -> Result<(), ClientError> {
        let Some(section) = self.document.content().find_section(section_id) else {
            return Ok(());
        };

        let request = SaveNodeSettingsRequest {
            settings: section.settings.clone(),
        };
        self.client
            .save_section_settings(self.document.page_id(), section_id, &request)
            .await?;
        Ok(())
    }

    /// Save a column's settings record
    pub async fn save_column_settings(&self, column_id: &str) -> Result<(), ClientError> {
        let Some(column) = self.document.content().find_column(column_id) else {
            return Ok(());
        };

        let request = SaveNodeSettingsRequest {
            settings: column.settings.clone(),
        };
        self.client
            .save_column_settings(self.document.page_id(), column_id, &request)
            .await?;
        Ok(())
    }
}
