// Edit interactor - Applies editing commands to a stored canvas

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::app::open_session;
use crate::domain::document::{CanvasDocument, LoadReport};
use crate::domain::errors::*;
use crate::domain::routes::RouteEngine;
use crate::domain::session::{CommandOutcome, EditCommand};
use crate::ports::*;

/// Result of an edit run
#[derive(Debug, Clone)]
pub struct EditResponse {
    /// One outcome per command, in order
    pub outcomes: Vec<CommandOutcome>,
    /// Sequence names after the edit
    pub sequences: Vec<String>,
    /// Whether the canvas was written back
    pub saved: bool,
    pub load_report: LoadReport,
}

/// Interactor for canvas editing
pub struct EditInteractor {
    store: Arc<dyn DocumentStorePort>,
    engine: RouteEngine,
}

impl EditInteractor {
    /// Create new edit interactor with injected ports
    pub fn new(store: Arc<dyn DocumentStorePort>, engine: RouteEngine) -> Self {
        Self { store, engine }
    }

    /// Create an empty canvas at `path`
    pub async fn init(&self, path: &Path, force: bool) -> Result<(), DomainError> {
        if !force && self.store.exists(path).await {
            return Err(DomainError::BadArgs(format!(
                "{} already exists; pass --force to replace it",
                path.display()
            )));
        }
        self.store.save(path, &CanvasDocument::default()).await?;
        info!("Created empty canvas {}", path.display());
        Ok(())
    }

    /// Load the canvas, apply `commands` in order, and save it if anything changed
    pub async fn edit(
        &self,
        path: &Path,
        commands: Vec<EditCommand>,
    ) -> Result<EditResponse, DomainError> {
        let (mut session, load_report) = open_session(self.store.as_ref(), &self.engine, path).await?;
        let before = session.graph().revision();

        let outcomes: Vec<CommandOutcome> = commands
            .into_iter()
            .map(|command| session.apply(command))
            .collect();

        let saved = session.graph().revision() != before;
        if saved {
            self.store.save(path, &session.to_document()).await?;
        }

        Ok(EditResponse {
            outcomes,
            sequences: session.refresh(),
            saved,
            load_report,
        })
    }
}
