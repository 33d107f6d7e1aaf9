// Sequence interactor - Lists and resolves derived sequences

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::error;

use crate::app::open_session;
use crate::domain::errors::*;
use crate::domain::model::GraphModel;
use crate::domain::registry::Sequence;
use crate::domain::routes::RouteEngine;
use crate::ports::*;

/// Derived sequences of a canvas, or why there are none
#[derive(Debug, Clone, Serialize)]
pub struct SequenceListing {
    pub sequences: Vec<Sequence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
}

/// Interactor for sequence inspection
pub struct SequenceInteractor {
    store: Arc<dyn DocumentStorePort>,
    engine: RouteEngine,
}

impl SequenceInteractor {
    /// Create new sequence interactor with injected ports
    pub fn new(store: Arc<dyn DocumentStorePort>, engine: RouteEngine) -> Self {
        Self { store, engine }
    }

    /// Every sequence of the canvas; a route failure degrades to an empty list
    pub async fn list(&self, path: &Path) -> Result<SequenceListing, DomainError> {
        let (mut session, _) = open_session(self.store.as_ref(), &self.engine, path).await?;
        let listing = match session.sequences() {
            Ok(list) => SequenceListing {
                sequences: list.to_vec(),
                problem: None,
            },
            Err(e) => {
                error!("No sequences for {}: {}", path.display(), e);
                SequenceListing {
                    sequences: Vec::new(),
                    problem: Some(e.to_string()),
                }
            }
        };
        Ok(listing)
    }

    /// The graph stored at `path`
    pub async fn graph(&self, path: &Path) -> Result<GraphModel, DomainError> {
        let (session, _) = open_session(self.store.as_ref(), &self.engine, path).await?;
        Ok(session.graph().clone())
    }

    /// One sequence by name
    pub async fn resolve(&self, path: &Path, name: &str) -> Result<Sequence, DomainError> {
        let (mut session, _) = open_session(self.store.as_ref(), &self.engine, path).await?;
        session
            .sequence(name)?
            .cloned()
            .ok_or_else(|| DomainError::SequenceNotFound(name.to_string()))
    }
}
