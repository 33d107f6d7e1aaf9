// Application layer - Use case interactors

use std::path::Path;

use tracing::warn;

use crate::domain::document::LoadReport;
use crate::domain::errors::DomainError;
use crate::domain::routes::RouteEngine;
use crate::domain::session::EditSession;
use crate::ports::DocumentStorePort;

pub mod container;
pub mod edit_interactor;
pub mod export_interactor;
pub mod sequence_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use edit_interactor::EditInteractor;
pub use export_interactor::ExportInteractor;
pub use sequence_interactor::SequenceInteractor;

/// Load the document at `path` into a fresh session
pub(crate) async fn open_session(
    store: &dyn DocumentStorePort,
    engine: &RouteEngine,
    path: &Path,
) -> Result<(EditSession, LoadReport), DomainError> {
    let document = store.load(path).await?;
    let mut session = EditSession::with_engine(engine.clone());
    let report = session.load(&document);
    if !report.is_clean() {
        warn!(
            "{} contained dangling entries: {} squares, {} connections, {} files, {} aliases dropped",
            path.display(),
            report.dropped_nodes,
            report.dropped_edges,
            report.dropped_bindings,
            report.dropped_aliases
        );
    }
    Ok((session, report))
}
