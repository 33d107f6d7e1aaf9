// JSON store adapter - Canvas documents as JSON files

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::document::CanvasDocument;
use crate::domain::errors::*;
use crate::ports::*;
use crate::utils::path::parent_dir;

/// Stores canvas documents as pretty-printed JSON files
#[derive(Debug, Clone, Default)]
pub struct JsonFileStore;

impl JsonFileStore {
    /// Create new JSON file store
    pub fn new() -> Self {
        Self
    }

    /// Write through a temp file in the target directory, then rename over the target
    fn write_atomic(path: &Path, content: &str) -> Result<(), DomainError> {
        let dir = parent_dir(path);
        std::fs::create_dir_all(&dir).map_err(|e| {
            DomainError::FsFail(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        let mut temp = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|e| DomainError::FsFail(format!("Failed to create temp file: {}", e)))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| DomainError::FsFail(format!("Failed to write temp file: {}", e)))?;
        temp.persist(path).map_err(|e| {
            DomainError::FsFail(format!("Failed to replace {}: {}", path.display(), e.error))
        })?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStorePort for JsonFileStore {
    async fn load(&self, path: &Path) -> Result<CanvasDocument, DomainError> {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DomainError::FileNotFound(path.to_path_buf()));
            }
            Err(e) => {
                return Err(DomainError::FsFail(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        let document = CanvasDocument::from_json(&text)?;
        debug!(
            squares = document.squares.len(),
            connections = document.connections.len(),
            "Read canvas document"
        );
        Ok(document)
    }

    async fn save(&self, path: &Path, document: &CanvasDocument) -> Result<(), DomainError> {
        let content = document.to_json()?;
        let target: PathBuf = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::write_atomic(&target, &content))
            .await
            .map_err(|e| DomainError::FsFail(format!("Save task failed: {}", e)))??;
        info!("Canvas saved to {}", path.display());
        Ok(())
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}
