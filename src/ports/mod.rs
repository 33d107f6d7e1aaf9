// Ports - Interface definitions for external collaborators

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::document::CanvasDocument;
use crate::domain::errors::DomainError;

/// Port for reading and writing canvas documents
#[async_trait]
pub trait DocumentStorePort: Send + Sync {
    /// Load a document from `path`
    async fn load(&self, path: &Path) -> Result<CanvasDocument, DomainError>;

    /// Save a document to `path`, replacing any previous content
    async fn save(&self, path: &Path, document: &CanvasDocument) -> Result<(), DomainError>;

    /// Check whether a document exists at `path`
    async fn exists(&self, path: &Path) -> bool;
}

/// Media properties needed by the export collaborators
#[derive(Debug, Clone, PartialEq)]
pub struct MediaProbe {
    pub duration: Duration,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl MediaProbe {
    /// Frame size of the first video stream, if there is one
    pub fn frame_size(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }
}

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe duration and frame size of a media file
    async fn probe(&self, path: &Path) -> Result<MediaProbe, DomainError>;
}

/// Outcome of playing a sequence
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackReport {
    pub played: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Port for sequence playback
#[async_trait]
pub trait PlaybackPort: Send + Sync {
    /// Play the files one after another
    async fn play_sequence(&self, files: &[PathBuf]) -> Result<PlaybackReport, DomainError>;
}

/// Everything an exporter needs to concatenate a sequence
#[derive(Debug, Clone, PartialEq)]
pub struct ConcatRequest {
    pub files: Vec<PathBuf>,
    pub output: PathBuf,
    /// Every clip is scaled to this size; taken from the first clip
    pub frame_size: Option<(u32, u32)>,
    pub overwrite: bool,
}

/// Result of a finished export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub output: PathBuf,
    pub clips: usize,
}

/// Port for single-file concatenation export
#[async_trait]
pub trait ConcatExportPort: Send + Sync {
    /// Concatenate the request's files into one video
    async fn export(&self, request: &ConcatRequest) -> Result<ExportReport, DomainError>;
}
