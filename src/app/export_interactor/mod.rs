// Export interactor - Plays and exports named sequences

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::app::open_session;
use crate::domain::edl::{render_edl, EdlClip};
use crate::domain::errors::*;
use crate::domain::registry::Sequence;
use crate::domain::routes::RouteEngine;
use crate::ports::*;
use crate::utils::path::parent_dir;
use crate::utils::time::format_duration;

/// Result of an EDL export
#[derive(Debug, Clone, PartialEq)]
pub struct EdlReport {
    pub output: PathBuf,
    pub events: usize,
    /// Bound files left out because they are missing or unreadable
    pub skipped: Vec<PathBuf>,
}

/// Interactor for sequence playback and export
pub struct ExportInteractor {
    store: Arc<dyn DocumentStorePort>,
    probe: Arc<dyn ProbePort>,
    player: Arc<dyn PlaybackPort>,
    exporter: Arc<dyn ConcatExportPort>,
    engine: RouteEngine,
    overwrite: bool,
}

impl ExportInteractor {
    /// Create new export interactor with injected ports
    pub fn new(
        store: Arc<dyn DocumentStorePort>,
        probe: Arc<dyn ProbePort>,
        player: Arc<dyn PlaybackPort>,
        exporter: Arc<dyn ConcatExportPort>,
        engine: RouteEngine,
        overwrite: bool,
    ) -> Self {
        Self {
            store,
            probe,
            player,
            exporter,
            engine,
            overwrite,
        }
    }

    /// Play the bound files of `name` in route order
    pub async fn play(&self, project: &Path, name: &str) -> Result<PlaybackReport, DomainError> {
        let files = self.playable_files(project, name).await?;
        info!("Playing {} ({} clips)", name, files.len());
        let report = self.player.play_sequence(&files).await?;
        if !report.failed.is_empty() {
            warn!("{} of {} clips failed to play", report.failed.len(), files.len());
        }
        Ok(report)
    }

    /// Concatenate the bound files of `name` into one video at `output`
    pub async fn export_video(
        &self,
        project: &Path,
        name: &str,
        output: &Path,
    ) -> Result<ExportReport, DomainError> {
        let files = self.playable_files(project, name).await?;
        if let Some(missing) = files.iter().find(|file| !file.exists()) {
            return Err(DomainError::FileNotFound(missing.clone()));
        }

        let frame_size = match self.probe.probe(&files[0]).await {
            Ok(probe) => probe.frame_size(),
            Err(e) => {
                warn!("Could not read frame size of {}: {}", files[0].display(), e);
                None
            }
        };

        let request = ConcatRequest {
            files,
            output: output.to_path_buf(),
            frame_size,
            overwrite: self.overwrite,
        };
        info!("Exporting {} to {}", name, output.display());
        self.exporter.export(&request).await
    }

    /// Write a CMX3600 edit decision list for `name` to `output`
    pub async fn export_edl(
        &self,
        project: &Path,
        name: &str,
        output: &Path,
        title: Option<&str>,
    ) -> Result<EdlReport, DomainError> {
        let files = self.playable_files(project, name).await?;
        if output.exists() && !self.overwrite {
            return Err(DomainError::BadArgs(format!(
                "{} already exists; pass --overwrite to replace it",
                output.display()
            )));
        }

        let mut clips = Vec::with_capacity(files.len());
        let mut skipped = Vec::new();
        for file in files {
            if !file.exists() {
                warn!("Skipping missing clip {}", file.display());
                skipped.push(file);
                continue;
            }
            match self.probe.probe(&file).await {
                Ok(probe) => {
                    info!("{}: {}", file.display(), format_duration(probe.duration));
                    clips.push(EdlClip::new(file, probe.duration));
                }
                Err(e) => {
                    warn!("Skipping unreadable clip {}: {}", file.display(), e);
                    skipped.push(file);
                }
            }
        }
        if clips.is_empty() {
            return Err(DomainError::NothingToPlay(name.to_string()));
        }

        let text = render_edl(title.unwrap_or(name), &clips);
        tokio::fs::create_dir_all(parent_dir(output))
            .await
            .map_err(|e| DomainError::FsFail(format!("{}: {}", output.display(), e)))?;
        tokio::fs::write(output, text)
            .await
            .map_err(|e| DomainError::FsFail(format!("{}: {}", output.display(), e)))?;

        info!("Wrote {} events to {}", clips.len(), output.display());
        Ok(EdlReport {
            output: output.to_path_buf(),
            events: clips.len(),
            skipped,
        })
    }

    async fn resolve(&self, project: &Path, name: &str) -> Result<Sequence, DomainError> {
        let (mut session, _) = open_session(self.store.as_ref(), &self.engine, project).await?;
        session
            .sequence(name)?
            .cloned()
            .ok_or_else(|| DomainError::SequenceNotFound(name.to_string()))
    }

    async fn playable_files(&self, project: &Path, name: &str) -> Result<Vec<PathBuf>, DomainError> {
        let sequence = self.resolve(project, name).await?;
        let files: Vec<PathBuf> = sequence
            .playable_files()
            .into_iter()
            .map(Path::to_path_buf)
            .collect();
        if files.is_empty() {
            return Err(DomainError::NothingToPlay(name.to_string()));
        }
        Ok(files)
    }
}
