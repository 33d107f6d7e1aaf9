//! FFplay playback adapter

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use crate::domain::errors::*;
use crate::ports::*;

/// Plays each file with `ffplay -autoexit`, waiting for one to end before the next
#[derive(Debug, Clone)]
pub struct FFplayAdapter {
    binary: PathBuf,
}

impl FFplayAdapter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl PlaybackPort for FFplayAdapter {
    async fn play_sequence(&self, files: &[PathBuf]) -> Result<PlaybackReport, DomainError> {
        let mut report = PlaybackReport {
            played: Vec::new(),
            failed: Vec::new(),
        };

        for (index, file) in files.iter().enumerate() {
            info!("Playing {}/{}: {}", index + 1, files.len(), file.display());
            let status = Command::new(&self.binary)
                .args(["-autoexit", "-loglevel", "error"])
                .arg(file)
                .stdin(Stdio::null())
                .status()
                .await
                .map_err(|e| {
                    DomainError::ProcessingError(format!(
                        "Failed to run {}: {}",
                        self.binary.display(),
                        e
                    ))
                })?;

            if status.success() {
                report.played.push(file.clone());
            } else {
                warn!("Playback of {} ended with {}", file.display(), status);
                report.failed.push(file.clone());
            }
        }

        info!("Sequence finished");
        Ok(report)
    }
}
