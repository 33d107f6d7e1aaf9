//! FFprobe adapter for media file probing
//!
//! Runs the system `ffprobe` binary and reads its JSON report.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// FFprobe-based probe adapter
#[derive(Debug, Clone)]
pub struct FFprobeAdapter {
    binary: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ProbeReport {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Turn an ffprobe JSON report into a probe result
    fn parse_report(path: &Path, json: &[u8]) -> Result<MediaProbe, DomainError> {
        let report: ProbeReport = serde_json::from_slice(json).map_err(|e| {
            DomainError::ProbeFail(format!("Unreadable ffprobe output for {}: {}", path.display(), e))
        })?;

        let video = report
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"));

        let duration = report
            .format
            .as_ref()
            .and_then(|f| parse_seconds(f.duration.as_deref()))
            .or_else(|| video.and_then(|s| parse_seconds(s.duration.as_deref())))
            .or_else(|| {
                report
                    .streams
                    .iter()
                    .find_map(|s| parse_seconds(s.duration.as_deref()))
            })
            .ok_or_else(|| {
                DomainError::ProbeFail(format!("Could not determine duration of {}", path.display()))
            })?;

        Ok(MediaProbe {
            duration,
            width: video.and_then(|s| s.width),
            height: video.and_then(|s| s.height),
        })
    }
}

fn parse_seconds(value: Option<&str>) -> Option<Duration> {
    let seconds = value?.trim().parse::<f64>().ok()?;
    if seconds.is_finite() && seconds >= 0.0 {
        Some(Duration::from_secs_f64(seconds))
    } else {
        None
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe(&self, path: &Path) -> Result<MediaProbe, DomainError> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(DomainError::FileNotFound(path.to_path_buf()));
        }

        let output = Command::new(&self.binary)
            .args(["-v", "error", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                DomainError::ProbeFail(format!("Failed to run {}: {}", self.binary.display(), e))
            })?;

        if !output.status.success() {
            return Err(DomainError::ProbeFail(format!(
                "ffprobe failed for {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let probe = Self::parse_report(path, &output.stdout)?;
        debug!(file = %path.display(), ?probe, "Probed media");
        Ok(probe)
    }
}
