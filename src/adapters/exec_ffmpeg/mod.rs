//! FFmpeg execution adapter
//!
//! Concatenates a sequence into one video through ffmpeg's concat demuxer.
//! The system `ffmpeg` binary is used, so no FFmpeg development libraries are
//! needed at build time.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{error, info};

use crate::domain::errors::*;
use crate::ports::*;
use crate::utils::path::{absolutize, concat_manifest_entry, parent_dir};

/// FFmpeg-based concatenation adapter
#[derive(Debug, Clone)]
pub struct FFmpegAdapter {
    binary: PathBuf,
    video_codec: String,
    audio_codec: String,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(binary: impl Into<PathBuf>, video_codec: &str, audio_codec: &str) -> Self {
        Self {
            binary: binary.into(),
            video_codec: video_codec.to_string(),
            audio_codec: audio_codec.to_string(),
        }
    }

    /// Build the concat demuxer manifest, one `file '<path>'` line per clip
    pub fn concat_manifest(files: &[PathBuf]) -> String {
        let mut manifest = files
            .iter()
            .map(|p| concat_manifest_entry(&absolutize(p)))
            .collect::<Vec<_>>()
            .join("\n");
        manifest.push('\n');
        manifest
    }

    /// Arguments for one export, manifest path included
    pub fn build_args(&self, request: &ConcatRequest, manifest: &Path) -> Vec<String> {
        let mut args = vec![
            if request.overwrite { "-y" } else { "-n" }.to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            manifest.to_string_lossy().into_owned(),
        ];
        if let Some((width, height)) = request.frame_size {
            args.push("-vf".to_string());
            args.push(format!("scale={}:{},setsar=1", width, height));
        }
        args.extend([
            "-c:v".to_string(),
            self.video_codec.clone(),
            "-c:a".to_string(),
            self.audio_codec.clone(),
            request.output.to_string_lossy().into_owned(),
        ]);
        args
    }

    fn write_manifest(request: &ConcatRequest) -> Result<tempfile::NamedTempFile, DomainError> {
        let mut manifest = tempfile::Builder::new()
            .prefix("reelroute-concat-")
            .suffix(".txt")
            .tempfile()
            .map_err(|e| DomainError::FsFail(format!("Failed to create concat manifest: {}", e)))?;
        manifest
            .write_all(Self::concat_manifest(&request.files).as_bytes())
            .map_err(|e| DomainError::FsFail(format!("Failed to write concat manifest: {}", e)))?;
        Ok(manifest)
    }
}

/// Whether a binary can be launched with `-version`
pub async fn is_tool_available(binary: &Path) -> bool {
    Command::new(binary)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}

#[async_trait]
impl ConcatExportPort for FFmpegAdapter {
    async fn export(&self, request: &ConcatRequest) -> Result<ExportReport, DomainError> {
        if request.files.is_empty() {
            return Err(DomainError::BadArgs("No clips to export".to_string()));
        }
        if !request.overwrite && tokio::fs::try_exists(&request.output).await.unwrap_or(false) {
            return Err(DomainError::BadArgs(format!(
                "Output file already exists: {}",
                request.output.display()
            )));
        }
        if !is_tool_available(&self.binary).await {
            return Err(DomainError::ProcessingError(format!(
                "{} is required for export but could not be started",
                self.binary.display()
            )));
        }

        tokio::fs::create_dir_all(parent_dir(&request.output))
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to create output directory: {}", e)))?;

        let manifest = Self::write_manifest(request)?;
        let args = self.build_args(request, manifest.path());
        info!(
            "Exporting {} clips to {}",
            request.files.len(),
            request.output.display()
        );

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| DomainError::ProcessingError(format!("Failed to run ffmpeg: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("ffmpeg concat failed: {}", stderr.trim());
            return Err(DomainError::ProcessingError(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        info!("Video exported to {}", request.output.display());
        Ok(ExportReport {
            output: request.output.clone(),
            clips: request.files.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(frame_size: Option<(u32, u32)>, overwrite: bool) -> ConcatRequest {
        ConcatRequest {
            files: vec![PathBuf::from("/m/a.mp4"), PathBuf::from("/m/b.mp4")],
            output: PathBuf::from("/out/final.mp4"),
            frame_size,
            overwrite,
        }
    }

    #[test]
    fn test_manifest_lists_every_clip() {
        let manifest = FFmpegAdapter::concat_manifest(&request(None, true).files);
        let lines: Vec<&str> = manifest.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("file '") && lines[0].ends_with("/m/a.mp4'"));
        assert!(lines[1].ends_with("/m/b.mp4'"));
    }

    #[test]
    fn test_args_scale_to_first_clip() {
        let adapter = FFmpegAdapter::new("ffmpeg", "libx264", "aac");
        let args = adapter.build_args(&request(Some((1280, 720)), true), Path::new("list.txt"));

        assert_eq!(args[0], "-y");
        let vf = args.iter().position(|a| a == "-vf").unwrap();
        assert_eq!(args[vf + 1], "scale=1280:720,setsar=1");
        assert!(args.windows(2).any(|w| w[0] == "-c:v" && w[1] == "libx264"));
        assert!(args.windows(2).any(|w| w[0] == "-c:a" && w[1] == "aac"));
        assert_eq!(args.last().unwrap(), "/out/final.mp4");
    }

    #[test]
    fn test_args_without_overwrite_or_scaling() {
        let adapter = FFmpegAdapter::new("ffmpeg", "libx265", "opus");
        let args = adapter.build_args(&request(None, false), Path::new("list.txt"));
        assert_eq!(args[0], "-n");
        assert!(!args.iter().any(|a| a == "-vf"));
    }

    #[tokio::test]
    async fn test_empty_request_is_rejected() {
        let adapter = FFmpegAdapter::new("ffmpeg", "libx264", "aac");
        let mut empty = request(None, true);
        empty.files.clear();
        assert!(matches!(
            adapter.export(&empty).await,
            Err(DomainError::BadArgs(_))
        ));
    }
}
