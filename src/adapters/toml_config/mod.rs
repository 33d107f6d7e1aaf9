// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::domain::routes::DEFAULT_MAX_DEPTH;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "reelroute.toml";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Environment variables and the keys they override
pub const ENV_MAPPINGS: [(&str, &str); 8] = [
    ("REELROUTE_LOG_LEVEL", "log_level"),
    ("REELROUTE_FFMPEG", "ffmpeg_path"),
    ("REELROUTE_FFPROBE", "ffprobe_path"),
    ("REELROUTE_FFPLAY", "ffplay_path"),
    ("REELROUTE_VIDEO_CODEC", "video_codec"),
    ("REELROUTE_AUDIO_CODEC", "audio_codec"),
    ("REELROUTE_OVERWRITE", "overwrite"),
    ("REELROUTE_MAX_ROUTE_DEPTH", "max_route_depth"),
];

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Application settings, stored under a `[reelroute]` table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    pub ffplay_path: PathBuf,
    pub video_codec: String,
    pub audio_codec: String,
    pub overwrite: bool,
    pub max_route_depth: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            ffplay_path: PathBuf::from("ffplay"),
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            overwrite: false,
            max_route_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    reelroute: AppConfig,
}

impl AppConfig {
    /// Parse the `[reelroute]` table of a TOML document; missing keys keep defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.reelroute)
    }

    /// Read settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Set one key from its string form
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "log_level" => self.log_level = value.to_lowercase(),
            "ffmpeg_path" => self.ffmpeg_path = PathBuf::from(value),
            "ffprobe_path" => self.ffprobe_path = PathBuf::from(value),
            "ffplay_path" => self.ffplay_path = PathBuf::from(value),
            "video_codec" => self.video_codec = value.to_string(),
            "audio_codec" => self.audio_codec = value.to_string(),
            "overwrite" => self.overwrite = value.parse().map_err(|_| invalid())?,
            "max_route_depth" => self.max_route_depth = value.parse().map_err(|_| invalid())?,
            _ => return Err(invalid()),
        }
        Ok(())
    }

    /// Apply `REELROUTE_*` overrides through `lookup`; returns how many applied
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<usize, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;
        for (var, key) in ENV_MAPPINGS {
            if let Some(value) = lookup(var) {
                info!("Found environment override: {} = {}", var, value);
                self.set(key, &value)?;
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Check values that cannot be validated by their type
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "log_level".to_string(),
                value: self.log_level.clone(),
            });
        }
        if self.max_route_depth == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_route_depth".to_string(),
                value: "0".to_string(),
            });
        }
        for (key, codec) in [("video_codec", &self.video_codec), ("audio_codec", &self.audio_codec)] {
            if codec.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: codec.clone(),
                });
            }
        }
        Ok(())
    }
}
