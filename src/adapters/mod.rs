// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod json_store;
pub mod playback_ffplay;
pub mod probe_ffprobe;
pub mod toml_config;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
pub use json_store::JsonFileStore;
pub use playback_ffplay::FFplayAdapter;
pub use probe_ffprobe::FFprobeAdapter;
pub use toml_config::{AppConfig, ConfigError};
