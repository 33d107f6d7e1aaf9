//! Error handling module for ReelRoute

use thiserror::Error;

use crate::adapters::ConfigError;
use crate::domain::errors::DomainError;

/// Main error type for ReelRoute operations
#[derive(Error, Debug)]
pub enum ReelRouteError {
    /// Editing, routing or export failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialized
    #[error("Failed to initialize logging: {message}")]
    LoggingInit { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON output error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for ReelRoute operations
pub type ReelRouteResult<T> = std::result::Result<T, ReelRouteError>;
