//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Janitor error
    #[error(transparent)]
    Janitor(#[from] curator_janitor::JanitorError),

    /// Deep clean failed part-way
    #[error(transparent)]
    DeepClean(#[from] curator_janitor::DeepCleanError),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] curator_store::StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Background task failed
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
