//! Error types for storage operations

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// File system error
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being accessed
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Stored document is not a valid record collection
    #[error("Failed to parse {path}: {reason}")]
    Parse {
        /// Path of the unparsable document
        path: String,
        /// Parser message
        reason: String,
    },

    /// Records could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Whether this error means the stored data is corrupted (as opposed to I/O failure)
    pub fn is_corruption(&self) -> bool {
        matches!(self, StoreError::Parse { .. })
    }
}

impl From<serde_yaml::Error> for StoreError {
    fn from(e: serde_yaml::Error) -> Self {
        StoreError::Serialize(e.to_string())
    }
}
