//! Error types for the metaorch engines
//!
//! The audit engine never surfaces these to callers (every failure becomes a
//! finding); they are used by the merge path and by the workspace readers.

use thiserror::Error;

/// Main error type for merge and workspace operations
#[derive(Error, Debug)]
pub enum MetaorchError {
    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File access or I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// Serialization error while rendering a report
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl MetaorchError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        MetaorchError::InvalidInput(msg.into())
    }

    /// Create a file error
    pub fn file_error(msg: impl Into<String>) -> Self {
        MetaorchError::FileError(msg.into())
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            MetaorchError::InvalidInput(_) | MetaorchError::FileError(_)
        )
    }
}

impl From<std::io::Error> for MetaorchError {
    fn from(err: std::io::Error) -> Self {
        MetaorchError::FileError(err.to_string())
    }
}

impl From<serde_json::Error> for MetaorchError {
    fn from(err: serde_json::Error) -> Self {
        MetaorchError::SerializationError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for MetaorchError {
    fn from(err: serde_yaml::Error) -> Self {
        MetaorchError::SerializationError(format!("YAML error: {}", err))
    }
}

/// Result type alias for metaorch operations
pub type Result<T> = std::result::Result<T, MetaorchError>;
