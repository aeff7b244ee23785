//! Core error types for snapkeep.

use thiserror::Error;

/// Core error type for snapkeep model operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid data in a wire model.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Upload metadata and file parts do not pair up 1:1.
    #[error("Upload mismatch: {items} metadata entries but {files} files")]
    UploadMismatch {
        /// Number of metadata entries.
        items: usize,
        /// Number of file parts.
        files: usize,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
