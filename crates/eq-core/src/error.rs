//! Error types for prompt storage.

use std::path::PathBuf;

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur when reading or writing prompts.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        /// Path of the store file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The backing file could not be written.
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        /// Path of the store file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// Stored or seed data is not valid JSON of the expected shape.
    #[error("malformed prompt data: {0}")]
    Json(#[from] serde_json::Error),

    /// A prompt failed validation before insertion.
    #[error("invalid prompt: {0}")]
    InvalidPrompt(String),
}
