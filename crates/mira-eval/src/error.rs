//! Error types for landmark evaluation.

use thiserror::Error;

/// Main error type for landmark evaluation operations.
#[derive(Error, Debug)]
pub enum EvalError {
    /// The two landmark lists are not in one-to-one correspondence.
    #[error("landmark count mismatch: fixed has {fixed}, moving has {moving}")]
    LandmarkCountMismatch { fixed: usize, moving: usize },

    /// A landmark file contained no usable landmarks.
    #[error("no valid landmarks in {path}")]
    EmptyLandmarkFile { path: String },

    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;
