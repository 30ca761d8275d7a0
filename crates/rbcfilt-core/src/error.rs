use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("Malformed text matrix: {0}")]
    MatrixFormat(String),

    #[error("Invalid .npy array: {0}")]
    Npy(String),

    #[error("Degenerate frame: {0}")]
    DegenerateFrame(String),

    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Invalid filter parameter: {0}")]
    InvalidParameter(String),

    #[error("External tool `{program}` failed after {attempts} attempt(s): {reason}")]
    ExternalTool {
        program: String,
        attempts: u32,
        reason: String,
    },

    #[error("Record encoding error: {0}")]
    Serialization(#[from] postcard::Error),

    #[error("Empty frame sequence")]
    EmptySequence,
}

impl FilterError {
    /// Whether the error only invalidates the frame it came from.
    ///
    /// Frame-local errors are logged and skipped by the batch runner; the rest
    /// abort the whole cell.
    pub fn is_frame_local(&self) -> bool {
        !matches!(
            self,
            Self::ShapeMismatch { .. } | Self::InvalidParameter(_) | Self::EmptySequence
        )
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
