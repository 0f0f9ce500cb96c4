// SPDX-License-Identifier: MPL-2.0

//! Error types for the reconstruction pipeline

use crate::backends::BackendError;
use std::fmt;
use std::path::PathBuf;

/// Result type alias using ReconstructionError
pub type ReconstructionResult<T> = Result<T, ReconstructionError>;

/// Errors that abort a reconstruction run
///
/// Running out of frames is not represented here: sources report it as
/// `Ok(None)` and the pipeline terminates normally.
#[derive(Debug, Clone)]
pub enum ReconstructionError {
    /// Frame source could not be initialized, nothing was written
    SourceInit(String),
    /// Frame source failed while loading a frame
    Source(BackendError),
    /// Frame buffers disagree with the declared grid dimensions
    InvalidFrame(String),
    /// Mesh artifact could not be opened or written
    Write { path: PathBuf, message: String },
    /// Configuration file could not be read or parsed
    Config(String),
}

impl ReconstructionError {
    pub fn write(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        ReconstructionError::Write {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ReconstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconstructionError::SourceInit(msg) => {
                write!(f, "Failed to initialize frame source: {}", msg)
            }
            ReconstructionError::Source(e) => write!(f, "Frame source error: {}", e),
            ReconstructionError::InvalidFrame(msg) => write!(f, "Invalid frame: {}", msg),
            ReconstructionError::Write { path, message } => {
                write!(f, "Failed to write mesh {}: {}", path.display(), message)
            }
            ReconstructionError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ReconstructionError {}

// Initialization failures keep their own variant so callers can tell
// "never started" apart from "failed mid-sequence"
impl From<BackendError> for ReconstructionError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::InitializationFailed(msg) => ReconstructionError::SourceInit(msg),
            other => ReconstructionError::Source(other),
        }
    }
}

impl From<serde_json::Error> for ReconstructionError {
    fn from(err: serde_json::Error) -> Self {
        ReconstructionError::Config(err.to_string())
    }
}
