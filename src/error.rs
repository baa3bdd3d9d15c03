//! Error types for the tracking-data pipeline.
//!
//! Only structural failures live here. Per-record anomalies (points outside the
//! court, identifiers missing at a window end, empty ball series, zero-length
//! windows) are expressed with `Option` and skipped updates.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the caller of the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Frame count mismatch: expected {expected}, got {got}")]
    FrameCountMismatch { expected: usize, got: usize },

    #[error("Corrupted cache artifact {}: {reason}", .path.display())]
    CorruptedCache { path: PathBuf, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Collaborator error: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
