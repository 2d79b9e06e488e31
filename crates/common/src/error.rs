//! Central error types for the sequencing engine (thiserror-based).

use thiserror::Error;

/// A segment declaration violated its construction contract.
///
/// These are programming errors in how the segment tree was built. They are
/// raised at construction time and never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("durationInFrames must be a positive integer, but got {value}")]
    InvalidDuration { value: String },

    #[error("from must be a finite integer, but got {value}")]
    InvalidOffset { value: String },

    #[error("layout expects either \"absolute-fill\" or \"none\", but got {value}")]
    InvalidLayout { value: String },
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown boundary mode: {value} (expected \"legacy\" or \"corrected\")")]
    InvalidBoundaryMode { value: String },
}

/// Convenience Result type for segment construction.
pub type SequenceResult<T> = Result<T, SequenceError>;

/// Convenience Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
