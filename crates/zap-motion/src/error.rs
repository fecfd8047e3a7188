//! Error types for fallible setup.
//!
//! Scheduling and stepping never fail; only setup (configuration parsing,
//! acquiring a drawing surface) can.

use thiserror::Error;

/// Result type for setup operations.
pub type Result<T> = std::result::Result<T, MotionError>;

#[derive(Error, Debug)]
pub enum MotionError {
    /// No drawable context could be obtained. Fatal, never retried.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Configuration JSON could not be parsed.
    #[error("invalid configuration JSON: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
