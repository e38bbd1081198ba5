//! Error types for phat-core.

use thiserror::Error;

/// Error type for control-thread operations.
///
/// Nothing on the audio thread returns this; `process` absorbs anomalies locally.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[cfg(feature = "state")]
    #[error("State serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
