//! Centralized error type for the phat umbrella crate.
//!
//! Wraps the core error so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] phat_core::Error),

    #[error("Invalid pipeline: {0}")]
    InvalidPipeline(String),

    #[error("Unknown plugin: {0}")]
    UnknownPlugin(String),
}

pub type Result<T> = std::result::Result<T, Error>;
