//! Runtime primitives shared by the phat plugins.
//!
//! # Primary API
//!
//! - [`ProcessSpec`]: sample rate, block size and channel count handed to `prepare`
//! - [`AudioBlock`]: a host-owned block of non-interleaved channels, mutated in place
//! - [`ParameterSet`] / [`ParamSpec`]: the fixed parameter schema, read lock-free from the audio thread
//! - [`AtomicFloat`]: cache-line aligned atomic for single-writer/single-reader values
//!
//! # Feature-gated APIs
//!
//! - `"state"`: [`ParameterSet::save_state`] / [`ParameterSet::load_state`] (JSON snapshots)

pub mod error;
pub use error::{Error, Result};

mod block;
pub use block::AudioBlock;

mod config;
pub use config::{ProcessSpec, MAX_CHANNELS, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};

pub(crate) mod lockfree;
pub use lockfree::AtomicFloat;

pub mod parameter;
pub use parameter::{ParameterRange, ParameterScale};

mod params;
pub use params::{ParamId, ParamSpec, ParameterSet, ParameterSnapshot, STATE_VERSION};

pub use std::sync::Arc;
