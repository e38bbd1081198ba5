//! Gain computers driven by an envelope level.
//!
//! A [`DynamicsProcessor`] consumes the original sample together with an envelope
//! value (usually from an [`EnvelopeFollower`](crate::EnvelopeFollower)) and returns
//! the sample scaled by a gain-reduction factor in `[ceiling, 1.0]`.
//!
//! ## Modes
//!
//! - [`DynamicsMode::Simple`] - `1 / (1 + envelope)`, no threshold
//! - [`DynamicsMode::Ratio`] - threshold/ratio/knee compressor in the dB domain
//! - [`DynamicsMode::Limiter`] - threshold-crossing limiter with a sustain hold
//!
//! ## Example
//!
//! ```
//! use phat_dsp::{DynamicsMode, DynamicsProcessor};
//!
//! let mut limiter = DynamicsProcessor::builder()
//!     .mode(DynamicsMode::Limiter)
//!     .threshold_db(-12.0)
//!     .ceiling_db(-20.0)
//!     .attack_seconds(0.011)
//!     .release_seconds(0.05)
//!     .build();
//! limiter.set_sample_rate(48000.0);
//!
//! let out = limiter.update(0.5, 0.5);
//! assert!(out <= 0.5);
//! ```

mod mode;
mod processor;

pub use mode::DynamicsMode;
pub use processor::{DynamicsProcessor, DynamicsProcessorBuilder};
