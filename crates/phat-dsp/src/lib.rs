//! RT-safe DSP building blocks: envelope follower, envelope-driven dynamics
//! (simple compressor, ratio compressor, limiter), Linkwitz-Riley crossovers,
//! RBJ biquads and a dB gain stage.
//!
//! Nothing in the per-sample paths allocates, locks or logs. Coefficients are
//! computed when the sample rate or a time constant changes.

mod dynamics;
pub use dynamics::{DynamicsMode, DynamicsProcessor, DynamicsProcessorBuilder};

mod envelope_follower;
pub use envelope_follower::{EnvelopeFollower, DEFAULT_SR};

pub mod filters;
pub use filters::{Biquad, BiquadCoeffs, Crossover, FilterType, MAX_BANDS};

mod gain;
pub use gain::GainStage;

pub mod utils;
pub use utils::{amplitude_to_db, db_to_amplitude, sanitize, time_to_coeff};
