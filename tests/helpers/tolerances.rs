//! Tolerance constants for audio testing.
//!
//! Different operations require different precision levels.

/// Floating point rounding errors (for passthrough, exact gain).
/// Use for operations that should be mathematically exact.
pub const FLOAT_EPSILON: f32 = 1e-6;

/// DSP processing tolerance (filters and envelopes accumulate rounding).
pub const DSP_EPSILON: f32 = 1e-4;

/// Steady state of limiters and compressors after a few seconds of settling.
pub const SETTLE_EPSILON: f32 = 1e-3;

/// Silence threshold (~-80dB).
/// Values below this are considered silent.
pub const SILENCE_THRESHOLD: f32 = 0.0001;
