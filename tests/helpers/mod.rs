//! Test helpers and fixtures for phat integration tests
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact operations (passthrough, unity gain)
//! - `DSP_EPSILON` (1e-4): DSP processing (filters, envelopes)
//! - `SETTLE_EPSILON` (1e-3): Steady state of ballistic processors
//! - `SILENCE_THRESHOLD` (0.0001): Silence detection (-80dB)

#![allow(dead_code)]

pub mod tolerances;

use phat::prelude::*;

/// Default test sample rate (matches common hardware)
pub const TEST_SAMPLE_RATE: f64 = 48000.0;

/// Standard buffer size for deterministic testing
pub const TEST_BUFFER_SIZE: usize = 512;

/// Stereo session at the test rate and block size.
pub fn test_spec() -> ProcessSpec {
    ProcessSpec::new(TEST_SAMPLE_RATE, TEST_BUFFER_SIZE, 2)
}

/// Process one block made of `channels` in place.
pub fn process_channels(processor: &mut dyn AudioProcessor, channels: &mut [Vec<f32>]) {
    let mut slices: Vec<&mut [f32]> = channels.iter_mut().map(|c| c.as_mut_slice()).collect();
    let mut block = AudioBlock::new(&mut slices);
    processor.process(&mut block);
}

/// Feed `blocks` blocks of constant per-channel values and return the last output.
pub fn process_constant(
    processor: &mut dyn AudioProcessor,
    values: &[f32],
    blocks: usize,
) -> Vec<Vec<f32>> {
    let mut channels: Vec<Vec<f32>> = values.iter().map(|_| vec![0.0; TEST_BUFFER_SIZE]).collect();
    for _ in 0..blocks {
        for (channel, &value) in channels.iter_mut().zip(values) {
            channel.fill(value);
        }
        process_channels(processor, &mut channels);
    }
    channels
}

/// `amplitude`-scaled sine at [`TEST_SAMPLE_RATE`].
pub fn sine(frequency: f64, amplitude: f32, num_samples: usize) -> Vec<f32> {
    let step = std::f64::consts::TAU * frequency / TEST_SAMPLE_RATE;
    (0..num_samples)
        .map(|i| amplitude * (step * i as f64).sin() as f32)
        .collect()
}

/// Reproducible xorshift noise in `-1.0..1.0`.
pub fn noise(num_samples: usize, seed: u64) -> Vec<f32> {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    (0..num_samples)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 40) as f32 / (1u64 << 23) as f32 - 1.0
        })
        .collect()
}

/// Root mean square, accumulated in f64.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let energy: f64 = samples.iter().map(|&s| f64::from(s).powi(2)).sum();
    (energy / samples.len() as f64).sqrt() as f32
}

pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0, |max, s| s.abs().max(max))
}

/// Every sample within `tolerance` of zero.
pub fn assert_silent(samples: &[f32], tolerance: f32) {
    if let Some((i, s)) = samples.iter().enumerate().find(|(_, s)| s.abs() > tolerance) {
        panic!("expected silence within {tolerance}, sample {i} is {s}");
    }
}

/// RMS of at least `min_rms`.
pub fn assert_audible(samples: &[f32], min_rms: f32) {
    let level = rms(samples);
    assert!(level >= min_rms, "RMS {level} below {min_rms}");
}

/// Assert every sample is finite.
pub fn assert_finite(samples: &[f32]) {
    if let Some((i, s)) = samples.iter().enumerate().find(|(_, s)| !s.is_finite()) {
        panic!("Non-finite sample {} at index {}", s, i);
    }
}

/// Every shipped plugin, freshly constructed.
pub fn all_plugins() -> Vec<Box<dyn AudioProcessor>> {
    vec![
        Box::new(GainLimiter::new()),
        Box::new(PhatBass::new()),
        Box::new(PeakFilter::new()),
    ]
}
