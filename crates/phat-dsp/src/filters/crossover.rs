//! Linkwitz-Riley crossover built from cascaded `fundsp` biquad sections.
//!
//! Each split point uses LR4 filters: two cascaded 2nd-order Butterworth sections
//! (Q = 1/sqrt(2)), -6 dB at the crossover frequency, 24 dB/oct slopes. The
//! low-pass and high-pass halves of an LR4 pair sum to a 2nd-order all-pass, so
//! the summed bands have a flat magnitude response.
//!
//! # Topology
//!
//! Two bands (split at `f1`):
//!
//! ```text
//! low  = LP4(f1)
//! high = HP4(f1)
//! ```
//!
//! Three bands (splits at `f1 < f2`):
//!
//! ```text
//! low  = AP(f2) . LP4(f1)
//! mid  = LP4(f2) . HP4(f1)
//! high = HP4(f2) . HP4(f1)
//! ```
//!
//! The all-pass on the low band matches the phase shift the upper split puts on
//! the mid and high bands, so `low + mid + high = AP(f2) . AP(f1)`.

use std::f64::consts::FRAC_1_SQRT_2;

use tracing::debug;

use super::biquad::{Biquad, BiquadCoeffs};

/// Butterworth Q used by each LR4 section.
pub const LR4_Q: f64 = FRAC_1_SQRT_2;

/// Maximum number of bands supported by the crossover.
pub const MAX_BANDS: usize = 3;

const MAX_SPLITS: usize = MAX_BANDS - 1;

/// Two cascaded Butterworth sections.
#[derive(Debug, Clone, Default)]
struct Lr4 {
    stages: [Biquad; 2],
}

impl Lr4 {
    fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            stages: [Biquad::new(coeffs), Biquad::new(coeffs)],
        }
    }

    #[inline]
    fn tick(&mut self, x: f32) -> f32 {
        let y = self.stages[0].process_sample(x);
        self.stages[1].process_sample(y)
    }
}

/// Filter state of one channel.
#[derive(Debug, Clone, Default)]
struct ChannelState {
    lp1: Lr4,
    hp1: Lr4,
    lp2: Lr4,
    hp2: Lr4,
    ap2: Biquad,
}

/// Linkwitz-Riley band splitter with per-channel state.
///
/// State is allocated in [`prepare`](Crossover::prepare) and persists across
/// blocks; splitting never allocates.
#[derive(Debug, Clone)]
pub struct Crossover {
    frequencies: [f32; MAX_SPLITS],
    num_bands: usize,
    sample_rate: f64,
    channels: Vec<ChannelState>,
}

impl Crossover {
    /// Two bands split at `freq` Hz.
    pub fn two_band(freq: f32) -> Self {
        Self {
            frequencies: [freq, freq],
            num_bands: 2,
            sample_rate: 0.0,
            channels: Vec::new(),
        }
    }

    /// Three bands split at `low_freq` and `high_freq` Hz.
    ///
    /// The frequencies are swapped if given in descending order.
    pub fn three_band(low_freq: f32, high_freq: f32) -> Self {
        let (f1, f2) = if low_freq <= high_freq {
            (low_freq, high_freq)
        } else {
            (high_freq, low_freq)
        };
        Self {
            frequencies: [f1, f2],
            num_bands: 3,
            sample_rate: 0.0,
            channels: Vec::new(),
        }
    }

    pub fn num_bands(&self) -> usize {
        self.num_bands
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Split frequencies in Hz (one for two bands, two for three).
    pub fn frequencies(&self) -> &[f32] {
        &self.frequencies[..self.num_bands - 1]
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Compute coefficients for `sample_rate` and allocate fresh state for `num_channels`.
    pub fn prepare(&mut self, sample_rate: f64, num_channels: usize) {
        self.sample_rate = sample_rate;

        let f1 = self.frequencies[0] as f64;
        let f2 = self.frequencies[1] as f64;
        let template = ChannelState {
            lp1: Lr4::new(BiquadCoeffs::lowpass(sample_rate, f1, LR4_Q)),
            hp1: Lr4::new(BiquadCoeffs::highpass(sample_rate, f1, LR4_Q)),
            lp2: Lr4::new(BiquadCoeffs::lowpass(sample_rate, f2, LR4_Q)),
            hp2: Lr4::new(BiquadCoeffs::highpass(sample_rate, f2, LR4_Q)),
            ap2: Biquad::new(BiquadCoeffs::allpass(sample_rate, f2, LR4_Q)),
        };

        self.channels = vec![template; num_channels];

        debug!(
            "Crossover prepared: {} bands at {:?} Hz, {} channels, {} Hz",
            self.num_bands,
            self.frequencies(),
            num_channels,
            sample_rate
        );
    }

    /// Clear filter history without recomputing coefficients.
    pub fn reset(&mut self) {
        for ch in &mut self.channels {
            for lr in [&mut ch.lp1, &mut ch.hp1, &mut ch.lp2, &mut ch.hp2] {
                lr.stages.iter_mut().for_each(Biquad::reset);
            }
            ch.ap2.reset();
        }
    }

    /// Split one sample of `channel` into `bands[..num_bands]`, lowest band first.
    #[inline]
    pub fn split_sample(&mut self, channel: usize, x: f32, bands: &mut [f32; MAX_BANDS]) {
        let ch = &mut self.channels[channel];

        let low = ch.lp1.tick(x);
        let upper = ch.hp1.tick(x);

        if self.num_bands == 2 {
            bands[0] = low;
            bands[1] = upper;
            bands[2] = 0.0;
        } else {
            bands[0] = ch.ap2.process_sample(low);
            bands[1] = ch.lp2.tick(upper);
            bands[2] = ch.hp2.tick(upper);
        }
    }

    /// Split a block of `channel` into one output slice per band.
    ///
    /// Processes `min(input.len(), band lengths)` samples.
    pub fn split(&mut self, channel: usize, input: &[f32], bands: &mut [&mut [f32]]) {
        debug_assert!(bands.len() >= self.num_bands);

        let len = bands[..self.num_bands]
            .iter()
            .map(|b| b.len())
            .fold(input.len(), usize::min);

        let mut frame = [0.0f32; MAX_BANDS];
        for (i, &x) in input[..len].iter().enumerate() {
            self.split_sample(channel, x, &mut frame);
            for (band, value) in bands[..self.num_bands].iter_mut().zip(frame) {
                band[i] = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SR: f64 = 48000.0;

    fn sine(freq: f64, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / SR).sin() as f32)
            .collect()
    }

    fn rms(samples: &[f32]) -> f64 {
        let sum: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
        (sum / samples.len() as f64).sqrt()
    }

    fn split_all(xover: &mut Crossover, input: &[f32]) -> Vec<Vec<f32>> {
        let mut bands = vec![vec![0.0f32; input.len()]; xover.num_bands()];
        let mut refs: Vec<&mut [f32]> = bands.iter_mut().map(|b| b.as_mut_slice()).collect();
        xover.split(0, input, &mut refs);
        bands
    }

    #[test]
    fn test_three_band_sum_is_flat() {
        let mut xover = Crossover::three_band(120.0, 2000.0);
        xover.prepare(SR, 1);

        // Window of 4800 samples is a whole number of periods for every test tone.
        for freq in [50.0, 120.0, 500.0, 1000.0, 2000.0, 6000.0] {
            xover.reset();
            let input = sine(freq, 48000);
            let bands = split_all(&mut xover, &input);

            let sum: Vec<f32> = (0..input.len())
                .map(|i| bands.iter().map(|b| b[i]).sum())
                .collect();

            let tail = input.len() - 4800;
            let ratio = rms(&sum[tail..]) / rms(&input[tail..]);
            assert_relative_eq!(ratio, 1.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_two_band_sum_is_flat() {
        let mut xover = Crossover::two_band(1000.0);
        xover.prepare(SR, 1);

        for freq in [100.0, 1000.0, 8000.0] {
            xover.reset();
            let input = sine(freq, 24000);
            let bands = split_all(&mut xover, &input);
            let sum: Vec<f32> = (0..input.len()).map(|i| bands[0][i] + bands[1][i]).collect();

            let tail = input.len() - 4800;
            assert_relative_eq!(rms(&sum[tail..]) / rms(&input[tail..]), 1.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_bands_separate_frequencies() {
        let mut xover = Crossover::three_band(120.0, 2000.0);
        xover.prepare(SR, 1);

        let input = sine(6000.0, 48000);
        let bands = split_all(&mut xover, &input);
        let tail = 48000 - 4800;

        assert!(rms(&bands[2][tail..]) > 0.69);
        assert!(rms(&bands[0][tail..]) < 1e-3);
        assert!(rms(&bands[1][tail..]) < 0.05);
    }

    #[test]
    fn test_dc_goes_to_low_band() {
        let mut xover = Crossover::three_band(120.0, 2000.0);
        xover.prepare(SR, 1);

        let bands = split_all(&mut xover, &vec![0.5f32; 48000]);
        assert_relative_eq!(bands[0][47999], 0.5, epsilon = 1e-4);
        assert!(bands[1][47999].abs() < 1e-4);
        assert!(bands[2][47999].abs() < 1e-4);
    }

    #[test]
    fn test_state_continuous_across_blocks() {
        let input = sine(440.0, 1024);

        let mut whole = Crossover::three_band(120.0, 2000.0);
        whole.prepare(SR, 1);
        let expected = split_all(&mut whole, &input);

        let mut chunked = Crossover::three_band(120.0, 2000.0);
        chunked.prepare(SR, 1);
        let first = split_all(&mut chunked, &input[..512]);
        let second = split_all(&mut chunked, &input[512..]);

        for band in 0..3 {
            let joined: Vec<f32> = first[band].iter().chain(&second[band]).copied().collect();
            assert_eq!(joined, expected[band]);
        }
    }

    #[test]
    fn test_channels_are_independent() {
        let mut xover = Crossover::three_band(120.0, 2000.0);
        xover.prepare(SR, 2);

        let mut frame = [0.0f32; MAX_BANDS];
        for _ in 0..1000 {
            xover.split_sample(0, 0.8, &mut frame);
            xover.split_sample(1, 0.0, &mut frame);
        }
        assert_eq!(frame, [0.0; MAX_BANDS]);
    }

    #[test]
    fn test_prepare_resets_state() {
        let mut xover = Crossover::three_band(120.0, 2000.0);
        xover.prepare(SR, 1);
        let mut frame = [0.0f32; MAX_BANDS];
        for _ in 0..100 {
            xover.split_sample(0, 1.0, &mut frame);
        }

        xover.prepare(44100.0, 2);
        assert_eq!(xover.num_channels(), 2);
        assert_eq!(xover.sample_rate(), 44100.0);
        xover.split_sample(0, 0.0, &mut frame);
        assert_eq!(frame, [0.0; MAX_BANDS]);
    }

    #[test]
    fn test_three_band_orders_frequencies() {
        let xover = Crossover::three_band(2000.0, 120.0);
        assert_eq!(xover.frequencies(), &[120.0, 2000.0]);
        assert_eq!(Crossover::two_band(500.0).frequencies(), &[500.0]);
    }
}
