//! Second-order IIR sections with coefficients from the RBJ Audio EQ Cookbook,
//! run by `fundsp`'s biquad node.
//!
//! Coefficients and state are kept in `f64`: low cutoffs (a 100 Hz bell at
//! 192 kHz) put the poles very close to the unit circle, where `f32` state
//! drifts audibly.

use std::f64::consts::PI;
use std::fmt;

use fundsp::audionode::AudioNode;
use fundsp::biquad::{Biquad as BiquadNode, BiquadCoefs};

use crate::utils::sanitize;

/// Upper bound on a cutoff, as a fraction of the sample rate.
const MAX_FREQ_RATIO: f64 = 0.49;

/// Cookbook filter shapes used by the plugins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterType {
    Lowpass,
    Highpass,
    Allpass,
    /// Bell with a linear gain factor at the centre frequency.
    Peaking { gain: f64 },
}

/// Normalized biquad coefficients (`a0 == 1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Default for BiquadCoeffs {
    fn default() -> Self {
        Self::identity()
    }
}

impl BiquadCoeffs {
    pub const fn identity() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }

    /// Compute coefficients for `filter_type` at `freq` Hz.
    ///
    /// The frequency is clamped below Nyquist and `q` to a small positive value,
    /// so any host-supplied sample rate yields a stable filter.
    pub fn new(filter_type: FilterType, sample_rate: f64, freq: f64, q: f64) -> Self {
        let sample_rate = sample_rate.max(1.0);
        let freq = freq.clamp(1e-3, sample_rate * MAX_FREQ_RATIO);
        let q = q.max(1e-3);

        let w0 = 2.0 * PI * freq / sample_rate;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * q);

        let (b0, b1, b2, a0, a1, a2) = match filter_type {
            FilterType::Lowpass => {
                let b1 = 1.0 - cos_w0;
                (b1 / 2.0, b1, b1 / 2.0, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
            }
            FilterType::Highpass => {
                let b0 = (1.0 + cos_w0) / 2.0;
                (b0, -(1.0 + cos_w0), b0, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
            }
            FilterType::Allpass => (
                1.0 - alpha,
                -2.0 * cos_w0,
                1.0 + alpha,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            FilterType::Peaking { gain } => {
                let a = gain.max(1e-6).sqrt();
                (
                    1.0 + alpha * a,
                    -2.0 * cos_w0,
                    1.0 - alpha * a,
                    1.0 + alpha / a,
                    -2.0 * cos_w0,
                    1.0 - alpha / a,
                )
            }
        };

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    pub fn lowpass(sample_rate: f64, freq: f64, q: f64) -> Self {
        Self::new(FilterType::Lowpass, sample_rate, freq, q)
    }

    pub fn highpass(sample_rate: f64, freq: f64, q: f64) -> Self {
        Self::new(FilterType::Highpass, sample_rate, freq, q)
    }

    pub fn allpass(sample_rate: f64, freq: f64, q: f64) -> Self {
        Self::new(FilterType::Allpass, sample_rate, freq, q)
    }

    pub fn peaking(sample_rate: f64, freq: f64, q: f64, gain: f64) -> Self {
        Self::new(FilterType::Peaking { gain }, sample_rate, freq, q)
    }

    /// Magnitude response at `freq` Hz.
    pub fn magnitude(&self, freq: f64, sample_rate: f64) -> f64 {
        let w = 2.0 * PI * freq / sample_rate;
        let (c1, s1) = (w.cos(), w.sin());
        let (c2, s2) = ((2.0 * w).cos(), (2.0 * w).sin());

        let num_re = self.b0 + self.b1 * c1 + self.b2 * c2;
        let num_im = -(self.b1 * s1 + self.b2 * s2);
        let den_re = 1.0 + self.a1 * c1 + self.a2 * c2;
        let den_im = -(self.a1 * s1 + self.a2 * s2);

        ((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im)).sqrt()
    }

    fn to_node_coefs(self) -> BiquadCoefs<f64> {
        BiquadCoefs::arbitrary(self.b0, self.b1, self.b2, self.a1, self.a2)
    }
}

/// One biquad section on a single channel.
#[derive(Clone)]
pub struct Biquad {
    coeffs: BiquadCoeffs,
    node: BiquadNode<f64>,
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new(BiquadCoeffs::identity())
    }
}

impl fmt::Debug for Biquad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Biquad").field("coeffs", &self.coeffs).finish()
    }
}

impl Biquad {
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            node: BiquadNode::with_coefs(coeffs.to_node_coefs()),
        }
    }

    pub fn coeffs(&self) -> &BiquadCoeffs {
        &self.coeffs
    }

    pub fn reset(&mut self) {
        self.node.reset();
    }

    /// Filter one sample. A non-finite result clears the section state.
    #[inline]
    pub fn process_sample(&mut self, x: f32) -> f32 {
        let y = self.node.filter_mono(x);
        if y.is_finite() {
            y
        } else {
            self.node.reset();
            sanitize(y)
        }
    }

    pub fn process(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }
}
