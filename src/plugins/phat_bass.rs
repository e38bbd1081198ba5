//! Three-band bass compressor.

use phat_dsp::{DynamicsMode, DynamicsProcessorBuilder};

use crate::{BandConfig, ChannelPipeline, PipelineBuilder};

/// Split between the low and mid bands.
pub const LOW_CROSSOVER_HZ: f32 = 120.0;
/// Split between the mid and high bands.
pub const HIGH_CROSSOVER_HZ: f32 = 2000.0;

pub const BASS_ENVELOPE_ATTACK_SECONDS: f32 = 0.020;
pub const BASS_ENVELOPE_RELEASE_SECONDS: f32 = 0.200;

/// Mix factors of the low, mid and high band.
pub const BAND_TRIMS: [f32; 3] = [0.18, 0.59, 0.70];

/// `(min, max)` of the gain parameter in dB; the default is 0 dB.
pub const BASS_GAIN_RANGE_DB: (f32, f32) = (-60.0, 24.0);

/// Multiband compressor: Linkwitz-Riley split at 120 Hz and 2 kHz, one
/// `1 / (1 + envelope)` compressor per band, trimmed and summed.
#[derive(Debug)]
pub struct PhatBass {
    pipeline: ChannelPipeline,
}

impl PhatBass {
    pub const ID: &'static str = "phat-bass";

    pub fn new() -> Self {
        let bands = BAND_TRIMS
            .iter()
            .map(|&trim| {
                BandConfig::new(DynamicsProcessorBuilder::default().mode(DynamicsMode::Simple))
                    .envelope(BASS_ENVELOPE_ATTACK_SECONDS, BASS_ENVELOPE_RELEASE_SECONDS)
                    .trim(trim)
            })
            .collect();

        let (min, max) = BASS_GAIN_RANGE_DB;
        let pipeline = PipelineBuilder::new(Self::ID)
            .gain_range_db(min, max, 0.0)
            .multiband(&[LOW_CROSSOVER_HZ, HIGH_CROSSOVER_HZ], bands)
            .build_unchecked();

        Self { pipeline }
    }
}

super::delegate_processor!(PhatBass);
