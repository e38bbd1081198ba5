//! Single-band limiter followed by an output gain.

use phat_dsp::{DynamicsMode, DynamicsProcessorBuilder};

use crate::{BandConfig, ChannelPipeline, PipelineBuilder};

pub const LIMITER_ATTACK_SECONDS: f32 = 0.011;
pub const LIMITER_RELEASE_SECONDS: f32 = 0.050;

/// Fraction of the envelope-derived reduction held while the limiter releases.
pub const LIMITER_SUSTAIN_LEVEL: f32 = 0.29;

/// Level in dBFS above which the limiter engages.
pub const LIMITER_THRESHOLD_DB: f32 = -12.0;

/// Deepest gain the limiter may apply, in dB.
pub const LIMITER_CEILING_DB: f32 = -20.0;

/// `(min, max)` of the gain parameter in dB; the default is 0 dB.
pub const LIMITER_GAIN_RANGE_DB: (f32, f32) = (-12.0, 12.0);

/// Brickwall-style limiter with a sustained release.
///
/// Peaks above [`LIMITER_THRESHOLD_DB`] are pulled toward the threshold with an
/// 11 ms attack; afterwards the gain eases back with a 50 ms release while
/// holding [`LIMITER_SUSTAIN_LEVEL`] of the reduction the envelope still asks for.
#[derive(Debug)]
pub struct GainLimiter {
    pipeline: ChannelPipeline,
}

impl GainLimiter {
    pub const ID: &'static str = "gain-limiter";

    pub fn new() -> Self {
        let dynamics = DynamicsProcessorBuilder::default()
            .mode(DynamicsMode::Limiter)
            .threshold_db(LIMITER_THRESHOLD_DB)
            .ceiling_db(LIMITER_CEILING_DB)
            .sustain_level(LIMITER_SUSTAIN_LEVEL)
            .attack_seconds(LIMITER_ATTACK_SECONDS)
            .release_seconds(LIMITER_RELEASE_SECONDS);

        let band = BandConfig::new(dynamics)
            .envelope(LIMITER_ATTACK_SECONDS, LIMITER_RELEASE_SECONDS);

        let (min, max) = LIMITER_GAIN_RANGE_DB;
        let pipeline = PipelineBuilder::new(Self::ID)
            .gain_range_db(min, max, 0.0)
            .full_band(band)
            .build_unchecked();

        Self { pipeline }
    }
}

super::delegate_processor!(GainLimiter);
