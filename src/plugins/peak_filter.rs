//! Low-frequency peaking filter.

use phat_dsp::FilterType;

use crate::{ChannelPipeline, PipelineBuilder};

pub const PEAK_FREQUENCY_HZ: f64 = 100.0;
pub const PEAK_Q: f64 = 0.5;

/// Linear gain at the peak (about +9.54 dB).
pub const PEAK_GAIN: f64 = 3.0;

/// `(min, max)` of the gain parameter in dB; the default is 0 dB.
pub const PEAK_GAIN_RANGE_DB: (f32, f32) = (-12.0, 12.0);

/// A wide bell boost at 100 Hz followed by the output gain. No dynamics.
#[derive(Debug)]
pub struct PeakFilter {
    pipeline: ChannelPipeline,
}

impl PeakFilter {
    pub const ID: &'static str = "peak-filter";

    pub fn new() -> Self {
        let (min, max) = PEAK_GAIN_RANGE_DB;
        let pipeline = PipelineBuilder::new(Self::ID)
            .gain_range_db(min, max, 0.0)
            .filter(FilterType::Peaking { gain: PEAK_GAIN }, PEAK_FREQUENCY_HZ, PEAK_Q)
            .build_unchecked();

        Self { pipeline }
    }
}

super::delegate_processor!(PeakFilter);
