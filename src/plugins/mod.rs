//! The shipped plugin variants.
//!
//! Each variant is a thin wrapper around a [`ChannelPipeline`](crate::ChannelPipeline)
//! built from named tuning constants. [`create`] resolves a variant by its
//! identifier, the way a host adapter registers them.

/// Forward [`AudioProcessor`] to the wrapped `pipeline` field, plus the
/// `Default`/`Deref` glue every variant shares.
macro_rules! delegate_processor {
    ($ty:ty) => {
        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::ops::Deref for $ty {
            type Target = $crate::ChannelPipeline;

            fn deref(&self) -> &Self::Target {
                &self.pipeline
            }
        }

        impl std::ops::DerefMut for $ty {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.pipeline
            }
        }

        impl $crate::AudioProcessor for $ty {
            fn name(&self) -> &str {
                self.pipeline.name()
            }

            fn prepare(&mut self, spec: phat_core::ProcessSpec) {
                self.pipeline.prepare(spec);
            }

            fn release(&mut self) {
                self.pipeline.release();
            }

            fn is_prepared(&self) -> bool {
                self.pipeline.is_prepared()
            }

            fn process(&mut self, block: &mut phat_core::AudioBlock<'_, '_>) {
                self.pipeline.process(block);
            }

            fn parameters(&self) -> &phat_core::Arc<phat_core::ParameterSet> {
                self.pipeline.parameters()
            }
        }
    };
}

pub(crate) use delegate_processor;

mod gain_limiter;
mod peak_filter;
mod phat_bass;

pub use gain_limiter::GainLimiter;
pub use peak_filter::PeakFilter;
pub use phat_bass::PhatBass;

pub mod constants {
    //! Tuning constants of the shipped variants.
    pub use super::gain_limiter::{
        LIMITER_ATTACK_SECONDS, LIMITER_CEILING_DB, LIMITER_GAIN_RANGE_DB,
        LIMITER_RELEASE_SECONDS, LIMITER_SUSTAIN_LEVEL, LIMITER_THRESHOLD_DB,
    };
    pub use super::peak_filter::{PEAK_FREQUENCY_HZ, PEAK_GAIN, PEAK_GAIN_RANGE_DB, PEAK_Q};
    pub use super::phat_bass::{
        BAND_TRIMS, BASS_ENVELOPE_ATTACK_SECONDS, BASS_ENVELOPE_RELEASE_SECONDS,
        BASS_GAIN_RANGE_DB, HIGH_CROSSOVER_HZ, LOW_CROSSOVER_HZ,
    };
}

use crate::{AudioProcessor, Error, Result};

/// Identifiers accepted by [`create`].
pub const PLUGIN_IDS: [&str; 3] = [GainLimiter::ID, PhatBass::ID, PeakFilter::ID];

/// Instantiate a plugin variant by identifier.
pub fn create(id: &str) -> Result<Box<dyn AudioProcessor>> {
    match id {
        GainLimiter::ID => Ok(Box::new(GainLimiter::new())),
        PhatBass::ID => Ok(Box::new(PhatBass::new())),
        PeakFilter::ID => Ok(Box::new(PeakFilter::new())),
        _ => {
            tracing::warn!(id, "Unknown plugin");
            Err(Error::UnknownPlugin(id.to_string()))
        }
    }
}
