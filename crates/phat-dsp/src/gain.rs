//! Static gain stage.

use phat_core::AudioBlock;

use crate::utils::db_to_amplitude;

/// Scales samples by a gain given in decibels.
///
/// The linear factor is cached and only recomputed when the dB value changes, so
/// calling [`set_gain_db`](GainStage::set_gain_db) once per block with an unchanged
/// parameter costs a comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainStage {
    gain_db: f32,
    gain: f32,
}

impl Default for GainStage {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl GainStage {
    pub fn new(gain_db: f32) -> Self {
        Self {
            gain_db,
            gain: Self::to_linear(gain_db),
        }
    }

    /// `10^(db/20)`, or exactly `0.0` at or below -100 dB.
    #[inline]
    pub fn to_linear(db: f32) -> f32 {
        db_to_amplitude(db)
    }

    #[inline]
    pub fn set_gain_db(&mut self, gain_db: f32) {
        if gain_db != self.gain_db {
            self.gain_db = gain_db;
            self.gain = Self::to_linear(gain_db);
        }
    }

    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    #[inline]
    pub fn is_unity(&self) -> bool {
        self.gain == 1.0
    }

    pub fn apply(&self, samples: &mut [f32]) {
        if self.is_unity() {
            return;
        }
        for sample in samples.iter_mut() {
            *sample *= self.gain;
        }
    }

    /// Set the gain and scale every channel of `block`.
    pub fn apply_to_buffer(&mut self, block: &mut AudioBlock<'_, '_>, gain_db: f32) {
        self.set_gain_db(gain_db);
        for channel in block.channels_mut() {
            self.apply(channel);
        }
    }
}
