//! Envelope-driven compressor/limiter.

use super::mode::{limiter_target, ratio_reduction_db, simple_gain, sustain_target, DynamicsMode};
use crate::envelope_follower::DEFAULT_SR;
use crate::utils::{amplitude_to_db, db_to_amplitude, flush_denormal, time_to_coeff};

/// Applies a gain-reduction policy to a sample given its envelope.
///
/// The last computed gain reduction is kept between calls (and blocks) so the
/// attack/release ballistics stay continuous. The applied factor is always clamped
/// into `[ceiling, 1.0]`: the processor never amplifies and never inverts.
#[derive(Debug, Clone)]
pub struct DynamicsProcessor {
    mode: DynamicsMode,
    threshold_db: f32,
    ratio: f32,
    knee_db: f32,
    ceiling_db: f32,
    sustain_level: f32,
    attack: f32,
    release: f32,

    threshold: f32,
    ceiling: f32,
    sample_rate: f64,
    attack_coeff: f32,
    release_coeff: f32,

    /// Linear factor applied to the last sample.
    gain_reduction: f32,
    /// Smoothed attenuation of the ratio mode, in dB.
    reduction_db: f32,
    /// Input peak held by the limiter, decaying at the release rate.
    peak: f32,
}

impl DynamicsProcessor {
    /// Prefer [`DynamicsProcessor::builder()`].
    pub fn new(mode: DynamicsMode, threshold_db: f32, ratio: f32, attack: f32, release: f32) -> Self {
        let mut processor = Self {
            mode,
            threshold_db,
            ratio: ratio.max(1.0),
            knee_db: 0.0,
            ceiling_db: DynamicsProcessorBuilder::DEFAULT_CEILING_DB,
            sustain_level: 0.0,
            attack: attack.max(0.0),
            release: release.max(0.0),
            threshold: 0.0,
            ceiling: 0.0,
            sample_rate: DEFAULT_SR,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            gain_reduction: 1.0,
            reduction_db: 0.0,
            peak: 0.0,
        };
        processor.update_levels();
        processor.set_sample_rate(DEFAULT_SR);
        processor
    }

    pub fn builder() -> DynamicsProcessorBuilder {
        DynamicsProcessorBuilder::default()
    }

    fn update_levels(&mut self) {
        self.threshold = db_to_amplitude(self.threshold_db);
        self.ceiling = db_to_amplitude(self.ceiling_db).min(1.0);
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.attack_coeff = time_to_coeff(self.attack, sample_rate);
        self.release_coeff = time_to_coeff(self.release, sample_rate);
    }

    pub fn reset(&mut self) {
        self.gain_reduction = 1.0;
        self.reduction_db = 0.0;
        self.peak = 0.0;
    }

    pub fn mode(&self) -> DynamicsMode {
        self.mode
    }

    pub fn set_threshold_db(&mut self, db: f32) {
        self.threshold_db = db;
        self.update_levels();
    }

    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio = ratio.max(1.0);
    }

    pub fn set_knee_db(&mut self, db: f32) {
        self.knee_db = db.max(0.0);
    }

    pub fn set_ceiling_db(&mut self, db: f32) {
        self.ceiling_db = db.min(0.0);
        self.update_levels();
    }

    pub fn set_sustain_level(&mut self, level: f32) {
        self.sustain_level = level.clamp(0.0, 1.0);
    }

    pub fn set_attack(&mut self, seconds: f32) {
        self.attack = seconds.max(0.0);
        self.attack_coeff = time_to_coeff(self.attack, self.sample_rate);
    }

    pub fn set_release(&mut self, seconds: f32) {
        self.release = seconds.max(0.0);
        self.release_coeff = time_to_coeff(self.release, self.sample_rate);
    }

    pub fn threshold_db(&self) -> f32 {
        self.threshold_db
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn ceiling_db(&self) -> f32 {
        self.ceiling_db
    }

    pub fn sustain_level(&self) -> f32 {
        self.sustain_level
    }

    /// Linear factor applied to the most recent sample (1.0 = no reduction).
    pub fn gain_reduction(&self) -> f32 {
        self.gain_reduction
    }

    pub fn gain_reduction_db(&self) -> f32 {
        -amplitude_to_db(self.gain_reduction)
    }

    #[inline]
    fn smooth(&self, current: f32, target: f32, coeff: f32) -> f32 {
        flush_denormal(coeff * current + (1.0 - coeff) * target)
    }

    /// Process one sample against its envelope level.
    #[inline]
    pub fn update(&mut self, input: f32, envelope: f32) -> f32 {
        let level = input.abs();
        if !level.is_finite() || !envelope.is_finite() {
            return input * self.gain_reduction;
        }

        let gain = match self.mode {
            DynamicsMode::Simple => simple_gain(envelope),
            DynamicsMode::Ratio => {
                let target_db = ratio_reduction_db(
                    amplitude_to_db(envelope),
                    self.threshold_db,
                    self.ratio,
                    self.knee_db,
                );
                let coeff = if target_db > self.reduction_db {
                    self.attack_coeff
                } else {
                    self.release_coeff
                };
                self.reduction_db = self.smooth(self.reduction_db, target_db, coeff);
                db_to_amplitude(-self.reduction_db)
            }
            DynamicsMode::Limiter => {
                // Held across zero crossings so a periodic signal stays in the attack branch.
                self.peak = flush_denormal(level.max(self.peak * self.release_coeff));
                if self.peak > self.threshold {
                    let target = limiter_target(self.peak, self.threshold, self.ceiling);
                    self.smooth(self.gain_reduction, target, self.attack_coeff)
                } else {
                    let target =
                        sustain_target(envelope, self.threshold, self.ceiling, self.sustain_level);
                    self.smooth(self.gain_reduction, target, self.release_coeff)
                }
            }
        };

        self.gain_reduction = gain.clamp(self.ceiling, 1.0);
        input * self.gain_reduction
    }
}

/// Builder for configuring a [`DynamicsProcessor`] with a fluent API.
#[derive(Clone, Debug)]
pub struct DynamicsProcessorBuilder {
    mode: DynamicsMode,
    threshold_db: f32,
    ratio: f32,
    attack_seconds: f32,
    release_seconds: f32,
    knee_db: f32,
    ceiling_db: f32,
    sustain_level: f32,
}

impl DynamicsProcessorBuilder {
    const DEFAULT_CEILING_DB: f32 = -60.0;
}

impl Default for DynamicsProcessorBuilder {
    fn default() -> Self {
        Self {
            mode: DynamicsMode::Ratio,
            threshold_db: -20.0,
            ratio: 4.0,
            attack_seconds: 0.005,
            release_seconds: 0.1,
            knee_db: 0.0,
            ceiling_db: Self::DEFAULT_CEILING_DB,
            sustain_level: 0.0,
        }
    }
}

impl DynamicsProcessorBuilder {
    pub fn mode(mut self, mode: DynamicsMode) -> Self {
        self.mode = mode;
        self
    }

    /// Threshold in dBFS (-60.0 to 0.0 typical)
    pub fn threshold_db(mut self, db: f32) -> Self {
        self.threshold_db = db;
        self
    }

    /// Compression ratio (must be >= 1.0). Ratio mode only.
    pub fn ratio(mut self, ratio: f32) -> Self {
        self.ratio = ratio.max(1.0);
        self
    }

    pub fn attack_seconds(mut self, seconds: f32) -> Self {
        self.attack_seconds = seconds.max(0.0);
        self
    }

    pub fn release_seconds(mut self, seconds: f32) -> Self {
        self.release_seconds = seconds.max(0.0);
        self
    }

    /// Soft knee width in dB (0.0 = hard knee). Ratio mode only.
    pub fn soft_knee_db(mut self, db: f32) -> Self {
        self.knee_db = db.max(0.0);
        self
    }

    /// Deepest permitted gain reduction, as a gain in dB (<= 0).
    pub fn ceiling_db(mut self, db: f32) -> Self {
        self.ceiling_db = db.min(0.0);
        self
    }

    /// Fraction (0..=1) of the envelope-derived reduction held while releasing. Limiter mode only.
    pub fn sustain_level(mut self, level: f32) -> Self {
        self.sustain_level = level.clamp(0.0, 1.0);
        self
    }

    pub fn build(self) -> DynamicsProcessor {
        let mut processor = DynamicsProcessor::new(
            self.mode,
            self.threshold_db,
            self.ratio,
            self.attack_seconds,
            self.release_seconds,
        );
        processor.set_knee_db(self.knee_db);
        processor.set_ceiling_db(self.ceiling_db);
        processor.set_sustain_level(self.sustain_level);
        processor
    }
}
