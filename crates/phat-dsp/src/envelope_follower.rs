//! Peak envelope follower.

use crate::utils::{flush_denormal, time_to_coeff};

/// Sample rate assumed until [`EnvelopeFollower::set_sample_rate`] is called.
pub const DEFAULT_SR: f64 = 44100.0;

/// Tracks the amplitude of a signal with separate attack and release ballistics.
///
/// Each call to [`update`](EnvelopeFollower::update) rectifies the input and moves
/// the envelope toward it with the attack coefficient when the level rises, or the
/// release coefficient when it falls. Coefficients are computed once per sample-rate
/// or time-constant change, never in the per-sample path.
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    attack_time: f32,
    release_time: f32,
    sample_rate: f64,
    attack_coeff: f32,
    release_coeff: f32,
    envelope: f32,
}

impl EnvelopeFollower {
    /// Times are in seconds.
    pub fn new(attack_time: f32, release_time: f32) -> Self {
        let attack_time = attack_time.max(0.0);
        let release_time = release_time.max(0.0);
        Self {
            attack_time,
            release_time,
            sample_rate: DEFAULT_SR,
            attack_coeff: time_to_coeff(attack_time, DEFAULT_SR),
            release_coeff: time_to_coeff(release_time, DEFAULT_SR),
            envelope: 0.0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.attack_coeff = time_to_coeff(self.attack_time, sample_rate);
        self.release_coeff = time_to_coeff(self.release_time, sample_rate);
    }

    pub fn set_attack_time(&mut self, seconds: f32) {
        self.attack_time = seconds.max(0.0);
        self.attack_coeff = time_to_coeff(self.attack_time, self.sample_rate);
    }

    pub fn set_release_time(&mut self, seconds: f32) {
        self.release_time = seconds.max(0.0);
        self.release_coeff = time_to_coeff(self.release_time, self.sample_rate);
    }

    pub fn attack_time(&self) -> f32 {
        self.attack_time
    }

    pub fn release_time(&self) -> f32 {
        self.release_time
    }

    pub fn current_envelope(&self) -> f32 {
        self.envelope
    }

    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }

    /// Feed one sample and return the new envelope level.
    #[inline]
    pub fn update(&mut self, input: f32) -> f32 {
        let level = input.abs();
        // Non-finite input must not poison the state.
        if !level.is_finite() {
            return self.envelope;
        }

        let coeff = if level > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };

        self.envelope = flush_denormal(coeff * self.envelope + (1.0 - coeff) * level);
        self.envelope
    }
}
