//! Parameter ranges for host automation and GUI controls.
//!
//! Hosts usually talk in normalized (0.0-1.0) values while the processing code
//! works with real units (dB, on/off). [`ParameterRange`] converts between the two
//! and clamps anything out of range.
//!
//! # Example
//!
//! ```
//! use phat_core::ParameterRange;
//!
//! let gain = ParameterRange::linear(-12.0, 12.0, 0.0);
//! assert_eq!(gain.denormalize(0.5), 0.0);
//! assert_eq!(gain.clamp(30.0), 12.0);
//! ```

use serde::{Deserialize, Serialize};

/// How a parameter value is scaled between normalized (0-1) and real values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParameterScale {
    /// `real = min + normalized * (max - min)`
    #[default]
    Linear,

    /// On/off toggle (normalized < 0.5 = off, >= 0.5 = on).
    ///
    /// Denormalizes to `min` (off) or `max` (on).
    Toggle,
}

/// Valid range, default and scaling of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub scale: ParameterScale,
}

impl ParameterRange {
    /// `default` is clamped into `[min, max]`.
    pub fn new(min: f32, max: f32, default: f32, scale: ParameterScale) -> Self {
        debug_assert!(max > min, "max must be greater than min");

        Self {
            min,
            max,
            default: default.clamp(min, max),
            scale,
        }
    }

    pub fn linear(min: f32, max: f32, default: f32) -> Self {
        Self::new(min, max, default, ParameterScale::Linear)
    }

    pub fn toggle(default_on: bool) -> Self {
        Self::new(
            0.0,
            1.0,
            if default_on { 1.0 } else { 0.0 },
            ParameterScale::Toggle,
        )
    }

    /// Clamp a real value into range. NaN falls back to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        match self.scale {
            ParameterScale::Linear => value.clamp(self.min, self.max),
            ParameterScale::Toggle => {
                if value >= (self.min + self.max) / 2.0 {
                    self.max
                } else {
                    self.min
                }
            }
        }
    }

    /// Convert a real value to normalized (0.0-1.0).
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range <= 0.0 {
            return 0.0;
        }
        (self.clamp(value) - self.min) / range
    }

    /// Convert a normalized value (0.0-1.0) to a real value.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let normalized = if normalized.is_nan() {
            self.normalize(self.default)
        } else {
            normalized.clamp(0.0, 1.0)
        };
        self.clamp(self.min + normalized * (self.max - self.min))
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for ParameterRange {
    fn default() -> Self {
        Self::linear(0.0, 1.0, 0.5)
    }
}
