//! Processing configuration handed over by the host on `prepare`.

use crate::{Error, Result};

/// Lowest sample rate accepted without sanitizing.
pub const MIN_SAMPLE_RATE: f64 = 8000.0;

/// Highest sample rate accepted without sanitizing.
pub const MAX_SAMPLE_RATE: f64 = 384000.0;

/// Upper bound on channels per session.
pub const MAX_CHANNELS: usize = 32;

const DEFAULT_BLOCK_SIZE: usize = 512;

/// Sample rate, maximum block size and channel count for one processing session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    pub sample_rate: f64,
    pub max_block_size: usize,
    pub num_channels: usize,
}

impl Default for ProcessSpec {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            max_block_size: DEFAULT_BLOCK_SIZE,
            num_channels: 2,
        }
    }
}

impl ProcessSpec {
    pub fn new(sample_rate: f64, max_block_size: usize, num_channels: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
            num_channels,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range ({}-{} Hz)",
                self.sample_rate, MIN_SAMPLE_RATE, MAX_SAMPLE_RATE
            )));
        }
        if self.max_block_size == 0 {
            return Err(Error::InvalidConfig("max_block_size must be > 0".into()));
        }
        if self.num_channels == 0 || self.num_channels > MAX_CHANNELS {
            return Err(Error::InvalidConfig(format!(
                "num_channels {} out of range (1-{})",
                self.num_channels, MAX_CHANNELS
            )));
        }
        Ok(())
    }

    /// Clamp every field into its valid range.
    ///
    /// A NaN sample rate maps to the default rate.
    pub fn sanitized(&self) -> Self {
        let sample_rate = if self.sample_rate.is_nan() {
            Self::default().sample_rate
        } else {
            self.sample_rate.clamp(MIN_SAMPLE_RATE, MAX_SAMPLE_RATE)
        };

        Self {
            sample_rate,
            max_block_size: self.max_block_size.max(1),
            num_channels: self.num_channels.clamp(1, MAX_CHANNELS),
        }
    }
}
