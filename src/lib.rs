//! # Phat - Real-time Dynamics Plugins
//!
//! Small audio-effect processors built from a reusable signal-processing kernel.
//!
//! ## Architecture
//!
//! Phat is an umbrella crate that coordinates:
//! - **phat-core** - Runtime primitives (lock-free parameters, process spec, audio block, state snapshots)
//! - **phat-dsp** - DSP kernel (envelope follower, dynamics, Linkwitz-Riley crossover, biquads, gain)
//!
//! On top of those it provides the per-block [`ChannelPipeline`], the
//! [`AudioProcessor`] capability trait a host adapter drives, and three plugin
//! variants: [`GainLimiter`], [`PhatBass`] and [`PeakFilter`].
//!
//! ## Quick Start
//!
//! ```
//! use phat::prelude::*;
//!
//! let mut bass = PhatBass::new();
//! bass.prepare(ProcessSpec::new(48000.0, 512, 2));
//! bass.set_parameter("gain", -3.0)?;
//!
//! let mut left = vec![0.25f32; 512];
//! let mut right = vec![0.0f32; 512];
//! let mut channels = [left.as_mut_slice(), right.as_mut_slice()];
//! bass.process(&mut AudioBlock::new(&mut channels));
//!
//! assert!(right.iter().all(|&s| s == 0.0));
//! # Ok::<(), phat::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `state` (default) - JSON parameter persistence via `save_state`/`load_state`

/// Re-export of phat-core for direct access
pub use phat_core as core;

/// Re-export of phat-dsp for direct access
pub use phat_dsp as dsp;

pub use phat_core::{
    Arc, AudioBlock, ParamId, ParamSpec, ParameterRange, ParameterScale, ParameterSet,
    ParameterSnapshot, ProcessSpec, MAX_CHANNELS, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE,
    STATE_VERSION,
};

pub use phat_dsp::{DynamicsMode, DynamicsProcessorBuilder, FilterType};

mod builder;
mod error;
mod pipeline;
pub mod plugins;
mod processor;

pub use builder::PipelineBuilder;
pub use error::{Error, Result};
pub use pipeline::{BandConfig, ChannelPipeline, FilterConfig, BYPASS_PARAM, GAIN_PARAM};
pub use plugins::{GainLimiter, PeakFilter, PhatBass};
pub use processor::AudioProcessor;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{
        AudioBlock, AudioProcessor, BandConfig, ChannelPipeline, DynamicsMode,
        DynamicsProcessorBuilder, GainLimiter, PeakFilter, PhatBass, PipelineBuilder,
        ProcessSpec,
    };
}
