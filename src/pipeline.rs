//! Per-block processing chain shared by every plugin variant.
//!
//! A [`ChannelPipeline`] is assembled once by a [`PipelineBuilder`](crate::PipelineBuilder)
//! and then driven by the host:
//!
//! ```text
//!            ┌────────────┐   ┌──────────────────────────────┐   ┌──────┐
//! input ───► │ pre-filter │──►│ crossover ─► band dynamics ─┐│──►│ gain │──► output
//!            │ (optional) │   │            Σ trim × band ◄──┘│   └──────┘
//!            └────────────┘   └──────────────────────────────┘
//! ```
//!
//! The dynamics section is either absent, a single full-band
//! envelope/dynamics pair, or a multiband split with one pair per band.

use phat_core::{Arc, AudioBlock, ParamId, ParameterSet, ProcessSpec};
use phat_dsp::{
    sanitize, Biquad, BiquadCoeffs, Crossover, DynamicsProcessor, DynamicsProcessorBuilder,
    EnvelopeFollower, FilterType, GainStage, MAX_BANDS,
};
use tracing::{debug, info, warn};

use crate::{AudioProcessor, Result};

/// Id of the output gain parameter (dB).
pub const GAIN_PARAM: &str = "gain";

/// Id of the bypass toggle.
pub const BYPASS_PARAM: &str = "bypass";

const DEFAULT_ATTACK_SECONDS: f32 = 0.01;
const DEFAULT_RELEASE_SECONDS: f32 = 0.1;

/// Envelope ballistics, dynamics policy and mix trim of one band.
#[derive(Debug, Clone)]
pub struct BandConfig {
    pub attack_seconds: f32,
    pub release_seconds: f32,
    /// Static factor applied to the band before summation.
    pub trim: f32,
    pub dynamics: DynamicsProcessorBuilder,
}

impl BandConfig {
    pub fn new(dynamics: DynamicsProcessorBuilder) -> Self {
        Self {
            attack_seconds: DEFAULT_ATTACK_SECONDS,
            release_seconds: DEFAULT_RELEASE_SECONDS,
            trim: 1.0,
            dynamics,
        }
    }

    /// Envelope follower attack and release, in seconds.
    pub fn envelope(mut self, attack_seconds: f32, release_seconds: f32) -> Self {
        self.attack_seconds = attack_seconds;
        self.release_seconds = release_seconds;
        self
    }

    pub fn trim(mut self, trim: f32) -> Self {
        self.trim = trim;
        self
    }
}

/// A fixed biquad run on every channel ahead of the dynamics section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    pub filter_type: FilterType,
    pub frequency: f64,
    pub q: f64,
}

#[derive(Debug, Clone)]
pub(crate) enum DynamicsLayout {
    None,
    FullBand(BandConfig),
    Multiband {
        frequencies: Vec<f32>,
        bands: Vec<BandConfig>,
    },
}

impl DynamicsLayout {
    fn bands(&self) -> &[BandConfig] {
        match self {
            DynamicsLayout::None => &[],
            DynamicsLayout::FullBand(band) => std::slice::from_ref(band),
            DynamicsLayout::Multiband { bands, .. } => bands,
        }
    }
}

/// Static description of the chain, validated by the builder.
#[derive(Debug, Clone)]
pub(crate) struct Layout {
    pub filter: Option<FilterConfig>,
    pub dynamics: DynamicsLayout,
}

/// Envelope follower and dynamics processor of one band on one channel.
#[derive(Debug, Clone)]
struct BandProcessor {
    follower: EnvelopeFollower,
    dynamics: DynamicsProcessor,
    trim: f32,
}

impl BandProcessor {
    fn new(config: &BandConfig, sample_rate: f64) -> Self {
        let mut follower = EnvelopeFollower::new(config.attack_seconds, config.release_seconds);
        follower.set_sample_rate(sample_rate);

        let mut dynamics = config.dynamics.clone().build();
        dynamics.set_sample_rate(sample_rate);

        Self {
            follower,
            dynamics,
            trim: config.trim,
        }
    }

    #[inline]
    fn tick(&mut self, x: f32) -> f32 {
        let envelope = self.follower.update(x);
        self.trim * self.dynamics.update(x, envelope)
    }
}

/// Everything allocated by `prepare`.
#[derive(Debug)]
struct Prepared {
    spec: ProcessSpec,
    /// One per channel, empty without a pre-filter.
    filters: Vec<Biquad>,
    crossover: Option<Crossover>,
    /// `num_channels * bands_per_channel`, channel-major.
    bands: Vec<BandProcessor>,
    bands_per_channel: usize,
    gain: GainStage,
}

impl Prepared {
    fn new(layout: &Layout, spec: ProcessSpec) -> Self {
        let sample_rate = spec.sample_rate;
        let channels = spec.num_channels;

        let filters = match layout.filter {
            Some(f) => {
                let coeffs = BiquadCoeffs::new(f.filter_type, sample_rate, f.frequency, f.q);
                vec![Biquad::new(coeffs); channels]
            }
            None => Vec::new(),
        };

        let crossover = match &layout.dynamics {
            DynamicsLayout::Multiband { frequencies, .. } => {
                let mut crossover = match frequencies.as_slice() {
                    [f] => Crossover::two_band(*f),
                    [low, high, ..] => Crossover::three_band(*low, *high),
                    [] => Crossover::two_band(0.0),
                };
                crossover.prepare(sample_rate, channels);
                Some(crossover)
            }
            _ => None,
        };

        let band_configs = layout.dynamics.bands();
        let bands = (0..channels)
            .flat_map(|_| band_configs.iter())
            .map(|config| BandProcessor::new(config, sample_rate))
            .collect();

        Self {
            spec,
            filters,
            crossover,
            bands,
            bands_per_channel: band_configs.len(),
            gain: GainStage::default(),
        }
    }

    fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
        if let Some(crossover) = &mut self.crossover {
            crossover.reset();
        }
        for band in &mut self.bands {
            band.follower.reset();
            band.dynamics.reset();
        }
    }

    /// Filter and dynamics for one channel. Input samples are sanitized first so a
    /// stray NaN cannot poison the recursive filter state.
    fn process_channel(&mut self, channel: usize, samples: &mut [f32]) {
        let n = self.bands_per_channel;
        let bands = &mut self.bands[channel * n..(channel + 1) * n];
        let mut filter = self.filters.get_mut(channel);
        let mut split = [0.0f32; MAX_BANDS];

        for sample in samples.iter_mut() {
            let mut x = sanitize(*sample);

            if let Some(filter) = filter.as_mut() {
                x = filter.process_sample(x);
            }

            if let Some(crossover) = self.crossover.as_mut() {
                crossover.split_sample(channel, x, &mut split);
                x = bands
                    .iter_mut()
                    .zip(split.iter())
                    .map(|(band, &v)| band.tick(v))
                    .sum();
            } else if let Some(band) = bands.first_mut() {
                x = band.tick(x);
            }

            *sample = x;
        }
    }
}

#[derive(Debug)]
enum PipelineState {
    Unprepared,
    Prepared(Box<Prepared>),
}

/// The per-block processing chain.
///
/// Starts Unprepared. [`prepare`](ChannelPipeline::prepare) allocates all filter,
/// envelope and dynamics state; [`release`](ChannelPipeline::release) drops it.
/// Parameters live in a shared [`ParameterSet`] and are sampled once at the top of
/// every block, so a whole block is always rendered with one consistent gain.
#[derive(Debug)]
pub struct ChannelPipeline {
    name: String,
    layout: Layout,
    params: Arc<ParameterSet>,
    gain_id: ParamId,
    bypass_id: ParamId,
    state: PipelineState,
}

impl ChannelPipeline {
    pub(crate) fn new(
        name: String,
        layout: Layout,
        params: Arc<ParameterSet>,
        gain_id: ParamId,
        bypass_id: ParamId,
    ) -> Self {
        Self {
            name,
            layout,
            params,
            gain_id,
            bypass_id,
            state: PipelineState::Unprepared,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prepare for `spec`, falling back to the sanitized spec if it is invalid.
    ///
    /// Idempotent: an identical spec keeps the running state. Anything else
    /// reinitializes every stateful component.
    pub fn prepare(&mut self, spec: ProcessSpec) {
        let spec = match spec.validate() {
            Ok(()) => spec,
            Err(e) => {
                let sanitized = spec.sanitized();
                warn!(
                    pipeline = %self.name,
                    error = %e,
                    sample_rate = sanitized.sample_rate,
                    max_block_size = sanitized.max_block_size,
                    num_channels = sanitized.num_channels,
                    "Invalid process spec, using sanitized values"
                );
                sanitized
            }
        };
        self.prepare_validated(spec);
    }

    /// Strict variant of [`prepare`](ChannelPipeline::prepare): an invalid spec is
    /// rejected and the current state is left untouched.
    pub fn try_prepare(&mut self, spec: ProcessSpec) -> Result<()> {
        spec.validate()?;
        self.prepare_validated(spec);
        Ok(())
    }

    fn prepare_validated(&mut self, spec: ProcessSpec) {
        if let PipelineState::Prepared(prepared) = &self.state {
            if prepared.spec == spec {
                debug!(pipeline = %self.name, "Already prepared with identical spec");
                return;
            }
        }

        info!(
            pipeline = %self.name,
            sample_rate = spec.sample_rate,
            max_block_size = spec.max_block_size,
            num_channels = spec.num_channels,
            "Preparing pipeline"
        );
        self.state = PipelineState::Prepared(Box::new(Prepared::new(&self.layout, spec)));
    }

    /// Drop all per-session state.
    pub fn release(&mut self) {
        if matches!(self.state, PipelineState::Prepared(_)) {
            info!(pipeline = %self.name, "Releasing pipeline");
        }
        self.state = PipelineState::Unprepared;
    }

    pub fn is_prepared(&self) -> bool {
        matches!(self.state, PipelineState::Prepared(_))
    }

    /// Spec of the current session, if prepared.
    pub fn spec(&self) -> Option<ProcessSpec> {
        match &self.state {
            PipelineState::Prepared(prepared) => Some(prepared.spec),
            PipelineState::Unprepared => None,
        }
    }

    /// Clear filter, envelope and gain-reduction state without reallocating.
    pub fn reset(&mut self) {
        if let PipelineState::Prepared(prepared) = &mut self.state {
            prepared.reset();
        }
    }

    pub fn parameters(&self) -> &Arc<ParameterSet> {
        &self.params
    }

    /// Number of dynamics bands per channel (0 without a dynamics section).
    pub fn num_bands(&self) -> usize {
        self.layout.dynamics.bands().len()
    }

    /// Current linear gain reduction of `band` on `channel`, for metering.
    pub fn gain_reduction(&self, channel: usize, band: usize) -> Option<f32> {
        let PipelineState::Prepared(prepared) = &self.state else {
            return None;
        };
        let n = prepared.bands_per_channel;
        if band >= n {
            return None;
        }
        prepared
            .bands
            .get(channel * n + band)
            .map(|b| b.dynamics.gain_reduction())
    }

    /// Transform one block in place.
    ///
    /// Must be called after [`prepare`](ChannelPipeline::prepare); an unprepared
    /// pipeline leaves the block untouched. Channels beyond the prepared count are
    /// silenced. Every output sample is finite: NaN becomes silence and infinities
    /// become `±`[`OUTPUT_LIMIT`](phat_dsp::utils::OUTPUT_LIMIT). Finite samples are
    /// never clipped.
    pub fn process(&mut self, block: &mut AudioBlock<'_, '_>) {
        debug_assert!(self.is_prepared(), "process called before prepare");
        let PipelineState::Prepared(prepared) = &mut self.state else {
            return;
        };

        let gain_db = self.params.value(self.gain_id);
        let bypass = self.params.value(self.bypass_id) >= 0.5;

        let active = block.num_channels().min(prepared.spec.num_channels);
        for channel in active..block.num_channels() {
            block.clear_channel(channel);
        }

        prepared.gain.set_gain_db(gain_db);

        for channel in 0..active {
            let samples = block.channel_mut(channel);
            if !bypass {
                prepared.process_channel(channel, samples);
                prepared.gain.apply(samples);
            }
            for sample in samples.iter_mut() {
                *sample = sanitize(*sample);
            }
        }
    }
}

impl AudioProcessor for ChannelPipeline {
    fn name(&self) -> &str {
        ChannelPipeline::name(self)
    }

    fn prepare(&mut self, spec: ProcessSpec) {
        ChannelPipeline::prepare(self, spec);
    }

    fn release(&mut self) {
        ChannelPipeline::release(self);
    }

    fn is_prepared(&self) -> bool {
        ChannelPipeline::is_prepared(self)
    }

    fn process(&mut self, block: &mut AudioBlock<'_, '_>) {
        ChannelPipeline::process(self, block);
    }

    fn parameters(&self) -> &Arc<ParameterSet> {
        ChannelPipeline::parameters(self)
    }
}
