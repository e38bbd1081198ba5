//! Builder for configuring and constructing a `ChannelPipeline`.

use phat_core::{Arc, ParamId, ParamSpec, ParameterRange, ParameterScale, ParameterSet};
use phat_dsp::{FilterType, MAX_BANDS};

use crate::pipeline::{DynamicsLayout, Layout};
use crate::{BandConfig, ChannelPipeline, Error, FilterConfig, Result, BYPASS_PARAM, GAIN_PARAM};

const GAIN_ID: ParamId = ParamId(0);
const BYPASS_ID: ParamId = ParamId(1);

/// Assembles a [`ChannelPipeline`] from the building blocks of `phat-dsp`.
///
/// Every pipeline exposes two parameters: `gain` (dB, applied after the
/// dynamics section) and `bypass`. The remaining settings are fixed once built.
///
/// # Example
///
/// ```
/// use phat::{BandConfig, PipelineBuilder};
/// use phat::dsp::{DynamicsMode, DynamicsProcessorBuilder};
///
/// let pipeline = PipelineBuilder::new("two-band")
///     .gain_range_db(-24.0, 12.0, 0.0)
///     .multiband(
///         &[250.0],
///         vec![
///             BandConfig::new(DynamicsProcessorBuilder::default().mode(DynamicsMode::Simple)),
///             BandConfig::new(DynamicsProcessorBuilder::default().threshold_db(-18.0)).trim(0.8),
///         ],
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(pipeline.num_bands(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    name: String,
    gain_range: ParameterRange,
    filter: Option<FilterConfig>,
    dynamics: DynamicsLayout,
}

impl PipelineBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gain_range: ParameterRange::linear(-12.0, 12.0, 0.0),
            filter: None,
            dynamics: DynamicsLayout::None,
        }
    }

    /// Range and default of the `gain` parameter in dB. Default: -12..12, 0.
    pub fn gain_range_db(mut self, min: f32, max: f32, default: f32) -> Self {
        self.gain_range = ParameterRange {
            min,
            max,
            default,
            scale: ParameterScale::Linear,
        };
        self
    }

    /// Biquad run ahead of the dynamics section.
    pub fn filter(mut self, filter_type: FilterType, frequency: f64, q: f64) -> Self {
        self.filter = Some(FilterConfig {
            filter_type,
            frequency,
            q,
        });
        self
    }

    /// One envelope/dynamics pair on the whole signal.
    pub fn full_band(mut self, band: BandConfig) -> Self {
        self.dynamics = DynamicsLayout::FullBand(band);
        self
    }

    /// Split at `frequencies` (ascending, Hz) and process one band per split region.
    ///
    /// `bands` needs one entry more than `frequencies`.
    pub fn multiband(mut self, frequencies: &[f32], bands: Vec<BandConfig>) -> Self {
        self.dynamics = DynamicsLayout::Multiband {
            frequencies: frequencies.to_vec(),
            bands,
        };
        self
    }

    pub fn build(self) -> Result<ChannelPipeline> {
        self.validate()?;
        Ok(self.build_unchecked())
    }

    /// Build a layout that is known to be valid, such as the fixed plugin layouts.
    pub(crate) fn build_unchecked(self) -> ChannelPipeline {
        debug_assert!(self.validate().is_ok(), "invalid pipeline layout");

        let params = Arc::new(ParameterSet::new(vec![
            ParamSpec::new(GAIN_PARAM, "Gain", "dB", self.gain_range),
            ParamSpec::new(BYPASS_PARAM, "Bypass", "", ParameterRange::toggle(false)),
        ]));

        let layout = Layout {
            filter: self.filter,
            dynamics: self.dynamics,
        };

        ChannelPipeline::new(self.name, layout, params, GAIN_ID, BYPASS_ID)
    }

    fn validate(&self) -> Result<()> {
        let range = &self.gain_range;
        if !(range.min.is_finite() && range.max.is_finite() && range.min < range.max) {
            return Err(invalid(format!(
                "gain range {}..{} dB is empty or not finite",
                range.min, range.max
            )));
        }
        if !(range.min..=range.max).contains(&range.default) {
            return Err(invalid(format!(
                "default gain {} dB outside {}..{} dB",
                range.default, range.min, range.max
            )));
        }

        if let Some(filter) = &self.filter {
            if !(filter.frequency.is_finite() && filter.frequency > 0.0) {
                return Err(invalid(format!(
                    "filter frequency {} Hz must be positive",
                    filter.frequency
                )));
            }
            if !(filter.q.is_finite() && filter.q > 0.0) {
                return Err(invalid(format!("filter Q {} must be positive", filter.q)));
            }
            if let FilterType::Peaking { gain } = filter.filter_type {
                if !(gain.is_finite() && gain > 0.0) {
                    return Err(invalid(format!("peak gain {gain} must be positive")));
                }
            }
        }

        match &self.dynamics {
            DynamicsLayout::None => {}
            DynamicsLayout::FullBand(band) => validate_band(band)?,
            DynamicsLayout::Multiband { frequencies, bands } => {
                if frequencies.is_empty() || frequencies.len() >= MAX_BANDS {
                    return Err(invalid(format!(
                        "{} crossover frequencies given, expected 1 to {}",
                        frequencies.len(),
                        MAX_BANDS - 1
                    )));
                }
                if frequencies.iter().any(|f| !(f.is_finite() && *f > 0.0)) {
                    return Err(invalid("crossover frequencies must be positive".into()));
                }
                if frequencies.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(invalid(format!(
                        "crossover frequencies {frequencies:?} must be strictly ascending"
                    )));
                }
                if bands.len() != frequencies.len() + 1 {
                    return Err(invalid(format!(
                        "{} bands given for {} crossover frequencies",
                        bands.len(),
                        frequencies.len()
                    )));
                }
                for band in bands {
                    validate_band(band)?;
                }
            }
        }

        Ok(())
    }
}

fn validate_band(band: &BandConfig) -> Result<()> {
    let times_ok = [band.attack_seconds, band.release_seconds]
        .iter()
        .all(|t| t.is_finite() && *t >= 0.0);
    if !times_ok {
        return Err(invalid(format!(
            "envelope times {}s/{}s must be finite and non-negative",
            band.attack_seconds, band.release_seconds
        )));
    }
    if !band.trim.is_finite() {
        return Err(invalid(format!("band trim {} is not finite", band.trim)));
    }
    Ok(())
}

fn invalid(msg: String) -> Error {
    Error::InvalidPipeline(msg)
}
