//! Fixed parameter schema with lock-free values.
//!
//! The schema (names, ranges, defaults) is frozen at construction. Values are
//! written from the control thread and read from the audio thread through
//! [`AtomicFloat`], so neither side ever blocks.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{AtomicFloat, Error, ParameterRange, Result};

/// Snapshot format version written by [`ParameterSet::snapshot`].
pub const STATE_VERSION: u32 = 1;

/// Index of a parameter inside its [`ParameterSet`].
///
/// Resolve once with [`ParameterSet::id`] and keep it; lookups by id never
/// touch strings, which keeps them usable on the audio thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub usize);

/// Declaration of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Stable identifier used by hosts and state snapshots, e.g. `"gain"`.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Unit label shown next to the value, e.g. `"dB"`.
    pub unit: &'static str,
    pub range: ParameterRange,
}

impl ParamSpec {
    pub const fn new(
        id: &'static str,
        name: &'static str,
        unit: &'static str,
        range: ParameterRange,
    ) -> Self {
        Self {
            id,
            name,
            unit,
            range,
        }
    }
}

/// Flat list of named parameter values as persisted by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSnapshot {
    pub version: u32,
    pub params: Vec<(String, f32)>,
}

/// The processing parameters of one plugin instance.
#[derive(Debug)]
pub struct ParameterSet {
    specs: Vec<ParamSpec>,
    values: Vec<AtomicFloat>,
}

impl ParameterSet {
    pub fn new(specs: Vec<ParamSpec>) -> Self {
        debug_assert!(
            specs
                .iter()
                .enumerate()
                .all(|(i, a)| specs[i + 1..].iter().all(|b| b.id != a.id)),
            "parameter ids must be unique"
        );

        let values = specs
            .iter()
            .map(|spec| AtomicFloat::new(spec.range.default))
            .collect();

        Self { specs, values }
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn specs(&self) -> &[ParamSpec] {
        &self.specs
    }

    pub fn spec(&self, id: ParamId) -> &ParamSpec {
        &self.specs[id.0]
    }

    pub fn find(&self, name: &str) -> Option<ParamId> {
        self.specs.iter().position(|s| s.id == name).map(ParamId)
    }

    pub fn id(&self, name: &str) -> Result<ParamId> {
        self.find(name)
            .ok_or_else(|| Error::UnknownParameter(name.to_string()))
    }

    /// Current value. Lock-free; safe to call from the audio thread.
    #[inline]
    pub fn value(&self, id: ParamId) -> f32 {
        self.values[id.0].get()
    }

    /// Store `value` clamped into the declared range.
    #[inline]
    pub fn set_value(&self, id: ParamId, value: f32) {
        let clamped = self.specs[id.0].range.clamp(value);
        self.values[id.0].set(clamped);
    }

    /// Set a parameter by name. Out-of-range values are clamped, not rejected.
    pub fn set(&self, name: &str, value: f32) -> Result<()> {
        let id = self.id(name).inspect_err(|_| {
            warn!("Ignoring write to unknown parameter '{}'", name);
        })?;
        self.set_value(id, value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<f32> {
        self.id(name).map(|id| self.value(id))
    }

    /// Set a parameter from a host-normalized (0.0-1.0) value.
    pub fn set_normalized(&self, name: &str, normalized: f32) -> Result<()> {
        let id = self.id(name)?;
        let value = self.specs[id.0].range.denormalize(normalized);
        self.values[id.0].set(value);
        Ok(())
    }

    pub fn get_normalized(&self, name: &str) -> Result<f32> {
        let id = self.id(name)?;
        Ok(self.specs[id.0].range.normalize(self.value(id)))
    }

    pub fn reset_to_defaults(&self) {
        for (spec, value) in self.specs.iter().zip(&self.values) {
            value.set(spec.range.default);
        }
    }

    pub fn snapshot(&self) -> ParameterSnapshot {
        ParameterSnapshot {
            version: STATE_VERSION,
            params: self
                .specs
                .iter()
                .zip(&self.values)
                .map(|(spec, value)| (spec.id.to_string(), value.get()))
                .collect(),
        }
    }

    /// Apply a snapshot by name. Unknown names are skipped, values are clamped.
    pub fn restore(&self, snapshot: &ParameterSnapshot) -> Result<()> {
        if snapshot.version != STATE_VERSION {
            return Err(Error::InvalidState(format!(
                "unsupported state version {} (expected {})",
                snapshot.version, STATE_VERSION
            )));
        }

        for (name, value) in &snapshot.params {
            match self.find(name) {
                Some(id) => self.set_value(id, *value),
                None => warn!("Skipping unknown parameter '{}' in saved state", name),
            }
        }

        debug!("Restored {} parameter values", snapshot.params.len());
        Ok(())
    }

    #[cfg(feature = "state")]
    pub fn save_state(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.snapshot())?)
    }

    #[cfg(feature = "state")]
    pub fn load_state(&self, data: &[u8]) -> Result<()> {
        let snapshot: ParameterSnapshot = serde_json::from_slice(data)?;
        self.restore(&snapshot)
    }
}
