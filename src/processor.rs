//! Host-facing capability interface.

use phat_core::{Arc, AudioBlock, ParameterSet, ProcessSpec};

use crate::Result;

/// What a host adapter needs from a plugin: lifecycle, block processing and
/// parameter access.
///
/// Implementors are plain structs. The adapter for a concrete plugin format
/// forwards its callbacks to these methods.
///
/// # Threading
///
/// [`process`](AudioProcessor::process) runs on the real-time thread and must not
/// allocate, lock, log or fail. Parameter writes come from other threads through
/// the shared [`ParameterSet`].
pub trait AudioProcessor: Send {
    fn name(&self) -> &str;

    /// Allocate or reset all stateful components for `spec`.
    ///
    /// Calling it again with an identical spec keeps the current state.
    fn prepare(&mut self, spec: ProcessSpec);

    /// Drop per-session state. `process` must not be called until the next `prepare`.
    fn release(&mut self);

    fn is_prepared(&self) -> bool;

    /// Transform `block` in place.
    ///
    /// Precondition: [`prepare`](AudioProcessor::prepare) has been called.
    fn process(&mut self, block: &mut AudioBlock<'_, '_>);

    /// Shared parameter set; clone the `Arc` to hand it to a GUI or automation thread.
    fn parameters(&self) -> &Arc<ParameterSet>;

    /// Set a parameter by id. Out-of-range values are clamped.
    fn set_parameter(&self, name: &str, value: f32) -> Result<()> {
        Ok(self.parameters().set(name, value)?)
    }

    fn get_parameter(&self, name: &str) -> Result<f32> {
        Ok(self.parameters().get(name)?)
    }

    #[cfg(feature = "state")]
    fn save_state(&self) -> Result<Vec<u8>> {
        Ok(self.parameters().save_state()?)
    }

    #[cfg(feature = "state")]
    fn load_state(&self, data: &[u8]) -> Result<()> {
        Ok(self.parameters().load_state(data)?)
    }

    /// Processing delay in samples reported to the host.
    fn latency_samples(&self) -> usize {
        0
    }

    fn tail_seconds(&self) -> f64 {
        0.0
    }
}
