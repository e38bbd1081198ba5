//! Host-owned audio block.

/// A block of non-interleaved channels, borrowed from the host for one `process` call.
///
/// Every channel slice has the same length. The pipeline mutates samples in place
/// and never changes the channel or sample count.
pub struct AudioBlock<'a, 'b> {
    channels: &'a mut [&'b mut [f32]],
    num_samples: usize,
}

impl<'a, 'b> AudioBlock<'a, 'b> {
    /// Wrap host channel slices.
    ///
    /// If the host hands over ragged channels, the block exposes only the
    /// shortest common length.
    pub fn new(channels: &'a mut [&'b mut [f32]]) -> Self {
        let num_samples = channels.iter().map(|c| c.len()).min().unwrap_or(0);
        Self {
            channels,
            num_samples,
        }
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    #[inline]
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index][..self.num_samples]
    }

    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index][..self.num_samples]
    }

    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> + use<'_, 'a, 'b> {
        let n = self.num_samples;
        self.channels.iter_mut().map(move |c| &mut c[..n])
    }

    /// Zero every sample of channel `index`.
    pub fn clear_channel(&mut self, index: usize) {
        self.channel_mut(index).fill(0.0);
    }
}
