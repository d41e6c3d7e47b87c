//! Decoded audio waveform representation.

/// Decoded audio: mono 16-bit PCM samples plus the sample rate.
///
/// Immutable once decoded; one pipeline run owns exactly one waveform.
#[derive(Debug, Clone)]
pub struct Waveform {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl Waveform {
    /// Create a waveform from mono samples.
    ///
    /// Panics in debug builds if `sample_rate` is zero; decoding validates
    /// the rate before construction.
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        debug_assert!(sample_rate > 0);
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Total duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample index for a time offset, clamped to the buffer length.
    pub fn index_at(&self, secs: f64) -> usize {
        let idx = (secs * self.sample_rate as f64).round() as usize;
        idx.min(self.samples.len())
    }

    /// Samples covering `[start, end)` in seconds, clamped to the buffer.
    pub fn range(&self, start_secs: f64, end_secs: f64) -> &[i16] {
        let start = self.index_at(start_secs);
        let end = self.index_at(end_secs).max(start);
        &self.samples[start..end]
    }
}

/// Average interleaved stereo samples down to mono.
pub fn downmix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}
