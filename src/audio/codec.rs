//! Audio decode/export boundary.
//!
//! The pipeline only needs two operations from an audio library: decode a
//! whole file into a [`Waveform`] and write a sub-range back out as a clip.
//! `AudioCodec` is that boundary; the bundled implementation uses hound
//! (WAV). An mp3-capable codec slots in behind the same trait.

use crate::audio::waveform::{Waveform, downmix_to_mono};
use crate::error::{BilingueError, Result};
use std::path::Path;

/// Decode and export contract for the pipeline's audio I/O.
pub trait AudioCodec: Send + Sync {
    /// Decode a file into a mono waveform.
    fn decode(&self, path: &Path) -> Result<Waveform>;

    /// Export `[start_secs, end_secs)` of the waveform to `dest`.
    fn export_range(
        &self,
        waveform: &Waveform,
        start_secs: f64,
        end_secs: f64,
        dest: &Path,
    ) -> Result<()>;

    /// File extension (without dot) of clips this codec writes.
    fn extension(&self) -> &'static str;
}

/// WAV codec backed by hound.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavCodec;

impl WavCodec {
    pub fn new() -> Self {
        Self
    }
}

impl AudioCodec for WavCodec {
    fn decode(&self, path: &Path) -> Result<Waveform> {
        let mut reader = hound::WavReader::open(path).map_err(|e| BilingueError::AudioFormat {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let spec = reader.spec();
        if spec.sample_rate == 0 {
            return Err(BilingueError::AudioFormat {
                path: path.display().to_string(),
                message: "sample rate is zero".to_string(),
            });
        }

        let raw: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
            (hound::SampleFormat::Int, 16) => reader
                .samples::<i16>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| BilingueError::AudioFormat {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?,
            (hound::SampleFormat::Float, 32) => reader
                .samples::<f32>()
                .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| BilingueError::AudioFormat {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?,
            (format, bits) => {
                return Err(BilingueError::AudioFormat {
                    path: path.display().to_string(),
                    message: format!("unsupported sample format: {:?} {}-bit", format, bits),
                });
            }
        };

        let mono = downmix_to_mono(&raw, spec.channels);
        Ok(Waveform::new(mono, spec.sample_rate))
    }

    fn export_range(
        &self,
        waveform: &Waveform,
        start_secs: f64,
        end_secs: f64,
        dest: &Path,
    ) -> Result<()> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: waveform.sample_rate(),
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer =
            hound::WavWriter::create(dest, spec).map_err(|e| BilingueError::AudioExport {
                path: dest.display().to_string(),
                message: e.to_string(),
            })?;

        for &sample in waveform.range(start_secs, end_secs) {
            writer
                .write_sample(sample)
                .map_err(|e| BilingueError::AudioExport {
                    path: dest.display().to_string(),
                    message: e.to_string(),
                })?;
        }

        writer.finalize().map_err(|e| BilingueError::AudioExport {
            path: dest.display().to_string(),
            message: e.to_string(),
        })
    }

    fn extension(&self) -> &'static str {
        "wav"
    }
}
