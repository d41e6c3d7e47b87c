//! Audio decoding, waveform representation, and clip export.

pub mod codec;
pub mod waveform;

pub use codec::{AudioCodec, WavCodec};
pub use waveform::Waveform;
