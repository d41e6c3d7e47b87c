//! Default configuration constants for bilingue.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

use std::time::Duration;

/// Analysis window length used by the silence scanner, in milliseconds.
///
/// 50ms is short enough to localize pause boundaries within a syllable
/// while keeping the per-window RMS stable.
pub const ANALYSIS_WINDOW_MS: u32 = 50;

/// Default upper bound on segment duration in seconds.
///
/// 20s keeps clips inside what recognition services accept in one request
/// and what a learner can comfortably replay.
pub const MAX_SEGMENT_SECS: f64 = 20.0;

/// Default lower bound on segment duration in seconds.
///
/// Shorter fragments rarely carry a full phrase and produce unusable
/// flashcards.
pub const MIN_SEGMENT_SECS: f64 = 3.0;

/// Default silence threshold in dB below the recording's mean level.
///
/// A window quieter than mean − 16dB is treated as silence. Relative
/// thresholding tracks recordings of very different loudness without
/// retuning.
pub const SILENCE_THRESHOLD_DB: f64 = 16.0;

/// Default minimum silence duration in seconds for a qualifying pause.
///
/// 1s filters out plosive gaps and breath pauses that are not natural
/// phrase boundaries.
pub const MIN_SILENCE_SECS: f64 = 1.0;

/// Fraction of `min_segment` below which a trailing segment is merged
/// into its predecessor instead of being emitted as a near-empty unit.
pub const SLIVER_FRACTION: f64 = 0.25;

/// Default number of concurrent segment workers.
///
/// Tuned to what the external services tolerate, not to local CPU count.
pub const WORKERS: usize = 4;

/// Default maximum attempts for a transient service failure.
pub const RETRY_ATTEMPTS: u32 = 3;

/// Default initial backoff between retry attempts. Doubles per attempt.
pub const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Source language sent to the recognition and translation services.
pub const SOURCE_LANGUAGE: &str = "fr";

/// Target language for translation and synthesis.
pub const TARGET_LANGUAGE: &str = "en";

/// Default recognition service endpoint (whisper-server style).
pub const TRANSCRIPTION_URL: &str = "http://127.0.0.1:8080/inference";

/// Default translation service endpoint (LibreTranslate style).
pub const TRANSLATION_URL: &str = "http://127.0.0.1:5000/translate";

/// Default synthesis service endpoint.
pub const SYNTHESIS_URL: &str = "http://127.0.0.1:5500";

/// Subdirectory for exported French clips.
pub const FRENCH_AUDIO_DIR: &str = "french_audio";

/// Subdirectory for synthesized English clips.
pub const ENGLISH_AUDIO_DIR: &str = "english_audio";
