//! Greedy silence-aligned segmentation.
//!
//! Cuts the waveform into ordered, gap-free segments: each cut lands on the
//! qualifying pause closest to the duration cap, falling back to a hard cut
//! when speech runs unbroken past the cap. The remainder is emitted whole
//! only once no qualifying pause is left; a degenerate sliver tail merges
//! backwards when the merged segment still respects the cap.

use crate::audio::waveform::Waveform;
use crate::defaults;
use crate::error::{BilingueError, Result};
use crate::segment::silence::detect_silence;
use serde::{Deserialize, Serialize};

/// Tolerance for floating-point boundary comparisons, in seconds.
const EPSILON: f64 = 1e-9;

/// Segmentation tuning. All durations in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Upper bound on segment length.
    pub max_segment_secs: f64,
    /// Lower bound a segment should satisfy when possible.
    pub min_segment_secs: f64,
    /// dB below the recording's mean level at which audio counts as silent.
    pub silence_threshold_db: f64,
    /// Minimum contiguous silence to qualify as a split candidate.
    pub min_silence_secs: f64,
    /// Fraction of `min_segment_secs` below which a trailing segment is
    /// merged into its predecessor.
    pub sliver_fraction: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_segment_secs: defaults::MAX_SEGMENT_SECS,
            min_segment_secs: defaults::MIN_SEGMENT_SECS,
            silence_threshold_db: defaults::SILENCE_THRESHOLD_DB,
            min_silence_secs: defaults::MIN_SILENCE_SECS,
            sliver_fraction: defaults::SLIVER_FRACTION,
        }
    }
}

impl SegmentationConfig {
    /// Validate bounds before any processing or file I/O.
    pub fn validate(&self) -> Result<()> {
        if self.min_segment_secs <= 0.0 {
            return Err(invalid("min_segment_secs", "must be positive"));
        }
        if self.max_segment_secs <= 0.0 {
            return Err(invalid("max_segment_secs", "must be positive"));
        }
        if self.min_segment_secs > self.max_segment_secs {
            return Err(invalid(
                "min_segment_secs",
                "must not exceed max_segment_secs",
            ));
        }
        if self.silence_threshold_db <= 0.0 {
            return Err(invalid(
                "silence_threshold_db",
                "must be a positive dB drop below the mean level",
            ));
        }
        if self.min_silence_secs <= 0.0 {
            return Err(invalid("min_silence_secs", "must be positive"));
        }
        if !(0.0..1.0).contains(&self.sliver_fraction) {
            return Err(invalid("sliver_fraction", "must be in [0, 1)"));
        }
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> BilingueError {
    BilingueError::Configuration {
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// A time range `[start, end)` over the source waveform with a 1-based index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub start_secs: f64,
    pub end_secs: f64,
}

impl Segment {
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

/// Cut the waveform into ordered, contiguous segments.
///
/// Deterministic for a given waveform and config. Returns an empty vec only
/// for an empty waveform; any non-empty waveform yields at least one segment.
pub fn segment(waveform: &Waveform, config: &SegmentationConfig) -> Result<Vec<Segment>> {
    config.validate()?;

    if waveform.is_empty() {
        return Ok(Vec::new());
    }

    let intervals = detect_silence(
        waveform,
        config.silence_threshold_db,
        config.min_silence_secs,
    );
    let candidates: Vec<f64> = intervals.iter().map(|iv| iv.midpoint_secs()).collect();

    Ok(build_segments(
        waveform.duration_secs(),
        &candidates,
        config,
    ))
}

/// Greedy cut plan over `[0, total_secs)` given ascending split candidates.
pub(crate) fn build_segments(
    total_secs: f64,
    candidates: &[f64],
    config: &SegmentationConfig,
) -> Vec<Segment> {
    let mut bounds: Vec<(f64, f64)> = Vec::new();
    let mut cursor = 0.0;

    while cursor < total_secs - EPSILON {
        let remaining = total_secs - cursor;

        // Candidate closest to the cap without exceeding it.
        let cut = candidates
            .iter()
            .copied()
            .filter(|&c| {
                let offset = c - cursor;
                c < total_secs - EPSILON
                    && offset >= config.min_segment_secs - EPSILON
                    && offset <= config.max_segment_secs + EPSILON
            })
            .fold(None::<f64>, |best, c| match best {
                Some(b) if b >= c => Some(b),
                _ => Some(c),
            });

        match cut {
            Some(cut) => {
                bounds.push((cursor, cut));
                cursor = cut;
            }
            None if remaining <= config.max_segment_secs + EPSILON => {
                // No qualifying pause left: the remainder stands whole,
                // even below the minimum.
                bounds.push((cursor, total_secs));
                break;
            }
            None => {
                // Unbroken speech: hard cut exactly at the cap.
                let cut = cursor + config.max_segment_secs;
                bounds.push((cursor, cut));
                cursor = cut;
            }
        }
    }

    // Degenerate tail: merge a sliver into the preceding segment rather
    // than emitting a near-empty unit, but never past the duration cap.
    // The only merge step.
    if bounds.len() >= 2 {
        let sliver = config.sliver_fraction * config.min_segment_secs;
        let (last_start, last_end) = bounds[bounds.len() - 1];
        let (prev_start, _) = bounds[bounds.len() - 2];
        if last_end - last_start < sliver
            && last_end - prev_start <= config.max_segment_secs + EPSILON
        {
            bounds.pop();
            let last = bounds.len() - 1;
            bounds[last].1 = last_end;
        }
    }

    bounds
        .into_iter()
        .enumerate()
        .map(|(i, (start_secs, end_secs))| Segment {
            index: i + 1,
            start_secs,
            end_secs,
        })
        .collect()
}
