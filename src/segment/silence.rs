//! Silence interval detection over a decoded waveform.
//!
//! Scans with a fixed analysis window, converts per-window RMS to dBFS, and
//! classifies windows quieter than the recording's mean level minus a
//! configurable drop. Adjacent silent windows merge into intervals; intervals
//! shorter than the minimum pause length are discarded.

use crate::audio::waveform::Waveform;
use crate::defaults;

/// Floor for dBFS values so digital silence doesn't produce -inf.
const DBFS_FLOOR: f64 = -96.0;

/// A time range `[start, end)` in seconds classified as silence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceInterval {
    pub start_secs: f64,
    pub end_secs: f64,
}

impl SilenceInterval {
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }

    /// Midpoint of the interval — the candidate split point it contributes.
    pub fn midpoint_secs(&self) -> f64 {
        (self.start_secs + self.end_secs) / 2.0
    }
}

/// RMS level of a sample window, normalized to [0, 1].
fn window_rms(samples: &[i16]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples
        .iter()
        .map(|&s| {
            let v = s as f64 / i16::MAX as f64;
            v * v
        })
        .sum();
    (sum_sq / samples.len() as f64).sqrt()
}

/// Convert a normalized RMS level to dBFS, floored at [`DBFS_FLOOR`].
fn rms_to_dbfs(rms: f64) -> f64 {
    if rms <= 0.0 {
        return DBFS_FLOOR;
    }
    (20.0 * rms.log10()).max(DBFS_FLOOR)
}

/// Detect silence intervals at least `min_silence_secs` long whose level is
/// more than `threshold_db_below_mean` under the recording's mean dBFS.
pub fn detect_silence(
    waveform: &Waveform,
    threshold_db_below_mean: f64,
    min_silence_secs: f64,
) -> Vec<SilenceInterval> {
    let window_len =
        (waveform.sample_rate() as u64 * defaults::ANALYSIS_WINDOW_MS as u64 / 1000) as usize;
    if window_len == 0 || waveform.is_empty() {
        return Vec::new();
    }

    let window_secs = window_len as f64 / waveform.sample_rate() as f64;
    let levels: Vec<f64> = waveform
        .samples()
        .chunks(window_len)
        .map(|w| rms_to_dbfs(window_rms(w)))
        .collect();

    let mean_dbfs = levels.iter().sum::<f64>() / levels.len() as f64;
    let threshold = mean_dbfs - threshold_db_below_mean;

    // Merge adjacent silent windows into intervals.
    let mut intervals = Vec::new();
    let mut run_start: Option<usize> = None;
    for (i, &level) in levels.iter().enumerate() {
        if level < threshold {
            run_start.get_or_insert(i);
        } else if let Some(start) = run_start.take() {
            intervals.push(SilenceInterval {
                start_secs: start as f64 * window_secs,
                end_secs: i as f64 * window_secs,
            });
        }
    }
    if let Some(start) = run_start {
        intervals.push(SilenceInterval {
            start_secs: start as f64 * window_secs,
            end_secs: waveform.duration_secs(),
        });
    }

    intervals.retain(|iv| iv.duration_secs() >= min_silence_secs);
    intervals
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 8000;

    fn tone(secs: f64, amplitude: i16) -> Vec<i16> {
        vec![amplitude; (secs * RATE as f64) as usize]
    }

    fn waveform(parts: &[(f64, i16)]) -> Waveform {
        let mut samples = Vec::new();
        for &(secs, amp) in parts {
            samples.extend(tone(secs, amp));
        }
        Waveform::new(samples, RATE)
    }

    #[test]
    fn detects_a_central_pause() {
        let wave = waveform(&[(3.0, 10_000), (1.5, 0), (3.0, 10_000)]);
        let intervals = detect_silence(&wave, 16.0, 1.0);

        assert_eq!(intervals.len(), 1);
        let iv = intervals[0];
        assert!((iv.start_secs - 3.0).abs() < 0.1, "start: {}", iv.start_secs);
        assert!((iv.end_secs - 4.5).abs() < 0.1, "end: {}", iv.end_secs);
        assert!((iv.midpoint_secs() - 3.75).abs() < 0.1);
    }

    #[test]
    fn short_gaps_are_discarded() {
        let wave = waveform(&[(3.0, 10_000), (0.3, 0), (3.0, 10_000)]);
        let intervals = detect_silence(&wave, 16.0, 1.0);
        assert!(intervals.is_empty());
    }

    #[test]
    fn uniform_audio_has_no_silence() {
        // Relative thresholding: nothing sits 16dB below its own level.
        let wave = waveform(&[(5.0, 8_000)]);
        assert!(detect_silence(&wave, 16.0, 1.0).is_empty());
    }

    #[test]
    fn uniformly_silent_audio_has_no_silence_intervals() {
        // A fully silent recording has a silent mean too, so no window
        // qualifies — the splitter treats it like unbroken speech.
        let wave = waveform(&[(5.0, 0)]);
        assert!(detect_silence(&wave, 16.0, 1.0).is_empty());
    }

    #[test]
    fn trailing_silence_runs_to_end_of_waveform() {
        let wave = waveform(&[(3.0, 10_000), (2.0, 0)]);
        let intervals = detect_silence(&wave, 16.0, 1.0);

        assert_eq!(intervals.len(), 1);
        assert!((intervals[0].end_secs - wave.duration_secs()).abs() < 1e-9);
    }

    #[test]
    fn multiple_pauses_all_reported_in_order() {
        let wave = waveform(&[
            (2.0, 10_000),
            (1.2, 0),
            (2.0, 10_000),
            (1.5, 0),
            (2.0, 10_000),
        ]);
        let intervals = detect_silence(&wave, 16.0, 1.0);

        assert_eq!(intervals.len(), 2);
        assert!(intervals[0].start_secs < intervals[1].start_secs);
    }

    #[test]
    fn empty_waveform_yields_nothing() {
        let wave = Waveform::new(Vec::new(), RATE);
        assert!(detect_silence(&wave, 16.0, 1.0).is_empty());
    }

    #[test]
    fn rms_to_dbfs_floors_at_digital_silence() {
        assert_eq!(rms_to_dbfs(0.0), DBFS_FLOOR);
        assert!(rms_to_dbfs(1.0).abs() < 1e-9);
    }
}
