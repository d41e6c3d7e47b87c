//! Per-segment pipeline: export clip → transcribe → translate → synthesize.
//!
//! Segments are processed by a bounded worker pool; results are collected
//! into sequence-index order regardless of completion order. Service
//! failures degrade the segment's fields and never abort the run;
//! cancellation stops new dispatch and yields no manifest.

use crate::audio::codec::AudioCodec;
use crate::audio::waveform::Waveform;
use crate::defaults;
use crate::error::{BilingueError, Result};
use crate::pipeline::manifest::{ProcessingManifest, SegmentResult};
use crate::pipeline::report::{NullReporter, Reporter};
use crate::pipeline::retry::RetryPolicy;
use crate::pipeline::text;
use crate::segment::Segment;
use crate::services::synthesizer::{Synthesizer, Voice, select_voice};
use crate::services::transcriber::Transcriber;
use crate::services::translator::Translator;
use crossbeam_channel::bounded;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Run-level cancellation flag, shareable across threads.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Progress callback: (segments finished, total segments).
pub type ProgressFn = dyn Fn(usize, usize) + Send + Sync;

/// Drives every segment through the three services and assembles the manifest.
pub struct Orchestrator {
    codec: Arc<dyn AudioCodec>,
    transcriber: Arc<dyn Transcriber>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn Synthesizer>,
    reporter: Arc<dyn Reporter>,
    retry: RetryPolicy,
    workers: usize,
    source_language: String,
    target_language: String,
    cancel: CancelToken,
    on_progress: Option<Arc<ProgressFn>>,
}

impl Orchestrator {
    pub fn new(
        codec: Arc<dyn AudioCodec>,
        transcriber: Arc<dyn Transcriber>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        Self {
            codec,
            transcriber,
            translator,
            synthesizer,
            reporter: Arc::new(NullReporter),
            retry: RetryPolicy::default(),
            workers: defaults::WORKERS,
            source_language: defaults::SOURCE_LANGUAGE.to_string(),
            target_language: defaults::TARGET_LANGUAGE.to_string(),
            cancel: CancelToken::new(),
            on_progress: None,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Concurrency cap for the segment worker pool (minimum 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_languages(mut self, source: &str, target: &str) -> Self {
        self.source_language = source.to_string();
        self.target_language = target.to_string();
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, on_progress: Arc<ProgressFn>) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// Process every segment and assemble the manifest.
    ///
    /// `source` is the original input file (its stem keys the output file
    /// names); clips land under `french_audio/` and `english_audio/` inside
    /// `output_dir`. A cancelled run returns [`BilingueError::Cancelled`]
    /// and no manifest.
    pub fn run(
        &self,
        waveform: &Waveform,
        segments: &[Segment],
        source: &Path,
        output_dir: &Path,
    ) -> Result<ProcessingManifest> {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        let file_name = source
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| stem.clone());

        std::fs::create_dir_all(output_dir.join(defaults::FRENCH_AUDIO_DIR))?;
        std::fs::create_dir_all(output_dir.join(defaults::ENGLISH_AUDIO_DIR))?;

        // One voice per run; a failed lookup degrades synthesis for the
        // whole run rather than failing per segment.
        let voice = match self.retry.retry(|| {
            let voices = self.synthesizer.voices()?;
            select_voice(&voices, &self.target_language).cloned()
        }) {
            Ok(voice) => Some(voice),
            Err(e) => {
                self.reporter
                    .warn(&format!("voice selection failed, skipping synthesis: {e}"));
                None
            }
        };

        let total = segments.len();
        let mut slots: Vec<Option<SegmentResult>> = vec![None; total];

        thread::scope(|scope| {
            let stem = stem.as_str();
            let (job_tx, job_rx) = bounded::<Segment>(self.workers);
            let (result_tx, result_rx) = bounded::<(usize, SegmentResult)>(self.workers);

            for _ in 0..self.workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                let voice = voice.as_ref();
                scope.spawn(move || {
                    while let Ok(segment) = job_rx.recv() {
                        if self.cancel.is_cancelled() {
                            break;
                        }
                        let result =
                            self.process_segment(waveform, &segment, voice, stem, output_dir);
                        if result_tx.send((segment.index, result)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(job_rx);
            drop(result_tx);

            scope.spawn(move || {
                for segment in segments {
                    if self.cancel.is_cancelled() {
                        break;
                    }
                    if job_tx.send(*segment).is_err() {
                        break;
                    }
                }
            });

            let mut finished = 0;
            while let Ok((index, result)) = result_rx.recv() {
                // Indexes are 1-based and unique per run.
                if let Some(slot) = index.checked_sub(1).and_then(|i| slots.get_mut(i)) {
                    *slot = Some(result);
                }
                finished += 1;
                if let Some(ref on_progress) = self.on_progress {
                    on_progress(finished, total);
                }
            }
        });

        if self.cancel.is_cancelled() {
            return Err(BilingueError::Cancelled);
        }

        let sections: Vec<SegmentResult> = slots.into_iter().flatten().collect();
        Ok(ProcessingManifest::new(&file_name, output_dir, sections))
    }

    fn process_segment(
        &self,
        waveform: &Waveform,
        segment: &Segment,
        voice: Option<&Voice>,
        stem: &str,
        output_dir: &Path,
    ) -> SegmentResult {
        let extension = self.codec.extension();
        let french_path = clip_path(
            output_dir,
            defaults::FRENCH_AUDIO_DIR,
            stem,
            "fr",
            segment.index,
            extension,
        );

        let exported = match self.codec.export_range(
            waveform,
            segment.start_secs,
            segment.end_secs,
            &french_path,
        ) {
            Ok(()) => true,
            Err(e) => {
                self.reporter
                    .warn(&format!("segment {}: clip export failed: {e}", segment.index));
                false
            }
        };

        let french_text = if exported {
            match self
                .retry
                .retry(|| self.transcriber.transcribe(&french_path, &self.source_language))
            {
                Ok(raw) => text::normalize(&raw),
                Err(e) => {
                    self.reporter
                        .warn(&format!("segment {}: transcription failed: {e}", segment.index));
                    String::new()
                }
            }
        } else {
            String::new()
        };

        let english_text = if french_text.is_empty() {
            String::new()
        } else {
            match self.retry.retry(|| {
                self.translator
                    .translate(&french_text, &self.source_language, &self.target_language)
            }) {
                Ok(raw) => text::normalize(&raw),
                Err(e) => {
                    self.reporter
                        .warn(&format!("segment {}: translation failed: {e}", segment.index));
                    String::new()
                }
            }
        };

        let english_audio_file_path = if english_text.is_empty() {
            None
        } else if let Some(voice) = voice {
            let english_path = clip_path(
                output_dir,
                defaults::ENGLISH_AUDIO_DIR,
                stem,
                "en",
                segment.index,
                extension,
            );
            match self
                .retry
                .retry(|| self.synthesizer.synthesize(&english_text, voice, &english_path))
            {
                Ok(()) => Some(english_path.display().to_string()),
                Err(e) => {
                    self.reporter
                        .warn(&format!("segment {}: synthesis failed: {e}", segment.index));
                    None
                }
            }
        } else {
            None
        };

        SegmentResult {
            french_text,
            english_text,
            french_audio_file_path: french_path.display().to_string(),
            english_audio_file_path,
            duration_seconds: segment.duration_secs(),
            segment_number: segment.index,
        }
    }
}

/// `<output_dir>/<subdir>/<stem>_<lang>_<index:03>.<ext>` — stable, sortable,
/// keyed only by index so reruns overwrite instead of duplicating.
fn clip_path(
    output_dir: &Path,
    subdir: &str,
    stem: &str,
    lang: &str,
    index: usize,
    extension: &str,
) -> PathBuf {
    output_dir
        .join(subdir)
        .join(format!("{stem}_{lang}_{index:03}.{extension}"))
}
