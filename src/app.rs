//! Application entry point.
//!
//! Wires the complete flow for one input file:
//! decode → segment → (per segment: export → transcribe → translate →
//! synthesize) → manifest.

use crate::audio::codec::{AudioCodec, WavCodec};
use crate::config::Config;
use crate::pipeline::orchestrator::{CancelToken, Orchestrator};
use crate::pipeline::report::{LogReporter, Reporter};
use crate::pipeline::retry::RetryPolicy;
use crate::segment::{Segment, segment};
use crate::services::synthesizer::HttpSynthesizer;
use crate::services::transcriber::HttpTranscriber;
use crate::services::translator::HttpTranslator;
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options resolved from the command line.
#[derive(Debug, Default)]
pub struct RunOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub max_segment: Option<f64>,
    pub min_segment: Option<f64>,
    pub workers: Option<usize>,
    pub dry_run: bool,
    pub quiet: bool,
}

/// Run the process command: decode → segment → orchestrate → manifest.
pub fn run_process_command(mut config: Config, options: RunOptions) -> anyhow::Result<()> {
    // Apply CLI overrides
    if let Some(max) = options.max_segment {
        config.segmentation.max_segment_secs = max;
    }
    if let Some(min) = options.min_segment {
        config.segmentation.min_segment_secs = min;
    }
    if let Some(workers) = options.workers {
        config.pipeline.workers = workers;
    }

    // Everything that can fail without touching the filesystem fails here.
    config.validate()?;

    let codec = Arc::new(WavCodec::new());
    let reporter: Arc<dyn Reporter> = if options.quiet {
        Arc::new(LogReporter::quiet())
    } else {
        Arc::new(LogReporter::new())
    };

    let output_dir = options.output.clone().unwrap_or_else(|| {
        let stem = options
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        options
            .input
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(format!("{stem}_processed"))
    });

    reporter.info(&format!("decoding {}", options.input.display()));
    let waveform = codec.decode(&options.input)?;
    reporter.info(&format!(
        "decoded {:.1}s at {}Hz",
        waveform.duration_secs(),
        waveform.sample_rate()
    ));

    let segments = segment(&waveform, &config.segmentation)?;
    reporter.info(&format!("planned {} segments", segments.len()));

    if options.dry_run {
        print_plan(&segments);
        return Ok(());
    }

    let transcriber = HttpTranscriber::new(&config.services.transcription_url)
        .context("recognition service client")?;
    let translator =
        HttpTranslator::new(&config.services.translation_url).context("translation service client")?;
    let synthesizer =
        HttpSynthesizer::new(&config.services.synthesis_url).context("synthesis service client")?;

    let progress = if options.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(segments.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} segments")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    };
    let progress_for_callback = progress.clone();

    let orchestrator = Orchestrator::new(
        codec,
        Arc::new(transcriber),
        Arc::new(translator),
        Arc::new(synthesizer),
    )
    .with_reporter(reporter.clone())
    .with_retry_policy(RetryPolicy::new(
        config.pipeline.retry_attempts,
        config.pipeline.retry_backoff(),
    ))
    .with_workers(config.pipeline.workers)
    .with_languages(
        &config.services.source_language,
        &config.services.target_language,
    )
    .with_cancel_token(CancelToken::new())
    .with_progress(Arc::new(move |finished, _total| {
        progress_for_callback.set_position(finished as u64);
    }));

    let manifest = orchestrator.run(&waveform, &segments, &options.input, &output_dir)?;
    progress.finish_and_clear();

    let manifest_path = manifest_path(&options.input, &output_dir);
    manifest.write(&manifest_path)?;

    if !options.quiet {
        print_summary(&manifest_path, manifest.total_segments, manifest.degraded_count());
    }

    Ok(())
}

/// Manifest location: `<output_dir>/<stem>_processed.json`.
fn manifest_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string());
    output_dir.join(format!("{stem}_processed.json"))
}

fn print_plan(segments: &[Segment]) {
    println!("{:>4}  {:>9}  {:>9}  {:>8}", "#", "start", "end", "length");
    for segment in segments {
        println!(
            "{:>4}  {:>8.2}s  {:>8.2}s  {:>7.2}s",
            segment.index,
            segment.start_secs,
            segment.end_secs,
            segment.duration_secs()
        );
    }
}

fn print_summary(manifest_path: &Path, total: usize, degraded: usize) {
    if degraded == 0 {
        eprintln!(
            "{} {} segments processed",
            "done:".green(),
            total
        );
    } else {
        eprintln!(
            "{} {} segments processed, {} degraded",
            "done:".yellow(),
            total,
            degraded
        );
    }
    eprintln!("manifest: {}", manifest_path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_path_uses_input_stem() {
        let path = manifest_path(Path::new("/audio/lesson.wav"), Path::new("/out"));
        assert_eq!(path, PathBuf::from("/out/lesson_processed.json"));
    }

    #[test]
    fn default_output_dir_sits_next_to_input() {
        let options = RunOptions {
            input: PathBuf::from("/audio/lesson.wav"),
            ..Default::default()
        };
        // Mirrors the derivation in run_process_command.
        let stem = options.input.file_stem().unwrap().to_string_lossy();
        let derived = options
            .input
            .parent()
            .unwrap()
            .join(format!("{stem}_processed"));
        assert_eq!(derived, PathBuf::from("/audio/lesson_processed"));
    }

    #[test]
    fn invalid_config_fails_before_any_io() {
        let mut config = Config::default();
        config.segmentation.min_segment_secs = -1.0;

        let options = RunOptions {
            input: PathBuf::from("/nonexistent/lesson.wav"),
            ..Default::default()
        };

        // The input does not exist; validation must fail first.
        let error = run_process_command(config, options).unwrap_err();
        assert!(error.to_string().contains("min_segment_secs"));
    }
}
