//! Command-line interface for bilingue
//!
//! Provides argument parsing using clap derive macros.

use clap::Parser;
use std::path::PathBuf;

/// French audio to bilingual study units
#[derive(Parser, Debug)]
#[command(
    name = "bilingue",
    version,
    about = "Segment a spoken-French recording and build bilingual study units"
)]
pub struct Cli {
    /// Input audio file to process
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output directory (default: <input stem>_processed next to the input)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Path to configuration file (default: ./bilingue.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Maximum segment duration. Examples: 20s, 1m, 1m30s
    #[arg(long, value_name = "DURATION", value_parser = parse_secs)]
    pub max_segment: Option<f64>,

    /// Minimum segment duration. Examples: 3s, 500ms
    #[arg(long, value_name = "DURATION", value_parser = parse_secs)]
    pub min_segment: Option<f64>,

    /// Number of concurrent segment workers
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Print the planned segments without calling any service
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress progress output (warnings still print)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Parse a duration string into seconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers
/// (seconds), single-unit (`30s`, `500ms`), and compound (`1m30s`).
fn parse_secs(s: &str) -> Result<f64, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<f64>() {
        return Ok(secs);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs_f64())
        .map_err(|e| e.to_string())
}
