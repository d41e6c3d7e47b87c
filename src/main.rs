use anyhow::Result;
use bilingue::app::{RunOptions, run_process_command};
use bilingue::cli::Cli;
use bilingue::config::Config;
use clap::Parser;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    run_process_command(
        config,
        RunOptions {
            input: cli.input,
            output: cli.output,
            max_segment: cli.max_segment,
            min_segment: cli.min_segment,
            workers: cli.workers,
            dry_run: cli.dry_run,
            quiet: cli.quiet,
        },
    )
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config) — must exist
/// 2. ./bilingue.toml if present
/// 3. Built-in defaults
///
/// Environment variable overrides apply last.
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        Config::load_or_default(Path::new("bilingue.toml"))?
    };

    Ok(config.with_env_overrides())
}
