//! bilingue - French audio to bilingual study units
//!
//! Segments a spoken-French recording on natural pauses, then drives each
//! segment through transcription, translation, and English speech synthesis
//! into a single JSON manifest for downstream study apps.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod app;
pub mod audio;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod pipeline;
pub mod segment;
pub mod services;

// Core traits (decode → segment → services → manifest)
pub use audio::codec::{AudioCodec, WavCodec};
pub use audio::waveform::Waveform;
pub use segment::{Segment, SegmentationConfig};
pub use services::synthesizer::Synthesizer;
pub use services::transcriber::Transcriber;
pub use services::translator::Translator;

// Pipeline
pub use pipeline::manifest::{ProcessingManifest, SegmentResult};
pub use pipeline::orchestrator::{CancelToken, Orchestrator};
pub use pipeline::retry::RetryPolicy;

// Error handling
pub use error::{BilingueError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_contains_plus_when_git_hash_present() {
        let ver = version_string();
        // In a git repo build, GIT_HASH is set → expect "0.1.0+<hash>"
        // In CI without git, expect plain "0.1.0"
        if option_env!("GIT_HASH").is_some_and(|h| !h.is_empty()) {
            assert!(
                ver.contains('+'),
                "With GIT_HASH set, version should contain '+', got: {}",
                ver
            );
            let hash_part = ver.split('+').nth(1).unwrap_or("");
            assert_eq!(
                hash_part.len(),
                7,
                "Git hash should be 7 chars, got: {}",
                hash_part
            );
        } else {
            assert_eq!(ver, env!("CARGO_PKG_VERSION"));
        }
    }
}
