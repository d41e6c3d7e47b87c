use crate::defaults;
use crate::error::{BilingueError, Result};
use crate::segment::SegmentationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub segmentation: SegmentationConfig,
    pub pipeline: PipelineConfig,
    pub services: ServicesConfig,
}

/// Worker pool and retry configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Concurrency cap for segment processing.
    pub workers: usize,
    /// Total attempts per service call, including the first.
    pub retry_attempts: u32,
    /// Initial backoff between retries, milliseconds. Doubles per attempt.
    pub retry_backoff_ms: u64,
}

/// External service endpoints and language pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServicesConfig {
    pub transcription_url: String,
    pub translation_url: String,
    pub synthesis_url: String,
    pub source_language: String,
    pub target_language: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: defaults::WORKERS,
            retry_attempts: defaults::RETRY_ATTEMPTS,
            retry_backoff_ms: defaults::RETRY_BACKOFF.as_millis() as u64,
        }
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            transcription_url: defaults::TRANSCRIPTION_URL.to_string(),
            translation_url: defaults::TRANSLATION_URL.to_string(),
            synthesis_url: defaults::SYNTHESIS_URL.to_string(),
            source_language: defaults::SOURCE_LANGUAGE.to_string(),
            target_language: defaults::TARGET_LANGUAGE.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is missing or contains invalid TOML.
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BilingueError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                BilingueError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file, or return defaults if it doesn't exist
    ///
    /// Only a missing file falls back to defaults; invalid TOML is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(BilingueError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - BILINGUE_TRANSCRIPTION_URL → services.transcription_url
    /// - BILINGUE_TRANSLATION_URL → services.translation_url
    /// - BILINGUE_SYNTHESIS_URL → services.synthesis_url
    /// - BILINGUE_WORKERS → pipeline.workers
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("BILINGUE_TRANSCRIPTION_URL")
            && !url.is_empty()
        {
            self.services.transcription_url = url;
        }

        if let Ok(url) = std::env::var("BILINGUE_TRANSLATION_URL")
            && !url.is_empty()
        {
            self.services.translation_url = url;
        }

        if let Ok(url) = std::env::var("BILINGUE_SYNTHESIS_URL")
            && !url.is_empty()
        {
            self.services.synthesis_url = url;
        }

        if let Ok(workers) = std::env::var("BILINGUE_WORKERS")
            && let Ok(workers) = workers.parse::<usize>()
        {
            self.pipeline.workers = workers;
        }

        self
    }

    /// Validate everything that can fail before any file I/O starts.
    pub fn validate(&self) -> Result<()> {
        self.segmentation.validate()?;
        if self.pipeline.workers == 0 {
            return Err(BilingueError::Configuration {
                key: "workers".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
