//! Text-to-speech service boundary.
//!
//! Voice selection is an explicit, deterministic rule over the service's
//! advertised voice catalog rather than runtime probing: exact
//! language-region match first, then the first voice sharing the primary
//! language subtag, else `VoiceUnavailable`.

use crate::services::error::{FailureKind, SynthesisError, classify_status};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// An available synthesis voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    /// Service-specific identifier, e.g. `"en_US-amy-medium"`.
    pub id: String,
    /// BCP-47 style language tag, e.g. `"en-US"` or `"en"`.
    pub language: String,
}

/// Trait for speech synthesis into an audio file.
pub trait Synthesizer: Send + Sync {
    /// Voices the service currently offers.
    fn voices(&self) -> Result<Vec<Voice>, SynthesisError>;

    /// Render `text` with `voice` into an audio file at `dest`.
    fn synthesize(&self, text: &str, voice: &Voice, dest: &Path) -> Result<(), SynthesisError>;
}

/// Deterministic voice selection for a language hint.
///
/// Prefers an exact tag match (case-insensitive), then the first voice
/// whose primary subtag matches the hint's primary subtag.
pub fn select_voice<'a>(
    voices: &'a [Voice],
    language_hint: &str,
) -> Result<&'a Voice, SynthesisError> {
    let hint = language_hint.to_ascii_lowercase();
    if let Some(voice) = voices
        .iter()
        .find(|v| v.language.to_ascii_lowercase() == hint)
    {
        return Ok(voice);
    }

    let primary = hint.split('-').next().unwrap_or(&hint);
    voices
        .iter()
        .find(|v| {
            v.language
                .to_ascii_lowercase()
                .split('-')
                .next()
                .is_some_and(|p| p == primary)
        })
        .ok_or_else(|| SynthesisError::VoiceUnavailable {
            language: language_hint.to_string(),
        })
}

#[derive(Debug, Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
    voice: &'a str,
}

/// Synthesizer backed by an HTTP TTS server exposing `GET /voices` and
/// `POST /synthesize` (audio bytes in the response body).
pub struct HttpSynthesizer {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpSynthesizer {
    pub fn new(base_url: &str) -> Result<Self, SynthesisError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SynthesisError::Unavailable {
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn check_status<T>(
        response: reqwest::blocking::Response,
        parse: impl FnOnce(reqwest::blocking::Response) -> Result<T, SynthesisError>,
    ) -> Result<T, SynthesisError> {
        let status = response.status();
        if !status.is_success() {
            let message = format!("HTTP {status}");
            return Err(match classify_status(status.as_u16()) {
                FailureKind::Transient => SynthesisError::Unavailable { message },
                FailureKind::Permanent => SynthesisError::Rejected { message },
            });
        }
        parse(response)
    }
}

impl Synthesizer for HttpSynthesizer {
    fn voices(&self) -> Result<Vec<Voice>, SynthesisError> {
        let response = self
            .client
            .get(format!("{}/voices", self.base_url))
            .send()
            .map_err(|e| SynthesisError::Unavailable {
                message: e.to_string(),
            })?;

        Self::check_status(response, |r| {
            r.json().map_err(|e| SynthesisError::Rejected {
                message: format!("malformed voice list: {e}"),
            })
        })
    }

    fn synthesize(&self, text: &str, voice: &Voice, dest: &Path) -> Result<(), SynthesisError> {
        let request = SynthesizeRequest {
            text,
            voice: &voice.id,
        };

        let response = self
            .client
            .post(format!("{}/synthesize", self.base_url))
            .json(&request)
            .send()
            .map_err(|e| SynthesisError::Unavailable {
                message: e.to_string(),
            })?;

        let bytes = Self::check_status(response, |r| {
            r.bytes().map_err(|e| SynthesisError::Unavailable {
                message: e.to_string(),
            })
        })?;

        std::fs::write(dest, &bytes).map_err(|e| SynthesisError::Rejected {
            message: format!("cannot write {}: {}", dest.display(), e),
        })
    }
}

/// Mock synthesizer for testing. Writes a marker file at the destination.
pub struct MockSynthesizer {
    voices: Vec<Voice>,
    failure: Option<SynthesisError>,
    calls: AtomicUsize,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self {
            voices: vec![Voice {
                id: "en_US-test".to_string(),
                language: "en-US".to_string(),
            }],
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_voices(mut self, voices: Vec<Voice>) -> Self {
        self.voices = voices;
        self
    }

    /// Configure every synthesize call to fail with the given error.
    pub fn with_failure(mut self, failure: SynthesisError) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Synthesizer for MockSynthesizer {
    fn voices(&self) -> Result<Vec<Voice>, SynthesisError> {
        Ok(self.voices.clone())
    }

    fn synthesize(&self, text: &str, _voice: &Voice, dest: &Path) -> Result<(), SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(ref failure) = self.failure {
            return Err(failure.clone());
        }

        std::fs::write(dest, text.as_bytes()).map_err(|e| SynthesisError::Rejected {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn voice(id: &str, language: &str) -> Voice {
        Voice {
            id: id.to_string(),
            language: language.to_string(),
        }
    }

    #[test]
    fn exact_region_match_wins() {
        let voices = vec![voice("a", "en"), voice("b", "en-GB"), voice("c", "en-US")];
        let selected = select_voice(&voices, "en-GB").unwrap();
        assert_eq!(selected.id, "b");
    }

    #[test]
    fn falls_back_to_first_primary_subtag_match() {
        let voices = vec![voice("a", "fr-FR"), voice("b", "en-AU"), voice("c", "en-US")];
        let selected = select_voice(&voices, "en").unwrap();
        assert_eq!(selected.id, "b");
    }

    #[test]
    fn selection_is_case_insensitive() {
        let voices = vec![voice("a", "EN-us")];
        assert_eq!(select_voice(&voices, "en-US").unwrap().id, "a");
    }

    #[test]
    fn no_match_is_voice_unavailable() {
        let voices = vec![voice("a", "fr-FR")];
        let result = select_voice(&voices, "en");
        assert!(matches!(
            result,
            Err(SynthesisError::VoiceUnavailable { ref language }) if language == "en"
        ));
    }

    #[test]
    fn empty_catalog_is_voice_unavailable() {
        assert!(select_voice(&[], "en").is_err());
    }

    #[test]
    fn mock_writes_destination_file() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.mp3");

        let synthesizer = MockSynthesizer::new();
        let voices = synthesizer.voices().unwrap();
        let selected = select_voice(&voices, "en").unwrap();
        synthesizer.synthesize("hello", selected, &dest).unwrap();

        assert!(dest.exists());
        assert_eq!(synthesizer.calls(), 1);
    }

    #[test]
    fn mock_failure_leaves_no_file() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.mp3");

        let synthesizer = MockSynthesizer::new().with_failure(SynthesisError::Unavailable {
            message: "down".to_string(),
        });
        let result = synthesizer.synthesize("hello", &voice("a", "en"), &dest);

        assert!(result.is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn voice_deserializes_from_service_json() {
        let parsed: Vec<Voice> =
            serde_json::from_str(r#"[{"id": "en_US-amy-medium", "language": "en-US"}]"#).unwrap();
        assert_eq!(parsed[0].id, "en_US-amy-medium");
        assert_eq!(parsed[0].language, "en-US");
    }
}
