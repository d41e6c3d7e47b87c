//! Speech-to-text service boundary.

use crate::services::error::{FailureKind, RecognitionError, classify_status};
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

/// Trait for speech-to-text transcription of an exported audio clip.
///
/// Allows swapping implementations (HTTP-backed service vs mock).
pub trait Transcriber: Send + Sync {
    /// Transcribe the clip at `clip` to text in the hinted language.
    fn transcribe(&self, clip: &Path, language_hint: &str) -> Result<String, RecognitionError>;
}

#[derive(Debug, Deserialize)]
struct InferenceResponse {
    text: String,
}

/// Transcriber backed by a whisper-server style HTTP endpoint that accepts
/// multipart WAV uploads and returns `{"text": ...}`.
pub struct HttpTranscriber {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpTranscriber {
    pub fn new(endpoint: &str) -> Result<Self, RecognitionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| RecognitionError::Unavailable {
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl Transcriber for HttpTranscriber {
    fn transcribe(&self, clip: &Path, language_hint: &str) -> Result<String, RecognitionError> {
        let bytes = std::fs::read(clip).map_err(|e| RecognitionError::Rejected {
            message: format!("cannot read clip {}: {}", clip.display(), e),
        })?;

        let file_name = clip
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "clip.wav".to_string());

        let part = reqwest::blocking::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| RecognitionError::Rejected {
                message: e.to_string(),
            })?;
        let form = reqwest::blocking::multipart::Form::new()
            .part("file", part)
            .text("language", language_hint.to_string())
            .text("response_format", "json");

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(|e| RecognitionError::Unavailable {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = format!("HTTP {status}");
            return Err(match classify_status(status.as_u16()) {
                FailureKind::Transient => RecognitionError::Unavailable { message },
                FailureKind::Permanent => RecognitionError::Rejected { message },
            });
        }

        let body: InferenceResponse =
            response.json().map_err(|e| RecognitionError::Rejected {
                message: format!("malformed response: {e}"),
            })?;
        Ok(body.text.trim().to_string())
    }
}

/// Mock transcriber for testing.
pub struct MockTranscriber {
    response: String,
    failure: Option<RecognitionError>,
    transient_failures: AtomicU32,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockTranscriber {
    pub fn new() -> Self {
        Self {
            response: "bonjour tout le monde".to_string(),
            failure: None,
            transient_failures: AtomicU32::new(0),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Configure the mock to return a specific transcript.
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail every call with the given error.
    pub fn with_failure(mut self, failure: RecognitionError) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Fail the first `count` calls with a transient error, then succeed.
    pub fn with_transient_failures(self, count: u32) -> Self {
        self.transient_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Sleep before answering, to shuffle completion order in pool tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of transcribe calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&self, _clip: &Path, _language_hint: &str) -> Result<String, RecognitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        if let Some(ref failure) = self.failure {
            return Err(failure.clone());
        }

        let remaining = self.transient_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(RecognitionError::Unavailable {
                message: "mock transient failure".to_string(),
            });
        }

        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_configured_response() {
        let transcriber = MockTranscriber::new().with_response("c'est la vie");
        let result = transcriber.transcribe(Path::new("clip.wav"), "fr");
        assert_eq!(result.unwrap(), "c'est la vie");
        assert_eq!(transcriber.calls(), 1);
    }

    #[test]
    fn mock_fails_when_configured() {
        let transcriber = MockTranscriber::new().with_failure(RecognitionError::Unintelligible {
            message: "mumbling".to_string(),
        });
        let result = transcriber.transcribe(Path::new("clip.wav"), "fr");
        assert!(matches!(
            result,
            Err(RecognitionError::Unintelligible { .. })
        ));
    }

    #[test]
    fn mock_transient_failures_then_success() {
        let transcriber = MockTranscriber::new()
            .with_response("ça marche")
            .with_transient_failures(2);

        assert!(matches!(
            transcriber.transcribe(Path::new("clip.wav"), "fr"),
            Err(RecognitionError::Unavailable { .. })
        ));
        assert!(matches!(
            transcriber.transcribe(Path::new("clip.wav"), "fr"),
            Err(RecognitionError::Unavailable { .. })
        ));
        assert_eq!(
            transcriber.transcribe(Path::new("clip.wav"), "fr").unwrap(),
            "ça marche"
        );
        assert_eq!(transcriber.calls(), 3);
    }

    #[test]
    fn transcriber_trait_is_object_safe() {
        let transcriber: Box<dyn Transcriber> =
            Box::new(MockTranscriber::new().with_response("boxed"));
        assert_eq!(
            transcriber.transcribe(Path::new("clip.wav"), "fr").unwrap(),
            "boxed"
        );
    }
}
