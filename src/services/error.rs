//! Error types for the recognition, translation, and synthesis services.
//!
//! Every failure carries a [`FailureKind`] so the retry policy is a pure
//! function of the tag: transient failures are retried with backoff,
//! permanent ones degrade the segment's field immediately.

use thiserror::Error;

/// Whether a service failure is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network/timeout/overload class — retry with backoff.
    Transient,
    /// The request itself cannot succeed — degrade immediately.
    Permanent,
}

/// A failure that knows whether it is retryable.
pub trait TaggedFailure {
    fn kind(&self) -> FailureKind;
}

/// Speech-recognition failures.
#[derive(Error, Debug, Clone)]
pub enum RecognitionError {
    #[error("Recognition service unavailable: {message}")]
    Unavailable { message: String },

    #[error("Audio could not be recognized: {message}")]
    Unintelligible { message: String },

    #[error("Recognition request rejected: {message}")]
    Rejected { message: String },
}

impl TaggedFailure for RecognitionError {
    fn kind(&self) -> FailureKind {
        match self {
            RecognitionError::Unavailable { .. } => FailureKind::Transient,
            RecognitionError::Unintelligible { .. } | RecognitionError::Rejected { .. } => {
                FailureKind::Permanent
            }
        }
    }
}

/// Machine-translation failures.
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    #[error("Translation service unavailable: {message}")]
    Unavailable { message: String },

    #[error("Translation request rejected: {message}")]
    Rejected { message: String },
}

impl TaggedFailure for TranslationError {
    fn kind(&self) -> FailureKind {
        match self {
            TranslationError::Unavailable { .. } => FailureKind::Transient,
            TranslationError::Rejected { .. } => FailureKind::Permanent,
        }
    }
}

/// Speech-synthesis failures.
#[derive(Error, Debug, Clone)]
pub enum SynthesisError {
    #[error("Synthesis service unavailable: {message}")]
    Unavailable { message: String },

    #[error("Synthesis request rejected: {message}")]
    Rejected { message: String },

    #[error("No synthesis voice available for language '{language}'")]
    VoiceUnavailable { language: String },
}

impl TaggedFailure for SynthesisError {
    fn kind(&self) -> FailureKind {
        match self {
            SynthesisError::Unavailable { .. } => FailureKind::Transient,
            SynthesisError::Rejected { .. } | SynthesisError::VoiceUnavailable { .. } => {
                FailureKind::Permanent
            }
        }
    }
}

/// Classify an HTTP status: overload and server-side faults are transient,
/// other client errors are permanent.
pub fn classify_status(status: u16) -> FailureKind {
    match status {
        429 => FailureKind::Transient,
        500..=599 => FailureKind::Transient,
        _ => FailureKind::Permanent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognition_kinds() {
        let transient = RecognitionError::Unavailable {
            message: "timeout".to_string(),
        };
        assert_eq!(transient.kind(), FailureKind::Transient);

        let permanent = RecognitionError::Unintelligible {
            message: "no speech".to_string(),
        };
        assert_eq!(permanent.kind(), FailureKind::Permanent);
    }

    #[test]
    fn translation_kinds() {
        let transient = TranslationError::Unavailable {
            message: "connect refused".to_string(),
        };
        assert_eq!(transient.kind(), FailureKind::Transient);

        let permanent = TranslationError::Rejected {
            message: "unsupported pair".to_string(),
        };
        assert_eq!(permanent.kind(), FailureKind::Permanent);
    }

    #[test]
    fn voice_unavailable_is_permanent() {
        let error = SynthesisError::VoiceUnavailable {
            language: "en".to_string(),
        };
        assert_eq!(error.kind(), FailureKind::Permanent);
        assert_eq!(
            error.to_string(),
            "No synthesis voice available for language 'en'"
        );
    }

    #[test]
    fn status_classification() {
        assert_eq!(classify_status(429), FailureKind::Transient);
        assert_eq!(classify_status(500), FailureKind::Transient);
        assert_eq!(classify_status(503), FailureKind::Transient);
        assert_eq!(classify_status(400), FailureKind::Permanent);
        assert_eq!(classify_status(404), FailureKind::Permanent);
        assert_eq!(classify_status(422), FailureKind::Permanent);
    }
}
