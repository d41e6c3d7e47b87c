//! External service boundaries: recognition, translation, and synthesis.
//!
//! Each service is a trait with an HTTP-backed implementation and a mock
//! for tests. All service errors carry a [`FailureKind`] tag so the
//! pipeline retry policy never inspects error internals.

pub mod error;
pub mod synthesizer;
pub mod transcriber;
pub mod translator;

pub use error::{FailureKind, RecognitionError, SynthesisError, TaggedFailure, TranslationError};
pub use synthesizer::{HttpSynthesizer, MockSynthesizer, Synthesizer, Voice, select_voice};
pub use transcriber::{HttpTranscriber, MockTranscriber, Transcriber};
pub use translator::{HttpTranslator, MockTranslator, Translator};
