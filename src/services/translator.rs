//! Text translation service boundary.

use crate::services::error::{FailureKind, TranslationError, classify_status};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Trait for machine translation between two language codes.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str, source: &str, target: &str)
    -> Result<String, TranslationError>;
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Translator backed by a LibreTranslate-style JSON endpoint.
pub struct HttpTranslator {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpTranslator {
    pub fn new(endpoint: &str) -> Result<Self, TranslationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| TranslationError::Unavailable {
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl Translator for HttpTranslator {
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        let request = TranslateRequest {
            q: text,
            source,
            target,
            format: "text",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| TranslationError::Unavailable {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = format!("HTTP {status}");
            return Err(match classify_status(status.as_u16()) {
                FailureKind::Transient => TranslationError::Unavailable { message },
                FailureKind::Permanent => TranslationError::Rejected { message },
            });
        }

        let body: TranslateResponse =
            response.json().map_err(|e| TranslationError::Rejected {
                message: format!("malformed response: {e}"),
            })?;
        Ok(body.translated_text.trim().to_string())
    }
}

/// Mock translator for testing. Records every input it was asked to
/// translate so tests can assert the orchestrator's skip logic.
pub struct MockTranslator {
    response: Option<String>,
    failure: Option<TranslationError>,
    calls: AtomicUsize,
    inputs: Mutex<Vec<String>>,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self {
            response: None,
            failure: None,
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Return a fixed translation instead of the default echo.
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = Some(response.to_string());
        self
    }

    /// Configure the mock to fail every call with the given error.
    pub fn with_failure(mut self, failure: TranslationError) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Texts that were passed to `translate`, in call order.
    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for MockTranslator {
    fn translate(
        &self,
        text: &str,
        _source: &str,
        _target: &str,
    ) -> Result<String, TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut inputs) = self.inputs.lock() {
            inputs.push(text.to_string());
        }

        if let Some(ref failure) = self.failure {
            return Err(failure.clone());
        }

        match self.response {
            Some(ref response) => Ok(response.clone()),
            // Default: tag the input so tests can see the mapping.
            None => Ok(format!("[en] {text}")),
        }
    }
}
