//! Bounded retry with exponential backoff for service calls.

use crate::defaults;
use crate::services::error::{FailureKind, TaggedFailure};
use std::time::Duration;

/// Retry schedule for transient service failures.
///
/// The policy is a pure function of the failure's [`FailureKind`] tag:
/// transient failures are retried up to `max_attempts` total attempts with a
/// doubling backoff, permanent failures return immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Sleep before the first retry; doubles after each.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::RETRY_ATTEMPTS,
            initial_backoff: defaults::RETRY_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
        }
    }

    /// Policy with no sleeping, for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    pub fn retry<T, E, F>(&self, mut op: F) -> Result<T, E>
    where
        E: TaggedFailure,
        F: FnMut() -> Result<T, E>,
    {
        let mut backoff = self.initial_backoff;
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(error) if error.kind() == FailureKind::Permanent => return Err(error),
                Err(error) => {
                    if attempt >= self.max_attempts.max(1) {
                        return Err(error);
                    }
                    if !backoff.is_zero() {
                        std::thread::sleep(backoff);
                        backoff *= 2;
                    }
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::error::RecognitionError;
    use std::cell::Cell;

    fn transient() -> RecognitionError {
        RecognitionError::Unavailable {
            message: "timeout".to_string(),
        }
    }

    fn permanent() -> RecognitionError {
        RecognitionError::Rejected {
            message: "bad request".to_string(),
        }
    }

    #[test]
    fn succeeds_first_try() {
        let calls = Cell::new(0);
        let result: Result<i32, RecognitionError> = RetryPolicy::immediate(3).retry(|| {
            calls.set(calls.get() + 1);
            Ok(42)
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn retries_transient_until_success() {
        let calls = Cell::new(0);
        let result: Result<&str, RecognitionError> = RetryPolicy::immediate(3).retry(|| {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(transient())
            } else {
                Ok("done")
            }
        });
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn exhausts_attempts_on_persistent_transient_failure() {
        let calls = Cell::new(0);
        let result: Result<(), RecognitionError> = RetryPolicy::immediate(3).retry(|| {
            calls.set(calls.get() + 1);
            Err(transient())
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn permanent_failure_is_not_retried() {
        let calls = Cell::new(0);
        let result: Result<(), RecognitionError> = RetryPolicy::immediate(5).retry(|| {
            calls.set(calls.get() + 1);
            Err(permanent())
        });
        assert!(matches!(result, Err(RecognitionError::Rejected { .. })));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let calls = Cell::new(0);
        let result: Result<(), RecognitionError> = RetryPolicy::immediate(0).retry(|| {
            calls.set(calls.get() + 1);
            Err(transient())
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
