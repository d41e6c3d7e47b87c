//! Run-time reporting seam.
//!
//! Per-segment degradations are reported, never fatal; the orchestrator
//! talks to this trait so tests can run silently and the binary can print
//! to stderr.

/// Sink for progress notes and degradation warnings.
pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Prefixed stderr reporter used by the binary.
#[derive(Debug, Default)]
pub struct LogReporter {
    quiet: bool,
}

impl LogReporter {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Suppress info lines; warnings still print.
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl Reporter for LogReporter {
    fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("bilingue: {message}");
        }
    }

    fn warn(&self, message: &str) {
        eprintln!("bilingue: warning: {message}");
    }
}

/// Discards everything. Default for library use and tests.
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporters_are_object_safe() {
        let reporters: Vec<Box<dyn Reporter>> = vec![
            Box::new(LogReporter::quiet()),
            Box::new(NullReporter),
        ];
        for reporter in &reporters {
            reporter.info("segment 1 done");
            reporter.warn("segment 2 degraded");
        }
    }
}
