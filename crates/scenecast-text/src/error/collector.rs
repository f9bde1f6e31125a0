//! Collector for accumulating diagnostics during a validation pass.

use crate::error::{Diagnostic, TranscriptError};

/// Accumulates diagnostics so a phase can report every problem at once.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Finish collection.
    ///
    /// Returns `Err` with every diagnostic if any error was emitted.
    /// Warnings are discarded in the success case.
    pub fn finish(self) -> Result<(), TranscriptError> {
        if self.has_errors {
            Err(TranscriptError::new(self.diagnostics))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, Location};

    #[test]
    fn test_collector_new_finish_ok() {
        let collector = DiagnosticCollector::new();
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_collector_emit_warning_finish_ok() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("test warning"));
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_collector_keeps_all_diagnostics() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(
            Diagnostic::error("invalid time range")
                .with_code(ErrorCode::E002)
                .with_label(Location::Segment(1), "here"),
        );
        collector.emit(Diagnostic::warning("test warning"));
        collector.emit(Diagnostic::error("invalid confidence").with_code(ErrorCode::E003));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 3);
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E002));
    }
}
