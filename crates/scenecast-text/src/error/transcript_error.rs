//! The error type returned by transcript and graph draft validation.

use std::fmt;

use crate::error::{Diagnostic, ErrorCode};

/// One or more diagnostics describing why input was rejected.
#[derive(Debug)]
pub struct TranscriptError {
    diagnostics: Vec<Diagnostic>,
}

impl TranscriptError {
    /// Create a new error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns true if any diagnostic carries `code`.
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.diagnostics.iter().any(|d| d.code() == Some(code))
    }
}

impl fmt::Display for TranscriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{}", first)?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for TranscriptError {}

impl From<Diagnostic> for TranscriptError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_single() {
        let err: TranscriptError = Diagnostic::error("empty transcript")
            .with_code(ErrorCode::E001)
            .into();
        assert_eq!(err.to_string(), "error[E001]: empty transcript");
        assert!(err.has_code(ErrorCode::E001));
    }

    #[test]
    fn test_display_multiple() {
        let err = TranscriptError::new(vec![
            Diagnostic::error("first error"),
            Diagnostic::error("second error"),
            Diagnostic::error("third error"),
        ]);
        assert_eq!(err.to_string(), "error: first error (+2 more)");
        assert!(!err.has_code(ErrorCode::E005));
    }
}
