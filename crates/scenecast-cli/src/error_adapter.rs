//! Error adapter for converting ScenecastError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! A [`scenecast_text::TranscriptError`] lists every problem found in a
//! transcript; each diagnostic is rendered independently. Labels that point
//! at a transcript segment are resolved to the segment's object in the input
//! JSON when the source is available.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use scenecast::ScenecastError;
use scenecast_text::error::{Diagnostic, Location};

/// Adapter for a single transcript diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    /// Transcript JSON, if it could be read
    src: Option<&'a str>,
    /// Byte span of each segment object in `src`
    segments: Vec<SourceSpan>,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: Option<&'a str>) -> Self {
        let segments = src.map(segment_spans).unwrap_or_default();
        Self {
            diag,
            src,
            segments,
        }
    }

    /// Labels that cannot be placed in the source, as "location: message".
    fn unplaced_labels(&self) -> Vec<String> {
        self.diag
            .labels()
            .iter()
            .filter(|label| self.span_of(label.location()).is_none())
            .map(|label| format!("{}: {}", label.location(), label.message()))
            .collect()
    }

    fn span_of(&self, location: &Location) -> Option<SourceSpan> {
        match location {
            Location::Segment(index) => self.segments.get(*index).copied(),
            Location::Node(_) | Location::Edge(_) => None,
        }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        if self.diag.severity().is_warning() {
            Some(miette::Severity::Warning)
        } else {
            Some(miette::Severity::Error)
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let mut lines = self.unplaced_labels();
        if let Some(help) = self.diag.help() {
            lines.push(help.to_string());
        }
        if lines.is_empty() {
            return None;
        }
        Some(Box::new(lines.join("\n")))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        if self.segments.is_empty() {
            return None;
        }
        self.src.as_ref().map(|src| src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels: Vec<LabeledSpan> = self
            .diag
            .labels()
            .iter()
            .filter_map(|label| {
                let span = self.span_of(label.location())?;
                let message = Some(label.message().to_string());
                Some(if label.is_primary() {
                    LabeledSpan::new_primary_with_span(message, span)
                } else {
                    LabeledSpan::new_with_span(message, span)
                })
            })
            .collect();
        if labels.is_empty() {
            return None;
        }
        Some(Box::new(labels.into_iter()))
    }
}

/// Adapter for non-transcript [`ScenecastError`] variants.
pub struct ErrorAdapter<'a>(pub &'a ScenecastError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            ScenecastError::Transcript(_) => "scenecast::transcript",
            ScenecastError::SceneFailed { .. } => "scenecast::scene",
            ScenecastError::Cancelled { .. } => "scenecast::cancelled",
            ScenecastError::Layout(_) => "scenecast::layout",
            ScenecastError::Io(_) => "scenecast::io",
            ScenecastError::Config(_) => "scenecast::config",
            ScenecastError::Json(_) => "scenecast::json",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            ScenecastError::SceneFailed {
                last_completed: Some(stage),
                partial,
                ..
            } => Some(Box::new(format!(
                "last completed stage: {stage}; {} earlier scenes were written",
                partial.len()
            ))),
            ScenecastError::Json(_) => Some(Box::new(
                "expected a JSON array of {\"text\", \"startMs\", \"endMs\", \"confidence\"} objects",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A transcript diagnostic, possibly pointing into the input.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<miette::Severity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Byte spans of the objects directly inside a top-level JSON array.
fn segment_spans(src: &str) -> Vec<SourceSpan> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in src.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' | '{' => {
                depth += 1;
                if ch == '{' && depth == 2 {
                    start = offset;
                }
            }
            ']' | '}' => {
                if ch == '}' && depth == 2 {
                    spans.push(SourceSpan::new(start.into(), offset + 1 - start));
                }
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }
    }
    spans
}

/// Convert a [`ScenecastError`] into a list of reportable errors.
///
/// For [`ScenecastError::Transcript`], this returns one [`Reportable`] for
/// each diagnostic in the error. For other error variants, this returns a
/// single [`Reportable`].
pub fn to_reportables<'a>(err: &'a ScenecastError, src: Option<&'a str>) -> Vec<Reportable<'a>> {
    match err {
        ScenecastError::Transcript(transcript_err) => transcript_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
