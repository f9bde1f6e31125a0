//! Error and diagnostic system for transcript processing.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled locations for rich error context
//! - Severity levels
//! - Diagnostic collector for accumulating every problem in one pass
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with an optional error code, labeled
//! [`Location`]s (transcript segments, graph nodes or edges), and help text.
//! Multiple diagnostics are wrapped in [`TranscriptError`].
//!
//! # Example
//!
//! ```
//! # use scenecast_text::error::{Diagnostic, ErrorCode, Location};
//!
//! let diag = Diagnostic::error("segment ends before it starts")
//!     .with_code(ErrorCode::E002)
//!     .with_label(Location::Segment(3), "endMs 1200 <= startMs 1500")
//!     .with_help("every segment needs endMs > startMs");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod severity;
mod transcript_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::{Label, Location};
pub use severity::Severity;
pub use transcript_error::TranscriptError;
