//! Error codes for the Scenecast diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Transcript validation errors
//! - `E1xx` - Graph draft validation errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Transcript Errors (E0xx)
    // =========================================================================
    /// Empty transcript.
    ///
    /// The transcript contains no segments.
    E001,

    /// Invalid time range.
    ///
    /// A segment's `endMs` is not strictly greater than its `startMs`.
    E002,

    /// Invalid confidence.
    ///
    /// A segment's confidence is NaN or outside `[0, 1]`.
    E003,

    /// Segments out of order.
    ///
    /// A segment starts before the segment preceding it.
    E004,

    /// No text.
    ///
    /// Every segment's text is empty or whitespace.
    E005,

    // =========================================================================
    // Graph Draft Errors (E1xx)
    // =========================================================================
    /// Empty graph.
    ///
    /// A draft graph has no nodes.
    E100,

    /// Empty node id.
    ///
    /// A node has an empty or whitespace id.
    E101,

    /// Duplicate node id.
    ///
    /// Two nodes share the same id.
    E102,

    /// Unknown edge endpoint.
    ///
    /// An edge references a node id that is not in the graph.
    E103,

    /// Self loop.
    ///
    /// An edge starts and ends at the same node.
    E104,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Transcript errors
            ErrorCode::E001 => "empty transcript",
            ErrorCode::E002 => "invalid time range",
            ErrorCode::E003 => "invalid confidence",
            ErrorCode::E004 => "segments out of order",
            ErrorCode::E005 => "transcript has no text",
            // Graph draft errors
            ErrorCode::E100 => "empty graph",
            ErrorCode::E101 => "empty node id",
            ErrorCode::E102 => "duplicate node id",
            ErrorCode::E103 => "unknown edge endpoint",
            ErrorCode::E104 => "self loop",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
