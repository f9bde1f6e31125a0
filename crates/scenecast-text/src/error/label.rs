//! Labeled locations for diagnostic messages.
//!
//! Transcript input has no single source file, so a label points at the
//! element a problem was found in: a transcript segment, a node or an edge.

use std::fmt;

/// The element a [`Label`] refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// A transcript segment, by zero-based position in the input.
    Segment(usize),
    /// A graph node, by id.
    Node(String),
    /// A graph edge, by position in the edge list.
    Edge(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Segment(index) => write!(f, "segment #{index}"),
            Location::Node(id) => write!(f, "node `{id}`"),
            Location::Edge(index) => write!(f, "edge #{index}"),
        }
    }
}

/// A labeled location.
///
/// - **Primary labels** mark where a problem was detected.
/// - **Secondary labels** add context, such as "previous segment".
#[derive(Debug, Clone)]
pub struct Label {
    location: Location,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
            is_primary: false,
        }
    }

    /// Get the location this label applies to.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a primary label.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Check if this is a secondary label.
    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}
