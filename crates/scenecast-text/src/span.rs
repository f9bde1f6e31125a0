//! Byte ranges into transcript text.

use std::ops::Range;

/// A half-open byte range `start..end` into a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a byte range
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }

    /// Get the start offset of the span
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end offset of the span
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Create a union of two spans (encompassing both)
    pub fn union(&self, other: Span) -> Span {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Slice `text` with this span.
    ///
    /// Returns an empty string if the span does not fall on character
    /// boundaries of `text`.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.start..self.end).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_union() {
        let a = Span::new(2..5);
        let b = Span::new(8..12);
        let u = a.union(b);
        assert_eq!(u.start(), 2);
        assert_eq!(u.end(), 12);
        assert_eq!(u.len(), 10);
    }

    #[test]
    fn test_span_slice() {
        let text = "option A versus option B";
        assert_eq!(Span::new(7..8).slice(text), "A");
        assert_eq!(Span::new(100..120).slice(text), "");
    }
}
