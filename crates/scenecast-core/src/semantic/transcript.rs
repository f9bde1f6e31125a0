//! Timed transcript input.

use serde::{Deserialize, Serialize};

fn default_confidence() -> f32 {
    1.0
}

/// A unit of recognized speech with start/end times.
///
/// Segments are immutable once built and are consumed in `start_ms` order.
/// Validation of the time range and confidence happens in the segmenter so
/// that every problem in a transcript can be reported at once.
///
/// JSON uses camelCase field names; `confidence` defaults to `1.0`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    text: String,
    start_ms: u64,
    end_ms: u64,
    #[serde(default = "default_confidence")]
    confidence: f32,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start_ms: u64, end_ms: u64, confidence: f32) -> Self {
        Self {
            text: text.into(),
            start_ms,
            end_ms,
            confidence,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    pub fn end_ms(&self) -> u64 {
        self.end_ms
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Duration of the segment, zero when the range is inverted.
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_deserialize_camel_case() {
        let json = r#"{"text": "hello", "startMs": 100, "endMs": 900, "confidence": 0.5}"#;
        let segment: TranscriptSegment = serde_json::from_str(json).unwrap();

        assert_eq!(segment.text(), "hello");
        assert_eq!(segment.start_ms(), 100);
        assert_eq!(segment.end_ms(), 900);
        assert_eq!(segment.confidence(), 0.5);
        assert_eq!(segment.duration_ms(), 800);
    }

    #[test]
    fn test_segment_confidence_defaults_to_one() {
        let json = r#"{"text": "hello", "startMs": 0, "endMs": 10}"#;
        let segment: TranscriptSegment = serde_json::from_str(json).unwrap();
        assert_eq!(segment.confidence(), 1.0);
    }

    #[test]
    fn test_duration_saturates_on_inverted_range() {
        let segment = TranscriptSegment::new("x", 500, 100, 1.0);
        assert_eq!(segment.duration_ms(), 0);
    }
}
