//! Transcript segmentation into scene shells.
//!
//! Segments are accumulated greedily into scenes until a discourse boundary
//! (an opening marker such as "next" or "finally", or a long pause) or the
//! maximum scene length is reached. Undersized scenes are then merged into a
//! neighbour. Scenes are contiguous: each one ends where the next begins, so
//! together they cover the whole transcript.

use std::ops::Range;

use log::{debug, info};
use scenecast_core::semantic::TranscriptSegment;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, Location, TranscriptError},
    lexer,
};

/// Words or phrases that open a new scene when they start a segment.
const DISCOURSE_MARKERS: &[&str] = &[
    "next",
    "first",
    "firstly",
    "second",
    "secondly",
    "third",
    "thirdly",
    "finally",
    "lastly",
    "now",
    "another",
    "moving on",
    "in conclusion",
    "to conclude",
    "to summarize",
    "in summary",
    "on the other hand",
    "let's move on",
];

/// Scene length limits and the pause threshold, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    pub max_scene_ms: u64,
    pub min_scene_ms: u64,
    pub pause_gap_ms: u64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_scene_ms: 30_000,
            min_scene_ms: 5_000,
            pause_gap_ms: 2_000,
        }
    }
}

/// A scene before classification, extraction and layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneShell {
    pub index: usize,
    /// Concatenated text of the scene's segments.
    pub text_span: String,
    pub start_ms: u64,
    pub end_ms: u64,
    /// Positions of the source segments in the transcript.
    pub segments: Range<usize>,
}

impl SceneShell {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}

/// Splits transcripts into scene shells.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: SegmenterConfig,
}

impl Segmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// Segments a transcript.
    ///
    /// # Errors
    ///
    /// Returns a [`TranscriptError`] listing every problem found when the
    /// transcript is empty, has no text, has an invalid time range or
    /// confidence, or is not sorted by start time.
    pub fn segment(
        &self,
        transcript: &[TranscriptSegment],
    ) -> Result<Vec<SceneShell>, TranscriptError> {
        validate(transcript)?;

        let groups = self.accumulate(transcript);
        let groups = self.merge_undersized(transcript, groups);

        let shells: Vec<SceneShell> = groups
            .iter()
            .enumerate()
            .map(|(index, range)| {
                let (start_ms, end_ms) = group_bounds(transcript, &groups, index);
                let text_span = transcript[range.clone()]
                    .iter()
                    .map(|segment| segment.text().trim())
                    .filter(|text| !text.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                SceneShell {
                    index,
                    text_span,
                    start_ms,
                    end_ms,
                    segments: range.clone(),
                }
            })
            .collect();

        info!(
            segment_count = transcript.len(),
            scene_count = shells.len();
            "Segmented transcript"
        );
        Ok(shells)
    }

    fn accumulate(&self, transcript: &[TranscriptSegment]) -> Vec<Range<usize>> {
        let mut groups = Vec::new();
        let mut group_start = 0;

        for i in 1..transcript.len() {
            let previous = &transcript[i - 1];
            let segment = &transcript[i];

            let accumulated = previous
                .end_ms()
                .saturating_sub(transcript[group_start].start_ms());
            let pause = segment.start_ms().saturating_sub(previous.end_ms());

            let boundary = if accumulated >= self.config.max_scene_ms {
                Some("max_length")
            } else if pause > self.config.pause_gap_ms {
                Some("pause")
            } else if opens_with_marker(segment.text()) {
                Some("marker")
            } else {
                None
            };

            if let Some(reason) = boundary {
                debug!(segment = i, reason; "Scene boundary");
                groups.push(group_start..i);
                group_start = i;
            }
        }
        groups.push(group_start..transcript.len());
        groups
    }

    fn merge_undersized(
        &self,
        transcript: &[TranscriptSegment],
        mut groups: Vec<Range<usize>>,
    ) -> Vec<Range<usize>> {
        while groups.len() > 1 {
            let undersized = (0..groups.len()).find(|&index| {
                let (start, end) = group_bounds(transcript, &groups, index);
                end - start < self.config.min_scene_ms
            });
            let Some(index) = undersized else {
                break;
            };

            // The first scene has no predecessor, so it absorbs its successor
            let (keep, absorbed) = if index == 0 { (0, 1) } else { (index - 1, index) };
            let absorbed_range = groups.remove(absorbed);
            groups[keep].end = absorbed_range.end;
            debug!(scene = index; "Merged undersized scene");
        }
        groups
    }
}

/// Start and end of group `index`, where a group ends where the next begins
/// and the last one ends at the latest segment end.
fn group_bounds(
    transcript: &[TranscriptSegment],
    groups: &[Range<usize>],
    index: usize,
) -> (u64, u64) {
    let start = transcript[groups[index].start].start_ms();
    let end = match groups.get(index + 1) {
        Some(next) => transcript[next.start].start_ms(),
        None => transcript
            .iter()
            .map(TranscriptSegment::end_ms)
            .max()
            .unwrap_or(start),
    };
    (start, end.max(start))
}

fn opens_with_marker(text: &str) -> bool {
    let words = lexer::lowercase_words(text);
    DISCOURSE_MARKERS.iter().any(|marker| {
        let parts: Vec<&str> = marker.split(' ').collect();
        words.len() >= parts.len() && words.iter().zip(&parts).all(|(word, part)| word == part)
    })
}

fn validate(transcript: &[TranscriptSegment]) -> Result<(), TranscriptError> {
    let mut collector = DiagnosticCollector::new();

    if transcript.is_empty() {
        collector.emit(
            Diagnostic::error("transcript contains no segments")
                .with_code(ErrorCode::E001)
                .with_help("provide at least one timed segment"),
        );
        return collector.finish();
    }

    for (index, segment) in transcript.iter().enumerate() {
        if segment.end_ms() <= segment.start_ms() {
            collector.emit(
                Diagnostic::error("segment does not end after it starts")
                    .with_code(ErrorCode::E002)
                    .with_label(
                        Location::Segment(index),
                        format!(
                            "startMs {} / endMs {}",
                            segment.start_ms(),
                            segment.end_ms()
                        ),
                    )
                    .with_help("every segment needs endMs > startMs"),
            );
        }

        let confidence = segment.confidence();
        if confidence.is_nan() || !(0.0..=1.0).contains(&confidence) {
            collector.emit(
                Diagnostic::error("segment confidence is outside [0, 1]")
                    .with_code(ErrorCode::E003)
                    .with_label(Location::Segment(index), format!("confidence {confidence}")),
            );
        }

        if index > 0 {
            let previous = &transcript[index - 1];
            if segment.start_ms() < previous.start_ms() {
                collector.emit(
                    Diagnostic::error("segments are not sorted by start time")
                        .with_code(ErrorCode::E004)
                        .with_label(
                            Location::Segment(index),
                            format!("starts at {} ms", segment.start_ms()),
                        )
                        .with_secondary_label(
                            Location::Segment(index - 1),
                            format!("previous segment starts at {} ms", previous.start_ms()),
                        )
                        .with_help("sort segments by startMs"),
                );
            }
        }
    }

    if transcript.iter().all(|segment| segment.text().trim().is_empty()) {
        collector.emit(
            Diagnostic::error("transcript has no text")
                .with_code(ErrorCode::E005)
                .with_help("at least one segment must contain words"),
        );
    }

    collector.finish()
}
