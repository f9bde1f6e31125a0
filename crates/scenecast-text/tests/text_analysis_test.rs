use proptest::prelude::*;
use scenecast_core::semantic::{Archetype, ExtractionSource, TranscriptSegment};
use scenecast_text::{
    Segmenter, SegmenterConfig, classify, extract, error::ErrorCode, scorer::keyword_table,
};

fn segment(text: &str, start_ms: u64, end_ms: u64) -> TranscriptSegment {
    TranscriptSegment::new(text, start_ms, end_ms, 0.95)
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_sequential_steps_become_flow() {
    let text = "First do A, then B, finally C.";
    let result = classify(text);
    assert_eq!(result.archetype, Archetype::Flow);
    assert!(result.confidence > 0.6);

    let extraction = extract(text, result.archetype);
    assert_eq!(extraction.source, ExtractionSource::RuleBased);
    assert_eq!(extraction.draft.nodes.len(), 3);
}

#[test]
fn test_reporting_lines_become_tree() {
    let text = "The CEO oversees VPs who manage directors and teams.";
    let result = classify(text);
    assert_eq!(result.archetype, Archetype::Tree);

    let draft = extract(text, result.archetype).draft;
    assert!(draft.nodes.len() >= 4);

    let root = &draft.nodes[0];
    assert_eq!(root.label, "CEO");
    for node in &draft.nodes[1..] {
        let parents = draft.edges.iter().filter(|edge| edge.to == node.id).count();
        assert_eq!(parents, 1, "{} should have exactly one parent", node.label);
    }
    assert!(draft.edges.iter().all(|edge| edge.to != root.id));
}

#[test]
fn test_comparison_becomes_matrix() {
    let text = "We compare option A versus option B across cost and features criteria.";
    let result = classify(text);
    assert_eq!(result.archetype, Archetype::Matrix);

    let labels: Vec<_> = extract(text, result.archetype)
        .draft
        .nodes
        .into_iter()
        .map(|node| node.label)
        .collect();
    assert!(labels.contains(&"Option A".to_string()));
    assert!(labels.contains(&"Cost".to_string()));
}

#[test]
fn test_primary_keywords_classify_back_to_their_archetype() {
    for archetype in Archetype::ALL {
        let text = keyword_table(archetype).primary.join(" ");
        let result = classify(&text);
        assert!(!result.low_confidence, "{archetype} fell back");
        assert_eq!(result.archetype, archetype, "text: {text}");
    }
}

// =============================================================================
// Segmentation
// =============================================================================

#[test]
fn test_single_short_segment_yields_one_scene() {
    let transcript = vec![segment("Just a quick note.", 0, 1_200)];
    let shells = Segmenter::default().segment(&transcript).unwrap();
    assert_eq!(shells.len(), 1);
    assert_eq!(shells[0].start_ms, 0);
    assert_eq!(shells[0].end_ms, 1_200);
}

#[test]
fn test_marker_and_pause_boundaries() {
    let transcript = vec![
        segment("Our process starts with intake.", 0, 6_000),
        segment("Intake feeds review.", 6_000, 12_000),
        segment("Next, the org chart.", 12_500, 18_000),
        segment("The CEO oversees VPs.", 18_000, 24_000),
        segment("Years later the company changed.", 27_000, 33_000),
    ];
    let shells = Segmenter::default().segment(&transcript).unwrap();
    let ranges: Vec<_> = shells.iter().map(|shell| shell.segments.clone()).collect();
    assert_eq!(ranges, vec![0..2, 2..4, 4..5]);
    assert_eq!(shells[1].end_ms, 27_000);
}

#[test]
fn test_invalid_transcript_reports_every_problem() {
    let transcript = vec![
        segment("fine", 1_000, 2_000),
        TranscriptSegment::new("bad confidence", 2_000, 3_000, 1.5),
        segment("backwards", 500, 400),
    ];
    let err = Segmenter::default().segment(&transcript).unwrap_err();
    assert!(err.has_code(ErrorCode::E002));
    assert!(err.has_code(ErrorCode::E003));
    assert!(err.has_code(ErrorCode::E004));
    assert_eq!(err.diagnostics().len(), 3);
}

// =============================================================================
// Properties
// =============================================================================

const WORDS: &[&str] = &[
    "then the process continues",
    "next we look at the team",
    "finally it loops back",
    "in 1998 the company began",
    "option A versus option B",
];

fn transcript_strategy() -> impl Strategy<Value = Vec<TranscriptSegment>> {
    prop::collection::vec((1u64..8_000, 0u64..4_000, 0..WORDS.len()), 1..40).prop_map(|parts| {
        let mut clock = 0;
        parts
            .into_iter()
            .map(|(duration, gap, word)| {
                let start = clock + gap;
                clock = start + duration;
                segment(WORDS[word], start, clock)
            })
            .collect()
    })
}

fn check_scenes_are_contiguous(transcript: &[TranscriptSegment]) {
    let config = SegmenterConfig::default();
    let shells = Segmenter::new(config.clone()).segment(transcript).unwrap();

    assert!(!shells.is_empty());
    assert_eq!(shells[0].start_ms, transcript[0].start_ms());
    assert_eq!(shells[0].segments.start, 0);

    let last = shells.last().unwrap();
    let end = transcript.iter().map(TranscriptSegment::end_ms).max().unwrap();
    assert_eq!(last.end_ms, end);
    assert_eq!(last.segments.end, transcript.len());

    for pair in shells.windows(2) {
        assert_eq!(pair[0].end_ms, pair[1].start_ms);
        assert_eq!(pair[0].segments.end, pair[1].segments.start);
    }
    if shells.len() > 1 {
        for shell in &shells {
            assert!(shell.duration_ms() >= config.min_scene_ms);
        }
    }
    for (index, shell) in shells.iter().enumerate() {
        assert_eq!(shell.index, index);
    }
}

fn check_classification_is_bounded(text: &str) {
    let result = classify(text);
    assert!((0.0..=0.95).contains(&result.confidence));
    assert!(result.score_breakdown.iter().all(|(_, score)| *score >= 0.0));
}

fn check_extraction_is_never_empty(text: &str, archetype: Archetype) {
    let draft = extract(text, archetype).draft;
    assert!(draft.nodes.len() >= 2);
    assert!(draft.nodes.len() <= 12);
    assert!(draft.validate().is_ok());
}

proptest! {
    #[test]
    fn prop_scenes_are_contiguous(transcript in transcript_strategy()) {
        check_scenes_are_contiguous(&transcript);
    }

    #[test]
    fn prop_classification_is_bounded(text in "[A-Za-z ,.]{0,120}") {
        check_classification_is_bounded(&text);
    }

    #[test]
    fn prop_extraction_is_never_empty(
        text in "[A-Za-z0-9 ,.]{0,160}",
        archetype in prop::sample::select(Archetype::ALL.to_vec()),
    ) {
        check_extraction_is_never_empty(&text, archetype);
    }
}
