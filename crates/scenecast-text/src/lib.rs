//! # Scenecast Text
//!
//! Text analysis for Scenecast: everything between a timed transcript and an
//! unpositioned scene graph.
//!
//! - [`Segmenter`] splits a transcript into contiguous scene shells
//! - [`Classifier`] picks a diagram archetype from weighted keyword scores
//! - [`Extractor`] finds entities and relations and shapes them into a
//!   [`GraphDraft`] for the archetype
//!
//! ## Usage
//!
//! ```
//! # use scenecast_core::semantic::{Archetype, TranscriptSegment};
//! # use scenecast_text::{Segmenter, classify, extract, TranscriptError};
//!
//! fn main() -> Result<(), TranscriptError> {
//!     let transcript = vec![TranscriptSegment::new(
//!         "The CEO oversees VPs who manage directors and teams.",
//!         0,
//!         6_000,
//!         0.98,
//!     )];
//!
//!     let shells = Segmenter::default().segment(&transcript)?;
//!     let classification = classify(&shells[0].text_span);
//!     assert_eq!(classification.archetype, Archetype::Tree);
//!
//!     let extraction = extract(&shells[0].text_span, classification.archetype);
//!     assert_eq!(extraction.draft.nodes.len(), 4);
//!     Ok(())
//! }
//! ```

mod classifier;
pub mod error;
mod extractor;
pub mod lexer;
pub mod scorer;
mod segmenter;
mod span;
pub mod summary;

pub use classifier::{
    ClassificationResult, Classifier, ClassifierConfig, FALLBACK_CONFIDENCE, MAX_CONFIDENCE,
    classify,
};
pub use error::TranscriptError;
pub use extractor::{
    DraftEdge, DraftNode, Extraction, Extractor, ExtractorConfig, GraphDraft, extract,
};
pub use scorer::score;
pub use segmenter::{SceneShell, Segmenter, SegmenterConfig};
pub use span::Span;
