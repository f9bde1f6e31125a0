//! Scenecast - turns spoken-language transcripts into timed diagram scenes.
//!
//! A transcript is split into scenes, each scene is classified as one of five
//! diagram archetypes, its entities and relations are extracted, and the
//! resulting graph is laid out without overlapping nodes. The output is a
//! list of [`semantic::Scene`]s ready for an external renderer.

pub mod config;
pub mod layout;
pub mod pipeline;
pub mod structure;

mod error;

pub use scenecast_core::{geometry, semantic};
pub use scenecast_text::{ClassificationResult, Extraction, GraphDraft, SceneShell};

pub use error::ScenecastError;

use log::{debug, info, trace};
use tokio_util::sync::CancellationToken;

use scenecast_core::semantic::{Archetype, Scene, TranscriptSegment};
use scenecast_text::{Classifier, Extractor, Segmenter};

use config::AppConfig;
use layout::{EngineBuilder, LaidOutGraph};
use pipeline::Pipeline;

/// Entry point for single-use callers.
///
/// Each stage is available on its own; [`SceneBuilder::run`] chains them for
/// a whole transcript through a [`Pipeline`].
///
/// # Examples
///
/// ```
/// use scenecast::{SceneBuilder, semantic::Archetype};
///
/// let builder = SceneBuilder::default();
/// let classification = builder.classify("First do A, then B, finally C.");
/// assert_eq!(classification.archetype, Archetype::Flow);
///
/// let extraction = builder.extract("First do A, then B, finally C.", Archetype::Flow);
/// let laid_out = builder
///     .layout(&extraction.draft, Archetype::Flow)
///     .expect("valid draft");
/// assert_eq!(laid_out.nodes.len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct SceneBuilder {
    config: AppConfig,
}

impl SceneBuilder {
    /// Create a new scene builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Split a transcript into scene shells.
    ///
    /// # Errors
    ///
    /// Returns [`ScenecastError::Transcript`] listing every problem found in
    /// the transcript.
    pub fn segment(&self, transcript: &[TranscriptSegment]) -> Result<Vec<SceneShell>, ScenecastError> {
        info!(segments = transcript.len(); "Segmenting transcript");
        let shells = Segmenter::new(self.config.segmenter().clone()).segment(transcript)?;
        debug!(scenes = shells.len(); "Transcript segmented");
        Ok(shells)
    }

    /// Pick the best-fit archetype for `text`.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let result = Classifier::new(self.config.classifier().clone()).classify(text);
        trace!(result:?; "Classified text");
        result
    }

    /// Extract a graph from `text` shaped for `archetype`.
    pub fn extract(&self, text: &str, archetype: Archetype) -> Extraction {
        Extractor::new(self.config.extractor().clone()).extract(text, archetype)
    }

    /// Lay out a draft.
    ///
    /// # Errors
    ///
    /// Returns [`ScenecastError::Layout`] when the draft is not a valid graph.
    pub fn layout(&self, draft: &GraphDraft, archetype: Archetype) -> Result<LaidOutGraph, ScenecastError> {
        let engine = EngineBuilder::from_config(self.config.layout().clone()).build();
        let laid_out = engine.layout(draft, archetype, &CancellationToken::new())?;
        debug!(
            nodes = laid_out.nodes.len(),
            iterations = laid_out.report.iterations;
            "Layout calculated"
        );
        Ok(laid_out)
    }

    /// A pipeline configured like this builder.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.config.clone())
    }

    /// Turn a whole transcript into scenes.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::run`].
    pub async fn run(&self, transcript: &[TranscriptSegment]) -> Result<Vec<Scene>, ScenecastError> {
        self.config.validate()?;
        self.pipeline().run(transcript, CancellationToken::new()).await
    }
}
