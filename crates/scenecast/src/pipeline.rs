//! Pipeline orchestration.
//!
//! [`Pipeline::run`] segments a transcript and then processes every scene as
//! its own tokio task, at most `workers` at a time:
//!
//! ```text
//! classify → extract → [enrich] → layout (blocking pool) → quality score
//! ```
//!
//! Results come back in transcript order whatever order the tasks finish in.
//! Enrichment is the only stage that retries, and its failures degrade the
//! scene rather than fail the job. Finished scenes are cached by content
//! fingerprint, so identical scenes are computed once. Scenes degraded by a
//! timeout or an unavailable analyzer are not kept in the cache.

mod cache;
mod enrich;
mod progress;
mod retry;

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::{
    sync::{Semaphore, mpsc::UnboundedSender},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use scenecast_core::semantic::{
    Archetype, ExtractionDegraded, ExtractionSource, Scene, SceneQuality, TranscriptSegment,
};
use scenecast_text::{Classifier, Extractor, GraphDraft, SceneShell, Segmenter, summary};

pub use cache::{CacheKey, Fingerprint, SceneCache};
pub use enrich::{AnalyzedEntity, AnalyzedRelation, Analysis, EnrichmentError, SemanticAnalyzer};
pub use progress::{ProgressEvent, ProgressReporter, Stage};
use progress::StageTracker;
pub use retry::RetryPolicy;

use crate::{
    config::AppConfig,
    error::ScenecastError,
    layout::{EngineBuilder, LayoutEngine, LayoutError},
};

/// Why a scene task stopped without a scene.
#[derive(Debug)]
enum SceneFailure {
    Cancelled,
    Failed {
        stage: Stage,
        last_completed: Option<Stage>,
        reason: String,
    },
}

/// Everything a scene task needs, shared between tasks.
struct Stages {
    classifier: Classifier,
    extractor: Extractor,
    layout: Arc<LayoutEngine>,
    analyzer: Option<Arc<dyn SemanticAnalyzer>>,
    retry: RetryPolicy,
    progress: ProgressReporter,
    min_spacing: f32,
}

impl Stages {
    /// The stage a scene runs once `last_completed` is done.
    fn stage_after(&self, last_completed: Option<Stage>) -> Stage {
        match last_completed {
            None | Some(Stage::Segment) => Stage::Classify,
            Some(Stage::Classify) => Stage::Extract,
            Some(Stage::Extract) if self.analyzer.is_some() => Stage::Enrich,
            Some(Stage::Extract | Stage::Enrich) => Stage::Layout,
            Some(Stage::Layout | Stage::Done) => Stage::Done,
        }
    }

    fn complete(&self, tracker: &StageTracker, stage: Stage, index: usize) {
        tracker.complete(stage);
        self.progress.emit(stage, Some(index));
    }

    async fn process(
        &self,
        shell: SceneShell,
        key: &CacheKey,
        cache: &SceneCache,
        job: &CancellationToken,
        tracker: &StageTracker,
    ) -> Result<Scene, SceneFailure> {
        let shell_ref = &shell;
        let cached = cache
            .get_or_try_insert_with(key, move || self.compute(shell_ref, job, tracker))
            .await?;
        if cached
            .quality
            .degradation
            .is_some_and(ExtractionDegraded::is_transient)
        {
            // A healthy analyzer may answer next time
            cache.remove(key);
        }

        self.complete(tracker, Stage::Done, shell.index);
        // Timing and position come from this shell, not the cached one
        Ok(Scene {
            id: Scene::id_for_index(shell.index),
            index: shell.index,
            start_ms: shell.start_ms,
            duration_ms: shell.duration_ms(),
            ..cached
        })
    }

    async fn compute(
        &self,
        shell: &SceneShell,
        job: &CancellationToken,
        tracker: &StageTracker,
    ) -> Result<Scene, SceneFailure> {
        let index = shell.index;
        let text = shell.text_span.as_str();

        let classification = self.classifier.classify(text);
        let archetype = classification.archetype;
        debug!(
            scene = index,
            archetype:?,
            confidence = classification.confidence,
            low_confidence = classification.low_confidence;
            "Classified scene"
        );
        self.complete(tracker, Stage::Classify, index);

        let baseline = self.extractor.extract(text, archetype);
        self.complete(tracker, Stage::Extract, index);

        let (draft, source, degradation) = match &self.analyzer {
            None => (baseline.draft, baseline.source, None),
            Some(analyzer) => {
                let enriched = self.enrich(analyzer.as_ref(), text, archetype).await;
                self.complete(tracker, Stage::Enrich, index);
                match enriched {
                    Ok(draft) => (draft, ExtractionSource::Enriched, None),
                    Err(err) => {
                        warn!(
                            scene = index,
                            reason:% = err;
                            "Enrichment degraded, using rule-based extraction"
                        );
                        (baseline.draft, baseline.source, Some(err.degradation()))
                    }
                }
            }
        };

        if job.is_cancelled() {
            return Err(SceneFailure::Cancelled);
        }

        let layout_failed = |reason: String| SceneFailure::Failed {
            stage: Stage::Layout,
            last_completed: tracker.last_completed(),
            reason,
        };
        let engine = Arc::clone(&self.layout);
        let token = job.clone();
        let laid_out = tokio::task::spawn_blocking(move || engine.layout(&draft, archetype, &token))
            .await
            .map_err(|err| layout_failed(err.to_string()))?
            .map_err(|err| match err {
                LayoutError::Cancelled => SceneFailure::Cancelled,
                other => layout_failed(other.to_string()),
            })?;

        let report = laid_out.report;
        let mut quality = SceneQuality {
            layout: report.quality,
            residual_overlap_count: report.residual_overlap_count,
            edge_collision_count: report.edge_collision_count,
            iterations: report.iterations,
            fits_canvas: report.fits_canvas,
            classification_low_confidence: classification.low_confidence,
            extraction: source,
            degradation,
            score: 0.0,
        };
        quality.score = quality.compute_score(classification.confidence);

        let scene = Scene {
            id: Scene::id_for_index(index),
            index,
            title: summary::title(text),
            archetype,
            confidence: classification.confidence,
            text_span: shell.text_span.clone(),
            start_ms: shell.start_ms,
            duration_ms: shell.duration_ms(),
            nodes: laid_out.nodes,
            edges: laid_out.edges,
            quality,
        };
        scene
            .validate(self.min_spacing)
            .map_err(|err| layout_failed(err.to_string()))?;
        self.complete(tracker, Stage::Layout, index);

        debug!(
            scene = index,
            nodes = scene.nodes.len(),
            edges = scene.edges.len(),
            score = scene.quality.score;
            "Scene complete"
        );
        Ok(scene)
    }

    /// Asks the analyzer for a graph, with retries, and validates the answer.
    async fn enrich(
        &self,
        analyzer: &dyn SemanticAnalyzer,
        text: &str,
        archetype: Archetype,
    ) -> Result<GraphDraft, EnrichmentError> {
        let analysis = self.retry.run(move || analyzer.analyze(text)).await?;
        self.extractor
            .adopt(analysis.into_draft(), archetype)
            .map_err(|err| EnrichmentError::Malformed(err.to_string()))
    }
}

/// Runs transcripts through segmentation, analysis and layout.
pub struct Pipeline {
    config: AppConfig,
    segmenter: Segmenter,
    analyzer: Option<Arc<dyn SemanticAnalyzer>>,
    cache: Arc<SceneCache>,
    progress: ProgressReporter,
}

impl Pipeline {
    /// Creates a pipeline with its own cache and no analyzer.
    pub fn new(config: AppConfig) -> Self {
        Self {
            segmenter: Segmenter::new(config.segmenter().clone()),
            cache: Arc::new(SceneCache::new(config.pipeline().cache_capacity)),
            config,
            analyzer: None,
            progress: ProgressReporter::default(),
        }
    }

    /// Attach a semantic analyzer for enrichment
    pub fn with_analyzer(mut self, analyzer: Arc<dyn SemanticAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Share a cache with other pipelines
    pub fn with_cache(mut self, cache: Arc<SceneCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Send progress events to `sender`
    pub fn with_progress(mut self, sender: UnboundedSender<ProgressEvent>) -> Self {
        self.progress = ProgressReporter::new(Some(sender));
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<SceneCache> {
        &self.cache
    }

    fn stages(&self) -> Stages {
        let layout = EngineBuilder::from_config(self.config.layout().clone()).build();
        Stages {
            classifier: Classifier::new(self.config.classifier().clone()),
            extractor: Extractor::new(self.config.extractor().clone()),
            layout: Arc::new(layout),
            analyzer: self.analyzer.clone(),
            retry: self.config.pipeline().retry.clone(),
            progress: self.progress.clone(),
            min_spacing: self.config.layout().min_spacing,
        }
    }

    /// Turns a transcript into laid-out scenes, in transcript order.
    ///
    /// # Errors
    ///
    /// - [`ScenecastError::Config`] if the configuration is invalid
    /// - [`ScenecastError::Transcript`] if the transcript is invalid
    /// - [`ScenecastError::SceneFailed`] if a scene cannot be laid out; the
    ///   scenes before it are returned as the partial result
    /// - [`ScenecastError::Cancelled`] if `cancel` fires before every scene
    ///   is done
    pub async fn run(
        &self,
        transcript: &[TranscriptSegment],
        cancel: CancellationToken,
    ) -> Result<Vec<Scene>, ScenecastError> {
        self.config.validate()?;
        let shells = self.segmenter.segment(transcript)?;
        self.progress.emit(Stage::Segment, None);
        info!(
            segments = transcript.len(),
            scenes = shells.len();
            "Segmented transcript"
        );

        let fingerprint = Fingerprint::new(&self.config, self.analyzer.is_some())?;
        let stages = Arc::new(self.stages());
        // Cancelling the job must not cancel the caller's token
        let job = cancel.child_token();
        let semaphore = Arc::new(Semaphore::new(self.config.pipeline().workers.max(1)));

        let tasks: Vec<(JoinHandle<Result<Scene, SceneFailure>>, StageTracker)> = shells
            .into_iter()
            .map(|shell| {
                let key = fingerprint.key(&shell.text_span);
                let stages = Arc::clone(&stages);
                let cache = Arc::clone(&self.cache);
                let semaphore = Arc::clone(&semaphore);
                let job = job.clone();
                let tracker = StageTracker::default();
                let task_tracker = tracker.clone();

                let handle = tokio::spawn(async move {
                    let _permit = tokio::select! {
                        permit = semaphore.acquire_owned() => {
                            permit.map_err(|_| SceneFailure::Cancelled)?
                        }
                        () = job.cancelled() => return Err(SceneFailure::Cancelled),
                    };
                    if job.is_cancelled() {
                        return Err(SceneFailure::Cancelled);
                    }
                    stages
                        .process(shell, &key, &cache, &job, &task_tracker)
                        .await
                });
                (handle, tracker)
            })
            .collect();

        let mut scenes = Vec::with_capacity(tasks.len());
        let mut failure: Option<(usize, SceneFailure)> = None;
        for (index, (task, tracker)) in tasks.into_iter().enumerate() {
            let outcome = task.await;
            if failure.is_some() {
                // Drain the remaining tasks; they stop at the next check
                continue;
            }
            match outcome {
                Ok(Ok(scene)) => scenes.push(scene),
                Ok(Err(err)) => {
                    job.cancel();
                    failure = Some((index, err));
                }
                Err(err) => {
                    job.cancel();
                    let last_completed = tracker.last_completed();
                    failure = Some((
                        index,
                        SceneFailure::Failed {
                            stage: stages.stage_after(last_completed),
                            last_completed,
                            reason: format!("scene task failed: {err}"),
                        },
                    ));
                }
            }
        }

        match failure {
            None => {
                let degraded = scenes
                    .iter()
                    .filter(|scene| scene.quality.degradation.is_some())
                    .count();
                info!(scenes = scenes.len(), degraded; "Pipeline finished");
                Ok(scenes)
            }
            Some((_, SceneFailure::Cancelled)) => {
                warn!(completed = scenes.len(); "Pipeline cancelled");
                Err(ScenecastError::Cancelled { partial: scenes })
            }
            Some((
                scene_index,
                SceneFailure::Failed {
                    stage,
                    last_completed,
                    reason,
                },
            )) => Err(ScenecastError::SceneFailed {
                scene_index,
                stage,
                last_completed,
                partial: scenes,
                reason,
            }),
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("enriched", &self.analyzer.is_some())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
