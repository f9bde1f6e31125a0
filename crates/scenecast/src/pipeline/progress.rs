//! Progress events.

use std::{
    fmt::{self, Display},
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::mpsc::UnboundedSender;

/// Processing stages, in the order a scene goes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Segment,
    Classify,
    Extract,
    Enrich,
    Layout,
    Done,
}

impl Stage {
    /// Percent of a scene's work finished once this stage completes.
    pub fn percent(self) -> u8 {
        match self {
            Stage::Segment => 100,
            Stage::Classify => 25,
            Stage::Extract => 50,
            Stage::Enrich => 70,
            Stage::Layout => 90,
            Stage::Done => 100,
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Segment => "segment",
            Stage::Classify => "classify",
            Stage::Extract => "extract",
            Stage::Enrich => "enrich",
            Stage::Layout => "layout",
            Stage::Done => "done",
        };
        write!(f, "{s}")
    }
}

/// A completed stage.
///
/// `scene_index` is `None` for job-level stages (segmentation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub stage: Stage,
    pub scene_index: Option<usize>,
    pub percent: u8,
}

/// Sends progress events without blocking.
///
/// Sending never fails the job: events are dropped when no receiver is
/// attached or the receiver has gone away.
#[derive(Debug, Clone, Default)]
pub struct ProgressReporter {
    sender: Option<UnboundedSender<ProgressEvent>>,
}

impl ProgressReporter {
    pub fn new(sender: Option<UnboundedSender<ProgressEvent>>) -> Self {
        Self { sender }
    }

    /// Reports that `stage` finished for `scene_index`.
    pub fn emit(&self, stage: Stage, scene_index: Option<usize>) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(ProgressEvent {
                stage,
                scene_index,
                percent: stage.percent(),
            });
        }
    }
}

/// The last stage a scene task completed.
///
/// Shared between the task and the orchestrator so the stage is still known
/// when the task itself dies.
#[derive(Debug, Clone, Default)]
pub(crate) struct StageTracker(Arc<Mutex<Option<Stage>>>);

impl StageTracker {
    pub(crate) fn complete(&self, stage: Stage) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(stage);
    }

    pub(crate) fn last_completed(&self) -> Option<Stage> {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
