//! Error types for Scenecast operations.
//!
//! This module provides the main error type [`ScenecastError`] which wraps
//! the error conditions that can stop a transcript from becoming scenes.
//! Recoverable problems (degraded enrichment, residual overlaps, low
//! classification confidence) never surface here; they are recorded in each
//! scene's quality block instead.

use std::io;

use thiserror::Error;

use scenecast_core::semantic::Scene;
use scenecast_text::TranscriptError;

use crate::{layout::LayoutError, pipeline::Stage};

/// The main error type for Scenecast operations.
///
/// # Partial Results
///
/// [`ScenecastError::SceneFailed`] and [`ScenecastError::Cancelled`] carry the
/// scenes that completed before the job stopped, in transcript order, so
/// callers can still hand them to a renderer.
#[derive(Debug, Error)]
pub enum ScenecastError {
    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    #[error("scene {scene_index} failed during {stage}: {reason}")]
    SceneFailed {
        scene_index: usize,
        stage: Stage,
        last_completed: Option<Stage>,
        partial: Vec<Scene>,
        reason: String,
    },

    #[error("job cancelled after {} scenes", .partial.len())]
    Cancelled { partial: Vec<Scene> },

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScenecastError {
    /// Scenes completed before the failure, if the error carries any.
    pub fn partial(&self) -> &[Scene] {
        match self {
            Self::SceneFailed { partial, .. } | Self::Cancelled { partial } => partial,
            _ => &[],
        }
    }
}
