//! Configuration types for the Scenecast pipeline.
//!
//! Every numeric threshold of the pipeline is a configuration default. All
//! types implement [`serde::Deserialize`] so they can be loaded from TOML,
//! and [`serde::Serialize`] so a configuration can be fingerprinted for the
//! scene cache.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`LayoutConfig`] - Canvas, node sizing, spacing and collision resolution.
//! - [`PipelineConfig`] - Worker count, cache capacity and the enrichment
//!   [`RetryPolicy`].
//!
//! # Example
//!
//! ```
//! # use scenecast::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().min_spacing, 40.0);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use scenecast_text::{ClassifierConfig, ExtractorConfig, SegmenterConfig};

use crate::{error::ScenecastError, pipeline::RetryPolicy};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    segmenter: SegmenterConfig,

    #[serde(default)]
    classifier: ClassifierConfig,

    #[serde(default)]
    extractor: ExtractorConfig,

    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    pipeline: PipelineConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        segmenter: SegmenterConfig,
        classifier: ClassifierConfig,
        extractor: ExtractorConfig,
        layout: LayoutConfig,
        pipeline: PipelineConfig,
    ) -> Self {
        Self {
            segmenter,
            classifier,
            extractor,
            layout,
            pipeline,
        }
    }

    pub fn segmenter(&self) -> &SegmenterConfig {
        &self.segmenter
    }

    pub fn classifier(&self) -> &ClassifierConfig {
        &self.classifier
    }

    pub fn extractor(&self) -> &ExtractorConfig {
        &self.extractor
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn pipeline(&self) -> &PipelineConfig {
        &self.pipeline
    }

    /// Checks that every section holds usable values.
    ///
    /// # Errors
    ///
    /// Returns [`ScenecastError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ScenecastError> {
        let segmenter = &self.segmenter;
        if segmenter.max_scene_ms == 0 {
            return Err(invalid("segmenter.max_scene_ms must be positive"));
        }
        if segmenter.min_scene_ms > segmenter.max_scene_ms {
            return Err(invalid(
                "segmenter.min_scene_ms must not exceed segmenter.max_scene_ms",
            ));
        }

        let classifier = &self.classifier;
        if !(classifier.normalizing_constant > 0.0) {
            return Err(invalid("classifier.normalizing_constant must be positive"));
        }
        if !(0.0..1.0).contains(&classifier.tie_margin) {
            return Err(invalid("classifier.tie_margin must be in [0, 1)"));
        }

        if self.extractor.max_nodes < 2 {
            return Err(invalid("extractor.max_nodes must be at least 2"));
        }

        self.layout.validate()?;
        self.pipeline.validate()
    }
}

fn invalid(message: &str) -> ScenecastError {
    ScenecastError::Config(message.to_string())
}

/// Canvas, node sizing and collision resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Distance from the canvas edge to the top-left of the layout.
    pub margin: f32,
    /// Minimum gap between any two node boxes.
    pub min_spacing: f32,
    /// Gap between layers, grid columns and tree siblings.
    pub horizontal_spacing: f32,
    /// Gap between nodes stacked in a layer, grid rows and tree levels.
    pub vertical_spacing: f32,
    pub separation_multiplier: f32,
    pub damping: f32,
    pub max_iterations: usize,
    /// Resolution progress is logged every this many iterations.
    pub log_interval: usize,
    pub char_width: f32,
    pub line_height: f32,
    pub padding: f32,
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1920.0,
            canvas_height: 1080.0,
            margin: 40.0,
            min_spacing: 40.0,
            horizontal_spacing: 60.0,
            vertical_spacing: 60.0,
            separation_multiplier: 2.0,
            damping: 0.9,
            max_iterations: 300,
            log_interval: 50,
            char_width: 8.0,
            line_height: 18.0,
            padding: 12.0,
            min_width: 80.0,
            max_width: 220.0,
            min_height: 40.0,
        }
    }
}

impl LayoutConfig {
    fn validate(&self) -> Result<(), ScenecastError> {
        let positive = [
            ("layout.canvas_width", self.canvas_width),
            ("layout.canvas_height", self.canvas_height),
            ("layout.min_spacing", self.min_spacing),
            ("layout.separation_multiplier", self.separation_multiplier),
            ("layout.char_width", self.char_width),
            ("layout.line_height", self.line_height),
            ("layout.min_width", self.min_width),
            ("layout.min_height", self.min_height),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ScenecastError::Config(format!("{name} must be positive")));
            }
        }

        let non_negative = [
            ("layout.margin", self.margin),
            ("layout.horizontal_spacing", self.horizontal_spacing),
            ("layout.vertical_spacing", self.vertical_spacing),
            ("layout.padding", self.padding),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ScenecastError::Config(format!(
                    "{name} must not be negative"
                )));
            }
        }

        if self.max_width < self.min_width {
            return Err(invalid("layout.max_width must not be below layout.min_width"));
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(invalid("layout.damping must be in (0, 1]"));
        }
        if self.max_iterations == 0 {
            return Err(invalid("layout.max_iterations must be positive"));
        }
        if self.log_interval == 0 {
            return Err(invalid("layout.log_interval must be positive"));
        }
        Ok(())
    }
}

/// Scheduling, caching and retry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Scenes processed concurrently.
    pub workers: usize,
    pub cache_capacity: usize,
    pub retry: RetryPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            cache_capacity: 256,
            retry: RetryPolicy::default(),
        }
    }
}

impl PipelineConfig {
    fn validate(&self) -> Result<(), ScenecastError> {
        if self.workers == 0 {
            return Err(invalid("pipeline.workers must be positive"));
        }
        if self.cache_capacity == 0 {
            return Err(invalid("pipeline.cache_capacity must be positive"));
        }
        let retry = &self.retry;
        if !(retry.backoff_multiplier >= 1.0 && retry.backoff_multiplier.is_finite()) {
            return Err(invalid("pipeline.retry.backoff_multiplier must be at least 1"));
        }
        if retry.attempt_timeout_ms == 0 {
            return Err(invalid("pipeline.retry.attempt_timeout_ms must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_sections_use_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "layout": { "min_spacing": 24.0 }, "pipeline": { "retry": { "max_retries": 0 } } }"#,
        )
        .unwrap();
        assert_eq!(config.layout().min_spacing, 24.0);
        assert_eq!(config.layout().max_iterations, 300);
        assert_eq!(config.pipeline().retry.max_retries, 0);
        assert_eq!(config.pipeline().workers, 4);
        assert_eq!(config.extractor().max_nodes, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases = [
            LayoutConfig {
                damping: 0.0,
                ..LayoutConfig::default()
            },
            LayoutConfig {
                damping: 1.5,
                ..LayoutConfig::default()
            },
            LayoutConfig {
                canvas_width: -1.0,
                ..LayoutConfig::default()
            },
            LayoutConfig {
                max_iterations: 0,
                ..LayoutConfig::default()
            },
            LayoutConfig {
                max_width: 10.0,
                ..LayoutConfig::default()
            },
        ];
        for layout in cases {
            let config = AppConfig {
                layout,
                ..AppConfig::default()
            };
            assert!(matches!(config.validate(), Err(ScenecastError::Config(_))));
        }
    }

    #[test]
    fn test_validate_rejects_inverted_scene_limits() {
        let config = AppConfig {
            segmenter: SegmenterConfig {
                min_scene_ms: 40_000,
                ..SegmenterConfig::default()
            },
            ..AppConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_scene_ms"));
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let config = AppConfig {
            pipeline: PipelineConfig {
                workers: 0,
                ..PipelineConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
