//! Placement engine factory.
//!
//! Every archetype has its own initial placement engine. [`EngineBuilder`]
//! configures them from the layout settings and bundles them, together with
//! node sizing and collision resolution, into a [`LayoutEngine`].

mod grid;
mod layered;
mod radial;
mod tree;

use std::{collections::HashMap, sync::Arc};

use scenecast_core::{
    geometry::{Point, Size},
    semantic::Archetype,
};

use crate::{
    config::LayoutConfig,
    layout::{LayoutEngine, LayoutError},
    structure::SceneGraph,
};

/// Initial, archetype-specific placement.
pub trait PlacementEngine: Send + Sync {
    /// Returns the center of every node, indexed like the graph's nodes.
    ///
    /// Positions are relative; normalization moves the layout onto the
    /// canvas afterwards.
    fn place(&self, graph: &SceneGraph, sizes: &[Size]) -> Result<Vec<Point>, LayoutError>;
}

/// Builder for configuring a [`LayoutEngine`].
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    config: LayoutConfig,
}

impl EngineBuilder {
    /// Create a builder with the default layout settings
    pub fn new() -> Self {
        Self::from_config(LayoutConfig::default())
    }

    pub fn from_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Set the canvas the layout is normalized onto
    pub fn with_canvas(mut self, width: f32, height: f32) -> Self {
        self.config.canvas_width = width;
        self.config.canvas_height = height;
        self
    }

    /// Set the minimum gap between node boxes
    pub fn with_min_spacing(mut self, spacing: f32) -> Self {
        self.config.min_spacing = spacing;
        self
    }

    /// Set the gaps used by initial placement
    pub fn with_spacing(mut self, horizontal: f32, vertical: f32) -> Self {
        self.config.horizontal_spacing = horizontal;
        self.config.vertical_spacing = vertical;
        self
    }

    /// Set the iteration budget of collision resolution
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.config.max_iterations = iterations;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.config.damping = damping;
        self
    }

    fn placement_engine(&self, archetype: Archetype) -> Arc<dyn PlacementEngine> {
        let config = &self.config;
        match archetype {
            Archetype::Flow | Archetype::Timeline => {
                let mut e = layered::Engine::new();
                e.set_horizontal_spacing(config.horizontal_spacing);
                e.set_vertical_spacing(config.vertical_spacing);
                // Timelines are already a chain in chronological order
                e.set_use_sugiyama(archetype == Archetype::Flow);
                Arc::new(e)
            }
            Archetype::Tree => {
                let mut e = tree::Engine::new();
                e.set_sibling_spacing(config.horizontal_spacing);
                e.set_level_spacing(config.vertical_spacing);
                Arc::new(e)
            }
            Archetype::Matrix => {
                let mut e = grid::Engine::new();
                e.set_column_spacing(config.horizontal_spacing);
                e.set_row_spacing(config.vertical_spacing);
                Arc::new(e)
            }
            Archetype::Cycle => {
                let mut e = radial::Engine::new();
                e.set_spacing(config.horizontal_spacing.max(config.vertical_spacing));
                Arc::new(e)
            }
        }
    }

    /// Builds the layout engine with one placement engine per archetype.
    pub fn build(self) -> LayoutEngine {
        let engines: HashMap<Archetype, Arc<dyn PlacementEngine>> = Archetype::ALL
            .into_iter()
            .map(|archetype| (archetype, self.placement_engine(archetype)))
            .collect();
        LayoutEngine::new(self.config, engines)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
