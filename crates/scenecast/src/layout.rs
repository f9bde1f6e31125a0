//! Zero-overlap scene layout.
//!
//! [`LayoutEngine::layout`] turns a [`GraphDraft`] into positioned nodes and
//! routed edges in five steps:
//!
//! 1. Node sizing from label length ([`NodeSizer`])
//! 2. Deterministic initial placement for the archetype
//!    ([`PlacementEngine`])
//! 3. Iterative collision resolution ([`CollisionResolver`])
//! 4. Normalization onto the canvas margin
//! 5. Edge routing around unrelated nodes
//!
//! Layout never fails because of residual overlaps: when the iteration budget
//! runs out, the best layout found is returned with
//! [`LayoutQuality::Degraded`].

mod engines;
mod resolve;
mod routing;
mod sizing;

use std::{collections::HashMap, sync::Arc};

use log::{debug, warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use scenecast_core::{
    geometry::{Bounds, Point},
    semantic::{Archetype, Edge, LayoutQuality, Node},
};
use scenecast_text::GraphDraft;

pub use engines::{EngineBuilder, PlacementEngine};
pub use resolve::{CollisionResolver, Resolution};
pub use sizing::NodeSizer;

use crate::{
    config::LayoutConfig,
    structure::{GraphError, SceneGraph},
};

/// Why a layout could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("invalid scene graph: {0}")]
    Graph(#[from] GraphError),

    #[error("layout cancelled")]
    Cancelled,

    #[error("placement failed: {0}")]
    Placement(String),
}

/// Metrics describing a finished layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutReport {
    pub quality: LayoutQuality,
    pub residual_overlap_count: usize,
    /// Edges whose route still crosses an unrelated node.
    pub edge_collision_count: usize,
    pub iterations: usize,
    /// Union of all node boxes after normalization.
    pub bounds: Bounds,
    pub fits_canvas: bool,
}

/// Positioned nodes and routed edges of one scene.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub report: LayoutReport,
}

/// Lays out scene drafts; cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
    sizer: NodeSizer,
    resolver: CollisionResolver,
    engines: HashMap<Archetype, Arc<dyn PlacementEngine>>,
}

impl std::fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        EngineBuilder::new().build()
    }
}

impl LayoutEngine {
    fn new(config: LayoutConfig, engines: HashMap<Archetype, Arc<dyn PlacementEngine>>) -> Self {
        Self {
            sizer: NodeSizer::new(&config),
            resolver: CollisionResolver::new(&config),
            config,
            engines,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out `draft` as an `archetype` diagram.
    ///
    /// The result is a pure function of the draft, the archetype and the
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Graph`] for drafts that are not valid graphs and
    /// [`LayoutError::Cancelled`] when `cancel` fires during resolution.
    pub fn layout(
        &self,
        draft: &GraphDraft,
        archetype: Archetype,
        cancel: &CancellationToken,
    ) -> Result<LaidOutGraph, LayoutError> {
        let graph = SceneGraph::from_draft(draft)?;
        let sizes: Vec<_> = draft
            .nodes
            .iter()
            .map(|node| self.sizer.size(&node.label))
            .collect();

        let engine = self.engines.get(&archetype).ok_or_else(|| {
            LayoutError::Placement(format!("no placement engine for {archetype}"))
        })?;
        let mut centers = engine.place(&graph, &sizes)?;
        if centers.len() != sizes.len() || !centers.iter().all(|center| center.is_finite()) {
            return Err(LayoutError::Placement(format!(
                "{archetype} placement produced invalid positions"
            )));
        }

        let resolution = self.resolver.resolve(&mut centers, &sizes, cancel)?;

        let mut nodes: Vec<Node> = draft
            .nodes
            .iter()
            .zip(&sizes)
            .zip(&centers)
            .map(|((draft_node, size), center)| {
                let mut node = Node::new(&draft_node.id, &draft_node.label, *size);
                node.place_at(center.to_bounds(*size).min_point());
                node
            })
            .collect();
        let (bounds, fits_canvas) = self.normalize(&mut nodes);

        let node_bounds: Vec<Bounds> = nodes.iter().filter_map(Node::bounds).collect();
        let endpoints: Vec<(usize, usize)> = graph.edges().collect();
        let routes = routing::route_edges(&node_bounds, &endpoints);

        let edge_collision_count = routes.iter().filter(|route| route.collides).count();
        let edges: Vec<Edge> = draft
            .edges
            .iter()
            .zip(routes)
            .enumerate()
            .map(|(index, (draft_edge, route))| {
                let mut edge = Edge::new(format!("e{index}"), &draft_edge.from, &draft_edge.to);
                edge.label = draft_edge.label.clone();
                edge.points = route.points;
                edge
            })
            .collect();

        let quality = if resolution.is_complete() {
            LayoutQuality::Complete
        } else {
            warn!(
                archetype:?,
                residual_overlaps = resolution.residual_overlaps;
                "Layout degraded"
            );
            LayoutQuality::Degraded
        };
        if !fits_canvas {
            debug!(
                width = bounds.max_x() + self.config.margin,
                height = bounds.max_y() + self.config.margin;
                "Layout exceeds canvas"
            );
        }

        Ok(LaidOutGraph {
            nodes,
            edges,
            report: LayoutReport {
                quality,
                residual_overlap_count: resolution.residual_overlaps,
                edge_collision_count,
                iterations: resolution.iterations,
                bounds,
                fits_canvas,
            },
        })
    }

    /// Moves the layout so its top-left corner sits at the canvas margin.
    ///
    /// Returns the moved layout bounds and whether they fit the canvas.
    fn normalize(&self, nodes: &mut [Node]) -> (Bounds, bool) {
        let Some(bounds) = nodes
            .iter()
            .filter_map(Node::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
        else {
            return (Bounds::default(), true);
        };

        let margin = self.config.margin;
        let offset = Point::new(margin - bounds.min_x(), margin - bounds.min_y());
        for node in nodes.iter_mut() {
            if let Some(top_left) = node.top_left() {
                node.place_at(top_left.add_point(offset));
            }
        }

        let bounds = bounds.translate(offset);
        let fits = bounds.max_x() + margin <= self.config.canvas_width
            && bounds.max_y() + margin <= self.config.canvas_height;
        (bounds, fits)
    }
}
