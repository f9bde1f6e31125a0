//! Laid-out scenes handed to the renderer.

use std::{
    collections::HashSet,
    fmt::{self, Display},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geometry::{Bounds, Insets, Point, Size},
    semantic::Archetype,
};

/// A labeled box in a scene graph.
///
/// `x`/`y` are the top-left corner and stay `None` until layout places the
/// node. `width` and `height` are always positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub label: String,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: f32,
    pub height: f32,
}

impl Node {
    /// Creates an unplaced node with the given size.
    pub fn new(id: impl Into<String>, label: impl Into<String>, size: Size) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            x: None,
            y: None,
            width: size.width(),
            height: size.height(),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns the top-left corner, if the node has been placed.
    pub fn top_left(&self) -> Option<Point> {
        Some(Point::new(self.x?, self.y?))
    }

    /// Returns the node's bounding box, if the node has been placed.
    pub fn bounds(&self) -> Option<Bounds> {
        self.top_left()
            .map(|top_left| Bounds::new_from_top_left(top_left, self.size()))
    }

    /// Moves the node so its top-left corner sits at `top_left`.
    pub fn place_at(&mut self, top_left: Point) {
        self.x = Some(top_left.x());
        self.y = Some(top_left.y());
    }

    pub fn is_placed(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }
}

/// A directed connection between two nodes of the same scene.
///
/// `points` is the routed polyline, from the source anchor to the target
/// anchor. It is empty until layout routes the edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub from_node_id: String,
    pub to_node_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub points: Vec<Point>,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        from_node_id: impl Into<String>,
        to_node_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from_node_id: from_node_id.into(),
            to_node_id: to_node_id.into(),
            label: None,
            points: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns true if both edges connect the same unordered pair of nodes.
    pub fn is_parallel_to(&self, other: &Edge) -> bool {
        (self.from_node_id == other.from_node_id && self.to_node_id == other.to_node_id)
            || (self.from_node_id == other.to_node_id && self.to_node_id == other.from_node_id)
    }
}

/// Whether collision resolution reached zero overlaps.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutQuality {
    #[default]
    Complete,
    /// The iteration budget ran out with overlaps remaining.
    Degraded,
}

/// Where a scene's nodes and edges came from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtractionSource {
    #[default]
    RuleBased,
    /// Supplied by the external semantic analyzer.
    Enriched,
    /// Fewer than two candidates were found; a two-node graph was synthesized.
    Placeholder,
}

impl ExtractionSource {
    fn weight(self) -> f32 {
        match self {
            ExtractionSource::Enriched => 1.0,
            ExtractionSource::RuleBased => 0.9,
            ExtractionSource::Placeholder => 0.5,
        }
    }
}

/// Why enrichment did not contribute to a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtractionDegraded {
    /// Every attempt exceeded its deadline.
    Timeout,
    /// The analyzer reported it could not serve the request.
    Unavailable,
    /// The analyzer answered with a graph that failed validation.
    Malformed,
}

impl ExtractionDegraded {
    /// Whether a later attempt against the same analyzer could succeed.
    pub fn is_transient(self) -> bool {
        matches!(self, ExtractionDegraded::Timeout | ExtractionDegraded::Unavailable)
    }
}

impl Display for ExtractionDegraded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExtractionDegraded::Timeout => "timeout",
            ExtractionDegraded::Unavailable => "unavailable",
            ExtractionDegraded::Malformed => "malformed",
        };
        write!(f, "{s}")
    }
}

/// Per-scene quality metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneQuality {
    pub layout: LayoutQuality,
    pub residual_overlap_count: usize,
    pub edge_collision_count: usize,
    pub iterations: usize,
    pub fits_canvas: bool,
    pub classification_low_confidence: bool,
    pub extraction: ExtractionSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degradation: Option<ExtractionDegraded>,
    pub score: f32,
}

impl Default for SceneQuality {
    fn default() -> Self {
        Self {
            layout: LayoutQuality::Complete,
            residual_overlap_count: 0,
            edge_collision_count: 0,
            iterations: 0,
            fits_canvas: true,
            classification_low_confidence: false,
            extraction: ExtractionSource::RuleBased,
            degradation: None,
            score: 0.0,
        }
    }
}

impl SceneQuality {
    /// Computes the aggregate score in `[0, 1]` from the metrics and the
    /// classification confidence.
    ///
    /// The score weighs confidence and layout at 0.4 each and extraction at
    /// 0.2. Layout quality decays with residual overlaps and edge collisions;
    /// extraction quality depends on its source, less 0.2 when enrichment
    /// degraded.
    ///
    /// # Examples
    ///
    /// ```
    /// # use scenecast_core::semantic::{ExtractionSource, SceneQuality};
    /// let quality = SceneQuality {
    ///     extraction: ExtractionSource::Enriched,
    ///     ..SceneQuality::default()
    /// };
    /// assert!((quality.compute_score(1.0) - 1.0).abs() < 1e-6);
    /// ```
    pub fn compute_score(&self, confidence: f32) -> f32 {
        let layout = 1.0 / (1.0 + self.residual_overlap_count as f32)
            * (1.0 / (1.0 + 0.25 * self.edge_collision_count as f32));

        let mut extraction = self.extraction.weight();
        if self.degradation.is_some() {
            extraction -= 0.2;
        }
        let extraction = extraction.max(0.0);

        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };

        (0.4 * confidence + 0.4 * layout + 0.2 * extraction).clamp(0.0, 1.0)
    }
}

/// A contiguous time slice of the transcript rendered as one diagram.
///
/// Built as a shell by segmentation and completed by classification,
/// extraction, and layout. Read-only once handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    pub index: usize,
    pub title: String,
    pub archetype: Archetype,
    pub confidence: f32,
    pub text_span: String,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub quality: SceneQuality,
}

impl Scene {
    /// Returns the stable identifier for the scene at `index`.
    pub fn id_for_index(index: usize) -> String {
        format!("scene-{index:03}")
    }

    /// Finds a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn end_ms(&self) -> u64 {
        self.start_ms + self.duration_ms
    }

    /// Checks the structural invariants a renderer relies on.
    ///
    /// Node ids must be unique, sizes positive, every node placed, and every
    /// edge must reference nodes of this scene. Unless the layout is
    /// [`LayoutQuality::Degraded`], no two node boxes padded by half of
    /// `min_spacing` per side may intersect.
    pub fn validate(&self, min_spacing: f32) -> Result<(), SceneInvariantError> {
        let mut ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !ids.insert(node.id.as_str()) {
                return Err(SceneInvariantError::DuplicateNodeId(node.id.clone()));
            }
            if !node.size().is_positive() {
                return Err(SceneInvariantError::InvalidSize(node.id.clone()));
            }
            if !node.is_placed() {
                return Err(SceneInvariantError::Unplaced(node.id.clone()));
            }
        }

        for edge in &self.edges {
            for endpoint in [&edge.from_node_id, &edge.to_node_id] {
                if !ids.contains(endpoint.as_str()) {
                    return Err(SceneInvariantError::DanglingEdge {
                        edge: edge.id.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
        }

        if self.quality.layout == LayoutQuality::Complete {
            let padding = Insets::uniform(min_spacing / 2.0);
            let padded: Vec<(&str, Bounds)> = self
                .nodes
                .iter()
                .filter_map(|node| Some((node.id.as_str(), node.bounds()?.add_padding(padding))))
                .collect();
            for (i, (first_id, first)) in padded.iter().enumerate() {
                for (second_id, second) in &padded[i + 1..] {
                    if first.intersects(second) {
                        return Err(SceneInvariantError::Overlap {
                            first: (*first_id).to_string(),
                            second: (*second_id).to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

/// A violated scene invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneInvariantError {
    #[error("node id `{0}` is not unique within the scene")]
    DuplicateNodeId(String),

    #[error("node `{0}` has a non-positive size")]
    InvalidSize(String),

    #[error("node `{0}` was never placed")]
    Unplaced(String),

    #[error("edge `{edge}` references unknown node `{node}`")]
    DanglingEdge { edge: String, node: String },

    #[error("nodes `{first}` and `{second}` overlap")]
    Overlap { first: String, second: String },
}
