//! Left-to-right layered placement for flows and timelines.

use std::collections::HashMap;

use log::{debug, warn};
use rust_sugiyama::configure::Config;

use scenecast_core::geometry::{Point, Size};

use crate::{
    layout::{LayoutError, engines::PlacementEngine},
    structure::SceneGraph,
};

/// Places nodes in vertical layers ordered left to right.
///
/// With Sugiyama enabled the layering and in-layer order come from
/// `rust-sugiyama`; otherwise, or when the crate fails, nodes are layered by
/// breadth-first depth from the roots.
pub struct Engine {
    horizontal_spacing: f32,
    vertical_spacing: f32,
    use_sugiyama: bool,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            horizontal_spacing: 60.0,
            vertical_spacing: 60.0,
            use_sugiyama: true,
        }
    }

    /// Set the gap between layers
    pub fn set_horizontal_spacing(&mut self, spacing: f32) -> &mut Self {
        self.horizontal_spacing = spacing;
        self
    }

    /// Set the gap between nodes of one layer
    pub fn set_vertical_spacing(&mut self, spacing: f32) -> &mut Self {
        self.vertical_spacing = spacing;
        self
    }

    pub fn set_use_sugiyama(&mut self, enabled: bool) -> &mut Self {
        self.use_sugiyama = enabled;
        self
    }

    fn layers(&self, graph: &SceneGraph) -> Vec<Vec<usize>> {
        if self.use_sugiyama {
            if let Some(layers) = sugiyama_layers(graph) {
                return layers;
            }
        }
        graph.bfs_layers()
    }
}

impl PlacementEngine for Engine {
    fn place(&self, graph: &SceneGraph, sizes: &[Size]) -> Result<Vec<Point>, LayoutError> {
        let layers = self.layers(graph);
        let mut centers = vec![Point::default(); graph.node_count()];

        let mut x = 0.0;
        for layer in &layers {
            let layer_width = layer
                .iter()
                .map(|&node| sizes[node].width())
                .fold(0.0, f32::max);
            let layer_height = layer.iter().map(|&node| sizes[node].height()).sum::<f32>()
                + self.vertical_spacing * layer.len().saturating_sub(1) as f32;

            // Stack nodes vertically, centered on y = 0
            let mut y = -layer_height / 2.0;
            for &node in layer {
                let size = sizes[node];
                centers[node] = Point::new(x + layer_width / 2.0, y + size.height() / 2.0);
                y += size.height() + self.vertical_spacing;
            }

            x += layer_width + self.horizontal_spacing;
        }

        debug!(layers = layers.len(), nodes = centers.len(); "Placed layered graph");
        Ok(centers)
    }
}

/// Layers from `rust-sugiyama`, or `None` when the graph has no edges or the
/// crate fails.
fn sugiyama_layers(graph: &SceneGraph) -> Option<Vec<Vec<usize>>> {
    let mut edges: Vec<(u32, u32)> = graph
        .edges()
        .filter(|(source, target)| source != target)
        .map(|(source, target)| (source as u32, target as u32))
        .collect();
    edges.sort_unstable();
    edges.dedup();
    if edges.is_empty() {
        return None;
    }

    debug!(
        nodes = graph.node_count(),
        edges = edges.len();
        "Applying Sugiyama algorithm"
    );

    let results = std::panic::catch_unwind(move || {
        let config = Config {
            minimum_length: 1,
            vertex_spacing: 1.0,
            ..Default::default()
        };
        rust_sugiyama::from_edges(&edges, &config)
    });

    let components = match results {
        Ok(components) if !components.is_empty() => components,
        Ok(_) => {
            warn!("Sugiyama returned no layout, falling back to breadth-first layers");
            return None;
        }
        Err(err) => {
            let message = err
                .downcast_ref::<String>()
                .map(String::as_str)
                .or_else(|| err.downcast_ref::<&str>().copied())
                .unwrap_or("unknown error");
            warn!(message; "Sugiyama panicked, falling back to breadth-first layers");
            return None;
        }
    };

    let node_count = graph.node_count();
    let mut placed = vec![false; node_count];
    let mut merged: Vec<Vec<usize>> = Vec::new();

    for (coords, _, _) in &components {
        // Distinct y values are layers, ordered by x within each
        let mut by_layer: HashMap<i64, Vec<(f64, usize)>> = HashMap::new();
        for &(id, (x, y)) in coords {
            let id = id as usize;
            if id >= node_count || placed[id] {
                continue;
            }
            placed[id] = true;
            by_layer.entry(y.round() as i64).or_default().push((x, id));
        }

        let mut keys: Vec<i64> = by_layer.keys().copied().collect();
        keys.sort_unstable();
        let mut layers: Vec<Vec<usize>> = keys
            .into_iter()
            .filter_map(|key| by_layer.remove(&key))
            .map(|mut layer| {
                layer.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
                layer.into_iter().map(|(_, id)| id).collect()
            })
            .collect();

        if points_backwards(graph, &layers) {
            layers.reverse();
        }

        for (depth, layer) in layers.into_iter().enumerate() {
            if merged.len() <= depth {
                merged.resize_with(depth + 1, Vec::new);
            }
            merged[depth].extend(layer);
        }
    }

    if merged.is_empty() {
        return None;
    }
    // Isolated nodes never reach rust-sugiyama
    for (node, seen) in placed.iter().enumerate() {
        if !seen {
            merged[0].push(node);
        }
    }

    Some(merged)
}

/// Returns true if most edges run from a later layer to an earlier one.
fn points_backwards(graph: &SceneGraph, layers: &[Vec<usize>]) -> bool {
    let mut depth_of = HashMap::new();
    for (depth, layer) in layers.iter().enumerate() {
        for &node in layer {
            depth_of.insert(node, depth);
        }
    }

    let (mut forward, mut backward) = (0usize, 0usize);
    for (source, target) in graph.edges() {
        match (depth_of.get(&source), depth_of.get(&target)) {
            (Some(s), Some(t)) if s < t => forward += 1,
            (Some(s), Some(t)) if s > t => backward += 1,
            _ => {}
        }
    }
    backward > forward
}
