//! Top-down tree placement.

use log::debug;

use scenecast_core::geometry::{Point, Size};

use crate::{
    layout::{LayoutError, engines::PlacementEngine},
    structure::SceneGraph,
};

/// Places a spanning forest top to bottom.
///
/// Each level sits below the tallest node of the previous one, siblings are
/// spread horizontally, and every parent is centered over its children.
/// Separate trees of the forest are placed side by side.
pub struct Engine {
    sibling_spacing: f32,
    level_spacing: f32,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            sibling_spacing: 60.0,
            level_spacing: 60.0,
        }
    }

    pub fn set_sibling_spacing(&mut self, spacing: f32) -> &mut Self {
        self.sibling_spacing = spacing;
        self
    }

    pub fn set_level_spacing(&mut self, spacing: f32) -> &mut Self {
        self.level_spacing = spacing;
        self
    }

    /// Width of the subtree rooted at every node, filled bottom-up.
    fn subtree_widths(&self, order: &[usize], children: &[Vec<usize>], sizes: &[Size]) -> Vec<f32> {
        let mut widths = vec![0.0; sizes.len()];
        for &node in order.iter().rev() {
            let kids = &children[node];
            let spread = kids.iter().map(|&child| widths[child]).sum::<f32>()
                + self.sibling_spacing * kids.len().saturating_sub(1) as f32;
            widths[node] = sizes[node].width().max(spread);
        }
        widths
    }
}

impl PlacementEngine for Engine {
    fn place(&self, graph: &SceneGraph, sizes: &[Size]) -> Result<Vec<Point>, LayoutError> {
        let (roots, children) = graph.spanning_forest();

        // Pre-order visit with depths
        let mut order = Vec::with_capacity(sizes.len());
        let mut depth = vec![0usize; sizes.len()];
        let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            order.push(node);
            for &child in children[node].iter().rev() {
                depth[child] = depth[node] + 1;
                stack.push(child);
            }
        }

        let levels = depth.iter().copied().max().map_or(0, |max| max + 1);
        let mut level_height = vec![0.0f32; levels];
        for (node, &level) in depth.iter().enumerate() {
            level_height[level] = level_height[level].max(sizes[node].height());
        }
        let mut level_center = Vec::with_capacity(levels);
        let mut y = 0.0;
        for height in &level_height {
            level_center.push(y + height / 2.0);
            y += height + self.level_spacing;
        }

        let widths = self.subtree_widths(&order, &children, sizes);
        let mut centers = vec![Point::default(); sizes.len()];
        let mut left = vec![0.0f32; sizes.len()];

        let mut forest_x = 0.0;
        for &root in &roots {
            left[root] = forest_x;
            forest_x += widths[root] + self.sibling_spacing;
        }

        for &node in &order {
            let kids = &children[node];
            let spread = kids.iter().map(|&child| widths[child]).sum::<f32>()
                + self.sibling_spacing * kids.len().saturating_sub(1) as f32;

            // Children block is centered under the node's subtree span
            let mut x = left[node] + (widths[node] - spread) / 2.0;
            for &child in kids {
                left[child] = x;
                x += widths[child] + self.sibling_spacing;
            }

            centers[node] = Point::new(left[node] + widths[node] / 2.0, level_center[depth[node]]);
        }

        debug!(trees = roots.len(), levels; "Placed tree");
        Ok(centers)
    }
}
