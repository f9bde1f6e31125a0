//! Circular placement for cycles.

use std::f32::consts::PI;

use scenecast_core::geometry::{Point, Size};

use crate::{
    layout::{LayoutError, engines::PlacementEngine},
    structure::SceneGraph,
};

/// Spreads nodes evenly on a circle, clockwise from the top.
///
/// The radius is chosen so neighbouring centers are at least one padded
/// node diagonal apart.
pub struct Engine {
    spacing: f32,
}

impl Engine {
    pub fn new() -> Self {
        Self { spacing: 60.0 }
    }

    pub fn set_spacing(&mut self, spacing: f32) -> &mut Self {
        self.spacing = spacing;
        self
    }

    fn radius(&self, count: usize, sizes: &[Size]) -> f32 {
        let largest = sizes.iter().fold(Size::default(), |acc, size| acc.max(*size));
        let chord = (largest.width() + self.spacing).hypot(largest.height() + self.spacing);
        chord / (2.0 * (PI / count as f32).sin())
    }
}

impl PlacementEngine for Engine {
    fn place(&self, graph: &SceneGraph, sizes: &[Size]) -> Result<Vec<Point>, LayoutError> {
        let count = graph.node_count();
        if count == 1 {
            return Ok(vec![Point::default()]);
        }

        let radius = self.radius(count, sizes);
        Ok((0..count)
            .map(|index| {
                let angle = -PI / 2.0 + 2.0 * PI * index as f32 / count as f32;
                Point::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use scenecast_text::GraphDraft;

    use super::*;

    fn ring(count: usize) -> SceneGraph {
        let mut draft = GraphDraft::new();
        for i in 0..count {
            draft.add_node(format!("n{i}"), "phase");
        }
        SceneGraph::from_draft(&draft).unwrap()
    }

    #[test]
    fn test_first_node_on_top() {
        let centers = Engine::new()
            .place(&ring(4), &[Size::new(80.0, 40.0); 4])
            .unwrap();
        assert!(approx_eq!(f32, centers[0].x(), 0.0, epsilon = 1e-3));
        assert!(centers[0].y() < 0.0);
        assert!(centers[1].x() > 0.0);
    }

    #[test]
    fn test_neighbours_are_a_diagonal_apart() {
        let sizes = [Size::new(80.0, 40.0); 6];
        let centers = Engine::new().place(&ring(6), &sizes).unwrap();
        let diagonal = 140.0f32.hypot(100.0);
        for i in 0..6 {
            let next = centers[(i + 1) % 6];
            let distance = next.sub_point(centers[i]).hypot();
            assert!(approx_eq!(f32, distance, diagonal, epsilon = 1e-2));
        }
    }

    #[test]
    fn test_single_node_at_origin() {
        let centers = Engine::new()
            .place(&ring(1), &[Size::new(80.0, 40.0)])
            .unwrap();
        assert_eq!(centers, vec![Point::default()]);
    }
}
