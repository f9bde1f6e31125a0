//! Grid placement for comparison matrices.

use scenecast_core::geometry::{Point, Size};

use crate::{
    layout::{LayoutError, engines::PlacementEngine},
    structure::SceneGraph,
};

/// Places nodes row by row on a grid of ⌈√n⌉ columns.
///
/// Every cell has the size of the largest node plus spacing, so the grid is
/// overlap-free before collision resolution runs.
pub struct Engine {
    column_spacing: f32,
    row_spacing: f32,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            column_spacing: 60.0,
            row_spacing: 60.0,
        }
    }

    pub fn set_column_spacing(&mut self, spacing: f32) -> &mut Self {
        self.column_spacing = spacing;
        self
    }

    pub fn set_row_spacing(&mut self, spacing: f32) -> &mut Self {
        self.row_spacing = spacing;
        self
    }
}

/// Number of grid columns for `count` nodes.
pub fn columns(count: usize) -> usize {
    (count as f64).sqrt().ceil().max(1.0) as usize
}

impl PlacementEngine for Engine {
    fn place(&self, graph: &SceneGraph, sizes: &[Size]) -> Result<Vec<Point>, LayoutError> {
        let columns = columns(graph.node_count());
        let cell = sizes.iter().fold(Size::default(), |acc, size| acc.max(*size));
        let cell_width = cell.width() + self.column_spacing;
        let cell_height = cell.height() + self.row_spacing;

        Ok((0..graph.node_count())
            .map(|index| {
                let (row, column) = (index / columns, index % columns);
                Point::new(column as f32 * cell_width, row as f32 * cell_height)
            })
            .collect())
    }
}
