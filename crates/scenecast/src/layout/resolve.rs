//! Iterative collision resolution.
//!
//! Every iteration finds all pairs of node boxes that overlap once padded by
//! half the minimum spacing, and pushes each pair apart along the line
//! between their centers. The push is proportional to the overlap depth; a
//! node's displacements from all of its pairs are summed and damped before
//! they are applied. Resolution stops when no pair overlaps or the iteration
//! budget is spent; in the latter case the positions with the fewest
//! overlapping pairs seen are kept.

use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use scenecast_core::geometry::{Bounds, Insets, Point, Size};

use crate::{config::LayoutConfig, layout::LayoutError};

/// Direction increment for pairs whose centers coincide, in radians.
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Extra gap kept on top of the minimum spacing so rounding in later
/// translations cannot reintroduce a touching pair.
const CLEARANCE: f32 = 0.5;

/// Outcome of a resolution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Iterations that moved nodes.
    pub iterations: usize,
    pub residual_overlaps: usize,
}

impl Resolution {
    pub fn is_complete(&self) -> bool {
        self.residual_overlaps == 0
    }
}

#[derive(Debug, Clone)]
pub struct CollisionResolver {
    padding: Insets,
    separation_multiplier: f32,
    damping: f32,
    max_iterations: usize,
    log_interval: usize,
}

impl CollisionResolver {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            padding: Insets::uniform((config.min_spacing + CLEARANCE) / 2.0),
            separation_multiplier: config.separation_multiplier,
            damping: config.damping,
            max_iterations: config.max_iterations,
            log_interval: config.log_interval.max(1),
        }
    }

    /// Index pairs `(i, j)` with `i < j` whose padded boxes overlap, with
    /// their overlap along each axis.
    pub fn overlapping_pairs(
        &self,
        centers: &[Point],
        sizes: &[Size],
    ) -> Vec<(usize, usize, f32, f32)> {
        let padded: Vec<Bounds> = centers
            .iter()
            .zip(sizes)
            .map(|(center, size)| center.to_bounds(*size).add_padding(self.padding))
            .collect();

        let mut pairs = Vec::new();
        for (i, first) in padded.iter().enumerate() {
            for (offset, second) in padded[i + 1..].iter().enumerate() {
                if let Some((overlap_x, overlap_y)) = first.overlap(second) {
                    pairs.push((i, i + 1 + offset, overlap_x, overlap_y));
                }
            }
        }
        pairs
    }

    /// Moves `centers` until no padded boxes overlap or the budget runs out.
    ///
    /// When the budget runs out, `centers` holds the best positions found,
    /// which may be an earlier iteration than the last.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Cancelled`] when `cancel` fires; it is checked
    /// before every iteration.
    pub fn resolve(
        &self,
        centers: &mut [Point],
        sizes: &[Size],
        cancel: &CancellationToken,
    ) -> Result<Resolution, LayoutError> {
        let mut iterations = 0;
        // Fewest overlaps seen so far; later states win ties
        let mut best_count = usize::MAX;
        let mut best_centers = centers.to_vec();

        loop {
            if cancel.is_cancelled() {
                return Err(LayoutError::Cancelled);
            }

            let pairs = self.overlapping_pairs(centers, sizes);
            if pairs.is_empty() {
                debug!(iterations; "Collision resolution converged");
                return Ok(Resolution {
                    iterations,
                    residual_overlaps: 0,
                });
            }
            if pairs.len() <= best_count {
                best_count = pairs.len();
                best_centers.copy_from_slice(centers);
            }

            if iterations == self.max_iterations {
                centers.copy_from_slice(&best_centers);
                warn!(
                    iterations,
                    residual_overlaps = best_count;
                    "Collision resolution budget exhausted"
                );
                return Ok(Resolution {
                    iterations,
                    residual_overlaps: best_count,
                });
            }

            if iterations % self.log_interval == 0 {
                debug!(iteration = iterations, overlaps = pairs.len(); "Resolving collisions");
            }

            let mut displacement = vec![Point::default(); centers.len()];
            for (ordinal, &(i, j, overlap_x, overlap_y)) in pairs.iter().enumerate() {
                let push = overlap_x.min(overlap_y) * self.separation_multiplier / 2.0;
                let direction = centers[j]
                    .sub_point(centers[i])
                    .normalized()
                    .unwrap_or_else(|| {
                        let angle = GOLDEN_ANGLE * (ordinal + 1) as f32;
                        Point::new(angle.cos(), angle.sin())
                    });
                let step = direction.scale(push);
                displacement[i] = displacement[i].sub_point(step);
                displacement[j] = displacement[j].add_point(step);
            }

            for (center, delta) in centers.iter_mut().zip(&displacement) {
                *center = center.add_point(delta.scale(self.damping));
            }
            iterations += 1;
        }
    }
}
