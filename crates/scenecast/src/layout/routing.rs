//! Edge routing between placed nodes.
//!
//! Edges leave and enter nodes on their boundary, where the ray between the
//! two centers crosses it. A straight segment is kept unless it runs through
//! an unrelated node; then the better of the two orthogonal elbows is used.
//! Parallel edges between the same pair of nodes bend through midpoints
//! offset perpendicular to the center line so they stay distinguishable.

use std::collections::HashMap;

use scenecast_core::geometry::{Bounds, Point};

/// Perpendicular distance between neighbouring parallel edges.
const PARALLEL_OFFSET: f32 = 16.0;

/// A routed edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub points: Vec<Point>,
    /// True if the route still runs through an unrelated node.
    pub collides: bool,
}

/// Routes every edge of `edges` between the node boxes in `bounds`.
pub fn route_edges(bounds: &[Bounds], edges: &[(usize, usize)]) -> Vec<Route> {
    let mut parallel: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    for (index, &(from, to)) in edges.iter().enumerate() {
        if from != to {
            parallel.entry((from.min(to), from.max(to))).or_default().push(index);
        }
    }

    edges
        .iter()
        .enumerate()
        .map(|(index, &(from, to))| {
            if from == to {
                return self_loop(bounds[from]);
            }
            let key = (from.min(to), from.max(to));
            let group = parallel.get(&key).map_or(&[][..], Vec::as_slice);
            if group.len() > 1 {
                let slot = group.iter().position(|&i| i == index).unwrap_or(0);
                offset_route(bounds, from, to, key, slot, group.len())
            } else {
                direct_route(bounds, from, to)
            }
        })
        .collect()
}

/// Number of unrelated node boxes crossed by the polyline.
fn collisions(bounds: &[Bounds], from: usize, to: usize, points: &[Point]) -> usize {
    bounds
        .iter()
        .enumerate()
        .filter(|&(index, _)| index != from && index != to)
        .filter(|(_, node)| {
            points
                .windows(2)
                .any(|segment| node.intersects_segment(segment[0], segment[1]))
        })
        .count()
}

fn direct_route(bounds: &[Bounds], from: usize, to: usize) -> Route {
    let (source, target) = (bounds[from], bounds[to]);
    let straight = vec![
        source.boundary_toward(target.center()),
        target.boundary_toward(source.center()),
    ];
    let straight_hits = collisions(bounds, from, to, &straight);
    if straight_hits == 0 {
        return Route {
            points: straight,
            collides: false,
        };
    }

    let corners = [
        Point::new(target.center().x(), source.center().y()),
        Point::new(source.center().x(), target.center().y()),
    ];
    let mut best = (straight_hits, straight);
    for corner in corners {
        let elbow = vec![
            source.boundary_toward(corner),
            corner,
            target.boundary_toward(corner),
        ];
        let hits = collisions(bounds, from, to, &elbow);
        if hits < best.0 {
            best = (hits, elbow);
        }
    }

    Route {
        collides: best.0 > 0,
        points: best.1,
    }
}

fn offset_route(
    bounds: &[Bounds],
    from: usize,
    to: usize,
    key: (usize, usize),
    slot: usize,
    count: usize,
) -> Route {
    let (source, target) = (bounds[from], bounds[to]);
    // Offsets are measured against one canonical direction so reversed edges
    // of the pair land on different sides
    let axis = bounds[key.1].center().sub_point(bounds[key.0].center());
    let normal = axis
        .normalized()
        .map_or(Point::new(0.0, 1.0), Point::perpendicular);
    let shift = (slot as f32 - (count - 1) as f32 / 2.0) * PARALLEL_OFFSET;
    let middle = source
        .center()
        .midpoint(target.center())
        .add_point(normal.scale(shift));

    let points = vec![
        source.boundary_toward(middle),
        middle,
        target.boundary_toward(middle),
    ];
    Route {
        collides: collisions(bounds, from, to, &points) > 0,
        points,
    }
}

/// A small loop above the node.
fn self_loop(node: Bounds) -> Route {
    let quarter = node.width() / 4.0;
    let top = node.min_y();
    let lift = node.height() / 2.0;
    let center_x = node.center().x();
    Route {
        points: vec![
            Point::new(center_x - quarter, top),
            Point::new(center_x - quarter, top - lift),
            Point::new(center_x + quarter, top - lift),
            Point::new(center_x + quarter, top),
        ],
        collides: false,
    }
}
