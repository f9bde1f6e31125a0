use proptest::prelude::*;
use tokio_util::sync::CancellationToken;

use scenecast::{
    GraphDraft, SceneBuilder,
    config::LayoutConfig,
    geometry::{Bounds, Insets, Point, Size},
    layout::{CollisionResolver, LayoutEngine},
    semantic::{Archetype, LayoutQuality, Node},
};

fn draft(count: usize, edges: &[(usize, usize)]) -> GraphDraft {
    let mut draft = GraphDraft::new();
    for i in 0..count {
        draft.add_node(format!("n{i}"), format!("Node {i}"));
    }
    for &(from, to) in edges {
        draft.add_edge(format!("n{from}"), format!("n{to}"));
    }
    draft
}

fn padded_overlaps(nodes: &[Node], min_spacing: f32) -> usize {
    let padded: Vec<Bounds> = nodes
        .iter()
        .filter_map(Node::bounds)
        .map(|bounds| bounds.add_padding(Insets::uniform(min_spacing / 2.0)))
        .collect();
    let mut count = 0;
    for (i, first) in padded.iter().enumerate() {
        count += padded[i + 1..]
            .iter()
            .filter(|second| first.intersects(second))
            .count();
    }
    count
}

// =============================================================================
// Collision resolution
// =============================================================================

#[test]
fn test_ten_nodes_with_six_overlaps_resolve_completely() {
    let resolver = CollisionResolver::new(&LayoutConfig::default());
    let sizes = vec![Size::new(80.0, 40.0); 10];
    let mut centers = vec![
        // Two clusters of three mutually overlapping nodes
        Point::new(0.0, 0.0),
        Point::new(30.0, 0.0),
        Point::new(15.0, 20.0),
        Point::new(1000.0, 0.0),
        Point::new(1030.0, 10.0),
        Point::new(1010.0, 25.0),
        // Well separated
        Point::new(0.0, 600.0),
        Point::new(400.0, 600.0),
        Point::new(800.0, 600.0),
        Point::new(1200.0, 600.0),
    ];
    assert_eq!(resolver.overlapping_pairs(&centers, &sizes).len(), 6);

    let resolution = resolver
        .resolve(&mut centers, &sizes, &CancellationToken::new())
        .unwrap();

    assert!(resolution.is_complete());
    assert!(resolution.iterations > 0);
    assert!(resolver.overlapping_pairs(&centers, &sizes).is_empty());
}

// =============================================================================
// Layout engine
// =============================================================================

#[test]
fn test_layout_is_idempotent() {
    let engine = LayoutEngine::default();
    let draft = draft(6, &[(0, 1), (1, 2), (1, 3), (3, 4), (4, 5), (5, 1)]);
    for archetype in Archetype::ALL {
        let first = engine
            .layout(&draft, archetype, &CancellationToken::new())
            .unwrap();
        let second = engine
            .layout(&draft, archetype, &CancellationToken::new())
            .unwrap();
        assert_eq!(first, second, "{archetype} layout changed between runs");
    }
}

#[test]
fn test_every_archetype_lays_out_without_overlap() {
    let engine = LayoutEngine::default();
    let draft = draft(8, &[(0, 1), (1, 2), (2, 3), (0, 4), (4, 5), (5, 6), (6, 7)]);
    for archetype in Archetype::ALL {
        let laid_out = engine
            .layout(&draft, archetype, &CancellationToken::new())
            .unwrap();
        assert_eq!(laid_out.report.quality, LayoutQuality::Complete);
        assert_eq!(padded_overlaps(&laid_out.nodes, 40.0), 0, "{archetype}");
        assert!(laid_out.nodes.iter().all(Node::is_placed));
    }
}

#[test]
fn test_tree_layout_puts_root_on_top() {
    let builder = SceneBuilder::default();
    let draft = draft(5, &[(0, 1), (0, 2), (1, 3), (1, 4)]);
    let laid_out = builder.layout(&draft, Archetype::Tree).unwrap();

    let root_y = laid_out.nodes[0].y.unwrap();
    assert!(laid_out.nodes[1..].iter().all(|node| node.y.unwrap() > root_y));
    // Grandchildren share a level below their parent
    assert_eq!(laid_out.nodes[3].y, laid_out.nodes[4].y);
    assert!(laid_out.nodes[3].y.unwrap() > laid_out.nodes[1].y.unwrap());
}

#[test]
fn test_cycle_layout_fits_default_canvas() {
    let builder = SceneBuilder::default();
    let draft = draft(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]);
    let laid_out = builder.layout(&draft, Archetype::Cycle).unwrap();
    assert!(laid_out.report.fits_canvas);
    assert_eq!(laid_out.report.edge_collision_count, 0);
}

#[test]
fn test_cancelled_layout_stops() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = LayoutEngine::default().layout(&draft(3, &[(0, 1)]), Archetype::Flow, &cancel);
    assert!(result.is_err());
}

// =============================================================================
// Properties
// =============================================================================

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (2usize..=12).prop_flat_map(|count| {
        let edges = prop::collection::vec((0..count, 0..count), 0..count * 2).prop_map(|edges| {
            let mut edges: Vec<_> = edges.into_iter().filter(|(a, b)| a != b).collect();
            edges.sort_unstable();
            edges.dedup();
            edges
        });
        (Just(count), edges)
    })
}

fn check_complete_layouts_have_no_overlap(count: usize, edges: &[(usize, usize)], archetype: Archetype) {
    let laid_out = LayoutEngine::default()
        .layout(&draft(count, edges), archetype, &CancellationToken::new())
        .unwrap();

    if laid_out.report.quality == LayoutQuality::Complete {
        assert_eq!(padded_overlaps(&laid_out.nodes, 40.0), 0);
    } else {
        assert!(laid_out.report.residual_overlap_count > 0);
    }
}

fn check_edges_are_valid(count: usize, edges: &[(usize, usize)], archetype: Archetype) {
    let laid_out = LayoutEngine::default()
        .layout(&draft(count, edges), archetype, &CancellationToken::new())
        .unwrap();

    assert_eq!(laid_out.edges.len(), edges.len());
    for edge in &laid_out.edges {
        assert!(laid_out.nodes.iter().any(|node| node.id == edge.from_node_id));
        assert!(laid_out.nodes.iter().any(|node| node.id == edge.to_node_id));
        assert!(edge.points.len() >= 2);
        assert!(edge.points.iter().all(|point| point.is_finite()));
    }
    assert!(laid_out.report.edge_collision_count <= edges.len());
    for node in &laid_out.nodes {
        assert!(node.width > 0.0 && node.height > 0.0);
        assert!(node.x.unwrap() >= 40.0 - 1e-3);
        assert!(node.y.unwrap() >= 40.0 - 1e-3);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_complete_layouts_have_no_overlap(
        (count, edges) in graph_strategy(),
        archetype in prop::sample::select(Archetype::ALL.to_vec()),
    ) {
        check_complete_layouts_have_no_overlap(count, &edges, archetype);
    }

    #[test]
    fn prop_edges_are_valid(
        (count, edges) in graph_strategy(),
        archetype in prop::sample::select(Archetype::ALL.to_vec()),
    ) {
        check_edges_are_valid(count, &edges, archetype);
    }
}
