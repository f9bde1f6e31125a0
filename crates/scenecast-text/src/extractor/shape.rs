//! Archetype-specific graph shaping.

use std::collections::{HashMap, HashSet};

use scenecast_core::semantic::Archetype;

use crate::{
    extractor::{
        candidates::order_hint,
        draft::{DraftEdge, GraphDraft},
    },
    lexer,
};

/// Reshapes `draft` so its edges fit `archetype`.
///
/// - `tree`: a single root, exactly one parent per other node
/// - `timeline`: nodes ordered by date or ordinal, consecutive edges only
/// - `cycle`: a chain in node order closed back to the first node
/// - `flow`: the detected edges, or a chain when none were detected
/// - `matrix`: the detected edges only
///
/// `order_hints` maps node ids to sort keys for timelines; nodes without a
/// hint fall back to a year or ordinal found in their label.
pub(crate) fn shape(
    mut draft: GraphDraft,
    archetype: Archetype,
    order_hints: &HashMap<String, f64>,
) -> GraphDraft {
    normalize_edges(&mut draft);

    match archetype {
        Archetype::Flow => {
            if draft.edges.is_empty() {
                chain(&mut draft);
            }
        }
        Archetype::Tree => shape_tree(&mut draft),
        Archetype::Timeline => {
            order_nodes(&mut draft, order_hints);
            draft.edges.clear();
            chain(&mut draft);
        }
        Archetype::Cycle => {
            draft.edges.clear();
            chain(&mut draft);
            if let [first, .., last] = draft.nodes.as_slice() {
                let closing = DraftEdge::new(last.id.clone(), first.id.clone());
                draft.edges.push(closing);
            }
        }
        Archetype::Matrix => {}
    }

    draft
}

/// Drops self loops, duplicate edges and edges with unknown endpoints.
fn normalize_edges(draft: &mut GraphDraft) {
    let ids: HashSet<String> = draft.nodes.iter().map(|node| node.id.clone()).collect();
    let mut seen = HashSet::new();
    draft.edges.retain(|edge| {
        edge.from != edge.to
            && ids.contains(&edge.from)
            && ids.contains(&edge.to)
            && seen.insert((edge.from.clone(), edge.to.clone()))
    });
}

fn chain(draft: &mut GraphDraft) {
    let edges: Vec<DraftEdge> = draft
        .nodes
        .windows(2)
        .map(|pair| DraftEdge::new(pair[0].id.clone(), pair[1].id.clone()))
        .collect();
    draft.edges.extend(edges);
}

fn shape_tree(draft: &mut GraphDraft) {
    let Some(first) = draft.nodes.first() else {
        return;
    };

    let inbound: HashSet<&str> = draft.edges.iter().map(|edge| edge.to.as_str()).collect();
    let root = draft
        .nodes
        .iter()
        .find(|node| !inbound.contains(node.id.as_str()))
        .unwrap_or(first)
        .id
        .clone();

    let mut parent: HashMap<String, String> = HashMap::new();
    let mut kept = Vec::with_capacity(draft.nodes.len());

    for edge in std::mem::take(&mut draft.edges) {
        // First detected parent wins; edges into the root or closing a cycle are dropped
        if edge.to == root
            || parent.contains_key(&edge.to)
            || is_ancestor(&parent, &edge.to, &edge.from)
        {
            continue;
        }
        parent.insert(edge.to.clone(), edge.from.clone());
        kept.push(edge);
    }

    for node in &draft.nodes {
        if node.id != root && !parent.contains_key(&node.id) {
            parent.insert(node.id.clone(), root.clone());
            kept.push(DraftEdge::new(root.clone(), node.id.clone()));
        }
    }

    draft.edges = kept;
}

/// Returns true if `candidate` is `node` or one of its ancestors.
fn is_ancestor(parent: &HashMap<String, String>, candidate: &str, node: &str) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        if id == candidate {
            return true;
        }
        current = parent.get(id).map(String::as_str);
    }
    false
}

fn order_nodes(draft: &mut GraphDraft, order_hints: &HashMap<String, f64>) {
    let mut previous = f64::NEG_INFINITY;
    let mut keyed: Vec<(f64, usize)> = draft
        .nodes
        .iter()
        .enumerate()
        .map(|(position, node)| {
            let key = order_hints
                .get(&node.id)
                .copied()
                .or_else(|| order_hint(&lexer::tokenize(&node.label)))
                .unwrap_or(previous);
            previous = key;
            (key, position)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| a.total_cmp(b));

    let mut nodes: Vec<_> = std::mem::take(&mut draft.nodes).into_iter().map(Some).collect();
    draft.nodes = keyed
        .into_iter()
        .filter_map(|(_, position)| nodes[position].take())
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::draft::DraftNode;

    fn draft(nodes: &[&str], edges: &[(&str, &str)]) -> GraphDraft {
        GraphDraft {
            nodes: nodes
                .iter()
                .map(|id| DraftNode {
                    id: id.to_string(),
                    label: id.to_string(),
                })
                .collect(),
            edges: edges.iter().map(|(from, to)| DraftEdge::new(*from, *to)).collect(),
        }
    }

    fn edge_pairs(draft: &GraphDraft) -> Vec<(&str, &str)> {
        draft
            .edges
            .iter()
            .map(|edge| (edge.from.as_str(), edge.to.as_str()))
            .collect()
    }

    #[test]
    fn test_flow_without_edges_chains() {
        let shaped = shape(draft(&["a", "b", "c"], &[]), Archetype::Flow, &HashMap::new());
        assert_eq!(edge_pairs(&shaped), vec![("a", "b"), ("b", "c")]);
    }

    #[test]
    fn test_flow_keeps_detected_edges() {
        let shaped = shape(
            draft(&["a", "b", "c"], &[("a", "c"), ("a", "c"), ("b", "b")]),
            Archetype::Flow,
            &HashMap::new(),
        );
        assert_eq!(edge_pairs(&shaped), vec![("a", "c")]);
    }

    #[test]
    fn test_tree_single_parent_and_orphans() {
        let shaped = shape(
            draft(
                &["ceo", "vp", "dir", "team", "intern"],
                &[("ceo", "vp"), ("vp", "dir"), ("ceo", "dir"), ("vp", "team")],
            ),
            Archetype::Tree,
            &HashMap::new(),
        );
        assert_eq!(
            edge_pairs(&shaped),
            vec![("ceo", "vp"), ("vp", "dir"), ("vp", "team"), ("ceo", "intern")]
        );
    }

    #[test]
    fn test_tree_drops_cycle_closing_edges() {
        let shaped = shape(
            draft(&["a", "b", "c"], &[("b", "c"), ("c", "b"), ("c", "a")]),
            Archetype::Tree,
            &HashMap::new(),
        );
        // Every node has an inbound edge, so the first node becomes the root
        let pairs = edge_pairs(&shaped);
        assert_eq!(pairs.len(), 2);
        let mut targets: Vec<_> = pairs.iter().map(|(_, to)| *to).collect();
        targets.sort();
        targets.dedup();
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn test_tree_all_nodes_have_inbound_uses_first_as_root() {
        let shaped = shape(
            draft(&["a", "b"], &[("a", "b"), ("b", "a")]),
            Archetype::Tree,
            &HashMap::new(),
        );
        assert_eq!(edge_pairs(&shaped), vec![("a", "b")]);
    }

    #[test]
    fn test_timeline_orders_by_hint() {
        let mut hints = HashMap::new();
        hints.insert("late".to_string(), 2001.0);
        hints.insert("early".to_string(), 1990.0);
        let shaped = shape(
            draft(&["late", "early", "mid"], &[]),
            Archetype::Timeline,
            &hints,
        );
        let order: Vec<_> = shaped.nodes.iter().map(|n| n.id.as_str()).collect();
        // "mid" inherits the key of the node mentioned before it
        assert_eq!(order, ["early", "mid", "late"]);
        assert_eq!(edge_pairs(&shaped), vec![("early", "mid"), ("mid", "late")]);
    }

    #[test]
    fn test_timeline_orders_by_label_year() {
        let mut graph = draft(&["b", "a"], &[]);
        graph.nodes[0].label = "Launch in 2010".to_string();
        graph.nodes[1].label = "Founded 1998".to_string();
        let shaped = shape(graph, Archetype::Timeline, &HashMap::new());
        assert_eq!(shaped.nodes[0].id, "a");
    }

    #[test]
    fn test_cycle_closes_chain() {
        let shaped = shape(
            draft(&["plan", "do", "check", "act"], &[("act", "do")]),
            Archetype::Cycle,
            &HashMap::new(),
        );
        assert_eq!(
            edge_pairs(&shaped),
            vec![("plan", "do"), ("do", "check"), ("check", "act"), ("act", "plan")]
        );
    }

    #[test]
    fn test_matrix_keeps_only_detected_edges() {
        let shaped = shape(draft(&["a", "b"], &[]), Archetype::Matrix, &HashMap::new());
        assert!(shaped.edges.is_empty());
    }
}
