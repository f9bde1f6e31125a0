//! Unpositioned graphs produced by extraction.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Diagnostic, DiagnosticCollector, ErrorCode, Location, TranscriptError};

/// A node candidate before sizing and placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftNode {
    pub id: String,
    pub label: String,
}

/// A directed relation between two draft nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEdge {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl DraftEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: None,
        }
    }
}

/// Nodes and edges of one scene, without geometry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphDraft {
    pub nodes: Vec<DraftNode>,
    pub edges: Vec<DraftEdge>,
}

impl GraphDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: impl Into<String>, label: impl Into<String>) {
        self.nodes.push(DraftNode {
            id: id.into(),
            label: label.into(),
        });
    }

    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.edges.push(DraftEdge::new(from, to));
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }

    /// Keeps the first `max_nodes` nodes and drops edges touching the rest.
    pub fn truncate_nodes(&mut self, max_nodes: usize) {
        if self.nodes.len() <= max_nodes {
            return;
        }
        self.nodes.truncate(max_nodes);
        let kept: HashSet<&str> = self.nodes.iter().map(|node| node.id.as_str()).collect();
        self.edges
            .retain(|edge| kept.contains(edge.from.as_str()) && kept.contains(edge.to.as_str()));
    }

    /// Checks that the graph can be laid out.
    ///
    /// # Errors
    ///
    /// Returns every problem found: no nodes, empty or duplicate ids, edges
    /// with unknown endpoints, and self loops.
    pub fn validate(&self) -> Result<(), TranscriptError> {
        let mut collector = DiagnosticCollector::new();

        if self.nodes.is_empty() {
            collector.emit(
                Diagnostic::error("graph has no nodes")
                    .with_code(ErrorCode::E100)
                    .with_help("a scene needs at least one node"),
            );
        }

        let mut ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if node.id.trim().is_empty() {
                collector.emit(
                    Diagnostic::error("node id is empty")
                        .with_code(ErrorCode::E101)
                        .with_label(Location::Node(node.id.clone()), format!("label `{}`", node.label)),
                );
                continue;
            }
            if !ids.insert(node.id.as_str()) {
                collector.emit(
                    Diagnostic::error(format!("node id `{}` is defined more than once", node.id))
                        .with_code(ErrorCode::E102)
                        .with_label(Location::Node(node.id.clone()), "duplicate"),
                );
            }
        }

        for (index, edge) in self.edges.iter().enumerate() {
            for endpoint in [&edge.from, &edge.to] {
                if !ids.contains(endpoint.as_str()) {
                    collector.emit(
                        Diagnostic::error(format!("edge references unknown node `{endpoint}`"))
                            .with_code(ErrorCode::E103)
                            .with_label(Location::Edge(index), format!("{} -> {}", edge.from, edge.to)),
                    );
                }
            }
            if edge.from == edge.to {
                collector.emit(
                    Diagnostic::error(format!("edge loops back to `{}`", edge.from))
                        .with_code(ErrorCode::E104)
                        .with_label(Location::Edge(index), "self loop"),
                );
            }
        }

        collector.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> GraphDraft {
        let mut draft = GraphDraft::new();
        draft.add_node("a", "A");
        draft.add_node("b", "B");
        draft.add_node("c", "C");
        draft.add_edge("a", "b");
        draft.add_edge("b", "c");
        draft
    }

    #[test]
    fn test_valid_draft() {
        assert!(abc().validate().is_ok());
    }

    #[test]
    fn test_empty_draft_rejected() {
        let err = GraphDraft::new().validate().unwrap_err();
        assert!(err.has_code(ErrorCode::E100));
    }

    #[test]
    fn test_invalid_draft_reports_everything() {
        let mut draft = abc();
        draft.add_node("a", "Again");
        draft.add_node(" ", "Blank");
        draft.add_edge("c", "zzz");
        draft.add_edge("b", "b");

        let err = draft.validate().unwrap_err();
        assert!(err.has_code(ErrorCode::E101));
        assert!(err.has_code(ErrorCode::E102));
        assert!(err.has_code(ErrorCode::E103));
        assert!(err.has_code(ErrorCode::E104));
    }

    #[test]
    fn test_truncate_drops_dangling_edges() {
        let mut draft = abc();
        draft.truncate_nodes(2);
        assert_eq!(draft.nodes.len(), 2);
        assert_eq!(draft.edges, vec![DraftEdge::new("a", "b")]);
    }
}
