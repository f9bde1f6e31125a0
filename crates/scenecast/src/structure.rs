//! Graph structure of a scene draft.
//!
//! [`SceneGraph`] indexes a [`GraphDraft`] as a petgraph [`DiGraph`] so the
//! placement engines can ask for roots, successors and layerings without
//! re-scanning edge lists. Node indices follow draft order, which keeps every
//! traversal deterministic.

use std::collections::{HashMap, VecDeque};

use log::trace;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
};
use thiserror::Error;

use scenecast_text::GraphDraft;

/// A draft that cannot be turned into a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("graph has no nodes")]
    Empty,

    #[error("node `{0}` is defined more than once")]
    DuplicateNode(String),

    #[error("edge {edge} references unknown node `{node}`")]
    UnknownEndpoint { edge: usize, node: String },
}

/// Directed graph over the nodes of one scene.
#[derive(Debug)]
pub struct SceneGraph {
    graph: DiGraph<usize, usize>,
    node_ids: Vec<String>,
}

impl SceneGraph {
    /// Builds the graph for `draft`.
    ///
    /// Node `i` of the graph is node `i` of the draft; edge weights are the
    /// edge positions in the draft.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] for an empty draft, duplicate node ids, or edges
    /// pointing at unknown nodes.
    pub fn from_draft(draft: &GraphDraft) -> Result<Self, GraphError> {
        if draft.nodes.is_empty() {
            return Err(GraphError::Empty);
        }

        let mut graph = DiGraph::with_capacity(draft.nodes.len(), draft.edges.len());
        let mut index_of: HashMap<&str, NodeIndex> = HashMap::with_capacity(draft.nodes.len());
        for (position, node) in draft.nodes.iter().enumerate() {
            let idx = graph.add_node(position);
            if index_of.insert(node.id.as_str(), idx).is_some() {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }

        for (position, edge) in draft.edges.iter().enumerate() {
            let lookup = |id: &str| {
                index_of
                    .get(id)
                    .copied()
                    .ok_or_else(|| GraphError::UnknownEndpoint {
                        edge: position,
                        node: id.to_string(),
                    })
            };
            let source = lookup(&edge.from)?;
            let target = lookup(&edge.to)?;
            graph.add_edge(source, target, position);
        }

        let scene_graph = Self {
            graph,
            node_ids: draft.nodes.iter().map(|node| node.id.clone()).collect(),
        };
        trace!(scene_graph:?; "Built scene graph");
        Ok(scene_graph)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The draft id of node `index`.
    pub fn node_id(&self, index: usize) -> Option<&str> {
        self.node_ids.get(index).map(String::as_str)
    }

    /// Edge endpoints as node positions, in draft order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph.edge_indices().filter_map(|edge| {
            let (source, target) = self.graph.edge_endpoints(edge)?;
            Some((source.index(), target.index()))
        })
    }

    /// Targets of the outgoing edges of `index`, in draft edge order.
    pub fn successors(&self, index: usize) -> Vec<usize> {
        let mut edges: Vec<(usize, usize)> = self
            .graph
            .edges_directed(NodeIndex::new(index), Direction::Outgoing)
            .map(|edge| {
                use petgraph::visit::EdgeRef;
                (*edge.weight(), edge.target().index())
            })
            .collect();
        // petgraph yields the most recently added edge first
        edges.sort_unstable();
        edges.into_iter().map(|(_, target)| target).collect()
    }

    pub fn in_degree(&self, index: usize) -> usize {
        self.graph
            .neighbors_directed(NodeIndex::new(index), Direction::Incoming)
            .count()
    }

    /// Nodes without incoming edges, or the first node when every node has
    /// one.
    pub fn roots(&self) -> Vec<usize> {
        let roots: Vec<usize> = (0..self.node_count())
            .filter(|&index| self.in_degree(index) == 0)
            .collect();
        if roots.is_empty() { vec![0] } else { roots }
    }

    /// Assigns every node to a layer by breadth-first depth from the roots.
    ///
    /// Nodes unreachable from the roots start a new traversal at layer 0, so
    /// every node appears in exactly one layer.
    pub fn bfs_layers(&self) -> Vec<Vec<usize>> {
        let mut layers: Vec<Vec<usize>> = Vec::new();
        let mut visited = vec![false; self.node_count()];
        let mut starts: VecDeque<usize> = self.roots().into();

        loop {
            let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
            while let Some(root) = starts.pop_front() {
                if !visited[root] {
                    visited[root] = true;
                    queue.push_back((root, 0));
                }
            }
            if queue.is_empty() {
                match visited.iter().position(|seen| !seen) {
                    Some(unvisited) => {
                        starts.push_back(unvisited);
                        continue;
                    }
                    None => break,
                }
            }

            while let Some((node, layer)) = queue.pop_front() {
                if layers.len() <= layer {
                    layers.resize_with(layer + 1, Vec::new);
                }
                layers[layer].push(node);

                for child in self.successors(node) {
                    if !visited[child] {
                        visited[child] = true;
                        queue.push_back((child, layer + 1));
                    }
                }
            }
        }

        layers
    }

    /// Spanning forest by depth-first traversal from the roots.
    ///
    /// Returns the forest roots and the children of every node. A node is
    /// the child of the first node that reaches it.
    pub fn spanning_forest(&self) -> (Vec<usize>, Vec<Vec<usize>>) {
        let mut children = vec![Vec::new(); self.node_count()];
        let mut visited = vec![false; self.node_count()];
        let mut forest_roots = Vec::new();

        let starts = self.roots().into_iter().chain(0..self.node_count());
        for root in starts {
            if visited[root] {
                continue;
            }
            visited[root] = true;
            forest_roots.push(root);

            let mut stack = vec![root];
            while let Some(node) = stack.pop() {
                let successors = self.successors(node);
                let mut claimed = Vec::new();
                for child in successors {
                    if !visited[child] {
                        visited[child] = true;
                        claimed.push(child);
                    }
                }
                // Reverse so the first child is explored first
                stack.extend(claimed.iter().rev().copied());
                children[node] = claimed;
            }
        }

        (forest_roots, children)
    }
}
