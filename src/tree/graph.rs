// src/tree/graph.rs
// =============================================================================
// The in-memory graph we build while walking the repository.
//
// Storage is a petgraph DiGraph. Every node carries its id, which is the
// repository path with every '/' replaced by '_' ("src/main.py" ->
// "src_main.py"). The repository root sits at a fixed index with the id
// ROOT_ID, which no flattened path can equal; it is not counted as a node.
//
// Duplicates:
// - registering the same node id twice keeps the first node and bumps the
//   `duplicates` counter
// - identical edges are stored once
// =============================================================================

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::warn;

/// Id of the implicit repository root
pub const ROOT_ID: &str = "/";

/// "src/main.py" -> "src_main.py"
pub fn flatten_path(path: &str) -> String {
    path.replace('/', "_")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub is_directory: bool,
}

/// An edge, seen through the ids of its endpoints
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphEdge<'a> {
    pub from: &'a str,
    pub to: &'a str,
}

#[derive(Debug)]
pub struct RepoGraph {
    graph: DiGraph<GraphNode, ()>,
    root: NodeIndex,
    index: HashMap<String, NodeIndex>,
    duplicates: usize,
}

impl Default for RepoGraph {
    fn default() -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(GraphNode {
            id: ROOT_ID.to_string(),
            label: ROOT_ID.to_string(),
            is_directory: true,
        });

        let mut index = HashMap::new();
        index.insert(ROOT_ID.to_string(), root);

        Self {
            graph,
            root,
            index,
            duplicates: 0,
        }
    }
}

impl RepoGraph {
    // Registers a node, returns false if the id was already taken
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        if self.index.contains_key(&node.id) {
            warn!(id = %node.id, "Node registered twice, keeping the first one");
            self.duplicates += 1;
            return false;
        }

        let id = node.id.clone();
        let index = self.graph.add_node(node);
        self.index.insert(id, index);
        true
    }

    // Connects two registered ids, returns false for unknown ids and for an
    // edge that already exists
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let (Some(&a), Some(&b)) = (self.index.get(from), self.index.get(to)) else {
            warn!(from, to, "Edge between unknown nodes, ignoring");
            return false;
        };

        if self.graph.contains_edge(a, b) {
            return false;
        }
        self.graph.add_edge(a, b, ());
        true
    }

    /// Nodes in the order they were discovered, without the root
    #[cfg(test)]
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.graph
            .node_indices()
            .filter(move |&i| i != self.root)
            .map(move |i| &self.graph[i])
    }

    /// Edges in the order they were added
    #[cfg(test)]
    pub fn edges(&self) -> impl Iterator<Item = GraphEdge<'_>> + '_ {
        use petgraph::visit::EdgeRef;

        self.graph.edge_references().map(move |e| GraphEdge {
            from: self.graph[e.source()].id.as_str(),
            to: self.graph[e.target()].id.as_str(),
        })
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    // Raw graph for the DOT writer, the root included
    pub(crate) fn inner(&self) -> &DiGraph<GraphNode, ()> {
        &self.graph
    }

    pub(crate) fn root(&self) -> NodeIndex {
        self.root
    }
}
