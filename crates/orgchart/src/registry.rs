//! Node and edge registry for a single graph build.
//!
//! Every node and edge of a hierarchy graph is created through a
//! [`GraphRegistry`]. It is the one place that enforces:
//!
//! - at most one node per employee id (first writer wins)
//! - at most one edge per ordered (parent, child) pair
//! - no edge whose endpoints are not both registered nodes
//!
//! Insertion order is kept so that rendered output is deterministic.

use crate::domain::{GraphEdge, GraphNode, StyleClass};
use std::collections::HashSet;

/// Set-backed, insertion-ordered store of nodes and edges.
#[derive(Debug, Default)]
pub struct GraphRegistry {
    node_ids: HashSet<String>,
    nodes: Vec<GraphNode>,
    edge_keys: HashSet<(String, String)>,
    edges: Vec<GraphEdge>,
}

impl GraphRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. Returns false (and changes nothing) if the id is taken.
    pub fn add_node(&mut self, id: &str, label: impl Into<String>, style_class: StyleClass) -> bool {
        if !self.node_ids.insert(id.to_string()) {
            return false;
        }
        self.nodes.push(GraphNode {
            id: id.to_string(),
            label: label.into(),
            style_class,
        });
        true
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_ids.contains(id)
    }

    /// Register an edge between two registered nodes.
    ///
    /// Requests with an unregistered endpoint or an already registered pair are
    /// dropped silently; the return value tells whether an edge was added.
    pub fn add_edge(&mut self, parent_id: &str, child_id: &str) -> bool {
        if !self.has_node(parent_id) || !self.has_node(child_id) {
            return false;
        }
        let key = (parent_id.to_string(), child_id.to_string());
        if !self.edge_keys.insert(key) {
            return false;
        }
        self.edges.push(GraphEdge::new(parent_id, child_id));
        true
    }

    pub fn has_edge(&self, parent_id: &str, child_id: &str) -> bool {
        self.edge_keys
            .contains(&(parent_id.to_string(), child_id.to_string()))
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Registered node ids, in registration order
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.id.as_str())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Consume the registry, yielding nodes and edges in registration order
    pub fn into_parts(self) -> (Vec<GraphNode>, Vec<GraphEdge>) {
        (self.nodes, self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_first_writer_wins() {
        let mut registry = GraphRegistry::new();

        assert!(registry.add_node("1", "Alice", StyleClass::Admin));
        assert!(!registry.add_node("1", "Alice (stale)", StyleClass::Employee));

        assert_eq!(registry.node_count(), 1);
        assert_eq!(registry.nodes()[0].label, "Alice");
        assert_eq!(registry.nodes()[0].style_class, StyleClass::Admin);
    }

    #[test]
    fn test_has_node() {
        let mut registry = GraphRegistry::new();
        registry.add_node("1", "Alice", StyleClass::Admin);

        assert!(registry.has_node("1"));
        assert!(!registry.has_node("2"));
    }

    #[test]
    fn test_add_edge_requires_both_endpoints() {
        let mut registry = GraphRegistry::new();
        registry.add_node("1", "Alice", StyleClass::Admin);

        assert!(!registry.add_edge("1", "2"));
        assert!(!registry.add_edge("2", "1"));
        assert_eq!(registry.edge_count(), 0);

        registry.add_node("2", "Bob", StyleClass::Manager);
        assert!(registry.add_edge("1", "2"));
        assert!(registry.has_edge("1", "2"));
    }

    #[test]
    fn test_add_edge_is_idempotent_per_ordered_pair() {
        let mut registry = GraphRegistry::new();
        registry.add_node("1", "Alice", StyleClass::Admin);
        registry.add_node("2", "Bob", StyleClass::Manager);

        assert!(registry.add_edge("1", "2"));
        assert!(!registry.add_edge("1", "2"));
        // Reverse direction is a different pair
        assert!(registry.add_edge("2", "1"));

        assert_eq!(registry.edge_count(), 2);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut registry = GraphRegistry::new();
        for id in ["c", "a", "b"] {
            registry.add_node(id, id, StyleClass::Employee);
        }

        let ids: Vec<&str> = registry.node_ids().collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_into_parts() {
        let mut registry = GraphRegistry::new();
        registry.add_node("1", "Alice", StyleClass::Admin);
        registry.add_node("2", "Bob", StyleClass::Current);
        registry.add_edge("1", "2");

        let (nodes, edges) = registry.into_parts();
        assert_eq!(nodes.len(), 2);
        assert_eq!(edges, vec![GraphEdge::new("1", "2")]);
    }
}
