//! Core domain types for hierarchy graphs.
//!
//! This module defines the data structures shared by every stage of a build:
//! employee records as supplied by directory sources, and the nodes, edges and
//! diagnostics that make up a finished [`OrgGraph`].

use serde::{Deserialize, Serialize};

/// Numeric role identifier as used by the host directory.
pub type RoleId = u32;

/// An employee record as supplied by a directory source.
///
/// `approving_manager_id` is a lookup key into the same id space, not an owning
/// reference. It may point at an id that no loaded collection contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee identifier
    pub id: String,
    /// Name shown on the node
    #[serde(alias = "name")]
    pub display_name: String,
    /// Role identifier, resolved through the role catalog
    #[serde(alias = "role")]
    pub role_id: RoleId,
    /// Id of the approving manager, if any
    #[serde(default, alias = "manager_id")]
    pub approving_manager_id: Option<String>,
}

impl Employee {
    /// Create an employee with no approving manager
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, role_id: RoleId) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            role_id,
            approving_manager_id: None,
        }
    }

    /// Set the approving manager
    pub fn reporting_to(mut self, manager_id: impl Into<String>) -> Self {
        self.approving_manager_id = Some(manager_id.into());
        self
    }

    /// Manager id as a borrowed str
    pub fn manager_id(&self) -> Option<&str> {
        self.approving_manager_id.as_deref()
    }
}

/// Visual category assigned to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleClass {
    /// The focal employee
    Current,
    /// Administrator tier
    Admin,
    /// Manager tier
    Manager,
    /// Team leader tier
    Leader,
    /// Individual contributor tier
    Employee,
    /// Role not present in the catalog
    Other,
}

impl StyleClass {
    /// Every style class, in the order their definitions are emitted.
    pub const ALL: [StyleClass; 6] = [
        StyleClass::Current,
        StyleClass::Admin,
        StyleClass::Manager,
        StyleClass::Leader,
        StyleClass::Employee,
        StyleClass::Other,
    ];

    /// Class name used in diagram descriptions
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleClass::Current => "current",
            StyleClass::Admin => "admin",
            StyleClass::Manager => "manager",
            StyleClass::Leader => "leader",
            StyleClass::Employee => "employee",
            StyleClass::Other => "other",
        }
    }
}

impl std::fmt::Display for StyleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the hierarchy graph, one per distinct employee id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub style_class: StyleClass,
}

/// A directed manager → report edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub parent_id: String,
    pub child_id: String,
}

impl GraphEdge {
    pub fn new(parent_id: impl Into<String>, child_id: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            child_id: child_id.into(),
        }
    }
}

/// Why the upward walk from the focal employee stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "id", rename_all = "snake_case")]
pub enum ChainEnd {
    /// Reached an employee with no approving manager
    Root,
    /// The next manager id is not present in any collection
    UnknownManager(String),
    /// The next manager was already on the chain
    Cycle(String),
}

/// Data anomalies tolerated while building a graph.
///
/// None of these abort a build. They are collected so callers can surface bad
/// directory data instead of it disappearing into a tidy-looking chart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildDiagnostics {
    /// How the ancestor walk ended (`None` until a walk has run)
    pub chain_end: Option<ChainEnd>,
    /// Manager → report links that closed a reporting loop and were not drawn
    pub back_references: Vec<GraphEdge>,
    /// Manager ids referenced by graph members but absent from every collection
    pub unknown_managers: Vec<String>,
}

impl BuildDiagnostics {
    /// True when the build met no anomalies
    pub fn is_clean(&self) -> bool {
        !matches!(
            self.chain_end,
            Some(ChainEnd::Cycle(_)) | Some(ChainEnd::UnknownManager(_))
        ) && self.back_references.is_empty()
            && self.unknown_managers.is_empty()
    }

    pub(crate) fn record_back_reference(&mut self, edge: GraphEdge) {
        if !self.back_references.contains(&edge) {
            self.back_references.push(edge);
        }
    }

    pub(crate) fn record_unknown_manager(&mut self, id: &str) {
        if !self.unknown_managers.iter().any(|known| known == id) {
            self.unknown_managers.push(id.to_string());
        }
    }
}

/// A finished hierarchy graph for one focal employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgGraph {
    /// The employee the graph was built for
    pub focal_id: String,
    /// Nodes in registration order: ancestors root-first, focal, then reports
    pub nodes: Vec<GraphNode>,
    /// Edges in registration order
    pub edges: Vec<GraphEdge>,
    pub diagnostics: BuildDiagnostics,
}

impl OrgGraph {
    /// Look up a node by employee id
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Check whether an edge exists
    pub fn has_edge(&self, parent_id: &str, child_id: &str) -> bool {
        self.edges
            .iter()
            .any(|edge| edge.parent_id == parent_id && edge.child_id == child_id)
    }

    /// Nodes that have no incoming edge
    pub fn roots(&self) -> Vec<&GraphNode> {
        self.nodes
            .iter()
            .filter(|node| !self.edges.iter().any(|edge| edge.child_id == node.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_deserializes_with_aliases() {
        let json = r#"{"id": "7", "name": "Ada", "role": 2, "manager_id": "1"}"#;
        let employee: Employee = serde_json::from_str(json).unwrap();

        assert_eq!(employee.display_name, "Ada");
        assert_eq!(employee.role_id, 2);
        assert_eq!(employee.manager_id(), Some("1"));
    }

    #[test]
    fn test_employee_missing_manager_is_none() {
        let json = r#"{"id": "1", "display_name": "Root", "role_id": 1}"#;
        let employee: Employee = serde_json::from_str(json).unwrap();

        assert_eq!(employee.approving_manager_id, None);
    }

    #[test]
    fn test_style_class_serializes_snake_case() {
        let json = serde_json::to_string(&StyleClass::Current).unwrap();
        assert_eq!(json, "\"current\"");
        assert_eq!(StyleClass::Leader.to_string(), "leader");
    }

    #[test]
    fn test_diagnostics_clean_by_default() {
        let mut diagnostics = BuildDiagnostics {
            chain_end: Some(ChainEnd::Root),
            ..Default::default()
        };
        assert!(diagnostics.is_clean());

        diagnostics.record_unknown_manager("999");
        diagnostics.record_unknown_manager("999");
        assert_eq!(diagnostics.unknown_managers, vec!["999".to_string()]);
        assert!(!diagnostics.is_clean());
    }

    #[test]
    fn test_chain_end_json_shape() {
        let json = serde_json::to_value(ChainEnd::Cycle("10".into())).unwrap();
        assert_eq!(json["reason"], "cycle");
        assert_eq!(json["id"], "10");
    }
}
