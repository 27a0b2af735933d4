//! Diagram descriptions for hierarchy graphs.
//!
//! The primary output is a Mermaid flowchart: a header with one `classDef`
//! line per style class, then one `Id["label"]:::class` line per node, then
//! one `Parent --> Child` line per edge. A Graphviz DOT export of the same
//! graph is also available.
//!
//! Employee ids are arbitrary strings, so they are mapped to Mermaid-safe node
//! identifiers with [`mermaid_id`]. Labels are entity-escaped with
//! [`escape_mermaid_label`]. Neither step can fail.

use crate::domain::{OrgGraph, StyleClass};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Flowchart direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum Direction {
    /// Top to bottom
    #[default]
    #[serde(rename = "TD")]
    #[value(name = "TD")]
    TopDown,
    /// Left to right
    #[serde(rename = "LR")]
    #[value(name = "LR")]
    LeftRight,
    /// Bottom to top
    #[serde(rename = "BT")]
    #[value(name = "BT")]
    BottomTop,
    /// Right to left
    #[serde(rename = "RL")]
    #[value(name = "RL")]
    RightLeft,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::TopDown => "TD",
            Direction::LeftRight => "LR",
            Direction::BottomTop => "BT",
            Direction::RightLeft => "RL",
        }
    }
}

/// A description ready to hand to a diagram renderer.
///
/// `diagram_id` is whatever the caller chose; it lets several diagrams be
/// rendered on one page and never influences the description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramRequest {
    pub description: String,
    pub diagram_id: String,
}

/// Visual definition of a style class
pub fn class_definition(class: StyleClass) -> &'static str {
    match class {
        StyleClass::Current => "fill:#ffe082,stroke:#f57f17,stroke-width:3px,color:#000",
        StyleClass::Admin => "fill:#ef9a9a,stroke:#b71c1c,color:#000",
        StyleClass::Manager => "fill:#90caf9,stroke:#0d47a1,color:#000",
        StyleClass::Leader => "fill:#a5d6a7,stroke:#1b5e20,color:#000",
        StyleClass::Employee => "fill:#e0e0e0,stroke:#424242,color:#000",
        StyleClass::Other => "fill:#ffffff,stroke:#9e9e9e,stroke-dasharray:4 2,color:#000",
    }
}

/// Map an employee id to a Mermaid node identifier.
///
/// ASCII letters and digits pass through, `_` is doubled, and every other byte
/// becomes `_` plus two hex digits. The mapping is injective, so distinct
/// employee ids never collide.
pub fn mermaid_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 2);
    out.push_str("n_");
    for byte in id.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' => out.push(byte as char),
            b'_' => out.push_str("__"),
            other => {
                let _ = write!(out, "_{:02x}", other);
            }
        }
    }
    out
}

/// Escape a label for use inside `["..."]`.
///
/// Newlines become `<br/>`; characters Mermaid would interpret become entity
/// codes.
pub fn escape_mermaid_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for ch in label.chars() {
        match ch {
            '#' => out.push_str("#35;"),
            '"' => out.push_str("#quot;"),
            '<' => out.push_str("#lt;"),
            '>' => out.push_str("#gt;"),
            '\n' => out.push_str("<br/>"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

/// Serialize a graph as a Mermaid flowchart.
///
/// # Example
/// ```
/// use orgchart::builder::GraphBuilder;
/// use orgchart::domain::Employee;
/// use orgchart::lookup::SourceSet;
/// use orgchart::roles::RoleCatalog;
/// use orgchart::visualization::{export_mermaid, Direction};
///
/// let boss = Employee::new("1", "Avery", 2);
/// let report = Employee::new("2", "Blake", 4).reporting_to("1");
/// let lookup = SourceSet::new(vec![vec![boss.clone(), report]]);
/// let catalog = RoleCatalog::default();
/// let graph = GraphBuilder::new(&lookup, &catalog).build(&boss);
///
/// let mermaid = export_mermaid(&graph, Direction::TopDown);
/// assert!(mermaid.starts_with("flowchart TD"));
/// assert!(mermaid.contains("n_1 --> n_2"));
/// ```
pub fn export_mermaid(graph: &OrgGraph, direction: Direction) -> String {
    let mut output = format!("flowchart {}\n", direction.as_str());

    for class in StyleClass::ALL {
        output.push_str(&format!(
            "  classDef {} {}\n",
            class.as_str(),
            class_definition(class)
        ));
    }

    output.push('\n');

    for node in &graph.nodes {
        output.push_str(&format!(
            "  {}[\"{}\"]:::{}\n",
            mermaid_id(&node.id),
            escape_mermaid_label(&node.label),
            node.style_class
        ));
    }

    output.push('\n');

    for edge in &graph.edges {
        output.push_str(&format!(
            "  {} --> {}\n",
            mermaid_id(&edge.parent_id),
            mermaid_id(&edge.child_id)
        ));
    }

    output
}

/// Serialize a graph and package it with a caller-chosen diagram id.
pub fn render(graph: &OrgGraph, diagram_id: &str, direction: Direction) -> DiagramRequest {
    DiagramRequest {
        description: export_mermaid(graph, direction),
        diagram_id: diagram_id.to_string(),
    }
}

/// Export a graph as DOT format for Graphviz
///
/// Nodes are filled with the color of their style class; the focal employee
/// gets a bold outline.
pub fn export_dot(graph: &OrgGraph, direction: Direction) -> String {
    let mut output = String::from("digraph orgchart {\n");
    output.push_str(&format!("  rankdir={};\n", dot_rankdir(direction)));
    output.push_str("  node [shape=box, style=\"rounded,filled\"];\n\n");

    for node in &graph.nodes {
        let label = escape_dot(&node.label).replace('\n', "\\n");
        let penwidth = if node.style_class == StyleClass::Current {
            3
        } else {
            1
        };
        output.push_str(&format!(
            "  \"{}\" [label=\"{}\", fillcolor=\"{}\", penwidth={}];\n",
            escape_dot(&node.id),
            label,
            dot_fill(node.style_class),
            penwidth
        ));
    }

    output.push('\n');

    for edge in &graph.edges {
        output.push_str(&format!(
            "  \"{}\" -> \"{}\";\n",
            escape_dot(&edge.parent_id),
            escape_dot(&edge.child_id)
        ));
    }

    output.push_str("}\n");
    output
}

/// Escape a string for a double-quoted DOT identifier. Backslashes go first
/// so the quote escapes are not doubled.
fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn dot_rankdir(direction: Direction) -> &'static str {
    match direction {
        Direction::TopDown => "TB",
        Direction::LeftRight => "LR",
        Direction::BottomTop => "BT",
        Direction::RightLeft => "RL",
    }
}

fn dot_fill(class: StyleClass) -> &'static str {
    match class {
        StyleClass::Current => "#ffe082",
        StyleClass::Admin => "#ef9a9a",
        StyleClass::Manager => "#90caf9",
        StyleClass::Leader => "#a5d6a7",
        StyleClass::Employee => "#e0e0e0",
        StyleClass::Other => "#ffffff",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BuildDiagnostics, GraphEdge, GraphNode};

    fn sample_graph() -> OrgGraph {
        OrgGraph {
            focal_id: "2".to_string(),
            nodes: vec![
                GraphNode {
                    id: "1".to_string(),
                    label: "Avery\nAdministrator".to_string(),
                    style_class: StyleClass::Admin,
                },
                GraphNode {
                    id: "2".to_string(),
                    label: "Blake \"B\" <ops>".to_string(),
                    style_class: StyleClass::Current,
                },
            ],
            edges: vec![GraphEdge::new("1", "2")],
            diagnostics: BuildDiagnostics::default(),
        }
    }

    #[test]
    fn test_export_mermaid_section_order() {
        let mermaid = export_mermaid(&sample_graph(), Direction::TopDown);
        let lines: Vec<&str> = mermaid.lines().collect();

        assert_eq!(lines[0], "flowchart TD");
        for (i, class) in StyleClass::ALL.iter().enumerate() {
            assert!(lines[i + 1].starts_with(&format!("  classDef {} ", class)));
        }

        let first_node = mermaid.find("n_1[").unwrap();
        let last_class = mermaid.find("classDef other").unwrap();
        let first_edge = mermaid.find("-->").unwrap();
        assert!(last_class < first_node);
        assert!(first_node < first_edge);
    }

    #[test]
    fn test_export_mermaid_nodes_and_edges() {
        let mermaid = export_mermaid(&sample_graph(), Direction::LeftRight);

        assert!(mermaid.starts_with("flowchart LR\n"));
        assert!(mermaid.contains("  n_1[\"Avery<br/>Administrator\"]:::admin\n"));
        assert!(mermaid.contains("  n_2[\"Blake #quot;B#quot; #lt;ops#gt;\"]:::current\n"));
        assert!(mermaid.contains("  n_1 --> n_2\n"));
    }

    #[test]
    fn test_render_passes_diagram_id_through() {
        let graph = sample_graph();
        let a = render(&graph, "diagram-a", Direction::TopDown);
        let b = render(&graph, "diagram-b", Direction::TopDown);

        assert_eq!(a.diagram_id, "diagram-a");
        assert_eq!(b.diagram_id, "diagram-b");
        assert_eq!(a.description, b.description);
    }

    #[test]
    fn test_mermaid_id_sanitizes() {
        assert_eq!(mermaid_id("42"), "n_42");
        assert_eq!(mermaid_id("a_b"), "n_a__b");
        assert_eq!(mermaid_id("a-b"), "n_a_2db");
        assert_eq!(mermaid_id("end"), "n_end");
        assert_eq!(mermaid_id(""), "n_");
    }

    #[test]
    fn test_mermaid_id_is_injective_on_tricky_pairs() {
        assert_ne!(mermaid_id("a_2d"), mermaid_id("a-"));
        assert_ne!(mermaid_id("a__"), mermaid_id("a_"));
        assert_ne!(mermaid_id("a b"), mermaid_id("a_b"));
    }

    #[test]
    fn test_escape_mermaid_label() {
        assert_eq!(escape_mermaid_label("plain"), "plain");
        assert_eq!(escape_mermaid_label("a\r\nb"), "a<br/>b");
        assert_eq!(escape_mermaid_label("#1"), "#35;1");
        assert_eq!(escape_mermaid_label("\"x\""), "#quot;x#quot;");
    }

    #[test]
    fn test_export_single_node_graph() {
        let graph = OrgGraph {
            focal_id: "solo".to_string(),
            nodes: vec![GraphNode {
                id: "solo".to_string(),
                label: "Solo".to_string(),
                style_class: StyleClass::Current,
            }],
            edges: vec![],
            diagnostics: BuildDiagnostics::default(),
        };

        let mermaid = export_mermaid(&graph, Direction::TopDown);
        assert!(mermaid.contains("n_solo[\"Solo\"]:::current"));
        assert!(!mermaid.contains("-->"));
    }

    #[test]
    fn test_export_dot_format() {
        let dot = export_dot(&sample_graph(), Direction::TopDown);

        assert!(dot.starts_with("digraph orgchart {"));
        assert!(dot.contains("rankdir=TB"));
        assert!(dot.contains("label=\"Avery\\nAdministrator\""));
        assert!(dot.contains("\"1\" -> \"2\";"));
        assert!(dot.contains("penwidth=3"));
    }

    #[test]
    fn test_export_dot_escapes_quotes() {
        let dot = export_dot(&sample_graph(), Direction::LeftRight);

        assert!(dot.contains("Blake \\\"B\\\""));
        assert!(!dot.contains("Blake \"B\""));
    }

    #[test]
    fn test_export_dot_escapes_backslash_in_ids() {
        let graph = OrgGraph {
            focal_id: "dept\\".to_string(),
            nodes: vec![
                GraphNode {
                    id: "dept\\".to_string(),
                    label: "Dept".to_string(),
                    style_class: StyleClass::Current,
                },
                GraphNode {
                    id: "x".to_string(),
                    label: "X".to_string(),
                    style_class: StyleClass::Employee,
                },
            ],
            edges: vec![GraphEdge::new("dept\\", "x")],
            diagnostics: BuildDiagnostics::default(),
        };

        let dot = export_dot(&graph, Direction::TopDown);
        assert!(dot.contains("  \"dept\\\\\" [label=\"Dept\""));
        assert!(dot.contains("  \"dept\\\\\" -> \"x\";"));
        assert!(!dot.contains("\"dept\\\" ["));
        assert_eq!(escape_dot("a\\\"b"), "a\\\\\\\"b");
    }

    #[test]
    fn test_direction_serde() {
        let direction: Direction = serde_json::from_str("\"LR\"").unwrap();
        assert_eq!(direction, Direction::LeftRight);
        assert_eq!(Direction::default(), Direction::TopDown);
    }
}
