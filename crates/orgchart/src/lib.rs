//! Organizational Hierarchy Charts Library
//!
//! Builds the reporting graph around a focal employee from several possibly
//! overlapping employee collections, serializes it as a Mermaid flowchart and
//! hands it to a diagram renderer.
//!
//! ```
//! use orgchart::{Employee, EmployeeLookup, GraphBuilder, RoleCatalog, SourceSet};
//! use orgchart::visualization::{render, Direction};
//!
//! let lookup = SourceSet::new(vec![vec![
//!     Employee::new("1", "Avery", 2),
//!     Employee::new("2", "Blake", 4).reporting_to("1"),
//! ]]);
//! let catalog = RoleCatalog::default();
//! let focal = lookup.require("2").unwrap();
//!
//! let graph = GraphBuilder::new(&lookup, &catalog).build(focal);
//! assert!(graph.has_edge("1", "2"));
//!
//! let request = render(&graph, "org-2", Direction::TopDown);
//! assert!(request.description.starts_with("flowchart TD"));
//! ```

pub mod ancestors;
pub mod builder;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod lookup;
pub mod output;
pub mod registry;
pub mod renderer;
pub mod roles;
pub mod sources;
pub mod subtree;
pub mod visualization;

// Re-export commonly used types
pub use builder::GraphBuilder;
pub use domain::{BuildDiagnostics, ChainEnd, Employee, GraphEdge, GraphNode, OrgGraph, StyleClass};
pub use errors::OrgchartError;
pub use lookup::{EmployeeLookup, SourceSet};
pub use output::{ExitCode, JsonError, JsonOutput};
pub use renderer::{DiagramRenderer, RenderFailure, RenderOutcome};
pub use roles::RoleCatalog;
