//! Hierarchy graph construction.
//!
//! [`GraphBuilder::build`] assembles the graph for one focal employee:
//!
//! 1. the ancestor chain, topmost manager first
//! 2. the focal employee, styled `current`
//! 3. every direct and indirect report of the focal employee
//! 4. an edge pass that links each registered employee to its registered manager
//!
//! All node and edge creation goes through a fresh [`GraphRegistry`] owned by
//! the call, so builds share no state and the same inputs always produce the
//! same graph.

use crate::ancestors::resolve_ancestors;
use crate::domain::{BuildDiagnostics, ChainEnd, Employee, GraphEdge, OrgGraph};
use crate::lookup::EmployeeLookup;
use crate::registry::GraphRegistry;
use crate::roles::{classify, RoleCatalog};
use crate::subtree::SubtreeExpander;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Builds hierarchy graphs from an employee lookup and a role catalog.
///
/// # Example
///
/// ```
/// use orgchart::builder::GraphBuilder;
/// use orgchart::domain::{Employee, StyleClass};
/// use orgchart::lookup::SourceSet;
/// use orgchart::roles::RoleCatalog;
///
/// let a = Employee::new("1", "Avery", 1);
/// let b = Employee::new("2", "Blake", 2).reporting_to("1");
/// let c = Employee::new("3", "Casey", 4).reporting_to("2");
///
/// let lookup = SourceSet::new(vec![vec![a, b, c.clone()]]);
/// let catalog = RoleCatalog::default();
/// let graph = GraphBuilder::new(&lookup, &catalog).build(&c);
///
/// assert_eq!(graph.nodes.len(), 3);
/// assert!(graph.has_edge("1", "2"));
/// assert!(graph.has_edge("2", "3"));
/// assert_eq!(graph.node("3").unwrap().style_class, StyleClass::Current);
/// ```
pub struct GraphBuilder<'a, L: EmployeeLookup + ?Sized> {
    lookup: &'a L,
    catalog: &'a RoleCatalog,
    show_role: bool,
}

impl<'a, L: EmployeeLookup + ?Sized> GraphBuilder<'a, L> {
    pub fn new(lookup: &'a L, catalog: &'a RoleCatalog) -> Self {
        Self {
            lookup,
            catalog,
            show_role: true,
        }
    }

    /// Whether node labels carry the role name under the employee name
    pub fn show_role(mut self, show_role: bool) -> Self {
        self.show_role = show_role;
        self
    }

    /// Node label for an employee.
    ///
    /// The role name goes on a second line when the catalog knows the role.
    pub fn label_for(&self, employee: &Employee) -> String {
        match self.catalog.name(employee.role_id) {
            Some(role) if self.show_role => format!("{}\n{}", employee.display_name, role),
            _ => employee.display_name.clone(),
        }
    }

    fn register(&self, registry: &mut GraphRegistry, employee: &Employee, is_focal: bool) {
        let style = classify(self.catalog, employee.role_id, is_focal);
        registry.add_node(&employee.id, self.label_for(employee), style);
    }

    /// Build the hierarchy graph around `focal`.
    ///
    /// Never fails: a focal employee with no known manager and no reports
    /// yields a single-node graph.
    pub fn build(&self, focal: &Employee) -> OrgGraph {
        let mut registry = GraphRegistry::new();
        let mut diagnostics = BuildDiagnostics::default();

        // 1. Ancestors, topmost first
        let chain = resolve_ancestors(self.lookup, focal);
        for ancestor in &chain.ancestors {
            self.register(&mut registry, ancestor, false);
        }

        match &chain.end {
            ChainEnd::Cycle(repeated) => {
                // The repeated manager's link to the last employee walked closed the loop
                let last = chain.ancestors.first().copied().unwrap_or(focal);
                warn!(
                    focal = %focal.id,
                    manager = %repeated,
                    report = %last.id,
                    "management loop above focal employee"
                );
                diagnostics
                    .record_back_reference(GraphEdge::new(repeated.as_str(), last.id.as_str()));
            }
            ChainEnd::UnknownManager(id) => diagnostics.record_unknown_manager(id),
            ChainEnd::Root => {}
        }

        // 2. Focal employee
        self.register(&mut registry, focal, true);

        // 3. Reports, never climbing back into the chain
        let mut expander = SubtreeExpander::new(self.lookup).with_visited(chain.ids());
        expander.expand_descendants(&focal.id, &mut |report| {
            self.register(&mut registry, report, false);
        });
        for edge in expander.into_back_references() {
            diagnostics.record_back_reference(edge);
        }
        diagnostics.chain_end = Some(chain.end);

        // 4. Edges between registered members, one attempt per distinct id
        let excluded: HashSet<(&str, &str)> = diagnostics
            .back_references
            .iter()
            .map(|edge| (edge.parent_id.as_str(), edge.child_id.as_str()))
            .collect();
        let mut unknown = Vec::new();

        for record in self.edge_candidates(&registry, focal) {
            let Some(manager_id) = record.manager_id() else {
                continue;
            };
            let Some(manager) = self.lookup.get(manager_id) else {
                unknown.push(manager_id.to_string());
                continue;
            };
            if excluded.contains(&(manager.id.as_str(), record.id.as_str())) {
                continue;
            }
            registry.add_edge(&manager.id, &record.id);
        }
        for id in &unknown {
            diagnostics.record_unknown_manager(id);
        }

        debug!(
            focal = %focal.id,
            nodes = registry.node_count(),
            edges = registry.edge_count(),
            "built hierarchy graph"
        );

        let (nodes, edges) = registry.into_parts();
        OrgGraph {
            focal_id: focal.id.clone(),
            nodes,
            edges,
            diagnostics,
        }
    }

    /// Records considered by the edge pass, one per registered id.
    ///
    /// The lookup's canonical record is used where one exists. The focal
    /// employee as handed in by the caller stands in when the lookup does not
    /// contain it.
    fn edge_candidates<'r>(
        &'r self,
        registry: &GraphRegistry,
        focal: &'r Employee,
    ) -> Vec<&'r Employee> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for record in self.lookup.records() {
            if registry.has_node(&record.id) && seen.insert(record.id.as_str()) {
                candidates.push(record);
            }
        }
        if seen.insert(focal.id.as_str()) {
            candidates.push(focal);
        }
        candidates
    }
}
