//! Downward expansion of the reporting tree.
//!
//! The expander keeps a visited set so that a reporting loop cannot be walked
//! forever, and an explicit stack so that deep chains do not exhaust the call
//! stack. A loop is still bad directory data, so every revisit is flagged: the
//! offending manager → report link is returned as a back-reference and logged.

use crate::domain::{Employee, GraphEdge};
use crate::lookup::EmployeeLookup;
use std::collections::HashSet;
use tracing::warn;

/// Depth-first report expansion with a visited guard.
pub struct SubtreeExpander<'a, L: EmployeeLookup + ?Sized> {
    lookup: &'a L,
    visited: HashSet<String>,
    back_references: Vec<GraphEdge>,
}

impl<'a, L: EmployeeLookup + ?Sized> SubtreeExpander<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self {
            lookup,
            visited: HashSet::new(),
            back_references: Vec::new(),
        }
    }

    /// Treat these ids as already visited.
    ///
    /// The graph builder passes the ancestor chain here so the downward pass
    /// never climbs back above the focal employee.
    pub fn with_visited<'i>(mut self, ids: impl IntoIterator<Item = &'i str>) -> Self {
        self.visited.extend(ids.into_iter().map(str::to_string));
        self
    }

    /// Emit every direct and indirect report of `root`, depth-first.
    ///
    /// Each report is emitted before its own reports. An employee is emitted at
    /// most once per expander.
    pub fn expand_descendants<F>(&mut self, root: &str, emit: &mut F)
    where
        F: FnMut(&'a Employee),
    {
        self.visited.insert(root.to_string());

        let lookup = self.lookup;
        // (manager, report) pairs still to visit; `None` stands for `root`
        let mut stack: Vec<(Option<&'a Employee>, &'a Employee)> = lookup
            .reports_of(root)
            .into_iter()
            .rev()
            .map(|child| (None, child))
            .collect();

        while let Some((parent, child)) = stack.pop() {
            let manager = parent.map_or(root, |p| p.id.as_str());
            if !self.visited.insert(child.id.clone()) {
                warn!(
                    manager = %manager,
                    report = %child.id,
                    "reporting loop detected, link not followed"
                );
                let edge = GraphEdge::new(manager, child.id.as_str());
                if !self.back_references.contains(&edge) {
                    self.back_references.push(edge);
                }
                continue;
            }
            emit(child);
            stack.extend(
                lookup
                    .reports_of(&child.id)
                    .into_iter()
                    .rev()
                    .map(|grandchild| (Some(child), grandchild)),
            );
        }
    }

    /// Ids visited so far, including seeds
    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    /// Links that closed a reporting loop
    pub fn back_references(&self) -> &[GraphEdge] {
        &self.back_references
    }

    pub fn into_back_references(self) -> Vec<GraphEdge> {
        self.back_references
    }
}

/// Collect all reports of `root`, depth-first, reports before their own reports.
pub fn collect_descendants<'a, L>(lookup: &'a L, root: &str) -> Vec<&'a Employee>
where
    L: EmployeeLookup + ?Sized,
{
    let mut found = Vec::new();
    let mut expander = SubtreeExpander::new(lookup);
    expander.expand_descendants(root, &mut |employee| found.push(employee));
    found
}
