//! Upward walk along the approving-manager chain.

use crate::domain::{ChainEnd, Employee};
use crate::lookup::EmployeeLookup;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Result of an ancestor walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorChain<'a> {
    /// Managers above the focal employee, topmost first
    pub ancestors: Vec<&'a Employee>,
    /// Why the walk stopped
    pub end: ChainEnd,
}

impl<'a> AncestorChain<'a> {
    /// Ids on the chain, topmost first
    pub fn ids(&self) -> Vec<&'a str> {
        self.ancestors
            .iter()
            .copied()
            .map(|employee| employee.id.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ancestors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ancestors.is_empty()
    }
}

/// Walk the approving-manager chain above `focal`.
///
/// The walk stops at an employee with no manager, at a manager id no collection
/// knows, or at a manager already on the chain. None of these are errors. Each
/// distinct id is added at most once, so the walk always terminates.
pub fn resolve_ancestors<'a, L>(lookup: &'a L, focal: &Employee) -> AncestorChain<'a>
where
    L: EmployeeLookup + ?Sized,
{
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(focal.id.as_str());

    let mut chain: VecDeque<&'a Employee> = VecDeque::new();
    let mut next_manager = focal.manager_id();

    let end = loop {
        let Some(manager_id) = next_manager else {
            break ChainEnd::Root;
        };
        let Some(manager) = lookup.get(manager_id) else {
            break ChainEnd::UnknownManager(manager_id.to_string());
        };
        if !visited.insert(manager.id.as_str()) {
            break ChainEnd::Cycle(manager.id.clone());
        }
        chain.push_front(manager);
        next_manager = manager.manager_id();
    };

    debug!(
        focal = %focal.id,
        depth = chain.len(),
        end = ?end,
        "resolved ancestor chain"
    );

    AncestorChain {
        ancestors: chain.into(),
        end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::SourceSet;

    fn emp(id: &str, manager: Option<&str>) -> Employee {
        let employee = Employee::new(id, id, 4);
        match manager {
            Some(m) => employee.reporting_to(m),
            None => employee,
        }
    }

    #[test]
    fn test_chain_is_root_first() {
        let lookup = SourceSet::new(vec![vec![
            emp("1", None),
            emp("2", Some("1")),
            emp("3", Some("2")),
        ]]);
        let focal = lookup.get("3").unwrap().clone();

        let chain = resolve_ancestors(&lookup, &focal);

        assert_eq!(chain.ids(), vec!["1", "2"]);
        assert_eq!(chain.end, ChainEnd::Root);
    }

    #[test]
    fn test_no_manager_gives_empty_chain() {
        let lookup = SourceSet::new(vec![vec![emp("1", None)]]);
        let chain = resolve_ancestors(&lookup, &emp("1", None));

        assert!(chain.is_empty());
        assert_eq!(chain.end, ChainEnd::Root);
    }

    #[test]
    fn test_unknown_manager_ends_chain() {
        let lookup = SourceSet::new(vec![vec![emp("5", Some("999"))]]);
        let chain = resolve_ancestors(&lookup, &emp("5", Some("999")));

        assert!(chain.is_empty());
        assert_eq!(chain.end, ChainEnd::UnknownManager("999".to_string()));
    }

    #[test]
    fn test_unknown_manager_higher_up() {
        let lookup = SourceSet::new(vec![vec![emp("1", Some("ghost")), emp("2", Some("1"))]]);
        let chain = resolve_ancestors(&lookup, &emp("2", Some("1")));

        assert_eq!(chain.ids(), vec!["1"]);
        assert_eq!(chain.end, ChainEnd::UnknownManager("ghost".to_string()));
    }

    #[test]
    fn test_two_node_cycle_stops() {
        let lookup = SourceSet::new(vec![vec![emp("10", Some("11")), emp("11", Some("10"))]]);
        let chain = resolve_ancestors(&lookup, &emp("10", Some("11")));

        assert_eq!(chain.ids(), vec!["11"]);
        assert_eq!(chain.end, ChainEnd::Cycle("10".to_string()));
    }

    #[test]
    fn test_cycle_above_focal_stops() {
        // 1 -> 2 -> 3 -> 1 loop, focal 4 reports into it
        let lookup = SourceSet::new(vec![vec![
            emp("1", Some("3")),
            emp("2", Some("1")),
            emp("3", Some("2")),
            emp("4", Some("3")),
        ]]);
        let chain = resolve_ancestors(&lookup, &emp("4", Some("3")));

        assert_eq!(chain.ids(), vec!["1", "2", "3"]);
        assert_eq!(chain.end, ChainEnd::Cycle("3".to_string()));
    }

    #[test]
    fn test_self_managed_employee() {
        let lookup = SourceSet::new(vec![vec![emp("1", Some("1"))]]);
        let chain = resolve_ancestors(&lookup, &emp("1", Some("1")));

        assert!(chain.is_empty());
        assert_eq!(chain.end, ChainEnd::Cycle("1".to_string()));
    }
}
