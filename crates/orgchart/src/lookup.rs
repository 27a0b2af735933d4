//! Employee lookup across overlapping collections.
//!
//! Directory sources hand over several employee collections that may overlap
//! and may be stale. [`SourceSet`] folds them into a single read-only view with
//! one precedence rule: collections are consulted in order and the first record
//! seen for an id is the canonical one. Later records for the same id are
//! ignored everywhere, so a stale duplicate can neither add a node nor an edge.

use crate::domain::Employee;
use crate::errors::OrgchartError;
use std::collections::HashMap;

/// Read-only employee lookup used by the graph traversals.
pub trait EmployeeLookup {
    /// Canonical record for an id
    fn get(&self, id: &str) -> Option<&Employee>;

    /// Canonical records whose approving manager is `manager_id`
    fn reports_of(&self, manager_id: &str) -> Vec<&Employee>;

    /// All canonical records, one per distinct id
    fn records(&self) -> Vec<&Employee>;

    /// Canonical record for an id, or `EmployeeNotFound`
    fn require(&self, id: &str) -> Result<&Employee, OrgchartError> {
        self.get(id)
            .ok_or_else(|| OrgchartError::EmployeeNotFound(id.to_string()))
    }
}

/// Ordered union of employee collections, first match wins.
///
/// # Examples
///
/// ```
/// use orgchart::domain::Employee;
/// use orgchart::lookup::{EmployeeLookup, SourceSet};
///
/// let fresh = vec![Employee::new("1", "Ada", 2)];
/// let stale = vec![Employee::new("1", "Ada (old)", 4)];
///
/// let lookup = SourceSet::new(vec![fresh, stale]);
/// assert_eq!(lookup.get("1").unwrap().display_name, "Ada");
/// assert_eq!(lookup.records().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    collections: Vec<Vec<Employee>>,
    // id -> (collection index, record index) of the canonical record
    index: HashMap<String, (usize, usize)>,
    // canonical record positions in first-seen order
    order: Vec<(usize, usize)>,
    // manager id -> canonical reports, first-seen order
    reports: HashMap<String, Vec<(usize, usize)>>,
}

impl SourceSet {
    /// Build a lookup from collections listed in precedence order.
    pub fn new(collections: Vec<Vec<Employee>>) -> Self {
        let mut index = HashMap::new();
        let mut order = Vec::new();
        let mut reports: HashMap<String, Vec<(usize, usize)>> = HashMap::new();

        for (c, collection) in collections.iter().enumerate() {
            for (r, employee) in collection.iter().enumerate() {
                if index.contains_key(&employee.id) {
                    continue;
                }
                index.insert(employee.id.clone(), (c, r));
                order.push((c, r));
                if let Some(manager) = employee.manager_id() {
                    reports.entry(manager.to_string()).or_default().push((c, r));
                }
            }
        }

        Self {
            collections,
            index,
            order,
            reports,
        }
    }

    /// Number of collections, including empty ones
    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }

    /// Number of raw records across all collections, duplicates included
    pub fn raw_record_count(&self) -> usize {
        self.collections.iter().map(Vec::len).sum()
    }

    /// Number of distinct employee ids
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn at(&self, (c, r): (usize, usize)) -> &Employee {
        &self.collections[c][r]
    }
}

impl EmployeeLookup for SourceSet {
    fn get(&self, id: &str) -> Option<&Employee> {
        self.index.get(id).map(|pos| self.at(*pos))
    }

    fn reports_of(&self, manager_id: &str) -> Vec<&Employee> {
        self.reports
            .get(manager_id)
            .map(|positions| positions.iter().map(|pos| self.at(*pos)).collect())
            .unwrap_or_default()
    }

    fn records(&self) -> Vec<&Employee> {
        self.order.iter().map(|pos| self.at(*pos)).collect()
    }
}
