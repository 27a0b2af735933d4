//! Role catalog and node style classification.
//!
//! Roles arrive from the directory as bare numeric identifiers. The catalog maps
//! each identifier to a display name and a hierarchy tier, and the tier decides
//! which style class a node is drawn with.
//!
//! # Examples
//!
//! ```
//! use orgchart::domain::StyleClass;
//! use orgchart::roles::{classify, RoleCatalog};
//!
//! let catalog = RoleCatalog::default();
//! assert_eq!(classify(&catalog, 2, false), StyleClass::Manager);
//! assert_eq!(classify(&catalog, 2, true), StyleClass::Current);
//! assert_eq!(classify(&catalog, 42, false), StyleClass::Other);
//! ```

use crate::domain::{RoleId, StyleClass};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Hierarchy tier a role belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTier {
    Admin,
    Manager,
    Leader,
    Employee,
}

impl RoleTier {
    /// Style class used for nodes of this tier
    pub fn style_class(&self) -> StyleClass {
        match self {
            RoleTier::Admin => StyleClass::Admin,
            RoleTier::Manager => StyleClass::Manager,
            RoleTier::Leader => StyleClass::Leader,
            RoleTier::Employee => StyleClass::Employee,
        }
    }
}

/// Catalog entry for one role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEntry {
    /// Human-readable role name
    pub name: String,
    pub tier: RoleTier,
}

/// Errors raised when building a catalog from configuration.
#[derive(Debug, Error, PartialEq)]
pub enum RoleCatalogError {
    #[error("Role {0} has an empty name")]
    EmptyName(RoleId),

    #[error("Invalid role id '{0}' (expected a non-negative integer)")]
    InvalidId(String),
}

/// Read-only mapping from role id to role entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleCatalog {
    roles: HashMap<RoleId, RoleEntry>,
}

impl Default for RoleCatalog {
    /// The four roles known to every directory:
    /// 1. Administrator
    /// 2. Manager
    /// 3. Team Leader
    /// 4. Employee
    fn default() -> Self {
        let roles = [
            (1, "Administrator", RoleTier::Admin),
            (2, "Manager", RoleTier::Manager),
            (3, "Team Leader", RoleTier::Leader),
            (4, "Employee", RoleTier::Employee),
        ]
        .into_iter()
        .map(|(id, name, tier)| {
            (
                id,
                RoleEntry {
                    name: name.to_string(),
                    tier,
                },
            )
        })
        .collect();

        Self { roles }
    }
}

impl RoleCatalog {
    /// Create an empty catalog. Every role classifies as `other`.
    pub fn empty() -> Self {
        Self {
            roles: HashMap::new(),
        }
    }

    /// Default catalog with configured entries layered on top.
    ///
    /// Configured entries replace default entries with the same id.
    pub fn with_overrides(
        overrides: impl IntoIterator<Item = (RoleId, RoleEntry)>,
    ) -> Result<Self, RoleCatalogError> {
        let mut catalog = Self::default();
        for (id, entry) in overrides {
            if entry.name.trim().is_empty() {
                return Err(RoleCatalogError::EmptyName(id));
            }
            catalog.roles.insert(id, entry);
        }
        Ok(catalog)
    }

    /// Full entry for a role id
    pub fn get(&self, role_id: RoleId) -> Option<&RoleEntry> {
        self.roles.get(&role_id)
    }

    /// Tier of a role id, `None` if the role is not catalogued
    pub fn tier(&self, role_id: RoleId) -> Option<RoleTier> {
        self.roles.get(&role_id).map(|entry| entry.tier)
    }

    /// Display name of a role id
    pub fn name(&self, role_id: RoleId) -> Option<&str> {
        self.roles.get(&role_id).map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// Pick the style class for a node.
///
/// The focal employee is always `current`. Everyone else is classed by the tier
/// of their role, and roles the catalog does not know are `other`.
pub fn classify(catalog: &RoleCatalog, role_id: RoleId, is_focal: bool) -> StyleClass {
    if is_focal {
        return StyleClass::Current;
    }
    catalog
        .tier(role_id)
        .map(|tier| tier.style_class())
        .unwrap_or(StyleClass::Other)
}
