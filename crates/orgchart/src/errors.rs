//! Library error types.
//!
//! Graph construction itself cannot fail. Errors only arise at the edges:
//! reading directory data, reading configuration, and finding the focal
//! employee a caller asked for.

use crate::roles::RoleCatalogError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading inputs for a graph build
#[derive(Debug, Error)]
pub enum OrgchartError {
    /// No collection contains the requested employee
    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file is not a valid employee collection
    #[error("Invalid employee data in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Roles(#[from] RoleCatalogError),

    /// Neither the config nor the command line named a collection
    #[error("No employee collections configured")]
    NoSources,

    /// Options that cannot be combined
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl OrgchartError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OrgchartError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by a missing employee or file
    pub fn is_not_found(&self) -> bool {
        match self {
            OrgchartError::EmployeeNotFound(_) => true,
            OrgchartError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(OrgchartError::EmployeeNotFound("7".into()).is_not_found());
        assert!(OrgchartError::io(
            "missing.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone")
        )
        .is_not_found());
        assert!(!OrgchartError::Config {
            path: "orgchart.toml".into(),
            message: "bad".into()
        }
        .is_not_found());
    }

    #[test]
    fn test_messages_name_the_file() {
        let error = OrgchartError::io(
            "data/all.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(error.to_string().contains("data/all.json"));
    }
}
