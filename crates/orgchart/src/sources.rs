//! Directory sources supplying employee collections.
//!
//! A source hands over zero or more collections in precedence order. The order
//! matters: [`crate::lookup::SourceSet`] treats the first record for an id as
//! canonical.

use crate::domain::Employee;
use crate::errors::OrgchartError;
use crate::lookup::SourceSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supplier of employee collections
pub trait DirectorySource {
    /// Collections in precedence order, most authoritative first
    fn collections(&self) -> Result<Vec<Vec<Employee>>, OrgchartError>;

    /// Snapshot the collections into a lookup
    fn snapshot(&self) -> Result<SourceSet, OrgchartError> {
        Ok(SourceSet::new(self.collections()?))
    }
}

/// Collections already held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    collections: Vec<Vec<Employee>>,
}

impl StaticSource {
    pub fn new(collections: Vec<Vec<Employee>>) -> Self {
        Self { collections }
    }

    /// Append a collection with lower precedence than those already held
    pub fn push(&mut self, collection: Vec<Employee>) {
        self.collections.push(collection);
    }
}

impl DirectorySource for StaticSource {
    fn collections(&self) -> Result<Vec<Vec<Employee>>, OrgchartError> {
        Ok(self.collections.clone())
    }
}

/// Accepted shapes of a collection file
#[derive(Deserialize)]
#[serde(untagged)]
enum CollectionFile {
    List(Vec<Employee>),
    Wrapped { employees: Vec<Employee> },
}

/// Collections read from JSON files, one collection per file.
///
/// Each file holds either a JSON array of employee records or an object with an
/// `employees` array.
#[derive(Debug, Clone, Default)]
pub struct JsonFileSource {
    paths: Vec<PathBuf>,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self {
            paths: paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
        }
    }

    /// Parse one collection from JSON text
    pub fn parse(path: &Path, contents: &str) -> Result<Vec<Employee>, OrgchartError> {
        let file: CollectionFile =
            serde_json::from_str(contents).map_err(|source| OrgchartError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(match file {
            CollectionFile::List(employees) => employees,
            CollectionFile::Wrapped { employees } => employees,
        })
    }

    fn load(path: &Path) -> Result<Vec<Employee>, OrgchartError> {
        let contents = std::fs::read_to_string(path).map_err(|e| OrgchartError::io(path, e))?;
        let employees = Self::parse(path, &contents)?;
        debug!(path = %path.display(), records = employees.len(), "loaded employee collection");
        Ok(employees)
    }
}

impl DirectorySource for JsonFileSource {
    fn collections(&self) -> Result<Vec<Vec<Employee>>, OrgchartError> {
        self.paths.iter().map(|path| Self::load(path)).collect()
    }
}
