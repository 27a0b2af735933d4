//! Configuration file loading and parsing.
//!
//! orgchart reads optional settings from `orgchart.toml`. Every section is
//! optional; missing values fall back to defaults.
//!
//! ```toml
//! [sources]
//! files = ["data/all_employees.json", "data/managers.json"]
//!
//! [roles.5]
//! name = "Contractor"
//! tier = "employee"
//!
//! [render]
//! direction = "LR"
//! show_role = true
//! ```

use crate::domain::RoleId;
use crate::errors::OrgchartError;
use crate::roles::{RoleCatalog, RoleCatalogError, RoleEntry};
use crate::visualization::Direction;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "orgchart.toml";

/// Root configuration structure loaded from `orgchart.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrgchartConfig {
    /// Employee collection files (optional).
    pub sources: Option<SourcesConfig>,
    /// Role catalog additions and overrides, keyed by role id (optional).
    pub roles: Option<HashMap<String, RoleEntry>>,
    /// Diagram output settings (optional).
    pub render: Option<RenderConfig>,
}

/// Employee collection files, in precedence order.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    pub files: Vec<PathBuf>,
}

/// Diagram output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Flowchart direction (default: TD).
    pub direction: Option<Direction>,
    /// Put the role name under the employee name (default: true).
    pub show_role: Option<bool>,
    /// Mermaid CLI executable (default: "mmdc").
    pub mmdc_path: Option<PathBuf>,
}

impl RenderConfig {
    pub fn direction(&self) -> Direction {
        self.direction.unwrap_or_default()
    }

    pub fn show_role(&self) -> bool {
        self.show_role.unwrap_or(true)
    }

    pub fn mmdc_path(&self) -> PathBuf {
        self.mmdc_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("mmdc"))
    }
}

impl OrgchartConfig {
    /// Parse configuration from TOML text.
    pub fn parse(path: &Path, contents: &str) -> Result<Self, OrgchartError> {
        toml::from_str(contents).map_err(|e| OrgchartError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a file.
    ///
    /// Relative source paths are resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self, OrgchartError> {
        let contents = std::fs::read_to_string(path).map_err(|e| OrgchartError::io(path, e))?;
        let mut config = Self::parse(path, &contents)?;

        if let (Some(sources), Some(base)) = (config.sources.as_mut(), path.parent()) {
            for file in &mut sources.files {
                if file.is_relative() {
                    *file = base.join(&*file);
                }
            }
        }

        Ok(config)
    }

    /// Load from `path` if given, otherwise from `orgchart.toml` in `dir` if it
    /// exists, otherwise defaults.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self, OrgchartError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let default_path = dir.join(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::load(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Source files listed in the config
    pub fn source_files(&self) -> Vec<PathBuf> {
        self.sources
            .as_ref()
            .map(|sources| sources.files.clone())
            .unwrap_or_default()
    }

    /// Role catalog: defaults plus configured roles
    pub fn role_catalog(&self) -> Result<RoleCatalog, OrgchartError> {
        let mut overrides: Vec<(RoleId, RoleEntry)> = Vec::new();
        for (key, entry) in self.roles.iter().flatten() {
            let id = key
                .trim()
                .parse::<RoleId>()
                .map_err(|_| RoleCatalogError::InvalidId(key.clone()))?;
            overrides.push((id, entry.clone()));
        }
        Ok(RoleCatalog::with_overrides(overrides)?)
    }

    /// Render settings with defaults filled in
    pub fn render(&self) -> RenderConfig {
        self.render.clone().unwrap_or(RenderConfig {
            direction: None,
            show_role: None,
            mmdc_path: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::RoleTier;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = OrgchartConfig::parse(Path::new("orgchart.toml"), "").unwrap();

        assert!(config.source_files().is_empty());
        assert_eq!(config.render().direction(), Direction::TopDown);
        assert!(config.render().show_role());
        assert_eq!(config.render().mmdc_path(), PathBuf::from("mmdc"));
        assert_eq!(config.role_catalog().unwrap(), RoleCatalog::default());
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
[sources]
files = ["a.json", "b.json"]

[roles.5]
name = "Contractor"
tier = "employee"

[roles.2]
name = "Head of Department"
tier = "manager"

[render]
direction = "LR"
show_role = false
"#;
        let config = OrgchartConfig::parse(Path::new("orgchart.toml"), toml).unwrap();

        assert_eq!(
            config.source_files(),
            vec![PathBuf::from("a.json"), PathBuf::from("b.json")]
        );
        let catalog = config.role_catalog().unwrap();
        assert_eq!(catalog.tier(5), Some(RoleTier::Employee));
        assert_eq!(catalog.name(2), Some("Head of Department"));
        assert_eq!(config.render().direction(), Direction::LeftRight);
        assert!(!config.render().show_role());
    }

    #[test]
    fn test_invalid_tier_is_config_error() {
        let toml = r#"
[roles.5]
name = "Contractor"
tier = "intern"
"#;
        let err = OrgchartConfig::parse(Path::new("orgchart.toml"), toml).unwrap_err();
        assert!(matches!(err, OrgchartError::Config { .. }));
    }

    #[test]
    fn test_non_numeric_role_id_rejected() {
        let toml = r#"
[roles.lead]
name = "Lead"
tier = "leader"
"#;
        let config = OrgchartConfig::parse(Path::new("orgchart.toml"), toml).unwrap();
        let err = config.role_catalog().unwrap_err();
        assert!(err.to_string().contains("lead"));
    }

    #[test]
    fn test_load_resolves_relative_sources() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("orgchart.toml");
        fs::write(&path, "[sources]\nfiles = [\"data/all.json\"]\n").unwrap();

        let config = OrgchartConfig::load(&path).unwrap();
        assert_eq!(config.source_files(), vec![temp.path().join("data/all.json")]);
    }

    #[test]
    fn test_discover_without_file_gives_defaults() {
        let temp = TempDir::new().unwrap();

        let config = OrgchartConfig::discover(None, temp.path()).unwrap();
        assert!(config.sources.is_none());
    }

    #[test]
    fn test_discover_finds_default_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(DEFAULT_CONFIG_FILE),
            "[render]\ndirection = \"BT\"\n",
        )
        .unwrap();

        let config = OrgchartConfig::discover(None, temp.path()).unwrap();
        assert_eq!(config.render().direction(), Direction::BottomTop);
    }
}
