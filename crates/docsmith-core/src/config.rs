//! Configuration schema (docsmith.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What to do with a declared object that has no catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmaterializedPolicy {
    /// Leave the object out of the documentation and log a warning
    Skip,

    /// Abort the run
    Fail,
}

impl Default for UnmaterializedPolicy {
    fn default() -> Self {
        Self::Skip
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to manifest.json
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Path to catalog.json
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,

    /// Root directory for generated pages
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Optional path for the JSON run report
    #[serde(default)]
    pub report: Option<PathBuf>,

    /// Handling of declared objects that were never materialized
    #[serde(default)]
    pub unmaterialized: UnmaterializedPolicy,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

fn default_manifest() -> PathBuf {
    PathBuf::from("target/manifest.json")
}

fn default_catalog() -> PathBuf {
    PathBuf::from("target/catalog.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("docs")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            catalog: default_catalog(),
            output_dir: default_output_dir(),
            report: None,
            unmaterialized: UnmaterializedPolicy::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.project_root = std::env::current_dir().unwrap_or_default();
        Ok(config)
    }

    /// Resolve a configured path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.resolve(&self.manifest)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.resolve(&self.catalog)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    pub fn report_path(&self) -> Option<PathBuf> {
        self.report.as_deref().map(|p| self.resolve(p))
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.manifest, PathBuf::from("target/manifest.json"));
        assert_eq!(config.catalog, PathBuf::from("target/catalog.json"));
        assert_eq!(config.output_dir, PathBuf::from("docs"));
        assert_eq!(config.unmaterialized, UnmaterializedPolicy::Skip);
        assert!(config.report.is_none());
    }

    #[test]
    fn parse_partial_toml() {
        let config = Config::from_toml(
            r#"
            output_dir = "site/dbt"
            unmaterialized = "fail"
            "#,
        )
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("site/dbt"));
        assert_eq!(config.unmaterialized, UnmaterializedPolicy::Fail);
        assert_eq!(config.manifest, PathBuf::from("target/manifest.json"));
    }

    #[test]
    fn reject_unknown_policy() {
        let result = Config::from_toml(r#"unmaterialized = "explode""#);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn resolve_relative_paths() {
        let mut config = Config::default();
        config.project_root = PathBuf::from("/work/project");

        assert_eq!(config.manifest_path(), PathBuf::from("/work/project/target/manifest.json"));
        assert_eq!(config.resolve(Path::new("/abs/out")), PathBuf::from("/abs/out"));
    }
}
