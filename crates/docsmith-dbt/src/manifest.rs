//! dbt manifest.json parsing
//!
//! The top level is parsed eagerly; node bodies stay as raw JSON until the
//! registry has classified them by kind and asks for the matching typed view
//! (`ManifestNode`, `ManifestTest`, `ManifestSource`, `ManifestMacro`).

use docsmith_core::{Artifact, DocsError};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// dbt manifest.json structure (subset of fields we care about)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Metadata about the manifest
    #[serde(default)]
    pub metadata: Option<ManifestMetadata>,

    /// Models, seeds, tests, snapshots, analyses, ...
    pub nodes: IndexMap<String, Value>,

    /// Source definitions
    pub sources: IndexMap<String, Value>,

    /// Macro definitions, including the ones shipped with dbt itself
    pub macros: IndexMap<String, Value>,

    /// Parent map (node -> list of parent nodes)
    pub parent_map: IndexMap<String, Vec<String>>,

    /// Child map (node -> list of child nodes)
    pub child_map: IndexMap<String, Vec<String>>,
}

impl Manifest {
    /// Parse manifest from JSON string
    pub fn from_str(json: &str) -> Result<Self, DocsError> {
        serde_json::from_str(json)
            .map_err(|e| DocsError::malformed(Artifact::Manifest, "root", e))
    }

    /// Get a raw node or source body by unique_id
    pub fn get(&self, unique_id: &str) -> Option<&Value> {
        self.nodes
            .get(unique_id)
            .or_else(|| self.sources.get(unique_id))
            .or_else(|| self.macros.get(unique_id))
    }

    /// Find the unique_id of a node, source or macro by its short name
    pub fn find_by_name(&self, name: &str) -> Option<&str> {
        self.nodes
            .iter()
            .chain(self.sources.iter())
            .chain(self.macros.iter())
            .find(|(_, body)| body.get("name").and_then(Value::as_str) == Some(name))
            .map(|(unique_id, _)| unique_id.as_str())
    }
}

/// Deserialize one manifest entry into its typed view
pub(crate) fn parse_entry<T: DeserializeOwned>(unique_id: &str, body: &Value) -> Result<T, DocsError> {
    T::deserialize(body).map_err(|e| DocsError::malformed(Artifact::Manifest, unique_id, e))
}

/// Manifest metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    #[serde(default)]
    pub dbt_schema_version: Option<String>,
    #[serde(default)]
    pub dbt_version: Option<String>,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
}

/// A model or seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestNode {
    /// Node name (e.g., "orders")
    pub name: String,

    /// Resource type (model, seed)
    pub resource_type: String,

    /// Package name
    pub package_name: String,

    /// Database name
    #[serde(default)]
    pub database: Option<String>,

    /// Schema name
    pub schema: String,

    /// Node configuration
    #[serde(default)]
    pub config: NodeConfig,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Column definitions
    #[serde(default)]
    pub columns: IndexMap<String, ColumnDefinition>,

    /// Dependencies
    #[serde(default)]
    pub depends_on: DependsOn,

    /// Code as authored
    #[serde(default, alias = "raw_sql")]
    pub raw_code: String,

    /// Code after compilation
    #[serde(default, alias = "compiled_sql")]
    pub compiled_code: Option<String>,

    /// Language of the code
    #[serde(default = "default_language")]
    pub language: String,

    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_language() -> String {
    "sql".to_string()
}

/// Node configuration (from dbt_project.yml or model config)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Whether the node is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Materialization type
    #[serde(default)]
    pub materialized: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            materialized: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Column definition from manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Data type (if specified in contract)
    #[serde(default)]
    pub data_type: Option<String>,
}

/// Dependencies structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependsOn {
    /// List of node unique_ids this node depends on
    #[serde(default)]
    pub nodes: Vec<String>,

    /// List of macro unique_ids this node calls
    #[serde(default)]
    pub macros: Vec<String>,
}

/// A data test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestTest {
    pub name: String,

    pub resource_type: String,

    pub package_name: String,

    #[serde(default)]
    pub config: NodeConfig,

    /// Column under test (null for table-level tests)
    #[serde(default)]
    pub column_name: Option<String>,

    /// Node the test is declared on
    #[serde(default)]
    pub attached_node: Option<String>,

    /// Referenced models. Older manifests store `[["orders"]]`, newer ones
    /// `[{"name": "orders", "package": null, "version": null}]`, so the
    /// shape is checked by the registry rather than by serde.
    #[serde(default = "empty_list")]
    pub refs: Value,

    #[serde(default)]
    pub depends_on: DependsOn,

    #[serde(default, alias = "raw_sql")]
    pub raw_code: String,

    #[serde(default, alias = "compiled_sql")]
    pub compiled_code: Option<String>,

    #[serde(default)]
    pub description: String,

    /// Present for generic tests only
    #[serde(default)]
    pub test_metadata: Option<TestMetadata>,
}

fn empty_list() -> Value {
    Value::Array(Vec::new())
}

/// Generic test metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestMetadata {
    /// Generic test name (unique, not_null, accepted_values, ...)
    pub name: String,

    #[serde(default)]
    pub namespace: Option<String>,
}

/// A source in the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestSource {
    /// Source name (e.g., "raw")
    pub source_name: String,

    /// Table name (e.g., "users")
    pub name: String,

    /// Package name
    pub package_name: String,

    #[serde(default = "default_source_type")]
    pub resource_type: String,

    /// Database name
    #[serde(default)]
    pub database: Option<String>,

    /// Schema name
    pub schema: String,

    /// Identifier (actual table name)
    #[serde(default)]
    pub identifier: Option<String>,

    /// Loader (fivetran, airbyte, ...)
    #[serde(default)]
    pub loader: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Column definitions
    #[serde(default)]
    pub columns: IndexMap<String, ColumnDefinition>,
}

fn default_source_type() -> String {
    "source".to_string()
}

/// A macro in the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestMacro {
    pub name: String,

    pub resource_type: String,

    pub package_name: String,

    pub macro_sql: String,

    #[serde(default)]
    pub depends_on: MacroDependsOn,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub arguments: Vec<MacroArgumentDefinition>,
}

/// Macro dependencies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroDependsOn {
    #[serde(default)]
    pub models: Vec<String>,

    #[serde(default)]
    pub macros: Vec<String>,
}

/// Macro argument as documented in a properties file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroArgumentDefinition {
    pub name: String,

    #[serde(default, rename = "type")]
    pub data_type: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}
