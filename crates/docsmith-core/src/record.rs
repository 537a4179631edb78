//! Typed records for documented build objects
//!
//! Records are produced by the registry from the manifest and catalog and are
//! the only shape the renderer sees. Optional fields stay `None` here; the
//! renderer decides how an absent value is displayed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use crate::node::UniqueId;

/// A realized column merged with its declared metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Warehouse data type as reported by the catalog
    #[serde(rename = "type")]
    pub data_type: String,

    /// Ordinal position in the relation
    pub index: u32,

    /// Physical column comment
    pub comment: Option<String>,

    /// Description declared in the project's YAML
    pub description: Option<String>,

    /// Names of the test kinds attributed to this column
    #[serde(default)]
    pub tests: BTreeSet<String>,
}

impl Column {
    /// Create a column with no comment, description or tests
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            index,
            comment: None,
            description: None,
            tests: BTreeSet::new(),
        }
    }

    /// Set the declared description
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Set the physical comment
    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    /// Attribute a test kind to this column; returns false if it was already present
    pub fn attribute_test(&mut self, test_kind: impl Into<String>) -> bool {
        self.tests.insert(test_kind.into())
    }
}

/// Columns keyed by name, in catalog order
pub type Columns = IndexMap<String, Column>;

/// A model or seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Tagged identifier; its kind tells models and seeds apart
    pub id: UniqueId,

    /// Relation name
    pub name: String,

    /// Realized columns
    pub columns: Columns,

    /// Upstream node identifiers
    pub depends_on: Vec<String>,

    /// Upstream macro identifiers
    pub depends_on_macros: Vec<String>,

    /// Code as authored
    pub raw_code: String,

    /// Code after Jinja compilation (absent for seeds and uncompiled projects)
    pub compiled_code: Option<String>,

    /// Declared description
    pub description: Option<String>,

    /// Language of the code (sql, python)
    pub language: String,

    /// Tags
    pub tags: Vec<String>,

    /// Relation owner reported by the catalog
    pub owner: Option<String>,

    /// Package that declares the object
    pub package_name: String,

    /// Target database
    pub database: Option<String>,

    /// Target schema
    pub schema: String,

    /// Materialization strategy (view, table, incremental, seed, ...)
    pub materialized: String,
}

/// An externally loaded table declared as a source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Tagged identifier
    pub id: UniqueId,

    /// Table name
    pub name: String,

    /// Realized columns
    pub columns: Columns,

    /// Declared description
    pub description: Option<String>,

    /// Tags
    pub tags: Vec<String>,

    /// Relation owner reported by the catalog
    pub owner: Option<String>,

    /// Package that declares the source
    pub package_name: String,

    /// Database
    pub database: Option<String>,

    /// Schema
    pub schema: String,

    /// Tool that loads the table (fivetran, airbyte, ...)
    pub loader: Option<String>,

    /// Source group the table belongs to
    pub source_name: String,
}

/// A data test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    /// Tagged identifier (with the uniqueness hash)
    pub id: UniqueId,

    /// Test name
    pub name: String,

    /// Materialization (always `test` in practice)
    pub materialized: String,

    /// Column under test; `None` for table-level tests
    pub column_name: Option<String>,

    /// Node the test is attached to, when the manifest records it
    pub attached_node: Option<String>,

    /// Models referenced by the test
    pub refs: Vec<String>,

    /// Upstream node identifiers
    pub depends_on: Vec<String>,

    /// Code as authored
    pub raw_code: String,

    /// Compiled code
    pub compiled_code: Option<String>,

    /// Declared description
    pub description: Option<String>,

    /// Underlying test kind (`unique`, `not_null`, `relationships`, ...)
    pub test_kind: String,
}

/// A declared macro argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroArgument {
    pub name: String,

    #[serde(rename = "type")]
    pub data_type: Option<String>,

    pub description: Option<String>,
}

/// A user macro
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroRecord {
    /// Tagged identifier
    pub id: UniqueId,

    /// Macro name
    pub name: String,

    /// Models the macro depends on
    pub depends_on_models: Vec<String>,

    /// Macros the macro calls
    pub depends_on_macros: Vec<String>,

    /// Declared arguments
    pub arguments: Vec<MacroArgument>,

    /// Macro body
    pub macro_sql: String,

    /// Declared description
    pub description: Option<String>,

    /// Resource type as reported by the manifest
    pub resource_type: String,

    /// Package that declares the macro
    pub package_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_builder() {
        let column = Column::new("id", "integer", 1)
            .with_description(Some("Primary key".to_string()))
            .with_comment(None);

        assert_eq!(column.name, "id");
        assert_eq!(column.data_type, "integer");
        assert_eq!(column.description.as_deref(), Some("Primary key"));
        assert!(column.tests.is_empty());
    }

    #[test]
    fn attribution_is_deduplicated() {
        let mut column = Column::new("id", "integer", 1);

        assert!(column.attribute_test("unique"));
        assert!(column.attribute_test("not_null"));
        assert!(!column.attribute_test("unique"));

        assert_eq!(column.tests.len(), 2);
    }

    #[test]
    fn column_serializes_type_field() {
        let column = Column::new("id", "varchar", 1);
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json["type"], "varchar");
    }
}
