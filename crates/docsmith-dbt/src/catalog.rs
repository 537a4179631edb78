//! dbt catalog.json parsing
//!
//! The catalog holds what the warehouse actually contains for every
//! materialized node and source: column names, types, positions and comments.

use docsmith_core::{Artifact, DocsError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// dbt catalog.json structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Materialized models and seeds
    pub nodes: IndexMap<String, CatalogTable>,

    /// Sources found in the warehouse
    pub sources: IndexMap<String, CatalogTable>,
}

impl Catalog {
    /// Parse catalog from JSON string
    pub fn from_str(json: &str) -> Result<Self, DocsError> {
        serde_json::from_str(json)
            .map_err(|e| DocsError::malformed(Artifact::Catalog, "root", e))
    }

    pub fn get_node(&self, unique_id: &str) -> Option<&CatalogTable> {
        self.nodes.get(unique_id)
    }

    pub fn get_source(&self, unique_id: &str) -> Option<&CatalogTable> {
        self.sources.get(unique_id)
    }
}

/// One relation in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogTable {
    pub metadata: TableMetadata,

    /// Columns keyed by name
    pub columns: IndexMap<String, CatalogColumn>,
}

/// Relation-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Relation type (BASE TABLE, VIEW, ...)
    #[serde(default, rename = "type")]
    pub table_type: Option<String>,

    #[serde(default)]
    pub database: Option<String>,

    #[serde(default)]
    pub schema: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub comment: Option<String>,

    /// Relation owner
    #[serde(default)]
    pub owner: Option<String>,
}

/// A realized column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogColumn {
    /// Warehouse data type
    #[serde(rename = "type")]
    pub data_type: String,

    /// Ordinal position
    pub index: u32,

    pub name: String,

    #[serde(default)]
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_catalog() {
        let json = json!({
            "metadata": { "dbt_version": "1.7.4" },
            "nodes": {
                "model.shop.orders": {
                    "metadata": { "type": "BASE TABLE", "schema": "analytics", "name": "orders", "owner": "dbt" },
                    "columns": {
                        "id": { "type": "integer", "index": 1, "name": "id", "comment": null },
                        "status": { "type": "varchar", "index": 2, "name": "status", "comment": "order state" }
                    },
                    "stats": {}
                }
            },
            "sources": {},
            "errors": null
        });

        let catalog = Catalog::from_str(&json.to_string()).unwrap();
        let orders = catalog.get_node("model.shop.orders").unwrap();

        assert_eq!(orders.metadata.owner.as_deref(), Some("dbt"));
        assert_eq!(orders.columns.len(), 2);
        assert_eq!(orders.columns["status"].comment.as_deref(), Some("order state"));
        assert!(catalog.get_source("source.shop.raw.orders").is_none());
    }

    #[test]
    fn missing_columns_is_malformed() {
        let json = json!({
            "nodes": { "model.shop.orders": { "metadata": {} } },
            "sources": {}
        });

        let err = Catalog::from_str(&json.to_string()).unwrap_err();
        assert!(matches!(
            err,
            DocsError::MalformedArtifact { artifact: Artifact::Catalog, .. }
        ));
    }
}
