//! Entity registry
//!
//! Merges the manifest (what was declared) with the catalog (what was
//! materialized) into typed, kind-partitioned records. Every identifier is
//! classified once here; the records carry their [`NodeKind`] from then on.

use docsmith_core::{
    Artifact, Column, Columns, DocsError, MacroArgument, MacroRecord, NodeKind, SourceRecord,
    TableRecord, TestRecord, UniqueId, UnmaterializedPolicy,
};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogColumn, CatalogTable};
use crate::graph::BuildGraph;
use crate::manifest::{
    parse_entry, ColumnDefinition, Manifest, ManifestMacro, ManifestNode, ManifestSource,
    ManifestTest,
};

/// Namespace of the macros shipped with dbt itself; never documented
pub const BUILTIN_MACRO_NAMESPACE: &str = "macro.dbt.";

/// Typed records for every documented build object
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    tables: IndexMap<String, TableRecord>,
    sources: IndexMap<String, SourceRecord>,
    tests: IndexMap<String, TestRecord>,
    macros: IndexMap<String, MacroRecord>,
    graph: BuildGraph,

    /// Declared objects without a catalog counterpart
    skipped: Vec<String>,
}

impl EntityRegistry {
    /// Build the registry from both artifacts
    ///
    /// Structural problems in either artifact abort the whole build. A
    /// declared table or source missing from the catalog is handled
    /// according to `policy`.
    pub fn build(
        manifest: &Manifest,
        catalog: &Catalog,
        policy: UnmaterializedPolicy,
    ) -> Result<Self, DocsError> {
        let mut registry = Self {
            graph: BuildGraph::from_manifest(manifest),
            ..Self::default()
        };

        for (unique_id, body) in &manifest.nodes {
            let id = UniqueId::parse(unique_id.as_str());

            match id.kind.clone() {
                NodeKind::Model | NodeKind::Seed => {
                    let node: ManifestNode = parse_entry(unique_id, body)?;
                    let built = build_table(id, &node, catalog.get_node(unique_id));
                    if let Some(record) = registry.admit(built, policy)? {
                        registry.tables.insert(unique_id.clone(), record);
                    }
                }
                NodeKind::Test => {
                    let test: ManifestTest = parse_entry(unique_id, body)?;
                    let record = build_test(id, test)?;
                    registry.tests.insert(unique_id.clone(), record);
                }
                other => debug!(unique_id = %unique_id, kind = %other, "Ignoring undocumented node kind"),
            }
        }

        for (unique_id, body) in &manifest.sources {
            let id = UniqueId::parse(unique_id.as_str());
            if id.kind != NodeKind::Source {
                debug!(unique_id = %unique_id, "Ignoring source entry with unexpected prefix");
                continue;
            }

            let source: ManifestSource = parse_entry(unique_id, body)?;
            let built = build_source(id, &source, catalog.get_source(unique_id));
            if let Some(record) = registry.admit(built, policy)? {
                registry.sources.insert(unique_id.clone(), record);
            }
        }

        for (unique_id, body) in &manifest.macros {
            if unique_id.starts_with(BUILTIN_MACRO_NAMESPACE) {
                continue;
            }

            let id = UniqueId::parse(unique_id.as_str());
            if id.kind != NodeKind::Macro {
                debug!(unique_id = %unique_id, "Ignoring macro entry with unexpected prefix");
                continue;
            }

            let body: ManifestMacro = parse_entry(unique_id, body)?;
            registry.macros.insert(unique_id.clone(), build_macro(id, body));
        }

        info!(
            tables = registry.tables.len(),
            sources = registry.sources.len(),
            tests = registry.tests.len(),
            macros = registry.macros.len(),
            skipped = registry.skipped.len(),
            "Registry built"
        );

        Ok(registry)
    }

    /// Keep a built record, or apply the policy to a missing catalog entry
    fn admit<T>(
        &mut self,
        built: Result<T, DocsError>,
        policy: UnmaterializedPolicy,
    ) -> Result<Option<T>, DocsError> {
        let err = match built {
            Ok(record) => return Ok(Some(record)),
            Err(err) => err,
        };

        if policy == UnmaterializedPolicy::Fail || !err.is_recoverable() {
            return Err(err);
        }

        if let DocsError::NotFound(unique_id) = err {
            warn!(unique_id = %unique_id, "Declared but never materialized; no page will be written");
            self.skipped.push(unique_id);
        }
        Ok(None)
    }

    pub fn tables(&self) -> &IndexMap<String, TableRecord> {
        &self.tables
    }

    pub fn sources(&self) -> &IndexMap<String, SourceRecord> {
        &self.sources
    }

    pub fn tests(&self) -> &IndexMap<String, TestRecord> {
        &self.tests
    }

    pub fn macros(&self) -> &IndexMap<String, MacroRecord> {
        &self.macros
    }

    pub fn graph(&self) -> &BuildGraph {
        &self.graph
    }

    /// Identifiers left out because the catalog has no entry for them
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn table(&self, unique_id: &str) -> Option<&TableRecord> {
        self.tables.get(unique_id)
    }

    pub fn source(&self, unique_id: &str) -> Option<&SourceRecord> {
        self.sources.get(unique_id)
    }

    pub fn test(&self, unique_id: &str) -> Option<&TestRecord> {
        self.tests.get(unique_id)
    }

    pub fn get_macro(&self, unique_id: &str) -> Option<&MacroRecord> {
        self.macros.get(unique_id)
    }

    /// Whether a table or source with this identifier was registered
    pub fn has_relation(&self, unique_id: &str) -> bool {
        self.tables.contains_key(unique_id) || self.sources.contains_key(unique_id)
    }

    /// Columns of a registered table or source
    pub fn columns(&self, unique_id: &str) -> Option<&Columns> {
        self.tables
            .get(unique_id)
            .map(|t| &t.columns)
            .or_else(|| self.sources.get(unique_id).map(|s| &s.columns))
    }

    /// Mutable columns of a registered table or source
    pub(crate) fn columns_mut(&mut self, unique_id: &str) -> Option<&mut Columns> {
        if let Some(table) = self.tables.get_mut(unique_id) {
            return Some(&mut table.columns);
        }
        self.sources.get_mut(unique_id).map(|s| &mut s.columns)
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Merge realized columns with declared descriptions, ordered by position
fn merge_columns(
    realized: &IndexMap<String, CatalogColumn>,
    declared: &IndexMap<String, ColumnDefinition>,
) -> Columns {
    let mut columns: Vec<Column> = realized
        .values()
        .map(|col| {
            let description = declared.get(&col.name).map(|def| def.description.clone());
            Column::new(col.name.as_str(), col.data_type.as_str(), col.index)
                .with_comment(col.comment.clone())
                .with_description(description)
        })
        .collect();

    columns.sort_by_key(|col| col.index);
    columns.into_iter().map(|col| (col.name.clone(), col)).collect()
}

fn build_table(
    id: UniqueId,
    node: &ManifestNode,
    realized: Option<&CatalogTable>,
) -> Result<TableRecord, DocsError> {
    let realized = realized.ok_or_else(|| DocsError::NotFound(id.raw.clone()))?;

    Ok(TableRecord {
        name: node.name.clone(),
        columns: merge_columns(&realized.columns, &node.columns),
        depends_on: node.depends_on.nodes.clone(),
        depends_on_macros: node.depends_on.macros.clone(),
        raw_code: node.raw_code.clone(),
        compiled_code: node.compiled_code.clone(),
        description: non_empty(&node.description),
        language: node.language.clone(),
        tags: node.tags.clone(),
        owner: realized.metadata.owner.clone(),
        package_name: node.package_name.clone(),
        database: node.database.clone(),
        schema: node.schema.clone(),
        materialized: node
            .config
            .materialized
            .clone()
            .unwrap_or_else(|| node.resource_type.clone()),
        id,
    })
}

fn build_source(
    id: UniqueId,
    source: &ManifestSource,
    realized: Option<&CatalogTable>,
) -> Result<SourceRecord, DocsError> {
    let realized = realized.ok_or_else(|| DocsError::NotFound(id.raw.clone()))?;

    Ok(SourceRecord {
        name: source.name.clone(),
        columns: merge_columns(&realized.columns, &source.columns),
        description: non_empty(&source.description),
        tags: source.tags.clone(),
        owner: realized.metadata.owner.clone(),
        package_name: source.package_name.clone(),
        database: source.database.clone(),
        schema: source.schema.clone(),
        loader: source.loader.clone(),
        source_name: source.source_name.clone(),
        id,
    })
}

fn build_test(id: UniqueId, test: ManifestTest) -> Result<TestRecord, DocsError> {
    let refs = reference_names(id.as_str(), &test.refs)?;
    let test_kind = match test.test_metadata {
        Some(metadata) => metadata.name,
        // Singular tests have no generic definition behind them
        None => test.name.clone(),
    };

    Ok(TestRecord {
        name: test.name,
        materialized: test.config.materialized.unwrap_or_else(|| "test".to_string()),
        column_name: test.column_name,
        attached_node: test.attached_node,
        refs,
        depends_on: test.depends_on.nodes,
        raw_code: test.raw_code,
        compiled_code: test.compiled_code,
        description: non_empty(&test.description),
        test_kind,
        id,
    })
}

fn build_macro(id: UniqueId, body: ManifestMacro) -> MacroRecord {
    MacroRecord {
        name: body.name,
        depends_on_models: body.depends_on.models,
        depends_on_macros: body.depends_on.macros,
        arguments: body
            .arguments
            .into_iter()
            .map(|arg| MacroArgument {
                name: arg.name,
                data_type: arg.data_type,
                description: arg.description,
            })
            .collect(),
        macro_sql: body.macro_sql,
        description: non_empty(&body.description),
        resource_type: body.resource_type,
        package_name: body.package_name,
        id,
    }
}

/// Flatten a test's `refs` into model names
///
/// Accepts every shape dbt has used: `["orders"]`, `[["orders"]]`,
/// `[["pkg", "orders"]]` and `[{"name": "orders", ...}]`.
fn reference_names(unique_id: &str, refs: &Value) -> Result<Vec<String>, DocsError> {
    let items = refs.as_array().ok_or_else(|| DocsError::InvalidArgument {
        unique_id: unique_id.to_string(),
        field: "refs",
    })?;

    items
        .iter()
        .map(|item| {
            let name = match item {
                Value::String(name) => Some(name.as_str()),
                Value::Array(parts) => parts.last().and_then(Value::as_str),
                Value::Object(fields) => fields.get("name").and_then(Value::as_str),
                _ => None,
            };

            name.map(str::to_string).ok_or_else(|| {
                DocsError::malformed(Artifact::Manifest, unique_id, format!("unreadable ref entry {item}"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn refs_in_every_shape() {
        let refs = json!(["orders", ["customers"], ["shop", "payments"], { "name": "items", "package": null }]);
        let names = reference_names("test.shop.x.1", &refs).unwrap();
        assert_eq!(names, vec!["orders", "customers", "payments", "items"]);
    }

    #[test]
    fn refs_must_be_a_list() {
        let err = reference_names("test.shop.x.1", &json!("orders")).unwrap_err();
        assert!(matches!(err, DocsError::InvalidArgument { field: "refs", .. }));
    }

    #[test]
    fn columns_follow_catalog_positions() {
        let realized: IndexMap<String, CatalogColumn> = serde_json::from_value(json!({
            "b": { "type": "text", "index": 2, "name": "b" },
            "a": { "type": "int", "index": 1, "name": "a", "comment": "first" }
        }))
        .unwrap();
        let declared: IndexMap<String, ColumnDefinition> = serde_json::from_value(json!({
            "a": { "name": "a", "description": "The a column" }
        }))
        .unwrap();

        let columns = merge_columns(&realized, &declared);
        let names: Vec<&str> = columns.keys().map(String::as_str).collect();

        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(columns["a"].description.as_deref(), Some("The a column"));
        assert_eq!(columns["a"].comment.as_deref(), Some("first"));
        assert_eq!(columns["b"].description, None);
    }

    #[test]
    fn blank_descriptions_are_absent() {
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("  \n"), None);
        assert_eq!(non_empty("Orders"), Some("Orders".to_string()));
    }
}
