//! Artifact fixtures for registry and resolver tests
//!
//! `ProjectFixture` assembles a manifest/catalog pair the way `dbt docs
//! generate` lays them out, so scenarios can be written as a few builder
//! calls instead of hand-written JSON documents.

#![allow(dead_code)]

use docsmith_core::UnmaterializedPolicy;
use docsmith_dbt::{Catalog, EntityRegistry, Manifest};
use serde_json::{json, Map, Value};

pub const PACKAGE: &str = "pkg";

pub struct ProjectFixture {
    manifest: Value,
    catalog: Value,
}

fn section<'a>(doc: &'a mut Value, key: &str) -> &'a mut Map<String, Value> {
    doc[key].as_object_mut().expect("fixture sections are objects")
}

fn catalog_columns(columns: &[(&str, &str)]) -> Value {
    let mut map = Map::new();
    for (i, (name, data_type)) in columns.iter().enumerate() {
        map.insert(
            name.to_string(),
            json!({ "type": data_type, "index": i + 1, "name": name, "comment": null }),
        );
    }
    Value::Object(map)
}

impl ProjectFixture {
    pub fn new() -> Self {
        Self {
            manifest: json!({
                "metadata": { "dbt_version": "1.7.4", "project_name": PACKAGE },
                "nodes": {},
                "sources": {},
                "macros": {},
                "parent_map": {},
                "child_map": {}
            }),
            catalog: json!({
                "metadata": { "dbt_version": "1.7.4" },
                "nodes": {},
                "sources": {},
                "errors": null
            }),
        }
    }

    /// Declare a model or seed without materializing it
    pub fn declare_table(mut self, unique_id: &str, name: &str) -> Self {
        let resource_type = unique_id.split('.').next().unwrap_or("model");
        let materialized = if resource_type == "seed" { "seed" } else { "view" };
        section(&mut self.manifest, "nodes").insert(
            unique_id.to_string(),
            json!({
                "name": name,
                "resource_type": resource_type,
                "package_name": PACKAGE,
                "database": "warehouse",
                "schema": "analytics",
                "config": { "materialized": materialized },
                "description": "",
                "columns": {},
                "depends_on": { "nodes": [], "macros": [] },
                "raw_code": format!("select * from {{{{ ref('{name}_base') }}}}"),
                "compiled_code": format!("\n\nselect * from analytics.{name}_base\n"),
                "language": "sql",
                "tags": []
            }),
        );
        self
    }

    /// Declare and materialize a model or seed
    pub fn table(self, unique_id: &str, name: &str, columns: &[(&str, &str)]) -> Self {
        self.declare_table(unique_id, name).materialize(unique_id, columns)
    }

    /// Add a catalog entry for a node
    pub fn materialize(mut self, unique_id: &str, columns: &[(&str, &str)]) -> Self {
        let entry = json!({
            "metadata": { "type": "VIEW", "schema": "analytics", "name": unique_id, "owner": "dbt_user" },
            "columns": catalog_columns(columns),
            "stats": {}
        });
        let key = if unique_id.starts_with("source.") { "sources" } else { "nodes" };
        section(&mut self.catalog, key).insert(unique_id.to_string(), entry);
        self
    }

    /// Declare a column (with description) in the manifest
    pub fn describe_column(mut self, unique_id: &str, column: &str, description: &str) -> Self {
        let key = if unique_id.starts_with("source.") { "sources" } else { "nodes" };
        section(&mut self.manifest, key)[unique_id]["columns"][column] =
            json!({ "name": column, "description": description, "data_type": null });
        self
    }

    /// Set an arbitrary field on a manifest entry
    pub fn set(mut self, unique_id: &str, field: &str, value: Value) -> Self {
        for key in ["nodes", "sources", "macros"] {
            if let Some(entry) = section(&mut self.manifest, key).get_mut(unique_id) {
                entry[field] = value;
                return self;
            }
        }
        panic!("no manifest entry {unique_id}");
    }

    /// Declare and materialize a source table
    pub fn source(self, source_name: &str, name: &str, loader: &str, columns: &[(&str, &str)]) -> Self {
        let unique_id = format!("source.{PACKAGE}.{source_name}.{name}");
        self.declare_source(source_name, name, loader)
            .materialize(&unique_id, columns)
    }

    /// Declare a source in the manifest only
    pub fn declare_source(mut self, source_name: &str, name: &str, loader: &str) -> Self {
        let unique_id = format!("source.{PACKAGE}.{source_name}.{name}");
        section(&mut self.manifest, "sources").insert(
            unique_id,
            json!({
                "source_name": source_name,
                "name": name,
                "resource_type": "source",
                "package_name": PACKAGE,
                "database": "raw",
                "schema": source_name,
                "identifier": name,
                "loader": loader,
                "description": "",
                "tags": [],
                "columns": {}
            }),
        );
        self
    }

    /// Declare a generic test on `parent` and wire it into the graph
    pub fn test(mut self, unique_id: &str, kind: &str, column: Option<&str>, parent: &str) -> Self {
        let name = unique_id.split('.').nth(2).unwrap_or(kind).to_string();
        section(&mut self.manifest, "nodes").insert(
            unique_id.to_string(),
            json!({
                "name": name,
                "resource_type": "test",
                "package_name": PACKAGE,
                "schema": "analytics_dbt_test__audit",
                "config": { "materialized": "test" },
                "column_name": column,
                "attached_node": parent,
                "refs": [{ "name": parent.rsplit('.').next(), "package": null, "version": null }],
                "depends_on": { "nodes": [parent], "macros": [format!("macro.dbt.test_{kind}")] },
                "raw_code": format!("{{{{ test_{kind}(**_dbt_generic_test_kwargs) }}}}"),
                "compiled_code": "select 1",
                "description": "",
                "test_metadata": { "name": kind, "namespace": null }
            }),
        );
        self.edge(parent, unique_id)
    }

    /// Declare a macro
    pub fn macro_def(mut self, unique_id: &str, name: &str, calls: &[&str]) -> Self {
        section(&mut self.manifest, "macros").insert(
            unique_id.to_string(),
            json!({
                "name": name,
                "resource_type": "macro",
                "package_name": unique_id.split('.').nth(1).unwrap_or(PACKAGE),
                "macro_sql": format!("{{% macro {name}() %}}select 1{{% endmacro %}}"),
                "depends_on": { "macros": calls },
                "description": "",
                "arguments": []
            }),
        );
        self
    }

    /// Add `child` to the children of `parent` (and vice versa)
    pub fn edge(mut self, parent: &str, child: &str) -> Self {
        let children = section(&mut self.manifest, "child_map")
            .entry(parent.to_string())
            .or_insert_with(|| json!([]));
        children.as_array_mut().unwrap().push(json!(child));

        let parents = section(&mut self.manifest, "parent_map")
            .entry(child.to_string())
            .or_insert_with(|| json!([]));
        parents.as_array_mut().unwrap().push(json!(parent));
        self
    }

    /// Register a child map key with no children
    pub fn leaf(mut self, unique_id: &str) -> Self {
        section(&mut self.manifest, "child_map")
            .entry(unique_id.to_string())
            .or_insert_with(|| json!([]));
        self
    }

    pub fn manifest_json(&self) -> String {
        self.manifest.to_string()
    }

    pub fn catalog_json(&self) -> String {
        self.catalog.to_string()
    }

    pub fn manifest(&self) -> Manifest {
        Manifest::from_str(&self.manifest_json()).unwrap()
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::from_str(&self.catalog_json()).unwrap()
    }

    pub fn registry(&self) -> EntityRegistry {
        EntityRegistry::build(&self.manifest(), &self.catalog(), UnmaterializedPolicy::Skip).unwrap()
    }
}
