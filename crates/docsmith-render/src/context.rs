//! Template contexts
//!
//! One context per page kind. Every field is already normalized, so the
//! templates only lay values out.

use docsmith_core::{Column, Columns, MacroRecord, NodeKind, SourceRecord, TableRecord, TestRecord};
use docsmith_dbt::{MacroReferences, ReferenceSummary};
use serde::Serialize;

use crate::normalize;

/// One row of a columns table
#[derive(Debug, Clone, Serialize)]
pub struct ColumnRow {
    pub name: String,
    pub data_type: String,
    pub description: String,
    pub tests: String,
}

impl From<&Column> for ColumnRow {
    fn from(column: &Column) -> Self {
        Self {
            name: column.name.clone(),
            data_type: column.data_type.clone(),
            description: normalize::cell(column.description.as_deref()),
            tests: normalize::name_list(&column.tests),
        }
    }
}

/// Referenced-by cells of a table or source page
#[derive(Debug, Clone, Serialize)]
pub struct ReferencedBy {
    pub models: String,
    pub tests: String,
}

impl From<&ReferenceSummary> for ReferencedBy {
    fn from(summary: &ReferenceSummary) -> Self {
        Self {
            models: normalize::id_list(&summary.models),
            tests: normalize::id_list(&summary.tests),
        }
    }
}

fn column_rows(columns: &Columns) -> Vec<ColumnRow> {
    columns.values().map(ColumnRow::from).collect()
}

/// Column list of the example query
fn select_list(columns: &Columns) -> String {
    if columns.is_empty() {
        return "*".to_string();
    }
    columns.keys().cloned().collect::<Vec<_>>().join(",\n    ")
}

fn relation(database: Option<&str>, schema: &str, name: &str) -> String {
    match database.filter(|d| !d.is_empty()) {
        Some(database) => format!("{database}.{schema}.{name}"),
        None => format!("{schema}.{name}"),
    }
}

/// Model and seed pages
#[derive(Debug, Clone, Serialize)]
pub struct TableContext {
    pub name: String,
    pub materialized: String,
    pub tags: String,
    pub owner: String,
    pub package: String,
    pub language: String,
    pub relation: String,
    pub description: String,
    pub columns: Vec<ColumnRow>,
    pub referenced_by: ReferencedBy,
    pub depends_on: String,
    pub raw_code: String,
    pub compiled_code: String,
    pub select_columns: String,
}

impl TableContext {
    pub fn new(table: &TableRecord, references: &ReferenceSummary) -> Self {
        Self {
            name: table.name.clone(),
            materialized: table.materialized.clone(),
            tags: normalize::tags(&table.tags),
            owner: normalize::cell(table.owner.as_deref()),
            package: table.package_name.clone(),
            language: table.language.clone(),
            relation: relation(table.database.as_deref(), &table.schema, &table.name),
            description: normalize::describe(table.description.as_deref(), &table.id.kind),
            columns: column_rows(&table.columns),
            referenced_by: ReferencedBy::from(references),
            depends_on: normalize::id_list(&table.depends_on),
            raw_code: table.raw_code.trim_end().to_string(),
            compiled_code: normalize::compiled_code(table.compiled_code.as_deref()),
            select_columns: select_list(&table.columns),
        }
    }
}

/// Source pages
#[derive(Debug, Clone, Serialize)]
pub struct SourceContext {
    pub name: String,
    pub tags: String,
    pub owner: String,
    pub package: String,
    pub relation: String,
    pub loader: String,
    pub source_name: String,
    pub description: String,
    pub columns: Vec<ColumnRow>,
    pub referenced_by: ReferencedBy,
    pub select_columns: String,
}

impl SourceContext {
    pub fn new(source: &SourceRecord, references: &ReferenceSummary) -> Self {
        Self {
            name: source.name.clone(),
            tags: normalize::tags(&source.tags),
            owner: normalize::cell(source.owner.as_deref()),
            package: source.package_name.clone(),
            relation: relation(source.database.as_deref(), &source.schema, &source.name),
            loader: normalize::cell(source.loader.as_deref()),
            source_name: source.source_name.clone(),
            description: normalize::describe(source.description.as_deref(), &NodeKind::Source),
            columns: column_rows(&source.columns),
            referenced_by: ReferencedBy::from(references),
            select_columns: select_list(&source.columns),
        }
    }
}

/// Test pages
#[derive(Debug, Clone, Serialize)]
pub struct TestContext {
    pub name: String,
    pub materialized: String,
    pub description: String,
    pub column: String,
    pub test_kind: String,
    pub depends_on: String,
    pub raw_code: String,
    pub compiled_code: String,
}

impl TestContext {
    pub fn new(test: &TestRecord) -> Self {
        Self {
            name: test.name.clone(),
            materialized: test.materialized.clone(),
            description: normalize::describe(test.description.as_deref(), &NodeKind::Test),
            column: normalize::cell(test.column_name.as_deref()),
            test_kind: test.test_kind.clone(),
            depends_on: normalize::id_list(&test.depends_on),
            raw_code: test.raw_code.trim_end().to_string(),
            compiled_code: normalize::compiled_code(test.compiled_code.as_deref()),
        }
    }
}

/// One row of a macro arguments table
#[derive(Debug, Clone, Serialize)]
pub struct ArgumentRow {
    pub name: String,
    pub data_type: String,
    pub description: String,
}

/// Macro pages
#[derive(Debug, Clone, Serialize)]
pub struct MacroContext {
    pub name: String,
    pub resource_type: String,
    pub description: String,
    pub arguments: Vec<ArgumentRow>,
    pub no_arguments: &'static str,
    pub referenced_by_models: String,
    pub referenced_by_macros: String,
    pub depends_on_models: String,
    pub depends_on_macros: String,
    pub macro_sql: String,
}

impl MacroContext {
    pub fn new(record: &MacroRecord, callers: &MacroReferences) -> Self {
        let arguments = record
            .arguments
            .iter()
            .map(|argument| ArgumentRow {
                name: argument.name.clone(),
                data_type: normalize::cell(argument.data_type.as_deref()),
                description: normalize::cell(argument.description.as_deref()),
            })
            .collect();

        Self {
            name: record.name.clone(),
            resource_type: record.resource_type.clone(),
            description: normalize::describe(record.description.as_deref(), &NodeKind::Macro),
            arguments,
            no_arguments: normalize::NO_ARGUMENTS,
            referenced_by_models: normalize::id_list(&callers.models),
            referenced_by_macros: normalize::id_list(&callers.macros),
            depends_on_models: normalize::id_list(&record.depends_on_models),
            depends_on_macros: normalize::id_list(&record.depends_on_macros),
            macro_sql: record.macro_sql.trim_end().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_row_markers() {
        let mut column = Column::new("c1", "integer", 1).with_description(Some(String::new()));
        let row = ColumnRow::from(&column);
        assert_eq!(row.description, normalize::NO_ENTRIES);
        assert_eq!(row.tests, normalize::NO_ENTRIES);

        column.attribute_test("unique");
        column.attribute_test("not_null");
        assert_eq!(ColumnRow::from(&column).tests, "not_null<br>unique");
    }

    #[test]
    fn relation_names() {
        assert_eq!(relation(Some("raw"), "stripe", "payments"), "raw.stripe.payments");
        assert_eq!(relation(None, "stripe", "payments"), "stripe.payments");
        assert_eq!(relation(Some(""), "stripe", "payments"), "stripe.payments");
    }

    #[test]
    fn select_list_falls_back_to_star() {
        let mut columns = Columns::new();
        assert_eq!(select_list(&columns), "*");

        columns.insert("id".into(), Column::new("id", "integer", 1));
        columns.insert("amount".into(), Column::new("amount", "numeric", 2));
        assert_eq!(select_list(&columns), "id,\n    amount");
    }
}
