//! Markdown page rendering

use docsmith_core::{MacroRecord, NodeKind, SourceRecord, TableRecord, TestRecord};
use docsmith_dbt::{MacroReferences, ReferenceSummary};
use minijinja::Environment;
use serde::Serialize;
use std::path::PathBuf;

use crate::context::{MacroContext, SourceContext, TableContext, TestContext};
use crate::templates;

/// Error while rendering or writing pages
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Template error in {template}: {source}")]
    Template {
        template: &'static str,
        #[source]
        source: minijinja::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders one record at a time into the text of its page
pub struct DocumentRenderer {
    env: Environment<'static>,
}

impl DocumentRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);

        for (name, source) in templates::all() {
            env.add_template(name, source)
                .map_err(|source| RenderError::Template { template: name, source })?;
        }

        Ok(Self { env })
    }

    fn render<S: Serialize>(&self, template: &'static str, context: S) -> Result<String, RenderError> {
        self.env
            .get_template(template)
            .and_then(|t| t.render(context))
            .map_err(|source| RenderError::Template { template, source })
    }

    /// Render a model or seed page
    pub fn render_table(&self, table: &TableRecord, references: &ReferenceSummary) -> Result<String, RenderError> {
        let template = match table.id.kind {
            NodeKind::Seed => templates::SEED,
            _ => templates::MODEL,
        };
        self.render(template, TableContext::new(table, references))
    }

    pub fn render_source(&self, source: &SourceRecord, references: &ReferenceSummary) -> Result<String, RenderError> {
        self.render(templates::SOURCE, SourceContext::new(source, references))
    }

    pub fn render_test(&self, test: &TestRecord) -> Result<String, RenderError> {
        self.render(templates::TEST, TestContext::new(test))
    }

    pub fn render_macro(&self, record: &MacroRecord, callers: &MacroReferences) -> Result<String, RenderError> {
        self.render(templates::MACRO, MacroContext::new(record, callers))
    }
}
