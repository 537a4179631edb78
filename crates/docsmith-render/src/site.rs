//! Site assembly
//!
//! Renders a page for every documented object into memory. Nothing touches
//! the filesystem here; see [`crate::writer`].

use docsmith_core::{id_to_path, NodeKind, ReportSummary};
use docsmith_dbt::{EntityRegistry, Resolution};
use indexmap::IndexMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::renderer::{DocumentRenderer, RenderError};

/// Directory (under the output root) that holds test pages
pub const TESTS_DIR: &str = "tests";

/// A rendered page and where it goes, relative to the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub unique_id: String,
    pub kind: NodeKind,
    pub path: PathBuf,
    pub contents: String,
}

/// Page location for objects documented under their package
pub fn package_path(package_name: &str, unique_id: &str) -> PathBuf {
    PathBuf::from(package_name).join(format!("{}.md", id_to_path(unique_id)))
}

/// Page location for tests (identifier without its hash suffix)
pub fn test_path(stripped_id: &str) -> PathBuf {
    PathBuf::from(TESTS_DIR).join(format!("{}.md", id_to_path(stripped_id)))
}

/// Every rendered page of one run
#[derive(Debug, Default)]
pub struct Site {
    documents: IndexMap<PathBuf, Document>,
    summary: ReportSummary,
}

impl Site {
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn get(&self, path: impl Into<PathBuf>) -> Option<&Document> {
        self.documents.get(&path.into())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Page counts by kind
    pub fn summary(&self) -> &ReportSummary {
        &self.summary
    }

    fn push(&mut self, document: Document) {
        if let Some(existing) = self.documents.get(&document.path) {
            warn!(
                path = %document.path.display(),
                kept = %existing.unique_id,
                dropped = %document.unique_id,
                "Two objects map to the same page; keeping the first"
            );
            return;
        }

        self.summary.record_page(&document.kind);
        self.documents.insert(document.path.clone(), document);
    }
}

/// Builds the full site from a resolved registry
pub struct SiteBuilder<'a> {
    registry: &'a EntityRegistry,
    resolution: &'a Resolution,
    renderer: DocumentRenderer,
}

impl<'a> SiteBuilder<'a> {
    pub fn new(registry: &'a EntityRegistry, resolution: &'a Resolution) -> Result<Self, RenderError> {
        Ok(Self {
            registry,
            resolution,
            renderer: DocumentRenderer::new()?,
        })
    }

    /// Render every page; fails on the first template error
    pub fn build(&self) -> Result<Site, RenderError> {
        let mut site = Site::default();

        for (unique_id, table) in self.registry.tables() {
            let contents = self
                .renderer
                .render_table(table, self.resolution.references(unique_id))?;
            site.push(Document {
                unique_id: unique_id.clone(),
                kind: table.id.kind.clone(),
                path: package_path(&table.package_name, unique_id),
                contents,
            });
        }

        for (unique_id, source) in self.registry.sources() {
            let contents = self
                .renderer
                .render_source(source, self.resolution.references(unique_id))?;
            site.push(Document {
                unique_id: unique_id.clone(),
                kind: NodeKind::Source,
                path: package_path(&source.package_name, unique_id),
                contents,
            });
        }

        for (unique_id, test) in self.registry.tests() {
            let contents = self.renderer.render_test(test)?;
            site.push(Document {
                unique_id: unique_id.clone(),
                kind: NodeKind::Test,
                path: test_path(test.id.without_hash_suffix()),
                contents,
            });
        }

        for (unique_id, record) in self.registry.macros() {
            let contents = self
                .renderer
                .render_macro(record, self.resolution.macro_references(unique_id))?;
            site.push(Document {
                unique_id: unique_id.clone(),
                kind: NodeKind::Macro,
                path: package_path(&record.package_name, unique_id),
                contents,
            });
        }

        debug!(pages = site.len(), "Rendered all pages in memory");
        info!(
            models = site.summary.models,
            seeds = site.summary.seeds,
            sources = site.summary.sources,
            tests = site.summary.tests,
            macros = site.summary.macros,
            "Site rendered"
        );

        Ok(site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_policy() {
        assert_eq!(
            package_path("shop", "model.shop.orders"),
            PathBuf::from("shop/model/shop/orders.md")
        );
        assert_eq!(
            package_path("shop", "source.shop.stripe.payments"),
            PathBuf::from("shop/source/shop/stripe/payments.md")
        );
        assert_eq!(
            test_path("test.shop.unique_orders_id"),
            PathBuf::from("tests/test/shop/unique_orders_id.md")
        );
    }

    #[test]
    fn duplicate_paths_keep_first() {
        let mut site = Site::default();
        let document = |unique_id: &str, contents: &str| Document {
            unique_id: unique_id.to_string(),
            kind: NodeKind::Test,
            path: test_path("test.shop.unique_orders_id"),
            contents: contents.to_string(),
        };

        site.push(document("test.shop.unique_orders_id.aaa", "first"));
        site.push(document("test.shop.unique_orders_id.bbb", "second"));

        assert_eq!(site.len(), 1);
        assert_eq!(site.summary().tests, 1);
        assert_eq!(site.get("tests/test/shop/unique_orders_id.md").unwrap().contents, "first");
    }
}
