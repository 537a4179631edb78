//! Reference resolution
//!
//! Walks the child map once and works out, for every documented table, seed
//! and source, which models and tests reference it and which test kinds
//! cover which of its columns. Resolution does not touch the registry: the
//! attributions are collected into a [`Resolution`] and written back in a
//! separate [`Resolution::apply`] step.

use docsmith_core::{DocsError, NodeKind, TestRecord, UniqueId};
use indexmap::IndexMap;
use tracing::debug;

use crate::registry::EntityRegistry;

/// Objects that reference a table, seed or source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSummary {
    /// Referencing models and seeds, in discovery order
    pub models: Vec<String>,

    /// Referencing tests (hash suffix removed), in discovery order
    pub tests: Vec<String>,
}

impl ReferenceSummary {
    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.tests.is_empty()
    }
}

static NO_REFERENCES: ReferenceSummary = ReferenceSummary {
    models: Vec::new(),
    tests: Vec::new(),
};

/// Objects that call a macro
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroReferences {
    pub models: Vec<String>,
    pub macros: Vec<String>,
}

static NO_MACRO_REFERENCES: MacroReferences = MacroReferences {
    models: Vec::new(),
    macros: Vec::new(),
};

/// A test kind covering one column of one relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestAttribution {
    /// Table or source the column belongs to
    pub parent: String,

    /// Column name
    pub column: String,

    /// Test kind recorded on the column
    pub test_kind: String,

    /// Test the attribution comes from
    pub test_id: String,
}

/// Output of a resolution pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    references: IndexMap<String, ReferenceSummary>,
    macro_references: IndexMap<String, MacroReferences>,
    attributions: Vec<TestAttribution>,
}

impl Resolution {
    /// Reference summary of a table, seed or source (empty when nothing references it)
    pub fn references(&self, unique_id: &str) -> &ReferenceSummary {
        self.references.get(unique_id).unwrap_or(&NO_REFERENCES)
    }

    /// Every reference summary, keyed by parent identifier
    pub fn all_references(&self) -> &IndexMap<String, ReferenceSummary> {
        &self.references
    }

    /// Models and macros that call a macro
    pub fn macro_references(&self, unique_id: &str) -> &MacroReferences {
        self.macro_references.get(unique_id).unwrap_or(&NO_MACRO_REFERENCES)
    }

    pub fn attributions(&self) -> &[TestAttribution] {
        &self.attributions
    }

    /// Write the collected attributions into the registry's column test sets
    ///
    /// Returns the number of test kinds that were not already present.
    /// Applying the same resolution twice changes nothing the second time.
    pub fn apply(&self, registry: &mut EntityRegistry) -> Result<usize, DocsError> {
        let mut added = 0;

        for attribution in &self.attributions {
            if registry.test(&attribution.test_id).is_none() {
                return Err(DocsError::GraphInconsistency {
                    unique_id: attribution.test_id.clone(),
                    registry: "test",
                });
            }

            let column = registry
                .columns_mut(&attribution.parent)
                .and_then(|columns| columns.get_mut(&attribution.column))
                .ok_or_else(|| DocsError::GraphInconsistency {
                    unique_id: format!("{}.{}", attribution.parent, attribution.column),
                    registry: "column",
                })?;

            if column.attribute_test(attribution.test_kind.as_str()) {
                added += 1;
            }
        }

        debug!(added, total = self.attributions.len(), "Applied column test attributions");
        Ok(added)
    }
}

/// Resolves references over a built registry
pub struct ReferenceResolver<'a> {
    registry: &'a EntityRegistry,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(registry: &'a EntityRegistry) -> Self {
        Self { registry }
    }

    /// Run the resolution pass
    ///
    /// Fails with `GraphInconsistency` when the child map names a test the
    /// registry does not know.
    pub fn resolve(&self) -> Result<Resolution, DocsError> {
        let registry = self.registry;
        let mut resolution = Resolution::default();

        for unique_id in registry.tables().keys().chain(registry.sources().keys()) {
            resolution
                .references
                .insert(unique_id.clone(), ReferenceSummary::default());
        }

        for entry in registry.graph().child_entries() {
            let parent = &entry.node;
            if !parent.kind.has_references() {
                continue;
            }

            // Test children must be registered even when the parent itself was skipped
            for child in entry.children.iter().filter(|child| child.kind == NodeKind::Test) {
                self.registered_test(child)?;
            }

            if !registry.has_relation(parent.as_str()) {
                debug!(unique_id = %parent, "Parent is not documented; skipping its references");
                continue;
            }

            let mut summary = ReferenceSummary::default();

            for child in &entry.children {
                match child.kind {
                    NodeKind::Model | NodeKind::Seed => {
                        if registry.table(child.as_str()).is_some() {
                            summary.models.push(child.raw.clone());
                        } else {
                            debug!(parent = %parent, child = %child, "Dropping reference to undocumented table");
                        }
                    }
                    NodeKind::Test => {
                        let test = self.registered_test(child)?;

                        if let Some(attribution) = self.attribution(parent.as_str(), test) {
                            resolution.attributions.push(attribution);
                        }

                        summary.tests.push(test.id.without_hash_suffix().to_string());
                    }
                    _ => {}
                }
            }

            resolution.references.insert(parent.raw.clone(), summary);
        }

        self.resolve_macros(&mut resolution);

        Ok(resolution)
    }

    fn registered_test(&self, child: &UniqueId) -> Result<&'a TestRecord, DocsError> {
        self.registry
            .test(child.as_str())
            .ok_or_else(|| DocsError::GraphInconsistency {
                unique_id: child.raw.clone(),
                registry: "test",
            })
    }

    /// Column attribution for a test under `parent`, if the test targets one of its columns
    fn attribution(&self, parent: &str, test: &TestRecord) -> Option<TestAttribution> {
        let column = test.column_name.as_ref()?;

        // Multi-parent tests (relationships) are attributed to the node they are declared on
        if let Some(attached) = &test.attached_node {
            if attached != parent {
                return None;
            }
        }

        let exists = self
            .registry
            .columns(parent)
            .is_some_and(|columns| columns.contains_key(column));

        if !exists {
            debug!(parent = %parent, column = %column, test = %test.id, "Test targets a column the catalog does not have");
            return None;
        }

        Some(TestAttribution {
            parent: parent.to_string(),
            column: column.clone(),
            test_kind: test.test_kind.clone(),
            test_id: test.id.raw.clone(),
        })
    }

    /// Reverse the declared macro dependencies of models and macros
    fn resolve_macros(&self, resolution: &mut Resolution) {
        let registry = self.registry;

        for unique_id in registry.macros().keys() {
            resolution
                .macro_references
                .insert(unique_id.clone(), MacroReferences::default());
        }

        for (table_id, table) in registry.tables() {
            for called in &table.depends_on_macros {
                if let Some(refs) = resolution.macro_references.get_mut(called) {
                    refs.models.push(table_id.clone());
                }
            }
        }

        for (macro_id, record) in registry.macros() {
            for called in &record.depends_on_macros {
                if let Some(refs) = resolution.macro_references.get_mut(called) {
                    refs.macros.push(macro_id.clone());
                }
            }
        }
    }
}
