//! dbt artifact parsing and reference resolution
//!
//! This crate handles:
//! - Loading and parsing manifest.json and catalog.json
//! - Building the typed entity registry from both artifacts
//! - Resolving "referenced by" lists and column test coverage

pub mod artifacts;
pub mod manifest;
pub mod catalog;
pub mod graph;
pub mod registry;
pub mod resolver;

pub use artifacts::ArtifactPair;
pub use manifest::{Manifest, ManifestMetadata, ManifestNode, ManifestSource, ManifestTest, ManifestMacro};
pub use catalog::{Catalog, CatalogTable, CatalogColumn};
pub use graph::{BuildGraph, ChildEntry};
pub use registry::{EntityRegistry, BUILTIN_MACRO_NAMESPACE};
pub use resolver::{ReferenceResolver, ReferenceSummary, MacroReferences, Resolution, TestAttribution};
