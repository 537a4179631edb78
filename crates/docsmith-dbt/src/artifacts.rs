//! Loading the manifest and catalog from disk

use docsmith_core::{DocsError, InputDigests};
use std::path::Path;
use tracing::info;

use crate::catalog::Catalog;
use crate::manifest::Manifest;

/// Both artifacts of one dbt run, parsed, with digests of their raw text
#[derive(Debug, Clone)]
pub struct ArtifactPair {
    pub manifest: Manifest,
    pub catalog: Catalog,
    pub digests: InputDigests,
}

impl ArtifactPair {
    /// Read and parse `manifest.json` and `catalog.json`
    pub fn load(manifest_path: &Path, catalog_path: &Path) -> Result<Self, DocsError> {
        let manifest_json = read_artifact(manifest_path)?;
        let catalog_json = read_artifact(catalog_path)?;

        info!(manifest = %manifest_path.display(), catalog = %catalog_path.display(), "Loading artifacts");

        Ok(Self {
            manifest: Manifest::from_str(&manifest_json)?,
            catalog: Catalog::from_str(&catalog_json)?,
            digests: InputDigests::compute(&manifest_json, &catalog_json),
        })
    }
}

fn read_artifact(path: &Path) -> Result<String, DocsError> {
    std::fs::read_to_string(path)
        .map_err(|e| DocsError::IoError(path.display().to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsmith_core::Artifact;
    use std::fs;

    const MANIFEST: &str = r#"{
        "nodes": {}, "sources": {}, "macros": {},
        "parent_map": {}, "child_map": { "model.shop.orders": [] }
    }"#;
    const CATALOG: &str = r#"{ "nodes": {}, "sources": {} }"#;

    #[test]
    fn loads_both_artifacts_with_digests() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join("manifest.json");
        let catalog_path = dir.path().join("catalog.json");
        fs::write(&manifest_path, MANIFEST).unwrap();
        fs::write(&catalog_path, CATALOG).unwrap();

        let pair = ArtifactPair::load(&manifest_path, &catalog_path).unwrap();

        assert!(pair.manifest.child_map.contains_key("model.shop.orders"));
        assert!(pair.catalog.nodes.is_empty());
        assert_eq!(pair.digests, InputDigests::compute(MANIFEST, CATALOG));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join("manifest.json");
        fs::write(&manifest_path, MANIFEST).unwrap();

        let err = ArtifactPair::load(&manifest_path, &dir.path().join("catalog.json")).unwrap_err();

        assert!(matches!(&err, DocsError::IoError(path, _) if path.ends_with("catalog.json")));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn unparseable_catalog_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join("manifest.json");
        let catalog_path = dir.path().join("catalog.json");
        fs::write(&manifest_path, MANIFEST).unwrap();
        fs::write(&catalog_path, r#"{ "nodes": {} }"#).unwrap();

        let err = ArtifactPair::load(&manifest_path, &catalog_path).unwrap_err();

        assert!(matches!(
            err,
            DocsError::MalformedArtifact { artifact: Artifact::Catalog, .. }
        ));
    }
}
