//! Run report (report.json)
//!
//! A run is a pure function of its two input artifacts. The report records
//! their digests so two runs can be compared without diffing the pages.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use crate::node::NodeKind;

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// SHA-256 digests of the input artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDigests {
    pub manifest_sha256: String,
    pub catalog_sha256: String,
}

impl InputDigests {
    /// Hash both artifacts' raw contents
    pub fn compute(manifest_json: &str, catalog_json: &str) -> Self {
        Self {
            manifest_sha256: sha256_hex(manifest_json.as_bytes()),
            catalog_sha256: sha256_hex(catalog_json.as_bytes()),
        }
    }
}

/// Hex-encoded SHA-256 of a byte slice
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Pages written per object kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub models: usize,
    pub seeds: usize,
    pub sources: usize,
    pub tests: usize,
    pub macros: usize,

    /// Declared objects left out because the catalog has no entry for them
    pub skipped: usize,
}

impl ReportSummary {
    /// Total number of pages
    pub fn pages(&self) -> usize {
        self.models + self.seeds + self.sources + self.tests + self.macros
    }

    /// Count one page of the given kind
    pub fn record_page(&mut self, kind: &NodeKind) {
        match kind {
            NodeKind::Model => self.models += 1,
            NodeKind::Seed => self.seeds += 1,
            NodeKind::Source => self.sources += 1,
            NodeKind::Test => self.tests += 1,
            NodeKind::Macro => self.macros += 1,
            NodeKind::Other(_) => {}
        }
    }
}

/// Result of one documentation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Digests of the inputs
    pub inputs: InputDigests,

    /// Summary statistics
    pub summary: ReportSummary,

    /// Identifiers of declared objects that were not documented
    pub skipped: Vec<String>,
}

impl RunReport {
    /// Create a new empty report
    pub fn new(inputs: InputDigests) -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            inputs,
            summary: ReportSummary::default(),
            skipped: Vec::new(),
        }
    }

    /// Record an object left out of the documentation set
    pub fn add_skipped(&mut self, unique_id: impl Into<String>) {
        self.summary.skipped += 1;
        self.skipped.push(unique_id.into());
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report() {
        let report = RunReport::new(InputDigests::default());
        assert_eq!(report.version, ReportVersion::CURRENT);
        assert_eq!(report.summary.pages(), 0);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn count_pages_and_skips() {
        let mut report = RunReport::new(InputDigests::default());
        report.summary.record_page(&NodeKind::Model);
        report.summary.record_page(&NodeKind::Test);
        report.summary.record_page(&NodeKind::Other("snapshot".into()));
        report.add_skipped("model.shop.never_built");

        assert_eq!(report.summary.pages(), 2);
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.skipped, vec!["model.shop.never_built"]);
    }

    #[test]
    fn digests_are_stable() {
        let a = InputDigests::compute("{}", "{}");
        let b = InputDigests::compute("{}", "{}");
        assert_eq!(a, b);
        assert_eq!(
            a.manifest_sha256,
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn report_serialization() {
        let report = RunReport::new(InputDigests::compute("a", "b"));
        let json = report.to_json().unwrap();
        assert!(json.contains("\"manifest_sha256\""));
        assert!(json.contains("\"skipped\""));
    }
}
