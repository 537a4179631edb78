//! docsmith core
//!
//! Domain model shared by every crate: kind-tagged identifiers, the typed
//! records documentation pages are rendered from, the error taxonomy, the
//! configuration file and the run report.

pub mod node;
pub mod record;
pub mod error;
pub mod config;
pub mod report;

pub use node::{NodeKind, UniqueId, id_to_path};
pub use record::{Column, Columns, TableRecord, SourceRecord, TestRecord, MacroRecord, MacroArgument};
pub use error::{DocsError, Artifact};
pub use config::{Config, ConfigError, UnmaterializedPolicy};
pub use report::{RunReport, ReportVersion, ReportSummary, InputDigests};
