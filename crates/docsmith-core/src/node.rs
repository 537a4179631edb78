//! Build object identifiers and their kind tags
//!
//! dbt encodes the kind of every build object in the first dot-delimited
//! segment of its unique_id (`model.shop.orders`, `test.shop.not_null_orders_id.1a2b3c`).
//! The prefix is parsed exactly once, here; everything downstream branches on
//! [`NodeKind`] instead of re-inspecting identifier strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a build object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// SQL (or Python) model
    Model,

    /// CSV seed loaded by dbt
    Seed,

    /// Data test (generic or singular)
    Test,

    /// Jinja macro
    Macro,

    /// Externally loaded source table
    Source,

    /// Anything else (snapshot, analysis, operation, exposure, ...)
    Other(String),
}

impl NodeKind {
    /// Classify an identifier by its leading segment
    pub fn from_unique_id(unique_id: &str) -> Self {
        let prefix = unique_id.split('.').next().unwrap_or_default();
        match prefix {
            "model" => Self::Model,
            "seed" => Self::Seed,
            "test" => Self::Test,
            "macro" => Self::Macro,
            "source" => Self::Source,
            other => Self::Other(other.to_string()),
        }
    }

    /// Tables are the objects with realized columns produced by a transformation
    pub fn is_table(&self) -> bool {
        matches!(self, Self::Model | Self::Seed)
    }

    /// Whether downstream objects of this kind are documented as "referenced by"
    pub fn has_references(&self) -> bool {
        matches!(self, Self::Model | Self::Seed | Self::Source)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Model => "model",
            Self::Seed => "seed",
            Self::Test => "test",
            Self::Macro => "macro",
            Self::Source => "source",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dbt unique_id tagged with its kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniqueId {
    /// Raw identifier as it appears in the artifacts
    pub raw: String,

    /// Kind parsed from the identifier prefix
    pub kind: NodeKind,
}

impl UniqueId {
    /// Parse and tag an identifier
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let kind = NodeKind::from_unique_id(&raw);
        Self { raw, kind }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Identifier with the trailing uniqueness hash removed
    ///
    /// Generic tests are named `test.<package>.<name>.<hash>`; the page of a
    /// test is keyed by the identifier without the hash. Identifiers with
    /// fewer than four segments (singular tests, everything else) carry no
    /// hash and are returned unchanged.
    pub fn without_hash_suffix(&self) -> &str {
        if self.raw.split('.').count() < 4 {
            return &self.raw;
        }

        match self.raw.rfind('.') {
            Some(pos) => &self.raw[..pos],
            None => &self.raw,
        }
    }

    /// Hierarchical path for the identifier (`model.shop.orders` -> `model/shop/orders`)
    pub fn to_path(&self) -> String {
        id_to_path(&self.raw)
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Replace dot separators with path separators
pub fn id_to_path(unique_id: &str) -> String {
    unique_id.replace('.', "/")
}
