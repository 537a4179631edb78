//! Error taxonomy shared by every stage of a documentation run
//!
//! Only [`DocsError::NotFound`] is recovered locally (the object is left out
//! of the documentation set). Every other variant aborts the run before any
//! page is written.

use std::fmt;

/// The artifact an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Manifest,
    Catalog,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manifest => write!(f, "manifest"),
            Self::Catalog => write!(f, "catalog"),
        }
    }
}

/// Errors raised while loading, registering or resolving build objects
#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error("Malformed {artifact} ({location}): {message}")]
    MalformedArtifact {
        artifact: Artifact,
        location: String,
        message: String,
    },

    #[error("{0} has no counterpart in the catalog")]
    NotFound(String),

    #[error("Build graph names {unique_id}, which is missing from the {registry} registry")]
    GraphInconsistency {
        unique_id: String,
        registry: &'static str,
    },

    #[error("Invalid argument: `{field}` of {unique_id} must be a list")]
    InvalidArgument {
        unique_id: String,
        field: &'static str,
    },

    #[error("Failed to read {0}: {1}")]
    IoError(String, String),
}

impl DocsError {
    /// Build a MalformedArtifact error
    pub fn malformed(artifact: Artifact, location: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::MalformedArtifact {
            artifact,
            location: location.into(),
            message: message.to_string(),
        }
    }

    /// Whether the run may continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_not_found_is_recoverable() {
        assert!(DocsError::NotFound("model.shop.orders".into()).is_recoverable());
        assert!(!DocsError::GraphInconsistency {
            unique_id: "test.shop.x.1".into(),
            registry: "test",
        }
        .is_recoverable());
        assert!(!DocsError::malformed(Artifact::Catalog, "nodes", "missing field `columns`").is_recoverable());
    }

    #[test]
    fn messages_name_the_artifact() {
        let err = DocsError::malformed(Artifact::Manifest, "root", "missing field `child_map`");
        assert_eq!(
            err.to_string(),
            "Malformed manifest (root): missing field `child_map`"
        );
    }
}
