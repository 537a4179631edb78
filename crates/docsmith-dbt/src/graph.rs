//! Build graph (child adjacency)
//!
//! Taken from the manifest's child map, in artifact order. The resolver
//! treats that order as canonical. Every identifier is classified once here,
//! when the graph is built.

use std::collections::{HashSet, VecDeque};
use docsmith_core::UniqueId;
use indexmap::IndexMap;
use crate::manifest::Manifest;

/// One child map entry: a node and the nodes that depend on it
#[derive(Debug, Clone, PartialEq)]
pub struct ChildEntry {
    pub node: UniqueId,
    pub children: Vec<UniqueId>,
}

/// Dependency graph keyed by parent identifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildGraph {
    /// Reverse edges: node -> nodes that depend on it (children)
    entries: IndexMap<String, ChildEntry>,
}

impl BuildGraph {
    /// Build the graph from a manifest's child map
    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self::from_child_map(&manifest.child_map)
    }

    /// Build the graph from an explicit child map
    pub fn from_child_map(child_map: &IndexMap<String, Vec<String>>) -> Self {
        let entries = child_map
            .iter()
            .map(|(node, children)| {
                let entry = ChildEntry {
                    node: UniqueId::parse(node.as_str()),
                    children: children.iter().map(|child| UniqueId::parse(child.as_str())).collect(),
                };
                (node.clone(), entry)
            })
            .collect();

        Self { entries }
    }

    /// Get immediate children (dependents) of a node
    pub fn children(&self, node_id: &str) -> &[UniqueId] {
        self.entries
            .get(node_id)
            .map(|entry| entry.children.as_slice())
            .unwrap_or_default()
    }

    /// Child map entries in artifact order
    pub fn child_entries(&self) -> impl Iterator<Item = &ChildEntry> {
        self.entries.values()
    }

    /// Get all downstream nodes (transitive closure of children), breadth first
    pub fn downstream(&self, node_id: &str) -> Vec<&UniqueId> {
        let mut visited = HashSet::new();
        let mut queue: VecDeque<&UniqueId> = self.children(node_id).iter().collect();
        let mut result = Vec::new();

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.as_str()) {
                continue;
            }

            result.push(current);

            for child in self.children(current.as_str()) {
                if !visited.contains(child.as_str()) {
                    queue.push_back(child);
                }
            }
        }

        result
    }
}
