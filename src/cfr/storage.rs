//! Storage for information set nodes.
//!
//! The recursive solver discovers information sets as it walks the game
//! tree, so nodes are created lazily on first reference and then live for
//! as long as the store does.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::cfr::error::SolverError;
use crate::cfr::node::InfoSetNode;

/// Mapping from information set key to its node.
///
/// Each solver owns its own store, so separate training runs never share
/// statistics. The store only grows: nodes are never removed.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    nodes: FxHashMap<String, InfoSetNode>,
}

impl NodeStore {
    /// Create new empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Get the node for an info set, creating it on first reference.
    ///
    /// # Arguments
    /// * `info_key` - The information set key
    /// * `num_actions` - Number of actions available at this info set
    ///
    /// # Errors
    /// - [`SolverError::NoActions`] when creating a node with zero actions
    /// - [`SolverError::ActionCountMismatch`] when an existing node was
    ///   created with a different number of actions
    pub fn get_or_create(
        &mut self,
        info_key: &str,
        num_actions: usize,
    ) -> Result<&mut InfoSetNode, SolverError> {
        let node = match self.nodes.entry(info_key.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(InfoSetNode::new(info_key, num_actions)?),
        };

        if node.num_actions() != num_actions {
            return Err(SolverError::ActionCountMismatch {
                key: info_key.to_string(),
                expected: node.num_actions(),
                actual: num_actions,
            });
        }

        Ok(node)
    }

    /// Look up an existing node.
    pub fn get(&self, info_key: &str) -> Option<&InfoSetNode> {
        self.nodes.get(info_key)
    }

    /// Get the number of information sets stored.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no information set has been discovered yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check if an info set exists in storage.
    pub fn contains(&self, info_key: &str) -> bool {
        self.nodes.contains_key(info_key)
    }

    /// All info set keys in ascending order.
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Iterate over all nodes in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InfoSetNode)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_creation_returns_same_node() {
        let mut store = NodeStore::new();
        assert!(store.is_empty());

        store
            .get_or_create("2b", 2)
            .unwrap()
            .accumulate_regret(&[1.0, 0.0], 0.0, 1.0);
        assert_eq!(store.len(), 1);

        let node = store.get_or_create("2b", 2).unwrap();
        assert_eq!(node.regret_sum(), &[1.0, 0.0]);
        assert_eq!(store.len(), 1);
        assert!(store.contains("2b"));
        assert!(store.get("3b").is_none());
    }

    #[test]
    fn test_inconsistent_action_count_rejected() {
        let mut store = NodeStore::new();
        store.get_or_create("1", 2).unwrap();

        let err = store.get_or_create("1", 3).unwrap_err();
        assert_eq!(
            err,
            SolverError::ActionCountMismatch {
                key: "1".to_string(),
                expected: 2,
                actual: 3,
            }
        );

        let err = store.get_or_create("2", 0).unwrap_err();
        assert!(matches!(err, SolverError::NoActions { .. }));
        assert!(!store.contains("2"));
    }

    #[test]
    fn test_sorted_keys() {
        let mut store = NodeStore::with_capacity(4);
        for key in ["3pb", "1", "2b", "1pb"] {
            store.get_or_create(key, 2).unwrap();
        }
        assert_eq!(store.sorted_keys(), vec!["1", "1pb", "2b", "3pb"]);
        assert_eq!(store.iter().count(), 4);
    }
}
