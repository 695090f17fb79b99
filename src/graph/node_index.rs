use std::{fmt::Debug, hash::Hash};

use fxhash::FxHashMap;

use crate::node::{Node, NumNodes, node_at};

/// Identifiers that can name the nodes of a [`Graph`](super::Graph)
pub trait NodeKey: Eq + Hash + Clone + Debug {}

impl<K: Eq + Hash + Clone + Debug> NodeKey for K {}

/// Bidirectional mapping between caller-chosen node identifiers and the dense positions `0..n`
/// used by edge collections.
///
/// Removing a position shifts all larger positions down by one, the same way
/// [`Edges::remove_node`](crate::repr::Edges::remove_node) renumbers its nodes.
#[derive(Debug, Clone)]
pub struct NodeIndex<K: NodeKey> {
    keys: Vec<K>,
    positions: FxHashMap<K, Node>,
}

impl<K: NodeKey> Default for NodeIndex<K> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            positions: FxHashMap::default(),
        }
    }
}

impl<K: NodeKey> NodeIndex<K> {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored identifiers
    pub fn len(&self) -> NumNodes {
        node_at(self.keys.len())
    }

    /// Returns *true* if no identifier is stored
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Assigns the next free position to `key`.
    /// Returns `None` (and changes nothing) if `key` is already present.
    pub fn insert(&mut self, key: K) -> Option<Node> {
        if self.positions.contains_key(&key) {
            return None;
        }

        let pos = node_at(self.keys.len());
        self.positions.insert(key.clone(), pos);
        self.keys.push(key);
        Some(pos)
    }

    /// Returns the position of `key`
    pub fn position_of(&self, key: &K) -> Option<Node> {
        self.positions.get(key).copied()
    }

    /// Returns the identifier stored at `pos`
    pub fn key_at(&self, pos: Node) -> Option<&K> {
        self.keys.get(pos as usize)
    }

    /// Returns *true* if `key` is stored
    pub fn contains(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    /// Removes the identifier at `pos` and shifts every later identifier one position down
    pub fn remove(&mut self, pos: Node) -> Option<K> {
        if pos as usize >= self.keys.len() {
            return None;
        }

        let key = self.keys.remove(pos as usize);
        self.positions.remove(&key);
        for (shifted, later) in self.keys.iter().enumerate().skip(pos as usize) {
            if let Some(entry) = self.positions.get_mut(later) {
                *entry = node_at(shifted);
            }
        }
        Some(key)
    }

    /// Identifiers in position order
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.keys.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn insert_and_lookup() {
        let mut index = NodeIndex::new();
        assert_eq!(index.insert("a"), Some(0));
        assert_eq!(index.insert("b"), Some(1));
        assert_eq!(index.insert("a"), None);

        assert_eq!(index.len(), 2);
        assert_eq!(index.position_of(&"b"), Some(1));
        assert_eq!(index.key_at(0), Some(&"a"));
        assert_eq!(index.key_at(2), None);
        assert!(!index.contains(&"c"));
    }

    #[test]
    fn removal_shifts_positions() {
        let mut index = NodeIndex::new();
        for key in ["a", "b", "c", "d"] {
            index.insert(key);
        }

        assert_eq!(index.remove(1), Some("b"));
        assert_eq!(index.keys().copied().collect_vec(), vec!["a", "c", "d"]);
        assert_eq!(index.position_of(&"a"), Some(0));
        assert_eq!(index.position_of(&"c"), Some(1));
        assert_eq!(index.position_of(&"d"), Some(2));
        assert_eq!(index.position_of(&"b"), None);
        assert_eq!(index.remove(3), None);
    }
}
