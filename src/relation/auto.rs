use std::ops::Deref;

use tracing::debug;

use super::*;
use crate::{
    error::{Error, Result},
    node::{NumNodes, node_at},
};

/// A relation of a single id space with itself.
///
/// Both views of an [`AutoRelation`] are indexed by the same ids: `seconds_of(u)` are the
/// targets of pairs leaving `u` and `firsts_of(u)` are the sources of pairs entering `u`.
/// Ids are only ever added and removed from both spaces at once.
///
/// Read access goes through [`Deref`] to the underlying [`IndexedRelation`].
#[derive(Clone)]
pub struct AutoRelation<V: Value, M: Multiplicity = Single>(IndexedRelation<V, M>);

impl<V: Value, M: Multiplicity> Default for AutoRelation<V, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Value, M: Multiplicity> Deref for AutoRelation<V, M> {
    type Target = IndexedRelation<V, M>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<V: Value, M: Multiplicity> AutoRelation<V, M> {
    /// Creates an empty relation
    pub fn new() -> Self {
        Self(IndexedRelation::new())
    }

    /// Creates a relation on ids `0..n` without any pairs
    pub fn with_size(n: NumNodes) -> Self {
        Self(IndexedRelation::with_sizes(n, n))
    }

    /// Bulk-loads a relation from an adjacency list: `rows[u]` lists `(v, value)` for
    /// every pair `(u, v)`. The id space is `0..rows.len()`.
    pub fn from_adjacency(rows: Vec<Vec<(Node, V)>>) -> Result<Self> {
        let n = node_at(rows.len());
        IndexedRelation::from_rows(n, rows).map(Self)
    }

    /// Returns the number of ids
    pub fn len(&self) -> NumNodes {
        self.num_first()
    }

    /// Returns *true* if there are no ids
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a new id and returns it
    pub fn add_item(&mut self) -> Node {
        let first = self.0.add_first_item();
        let second = self.0.add_second_item();
        debug_assert_eq!(first, second);
        first
    }

    /// See [`IndexedRelation::add_relation`]
    pub fn add_relation(&mut self, first: Node, second: Node, value: V) -> Result<()> {
        self.0.add_relation(first, second, value)
    }

    /// See [`IndexedRelation::update_pair`]
    pub fn update_pair(&mut self, first: Node, second: Node, value: V) -> Result<()> {
        self.0.update_pair(first, second, value)
    }

    /// See [`IndexedRelation::update_value`]
    pub fn update_value(&mut self, first: Node, second: Node, index: usize, value: V) -> Result<()> {
        self.0.update_value(first, second, index, value)
    }

    /// See [`IndexedRelation::remove_pair`]
    pub fn remove_pair(&mut self, first: Node, second: Node) -> Result<M::Slot<V>> {
        self.0.remove_pair(first, second)
    }

    /// See [`IndexedRelation::remove_value`]
    pub fn remove_value(&mut self, first: Node, second: Node, index: usize) -> Result<V> {
        self.0.remove_value(first, second, index)
    }

    /// Removes `idx` and every pair it takes part in, then shifts all larger ids down by one.
    /// Returns the number of removed pairs; a pair `(idx, idx)` is counted once.
    pub fn remove(&mut self, idx: Node) -> Result<usize> {
        if idx >= self.len() {
            return Err(Error::OutOfRange {
                id: idx,
                len: self.len(),
            });
        }

        let leaving = self.0.remove_first(idx)?;
        let entering = self.0.remove_second(idx)?;
        debug!(idx, leaving, entering, "removed id from auto relation");

        Ok(leaving + entering)
    }

    /// Ids that take part in no pair at all
    pub fn isolated(&self) -> impl Iterator<Item = Node> + '_ {
        (0..self.len()).filter(|&u| !self.has_seconds(u) && !self.has_firsts(u))
    }

    /// Walks both views of `id` at once, restricted by `orientation`.
    /// Out-of-range ids yield nothing.
    pub fn partners(&self, id: Node, orientation: EdgeOrientation) -> Partners<'_, M::Slot<V>> {
        Partners::new(self.row_of_first(id), self.row_of_second(id), orientation)
    }
}
