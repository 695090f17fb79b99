use rayon::prelude::*;
use tracing::{debug, trace};

use super::*;
use crate::{
    error::{Error, Result},
    node::{NumNodes, node_at},
};

/// A relation between a first and a second dense id space.
///
/// Every pair is stored twice (once per view), together with its slot of values.
/// Values of an existing pair are only changed through one private helper that writes both
/// views; insertion and removal also touch both views in the same call.
///
/// # Type parameters
/// - `V`: value attached to each pair (a weight, a type, or `()`).
/// - `M`: [`Multiplicity`] policy, either [`Single`] or [`Multi`].
#[derive(Clone)]
pub struct IndexedRelation<V: Value, M: Multiplicity = Single> {
    by_first: Vec<Row<V, M>>,
    by_second: Vec<Row<V, M>>,
    num_pairs: usize,
}

impl<V: Value, M: Multiplicity> Default for IndexedRelation<V, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Value, M: Multiplicity> IndexedRelation<V, M> {
    /// Creates an empty relation between two empty id spaces
    pub fn new() -> Self {
        Self {
            by_first: Vec::new(),
            by_second: Vec::new(),
            num_pairs: 0,
        }
    }

    /// Creates a relation without pairs between `0..num_first` and `0..num_second`
    pub fn with_sizes(num_first: NumNodes, num_second: NumNodes) -> Self {
        Self {
            by_first: (0..num_first).map(|_| Vec::new()).collect(),
            by_second: (0..num_second).map(|_| Vec::new()).collect(),
            num_pairs: 0,
        }
    }

    /// Bulk-loads a relation from one list of `(second, value)` per first id.
    ///
    /// Rows need not be sorted. Every second id must be below `num_second`.
    /// Repeated pairs are merged according to `M`: a [`Single`] relation rejects them
    /// with [`Error::PairExists`], a [`Multi`] relation keeps all values in input order.
    pub fn from_rows(num_second: NumNodes, mut rows: Vec<Vec<(Node, V)>>) -> Result<Self> {
        if let Some(&id) = rows
            .iter()
            .flat_map(|row| row.iter().map(|(second, _)| second))
            .find(|&&second| second >= num_second)
        {
            return Err(Error::OutOfRange {
                id,
                len: num_second,
            });
        }

        // stable sort keeps the input order of parallel values
        rows.par_iter_mut()
            .for_each(|row| row.sort_by_key(|(second, _)| *second));

        let by_first = rows
            .into_par_iter()
            .enumerate()
            .map(|(first, row)| collapse_row::<V, M>(node_at(first), row))
            .collect::<Result<Vec<_>>>()?;

        let mut by_second: Vec<Row<V, M>> = (0..num_second).map(|_| Vec::new()).collect();
        // iterating firsts in ascending order keeps every mirrored row sorted
        for (first, row) in by_first.iter().enumerate() {
            for (second, slot) in row {
                by_second[*second as usize].push((node_at(first), slot.clone()));
            }
        }

        let num_pairs = by_first.iter().map(Vec::len).sum();
        debug!(
            num_first = by_first.len(),
            num_second, num_pairs, "bulk-loaded relation"
        );

        Ok(Self {
            by_first,
            by_second,
            num_pairs,
        })
    }

    /// Returns the size of the first id space
    pub fn num_first(&self) -> NumNodes {
        node_at(self.by_first.len())
    }

    /// Returns the size of the second id space
    pub fn num_second(&self) -> NumNodes {
        node_at(self.by_second.len())
    }

    /// Returns the number of related pairs (parallel values of a pair count once)
    pub fn num_pairs(&self) -> usize {
        self.num_pairs
    }

    /// Returns the number of second ids related to `first` (`0` if out of range)
    pub fn num_seconds_of(&self, first: Node) -> usize {
        self.row_of_first(first).len()
    }

    /// Returns the number of first ids related to `second` (`0` if out of range)
    pub fn num_firsts_of(&self, second: Node) -> usize {
        self.row_of_second(second).len()
    }

    /// Appends a new id to the first space and returns it
    pub fn add_first_item(&mut self) -> Node {
        self.by_first.push(Vec::new());
        node_at(self.by_first.len() - 1)
    }

    /// Appends a new id to the second space and returns it
    pub fn add_second_item(&mut self) -> Node {
        self.by_second.push(Vec::new());
        node_at(self.by_second.len() - 1)
    }

    /// Returns *true* if `first` is related to `second`. Out-of-range ids are never related.
    pub fn contains_pair(&self, first: Node, second: Node) -> bool {
        self.position_in_first(first, second).is_some()
    }

    /// Returns the slot of the pair, or `None` if the pair does not exist
    pub fn slot(&self, first: Node, second: Node) -> Option<&M::Slot<V>> {
        let pos = self.position_in_first(first, second)?;
        Some(&self.by_first[first as usize][pos].1)
    }

    /// Returns all values of the pair in insertion order
    pub fn values(&self, first: Node, second: Node) -> Option<&[V]> {
        self.slot(first, second).map(M::values::<V>)
    }

    /// Returns the first value of the pair
    pub fn value(&self, first: Node, second: Node) -> Option<&V> {
        self.values(first, second).and_then(|values| values.first())
    }

    /// Relates `first` with `second`.
    ///
    /// If the pair exists, the value is appended for [`Multi`] relations while [`Single`]
    /// relations return [`Error::PairExists`] and stay unchanged.
    pub fn add_relation(&mut self, first: Node, second: Node, value: V) -> Result<()> {
        self.check_ids(first, second)?;

        let row = &mut self.by_first[first as usize];
        match row.binary_search_by_key(&second, |(p, _)| *p) {
            Ok(_) => {
                if !M::PARALLEL {
                    return Err(Error::PairExists { first, second });
                }
                self.modify(first, second, |slot| M::try_append(slot, value.clone()))
                    .map(|_| ())
            }
            Err(pos_first) => {
                row.insert(pos_first, (second, M::slot_of(value.clone())));

                let mirror = &mut self.by_second[second as usize];
                let pos_second = mirror
                    .binary_search_by_key(&first, |(p, _)| *p)
                    .unwrap_or_else(|pos| pos);
                mirror.insert(pos_second, (first, M::slot_of(value)));

                self.num_pairs += 1;
                Ok(())
            }
        }
    }

    /// Replaces all values of an existing pair with `value`
    pub fn update_pair(&mut self, first: Node, second: Node, value: V) -> Result<()> {
        self.modify(first, second, |slot| *slot = M::slot_of(value.clone()))
    }

    /// Replaces the `index`-th value of an existing pair
    pub fn update_value(&mut self, first: Node, second: Node, index: usize, value: V) -> Result<()> {
        let count = self.value_count(first, second)?;
        if index >= count {
            return Err(Error::ValueOutOfRange {
                first,
                second,
                index,
                count,
            });
        }

        self.modify(first, second, |slot| {
            M::values_mut::<V>(slot)[index] = value.clone();
        })
    }

    /// Removes the pair and returns its slot
    pub fn remove_pair(&mut self, first: Node, second: Node) -> Result<M::Slot<V>> {
        let pos_first = self
            .position_in_first(first, second)
            .ok_or(Error::PairNotFound { first, second })?;
        let (_, slot) = self.by_first[first as usize].remove(pos_first);

        let mirror = &mut self.by_second[second as usize];
        if let Ok(pos_second) = mirror.binary_search_by_key(&first, |(p, _)| *p) {
            mirror.remove(pos_second);
        }
        debug_assert!(!self.row_of_second(second).iter().any(|(p, _)| *p == first));

        self.num_pairs -= 1;
        Ok(slot)
    }

    /// Removes the `index`-th value of a pair and returns it.
    /// If it was the only value, the pair itself is removed.
    pub fn remove_value(&mut self, first: Node, second: Node, index: usize) -> Result<V> {
        let count = self.value_count(first, second)?;
        if index >= count {
            return Err(Error::ValueOutOfRange {
                first,
                second,
                index,
                count,
            });
        }

        if count == 1 {
            let slot = self.remove_pair(first, second)?;
            return Ok(M::values::<V>(&slot)[0].clone());
        }

        self.modify(first, second, |slot| M::remove_value::<V>(slot, index))?
            .ok_or(Error::ValueOutOfRange {
                first,
                second,
                index,
                count,
            })
    }

    /// Returns an ascending iterator over `(second, slot)` of all seconds related to `first`.
    /// Out-of-range ids yield nothing.
    pub fn seconds_of(&self, first: Node) -> impl Iterator<Item = (Node, &M::Slot<V>)> + '_ {
        self.row_of_first(first).iter().map(|(p, slot)| (*p, slot))
    }

    /// Returns an ascending iterator over `(first, slot)` of all firsts related to `second`.
    /// Out-of-range ids yield nothing.
    pub fn firsts_of(&self, second: Node) -> impl Iterator<Item = (Node, &M::Slot<V>)> + '_ {
        self.row_of_second(second).iter().map(|(p, slot)| (*p, slot))
    }

    /// Returns *true* if `first` is related to at least one second
    pub fn has_seconds(&self, first: Node) -> bool {
        !self.row_of_first(first).is_empty()
    }

    /// Returns *true* if `second` is related to at least one first
    pub fn has_firsts(&self, second: Node) -> bool {
        !self.row_of_second(second).is_empty()
    }

    /// First ids related to at least one second
    pub fn firsts_with_seconds(&self) -> impl Iterator<Item = Node> + '_ {
        non_empty_rows(&self.by_first, true)
    }

    /// Second ids related to at least one first
    pub fn seconds_with_firsts(&self) -> impl Iterator<Item = Node> + '_ {
        non_empty_rows(&self.by_second, true)
    }

    /// First ids without any relation
    pub fn isolated_firsts(&self) -> impl Iterator<Item = Node> + '_ {
        non_empty_rows(&self.by_first, false)
    }

    /// Second ids without any relation
    pub fn isolated_seconds(&self) -> impl Iterator<Item = Node> + '_ {
        non_empty_rows(&self.by_second, false)
    }

    /// Removes `idx` from the first space together with all its pairs.
    /// Every first id above `idx` is shifted down by one.
    /// Returns the number of removed pairs.
    pub fn remove_first(&mut self, idx: Node) -> Result<usize> {
        if idx >= self.num_first() {
            return Err(Error::OutOfRange {
                id: idx,
                len: self.num_first(),
            });
        }

        let row = self.by_first.remove(idx as usize);
        let dropped: usize = self
            .by_second
            .par_iter_mut()
            .map(|mirror| purge_partner(mirror, idx))
            .sum();
        debug_assert_eq!(row.len(), dropped);

        self.num_pairs -= row.len();
        trace!(idx, dropped, "removed id from first space");
        Ok(row.len())
    }

    /// Removes `idx` from the second space together with all its pairs.
    /// Every second id above `idx` is shifted down by one.
    /// Returns the number of removed pairs.
    pub fn remove_second(&mut self, idx: Node) -> Result<usize> {
        if idx >= self.num_second() {
            return Err(Error::OutOfRange {
                id: idx,
                len: self.num_second(),
            });
        }

        let row = self.by_second.remove(idx as usize);
        let dropped: usize = self
            .by_first
            .par_iter_mut()
            .map(|mirror| purge_partner(mirror, idx))
            .sum();
        debug_assert_eq!(row.len(), dropped);

        self.num_pairs -= row.len();
        trace!(idx, dropped, "removed id from second space");
        Ok(row.len())
    }

    /// Row of the first view (seconds related to `first`)
    pub(crate) fn row_of_first(&self, first: Node) -> &[(Node, M::Slot<V>)] {
        self.by_first
            .get(first as usize)
            .map_or(&[], |row| row.as_slice())
    }

    /// Row of the second view (firsts related to `second`)
    pub(crate) fn row_of_second(&self, second: Node) -> &[(Node, M::Slot<V>)] {
        self.by_second
            .get(second as usize)
            .map_or(&[], |row| row.as_slice())
    }

    /// Applies `f` to the slot of an existing pair in both views.
    ///
    /// This is the only place where values of an existing pair change, so both views
    /// always agree. `f` runs twice and must be deterministic; the result of the
    /// first-view call is returned.
    fn modify<R>(
        &mut self,
        first: Node,
        second: Node,
        mut f: impl FnMut(&mut M::Slot<V>) -> R,
    ) -> Result<R> {
        let not_found = || Error::PairNotFound { first, second };

        let row = self.by_first.get_mut(first as usize).ok_or_else(not_found)?;
        let pos_first = row
            .binary_search_by_key(&second, |(p, _)| *p)
            .map_err(|_| not_found())?;

        let mirror = self.by_second.get_mut(second as usize).ok_or_else(not_found)?;
        let pos_second = mirror
            .binary_search_by_key(&first, |(p, _)| *p)
            .map_err(|_| not_found())?;

        let result = f(&mut row[pos_first].1);
        f(&mut mirror[pos_second].1);
        Ok(result)
    }

    fn value_count(&self, first: Node, second: Node) -> Result<usize> {
        self.values(first, second)
            .map(<[V]>::len)
            .ok_or(Error::PairNotFound { first, second })
    }

    fn position_in_first(&self, first: Node, second: Node) -> Option<usize> {
        self.row_of_first(first)
            .binary_search_by_key(&second, |(p, _)| *p)
            .ok()
    }

    fn check_ids(&self, first: Node, second: Node) -> Result<()> {
        if first >= self.num_first() {
            return Err(Error::OutOfRange {
                id: first,
                len: self.num_first(),
            });
        }
        if second >= self.num_second() {
            return Err(Error::OutOfRange {
                id: second,
                len: self.num_second(),
            });
        }
        Ok(())
    }
}

/// Merges a sorted `(partner, value)` list into slots according to the multiplicity policy
fn collapse_row<V: Value, M: Multiplicity>(first: Node, row: Vec<(Node, V)>) -> Result<Row<V, M>> {
    let mut collapsed: Row<V, M> = Vec::with_capacity(row.len());
    for (second, value) in row {
        match collapsed.last_mut() {
            Some((last, slot)) if *last == second => {
                if !M::try_append(slot, value) {
                    return Err(Error::PairExists { first, second });
                }
            }
            _ => collapsed.push((second, M::slot_of(value))),
        }
    }
    Ok(collapsed)
}

fn non_empty_rows<S>(rows: &[Vec<(Node, S)>], non_empty: bool) -> impl Iterator<Item = Node> + '_ {
    rows.iter()
        .enumerate()
        .filter_map(move |(id, row)| (row.is_empty() != non_empty).then(|| node_at(id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn partners<S>(it: impl Iterator<Item = (Node, S)>) -> Vec<Node> {
        it.map(|(p, _)| p).collect_vec()
    }

    #[test]
    fn pairs_are_visible_from_both_views() {
        let mut rel: IndexedRelation<f64> = IndexedRelation::with_sizes(3, 4);
        rel.add_relation(0, 3, 0.5).unwrap();
        rel.add_relation(0, 1, 1.5).unwrap();
        rel.add_relation(2, 1, 2.5).unwrap();

        assert_eq!(rel.num_pairs(), 3);
        assert!(rel.contains_pair(0, 3));
        assert!(!rel.contains_pair(3, 0));
        assert_eq!(partners(rel.seconds_of(0)), vec![1, 3]);
        assert_eq!(partners(rel.firsts_of(1)), vec![0, 2]);
        assert_eq!(partners(rel.firsts_of(3)), vec![0]);
        assert_eq!(rel.value(2, 1), Some(&2.5));
        assert_eq!(rel.num_seconds_of(0), 2);
        assert_eq!(rel.num_firsts_of(1), 2);
    }

    #[test]
    fn single_rejects_duplicates() {
        let mut rel: IndexedRelation<f64> = IndexedRelation::with_sizes(2, 2);
        rel.add_relation(0, 1, 1.0).unwrap();
        assert!(matches!(
            rel.add_relation(0, 1, 2.0),
            Err(Error::PairExists { first: 0, second: 1 })
        ));
        assert_eq!(rel.value(0, 1), Some(&1.0));
        assert_eq!(rel.num_pairs(), 1);
    }

    #[test]
    fn multi_appends_duplicates() {
        let mut rel: IndexedRelation<f64, Multi> = IndexedRelation::with_sizes(2, 2);
        rel.add_relation(0, 1, 1.0).unwrap();
        rel.add_relation(0, 1, 2.0).unwrap();
        assert_eq!(rel.values(0, 1), Some(&[1.0, 2.0][..]));
        assert_eq!(rel.num_pairs(), 1);

        let (_, mirrored) = rel.firsts_of(1).next().unwrap();
        assert_eq!(Multi::values(mirrored), &[1.0, 2.0]);
    }

    #[test]
    fn out_of_range_is_reported() {
        let mut rel: IndexedRelation<()> = IndexedRelation::with_sizes(2, 1);
        assert!(matches!(
            rel.add_relation(2, 0, ()),
            Err(Error::OutOfRange { id: 2, len: 2 })
        ));
        assert!(matches!(
            rel.add_relation(0, 1, ()),
            Err(Error::OutOfRange { id: 1, len: 1 })
        ));
        assert!(!rel.contains_pair(5, 5));
        assert_eq!(rel.seconds_of(9).count(), 0);
    }

    #[test]
    fn updates_reach_both_views() {
        let mut rel: IndexedRelation<i32, Multi> = IndexedRelation::with_sizes(2, 2);
        rel.add_relation(1, 0, 7).unwrap();
        rel.add_relation(1, 0, 8).unwrap();

        rel.update_value(1, 0, 1, 9).unwrap();
        let (_, mirrored) = rel.firsts_of(0).next().unwrap();
        assert_eq!(Multi::values(mirrored), &[7, 9]);

        rel.update_pair(1, 0, 3).unwrap();
        let (_, mirrored) = rel.firsts_of(0).next().unwrap();
        assert_eq!(Multi::values(mirrored), &[3]);
        assert_eq!(rel.values(1, 0), Some(&[3][..]));

        assert!(matches!(
            rel.update_value(1, 0, 1, 0),
            Err(Error::ValueOutOfRange { index: 1, count: 1, .. })
        ));
        assert!(matches!(
            rel.update_pair(0, 0, 1),
            Err(Error::PairNotFound { first: 0, second: 0 })
        ));
    }

    #[test]
    fn removal_is_idempotent() {
        let mut rel: IndexedRelation<f64> = IndexedRelation::with_sizes(2, 2);
        rel.add_relation(0, 1, 1.0).unwrap();

        assert_eq!(rel.remove_pair(0, 1).unwrap(), 1.0);
        assert!(matches!(
            rel.remove_pair(0, 1),
            Err(Error::PairNotFound { .. })
        ));
        assert_eq!(rel.num_pairs(), 0);
        assert_eq!(rel.firsts_of(1).count(), 0);
    }

    #[test]
    fn remove_value_drops_pair_with_last_value() {
        let mut rel: IndexedRelation<f64, Multi> = IndexedRelation::with_sizes(1, 1);
        rel.add_relation(0, 0, 1.0).unwrap();
        rel.add_relation(0, 0, 2.0).unwrap();

        assert_eq!(rel.remove_value(0, 0, 0).unwrap(), 1.0);
        assert_eq!(rel.values(0, 0), Some(&[2.0][..]));
        assert_eq!(rel.remove_value(0, 0, 0).unwrap(), 2.0);
        assert!(!rel.contains_pair(0, 0));
        assert_eq!(rel.num_pairs(), 0);
    }

    #[test]
    fn bulk_load_sorts_and_mirrors() {
        let rows = vec![vec![(2, 'a'), (0, 'b')], vec![], vec![(1, 'c'), (2, 'd')]];
        let rel: IndexedRelation<char> = IndexedRelation::from_rows(3, rows).unwrap();

        assert_eq!(rel.num_first(), 3);
        assert_eq!(rel.num_second(), 3);
        assert_eq!(rel.num_pairs(), 4);
        assert_eq!(partners(rel.seconds_of(0)), vec![0, 2]);
        assert_eq!(partners(rel.firsts_of(2)), vec![0, 2]);
        assert_eq!(rel.value(0, 2), Some(&'a'));
        assert_eq!(rel.firsts_with_seconds().collect_vec(), vec![0, 2]);
        assert_eq!(rel.isolated_firsts().collect_vec(), vec![1]);
        assert_eq!(rel.seconds_with_firsts().collect_vec(), vec![0, 1, 2]);
        assert_eq!(rel.isolated_seconds().count(), 0);
    }

    #[test]
    fn bulk_load_validates() {
        let out_of_range = IndexedRelation::<(), Single>::from_rows(2, vec![vec![(2, ())]]);
        assert!(matches!(out_of_range, Err(Error::OutOfRange { id: 2, len: 2 })));

        let duplicate = IndexedRelation::<(), Single>::from_rows(2, vec![vec![(1, ()), (1, ())]]);
        assert!(matches!(duplicate, Err(Error::PairExists { first: 0, second: 1 })));

        let multi =
            IndexedRelation::<u8, Multi>::from_rows(2, vec![vec![(1, 3), (0, 1), (1, 4)]]).unwrap();
        assert_eq!(multi.values(0, 1), Some(&[3, 4][..]));
        assert_eq!(multi.num_pairs(), 2);
    }

    #[test]
    fn removing_ids_from_either_space() {
        let rows = vec![vec![(0, ()), (2, ())], vec![(1, ()), (2, ())], vec![(2, ())]];
        let mut rel: IndexedRelation<()> = IndexedRelation::from_rows(3, rows).unwrap();

        assert_eq!(rel.remove_second(1).unwrap(), 1);
        assert_eq!(rel.num_second(), 2);
        assert_eq!(partners(rel.seconds_of(0)), vec![0, 1]);
        assert_eq!(partners(rel.seconds_of(1)), vec![1]);
        assert_eq!(partners(rel.firsts_of(1)), vec![0, 1, 2]);

        assert_eq!(rel.remove_first(0).unwrap(), 2);
        assert_eq!(rel.num_first(), 2);
        assert_eq!(partners(rel.firsts_of(1)), vec![0, 1]);
        assert_eq!(rel.num_pairs(), 2);

        assert!(matches!(rel.remove_first(2), Err(Error::OutOfRange { id: 2, len: 2 })));
    }
}
