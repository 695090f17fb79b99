/*!
# Relations

A relation links ids of a *first* space to ids of a *second* space, optionally attaching a value
to every linked pair. Both spaces are dense (`0..n`), and the relation keeps two sorted views:

- `by_first[a]` lists every `(b, value)` with `a` related to `b`, ascending in `b`,
- `by_second[b]` lists every `(a, value)` with `a` related to `b`, ascending in `a`.

Both views are always mutated together, so each of them can answer neighbourhood queries without
scanning the other.

## Provided Types

- [`IndexedRelation`] relates two different id spaces.
- [`AutoRelation`] relates a space with itself and is the storage behind every edge collection.

## Multiplicity

Whether a pair may carry more than one value is decided by a [`Multiplicity`] policy:

- [`Single`] stores one value per pair and rejects duplicate insertions,
- [`Multi`] stores a list of values per pair and appends on duplicate insertion (parallel edges).
*/

mod auto;
mod indexed;

pub use auto::*;
pub use indexed::*;

use smallvec::SmallVec;

use crate::{edge::EdgeOrientation, node::Node};

/// Values that can be stored in a relation
pub trait Value: Clone + Send + 'static {}

impl<T: Clone + Send + 'static> Value for T {}

/// Policy deciding how many values a single pair can hold.
pub trait Multiplicity: Copy + Default + Send + Sync + 'static {
    /// What is stored per pair
    type Slot<V: Value>: Clone + Send;

    /// *true* if a pair can hold more than one value
    const PARALLEL: bool;

    /// Creates the slot for a freshly inserted pair
    fn slot_of<V: Value>(value: V) -> Self::Slot<V>;

    /// Tries to add another value to an existing slot.
    /// Returns *false* if the policy rejects it.
    fn try_append<V: Value>(slot: &mut Self::Slot<V>, value: V) -> bool;

    /// Values stored in the slot in insertion order; never empty
    fn values<V: Value>(slot: &Self::Slot<V>) -> &[V];

    /// Mutable access to the values stored in the slot
    fn values_mut<V: Value>(slot: &mut Self::Slot<V>) -> &mut [V];

    /// Removes the `index`-th value unless it is the only one left.
    /// Returns `None` (and leaves the slot untouched) if the slot would become empty.
    fn remove_value<V: Value>(slot: &mut Self::Slot<V>, index: usize) -> Option<V>;
}

/// One value per pair. Inserting an existing pair fails.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Single;

/// A list of values per pair. Inserting an existing pair appends the value.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Multi;

impl Multiplicity for Single {
    type Slot<V: Value> = V;

    const PARALLEL: bool = false;

    #[inline]
    fn slot_of<V: Value>(value: V) -> V {
        value
    }

    #[inline]
    fn try_append<V: Value>(_slot: &mut V, _value: V) -> bool {
        false
    }

    #[inline]
    fn values<V: Value>(slot: &V) -> &[V] {
        std::slice::from_ref(slot)
    }

    #[inline]
    fn values_mut<V: Value>(slot: &mut V) -> &mut [V] {
        std::slice::from_mut(slot)
    }

    #[inline]
    fn remove_value<V: Value>(_slot: &mut V, _index: usize) -> Option<V> {
        None
    }
}

impl Multiplicity for Multi {
    type Slot<V: Value> = SmallVec<[V; 2]>;

    const PARALLEL: bool = true;

    #[inline]
    fn slot_of<V: Value>(value: V) -> SmallVec<[V; 2]> {
        smallvec::smallvec![value]
    }

    #[inline]
    fn try_append<V: Value>(slot: &mut SmallVec<[V; 2]>, value: V) -> bool {
        slot.push(value);
        true
    }

    #[inline]
    fn values<V: Value>(slot: &SmallVec<[V; 2]>) -> &[V] {
        slot.as_slice()
    }

    #[inline]
    fn values_mut<V: Value>(slot: &mut SmallVec<[V; 2]>) -> &mut [V] {
        slot.as_mut_slice()
    }

    fn remove_value<V: Value>(slot: &mut SmallVec<[V; 2]>, index: usize) -> Option<V> {
        (slot.len() > 1 && index < slot.len()).then(|| slot.remove(index))
    }
}

/// A row of a relation view: `(partner, slot)` sorted ascending by partner
pub type Row<V, M> = Vec<(Node, <M as Multiplicity>::Slot<V>)>;

/// A partner met while walking both rows of one id at once.
///
/// `out` is set if the pair `(id, partner)` exists, `inc` if `(partner, id)` exists.
pub struct Partner<'a, S> {
    pub node: Node,
    pub out: Option<&'a S>,
    pub inc: Option<&'a S>,
}

/// Lazy, ascending merge of the two rows of one id, filtered by an [`EdgeOrientation`].
///
/// - `Out` yields partners of the first-view row,
/// - `In` yields partners of the second-view row,
/// - `Und` yields the deduplicated union,
/// - `Mutual` yields the intersection.
pub struct Partners<'a, S> {
    out: &'a [(Node, S)],
    inc: &'a [(Node, S)],
    mutual: bool,
}

impl<'a, S> Partners<'a, S> {
    pub(crate) fn new(
        out: &'a [(Node, S)],
        inc: &'a [(Node, S)],
        orientation: EdgeOrientation,
    ) -> Self {
        match orientation {
            EdgeOrientation::Out => Self {
                out,
                inc: &[],
                mutual: false,
            },
            EdgeOrientation::In => Self {
                out: &[],
                inc,
                mutual: false,
            },
            EdgeOrientation::Und => Self {
                out,
                inc,
                mutual: false,
            },
            EdgeOrientation::Mutual => Self {
                out,
                inc,
                mutual: true,
            },
        }
    }
}

impl<'a, S> Iterator for Partners<'a, S> {
    type Item = Partner<'a, S>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (out, inc) = (self.out, self.inc);
            if self.mutual && (out.is_empty() || inc.is_empty()) {
                return None;
            }

            let partner = match (out.split_first(), inc.split_first()) {
                (None, None) => return None,
                (Some(((o, so), out_rest)), None) => {
                    self.out = out_rest;
                    Partner {
                        node: *o,
                        out: Some(so),
                        inc: None,
                    }
                }
                (None, Some(((i, si), inc_rest))) => {
                    self.inc = inc_rest;
                    Partner {
                        node: *i,
                        out: None,
                        inc: Some(si),
                    }
                }
                (Some(((o, so), out_rest)), Some(((i, si), inc_rest))) => {
                    if o < i {
                        self.out = out_rest;
                        Partner {
                            node: *o,
                            out: Some(so),
                            inc: None,
                        }
                    } else if i < o {
                        self.inc = inc_rest;
                        Partner {
                            node: *i,
                            out: None,
                            inc: Some(si),
                        }
                    } else {
                        self.out = out_rest;
                        self.inc = inc_rest;
                        Partner {
                            node: *o,
                            out: Some(so),
                            inc: Some(si),
                        }
                    }
                }
            };

            if !self.mutual || (partner.out.is_some() && partner.inc.is_some()) {
                return Some(partner);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let upper = self.out.len() + self.inc.len();
        (0, Some(upper))
    }
}

/// Removes `removed` from a sorted row and shifts every larger partner down by one.
/// Returns the number of dropped entries (`0` or `1`).
pub(crate) fn purge_partner<S>(row: &mut Vec<(Node, S)>, removed: Node) -> usize {
    let (start, dropped) = match row.binary_search_by_key(&removed, |(p, _)| *p) {
        Ok(pos) => {
            row.remove(pos);
            (pos, 1)
        }
        Err(pos) => (pos, 0),
    };

    for (partner, _) in &mut row[start..] {
        if let Some(shifted) = crate::node::shifted_after_removal(*partner, removed) {
            *partner = shifted;
        }
    }

    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn row(ids: &[Node]) -> Vec<(Node, ())> {
        ids.iter().map(|&id| (id, ())).collect()
    }

    #[test]
    fn partners_by_orientation() {
        let out = row(&[1, 3, 5, 7]);
        let inc = row(&[0, 3, 4, 7, 9]);

        let walk = |o| {
            Partners::new(&out, &inc, o)
                .map(|p| p.node)
                .collect_vec()
        };

        assert_eq!(walk(EdgeOrientation::Out), vec![1, 3, 5, 7]);
        assert_eq!(walk(EdgeOrientation::In), vec![0, 3, 4, 7, 9]);
        assert_eq!(walk(EdgeOrientation::Und), vec![0, 1, 3, 4, 5, 7, 9]);
        assert_eq!(walk(EdgeOrientation::Mutual), vec![3, 7]);
    }

    #[test]
    fn partners_report_both_sides() {
        let out = row(&[2, 4]);
        let inc = row(&[4]);
        let sides = Partners::new(&out, &inc, EdgeOrientation::Und)
            .map(|p| (p.node, p.out.is_some(), p.inc.is_some()))
            .collect_vec();
        assert_eq!(sides, vec![(2, true, false), (4, true, true)]);
    }

    #[test]
    fn purge_shifts_tail() {
        let mut r = row(&[0, 2, 3, 6]);
        assert_eq!(purge_partner(&mut r, 3), 1);
        assert_eq!(r.iter().map(|(p, _)| *p).collect_vec(), vec![0, 2, 5]);

        let mut r = row(&[0, 2, 6]);
        assert_eq!(purge_partner(&mut r, 4), 0);
        assert_eq!(r.iter().map(|(p, _)| *p).collect_vec(), vec![0, 2, 5]);
    }

    #[test]
    fn multi_slot_appends() {
        let mut slot = Multi::slot_of(1.0);
        assert!(Multi::try_append(&mut slot, 2.0));
        assert_eq!(Multi::values(&slot), &[1.0, 2.0]);
        assert_eq!(Multi::remove_value(&mut slot, 0), Some(1.0));
        assert_eq!(Multi::values(&slot), &[2.0]);
        assert_eq!(Multi::remove_value(&mut slot, 0), None);

        let mut single = Single::slot_of(1.0);
        assert!(!Single::try_append(&mut single, 2.0));
        assert_eq!(Single::values(&single), &[1.0]);
        assert_eq!(Single::remove_value(&mut single, 0), None);
    }
}
