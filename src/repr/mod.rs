/*!
# Edge Collections

An edge collection stores the edges between the nodes `0..n` of a graph, together with a weight
and a type per edge. Internally it keeps two auto relations with identical membership:
one for weights and one for types (see [`AutoRelation`](crate::relation::AutoRelation)).

A collection is parameterized by three policies:

- a [`Direction`]: [`Directed`] or [`Undirected`],
- a [`Weighting`]: [`Weighted`] (stores an `f64` per edge) or [`Unweighted`] (stores nothing and
  reports [`DEFAULT_WEIGHT`]),
- a [`Multiplicity`]: [`Single`](crate::relation::Single) (simple graphs) or
  [`Multi`](crate::relation::Multi) (parallel edges allowed).

## Provided Representations

- [`DirectedWeightedEdges`] / [`DirectedWeightedMultiEdges`]
- [`DirectedUnweightedEdges`] / [`DirectedUnweightedMultiEdges`]
- [`UndirectedWeightedEdges`] / [`UndirectedWeightedMultiEdges`]
- [`UndirectedUnweightedEdges`] / [`UndirectedUnweightedMultiEdges`]

Undirected collections store every edge once under its normalized key `(min, max)` and answer
neighbourhood queries by walking both views of a node.
*/

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    edge::{DEFAULT_WEIGHT, EdgeOrientation, Weight},
    node::Node,
    relation::{Multiplicity, Value},
};

mod directed;
mod edges;
mod undirected;

pub use directed::*;
pub use edges::*;
pub use undirected::*;

/// Decides whether `(u, v)` and `(v, u)` denote the same edge
pub trait Direction: Copy + Default + Send + Sync + 'static {
    /// *true* for directed collections
    const DIRECTED: bool;

    /// Returns the key under which the edge `(u, v)` is stored
    fn key(u: Node, v: Node) -> (Node, Node);

    /// Returns the orientation that is actually walked for a query with `orientation`
    fn effective(orientation: EdgeOrientation) -> EdgeOrientation;
}

/// Decides whether a collection stores weights
pub trait Weighting: Copy + Default + Send + Sync + 'static {
    /// What is stored per edge instance
    type Value: Value;

    /// *true* for weighted collections
    const WEIGHTED: bool;

    /// Converts a weight into the stored value
    fn store(weight: Weight) -> Self::Value;

    /// Reads the weight from a stored value
    fn load(value: &Self::Value) -> Weight;
}

/// Every edge carries an `f64` weight
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Weighted;

/// Edges carry no weight; every edge reports [`DEFAULT_WEIGHT`]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Unweighted;

impl Weighting for Weighted {
    type Value = Weight;

    const WEIGHTED: bool = true;

    #[inline]
    fn store(weight: Weight) -> Weight {
        weight
    }

    #[inline]
    fn load(value: &Weight) -> Weight {
        *value
    }
}

impl Weighting for Unweighted {
    type Value = ();

    const WEIGHTED: bool = false;

    #[inline]
    fn store(_weight: Weight) {}

    #[inline]
    fn load(_value: &()) -> Weight {
        DEFAULT_WEIGHT
    }
}

/// Describes which of the eight edge collection variants a structure is.
///
/// Used by readers to check that the file they are configured for matches the requested
/// collection, and serializable so that higher layers can store it in their configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GraphKind {
    pub directed: bool,
    pub weighted: bool,
    #[serde(default)]
    pub multigraph: bool,
}

impl GraphKind {
    /// Returns the kind of a collection with the given policies
    pub fn of<D: Direction, W: Weighting, M: Multiplicity>() -> Self {
        Self {
            directed: D::DIRECTED,
            weighted: W::WEIGHTED,
            multigraph: M::PARALLEL,
        }
    }
}

impl Display for GraphKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            if self.directed { "directed" } else { "undirected" },
            if self.weighted { "weighted" } else { "unweighted" },
            if self.multigraph { "multigraph" } else { "graph" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::{Multi, Single};

    #[test]
    fn kind_of_policies() {
        let kind = GraphKind::of::<Undirected, Weighted, Multi>();
        assert!(!kind.directed);
        assert!(kind.weighted);
        assert!(kind.multigraph);
        assert_eq!(kind.to_string(), "undirected weighted multigraph");
        assert_eq!(
            GraphKind::of::<Directed, Unweighted, Single>().to_string(),
            "directed unweighted graph"
        );
    }

    #[test]
    fn kind_from_config() {
        let kind: GraphKind = serde_json::from_str(r#"{"directed":true,"weighted":false}"#).unwrap();
        assert_eq!(kind, GraphKind::of::<Directed, Unweighted, Single>());

        let text = serde_json::to_string(&kind).unwrap();
        assert_eq!(serde_json::from_str::<GraphKind>(&text).unwrap(), kind);
    }

    #[test]
    fn unweighted_reports_default() {
        assert_eq!(Unweighted::load(&Unweighted::store(3.5)), DEFAULT_WEIGHT);
        assert_eq!(Weighted::load(&Weighted::store(3.5)), 3.5);
    }
}
