use crate::{
    edge::EdgeOrientation,
    node::Node,
    relation::{Multi, Single},
    testing::test_edge_ops,
};

use super::*;

/// `(u, v)` and `(v, u)` are the same edge.
///
/// The edge is stored once under `(min(u, v), max(u, v))`: for a node `u` the first view holds
/// neighbours `v >= u` and the second view neighbours `v <= u`. Every orientation is answered
/// as [`EdgeOrientation::Und`], walking both views.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Undirected;

impl Direction for Undirected {
    const DIRECTED: bool = false;

    #[inline]
    fn key(u: Node, v: Node) -> (Node, Node) {
        (u.min(v), u.max(v))
    }

    #[inline]
    fn effective(_orientation: EdgeOrientation) -> EdgeOrientation {
        EdgeOrientation::Und
    }
}

/// Undirected simple graph with `f64` weights
pub type UndirectedWeightedEdges = Edges<Undirected, Weighted, Single>;

/// Undirected multigraph with `f64` weights per parallel edge
pub type UndirectedWeightedMultiEdges = Edges<Undirected, Weighted, Multi>;

/// Undirected simple graph without weights
pub type UndirectedUnweightedEdges = Edges<Undirected, Unweighted, Single>;

/// Undirected multigraph without weights
pub type UndirectedUnweightedMultiEdges = Edges<Undirected, Unweighted, Multi>;

test_edge_ops!(undirected_weighted, UndirectedWeightedEdges, false, true, false);
test_edge_ops!(undirected_weighted_multi, UndirectedWeightedMultiEdges, false, true, true);
test_edge_ops!(undirected_unweighted, UndirectedUnweightedEdges, false, false, false);
test_edge_ops!(undirected_unweighted_multi, UndirectedUnweightedMultiEdges, false, false, true);
