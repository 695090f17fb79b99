use std::ops::Range;

use itertools::Itertools;

use crate::{edge::*, node::*, repr::GraphKind};

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns a range over all nodes.
    /// The range does not borrow `self` and may be used while the graph is mutated.
    fn vertices_range(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns an iterator over V.
    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.vertices_range()
    }

    /// Returns *true* if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Provides getters pertaining to the edge-size of a graph
pub trait GraphEdgeOrder {
    /// Returns the number of edges of the graph.
    /// Every parallel edge counts on its own.
    fn number_of_edges(&self) -> NumEdges;

    /// Returns *true* if the graph has no edges
    fn is_singleton_graph(&self) -> bool {
        self.number_of_edges() == 0
    }
}

/// Reports which kind of edge collection backs a graph
pub trait GraphType {
    /// Returns the kind of the graph
    fn kind(&self) -> GraphKind;

    /// Returns *true* if `(u, v)` and `(v, u)` are different edges
    fn is_directed(&self) -> bool {
        self.kind().directed
    }

    /// Returns *true* if `(u, v)` and `(v, u)` are the same edge
    fn is_undirected(&self) -> bool {
        !self.is_directed()
    }

    /// Returns *true* if edges carry their own weight
    fn is_weighted(&self) -> bool {
        self.kind().weighted
    }

    /// Returns *true* if parallel edges are allowed
    fn is_multigraph(&self) -> bool {
        self.kind().multigraph
    }
}

/// Traits pertaining getters for neighborhoods.
///
/// Every query takes an [`EdgeOrientation`]; undirected graphs treat all of them as
/// [`EdgeOrientation::Und`]. Nodes that are out of range have no neighbors.
pub trait AdjacencyList: GraphNodeOrder + Sized {
    /// Returns an ascending iterator over the distinct neighbors of a given vertex
    fn neighbors_of(
        &self,
        u: Node,
        orientation: EdgeOrientation,
    ) -> impl Iterator<Item = Node> + '_;

    /// Returns the number of distinct neighbors of `u`
    fn degree_of(&self, u: Node, orientation: EdgeOrientation) -> NumNodes {
        self.neighbors_of(u, orientation).count() as NumNodes
    }

    /// Returns the degree of every node
    fn degrees(&self, orientation: EdgeOrientation) -> impl Iterator<Item = NumNodes> + '_ {
        self.vertices()
            .map(move |u| self.degree_of(u, orientation))
    }

    /// Returns an iterator to all vertices with non-zero degree
    fn vertices_with_neighbors(
        &self,
        orientation: EdgeOrientation,
    ) -> impl Iterator<Item = Node> + '_ {
        self.vertices()
            .filter(move |&u| self.neighbors_of(u, orientation).next().is_some())
    }

    /// Returns the number of nodes with non-zero degree
    fn number_of_nodes_with_neighbors(&self, orientation: EdgeOrientation) -> NumNodes {
        self.vertices_with_neighbors(orientation).count() as NumNodes
    }

    /// Returns a distribution sorted by degree
    fn degree_distribution(&self, orientation: EdgeOrientation) -> Vec<(NumNodes, NumNodes)> {
        let mut distr = self
            .degrees(orientation)
            .counts()
            .into_iter()
            .map(|(d, n)| (d, n as NumNodes))
            .collect_vec();
        distr.sort_by_key(|(d, _)| *d);
        distr
    }

    /// Returns the maximum degree in the graph
    fn max_degree(&self, orientation: EdgeOrientation) -> NumNodes {
        self.degrees(orientation).max().unwrap_or(0)
    }
}

/// Trait to test existence of certain structures in a graph.
pub trait AdjacencyTest {
    /// Returns *true* if the edge (u,v) exists in the graph.
    /// Out-of-range nodes are never connected.
    fn has_edge(&self, u: Node, v: Node) -> bool;

    /// Allows multiple edge-queries for a single node
    fn has_neighbors<const N: usize>(&self, u: Node, neighbors: [Node; N]) -> [bool; N] {
        neighbors.map(|v| self.has_edge(u, v))
    }

    /// Returns *true* if a self-loop (u,u) exists.
    fn has_self_loop(&self, u: Node) -> bool {
        self.has_edge(u, u)
    }

    /// Returns *true* if there exists an edge (u,v) as well as (v,u) in the graph.
    /// Note that for undirected graphs with edge {u,v} this function always returns *true*.
    fn has_bidirected_edge(&self, u: Node, v: Node) -> bool {
        self.has_edge(u, v) && self.has_edge(v, u)
    }
}
