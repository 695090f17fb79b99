use std::marker::PhantomData;

use itertools::{Either, EitherOrBoth, Itertools};
use tracing::debug;

use super::*;
use crate::{
    edge::*,
    error::{Error, Result},
    node::{NumNodes, node_at},
    ops::*,
    relation::{AutoRelation, Partner, Single},
};

/// A collection of weighted, typed edges over the nodes `0..n`.
///
/// Weights and types live in two [`AutoRelation`]s that always hold the same pairs with the
/// same number of values; the `i`-th value of a pair in both relations describes the `i`-th
/// parallel instance of that edge. `num_edges` counts instances and is kept up to date by
/// every mutator.
///
/// # Type parameters
/// - `D`: [`Direction`] of the edges.
/// - `W`: [`Weighting`], i.e. whether weights are stored.
/// - `M`: [`Multiplicity`], i.e. whether parallel edges are allowed.
#[derive(Clone)]
pub struct Edges<D: Direction, W: Weighting, M: Multiplicity = Single> {
    weights: AutoRelation<W::Value, M>,
    types: AutoRelation<EdgeType, M>,
    num_edges: NumEdges,
    _direction: PhantomData<D>,
}

/// One row of an adjacency list: `(neighbor, weight, type)` per edge instance
pub type AdjacencyRow = Vec<(Node, Weight, EdgeType)>;

impl<D: Direction, W: Weighting, M: Multiplicity> Default for Edges<D, W, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Direction, W: Weighting, M: Multiplicity> Edges<D, W, M> {
    /// Creates an empty collection without nodes
    pub fn new() -> Self {
        Self::with_nodes(0)
    }

    /// Creates a collection with `n` nodes and no edges
    pub fn with_nodes(n: NumNodes) -> Self {
        Self {
            weights: AutoRelation::with_size(n),
            types: AutoRelation::with_size(n),
            num_edges: 0,
            _direction: PhantomData,
        }
    }

    /// Bulk-loads a collection from an adjacency list with one row per node.
    ///
    /// For undirected collections every edge `{u, v}` with `u != v` must be listed in both
    /// rows (as often as it has parallel instances); the weight and type are taken from the row
    /// of the smaller endpoint. Self-loops are listed once.
    ///
    /// # Errors
    /// - [`Error::OutOfRange`] if a neighbor is not a node,
    /// - [`Error::PairExists`] if a simple collection lists an edge twice,
    /// - [`Error::UnmatchedEdge`] if an undirected edge is missing its mirrored entry.
    pub fn from_adjacency(rows: Vec<AdjacencyRow>) -> Result<Self> {
        let n = node_at(rows.len());

        let mut weight_rows = Vec::with_capacity(rows.len());
        let mut type_rows = Vec::with_capacity(rows.len());
        let mut listed_forward = Vec::new();
        let mut listed_backward = Vec::new();

        for (u, row) in rows.into_iter().enumerate() {
            let u = node_at(u);
            let mut weights = Vec::with_capacity(row.len());
            let mut types = Vec::with_capacity(row.len());

            for (v, weight, edge_type) in row {
                if v >= n {
                    return Err(Error::OutOfRange { id: v, len: n });
                }

                if !D::DIRECTED {
                    if v < u {
                        listed_backward.push((v, u));
                        continue;
                    }
                    if v > u {
                        listed_forward.push((u, v));
                    }
                }

                weights.push((v, W::store(weight)));
                types.push((v, edge_type));
            }

            weight_rows.push(weights);
            type_rows.push(types);
        }

        if !D::DIRECTED {
            listed_forward.sort_unstable();
            listed_backward.sort_unstable();

            let unmatched = listed_forward
                .iter()
                .merge_join_by(listed_backward.iter(), |a, b| a.cmp(b))
                .find_map(|pair| match pair {
                    EitherOrBoth::Both(_, _) => None,
                    EitherOrBoth::Left(&(u, v)) => Some(Edge(u, v)),
                    EitherOrBoth::Right(&(u, v)) => Some(Edge(v, u)),
                });
            if let Some(Edge(from, to)) = unmatched {
                return Err(Error::UnmatchedEdge { from, to });
            }
        }

        let num_edges = weight_rows.iter().map(Vec::len).sum::<usize>() as NumEdges;
        let weights = AutoRelation::from_adjacency(weight_rows)?;
        let types = AutoRelation::from_adjacency(type_rows)?;
        let kind = GraphKind::of::<D, W, M>();
        debug!(n, num_edges, %kind, "bulk-loaded edges");

        Ok(Self {
            weights,
            types,
            num_edges,
            _direction: PhantomData,
        })
    }

    /// Creates a collection with `n` nodes from a sequence of edge instances.
    /// Endpoints may be given as [`Edge`] or as anything convertible into one.
    pub fn from_edges<E: Into<Edge>>(
        n: NumNodes,
        edges: impl IntoIterator<Item = (E, Weight, EdgeType)>,
    ) -> Result<Self> {
        let mut collection = Self::with_nodes(n);
        for (edge, weight, edge_type) in edges {
            let Edge(u, v) = edge.into();
            collection.add_edge(u, v, weight, edge_type)?;
        }
        Ok(collection)
    }

    /// Appends a new node without edges and returns it
    pub fn add_node(&mut self) -> Node {
        let u = self.weights.add_item();
        let t = self.types.add_item();
        debug_assert_eq!(u, t);
        u
    }

    /// Adds an edge instance `(u, v)`.
    ///
    /// Simple collections reject an existing edge with [`Error::PairExists`], multigraphs add
    /// a parallel instance.
    pub fn add_edge(&mut self, u: Node, v: Node, weight: Weight, edge_type: EdgeType) -> Result<()> {
        let (a, b) = D::key(u, v);
        self.weights.add_relation(a, b, W::store(weight))?;
        self.types.add_relation(a, b, edge_type)?;
        self.num_edges += 1;
        Ok(())
    }

    /// Removes the most recently added instance of `(u, v)`
    pub fn remove_edge(&mut self, u: Node, v: Node) -> Result<()> {
        match self.num_edges_between(u, v) {
            0 => {
                let (first, second) = D::key(u, v);
                Err(Error::PairNotFound { first, second })
            }
            count => self.remove_edge_instance(u, v, count - 1),
        }
    }

    /// Removes the `index`-th parallel instance of `(u, v)`.
    /// Removing the last instance removes the edge altogether.
    pub fn remove_edge_instance(&mut self, u: Node, v: Node, index: usize) -> Result<()> {
        let (a, b) = D::key(u, v);
        self.weights.remove_value(a, b, index)?;
        self.types.remove_value(a, b, index)?;
        self.num_edges -= 1;
        Ok(())
    }

    /// Removes every instance of `(u, v)` and returns how many were removed
    pub fn remove_edges(&mut self, u: Node, v: Node) -> Result<usize> {
        let (a, b) = D::key(u, v);
        let slot = self.weights.remove_pair(a, b)?;
        self.types.remove_pair(a, b)?;

        let removed = M::values::<W::Value>(&slot).len();
        self.num_edges -= removed as NumEdges;
        Ok(removed)
    }

    /// Removes node `u` with all incident edges.
    /// Every node above `u` is shifted down by one.
    /// Returns the number of removed edge instances (self-loops count once).
    pub fn remove_node(&mut self, u: Node) -> Result<NumEdges> {
        if u >= self.number_of_nodes() {
            return Err(Error::OutOfRange {
                id: u,
                len: self.number_of_nodes(),
            });
        }

        let incident = self.num_edges_at(u, EdgeOrientation::Und);
        let weight_pairs = self.weights.remove(u)?;
        let type_pairs = self.types.remove(u)?;
        debug_assert_eq!(weight_pairs, type_pairs);

        self.num_edges -= incident;
        debug!(u, incident, pairs = weight_pairs, "removed node");
        Ok(incident)
    }

    /// Sets the weight of every instance of `(u, v)`.
    /// Unweighted collections only check that the edge exists.
    pub fn update_edge_weight(&mut self, u: Node, v: Node, weight: Weight) -> Result<()> {
        let (a, b) = D::key(u, v);
        let count = self.instances_of(a, b)?;
        for index in 0..count {
            self.weights.update_value(a, b, index, W::store(weight))?;
        }
        Ok(())
    }

    /// Sets the weight of the `index`-th instance of `(u, v)`
    pub fn update_edge_weight_at(
        &mut self,
        u: Node,
        v: Node,
        index: usize,
        weight: Weight,
    ) -> Result<()> {
        let (a, b) = D::key(u, v);
        self.weights.update_value(a, b, index, W::store(weight))
    }

    /// Sets the type of every instance of `(u, v)`
    pub fn update_edge_type(&mut self, u: Node, v: Node, edge_type: EdgeType) -> Result<()> {
        let (a, b) = D::key(u, v);
        let count = self.instances_of(a, b)?;
        for index in 0..count {
            self.types.update_value(a, b, index, edge_type)?;
        }
        Ok(())
    }

    /// Sets the type of the `index`-th instance of `(u, v)`
    pub fn update_edge_type_at(
        &mut self,
        u: Node,
        v: Node,
        index: usize,
        edge_type: EdgeType,
    ) -> Result<()> {
        let (a, b) = D::key(u, v);
        self.types.update_value(a, b, index, edge_type)
    }

    /// Returns *true* if at least one instance of `(u, v)` exists
    pub fn contains_edge(&self, u: Node, v: Node) -> bool {
        let (a, b) = D::key(u, v);
        self.weights.contains_pair(a, b)
    }

    /// Returns the weight of the first instance of `(u, v)`
    pub fn edge_weight(&self, u: Node, v: Node) -> Option<Weight> {
        let (a, b) = D::key(u, v);
        self.weights.value(a, b).map(W::load)
    }

    /// Returns the weights of all instances of `(u, v)`; empty if there is no such edge
    pub fn edge_weights(&self, u: Node, v: Node) -> impl Iterator<Item = Weight> + '_ {
        let (a, b) = D::key(u, v);
        self.weights
            .values(a, b)
            .unwrap_or_default()
            .iter()
            .map(W::load)
    }

    /// Returns the type of the first instance of `(u, v)`
    pub fn edge_type(&self, u: Node, v: Node) -> Option<EdgeType> {
        let (a, b) = D::key(u, v);
        self.types.value(a, b).copied()
    }

    /// Returns the types of all instances of `(u, v)`; empty if there is no such edge
    pub fn edge_types(&self, u: Node, v: Node) -> impl Iterator<Item = EdgeType> + '_ {
        let (a, b) = D::key(u, v);
        self.types.values(a, b).unwrap_or_default().iter().copied()
    }

    /// Returns the number of instances of `(u, v)`
    pub fn num_edges_between(&self, u: Node, v: Node) -> usize {
        let (a, b) = D::key(u, v);
        self.weights.values(a, b).map_or(0, <[W::Value]>::len)
    }

    /// Returns an ascending iterator over the distinct neighbors of `u`
    pub fn neighbors(
        &self,
        u: Node,
        orientation: EdgeOrientation,
    ) -> impl Iterator<Item = Node> + '_ {
        self.weights
            .partners(u, D::effective(orientation))
            .map(|partner| partner.node)
    }

    /// Returns every neighbor of `u` with the summed weight of all edge instances between them
    /// that match `orientation`.
    pub fn neighbor_weights(
        &self,
        u: Node,
        orientation: EdgeOrientation,
    ) -> impl Iterator<Item = (Node, Weight)> + '_ {
        self.weights
            .partners(u, D::effective(orientation))
            .map(move |partner| {
                let node = partner.node;
                let weight = slots_of(u, partner)
                    .flat_map(|slot| M::values::<W::Value>(slot))
                    .map(W::load)
                    .sum::<Weight>();
                (node, weight)
            })
    }

    /// Returns one `(neighbor, weight, type)` per edge instance at `u`
    pub fn neighbor_edges(
        &self,
        u: Node,
        orientation: EdgeOrientation,
    ) -> impl Iterator<Item = (Node, Weight, EdgeType)> + '_ {
        let orientation = D::effective(orientation);
        self.weights
            .partners(u, orientation)
            .zip(self.types.partners(u, orientation))
            .flat_map(move |(weights, types)| {
                debug_assert_eq!(weights.node, types.node);
                let node = weights.node;
                slots_of(u, weights)
                    .flat_map(|slot| M::values::<W::Value>(slot))
                    .map(W::load)
                    .zip(
                        slots_of(u, types)
                            .flat_map(|slot| M::values::<EdgeType>(slot))
                            .copied(),
                    )
                    .map(move |(weight, edge_type)| (node, weight, edge_type))
            })
    }

    /// Returns one `(neighbor, type)` per edge instance at `u`
    pub fn neighbor_types(
        &self,
        u: Node,
        orientation: EdgeOrientation,
    ) -> impl Iterator<Item = (Node, EdgeType)> + '_ {
        self.neighbor_edges(u, orientation)
            .map(|(v, _, edge_type)| (v, edge_type))
    }

    /// Returns every mutual neighbor `v` of `u` as `(v, weight of (u, v), weight of (v, u))`,
    /// summing parallel instances per direction.
    /// Undirected collections report the same weight twice.
    pub fn mutual_weights(&self, u: Node) -> impl Iterator<Item = (Node, Weight, Weight)> + '_ {
        self.weights
            .partners(u, D::effective(EdgeOrientation::Mutual))
            .map(move |partner| {
                let node = partner.node;
                if D::DIRECTED {
                    (node, summed::<W, M>(partner.out), summed::<W, M>(partner.inc))
                } else {
                    let weight = slots_of(u, partner)
                        .map(|slot| summed::<W, M>(Some(slot)))
                        .sum::<Weight>();
                    (node, weight, weight)
                }
            })
    }

    /// Returns the number of edge instances at `u`; self-loops count once
    pub fn num_edges_at(&self, u: Node, orientation: EdgeOrientation) -> NumEdges {
        self.weights
            .partners(u, D::effective(orientation))
            .map(|partner| {
                slots_of(u, partner)
                    .map(|slot| M::values::<W::Value>(slot).len() as NumEdges)
                    .sum::<NumEdges>()
            })
            .sum()
    }

    /// Returns *true* if `u` has at least one edge matching `orientation`
    pub fn has_edges(&self, u: Node, orientation: EdgeOrientation) -> bool {
        self.neighbors(u, orientation).next().is_some()
    }

    /// Nodes with at least one edge matching `orientation`
    pub fn nodes_with_edges(&self, orientation: EdgeOrientation) -> impl Iterator<Item = Node> + '_ {
        match D::effective(orientation) {
            EdgeOrientation::Out => Either::Left(self.weights.firsts_with_seconds()),
            EdgeOrientation::In => Either::Right(Either::Left(self.weights.seconds_with_firsts())),
            orientation => Either::Right(Either::Right(
                self.vertices_with_neighbors(orientation),
            )),
        }
    }

    /// Nodes without any edge
    pub fn isolated_nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.weights.isolated()
    }

    /// Iterates over every stored edge instance as `(edge, weight, type)`.
    /// Undirected edges are reported once in normalized form.
    pub fn edges(&self) -> impl Iterator<Item = (Edge, Weight, EdgeType)> + '_ {
        self.vertices().flat_map(move |u| {
            self.weights
                .seconds_of(u)
                .zip(self.types.seconds_of(u))
                .flat_map(move |((v, weights), (_, types))| {
                    M::values::<W::Value>(weights)
                        .iter()
                        .map(W::load)
                        .zip(M::values::<EdgeType>(types).iter().copied())
                        .map(move |(weight, edge_type)| (Edge(u, v), weight, edge_type))
                })
        })
    }

    /// Returns the adjacency list of the collection, the inverse of [`Edges::from_adjacency`]
    pub fn to_adjacency(&self) -> Vec<AdjacencyRow> {
        let orientation = if D::DIRECTED {
            EdgeOrientation::Out
        } else {
            EdgeOrientation::Und
        };
        self.vertices()
            .map(|u| self.neighbor_edges(u, orientation).collect_vec())
            .collect_vec()
    }

    fn instances_of(&self, a: Node, b: Node) -> Result<usize> {
        self.weights
            .values(a, b)
            .map(<[W::Value]>::len)
            .ok_or(Error::PairNotFound {
                first: a,
                second: b,
            })
    }
}

/// Slots of a partner that belong to distinct pairs.
/// A self-loop shows up on both sides of the walk but is a single pair.
fn slots_of<S>(u: Node, partner: Partner<'_, S>) -> impl Iterator<Item = &'_ S> {
    let loop_seen = partner.node == u && partner.out.is_some();
    let inc = partner.inc.filter(|_| !loop_seen);
    partner.out.into_iter().chain(inc)
}

fn summed<W: Weighting, M: Multiplicity>(slot: Option<&M::Slot<W::Value>>) -> Weight {
    slot.map_or(0.0, |slot| M::values::<W::Value>(slot).iter().map(W::load).sum())
}

impl<D: Direction, W: Weighting, M: Multiplicity> GraphNodeOrder for Edges<D, W, M> {
    fn number_of_nodes(&self) -> NumNodes {
        self.weights.len()
    }
}

impl<D: Direction, W: Weighting, M: Multiplicity> GraphEdgeOrder for Edges<D, W, M> {
    fn number_of_edges(&self) -> NumEdges {
        self.num_edges
    }
}

impl<D: Direction, W: Weighting, M: Multiplicity> GraphType for Edges<D, W, M> {
    fn kind(&self) -> GraphKind {
        GraphKind::of::<D, W, M>()
    }
}

impl<D: Direction, W: Weighting, M: Multiplicity> AdjacencyList for Edges<D, W, M> {
    fn neighbors_of(
        &self,
        u: Node,
        orientation: EdgeOrientation,
    ) -> impl Iterator<Item = Node> + '_ {
        self.neighbors(u, orientation)
    }
}

impl<D: Direction, W: Weighting, M: Multiplicity> AdjacencyTest for Edges<D, W, M> {
    fn has_edge(&self, u: Node, v: Node) -> bool {
        self.contains_edge(u, v)
    }
}
