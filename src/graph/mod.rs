/*!
# Keyed Graphs

A [`Graph`] names its nodes with arbitrary identifiers `K` (user ids, strings, ...) and stores
the edges in one of the dense [`Edges`] collections. A [`NodeIndex`] translates between the
identifiers and the dense positions `0..n`.

Removing a node removes it from the edge collection and from the index; both shift every
position above the removed one down by one, so identifiers stay attached to their edges.

Mutators referring to an unknown identifier fail with [`Error::UnknownNode`]; scalar queries
return `None` and neighbourhood queries are empty.
*/

use itertools::Itertools;
use tracing::debug;

use crate::{
    edge::*,
    error::{Error, Result},
    node::{Node, NumNodes},
    ops::*,
    relation::{Multi, Multiplicity, Single},
    repr::*,
};

mod node_index;

pub use node_index::*;

/// A graph whose nodes are identified by keys of type `K`
#[derive(Clone)]
pub struct Graph<K: NodeKey, D: Direction, W: Weighting, M: Multiplicity = Single> {
    index: NodeIndex<K>,
    edges: Edges<D, W, M>,
}

pub type DirectedWeightedGraph<K> = Graph<K, Directed, Weighted, Single>;
pub type DirectedWeightedMultiGraph<K> = Graph<K, Directed, Weighted, Multi>;
pub type DirectedUnweightedGraph<K> = Graph<K, Directed, Unweighted, Single>;
pub type DirectedUnweightedMultiGraph<K> = Graph<K, Directed, Unweighted, Multi>;
pub type UndirectedWeightedGraph<K> = Graph<K, Undirected, Weighted, Single>;
pub type UndirectedWeightedMultiGraph<K> = Graph<K, Undirected, Weighted, Multi>;
pub type UndirectedUnweightedGraph<K> = Graph<K, Undirected, Unweighted, Single>;
pub type UndirectedUnweightedMultiGraph<K> = Graph<K, Undirected, Unweighted, Multi>;

impl<K: NodeKey, D: Direction, W: Weighting, M: Multiplicity> Default for Graph<K, D, W, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: NodeKey, D: Direction, W: Weighting, M: Multiplicity> Graph<K, D, W, M> {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self {
            index: NodeIndex::new(),
            edges: Edges::new(),
        }
    }

    /// Creates a graph with the given nodes (in this order) and no edges
    pub fn with_nodes(keys: impl IntoIterator<Item = K>) -> Result<Self> {
        let mut graph = Self::new();
        for key in keys {
            graph.add_node(key)?;
        }
        Ok(graph)
    }

    /// Read access to the underlying dense edge collection
    pub fn edge_collection(&self) -> &Edges<D, W, M> {
        &self.edges
    }

    /// Read access to the identifier mapping
    pub fn node_index(&self) -> &NodeIndex<K> {
        &self.index
    }

    /// Adds a node and returns its position.
    /// Fails with [`Error::DuplicateNode`] if `key` is already present.
    pub fn add_node(&mut self, key: K) -> Result<Node> {
        if self.index.contains(&key) {
            return Err(Error::DuplicateNode(format!("{key:?}")));
        }

        let pos = self.edges.add_node();
        let index_pos = self.index.insert(key);
        debug_assert_eq!(index_pos, Some(pos));
        Ok(pos)
    }

    /// Adds an edge instance `(u, v)`.
    ///
    /// If `insert_missing` is set, unknown endpoints are added as new nodes first; otherwise
    /// they are reported as [`Error::UnknownNode`]. A rejected edge leaves the graph unchanged.
    pub fn add_edge(
        &mut self,
        u: K,
        v: K,
        weight: Weight,
        edge_type: EdgeType,
        insert_missing: bool,
    ) -> Result<()> {
        if !insert_missing {
            let (a, b) = self.positions(&u, &v)?;
            return self.edges.add_edge(a, b, weight, edge_type);
        }

        if let (Some(a), Some(b)) = (self.index_of(&u), self.index_of(&v)) {
            return self.edges.add_edge(a, b, weight, edge_type);
        }

        let a = self.position_or_insert(u);
        let b = self.position_or_insert(v);
        self.edges.add_edge(a, b, weight, edge_type)
    }

    /// Adds `(u, v)` with [`DEFAULT_WEIGHT`] and [`DEFAULT_TYPE`], inserting missing endpoints
    pub fn add_default_edge(&mut self, u: K, v: K) -> Result<()> {
        self.add_edge(u, v, DEFAULT_WEIGHT, DEFAULT_TYPE, true)
    }

    /// Removes the most recently added instance of `(u, v)`
    pub fn remove_edge(&mut self, u: &K, v: &K) -> Result<()> {
        let (a, b) = self.positions(u, v)?;
        self.edges.remove_edge(a, b)
    }

    /// Removes the `index`-th parallel instance of `(u, v)`
    pub fn remove_edge_instance(&mut self, u: &K, v: &K, index: usize) -> Result<()> {
        let (a, b) = self.positions(u, v)?;
        self.edges.remove_edge_instance(a, b, index)
    }

    /// Removes every instance of `(u, v)` and returns how many were removed
    pub fn remove_edges(&mut self, u: &K, v: &K) -> Result<usize> {
        let (a, b) = self.positions(u, v)?;
        self.edges.remove_edges(a, b)
    }

    /// Removes a node with all its edges and returns the number of removed edge instances.
    /// Every node behind it moves one position to the front.
    pub fn remove_node(&mut self, key: &K) -> Result<NumEdges> {
        let pos = self.position(key)?;
        let removed = self.edges.remove_node(pos)?;
        self.index.remove(pos);
        debug!(pos, removed, nodes = self.edges.number_of_nodes(), "removed keyed node");
        Ok(removed)
    }

    /// Sets the weight of every instance of `(u, v)`
    pub fn update_edge_weight(&mut self, u: &K, v: &K, weight: Weight) -> Result<()> {
        let (a, b) = self.positions(u, v)?;
        self.edges.update_edge_weight(a, b, weight)
    }

    /// Sets the type of every instance of `(u, v)`
    pub fn update_edge_type(&mut self, u: &K, v: &K, edge_type: EdgeType) -> Result<()> {
        let (a, b) = self.positions(u, v)?;
        self.edges.update_edge_type(a, b, edge_type)
    }

    pub fn contains_node(&self, key: &K) -> bool {
        self.index.contains(key)
    }

    pub fn contains_edge(&self, u: &K, v: &K) -> bool {
        self.positions(u, v)
            .is_ok_and(|(a, b)| self.edges.contains_edge(a, b))
    }

    /// Weight of the first instance of `(u, v)`
    pub fn edge_weight(&self, u: &K, v: &K) -> Option<Weight> {
        let (a, b) = self.positions(u, v).ok()?;
        self.edges.edge_weight(a, b)
    }

    /// Type of the first instance of `(u, v)`
    pub fn edge_type(&self, u: &K, v: &K) -> Option<EdgeType> {
        let (a, b) = self.positions(u, v).ok()?;
        self.edges.edge_type(a, b)
    }

    /// Number of parallel instances of `(u, v)`; `0` if an endpoint is unknown
    pub fn num_edges_between(&self, u: &K, v: &K) -> usize {
        self.positions(u, v)
            .map_or(0, |(a, b)| self.edges.num_edges_between(a, b))
    }

    /// Number of distinct neighbours of `key` along `orientation`
    pub fn degree(&self, key: &K, orientation: EdgeOrientation) -> Option<NumNodes> {
        let u = self.index_of(key)?;
        Some(self.edges.degree_of(u, orientation))
    }

    /// Number of edge instances at `key` along `orientation`; self-loops count once
    pub fn num_edges_at(&self, key: &K, orientation: EdgeOrientation) -> Option<NumEdges> {
        let u = self.index_of(key)?;
        Some(self.edges.num_edges_at(u, orientation))
    }

    /// Returns *true* if `u` and `v` are connected in both directions.
    /// In undirected graphs this is the same as [`Graph::contains_edge`].
    pub fn is_mutual(&self, u: &K, v: &K) -> bool {
        self.contains_edge(u, v) && self.contains_edge(v, u)
    }

    /// Distinct neighbours of `key` in position order
    pub fn neighborhood<'a>(
        &'a self,
        key: &K,
        orientation: EdgeOrientation,
    ) -> impl Iterator<Item = &'a K> + use<'a, K, D, W, M> {
        self.index_of(key)
            .into_iter()
            .flat_map(move |u| self.edges.neighbors(u, orientation))
            .filter_map(move |v| self.index.key_at(v))
    }

    /// Distinct neighbours of `key` with the summed weight of the edges to them
    pub fn neighborhood_weights<'a>(
        &'a self,
        key: &K,
        orientation: EdgeOrientation,
    ) -> impl Iterator<Item = (&'a K, Weight)> + use<'a, K, D, W, M> {
        self.index_of(key)
            .into_iter()
            .flat_map(move |u| self.edges.neighbor_weights(u, orientation))
            .filter_map(move |(v, weight)| Some((self.index.key_at(v)?, weight)))
    }

    /// One `(neighbour, weight, type)` per edge instance at `key`
    pub fn neighborhood_edges<'a>(
        &'a self,
        key: &K,
        orientation: EdgeOrientation,
    ) -> impl Iterator<Item = (&'a K, Weight, EdgeType)> + use<'a, K, D, W, M> {
        self.index_of(key)
            .into_iter()
            .flat_map(move |u| self.edges.neighbor_edges(u, orientation))
            .filter_map(move |(v, weight, edge_type)| Some((self.index.key_at(v)?, weight, edge_type)))
    }

    /// One `(neighbour, type)` per edge instance at `key`
    pub fn neighborhood_types<'a>(
        &'a self,
        key: &K,
        orientation: EdgeOrientation,
    ) -> impl Iterator<Item = (&'a K, EdgeType)> + use<'a, K, D, W, M> {
        self.index_of(key)
            .into_iter()
            .flat_map(move |u| self.edges.neighbor_types(u, orientation))
            .filter_map(move |(v, edge_type)| Some((self.index.key_at(v)?, edge_type)))
    }

    /// Mutual neighbours of `key` with the weights towards them and back, see
    /// [`Edges::mutual_weights`]
    pub fn mutual_weights<'a>(
        &'a self,
        key: &K,
    ) -> impl Iterator<Item = (&'a K, Weight, Weight)> + use<'a, K, D, W, M> {
        self.index_of(key)
            .into_iter()
            .flat_map(move |u| self.edges.mutual_weights(u))
            .filter_map(move |(v, out, inc)| Some((self.index.key_at(v)?, out, inc)))
    }

    /// Nodes without any edge
    pub fn isolated_nodes(&self) -> impl Iterator<Item = &K> + '_ {
        self.edges
            .isolated_nodes()
            .filter_map(move |u| self.index.key_at(u))
    }

    /// Nodes with at least one edge matching `orientation`
    pub fn nodes_with_edges(&self, orientation: EdgeOrientation) -> impl Iterator<Item = &K> + '_ {
        self.edges
            .nodes_with_edges(orientation)
            .filter_map(move |u| self.index.key_at(u))
    }

    /// All node identifiers in position order
    pub fn nodes(&self) -> impl Iterator<Item = &K> + '_ {
        self.index.keys()
    }

    /// Current position of `key`
    pub fn index_of(&self, key: &K) -> Option<Node> {
        self.index.position_of(key)
    }

    /// Identifier at position `pos`
    pub fn node_at(&self, pos: Node) -> Option<&K> {
        self.index.key_at(pos)
    }

    /// Every edge instance as `(u, v, weight, type)`; undirected edges are reported once
    pub fn edges(&self) -> impl Iterator<Item = (&K, &K, Weight, EdgeType)> + '_ {
        self.edges.edges().filter_map(move |(Edge(u, v), weight, edge_type)| {
            Some((self.index.key_at(u)?, self.index.key_at(v)?, weight, edge_type))
        })
    }

    /// Dense `n x n` matrix whose entry `[u][v]` is the summed weight of the edges from `u` to `v`
    /// along `orientation`, rows and columns in position order
    pub fn adjacency_matrix(&self, orientation: EdgeOrientation) -> Vec<Vec<Weight>> {
        let n = self.edges.len();
        self.edges
            .vertices()
            .map(|u| {
                let mut row = vec![0.0; n];
                for (v, weight) in self.edges.neighbor_weights(u, orientation) {
                    row[v as usize] = weight;
                }
                row
            })
            .collect_vec()
    }

    fn position(&self, key: &K) -> Result<Node> {
        self.index_of(key)
            .ok_or_else(|| Error::UnknownNode(format!("{key:?}")))
    }

    fn positions(&self, u: &K, v: &K) -> Result<(Node, Node)> {
        Ok((self.position(u)?, self.position(v)?))
    }

    fn position_or_insert(&mut self, key: K) -> Node {
        match self.index_of(&key) {
            Some(pos) => pos,
            None => {
                let pos = self.edges.add_node();
                self.index.insert(key);
                pos
            }
        }
    }
}

impl<K: NodeKey, D: Direction, W: Weighting, M: Multiplicity> GraphNodeOrder for Graph<K, D, W, M> {
    fn number_of_nodes(&self) -> NumNodes {
        self.edges.number_of_nodes()
    }
}

impl<K: NodeKey, D: Direction, W: Weighting, M: Multiplicity> GraphEdgeOrder for Graph<K, D, W, M> {
    fn number_of_edges(&self) -> NumEdges {
        self.edges.number_of_edges()
    }
}

impl<K: NodeKey, D: Direction, W: Weighting, M: Multiplicity> GraphType for Graph<K, D, W, M> {
    fn kind(&self) -> GraphKind {
        self.edges.kind()
    }
}

impl<K: NodeKey, D: Direction, W: Weighting, M: Multiplicity> AdjacencyList for Graph<K, D, W, M> {
    fn neighbors_of(
        &self,
        u: Node,
        orientation: EdgeOrientation,
    ) -> impl Iterator<Item = Node> + '_ {
        self.edges.neighbors(u, orientation)
    }
}

impl<K: NodeKey, D: Direction, W: Weighting, M: Multiplicity> AdjacencyTest for Graph<K, D, W, M> {
    fn has_edge(&self, u: Node, v: Node) -> bool {
        self.edges.contains_edge(u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use EdgeOrientation::*;

    #[test]
    fn directed_removal_renumbers() {
        let mut graph = DirectedWeightedGraph::with_nodes([0u32, 1, 2]).unwrap();
        graph.add_edge(0, 1, 1.0, 0, false).unwrap();
        graph.add_edge(1, 2, 2.0, 0, false).unwrap();
        assert_eq!(graph.degree(&0, Out), Some(1));
        graph.add_edge(0, 2, 3.0, 0, false).unwrap();

        assert_eq!(graph.number_of_edges(), 3);
        assert_eq!(graph.neighborhood(&0, Out).copied().collect_vec(), vec![1, 2]);
        assert_eq!(graph.degree(&0, Out), Some(2));
        assert_eq!(graph.edge_weight(&1, &2), Some(2.0));

        assert_eq!(graph.remove_node(&1).unwrap(), 2);
        assert_eq!(graph.number_of_nodes(), 2);
        assert_eq!(graph.number_of_edges(), 1);
        assert_eq!(graph.nodes().copied().collect_vec(), vec![0, 2]);
        assert_eq!(graph.index_of(&2), Some(1));
        assert_eq!(graph.node_at(1), Some(&2));
        assert_eq!(graph.neighborhood(&0, Out).copied().collect_vec(), vec![2]);
        assert_eq!(graph.edge_weight(&0, &2), Some(3.0));
        assert_eq!(graph.edge_collection().neighbors(0, Out).collect_vec(), vec![1]);
    }

    #[test]
    fn undirected_parallel_edges() {
        let mut graph = UndirectedUnweightedMultiGraph::new();
        graph.add_default_edge("a", "b").unwrap();
        graph.add_default_edge("b", "a").unwrap();
        assert_eq!(graph.number_of_nodes(), 2);
        assert_eq!(graph.number_of_edges(), 2);
        assert_eq!(graph.num_edges_between(&"a", &"b"), 2);

        graph.remove_edge_instance(&"a", &"b", 0).unwrap();
        assert_eq!(graph.number_of_edges(), 1);
        assert!(graph.contains_edge(&"b", &"a"));

        graph.remove_edge(&"a", &"b").unwrap();
        assert!(!graph.contains_edge(&"a", &"b"));
        assert_eq!(graph.number_of_edges(), 0);
        assert_eq!(graph.isolated_nodes().copied().collect_vec(), vec!["a", "b"]);
    }

    #[test]
    fn unknown_nodes() {
        let mut graph = UndirectedWeightedGraph::with_nodes(["x", "y"]).unwrap();
        graph.add_edge("x", "y", 2.5, 1, false).unwrap();

        assert!(matches!(
            graph.add_edge("x", "z", 1.0, 0, false),
            Err(Error::UnknownNode(_))
        ));
        assert!(!graph.contains_node(&"z"));
        assert!(matches!(graph.remove_node(&"z"), Err(Error::UnknownNode(_))));
        assert!(graph.remove_edge(&"x", &"z").unwrap_err().is_not_found());
        assert!(matches!(graph.add_node("x"), Err(Error::DuplicateNode(_))));

        assert_eq!(graph.edge_weight(&"x", &"z"), None);
        assert_eq!(graph.degree(&"z", Und), None);
        assert_eq!(graph.neighborhood(&"z", Und).count(), 0);
        assert_eq!(graph.num_edges_between(&"z", &"x"), 0);
        assert!(!graph.contains_edge(&"z", &"x"));
        assert_eq!(graph.number_of_edges(), 1);
    }

    #[test]
    fn rejected_edge_inserts_no_nodes() {
        let mut graph = DirectedUnweightedGraph::new();
        graph.add_default_edge(1u64, 2).unwrap();
        assert!(matches!(
            graph.add_default_edge(1, 2),
            Err(Error::PairExists { first: 0, second: 1 })
        ));
        assert_eq!(graph.number_of_nodes(), 2);

        graph.add_edge(2, 7, 4.0, 3, true).unwrap();
        assert_eq!(graph.number_of_nodes(), 3);
        assert_eq!(graph.edge_weight(&2, &7), Some(DEFAULT_WEIGHT));
        assert_eq!(graph.edge_type(&2, &7), Some(3));
        assert!(!graph.is_mutual(&2, &7));
    }

    #[test]
    fn types_and_mutual_weights() {
        let mut graph = DirectedWeightedMultiGraph::new();
        graph.add_edge("u", "v", 1.0, 1, true).unwrap();
        graph.add_edge("u", "v", 2.0, 2, true).unwrap();
        graph.add_edge("v", "u", 0.5, 3, true).unwrap();
        graph.add_edge("u", "w", 4.0, 4, true).unwrap();

        assert_eq!(
            graph.neighborhood_types(&"u", Out).collect_vec(),
            vec![(&"v", 1), (&"v", 2), (&"w", 4)]
        );
        assert_eq!(graph.neighborhood_types(&"u", In).collect_vec(), vec![(&"v", 3)]);
        assert_eq!(graph.mutual_weights(&"u").collect_vec(), vec![(&"v", 3.0, 0.5)]);
        assert_eq!(graph.mutual_weights(&"v").collect_vec(), vec![(&"u", 0.5, 3.0)]);
        assert_eq!(graph.mutual_weights(&"x").count(), 0);

        graph.update_edge_type(&"u", &"v", 9).unwrap();
        assert_eq!(graph.edge_type(&"u", &"v"), Some(9));
        assert_eq!(graph.edge_collection().edge_types(0, 1).collect_vec(), vec![9, 9]);
        assert_eq!(graph.edge_type(&"v", &"u"), Some(3));
        assert!(graph.update_edge_type(&"w", &"u", 1).unwrap_err().is_not_found());
        assert!(matches!(
            graph.update_edge_type(&"u", &"x", 1),
            Err(Error::UnknownNode(_))
        ));
    }

    #[test]
    fn keyed_queries_follow_renumbering() {
        let mut graph = UndirectedWeightedMultiGraph::new();
        for (u, v, w) in [("a", "b", 1.0), ("b", "c", 2.0), ("c", "d", 3.0), ("b", "c", 0.5)] {
            graph.add_edge(u, v, w, 0, true).unwrap();
        }
        graph.add_node("e").unwrap();

        assert_eq!(graph.remove_node(&"a").unwrap(), 1);
        assert_eq!(graph.nodes().copied().collect_vec(), vec!["b", "c", "d", "e"]);
        assert_eq!(
            graph.neighborhood_weights(&"c", Und).collect_vec(),
            vec![(&"b", 2.5), (&"d", 3.0)]
        );
        assert_eq!(
            graph.neighborhood_edges(&"b", Out).collect_vec(),
            vec![(&"c", 2.0, 0), (&"c", 0.5, 0)]
        );
        assert_eq!(graph.num_edges_at(&"c", Und), Some(3));
        assert_eq!(graph.isolated_nodes().copied().collect_vec(), vec!["e"]);
        assert_eq!(graph.nodes_with_edges(Und).copied().collect_vec(), vec!["b", "c", "d"]);
        assert_eq!(
            graph.edges().collect_vec(),
            vec![(&"b", &"c", 2.0, 0), (&"b", &"c", 0.5, 0), (&"c", &"d", 3.0, 0)]
        );

        graph.update_edge_weight(&"d", &"c", 1.0).unwrap();
        assert_eq!(
            graph.adjacency_matrix(Und),
            vec![
                vec![0.0, 2.5, 0.0, 0.0],
                vec![2.5, 0.0, 1.0, 0.0],
                vec![0.0, 1.0, 0.0, 0.0],
                vec![0.0, 0.0, 0.0, 0.0],
            ]
        );
    }
}
