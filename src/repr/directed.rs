/*!
# Directed Edge Collections

In a directed collection the edge `(u, v)` leaves `u` and enters `v`; it is stored as the pair
`(u, v)` of both relations. Out-neighbours of `u` are read from the first view, in-neighbours from
the second view, so both directions are answered without scanning.

## Orientation

- [`EdgeOrientation::Out`]: targets of edges leaving `u`,
- [`EdgeOrientation::In`]: sources of edges entering `u`,
- [`EdgeOrientation::Und`]: union of both,
- [`EdgeOrientation::Mutual`]: nodes connected in both directions.
*/

use crate::{
    edge::EdgeOrientation,
    node::Node,
    relation::{Multi, Single},
    testing::test_edge_ops,
};

use super::*;

/// Edges have a source and a target
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Directed;

impl Direction for Directed {
    const DIRECTED: bool = true;

    #[inline]
    fn key(u: Node, v: Node) -> (Node, Node) {
        (u, v)
    }

    #[inline]
    fn effective(orientation: EdgeOrientation) -> EdgeOrientation {
        orientation
    }
}

/// Directed simple graph with `f64` weights
pub type DirectedWeightedEdges = Edges<Directed, Weighted, Single>;

/// Directed multigraph with `f64` weights per parallel edge
pub type DirectedWeightedMultiEdges = Edges<Directed, Weighted, Multi>;

/// Directed simple graph without weights
pub type DirectedUnweightedEdges = Edges<Directed, Unweighted, Single>;

/// Directed multigraph without weights
pub type DirectedUnweightedMultiEdges = Edges<Directed, Unweighted, Multi>;

test_edge_ops!(directed_weighted, DirectedWeightedEdges, true, true, false);
test_edge_ops!(directed_weighted_multi, DirectedWeightedMultiEdges, true, true, true);
test_edge_ops!(directed_unweighted, DirectedUnweightedEdges, true, false, false);
test_edge_ops!(directed_unweighted_multi, DirectedUnweightedMultiEdges, true, false, true);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{edge::*, ops::*};
    use itertools::Itertools;

    use EdgeOrientation::*;

    fn sample() -> DirectedWeightedEdges {
        // 0 -> 1, 1 -> 0, 0 -> 2, 3 -> 0, 2 -> 2
        let mut edges = DirectedWeightedEdges::with_nodes(5);
        edges.add_edge(0, 1, 1.0, 0).unwrap();
        edges.add_edge(1, 0, 0.5, 1).unwrap();
        edges.add_edge(0, 2, 2.0, 0).unwrap();
        edges.add_edge(3, 0, 4.0, 2).unwrap();
        edges.add_edge(2, 2, 8.0, 0).unwrap();
        edges
    }

    #[test]
    fn neighbors_by_orientation() {
        let edges = sample();

        assert_eq!(edges.neighbors(0, Out).collect_vec(), vec![1, 2]);
        assert_eq!(edges.neighbors(0, In).collect_vec(), vec![1, 3]);
        assert_eq!(edges.neighbors(0, Und).collect_vec(), vec![1, 2, 3]);
        assert_eq!(edges.neighbors(0, Mutual).collect_vec(), vec![1]);

        assert_eq!(edges.degree_of(0, Out), 2);
        assert_eq!(edges.degree_of(0, Und), 3);
        assert_eq!(edges.neighbors(4, Und).count(), 0);
        assert_eq!(edges.neighbors(9, Und).count(), 0);
    }

    #[test]
    fn weights_sum_over_directions() {
        let edges = sample();

        assert_eq!(
            edges.neighbor_weights(0, Und).collect_vec(),
            vec![(1, 1.5), (2, 2.0), (3, 4.0)]
        );
        assert_eq!(edges.neighbor_weights(0, Out).collect_vec(), vec![(1, 1.0), (2, 2.0)]);
        assert_eq!(edges.neighbor_weights(0, Mutual).collect_vec(), vec![(1, 1.5)]);

        assert_eq!(
            edges.neighbor_edges(0, Und).collect_vec(),
            vec![(1, 1.0, 0), (1, 0.5, 1), (2, 2.0, 0), (3, 4.0, 2)]
        );
        assert_eq!(edges.neighbor_types(0, In).collect_vec(), vec![(1, 1), (3, 2)]);
    }

    #[test]
    fn mutual_weights_keep_directions() {
        let edges = sample();

        assert_eq!(edges.mutual_weights(0).collect_vec(), vec![(1, 1.0, 0.5)]);
        assert_eq!(edges.mutual_weights(1).collect_vec(), vec![(0, 0.5, 1.0)]);
        assert_eq!(edges.mutual_weights(2).collect_vec(), vec![(2, 8.0, 8.0)]);
        assert_eq!(edges.mutual_weights(3).count(), 0);
    }

    #[test]
    fn adjacency_tests() {
        let edges = sample();

        assert_eq!(edges.has_neighbors(0, [1, 2, 3]), [true, true, false]);
        assert_eq!(edges.has_neighbors(3, [0]), [true]);
        assert!(!edges.is_singleton_graph());
        assert!(DirectedWeightedEdges::with_nodes(3).is_singleton_graph());
    }

    #[test]
    fn from_edge_sequences() {
        let pairs: [(Node, Node); 2] = [(0, 1), (1, 2)];
        let edges = DirectedWeightedEdges::from_edges(
            3,
            pairs.iter().map(|pair| (pair, 2.0, 1)),
        )
        .unwrap();
        assert_eq!(edges.number_of_edges(), 2);
        assert_eq!(edges.edge_type(1, 2), Some(1));

        let listed = edges.edges().map(|(edge, _, _)| edge).collect_vec();
        let copy = DirectedWeightedEdges::from_edges(3, listed.iter().map(|e| (e, 1.0, 0))).unwrap();
        assert!(copy.contains_edge(0, 1) && copy.contains_edge(1, 2));

        let instances: [((Node, Node), Weight, EdgeType); 2] = [((0, 1), 1.0, 0), ((0, 1), 1.0, 5)];
        let tuples = DirectedUnweightedMultiEdges::from_edges(2, instances).unwrap();
        assert_eq!(tuples.edge_types(0, 1).collect_vec(), vec![0, 5]);

        assert!(matches!(
            DirectedWeightedEdges::from_edges(2, [(Edge(0, 1), 1.0, 0), (Edge(0, 1), 1.0, 0)]),
            Err(crate::error::Error::PairExists { first: 0, second: 1 })
        ));
    }

    #[test]
    fn self_loops_count_once() {
        let edges = sample();

        assert_eq!(edges.neighbors(2, Und).collect_vec(), vec![0, 2]);
        assert_eq!(edges.num_edges_at(2, Und), 2);
        assert_eq!(edges.num_edges_at(2, Out), 1);
        assert_eq!(edges.num_edges_at(2, In), 2);
        assert_eq!(edges.neighbor_weights(2, Und).collect_vec(), vec![(0, 2.0), (2, 8.0)]);
        assert!(edges.has_self_loop(2));
    }

    #[test]
    fn direction_is_kept() {
        let mut edges = sample();

        assert!(edges.contains_edge(0, 2));
        assert!(!edges.contains_edge(2, 0));
        assert!(edges.has_bidirected_edge(0, 1));
        assert_eq!(edges.edge_weight(1, 0), Some(0.5));
        assert_eq!(edges.edge_weight(2, 0), None);

        edges.update_edge_weight(0, 1, 3.0).unwrap();
        assert_eq!(edges.edge_weight(0, 1), Some(3.0));
        assert_eq!(edges.edge_weight(1, 0), Some(0.5));
        assert!(edges.update_edge_type(2, 0, 1).unwrap_err().is_not_found());
    }

    #[test]
    fn nodes_with_edges_by_orientation() {
        let edges = sample();

        assert_eq!(edges.nodes_with_edges(Out).collect_vec(), vec![0, 1, 2, 3]);
        assert_eq!(edges.nodes_with_edges(In).collect_vec(), vec![0, 1, 2]);
        assert_eq!(edges.nodes_with_edges(Mutual).collect_vec(), vec![0, 1, 2]);
        assert_eq!(edges.isolated_nodes().collect_vec(), vec![4]);
        assert_eq!(edges.degree_distribution(Out), vec![(0, 1), (1, 3), (2, 1)]);
        assert_eq!(edges.max_degree(Und), 3);
    }

    #[test]
    fn remove_node_shifts_ids() {
        let mut edges = sample();

        // 0 -> 1, 1 -> 0, 3 -> 0 and 0 -> 2
        assert_eq!(edges.remove_node(0).unwrap(), 4);
        assert_eq!(edges.number_of_nodes(), 4);
        assert_eq!(edges.number_of_edges(), 1);
        assert_eq!(
            edges.edges().collect_vec(),
            vec![(Edge(1, 1), 8.0, 0)]
        );
        assert!(edges.remove_node(4).is_err());
    }

    #[test]
    fn parallel_instances() {
        let mut edges = DirectedUnweightedMultiEdges::with_nodes(2);
        edges.add_edge(0, 1, 5.0, 1).unwrap();
        edges.add_edge(0, 1, 5.0, 2).unwrap();
        edges.add_edge(0, 1, 5.0, 3).unwrap();
        edges.add_edge(1, 0, 5.0, 4).unwrap();

        assert_eq!(edges.number_of_edges(), 4);
        assert_eq!(edges.num_edges_between(0, 1), 3);
        assert_eq!(edges.edge_weights(0, 1).collect_vec(), vec![1.0; 3]);
        assert_eq!(edges.neighbor_weights(0, Und).collect_vec(), vec![(1, 4.0)]);

        edges.remove_edge_instance(0, 1, 1).unwrap();
        assert_eq!(edges.edge_types(0, 1).collect_vec(), vec![1, 3]);

        edges.update_edge_type_at(0, 1, 1, 7).unwrap();
        assert_eq!(edges.edge_types(0, 1).collect_vec(), vec![1, 7]);

        assert_eq!(edges.remove_edges(0, 1).unwrap(), 2);
        assert_eq!(edges.number_of_edges(), 1);
        assert_eq!(edges.neighbors(0, Und).collect_vec(), vec![1]);
    }
}
