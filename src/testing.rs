/// Every edge collection is checked against a simple reference model.
///
/// The model maps every (normalized) edge key to the list of its instances; after each random
/// operation the collection must report exactly the model's edges, counts and values.
macro_rules! test_edge_ops {
    ($env:ident, $edges:ident, $directed:literal, $weighted:literal, $multi:literal) => {
        #[cfg(test)]
        mod $env {
            use std::collections::BTreeMap;

            use crate::{error::Error, prelude::*};
            use itertools::Itertools;
            use rand::{Rng, SeedableRng};
            use rand_pcg::Pcg64Mcg;

            type Model = BTreeMap<(Node, Node), Vec<(Weight, EdgeType)>>;

            fn key(u: Node, v: Node) -> (Node, Node) {
                if $directed { (u, v) } else { (u.min(v), u.max(v)) }
            }

            fn stored_weight(weight: Weight) -> Weight {
                if $weighted { weight } else { DEFAULT_WEIGHT }
            }

            fn walk_orientation() -> EdgeOrientation {
                if $directed { EdgeOrientation::Out } else { EdgeOrientation::Und }
            }

            fn check_model(edges: &$edges, model: &Model, n: NumNodes) {
                assert_eq!(edges.number_of_nodes(), n);

                let expected = model
                    .iter()
                    .flat_map(|(&(u, v), instances)| {
                        instances.iter().map(move |&(w, t)| (Edge(u, v), w, t))
                    })
                    .collect_vec();
                assert_eq!(edges.number_of_edges(), expected.len() as NumEdges);
                assert_eq!(edges.edges().collect_vec(), expected);

                let incidences: NumEdges = model
                    .iter()
                    .map(|(&(u, v), instances)| {
                        instances.len() as NumEdges * if u == v { 1 } else { 2 }
                    })
                    .sum();
                let rescan: NumEdges = edges
                    .vertices()
                    .map(|u| edges.num_edges_at(u, EdgeOrientation::Und))
                    .sum();
                assert_eq!(rescan, incidences);

                for (&(u, v), instances) in model {
                    assert!(edges.contains_edge(u, v));
                    assert_eq!(
                        edges.contains_edge(v, u),
                        !$directed || model.contains_key(&(v, u))
                    );
                    assert_eq!(edges.num_edges_between(u, v), instances.len());
                    assert_eq!(edges.edge_weight(u, v), Some(instances[0].0));
                    assert_eq!(
                        edges.edge_types(u, v).collect_vec(),
                        instances.iter().map(|&(_, t)| t).collect_vec()
                    );
                }
            }

            #[test]
            fn random_edits_keep_count() {
                let rng = &mut Pcg64Mcg::seed_from_u64(3);

                for start in [2 as NumNodes, 5, 12] {
                    for _ in 0..10 {
                        let mut n = start;
                        let mut edges = <$edges>::with_nodes(n);
                        let mut model = Model::new();

                        for _ in 0..(start * 20) {
                            let u = rng.random_range(0..n);
                            let v = rng.random_range(0..n);
                            let k = key(u, v);

                            match rng.random_range(0..20) {
                                0..8 => {
                                    let w = rng.random_range(0..40) as Weight / 4.0;
                                    let t = rng.random_range(0..3);
                                    let res = edges.add_edge(u, v, w, t);
                                    if !$multi && model.contains_key(&k) {
                                        assert!(matches!(res, Err(Error::PairExists { .. })));
                                    } else {
                                        res.unwrap();
                                        model.entry(k).or_default().push((stored_weight(w), t));
                                    }
                                }
                                8..11 => {
                                    let res = edges.remove_edge(u, v);
                                    match model.get_mut(&k) {
                                        Some(instances) => {
                                            res.unwrap();
                                            instances.pop();
                                            if instances.is_empty() {
                                                model.remove(&k);
                                            }
                                        }
                                        None => assert!(res.unwrap_err().is_not_found()),
                                    }
                                }
                                11..13 => {
                                    let i = rng.random_range(0..3usize);
                                    let res = edges.remove_edge_instance(u, v, i);
                                    match model.get_mut(&k) {
                                        Some(instances) if i < instances.len() => {
                                            res.unwrap();
                                            instances.remove(i);
                                            if instances.is_empty() {
                                                model.remove(&k);
                                            }
                                        }
                                        _ => assert!(res.unwrap_err().is_not_found()),
                                    }
                                }
                                13..15 => {
                                    let res = edges.remove_edges(u, v);
                                    match model.remove(&k) {
                                        Some(instances) => assert_eq!(res.unwrap(), instances.len()),
                                        None => assert!(res.unwrap_err().is_not_found()),
                                    }
                                }
                                15..17 => {
                                    let w = rng.random_range(0..40) as Weight / 4.0;
                                    let res = edges.update_edge_weight(u, v, w);
                                    match model.get_mut(&k) {
                                        Some(instances) => {
                                            res.unwrap();
                                            instances.iter_mut().for_each(|(x, _)| *x = stored_weight(w));
                                        }
                                        None => assert!(res.unwrap_err().is_not_found()),
                                    }
                                }
                                17 => {
                                    assert_eq!(edges.add_node(), n);
                                    n += 1;
                                }
                                _ => {
                                    if n > 1 {
                                        let removed: NumEdges = model
                                            .iter()
                                            .filter(|&(&(a, b), _)| a == u || b == u)
                                            .map(|(_, instances)| instances.len() as NumEdges)
                                            .sum();
                                        assert_eq!(edges.remove_node(u).unwrap(), removed);

                                        model = model
                                            .into_iter()
                                            .filter_map(|((a, b), instances)| {
                                                let a = shifted_after_removal(a, u)?;
                                                let b = shifted_after_removal(b, u)?;
                                                Some(((a, b), instances))
                                            })
                                            .collect();
                                        n -= 1;
                                    }
                                }
                            }

                            check_model(&edges, &model, n);
                        }
                    }
                }
            }

            #[test]
            fn adjacency_round_trip() {
                let rng = &mut Pcg64Mcg::seed_from_u64(5);

                for n in [1 as NumNodes, 8, 30] {
                    for _ in 0..10 {
                        let mut keys = (0..n * 3)
                            .map(|_| key(rng.random_range(0..n), rng.random_range(0..n)))
                            .collect_vec();
                        keys.sort_unstable();
                        keys.dedup();

                        let mut rows: Vec<AdjacencyRow> = vec![Vec::new(); n as usize];
                        for (u, v) in keys {
                            let w = stored_weight(rng.random_range(1..20) as Weight);
                            let t = rng.random_range(0..4);
                            rows[u as usize].push((v, w, t));
                            if !$directed && u != v {
                                rows[v as usize].push((u, w, t));
                            }
                        }
                        rows.iter_mut()
                            .for_each(|row| row.sort_by_key(|&(v, _, _)| v));

                        let edges = <$edges>::from_adjacency(rows.clone()).unwrap();
                        assert_eq!(edges.to_adjacency(), rows);

                        for u in 0..n {
                            assert_eq!(
                                edges.neighbors(u, walk_orientation()).collect_vec(),
                                rows[u as usize].iter().map(|&(v, _, _)| v).collect_vec()
                            );
                        }
                    }
                }
            }

            #[test]
            fn bulk_load_with_duplicates() {
                let rows = vec![
                    vec![(1, 2.0, 0), (1, 3.0, 1)],
                    vec![(0, 2.0, 0), (0, 3.0, 1)],
                ];
                let res = <$edges>::from_adjacency(rows);

                if $multi {
                    let edges = res.unwrap();
                    assert_eq!(edges.num_edges_between(0, 1), 2);
                    assert_eq!(edges.edge_types(0, 1).collect_vec(), vec![0, 1]);
                    assert_eq!(
                        edges.number_of_edges(),
                        if $directed { 4 } else { 2 }
                    );
                } else {
                    assert!(matches!(res, Err(Error::PairExists { .. })));
                }
            }

            #[test]
            fn removal_is_idempotent() {
                let mut edges = <$edges>::with_nodes(3);
                edges.add_edge(0, 2, 1.5, 0).unwrap();
                edges.add_edge(1, 2, 1.5, 0).unwrap();

                edges.remove_edge(0, 2).unwrap();
                assert_eq!(edges.number_of_edges(), 1);
                assert!(edges.remove_edge(0, 2).unwrap_err().is_not_found());
                assert!(edges.remove_edges(0, 2).unwrap_err().is_not_found());
                assert_eq!(edges.number_of_edges(), 1);
                assert!(!edges.contains_edge(0, 2));
            }

            #[test]
            fn kind_matches_policies() {
                let edges = <$edges>::new();
                assert_eq!(edges.is_directed(), $directed);
                assert_eq!(edges.is_weighted(), $weighted);
                assert_eq!(edges.is_multigraph(), $multi);
                assert!(edges.is_empty());
            }
        }
    };
}

pub(crate) use test_edge_ops;
