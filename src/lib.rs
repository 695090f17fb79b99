/*!
`relgraphs` is a storage library for social-network graphs whose nodes are densely numbered and
whose edges carry a weight and a type:
- nodes are `u32` in the range `0..n`, removing a node shifts every larger node down by one,
- edges may be directed or undirected, weighted or unweighted, simple or parallel (multigraphs),
- every edge is reachable from both endpoints without scanning.

# Representation

The core building block is the [`IndexedRelation`](crate::relation::IndexedRelation): a set of
pairs `(a, b)` with a value each, stored twice, once per first element and once per second
element, both sorted. The [`AutoRelation`](crate::relation::AutoRelation) relates a single id
space to itself and is what the edge collections are made of.

### Directed vs Undirected

- In an **undirected** collection, `Edge(u, v)` is the same as `Edge(v, u)` and stored once in
  normalized form.
- In a **directed** collection, `Edge(u, v)` and `Edge(v, u)` are distinct; neighbourhoods are
  queried with an [`EdgeOrientation`](crate::edge::EdgeOrientation).

### Available Representations

See the [`repr`] module for the eight edge collections, e.g.
[`DirectedWeightedEdges`](crate::repr::DirectedWeightedEdges) or
[`UndirectedUnweightedMultiEdges`](crate::repr::UndirectedUnweightedMultiEdges), and the
[`graph`] module for [`Graph`](crate::graph::Graph), which names its nodes with arbitrary keys.

# Usage

- [`prelude`] includes definitions for nodes, edges, basic graph operations, all edge collections
  and keyed graphs,
- [`relation`] includes the underlying relations,
- [`io`] includes readers and writers for text edge lists,
- [`error`] lists every way an operation can fail; failed operations change nothing.

In most use-cases, `use relgraphs::prelude::*;` suffices for your needs.

The library logs through [`tracing`](https://docs.rs/tracing) and never installs a subscriber.
*/

pub mod edge;
pub mod error;
pub mod graph;
pub mod io;
pub mod node;
pub mod ops;
pub mod relation;
pub mod repr;
pub(crate) mod testing;

pub use error::{Error, Result};
pub use node::{Node, NumNodes};

/// `relgraphs::prelude` includes definitions for nodes and edges, all basic graph operation traits as well as all implemented representations.
pub mod prelude {
    pub use super::{edge::*, graph::*, node::*, ops::*, repr::*};
}
