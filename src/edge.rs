use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

use crate::Node;

/// An edge is defined by two nodes/endpoints.
/// It is up to the collection whether an Edge is directed or not.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(pub Node, pub Node);

/// Parallel edges in multigraphs quickly exceed `2^32`, so edges are counted with `u64`.
pub type NumEdges = u64;

/// Weight attached to an edge
pub type Weight = f64;

/// Weight reported by unweighted collections and used by default when adding edges
pub const DEFAULT_WEIGHT: Weight = 1.0;

/// Type (label) attached to an edge
pub type EdgeType = i32;

/// Type used when the caller does not provide one
pub const DEFAULT_TYPE: EdgeType = 0;

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

impl Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl Edge {
    /// Normalizes the edge such that the endpoint with smaller value comes first
    pub fn normalized(&self) -> Self {
        Edge(self.0.min(self.1), self.0.max(self.1))
    }

    /// Returns true if the endpoint with smaller index comes first
    pub fn is_normalized(&self) -> bool {
        self.0 <= self.1
    }

    /// Returns true if both endpoints are equal
    pub fn is_loop(&self) -> bool {
        self.0 == self.1
    }

    /// Reverses the edge by switching the endpoints
    pub fn reverse(&self) -> Self {
        Edge(self.1, self.0)
    }
}

impl From<(Node, Node)> for Edge {
    fn from(value: (Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&(Node, Node)> for Edge {
    fn from(value: &(Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&Edge> for Edge {
    fn from(value: &Edge) -> Self {
        *value
    }
}

/// Which edges around a node a neighbourhood query considers.
///
/// For a node `u` in a directed collection:
/// - `Out`: nodes `v` with an edge `(u, v)`,
/// - `In`: nodes `v` with an edge `(v, u)`,
/// - `Und`: union of both,
/// - `Mutual`: nodes with edges in both directions.
///
/// Undirected collections answer every orientation like `Und`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeOrientation {
    In,
    Out,
    #[default]
    Und,
    Mutual,
}

impl EdgeOrientation {
    /// Returns the orientation seen from the other endpoint
    pub fn invert(self) -> Self {
        match self {
            EdgeOrientation::In => EdgeOrientation::Out,
            EdgeOrientation::Out => EdgeOrientation::In,
            other => other,
        }
    }

    /// All orientations, in declaration order
    pub const ALL: [EdgeOrientation; 4] = [
        EdgeOrientation::In,
        EdgeOrientation::Out,
        EdgeOrientation::Und,
        EdgeOrientation::Mutual,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_and_reverse() {
        assert_eq!(Edge(3, 1).normalized(), Edge(1, 3));
        assert!(Edge(1, 3).is_normalized());
        assert!(!Edge(3, 1).is_normalized());
        assert_eq!(Edge(3, 1).reverse(), Edge(1, 3));
        assert!(Edge(2, 2).is_loop());
        assert_eq!(format!("{:?}", Edge(4, 5)), "(4,5)");
    }

    #[test]
    fn orientation_inversion() {
        assert_eq!(EdgeOrientation::In.invert(), EdgeOrientation::Out);
        assert_eq!(EdgeOrientation::Out.invert(), EdgeOrientation::In);
        assert_eq!(EdgeOrientation::Und.invert(), EdgeOrientation::Und);
        assert_eq!(EdgeOrientation::Mutual.invert(), EdgeOrientation::Mutual);
    }

    #[test]
    fn orientation_names_for_config_files() {
        let parsed: EdgeOrientation = serde_json::from_str("\"mutual\"").unwrap();
        assert_eq!(parsed, EdgeOrientation::Mutual);
        assert_eq!(serde_json::to_string(&EdgeOrientation::Out).unwrap(), "\"out\"");
    }
}
