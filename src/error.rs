use std::io;

use thiserror::Error;

use crate::{Node, NumNodes, repr::GraphKind};

pub type Result<T> = std::result::Result<T, Error>;

/// Every way an operation on a relation, edge collection or graph can fail.
///
/// Failed operations never leave a structure partially modified.
#[derive(Debug, Error)]
pub enum Error {
    #[error("id {id} is out of range for a space of {len} ids")]
    OutOfRange { id: Node, len: NumNodes },
    #[error("pair ({first},{second}) is already present")]
    PairExists { first: Node, second: Node },
    #[error("pair ({first},{second}) is not present")]
    PairNotFound { first: Node, second: Node },
    #[error("pair ({first},{second}) holds {count} value(s), there is none at position {index}")]
    ValueOutOfRange {
        first: Node,
        second: Node,
        index: usize,
        count: usize,
    },
    #[error("edge ({from},{to}) has no mirrored entry in the undirected adjacency list")]
    UnmatchedEdge { from: Node, to: Node },
    #[error("unknown node {0}")]
    UnknownNode(String),
    #[error("node {0} is already present")]
    DuplicateNode(String),
    #[error("reader configured for {expected} but asked to build {found}")]
    KindMismatch { expected: GraphKind, found: GraphKind },
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns *true* if the error reports a missing pair, edge or node
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::PairNotFound { .. } | Error::ValueOutOfRange { .. } | Error::UnknownNode(_)
        )
    }
}
