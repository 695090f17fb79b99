/*!
# Node Representation

We choose `Node = u32` as almost all social networks we work with have less than `2^32` users.
Nodes are dense: a structure with `n` nodes uses exactly the ids `0..n`, and removing a node
shifts every larger id down by one.
*/

/// Nodes can be any unsigned integer from `0` to `Node::MAX - 1`
pub type Node = u32;

/// Node-Value that is considered invalid
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` nodes in a graph!
pub type NumNodes = Node;

/// Returns the id that `id` carries after `removed` was deleted from a dense id space,
/// or `None` if `id` is the removed one.
///
/// ```
/// use relgraphs::node::shifted_after_removal;
///
/// assert_eq!(shifted_after_removal(2, 5), Some(2));
/// assert_eq!(shifted_after_removal(5, 5), None);
/// assert_eq!(shifted_after_removal(7, 5), Some(6));
/// ```
#[inline]
pub const fn shifted_after_removal(id: Node, removed: Node) -> Option<Node> {
    if id < removed {
        Some(id)
    } else if id > removed {
        Some(id - 1)
    } else {
        None
    }
}

/// Converts a position in a `Vec` into a [`Node`]
#[inline]
pub(crate) fn node_at(pos: usize) -> Node {
    debug_assert!(pos < INVALID_NODE as usize);
    pos as Node
}
