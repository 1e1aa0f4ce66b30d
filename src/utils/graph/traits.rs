//! Trait definitions for graph abstractions.
//!
//! This module defines the core traits that enable graph algorithms to work with
//! different graph implementations. By programming against these traits, algorithms can
//! be reused across various graph types without modification.
//!
//! # Architecture
//!
//! The trait hierarchy is designed to be minimal and composable:
//!
//! - [`GraphBase`] - Core properties: node count and node iteration
//! - [`Successors`] - Forward edge traversal (outgoing edges)
//! - [`Predecessors`] - Backward edge traversal (incoming edges)
//! - [`RootedGraph`] - Graphs with a designated entry node
//!
//! All adjacency queries return iterators rather than collections, enabling lazy
//! evaluation and avoiding unnecessary allocations for simple traversals.

use crate::utils::graph::NodeId;

/// Base trait providing core graph properties.
pub trait GraphBase {
    /// Returns the number of nodes in the graph.
    ///
    /// This count includes all nodes that have been added to the graph, regardless of
    /// their connectivity.
    fn node_count(&self) -> usize;

    /// Returns an iterator over all node identifiers in the graph.
    ///
    /// The iteration order is the order in which nodes were added to the graph
    /// (ascending `NodeId` index).
    fn node_ids(&self) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs that support forward edge traversal.
pub trait Successors: GraphBase {
    /// Returns an iterator over the successor nodes of the given node.
    ///
    /// Successors are nodes that are targets of edges originating from the specified
    /// node. For a directed edge `(u, v)`, node `v` is a successor of `u`.
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs that support backward edge traversal.
pub trait Predecessors: GraphBase {
    /// Returns an iterator over the predecessor nodes of the given node.
    ///
    /// Predecessors are nodes that are sources of edges targeting the specified node.
    /// For a directed edge `(u, v)`, node `u` is a predecessor of `v`.
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs with a designated entry (root) node.
///
/// This trait extends [`Successors`] and [`Predecessors`] to indicate that the graph has
/// a single distinguished entry point, which is essential for algorithms that require a
/// well-defined starting point, such as reverse-postorder computation for forward data
/// flow analysis.
pub trait RootedGraph: Successors + Predecessors {
    /// Returns the entry (root) node of the graph.
    ///
    /// In a control flow graph, this is the first basic block of a method.
    fn entry(&self) -> NodeId;
}

#[cfg(test)]
mod tests {
    use super::*;

    // A minimal test graph implementation for trait testing
    struct TestGraph {
        node_count: usize,
        edges: Vec<(NodeId, NodeId)>,
        entry: NodeId,
    }

    impl GraphBase for TestGraph {
        fn node_count(&self) -> usize {
            self.node_count
        }

        fn node_ids(&self) -> impl Iterator<Item = NodeId> {
            (0..self.node_count).map(NodeId::new)
        }
    }

    impl Successors for TestGraph {
        fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
            self.edges
                .iter()
                .filter(move |(src, _)| *src == node)
                .map(|(_, dst)| *dst)
        }
    }

    impl Predecessors for TestGraph {
        fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
            self.edges
                .iter()
                .filter(move |(_, dst)| *dst == node)
                .map(|(src, _)| *src)
        }
    }

    impl RootedGraph for TestGraph {
        fn entry(&self) -> NodeId {
            self.entry
        }
    }

    #[test]
    fn test_trait_implementations() {
        let graph = TestGraph {
            node_count: 3,
            edges: vec![
                (NodeId::new(0), NodeId::new(1)),
                (NodeId::new(0), NodeId::new(2)),
                (NodeId::new(1), NodeId::new(2)),
            ],
            entry: NodeId::new(0),
        };

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.node_ids().count(), 3);
        assert_eq!(graph.entry(), NodeId::new(0));

        let succ: Vec<NodeId> = graph.successors(NodeId::new(0)).collect();
        assert_eq!(succ.len(), 2);

        let pred: Vec<NodeId> = graph.predecessors(NodeId::new(2)).collect();
        assert_eq!(pred.len(), 2);
        assert!(graph.predecessors(NodeId::new(0)).next().is_none());
    }
}
