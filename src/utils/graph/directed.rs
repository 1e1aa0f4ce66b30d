//! Adjacency-list directed graph.
//!
//! [`DirectedGraph`] is the owned graph structure domain-specific graphs (such as the
//! control flow graph) wrap. It stores node data, typed edge data, and per-node adjacency
//! lists, and implements the traversal traits so the generic algorithms apply.

use crate::{
    utils::graph::{
        edge::EdgeData, EdgeId, GraphBase, NodeId, Predecessors, Successors,
    },
    Error::GraphError,
    Result,
};

/// An owned directed graph with typed node and edge data.
///
/// Nodes and edges are identified by [`NodeId`] and [`EdgeId`], assigned sequentially.
/// Parallel edges and self-loops are permitted; it is the wrapping domain structure's
/// responsibility to avoid them when they are meaningless.
///
/// # Examples
///
/// ```rust,ignore
/// use dexscope::utils::graph::DirectedGraph;
///
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// graph.add_edge(a, b, ())?;
/// assert_eq!(graph.successors(a).count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DirectedGraph<N, E> {
    nodes: Vec<N>,
    edges: Vec<EdgeData<E>>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
}

impl<N, E> DirectedGraph<N, E> {
    /// Creates a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        DirectedGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// Creates a new empty graph with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        DirectedGraph {
            nodes: Vec::with_capacity(node_capacity),
            edges: Vec::with_capacity(edge_capacity),
            outgoing: Vec::with_capacity(node_capacity),
            incoming: Vec::with_capacity(node_capacity),
        }
    }

    /// Adds a node and returns its identifier.
    pub fn add_node(&mut self, data: N) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(data);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Adds an edge from `source` to `target` and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] if either endpoint is not a node of this graph.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, data: E) -> Result<EdgeId> {
        if source.index() >= self.nodes.len() {
            return Err(GraphError(format!(
                "Edge source {} exceeds node count {}",
                source.index(),
                self.nodes.len()
            )));
        }
        if target.index() >= self.nodes.len() {
            return Err(GraphError(format!(
                "Edge target {} exceeds node count {}",
                target.index(),
                self.nodes.len()
            )));
        }

        let id = EdgeId::new(self.edges.len());
        self.edges.push(EdgeData {
            source,
            target,
            data,
        });
        self.outgoing[source.index()].push(id);
        self.incoming[target.index()].push(id);
        Ok(id)
    }

    /// Returns a reference to a node's data.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&N> {
        self.nodes.get(node.index())
    }

    /// Returns an iterator over all nodes with their identifiers.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i), n))
    }

    /// Returns a reference to an edge's data.
    #[must_use]
    pub fn edge(&self, edge: EdgeId) -> Option<&E> {
        self.edges.get(edge.index()).map(|e| &e.data)
    }

    /// Returns the endpoints of an edge as `(source, target)`.
    #[must_use]
    pub fn edge_endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
        self.edges.get(edge.index()).map(|e| (e.source, e.target))
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over the outgoing edges of a node.
    pub fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, &E)> + '_ {
        self.outgoing
            .get(node.index())
            .into_iter()
            .flatten()
            .map(|&id| (id, &self.edges[id.index()].data))
    }
}

impl<N, E> Default for DirectedGraph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> GraphBase for DirectedGraph<N, E> {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }
}

impl<N, E> Successors for DirectedGraph<N, E> {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.outgoing
            .get(node.index())
            .into_iter()
            .flatten()
            .map(|&id| self.edges[id.index()].target)
    }
}

impl<N, E> Predecessors for DirectedGraph<N, E> {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.incoming
            .get(node.index())
            .into_iter()
            .flatten()
            .map(|&id| self.edges[id.index()].source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_nodes_and_edges() {
        let mut graph: DirectedGraph<&str, i32> = DirectedGraph::new();
        let a = graph.add_node("A");
        let b = graph.add_node("B");
        let c = graph.add_node("C");

        let ab = graph.add_edge(a, b, 1).unwrap();
        graph.add_edge(a, c, 2).unwrap();
        graph.add_edge(b, c, 3).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.node(a), Some(&"A"));
        assert_eq!(graph.edge(ab), Some(&1));
        assert_eq!(graph.edge_endpoints(ab), Some((a, b)));
    }

    #[test]
    fn test_adjacency() {
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let c = graph.add_node(());
        graph.add_edge(a, c, ()).unwrap();
        graph.add_edge(b, c, ()).unwrap();

        let succ: Vec<NodeId> = graph.successors(a).collect();
        assert_eq!(succ, vec![c]);

        let pred: Vec<NodeId> = graph.predecessors(c).collect();
        assert_eq!(pred.len(), 2);
        assert!(pred.contains(&a));
        assert!(pred.contains(&b));
    }

    #[test]
    fn test_invalid_edge_rejected() {
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let a = graph.add_node(());
        assert!(graph.add_edge(a, NodeId::new(7), ()).is_err());
        assert!(graph.add_edge(NodeId::new(7), a, ()).is_err());
    }

    #[test]
    fn test_self_loop() {
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let a = graph.add_node(());
        graph.add_edge(a, a, ()).unwrap();
        assert_eq!(graph.successors(a).collect::<Vec<_>>(), vec![a]);
        assert_eq!(graph.predecessors(a).collect::<Vec<_>>(), vec![a]);
    }
}
