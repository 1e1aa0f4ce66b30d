//! Control Flow Graph implementation.
//!
//! This module provides the main [`ControlFlowGraph`] structure that wraps basic blocks
//! with proper graph semantics and provides the traversals data flow analysis needs.

use crate::{
    analysis::cfg::{CfgEdge, CfgEdgeKind},
    assembly::{BasicBlock, FlowType},
    utils::graph::{
        algorithms, DirectedGraph, GraphBase, NodeId, Predecessors, RootedGraph, Successors,
    },
    Error::GraphError,
    Result,
};

/// A control flow graph built from DEX basic blocks.
///
/// The CFG provides a graph abstraction over basic blocks with efficient traversal.
/// It wraps an underlying [`DirectedGraph`] and provides domain-specific accessors.
///
/// # Construction
///
/// Create a CFG from split basic blocks using [`from_basic_blocks`](Self::from_basic_blocks):
///
/// ```rust,ignore
/// use dexscope::{analysis::ControlFlowGraph, assembly::split_blocks};
///
/// let blocks = split_blocks(body.instructions())?;
/// let cfg = ControlFlowGraph::from_basic_blocks(blocks)?;
/// ```
///
/// # Thread Safety
///
/// `ControlFlowGraph` is [`Send`] and [`Sync`]; after construction it is read-only.
#[derive(Debug)]
pub struct ControlFlowGraph {
    /// The underlying directed graph structure.
    graph: DirectedGraph<BasicBlock, CfgEdge>,
    /// Index of the entry block (always 0 for method entry).
    entry: NodeId,
    /// Indices of exit blocks (blocks with no successors or return instructions).
    exits: Vec<NodeId>,
}

impl ControlFlowGraph {
    /// Creates a new control flow graph from a vector of basic blocks.
    ///
    /// This constructor builds the CFG by:
    /// 1. Adding each basic block as a node
    /// 2. Converting successor relationships into typed edges
    /// 3. Identifying entry and exit blocks
    ///
    /// # Arguments
    ///
    /// * `blocks` - Basic blocks from [`split_blocks`](crate::assembly::split_blocks)
    ///
    /// # Errors
    ///
    /// Returns an error if the block list is empty or a successor index is out of range.
    pub fn from_basic_blocks(blocks: Vec<BasicBlock>) -> Result<Self> {
        if blocks.is_empty() {
            return Err(GraphError(
                "Cannot create CFG from empty block list".to_string(),
            ));
        }

        let block_count = blocks.len();
        let mut graph: DirectedGraph<BasicBlock, CfgEdge> =
            DirectedGraph::with_capacity(block_count, block_count * 2);

        let node_ids: Vec<NodeId> = blocks
            .into_iter()
            .map(|block| graph.add_node(block))
            .collect();

        for node_id in &node_ids {
            let block = graph.node(*node_id).ok_or_else(|| {
                GraphError(format!(
                    "Internal error: node {} not found in graph",
                    node_id.index()
                ))
            })?;
            let successors = block.successors.clone();
            let flow_type = block.instructions.last().map(|i| i.flow_type());

            for (idx, &succ_idx) in successors.iter().enumerate() {
                if succ_idx >= block_count {
                    return Err(GraphError(format!(
                        "Block {} has successor index {} which exceeds block count {}",
                        node_id.index(),
                        succ_idx,
                        block_count
                    )));
                }

                let edge = CfgEdge::new(CfgEdge::classify(flow_type, idx));
                graph.add_edge(*node_id, node_ids[succ_idx], edge)?;
            }
        }

        // Method entry is always block 0.
        let entry = node_ids[0];
        let mut exits: Vec<NodeId> = Vec::new();
        for &node_id in &node_ids {
            let block = graph.node(node_id).ok_or_else(|| {
                GraphError(format!(
                    "Internal error: node {} not found in graph",
                    node_id.index()
                ))
            })?;
            let is_exit = block.successors.is_empty()
                || block
                    .instructions
                    .last()
                    .is_some_and(|i| i.flow_type() == FlowType::Return);
            if is_exit {
                exits.push(node_id);
            }
        }

        Ok(ControlFlowGraph {
            graph,
            entry,
            exits,
        })
    }

    /// Returns the basic block for a node.
    #[must_use]
    pub fn block(&self, node: NodeId) -> Option<&BasicBlock> {
        self.graph.node(node)
    }

    /// Returns an iterator over all blocks with their node identifiers, in block order.
    pub fn blocks(&self) -> impl Iterator<Item = (NodeId, &BasicBlock)> + '_ {
        self.graph.nodes()
    }

    /// Returns the exit nodes.
    #[must_use]
    pub fn exits(&self) -> &[NodeId] {
        &self.exits
    }

    /// Returns the number of basic blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the blocks reachable from entry in reverse postorder.
    #[must_use]
    pub fn reverse_postorder(&self) -> Vec<NodeId> {
        algorithms::reverse_postorder(&self.graph, self.entry)
    }

    /// Returns an iterator over the outgoing edges of a block.
    pub fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = CfgEdgeKind> + '_ {
        self.graph.outgoing_edges(node).map(|(_, e)| e.kind())
    }
}

impl GraphBase for ControlFlowGraph {
    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        self.graph.node_ids()
    }
}

impl Successors for ControlFlowGraph {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.graph.successors(node)
    }
}

impl Predecessors for ControlFlowGraph {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.graph.predecessors(node)
    }
}

impl RootedGraph for ControlFlowGraph {
    fn entry(&self) -> NodeId {
        self.entry
    }
}
