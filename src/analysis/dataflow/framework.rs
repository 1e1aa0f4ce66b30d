//! Data flow analysis framework trait.
//!
//! This module defines the core abstraction for data flow analyses. A specific analysis
//! implements the [`DataFlowAnalysis`] trait to work with the solver, which handles
//! iteration to a fixpoint.

use crate::{
    analysis::{cfg::ControlFlowGraph, dataflow::lattice::JoinSemiLattice},
    assembly::BasicBlock,
};

/// A forward data flow analysis over the control flow graph.
///
/// Implementations provide the transfer function and boundary conditions; the solver
/// handles iteration. At blocks with multiple predecessors the solver combines incoming
/// states with the lattice join.
///
/// # Transfer Functions
///
/// The core of any data flow analysis is the transfer function, which describes how
/// flowing through a basic block transforms the abstract state:
/// `out[B] = transfer(B, in[B])`.
///
/// The transfer function must be monotone with respect to the lattice order, otherwise
/// the fixpoint iteration is not guaranteed to terminate.
pub trait DataFlowAnalysis {
    /// The abstract state at a program point.
    type State: JoinSemiLattice;

    /// Returns the state at the entry of the method.
    ///
    /// This often represents known information at the boundary, such as the abstract
    /// values of the formal parameters.
    fn boundary(&self, cfg: &ControlFlowGraph) -> Self::State;

    /// Returns the initial state for interior blocks.
    ///
    /// This is the state blocks hold before they have been reached by the iteration;
    /// for most analyses it is the bottom element (unreachable).
    fn initial(&self, cfg: &ControlFlowGraph) -> Self::State;

    /// Computes the transfer function for a basic block.
    ///
    /// # Arguments
    ///
    /// * `block_id` - The index of the block being processed
    /// * `block` - The basic block
    /// * `input` - The abstract state flowing into the block
    ///
    /// # Returns
    ///
    /// The abstract state after flowing through the block.
    fn transfer(&self, block_id: usize, block: &BasicBlock, input: &Self::State) -> Self::State;
}

/// Results of a data flow analysis.
///
/// This provides access to the computed abstract values at block boundaries.
#[derive(Debug, Clone)]
pub struct AnalysisResults<L> {
    in_states: Vec<L>,
    out_states: Vec<L>,
    iterations: usize,
}

impl<L> AnalysisResults<L> {
    /// Creates new analysis results with the given states.
    #[must_use]
    pub fn new(in_states: Vec<L>, out_states: Vec<L>, iterations: usize) -> Self {
        Self {
            in_states,
            out_states,
            iterations,
        }
    }

    /// Returns the input state for a block (before its transfer function).
    #[must_use]
    pub fn in_state(&self, block: usize) -> Option<&L> {
        self.in_states.get(block)
    }

    /// Returns the output state for a block (after its transfer function).
    #[must_use]
    pub fn out_state(&self, block: usize) -> Option<&L> {
        self.out_states.get(block)
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.in_states.len()
    }

    /// Returns the number of worklist iterations the solver performed.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}
