//! Worklist-based data flow solver.
//!
//! This module provides the iterative solver that computes fixpoints for forward data
//! flow analyses. It uses a worklist algorithm seeded in reverse postorder.
//!
//! # Algorithm
//!
//! 1. Initialize all blocks with the initial state and the entry block with the
//!    boundary state
//! 2. Add all reachable blocks to the worklist in reverse postorder
//! 3. While the worklist is non-empty:
//!    a. Remove a block from the worklist
//!    b. Compute its input by joining the output states of its predecessors
//!    c. Apply the transfer function to get the output state
//!    d. If the output grew, enqueue the block's successors
//!
//! # Termination
//!
//! States only ascend (the input of a block is a join over monotone outputs), so a
//! finite-height lattice bounds the number of times any block can be re-enqueued. With
//! a three-level per-register domain the whole iteration is
//! O(|blocks| × 3 × |registers|) in the worst case.

use std::collections::VecDeque;

use tracing::debug;

use crate::{
    analysis::{
        cfg::ControlFlowGraph,
        dataflow::framework::{AnalysisResults, DataFlowAnalysis},
        dataflow::lattice::JoinSemiLattice,
    },
    utils::graph::{NodeId, Predecessors, RootedGraph, Successors},
};

/// Worklist-based forward data flow solver.
///
/// # Usage
///
/// ```rust,ignore
/// use dexscope::analysis::dataflow::DataFlowSolver;
///
/// let results = DataFlowSolver::new(&analysis).solve(&cfg);
/// let entry_state = results.in_state(block_id);
/// ```
pub struct DataFlowSolver<'a, A: DataFlowAnalysis> {
    /// The analysis being solved.
    analysis: &'a A,
    /// Input state for each block.
    in_states: Vec<A::State>,
    /// Output state for each block.
    out_states: Vec<A::State>,
    /// Worklist of blocks to process.
    worklist: VecDeque<usize>,
    /// Whether each block is currently in the worklist (for deduplication).
    in_worklist: Vec<bool>,
    /// Number of iterations performed.
    iterations: usize,
}

impl<'a, A: DataFlowAnalysis> DataFlowSolver<'a, A> {
    /// Creates a new solver for the given analysis.
    #[must_use]
    pub fn new(analysis: &'a A) -> Self {
        Self {
            analysis,
            in_states: Vec::new(),
            out_states: Vec::new(),
            worklist: VecDeque::new(),
            in_worklist: Vec::new(),
            iterations: 0,
        }
    }

    /// Solves the data flow analysis to a fixpoint.
    ///
    /// Returns the analysis results containing input and output states for each basic
    /// block. Blocks unreachable from the entry keep their initial state.
    pub fn solve(mut self, cfg: &ControlFlowGraph) -> AnalysisResults<A::State> {
        let num_blocks = cfg.block_count();
        if num_blocks == 0 {
            return AnalysisResults::new(Vec::new(), Vec::new(), 0);
        }

        self.initialize(cfg);
        self.iterate(cfg);

        debug!(
            blocks = num_blocks,
            iterations = self.iterations,
            "data flow fixpoint reached"
        );

        AnalysisResults::new(self.in_states, self.out_states, self.iterations)
    }

    /// Initializes the solver state.
    fn initialize(&mut self, cfg: &ControlFlowGraph) {
        let num_blocks = cfg.block_count();
        let initial = self.analysis.initial(cfg);
        let boundary = self.analysis.boundary(cfg);

        self.in_states = vec![initial.clone(); num_blocks];
        self.out_states = vec![initial; num_blocks];
        self.in_worklist = vec![false; num_blocks];

        // Entry block gets the boundary state.
        let entry = cfg.entry().index();
        self.in_states[entry] = boundary;

        // Seed the worklist with all reachable blocks in reverse postorder.
        for node in cfg.reverse_postorder() {
            let idx = node.index();
            self.worklist.push_back(idx);
            self.in_worklist[idx] = true;
        }
    }

    /// Main iteration loop.
    fn iterate(&mut self, cfg: &ControlFlowGraph) {
        while let Some(block_idx) = self.worklist.pop_front() {
            self.in_worklist[block_idx] = false;
            self.iterations += 1;

            if self.process_block(block_idx, cfg) {
                // Output grew; successors must be revisited.
                for succ in cfg.successors(NodeId::new(block_idx)) {
                    let idx = succ.index();
                    if idx < self.in_worklist.len() && !self.in_worklist[idx] {
                        self.worklist.push_back(idx);
                        self.in_worklist[idx] = true;
                    }
                }
            }
        }
    }

    /// Processes one block.
    ///
    /// Returns `true` if the output state changed.
    fn process_block(&mut self, block_idx: usize, cfg: &ControlFlowGraph) -> bool {
        let node = NodeId::new(block_idx);

        // The entry block keeps its boundary state; other blocks recompute their input
        // by joining all predecessor outputs. A block with no predecessors keeps its
        // initial state.
        let input = if node == cfg.entry() {
            self.in_states[block_idx].clone()
        } else if cfg.predecessors(node).next().is_none() {
            self.in_states[block_idx].clone()
        } else {
            let mut result: Option<A::State> = None;
            for pred in cfg.predecessors(node) {
                let pred_out = &self.out_states[pred.index()];
                result = Some(match result {
                    None => pred_out.clone(),
                    Some(acc) => acc.join(pred_out),
                });
            }
            result.unwrap_or_else(|| self.in_states[block_idx].clone())
        };

        self.in_states[block_idx] = input.clone();

        let block = cfg.block(node).expect("block should exist");
        let output = self.analysis.transfer(block_idx, block, &input);

        let changed = output != self.out_states[block_idx];
        self.out_states[block_idx] = output;

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assembly::{split_blocks, BasicBlock, MethodAssembler},
        metadata::DexContext,
    };

    /// A simple constant lattice for testing.
    #[derive(Debug, Clone, PartialEq)]
    enum TestLattice {
        Bottom,
        Value(i32),
        Top,
    }

    impl JoinSemiLattice for TestLattice {
        fn join(&self, other: &Self) -> Self {
            match (self, other) {
                (Self::Bottom, x) | (x, Self::Bottom) => x.clone(),
                (Self::Value(a), Self::Value(b)) if a == b => Self::Value(*a),
                _ => Self::Top,
            }
        }

        fn is_top(&self) -> bool {
            matches!(self, Self::Top)
        }
    }

    /// Propagates the boundary value unchanged through every block.
    struct PassThrough;

    impl DataFlowAnalysis for PassThrough {
        type State = TestLattice;

        fn boundary(&self, _cfg: &ControlFlowGraph) -> TestLattice {
            TestLattice::Value(42)
        }

        fn initial(&self, _cfg: &ControlFlowGraph) -> TestLattice {
            TestLattice::Bottom
        }

        fn transfer(
            &self,
            _block_id: usize,
            _block: &BasicBlock,
            input: &TestLattice,
        ) -> TestLattice {
            input.clone()
        }
    }

    fn diamond_cfg() -> ControlFlowGraph {
        let ctx = DexContext::new();
        let mut asm = MethodAssembler::new(&ctx);
        asm.if_eqz(0, "else")
            .nop()
            .goto_("join")
            .label("else")
            .nop()
            .label("join")
            .return_void();
        let blocks = split_blocks(&asm.finish().unwrap()).unwrap();
        ControlFlowGraph::from_basic_blocks(blocks).unwrap()
    }

    #[test]
    fn test_boundary_reaches_all_blocks() {
        let cfg = diamond_cfg();
        let results = DataFlowSolver::new(&PassThrough).solve(&cfg);

        for block in 0..cfg.block_count() {
            assert_eq!(results.in_state(block), Some(&TestLattice::Value(42)));
            assert_eq!(results.out_state(block), Some(&TestLattice::Value(42)));
        }
        assert!(results.iterations() >= cfg.block_count());
    }

    /// Each block that contains a `const` overwrites the state with its literal.
    struct LastConst;

    impl DataFlowAnalysis for LastConst {
        type State = TestLattice;

        fn boundary(&self, _cfg: &ControlFlowGraph) -> TestLattice {
            TestLattice::Top
        }

        fn initial(&self, _cfg: &ControlFlowGraph) -> TestLattice {
            TestLattice::Bottom
        }

        fn transfer(
            &self,
            _block_id: usize,
            block: &BasicBlock,
            input: &TestLattice,
        ) -> TestLattice {
            let mut state = input.clone();
            for insn in &block.instructions {
                if insn.opcode() == crate::assembly::Opcode::Const {
                    if let crate::assembly::Operand::Literal(v) = insn.operand() {
                        state = TestLattice::Value(*v as i32);
                    }
                }
            }
            state
        }
    }

    #[test]
    fn test_join_of_conflicting_branches_is_top() {
        let ctx = DexContext::new();
        let mut asm = MethodAssembler::new(&ctx);
        asm.if_eqz(0, "else")
            .const_lit(1, 5)
            .goto_("join")
            .label("else")
            .const_lit(1, 7)
            .label("join")
            .return_void();
        let blocks = split_blocks(&asm.finish().unwrap()).unwrap();
        let cfg = ControlFlowGraph::from_basic_blocks(blocks).unwrap();

        let results = DataFlowSolver::new(&LastConst).solve(&cfg);

        // The join block merges Value(5) and Value(7) into Top.
        let join_block = cfg.block_count() - 1;
        assert_eq!(results.in_state(join_block), Some(&TestLattice::Top));
    }
}
