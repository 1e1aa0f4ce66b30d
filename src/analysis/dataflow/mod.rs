//! Generic forward data flow analysis framework.
//!
//! Any specific analysis implements the [`DataFlowAnalysis`] trait over a
//! [`JoinSemiLattice`] state; the [`DataFlowSolver`] iterates it to a fixpoint over the
//! control flow graph.
//!
//! # Key Components
//!
//! - [`JoinSemiLattice`] / [`MeetSemiLattice`] / [`Lattice`] - Domain traits
//! - [`DataFlowAnalysis`] - Boundary, initial state, and block transfer function
//! - [`DataFlowSolver`] - Worklist fixpoint iteration
//! - [`AnalysisResults`] - Per-block entry and exit states

mod framework;
mod lattice;
mod solver;

pub use framework::{AnalysisResults, DataFlowAnalysis};
pub use lattice::{JoinSemiLattice, Lattice, MeetSemiLattice};
pub use solver::DataFlowSolver;
