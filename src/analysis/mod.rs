//! Program analysis: control flow graphs, the data flow framework, and the reflection
//! analysis built on top of them.
//!
//! # Architecture
//!
//! - [`cfg`] - [`ControlFlowGraph`](cfg::ControlFlowGraph) over DEX basic blocks
//! - [`dataflow`] - Generic forward monotone fixpoint framework
//! - [`reflection`] - The reflection dataflow analysis and its query API

pub mod cfg;
pub mod dataflow;
pub mod reflection;

pub use cfg::{CfgEdge, CfgEdgeKind, ControlFlowGraph};
pub use dataflow::{
    AnalysisResults, DataFlowAnalysis, DataFlowSolver, JoinSemiLattice, Lattice, MeetSemiLattice,
};
pub use reflection::{
    AbstractObject, AbstractObjectDomain, AbstractObjectEnvironment, ClassObjectSource,
    ReflectionAnalysis, ReflectionSites, ReflectionTransfer,
};
