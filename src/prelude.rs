//! # dexscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types from the
//! dexscope library. Import this module to get quick access to the essential types for
//! reflection analysis.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dexscope operations
pub use crate::Error;

/// The result type used throughout dexscope
pub use crate::Result;

// ================================================================================================
// Metadata System
// ================================================================================================

/// Owner of all interning pools
pub use crate::metadata::DexContext;

/// Interned handles
pub use crate::metadata::{DexStringRc, FieldRefRc, MethodRefRc, ProtoRc, TypeRc};

/// The method model
pub use crate::metadata::{Method, MethodAccessFlags, MethodBody};

/// Type-name conversion
pub use crate::metadata::{external_to_internal, internal_to_external};

// ================================================================================================
// Assembly Layer
// ================================================================================================

/// Instruction representation
pub use crate::assembly::{FlowType, Instruction, Opcode, Operand, Register, RESULT_REGISTER};

/// Basic blocks and the method assembler
pub use crate::assembly::{split_blocks, BasicBlock, MethodAssembler};

// ================================================================================================
// Analysis Layer
// ================================================================================================

/// Control flow graph
pub use crate::analysis::cfg::ControlFlowGraph;

/// Data flow framework
pub use crate::analysis::dataflow::{DataFlowAnalysis, DataFlowSolver, JoinSemiLattice};

/// The reflection analysis and its value model
pub use crate::analysis::reflection::{
    AbstractObject, AbstractObjectDomain, AbstractObjectEnvironment, ClassObjectSource,
    ReflectionAnalysis, ReflectionSites,
};
