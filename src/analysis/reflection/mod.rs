//! Intraprocedural reflection dataflow analysis.
//!
//! Over-approximates, for every instruction and every register (including the result
//! pseudo-register), which reflection-relevant value the register may hold: an opaque
//! object of a declared type, a string literal, a class object (distinguished by whether
//! it came from a reflective lookup), or a reflective field/method handle. Downstream
//! consumers use the reported sites to avoid renaming or removing entities that are
//! named dynamically.
//!
//! # Pipeline
//!
//! 1. Seed the entry environment from the method's formal parameters
//! 2. Run the forward fixpoint over the CFG with the environment join
//! 3. Replay each block to cache the environment at every instruction
//! 4. Answer point queries and enumerate reflection sites from the cache
//!
//! # Key Components
//!
//! - [`AbstractObject`] / [`ClassObjectSource`] - The tracked values
//! - [`AbstractObjectDomain`] - Constant lattice over abstract objects
//! - [`AbstractObjectEnvironment`] - Persistent register map with pointwise join
//! - [`ReflectionTransfer`] - Per-opcode semantics and the reflection API rules
//! - [`ReflectionAnalysis`] - The per-method facade and query API
//!
//! # Example
//!
//! ```rust,ignore
//! use dexscope::analysis::reflection::ReflectionAnalysis;
//!
//! let analysis = ReflectionAnalysis::new(&ctx, &method)?;
//! for (insn, objects) in analysis.get_reflection_sites() {
//!     for (reg, obj) in &objects {
//!         println!("{insn}: v{reg} may be {obj}");
//!     }
//! }
//! ```

mod analyzer;
mod domain;
mod environment;
mod object;
mod transfer;

pub use analyzer::{ReflectionAnalysis, ReflectionSites};
pub use domain::AbstractObjectDomain;
pub use environment::AbstractObjectEnvironment;
pub use object::{AbstractObject, ClassObjectSource};
pub use transfer::ReflectionTransfer;
