//! The reflection analysis facade.
//!
//! [`ReflectionAnalysis`] drives the whole pipeline for one method: build the CFG,
//! seed the entry state from the signature, run the fixpoint, then replay each block to
//! cache the environment at every instruction for point queries.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{
    analysis::{
        cfg::ControlFlowGraph,
        dataflow::DataFlowSolver,
        reflection::{
            environment::AbstractObjectEnvironment, object::AbstractObject,
            transfer::ReflectionTransfer,
        },
    },
    assembly::{split_blocks, Instruction, Register, RESULT_REGISTER},
    metadata::{DexContext, Method},
    Result,
};

/// The reflection sites of a method: each instruction where at least one register holds
/// a reflection output, paired with those registers and their abstract objects in
/// register order (the result register last).
pub type ReflectionSites = Vec<(Instruction, BTreeMap<Register, AbstractObject>)>;

/// Per-method reflection dataflow analysis.
///
/// Construction runs the analysis to completion; afterwards the instance only answers
/// queries from its per-instruction cache. A method without code yields an analysis
/// whose queries all return `None` or empty results.
///
/// # Examples
///
/// ```rust,ignore
/// use dexscope::analysis::reflection::ReflectionAnalysis;
///
/// let analysis = ReflectionAnalysis::new(&ctx, &method)?;
/// if analysis.has_found_reflection() {
///     for (insn, objects) in analysis.get_reflection_sites() {
///         println!("{insn}: {objects:?}");
///     }
/// }
/// ```
pub struct ReflectionAnalysis<'a> {
    method: &'a Method,
    analyzer: Option<Analyzer<'a>>,
}

/// The pieces that only exist when the method has code.
struct Analyzer<'a> {
    cfg: ControlFlowGraph,
    /// Environment at each instruction (keyed by address), snapshotted *before* the
    /// instruction's own transfer is applied.
    environments: FxHashMap<u32, AbstractObjectEnvironment>,
    #[allow(dead_code)]
    transfer: ReflectionTransfer<'a>,
}

impl<'a> ReflectionAnalysis<'a> {
    /// Runs the analysis for `method`.
    ///
    /// # Errors
    ///
    /// Returns an error if the method body cannot be split into basic blocks or the
    /// control flow graph cannot be constructed; both indicate a structurally malformed
    /// body. A method without code is not an error.
    pub fn new(ctx: &'a DexContext, method: &'a Method) -> Result<Self> {
        let Some(body) = method.body() else {
            return Ok(ReflectionAnalysis {
                method,
                analyzer: None,
            });
        };

        let blocks = split_blocks(body.instructions())?;
        let cfg = ControlFlowGraph::from_basic_blocks(blocks)?;
        let transfer = ReflectionTransfer::new(ctx, method, &cfg);
        let results = DataFlowSolver::new(&transfer).solve(&cfg);

        // Replay pass: re-derive each block's entry state and walk its instructions,
        // snapshotting the environment before every instruction. The persistent map
        // representation keeps these snapshots cheap.
        let mut environments =
            FxHashMap::with_capacity_and_hasher(body.instructions().len(), Default::default());
        for (node, block) in cfg.blocks() {
            let mut state = results
                .in_state(node.index())
                .cloned()
                .unwrap_or_else(AbstractObjectEnvironment::bottom);
            for insn in &block.instructions {
                environments.insert(insn.addr(), state.clone());
                trace!(insn = %insn, state = %state, "replay");
                transfer.analyze_instruction(insn, &mut state);
            }
        }

        Ok(ReflectionAnalysis {
            method,
            analyzer: Some(Analyzer {
                cfg,
                environments,
                transfer,
            }),
        })
    }

    /// Returns the control flow graph, or `None` for a method without code.
    #[must_use]
    pub fn cfg(&self) -> Option<&ControlFlowGraph> {
        self.analyzer.as_ref().map(|a| &a.cfg)
    }

    /// Returns the abstract object held by `reg` just before `insn` executes.
    ///
    /// Returns `None` if the method has no code, the instruction is unknown, or the
    /// register's value is not a single constant at that point.
    #[must_use]
    pub fn get_abstract_object(&self, reg: Register, insn: &Instruction) -> Option<AbstractObject> {
        let env = self.get_abstract_object_env(insn)?;
        env.get(reg).constant().cloned()
    }

    /// Returns the full abstract environment just before `insn` executes.
    #[must_use]
    pub fn get_abstract_object_env(
        &self,
        insn: &Instruction,
    ) -> Option<&AbstractObjectEnvironment> {
        self.analyzer.as_ref()?.environments.get(&insn.addr())
    }

    /// Returns every instruction at which some register holds a reflection output,
    /// in program order.
    ///
    /// Each entry maps the registers (including the result register) to the reflective
    /// abstract object they hold just before the instruction executes.
    #[must_use]
    pub fn get_reflection_sites(&self) -> ReflectionSites {
        let mut sites = ReflectionSites::new();
        let Some(body) = self.method.body() else {
            return sites;
        };
        for insn in body.instructions() {
            let Some(env) = self.get_abstract_object_env(insn) else {
                continue;
            };
            let mut objects = BTreeMap::new();
            for (reg, value) in env.bindings() {
                debug_assert!(
                    reg < body.registers_size() || reg == RESULT_REGISTER,
                    "binding outside the register file"
                );
                if let Some(obj) = value.constant() {
                    if obj.is_reflection_output() {
                        objects.insert(reg, obj.clone());
                    }
                }
            }
            if !objects.is_empty() {
                sites.push((insn.clone(), objects));
            }
        }
        sites
    }

    /// Returns `true` if the method has any reflection site.
    #[must_use]
    pub fn has_found_reflection(&self) -> bool {
        !self.get_reflection_sites().is_empty()
    }
}
