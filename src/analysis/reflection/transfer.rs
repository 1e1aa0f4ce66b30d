//! The per-opcode transfer function of the reflection analysis.
//!
//! [`ReflectionTransfer`] interprets each instruction's effect on an
//! [`AbstractObjectEnvironment`]. Most opcodes fall under *default semantics* - clobber
//! whatever the instruction writes - while the instructions that create, copy, or
//! consume reflection-relevant values get dedicated rules. Reflection API calls are
//! recognized by comparing the callee against handles resolved once at construction
//! time; interning makes that an identity comparison.

use std::sync::Arc;

use crate::{
    analysis::{
        cfg::ControlFlowGraph,
        dataflow::DataFlowAnalysis,
        reflection::{
            domain::AbstractObjectDomain,
            environment::AbstractObjectEnvironment,
            object::{AbstractObject, ClassObjectSource},
        },
    },
    assembly::{BasicBlock, Instruction, Opcode, RESULT_REGISTER},
    metadata::{
        descriptors, external_to_internal, DexContext, DexStringRc, Method, MethodRefRc, TypeRc,
    },
    utils::graph::RootedGraph,
};

/// Which kind of member handle a `Class` virtual call resolves to.
enum MemberKind {
    Field,
    Method,
}

/// The transfer function of the reflection analysis.
///
/// Holds the canonical handles of the reflection API methods it recognizes, resolved
/// against the context's pools at construction time, plus the entry environment seeded
/// from the method's formal parameters.
pub struct ReflectionTransfer<'a> {
    ctx: &'a DexContext,
    class_type: TypeRc,
    string_type: TypeRc,
    get_class: MethodRefRc,
    get_method: MethodRefRc,
    get_declared_method: MethodRefRc,
    /// Virtual methods on `java.lang.Class` that look up constructors.
    ctor_lookups: [MethodRefRc; 4],
    get_field: MethodRefRc,
    get_declared_field: MethodRefRc,
    get_method_name: MethodRefRc,
    get_field_name: MethodRefRc,
    for_name: MethodRefRc,
    entry_state: AbstractObjectEnvironment,
}

impl<'a> ReflectionTransfer<'a> {
    /// Creates the transfer function for `method`, resolving the reflection API handles
    /// and seeding the entry environment from the formal parameters.
    ///
    /// # Panics
    ///
    /// Panics if the entry block contains a `load-param-object` beyond the method's
    /// signature arity; that is a structurally malformed body, not a recoverable input.
    #[must_use]
    pub fn new(ctx: &'a DexContext, method: &Method, cfg: &ControlFlowGraph) -> Self {
        let string_params = [descriptors::STRING];
        let member_params = [descriptors::STRING, descriptors::CLASS_ARRAY];
        let class_params = [descriptors::CLASS_ARRAY];

        let mut transfer = ReflectionTransfer {
            ctx,
            class_type: ctx.type_ref(descriptors::CLASS),
            string_type: ctx.type_ref(descriptors::STRING),
            get_class: ctx.method_ref(descriptors::OBJECT, "getClass", &[], descriptors::CLASS),
            get_method: ctx.method_ref(
                descriptors::CLASS,
                "getMethod",
                &member_params,
                descriptors::METHOD,
            ),
            get_declared_method: ctx.method_ref(
                descriptors::CLASS,
                "getDeclaredMethod",
                &member_params,
                descriptors::METHOD,
            ),
            ctor_lookups: [
                ctx.method_ref(
                    descriptors::CLASS,
                    "getConstructor",
                    &class_params,
                    descriptors::CONSTRUCTOR,
                ),
                ctx.method_ref(
                    descriptors::CLASS,
                    "getDeclaredConstructor",
                    &class_params,
                    descriptors::CONSTRUCTOR,
                ),
                ctx.method_ref(
                    descriptors::CLASS,
                    "getConstructors",
                    &[],
                    descriptors::CONSTRUCTOR_ARRAY,
                ),
                ctx.method_ref(
                    descriptors::CLASS,
                    "getDeclaredConstructors",
                    &[],
                    descriptors::CONSTRUCTOR_ARRAY,
                ),
            ],
            get_field: ctx.method_ref(
                descriptors::CLASS,
                "getField",
                &string_params,
                descriptors::FIELD,
            ),
            get_declared_field: ctx.method_ref(
                descriptors::CLASS,
                "getDeclaredField",
                &string_params,
                descriptors::FIELD,
            ),
            get_method_name: ctx.method_ref(
                descriptors::METHOD,
                "getName",
                &[],
                descriptors::STRING,
            ),
            get_field_name: ctx.method_ref(descriptors::FIELD, "getName", &[], descriptors::STRING),
            for_name: ctx.method_ref(
                descriptors::CLASS,
                "forName",
                &string_params,
                descriptors::CLASS,
            ),
            entry_state: AbstractObjectEnvironment::top(),
        };
        transfer.entry_state = transfer.seed_parameters(method, cfg);
        transfer
    }

    /// Computes the entry environment from the method signature.
    ///
    /// The `load-param*` pseudo-instructions at the start of the entry block are the
    /// method's formal parameters and must be interpreted exactly once, before the
    /// fixpoint; the in-loop transfer treats them as no-ops. Object parameters are bound
    /// to their declared type (`this` first for instance methods); everything else gets
    /// default semantics. The scan stops at the first non-parameter instruction.
    ///
    /// String parameters are deliberately not inferred as string constants - the
    /// declared type says nothing about the value - and a `Class` parameter becomes a
    /// class object with unknown target type.
    fn seed_parameters(&self, method: &Method, cfg: &ControlFlowGraph) -> AbstractObjectEnvironment {
        let mut state = AbstractObjectEnvironment::top();
        let entry = cfg.block(cfg.entry()).expect("entry block should exist");
        let mut args = method.proto().parameters().iter();
        let mut first_param = true;

        for insn in &entry.instructions {
            match insn.opcode() {
                Opcode::LoadParamObject => {
                    let ty = if first_param && !method.is_static() {
                        // The first parameter of an instance method is `this`.
                        first_param = false;
                        method.defining_class().clone()
                    } else {
                        args.next()
                            .expect("load-param-object exceeds the signature arity")
                            .clone()
                    };
                    self.update_non_string_input(&mut state, insn, &ty);
                }
                Opcode::LoadParam | Opcode::LoadParamWide => {
                    self.default_semantics(insn, &mut state);
                }
                _ => break,
            }
        }
        state
    }

    /// Applies one instruction's effect to `state`.
    pub(crate) fn analyze_instruction(
        &self,
        insn: &Instruction,
        state: &mut AbstractObjectEnvironment,
    ) {
        match insn.opcode() {
            Opcode::LoadParam | Opcode::LoadParamWide | Opcode::LoadParamObject => {
                // Formal parameters were interpreted before the fixpoint started.
            }
            Opcode::MoveObject => {
                let dest = insn.dest().expect("move-object writes a destination");
                state.set(dest, state.get(insn.src(0)));
            }
            Opcode::MoveResultObject | Opcode::MoveResultPseudoObject => {
                let dest = insn.dest().expect("move-result writes a destination");
                state.set(dest, state.get(RESULT_REGISTER));
            }
            Opcode::ConstString => {
                let literal = insn
                    .string_operand()
                    .expect("const-string carries a string")
                    .clone();
                state.set(
                    RESULT_REGISTER,
                    AbstractObjectDomain::of(AbstractObject::String { literal }),
                );
            }
            Opcode::ConstClass => {
                let ty = insn.type_operand().expect("const-class carries a type").clone();
                state.set(
                    RESULT_REGISTER,
                    AbstractObjectDomain::of(AbstractObject::Class {
                        ty: Some(ty),
                        source: ClassObjectSource::Reflection,
                    }),
                );
            }
            Opcode::CheckCast => {
                // Sound: if the runtime cast fails, the continuation is unreachable, and
                // any abstract state over-approximates the unreachable state.
                state.set(RESULT_REGISTER, state.get(insn.src(0)));
            }
            Opcode::AgetObject => {
                let array = state.get(insn.src(0));
                if let Some(component) = array.constant().and_then(|obj| {
                    let ty = match obj {
                        AbstractObject::Object { ty } => Some(ty),
                        AbstractObject::Class { ty: Some(ty), .. } => Some(ty),
                        _ => None,
                    }?;
                    self.ctx.types().array_component(ty)
                }) {
                    self.update_non_string_input(state, insn, &component);
                } else {
                    self.default_semantics(insn, state);
                }
            }
            Opcode::IgetObject | Opcode::SgetObject => {
                let field = insn
                    .field_operand()
                    .expect("object field load carries a field reference");
                let field_type = field.field_type().clone();
                self.update_non_string_input(state, insn, &field_type);
            }
            Opcode::NewInstance | Opcode::NewArray | Opcode::FilledNewArray => {
                let ty = insn.type_operand().expect("allocation carries a type").clone();
                state.set(
                    RESULT_REGISTER,
                    AbstractObjectDomain::of(AbstractObject::Object { ty }),
                );
            }
            Opcode::InvokeVirtual => {
                let receiver = state.get(insn.src(0));
                match receiver.constant() {
                    Some(receiver) => self.process_virtual_call(insn, receiver, state),
                    None => self.update_return_object(state, insn),
                }
            }
            Opcode::InvokeStatic => {
                let callee = insn.method_operand().expect("invoke carries a method");
                if Arc::ptr_eq(callee, &self.for_name) {
                    let class_name = state.get(insn.src(0));
                    if let Some(AbstractObject::String { literal }) = class_name.constant() {
                        let internal = external_to_internal(literal);
                        state.set(
                            RESULT_REGISTER,
                            AbstractObjectDomain::of(AbstractObject::Class {
                                ty: Some(self.ctx.type_ref(&internal)),
                                source: ClassObjectSource::Reflection,
                            }),
                        );
                        return;
                    }
                }
                self.update_return_object(state, insn);
            }
            Opcode::InvokeInterface | Opcode::InvokeSuper | Opcode::InvokeDirect => {
                self.update_return_object(state, insn);
            }
            _ => {
                self.default_semantics(insn, state);
            }
        }
    }

    /// Binds an object-producing instruction's destination from a declared type.
    ///
    /// A declared type of `java.lang.Class` becomes a class object with unknown target
    /// and non-reflective provenance; everything else becomes an opaque object of that
    /// type. The destination is the result register for instructions that use it, the
    /// ordinary destination otherwise.
    fn update_non_string_input(
        &self,
        state: &mut AbstractObjectEnvironment,
        insn: &Instruction,
        ty: &TypeRc,
    ) {
        let dest = if insn.writes_result_register() {
            RESULT_REGISTER
        } else {
            insn.dest().expect("instruction writes a destination")
        };
        let value = if Arc::ptr_eq(ty, &self.class_type) {
            // The exact type the class object refers to is not known here.
            AbstractObject::Class {
                ty: None,
                source: ClassObjectSource::NonReflection,
            }
        } else {
            AbstractObject::Object { ty: ty.clone() }
        };
        state.set(dest, AbstractObjectDomain::of(value));
    }

    /// Generic return binding for calls not matched by a reflection rule.
    ///
    /// Void and primitive returns leave the result register untouched; object returns
    /// bind it from the callee's declared return type.
    fn update_return_object(&self, state: &mut AbstractObjectEnvironment, insn: &Instruction) {
        let callee = insn.method_operand().expect("invoke carries a method");
        let return_type = callee.proto().return_type();
        if return_type.is_void() || !return_type.is_object() {
            return;
        }
        let return_type = return_type.clone();
        self.update_non_string_input(state, insn, &return_type);
    }

    /// Clobbers whatever the instruction writes.
    ///
    /// This also covers the `move-result*` instructions following operations the
    /// analysis does not model, so their effect is correctly abstracted away regardless
    /// of the width of the destination.
    fn default_semantics(&self, insn: &Instruction, state: &mut AbstractObjectEnvironment) {
        if let Some(dest) = insn.dest() {
            state.set(dest, AbstractObjectDomain::Top);
            if insn.dest_is_wide() {
                state.set(dest + 1, AbstractObjectDomain::Top);
            }
        }
        if insn.writes_result_register() {
            state.set(RESULT_REGISTER, AbstractObjectDomain::Top);
        }
    }

    /// Returns the string constant held by the `idx`-th source register, if any.
    fn string_from_src(
        &self,
        state: &AbstractObjectEnvironment,
        insn: &Instruction,
        idx: usize,
    ) -> Option<DexStringRc> {
        match state.get(insn.src(idx)).constant() {
            Some(AbstractObject::String { literal }) => Some(literal.clone()),
            _ => None,
        }
    }

    /// Applies the reflection rules for a virtual call with a known receiver.
    fn process_virtual_call(
        &self,
        insn: &Instruction,
        receiver: &AbstractObject,
        state: &mut AbstractObjectEnvironment,
    ) {
        let callee = insn.method_operand().expect("invoke carries a method");
        match receiver {
            AbstractObject::Object { ty } => {
                if Arc::ptr_eq(callee, &self.get_class) {
                    state.set(
                        RESULT_REGISTER,
                        AbstractObjectDomain::of(AbstractObject::Class {
                            ty: Some(ty.clone()),
                            source: ClassObjectSource::Reflection,
                        }),
                    );
                    return;
                }
            }
            AbstractObject::String { .. } => {
                if Arc::ptr_eq(callee, &self.get_class) {
                    state.set(
                        RESULT_REGISTER,
                        AbstractObjectDomain::of(AbstractObject::Class {
                            ty: Some(self.string_type.clone()),
                            source: ClassObjectSource::Reflection,
                        }),
                    );
                    return;
                }
            }
            AbstractObject::Class { ty, .. } => {
                let mut member_kind = None;
                let mut member_name = None;
                if Arc::ptr_eq(callee, &self.get_method)
                    || Arc::ptr_eq(callee, &self.get_declared_method)
                {
                    member_kind = Some(MemberKind::Method);
                    member_name = self.string_from_src(state, insn, 1);
                } else if self.ctor_lookups.iter().any(|m| Arc::ptr_eq(callee, m)) {
                    // Constructor lookups resolve to the literal constructor name token,
                    // so they are treated no differently than a method lookup.
                    member_kind = Some(MemberKind::Method);
                    member_name = Some(self.ctx.string(descriptors::CONSTRUCTOR_NAME));
                } else if Arc::ptr_eq(callee, &self.get_field)
                    || Arc::ptr_eq(callee, &self.get_declared_field)
                {
                    member_kind = Some(MemberKind::Field);
                    member_name = self.string_from_src(state, insn, 1);
                }
                // Both the owning class and the member name must be known constants;
                // otherwise the call degrades to its generic return binding.
                if let (Some(kind), Some(name), Some(owner)) =
                    (member_kind, member_name, ty.clone())
                {
                    let member = match kind {
                        MemberKind::Field => AbstractObject::Field { owner, name },
                        MemberKind::Method => AbstractObject::Method { owner, name },
                    };
                    state.set(RESULT_REGISTER, AbstractObjectDomain::of(member));
                    return;
                }
            }
            AbstractObject::Field { name, .. } => {
                if Arc::ptr_eq(callee, &self.get_field_name) {
                    state.set(
                        RESULT_REGISTER,
                        AbstractObjectDomain::of(AbstractObject::String {
                            literal: name.clone(),
                        }),
                    );
                    return;
                }
            }
            AbstractObject::Method { name, .. } => {
                if Arc::ptr_eq(callee, &self.get_method_name) {
                    state.set(
                        RESULT_REGISTER,
                        AbstractObjectDomain::of(AbstractObject::String {
                            literal: name.clone(),
                        }),
                    );
                    return;
                }
            }
        }
        self.update_return_object(state, insn);
    }
}

impl DataFlowAnalysis for ReflectionTransfer<'_> {
    type State = AbstractObjectEnvironment;

    fn boundary(&self, _cfg: &ControlFlowGraph) -> Self::State {
        self.entry_state.clone()
    }

    fn initial(&self, _cfg: &ControlFlowGraph) -> Self::State {
        AbstractObjectEnvironment::bottom()
    }

    fn transfer(&self, _block_id: usize, block: &BasicBlock, input: &Self::State) -> Self::State {
        let mut state = input.clone();
        for insn in &block.instructions {
            self.analyze_instruction(insn, &mut state);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        prelude::JoinSemiLattice,
        assembly::{split_blocks, MethodAssembler, Operand, Register},
        metadata::{MethodAccessFlags, MethodBody},
    };

    /// Builds a transfer function over a trivial static void method.
    fn make_transfer(ctx: &DexContext) -> (ReflectionTransfer<'_>, ControlFlowGraph) {
        let mut asm = MethodAssembler::new(ctx);
        asm.return_void();
        let body = MethodBody::new(8, asm.finish().unwrap());
        let method = Method::new(
            ctx.type_ref("Lcom/foo/Test;"),
            ctx.string("run"),
            ctx.proto(&[], "V"),
            MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
        )
        .with_body(body);
        let cfg = ControlFlowGraph::from_basic_blocks(
            split_blocks(method.body().unwrap().instructions()).unwrap(),
        )
        .unwrap();
        let transfer = ReflectionTransfer::new(ctx, &method, &cfg);
        (transfer, cfg)
    }

    fn object_of(ctx: &DexContext, descriptor: &str) -> AbstractObjectDomain {
        AbstractObjectDomain::of(AbstractObject::Object {
            ty: ctx.type_ref(descriptor),
        })
    }

    #[test]
    fn test_const_string_binds_result_register() {
        let ctx = DexContext::new();
        let (transfer, _cfg) = make_transfer(&ctx);
        let insn = Instruction::new(
            0,
            Opcode::ConstString,
            None,
            vec![],
            Operand::String(ctx.string("lit")),
        );
        let mut state = AbstractObjectEnvironment::top();
        transfer.analyze_instruction(&insn, &mut state);
        assert_eq!(
            state.get(RESULT_REGISTER).constant(),
            Some(&AbstractObject::String {
                literal: ctx.string("lit")
            })
        );
    }

    #[test]
    fn test_const_class_is_reflective() {
        let ctx = DexContext::new();
        let (transfer, _cfg) = make_transfer(&ctx);
        let insn = Instruction::new(
            0,
            Opcode::ConstClass,
            None,
            vec![],
            Operand::Type(ctx.type_ref("Lcom/foo/Bar;")),
        );
        let mut state = AbstractObjectEnvironment::top();
        transfer.analyze_instruction(&insn, &mut state);
        let result = state.get(RESULT_REGISTER);
        let obj = result.constant().unwrap();
        assert!(obj.is_reflection_output());
        assert_eq!(
            obj,
            &AbstractObject::Class {
                ty: Some(ctx.type_ref("Lcom/foo/Bar;")),
                source: ClassObjectSource::Reflection,
            }
        );
    }

    #[test]
    fn test_default_semantics_clobbers_wide_pair() {
        let ctx = DexContext::new();
        let (transfer, _cfg) = make_transfer(&ctx);

        let mut state = AbstractObjectEnvironment::top();
        state.set(4, object_of(&ctx, "Lcom/foo/Bar;"));
        state.set(5, object_of(&ctx, "Lcom/foo/Bar;"));

        let insn = Instruction::new(0, Opcode::ConstWide, Some(4), vec![], Operand::Literal(1));
        transfer.analyze_instruction(&insn, &mut state);
        assert!(state.get(4).is_top());
        assert!(state.get(5).is_top());
    }

    #[test]
    fn test_unmatched_call_clobbers_result_register() {
        let ctx = DexContext::new();
        let (transfer, _cfg) = make_transfer(&ctx);
        let callee = ctx.method_ref("Lcom/foo/Bar;", "make", &[], "Lcom/foo/Baz;");

        let mut state = AbstractObjectEnvironment::top();
        state.set(
            RESULT_REGISTER,
            AbstractObjectDomain::of(AbstractObject::String {
                literal: ctx.string("stale"),
            }),
        );

        let insn = Instruction::new(
            0,
            Opcode::InvokeStatic,
            None,
            vec![],
            Operand::Method(callee),
        );
        transfer.analyze_instruction(&insn, &mut state);
        // The generic binding replaces the stale value with the declared return type.
        assert_eq!(state.get(RESULT_REGISTER), object_of(&ctx, "Lcom/foo/Baz;"));
    }

    #[test]
    fn test_class_typed_field_load_is_unknown_class() {
        let ctx = DexContext::new();
        let (transfer, _cfg) = make_transfer(&ctx);
        let field = ctx.field_ref("Lcom/foo/Bar;", "clazz", descriptors::CLASS);

        let mut state = AbstractObjectEnvironment::top();
        let insn = Instruction::new(0, Opcode::SgetObject, None, vec![], Operand::Field(field));
        transfer.analyze_instruction(&insn, &mut state);

        assert_eq!(
            state.get(RESULT_REGISTER).constant(),
            Some(&AbstractObject::Class {
                ty: None,
                source: ClassObjectSource::NonReflection,
            })
        );
    }

    #[test]
    fn test_member_lookup_on_unknown_class_falls_through() {
        let ctx = DexContext::new();
        let (transfer, _cfg) = make_transfer(&ctx);
        let get_declared_field = ctx.method_ref(
            descriptors::CLASS,
            "getDeclaredField",
            &[descriptors::STRING],
            descriptors::FIELD,
        );

        let mut state = AbstractObjectEnvironment::top();
        // Receiver is a Class constant with unknown target type.
        state.set(
            0,
            AbstractObjectDomain::of(AbstractObject::Class {
                ty: None,
                source: ClassObjectSource::NonReflection,
            }),
        );
        state.set(
            1,
            AbstractObjectDomain::of(AbstractObject::String {
                literal: ctx.string("name"),
            }),
        );

        let insn = Instruction::new(
            0,
            Opcode::InvokeVirtual,
            None,
            vec![0, 1],
            Operand::Method(get_declared_field),
        );
        transfer.analyze_instruction(&insn, &mut state);

        // No FIELD handle without a known owner; the generic binding applies.
        assert_eq!(
            state.get(RESULT_REGISTER),
            object_of(&ctx, descriptors::FIELD)
        );
    }

    #[test]
    fn test_transfer_is_monotone() {
        let ctx = DexContext::new();
        let (transfer, _cfg) = make_transfer(&ctx);
        let get_class =
            ctx.method_ref(descriptors::OBJECT, "getClass", &[], descriptors::CLASS);

        let instructions = vec![
            Instruction::new(
                0,
                Opcode::InvokeVirtual,
                None,
                vec![0],
                Operand::Method(get_class),
            ),
            Instruction::new(1, Opcode::MoveResultObject, Some(1), vec![], Operand::None),
            Instruction::new(2, Opcode::MoveObject, Some(2), vec![1], Operand::None),
        ];

        // lower ⊑ upper: lower knows v0, upper does not.
        let mut lower = AbstractObjectEnvironment::top();
        lower.set(0, object_of(&ctx, "Lcom/foo/Bar;"));
        let upper = AbstractObjectEnvironment::top();
        assert!(lower.leq(&upper));

        let mut lower_out = lower;
        let mut upper_out = upper;
        for insn in &instructions {
            transfer.analyze_instruction(insn, &mut lower_out);
            transfer.analyze_instruction(insn, &mut upper_out);
        }
        assert!(lower_out.leq(&upper_out));
    }

    #[test]
    fn test_bottom_state_stays_bottom() {
        let ctx = DexContext::new();
        let (transfer, _cfg) = make_transfer(&ctx);
        let mut state = AbstractObjectEnvironment::bottom();
        let insn = Instruction::new(
            0,
            Opcode::ConstString,
            None,
            vec![],
            Operand::String(ctx.string("x")),
        );
        transfer.analyze_instruction(&insn, &mut state);
        assert!(state.is_bottom());
    }

    #[test]
    fn test_aget_object_uses_component_type() {
        let ctx = DexContext::new();
        let (transfer, _cfg) = make_transfer(&ctx);

        let mut state = AbstractObjectEnvironment::top();
        state.set(0, object_of(&ctx, "[Lcom/foo/Bar;"));
        let insn = Instruction::new(0, Opcode::AgetObject, None, vec![0, 1], Operand::None);
        transfer.analyze_instruction(&insn, &mut state);
        assert_eq!(state.get(RESULT_REGISTER), object_of(&ctx, "Lcom/foo/Bar;"));

        // Non-array receiver degrades to default semantics.
        let mut state = AbstractObjectEnvironment::top();
        state.set(0, object_of(&ctx, "Lcom/foo/Bar;"));
        transfer.analyze_instruction(&insn, &mut state);
        assert!(state.get(RESULT_REGISTER).is_top());
    }

    #[test]
    fn test_void_call_leaves_result_register_alone() {
        let ctx = DexContext::new();
        let (transfer, _cfg) = make_transfer(&ctx);
        let callee = ctx.method_ref("Lcom/foo/Bar;", "log", &[], "V");

        let mut state = AbstractObjectEnvironment::top();
        let marker: Register = 0;
        state.set(marker, object_of(&ctx, "Lcom/foo/Bar;"));
        let insn = Instruction::new(
            0,
            Opcode::InvokeStatic,
            None,
            vec![],
            Operand::Method(callee),
        );
        transfer.analyze_instruction(&insn, &mut state);
        assert!(state.get(RESULT_REGISTER).is_top());
        assert_eq!(state.get(marker), object_of(&ctx, "Lcom/foo/Bar;"));
    }
}
