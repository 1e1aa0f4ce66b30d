//! DEX instruction representation.
//!
//! This module defines the register-based instruction model the analysis layer operates
//! on: the [`Opcode`] set, the [`Instruction`] struct aggregating opcode, registers, and
//! operand payload, and the [`FlowType`] classification used to build basic blocks.
//!
//! # Result register convention
//!
//! DEX instructions whose result does not fit the compact register encoding (calls, object
//! allocation, field and array loads, `const-string`, ...) deposit their result in the
//! distinguished [`RESULT_REGISTER`]. A following `move-result*` pseudo-instruction copies
//! it into an addressable register. [`Opcode::writes_result_register`] identifies these
//! producers; everything else writes an ordinary destination register or nothing at all.
//!
//! # Parameter pseudo-instructions
//!
//! A method body begins with a contiguous run of `load-param*` pseudo-instructions, one
//! per formal parameter (including `this` for instance methods). They carry no runtime
//! semantics; they exist so that every value in the method has a defining instruction.

use std::fmt;

use strum::EnumIter;

use crate::metadata::{DexStringRc, FieldRefRc, MethodRefRc, TypeRc};

/// A virtual register number.
pub type Register = u32;

/// The distinguished pseudo-register holding an instruction's conventional result.
///
/// Chosen outside any method's real register range; the analysis environment treats it
/// as just another key, and because it is the maximum register value it sorts last in
/// register-ordered views.
pub const RESULT_REGISTER: Register = u32::MAX;

/// The DEX opcode subset this crate models, plus the IR pseudo-opcodes.
///
/// Opcodes not given dedicated semantics by an analysis fall under its default
/// semantics; the set here is wide enough to express realistic method bodies without
/// carrying the full instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Opcode {
    /// No operation.
    Nop,
    /// Formal parameter of a narrow primitive type (pseudo).
    LoadParam,
    /// Formal parameter of a wide primitive type (pseudo).
    LoadParamWide,
    /// Formal parameter of a reference type (pseudo).
    LoadParamObject,
    /// Register-to-register copy, narrow value.
    Move,
    /// Register-to-register copy, wide value.
    MoveWide,
    /// Register-to-register copy, reference value.
    MoveObject,
    /// Copies the result register after a call, narrow value.
    MoveResult,
    /// Copies the result register after a call, wide value.
    MoveResultWide,
    /// Copies the result register after a call, reference value.
    MoveResultObject,
    /// Copies the result register after a non-call producer, reference value (pseudo).
    MoveResultPseudoObject,
    /// Loads a narrow literal.
    Const,
    /// Loads a wide literal.
    ConstWide,
    /// Loads a string literal.
    ConstString,
    /// Loads a class object.
    ConstClass,
    /// Checked downcast.
    CheckCast,
    /// Type test.
    InstanceOf,
    /// Allocates an instance.
    NewInstance,
    /// Allocates an array.
    NewArray,
    /// Allocates and fills an array.
    FilledNewArray,
    /// Array element load, reference value.
    AgetObject,
    /// Array element store, reference value.
    AputObject,
    /// Instance field load, narrow primitive.
    Iget,
    /// Instance field load, reference value.
    IgetObject,
    /// Static field load, narrow primitive.
    Sget,
    /// Static field load, reference value.
    SgetObject,
    /// Virtual method call.
    InvokeVirtual,
    /// Superclass method call.
    InvokeSuper,
    /// Direct (private or constructor) method call.
    InvokeDirect,
    /// Static method call.
    InvokeStatic,
    /// Interface method call.
    InvokeInterface,
    /// Returns void.
    ReturnVoid,
    /// Returns a narrow value.
    Return,
    /// Returns a wide value.
    ReturnWide,
    /// Returns a reference value.
    ReturnObject,
    /// Unconditional branch.
    Goto,
    /// Branch if zero.
    IfEqz,
    /// Branch if non-zero.
    IfNez,
    /// Branch if equal.
    IfEq,
    /// Branch if not equal.
    IfNe,
    /// Integer addition.
    AddInt,
    /// Throws an exception.
    Throw,
}

impl Opcode {
    /// Returns how this opcode affects control flow.
    #[must_use]
    pub const fn flow_type(self) -> FlowType {
        match self {
            Opcode::Goto => FlowType::UnconditionalBranch,
            Opcode::IfEqz | Opcode::IfNez | Opcode::IfEq | Opcode::IfNe => {
                FlowType::ConditionalBranch
            }
            Opcode::ReturnVoid | Opcode::Return | Opcode::ReturnWide | Opcode::ReturnObject => {
                FlowType::Return
            }
            Opcode::Throw => FlowType::Throw,
            _ => FlowType::Sequential,
        }
    }

    /// Returns `true` if this opcode deposits its result in [`RESULT_REGISTER`].
    #[must_use]
    pub const fn writes_result_register(self) -> bool {
        matches!(
            self,
            Opcode::ConstString
                | Opcode::ConstClass
                | Opcode::CheckCast
                | Opcode::InstanceOf
                | Opcode::NewInstance
                | Opcode::NewArray
                | Opcode::FilledNewArray
                | Opcode::AgetObject
                | Opcode::Iget
                | Opcode::IgetObject
                | Opcode::Sget
                | Opcode::SgetObject
                | Opcode::InvokeVirtual
                | Opcode::InvokeSuper
                | Opcode::InvokeDirect
                | Opcode::InvokeStatic
                | Opcode::InvokeInterface
        )
    }

    /// Returns `true` if this opcode writes an ordinary destination register.
    #[must_use]
    pub const fn writes_dest(self) -> bool {
        matches!(
            self,
            Opcode::LoadParam
                | Opcode::LoadParamWide
                | Opcode::LoadParamObject
                | Opcode::Move
                | Opcode::MoveWide
                | Opcode::MoveObject
                | Opcode::MoveResult
                | Opcode::MoveResultWide
                | Opcode::MoveResultObject
                | Opcode::MoveResultPseudoObject
                | Opcode::Const
                | Opcode::ConstWide
                | Opcode::AddInt
        )
    }

    /// Returns `true` if the destination occupies two consecutive registers.
    #[must_use]
    pub const fn dest_is_wide(self) -> bool {
        matches!(
            self,
            Opcode::LoadParamWide | Opcode::MoveWide | Opcode::MoveResultWide | Opcode::ConstWide
        )
    }

    /// Returns `true` for the `load-param*` pseudo-opcodes.
    #[must_use]
    pub const fn is_load_param(self) -> bool {
        matches!(
            self,
            Opcode::LoadParam | Opcode::LoadParamWide | Opcode::LoadParamObject
        )
    }

    /// Returns the Dalvik-style mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "nop",
            Opcode::LoadParam => "load-param",
            Opcode::LoadParamWide => "load-param-wide",
            Opcode::LoadParamObject => "load-param-object",
            Opcode::Move => "move",
            Opcode::MoveWide => "move-wide",
            Opcode::MoveObject => "move-object",
            Opcode::MoveResult => "move-result",
            Opcode::MoveResultWide => "move-result-wide",
            Opcode::MoveResultObject => "move-result-object",
            Opcode::MoveResultPseudoObject => "move-result-pseudo-object",
            Opcode::Const => "const",
            Opcode::ConstWide => "const-wide",
            Opcode::ConstString => "const-string",
            Opcode::ConstClass => "const-class",
            Opcode::CheckCast => "check-cast",
            Opcode::InstanceOf => "instance-of",
            Opcode::NewInstance => "new-instance",
            Opcode::NewArray => "new-array",
            Opcode::FilledNewArray => "filled-new-array",
            Opcode::AgetObject => "aget-object",
            Opcode::AputObject => "aput-object",
            Opcode::Iget => "iget",
            Opcode::IgetObject => "iget-object",
            Opcode::Sget => "sget",
            Opcode::SgetObject => "sget-object",
            Opcode::InvokeVirtual => "invoke-virtual",
            Opcode::InvokeSuper => "invoke-super",
            Opcode::InvokeDirect => "invoke-direct",
            Opcode::InvokeStatic => "invoke-static",
            Opcode::InvokeInterface => "invoke-interface",
            Opcode::ReturnVoid => "return-void",
            Opcode::Return => "return",
            Opcode::ReturnWide => "return-wide",
            Opcode::ReturnObject => "return-object",
            Opcode::Goto => "goto",
            Opcode::IfEqz => "if-eqz",
            Opcode::IfNez => "if-nez",
            Opcode::IfEq => "if-eq",
            Opcode::IfNe => "if-ne",
            Opcode::AddInt => "add-int",
            Opcode::Throw => "throw",
        }
    }
}

/// How an instruction affects control flow.
///
/// Used when splitting an instruction stream into basic blocks and when classifying
/// control flow edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowType {
    /// Normal execution continues to the next instruction.
    Sequential,
    /// Conditional branch to another location.
    ConditionalBranch,
    /// Always branches to another location.
    UnconditionalBranch,
    /// Returns from the current method.
    Return,
    /// Exception throwing.
    Throw,
}

/// An instruction's operand payload.
///
/// At most one payload accompanies an instruction, in addition to its register operands.
#[derive(Debug, Clone)]
pub enum Operand {
    /// No payload.
    None,
    /// Literal value (sign-extended).
    Literal(i64),
    /// Interned string literal.
    String(DexStringRc),
    /// Interned type reference.
    Type(TypeRc),
    /// Interned field reference.
    Field(FieldRefRc),
    /// Interned method reference.
    Method(MethodRefRc),
    /// Resolved branch target address.
    Target(u32),
}

/// A decoded DEX instruction.
///
/// The `addr` is the instruction's offset within the method body; addresses are unique
/// and strictly increasing in program order, and serve as the instruction's identity in
/// per-instruction analysis caches.
#[derive(Debug, Clone)]
pub struct Instruction {
    addr: u32,
    opcode: Opcode,
    dest: Option<Register>,
    srcs: Vec<Register>,
    operand: Operand,
}

impl Instruction {
    /// Creates a new instruction.
    #[must_use]
    pub fn new(
        addr: u32,
        opcode: Opcode,
        dest: Option<Register>,
        srcs: Vec<Register>,
        operand: Operand,
    ) -> Self {
        Instruction {
            addr,
            opcode,
            dest,
            srcs,
            operand,
        }
    }

    /// Returns the instruction's address within the method body.
    #[must_use]
    pub fn addr(&self) -> u32 {
        self.addr
    }

    /// Returns the opcode.
    #[must_use]
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Returns the destination register, if the instruction writes one.
    #[must_use]
    pub fn dest(&self) -> Option<Register> {
        self.dest
    }

    /// Returns the `i`-th source register.
    ///
    /// # Panics
    ///
    /// Panics if the instruction has fewer than `i + 1` sources; callers index sources
    /// only where the opcode guarantees their presence.
    #[must_use]
    pub fn src(&self, i: usize) -> Register {
        self.srcs[i]
    }

    /// Returns all source registers.
    #[must_use]
    pub fn srcs(&self) -> &[Register] {
        &self.srcs
    }

    /// Returns the operand payload.
    #[must_use]
    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// Returns the string payload, if any.
    #[must_use]
    pub fn string_operand(&self) -> Option<&DexStringRc> {
        match &self.operand {
            Operand::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the type payload, if any.
    #[must_use]
    pub fn type_operand(&self) -> Option<&TypeRc> {
        match &self.operand {
            Operand::Type(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the field-reference payload, if any.
    #[must_use]
    pub fn field_operand(&self) -> Option<&FieldRefRc> {
        match &self.operand {
            Operand::Field(f) => Some(f),
            _ => None,
        }
    }

    /// Returns the method-reference payload, if any.
    #[must_use]
    pub fn method_operand(&self) -> Option<&MethodRefRc> {
        match &self.operand {
            Operand::Method(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the resolved branch target address, if any.
    #[must_use]
    pub fn target(&self) -> Option<u32> {
        match &self.operand {
            Operand::Target(t) => Some(*t),
            _ => None,
        }
    }

    /// Returns `true` if this instruction deposits its result in [`RESULT_REGISTER`].
    #[must_use]
    pub fn writes_result_register(&self) -> bool {
        self.opcode.writes_result_register()
    }

    /// Returns `true` if the destination occupies two consecutive registers.
    #[must_use]
    pub fn dest_is_wide(&self) -> bool {
        self.opcode.dest_is_wide()
    }

    /// Returns how this instruction affects control flow.
    #[must_use]
    pub fn flow_type(&self) -> FlowType {
        self.opcode.flow_type()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode.mnemonic())?;
        let mut sep = " ";
        if let Some(dest) = self.dest {
            write!(f, "{sep}v{dest}")?;
            sep = ", ";
        }
        for src in &self.srcs {
            write!(f, "{sep}v{src}")?;
            sep = ", ";
        }
        match &self.operand {
            Operand::None => Ok(()),
            Operand::Literal(v) => write!(f, "{sep}#{v}"),
            Operand::String(s) => write!(f, "{sep}{s:?}"),
            Operand::Type(t) => write!(f, "{sep}{t}"),
            Operand::Field(fr) => write!(f, "{sep}{fr}"),
            Operand::Method(m) => write!(f, "{sep}{m}"),
            Operand::Target(t) => write!(f, "{sep}@{t}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_dest_and_result_register_are_exclusive() {
        for op in Opcode::iter() {
            assert!(
                !(op.writes_dest() && op.writes_result_register()),
                "{op:?} claims both a destination register and the result register"
            );
        }
    }

    #[test]
    fn test_wide_dest_implies_dest() {
        for op in Opcode::iter() {
            if op.dest_is_wide() {
                assert!(op.writes_dest(), "{op:?} is wide but writes no destination");
            }
        }
    }

    #[test]
    fn test_terminators_write_nothing() {
        for op in Opcode::iter() {
            if matches!(op.flow_type(), FlowType::Return | FlowType::Throw) {
                assert!(!op.writes_dest());
                assert!(!op.writes_result_register());
            }
        }
    }

    #[test]
    fn test_load_params_are_sequential() {
        for op in Opcode::iter() {
            if op.is_load_param() {
                assert_eq!(op.flow_type(), FlowType::Sequential);
                assert!(op.writes_dest());
            }
        }
    }

    #[test]
    fn test_display() {
        let insn = Instruction::new(3, Opcode::MoveObject, Some(1), vec![0], Operand::None);
        assert_eq!(insn.to_string(), "move-object v1, v0");

        let insn = Instruction::new(7, Opcode::Goto, None, vec![], Operand::Target(2));
        assert_eq!(insn.to_string(), "goto @2");
    }
}
