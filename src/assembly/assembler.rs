//! Programmatic construction of method bodies.
//!
//! [`MethodAssembler`] builds instruction streams through a fluent, label-based API,
//! resolving branch targets when [`finish`](MethodAssembler::finish) is called. It is the
//! construction path used by the test suites and by embedders that synthesize bodies
//! instead of decoding them from a container.
//!
//! # Examples
//!
//! ```rust
//! use dexscope::{assembly::MethodAssembler, metadata::DexContext};
//!
//! let ctx = DexContext::new();
//! let for_name = ctx.method_ref(
//!     "Ljava/lang/Class;", "forName", &["Ljava/lang/String;"], "Ljava/lang/Class;",
//! );
//!
//! let mut asm = MethodAssembler::new(&ctx);
//! asm.const_string("com.foo.Bar")
//!     .move_result_pseudo_object(0)
//!     .invoke_static(&for_name, &[0])
//!     .move_result_object(1)
//!     .return_void();
//! let instructions = asm.finish()?;
//! assert_eq!(instructions.len(), 5);
//! # Ok::<(), dexscope::Error>(())
//! ```

use std::collections::HashMap;

use crate::{
    assembly::instruction::{Instruction, Opcode, Operand, Register},
    error::malformed_error,
    metadata::{DexContext, FieldRefRc, MethodRefRc},
    Result,
};

enum Pending {
    Resolved(Operand),
    Label(String),
}

/// Label-based builder for instruction streams.
///
/// Instructions are addressed by their position in the stream. Labels bind to the address
/// of the next emitted instruction and may be referenced before they are bound; all
/// references are resolved by [`finish`](Self::finish).
pub struct MethodAssembler<'a> {
    ctx: &'a DexContext,
    instructions: Vec<(Opcode, Option<Register>, Vec<Register>, Pending)>,
    labels: HashMap<String, u32>,
}

impl<'a> MethodAssembler<'a> {
    /// Creates a new assembler interning operands through `ctx`.
    #[must_use]
    pub fn new(ctx: &'a DexContext) -> Self {
        MethodAssembler {
            ctx,
            instructions: Vec::new(),
            labels: HashMap::new(),
        }
    }

    fn emit(
        &mut self,
        opcode: Opcode,
        dest: Option<Register>,
        srcs: Vec<Register>,
        operand: Operand,
    ) -> &mut Self {
        self.instructions
            .push((opcode, dest, srcs, Pending::Resolved(operand)));
        self
    }

    fn emit_branch(&mut self, opcode: Opcode, srcs: Vec<Register>, label: &str) -> &mut Self {
        self.instructions
            .push((opcode, None, srcs, Pending::Label(label.to_string())));
        self
    }

    /// Binds `name` to the address of the next instruction.
    pub fn label(&mut self, name: &str) -> &mut Self {
        self.labels
            .insert(name.to_string(), self.instructions.len() as u32);
        self
    }

    /// Emits `nop`.
    pub fn nop(&mut self) -> &mut Self {
        self.emit(Opcode::Nop, None, vec![], Operand::None)
    }

    /// Emits a narrow `load-param` pseudo-instruction.
    pub fn load_param(&mut self, dest: Register) -> &mut Self {
        self.emit(Opcode::LoadParam, Some(dest), vec![], Operand::None)
    }

    /// Emits a wide `load-param-wide` pseudo-instruction.
    pub fn load_param_wide(&mut self, dest: Register) -> &mut Self {
        self.emit(Opcode::LoadParamWide, Some(dest), vec![], Operand::None)
    }

    /// Emits a `load-param-object` pseudo-instruction.
    pub fn load_param_object(&mut self, dest: Register) -> &mut Self {
        self.emit(Opcode::LoadParamObject, Some(dest), vec![], Operand::None)
    }

    /// Emits `move`.
    pub fn move_reg(&mut self, dest: Register, src: Register) -> &mut Self {
        self.emit(Opcode::Move, Some(dest), vec![src], Operand::None)
    }

    /// Emits `move-wide`.
    pub fn move_wide(&mut self, dest: Register, src: Register) -> &mut Self {
        self.emit(Opcode::MoveWide, Some(dest), vec![src], Operand::None)
    }

    /// Emits `move-object`.
    pub fn move_object(&mut self, dest: Register, src: Register) -> &mut Self {
        self.emit(Opcode::MoveObject, Some(dest), vec![src], Operand::None)
    }

    /// Emits `move-result`.
    pub fn move_result(&mut self, dest: Register) -> &mut Self {
        self.emit(Opcode::MoveResult, Some(dest), vec![], Operand::None)
    }

    /// Emits `move-result-wide`.
    pub fn move_result_wide(&mut self, dest: Register) -> &mut Self {
        self.emit(Opcode::MoveResultWide, Some(dest), vec![], Operand::None)
    }

    /// Emits `move-result-object`.
    pub fn move_result_object(&mut self, dest: Register) -> &mut Self {
        self.emit(Opcode::MoveResultObject, Some(dest), vec![], Operand::None)
    }

    /// Emits the `move-result-pseudo-object` pseudo-instruction.
    pub fn move_result_pseudo_object(&mut self, dest: Register) -> &mut Self {
        self.emit(Opcode::MoveResultPseudoObject, Some(dest), vec![], Operand::None)
    }

    /// Emits `const` with a narrow literal.
    pub fn const_lit(&mut self, dest: Register, value: i64) -> &mut Self {
        self.emit(Opcode::Const, Some(dest), vec![], Operand::Literal(value))
    }

    /// Emits `const-wide`.
    pub fn const_wide(&mut self, dest: Register, value: i64) -> &mut Self {
        self.emit(Opcode::ConstWide, Some(dest), vec![], Operand::Literal(value))
    }

    /// Emits `const-string`; the literal lands in the result register.
    pub fn const_string(&mut self, value: &str) -> &mut Self {
        let s = self.ctx.string(value);
        self.emit(Opcode::ConstString, None, vec![], Operand::String(s))
    }

    /// Emits `const-class`; the class object lands in the result register.
    pub fn const_class(&mut self, descriptor: &str) -> &mut Self {
        let t = self.ctx.type_ref(descriptor);
        self.emit(Opcode::ConstClass, None, vec![], Operand::Type(t))
    }

    /// Emits `check-cast`.
    pub fn check_cast(&mut self, src: Register, descriptor: &str) -> &mut Self {
        let t = self.ctx.type_ref(descriptor);
        self.emit(Opcode::CheckCast, None, vec![src], Operand::Type(t))
    }

    /// Emits `instance-of`.
    pub fn instance_of(&mut self, src: Register, descriptor: &str) -> &mut Self {
        let t = self.ctx.type_ref(descriptor);
        self.emit(Opcode::InstanceOf, None, vec![src], Operand::Type(t))
    }

    /// Emits `new-instance`.
    pub fn new_instance(&mut self, descriptor: &str) -> &mut Self {
        let t = self.ctx.type_ref(descriptor);
        self.emit(Opcode::NewInstance, None, vec![], Operand::Type(t))
    }

    /// Emits `new-array`.
    pub fn new_array(&mut self, size: Register, descriptor: &str) -> &mut Self {
        let t = self.ctx.type_ref(descriptor);
        self.emit(Opcode::NewArray, None, vec![size], Operand::Type(t))
    }

    /// Emits `filled-new-array`.
    pub fn filled_new_array(&mut self, descriptor: &str, srcs: &[Register]) -> &mut Self {
        let t = self.ctx.type_ref(descriptor);
        self.emit(Opcode::FilledNewArray, None, srcs.to_vec(), Operand::Type(t))
    }

    /// Emits `aget-object`.
    pub fn aget_object(&mut self, array: Register, index: Register) -> &mut Self {
        self.emit(Opcode::AgetObject, None, vec![array, index], Operand::None)
    }

    /// Emits `aput-object`.
    pub fn aput_object(&mut self, src: Register, array: Register, index: Register) -> &mut Self {
        self.emit(Opcode::AputObject, None, vec![src, array, index], Operand::None)
    }

    /// Emits a narrow `iget`.
    pub fn iget(&mut self, object: Register, field: &FieldRefRc) -> &mut Self {
        self.emit(
            Opcode::Iget,
            None,
            vec![object],
            Operand::Field(field.clone()),
        )
    }

    /// Emits `iget-object`.
    pub fn iget_object(&mut self, object: Register, field: &FieldRefRc) -> &mut Self {
        self.emit(
            Opcode::IgetObject,
            None,
            vec![object],
            Operand::Field(field.clone()),
        )
    }

    /// Emits a narrow `sget`.
    pub fn sget(&mut self, field: &FieldRefRc) -> &mut Self {
        self.emit(Opcode::Sget, None, vec![], Operand::Field(field.clone()))
    }

    /// Emits `sget-object`.
    pub fn sget_object(&mut self, field: &FieldRefRc) -> &mut Self {
        self.emit(
            Opcode::SgetObject,
            None,
            vec![],
            Operand::Field(field.clone()),
        )
    }

    /// Emits `invoke-virtual`; `args[0]` is the receiver.
    pub fn invoke_virtual(&mut self, method: &MethodRefRc, args: &[Register]) -> &mut Self {
        self.emit(
            Opcode::InvokeVirtual,
            None,
            args.to_vec(),
            Operand::Method(method.clone()),
        )
    }

    /// Emits `invoke-super`; `args[0]` is the receiver.
    pub fn invoke_super(&mut self, method: &MethodRefRc, args: &[Register]) -> &mut Self {
        self.emit(
            Opcode::InvokeSuper,
            None,
            args.to_vec(),
            Operand::Method(method.clone()),
        )
    }

    /// Emits `invoke-direct`; `args[0]` is the receiver.
    pub fn invoke_direct(&mut self, method: &MethodRefRc, args: &[Register]) -> &mut Self {
        self.emit(
            Opcode::InvokeDirect,
            None,
            args.to_vec(),
            Operand::Method(method.clone()),
        )
    }

    /// Emits `invoke-static`.
    pub fn invoke_static(&mut self, method: &MethodRefRc, args: &[Register]) -> &mut Self {
        self.emit(
            Opcode::InvokeStatic,
            None,
            args.to_vec(),
            Operand::Method(method.clone()),
        )
    }

    /// Emits `invoke-interface`; `args[0]` is the receiver.
    pub fn invoke_interface(&mut self, method: &MethodRefRc, args: &[Register]) -> &mut Self {
        self.emit(
            Opcode::InvokeInterface,
            None,
            args.to_vec(),
            Operand::Method(method.clone()),
        )
    }

    /// Emits `return-void`.
    pub fn return_void(&mut self) -> &mut Self {
        self.emit(Opcode::ReturnVoid, None, vec![], Operand::None)
    }

    /// Emits a narrow `return`.
    pub fn return_value(&mut self, src: Register) -> &mut Self {
        self.emit(Opcode::Return, None, vec![src], Operand::None)
    }

    /// Emits `return-wide`.
    pub fn return_wide(&mut self, src: Register) -> &mut Self {
        self.emit(Opcode::ReturnWide, None, vec![src], Operand::None)
    }

    /// Emits `return-object`.
    pub fn return_object(&mut self, src: Register) -> &mut Self {
        self.emit(Opcode::ReturnObject, None, vec![src], Operand::None)
    }

    /// Emits `goto` targeting `label`.
    pub fn goto_(&mut self, label: &str) -> &mut Self {
        self.emit_branch(Opcode::Goto, vec![], label)
    }

    /// Emits `if-eqz` targeting `label`.
    pub fn if_eqz(&mut self, src: Register, label: &str) -> &mut Self {
        self.emit_branch(Opcode::IfEqz, vec![src], label)
    }

    /// Emits `if-nez` targeting `label`.
    pub fn if_nez(&mut self, src: Register, label: &str) -> &mut Self {
        self.emit_branch(Opcode::IfNez, vec![src], label)
    }

    /// Emits `if-eq` targeting `label`.
    pub fn if_eq(&mut self, a: Register, b: Register, label: &str) -> &mut Self {
        self.emit_branch(Opcode::IfEq, vec![a, b], label)
    }

    /// Emits `if-ne` targeting `label`.
    pub fn if_ne(&mut self, a: Register, b: Register, label: &str) -> &mut Self {
        self.emit_branch(Opcode::IfNe, vec![a, b], label)
    }

    /// Emits `add-int`.
    pub fn add_int(&mut self, dest: Register, a: Register, b: Register) -> &mut Self {
        self.emit(Opcode::AddInt, Some(dest), vec![a, b], Operand::None)
    }

    /// Emits `throw`.
    pub fn throw(&mut self, src: Register) -> &mut Self {
        self.emit(Opcode::Throw, None, vec![src], Operand::None)
    }

    /// Resolves all labels and returns the finished instruction stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`](crate::Error::Malformed) if a referenced label was
    /// never bound, or was bound past the last instruction.
    pub fn finish(self) -> Result<Vec<Instruction>> {
        let count = self.instructions.len() as u32;
        let mut result = Vec::with_capacity(self.instructions.len());
        for (addr, (opcode, dest, srcs, pending)) in self.instructions.into_iter().enumerate() {
            let operand = match pending {
                Pending::Resolved(operand) => operand,
                Pending::Label(name) => {
                    let target = *self
                        .labels
                        .get(&name)
                        .ok_or_else(|| malformed_error!("Undefined label '{}'", name))?;
                    if target >= count {
                        return Err(malformed_error!(
                            "Label '{}' is bound past the last instruction",
                            name
                        ));
                    }
                    Operand::Target(target)
                }
            };
            result.push(Instruction::new(addr as u32, opcode, dest, srcs, operand));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses_are_sequential() {
        let ctx = DexContext::new();
        let mut asm = MethodAssembler::new(&ctx);
        asm.nop().nop().return_void();
        let insns = asm.finish().unwrap();
        let addrs: Vec<u32> = insns.iter().map(Instruction::addr).collect();
        assert_eq!(addrs, vec![0, 1, 2]);
    }

    #[test]
    fn test_forward_label_resolution() {
        let ctx = DexContext::new();
        let mut asm = MethodAssembler::new(&ctx);
        asm.if_eqz(0, "exit").nop().label("exit").return_void();
        let insns = asm.finish().unwrap();
        assert_eq!(insns[0].target(), Some(2));
    }

    #[test]
    fn test_backward_label_resolution() {
        let ctx = DexContext::new();
        let mut asm = MethodAssembler::new(&ctx);
        asm.label("top").nop().goto_("top");
        let insns = asm.finish().unwrap();
        assert_eq!(insns[1].target(), Some(0));
    }

    #[test]
    fn test_undefined_label() {
        let ctx = DexContext::new();
        let mut asm = MethodAssembler::new(&ctx);
        asm.goto_("nowhere");
        assert!(asm.finish().is_err());
    }

    #[test]
    fn test_label_past_end() {
        let ctx = DexContext::new();
        let mut asm = MethodAssembler::new(&ctx);
        asm.goto_("end").label("end");
        assert!(asm.finish().is_err());
    }

    #[test]
    fn test_operand_interning() {
        let ctx = DexContext::new();
        let mut asm = MethodAssembler::new(&ctx);
        asm.const_string("x").const_string("x");
        let insns = asm.finish().unwrap();
        let a = insns[0].string_operand().unwrap();
        let b = insns[1].string_operand().unwrap();
        assert!(std::sync::Arc::ptr_eq(a, b));
    }
}
