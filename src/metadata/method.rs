//! Method model: signature, access flags, and code.

use bitflags::bitflags;

use crate::{
    assembly::Instruction,
    metadata::{refs::ProtoRc, strings::DexStringRc, typesystem::TypeRc},
};

bitflags! {
    /// Method access flags as encoded in the DEX `access_flags` word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodAccessFlags: u32 {
        /// Visible everywhere.
        const PUBLIC = 0x0001;
        /// Visible only to the defining class.
        const PRIVATE = 0x0002;
        /// Visible to the package and subclasses.
        const PROTECTED = 0x0004;
        /// No `this` parameter.
        const STATIC = 0x0008;
        /// Not overridable.
        const FINAL = 0x0010;
        /// Synchronized on entry.
        const SYNCHRONIZED = 0x0020;
        /// Bridge method generated by the compiler.
        const BRIDGE = 0x0040;
        /// Last argument is a variadic array.
        const VARARGS = 0x0080;
        /// Implemented in native code.
        const NATIVE = 0x0100;
        /// No implementation provided.
        const ABSTRACT = 0x0400;
        /// Not directly present in source code.
        const SYNTHETIC = 0x1000;
        /// Constructor (`<init>` or `<clinit>`).
        const CONSTRUCTOR = 0x0001_0000;
    }
}

/// The code attached to a method: register file size plus the instruction list.
///
/// Instructions are stored in program order with strictly increasing addresses. The body
/// of a non-static method starts with a `load-param-object` for `this` followed by one
/// load-param pseudo-instruction per declared parameter, mirroring how the IR represents
/// formal parameters in-band.
#[derive(Debug, Clone)]
pub struct MethodBody {
    registers_size: u32,
    instructions: Vec<Instruction>,
}

impl MethodBody {
    /// Creates a new method body.
    ///
    /// # Arguments
    ///
    /// * `registers_size` - Number of virtual registers the method uses
    /// * `instructions` - The instruction list in program order
    #[must_use]
    pub fn new(registers_size: u32, instructions: Vec<Instruction>) -> Self {
        MethodBody {
            registers_size,
            instructions,
        }
    }

    /// Returns the number of virtual registers.
    #[must_use]
    pub fn registers_size(&self) -> u32 {
        self.registers_size
    }

    /// Returns the instructions in program order.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}

/// A concrete method: defining class, name, prototype, flags, and optional code.
///
/// Abstract and native methods have no body; analyses constructed over them answer all
/// queries with "no information".
#[derive(Debug)]
pub struct Method {
    defining_class: TypeRc,
    name: DexStringRc,
    proto: ProtoRc,
    access_flags: MethodAccessFlags,
    body: Option<MethodBody>,
}

impl Method {
    /// Creates a method without code. Attach code with [`with_body`](Self::with_body).
    #[must_use]
    pub fn new(
        defining_class: TypeRc,
        name: DexStringRc,
        proto: ProtoRc,
        access_flags: MethodAccessFlags,
    ) -> Self {
        Method {
            defining_class,
            name,
            proto,
            access_flags,
            body: None,
        }
    }

    /// Attaches a body to the method.
    #[must_use]
    pub fn with_body(mut self, body: MethodBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the type defining this method.
    #[must_use]
    pub fn defining_class(&self) -> &TypeRc {
        &self.defining_class
    }

    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &DexStringRc {
        &self.name
    }

    /// Returns the method prototype.
    #[must_use]
    pub fn proto(&self) -> &ProtoRc {
        &self.proto
    }

    /// Returns the access flags.
    #[must_use]
    pub fn access_flags(&self) -> MethodAccessFlags {
        self.access_flags
    }

    /// Returns `true` if the method is static (no `this` parameter).
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.access_flags.contains(MethodAccessFlags::STATIC)
    }

    /// Returns the method body, or `None` for abstract and native methods.
    #[must_use]
    pub fn body(&self) -> Option<&MethodBody> {
        self.body.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::DexContext;

    #[test]
    fn test_static_flag() {
        let ctx = DexContext::new();
        let ty = ctx.type_ref("Lcom/foo/Bar;");
        let name = ctx.string("run");
        let proto = ctx.proto(&[], "V");

        let instance = Method::new(
            ty.clone(),
            name.clone(),
            proto.clone(),
            MethodAccessFlags::PUBLIC,
        );
        assert!(!instance.is_static());

        let stat = Method::new(
            ty,
            name,
            proto,
            MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
        );
        assert!(stat.is_static());
    }

    #[test]
    fn test_body_attachment() {
        let ctx = DexContext::new();
        let method = Method::new(
            ctx.type_ref("Lcom/foo/Bar;"),
            ctx.string("run"),
            ctx.proto(&[], "V"),
            MethodAccessFlags::PUBLIC,
        );
        assert!(method.body().is_none());

        let method = method.with_body(MethodBody::new(4, Vec::new()));
        let body = method.body().unwrap();
        assert_eq!(body.registers_size(), 4);
        assert!(body.instructions().is_empty());
    }
}
