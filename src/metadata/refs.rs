//! Interned method, field, and prototype references.
//!
//! These are the member references instruction operands carry. Like types and strings,
//! they are interned: asking the [`DexContext`](crate::metadata::DexContext) twice for the
//! same signature yields the same canonical `Arc`, so the reflection transfer function can
//! recognize API calls with a plain pointer comparison instead of a structural one.

use std::sync::Arc;

use crate::metadata::{strings::DexStringRc, typesystem::TypeRc};

/// A method prototype: return type plus parameter types.
#[derive(Debug, PartialEq, Eq)]
pub struct ProtoRef {
    return_type: TypeRc,
    parameters: Vec<TypeRc>,
}

/// A canonical, reference-counted handle to an interned prototype.
pub type ProtoRc = Arc<ProtoRef>;

impl ProtoRef {
    pub(crate) fn new(return_type: TypeRc, parameters: Vec<TypeRc>) -> Self {
        ProtoRef {
            return_type,
            parameters,
        }
    }

    /// Returns the return type.
    #[must_use]
    pub fn return_type(&self) -> &TypeRc {
        &self.return_type
    }

    /// Returns the parameter types in declaration order.
    ///
    /// For instance methods the implicit `this` parameter is *not* part of the list,
    /// matching the DEX prototype encoding.
    #[must_use]
    pub fn parameters(&self) -> &[TypeRc] {
        &self.parameters
    }

    /// Returns the canonical signature fragment, e.g. `"(Ljava/lang/String;)V"`.
    #[must_use]
    pub fn signature(&self) -> String {
        let mut sig = String::from("(");
        for param in &self.parameters {
            sig.push_str(param.descriptor());
        }
        sig.push(')');
        sig.push_str(self.return_type.descriptor());
        sig
    }
}

/// A reference to a method: owning type, name, and prototype.
///
/// Method references are compared by identity (`Arc::ptr_eq`) where it matters; the
/// derived structural equality agrees because all components are interned.
#[derive(Debug, PartialEq, Eq)]
pub struct MethodRef {
    owner: TypeRc,
    name: DexStringRc,
    proto: ProtoRc,
}

/// A canonical, reference-counted handle to an interned method reference.
pub type MethodRefRc = Arc<MethodRef>;

impl MethodRef {
    pub(crate) fn new(owner: TypeRc, name: DexStringRc, proto: ProtoRc) -> Self {
        MethodRef { owner, name, proto }
    }

    /// Returns the type declaring the referenced method.
    #[must_use]
    pub fn owner(&self) -> &TypeRc {
        &self.owner
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

    /// Returns the canonical full signature, e.g.
    /// `"Ljava/lang/Class;.getMethod:(Ljava/lang/String;[Ljava/lang/Class;)Ljava/lang/reflect/Method;"`.
    #[must_use]
    pub fn signature(&self) -> String {
        format!(
            "{}.{}:{}",
            self.owner.descriptor(),
            self.name,
            self.proto.signature()
        )
    }
}

impl std::fmt::Display for MethodRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.signature())
    }
}

/// A reference to a field: owning type, name, and declared type.
#[derive(Debug, PartialEq, Eq)]
pub struct FieldRef {
    owner: TypeRc,
    name: DexStringRc,
    field_type: TypeRc,
}

/// A canonical, reference-counted handle to an interned field reference.
pub type FieldRefRc = Arc<FieldRef>;

impl FieldRef {
    pub(crate) fn new(owner: TypeRc, name: DexStringRc, field_type: TypeRc) -> Self {
        FieldRef {
            owner,
            name,
            field_type,
        }
    }

    /// Returns the type declaring the referenced field.
    #[must_use]
    pub fn owner(&self) -> &TypeRc {
        &self.owner
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &DexStringRc {
        &self.name
    }

    /// Returns the declared type of the field.
    #[must_use]
    pub fn field_type(&self) -> &TypeRc {
        &self.field_type
    }

    /// Returns the canonical full signature, e.g. `"Lcom/foo/Bar;.count:I"`.
    #[must_use]
    pub fn signature(&self) -> String {
        format!(
            "{}.{}:{}",
            self.owner.descriptor(),
            self.name,
            self.field_type.descriptor()
        )
    }
}

impl std::fmt::Display for FieldRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.signature())
    }
}
