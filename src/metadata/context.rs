//! The owning facade over all interning pools.

use dashmap::DashMap;
use std::sync::Arc;

use crate::metadata::{
    refs::{FieldRef, FieldRefRc, MethodRef, MethodRefRc, ProtoRc, ProtoRef},
    strings::{DexStringRc, StringPool},
    typesystem::{TypeRc, TypeRegistry},
};

/// Owner of the string, type, prototype, method-reference, and field-reference pools.
///
/// Everything an analysis touches - operand payloads, method signatures, the pre-resolved
/// reflection API handles - is interned through one `DexContext`, which is what guarantees
/// that two lookups of the same entity return the same canonical `Arc`. All pools support
/// concurrent reads and interning, so a context can be shared by analyses running on
/// different threads.
///
/// # Examples
///
/// ```rust
/// use dexscope::metadata::DexContext;
///
/// let ctx = DexContext::new();
/// let get_class = ctx.method_ref("Ljava/lang/Object;", "getClass", &[], "Ljava/lang/Class;");
/// let again = ctx.method_ref("Ljava/lang/Object;", "getClass", &[], "Ljava/lang/Class;");
/// assert!(std::sync::Arc::ptr_eq(&get_class, &again));
/// ```
#[derive(Debug)]
pub struct DexContext {
    strings: StringPool,
    types: TypeRegistry,
    protos: DashMap<String, ProtoRc>,
    methods: DashMap<String, MethodRefRc>,
    fields: DashMap<String, FieldRefRc>,
}

impl DexContext {
    /// Creates a new context with empty pools.
    #[must_use]
    pub fn new() -> Self {
        DexContext {
            strings: StringPool::new(),
            types: TypeRegistry::new(),
            protos: DashMap::new(),
            methods: DashMap::new(),
            fields: DashMap::new(),
        }
    }

    /// Returns the string pool.
    #[must_use]
    pub fn strings(&self) -> &StringPool {
        &self.strings
    }

    /// Returns the type registry.
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Interns a string literal.
    pub fn string(&self, value: &str) -> DexStringRc {
        self.strings.intern(value)
    }

    /// Interns a type by descriptor.
    pub fn type_ref(&self, descriptor: &str) -> TypeRc {
        self.types.intern(descriptor)
    }

    /// Interns a method prototype.
    pub fn proto(&self, parameters: &[&str], return_type: &str) -> ProtoRc {
        let params: Vec<TypeRc> = parameters.iter().map(|d| self.types.intern(d)).collect();
        let ret = self.types.intern(return_type);
        let proto = ProtoRef::new(ret, params);
        let key = proto.signature();
        if let Some(existing) = self.protos.get(&key) {
            return existing.value().clone();
        }
        self.protos
            .entry(key)
            .or_insert_with(|| Arc::new(proto))
            .value()
            .clone()
    }

    /// Interns a method reference.
    ///
    /// Repeated calls with the same owner descriptor, name, parameter descriptors, and
    /// return descriptor yield the same canonical handle, which the reflection rules
    /// compare by identity.
    pub fn method_ref(
        &self,
        owner: &str,
        name: &str,
        parameters: &[&str],
        return_type: &str,
    ) -> MethodRefRc {
        let owner = self.types.intern(owner);
        let name = self.strings.intern(name);
        let proto = self.proto(parameters, return_type);
        let method = MethodRef::new(owner, name, proto);
        let key = method.signature();
        if let Some(existing) = self.methods.get(&key) {
            return existing.value().clone();
        }
        self.methods
            .entry(key)
            .or_insert_with(|| Arc::new(method))
            .value()
            .clone()
    }

    /// Interns a field reference.
    pub fn field_ref(&self, owner: &str, name: &str, field_type: &str) -> FieldRefRc {
        let owner = self.types.intern(owner);
        let name = self.strings.intern(name);
        let field_type = self.types.intern(field_type);
        let field = FieldRef::new(owner, name, field_type);
        let key = field.signature();
        if let Some(existing) = self.fields.get(&key) {
            return existing.value().clone();
        }
        self.fields
            .entry(key)
            .or_insert_with(|| Arc::new(field))
            .value()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_ref_is_canonical() {
        let ctx = DexContext::new();
        let a = ctx.method_ref(
            "Ljava/lang/Class;",
            "getMethod",
            &["Ljava/lang/String;", "[Ljava/lang/Class;"],
            "Ljava/lang/reflect/Method;",
        );
        let b = ctx.method_ref(
            "Ljava/lang/Class;",
            "getMethod",
            &["Ljava/lang/String;", "[Ljava/lang/Class;"],
            "Ljava/lang/reflect/Method;",
        );
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_overloads_are_distinct() {
        let ctx = DexContext::new();
        let mono = ctx.method_ref("Ljava/lang/Class;", "forName", &["Ljava/lang/String;"], "Ljava/lang/Class;");
        let tri = ctx.method_ref(
            "Ljava/lang/Class;",
            "forName",
            &["Ljava/lang/String;", "Z", "Ljava/lang/ClassLoader;"],
            "Ljava/lang/Class;",
        );
        assert!(!Arc::ptr_eq(&mono, &tri));
        assert_ne!(mono.signature(), tri.signature());
    }

    #[test]
    fn test_field_ref_is_canonical() {
        let ctx = DexContext::new();
        let a = ctx.field_ref("Lcom/foo/Bar;", "count", "I");
        let b = ctx.field_ref("Lcom/foo/Bar;", "count", "I");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.signature(), "Lcom/foo/Bar;.count:I");
    }

    #[test]
    fn test_proto_sharing() {
        let ctx = DexContext::new();
        let a = ctx.method_ref("Lcom/foo/A;", "run", &[], "V");
        let b = ctx.method_ref("Lcom/foo/B;", "run", &[], "V");
        assert!(Arc::ptr_eq(a.proto(), b.proto()));
    }
}
