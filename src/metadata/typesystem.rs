//! Interned DEX type registry.
//!
//! Types are identified by their descriptor (`"Ljava/lang/String;"`, `"I"`, `"[Lcom/foo/Bar;"`)
//! and interned in a [`TypeRegistry`]: repeated lookups of the same descriptor return the
//! same canonical [`TypeRc`]. The reflection analysis compares its pre-resolved API handles
//! by identity, which only works because interning is stable regardless of how many times
//! a lookup is performed.
//!
//! # Descriptor Grammar
//!
//! - `V` - void (only valid as a return type)
//! - `Z`, `B`, `S`, `C`, `I`, `J`, `F`, `D` - primitives
//! - `Lpackage/Name;` - reference type
//! - `[` followed by any non-void descriptor - array type

use std::sync::Arc;

use crossbeam_skiplist::SkipMap;

/// Descriptors of the types the reflection rules recognize.
pub mod descriptors {
    /// `java.lang.Object`
    pub const OBJECT: &str = "Ljava/lang/Object;";
    /// `java.lang.Class`
    pub const CLASS: &str = "Ljava/lang/Class;";
    /// `java.lang.String`
    pub const STRING: &str = "Ljava/lang/String;";
    /// `java.lang.reflect.Method`
    pub const METHOD: &str = "Ljava/lang/reflect/Method;";
    /// `java.lang.reflect.Field`
    pub const FIELD: &str = "Ljava/lang/reflect/Field;";
    /// `java.lang.reflect.Constructor`
    pub const CONSTRUCTOR: &str = "Ljava/lang/reflect/Constructor;";
    /// `java.lang.Class[]`
    pub const CLASS_ARRAY: &str = "[Ljava/lang/Class;";
    /// `java.lang.reflect.Constructor[]`
    pub const CONSTRUCTOR_ARRAY: &str = "[Ljava/lang/reflect/Constructor;";
    /// The name token every constructor lookup resolves to.
    pub const CONSTRUCTOR_NAME: &str = "<init>";
}

/// An interned DEX type.
///
/// A `DexType` is little more than its descriptor plus the flavor queries the analysis
/// needs. Instances are created exclusively by [`TypeRegistry::intern`] so that equal
/// descriptors share one allocation.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct DexType {
    descriptor: Arc<str>,
}

/// A canonical, reference-counted handle to an interned type.
pub type TypeRc = Arc<DexType>;

impl DexType {
    fn new(descriptor: &str) -> Self {
        DexType {
            descriptor: Arc::from(descriptor),
        }
    }

    /// Returns the descriptor string of this type.
    #[must_use]
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Returns `true` if this is the `void` type.
    #[must_use]
    pub fn is_void(&self) -> bool {
        &*self.descriptor == "V"
    }

    /// Returns `true` if this is a non-void primitive type.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(
            &*self.descriptor,
            "Z" | "B" | "S" | "C" | "I" | "J" | "F" | "D"
        )
    }

    /// Returns `true` if this is a reference type (class or array).
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.descriptor.starts_with('L') || self.is_array()
    }

    /// Returns `true` if this is an array type.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.descriptor.starts_with('[')
    }

    /// Returns `true` if this primitive occupies two registers (`long` or `double`).
    #[must_use]
    pub fn is_wide(&self) -> bool {
        matches!(&*self.descriptor, "J" | "D")
    }

    /// Returns the descriptor of the component type if this is an array.
    #[must_use]
    pub fn component_descriptor(&self) -> Option<&str> {
        self.descriptor.strip_prefix('[')
    }
}

impl std::fmt::Display for DexType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.descriptor)
    }
}

/// Interning registry for DEX types.
///
/// The registry maps descriptors to canonical [`TypeRc`] handles. It is safe for
/// concurrent read and intern operations, so independent analyses may share one
/// registry across threads.
///
/// # Examples
///
/// ```rust
/// use dexscope::metadata::TypeRegistry;
///
/// let types = TypeRegistry::new();
/// let a = types.intern("Lcom/foo/Bar;");
/// let b = types.intern("Lcom/foo/Bar;");
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// assert!(a.is_object());
/// ```
#[derive(Debug)]
pub struct TypeRegistry {
    types: SkipMap<String, TypeRc>,
}

impl TypeRegistry {
    /// Creates a new empty type registry.
    #[must_use]
    pub fn new() -> Self {
        TypeRegistry {
            types: SkipMap::new(),
        }
    }

    /// Interns a type by descriptor, returning its canonical handle.
    ///
    /// Repeated calls with an equal descriptor return clones of the same `Arc`.
    pub fn intern(&self, descriptor: &str) -> TypeRc {
        if let Some(existing) = self.types.get(descriptor) {
            return existing.value().clone();
        }
        self.types
            .get_or_insert(descriptor.to_string(), Arc::new(DexType::new(descriptor)))
            .value()
            .clone()
    }

    /// Looks up a type without interning it.
    #[must_use]
    pub fn get(&self, descriptor: &str) -> Option<TypeRc> {
        self.types.get(descriptor).map(|entry| entry.value().clone())
    }

    /// Returns the component type of an array type, interning it on demand.
    ///
    /// Returns `None` if `ty` is not an array.
    #[must_use]
    pub fn array_component(&self, ty: &DexType) -> Option<TypeRc> {
        ty.component_descriptor().map(|d| self.intern(d))
    }

    /// Returns the number of interned types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types have been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
