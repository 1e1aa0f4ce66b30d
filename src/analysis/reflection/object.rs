//! The abstract objects tracked by the reflection analysis.

use std::fmt;

use crate::metadata::{DexStringRc, TypeRc};

/// How a `Class` metaobject was produced.
///
/// A class object obtained through a reflective API (`const-class`, `Object.getClass()`,
/// `Class.forName(...)`) is a signal that the program is dynamically naming the type;
/// one merely loaded out of a `Class`-typed field or parameter is not. The two are kept
/// distinct so that downstream consumers only react to the former.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassObjectSource {
    /// The class object was produced by a reflective API.
    Reflection,
    /// The class object came from an ordinary value of declared type `Class`.
    NonReflection,
}

/// What a register may reflectively represent at a program point.
///
/// Equality is structural over each variant's attributes; for
/// [`Class`](AbstractObject::Class) the [`ClassObjectSource`] participates, so a class
/// obtained via `Class.forName("X")` is distinct from one loaded from a `Class`-typed
/// field with unknown target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbstractObject {
    /// A reference of declared type `ty` with no further information.
    Object {
        /// The declared type of the reference.
        ty: TypeRc,
    },
    /// A known string literal.
    String {
        /// The interned literal.
        literal: DexStringRc,
    },
    /// A reference to the `Class` metaobject for `ty`.
    ///
    /// `ty` is `None` when the class object's target type cannot be determined, e.g.
    /// when it was loaded from a field of declared type `Class`.
    Class {
        /// The type the class object stands for, if known.
        ty: Option<TypeRc>,
        /// Whether the class object came from a reflective API.
        source: ClassObjectSource,
    },
    /// A reflective field handle `owner.name`.
    Field {
        /// The class the lookup was performed on.
        owner: TypeRc,
        /// The field name.
        name: DexStringRc,
    },
    /// A reflective method handle `owner.name(...)`.
    ///
    /// Constructor lookups carry the literal constructor name token as `name`.
    Method {
        /// The class the lookup was performed on.
        owner: TypeRc,
        /// The method name.
        name: DexStringRc,
    },
}

impl AbstractObject {
    /// Returns `true` if this value indicates the program is dynamically naming a
    /// member: a [`Field`](Self::Field), a [`Method`](Self::Method), or a
    /// [`Class`](Self::Class) with reflective provenance.
    #[must_use]
    pub fn is_reflection_output(&self) -> bool {
        match self {
            AbstractObject::Field { .. } | AbstractObject::Method { .. } => true,
            AbstractObject::Class { source, .. } => *source == ClassObjectSource::Reflection,
            _ => false,
        }
    }
}

impl fmt::Display for AbstractObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbstractObject::Object { ty } => write!(f, "OBJECT{{{ty}}}"),
            AbstractObject::String { literal } => write!(f, "{:?}", &**literal),
            AbstractObject::Class { ty, source } => {
                let tag = match source {
                    ClassObjectSource::Reflection => "CLASS_REFLECT",
                    ClassObjectSource::NonReflection => "CLASS",
                };
                match ty {
                    Some(ty) => write!(f, "{tag}{{{ty}}}"),
                    None => write!(f, "{tag}{{}}"),
                }
            }
            AbstractObject::Field { owner, name } => write!(f, "FIELD{{{owner}:{name}}}"),
            AbstractObject::Method { owner, name } => write!(f, "METHOD{{{owner}:{name}}}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::DexContext;

    #[test]
    fn test_display_forms() {
        let ctx = DexContext::new();
        let bar = ctx.type_ref("Lcom/foo/Bar;");

        let object = AbstractObject::Object { ty: bar.clone() };
        assert_eq!(object.to_string(), "OBJECT{Lcom/foo/Bar;}");

        let string = AbstractObject::String {
            literal: ctx.string("doIt"),
        };
        assert_eq!(string.to_string(), "\"doIt\"");

        let empty = AbstractObject::String {
            literal: ctx.string(""),
        };
        assert_eq!(empty.to_string(), "\"\"");

        let class = AbstractObject::Class {
            ty: Some(bar.clone()),
            source: ClassObjectSource::NonReflection,
        };
        assert_eq!(class.to_string(), "CLASS{Lcom/foo/Bar;}");

        let reflected = AbstractObject::Class {
            ty: Some(bar.clone()),
            source: ClassObjectSource::Reflection,
        };
        assert_eq!(reflected.to_string(), "CLASS_REFLECT{Lcom/foo/Bar;}");

        let field = AbstractObject::Field {
            owner: bar.clone(),
            name: ctx.string("count"),
        };
        assert_eq!(field.to_string(), "FIELD{Lcom/foo/Bar;:count}");

        let method = AbstractObject::Method {
            owner: bar,
            name: ctx.string("doIt"),
        };
        assert_eq!(method.to_string(), "METHOD{Lcom/foo/Bar;:doIt}");
    }

    #[test]
    fn test_reflection_output_predicate() {
        let ctx = DexContext::new();
        let bar = ctx.type_ref("Lcom/foo/Bar;");

        assert!(AbstractObject::Field {
            owner: bar.clone(),
            name: ctx.string("f"),
        }
        .is_reflection_output());
        assert!(AbstractObject::Method {
            owner: bar.clone(),
            name: ctx.string("m"),
        }
        .is_reflection_output());
        assert!(AbstractObject::Class {
            ty: Some(bar.clone()),
            source: ClassObjectSource::Reflection,
        }
        .is_reflection_output());

        assert!(!AbstractObject::Class {
            ty: Some(bar.clone()),
            source: ClassObjectSource::NonReflection,
        }
        .is_reflection_output());
        assert!(!AbstractObject::Object { ty: bar }.is_reflection_output());
        assert!(!AbstractObject::String {
            literal: ctx.string("s"),
        }
        .is_reflection_output());
    }

    #[test]
    fn test_equality_is_structural() {
        let ctx = DexContext::new();
        let bar = ctx.type_ref("Lcom/foo/Bar;");

        let a = AbstractObject::Object { ty: bar.clone() };
        let b = AbstractObject::Object {
            ty: ctx.type_ref("Lcom/foo/Bar;"),
        };
        assert_eq!(a, b);

        // Source participates in Class equality.
        let reflective = AbstractObject::Class {
            ty: Some(bar.clone()),
            source: ClassObjectSource::Reflection,
        };
        let plain = AbstractObject::Class {
            ty: Some(bar),
            source: ClassObjectSource::NonReflection,
        };
        assert_ne!(reflective, plain);
    }
}
