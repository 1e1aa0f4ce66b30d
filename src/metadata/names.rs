//! Conversion between external and internal type names.
//!
//! Java source code refers to types by their external name (`java.util.List`), while the
//! DEX file format and everything built on top of it uses descriptor form
//! (`Ljava/util/List;`). Reflective lookups such as `Class.forName` take the external form,
//! so the reflection analysis needs to convert the string constants it tracks into
//! descriptors before it can intern them as types.

/// Converts an external type name to its internal descriptor form.
///
/// `"java.util.List"` becomes `"Ljava/util/List;"`. Array types in external form use
/// trailing `[]` pairs and become leading `[` characters: `"java.lang.String[]"` becomes
/// `"[Ljava/lang/String;"`. Primitive names (`"int"`, `"boolean"`, ...) map to their
/// single-letter descriptors.
///
/// # Examples
///
/// ```rust
/// use dexscope::metadata::external_to_internal;
///
/// assert_eq!(external_to_internal("java.util.List"), "Ljava/util/List;");
/// assert_eq!(external_to_internal("int"), "I");
/// assert_eq!(external_to_internal("java.lang.String[]"), "[Ljava/lang/String;");
/// ```
#[must_use]
pub fn external_to_internal(external: &str) -> String {
    let mut dims = 0;
    let mut base = external;
    while let Some(stripped) = base.strip_suffix("[]") {
        base = stripped;
        dims += 1;
    }

    let mut result = String::with_capacity(base.len() + dims + 2);
    for _ in 0..dims {
        result.push('[');
    }
    match primitive_descriptor(base) {
        Some(c) => result.push(c),
        None => {
            result.push('L');
            for c in base.chars() {
                result.push(if c == '.' { '/' } else { c });
            }
            result.push(';');
        }
    }
    result
}

/// Converts an internal descriptor to its external name.
///
/// The inverse of [`external_to_internal`]: `"Ljava/util/List;"` becomes
/// `"java.util.List"` and `"[I"` becomes `"int[]"`. Descriptors that do not follow the
/// `L...;` / primitive grammar are returned unchanged.
#[must_use]
pub fn internal_to_external(internal: &str) -> String {
    let dims = internal.chars().take_while(|&c| c == '[').count();
    let base = &internal[dims..];

    let mut result = match base.strip_prefix('L').and_then(|s| s.strip_suffix(';')) {
        Some(name) => name.replace('/', "."),
        None => primitive_name(base).unwrap_or(base).to_string(),
    };
    for _ in 0..dims {
        result.push_str("[]");
    }
    result
}

fn primitive_descriptor(name: &str) -> Option<char> {
    match name {
        "void" => Some('V'),
        "boolean" => Some('Z'),
        "byte" => Some('B'),
        "short" => Some('S'),
        "char" => Some('C'),
        "int" => Some('I'),
        "long" => Some('J'),
        "float" => Some('F'),
        "double" => Some('D'),
        _ => None,
    }
}

fn primitive_name(descriptor: &str) -> Option<&'static str> {
    match descriptor {
        "V" => Some("void"),
        "Z" => Some("boolean"),
        "B" => Some("byte"),
        "S" => Some("short"),
        "C" => Some("char"),
        "I" => Some("int"),
        "J" => Some("long"),
        "F" => Some("float"),
        "D" => Some("double"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_to_internal_class() {
        assert_eq!(external_to_internal("com.foo.Bar"), "Lcom/foo/Bar;");
        assert_eq!(
            external_to_internal("java.lang.String"),
            "Ljava/lang/String;"
        );
    }

    #[test]
    fn test_external_to_internal_unpackaged() {
        assert_eq!(external_to_internal("Main"), "LMain;");
    }

    #[test]
    fn test_external_to_internal_primitives() {
        assert_eq!(external_to_internal("int"), "I");
        assert_eq!(external_to_internal("boolean"), "Z");
        assert_eq!(external_to_internal("void"), "V");
    }

    #[test]
    fn test_external_to_internal_arrays() {
        assert_eq!(external_to_internal("int[]"), "[I");
        assert_eq!(
            external_to_internal("java.lang.String[][]"),
            "[[Ljava/lang/String;"
        );
    }

    #[test]
    fn test_internal_to_external() {
        assert_eq!(internal_to_external("Ljava/util/List;"), "java.util.List");
        assert_eq!(internal_to_external("[I"), "int[]");
        assert_eq!(
            internal_to_external("[[Ljava/lang/String;"),
            "java.lang.String[][]"
        );
    }

    #[test]
    fn test_round_trip() {
        for name in ["com.foo.Bar", "int", "java.lang.Object[]"] {
            assert_eq!(internal_to_external(&external_to_internal(name)), name);
        }
    }
}
