//! Interned string pool.
//!
//! DEX string literals are interned: looking up the same text twice returns the same
//! canonical handle. Abstract values track string constants by these handles, and the
//! transfer function's rule matching relies on interning being stable (see the identity
//! contract in the reflection module).

use std::sync::Arc;

use dashmap::DashMap;

/// A canonical, reference-counted handle to an interned string.
///
/// Handles obtained from the same [`StringPool`] for the same text are clones of one
/// `Arc`, so both pointer identity and content equality agree.
pub type DexStringRc = Arc<str>;

/// Interning pool for string literals.
///
/// The pool is safe for concurrent read and intern operations; different analyses may
/// share one pool across threads.
///
/// # Examples
///
/// ```rust
/// use dexscope::metadata::StringPool;
///
/// let pool = StringPool::new();
/// let a = pool.intern("doIt");
/// let b = pool.intern("doIt");
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Default)]
pub struct StringPool {
    strings: DashMap<String, DexStringRc>,
}

impl StringPool {
    /// Creates a new empty string pool.
    #[must_use]
    pub fn new() -> Self {
        StringPool {
            strings: DashMap::new(),
        }
    }

    /// Interns a string, returning its canonical handle.
    ///
    /// Repeated calls with equal text return clones of the same `Arc`.
    pub fn intern(&self, value: &str) -> DexStringRc {
        if let Some(existing) = self.strings.get(value) {
            return existing.value().clone();
        }
        self.strings
            .entry(value.to_string())
            .or_insert_with(|| Arc::from(value))
            .value()
            .clone()
    }

    /// Looks up a string without interning it.
    ///
    /// Returns `None` if the text has never been interned.
    #[must_use]
    pub fn get(&self, value: &str) -> Option<DexStringRc> {
        self.strings.get(value).map(|entry| entry.value().clone())
    }

    /// Returns the number of interned strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns `true` if no strings have been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
