//! Interning for identifier names.
//!
//! Identifier nodes store an [`Atom`] rather than an owned string. The
//! interner is shared between the parser and the tree it produces.

use lasso::{Spur, ThreadedRodeo};
use std::fmt;
use std::sync::Arc;

/// A handle to an interned name. Comparing two atoms is an integer compare.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Atom(Spur);

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({:?})", self.0)
    }
}

/// Thread-safe name table.
///
/// Cloning is cheap and yields a handle to the same table.
#[derive(Clone)]
pub struct StringInterner {
    rodeo: Arc<ThreadedRodeo>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self {
            rodeo: Arc::new(ThreadedRodeo::new()),
        }
    }

    #[inline]
    pub fn intern(&self, s: &str) -> Atom {
        Atom(self.rodeo.get_or_intern(s))
    }

    /// Look up a name without interning it.
    #[inline]
    pub fn get(&self, s: &str) -> Option<Atom> {
        self.rodeo.get(s).map(Atom)
    }

    #[inline]
    pub fn resolve(&self, atom: Atom) -> &str {
        self.rodeo.resolve(&atom.0)
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_resolve() {
        let names = StringInterner::new();
        let a = names.intern("foo");
        let b = names.intern("foo");
        let c = names.intern("bar");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(names.resolve(c), "bar");
    }

    #[test]
    fn test_clones_share_the_table() {
        let names = StringInterner::new();
        let handle = names.clone();
        let a = handle.intern("shared");
        assert_eq!(names.get("shared"), Some(a));
        assert!(names.get("missing").is_none());
    }
}
