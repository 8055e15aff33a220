//! Collection types shared by the parser crates.

use std::fmt;
use std::rc::Rc;

pub use rustc_hash::{FxHashMap, FxHashSet};

struct LogNode<T> {
    value: T,
    prev: Option<Rc<LogNode<T>>>,
}

/// An append-only log with O(1) clone.
///
/// Clones share every entry that existed at the time of the clone; pushes on
/// one copy are invisible to the others. This is what makes snapshotting the
/// parse state cheap: diagnostics, tokens and comments grow in place on the
/// live copy while a saved copy keeps pointing at the older prefix.
pub struct PersistentLog<T> {
    head: Option<Rc<LogNode<T>>>,
    len: usize,
}

impl<T> PersistentLog<T> {
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, value: T) {
        let prev = self.head.take();
        self.head = Some(Rc::new(LogNode { value, prev }));
        self.len += 1;
    }

    /// The most recently pushed entry.
    pub fn last(&self) -> Option<&T> {
        self.head.as_deref().map(|node| &node.value)
    }

    /// Iterate from newest to oldest.
    pub fn iter_rev(&self) -> RevIter<'_, T> {
        RevIter {
            next: self.head.as_deref(),
        }
    }

    /// Whether two logs share the same history.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Clone> PersistentLog<T> {
    /// Materialize the entries oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        let mut out: Vec<T> = self.iter_rev().cloned().collect();
        out.reverse();
        out
    }
}

impl<T> Clone for PersistentLog<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len,
        }
    }
}

impl<T> Default for PersistentLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for PersistentLog<T> {
    // Unlink iteratively so long logs don't overflow the stack.
    fn drop(&mut self) {
        let mut cur = self.head.take();
        while let Some(node) = cur {
            match Rc::try_unwrap(node) {
                Ok(mut node) => cur = node.prev.take(),
                Err(_) => break,
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentLog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<&T> = self.iter_rev().collect();
        entries.reverse();
        f.debug_list().entries(entries).finish()
    }
}

pub struct RevIter<'a, T> {
    next: Option<&'a LogNode<T>>,
}

impl<'a, T> Iterator for RevIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.next?;
        self.next = node.prev.as_deref();
        Some(&node.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_materialize() {
        let mut log = PersistentLog::new();
        log.push(1);
        log.push(2);
        log.push(3);
        assert_eq!(log.len(), 3);
        assert_eq!(log.last(), Some(&3));
        assert_eq!(log.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_clone_is_isolated() {
        let mut live = PersistentLog::new();
        live.push("a");
        let saved = live.clone();
        live.push("b");
        assert_eq!(saved.to_vec(), vec!["a"]);
        assert_eq!(live.to_vec(), vec!["a", "b"]);
        assert!(!saved.ptr_eq(&live));
    }

    #[test]
    fn test_long_log_drops() {
        let mut log = PersistentLog::new();
        for i in 0..200_000 {
            log.push(i);
        }
        drop(log);
    }
}
