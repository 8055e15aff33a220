//! Arena allocation for syntax trees.
//!
//! Every AST node is allocated from a bump arena owned by the caller of
//! `parse`, so a whole tree is freed at once when the arena is dropped.
//! Nodes built by discarded speculative branches stay in the arena until
//! then.

use bumpalo::Bump;

/// Owns the bump allocator a parse allocates into.
pub struct AstArena {
    bump: Bump,
}

impl AstArena {
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Pre-size the arena, typically to a small multiple of the source length.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bump: Bump::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn bump(&self) -> &Bump {
        &self.bump
    }

    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }

    /// Free every node while keeping the memory for the next parse.
    pub fn reset(&mut self) {
        self.bump.reset();
    }
}

impl Default for AstArena {
    fn default() -> Self {
        Self::new()
    }
}
