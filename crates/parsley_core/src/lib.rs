//! parsley_core: shared building blocks for the parsley parser.
//!
//! Provides source positions and the line map, name interning, the AST
//! arena, and the persistent log used for cheap parse-state snapshots.

pub mod arena;
pub mod collections;
pub mod intern;
pub mod text;

pub use arena::AstArena;
pub use collections::{FxHashMap, FxHashSet, PersistentLog};
pub use intern::{Atom, StringInterner};
pub use text::{LineMap, Position, SourceSpan, TextPos};
