//! parsley_ast: syntax tree definitions for JavaScript, JSX and TypeScript.
//!
//! The tree is plain data allocated in a bump arena. Comments live in a side
//! table keyed by node identity rather than on the nodes themselves.

pub mod comments;
pub mod node;
pub mod operators;
pub mod types;

pub use comments::{Comment, CommentAttachments, CommentId, CommentKind, CommentStore, NodeComments};
pub use node::*;
pub use operators::*;
pub use types::{ModifierFlags, SourceType, Syntax, SyntaxSet};
