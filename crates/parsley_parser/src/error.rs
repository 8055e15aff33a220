//! Fatal parser errors.
//!
//! Recoverable problems in the input become diagnostics; what ends up here
//! is a broken parser invariant, and it aborts the whole parse.

use crate::scope::ScopeName;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    #[error("scope stack `{0}` is not empty at the end of the parse")]
    UnbalancedScope(ScopeName),

    #[error("popped the empty scope stack `{0}`")]
    EmptyScope(ScopeName),

    #[error("token at byte {start} starts before the previous token ends at byte {previous_end}")]
    TokenOutOfOrder { start: u32, previous_end: u32 },

    #[error("picked a branch finder that has no successful branch")]
    NoBranch,

    #[error("a diagnostic budget was exceeded outside of any speculative branch")]
    EscapedBudget,
}
