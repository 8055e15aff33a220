//! The result of a parse.

use parsley_ast::{
    CommentAttachments, CommentStore, Directive, InterpreterDirective, NodeData, SourceType,
    Statement, SyntaxSet,
};
use parsley_core::{Atom, SourceSpan, StringInterner};
use parsley_diagnostics::Diagnostic;
use parsley_scanner::Token;

/// A parsed file: the program node plus everything collected on the way.
///
/// The program spans the whole input, from the first byte to the end,
/// whatever whitespace or comments surround its statements.
#[derive(Debug)]
pub struct Root<'a> {
    pub data: NodeData,
    pub interpreter: Option<InterpreterDirective<'a>>,
    pub directives: &'a [Directive<'a>],
    pub statements: &'a [Statement<'a>],
    pub source_type: SourceType,
    /// Syntax extensions the file actually used.
    pub syntax: SyntaxSet,
    /// Some diagnostic left the tree structurally unreliable.
    pub corrupt: bool,
    pub has_hoisted_vars: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub comments: CommentStore,
    pub attachments: CommentAttachments,
    /// Consumed tokens in source order. Empty unless token capture was requested.
    pub tokens: Vec<Token>,
    pub interner: StringInterner,
}

impl<'a> Root<'a> {
    #[inline]
    pub fn span(&self) -> SourceSpan {
        self.data.span
    }

    pub fn name(&self, atom: Atom) -> &str {
        self.interner.resolve(atom)
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
