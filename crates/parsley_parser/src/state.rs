//! The parse state: everything that must be rewound when a speculative
//! branch is discarded.
//!
//! The parser owns exactly one live [`ParseState`]. Branches and lookahead
//! clone it, try something, and either install the clone or throw it away.
//! Append-only collections are [`PersistentLog`]s so a clone only copies the
//! handful of small stacks.

use crate::context::LexicalContext;
use crate::finalize::{CommentRef, OpenNode};
use crate::scope::NamedScopes;
use parsley_ast::{Comment, NodeComments, NodeId, SyntaxSet};
use parsley_core::{Atom, PersistentLog, Position, SourceSpan};
use parsley_diagnostics::Diagnostic;
use parsley_scanner::{Token, TokenFlags, TokenKind, TokenValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Loop,
    Switch,
    Statement,
}

/// An enclosing label, or an unlabeled loop / switch (`name: None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    pub name: Option<Atom>,
    pub kind: LabelKind,
}

#[derive(Clone)]
pub struct ParseState {
    /// Byte index where the next token scan starts.
    pub index: usize,

    // Current token
    pub kind: TokenKind,
    pub value: TokenValue,
    pub flags: TokenFlags,
    /// Byte offset of the construct a token flag refers to (octal escape, legacy octal).
    pub special_at: Option<usize>,
    pub start: Position,
    pub end: Position,
    /// A line terminator appeared between the previous token and this one.
    pub line_break_before: bool,

    // Previous token
    pub last_kind: TokenKind,
    pub last_start: Position,
    pub last_end: Position,

    // Lexical disambiguation
    pub contexts: Vec<LexicalContext>,
    pub expr_allowed: bool,

    pub scopes: NamedScopes,

    // Append-only outputs
    pub diagnostics: PersistentLog<Diagnostic>,
    pub tokens: PersistentLog<Token>,
    pub comments: PersistentLog<Comment>,
    /// Comment associations of nodes that have left the open-node stack.
    pub attachments: PersistentLog<(NodeId, NodeComments)>,

    // Comment attachment bookkeeping
    pub comment_stack: Vec<OpenNode>,
    pub leading_comments: Vec<CommentRef>,
    pub trailing_comments: Vec<CommentRef>,
    pub comment_previous_end: Option<u32>,

    // Pending-index markers
    pub comma_after_spread_at: Option<Position>,
    pub shorthand_default_at: Option<Position>,
    pub invalid_template_escape_at: Option<Position>,

    /// Start offset of the expression that may turn out to be an arrow's parameter.
    pub potential_arrow_at: Option<u32>,
    pub labels: Vec<Label>,
    pub exported_names: PersistentLog<(Atom, SourceSpan)>,

    /// `in` is not a binary operator here (the head of a `for` statement).
    pub no_in: bool,
    pub in_ambient: bool,
    pub is_lookahead: bool,
    pub in_module: bool,
    pub corrupt: bool,
    pub has_hoisted_vars: bool,
    pub syntax_used: SyntaxSet,
}

impl ParseState {
    pub fn new(in_module: bool, in_ambient: bool) -> Self {
        Self {
            index: 0,
            kind: TokenKind::Eof,
            value: TokenValue::None,
            flags: TokenFlags::NONE,
            special_at: None,
            start: Position::START,
            end: Position::START,
            line_break_before: false,
            last_kind: TokenKind::Eof,
            last_start: Position::START,
            last_end: Position::START,
            contexts: vec![LexicalContext::BRACE_STATEMENT],
            expr_allowed: true,
            scopes: NamedScopes::new(),
            diagnostics: PersistentLog::new(),
            tokens: PersistentLog::new(),
            comments: PersistentLog::new(),
            attachments: PersistentLog::new(),
            comment_stack: Vec::new(),
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
            comment_previous_end: None,
            comma_after_spread_at: None,
            shorthand_default_at: None,
            invalid_template_escape_at: None,
            potential_arrow_at: None,
            labels: Vec::new(),
            exported_names: PersistentLog::new(),
            no_in: false,
            in_ambient,
            is_lookahead: false,
            in_module,
            corrupt: false,
            has_hoisted_vars: false,
            syntax_used: SyntaxSet::empty(),
        }
    }

    pub fn span(&self) -> SourceSpan {
        SourceSpan::new(self.start, self.end)
    }
}

/// The part of a scanned-ahead token that lookahead callers inspect.
#[derive(Debug, Clone, PartialEq)]
pub struct LookaheadToken {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub start: Position,
    pub line_break_before: bool,
}

impl LookaheadToken {
    pub fn is_name(&self, word: &str) -> bool {
        self.kind == TokenKind::Name && self.value.as_str() == word
    }
}
