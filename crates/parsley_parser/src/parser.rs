//! The parser object and its token-level helpers.
//!
//! [`Parser`] owns the source text, the line map and exactly one live
//! [`ParseState`]. The grammar in `grammar/` is written as methods on it and
//! drives the tokenizer through `next`/`eat`/`expect`.

use crate::options::ParseOptions;
use crate::scope::{ScopeName, ScopeValue};
use crate::speculation::PResult;
use crate::state::ParseState;
use bumpalo::Bump;
use parsley_ast::{Identifier, NodeId, SourceType, Syntax, SyntaxSet};
use parsley_core::{Atom, LineMap, Position, SourceSpan, StringInterner};
use parsley_diagnostics::{messages, DiagnosticMessage};
use parsley_scanner::{TokenFlags, TokenKind};
use std::sync::Arc;

/// Move a Vec into the arena as a slice.
pub(crate) fn alloc_vec_in<T>(arena: &Bump, vec: Vec<T>) -> &[T] {
    arena.alloc_slice_fill_iter(vec)
}

pub struct Parser<'a> {
    pub(crate) arena: &'a Bump,
    /// The source text, copied into the arena so nodes can borrow from it.
    pub(crate) text: &'a str,
    pub(crate) line_map: LineMap,
    pub(crate) filename: Arc<str>,
    pub(crate) syntax: SyntaxSet,
    pub(crate) source_type: SourceType,
    pub(crate) allow_return_outside_function: bool,
    pub(crate) capture_tokens: bool,
    pub(crate) interner: StringInterner,
    next_node_id: u32,
    pub(crate) state: ParseState,
}

impl<'a> Parser<'a> {
    pub fn new(arena: &'a Bump, options: &ParseOptions) -> Self {
        let text: &'a str = arena.alloc_str(&options.input);
        let declaration_file = options.is_declaration_file();
        let mut syntax = options.syntax;
        if declaration_file {
            syntax |= SyntaxSet::TS;
        }
        Self {
            arena,
            text,
            line_map: LineMap::new(text),
            filename: Arc::from(options.path.as_str()),
            syntax,
            source_type: options.source_type,
            allow_return_outside_function: options.allow_return_outside_function,
            capture_tokens: options.tokens,
            interner: StringInterner::new(),
            next_node_id: 0,
            state: ParseState::new(options.source_type.is_module(), declaration_file),
        }
    }

    // ========================================================================
    // Positions, allocation, names
    // ========================================================================

    pub(crate) fn position(&self, index: usize) -> Position {
        self.line_map.position(self.text, index as u32)
    }

    pub(crate) fn end_of_input(&self) -> Position {
        self.position(self.text.len())
    }

    pub(crate) fn fresh_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    #[inline]
    pub(crate) fn alloc<T>(&self, value: T) -> &'a T {
        self.arena.alloc(value)
    }

    #[inline]
    pub(crate) fn alloc_vec<T>(&self, vec: Vec<T>) -> &'a [T] {
        alloc_vec_in(self.arena, vec)
    }

    #[inline]
    pub(crate) fn alloc_str(&self, text: &str) -> &'a str {
        self.arena.alloc_str(text)
    }

    /// The source text between two byte offsets.
    pub(crate) fn slice(&self, start: u32, end: u32) -> &'a str {
        self.text.get(start as usize..end as usize).unwrap_or("")
    }

    pub(crate) fn intern(&self, name: &str) -> Atom {
        self.interner.intern(name)
    }

    pub(crate) fn name_of(&self, id: &Identifier) -> &str {
        self.interner.resolve(id.name)
    }

    // ========================================================================
    // Syntax features
    // ========================================================================

    #[inline]
    pub(crate) fn jsx_enabled(&self) -> bool {
        self.syntax.contains(SyntaxSet::JSX)
    }

    #[inline]
    pub(crate) fn ts_enabled(&self) -> bool {
        self.syntax.contains(SyntaxSet::TS)
    }

    pub(crate) fn mark_syntax(&mut self, syntax: Syntax) {
        self.state.syntax_used |= syntax.flag();
    }

    /// Note a TypeScript-only construct, complaining when TS is off.
    pub(crate) fn require_ts(&mut self, span: SourceSpan) -> PResult<()> {
        self.mark_syntax(Syntax::Ts);
        if !self.ts_enabled() {
            self.emit(&messages::TS_NOT_ENABLED, &[], span, false)?;
        }
        Ok(())
    }

    // ========================================================================
    // Scopes
    // ========================================================================

    /// Run `f` with `value` pushed on the `name` stack. The value is popped on
    /// every exit path.
    pub(crate) fn with_scope<R>(
        &mut self,
        name: ScopeName,
        value: ScopeValue,
        f: impl FnOnce(&mut Self) -> PResult<R>,
    ) -> PResult<R> {
        self.state.scopes.push(name, value);
        let result = f(self);
        let popped = self.state.scopes.pop(name);
        match (result, popped) {
            (Err(abort), _) => Err(abort),
            (Ok(_), Err(error)) => Err(error.into()),
            (Ok(value), Ok(_)) => Ok(value),
        }
    }

    pub(crate) fn with_scopes<R>(
        &mut self,
        scopes: &[(ScopeName, ScopeValue)],
        f: impl FnOnce(&mut Self) -> PResult<R>,
    ) -> PResult<R> {
        for &(name, value) in scopes {
            self.state.scopes.push(name, value);
        }
        let result = f(self);
        let mut popped = Ok(());
        for &(name, _) in scopes.iter().rev() {
            if let Err(error) = self.state.scopes.pop(name) {
                popped = Err(error);
            }
        }
        match (result, popped) {
            (Err(abort), _) => Err(abort),
            (Ok(_), Err(error)) => Err(error.into()),
            (Ok(value), Ok(())) => Ok(value),
        }
    }

    #[inline]
    pub(crate) fn in_scope(&self, name: ScopeName) -> bool {
        self.state.scopes.in_scope(name)
    }

    pub(crate) fn is_strict(&self) -> bool {
        self.in_scope(ScopeName::Strict)
    }

    pub(crate) fn in_generator(&self) -> bool {
        self.in_scope(ScopeName::Generator)
    }

    pub(crate) fn in_async(&self) -> bool {
        self.in_scope(ScopeName::Async)
    }

    pub(crate) fn in_type(&self) -> bool {
        self.in_scope(ScopeName::Type)
    }

    /// Inside any function body (the generator stack has an entry per function).
    pub(crate) fn in_function(&self) -> bool {
        !self.state.scopes.is_empty(ScopeName::Generator)
    }

    /// Run `f` with `in` allowed as a binary operator again.
    pub(crate) fn allow_in<R>(&mut self, f: impl FnOnce(&mut Self) -> PResult<R>) -> PResult<R> {
        self.with_no_in(false, f)
    }

    /// Run `f` where a bare `in` ends the expression (a `for` head).
    pub(crate) fn disallow_in<R>(&mut self, f: impl FnOnce(&mut Self) -> PResult<R>) -> PResult<R> {
        self.with_no_in(true, f)
    }

    fn with_no_in<R>(&mut self, no_in: bool, f: impl FnOnce(&mut Self) -> PResult<R>) -> PResult<R> {
        let saved = std::mem::replace(&mut self.state.no_in, no_in);
        let result = f(self);
        self.state.no_in = saved;
        result
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.state.kind == kind
    }

    /// The current token is the unescaped identifier `word`.
    pub(crate) fn at_name(&self, word: &str) -> bool {
        self.state.kind == TokenKind::Name
            && !self.state.flags.contains(TokenFlags::ESCAPED)
            && self.state.value.as_str() == word
    }

    pub(crate) fn token_text(&self) -> &str {
        self.state.value.as_str()
    }

    pub(crate) fn token_span(&self) -> SourceSpan {
        self.state.span()
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> PResult<bool> {
        if self.at(kind) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn eat_name(&mut self, word: &str) -> PResult<bool> {
        if self.at_name(word) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume `kind` or report it as missing. Nothing is consumed on failure.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<bool> {
        if self.eat(kind)? {
            return Ok(true);
        }
        let expected = kind.as_str().unwrap_or("token");
        let found = self.state.kind.describe();
        let span = self.token_span();
        self.emit(&messages::EXPECTED_TOKEN, &[expected, &found], span, true)?;
        Ok(false)
    }

    /// Like [`Parser::expect`], but names the opening token when the closer is missing.
    pub(crate) fn expect_closing(
        &mut self,
        kind: TokenKind,
        what: &str,
        opened_at: Position,
    ) -> PResult<bool> {
        if self.eat(kind)? {
            return Ok(true);
        }
        let close = kind.as_str().unwrap_or("token");
        let open = match kind {
            TokenKind::ParenR => "(",
            TokenKind::BracketR => "[",
            TokenKind::BraceR => "{",
            TokenKind::Gt | TokenKind::JsxTagEnd => "<",
            _ => close,
        };
        let at = opened_at.to_string();
        let span = self.token_span();
        self.emit(&messages::UNCLOSED, &[what, close, open, &at], span, true)?;
        Ok(false)
    }

    pub(crate) fn expect_name(&mut self, word: &str) -> PResult<bool> {
        if self.eat_name(word)? {
            return Ok(true);
        }
        let found = self.state.kind.describe();
        let span = self.token_span();
        self.emit(&messages::EXPECTED_TOKEN, &[word, &found], span, true)?;
        Ok(false)
    }

    pub(crate) fn unexpected(&mut self) -> PResult<()> {
        let found = self.state.kind.describe();
        let span = self.token_span();
        self.emit(&messages::UNEXPECTED_TOKEN, &[&found], span, true)
    }

    /// A recoverable grammar violation that does not make the tree corrupt.
    pub(crate) fn report(
        &mut self,
        message: &DiagnosticMessage,
        args: &[&str],
        span: SourceSpan,
    ) -> PResult<()> {
        self.emit(message, args, span, false)
    }

    /// A violation that leaves the tree structurally unreliable.
    pub(crate) fn report_corrupt(
        &mut self,
        message: &DiagnosticMessage,
        args: &[&str],
        span: SourceSpan,
    ) -> PResult<()> {
        self.emit(message, args, span, true)
    }

    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.state.line_break_before
    }

    pub(crate) fn can_insert_semicolon(&self) -> bool {
        self.at(TokenKind::Eof) || self.at(TokenKind::BraceR) || self.state.line_break_before
    }

    /// Consume a statement terminator, applying automatic semicolon insertion.
    pub(crate) fn semicolon(&mut self) -> PResult<()> {
        if self.eat(TokenKind::Semi)? || self.can_insert_semicolon() {
            return Ok(());
        }
        let span = SourceSpan::empty(self.state.last_end);
        self.emit(&messages::EXPECTED_SEMICOLON, &[], span, true)
    }
}
