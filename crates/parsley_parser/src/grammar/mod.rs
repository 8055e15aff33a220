//! The grammar, written as methods on [`Parser`].
//!
//! This module holds the program entry, statement lists with their directive
//! prologues, and identifier handling. The rest of the language is split by
//! area into the submodules.

mod class;
mod expression;
mod function;
mod jsx;
mod module;
mod object;
mod pattern;
mod statement;
mod template;
mod types;
mod typescript;

use crate::parser::Parser;
use crate::root::Root;
use crate::scope::{ScopeName, ScopeValue};
use crate::speculation::PResult;
use crate::utilities::{is_reserved_word, is_strict_bind_only_reserved, is_strict_reserved_word};
use crate::InternalError;
use parsley_ast::{
    CommentStore, Directive, Expression, Identifier, InterpreterDirective, Placeholder, Statement,
    StringLiteral,
};
use parsley_core::{Position, SourceSpan};
use parsley_diagnostics::messages;
use parsley_scanner::{Scanner, TokenKind};

impl<'a> Parser<'a> {
    // ========================================================================
    // Program
    // ========================================================================

    pub(crate) fn parse_root(mut self) -> PResult<Root<'a>> {
        let interpreter = self.parse_interpreter();
        self.next()?;

        let (directives, statements) = if self.state.in_module {
            let scopes = [
                (ScopeName::Strict, ScopeValue::TRUE),
                (ScopeName::Async, ScopeValue::TRUE),
            ];
            self.with_scopes(&scopes, |p| p.parse_body(TokenKind::Eof, true))?
        } else {
            self.parse_body(TokenKind::Eof, true)?
        };

        if let Some(name) = self.state.scopes.first_unbalanced() {
            return Err(InternalError::UnbalancedScope(name).into());
        }

        let span = SourceSpan::new(Position::START, self.end_of_input());
        let data = self.node_data_at(span);
        let has_body = !directives.is_empty() || !statements.is_empty();
        let attachments = self.finish_comments(&data, has_body);

        Ok(Root {
            data,
            interpreter,
            directives: self.alloc_vec(directives),
            statements: self.alloc_vec(statements),
            source_type: self.source_type,
            syntax: self.state.syntax_used,
            corrupt: self.state.corrupt,
            has_hoisted_vars: self.state.has_hoisted_vars,
            diagnostics: self.state.diagnostics.to_vec(),
            comments: CommentStore::new(self.state.comments.to_vec()),
            attachments,
            tokens: self.state.tokens.to_vec(),
            interner: self.interner.clone(),
        })
    }

    /// `#!` on the very first line.
    fn parse_interpreter(&mut self) -> Option<InterpreterDirective<'a>> {
        let (value_start, end) = Scanner::new(self.text).read_interpreter()?;
        self.state.index = end;
        let span = SourceSpan::new(Position::START, self.position(end));
        Some(InterpreterDirective {
            data: self.node_data_at(span),
            value: self.slice(value_start as u32, end as u32),
        })
    }

    // ========================================================================
    // Statement lists
    // ========================================================================

    /// A statement list with a directive prologue, up to (not including) `end`.
    pub(crate) fn parse_body(
        &mut self,
        end: TokenKind,
        top_level: bool,
    ) -> PResult<(Vec<Directive<'a>>, Vec<Statement<'a>>)> {
        let mut directives = Vec::new();
        let mut statements = Vec::new();
        let mut use_strict = false;

        while self.at(TokenKind::String) {
            let statement = self.parse_statement_list_item(top_level)?;
            match self.as_directive(&statement) {
                Some(directive) => {
                    use_strict |= directive.value == "use strict";
                    directives.push(directive);
                }
                None => {
                    statements.push(statement);
                    break;
                }
            }
        }

        if use_strict && !self.is_strict() {
            self.with_scope(ScopeName::Strict, ScopeValue::TRUE, |p| {
                p.parse_statements_into(end, top_level, &mut statements)
            })?;
        } else {
            self.parse_statements_into(end, top_level, &mut statements)?;
        }
        Ok((directives, statements))
    }

    /// Statements up to `end`. A statement that consumed nothing has already
    /// been reported; its token is skipped so the loop always advances.
    pub(crate) fn parse_statements_into(
        &mut self,
        end: TokenKind,
        top_level: bool,
        statements: &mut Vec<Statement<'a>>,
    ) -> PResult<()> {
        while !self.at(end) && !self.at(TokenKind::Eof) {
            let before = self.state.start.index;
            let statement = self.parse_statement_list_item(top_level)?;
            statements.push(statement);
            if self.state.start.index == before && !self.at(end) && !self.at(TokenKind::Eof) {
                self.next()?;
            }
        }
        Ok(())
    }

    /// An unparenthesized string expression statement in a prologue.
    fn as_directive(&self, statement: &Statement<'a>) -> Option<Directive<'a>> {
        let Statement::Expression(statement) = statement else {
            return None;
        };
        let Expression::String(literal) = statement.expression else {
            return None;
        };
        let raw = self.slice(literal.data.span.start.index, literal.data.span.end.index);
        let mut chars = raw.chars();
        let quote = chars.next()?;
        let body = chars.as_str();
        let value = body.strip_suffix(quote).unwrap_or(body);
        Some(Directive {
            data: statement.data,
            value,
        })
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    fn identifier_from_token(&mut self) -> PResult<Identifier> {
        let start = self.start_node();
        let name = self.intern(self.token_text());
        self.next()?;
        Ok(Identifier {
            data: self.finish_node(start),
            name,
        })
    }

    pub(crate) fn missing_identifier(&mut self) -> Identifier {
        Identifier {
            data: self.missing_node(),
            name: self.intern(""),
        }
    }

    fn expected_identifier(&mut self) -> PResult<Identifier> {
        let found = self.state.kind.describe();
        let span = self.token_span();
        self.report_corrupt(&messages::EXPECTED_IDENTIFIER, &[&found], span)?;
        Ok(self.missing_identifier())
    }

    /// A name where reserved words are fine: after `.`, as a property key,
    /// in import and export lists.
    pub(crate) fn parse_identifier_name(&mut self) -> PResult<Identifier> {
        if !self.at(TokenKind::Name) && !self.state.kind.is_keyword() {
            return self.expected_identifier();
        }
        if matches!(self.state.kind, TokenKind::Function | TokenKind::Class)
            && !matches!(self.state.last_kind, TokenKind::Dot | TokenKind::QuestionDot)
        {
            self.drop_function_context();
        }
        self.with_scope(ScopeName::PropertyName, ScopeValue::TRUE, |p| {
            p.identifier_from_token()
        })
    }

    /// An identifier in expression position.
    pub(crate) fn parse_identifier_reference(&mut self) -> PResult<Identifier> {
        if !self.at(TokenKind::Name) {
            return self.expected_identifier();
        }
        let span = self.token_span();
        let id = self.identifier_from_token()?;
        let name = self.name_of(&id).to_string();
        self.check_reserved_word(&name, span, false)?;
        Ok(id)
    }

    /// An identifier that declares a binding. A reserved word is reported but
    /// still consumed, so `var if = 1` recovers in place.
    pub(crate) fn parse_binding_identifier(&mut self) -> PResult<Identifier> {
        let span = self.token_span();
        if self.state.kind.is_keyword() {
            if self.ts_enabled() && self.at(TokenKind::This) {
                return self.identifier_from_token();
            }
            let word = self.token_text().to_string();
            self.report(&messages::RESERVED_WORD, &[&word], span)?;
            return self.identifier_from_token();
        }
        if !self.at(TokenKind::Name) {
            return self.expected_identifier();
        }
        let id = self.identifier_from_token()?;
        let name = self.name_of(&id).to_string();
        self.check_reserved_word(&name, span, true)?;
        Ok(id)
    }

    pub(crate) fn check_reserved_word(
        &mut self,
        word: &str,
        span: SourceSpan,
        binding: bool,
    ) -> PResult<()> {
        if self.in_scope(ScopeName::PropertyName) {
            return Ok(());
        }
        match word {
            "yield" if self.in_generator() && self.in_scope(ScopeName::Parameters) => {
                self.report(&messages::YIELD_IN_PARAMETERS, &[], span)
            }
            "yield" if self.in_generator() => self.report(&messages::RESERVED_WORD, &[word], span),
            "await" if self.in_async() && self.in_scope(ScopeName::Parameters) => {
                self.report(&messages::AWAIT_IN_PARAMETERS, &[], span)
            }
            "await" if self.in_async() || self.state.in_module => {
                self.report(&messages::RESERVED_WORD, &[word], span)
            }
            "arguments" if !binding && self.in_scope(ScopeName::ClassProperty) => {
                self.report(&messages::ARGUMENTS_IN_CLASS_FIELD, &[], span)
            }
            _ if is_reserved_word(word, false) => {
                self.report(&messages::RESERVED_WORD, &[word], span)
            }
            _ if self.is_strict()
                && (is_strict_reserved_word(word)
                    || (binding && is_strict_bind_only_reserved(word))) =>
            {
                self.report(&messages::STRICT_RESERVED_WORD, &[word], span)
            }
            _ => Ok(()),
        }
    }

    // ========================================================================
    // Shared literals
    // ========================================================================

    pub(crate) fn parse_string_literal(&mut self) -> PResult<StringLiteral<'a>> {
        let start = self.start_node();
        if !self.at(TokenKind::String) {
            let found = self.state.kind.describe();
            let span = self.token_span();
            self.report_corrupt(&messages::EXPECTED_TOKEN, &["string", &found], span)?;
            return Ok(StringLiteral {
                data: self.missing_node(),
                value: "",
            });
        }
        let value = self.alloc_str(self.token_text());
        self.next()?;
        Ok(StringLiteral {
            data: self.finish_node(start),
            value,
        })
    }

    /// `%%name%%` in a template source.
    pub(crate) fn parse_placeholder(&mut self) -> PResult<Placeholder> {
        let start = self.start_node();
        if self.source_type != parsley_ast::SourceType::Template {
            let span = self.token_span();
            self.report_corrupt(&messages::PLACEHOLDER_OUTSIDE_TEMPLATE, &[], span)?;
        }
        self.expect(TokenKind::Placeholder)?;
        let name = self.parse_identifier_name()?;
        self.expect(TokenKind::Placeholder)?;
        Ok(Placeholder {
            data: self.finish_node(start),
            name,
        })
    }
}
