//! Statements.

use crate::parser::Parser;
use crate::speculation::PResult;
use crate::state::{Label, LabelKind};
use parsley_ast::{
    BlockStatement, BreakStatement, CatchClause, ContinueStatement, DoWhileStatement, Expression,
    ExpressionStatement, ForInStatement, ForInit, ForLeft, ForOfStatement, ForStatement,
    IfStatement, LabeledStatement, Pattern, ReturnStatement, Statement, SwitchCase,
    SwitchStatement, ThrowStatement, TryStatement, VariableDeclaration, VariableDeclarator,
    VariableKind, WhileStatement, WithStatement,
};
use parsley_core::{Position, SourceSpan};
use parsley_diagnostics::messages;
use parsley_scanner::TokenKind;
use tracing::trace;

/// Where a statement appears. Declarations are only allowed in lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatementContext {
    List { top_level: bool },
    /// The body of `if`, a loop, `with` or a label.
    Single,
}

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement_list_item(&mut self, top_level: bool) -> PResult<Statement<'a>> {
        self.parse_statement_in(StatementContext::List { top_level })
    }

    /// A statement in a position that only accepts one.
    pub(crate) fn parse_statement(&mut self) -> PResult<Statement<'a>> {
        self.parse_statement_in(StatementContext::Single)
    }

    fn parse_statement_in(&mut self, context: StatementContext) -> PResult<Statement<'a>> {
        let start = self.start_node();
        let top_level = matches!(context, StatementContext::List { top_level: true });
        let kind = self.state.kind;
        match kind {
            TokenKind::BraceL => self.parse_block().map(Statement::Block),
            TokenKind::Semi => {
                self.next()?;
                Ok(Statement::Empty(self.finish_node(start)))
            }
            TokenKind::Var => self.parse_var_statement(start, VariableKind::Var, false),
            TokenKind::Const => {
                if self.lookahead()?.is_name("enum") {
                    return self.parse_enum_declaration(start, false);
                }
                self.check_lexical_context(context)?;
                self.parse_var_statement(start, VariableKind::Const, false)
            }
            TokenKind::Name if self.at_name("let") && self.is_let_declaration()? => {
                self.check_lexical_context(context)?;
                self.parse_var_statement(start, VariableKind::Let, false)
            }
            TokenKind::Name if self.at_name("async") && self.is_async_function()? => {
                self.next()?;
                let function = self.parse_function(start, true, true, false)?;
                Ok(Statement::FunctionDeclaration(function))
            }
            TokenKind::Function => {
                let function = self.parse_function(start, true, false, false)?;
                Ok(Statement::FunctionDeclaration(function))
            }
            TokenKind::Class => {
                self.check_lexical_context(context)?;
                let class = self.parse_class(start, true, false, false)?;
                Ok(Statement::ClassDeclaration(class))
            }
            TokenKind::If => self.parse_if_statement(start),
            TokenKind::For => self.parse_for_statement(start),
            TokenKind::While => self.parse_while_statement(start),
            TokenKind::Do => self.parse_do_statement(start),
            TokenKind::Return => self.parse_return_statement(start),
            TokenKind::Break | TokenKind::Continue => self.parse_break_continue(start),
            TokenKind::Throw => self.parse_throw_statement(start),
            TokenKind::Try => self.parse_try_statement(start),
            TokenKind::Switch => self.parse_switch_statement(start),
            TokenKind::With => self.parse_with_statement(start),
            TokenKind::Debugger => {
                self.next()?;
                self.semicolon()?;
                Ok(Statement::Debugger(self.finish_node(start)))
            }
            TokenKind::Import => {
                let next = self.lookahead()?.kind;
                if matches!(next, TokenKind::ParenL | TokenKind::Dot) {
                    return self.parse_expression_statement(start);
                }
                self.check_module_item(top_level)?;
                self.parse_import(start)
            }
            TokenKind::Export => {
                self.check_module_item(top_level)?;
                self.parse_export(start)
            }
            TokenKind::Name => {
                if let Some(statement) = self.try_parse_ts_declaration(start)? {
                    return Ok(statement);
                }
                self.parse_expression_statement(start)
            }
            kind if kind.starts_expr() => self.parse_expression_statement(start),
            _ => {
                self.unexpected()?;
                self.next()?;
                Ok(Statement::Missing(self.finish_node(start)))
            }
        }
    }

    fn check_lexical_context(&mut self, context: StatementContext) -> PResult<()> {
        if context == StatementContext::Single {
            let span = self.token_span();
            self.report(&messages::LEXICAL_IN_SINGLE_STATEMENT, &[], span)?;
        }
        Ok(())
    }

    fn check_module_item(&mut self, top_level: bool) -> PResult<()> {
        let span = self.token_span();
        if !self.state.in_module {
            self.report(&messages::IMPORT_EXPORT_IN_SCRIPT, &[], span)?;
        } else if !top_level {
            self.report(&messages::IMPORT_EXPORT_NOT_TOP_LEVEL, &[], span)?;
        }
        Ok(())
    }

    /// `let` starts a declaration when a binding follows it.
    fn is_let_declaration(&mut self) -> PResult<bool> {
        let next = self.lookahead()?;
        Ok(match next.kind {
            TokenKind::BracketL | TokenKind::BraceL | TokenKind::Name => true,
            TokenKind::In | TokenKind::Instanceof => false,
            kind => kind.is_keyword(),
        })
    }

    /// `async function` with no line break in between.
    pub(crate) fn is_async_function(&mut self) -> PResult<bool> {
        let next = self.lookahead()?;
        Ok(next.kind == TokenKind::Function && !next.line_break_before)
    }

    // ========================================================================
    // Blocks and simple statements
    // ========================================================================

    pub(crate) fn parse_block(&mut self) -> PResult<BlockStatement<'a>> {
        let start = self.start_node();
        self.expect(TokenKind::BraceL)?;
        let mut body = Vec::new();
        self.parse_statements_into(TokenKind::BraceR, false, &mut body)?;
        self.expect_closing(TokenKind::BraceR, "block", start)?;
        Ok(BlockStatement {
            data: self.finish_node(start),
            body: self.alloc_vec(body),
        })
    }

    pub(crate) fn parse_expression_statement(&mut self, start: Position) -> PResult<Statement<'a>> {
        let starts_with_name = self.at(TokenKind::Name);
        let expression = self.parse_expression()?;

        if starts_with_name && self.at(TokenKind::Colon) {
            if let Expression::Identifier(label) = expression {
                return self.parse_labeled_statement(start, label);
            }
        }
        if let Expression::Placeholder(placeholder) = expression {
            if self.can_insert_semicolon() || self.at(TokenKind::Semi) {
                self.semicolon()?;
                return Ok(Statement::Placeholder(placeholder));
            }
        }

        self.semicolon()?;
        Ok(Statement::Expression(ExpressionStatement {
            data: self.finish_node(start),
            expression: self.alloc(expression),
        }))
    }

    fn parse_labeled_statement(
        &mut self,
        start: Position,
        label: parsley_ast::Identifier,
    ) -> PResult<Statement<'a>> {
        self.next()?;
        let name = label.name;
        if self.state.labels.iter().any(|l| l.name == Some(name)) {
            let text = self.name_of(&label).to_string();
            self.report(&messages::DUPLICATE_LABEL, &[&text], label.data.span)?;
        }
        let kind = if matches!(self.state.kind, TokenKind::For | TokenKind::While | TokenKind::Do) {
            LabelKind::Loop
        } else {
            LabelKind::Statement
        };
        self.state.labels.push(Label {
            name: Some(name),
            kind,
        });
        let body = self.parse_statement();
        self.state.labels.pop();
        let body = body?;
        Ok(Statement::Labeled(LabeledStatement {
            data: self.finish_node(start),
            label,
            body: self.alloc(body),
        }))
    }

    fn parse_if_statement(&mut self, start: Position) -> PResult<Statement<'a>> {
        self.next()?;
        let test = self.parse_paren_expression()?;
        let consequent = self.parse_statement()?;
        let alternate = if self.eat(TokenKind::Else)? {
            let alternate = self.parse_statement()?;
            Some(self.alloc(alternate))
        } else {
            None
        };
        Ok(Statement::If(IfStatement {
            data: self.finish_node(start),
            test: self.alloc(test),
            consequent: self.alloc(consequent),
            alternate,
        }))
    }

    /// `( expression )` after `if`, `while`, `switch` and `with`.
    fn parse_paren_expression(&mut self) -> PResult<Expression<'a>> {
        let open = self.start_node();
        self.expect(TokenKind::ParenL)?;
        let expression = self.allow_in(|p| p.parse_expression())?;
        self.expect_closing(TokenKind::ParenR, "condition", open)?;
        Ok(expression)
    }

    fn parse_return_statement(&mut self, start: Position) -> PResult<Statement<'a>> {
        if !self.in_function() && !self.allow_return_outside_function {
            let span = self.token_span();
            self.report(&messages::RETURN_OUTSIDE_FUNCTION, &[], span)?;
        }
        self.next()?;
        let argument = if self.eat(TokenKind::Semi)? || self.can_insert_semicolon() {
            None
        } else {
            let argument = self.parse_expression()?;
            self.semicolon()?;
            Some(self.alloc(argument))
        };
        Ok(Statement::Return(ReturnStatement {
            data: self.finish_node(start),
            argument,
        }))
    }

    fn parse_break_continue(&mut self, start: Position) -> PResult<Statement<'a>> {
        let is_break = self.at(TokenKind::Break);
        let keyword_span = self.token_span();
        self.next()?;

        let label = if self.at(TokenKind::Name) && !self.can_insert_semicolon() {
            Some(self.parse_identifier_reference()?)
        } else {
            None
        };
        self.semicolon()?;

        match label {
            Some(label) => {
                let found = self.state.labels.iter().rev().find(|l| l.name == Some(label.name)).copied();
                match found {
                    None => {
                        let text = self.name_of(&label).to_string();
                        self.report(&messages::UNKNOWN_LABEL, &[&text], label.data.span)?;
                    }
                    Some(target) if !is_break && target.kind != LabelKind::Loop => {
                        self.report(&messages::ILLEGAL_CONTINUE, &[], keyword_span)?;
                    }
                    Some(_) => {}
                }
            }
            None => {
                let valid = self.state.labels.iter().any(|l| {
                    l.name.is_none() && (l.kind == LabelKind::Loop || (is_break && l.kind == LabelKind::Switch))
                });
                if !valid {
                    let message = if is_break {
                        &messages::ILLEGAL_BREAK
                    } else {
                        &messages::ILLEGAL_CONTINUE
                    };
                    self.report(message, &[], keyword_span)?;
                }
            }
        }

        let data = self.finish_node(start);
        Ok(if is_break {
            Statement::Break(BreakStatement { data, label })
        } else {
            Statement::Continue(ContinueStatement { data, label })
        })
    }

    fn parse_throw_statement(&mut self, start: Position) -> PResult<Statement<'a>> {
        self.next()?;
        if self.has_preceding_line_break() {
            let span = SourceSpan::empty(self.state.last_end);
            self.report(&messages::NEWLINE_AFTER_THROW, &[], span)?;
        }
        let argument = self.parse_expression()?;
        self.semicolon()?;
        Ok(Statement::Throw(ThrowStatement {
            data: self.finish_node(start),
            argument: self.alloc(argument),
        }))
    }

    fn parse_try_statement(&mut self, start: Position) -> PResult<Statement<'a>> {
        let keyword_span = self.token_span();
        self.next()?;
        let block = self.parse_block()?;

        let handler = if self.at(TokenKind::Catch) {
            let clause_start = self.start_node();
            self.next()?;
            let (param, param_type) = if self.eat(TokenKind::ParenL)? {
                let param = self.parse_binding_atom()?;
                let param_type = self.parse_type_annotation_opt()?;
                self.expect(TokenKind::ParenR)?;
                (Some(self.alloc(param)), param_type)
            } else {
                (None, None)
            };
            let body = self.parse_block()?;
            let data = self.finish_node(clause_start);
            Some(self.alloc(CatchClause {
                data,
                param,
                param_type,
                body,
            }))
        } else {
            None
        };

        let finalizer = if self.eat(TokenKind::Finally)? {
            Some(self.parse_block()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            self.report(&messages::MISSING_CATCH_OR_FINALLY, &[], keyword_span)?;
        }

        Ok(Statement::Try(TryStatement {
            data: self.finish_node(start),
            block,
            handler,
            finalizer,
        }))
    }

    fn parse_switch_statement(&mut self, start: Position) -> PResult<Statement<'a>> {
        self.next()?;
        let discriminant = self.parse_paren_expression()?;
        let open = self.start_node();
        self.expect(TokenKind::BraceL)?;

        self.state.labels.push(Label {
            name: None,
            kind: LabelKind::Switch,
        });
        let cases = self.parse_switch_cases();
        self.state.labels.pop();
        let cases = cases?;

        self.expect_closing(TokenKind::BraceR, "switch body", open)?;
        Ok(Statement::Switch(SwitchStatement {
            data: self.finish_node(start),
            discriminant: self.alloc(discriminant),
            cases: self.alloc_vec(cases),
        }))
    }

    fn parse_switch_cases(&mut self) -> PResult<Vec<SwitchCase<'a>>> {
        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.at(TokenKind::BraceR) && !self.at(TokenKind::Eof) {
            let case_start = self.start_node();
            let test = match self.state.kind {
                TokenKind::Case => {
                    self.next()?;
                    let test = self.allow_in(|p| p.parse_expression())?;
                    Some(self.alloc(test))
                }
                TokenKind::Default => {
                    if seen_default {
                        let span = self.token_span();
                        self.report(&messages::MULTIPLE_DEFAULT_CASES, &[], span)?;
                    }
                    seen_default = true;
                    self.next()?;
                    None
                }
                _ => {
                    self.unexpected()?;
                    self.next()?;
                    continue;
                }
            };
            self.expect(TokenKind::Colon)?;

            let mut consequent = Vec::new();
            while !matches!(
                self.state.kind,
                TokenKind::Case | TokenKind::Default | TokenKind::BraceR | TokenKind::Eof
            ) {
                let before = self.state.start.index;
                consequent.push(self.parse_statement_list_item(false)?);
                if self.state.start.index == before {
                    self.next()?;
                }
            }
            cases.push(SwitchCase {
                data: self.finish_node(case_start),
                test,
                consequent: self.alloc_vec(consequent),
            });
        }
        Ok(cases)
    }

    fn parse_with_statement(&mut self, start: Position) -> PResult<Statement<'a>> {
        if self.is_strict() {
            let span = self.token_span();
            self.report(&messages::WITH_IN_STRICT, &[], span)?;
        }
        self.next()?;
        let object = self.parse_paren_expression()?;
        let body = self.parse_statement()?;
        Ok(Statement::With(WithStatement {
            data: self.finish_node(start),
            object: self.alloc(object),
            body: self.alloc(body),
        }))
    }

    // ========================================================================
    // Loops
    // ========================================================================

    /// A loop body, with an unlabeled loop entry for `break` and `continue`.
    fn parse_loop_body(&mut self) -> PResult<Statement<'a>> {
        self.state.labels.push(Label {
            name: None,
            kind: LabelKind::Loop,
        });
        let body = self.parse_statement();
        self.state.labels.pop();
        body
    }

    fn parse_while_statement(&mut self, start: Position) -> PResult<Statement<'a>> {
        self.next()?;
        let test = self.parse_paren_expression()?;
        let body = self.parse_loop_body()?;
        Ok(Statement::While(WhileStatement {
            data: self.finish_node(start),
            test: self.alloc(test),
            body: self.alloc(body),
        }))
    }

    fn parse_do_statement(&mut self, start: Position) -> PResult<Statement<'a>> {
        self.next()?;
        let body = self.parse_loop_body()?;
        self.expect(TokenKind::While)?;
        let test = self.parse_paren_expression()?;
        self.eat(TokenKind::Semi)?;
        Ok(Statement::DoWhile(DoWhileStatement {
            data: self.finish_node(start),
            body: self.alloc(body),
            test: self.alloc(test),
        }))
    }

    fn parse_for_statement(&mut self, start: Position) -> PResult<Statement<'a>> {
        self.next()?;
        let await_at = self.token_span();
        let is_await = self.eat_name("await")?;
        if is_await && !self.in_async() {
            self.report(&messages::FOR_AWAIT_OUTSIDE_ASYNC, &[], await_at)?;
        }
        let open = self.start_node();
        self.expect(TokenKind::ParenL)?;

        if self.at(TokenKind::Semi) {
            return self.parse_for_rest(start, open, None);
        }

        let kind = self.state.kind;
        let declaration_kind = match kind {
            TokenKind::Var => Some(VariableKind::Var),
            TokenKind::Const => Some(VariableKind::Const),
            TokenKind::Name if self.at_name("let") && self.is_let_declaration()? => Some(VariableKind::Let),
            _ => None,
        };

        if let Some(kind) = declaration_kind {
            let decl_start = self.start_node();
            self.next()?;
            let declarations = self.disallow_in(|p| p.parse_var_declarators(kind, true, false))?;
            let data = self.finish_node(decl_start);
            let declaration = self.alloc(VariableDeclaration {
                data,
                kind,
                declarations,
                declare: false,
            });
            if self.at(TokenKind::In) || self.at_name("of") {
                self.check_for_in_of_declaration(declaration)?;
                return self.parse_for_in_of(start, open, is_await, ForLeft::Variable(declaration));
            }
            return self.parse_for_rest(start, open, Some(ForInit::Variable(declaration)));
        }

        let init = self.disallow_in(|p| p.parse_expression())?;
        if self.at(TokenKind::In) || self.at_name("of") {
            let what = if self.at(TokenKind::In) {
                "for-in statement"
            } else {
                "for-of statement"
            };
            let pattern = self.to_assignable(init, what)?;
            let pattern = self.alloc(pattern);
            return self.parse_for_in_of(start, open, is_await, ForLeft::Pattern(pattern));
        }
        let init = self.alloc(init);
        self.parse_for_rest(start, open, Some(ForInit::Expression(init)))
    }

    fn check_for_in_of_declaration(&mut self, declaration: &VariableDeclaration<'a>) -> PResult<()> {
        let what = if self.at(TokenKind::In) { "for-in" } else { "for-of" };
        if declaration.declarations.len() > 1 {
            self.report(&messages::FOR_IN_OF_MULTIPLE, &[what], declaration.data.span)?;
        }
        let legacy_var_in = declaration.kind == VariableKind::Var && self.at(TokenKind::In) && !self.is_strict();
        for declarator in declaration.declarations {
            if declarator.init.is_some() && !legacy_var_in {
                self.report(&messages::FOR_IN_OF_INITIALIZER, &[what], declarator.data.span)?;
            }
        }
        Ok(())
    }

    fn parse_for_rest(
        &mut self,
        start: Position,
        open: Position,
        init: Option<ForInit<'a>>,
    ) -> PResult<Statement<'a>> {
        self.expect(TokenKind::Semi)?;
        let test = if self.at(TokenKind::Semi) {
            None
        } else {
            let test = self.allow_in(|p| p.parse_expression())?;
            Some(self.alloc(test))
        };
        self.expect(TokenKind::Semi)?;
        let update = if self.at(TokenKind::ParenR) {
            None
        } else {
            let update = self.allow_in(|p| p.parse_expression())?;
            Some(self.alloc(update))
        };
        self.expect_closing(TokenKind::ParenR, "for statement head", open)?;
        let body = self.parse_loop_body()?;
        Ok(Statement::For(ForStatement {
            data: self.finish_node(start),
            init,
            test,
            update,
            body: self.alloc(body),
        }))
    }

    fn parse_for_in_of(
        &mut self,
        start: Position,
        open: Position,
        is_await: bool,
        left: ForLeft<'a>,
    ) -> PResult<Statement<'a>> {
        let is_in = self.at(TokenKind::In);
        self.next()?;
        let right = if is_in {
            self.allow_in(|p| p.parse_expression())?
        } else {
            self.allow_in(|p| p.parse_maybe_assign())?
        };
        self.expect_closing(TokenKind::ParenR, "for statement head", open)?;
        let body = self.parse_loop_body()?;
        let data = self.finish_node(start);
        let right = self.alloc(right);
        let body = self.alloc(body);
        Ok(if is_in {
            Statement::ForIn(ForInStatement { data, left, right, body })
        } else {
            Statement::ForOf(ForOfStatement {
                data,
                is_await,
                left,
                right,
                body,
            })
        })
    }

    // ========================================================================
    // Variable declarations
    // ========================================================================

    /// `var`, `let` or `const` as a statement; the keyword is current.
    pub(crate) fn parse_var_statement(
        &mut self,
        start: Position,
        kind: VariableKind,
        declare: bool,
    ) -> PResult<Statement<'a>> {
        self.next()?;
        let declarations = self.parse_var_declarators(kind, false, declare)?;
        self.semicolon()?;
        Ok(Statement::VariableDeclaration(VariableDeclaration {
            data: self.finish_node(start),
            kind,
            declarations,
            declare,
        }))
    }

    /// The declarator list after the keyword.
    pub(crate) fn parse_var_declarators(
        &mut self,
        kind: VariableKind,
        is_for: bool,
        declare: bool,
    ) -> PResult<&'a [VariableDeclarator<'a>]> {
        if kind == VariableKind::Var {
            self.state.has_hoisted_vars = true;
        }
        let mut declarations = Vec::new();
        loop {
            let decl_start = self.start_node();
            let id = self.parse_binding_atom()?;
            let definite = self.ts_enabled() && matches!(id, Pattern::Identifier(_)) && self.eat(TokenKind::Bang)?;
            let type_annotation = self.parse_type_annotation_opt()?;
            let init = if self.eat(TokenKind::Eq)? {
                let init = self.parse_maybe_assign()?;
                Some(self.alloc(init))
            } else {
                let ends_for_head = is_for && (self.at(TokenKind::In) || self.at_name("of"));
                let needs_init = kind == VariableKind::Const || !matches!(id, Pattern::Identifier(_));
                if needs_init && !ends_for_head && !declare && !self.state.in_ambient {
                    let span = id.span();
                    self.report(&messages::MISSING_INITIALIZER, &[kind.as_str()], span)?;
                }
                None
            };
            declarations.push(VariableDeclarator {
                data: self.finish_node(decl_start),
                id,
                type_annotation,
                definite,
                init,
            });
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        trace!(kind = kind.as_str(), count = declarations.len(), "variable declaration");
        Ok(self.alloc_vec(declarations))
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, ParseOptions};
    use parsley_ast::{SourceType, Statement};
    use parsley_core::AstArena;
    use parsley_diagnostics::messages;

    fn codes(source: &str) -> Vec<u32> {
        let arena = AstArena::new();
        let root = parse(&arena, &ParseOptions::new(source).with_source_type(SourceType::Script)).unwrap();
        root.diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_labels_and_jumps() {
        assert!(codes("a: for (;;) { continue a; }").is_empty());
        assert_eq!(codes("break;"), vec![messages::ILLEGAL_BREAK.code]);
        assert_eq!(codes("a: { continue a; }"), vec![messages::ILLEGAL_CONTINUE.code]);
        assert_eq!(codes("while (1) break b;"), vec![messages::UNKNOWN_LABEL.code]);
        assert_eq!(codes("a: a: ;"), vec![messages::DUPLICATE_LABEL.code]);
        assert!(codes("switch (x) { case 1: break; }").is_empty());
    }

    #[test]
    fn test_for_heads() {
        let arena = AstArena::new();
        let root = parse(&arena, &ParseOptions::new("for (const [a, b] of xs) {} for (k in o); for (;;) {}")).unwrap();
        assert!(root.diagnostics.is_empty());
        assert!(matches!(root.statements[0], Statement::ForOf(_)));
        assert!(matches!(root.statements[1], Statement::ForIn(_)));
        assert!(matches!(root.statements[2], Statement::For(_)));
        assert_eq!(codes("for (let a, b of c);"), vec![messages::FOR_IN_OF_MULTIPLE.code]);
    }

    #[test]
    fn test_let_and_async_declarations() {
        let arena = AstArena::new();
        let options = ParseOptions::new("let x = 1;\nasync function f() {}\nfor (let i of xs);")
            .with_source_type(SourceType::Script);
        let root = parse(&arena, &options).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        assert!(matches!(root.statements[0], Statement::VariableDeclaration(_)));
        let Statement::FunctionDeclaration(function) = &root.statements[1] else {
            panic!("expected a function declaration");
        };
        assert!(function.is_async);
        assert!(matches!(root.statements[2], Statement::ForOf(_)));
    }

    #[test]
    fn test_statement_errors() {
        assert_eq!(codes("return 1"), vec![messages::RETURN_OUTSIDE_FUNCTION.code]);
        assert_eq!(codes("try {}"), vec![messages::MISSING_CATCH_OR_FINALLY.code]);
        assert_eq!(codes("const a;"), vec![messages::MISSING_INITIALIZER.code]);
        assert_eq!(
            codes("switch (x) { default: default: }"),
            vec![messages::MULTIPLE_DEFAULT_CASES.code]
        );
        assert_eq!(codes("if (a) let b = 1;"), vec![messages::LEXICAL_IN_SINGLE_STATEMENT.code]);
        assert_eq!(codes("'use strict'; with (a) {}"), vec![messages::WITH_IN_STRICT.code]);
    }

    #[test]
    fn test_stray_token_recovers() {
        let arena = AstArena::new();
        let root = parse(&arena, &ParseOptions::new("a; ) b;")).unwrap();
        assert_eq!(root.diagnostics.len(), 1);
        assert!(root.corrupt);
        assert_eq!(root.statements.len(), 3);
    }
}
