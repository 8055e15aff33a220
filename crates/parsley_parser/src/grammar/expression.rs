//! Expressions, from comma sequences down to atoms.
//!
//! Precedence climbing handles the binary operators. Constructs whose
//! meaning depends on what follows them (a parenthesized list that turns out
//! to be arrow parameters, `async (...)`, `<` in TypeScript) are resolved by
//! trying each reading as a speculative branch.

use crate::parser::Parser;
use crate::precedence::{
    assignment_operator, binary_operator, binary_precedence, unary_operator, update_operator,
    BinaryKind, OperatorPrecedence,
};
use crate::scope::{ClassKind, ScopeName, ScopeValue};
use crate::speculation::{BranchFinder, BranchOptions, PResult};
use parsley_ast::{
    AssignmentExpression, AwaitExpression, BigIntLiteral, BinaryExpression, BooleanLiteral,
    CallExpression, ConditionalExpression, Expression, ExpressionOrSpread, Identifier,
    LogicalExpression, LogicalOperator, MemberExpression, MemberProperty, MetaProperty,
    MethodKind, NewExpression, NumericLiteral, ParenthesizedExpression, PrivateName,
    RegExpLiteral, SequenceExpression, SpreadElement, TaggedTemplateExpression, TsAsExpression,
    TsNonNullExpression, TsSatisfiesExpression, TsTypeArguments, TsTypeAssertion,
    UnaryExpression, UnaryOperator, UpdateExpression, YieldExpression,
};
use parsley_core::{Position, SourceSpan};
use parsley_diagnostics::messages;
use parsley_scanner::{TokenKind, TokenValue};

use super::function::ArrowHead;

/// What a `(` at the start of an expression turned out to be.
enum ParenStart<'a> {
    Arrow(ArrowHead<'a>),
    Expression(Expression<'a>),
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Sequence, assignment, conditional
    // ========================================================================

    pub(crate) fn parse_expression(&mut self) -> PResult<Expression<'a>> {
        let start = self.start_node();
        let first = self.parse_maybe_assign()?;
        if !self.at(TokenKind::Comma) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat(TokenKind::Comma)? {
            expressions.push(self.parse_maybe_assign()?);
        }
        Ok(Expression::Sequence(SequenceExpression {
            data: self.finish_node(start),
            expressions: self.alloc_vec(expressions),
        }))
    }

    /// An assignment expression. A `{ a = 1 }` initializer or a comma after
    /// a spread found inside is an error unless this expression turns into
    /// an assignment target.
    pub(crate) fn parse_maybe_assign(&mut self) -> PResult<Expression<'a>> {
        let outer_shorthand = self.state.shorthand_default_at.take();
        let outer_comma = self.state.comma_after_spread_at.take();
        let expression = self.parse_maybe_assign_shared()?;
        if let Some(at) = self.state.shorthand_default_at.take() {
            self.report(&messages::SHORTHAND_INITIALIZER, &[], SourceSpan::empty(at))?;
        }
        self.state.shorthand_default_at = outer_shorthand;
        self.state.comma_after_spread_at = outer_comma;
        Ok(expression)
    }

    /// Like [`Parser::parse_maybe_assign`], but leaves the pattern markers
    /// to the caller. Array and object elements use this so that an outer
    /// `=` can still turn the whole literal into a pattern.
    pub(crate) fn parse_maybe_assign_shared(&mut self) -> PResult<Expression<'a>> {
        if self.at_name("yield") && self.in_generator() {
            return self.parse_yield();
        }
        let start = self.start_node();
        let saved_arrow = self.state.potential_arrow_at.replace(start.index);
        let left = self.parse_conditional();
        self.state.potential_arrow_at = saved_arrow;
        let left = left?;

        let Some(operator) = assignment_operator(self.state.kind) else {
            return Ok(left);
        };
        let target = if operator.is_plain() {
            self.to_assignable(left, "assignment expression")?
        } else {
            self.to_simple_assignable(left, "assignment expression")?
        };
        if self.state.shorthand_default_at.is_some_and(|at| at.index >= start.index) {
            self.state.shorthand_default_at = None;
        }
        self.next()?;
        let right = self.parse_maybe_assign()?;
        Ok(Expression::Assignment(AssignmentExpression {
            data: self.finish_node(start),
            operator,
            left: self.alloc(target),
            right: self.alloc(right),
        }))
    }

    fn parse_conditional(&mut self) -> PResult<Expression<'a>> {
        let start = self.start_node();
        let test = self.parse_expr_ops()?;
        if !self.at(TokenKind::Question) {
            return Ok(test);
        }
        self.next()?;
        let consequent = self.allow_in(|p| p.parse_maybe_assign())?;
        self.expect(TokenKind::Colon)?;
        let alternate = self.parse_maybe_assign()?;
        Ok(Expression::Conditional(ConditionalExpression {
            data: self.finish_node(start),
            test: self.alloc(test),
            consequent: self.alloc(consequent),
            alternate: self.alloc(alternate),
        }))
    }

    fn parse_yield(&mut self) -> PResult<Expression<'a>> {
        let start = self.start_node();
        if self.in_scope(ScopeName::Parameters) {
            let span = self.token_span();
            self.report(&messages::YIELD_IN_PARAMETERS, &[], span)?;
        }
        self.next()?;
        let mut delegate = false;
        let mut argument = None;
        if !self.has_preceding_line_break() {
            delegate = self.eat(TokenKind::Star)?;
            if delegate || self.state.kind.starts_expr() {
                let value = self.parse_maybe_assign()?;
                argument = Some(&*self.alloc(value));
            }
        }
        Ok(Expression::Yield(YieldExpression {
            data: self.finish_node(start),
            delegate,
            argument,
        }))
    }

    // ========================================================================
    // Binary operators
    // ========================================================================

    fn parse_expr_ops(&mut self) -> PResult<Expression<'a>> {
        let start = self.start_node();
        let left = self.parse_maybe_unary()?;
        if matches!(left, Expression::Arrow(_)) {
            return Ok(left);
        }
        self.parse_expr_op(left, start, OperatorPrecedence::Lowest as u8)
    }

    fn parse_expr_op(
        &mut self,
        mut left: Expression<'a>,
        left_start: Position,
        min_prec: u8,
    ) -> PResult<Expression<'a>> {
        loop {
            self.rescan_gt()?;

            if self.ts_enabled()
                && (self.at_name("as") || self.at_name("satisfies"))
                && !self.has_preceding_line_break()
                && OperatorPrecedence::Relational as u8 > min_prec
            {
                left = self.parse_ts_as(left, left_start)?;
                continue;
            }

            let kind = self.state.kind;
            if kind == TokenKind::In && self.state.no_in {
                break;
            }
            let Some(prec) = binary_precedence(kind).map(|p| p as u8) else {
                break;
            };
            if prec <= min_prec {
                break;
            }
            let Some(operator) = binary_operator(kind) else {
                break;
            };
            let operator_span = self.token_span();
            if kind == TokenKind::StarStar
                && matches!(left, Expression::Unary(_) | Expression::Await(_))
            {
                self.report(&messages::UNARY_BEFORE_EXPONENT, &[], left.span())?;
            }
            self.next()?;

            let right_start = self.start_node();
            let right = self.parse_maybe_unary()?;
            let next_min = if kind == TokenKind::StarStar { prec - 1 } else { prec };
            let right = self.parse_expr_op(right, right_start, next_min)?;
            self.check_nullish_mixing(operator, &left, &right, operator_span)?;

            let data = self.finish_node(left_start);
            let (left_ref, right_ref) = (self.alloc(left), self.alloc(right));
            left = match operator {
                BinaryKind::Binary(operator) => Expression::Binary(BinaryExpression {
                    data,
                    operator,
                    left: left_ref,
                    right: right_ref,
                }),
                BinaryKind::Logical(operator) => Expression::Logical(LogicalExpression {
                    data,
                    operator,
                    left: left_ref,
                    right: right_ref,
                }),
            };
        }
        Ok(left)
    }

    /// `??` cannot share an operand with `||` or `&&` without parentheses.
    fn check_nullish_mixing(
        &mut self,
        operator: BinaryKind,
        left: &Expression<'a>,
        right: &Expression<'a>,
        span: SourceSpan,
    ) -> PResult<()> {
        let BinaryKind::Logical(operator) = operator else {
            return Ok(());
        };
        let is_nullish = operator == LogicalOperator::Coalesce;
        let mixes = |expr: &Expression<'a>| {
            matches!(expr, Expression::Logical(inner)
                if (inner.operator == LogicalOperator::Coalesce) != is_nullish)
        };
        if mixes(left) || mixes(right) {
            self.report(&messages::NULLISH_MIXING, &[], span)?;
        }
        Ok(())
    }

    fn parse_ts_as(&mut self, expression: Expression<'a>, start: Position) -> PResult<Expression<'a>> {
        let satisfies = self.at_name("satisfies");
        let type_annotation = self.with_scope(ScopeName::Type, ScopeValue::TRUE, |p| {
            p.next()?;
            p.parse_type_inner()
        })?;
        let data = self.finish_node(start);
        let expression = self.alloc(expression);
        let type_annotation = self.alloc(type_annotation);
        Ok(if satisfies {
            Expression::TsSatisfies(TsSatisfiesExpression {
                data,
                expression,
                type_annotation,
            })
        } else {
            Expression::TsAs(TsAsExpression {
                data,
                expression,
                type_annotation,
            })
        })
    }

    // ========================================================================
    // Unary and update
    // ========================================================================

    pub(crate) fn parse_maybe_unary(&mut self) -> PResult<Expression<'a>> {
        let start = self.start_node();
        let kind = self.state.kind;

        if kind == TokenKind::Lt && self.ts_enabled() && !self.jsx_enabled() {
            return self.parse_ts_angle_bracket(start);
        }
        if self.at_name("await") && self.in_async() {
            return self.parse_await(start);
        }

        if let Some(operator) = unary_operator(kind) {
            self.next()?;
            let argument = self.parse_maybe_unary()?;
            if operator == UnaryOperator::Delete
                && self.is_strict()
                && matches!(argument.without_parens(), Expression::Identifier(_))
            {
                self.report(&messages::DELETE_IDENTIFIER_IN_STRICT, &[], argument.span())?;
            }
            return Ok(Expression::Unary(UnaryExpression {
                data: self.finish_node(start),
                operator,
                argument: self.alloc(argument),
            }));
        }

        if let Some(operator) = update_operator(kind) {
            self.next()?;
            let argument = self.parse_maybe_unary()?;
            self.check_simple_target(&argument, "prefix operation")?;
            return Ok(Expression::Update(UpdateExpression {
                data: self.finish_node(start),
                operator,
                prefix: true,
                argument: self.alloc(argument),
            }));
        }

        let expression = self.parse_expr_subscripts()?;
        if let Some(operator) = update_operator(self.state.kind) {
            if !self.has_preceding_line_break() {
                self.check_simple_target(&expression, "postfix operation")?;
                self.next()?;
                return Ok(Expression::Update(UpdateExpression {
                    data: self.finish_node(start),
                    operator,
                    prefix: false,
                    argument: self.alloc(expression),
                }));
            }
        }
        Ok(expression)
    }

    fn parse_await(&mut self, start: Position) -> PResult<Expression<'a>> {
        if self.in_scope(ScopeName::Parameters) {
            let span = self.token_span();
            self.report(&messages::AWAIT_IN_PARAMETERS, &[], span)?;
        }
        self.next()?;
        let argument = self.parse_maybe_unary()?;
        Ok(Expression::Await(AwaitExpression {
            data: self.finish_node(start),
            argument: self.alloc(argument),
        }))
    }

    /// `<T>(x) => x` or `<T>value` in a `.ts` file.
    fn parse_ts_angle_bracket(&mut self, start: Position) -> PResult<Expression<'a>> {
        let mut finder = BranchFinder::new();
        finder
            .add(self, BranchOptions::STRICT, |p| {
                Ok(p.try_parse_arrow_head()?.map(ParenStart::Arrow))
            })?
            .add(self, BranchOptions::default(), |p| {
                Ok(Some(ParenStart::Expression(p.parse_ts_type_assertion(start)?)))
            })?;
        match finder.pick(self)? {
            ParenStart::Arrow(head) => self.parse_arrow_from_head(start, head, false),
            ParenStart::Expression(expression) => Ok(expression),
        }
    }

    /// `<T>value`, with the current token the `<`.
    pub(crate) fn parse_ts_type_assertion(&mut self, start: Position) -> PResult<Expression<'a>> {
        let type_annotation = self.with_scope(ScopeName::Type, ScopeValue::TRUE, |p| {
            p.next()?;
            p.parse_type_inner()
        })?;
        self.expect(TokenKind::Gt)?;
        let expression = self.parse_maybe_unary()?;
        Ok(Expression::TsTypeAssertion(TsTypeAssertion {
            data: self.finish_node(start),
            type_annotation: self.alloc(type_annotation),
            expression: self.alloc(expression),
        }))
    }

    // ========================================================================
    // Calls and member access
    // ========================================================================

    pub(crate) fn parse_expr_subscripts(&mut self) -> PResult<Expression<'a>> {
        let start = self.start_node();
        let base = self.parse_expr_atom()?;
        if matches!(base, Expression::Arrow(_)) {
            return Ok(base);
        }
        self.parse_subscripts(base, start, false)
    }

    /// Member accesses, calls, tagged templates and non-null assertions
    /// after `base`. With `no_calls` (a `new` callee) a `(` ends the chain.
    pub(crate) fn parse_subscripts(
        &mut self,
        mut base: Expression<'a>,
        start: Position,
        no_calls: bool,
    ) -> PResult<Expression<'a>> {
        let mut in_optional_chain = false;
        loop {
            match self.state.kind {
                TokenKind::QuestionDot => {
                    if no_calls {
                        let span = self.token_span();
                        self.report(&messages::NEW_IN_OPTIONAL_CHAIN, &[], span)?;
                    }
                    in_optional_chain = true;
                    self.next()?;
                    base = match self.state.kind {
                        TokenKind::ParenL => self.finish_call(base, start, None, true)?,
                        TokenKind::BracketL => self.parse_computed_member(base, start, true)?,
                        TokenKind::Lt if self.ts_enabled() => {
                            let type_arguments = self.parse_type_arguments()?;
                            self.finish_call(base, start, Some(type_arguments), true)?
                        }
                        TokenKind::BackQuote => {
                            let span = self.token_span();
                            self.report(&messages::TAGGED_TEMPLATE_IN_OPTIONAL_CHAIN, &[], span)?;
                            self.parse_tagged_template(base, start, None)?
                        }
                        _ => self.parse_static_member(base, start, true)?,
                    };
                }
                TokenKind::Dot => {
                    self.next()?;
                    base = self.parse_static_member(base, start, false)?;
                }
                TokenKind::BracketL => {
                    base = self.parse_computed_member(base, start, false)?;
                }
                TokenKind::Bang if self.ts_enabled() && !self.has_preceding_line_break() => {
                    self.next()?;
                    base = Expression::TsNonNull(TsNonNullExpression {
                        data: self.finish_node(start),
                        expression: self.alloc(base),
                    });
                }
                TokenKind::ParenL if !no_calls => {
                    base = self.finish_call(base, start, None, false)?;
                }
                TokenKind::BackQuote => {
                    if in_optional_chain {
                        let span = self.token_span();
                        self.report(&messages::TAGGED_TEMPLATE_IN_OPTIONAL_CHAIN, &[], span)?;
                    }
                    base = self.parse_tagged_template(base, start, None)?;
                }
                TokenKind::Lt if self.ts_enabled() && !no_calls => {
                    let Some(type_arguments) = self.try_parse_type_arguments_in_expression()? else {
                        break;
                    };
                    base = if self.at(TokenKind::BackQuote) {
                        self.parse_tagged_template(base, start, Some(type_arguments))?
                    } else {
                        self.finish_call(base, start, Some(type_arguments), false)?
                    };
                }
                _ => break,
            }
        }
        Ok(base)
    }

    /// `<...>` followed by `(` or a template: type arguments of a call.
    /// Anything else leaves the `<` to be read as less-than.
    fn try_parse_type_arguments_in_expression(&mut self) -> PResult<Option<&'a TsTypeArguments<'a>>> {
        self.speculate(BranchOptions::STRICT, |p| {
            let type_arguments = p.parse_type_arguments()?;
            if p.at(TokenKind::ParenL) || p.at(TokenKind::BackQuote) {
                Ok(Some(type_arguments))
            } else {
                Ok(None)
            }
        })
    }

    fn parse_static_member(
        &mut self,
        object: Expression<'a>,
        start: Position,
        optional: bool,
    ) -> PResult<Expression<'a>> {
        let property = if self.at(TokenKind::PrivateName) {
            MemberProperty::Private(self.parse_private_name()?)
        } else {
            MemberProperty::Identifier(self.parse_identifier_name()?)
        };
        Ok(Expression::Member(MemberExpression {
            data: self.finish_node(start),
            object: self.alloc(object),
            property,
            optional,
        }))
    }

    fn parse_computed_member(
        &mut self,
        object: Expression<'a>,
        start: Position,
        optional: bool,
    ) -> PResult<Expression<'a>> {
        let open = self.start_node();
        self.next()?;
        let property = self.allow_in(|p| p.parse_expression())?;
        self.expect_closing(TokenKind::BracketR, "member access", open)?;
        Ok(Expression::Member(MemberExpression {
            data: self.finish_node(start),
            object: self.alloc(object),
            property: MemberProperty::Computed(self.alloc(property)),
            optional,
        }))
    }

    fn finish_call(
        &mut self,
        callee: Expression<'a>,
        start: Position,
        type_arguments: Option<&'a TsTypeArguments<'a>>,
        optional: bool,
    ) -> PResult<Expression<'a>> {
        let arguments = self.parse_call_arguments()?;
        Ok(Expression::Call(CallExpression {
            data: self.finish_node(start),
            callee: self.alloc(callee),
            type_arguments,
            arguments,
            optional,
        }))
    }

    fn parse_tagged_template(
        &mut self,
        tag: Expression<'a>,
        start: Position,
        type_arguments: Option<&'a TsTypeArguments<'a>>,
    ) -> PResult<Expression<'a>> {
        let quasi = self.parse_template(true)?;
        Ok(Expression::TaggedTemplate(TaggedTemplateExpression {
            data: self.finish_node(start),
            tag: self.alloc(tag),
            type_arguments,
            quasi,
        }))
    }

    pub(crate) fn parse_call_arguments(&mut self) -> PResult<&'a [ExpressionOrSpread<'a>]> {
        let open = self.start_node();
        self.expect(TokenKind::ParenL)?;
        let mut arguments = Vec::new();
        while !self.at(TokenKind::ParenR) && !self.at(TokenKind::Eof) {
            let argument = if self.at(TokenKind::Ellipsis) {
                ExpressionOrSpread::Spread(self.parse_spread()?)
            } else {
                ExpressionOrSpread::Expression(self.allow_in(|p| p.parse_maybe_assign())?)
            };
            arguments.push(argument);
            if !self.at(TokenKind::ParenR) && !self.expect(TokenKind::Comma)? {
                break;
            }
        }
        self.expect_closing(TokenKind::ParenR, "argument list", open)?;
        Ok(self.alloc_vec(arguments))
    }

    pub(crate) fn parse_spread(&mut self) -> PResult<SpreadElement<'a>> {
        let start = self.start_node();
        self.expect(TokenKind::Ellipsis)?;
        let argument = self.allow_in(|p| p.parse_maybe_assign_shared())?;
        Ok(SpreadElement {
            data: self.finish_node(start),
            argument: self.alloc(argument),
        })
    }

    // ========================================================================
    // Atoms
    // ========================================================================

    pub(crate) fn parse_expr_atom(&mut self) -> PResult<Expression<'a>> {
        let start = self.start_node();
        let can_be_arrow = self.state.potential_arrow_at == Some(start.index);
        match self.state.kind {
            TokenKind::Name => self.parse_name_atom(start, can_be_arrow),
            TokenKind::This => {
                self.next()?;
                Ok(Expression::This(self.finish_node(start)))
            }
            TokenKind::Null => {
                self.next()?;
                Ok(Expression::Null(self.finish_node(start)))
            }
            TokenKind::True | TokenKind::False => {
                let value = self.at(TokenKind::True);
                self.next()?;
                Ok(Expression::Boolean(BooleanLiteral {
                    data: self.finish_node(start),
                    value,
                }))
            }
            TokenKind::Num => Ok(Expression::Number(self.parse_numeric_literal()?)),
            TokenKind::BigInt => Ok(Expression::BigInt(self.parse_bigint_literal()?)),
            TokenKind::String => Ok(Expression::String(self.parse_string_literal()?)),
            TokenKind::Regex => {
                let (pattern, flags) = match &self.state.value {
                    TokenValue::Regex { pattern, flags } => {
                        (self.alloc_str(pattern), self.alloc_str(flags))
                    }
                    _ => ("", ""),
                };
                self.next()?;
                Ok(Expression::RegExp(RegExpLiteral {
                    data: self.finish_node(start),
                    pattern,
                    flags,
                }))
            }
            TokenKind::Slash | TokenKind::SlashEq => {
                self.rescan_regex()?;
                self.parse_expr_atom()
            }
            TokenKind::ParenL => self.parse_paren_and_distinguish(start, can_be_arrow),
            TokenKind::BracketL => self.parse_array_literal(),
            TokenKind::BraceL => self.parse_object_literal(),
            TokenKind::Function => {
                let function = self.parse_function(start, false, false, false)?;
                Ok(Expression::Function(function))
            }
            TokenKind::Class => {
                let class = self.parse_class(start, false, false, false)?;
                Ok(Expression::Class(class))
            }
            TokenKind::New => self.parse_new(start),
            TokenKind::Super => self.parse_super(start),
            TokenKind::Import => self.parse_import_meta_or_call(start),
            TokenKind::BackQuote => Ok(Expression::Template(self.parse_template(false)?)),
            TokenKind::JsxTagStart => self.parse_jsx_atom(start),
            TokenKind::Placeholder => Ok(Expression::Placeholder(self.parse_placeholder()?)),
            TokenKind::Lt if !self.ts_enabled() => {
                let span = self.token_span();
                self.report_corrupt(&messages::JSX_NOT_ENABLED, &[], span)?;
                self.next()?;
                Ok(Expression::Missing(self.finish_node(start)))
            }
            _ => {
                let found = self.state.kind.describe();
                let span = self.token_span();
                self.report_corrupt(&messages::EXPECTED_EXPRESSION, &[&found], span)?;
                Ok(Expression::Missing(self.missing_node()))
            }
        }
    }

    fn parse_name_atom(&mut self, start: Position, can_be_arrow: bool) -> PResult<Expression<'a>> {
        if self.at_name("async") {
            if let Some(expression) = self.try_parse_async_atom(start, can_be_arrow)? {
                return Ok(expression);
            }
        }
        let id = self.parse_identifier_reference()?;
        if can_be_arrow && self.at(TokenKind::Arrow) {
            return self.parse_arrow_from_identifier(start, id, false);
        }
        Ok(Expression::Identifier(id))
    }

    /// `async function`, `async x => ...` and `async (...) => ...`.
    /// `None` when `async` is a plain identifier.
    fn try_parse_async_atom(
        &mut self,
        start: Position,
        can_be_arrow: bool,
    ) -> PResult<Option<Expression<'a>>> {
        let next = self.lookahead()?;
        if next.kind == TokenKind::Function && !next.line_break_before {
            self.next()?;
            let function = self.parse_function(start, false, true, false)?;
            return Ok(Some(Expression::Function(function)));
        }
        if !can_be_arrow {
            return Ok(None);
        }

        if next.kind == TokenKind::Name {
            let arrow_follows = self.look(|p| {
                p.next()?;
                p.next()?;
                Ok(p.at(TokenKind::Arrow))
            })?;
            if !arrow_follows {
                return Ok(None);
            }
            if next.line_break_before {
                let span = self.token_span();
                self.report(&messages::ASYNC_ARROW_LINE_BREAK, &[], span)?;
            }
            self.next()?;
            let id = self.with_scope(ScopeName::Async, ScopeValue::TRUE, |p| {
                p.parse_binding_identifier()
            })?;
            return self.parse_arrow_from_identifier(start, id, true).map(Some);
        }

        if next.kind == TokenKind::ParenL && !next.line_break_before {
            let mut finder = BranchFinder::new();
            finder
                .add(self, BranchOptions::STRICT, |p| {
                    p.next()?;
                    let head = p.with_scope(ScopeName::Async, ScopeValue::TRUE, |p| {
                        p.try_parse_arrow_head()
                    })?;
                    Ok(head.map(ParenStart::Arrow))
                })?
                .add(self, BranchOptions::default(), |p| {
                    let id = p.parse_identifier_reference()?;
                    Ok(Some(ParenStart::Expression(Expression::Identifier(id))))
                })?;
            return match finder.pick(self)? {
                ParenStart::Arrow(head) => self.parse_arrow_from_head(start, head, true).map(Some),
                ParenStart::Expression(callee) => Ok(Some(callee)),
            };
        }
        Ok(None)
    }

    fn parse_paren_and_distinguish(
        &mut self,
        start: Position,
        can_be_arrow: bool,
    ) -> PResult<Expression<'a>> {
        if !can_be_arrow {
            return self.parse_parenthesized(start);
        }
        let mut finder = BranchFinder::new();
        finder
            .add(self, BranchOptions::STRICT, |p| {
                Ok(p.try_parse_arrow_head()?.map(ParenStart::Arrow))
            })?
            .add(self, BranchOptions::default(), |p| {
                Ok(Some(ParenStart::Expression(p.parse_parenthesized(start)?)))
            })?;
        match finder.pick(self)? {
            ParenStart::Arrow(head) => self.parse_arrow_from_head(start, head, false),
            ParenStart::Expression(expression) => Ok(expression),
        }
    }

    fn parse_parenthesized(&mut self, start: Position) -> PResult<Expression<'a>> {
        self.expect(TokenKind::ParenL)?;
        let expression = self.allow_in(|p| p.parse_expression())?;
        self.expect_closing(TokenKind::ParenR, "parenthesized expression", start)?;
        Ok(Expression::Parenthesized(ParenthesizedExpression {
            data: self.finish_node(start),
            expression: self.alloc(expression),
        }))
    }

    pub(crate) fn parse_numeric_literal(&mut self) -> PResult<NumericLiteral<'a>> {
        let start = self.start_node();
        let value = match self.state.value {
            TokenValue::Number(value) => value,
            _ => f64::NAN,
        };
        let span = self.token_span();
        let raw = self.slice(span.start.index, span.end.index);
        self.next()?;
        Ok(NumericLiteral {
            data: self.finish_node(start),
            value,
            raw,
        })
    }

    pub(crate) fn parse_bigint_literal(&mut self) -> PResult<BigIntLiteral<'a>> {
        let start = self.start_node();
        let value = self.alloc_str(self.token_text());
        self.next()?;
        Ok(BigIntLiteral {
            data: self.finish_node(start),
            value,
        })
    }

    pub(crate) fn parse_private_name(&mut self) -> PResult<PrivateName> {
        let start = self.start_node();
        if self.state.scopes.is_empty(ScopeName::ClassKind) {
            let span = self.token_span();
            self.report(&messages::PRIVATE_NAME_OUTSIDE_CLASS, &[], span)?;
        }
        let name = self.intern(self.token_text());
        self.next()?;
        Ok(PrivateName {
            data: self.finish_node(start),
            name,
        })
    }

    // ========================================================================
    // Keyword expressions
    // ========================================================================

    fn parse_new(&mut self, start: Position) -> PResult<Expression<'a>> {
        let meta_span = self.token_span();
        self.next()?;
        if self.at(TokenKind::Dot) {
            let meta = self.keyword_identifier(meta_span, "new");
            self.next()?;
            let property = self.parse_identifier_name()?;
            let name = self.name_of(&property).to_string();
            if name != "target" {
                self.report(&messages::INVALID_META_PROPERTY, &["new", "target"], property.data.span)?;
            } else if !self.in_function() && !self.in_scope(ScopeName::ClassProperty) {
                let span = SourceSpan::new(start, property.data.span.end);
                self.report(&messages::NEW_TARGET_OUTSIDE_FUNCTION, &[], span)?;
            }
            return Ok(Expression::MetaProperty(MetaProperty {
                data: self.finish_node(start),
                meta,
                property,
            }));
        }

        let callee_start = self.start_node();
        let callee = if self.at(TokenKind::New) {
            self.parse_new(callee_start)?
        } else {
            let atom = self.parse_expr_atom()?;
            self.parse_subscripts(atom, callee_start, true)?
        };
        let type_arguments = if self.ts_enabled() && self.at(TokenKind::Lt) {
            self.speculate(BranchOptions::STRICT, |p| p.parse_type_arguments().map(Some))?
        } else {
            None
        };
        let arguments = if self.at(TokenKind::ParenL) {
            Some(self.parse_call_arguments()?)
        } else {
            None
        };
        Ok(Expression::New(NewExpression {
            data: self.finish_node(start),
            callee: self.alloc(callee),
            type_arguments,
            arguments,
        }))
    }

    fn parse_super(&mut self, start: Position) -> PResult<Expression<'a>> {
        self.next()?;
        let data = self.finish_node(start);
        let method = self.state.scopes.top(ScopeName::MethodKind);
        let in_method = matches!(method, Some(ScopeValue::Method(_)));
        match self.state.kind {
            TokenKind::ParenL => {
                let derived = self.state.scopes.top(ScopeName::ClassKind)
                    == Some(ScopeValue::Class(ClassKind::Derived));
                if method != Some(ScopeValue::Method(MethodKind::Constructor)) || !derived {
                    self.report(&messages::SUPER_CALL_OUTSIDE_CONSTRUCTOR, &[], data.span)?;
                }
            }
            _ if !in_method => {
                self.report(&messages::SUPER_OUTSIDE_METHOD, &[], data.span)?;
            }
            TokenKind::Dot | TokenKind::BracketL | TokenKind::QuestionDot => {}
            _ => {
                let found = self.state.kind.describe();
                let span = self.token_span();
                self.report_corrupt(&messages::UNEXPECTED_TOKEN, &[&found], span)?;
            }
        }
        Ok(Expression::Super(data))
    }

    fn parse_import_meta_or_call(&mut self, start: Position) -> PResult<Expression<'a>> {
        let meta_span = self.token_span();
        self.next()?;
        if self.at(TokenKind::Dot) {
            let meta = self.keyword_identifier(meta_span, "import");
            self.next()?;
            let property = self.parse_identifier_name()?;
            let name = self.name_of(&property).to_string();
            if name != "meta" {
                self.report(&messages::INVALID_META_PROPERTY, &["import", "meta"], property.data.span)?;
            } else if !self.state.in_module {
                self.report(&messages::IMPORT_EXPORT_IN_SCRIPT, &[], meta_span)?;
            }
            return Ok(Expression::MetaProperty(MetaProperty {
                data: self.finish_node(start),
                meta,
                property,
            }));
        }
        let data = self.finish_node(start);
        if !self.at(TokenKind::ParenL) {
            self.expect(TokenKind::ParenL)?;
        }
        Ok(Expression::Import(data))
    }

    /// An identifier for a keyword already consumed (`new` in `new.target`).
    fn keyword_identifier(&mut self, span: SourceSpan, word: &str) -> Identifier {
        Identifier {
            data: self.finish_node_at(span.start, span.end),
            name: self.intern(word),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, ParseOptions};
    use parsley_ast::{BinaryOperator, Expression, Statement, Syntax};
    use parsley_core::AstArena;
    use parsley_diagnostics::messages;

    fn with_expression(source: &str, syntax: &[Syntax], check: impl FnOnce(&Expression<'_>)) {
        let arena = AstArena::new();
        let options = ParseOptions::new(source).with_syntax(syntax.iter().copied());
        let root = parse(&arena, &options).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        match &root.statements[0] {
            Statement::Expression(statement) => check(statement.expression),
            other => panic!("expected an expression statement, got {other:?}"),
        }
    }

    fn codes(source: &str) -> Vec<u32> {
        let arena = AstArena::new();
        let root = parse(&arena, &ParseOptions::new(source)).unwrap();
        root.diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_precedence_and_associativity() {
        with_expression("a + b * c", &[], |expr| match expr {
            Expression::Binary(add) => {
                assert_eq!(add.operator, BinaryOperator::Addition);
                assert!(matches!(add.right, Expression::Binary(mul) if mul.operator == BinaryOperator::Multiplication));
            }
            other => panic!("unexpected {other:?}"),
        });
        with_expression("a ** b ** c", &[], |expr| match expr {
            Expression::Binary(pow) => assert!(matches!(pow.right, Expression::Binary(_))),
            other => panic!("unexpected {other:?}"),
        });
    }

    #[test]
    fn test_arrow_versus_parenthesized() {
        with_expression("(a, b) => a", &[], |expr| {
            assert!(matches!(expr, Expression::Arrow(arrow) if arrow.params.len() == 2));
        });
        with_expression("(a, b)", &[], |expr| {
            assert!(matches!(expr.without_parens(), Expression::Sequence(seq) if seq.expressions.len() == 2));
        });
        with_expression("async (x) => x", &[], |expr| {
            assert!(matches!(expr, Expression::Arrow(arrow) if arrow.is_async));
        });
        with_expression("async(x)", &[], |expr| assert!(matches!(expr, Expression::Call(_))));
    }

    #[test]
    fn test_typescript_call_type_arguments() {
        with_expression("foo<Bar>(baz)", &[Syntax::Ts], |expr| {
            assert!(matches!(expr, Expression::Call(call) if call.type_arguments.is_some()));
        });
        with_expression("foo < Bar > baz", &[Syntax::Ts], |expr| {
            assert!(matches!(expr, Expression::Binary(cmp) if cmp.operator == BinaryOperator::GreaterThan));
        });
        with_expression("a >> b", &[Syntax::Ts], |expr| {
            assert!(matches!(expr, Expression::Binary(shift) if shift.operator == BinaryOperator::ShiftRight));
        });
        with_expression("x as unknown as string", &[Syntax::Ts], |expr| {
            assert!(matches!(expr, Expression::TsAs(outer) if matches!(outer.expression, Expression::TsAs(_))));
        });
    }

    #[test]
    fn test_optional_chain_and_new() {
        with_expression("a?.b.c?.()", &[], |expr| assert!(matches!(expr, Expression::Call(call) if call.optional)));
        with_expression("new a.b()", &[], |expr| {
            assert!(matches!(expr, Expression::New(new) if new.arguments.is_some()));
        });
    }

    #[test]
    fn test_expression_errors() {
        assert_eq!(codes("a ?? b || c"), vec![messages::NULLISH_MIXING.code]);
        assert_eq!(codes("-a ** 2"), vec![messages::UNARY_BEFORE_EXPONENT.code]);
        assert_eq!(codes("({ a = 1 })"), vec![messages::SHORTHAND_INITIALIZER.code]);
        assert_eq!(codes("1 = a"), vec![messages::INVALID_ASSIGNMENT_TARGET.code]);
        assert_eq!(codes("super.x"), vec![messages::SUPER_OUTSIDE_METHOD.code]);
        assert!(codes("({ a = 1 } = b)").is_empty());
    }
}
