//! Functions, methods, arrow functions and parameter lists.

use crate::parser::Parser;
use crate::scope::{ScopeName, ScopeValue};
use crate::speculation::PResult;
use parsley_ast::{
    ArrowBody, ArrowFunction, AssignmentPattern, Expression, Function, FunctionBody, Identifier,
    MethodKind, ModifierFlags, Param, Pattern, RestElement, TsType, TsTypeParameters,
};
use parsley_core::{Position, SourceSpan};
use parsley_diagnostics::messages;
use parsley_scanner::TokenKind;

/// Everything of an arrow function before its `=>`.
pub(crate) struct ArrowHead<'a> {
    pub type_parameters: Option<&'a TsTypeParameters<'a>>,
    pub params: &'a [Param<'a>],
    pub return_type: Option<&'a TsType<'a>>,
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Functions and methods
    // ========================================================================

    /// `function` declarations and expressions; `start` is at `async` when
    /// there is one, otherwise at `function`.
    pub(crate) fn parse_function(
        &mut self,
        start: Position,
        is_statement: bool,
        is_async: bool,
        declare: bool,
    ) -> PResult<Function<'a>> {
        self.expect(TokenKind::Function)?;
        let is_generator = self.eat(TokenKind::Star)?;

        let has_name = !self.at(TokenKind::ParenL)
            && !self.at(TokenKind::Lt)
            && (self.at(TokenKind::Name) || self.state.kind.is_keyword());
        let id = if has_name {
            if is_statement {
                Some(self.parse_binding_identifier()?)
            } else {
                let own = [
                    (ScopeName::Generator, ScopeValue::Flag(is_generator)),
                    (ScopeName::Async, ScopeValue::Flag(is_async)),
                ];
                Some(self.with_scopes(&own, |p| p.parse_binding_identifier())?)
            }
        } else {
            if is_statement {
                let found = self.state.kind.describe();
                let span = self.token_span();
                self.report(&messages::EXPECTED_IDENTIFIER, &[&found], span)?;
            }
            None
        };

        let body_optional = declare || self.state.in_ambient || (is_statement && self.ts_enabled());
        let scopes = [
            (ScopeName::Generator, ScopeValue::Flag(is_generator)),
            (ScopeName::Async, ScopeValue::Flag(is_async)),
            (ScopeName::MethodKind, ScopeValue::FALSE),
            (ScopeName::ClassProperty, ScopeValue::FALSE),
        ];
        self.with_scopes(&scopes, |p| {
            p.parse_function_rest(start, id, is_async, is_generator, declare, false, body_optional)
        })
    }

    /// A method's parameters and body. The function node starts at the
    /// parameter list; the member node around it owns the key.
    pub(crate) fn parse_method(
        &mut self,
        is_async: bool,
        is_generator: bool,
        kind: MethodKind,
        allow_properties: bool,
        body_optional: bool,
    ) -> PResult<Function<'a>> {
        let start = self.start_node();
        let scopes = [
            (ScopeName::Generator, ScopeValue::Flag(is_generator)),
            (ScopeName::Async, ScopeValue::Flag(is_async)),
            (ScopeName::MethodKind, ScopeValue::Method(kind)),
            (ScopeName::ClassProperty, ScopeValue::FALSE),
        ];
        let function = self.with_scopes(&scopes, |p| {
            p.parse_function_rest(start, None, is_async, is_generator, false, allow_properties, body_optional)
        })?;
        self.check_accessor_params(kind, &function)?;
        Ok(function)
    }

    #[allow(clippy::too_many_arguments)]
    fn parse_function_rest(
        &mut self,
        start: Position,
        id: Option<Identifier>,
        is_async: bool,
        is_generator: bool,
        declare: bool,
        allow_properties: bool,
        body_optional: bool,
    ) -> PResult<Function<'a>> {
        let type_parameters = self.parse_type_parameters_opt()?;
        let params = self.parse_formal_params(allow_properties)?;
        let return_type = self.parse_return_type_opt()?;

        let body = if self.at(TokenKind::BraceL) {
            if declare || self.state.in_ambient {
                let span = self.token_span();
                self.report(&messages::AMBIENT_IMPLEMENTATION, &[], span)?;
            }
            Some(self.parse_function_body()?)
        } else {
            self.drop_function_context();
            if body_optional {
                self.semicolon()?;
            } else if self.ts_enabled() && self.can_insert_semicolon() {
                let span = self.token_span();
                self.report(&messages::MISSING_FUNCTION_BODY, &[], span)?;
                self.semicolon()?;
            } else {
                self.expect(TokenKind::BraceL)?;
            }
            None
        };

        Ok(Function {
            data: self.finish_node(start),
            id,
            is_async,
            is_generator,
            declare,
            type_parameters,
            params,
            return_type,
            body,
        })
    }

    fn check_accessor_params(&mut self, kind: MethodKind, function: &Function<'a>) -> PResult<()> {
        let count = function
            .params
            .iter()
            .filter(|param| !self.is_this_param(param))
            .count();
        match kind {
            MethodKind::Get if count != 0 => {
                self.report(&messages::GETTER_WITH_PARAMETERS, &[], function.data.span)
            }
            MethodKind::Set if count != 1 => {
                self.report(&messages::SETTER_PARAMETER_COUNT, &[], function.data.span)
            }
            _ => Ok(()),
        }
    }

    /// TypeScript's `this: T` pseudo-parameter.
    fn is_this_param(&self, param: &Param<'a>) -> bool {
        matches!(param.pattern, Pattern::Identifier(id) if self.name_of(&id) == "this")
    }

    pub(crate) fn parse_function_body(&mut self) -> PResult<&'a FunctionBody<'a>> {
        let start = self.start_node();
        let saved_labels = std::mem::take(&mut self.state.labels);
        let result = self.with_scope(ScopeName::Parameters, ScopeValue::FALSE, |p| {
            p.allow_in(|p| {
                p.expect(TokenKind::BraceL)?;
                let body = p.parse_body(TokenKind::BraceR, false)?;
                p.expect_closing(TokenKind::BraceR, "function body", start)?;
                Ok(body)
            })
        });
        self.state.labels = saved_labels;
        let (directives, body) = result?;
        let body = FunctionBody {
            data: self.finish_node(start),
            directives: self.alloc_vec(directives),
            body: self.alloc_vec(body),
        };
        Ok(self.alloc(body))
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// `(a, b = 1, ...rest)`. Parameter properties (`public x`) are only
    /// accepted when `allow_properties` is set, i.e. in constructors.
    pub(crate) fn parse_formal_params(&mut self, allow_properties: bool) -> PResult<&'a [Param<'a>]> {
        let open = self.start_node();
        self.expect(TokenKind::ParenL)?;
        let params = self.with_scope(ScopeName::Parameters, ScopeValue::TRUE, |p| {
            let mut params = Vec::new();
            while !p.at(TokenKind::ParenR) && !p.at(TokenKind::Eof) {
                let param = p.parse_param(allow_properties)?;
                let is_rest = matches!(param.pattern, Pattern::Rest(_));
                params.push(param);
                if is_rest && !p.at(TokenKind::ParenR) {
                    let span = p.token_span();
                    if p.at(TokenKind::Comma) && p.lookahead()?.kind == TokenKind::ParenR {
                        p.report(&messages::COMMA_AFTER_REST, &[], span)?;
                    } else {
                        p.report(&messages::REST_NOT_LAST, &[], span)?;
                    }
                }
                if !p.at(TokenKind::ParenR) && !p.expect(TokenKind::Comma)? {
                    break;
                }
            }
            Ok(params)
        })?;
        self.expect_closing(TokenKind::ParenR, "parameter list", open)?;
        Ok(self.alloc_vec(params))
    }

    fn parse_param(&mut self, allow_properties: bool) -> PResult<Param<'a>> {
        let start = self.start_node();
        let modifiers = self.parse_modifiers(ModifierFlags::PARAMETER_PROPERTY)?;
        if !modifiers.is_empty() && !allow_properties {
            let span = SourceSpan::new(start, self.state.last_end);
            self.report(&messages::PARAMETER_PROPERTY_OUTSIDE_CONSTRUCTOR, &[], span)?;
        }

        if self.at(TokenKind::Ellipsis) {
            let rest_start = self.start_node();
            self.next()?;
            let argument = self.parse_binding_atom()?;
            let pattern = Pattern::Rest(RestElement {
                data: self.finish_node(rest_start),
                argument: self.alloc(argument),
            });
            let type_annotation = self.parse_type_annotation_opt()?;
            return Ok(Param {
                data: self.finish_node(start),
                modifiers,
                pattern,
                optional: false,
                type_annotation,
            });
        }

        let pattern_start = self.start_node();
        let mut pattern = self.parse_binding_atom()?;
        let mut optional = false;
        if self.at(TokenKind::Question) {
            let span = self.token_span();
            self.require_ts(span)?;
            self.next()?;
            optional = true;
        }
        let type_annotation = self.parse_type_annotation_opt()?;
        if self.at(TokenKind::Eq) {
            if optional {
                let span = self.token_span();
                self.report(&messages::OPTIONAL_AND_INITIALIZER, &[], span)?;
            }
            self.next()?;
            let right = self.allow_in(|p| p.parse_maybe_assign())?;
            pattern = Pattern::Assignment(AssignmentPattern {
                data: self.finish_node(pattern_start),
                left: self.alloc(pattern),
                right: self.alloc(right),
            });
        }
        Ok(Param {
            data: self.finish_node(start),
            modifiers,
            pattern,
            optional,
            type_annotation,
        })
    }

    // ========================================================================
    // Arrow functions
    // ========================================================================

    /// Optional type parameters, a parameter list and an optional return
    /// type, then `=>`. `None` when there is no `=>`; parameter lists that
    /// cannot be patterns report, which fails a strict speculative branch.
    pub(crate) fn try_parse_arrow_head(&mut self) -> PResult<Option<ArrowHead<'a>>> {
        let type_parameters = if self.at(TokenKind::Lt) {
            Some(self.parse_type_parameters()?)
        } else {
            None
        };
        if !self.at(TokenKind::ParenL) {
            return Ok(None);
        }
        let params = self.parse_formal_params(false)?;
        let return_type = if self.ts_enabled() {
            self.parse_return_type_opt()?
        } else {
            None
        };
        if !self.at(TokenKind::Arrow) {
            return Ok(None);
        }
        Ok(Some(ArrowHead {
            type_parameters,
            params,
            return_type,
        }))
    }

    pub(crate) fn parse_arrow_from_identifier(
        &mut self,
        start: Position,
        id: Identifier,
        is_async: bool,
    ) -> PResult<Expression<'a>> {
        let param = Param {
            data: self.clone_node_without_comments(&id.data),
            modifiers: ModifierFlags::NONE,
            pattern: Pattern::Identifier(id),
            optional: false,
            type_annotation: None,
        };
        let head = ArrowHead {
            type_parameters: None,
            params: self.alloc_vec(vec![param]),
            return_type: None,
        };
        self.parse_arrow_from_head(start, head, is_async)
    }

    pub(crate) fn parse_arrow_from_head(
        &mut self,
        start: Position,
        head: ArrowHead<'a>,
        is_async: bool,
    ) -> PResult<Expression<'a>> {
        if self.has_preceding_line_break() {
            let span = self.token_span();
            self.report(&messages::LINE_BREAK_BEFORE_ARROW, &[], span)?;
        }
        let scopes = [
            (ScopeName::Generator, ScopeValue::FALSE),
            (ScopeName::Async, ScopeValue::Flag(is_async)),
            (ScopeName::Parameters, ScopeValue::FALSE),
        ];
        let body = self.with_scopes(&scopes, |p| {
            p.expect(TokenKind::Arrow)?;
            if p.at(TokenKind::BraceL) {
                Ok(ArrowBody::Block(p.parse_function_body()?))
            } else {
                let expression = p.parse_maybe_assign()?;
                Ok(ArrowBody::Expression(p.alloc(expression)))
            }
        })?;
        Ok(Expression::Arrow(ArrowFunction {
            data: self.finish_node(start),
            is_async,
            type_parameters: head.type_parameters,
            params: head.params,
            return_type: head.return_type,
            body,
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, ParseOptions};
    use parsley_ast::{ArrowBody, Expression, Statement, Syntax};
    use parsley_core::AstArena;
    use parsley_diagnostics::messages;

    fn codes(source: &str, syntax: &[Syntax]) -> Vec<u32> {
        let arena = AstArena::new();
        let options = ParseOptions::new(source).with_syntax(syntax.iter().copied());
        let root = parse(&arena, &options).unwrap();
        root.diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_function_declaration() {
        let arena = AstArena::new();
        let root = parse(&arena, &ParseOptions::new("async function* f(a, [b], ...c) { 'use strict'; yield 1; }")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Statement::FunctionDeclaration(function) = &root.statements[0] else {
            panic!("expected a function declaration");
        };
        assert!(function.is_async && function.is_generator);
        assert_eq!(function.params.len(), 3);
        let body = function.body.unwrap();
        assert_eq!(body.directives.len(), 1);
        assert_eq!(body.body.len(), 1);
    }

    #[test]
    fn test_arrow_bodies() {
        let arena = AstArena::new();
        let root = parse(&arena, &ParseOptions::new("x => ({}); y => {};")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let bodies: Vec<_> = root
            .statements
            .iter()
            .map(|statement| match statement {
                Statement::Expression(s) => match s.expression {
                    Expression::Arrow(arrow) => matches!(arrow.body, ArrowBody::Block(_)),
                    other => panic!("expected an arrow, got {other:?}"),
                },
                other => panic!("expected an expression statement, got {other:?}"),
            })
            .collect();
        assert_eq!(bodies, [false, true]);
    }

    #[test]
    fn test_parameter_errors() {
        assert_eq!(codes("function f(...a, b) {}", &[]), vec![messages::REST_NOT_LAST.code]);
        assert_eq!(
            codes("function f(a?: number = 1) {}", &[Syntax::Ts]),
            vec![messages::OPTIONAL_AND_INITIALIZER.code]
        );
        assert_eq!(
            codes("function f(public a) {}", &[Syntax::Ts]),
            vec![messages::PARAMETER_PROPERTY_OUTSIDE_CONSTRUCTOR.code]
        );
        assert_eq!(codes("function f(a: number) {}", &[]), vec![messages::TS_NOT_ENABLED.code]);
        assert_eq!(codes("function* g(a = yield) {}", &[]), vec![messages::YIELD_IN_PARAMETERS.code]);
    }

    #[test]
    fn test_typescript_overloads() {
        let source = "function f(a: string): void;\nfunction f(a: any) {}\ndeclare function g(): void;";
        assert!(codes(source, &[Syntax::Ts]).is_empty());
        assert_eq!(
            codes("declare function g() {}", &[Syntax::Ts]),
            vec![messages::AMBIENT_IMPLEMENTATION.code]
        );
    }
}
