//! Binding patterns, and the conversion of already-parsed expressions into
//! assignment targets once an `=` (or `of`, or `=>`) reveals them as such.

use crate::parser::Parser;
use crate::speculation::PResult;
use crate::utilities::is_strict_bind_only_reserved;
use parsley_ast::{
    ArrayElement, ArrayPattern, AssignmentPattern, Expression, Identifier, ObjectMember,
    ObjectPattern, ObjectPatternEntry, ObjectPatternProperty, Pattern, PropertyKey, RestElement,
};
use parsley_core::SourceSpan;
use parsley_diagnostics::messages;
use parsley_scanner::TokenKind;

impl<'a> Parser<'a> {
    // ========================================================================
    // Binding patterns
    // ========================================================================

    pub(crate) fn parse_binding_atom(&mut self) -> PResult<Pattern<'a>> {
        match self.state.kind {
            TokenKind::BracketL => self.parse_array_binding(),
            TokenKind::BraceL => self.parse_object_binding(),
            TokenKind::Placeholder => Ok(Pattern::Placeholder(self.parse_placeholder()?)),
            _ => Ok(Pattern::Identifier(self.parse_binding_identifier()?)),
        }
    }

    /// A binding atom with an optional `= default`.
    pub(crate) fn parse_binding_element(&mut self) -> PResult<Pattern<'a>> {
        let start = self.start_node();
        let left = self.parse_binding_atom()?;
        if !self.eat(TokenKind::Eq)? {
            return Ok(left);
        }
        let right = self.allow_in(|p| p.parse_maybe_assign())?;
        Ok(Pattern::Assignment(AssignmentPattern {
            data: self.finish_node(start),
            left: self.alloc(left),
            right: self.alloc(right),
        }))
    }

    fn parse_binding_rest(&mut self) -> PResult<RestElement<'a>> {
        let start = self.start_node();
        self.expect(TokenKind::Ellipsis)?;
        let argument = self.parse_binding_atom()?;
        Ok(RestElement {
            data: self.finish_node(start),
            argument: self.alloc(argument),
        })
    }

    /// After a rest element only the closing bracket may follow.
    fn check_rest_is_last(&mut self, close: TokenKind) -> PResult<()> {
        if self.at(close) {
            return Ok(());
        }
        let span = self.token_span();
        if self.at(TokenKind::Comma) && self.lookahead()?.kind == close {
            self.report(&messages::COMMA_AFTER_REST, &[], span)
        } else {
            self.report(&messages::REST_NOT_LAST, &[], span)
        }
    }

    fn parse_array_binding(&mut self) -> PResult<Pattern<'a>> {
        let start = self.start_node();
        self.next()?;
        let mut elements = Vec::new();
        while !self.at(TokenKind::BracketR) && !self.at(TokenKind::Eof) {
            if self.eat(TokenKind::Comma)? {
                elements.push(None);
                continue;
            }
            if self.at(TokenKind::Ellipsis) {
                let rest = self.parse_binding_rest()?;
                elements.push(Some(Pattern::Rest(rest)));
                self.check_rest_is_last(TokenKind::BracketR)?;
            } else {
                elements.push(Some(self.parse_binding_element()?));
            }
            if !self.at(TokenKind::BracketR) && !self.expect(TokenKind::Comma)? {
                break;
            }
        }
        self.expect_closing(TokenKind::BracketR, "array pattern", start)?;
        Ok(Pattern::Array(ArrayPattern {
            data: self.finish_node(start),
            elements: self.alloc_vec(elements),
        }))
    }

    fn parse_object_binding(&mut self) -> PResult<Pattern<'a>> {
        let start = self.start_node();
        self.next()?;
        let mut properties = Vec::new();
        while !self.at(TokenKind::BraceR) && !self.at(TokenKind::Eof) {
            if self.at(TokenKind::Ellipsis) {
                let rest_start = self.start_node();
                self.next()?;
                let argument = Pattern::Identifier(self.parse_binding_identifier()?);
                properties.push(ObjectPatternProperty::Rest(RestElement {
                    data: self.finish_node(rest_start),
                    argument: self.alloc(argument),
                }));
                self.check_rest_is_last(TokenKind::BraceR)?;
            } else {
                properties.push(ObjectPatternProperty::Property(self.parse_object_binding_entry()?));
            }
            if !self.at(TokenKind::BraceR) && !self.expect(TokenKind::Comma)? {
                break;
            }
        }
        self.expect_closing(TokenKind::BraceR, "object pattern", start)?;
        Ok(Pattern::Object(ObjectPattern {
            data: self.finish_node(start),
            properties: self.alloc_vec(properties),
        }))
    }

    fn parse_object_binding_entry(&mut self) -> PResult<ObjectPatternEntry<'a>> {
        let start = self.start_node();
        let key = self.parse_property_key()?;
        if self.eat(TokenKind::Colon)? {
            let value = self.parse_binding_element()?;
            return Ok(ObjectPatternEntry {
                data: self.finish_node(start),
                key,
                value,
                shorthand: false,
            });
        }

        let id = match key {
            PropertyKey::Identifier(id) => {
                self.check_shorthand_name(&id, true)?;
                Identifier {
                    data: self.clone_node_without_comments(&id.data),
                    name: id.name,
                }
            }
            _ => {
                self.unexpected()?;
                self.missing_identifier()
            }
        };
        let mut value = Pattern::Identifier(id);
        if self.eat(TokenKind::Eq)? {
            let right = self.allow_in(|p| p.parse_maybe_assign())?;
            value = Pattern::Assignment(AssignmentPattern {
                data: self.finish_node(start),
                left: self.alloc(value),
                right: self.alloc(right),
            });
        }
        Ok(ObjectPatternEntry {
            data: self.finish_node(start),
            key,
            value,
            shorthand: true,
        })
    }

    /// A shorthand property names a variable, so keywords are out.
    pub(crate) fn check_shorthand_name(&mut self, id: &Identifier, binding: bool) -> PResult<()> {
        let name = self.name_of(id).to_string();
        if TokenKind::keyword(&name).is_some() {
            return self.report(&messages::RESERVED_WORD, &[&name], id.data.span);
        }
        self.check_reserved_word(&name, id.data.span, binding)
    }

    // ========================================================================
    // Expression to pattern
    // ========================================================================

    /// Reinterpret `expr` as the target of a plain `=`, a for-in/of head or
    /// an arrow parameter list.
    pub(crate) fn to_assignable(&mut self, expr: Expression<'a>, what: &str) -> PResult<Pattern<'a>> {
        match expr {
            Expression::Identifier(id) => {
                self.check_assign_name(&id)?;
                Ok(Pattern::Identifier(id))
            }
            Expression::Member(_)
            | Expression::TsAs(_)
            | Expression::TsSatisfies(_)
            | Expression::TsNonNull(_)
            | Expression::TsTypeAssertion(_) => Ok(Pattern::Expression(self.alloc(expr))),
            Expression::Parenthesized(paren) => match paren.expression.without_parens() {
                Expression::Identifier(_) | Expression::Member(_) => {
                    Ok(Pattern::Expression(self.alloc(expr)))
                }
                _ => self.invalid_target(expr.span(), what),
            },
            Expression::Object(object) => {
                let mut properties = Vec::with_capacity(object.properties.len());
                let last = object.properties.len().saturating_sub(1);
                for (index, member) in object.properties.iter().enumerate() {
                    match member {
                        ObjectMember::Property(property) => {
                            let value = match property.value {
                                Expression::Assignment(assign) if property.shorthand => {
                                    Pattern::Assignment(AssignmentPattern {
                                        data: assign.data,
                                        left: assign.left,
                                        right: assign.right,
                                    })
                                }
                                value => self.to_assignable(*value, what)?,
                            };
                            properties.push(ObjectPatternProperty::Property(ObjectPatternEntry {
                                data: property.data,
                                key: property.key,
                                value,
                                shorthand: property.shorthand,
                            }));
                        }
                        ObjectMember::Spread(spread) => {
                            if index != last {
                                self.report(&messages::REST_NOT_LAST, &[], spread.data.span)?;
                            } else {
                                self.check_comma_after_rest(spread.data.span, object.data.span)?;
                            }
                            let argument = self.to_assignable(*spread.argument, what)?;
                            properties.push(ObjectPatternProperty::Rest(RestElement {
                                data: spread.data,
                                argument: self.alloc(argument),
                            }));
                        }
                        ObjectMember::Method(method) => {
                            self.report(
                                &messages::INVALID_ASSIGNMENT_TARGET,
                                &[what],
                                method.data.span,
                            )?;
                        }
                    }
                }
                Ok(Pattern::Object(ObjectPattern {
                    data: object.data,
                    properties: self.alloc_vec(properties),
                }))
            }
            Expression::Array(array) => {
                let mut elements = Vec::with_capacity(array.elements.len());
                let last = array.elements.len().saturating_sub(1);
                for (index, element) in array.elements.iter().enumerate() {
                    let pattern = match element {
                        ArrayElement::Hole(_) => None,
                        ArrayElement::Expression(value) => Some(self.to_assignable(*value, what)?),
                        ArrayElement::Spread(spread) => {
                            if index != last {
                                self.report(&messages::REST_NOT_LAST, &[], spread.data.span)?;
                            } else {
                                self.check_comma_after_rest(spread.data.span, array.data.span)?;
                            }
                            let argument = self.to_assignable(*spread.argument, what)?;
                            Some(Pattern::Rest(RestElement {
                                data: spread.data,
                                argument: self.alloc(argument),
                            }))
                        }
                    };
                    elements.push(pattern);
                }
                Ok(Pattern::Array(ArrayPattern {
                    data: array.data,
                    elements: self.alloc_vec(elements),
                }))
            }
            Expression::Assignment(assign) if assign.operator.is_plain() => {
                Ok(Pattern::Assignment(AssignmentPattern {
                    data: assign.data,
                    left: assign.left,
                    right: assign.right,
                }))
            }
            Expression::Placeholder(placeholder) => Ok(Pattern::Placeholder(placeholder)),
            Expression::Missing(data) => Ok(Pattern::Missing(data)),
            _ => self.invalid_target(expr.span(), what),
        }
    }

    /// Targets of compound assignment: a name or a member access.
    pub(crate) fn to_simple_assignable(
        &mut self,
        expr: Expression<'a>,
        what: &str,
    ) -> PResult<Pattern<'a>> {
        self.check_simple_target(&expr, what)?;
        Ok(match expr {
            Expression::Identifier(id) => Pattern::Identifier(id),
            Expression::Missing(data) => Pattern::Missing(data),
            _ => Pattern::Expression(self.alloc(expr)),
        })
    }

    pub(crate) fn check_simple_target(&mut self, expr: &Expression<'a>, what: &str) -> PResult<()> {
        match expr.without_parens() {
            Expression::Identifier(id) => self.check_assign_name(id),
            Expression::Member(_)
            | Expression::TsAs(_)
            | Expression::TsSatisfies(_)
            | Expression::TsNonNull(_)
            | Expression::TsTypeAssertion(_)
            | Expression::Missing(_) => Ok(()),
            _ => self.report(&messages::INVALID_ASSIGNMENT_TARGET, &[what], expr.span()),
        }
    }

    fn check_assign_name(&mut self, id: &Identifier) -> PResult<()> {
        let name = self.name_of(id);
        if self.is_strict() && is_strict_bind_only_reserved(name) {
            let name = name.to_string();
            return self.report(&messages::STRICT_RESERVED_WORD, &[&name], id.data.span);
        }
        Ok(())
    }

    /// `[...a,] = b` and `({...a,} = b)`: a trailing comma was seen right
    /// after the spread that is now a rest element.
    fn check_comma_after_rest(&mut self, rest: SourceSpan, container: SourceSpan) -> PResult<()> {
        let Some(at) = self.state.comma_after_spread_at else {
            return Ok(());
        };
        if at.index >= rest.end.index && at.index < container.end.index {
            self.report(&messages::COMMA_AFTER_REST, &[], SourceSpan::empty(at))?;
        }
        Ok(())
    }

    fn invalid_target(&mut self, span: SourceSpan, what: &str) -> PResult<Pattern<'a>> {
        self.report(&messages::INVALID_ASSIGNMENT_TARGET, &[what], span)?;
        let data = self.node_data_at(span);
        Ok(Pattern::Missing(data))
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, ParseOptions};
    use parsley_ast::{Expression, Pattern, Statement};
    use parsley_core::AstArena;
    use parsley_diagnostics::messages;

    fn codes(source: &str) -> Vec<u32> {
        let arena = AstArena::new();
        let root = parse(&arena, &ParseOptions::new(source)).unwrap();
        root.diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_destructuring_assignment() {
        let arena = AstArena::new();
        let root = parse(&arena, &ParseOptions::new("[a, { b = 1, c: d }, ...e] = f;")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Statement::Expression(statement) = &root.statements[0] else {
            panic!("expected an expression statement");
        };
        let Expression::Assignment(assign) = statement.expression else {
            panic!("expected an assignment");
        };
        let Pattern::Array(array) = assign.left else {
            panic!("expected an array pattern, got {:?}", assign.left);
        };
        assert_eq!(array.elements.len(), 3);
        assert!(matches!(array.elements[1], Some(Pattern::Object(_))));
        assert!(matches!(array.elements[2], Some(Pattern::Rest(_))));
    }

    #[test]
    fn test_rest_position_errors() {
        assert_eq!(codes("[...a, b] = c;"), vec![messages::REST_NOT_LAST.code]);
        assert_eq!(codes("[...a,] = c;"), vec![messages::COMMA_AFTER_REST.code]);
        assert_eq!(codes("let [...a, b] = c;"), vec![messages::REST_NOT_LAST.code]);
        assert!(codes("[[...a], ...b] = c;").is_empty());
        assert!(codes("[...a,];").is_empty());
    }

    #[test]
    fn test_binding_names() {
        assert_eq!(codes("let { if: x, class } = y;"), vec![messages::RESERVED_WORD.code]);
        assert_eq!(
            codes("'use strict'; eval = 1;"),
            vec![messages::STRICT_RESERVED_WORD.code]
        );
    }
}
