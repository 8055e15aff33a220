//! Array and object literals, property keys and method prefixes.

use crate::parser::Parser;
use crate::scope::{ScopeName, ScopeValue};
use crate::speculation::PResult;
use crate::utilities::is_property_key_start;
use parsley_ast::{
    ArrayElement, ArrayExpression, AssignmentExpression, AssignmentOperator, ComputedKey,
    Expression, Identifier, MethodKind, ObjectExpression, ObjectMember, ObjectMethod,
    ObjectProperty, Pattern, PropertyKey,
};
use parsley_core::SourceSpan;
use parsley_scanner::{TokenFlags, TokenKind};

/// `async`, `get`, `set` and `*` in front of a method name.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MethodPrefix {
    pub is_async: bool,
    pub is_generator: bool,
    pub kind: MethodKind,
}

impl MethodPrefix {
    pub(crate) fn is_method(self) -> bool {
        self.is_async || self.is_generator || self.kind != MethodKind::Method
    }
}

impl<'a> Parser<'a> {
    pub(crate) fn parse_array_literal(&mut self) -> PResult<Expression<'a>> {
        let start = self.start_node();
        self.next()?;
        let mut elements = Vec::new();
        while !self.at(TokenKind::BracketR) && !self.at(TokenKind::Eof) {
            if self.at(TokenKind::Comma) {
                let hole = self.node_data_at(SourceSpan::empty(self.state.start));
                elements.push(ArrayElement::Hole(hole));
                self.next()?;
                continue;
            }
            let element = if self.at(TokenKind::Ellipsis) {
                let spread = self.parse_spread()?;
                if self.at(TokenKind::Comma) {
                    self.state.comma_after_spread_at = Some(self.state.start);
                }
                ArrayElement::Spread(spread)
            } else {
                ArrayElement::Expression(self.allow_in(|p| p.parse_maybe_assign_shared())?)
            };
            elements.push(element);
            if !self.at(TokenKind::BracketR) && !self.expect(TokenKind::Comma)? {
                break;
            }
        }
        self.expect_closing(TokenKind::BracketR, "array literal", start)?;
        Ok(Expression::Array(ArrayExpression {
            data: self.finish_node(start),
            elements: self.alloc_vec(elements),
        }))
    }

    pub(crate) fn parse_object_literal(&mut self) -> PResult<Expression<'a>> {
        let start = self.start_node();
        self.next()?;
        let mut properties = Vec::new();
        while !self.at(TokenKind::BraceR) && !self.at(TokenKind::Eof) {
            properties.push(self.parse_object_member()?);
            if !self.at(TokenKind::BraceR) && !self.expect(TokenKind::Comma)? {
                break;
            }
        }
        self.expect_closing(TokenKind::BraceR, "object literal", start)?;
        Ok(Expression::Object(ObjectExpression {
            data: self.finish_node(start),
            properties: self.alloc_vec(properties),
        }))
    }

    fn parse_object_member(&mut self) -> PResult<ObjectMember<'a>> {
        if self.at(TokenKind::Ellipsis) {
            let spread = self.parse_spread()?;
            if self.at(TokenKind::Comma) {
                self.state.comma_after_spread_at = Some(self.state.start);
            }
            return Ok(ObjectMember::Spread(spread));
        }

        let start = self.start_node();
        let prefix = self.parse_method_prefix()?;
        let key = self.parse_property_key()?;

        if prefix.is_method() || self.at(TokenKind::ParenL) || self.at(TokenKind::Lt) {
            let function = self.parse_method(prefix.is_async, prefix.is_generator, prefix.kind, false, false)?;
            return Ok(ObjectMember::Method(ObjectMethod {
                data: self.finish_node(start),
                kind: prefix.kind,
                key,
                function: self.alloc(function),
            }));
        }

        if self.eat(TokenKind::Colon)? {
            let value = self.allow_in(|p| p.parse_maybe_assign_shared())?;
            return Ok(ObjectMember::Property(ObjectProperty {
                data: self.finish_node(start),
                key,
                value: self.alloc(value),
                shorthand: false,
            }));
        }

        let PropertyKey::Identifier(id) = key else {
            self.unexpected()?;
            let value = Expression::Missing(self.missing_node());
            return Ok(ObjectMember::Property(ObjectProperty {
                data: self.finish_node(start),
                key,
                value: self.alloc(value),
                shorthand: false,
            }));
        };
        self.check_shorthand_name(&id, false)?;
        let reference = Identifier {
            data: self.clone_node_without_comments(&id.data),
            name: id.name,
        };

        // `{ a = 1 }` is only valid if the object becomes a pattern.
        let value = if self.at(TokenKind::Eq) {
            if self.state.shorthand_default_at.is_none() {
                self.state.shorthand_default_at = Some(self.state.start);
            }
            self.next()?;
            let right = self.allow_in(|p| p.parse_maybe_assign())?;
            Expression::Assignment(AssignmentExpression {
                data: self.finish_node(start),
                operator: AssignmentOperator::Assign,
                left: self.alloc(Pattern::Identifier(reference)),
                right: self.alloc(right),
            })
        } else {
            Expression::Identifier(reference)
        };
        Ok(ObjectMember::Property(ObjectProperty {
            data: self.finish_node(start),
            key,
            value: self.alloc(value),
            shorthand: true,
        }))
    }

    /// Reads `async`, `get` or `set` as a prefix only when a key follows,
    /// so `{ get: 1 }` and `{ async() {} }` keep them as names.
    pub(crate) fn parse_method_prefix(&mut self) -> PResult<MethodPrefix> {
        let mut prefix = MethodPrefix {
            is_async: false,
            is_generator: false,
            kind: MethodKind::Method,
        };
        if self.at(TokenKind::Name) && !self.state.flags.contains(TokenFlags::ESCAPED) {
            let word = self.token_text();
            if matches!(word, "async" | "get" | "set") {
                let is_async = word == "async";
                let kind = match word {
                    "get" => MethodKind::Get,
                    "set" => MethodKind::Set,
                    _ => MethodKind::Method,
                };
                let next = self.lookahead()?;
                let applies = if is_async {
                    !next.line_break_before
                        && (is_property_key_start(next.kind) || next.kind == TokenKind::Star)
                } else {
                    is_property_key_start(next.kind)
                };
                if applies {
                    prefix.is_async = is_async;
                    prefix.kind = kind;
                    self.next()?;
                }
            }
        }
        if self.eat(TokenKind::Star)? {
            prefix.is_generator = true;
        }
        Ok(prefix)
    }

    pub(crate) fn parse_property_key(&mut self) -> PResult<PropertyKey<'a>> {
        let start = self.start_node();
        Ok(match self.state.kind {
            TokenKind::String => PropertyKey::String(self.parse_string_literal()?),
            TokenKind::Num => PropertyKey::Number(self.parse_numeric_literal()?),
            TokenKind::BigInt => PropertyKey::BigInt(self.parse_bigint_literal()?),
            TokenKind::PrivateName => PropertyKey::Private(self.parse_private_name()?),
            TokenKind::BracketL => {
                self.next()?;
                let expression = self.with_scope(ScopeName::PropertyName, ScopeValue::FALSE, |p| {
                    p.allow_in(|p| p.parse_maybe_assign())
                })?;
                self.expect_closing(TokenKind::BracketR, "computed property name", start)?;
                PropertyKey::Computed(ComputedKey {
                    data: self.finish_node(start),
                    expression: self.alloc(expression),
                })
            }
            _ => PropertyKey::Identifier(self.parse_identifier_name()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, ParseOptions};
    use parsley_ast::{Expression, MethodKind, ObjectMember, Statement};
    use parsley_core::AstArena;
    use parsley_diagnostics::messages;

    #[test]
    fn test_object_members() {
        let arena = AstArena::new();
        let source = "x = { a, b: 1, get c() { return 1 }, set c(v) {}, async *d() {}, get: 2, [e]: 3, ...f };";
        let root = parse(&arena, &ParseOptions::new(source)).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Statement::Expression(statement) = &root.statements[0] else {
            panic!("expected an expression statement");
        };
        let Expression::Assignment(assign) = statement.expression else {
            panic!("expected an assignment");
        };
        let Expression::Object(object) = assign.right else {
            panic!("expected an object literal");
        };
        let kinds: Vec<_> = object
            .properties
            .iter()
            .map(|member| match member {
                ObjectMember::Property(p) if p.shorthand => "shorthand",
                ObjectMember::Property(_) => "property",
                ObjectMember::Method(m) if m.kind == MethodKind::Get => "get",
                ObjectMember::Method(m) if m.kind == MethodKind::Set => "set",
                ObjectMember::Method(m) if m.function.is_async && m.function.is_generator => "async*",
                ObjectMember::Method(_) => "method",
                ObjectMember::Spread(_) => "spread",
            })
            .collect();
        assert_eq!(
            kinds,
            ["shorthand", "property", "get", "set", "async*", "property", "property", "spread"]
        );
    }

    #[test]
    fn test_accessor_parameter_counts() {
        let arena = AstArena::new();
        let root = parse(&arena, &ParseOptions::new("({ get a(x) {}, set b() {} });")).unwrap();
        let codes: Vec<_> = root.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![messages::GETTER_WITH_PARAMETERS.code, messages::SETTER_PARAMETER_COUNT.code]
        );
    }

    #[test]
    fn test_array_holes() {
        let arena = AstArena::new();
        let root = parse(&arena, &ParseOptions::new("[, a, , ...b];")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Statement::Expression(statement) = &root.statements[0] else {
            panic!("expected an expression statement");
        };
        let Expression::Array(array) = statement.expression else {
            panic!("expected an array literal");
        };
        assert_eq!(array.elements.len(), 4);
    }
}
