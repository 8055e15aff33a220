//! JSX elements, fragments, attributes and children.
//!
//! The tokenizer does most of the work here: the lexical contexts pushed by
//! `JsxTagStart` switch it between tag scanning (names, `>`, attribute
//! strings) and child scanning (text, `{`, `<`).

use crate::parser::Parser;
use crate::speculation::{BranchFinder, BranchOptions, PResult};
use parsley_ast::{
    Expression, JsxAttribute, JsxAttributeItem, JsxAttributeName, JsxAttributeValue, JsxChild,
    JsxClosingElement, JsxElement, JsxElementName, JsxExpressionContainer, JsxFragment,
    JsxIdentifier, JsxMemberExpression, JsxNamespacedName, JsxOpeningElement, JsxSpreadAttribute,
    JsxSpreadChild, JsxText, Syntax,
};
use parsley_core::Position;
use parsley_diagnostics::messages;
use parsley_scanner::TokenKind;

use super::function::ArrowHead;

enum JsxNode<'a> {
    Element(&'a JsxElement<'a>),
    Fragment(&'a JsxFragment<'a>),
}

/// What a `<` in a `.tsx` expression turned out to be.
enum TsxStart<'a> {
    Jsx(JsxNode<'a>),
    Arrow(ArrowHead<'a>),
    Assertion(Expression<'a>),
}

impl<'a> Parser<'a> {
    /// An expression starting with `JsxTagStart`. With TypeScript on, the
    /// `<` may instead open a generic arrow function or a type assertion.
    pub(crate) fn parse_jsx_atom(&mut self, start: Position) -> PResult<Expression<'a>> {
        self.mark_syntax(Syntax::Jsx);
        if !self.ts_enabled() {
            let node = self.parse_jsx_element()?;
            return self.finish_jsx_atom(node);
        }

        let mut finder = BranchFinder::new();
        finder
            .add(self, BranchOptions::default(), |p| {
                Ok(Some(TsxStart::Jsx(p.parse_jsx_element()?)))
            })?
            .add(self, BranchOptions::STRICT, |p| {
                p.forget_jsx_tag_start();
                p.state.kind = TokenKind::Lt;
                Ok(p.try_parse_arrow_head()?.map(TsxStart::Arrow))
            })?
            .add(self, BranchOptions::STRICT, |p| {
                p.forget_jsx_tag_start();
                p.state.kind = TokenKind::Lt;
                Ok(Some(TsxStart::Assertion(p.parse_ts_type_assertion(start)?)))
            })?;
        match finder.pick(self)? {
            TsxStart::Jsx(node) => self.finish_jsx_atom(node),
            TsxStart::Arrow(head) => self.parse_arrow_from_head(start, head, false),
            TsxStart::Assertion(expression) => {
                let span = expression.span();
                self.report(&messages::TYPE_ASSERTION_IN_JSX, &[], span)?;
                Ok(expression)
            }
        }
    }

    fn finish_jsx_atom(&mut self, node: JsxNode<'a>) -> PResult<Expression<'a>> {
        if self.at(TokenKind::Lt) {
            let span = self.token_span();
            self.report_corrupt(&messages::JSX_ADJACENT_ELEMENTS, &[], span)?;
        }
        Ok(match node {
            JsxNode::Element(element) => Expression::JsxElement(element),
            JsxNode::Fragment(fragment) => Expression::JsxFragment(fragment),
        })
    }

    // ========================================================================
    // Elements
    // ========================================================================

    /// An element or fragment at the current `JsxTagStart`.
    fn parse_jsx_element(&mut self) -> PResult<JsxNode<'a>> {
        let start = self.start_node();
        self.next()?;
        self.parse_jsx_element_after_lt(start)
    }

    fn parse_jsx_element_after_lt(&mut self, start: Position) -> PResult<JsxNode<'a>> {
        if self.at(TokenKind::JsxTagEnd) {
            return self.parse_jsx_fragment(start);
        }

        let opening = self.parse_jsx_opening_element(start)?;
        if opening.self_closing {
            let element = JsxElement {
                data: self.finish_node(start),
                opening,
                children: &[],
                closing: None,
            };
            return Ok(JsxNode::Element(self.alloc(element)));
        }

        let (children, closing_start) = self.parse_jsx_children()?;
        let closing = match closing_start {
            Some(closing_start) => {
                let name = if self.at(TokenKind::JsxTagEnd) {
                    None
                } else {
                    Some(self.parse_jsx_element_name()?)
                };
                self.expect_closing(TokenKind::JsxTagEnd, "JSX closing tag", closing_start)?;
                let data = self.finish_node(closing_start);
                let open_name = self.jsx_name_text(&opening.name);
                let close_name = name.map(|n| self.jsx_name_text(&n)).unwrap_or_default();
                if open_name != close_name {
                    self.report_corrupt(
                        &messages::JSX_MISMATCHED_CLOSING_TAG,
                        &[&open_name, &close_name],
                        data.span,
                    )?;
                }
                name.map(|name| JsxClosingElement { data, name })
            }
            None => None,
        };

        let element = JsxElement {
            data: self.finish_node(start),
            opening,
            children: self.alloc_vec(children),
            closing,
        };
        Ok(JsxNode::Element(self.alloc(element)))
    }

    fn parse_jsx_fragment(&mut self, start: Position) -> PResult<JsxNode<'a>> {
        self.next()?;
        let opening = self.finish_node(start);
        let (children, closing_start) = self.parse_jsx_children()?;
        let closing = match closing_start {
            Some(closing_start) => {
                if !self.at(TokenKind::JsxTagEnd) {
                    let name = self.parse_jsx_element_name()?;
                    let found = self.jsx_name_text(&name);
                    let span = name.span();
                    self.report_corrupt(&messages::JSX_MISMATCHED_CLOSING_TAG, &["", &found], span)?;
                }
                self.expect_closing(TokenKind::JsxTagEnd, "JSX closing tag", closing_start)?;
                self.finish_node(closing_start)
            }
            None => self.missing_node(),
        };
        let fragment = JsxFragment {
            data: self.finish_node(start),
            opening,
            children: self.alloc_vec(children),
            closing,
        };
        Ok(JsxNode::Fragment(self.alloc(fragment)))
    }

    fn parse_jsx_opening_element(&mut self, start: Position) -> PResult<JsxOpeningElement<'a>> {
        let name = self.parse_jsx_element_name()?;
        let mut attributes = Vec::new();
        while !matches!(
            self.state.kind,
            TokenKind::Slash | TokenKind::JsxTagEnd | TokenKind::Eof
        ) {
            let before = self.state.start.index;
            attributes.push(self.parse_jsx_attribute()?);
            if self.state.start.index == before {
                self.next()?;
            }
        }
        let self_closing = self.eat(TokenKind::Slash)?;
        self.expect_closing(TokenKind::JsxTagEnd, "JSX opening tag", start)?;
        Ok(JsxOpeningElement {
            data: self.finish_node(start),
            name,
            type_arguments: None,
            attributes: self.alloc_vec(attributes),
            self_closing,
        })
    }

    /// Children up to the next `</`. Returns the position of that `<` when
    /// a closing tag was reached, with its `/` already consumed.
    fn parse_jsx_children(&mut self) -> PResult<(Vec<JsxChild<'a>>, Option<Position>)> {
        let mut children = Vec::new();
        loop {
            let start = self.start_node();
            match self.state.kind {
                TokenKind::JsxText => {
                    let value = self.alloc_str(self.token_text());
                    let span = self.token_span();
                    let raw = self.slice(span.start.index, span.end.index);
                    self.next()?;
                    children.push(JsxChild::Text(JsxText {
                        data: self.finish_node(start),
                        value,
                        raw,
                    }));
                }
                TokenKind::BraceL => children.push(self.parse_jsx_child_expression()?),
                TokenKind::JsxTagStart => {
                    self.next()?;
                    if self.eat(TokenKind::Slash)? {
                        return Ok((children, Some(start)));
                    }
                    children.push(match self.parse_jsx_element_after_lt(start)? {
                        JsxNode::Element(element) => JsxChild::Element(element),
                        JsxNode::Fragment(fragment) => JsxChild::Fragment(fragment),
                    });
                }
                TokenKind::Eof => return Ok((children, None)),
                _ => {
                    self.unexpected()?;
                    self.next()?;
                }
            }
        }
    }

    fn parse_jsx_child_expression(&mut self) -> PResult<JsxChild<'a>> {
        let start = self.start_node();
        self.next()?;
        if self.eat(TokenKind::Ellipsis)? {
            let expression = self.allow_in(|p| p.parse_expression())?;
            self.expect_closing(TokenKind::BraceR, "JSX spread child", start)?;
            return Ok(JsxChild::Spread(JsxSpreadChild {
                data: self.finish_node(start),
                expression: self.alloc(expression),
            }));
        }
        let container = self.parse_jsx_expression_container_rest(start)?;
        Ok(JsxChild::Expression(container))
    }

    /// The inside of `{...}` after the `{`. Empty braces give no expression.
    fn parse_jsx_expression_container_rest(
        &mut self,
        start: Position,
    ) -> PResult<JsxExpressionContainer<'a>> {
        let expression = if self.at(TokenKind::BraceR) {
            None
        } else {
            let expression = self.allow_in(|p| p.parse_expression())?;
            Some(&*self.alloc(expression))
        };
        self.expect_closing(TokenKind::BraceR, "JSX expression", start)?;
        Ok(JsxExpressionContainer {
            data: self.finish_node(start),
            expression,
        })
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    fn parse_jsx_attribute(&mut self) -> PResult<JsxAttributeItem<'a>> {
        let start = self.start_node();
        if self.eat(TokenKind::BraceL)? {
            self.expect(TokenKind::Ellipsis)?;
            let argument = self.allow_in(|p| p.parse_maybe_assign())?;
            self.expect_closing(TokenKind::BraceR, "JSX spread attribute", start)?;
            return Ok(JsxAttributeItem::Spread(JsxSpreadAttribute {
                data: self.finish_node(start),
                argument: self.alloc(argument),
            }));
        }

        let name = self.parse_jsx_identifier()?;
        let name = if self.eat(TokenKind::Colon)? {
            let local = self.parse_jsx_identifier()?;
            JsxAttributeName::Namespaced(JsxNamespacedName {
                data: self.finish_node(start),
                namespace: name,
                name: local,
            })
        } else {
            JsxAttributeName::Identifier(name)
        };
        let value = if self.eat(TokenKind::Eq)? {
            Some(self.parse_jsx_attribute_value()?)
        } else {
            None
        };
        Ok(JsxAttributeItem::Attribute(JsxAttribute {
            data: self.finish_node(start),
            name,
            value,
        }))
    }

    fn parse_jsx_attribute_value(&mut self) -> PResult<JsxAttributeValue<'a>> {
        let start = self.start_node();
        match self.state.kind {
            TokenKind::String => Ok(JsxAttributeValue::String(self.parse_string_literal()?)),
            TokenKind::BraceL => {
                self.next()?;
                if self.at(TokenKind::BraceR) {
                    let span = self.token_span();
                    self.report(&messages::JSX_EMPTY_ATTRIBUTE_EXPRESSION, &[], span)?;
                }
                let container = self.parse_jsx_expression_container_rest(start)?;
                Ok(JsxAttributeValue::Expression(container))
            }
            TokenKind::JsxTagStart => Ok(match self.parse_jsx_element()? {
                JsxNode::Element(element) => JsxAttributeValue::Element(element),
                JsxNode::Fragment(fragment) => JsxAttributeValue::Fragment(fragment),
            }),
            _ => {
                let found = self.state.kind.describe();
                let span = self.token_span();
                self.report_corrupt(&messages::EXPECTED_EXPRESSION, &[&found], span)?;
                Ok(JsxAttributeValue::Expression(JsxExpressionContainer {
                    data: self.missing_node(),
                    expression: None,
                }))
            }
        }
    }

    // ========================================================================
    // Names
    // ========================================================================

    fn parse_jsx_identifier(&mut self) -> PResult<JsxIdentifier> {
        let start = self.start_node();
        if !self.at(TokenKind::JsxName) {
            let found = self.state.kind.describe();
            let span = self.token_span();
            self.report_corrupt(&messages::EXPECTED_IDENTIFIER, &[&found], span)?;
            return Ok(JsxIdentifier {
                data: self.missing_node(),
                name: self.intern(""),
            });
        }
        let name = self.intern(self.token_text());
        self.next()?;
        Ok(JsxIdentifier {
            data: self.finish_node(start),
            name,
        })
    }

    /// `a`, `a:b` or `a.b.c`.
    fn parse_jsx_element_name(&mut self) -> PResult<JsxElementName<'a>> {
        let start = self.start_node();
        let first = self.parse_jsx_identifier()?;
        if self.eat(TokenKind::Colon)? {
            let name = self.parse_jsx_identifier()?;
            return Ok(JsxElementName::Namespaced(JsxNamespacedName {
                data: self.finish_node(start),
                namespace: first,
                name,
            }));
        }
        let mut name = JsxElementName::Identifier(first);
        while self.eat(TokenKind::Dot)? {
            let property = self.parse_jsx_identifier()?;
            let member = JsxMemberExpression {
                data: self.finish_node(start),
                object: name,
                property,
            };
            name = JsxElementName::Member(self.alloc(member));
        }
        Ok(name)
    }

    /// The name as written, for matching opening and closing tags.
    fn jsx_name_text(&self, name: &JsxElementName<'a>) -> String {
        match name {
            JsxElementName::Identifier(id) => self.interner.resolve(id.name).to_string(),
            JsxElementName::Namespaced(ns) => format!(
                "{}:{}",
                self.interner.resolve(ns.namespace.name),
                self.interner.resolve(ns.name.name)
            ),
            JsxElementName::Member(member) => format!(
                "{}.{}",
                self.jsx_name_text(&member.object),
                self.interner.resolve(member.property.name)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, ParseOptions};
    use parsley_ast::{
        Expression, JsxAttributeItem, JsxAttributeValue, JsxChild, JsxElementName, Statement,
        Syntax,
    };
    use parsley_core::AstArena;
    use parsley_diagnostics::messages;

    fn jsx(source: &str) -> ParseOptions {
        ParseOptions::new(source).with_syntax([Syntax::Jsx])
    }

    fn first_expression<'a>(root: &crate::Root<'a>) -> Expression<'a> {
        let Statement::Expression(statement) = &root.statements[0] else {
            panic!("expected an expression statement");
        };
        *statement.expression
    }

    #[test]
    fn test_element_with_attributes_and_children() {
        let arena = AstArena::new();
        let source = r#"<div id="a" {...rest} data-x={1} on><span>hi &amp; bye</span>{value}{/* c */}</div>;"#;
        let root = parse(&arena, &jsx(source)).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Expression::JsxElement(element) = first_expression(&root) else {
            panic!("expected a JSX element");
        };
        assert_eq!(element.opening.attributes.len(), 4);
        assert!(matches!(element.opening.attributes[1], JsxAttributeItem::Spread(_)));
        let JsxAttributeItem::Attribute(string_attr) = element.opening.attributes[0] else {
            panic!("expected an attribute");
        };
        assert!(matches!(string_attr.value, Some(JsxAttributeValue::String(s)) if s.value == "a"));
        let JsxAttributeItem::Attribute(bare) = element.opening.attributes[3] else {
            panic!("expected an attribute");
        };
        assert!(bare.value.is_none());

        assert_eq!(element.children.len(), 3);
        let JsxChild::Element(span) = element.children[0] else {
            panic!("expected a nested element");
        };
        let JsxChild::Text(text) = span.children[0] else {
            panic!("expected text");
        };
        assert_eq!(text.value, "hi & bye");
        assert_eq!(text.raw, "hi &amp; bye");
        assert!(matches!(element.children[2], JsxChild::Expression(c) if c.expression.is_none()));
        assert!(element.closing.is_some());
    }

    #[test]
    fn test_fragment_and_member_names() {
        let arena = AstArena::new();
        let root = parse(&arena, &jsx("x = <><a.b.c /><svg:rect/></>;")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Statement::Expression(statement) = &root.statements[0] else {
            panic!("expected an expression statement");
        };
        let Expression::Assignment(assign) = statement.expression else {
            panic!("expected an assignment");
        };
        let Expression::JsxFragment(fragment) = assign.right else {
            panic!("expected a fragment");
        };
        let JsxChild::Element(member) = fragment.children[0] else {
            panic!("expected an element");
        };
        assert!(matches!(member.opening.name, JsxElementName::Member(_)));
        assert!(member.opening.self_closing);
        let JsxChild::Element(namespaced) = fragment.children[1] else {
            panic!("expected an element");
        };
        assert!(matches!(namespaced.opening.name, JsxElementName::Namespaced(_)));
    }

    #[test]
    fn test_division_after_element() {
        let arena = AstArena::new();
        let root = parse(&arena, &jsx("a = <b/> / 2;")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
    }

    #[test]
    fn test_jsx_errors() {
        let arena = AstArena::new();
        let root = parse(&arena, &jsx("<a></b>;")).unwrap();
        assert!(root.corrupt);
        assert_eq!(root.diagnostics[0].code, messages::JSX_MISMATCHED_CLOSING_TAG.code);

        let root = parse(&arena, &jsx("<a x={} />;")).unwrap();
        let codes: Vec<_> = root.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![messages::JSX_EMPTY_ATTRIBUTE_EXPRESSION.code]);

        let root = parse(&arena, &jsx("<a /><b />;")).unwrap();
        assert!(root
            .diagnostics
            .iter()
            .any(|d| d.code == messages::JSX_ADJACENT_ELEMENTS.code));
    }

    #[test]
    fn test_tsx_generic_arrow_and_assertion() {
        let arena = AstArena::new();
        let options = ParseOptions::new("f = <T,>(x: T) => x;").with_syntax([Syntax::Jsx, Syntax::Ts]);
        let root = parse(&arena, &options).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Statement::Expression(statement) = &root.statements[0] else {
            panic!("expected an expression statement");
        };
        let Expression::Assignment(assign) = statement.expression else {
            panic!("expected an assignment");
        };
        assert!(matches!(assign.right, Expression::Arrow(_)));

        let options = ParseOptions::new("y = <string>x;").with_syntax([Syntax::Jsx, Syntax::Ts]);
        let root = parse(&arena, &options).unwrap();
        let codes: Vec<_> = root.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![messages::TYPE_ASSERTION_IN_JSX.code]);
    }
}
