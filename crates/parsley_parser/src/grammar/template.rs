//! Template literals, shared by expressions and template literal types.

use crate::parser::Parser;
use crate::speculation::PResult;
use parsley_ast::{TemplateElement, TemplateLiteral};
use parsley_core::SourceSpan;
use parsley_diagnostics::messages;
use parsley_scanner::{TokenKind, TokenValue};

impl<'a> Parser<'a> {
    /// A template literal starting at the current backquote. Escapes that
    /// cannot be cooked are only reported when the template is not tagged.
    pub(crate) fn parse_template(&mut self, tagged: bool) -> PResult<TemplateLiteral<'a>> {
        let start = self.start_node();
        let (quasis, expressions) =
            self.parse_template_parts(tagged, |p| p.allow_in(|p| p.parse_expression()))?;
        Ok(TemplateLiteral {
            data: self.finish_node(start),
            quasis,
            expressions,
        })
    }

    /// Alternating text chunks and `${...}` substitutions, each read by `part`.
    /// There is always one more chunk than there are substitutions.
    pub(crate) fn parse_template_parts<T>(
        &mut self,
        tagged: bool,
        mut part: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<(&'a [TemplateElement<'a>], &'a [T])> {
        let start = self.start_node();
        self.next()?;
        let mut quasis = Vec::new();
        let mut parts = Vec::new();
        loop {
            let element = self.parse_template_element(tagged)?;
            let tail = element.tail;
            quasis.push(element);
            if tail {
                if !self.at(TokenKind::Eof) {
                    self.expect_closing(TokenKind::BackQuote, "template literal", start)?;
                }
                break;
            }
            self.next()?;
            parts.push(part(self)?);
            if !self.expect_closing(TokenKind::BraceR, "template substitution", start)? {
                break;
            }
        }
        Ok((self.alloc_vec(quasis), self.alloc_vec(parts)))
    }

    fn parse_template_element(&mut self, tagged: bool) -> PResult<TemplateElement<'a>> {
        if !self.at(TokenKind::Template) {
            let data = self.node_data_at(SourceSpan::empty(self.state.start));
            return Ok(TemplateElement {
                data,
                cooked: Some(""),
                raw: "",
                tail: !self.at(TokenKind::DollarBraceL),
            });
        }

        let start = self.start_node();
        let (cooked, raw) = match &self.state.value {
            TokenValue::Template { cooked, raw } => (cooked.clone(), raw.clone()),
            _ => (Some(String::new()), String::new()),
        };
        if cooked.is_none() && !tagged {
            let at = self.state.invalid_template_escape_at.unwrap_or(start);
            let span = SourceSpan::new(at, self.state.end);
            self.report(&messages::INVALID_TEMPLATE_ESCAPE, &[], span)?;
        }
        self.next()?;
        Ok(TemplateElement {
            data: self.finish_node(start),
            cooked: cooked.map(|text| self.alloc_str(&text)),
            raw: self.alloc_str(&raw),
            tail: !self.at(TokenKind::DollarBraceL),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, ParseOptions};
    use parsley_ast::{Expression, Statement};
    use parsley_core::AstArena;
    use parsley_diagnostics::messages;

    fn only_expression<'a>(root: &crate::Root<'a>) -> Expression<'a> {
        let Statement::Expression(statement) = &root.statements[0] else {
            panic!("expected an expression statement");
        };
        *statement.expression
    }

    #[test]
    fn test_template_quasis_and_expressions() {
        let arena = AstArena::new();
        let root = parse(&arena, &ParseOptions::new("`a${b}c${ {d} }`;")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Expression::Template(template) = only_expression(&root) else {
            panic!("expected a template literal");
        };
        let raws: Vec<_> = template.quasis.iter().map(|q| q.raw).collect();
        assert_eq!(raws, ["a", "c", ""]);
        let tails: Vec<_> = template.quasis.iter().map(|q| q.tail).collect();
        assert_eq!(tails, [false, false, true]);
        assert_eq!(template.expressions.len(), 2);
        assert!(matches!(template.expressions[1], Expression::Object(_)));
    }

    #[test]
    fn test_empty_template() {
        let arena = AstArena::new();
        let root = parse(&arena, &ParseOptions::new("``;")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Expression::Template(template) = only_expression(&root) else {
            panic!("expected a template literal");
        };
        assert_eq!(template.quasis.len(), 1);
        assert_eq!(template.quasis[0].cooked, Some(""));
        assert!(template.expressions.is_empty());
    }

    #[test]
    fn test_invalid_escape_only_in_untagged_template() {
        let arena = AstArena::new();
        let root = parse(&arena, &ParseOptions::new("tag`\\unicode`;")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Expression::TaggedTemplate(tagged) = only_expression(&root) else {
            panic!("expected a tagged template");
        };
        assert_eq!(tagged.quasi.quasis[0].cooked, None);
        assert_eq!(tagged.quasi.quasis[0].raw, "\\unicode");

        let root = parse(&arena, &ParseOptions::new("`\\unicode`;")).unwrap();
        let codes: Vec<_> = root.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![messages::INVALID_TEMPLATE_ESCAPE.code]);
    }

    #[test]
    fn test_nested_templates() {
        let arena = AstArena::new();
        let root = parse(&arena, &ParseOptions::new("`x${`y${z}`}`;")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Expression::Template(outer) = only_expression(&root) else {
            panic!("expected a template literal");
        };
        assert!(matches!(outer.expressions[0], Expression::Template(_)));
    }
}
