//! Lexical contexts: the state machine that tells the tokenizer how to read
//! the next token.
//!
//! Whether `/` starts a regular expression, whether `<` opens a JSX tag and
//! whether `{` opens a block or an object literal all depend on what came
//! before. After every token the parser updates a stack of contexts and the
//! `expr_allowed` flag from the kind of the token just finished and the one
//! before it.

use crate::parser::Parser;
use crate::scope::ScopeName;
use parsley_scanner::TokenKind;

/// A scanning routine that replaces the default one while its context is on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextOverride {
    Template,
    JsxOpenTag,
    JsxCloseTag,
    JsxInner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalContext {
    pub tag: &'static str,
    pub is_expr: bool,
    /// Whitespace and comments are part of the content (template text, JSX children).
    pub preserve_space: bool,
    pub override_routine: Option<ContextOverride>,
}

impl LexicalContext {
    const fn new(
        tag: &'static str,
        is_expr: bool,
        preserve_space: bool,
        override_routine: Option<ContextOverride>,
    ) -> Self {
        Self {
            tag,
            is_expr,
            preserve_space,
            override_routine,
        }
    }

    pub const BRACE_STATEMENT: LexicalContext = LexicalContext::new("{", false, false, None);
    pub const BRACE_EXPRESSION: LexicalContext = LexicalContext::new("{", true, false, None);
    pub const TEMPLATE_QUASI: LexicalContext = LexicalContext::new("${", false, false, None);
    pub const PAREN_STATEMENT: LexicalContext = LexicalContext::new("(", false, false, None);
    pub const PAREN_EXPRESSION: LexicalContext = LexicalContext::new("(", true, false, None);
    pub const TEMPLATE: LexicalContext =
        LexicalContext::new("`", true, true, Some(ContextOverride::Template));
    pub const FUNCTION_EXPRESSION: LexicalContext =
        LexicalContext::new("function", true, false, None);
    pub const FUNCTION_STATEMENT: LexicalContext =
        LexicalContext::new("function", false, false, None);
    pub const JSX_OPEN_TAG: LexicalContext =
        LexicalContext::new("<tag", false, false, Some(ContextOverride::JsxOpenTag));
    pub const JSX_CLOSE_TAG: LexicalContext =
        LexicalContext::new("</tag", false, false, Some(ContextOverride::JsxCloseTag));
    pub const JSX_CHILDREN: LexicalContext =
        LexicalContext::new("<tag>...</tag>", true, true, Some(ContextOverride::JsxInner));

    fn is_function(&self) -> bool {
        self.tag == "function"
    }

    fn is_brace(&self) -> bool {
        self.tag == "{"
    }
}

impl<'a> Parser<'a> {
    pub(crate) fn cur_context(&self) -> LexicalContext {
        self.state
            .contexts
            .last()
            .copied()
            .unwrap_or(LexicalContext::BRACE_STATEMENT)
    }

    fn pop_context(&mut self) -> Option<LexicalContext> {
        self.state.contexts.pop()
    }

    /// Drop the two contexts a `JsxTagStart` pushed, so the `<` can be
    /// reinterpreted as the start of type parameters or a type assertion.
    pub(crate) fn forget_jsx_tag_start(&mut self) {
        if self.cur_context() == LexicalContext::JSX_OPEN_TAG {
            self.state.contexts.pop();
            if self.cur_context() == LexicalContext::JSX_CHILDREN {
                self.state.contexts.pop();
            }
        }
        self.state.expr_allowed = false;
    }

    /// `function` or `class` turned out to be a property name, or a
    /// function ended without a body: drop the context the keyword pushed.
    pub(crate) fn drop_function_context(&mut self) {
        if self.cur_context().is_function() {
            self.state.contexts.pop();
        }
    }

    /// Whether a `{` following `prev` opens a block rather than an object literal.
    fn brace_is_block(&self, prev: TokenKind) -> bool {
        let parent = self.cur_context();
        if parent.is_function() {
            return true;
        }
        if prev == TokenKind::Colon && parent.is_brace() {
            return !parent.is_expr;
        }
        if prev == TokenKind::Return || (prev == TokenKind::Name && self.state.expr_allowed) {
            return self.state.line_break_before;
        }
        match prev {
            TokenKind::Else
            | TokenKind::Semi
            | TokenKind::Eof
            | TokenKind::ParenR
            | TokenKind::Arrow => true,
            TokenKind::BraceL => parent == LexicalContext::BRACE_STATEMENT,
            TokenKind::Var | TokenKind::Const | TokenKind::Name => false,
            TokenKind::Lt | TokenKind::Gt => true,
            _ => !self.state.expr_allowed,
        }
    }

    /// Update the context stack and `expr_allowed` for the token just scanned.
    pub(crate) fn update_context(&mut self, prev: TokenKind) {
        let kind = self.state.kind;

        if kind.is_keyword() && matches!(prev, TokenKind::Dot | TokenKind::QuestionDot) {
            self.state.expr_allowed = false;
            return;
        }

        let jsx = self.jsx_enabled();
        match kind {
            TokenKind::ParenR | TokenKind::BraceR => {
                if self.state.contexts.len() == 1 {
                    self.state.expr_allowed = true;
                    return;
                }
                let mut out = self.pop_context();
                if out == Some(LexicalContext::BRACE_STATEMENT) && self.cur_context().is_function() {
                    out = self.pop_context();
                }
                self.state.expr_allowed = !out.is_some_and(|ctx| ctx.is_expr);
            }

            TokenKind::Name => {
                let value = self.state.value.as_str();
                let allowed = prev != TokenKind::Dot
                    && ((value == "of"
                        && !self.state.expr_allowed
                        && !matches!(prev, TokenKind::Function | TokenKind::Class))
                        || (value == "yield" && self.state.scopes.in_scope(ScopeName::Generator)));
                self.state.expr_allowed = allowed;
            }

            TokenKind::BraceL => {
                let top = self.cur_context();
                let next = if jsx && top == LexicalContext::JSX_OPEN_TAG {
                    LexicalContext::BRACE_EXPRESSION
                } else if jsx && top == LexicalContext::JSX_CHILDREN {
                    LexicalContext::TEMPLATE_QUASI
                } else if self.brace_is_block(prev) {
                    LexicalContext::BRACE_STATEMENT
                } else {
                    LexicalContext::BRACE_EXPRESSION
                };
                self.state.contexts.push(next);
                self.state.expr_allowed = true;
            }

            TokenKind::DollarBraceL => {
                self.state.contexts.push(LexicalContext::TEMPLATE_QUASI);
                self.state.expr_allowed = true;
            }

            TokenKind::ParenL => {
                let statement_parens = matches!(
                    prev,
                    TokenKind::If | TokenKind::For | TokenKind::With | TokenKind::While
                );
                self.state.contexts.push(if statement_parens {
                    LexicalContext::PAREN_STATEMENT
                } else {
                    LexicalContext::PAREN_EXPRESSION
                });
                self.state.expr_allowed = true;
            }

            TokenKind::PlusPlus | TokenKind::MinusMinus => {}

            TokenKind::Function | TokenKind::Class => {
                let top = self.cur_context();
                let expression = prev.before_expr()
                    && prev != TokenKind::Semi
                    && prev != TokenKind::Else
                    && !(prev == TokenKind::Return && self.state.line_break_before)
                    && !(matches!(prev, TokenKind::Colon | TokenKind::BraceL)
                        && top == LexicalContext::BRACE_STATEMENT);
                self.state.contexts.push(if expression {
                    LexicalContext::FUNCTION_EXPRESSION
                } else {
                    LexicalContext::FUNCTION_STATEMENT
                });
                self.state.expr_allowed = false;
            }

            TokenKind::BackQuote => {
                if self.cur_context() == LexicalContext::TEMPLATE {
                    self.pop_context();
                } else {
                    self.state.contexts.push(LexicalContext::TEMPLATE);
                }
                self.state.expr_allowed = false;
            }

            TokenKind::JsxTagStart => {
                self.state.contexts.push(LexicalContext::JSX_CHILDREN);
                self.state.contexts.push(LexicalContext::JSX_OPEN_TAG);
                self.state.expr_allowed = false;
            }

            TokenKind::JsxTagEnd => {
                let out = self.pop_context();
                if (out == Some(LexicalContext::JSX_OPEN_TAG) && prev == TokenKind::Slash)
                    || out == Some(LexicalContext::JSX_CLOSE_TAG)
                {
                    self.pop_context();
                    self.state.expr_allowed = self.cur_context() == LexicalContext::JSX_CHILDREN;
                } else {
                    self.state.expr_allowed = true;
                }
            }

            TokenKind::Slash if jsx && prev == TokenKind::JsxTagStart => {
                self.pop_context();
                self.pop_context();
                self.state.contexts.push(LexicalContext::JSX_CLOSE_TAG);
                self.state.expr_allowed = false;
            }

            _ => self.state.expr_allowed = kind.before_expr(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_identity() {
        assert_ne!(LexicalContext::BRACE_STATEMENT, LexicalContext::BRACE_EXPRESSION);
        assert_ne!(LexicalContext::FUNCTION_STATEMENT, LexicalContext::FUNCTION_EXPRESSION);
        assert!(LexicalContext::TEMPLATE.preserve_space);
        assert!(LexicalContext::JSX_CHILDREN.preserve_space);
        assert!(!LexicalContext::JSX_OPEN_TAG.preserve_space);
        assert_eq!(
            LexicalContext::JSX_CLOSE_TAG.override_routine,
            Some(ContextOverride::JsxCloseTag)
        );
    }
}
