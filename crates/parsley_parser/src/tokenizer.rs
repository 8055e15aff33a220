//! The tokenizer driver.
//!
//! Picks the scanning routine the top lexical context asks for, turns the
//! scanner's byte offsets into positions, reports lexical errors through the
//! budgeted diagnostic path and installs the result as the current token.

use crate::context::ContextOverride;
use crate::error::InternalError;
use crate::finalize::CommentRef;
use crate::parser::Parser;
use crate::speculation::PResult;
use parsley_ast::{Comment, CommentId, SourceType};
use parsley_core::SourceSpan;
use parsley_diagnostics::{messages, DiagnosticMessage};
use parsley_scanner::{
    LexError, Lexed, ScanMode, ScannedComment, Scanner, Token, TokenFlags, TokenKind,
};

/// Lexical errors after which the token stream no longer matches the text.
fn corrupts_tree(message: &DiagnosticMessage) -> bool {
    [
        &messages::UNTERMINATED_STRING,
        &messages::UNTERMINATED_TEMPLATE,
        &messages::UNTERMINATED_COMMENT,
        &messages::UNTERMINATED_JSX_CONTENTS,
        &messages::UNTERMINATED_REGEX,
        &messages::INVALID_CHARACTER,
    ]
    .iter()
    .any(|m| m.code == message.code)
}

impl<'a> Parser<'a> {
    /// Consume the current token and scan the next one.
    pub(crate) fn next(&mut self) -> PResult<()> {
        if self.capture_tokens && !self.state.is_lookahead && self.state.kind != TokenKind::Eof {
            self.capture_token()?;
        }
        self.state.last_kind = self.state.kind;
        self.state.last_start = self.state.start;
        self.state.last_end = self.state.end;
        self.next_token()
    }

    fn capture_token(&mut self) -> PResult<()> {
        let span = self.state.span();
        if let Some(previous) = self.state.tokens.last() {
            if span.start.index < previous.span.end.index {
                return Err(InternalError::TokenOutOfOrder {
                    start: span.start.index,
                    previous_end: previous.span.end.index,
                }
                .into());
            }
        }
        self.state.tokens.push(Token::new(self.state.kind, span));
        Ok(())
    }

    /// Scan the token at the current index into the live state.
    pub(crate) fn next_token(&mut self) -> PResult<()> {
        let context = self.cur_context();
        let mut scanner = Scanner::at(self.text, self.state.index);
        self.state.line_break_before = false;
        if !context.preserve_space {
            let trivia = scanner.skip_space();
            self.state.line_break_before = trivia.line_break;
            for comment in &trivia.comments {
                self.push_comment(comment);
            }
            for error in trivia.errors {
                self.lex_error(error)?;
            }
        }

        let lexed = match context.override_routine {
            Some(ContextOverride::Template) => scanner.read_template_token(),
            Some(ContextOverride::JsxInner) => scanner.read_jsx_inner(self.state.expr_allowed),
            Some(routine @ (ContextOverride::JsxOpenTag | ContextOverride::JsxCloseTag)) => {
                let allow_string = routine == ContextOverride::JsxOpenTag;
                match scanner.read_jsx_tag_token(allow_string) {
                    Some(lexed) => lexed,
                    None => scanner.read_token(self.scan_mode()),
                }
            }
            None => scanner.read_token(self.scan_mode()),
        };
        self.install_token(lexed)
    }

    fn scan_mode(&self) -> ScanMode {
        let in_type = self.in_type();
        ScanMode {
            regex_allowed: self.state.expr_allowed,
            in_type,
            jsx_tag_start: self.jsx_enabled() && self.state.expr_allowed && !in_type,
            placeholders: self.source_type == SourceType::Template,
        }
    }

    fn install_token(&mut self, lexed: Lexed) -> PResult<()> {
        let Lexed {
            kind,
            start,
            end,
            value,
            flags,
            errors,
            special_at,
        } = lexed;
        for error in errors {
            self.lex_error(error)?;
        }

        self.state.index = end;
        self.state.kind = kind;
        self.state.value = value;
        self.state.flags = flags;
        self.state.special_at = special_at;
        self.state.start = self.position(start);
        self.state.end = self.position(end);

        if flags.contains(TokenFlags::INVALID_TEMPLATE_ESCAPE) {
            self.state.invalid_template_escape_at = special_at.map(|at| self.position(at));
        }
        if flags.intersects(TokenFlags::LEGACY_OCTAL | TokenFlags::OCTAL_ESCAPE) && self.is_strict() {
            let at = self.position(special_at.unwrap_or(start));
            let span = SourceSpan::new(at, self.state.end);
            let message = if flags.contains(TokenFlags::LEGACY_OCTAL) {
                &messages::LEGACY_OCTAL_IN_STRICT
            } else {
                &messages::OCTAL_ESCAPE_IN_STRICT
            };
            self.report(message, &[], span)?;
        }

        let prev = self.state.last_kind;
        self.update_context(prev);
        Ok(())
    }

    /// A `>` scanned while a type was being read may really be the start of
    /// `>>`, `>=` or `>>>=`. Scan it again now that the type has ended.
    pub(crate) fn rescan_gt(&mut self) -> PResult<()> {
        if self.state.kind != TokenKind::Gt || self.in_type() {
            return Ok(());
        }
        let mut scanner = Scanner::at(self.text, self.state.start.index as usize);
        let lexed = scanner.read_token(ScanMode::default());
        if lexed.kind == TokenKind::Gt {
            return Ok(());
        }
        self.install_token(lexed)
    }

    /// The current `/` or `/=` starts a regular expression the context
    /// tracking did not anticipate. Scan it again as one.
    pub(crate) fn rescan_regex(&mut self) -> PResult<()> {
        if !matches!(self.state.kind, TokenKind::Slash | TokenKind::SlashEq) {
            return Ok(());
        }
        let mut scanner = Scanner::at(self.text, self.state.start.index as usize);
        let mode = ScanMode {
            regex_allowed: true,
            ..ScanMode::default()
        };
        let lexed = scanner.read_token(mode);
        self.install_token(lexed)
    }

    fn lex_error(&mut self, error: LexError) -> PResult<()> {
        let span = SourceSpan::new(self.position(error.start), self.position(error.end));
        let args: Vec<&str> = error.args.iter().map(String::as_str).collect();
        self.emit(error.message, &args, span, corrupts_tree(error.message))
    }

    fn push_comment(&mut self, scanned: &ScannedComment) {
        let id = CommentId::new(self.state.comments.len() as u32);
        let span = SourceSpan::new(self.position(scanned.start), self.position(scanned.end));
        let text = self.slice(scanned.text_start as u32, scanned.text_end as u32);
        self.state.comments.push(Comment {
            id,
            kind: scanned.kind,
            text: text.to_string(),
            span,
        });
        self.add_comment(CommentRef {
            id,
            start: scanned.start as u32,
            end: scanned.end as u32,
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::options::ParseOptions;
    use crate::parser::Parser;
    use bumpalo::Bump;
    use parsley_ast::Syntax;
    use parsley_scanner::TokenKind;

    fn kinds(options: ParseOptions) -> Vec<TokenKind> {
        let arena = Bump::new();
        let mut parser = Parser::new(&arena, &options);
        let mut out = Vec::new();
        parser.next().unwrap();
        while parser.state.kind != TokenKind::Eof {
            out.push(parser.state.kind);
            parser.next().unwrap();
        }
        out
    }

    #[test]
    fn test_regex_after_operator_division_after_name() {
        use TokenKind::*;
        assert_eq!(kinds(ParseOptions::new("a / b")), vec![Name, Slash, Name]);
        assert_eq!(kinds(ParseOptions::new("x = /b/g")), vec![Name, Eq, Regex]);
        assert_eq!(kinds(ParseOptions::new("(a) / 2")), vec![ParenL, Name, ParenR, Slash, Num]);
    }

    #[test]
    fn test_template_chunks() {
        use TokenKind::*;
        assert_eq!(
            kinds(ParseOptions::new("`a${b}c`")),
            vec![BackQuote, Template, DollarBraceL, Name, BraceR, Template, BackQuote]
        );
    }

    #[test]
    fn test_jsx_tag_start_only_with_jsx() {
        use TokenKind::*;
        let plain = kinds(ParseOptions::new("x = <a/>"));
        assert_eq!(plain[2], Lt);
        let jsx = kinds(ParseOptions::new("x = <a/>").with_syntax([Syntax::Jsx]));
        assert_eq!(jsx, vec![Name, Eq, JsxTagStart, JsxName, Slash, JsxTagEnd]);
    }

    #[test]
    fn test_jsx_children_text() {
        use TokenKind::*;
        let jsx = kinds(ParseOptions::new("<a> hi {x}</a>").with_syntax([Syntax::Jsx]));
        assert_eq!(
            jsx,
            vec![
                JsxTagStart, JsxName, JsxTagEnd, JsxText, BraceL, Name, BraceR, JsxTagStart, Slash,
                JsxName, JsxTagEnd
            ]
        );
    }

    #[test]
    fn test_comments_collected_and_line_breaks() {
        let arena = Bump::new();
        let options = ParseOptions::new("a // one\n/* two */ b");
        let mut parser = Parser::new(&arena, &options);
        parser.next().unwrap();
        parser.next().unwrap();
        assert!(parser.state.line_break_before);
        assert_eq!(parser.state.comments.len(), 2);
        let texts: Vec<String> = parser.state.comments.to_vec().into_iter().map(|c| c.text).collect();
        assert_eq!(texts, vec![" one".to_string(), " two ".to_string()]);
    }

    #[test]
    fn test_unterminated_string_marks_corrupt() {
        let arena = Bump::new();
        let options = ParseOptions::new("'abc");
        let mut parser = Parser::new(&arena, &options);
        parser.next().unwrap();
        assert_eq!(parser.state.diagnostics.len(), 1);
        assert!(parser.state.corrupt);
    }
}
