//! Character-level scanning routines.
//!
//! A [`Scanner`] is a cursor over the source text. It knows nothing about the
//! parse: every routine scans exactly one token (or one run of trivia) from
//! the current index and reports what it found, including any lexical
//! errors, in a [`Lexed`] record. The caller decides which routine to run
//! based on its own context and owns the cursor index between calls, so a
//! scanner can be created fresh for every token.

use crate::char_codes::*;
use crate::jsx_entities;
use crate::lookalikes;
use crate::token::{TokenFlags, TokenKind, TokenValue};
use parsley_ast::CommentKind;
use parsley_diagnostics::{messages, DiagnosticMessage};

/// A lexical error at a byte range.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: &'static DiagnosticMessage,
    pub args: Vec<String>,
    pub start: usize,
    pub end: usize,
}

/// One scanned token.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexed {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub value: TokenValue,
    pub flags: TokenFlags,
    pub errors: Vec<LexError>,
    /// Where a legacy octal number, octal escape or invalid template escape begins.
    pub special_at: Option<usize>,
}

/// A comment found while skipping trivia.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedComment {
    pub kind: CommentKind,
    pub start: usize,
    pub end: usize,
    /// Range of the comment body without delimiters.
    pub text_start: usize,
    pub text_end: usize,
}

/// Whitespace and comments skipped before a token.
#[derive(Debug, Default)]
pub struct Trivia {
    pub line_break: bool,
    pub comments: Vec<ScannedComment>,
    pub errors: Vec<LexError>,
}

/// What the caller knows about the position being scanned.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanMode {
    /// `/` starts a regular expression.
    pub regex_allowed: bool,
    /// Inside a type: `<` and `>` are never merged with what follows.
    pub in_type: bool,
    /// `<` may open a JSX tag.
    pub jsx_tag_start: bool,
    /// `%%` is a placeholder delimiter.
    pub placeholders: bool,
}

enum EscapeError {
    Invalid,
    Unicode,
}

pub struct Scanner<'s> {
    text: &'s str,
    bytes: &'s [u8],
    pos: usize,
    flags: TokenFlags,
    errors: Vec<LexError>,
    special_at: Option<usize>,
}

impl<'s> Scanner<'s> {
    pub fn new(text: &'s str) -> Self {
        Self::at(text, 0)
    }

    /// A scanner positioned at byte `pos`.
    pub fn at(text: &'s str, pos: usize) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos,
            flags: TokenFlags::NONE,
            errors: Vec::new(),
            special_at: None,
        }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    #[inline]
    pub fn text(&self) -> &'s str {
        self.text
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        match self.bytes.get(self.pos) {
            Some(&b) if b < 0x80 => Some(b as char),
            Some(_) => self.text[self.pos..].chars().next(),
            None => None,
        }
    }

    #[inline]
    fn bump_char(&mut self, ch: char) {
        self.pos += ch.len_utf8();
    }

    fn error(&mut self, message: &'static DiagnosticMessage, args: &[&str], start: usize, end: usize) {
        self.errors.push(LexError {
            message,
            args: args.iter().map(|s| s.to_string()).collect(),
            start,
            end,
        });
    }

    fn finish(&mut self, kind: TokenKind, start: usize, value: TokenValue) -> Lexed {
        Lexed {
            kind,
            start,
            end: self.pos,
            value,
            flags: std::mem::take(&mut self.flags),
            errors: std::mem::take(&mut self.errors),
            special_at: self.special_at.take(),
        }
    }

    fn finish_op(&mut self, kind: TokenKind, start: usize, len: usize) -> Lexed {
        self.pos = start + len;
        self.finish(kind, start, TokenValue::None)
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    /// Skip whitespace and comments.
    pub fn skip_space(&mut self) -> Trivia {
        let mut trivia = Trivia::default();
        while let Some(b) = self.byte_at(0) {
            match b {
                b' ' | b'\t' | 0x0B | 0x0C => self.pos += 1,
                b'\n' | b'\r' => {
                    trivia.line_break = true;
                    self.pos += 1;
                }
                b'/' if self.byte_at(1) == Some(b'/') => {
                    let start = self.pos;
                    let end = self.line_end(start + 2);
                    trivia.comments.push(ScannedComment {
                        kind: CommentKind::Line,
                        start,
                        end,
                        text_start: start + 2,
                        text_end: end,
                    });
                    self.pos = end;
                }
                b'/' if self.byte_at(1) == Some(b'*') => {
                    let start = self.pos;
                    let body = start + 2;
                    let (text_end, end) = match memchr::memmem::find(&self.bytes[body..], b"*/") {
                        Some(offset) => (body + offset, body + offset + 2),
                        None => {
                            trivia.errors.push(LexError {
                                message: &messages::UNTERMINATED_COMMENT,
                                args: Vec::new(),
                                start,
                                end: self.bytes.len(),
                            });
                            (self.bytes.len(), self.bytes.len())
                        }
                    };
                    if !trivia.line_break && self.text[body..text_end].chars().any(is_line_break) {
                        trivia.line_break = true;
                    }
                    trivia.comments.push(ScannedComment {
                        kind: CommentKind::Block,
                        start,
                        end,
                        text_start: body,
                        text_end,
                    });
                    self.pos = end;
                }
                b if b >= 0x80 => match self.peek() {
                    Some(ch) if is_white_space_single_line(ch) => self.bump_char(ch),
                    Some(ch @ (LINE_SEPARATOR | PARAGRAPH_SEPARATOR)) => {
                        trivia.line_break = true;
                        self.bump_char(ch);
                    }
                    _ => break,
                },
                _ => break,
            }
        }
        trivia
    }

    /// Byte index of the next line terminator at or after `from`, or the end of text.
    fn line_end(&self, from: usize) -> usize {
        let mut at = from;
        while let Some(offset) = memchr::memchr3(b'\n', b'\r', 0xE2, &self.bytes[at..]) {
            let i = at + offset;
            if self.bytes[i] != 0xE2 {
                return i;
            }
            if self.bytes.get(i + 1) == Some(&0x80) && matches!(self.bytes.get(i + 2), Some(0xA8 | 0xA9)) {
                return i;
            }
            at = i + 1;
        }
        self.bytes.len()
    }

    /// Scan `#!...` at the very start of the text. Returns the body range.
    pub fn read_interpreter(&mut self) -> Option<(usize, usize)> {
        if self.pos != 0 || !self.text.starts_with("#!") {
            return None;
        }
        let end = self.line_end(2);
        self.pos = end;
        Some((2, end))
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    /// Scan one token in normal (non-template, non-JSX) mode.
    pub fn read_token(&mut self, mode: ScanMode) -> Lexed {
        let start = self.pos;
        let Some(ch) = self.peek() else {
            return self.finish(TokenKind::Eof, start, TokenValue::None);
        };
        match ch {
            '(' => self.finish_op(TokenKind::ParenL, start, 1),
            ')' => self.finish_op(TokenKind::ParenR, start, 1),
            ';' => self.finish_op(TokenKind::Semi, start, 1),
            ',' => self.finish_op(TokenKind::Comma, start, 1),
            '[' => self.finish_op(TokenKind::BracketL, start, 1),
            ']' => self.finish_op(TokenKind::BracketR, start, 1),
            '{' => self.finish_op(TokenKind::BraceL, start, 1),
            '}' => self.finish_op(TokenKind::BraceR, start, 1),
            ':' => self.finish_op(TokenKind::Colon, start, 1),
            '`' => self.finish_op(TokenKind::BackQuote, start, 1),
            '@' => self.finish_op(TokenKind::At, start, 1),
            '~' => self.finish_op(TokenKind::Tilde, start, 1),
            '.' => self.scan_dot(start),
            '?' => self.scan_question(start),
            '0'..='9' => self.read_number(start, false),
            '"' | '\'' => {
                self.pos += 1;
                self.read_string(start, ch, false)
            }
            '/' => {
                if mode.regex_allowed && !mode.in_type {
                    self.read_regex(start)
                } else if self.byte_at(1) == Some(b'=') {
                    self.finish_op(TokenKind::SlashEq, start, 2)
                } else {
                    self.finish_op(TokenKind::Slash, start, 1)
                }
            }
            '%' => {
                if mode.placeholders && self.byte_at(1) == Some(b'%') {
                    self.finish_op(TokenKind::Placeholder, start, 2)
                } else if self.byte_at(1) == Some(b'=') {
                    self.finish_op(TokenKind::PercentEq, start, 2)
                } else {
                    self.finish_op(TokenKind::Percent, start, 1)
                }
            }
            '<' => self.scan_less_than(start, mode),
            '>' => self.scan_greater_than(start, mode),
            '=' => self.scan_equals(start),
            '!' => self.scan_exclamation(start),
            '+' => self.scan_plus_minus(start, b'+'),
            '-' => self.scan_plus_minus(start, b'-'),
            '*' => self.scan_asterisk(start),
            '&' => self.scan_doubled(start, b'&', TokenKind::Amp, TokenKind::AmpEq, TokenKind::AmpAmp, TokenKind::AmpAmpEq),
            '|' => self.scan_doubled(start, b'|', TokenKind::Bar, TokenKind::BarEq, TokenKind::BarBar, TokenKind::BarBarEq),
            '^' => {
                if self.byte_at(1) == Some(b'=') {
                    self.finish_op(TokenKind::CaretEq, start, 2)
                } else {
                    self.finish_op(TokenKind::Caret, start, 1)
                }
            }
            '#' => self.scan_hash(start),
            '\\' => self.read_word(start),
            c if is_identifier_start(c) => self.read_word(start),
            c => self.scan_unknown(start, c),
        }
    }

    fn scan_dot(&mut self, start: usize) -> Lexed {
        match self.byte_at(1) {
            Some(b'0'..=b'9') => self.read_number(start, true),
            Some(b'.') if self.byte_at(2) == Some(b'.') => self.finish_op(TokenKind::Ellipsis, start, 3),
            _ => self.finish_op(TokenKind::Dot, start, 1),
        }
    }

    fn scan_question(&mut self, start: usize) -> Lexed {
        match self.byte_at(1) {
            // `a?.5:b` is a conditional, not an optional chain.
            Some(b'.') if !matches!(self.byte_at(2), Some(b'0'..=b'9')) => {
                self.finish_op(TokenKind::QuestionDot, start, 2)
            }
            Some(b'?') if self.byte_at(2) == Some(b'=') => {
                self.finish_op(TokenKind::QuestionQuestionEq, start, 3)
            }
            Some(b'?') => self.finish_op(TokenKind::QuestionQuestion, start, 2),
            _ => self.finish_op(TokenKind::Question, start, 1),
        }
    }

    fn scan_less_than(&mut self, start: usize, mode: ScanMode) -> Lexed {
        if mode.in_type {
            return self.finish_op(TokenKind::Lt, start, 1);
        }
        if mode.jsx_tag_start && self.byte_at(1) != Some(b'!') {
            return self.finish_op(TokenKind::JsxTagStart, start, 1);
        }
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'<'), Some(b'=')) => self.finish_op(TokenKind::LtLtEq, start, 3),
            (Some(b'<'), _) => self.finish_op(TokenKind::LtLt, start, 2),
            (Some(b'='), _) => self.finish_op(TokenKind::LtEq, start, 2),
            _ => self.finish_op(TokenKind::Lt, start, 1),
        }
    }

    fn scan_greater_than(&mut self, start: usize, mode: ScanMode) -> Lexed {
        if mode.in_type {
            return self.finish_op(TokenKind::Gt, start, 1);
        }
        match (self.byte_at(1), self.byte_at(2), self.byte_at(3)) {
            (Some(b'>'), Some(b'>'), Some(b'=')) => self.finish_op(TokenKind::GtGtGtEq, start, 4),
            (Some(b'>'), Some(b'>'), _) => self.finish_op(TokenKind::GtGtGt, start, 3),
            (Some(b'>'), Some(b'='), _) => self.finish_op(TokenKind::GtGtEq, start, 3),
            (Some(b'>'), _, _) => self.finish_op(TokenKind::GtGt, start, 2),
            (Some(b'='), _, _) => self.finish_op(TokenKind::GtEq, start, 2),
            _ => self.finish_op(TokenKind::Gt, start, 1),
        }
    }

    fn scan_equals(&mut self, start: usize) -> Lexed {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'>'), _) => self.finish_op(TokenKind::Arrow, start, 2),
            (Some(b'='), Some(b'=')) => self.finish_op(TokenKind::EqEqEq, start, 3),
            (Some(b'='), _) => self.finish_op(TokenKind::EqEq, start, 2),
            _ => self.finish_op(TokenKind::Eq, start, 1),
        }
    }

    fn scan_exclamation(&mut self, start: usize) -> Lexed {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'='), Some(b'=')) => self.finish_op(TokenKind::NotEqEq, start, 3),
            (Some(b'='), _) => self.finish_op(TokenKind::NotEq, start, 2),
            _ => self.finish_op(TokenKind::Bang, start, 1),
        }
    }

    fn scan_plus_minus(&mut self, start: usize, op: u8) -> Lexed {
        let (single, assign, double) = if op == b'+' {
            (TokenKind::Plus, TokenKind::PlusEq, TokenKind::PlusPlus)
        } else {
            (TokenKind::Minus, TokenKind::MinusEq, TokenKind::MinusMinus)
        };
        match self.byte_at(1) {
            Some(b) if b == op => self.finish_op(double, start, 2),
            Some(b'=') => self.finish_op(assign, start, 2),
            _ => self.finish_op(single, start, 1),
        }
    }

    fn scan_asterisk(&mut self, start: usize) -> Lexed {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'*'), Some(b'=')) => self.finish_op(TokenKind::StarStarEq, start, 3),
            (Some(b'*'), _) => self.finish_op(TokenKind::StarStar, start, 2),
            (Some(b'='), _) => self.finish_op(TokenKind::StarEq, start, 2),
            _ => self.finish_op(TokenKind::Star, start, 1),
        }
    }

    /// `&`, `&=`, `&&`, `&&=` and the `|` family.
    fn scan_doubled(
        &mut self,
        start: usize,
        op: u8,
        single: TokenKind,
        assign: TokenKind,
        double: TokenKind,
        double_assign: TokenKind,
    ) -> Lexed {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b), Some(b'=')) if b == op => self.finish_op(double_assign, start, 3),
            (Some(b), _) if b == op => self.finish_op(double, start, 2),
            (Some(b'='), _) => self.finish_op(assign, start, 2),
            _ => self.finish_op(single, start, 1),
        }
    }

    fn scan_hash(&mut self, start: usize) -> Lexed {
        self.pos += 1;
        match self.peek() {
            Some(c) if is_identifier_start(c) || c == '\\' => {
                let (name, _) = self.read_word_chars();
                self.finish(TokenKind::PrivateName, start, TokenValue::Str(name))
            }
            _ => {
                self.error(&messages::INVALID_CHARACTER, &["#"], start, self.pos);
                self.finish(TokenKind::Invalid, start, TokenValue::None)
            }
        }
    }

    fn scan_unknown(&mut self, start: usize, ch: char) -> Lexed {
        self.bump_char(ch);
        let Some(entry) = lookalikes::lookup(ch) else {
            let text = ch.to_string();
            self.error(&messages::INVALID_CHARACTER, &[&text], start, self.pos);
            return self.finish(TokenKind::Invalid, start, TokenValue::None);
        };
        let found = ch.to_string();
        let ascii = entry.ascii.to_string();
        self.error(
            &messages::UNICODE_LOOKALIKE,
            &[&found, entry.name, &ascii, entry.ascii_name],
            start,
            self.pos,
        );
        let kind = match entry.ascii {
            '"' | '\'' => return self.read_string(start, entry.ascii, true),
            ';' => TokenKind::Semi,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '(' => TokenKind::ParenL,
            ')' => TokenKind::ParenR,
            '[' => TokenKind::BracketL,
            ']' => TokenKind::BracketR,
            '{' => TokenKind::BraceL,
            '}' => TokenKind::BraceR,
            '.' => TokenKind::Dot,
            '?' => TokenKind::Question,
            '!' => TokenKind::Bang,
            '=' => TokenKind::Eq,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '&' => TokenKind::Amp,
            '|' => TokenKind::Bar,
            '%' => TokenKind::Percent,
            '^' => TokenKind::Caret,
            '~' => TokenKind::Tilde,
            _ => TokenKind::Invalid,
        };
        self.finish(kind, start, TokenValue::None)
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    fn read_word(&mut self, start: usize) -> Lexed {
        let (word, escaped) = self.read_word_chars();
        if let Some(keyword) = TokenKind::keyword(&word) {
            if escaped {
                self.error(&messages::ESCAPED_KEYWORD, &[], start, self.pos);
            }
            return self.finish(keyword, start, TokenValue::Str(word));
        }
        if escaped {
            self.flags |= TokenFlags::ESCAPED;
        }
        self.finish(TokenKind::Name, start, TokenValue::Str(word))
    }

    /// Read identifier characters, decoding `\u` escapes. Returns the name and
    /// whether any escape was used.
    fn read_word_chars(&mut self) -> (String, bool) {
        let chunk_start = self.pos;
        let mut word = String::new();
        let mut chunk = chunk_start;
        let mut escaped = false;
        let mut first = true;
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                escaped = true;
                word.push_str(&self.text[chunk..self.pos]);
                let esc_start = self.pos;
                self.pos += 1;
                let decoded = if self.byte_at(0) == Some(b'u') {
                    self.pos += 1;
                    self.read_unicode_escape()
                } else {
                    None
                };
                match decoded {
                    Some(c) if (first && is_identifier_start(c)) || (!first && is_identifier_part(c)) => {
                        word.push(c)
                    }
                    Some(_) => {
                        self.error(&messages::INVALID_IDENTIFIER_ESCAPE, &[], esc_start, self.pos)
                    }
                    None => self.error(&messages::INVALID_UNICODE_ESCAPE, &[], esc_start, self.pos),
                }
                chunk = self.pos;
            } else if is_identifier_part(ch) {
                self.bump_char(ch);
            } else {
                break;
            }
            first = false;
        }
        word.push_str(&self.text[chunk..self.pos]);
        (word, escaped)
    }

    /// Read the part of a `\u` escape after the `u`.
    fn read_unicode_escape(&mut self) -> Option<char> {
        let code = self.read_code_point()?;
        if (0xD800..0xDC00).contains(&code) && self.text[self.pos..].starts_with("\\u") {
            let save = self.pos;
            self.pos += 2;
            match self.read_code_point() {
                Some(low) if (0xDC00..0xE000).contains(&low) => {
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(combined);
                }
                _ => self.pos = save,
            }
        }
        Some(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn read_code_point(&mut self) -> Option<u32> {
        if self.byte_at(0) == Some(b'{') {
            self.pos += 1;
            let digits_start = self.pos;
            while matches!(self.byte_at(0), Some(b) if b.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            let digits = &self.text[digits_start..self.pos];
            if digits.is_empty() || self.byte_at(0) != Some(b'}') {
                return None;
            }
            self.pos += 1;
            let code = u32::from_str_radix(digits, 16).ok()?;
            (code <= 0x10FFFF).then_some(code)
        } else {
            self.read_hex(4)
        }
    }

    fn read_hex(&mut self, len: usize) -> Option<u32> {
        let digits = self.text.get(self.pos..self.pos + len)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        self.pos += len;
        u32::from_str_radix(digits, 16).ok()
    }

    // ========================================================================
    // Numbers
    // ========================================================================

    /// Read digits of `radix`, allowing `_` separators between digits.
    /// Returns the number of digits read.
    fn read_int(&mut self, radix: u32, allow_separators: bool) -> usize {
        let mut count = 0;
        let mut prev_separator = false;
        while let Some(b) = self.byte_at(0) {
            if b == b'_' {
                if !allow_separators || count == 0 || prev_separator {
                    self.error(&messages::INVALID_NUMERIC_SEPARATOR, &[], self.pos, self.pos + 1);
                }
                prev_separator = true;
                self.pos += 1;
                continue;
            }
            if (b as char).to_digit(radix).is_none() {
                break;
            }
            count += 1;
            prev_separator = false;
            self.pos += 1;
        }
        if prev_separator {
            self.error(&messages::INVALID_NUMERIC_SEPARATOR, &[], self.pos - 1, self.pos);
        }
        count
    }

    fn read_number(&mut self, start: usize, starts_with_dot: bool) -> Lexed {
        if !starts_with_dot && self.byte_at(0) == Some(b'0') {
            let radix = match self.byte_at(1) {
                Some(b'x' | b'X') => Some(16),
                Some(b'o' | b'O') => Some(8),
                Some(b'b' | b'B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                return self.read_radix_number(start, radix);
            }
            if matches!(self.byte_at(1), Some(b'0'..=b'9' | b'_')) {
                return self.read_legacy_octal(start);
            }
        }

        let mut is_float = false;
        if !starts_with_dot {
            self.read_int(10, true);
        }
        if self.byte_at(0) == Some(b'.') {
            is_float = true;
            self.pos += 1;
            if self.byte_at(0) == Some(b'_') {
                self.error(&messages::INVALID_NUMERIC_SEPARATOR, &[], self.pos, self.pos + 1);
            }
            self.read_int(10, true);
        }
        if matches!(self.byte_at(0), Some(b'e' | b'E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.byte_at(0), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.read_int(10, true) == 0 {
                self.error(&messages::EXPECTED_NUMBER_IN_RADIX, &["10"], start, self.pos);
            }
        }
        if self.byte_at(0) == Some(b'n') {
            if is_float {
                self.error(&messages::INVALID_BIGINT, &[], start, self.pos + 1);
            }
            let digits: String = self.text[start..self.pos].chars().filter(|c| *c != '_').collect();
            self.pos += 1;
            self.check_after_number();
            return self.finish(TokenKind::BigInt, start, TokenValue::BigInt(digits));
        }
        let cleaned: String = self.text[start..self.pos].chars().filter(|c| *c != '_').collect();
        let value = cleaned.parse::<f64>().unwrap_or(f64::NAN);
        self.check_after_number();
        self.finish(TokenKind::Num, start, TokenValue::Number(value))
    }

    fn read_radix_number(&mut self, start: usize, radix: u32) -> Lexed {
        self.pos += 2;
        let digits_start = self.pos;
        if self.read_int(radix, true) == 0 {
            let radix_text = radix.to_string();
            self.error(&messages::EXPECTED_NUMBER_IN_RADIX, &[&radix_text], start, self.pos);
        }
        let digits = &self.text[digits_start..self.pos];
        if self.byte_at(0) == Some(b'n') {
            let value: String = self.text[start..self.pos].chars().filter(|c| *c != '_').collect();
            self.pos += 1;
            self.check_after_number();
            return self.finish(TokenKind::BigInt, start, TokenValue::BigInt(value));
        }
        let value = digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0f64, |acc, d| acc * radix as f64 + d as f64);
        self.check_after_number();
        self.finish(TokenKind::Num, start, TokenValue::Number(value))
    }

    /// `017` (octal) and `089` (decimal with a leading zero).
    fn read_legacy_octal(&mut self, start: usize) -> Lexed {
        self.flags |= TokenFlags::LEGACY_OCTAL;
        self.special_at = Some(start);
        self.read_int(10, false);
        let digits = &self.text[start..self.pos];
        let is_octal = digits.bytes().all(|b| (b'0'..=b'7').contains(&b));
        let mut value = if is_octal {
            digits.bytes().fold(0f64, |acc, b| acc * 8.0 + (b - b'0') as f64)
        } else {
            digits.parse::<f64>().unwrap_or(f64::NAN)
        };
        if !is_octal && matches!(self.byte_at(0), Some(b'.' | b'e' | b'E')) {
            if self.byte_at(0) == Some(b'.') {
                self.pos += 1;
                self.read_int(10, false);
            }
            if matches!(self.byte_at(0), Some(b'e' | b'E')) {
                self.pos += 1;
                if matches!(self.byte_at(0), Some(b'+' | b'-')) {
                    self.pos += 1;
                }
                self.read_int(10, false);
            }
            value = self.text[start..self.pos].parse::<f64>().unwrap_or(f64::NAN);
        }
        if self.byte_at(0) == Some(b'n') {
            self.error(&messages::INVALID_BIGINT, &[], start, self.pos + 1);
            self.pos += 1;
        }
        self.check_after_number();
        self.finish(TokenKind::Num, start, TokenValue::Number(value))
    }

    fn check_after_number(&mut self) {
        if let Some(ch) = self.peek() {
            if is_identifier_start(ch) || ch == '\\' {
                let at = self.pos;
                self.error(&messages::IDENTIFIER_AFTER_NUMBER, &[], at, at + ch.len_utf8());
            }
        }
    }

    // ========================================================================
    // Strings and escapes
    // ========================================================================

    /// Read a string body; the opening quote is already consumed.
    fn read_string(&mut self, start: usize, quote: char, lookalike_open: bool) -> Lexed {
        let mut out = String::new();
        let mut chunk = self.pos;
        loop {
            let Some(ch) = self.peek() else {
                self.flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_STRING, &[], start, self.pos);
                out.push_str(&self.text[chunk..self.pos]);
                break;
            };
            if ch == quote || (lookalike_open && lookalikes::is_quote_like(ch, quote)) {
                out.push_str(&self.text[chunk..self.pos]);
                self.bump_char(ch);
                break;
            }
            match ch {
                '\\' => {
                    out.push_str(&self.text[chunk..self.pos]);
                    let esc_start = self.pos;
                    self.pos += 1;
                    match self.read_escape(esc_start, false) {
                        Ok(Some(c)) => out.push(c),
                        Ok(None) => {}
                        Err(EscapeError::Unicode) => {
                            self.error(&messages::INVALID_UNICODE_ESCAPE, &[], esc_start, self.pos)
                        }
                        Err(EscapeError::Invalid) => {
                            self.error(&messages::INVALID_ESCAPE, &[], esc_start, self.pos)
                        }
                    }
                    chunk = self.pos;
                }
                '\n' | '\r' => {
                    self.flags |= TokenFlags::UNTERMINATED;
                    self.error(&messages::UNTERMINATED_STRING, &[], start, self.pos);
                    out.push_str(&self.text[chunk..self.pos]);
                    break;
                }
                _ => self.bump_char(ch),
            }
        }
        self.finish(TokenKind::String, start, TokenValue::Str(out))
    }

    /// Decode one escape after its backslash. `Ok(None)` is a line continuation.
    fn read_escape(&mut self, esc_start: usize, in_template: bool) -> Result<Option<char>, EscapeError> {
        let Some(ch) = self.peek() else {
            return Err(EscapeError::Invalid);
        };
        self.bump_char(ch);
        let decoded = match ch {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{C}',
            'v' => '\u{B}',
            '\r' => {
                if self.byte_at(0) == Some(b'\n') {
                    self.pos += 1;
                }
                return Ok(None);
            }
            '\n' | LINE_SEPARATOR | PARAGRAPH_SEPARATOR => return Ok(None),
            'x' => match self.read_hex(2) {
                Some(code) => char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER),
                None => return Err(EscapeError::Invalid),
            },
            'u' => match self.read_unicode_escape() {
                Some(c) => c,
                None => return Err(EscapeError::Unicode),
            },
            '0' if !matches!(self.byte_at(0), Some(b'0'..=b'9')) => '\0',
            '0'..='7' => {
                if in_template {
                    return Err(EscapeError::Invalid);
                }
                self.flags |= TokenFlags::OCTAL_ESCAPE;
                self.special_at.get_or_insert(esc_start);
                let mut value = ch.to_digit(8).unwrap_or(0);
                let max_len = if ch <= '3' { 2 } else { 1 };
                for _ in 0..max_len {
                    match self.byte_at(0) {
                        Some(b @ b'0'..=b'7') => {
                            value = value * 8 + (b - b'0') as u32;
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
            }
            '8' | '9' => {
                if in_template {
                    return Err(EscapeError::Invalid);
                }
                self.flags |= TokenFlags::OCTAL_ESCAPE;
                self.special_at.get_or_insert(esc_start);
                ch
            }
            other => other,
        };
        Ok(Some(decoded))
    }

    // ========================================================================
    // Templates
    // ========================================================================

    /// Scan inside a template: the closing backquote, `${`, or a text chunk.
    pub fn read_template_token(&mut self) -> Lexed {
        let start = self.pos;
        match (self.byte_at(0), self.byte_at(1)) {
            (None, _) => {
                self.error(&messages::UNTERMINATED_TEMPLATE, &[], start, start);
                return self.finish(TokenKind::Eof, start, TokenValue::None);
            }
            (Some(b'`'), _) => return self.finish_op(TokenKind::BackQuote, start, 1),
            (Some(b'$'), Some(b'{')) => return self.finish_op(TokenKind::DollarBraceL, start, 2),
            _ => {}
        }

        let mut cooked = Some(String::new());
        let mut raw = String::new();
        let mut chunk = self.pos;
        loop {
            let Some(ch) = self.peek() else {
                self.flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_TEMPLATE, &[], start, self.pos);
                break;
            };
            if ch == '`' || (ch == '$' && self.byte_at(1) == Some(b'{')) {
                break;
            }
            match ch {
                '\\' => {
                    let esc_start = self.pos;
                    let text = &self.text[chunk..esc_start];
                    raw.push_str(text);
                    if let Some(c) = cooked.as_mut() {
                        c.push_str(text);
                    }
                    self.pos += 1;
                    let result = self.read_escape(esc_start, true);
                    raw.push_str(&normalize_newlines(&self.text[esc_start..self.pos]));
                    match result {
                        Ok(Some(decoded)) => {
                            if let Some(c) = cooked.as_mut() {
                                c.push(decoded);
                            }
                        }
                        Ok(None) => {}
                        Err(_) => {
                            cooked = None;
                            self.flags |= TokenFlags::INVALID_TEMPLATE_ESCAPE;
                            self.special_at.get_or_insert(esc_start);
                        }
                    }
                    chunk = self.pos;
                }
                '\r' => {
                    let text = &self.text[chunk..self.pos];
                    raw.push_str(text);
                    raw.push('\n');
                    if let Some(c) = cooked.as_mut() {
                        c.push_str(text);
                        c.push('\n');
                    }
                    self.pos += 1;
                    if self.byte_at(0) == Some(b'\n') {
                        self.pos += 1;
                    }
                    chunk = self.pos;
                }
                _ => self.bump_char(ch),
            }
        }
        let text = &self.text[chunk..self.pos];
        raw.push_str(text);
        if let Some(c) = cooked.as_mut() {
            c.push_str(text);
        }
        self.finish(TokenKind::Template, start, TokenValue::Template { cooked, raw })
    }

    // ========================================================================
    // Regular expressions
    // ========================================================================

    fn read_regex(&mut self, start: usize) -> Lexed {
        self.pos += 1;
        let body_start = self.pos;
        let mut escaped = false;
        let mut in_class = false;
        let body_end = loop {
            let Some(ch) = self.peek() else {
                self.error(&messages::UNTERMINATED_REGEX, &[], start, self.pos);
                break self.pos;
            };
            if is_line_break(ch) {
                self.error(&messages::UNTERMINATED_REGEX, &[], start, self.pos);
                break self.pos;
            }
            if escaped {
                escaped = false;
            } else {
                match ch {
                    '[' => in_class = true,
                    ']' if in_class => in_class = false,
                    '/' if !in_class => {
                        let end = self.pos;
                        self.pos += 1;
                        break end;
                    }
                    _ => {}
                }
                escaped = ch == '\\';
            }
            self.bump_char(ch);
        };
        let pattern = self.text[body_start..body_end].to_string();

        let mut flags = String::new();
        while let Some(ch) = self.peek() {
            if !is_identifier_part(ch) {
                break;
            }
            let at = self.pos;
            self.bump_char(ch);
            let text = ch.to_string();
            if !"dgimsuyv".contains(ch) {
                self.error(&messages::INVALID_REGEX_FLAG, &[&text], at, self.pos);
            } else if flags.contains(ch) {
                self.error(&messages::DUPLICATE_REGEX_FLAG, &[&text], at, self.pos);
            }
            flags.push(ch);
        }
        self.finish(TokenKind::Regex, start, TokenValue::Regex { pattern, flags })
    }

    // ========================================================================
    // JSX
    // ========================================================================

    /// Scan between JSX tags: text, `{`, or `<`.
    pub fn read_jsx_inner(&mut self, tag_start_allowed: bool) -> Lexed {
        let start = self.pos;
        let mut out = String::new();
        let mut chunk = start;
        loop {
            let Some(ch) = self.peek() else {
                self.error(&messages::UNTERMINATED_JSX_CONTENTS, &[], start, self.pos);
                if self.pos == start {
                    return self.finish(TokenKind::Eof, start, TokenValue::None);
                }
                out.push_str(&self.text[chunk..self.pos]);
                return self.finish(TokenKind::JsxText, start, TokenValue::Str(out));
            };
            match ch {
                '<' | '{' => {
                    if self.pos == start {
                        if ch == '<' && tag_start_allowed {
                            return self.finish_op(TokenKind::JsxTagStart, start, 1);
                        }
                        return self.read_token(ScanMode::default());
                    }
                    out.push_str(&self.text[chunk..self.pos]);
                    return self.finish(TokenKind::JsxText, start, TokenValue::Str(out));
                }
                '&' => {
                    out.push_str(&self.text[chunk..self.pos]);
                    out.push(self.read_jsx_entity());
                    chunk = self.pos;
                }
                '>' | '}' => {
                    let found = ch.to_string();
                    let suggestion = format!("{{'{}'}}", ch);
                    self.error(&messages::JSX_UNESCAPED_TEXT, &[&found, &suggestion], self.pos, self.pos + 1);
                    self.pos += 1;
                }
                _ => self.bump_char(ch),
            }
        }
    }

    /// Decode `&name;` at the cursor, or consume a lone `&`.
    fn read_jsx_entity(&mut self) -> char {
        let start = self.pos;
        let limit = (start + 2 + jsx_entities::MAX_ENTITY_LEN).min(self.bytes.len());
        if let Some(offset) = memchr::memchr(b';', &self.bytes[start + 1..limit]) {
            let body_end = start + 1 + offset;
            if let Some(decoded) = self.text.get(start + 1..body_end).and_then(jsx_entities::decode) {
                self.pos = body_end + 1;
                return decoded;
            }
        }
        self.pos += 1;
        '&'
    }

    /// Scan inside a JSX tag. Returns `None` when the character is handled by
    /// normal scanning (`=`, `/`, `{`, `.`, `:`, ...).
    pub fn read_jsx_tag_token(&mut self, allow_string: bool) -> Option<Lexed> {
        let start = self.pos;
        let ch = self.peek()?;
        if is_identifier_start(ch) {
            while let Some(c) = self.peek() {
                if is_identifier_part(c) || c == '-' {
                    self.bump_char(c);
                } else {
                    break;
                }
            }
            let name = self.text[start..self.pos].to_string();
            return Some(self.finish(TokenKind::JsxName, start, TokenValue::Str(name)));
        }
        match ch {
            '>' => Some(self.finish_op(TokenKind::JsxTagEnd, start, 1)),
            '"' | '\'' if allow_string => Some(self.read_jsx_string(start, ch)),
            _ => None,
        }
    }

    /// Attribute strings: no escapes, entities decoded, newlines allowed.
    fn read_jsx_string(&mut self, start: usize, quote: char) -> Lexed {
        self.pos += 1;
        let mut out = String::new();
        let mut chunk = self.pos;
        loop {
            let Some(ch) = self.peek() else {
                self.flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_STRING, &[], start, self.pos);
                out.push_str(&self.text[chunk..self.pos]);
                break;
            };
            if ch == quote {
                out.push_str(&self.text[chunk..self.pos]);
                self.pos += 1;
                break;
            }
            if ch == '&' {
                out.push_str(&self.text[chunk..self.pos]);
                out.push(self.read_jsx_entity());
                chunk = self.pos;
            } else {
                self.bump_char(ch);
            }
        }
        self.finish(TokenKind::String, start, TokenValue::Str(out))
    }
}

fn normalize_newlines(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(text: &str, mode: ScanMode) -> Lexed {
        let mut scanner = Scanner::new(text);
        scanner.skip_space();
        scanner.read_token(mode)
    }

    #[test]
    fn test_escaped_surrogate_pair() {
        let lexed = lex(r#""\uD83D\uDE00""#, ScanMode::default());
        assert_eq!(lexed.value, TokenValue::Str("😀".to_string()));
        assert!(lexed.errors.is_empty());
    }

    #[test]
    fn test_line_comment_stops_at_line_separator() {
        let mut scanner = Scanner::new("// a\u{2028}b");
        let trivia = scanner.skip_space();
        assert_eq!(trivia.comments.len(), 1);
        assert!(trivia.line_break);
        assert_eq!(&scanner.text()[scanner.pos()..], "b");
    }

    #[test]
    fn test_unterminated_block_comment() {
        let mut scanner = Scanner::new("/* open");
        let trivia = scanner.skip_space();
        assert_eq!(trivia.errors.len(), 1);
        assert!(scanner.is_eof());
    }

    #[test]
    fn test_optional_chain_before_digit() {
        let lexed = lex("?.5", ScanMode::default());
        assert_eq!(lexed.kind, TokenKind::Question);
    }
}
