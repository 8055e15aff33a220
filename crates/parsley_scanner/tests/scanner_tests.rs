//! Scanner integration tests.
//!
//! Drives the scanning routines directly, without the parser's context
//! tracking, so every test picks the scan mode it needs.

use parsley_scanner::{Lexed, ScanMode, Scanner, TokenFlags, TokenKind, TokenValue};

/// Helper: scan every token of `source` in one mode.
fn scan_all_in(source: &str, mode: ScanMode) -> Vec<Lexed> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        scanner.skip_space();
        let lexed = scanner.read_token(mode);
        if lexed.kind == TokenKind::Eof {
            break;
        }
        tokens.push(lexed);
    }
    tokens
}

fn scan_all(source: &str) -> Vec<Lexed> {
    scan_all_in(source, ScanMode::default())
}

fn scan_kinds(source: &str) -> Vec<TokenKind> {
    scan_all(source).into_iter().map(|t| t.kind).collect()
}

fn first(source: &str) -> Lexed {
    let mut scanner = Scanner::new(source);
    scanner.skip_space();
    scanner.read_token(ScanMode::default())
}

fn number(source: &str) -> f64 {
    match first(source).value {
        TokenValue::Number(n) => n,
        other => panic!("expected a number, got {:?}", other),
    }
}

// ============================================================================
// Basics
// ============================================================================

#[test]
fn test_empty_source() {
    assert!(scan_all("").is_empty());
}

#[test]
fn test_whitespace_only() {
    assert!(scan_all("   \n\t \u{FEFF} \u{2028}").is_empty());
}

#[test]
fn test_spans_are_byte_offsets() {
    let tokens = scan_all("é = 'ü'");
    assert_eq!(tokens.len(), 3);
    assert_eq!((tokens[0].start, tokens[0].end), (0, 2));
    assert_eq!((tokens[1].start, tokens[1].end), (3, 4));
    assert_eq!((tokens[2].start, tokens[2].end), (5, 9));
}

// ============================================================================
// Identifiers and keywords
// ============================================================================

#[test]
fn test_identifiers() {
    let tokens = scan_all("foo _private $dollar ünïcode");
    assert_eq!(tokens.len(), 4);
    for token in &tokens {
        assert_eq!(token.kind, TokenKind::Name);
    }
    assert_eq!(tokens[3].value, TokenValue::Str("ünïcode".to_string()));
}

#[test]
fn test_keywords_and_contextual_words() {
    let kinds = scan_kinds("if else while typeof let async of type");
    assert_eq!(
        kinds,
        vec![
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::Typeof,
            TokenKind::Name,
            TokenKind::Name,
            TokenKind::Name,
            TokenKind::Name,
        ]
    );
}

#[test]
fn test_escaped_identifier() {
    let lexed = first(r"ab\u{63}");
    assert_eq!(lexed.kind, TokenKind::Name);
    assert_eq!(lexed.value, TokenValue::Str("abc".to_string()));
    assert!(lexed.flags.contains(TokenFlags::ESCAPED));
    assert!(lexed.errors.is_empty());
}

#[test]
fn test_escaped_keyword_is_reported() {
    let lexed = first(r"\u0069f");
    assert_eq!(lexed.kind, TokenKind::If);
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].message.code, 1014);
}

#[test]
fn test_invalid_identifier_escape() {
    let lexed = first(r"a\u002D");
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].message.code, 1015);
}

#[test]
fn test_private_name() {
    let lexed = first("#secret");
    assert_eq!(lexed.kind, TokenKind::PrivateName);
    assert_eq!(lexed.value, TokenValue::Str("secret".to_string()));
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_numeric_literals() {
    assert_eq!(number("42"), 42.0);
    assert_eq!(number("3.25"), 3.25);
    assert_eq!(number(".5"), 0.5);
    assert_eq!(number("1e3"), 1000.0);
    assert_eq!(number("2E-2"), 0.02);
    assert_eq!(number("0xFF"), 255.0);
    assert_eq!(number("0o17"), 15.0);
    assert_eq!(number("0b1010"), 10.0);
    assert_eq!(number("1_000_000"), 1_000_000.0);
}

#[test]
fn test_legacy_octal() {
    let lexed = first("017");
    assert_eq!(lexed.value, TokenValue::Number(15.0));
    assert!(lexed.flags.contains(TokenFlags::LEGACY_OCTAL));
    assert_eq!(lexed.special_at, Some(0));

    let decimal = first("089");
    assert_eq!(decimal.value, TokenValue::Number(89.0));
    assert!(decimal.flags.contains(TokenFlags::LEGACY_OCTAL));
}

#[test]
fn test_bigint() {
    let lexed = first("123n");
    assert_eq!(lexed.kind, TokenKind::BigInt);
    assert_eq!(lexed.value, TokenValue::BigInt("123".to_string()));

    let hex = first("0xFFn");
    assert_eq!(hex.kind, TokenKind::BigInt);
    assert!(hex.errors.is_empty());

    let float = first("1.5n");
    assert_eq!(float.errors.len(), 1);
    assert_eq!(float.errors[0].message.code, 1013);
}

#[test]
fn test_number_errors() {
    assert_eq!(first("0x").errors[0].message.code, 1010);
    assert_eq!(first("3in").errors[0].message.code, 1011);
    assert_eq!(first("1__0").errors[0].message.code, 1012);
    assert_eq!(first("1_").errors[0].message.code, 1012);
}

#[test]
fn test_member_access_on_number() {
    let kinds = scan_kinds("1..toString");
    assert_eq!(kinds, vec![TokenKind::Num, TokenKind::Dot, TokenKind::Name]);
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_literals() {
    let tokens = scan_all(r#""hello" 'world'"#);
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].value, TokenValue::Str("hello".to_string()));
    assert_eq!(tokens[1].value, TokenValue::Str("world".to_string()));
}

#[test]
fn test_string_escapes() {
    let lexed = first(r#""a\nb\x41B\u{43}\
c""#);
    assert_eq!(lexed.value, TokenValue::Str("a\nbABCc".to_string()));
    assert!(lexed.errors.is_empty());
}

#[test]
fn test_octal_escape_is_flagged() {
    let lexed = first(r#""\101""#);
    assert_eq!(lexed.value, TokenValue::Str("A".to_string()));
    assert!(lexed.flags.contains(TokenFlags::OCTAL_ESCAPE));
    assert_eq!(lexed.special_at, Some(1));

    let nul = first(r#""\0""#);
    assert!(!nul.flags.contains(TokenFlags::OCTAL_ESCAPE));
}

#[test]
fn test_unterminated_string_stops_at_line_end() {
    let tokens = scan_all("'abc\nx");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].end, 4);
    assert_eq!(tokens[0].errors.len(), 1);
    assert_eq!(tokens[0].errors[0].message.code, 1000);
    assert!(tokens[0].flags.contains(TokenFlags::UNTERMINATED));
    assert_eq!(tokens[1].kind, TokenKind::Name);
}

#[test]
fn test_invalid_escape() {
    let lexed = first(r#""\xZZ""#);
    assert_eq!(lexed.errors[0].message.code, 1006);
    let lexed = first(r#""\u{110000}""#);
    assert_eq!(lexed.errors[0].message.code, 1007);
}

// ============================================================================
// Operators and punctuation
// ============================================================================

#[test]
fn test_operators() {
    let kinds = scan_kinds("+ - * / % = == === != !== ** ++ --");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Eq,
            TokenKind::EqEq,
            TokenKind::EqEqEq,
            TokenKind::NotEq,
            TokenKind::NotEqEq,
            TokenKind::StarStar,
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
        ]
    );
}

#[test]
fn test_assignment_operators() {
    let kinds = scan_kinds("+= -= *= /= %= **= <<= >>= >>>= |= ^= &= &&= ||= ??=");
    assert!(kinds.iter().all(|k| k.is_assign()));
    assert_eq!(kinds.len(), 15);
}

#[test]
fn test_punctuation() {
    let kinds = scan_kinds("( ) { } [ ] ; , . : ? ?. ... => ` @");
    assert_eq!(
        kinds,
        vec![
            TokenKind::ParenL,
            TokenKind::ParenR,
            TokenKind::BraceL,
            TokenKind::BraceR,
            TokenKind::BracketL,
            TokenKind::BracketR,
            TokenKind::Semi,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::Colon,
            TokenKind::Question,
            TokenKind::QuestionDot,
            TokenKind::Ellipsis,
            TokenKind::Arrow,
            TokenKind::BackQuote,
            TokenKind::At,
        ]
    );
}

#[test]
fn test_shift_merging_depends_on_type_mode() {
    assert_eq!(scan_kinds(">>"), vec![TokenKind::GtGt]);
    assert_eq!(scan_kinds(">>>="), vec![TokenKind::GtGtGtEq]);

    let in_type = ScanMode {
        in_type: true,
        ..ScanMode::default()
    };
    let kinds: Vec<_> = scan_all_in(">>", in_type).into_iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Gt, TokenKind::Gt]);
    let kinds: Vec<_> = scan_all_in("<=", in_type).into_iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Lt, TokenKind::Eq]);
}

#[test]
fn test_jsx_tag_start_mode() {
    let mode = ScanMode {
        jsx_tag_start: true,
        ..ScanMode::default()
    };
    let mut scanner = Scanner::new("<div");
    assert_eq!(scanner.read_token(mode).kind, TokenKind::JsxTagStart);
    let mut scanner = Scanner::new("<!--");
    assert_eq!(scanner.read_token(mode).kind, TokenKind::Lt);
}

#[test]
fn test_placeholder_mode() {
    assert_eq!(scan_kinds("%%"), vec![TokenKind::Percent, TokenKind::Percent]);
    let mode = ScanMode {
        placeholders: true,
        ..ScanMode::default()
    };
    let kinds: Vec<_> = scan_all_in("%%x%%", mode).into_iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Placeholder, TokenKind::Name, TokenKind::Placeholder]);
}

// ============================================================================
// Regular expressions
// ============================================================================

#[test]
fn test_regex_only_when_allowed() {
    let regex_mode = ScanMode {
        regex_allowed: true,
        ..ScanMode::default()
    };
    let mut scanner = Scanner::new("/a[/]b/gi");
    let lexed = scanner.read_token(regex_mode);
    assert_eq!(lexed.kind, TokenKind::Regex);
    assert_eq!(
        lexed.value,
        TokenValue::Regex {
            pattern: "a[/]b".to_string(),
            flags: "gi".to_string()
        }
    );

    assert_eq!(first("/a/").kind, TokenKind::Slash);
}

#[test]
fn test_regex_flag_errors() {
    let regex_mode = ScanMode {
        regex_allowed: true,
        ..ScanMode::default()
    };
    let lexed = Scanner::new("/a/gg").read_token(regex_mode);
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].message.code, 1101);
    let lexed = Scanner::new("/a/x").read_token(regex_mode);
    assert_eq!(lexed.errors[0].message.code, 1102);
    let lexed = Scanner::new("/abc\n/").read_token(regex_mode);
    assert_eq!(lexed.errors[0].message.code, 1100);
}

// ============================================================================
// Templates
// ============================================================================

#[test]
fn test_template_chunks() {
    let mut scanner = Scanner::new("`a${b}c`");
    assert_eq!(scanner.read_token(ScanMode::default()).kind, TokenKind::BackQuote);
    let chunk = scanner.read_template_token();
    assert_eq!(chunk.kind, TokenKind::Template);
    assert_eq!(
        chunk.value,
        TokenValue::Template {
            cooked: Some("a".to_string()),
            raw: "a".to_string()
        }
    );
    assert_eq!(scanner.read_template_token().kind, TokenKind::DollarBraceL);
    assert_eq!(scanner.read_token(ScanMode::default()).kind, TokenKind::Name);
    assert_eq!(scanner.read_token(ScanMode::default()).kind, TokenKind::BraceR);
    assert_eq!(scanner.read_template_token().kind, TokenKind::Template);
    assert_eq!(scanner.read_template_token().kind, TokenKind::BackQuote);
}

#[test]
fn test_template_invalid_escape_is_not_an_error() {
    let mut scanner = Scanner::at("`\\unicode`", 1);
    let chunk = scanner.read_template_token();
    assert!(chunk.errors.is_empty());
    assert!(chunk.flags.contains(TokenFlags::INVALID_TEMPLATE_ESCAPE));
    assert_eq!(chunk.special_at, Some(1));
    match chunk.value {
        TokenValue::Template { cooked, raw } => {
            assert!(cooked.is_none());
            assert_eq!(raw, "\\unicode");
        }
        other => panic!("unexpected value {:?}", other),
    }
}

#[test]
fn test_template_normalizes_carriage_returns() {
    let mut scanner = Scanner::at("`a\r\nb`", 1);
    match scanner.read_template_token().value {
        TokenValue::Template { cooked, raw } => {
            assert_eq!(cooked.as_deref(), Some("a\nb"));
            assert_eq!(raw, "a\nb");
        }
        other => panic!("unexpected value {:?}", other),
    }
}

#[test]
fn test_unterminated_template() {
    let mut scanner = Scanner::at("`abc", 1);
    let chunk = scanner.read_template_token();
    assert_eq!(chunk.errors[0].message.code, 1001);
    assert!(scanner.is_eof());
}

// ============================================================================
// Comments and trivia
// ============================================================================

#[test]
fn test_comments_are_reported() {
    let mut scanner = Scanner::new("// line\n/* block */ x");
    let trivia = scanner.skip_space();
    assert!(trivia.line_break);
    assert_eq!(trivia.comments.len(), 2);
    let block = trivia.comments[1];
    assert_eq!(&scanner.text()[block.text_start..block.text_end], " block ");
    assert_eq!(scanner.read_token(ScanMode::default()).kind, TokenKind::Name);
}

#[test]
fn test_block_comment_line_break() {
    let mut scanner = Scanner::new("/* a\n b */x");
    assert!(scanner.skip_space().line_break);
    let mut scanner = Scanner::new("/* a b */x");
    assert!(!scanner.skip_space().line_break);
}

#[test]
fn test_interpreter_directive() {
    let mut scanner = Scanner::new("#!/usr/bin/env node\nx");
    let (start, end) = scanner.read_interpreter().unwrap();
    assert_eq!(&scanner.text()[start..end], "/usr/bin/env node");
    assert!(Scanner::at("a #!", 2).read_interpreter().is_none());
}

// ============================================================================
// Error recovery
// ============================================================================

#[test]
fn test_invalid_character() {
    let tokens = scan_all("a ¤ b");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1].kind, TokenKind::Invalid);
    assert_eq!(tokens[1].errors[0].message.code, 1004);
}

#[test]
fn test_lookalike_is_corrected() {
    let tokens = scan_all("a；b");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1].kind, TokenKind::Semi);
    assert_eq!(tokens[1].errors.len(), 1);
    assert_eq!(tokens[1].errors[0].message.code, 1005);
    assert_eq!(tokens[1].errors[0].args[2], ";");
}

#[test]
fn test_lookalike_quotes_form_a_string() {
    let lexed = first("\u{201C}hi\u{201D}");
    assert_eq!(lexed.kind, TokenKind::String);
    assert_eq!(lexed.value, TokenValue::Str("hi".to_string()));
}

// ============================================================================
// JSX
// ============================================================================

#[test]
fn test_jsx_text_and_entities() {
    let mut scanner = Scanner::new("a &amp; &#x41; &bogus; b<");
    let text = scanner.read_jsx_inner(true);
    assert_eq!(text.kind, TokenKind::JsxText);
    assert_eq!(text.value, TokenValue::Str("a & A &bogus; b".to_string()));
    assert_eq!(scanner.read_jsx_inner(true).kind, TokenKind::JsxTagStart);
}

#[test]
fn test_jsx_text_brace() {
    let mut scanner = Scanner::new("{x}");
    assert_eq!(scanner.read_jsx_inner(true).kind, TokenKind::BraceL);
}

#[test]
fn test_jsx_unescaped_gt() {
    let mut scanner = Scanner::new("a > b<");
    let text = scanner.read_jsx_inner(true);
    assert_eq!(text.errors.len(), 1);
    assert_eq!(text.errors[0].message.code, 1403);
}

#[test]
fn test_jsx_tag_tokens() {
    let mut scanner = Scanner::new("data-id=\"a&lt;b\">");
    let name = scanner.read_jsx_tag_token(true).unwrap();
    assert_eq!(name.kind, TokenKind::JsxName);
    assert_eq!(name.value, TokenValue::Str("data-id".to_string()));
    assert!(scanner.read_jsx_tag_token(true).is_none());
    assert_eq!(scanner.read_token(ScanMode::default()).kind, TokenKind::Eq);
    let value = scanner.read_jsx_tag_token(true).unwrap();
    assert_eq!(value.value, TokenValue::Str("a<b".to_string()));
    assert_eq!(scanner.read_jsx_tag_token(true).unwrap().kind, TokenKind::JsxTagEnd);
}
