//! Parser integration tests.
//!
//! Drives the public `parse` and `tokenize` entry points over whole programs.

use parsley_ast::{
    ClassMember, Expression, MethodKind, SourceType, Statement, Syntax, SyntaxSet,
};
use parsley_core::AstArena;
use parsley_diagnostics::messages;
use parsley_parser::{parse, tokenize, ParseOptions, Root};

/// Helper: parse `source` as a module with the given syntax extensions.
fn parse_with<'a>(arena: &'a AstArena, source: &str, syntax: &[Syntax]) -> Root<'a> {
    let options = ParseOptions::new(source).with_syntax(syntax.iter().copied());
    match parse(arena, &options) {
        Ok(root) => root,
        Err(error) => panic!("internal error for {source:?}: {error}"),
    }
}

fn codes(root: &Root<'_>) -> Vec<u32> {
    root.diagnostics.iter().map(|d| d.code).collect()
}

fn first_expression<'a>(root: &Root<'a>) -> Expression<'a> {
    match &root.statements[0] {
        Statement::Expression(statement) => *statement.expression,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

const SAMPLES: &[&str] = &[
    "",
    "let a = 1;",
    "function f(a, b = 2, ...c) { return a + b * c.length; }",
    "class A extends B { #x = 1; static { init(); } get y() { return this.#x; } }",
    "for (const [k, v] of Object.entries(o)) label: { if (k) break label; }",
    "x = /ab+c/gi.test(s) ? `t${1}` : a / b / c;",
    "let = ;",
    "if (a { b }",
    "'unterminated\nnext();",
    "/* open comment",
    "a => { ",
];

// ============================================================================
// Whole-file properties
// ============================================================================

#[test]
fn test_root_covers_the_input() {
    let arena = AstArena::new();
    for source in SAMPLES {
        let root = parse_with(&arena, source, &[]);
        let span = root.span();
        assert_eq!(span.start.index, 0, "source: {source:?}");
        assert_eq!(span.end.index as usize, source.len(), "source: {source:?}");
    }
}

#[test]
fn test_tokens_never_overlap() {
    for source in SAMPLES {
        let tokens = tokenize(&ParseOptions::new(*source)).unwrap();
        for pair in tokens.windows(2) {
            assert!(
                pair[0].span.end.index <= pair[1].span.start.index,
                "tokens {:?} and {:?} overlap in {source:?}",
                pair[0],
                pair[1]
            );
        }
    }
}

#[test]
fn test_broken_input_still_parses() {
    let arena = AstArena::new();
    for source in &SAMPLES[6..] {
        let root = parse_with(&arena, source, &[Syntax::Jsx, Syntax::Ts]);
        assert!(!root.diagnostics.is_empty(), "source: {source:?}");
    }
}

#[test]
fn test_positions_are_line_and_column() {
    let arena = AstArena::new();
    let root = parse_with(&arena, "let a;\n  foo();", &[]);
    let span = root.statements[1].span();
    assert_eq!((span.start.line, span.start.column), (2, 2));
    assert_eq!(span.start.index, 9);
    assert_eq!(span.end.index, 15);
}

// ============================================================================
// Ambiguity resolution
// ============================================================================

#[test]
fn test_arrow_with_jsx_enabled() {
    let arena = AstArena::new();
    let root = parse_with(&arena, "a => a;", &[Syntax::Jsx]);
    assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
    assert!(matches!(first_expression(&root), Expression::Arrow(_)));
}

#[test]
fn test_parenthesized_sequence() {
    let arena = AstArena::new();
    let root = parse_with(&arena, "(a, b);", &[]);
    assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
    assert!(matches!(
        first_expression(&root),
        Expression::Parenthesized(paren) if matches!(paren.expression, Expression::Sequence(_))
    ));
}

#[test]
fn test_generic_call_or_comparison() {
    let arena = AstArena::new();
    let root = parse_with(&arena, "foo<Bar>(baz);", &[Syntax::Ts]);
    assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
    assert!(matches!(first_expression(&root), Expression::Call(call) if call.type_arguments.is_some()));

    let root = parse_with(&arena, "foo<Bar>(baz);", &[]);
    assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
    assert!(matches!(first_expression(&root), Expression::Binary(_)));
}

#[test]
fn test_quoted_constructor() {
    let arena = AstArena::new();
    let root = parse_with(&arena, "class C { \"constructor\"() {} }", &[]);
    assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
    let Statement::ClassDeclaration(class) = &root.statements[0] else {
        panic!("expected a class");
    };
    assert!(matches!(
        class.body.members[0],
        ClassMember::Method(method) if method.kind == MethodKind::Constructor
    ));
}

// ============================================================================
// Recovery
// ============================================================================

#[test]
fn test_unterminated_string_continues() {
    let arena = AstArena::new();
    let root = parse_with(&arena, "let a = 'abc\nlet b = 1;", &[]);
    assert_eq!(codes(&root), vec![messages::UNTERMINATED_STRING.code]);
    assert!(root.corrupt);
    assert_eq!(root.statements.len(), 2);
}

#[test]
fn test_lookalike_punctuation() {
    let arena = AstArena::new();
    let root = parse_with(&arena, "a = 1\u{FF1B} b = 2", &[]);
    assert_eq!(codes(&root), vec![messages::UNICODE_LOOKALIKE.code]);
    assert_eq!(root.statements.len(), 2);
}

#[test]
fn test_broken_tsx_still_parses() {
    let arena = AstArena::new();
    for source in ["x = <a></b>;", "<div><span></div>", "<a></a", "<a><a>static", "<a><a>"] {
        let root = parse_with(&arena, source, &[Syntax::Jsx, Syntax::Ts]);
        assert!(root.corrupt, "source: {source:?}");
        assert!(!root.diagnostics.is_empty(), "source: {source:?}");
    }

    let root = parse_with(&arena, "x = <a></b>;", &[Syntax::Jsx, Syntax::Ts]);
    assert!(codes(&root).contains(&messages::JSX_MISMATCHED_CLOSING_TAG.code));
}

#[test]
fn test_nested_generic_arrow_in_tsx() {
    let arena = AstArena::new();
    let root = parse_with(
        &arena,
        "f = <T,>(x = <U,>(y: U) => y) => x;",
        &[Syntax::Jsx, Syntax::Ts],
    );
    assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
    let Expression::Assignment(assign) = first_expression(&root) else {
        panic!("expected an assignment");
    };
    assert!(matches!(assign.right, Expression::Arrow(_)));
}

// ============================================================================
// File-level features
// ============================================================================

#[test]
fn test_interpreter_and_directives() {
    let arena = AstArena::new();
    let options = ParseOptions::new("#!/usr/bin/env node\n'use strict';\nvar x;")
        .with_source_type(SourceType::Script);
    let root = parse(&arena, &options).unwrap();
    assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
    assert_eq!(root.interpreter.map(|i| i.value), Some("/usr/bin/env node"));
    assert_eq!(root.directives.len(), 1);
    assert_eq!(root.statements.len(), 1);
    assert!(root.has_hoisted_vars);
}

#[test]
fn test_declaration_file_is_ambient() {
    let arena = AstArena::new();
    let options = ParseOptions::new("declare function f(): void;\nfunction g(): void;\nconst x: number;")
        .with_path("lib.d.ts");
    let root = parse(&arena, &options).unwrap();
    assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
    assert!(root.syntax.contains(SyntaxSet::TS));
}

#[test]
fn test_placeholders_need_template_source() {
    let arena = AstArena::new();
    let options = ParseOptions::new("f(%%arg%%);").with_source_type(SourceType::Template);
    let root = parse(&arena, &options).unwrap();
    assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);

    let root = parse_with(&arena, "f(%%arg%%);", &[]);
    assert_eq!(codes(&root), vec![messages::PLACEHOLDER_OUTSIDE_TEMPLATE.code]);
}

#[test]
fn test_syntax_used_is_recorded() {
    let arena = AstArena::new();
    let root = parse_with(&arena, "const el = <div>{x as number}</div>;", &[Syntax::Jsx, Syntax::Ts]);
    assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
    assert!(root.syntax.contains(SyntaxSet::JSX));
    assert!(root.syntax.contains(SyntaxSet::TS));

    let root = parse_with(&arena, "const plain = 1;", &[Syntax::Jsx, Syntax::Ts]);
    assert!(root.syntax.is_empty());
}

#[test]
fn test_comments_survive_the_parse() {
    let arena = AstArena::new();
    let root = parse_with(&arena, "// leading\nlet a = 1; /* trailing */\n", &[]);
    assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
    assert_eq!(root.comments.len(), 2);
    assert!(!root.attachments.is_empty());
}

#[test]
fn test_comment_attached_once_through_node_copies() {
    let arena = AstArena::new();
    for source in [
        "x = { /*c*/ a };",
        "const { /*c*/ a } = o;",
        "const a = 1; export { /*c*/ a };",
    ] {
        let root = parse_with(&arena, source, &[]);
        assert!(root.diagnostics.is_empty(), "{source:?}: {:?}", root.diagnostics);
        assert_eq!(root.comments.len(), 1);
        let id = root.comments.iter().next().unwrap().id;
        let claims = root
            .attachments
            .iter()
            .map(|(_, comments)| {
                comments
                    .leading
                    .iter()
                    .chain(&comments.trailing)
                    .chain(&comments.inner)
                    .filter(|&&c| c == id)
                    .count()
            })
            .sum::<usize>();
        assert_eq!(claims, 1, "source: {source:?}");
    }
}
