//! parsley_parser: recursive descent parser for JavaScript, JSX and TypeScript.
//!
//! The tokenizer is driven by the parser: which token a character starts
//! depends on the lexical context stack and on named scopes pushed by the
//! grammar. Ambiguous constructs are resolved by speculatively parsing each
//! alternative against a cloned state and keeping the one with the fewest
//! new diagnostics.
//!
//! ```
//! use parsley_core::AstArena;
//! use parsley_parser::{parse, ParseOptions};
//!
//! let arena = AstArena::new();
//! let root = parse(&arena, &ParseOptions::new("let answer = 42;")).unwrap();
//! assert_eq!(root.statements.len(), 1);
//! assert!(!root.corrupt);
//! ```

mod context;
mod error;
mod finalize;
mod grammar;
mod options;
mod parser;
mod precedence;
mod root;
mod scope;
mod speculation;
mod state;
mod tokenizer;
mod utilities;

pub use error::InternalError;
pub use options::ParseOptions;
pub use parser::Parser;
pub use root::Root;

use parsley_core::{AstArena, SourceSpan};
use parsley_scanner::{Token, TokenKind};
use tracing::debug;

/// Parse `options.input` into a tree allocated in `arena`.
///
/// Problems in the input never fail the call; they are collected in
/// [`Root::diagnostics`]. An `Err` means the parser itself broke an
/// invariant.
pub fn parse<'a>(arena: &'a AstArena, options: &ParseOptions) -> Result<Root<'a>, InternalError> {
    debug!(path = %options.path, bytes = options.input.len(), "parse");
    let root = Parser::new(arena.bump(), options)
        .parse_root()
        .map_err(speculation::ParseAbort::into_internal)?;
    debug!(
        statements = root.statements.len(),
        diagnostics = root.diagnostics.len(),
        corrupt = root.corrupt,
        "parsed"
    );
    Ok(root)
}

/// The token stream of `options.input`.
///
/// The whole file is parsed so that every token is scanned in the right
/// context. When the tree is corrupt, the tokens from the first diagnostic
/// on are replaced by one [`TokenKind::Invalid`] token running to the end
/// of the input.
pub fn tokenize(options: &ParseOptions) -> Result<Vec<Token>, InternalError> {
    let arena = AstArena::new();
    let options = options.clone().capture_tokens(true);
    let root = parse(&arena, &options)?;
    let mut tokens = root.tokens;
    if !root.corrupt {
        return Ok(tokens);
    }

    let Some(first_error) = root.diagnostics.iter().map(|d| d.span.start).min_by_key(|p| p.index)
    else {
        return Ok(tokens);
    };
    tokens.retain(|token| token.span.start.index < first_error.index);
    let end = root.data.span.end;
    tokens.push(Token::new(TokenKind::Invalid, SourceSpan::new(first_error, end)));
    debug!(kept = tokens.len() - 1, at = first_error.index, "truncated corrupt token stream");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parsley_ast::Syntax;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|token| token.kind).collect()
    }

    #[test]
    fn test_tokenize_clean_input() {
        let tokens = tokenize(&ParseOptions::new("a = /re/g;")).unwrap();
        assert_eq!(
            kinds(&tokens),
            [TokenKind::Name, TokenKind::Eq, TokenKind::Regex, TokenKind::Semi]
        );
    }

    #[test]
    fn test_tokenize_splits_nested_type_arguments() {
        let options = ParseOptions::new("let x: A<B<C>>;").with_syntax([Syntax::Ts]);
        let tokens = tokenize(&options).unwrap();
        let closing = kinds(&tokens).iter().filter(|k| **k == TokenKind::Gt).count();
        assert_eq!(closing, 2);
        assert!(!kinds(&tokens).contains(&TokenKind::GtGt));
    }

    #[test]
    fn test_tokenize_truncates_corrupt_input() {
        let source = "let a = 1;\nlet b = );\nlet c = 3;";
        let tokens = tokenize(&ParseOptions::new(source)).unwrap();
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::Invalid);
        assert_eq!(last.span.end.index as usize, source.len());
        assert_eq!(&kinds(&tokens)[..5], &[
            TokenKind::Name,
            TokenKind::Name,
            TokenKind::Eq,
            TokenKind::Num,
            TokenKind::Semi,
        ]);
        assert!(tokens.iter().all(|t| t.span.start.index <= last.span.start.index));
    }

    #[test]
    fn test_parse_reports_without_failing() {
        let arena = AstArena::new();
        let root = parse(&arena, &ParseOptions::new("let = ;")).unwrap();
        assert!(root.corrupt);
        assert!(!root.diagnostics.is_empty());
    }
}
