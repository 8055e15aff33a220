//! Word lists and token predicates used by the grammar.

use parsley_scanner::TokenKind;

/// Words reserved only in strict mode code.
pub fn is_strict_reserved_word(name: &str) -> bool {
    matches!(
        name,
        "implements" | "interface" | "let" | "package" | "private" | "protected" | "public" | "static" | "yield"
    )
}

/// Words that may never name a binding, beyond the keywords the scanner
/// already classifies.
pub fn is_reserved_word(name: &str, in_module: bool) -> bool {
    name == "enum" || (in_module && name == "await")
}

/// `eval` and `arguments` cannot be assigned or bound in strict mode.
pub fn is_strict_bind_only_reserved(name: &str) -> bool {
    matches!(name, "eval" | "arguments")
}

/// Tokens that can begin a property key.
pub fn is_property_key_start(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(kind, Name | PrivateName | String | Num | BigInt | BracketL) || kind.is_keyword()
}

/// Whether a token can follow a modifier word for the word to act as one.
pub fn can_follow_modifier(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Name | PrivateName | String | Num | BigInt | BracketL | BraceL | Star | Ellipsis
    ) || kind.is_keyword()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_words() {
        assert!(is_strict_reserved_word("yield"));
        assert!(!is_strict_reserved_word("await"));
        assert!(is_reserved_word("await", true));
        assert!(!is_reserved_word("await", false));
        assert!(is_reserved_word("enum", false));
    }

    #[test]
    fn test_token_predicates() {
        assert!(is_property_key_start(TokenKind::Num));
        assert!(is_property_key_start(TokenKind::Default));
        assert!(!is_property_key_start(TokenKind::ParenL));
        assert!(can_follow_modifier(TokenKind::BracketL));
        assert!(!can_follow_modifier(TokenKind::ParenL));
    }
}
