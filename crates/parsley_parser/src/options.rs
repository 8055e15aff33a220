//! Parse configuration.

use parsley_ast::{SourceType, Syntax, SyntaxSet};
use serde::{Deserialize, Deserializer};

/// Everything a single parse needs to know.
///
/// The source text and filename are per-call; the remaining fields can be
/// loaded from a JSON options file:
///
/// ```json
/// { "syntax": ["jsx", "ts"], "source_type": "module", "tokens": true }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    #[serde(skip)]
    pub input: String,
    /// Logical filename used in diagnostics. Never opened.
    #[serde(skip)]
    pub path: String,
    #[serde(deserialize_with = "deserialize_syntax")]
    pub syntax: SyntaxSet,
    pub source_type: SourceType,
    pub allow_return_outside_function: bool,
    /// Capture the token stream on the root.
    pub tokens: bool,
}

fn deserialize_syntax<'de, D>(deserializer: D) -> Result<SyntaxSet, D::Error>
where
    D: Deserializer<'de>,
{
    let list = Vec::<Syntax>::deserialize(deserializer)?;
    Ok(list.into_iter().collect())
}

impl ParseOptions {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_syntax(mut self, syntax: impl IntoIterator<Item = Syntax>) -> Self {
        self.syntax = syntax.into_iter().collect();
        self
    }

    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = source_type;
        self
    }

    pub fn allow_return_outside_function(mut self, allow: bool) -> Self {
        self.allow_return_outside_function = allow;
        self
    }

    pub fn capture_tokens(mut self, capture: bool) -> Self {
        self.tokens = capture;
        self
    }

    pub fn has_syntax(&self, syntax: Syntax) -> bool {
        self.syntax.contains(syntax.flag())
    }

    /// `.d.ts` files contain only declarations.
    pub fn is_declaration_file(&self) -> bool {
        self.path.ends_with(".d.ts")
            || self.path.ends_with(".d.mts")
            || self.path.ends_with(".d.cts")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = ParseOptions::new("let a;")
            .with_path("types.d.ts")
            .with_syntax([Syntax::Ts])
            .with_source_type(SourceType::Script)
            .capture_tokens(true);
        assert!(options.has_syntax(Syntax::Ts));
        assert!(!options.has_syntax(Syntax::Jsx));
        assert!(options.is_declaration_file());
        assert_eq!(options.source_type, SourceType::Script);
        assert!(options.tokens);
    }

    #[test]
    fn test_deserialize_partial() {
        let options: ParseOptions =
            serde_json::from_str(r#"{ "syntax": ["jsx", "ts"], "source_type": "template" }"#)
                .unwrap();
        assert_eq!(options.syntax, SyntaxSet::JSX | SyntaxSet::TS);
        assert_eq!(options.source_type, SourceType::Template);
        assert!(!options.allow_return_outside_function);
        assert!(options.input.is_empty());
    }
}
