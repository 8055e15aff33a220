//! parsley_diagnostics: diagnostics produced while tokenizing and parsing.
//!
//! A [`Diagnostic`] pairs a message from the [`messages`] catalog with the
//! source span it applies to. Diagnostics are plain data: the parser decides
//! when one is emitted and whether it marks the tree as corrupt.

use parsley_core::SourceSpan;
use std::fmt;
use std::sync::Arc;

/// Which stage of the parser produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// Character scanning: literals, comments, invalid characters.
    Lexer,
    /// Regular expression literal flags and bodies.
    Regex,
    /// General grammar violations.
    Parse,
    /// JSX elements and text.
    Jsx,
    /// Type annotations and TypeScript declarations.
    TypeScript,
}

impl DiagnosticCategory {
    pub fn tag(self) -> &'static str {
        match self {
            DiagnosticCategory::Lexer => "parse/lexer",
            DiagnosticCategory::Regex => "parse/regex",
            DiagnosticCategory::Parse => "parse",
            DiagnosticCategory::Jsx => "parse/jsx",
            DiagnosticCategory::TypeScript => "parse/typescript",
        }
    }
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A catalog entry: a stable code, a category and a message template.
///
/// Templates may contain `{0}`, `{1}`, ... placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// A realized diagnostic with its location and formatted message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Logical filename of the parsed text. Never touched on disk.
    pub filename: Arc<str>,
    pub span: SourceSpan,
    pub category: DiagnosticCategory,
    pub code: u32,
    pub message_text: String,
}

impl Diagnostic {
    pub fn new(
        filename: Arc<str>,
        span: SourceSpan,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            filename,
            span,
            category: message.category,
            code: message.code,
            message_text: format_message(message.message, args),
        }
    }

    /// Whether this diagnostic was produced from the given catalog entry.
    pub fn is(&self, message: &DiagnosticMessage) -> bool {
        self.code == message.code
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}({}): {}",
            self.filename, self.span.start, self.category, self.code, self.message_text
        )
    }
}

/// Replace `{0}`, `{1}`, ... in a template with the given arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

// ============================================================================
// Message catalog
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, $category:ident, $msg:expr) => {
            DiagnosticMessage {
                code: $code,
                category: DiagnosticCategory::$category,
                message: $msg,
            }
        };
    }

    // ========================================================================
    // Lexer (1000-1099)
    // ========================================================================
    pub const UNTERMINATED_STRING: DiagnosticMessage = diag!(1000, Lexer, "Unterminated string constant.");
    pub const UNTERMINATED_TEMPLATE: DiagnosticMessage = diag!(1001, Lexer, "Unterminated template literal.");
    pub const UNTERMINATED_COMMENT: DiagnosticMessage = diag!(1002, Lexer, "Unterminated comment.");
    pub const UNTERMINATED_JSX_CONTENTS: DiagnosticMessage = diag!(1003, Lexer, "Unterminated JSX contents.");
    pub const INVALID_CHARACTER: DiagnosticMessage = diag!(1004, Lexer, "Unexpected character '{0}'.");
    pub const UNICODE_LOOKALIKE: DiagnosticMessage = diag!(1005, Lexer, "'{0}' ({1}) looks like '{2}' ({3}) and was treated as such.");
    pub const INVALID_ESCAPE: DiagnosticMessage = diag!(1006, Lexer, "Invalid escape sequence.");
    pub const INVALID_UNICODE_ESCAPE: DiagnosticMessage = diag!(1007, Lexer, "Invalid Unicode escape sequence.");
    pub const OCTAL_ESCAPE_IN_STRICT: DiagnosticMessage = diag!(1008, Lexer, "Octal escape sequences are not allowed in strict mode.");
    pub const LEGACY_OCTAL_IN_STRICT: DiagnosticMessage = diag!(1009, Lexer, "Legacy octal literals are not allowed in strict mode.");
    pub const EXPECTED_NUMBER_IN_RADIX: DiagnosticMessage = diag!(1010, Lexer, "Expected number in radix {0}.");
    pub const IDENTIFIER_AFTER_NUMBER: DiagnosticMessage = diag!(1011, Lexer, "An identifier or keyword cannot immediately follow a numeric literal.");
    pub const INVALID_NUMERIC_SEPARATOR: DiagnosticMessage = diag!(1012, Lexer, "Numeric separators are not allowed here.");
    pub const INVALID_BIGINT: DiagnosticMessage = diag!(1013, Lexer, "Invalid BigInt literal.");
    pub const ESCAPED_KEYWORD: DiagnosticMessage = diag!(1014, Lexer, "Keywords cannot contain escaped characters.");
    pub const INVALID_IDENTIFIER_ESCAPE: DiagnosticMessage = diag!(1015, Lexer, "Escaped character is not valid in an identifier.");

    // ========================================================================
    // Regular expressions (1100-1149)
    // ========================================================================
    pub const UNTERMINATED_REGEX: DiagnosticMessage = diag!(1100, Regex, "Unterminated regular expression.");
    pub const DUPLICATE_REGEX_FLAG: DiagnosticMessage = diag!(1101, Regex, "Duplicate regular expression flag '{0}'.");
    pub const INVALID_REGEX_FLAG: DiagnosticMessage = diag!(1102, Regex, "Invalid regular expression flag '{0}'.");

    // ========================================================================
    // Grammar (1200-1399)
    // ========================================================================
    pub const EXPECTED_TOKEN: DiagnosticMessage = diag!(1200, Parse, "Expected '{0}' but found {1}.");
    pub const UNEXPECTED_TOKEN: DiagnosticMessage = diag!(1201, Parse, "Unexpected {0}.");
    pub const EXPECTED_SEMICOLON: DiagnosticMessage = diag!(1202, Parse, "Expected a semicolon or an implied semicolon after a statement.");
    pub const EXPECTED_IDENTIFIER: DiagnosticMessage = diag!(1203, Parse, "Expected an identifier but found {0}.");
    pub const EXPECTED_EXPRESSION: DiagnosticMessage = diag!(1204, Parse, "Expected an expression but found {0}.");
    pub const UNCLOSED: DiagnosticMessage = diag!(1205, Parse, "Unclosed {0}: expected '{1}' to match the '{2}' at {3}.");
    pub const EXPECTED_STATEMENT: DiagnosticMessage = diag!(1206, Parse, "Expected a statement but found {0}.");
    pub const RESERVED_WORD: DiagnosticMessage = diag!(1210, Parse, "'{0}' is a reserved word and cannot be used as an identifier.");
    pub const STRICT_RESERVED_WORD: DiagnosticMessage = diag!(1211, Parse, "'{0}' is reserved in strict mode.");
    pub const YIELD_IN_PARAMETERS: DiagnosticMessage = diag!(1212, Parse, "'yield' expressions are not allowed in formal parameters.");
    pub const AWAIT_IN_PARAMETERS: DiagnosticMessage = diag!(1213, Parse, "'await' expressions are not allowed in formal parameters.");
    pub const RETURN_OUTSIDE_FUNCTION: DiagnosticMessage = diag!(1214, Parse, "'return' outside of function.");
    pub const ILLEGAL_BREAK: DiagnosticMessage = diag!(1215, Parse, "'break' must be inside a loop, a switch or a labeled statement.");
    pub const ILLEGAL_CONTINUE: DiagnosticMessage = diag!(1216, Parse, "'continue' must be inside a loop.");
    pub const UNKNOWN_LABEL: DiagnosticMessage = diag!(1217, Parse, "Unknown label '{0}'.");
    pub const DUPLICATE_LABEL: DiagnosticMessage = diag!(1218, Parse, "Label '{0}' has already been declared.");
    pub const WITH_IN_STRICT: DiagnosticMessage = diag!(1219, Parse, "'with' statements are not allowed in strict mode.");
    pub const DELETE_IDENTIFIER_IN_STRICT: DiagnosticMessage = diag!(1220, Parse, "Deleting a local variable is not allowed in strict mode.");
    pub const INVALID_ASSIGNMENT_TARGET: DiagnosticMessage = diag!(1221, Parse, "Invalid left-hand side in {0}.");
    pub const REST_NOT_LAST: DiagnosticMessage = diag!(1222, Parse, "A rest element must be the last element.");
    pub const COMMA_AFTER_REST: DiagnosticMessage = diag!(1223, Parse, "A trailing comma is not allowed after a rest element.");
    pub const SHORTHAND_INITIALIZER: DiagnosticMessage = diag!(1224, Parse, "Shorthand property initializers are only valid in destructuring patterns.");
    pub const NEWLINE_AFTER_THROW: DiagnosticMessage = diag!(1225, Parse, "Illegal newline after 'throw'.");
    pub const MULTIPLE_DEFAULT_CASES: DiagnosticMessage = diag!(1226, Parse, "A switch statement may only have one 'default' clause.");
    pub const MISSING_CATCH_OR_FINALLY: DiagnosticMessage = diag!(1227, Parse, "Missing 'catch' or 'finally' clause.");
    pub const IMPORT_EXPORT_IN_SCRIPT: DiagnosticMessage = diag!(1228, Parse, "'import' and 'export' may only appear in a module.");
    pub const IMPORT_EXPORT_NOT_TOP_LEVEL: DiagnosticMessage = diag!(1229, Parse, "'import' and 'export' may only appear at the top level.");
    pub const SUPER_OUTSIDE_METHOD: DiagnosticMessage = diag!(1230, Parse, "'super' is only valid inside methods.");
    pub const SUPER_CALL_OUTSIDE_CONSTRUCTOR: DiagnosticMessage = diag!(1231, Parse, "'super()' is only valid inside the constructor of a derived class.");
    pub const ARGUMENTS_IN_CLASS_FIELD: DiagnosticMessage = diag!(1232, Parse, "'arguments' is not allowed in a class field initializer.");
    pub const DUPLICATE_CONSTRUCTOR: DiagnosticMessage = diag!(1233, Parse, "A class may only have one constructor.");
    pub const INVALID_CONSTRUCTOR: DiagnosticMessage = diag!(1234, Parse, "A constructor cannot be {0}.");
    pub const NEW_TARGET_OUTSIDE_FUNCTION: DiagnosticMessage = diag!(1235, Parse, "'new.target' can only be used inside functions.");
    pub const INVALID_META_PROPERTY: DiagnosticMessage = diag!(1236, Parse, "The only valid meta property for '{0}' is '{0}.{1}'.");
    pub const NULLISH_MIXING: DiagnosticMessage = diag!(1237, Parse, "'??' cannot be mixed with '||' or '&&' without parentheses.");
    pub const UNARY_BEFORE_EXPONENT: DiagnosticMessage = diag!(1238, Parse, "A unary expression on the left of '**' must be parenthesized.");
    pub const LINE_BREAK_BEFORE_ARROW: DiagnosticMessage = diag!(1239, Parse, "No line break is allowed before '=>'.");
    pub const TAGGED_TEMPLATE_IN_OPTIONAL_CHAIN: DiagnosticMessage = diag!(1240, Parse, "Tagged template cannot be used in an optional chain.");
    pub const NEW_IN_OPTIONAL_CHAIN: DiagnosticMessage = diag!(1241, Parse, "Constructors in or after an optional chain are not allowed.");
    pub const LEXICAL_IN_SINGLE_STATEMENT: DiagnosticMessage = diag!(1242, Parse, "Lexical declarations cannot appear in a single-statement context.");
    pub const MISSING_INITIALIZER: DiagnosticMessage = diag!(1243, Parse, "Missing initializer in {0} declaration.");
    pub const FOR_IN_OF_INITIALIZER: DiagnosticMessage = diag!(1244, Parse, "The variable of a for-{0} loop may not have an initializer.");
    pub const FOR_IN_OF_MULTIPLE: DiagnosticMessage = diag!(1245, Parse, "Only a single variable declaration is allowed in a for-{0} loop.");
    pub const FOR_AWAIT_OUTSIDE_ASYNC: DiagnosticMessage = diag!(1246, Parse, "'for await' is only valid inside async functions and modules.");
    pub const GETTER_WITH_PARAMETERS: DiagnosticMessage = diag!(1247, Parse, "A 'get' accessor cannot have parameters.");
    pub const SETTER_PARAMETER_COUNT: DiagnosticMessage = diag!(1248, Parse, "A 'set' accessor must have exactly one parameter.");
    pub const DUPLICATE_EXPORT: DiagnosticMessage = diag!(1249, Parse, "Duplicate export of '{0}'.");
    pub const PLACEHOLDER_OUTSIDE_TEMPLATE: DiagnosticMessage = diag!(1250, Parse, "Placeholders are only allowed in template sources.");
    pub const INVALID_TEMPLATE_ESCAPE: DiagnosticMessage = diag!(1251, Parse, "Invalid escape sequence in template.");
    pub const PRIVATE_NAME_OUTSIDE_CLASS: DiagnosticMessage = diag!(1252, Parse, "Private names are only allowed inside class bodies.");
    pub const ASYNC_ARROW_LINE_BREAK: DiagnosticMessage = diag!(1253, Parse, "No line break is allowed between 'async' and the arrow parameters.");

    // ========================================================================
    // JSX (1400-1449)
    // ========================================================================
    pub const JSX_MISMATCHED_CLOSING_TAG: DiagnosticMessage = diag!(1400, Jsx, "Expected a closing tag for <{0}> but found </{1}>.");
    pub const JSX_ADJACENT_ELEMENTS: DiagnosticMessage = diag!(1401, Jsx, "Adjacent JSX elements must be wrapped in an enclosing tag.");
    pub const JSX_EMPTY_ATTRIBUTE_EXPRESSION: DiagnosticMessage = diag!(1402, Jsx, "JSX attributes must only be assigned a non-empty expression.");
    pub const JSX_UNESCAPED_TEXT: DiagnosticMessage = diag!(1403, Jsx, "Unexpected '{0}' in JSX text. Did you mean '{1}'?");
    pub const JSX_NOT_ENABLED: DiagnosticMessage = diag!(1404, Jsx, "JSX syntax is not enabled for this file.");

    // ========================================================================
    // TypeScript (1500-1599)
    // ========================================================================
    pub const TS_NOT_ENABLED: DiagnosticMessage = diag!(1500, TypeScript, "TypeScript syntax is not enabled for this file.");
    pub const TYPE_EXPECTED: DiagnosticMessage = diag!(1501, TypeScript, "Type expected but found {0}.");
    pub const DUPLICATE_MODIFIER: DiagnosticMessage = diag!(1502, TypeScript, "'{0}' modifier already seen.");
    pub const MODIFIER_NOT_ALLOWED: DiagnosticMessage = diag!(1503, TypeScript, "'{0}' modifier cannot appear here.");
    pub const AMBIENT_IMPLEMENTATION: DiagnosticMessage = diag!(1504, TypeScript, "An implementation cannot be declared in ambient contexts.");
    pub const ABSTRACT_WITH_BODY: DiagnosticMessage = diag!(1505, TypeScript, "Method '{0}' cannot have an implementation because it is marked abstract.");
    pub const INDEX_SIGNATURE_TYPE: DiagnosticMessage = diag!(1506, TypeScript, "An index signature must have a type annotation.");
    pub const PARAMETER_PROPERTY_OUTSIDE_CONSTRUCTOR: DiagnosticMessage = diag!(1507, TypeScript, "A parameter property is only allowed in a constructor implementation.");
    pub const MISSING_FUNCTION_BODY: DiagnosticMessage = diag!(1508, TypeScript, "Function implementation is missing.");
    pub const TYPE_ASSERTION_IN_JSX: DiagnosticMessage = diag!(1509, TypeScript, "Type assertions with '<T>' are not allowed in files with JSX; use 'as' instead.");
    pub const OPTIONAL_AND_INITIALIZER: DiagnosticMessage = diag!(1510, TypeScript, "A parameter cannot have a question mark and an initializer.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use parsley_core::Position;

    #[test]
    fn test_format_message() {
        assert_eq!(
            format_message("Expected '{0}' but found {1}.", &[";", "'}'"]),
            "Expected ';' but found '}'."
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let span = SourceSpan::new(Position::new(2, 4, 10), Position::new(2, 5, 11));
        let diag = Diagnostic::new(
            Arc::from("input.js"),
            span,
            &messages::UNEXPECTED_TOKEN,
            &["')'"],
        );
        assert!(diag.is(&messages::UNEXPECTED_TOKEN));
        assert_eq!(diag.to_string(), "input.js:2:4: parse(1201): Unexpected ')'.");
    }

    #[test]
    fn test_category_tags() {
        assert_eq!(messages::UNTERMINATED_STRING.category.tag(), "parse/lexer");
        assert_eq!(messages::TYPE_EXPECTED.category.tag(), "parse/typescript");
        assert_eq!(messages::JSX_ADJACENT_ELEMENTS.category.tag(), "parse/jsx");
    }
}
