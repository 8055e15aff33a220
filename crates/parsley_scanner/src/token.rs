//! Token kinds, flags and decoded values.

use parsley_core::SourceSpan;
use std::fmt;

/// The classification of a token.
///
/// Reserved words get their own kinds. Contextual keywords (`let`, `async`,
/// `of`, `type`, ...) are scanned as [`TokenKind::Name`] and recognized by
/// the grammar from the token value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,
    /// An unrecognized character, or the truncated tail of a corrupt token stream.
    Invalid,

    // Literals and names
    Name,
    PrivateName,
    Num,
    BigInt,
    String,
    Regex,
    /// A chunk of template text between `` ` ``, `${` and `}`.
    Template,
    /// `%%` in template sources.
    Placeholder,

    // JSX
    JsxName,
    JsxText,
    JsxTagStart,
    JsxTagEnd,

    // Punctuation
    BracketL,
    BracketR,
    BraceL,
    BraceR,
    ParenL,
    ParenR,
    Comma,
    Semi,
    Colon,
    Dot,
    Question,
    QuestionDot,
    Arrow,
    Ellipsis,
    BackQuote,
    DollarBraceL,
    At,

    // Assignment
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    StarStarEq,
    LtLtEq,
    GtGtEq,
    GtGtGtEq,
    BarEq,
    CaretEq,
    AmpEq,
    BarBarEq,
    AmpAmpEq,
    QuestionQuestionEq,

    // Operators
    Bang,
    Tilde,
    PlusPlus,
    MinusMinus,
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    Lt,
    Gt,
    LtEq,
    GtEq,
    LtLt,
    GtGt,
    GtGtGt,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    Amp,
    AmpAmp,
    Bar,
    BarBar,
    Caret,
    QuestionQuestion,

    // Reserved words
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Export,
    Extends,
    False,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    Instanceof,
    New,
    Null,
    Return,
    Super,
    Switch,
    This,
    Throw,
    True,
    Try,
    Typeof,
    Var,
    Void,
    While,
    With,
}

impl TokenKind {
    /// Map a reserved word to its token kind.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        use TokenKind::*;
        Some(match word {
            "break" => Break,
            "case" => Case,
            "catch" => Catch,
            "class" => Class,
            "const" => Const,
            "continue" => Continue,
            "debugger" => Debugger,
            "default" => Default,
            "delete" => Delete,
            "do" => Do,
            "else" => Else,
            "export" => Export,
            "extends" => Extends,
            "false" => False,
            "finally" => Finally,
            "for" => For,
            "function" => Function,
            "if" => If,
            "import" => Import,
            "in" => In,
            "instanceof" => Instanceof,
            "new" => New,
            "null" => Null,
            "return" => Return,
            "super" => Super,
            "switch" => Switch,
            "this" => This,
            "throw" => Throw,
            "true" => True,
            "try" => Try,
            "typeof" => Typeof,
            "var" => Var,
            "void" => Void,
            "while" => While,
            "with" => With,
            _ => return None,
        })
    }

    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Break | Case | Catch | Class | Const | Continue | Debugger | Default | Delete | Do
                | Else | Export | Extends | False | Finally | For | Function | If | Import | In
                | Instanceof | New | Null | Return | Super | Switch | This | Throw | True | Try
                | Typeof | Var | Void | While | With
        )
    }

    /// Whether an expression may follow this token.
    pub fn before_expr(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            BracketL
                | BraceL
                | ParenL
                | Comma
                | Semi
                | Colon
                | Question
                | Arrow
                | Ellipsis
                | DollarBraceL
                | JsxText
                | Bang
                | Tilde
                | Case
                | Default
                | Do
                | Else
                | Return
                | Throw
                | New
                | Extends
                | In
                | Instanceof
                | Typeof
                | Void
                | Delete
        ) || self.is_assign()
            || self.is_binary_operator()
    }

    /// Whether this token can begin an expression.
    pub fn starts_expr(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Name | PrivateName
                | Num
                | BigInt
                | String
                | Regex
                | Placeholder
                | JsxTagStart
                | BracketL
                | BraceL
                | ParenL
                | BackQuote
                | DollarBraceL
                | At
                | Bang
                | Tilde
                | PlusPlus
                | MinusMinus
                | Plus
                | Minus
                | Lt
                | Class
                | Function
                | Import
                | New
                | Null
                | True
                | False
                | This
                | Super
                | Typeof
                | Void
                | Delete
        )
    }

    pub fn is_assign(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Eq | PlusEq
                | MinusEq
                | StarEq
                | SlashEq
                | PercentEq
                | StarStarEq
                | LtLtEq
                | GtGtEq
                | GtGtGtEq
                | BarEq
                | CaretEq
                | AmpEq
                | BarBarEq
                | AmpAmpEq
                | QuestionQuestionEq
        )
    }

    pub fn is_binary_operator(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Plus | Minus
                | Star
                | StarStar
                | Slash
                | Percent
                | Lt
                | Gt
                | LtEq
                | GtEq
                | LtLt
                | GtGt
                | GtGtGt
                | EqEq
                | NotEq
                | EqEqEq
                | NotEqEq
                | Amp
                | AmpAmp
                | Bar
                | BarBar
                | Caret
                | QuestionQuestion
                | In
                | Instanceof
        )
    }

    /// Source text of fixed-spelling tokens.
    pub fn as_str(self) -> Option<&'static str> {
        use TokenKind::*;
        Some(match self {
            BracketL => "[",
            BracketR => "]",
            BraceL => "{",
            BraceR => "}",
            ParenL => "(",
            ParenR => ")",
            Comma => ",",
            Semi => ";",
            Colon => ":",
            Dot => ".",
            Question => "?",
            QuestionDot => "?.",
            Arrow => "=>",
            Ellipsis => "...",
            BackQuote => "`",
            DollarBraceL => "${",
            At => "@",
            Placeholder => "%%",
            Eq => "=",
            PlusEq => "+=",
            MinusEq => "-=",
            StarEq => "*=",
            SlashEq => "/=",
            PercentEq => "%=",
            StarStarEq => "**=",
            LtLtEq => "<<=",
            GtGtEq => ">>=",
            GtGtGtEq => ">>>=",
            BarEq => "|=",
            CaretEq => "^=",
            AmpEq => "&=",
            BarBarEq => "||=",
            AmpAmpEq => "&&=",
            QuestionQuestionEq => "??=",
            Bang => "!",
            Tilde => "~",
            PlusPlus => "++",
            MinusMinus => "--",
            Plus => "+",
            Minus => "-",
            Star => "*",
            StarStar => "**",
            Slash => "/",
            Percent => "%",
            Lt | JsxTagStart => "<",
            Gt | JsxTagEnd => ">",
            LtEq => "<=",
            GtEq => ">=",
            LtLt => "<<",
            GtGt => ">>",
            GtGtGt => ">>>",
            EqEq => "==",
            NotEq => "!=",
            EqEqEq => "===",
            NotEqEq => "!==",
            Amp => "&",
            AmpAmp => "&&",
            Bar => "|",
            BarBar => "||",
            Caret => "^",
            QuestionQuestion => "??",
            Break => "break",
            Case => "case",
            Catch => "catch",
            Class => "class",
            Const => "const",
            Continue => "continue",
            Debugger => "debugger",
            Default => "default",
            Delete => "delete",
            Do => "do",
            Else => "else",
            Export => "export",
            Extends => "extends",
            False => "false",
            Finally => "finally",
            For => "for",
            Function => "function",
            If => "if",
            Import => "import",
            In => "in",
            Instanceof => "instanceof",
            New => "new",
            Null => "null",
            Return => "return",
            Super => "super",
            Switch => "switch",
            This => "this",
            Throw => "throw",
            True => "true",
            Try => "try",
            Typeof => "typeof",
            Var => "var",
            Void => "void",
            While => "while",
            With => "with",
            Eof | Invalid | Name | PrivateName | Num | BigInt | String | Regex | Template
            | JsxName | JsxText => return None,
        })
    }

    /// How the token is named in diagnostics.
    pub fn describe(self) -> String {
        match self {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Invalid => "invalid token".to_string(),
            TokenKind::Name => "identifier".to_string(),
            TokenKind::PrivateName => "private name".to_string(),
            TokenKind::Num | TokenKind::BigInt => "number".to_string(),
            TokenKind::String => "string literal".to_string(),
            TokenKind::Regex => "regular expression".to_string(),
            TokenKind::Template => "template".to_string(),
            TokenKind::JsxName => "JSX identifier".to_string(),
            TokenKind::JsxText => "JSX text".to_string(),
            other => match other.as_str() {
                Some(text) => format!("'{}'", text),
                None => format!("{:?}", other),
            },
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

bitflags::bitflags! {
    /// Extra facts about a scanned token that the grammar may need to diagnose.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u8 {
        const NONE                    = 0;
        /// An identifier spelled with `\u` escapes.
        const ESCAPED                 = 1 << 0;
        /// `017` or `08`.
        const LEGACY_OCTAL            = 1 << 1;
        /// `"\07"`, `"\8"`.
        const OCTAL_ESCAPE            = 1 << 2;
        /// A template chunk whose cooked value is undefined.
        const INVALID_TEMPLATE_ESCAPE = 1 << 3;
        const UNTERMINATED            = 1 << 4;
    }
}

/// The decoded value carried by a token.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TokenValue {
    #[default]
    None,
    /// Identifier names, private names, string and JSX text contents.
    Str(String),
    Number(f64),
    /// BigInt digits without the `n` suffix.
    BigInt(String),
    Regex { pattern: String, flags: String },
    Template { cooked: Option<String>, raw: String },
}

impl TokenValue {
    pub fn as_str(&self) -> &str {
        match self {
            TokenValue::Str(s) | TokenValue::BigInt(s) => s,
            TokenValue::Template { raw, .. } => raw,
            _ => "",
        }
    }
}

/// A captured token: kind and span only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: SourceSpan,
}

impl Token {
    pub fn new(kind: TokenKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }
}
