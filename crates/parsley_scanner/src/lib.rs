//! parsley_scanner: character-level scanning for JavaScript, JSX and TypeScript.
//!
//! The routines here are pure: given the text and a byte index they scan one
//! token and describe it. Deciding *which* routine applies at a position
//! (regex or division, JSX text or code, template chunk or expression) is
//! the parser's job.

mod char_codes;
mod jsx_entities;
mod lookalikes;
mod scanner;
mod token;

pub use char_codes::{is_identifier_name, is_identifier_part, is_identifier_start, is_line_break};
pub use scanner::{LexError, Lexed, ScanMode, ScannedComment, Scanner, Trivia};
pub use token::{Token, TokenFlags, TokenKind, TokenValue};
