//! Source positions, spans, and the line map used to derive them.
//!
//! Every token, node, comment and diagnostic carries a [`SourceSpan`]. A
//! [`Position`] stores the byte index alongside a 1-based line and a 0-based
//! column counted in Unicode scalar values.

use std::fmt;
use std::ops::Range;

/// A byte offset into the source text.
pub type TextPos = u32;

/// A resolved location in the source text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 0-based column, counted in characters.
    pub column: u32,
    /// Byte offset from the start of the text.
    pub index: TextPos,
}

impl Position {
    #[inline]
    pub fn new(line: u32, column: u32, index: TextPos) -> Self {
        Self {
            line,
            column,
            index,
        }
    }

    /// The position of the first character of any text.
    pub const START: Position = Position {
        line: 1,
        column: 0,
        index: 0,
    };
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.line, self.column, self.index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open `[start, end)` region of source text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct SourceSpan {
    pub start: Position,
    pub end: Position,
}

impl SourceSpan {
    #[inline]
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(end.index >= start.index);
        Self { start, end }
    }

    /// An empty span at a position.
    #[inline]
    pub fn empty(at: Position) -> Self {
        Self { start: at, end: at }
    }

    #[inline]
    pub fn len(&self) -> TextPos {
        self.end.index - self.start.index
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start.index == self.end.index
    }

    /// Whether this span fully contains `other`.
    #[inline]
    pub fn contains(&self, other: &SourceSpan) -> bool {
        self.start.index <= other.start.index && other.end.index <= self.end.index
    }

    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start.index as usize..self.end.index as usize
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(&self, other: &SourceSpan) -> SourceSpan {
        let start = if other.start.index < self.start.index {
            other.start
        } else {
            self.start
        };
        let end = if other.end.index > self.end.index {
            other.end
        } else {
            self.end
        };
        SourceSpan { start, end }
    }
}

impl fmt::Debug for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.index, self.end.index)
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Maps byte offsets to line/column positions.
///
/// Built once per source text and shared by every snapshot of the parse
/// state, so position lookups never require rescanning.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offsets of the start of each line.
    line_starts: Vec<TextPos>,
    /// When the text is pure ASCII, columns are plain byte differences.
    ascii: bool,
}

impl LineMap {
    /// Build a line map. `\n`, `\r\n`, lone `\r`, U+2028 and U+2029 all end a line.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push((i + 1) as u32),
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push((i + 1) as u32);
                }
                // U+2028 / U+2029 encode as E2 80 A8 / E2 80 A9.
                0xE2 if bytes.get(i + 1) == Some(&0x80)
                    && matches!(bytes.get(i + 2), Some(&0xA8) | Some(&0xA9)) =>
                {
                    i += 2;
                    line_starts.push((i + 1) as u32);
                }
                _ => {}
            }
            i += 1;
        }
        Self {
            line_starts,
            ascii: text.is_ascii(),
        }
    }

    /// 0-based line containing `pos`.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(line) => (line - 1) as u32,
        }
    }

    /// Resolve a byte offset into a [`Position`].
    pub fn position(&self, text: &str, pos: TextPos) -> Position {
        let line = self.line_of(pos);
        let line_start = self.line_starts[line as usize];
        let column = if self.ascii {
            pos - line_start
        } else {
            text.get(line_start as usize..pos as usize)
                .map_or(pos - line_start, |s| s.chars().count() as u32)
        };
        Position {
            line: line + 1,
            column,
            index: pos,
        }
    }

    /// Byte offset of the start of a 0-based line.
    pub fn line_start(&self, line: u32) -> TextPos {
        self.line_starts[line as usize]
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_map_positions() {
        let text = "line1\nline2\r\nline3";
        let map = LineMap::new(text);
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.position(text, 0), Position::new(1, 0, 0));
        assert_eq!(map.position(text, 8), Position::new(2, 2, 8));
        assert_eq!(map.position(text, 13), Position::new(3, 0, 13));
    }

    #[test]
    fn test_columns_count_characters() {
        let text = "ab\u{e9}cd";
        let map = LineMap::new(text);
        // 'c' starts after a two-byte character
        assert_eq!(map.position(text, 4).column, 3);
    }

    #[test]
    fn test_unicode_line_separators() {
        let text = "a\u{2028}b";
        let map = LineMap::new(text);
        assert_eq!(map.line_count(), 2);
        assert_eq!(map.position(text, 4).line, 2);
    }

    #[test]
    fn test_span_cover() {
        let a = SourceSpan::new(Position::new(1, 0, 0), Position::new(1, 3, 3));
        let b = SourceSpan::new(Position::new(1, 5, 5), Position::new(1, 9, 9));
        let c = a.cover(&b);
        assert_eq!(c.start.index, 0);
        assert_eq!(c.end.index, 9);
        assert!(c.contains(&a));
        assert!(!a.contains(&c));
    }
}
