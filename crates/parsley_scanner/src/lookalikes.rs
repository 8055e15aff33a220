//! Unicode characters that look like ASCII punctuation.
//!
//! When one of these appears where a punctuator could, the scanner treats it
//! as the ASCII character and reports what it did.

pub struct Lookalike {
    pub ch: char,
    pub name: &'static str,
    pub ascii: char,
    pub ascii_name: &'static str,
}

macro_rules! lookalike {
    ($ch:expr, $name:expr, $ascii:expr, $ascii_name:expr) => {
        Lookalike {
            ch: $ch,
            name: $name,
            ascii: $ascii,
            ascii_name: $ascii_name,
        }
    };
}

static LOOKALIKES: &[Lookalike] = &[
    lookalike!('\u{037E}', "Greek Question Mark", ';', "Semicolon"),
    lookalike!('\u{FF1B}', "Fullwidth Semicolon", ';', "Semicolon"),
    lookalike!('\u{FF0C}', "Fullwidth Comma", ',', "Comma"),
    lookalike!('\u{201A}', "Single Low-9 Quotation Mark", ',', "Comma"),
    lookalike!('\u{FF1A}', "Fullwidth Colon", ':', "Colon"),
    lookalike!('\u{FF08}', "Fullwidth Left Parenthesis", '(', "Left Parenthesis"),
    lookalike!('\u{FF09}', "Fullwidth Right Parenthesis", ')', "Right Parenthesis"),
    lookalike!('\u{FF3B}', "Fullwidth Left Square Bracket", '[', "Left Square Bracket"),
    lookalike!('\u{FF3D}', "Fullwidth Right Square Bracket", ']', "Right Square Bracket"),
    lookalike!('\u{FF5B}', "Fullwidth Left Curly Bracket", '{', "Left Curly Bracket"),
    lookalike!('\u{FF5D}', "Fullwidth Right Curly Bracket", '}', "Right Curly Bracket"),
    lookalike!('\u{FF0E}', "Fullwidth Full Stop", '.', "Full Stop"),
    lookalike!('\u{FF1F}', "Fullwidth Question Mark", '?', "Question Mark"),
    lookalike!('\u{FF01}', "Fullwidth Exclamation Mark", '!', "Exclamation Mark"),
    lookalike!('\u{01C3}', "Latin Letter Retroflex Click", '!', "Exclamation Mark"),
    lookalike!('\u{FF1D}', "Fullwidth Equals Sign", '=', "Equals Sign"),
    lookalike!('\u{FF1C}', "Fullwidth Less-Than Sign", '<', "Less-Than Sign"),
    lookalike!('\u{FF1E}', "Fullwidth Greater-Than Sign", '>', "Greater-Than Sign"),
    lookalike!('\u{FF0B}', "Fullwidth Plus Sign", '+', "Plus Sign"),
    lookalike!('\u{FF0D}', "Fullwidth Hyphen-Minus", '-', "Hyphen-Minus"),
    lookalike!('\u{2212}', "Minus Sign", '-', "Hyphen-Minus"),
    lookalike!('\u{2013}', "En Dash", '-', "Hyphen-Minus"),
    lookalike!('\u{FF0A}', "Fullwidth Asterisk", '*', "Asterisk"),
    lookalike!('\u{FF0F}', "Fullwidth Solidus", '/', "Solidus"),
    lookalike!('\u{FF06}', "Fullwidth Ampersand", '&', "Ampersand"),
    lookalike!('\u{FF5C}', "Fullwidth Vertical Line", '|', "Vertical Line"),
    lookalike!('\u{FF05}', "Fullwidth Percent Sign", '%', "Percent Sign"),
    lookalike!('\u{FF3E}', "Fullwidth Circumflex Accent", '^', "Circumflex Accent"),
    lookalike!('\u{FF5E}', "Fullwidth Tilde", '~', "Tilde"),
    lookalike!('\u{FF02}', "Fullwidth Quotation Mark", '"', "Quotation Mark"),
    lookalike!('\u{201C}', "Left Double Quotation Mark", '"', "Quotation Mark"),
    lookalike!('\u{201D}', "Right Double Quotation Mark", '"', "Quotation Mark"),
    lookalike!('\u{FF07}', "Fullwidth Apostrophe", '\'', "Apostrophe"),
    lookalike!('\u{2018}', "Left Single Quotation Mark", '\'', "Apostrophe"),
    lookalike!('\u{2019}', "Right Single Quotation Mark", '\'', "Apostrophe"),
];

/// Find the look-alike entry for `ch`.
pub fn lookup(ch: char) -> Option<&'static Lookalike> {
    if ch.is_ascii() {
        return None;
    }
    LOOKALIKES.iter().find(|entry| entry.ch == ch)
}

/// Whether `ch` is `quote` or one of its look-alikes.
pub fn is_quote_like(ch: char, quote: char) -> bool {
    ch == quote || lookup(ch).is_some_and(|entry| entry.ascii == quote)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let entry = lookup('；').unwrap();
        assert_eq!(entry.ascii, ';');
        assert_eq!(entry.name, "Fullwidth Semicolon");
        assert!(lookup(';').is_none());
        assert!(lookup('é').is_none());
    }

    #[test]
    fn test_quote_like() {
        assert!(is_quote_like('"', '"'));
        assert!(is_quote_like('\u{201D}', '"'));
        assert!(!is_quote_like('\u{2019}', '"'));
    }
}
