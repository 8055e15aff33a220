//! Flag types and parse-mode descriptors shared by the tree and the parser.

use std::fmt;

bitflags::bitflags! {
    /// Modifiers written before a class member, parameter property or type parameter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierFlags: u16 {
        const NONE      = 0;
        const PUBLIC    = 1 << 0;
        const PRIVATE   = 1 << 1;
        const PROTECTED = 1 << 2;
        const STATIC    = 1 << 3;
        const READONLY  = 1 << 4;
        const ABSTRACT  = 1 << 5;
        const OVERRIDE  = 1 << 6;
        const DECLARE   = 1 << 7;
        const ACCESSOR  = 1 << 8;
        const CONST     = 1 << 9;
        const IN        = 1 << 10;
        const OUT       = 1 << 11;

        const ACCESSIBILITY = Self::PUBLIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits();
        const PARAMETER_PROPERTY = Self::ACCESSIBILITY.bits() | Self::READONLY.bits() | Self::OVERRIDE.bits();
        const TYPE_PARAMETER = Self::CONST.bits() | Self::IN.bits() | Self::OUT.bits();
    }
}

impl ModifierFlags {
    /// Map a modifier keyword to its flag.
    pub fn from_keyword(text: &str) -> Option<Self> {
        Some(match text {
            "public" => Self::PUBLIC,
            "private" => Self::PRIVATE,
            "protected" => Self::PROTECTED,
            "static" => Self::STATIC,
            "readonly" => Self::READONLY,
            "abstract" => Self::ABSTRACT,
            "override" => Self::OVERRIDE,
            "declare" => Self::DECLARE,
            "accessor" => Self::ACCESSOR,
            "const" => Self::CONST,
            "in" => Self::IN,
            "out" => Self::OUT,
            _ => return None,
        })
    }
}

bitflags::bitflags! {
    /// Optional syntax extensions enabled for a parse.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SyntaxSet: u8 {
        const JSX = 1 << 0;
        const TS  = 1 << 1;
    }
}

/// A single syntax extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    Jsx,
    Ts,
}

impl Syntax {
    pub fn flag(self) -> SyntaxSet {
        match self {
            Syntax::Jsx => SyntaxSet::JSX,
            Syntax::Ts => SyntaxSet::TS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Syntax::Jsx => "jsx",
            Syntax::Ts => "ts",
        }
    }
}

impl FromIterator<Syntax> for SyntaxSet {
    fn from_iter<I: IntoIterator<Item = Syntax>>(iter: I) -> Self {
        iter.into_iter().fold(SyntaxSet::empty(), |set, s| set | s.flag())
    }
}

/// How the top level of a file is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Sloppy-mode script; `import`/`export` are errors.
    Script,
    /// Strict ES module with top-level `await`.
    #[default]
    Module,
    /// A module that may contain `%%name%%` placeholders.
    Template,
}

impl SourceType {
    pub fn is_module(self) -> bool {
        matches!(self, SourceType::Module | SourceType::Template)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "script" => Some(SourceType::Script),
            "module" => Some(SourceType::Module),
            "template" => Some(SourceType::Template),
            _ => None,
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceType::Script => "script",
            SourceType::Module => "module",
            SourceType::Template => "template",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_set_from_iter() {
        let set: SyntaxSet = [Syntax::Jsx, Syntax::Ts].into_iter().collect();
        assert!(set.contains(SyntaxSet::JSX | SyntaxSet::TS));
        let none: SyntaxSet = std::iter::empty::<Syntax>().collect();
        assert!(none.is_empty());
    }

    #[test]
    fn test_modifier_groups() {
        assert!(ModifierFlags::PARAMETER_PROPERTY.contains(ModifierFlags::READONLY));
        assert!(!ModifierFlags::ACCESSIBILITY.contains(ModifierFlags::STATIC));
        assert_eq!(ModifierFlags::from_keyword("override"), Some(ModifierFlags::OVERRIDE));
        assert_eq!(ModifierFlags::from_keyword("async"), None);
    }

    #[test]
    fn test_source_type_names() {
        assert_eq!(SourceType::from_name("template"), Some(SourceType::Template));
        assert!(SourceType::Template.is_module());
        assert!(!SourceType::Script.is_module());
        assert_eq!(SourceType::default().to_string(), "module");
    }
}
