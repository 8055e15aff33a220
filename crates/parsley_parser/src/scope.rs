//! Named scope stacks.
//!
//! Grammar context that nests with the source (are we in a generator, in a
//! type annotation, in a class field initializer...) is kept as a fixed set of
//! stacks rather than as parser fields, so entering a construct shadows the
//! outer value and leaving it restores the outer value automatically.

use crate::error::InternalError;
use parsley_ast::MethodKind;
use std::fmt;

const SCOPE_COUNT: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeName {
    Generator,
    Async,
    Strict,
    ClassKind,
    MethodKind,
    Parameters,
    Type,
    PropertyName,
    ClassProperty,
    MaxNewDiagnostics,
    /// Reserved for type comments in plain JavaScript; never pushed.
    FlowComment,
}

impl ScopeName {
    pub const ALL: [ScopeName; SCOPE_COUNT] = [
        ScopeName::Generator,
        ScopeName::Async,
        ScopeName::Strict,
        ScopeName::ClassKind,
        ScopeName::MethodKind,
        ScopeName::Parameters,
        ScopeName::Type,
        ScopeName::PropertyName,
        ScopeName::ClassProperty,
        ScopeName::MaxNewDiagnostics,
        ScopeName::FlowComment,
    ];

    fn slot(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScopeName::Generator => "generator",
            ScopeName::Async => "async",
            ScopeName::Strict => "strict",
            ScopeName::ClassKind => "class-kind",
            ScopeName::MethodKind => "method-kind",
            ScopeName::Parameters => "function-parameters",
            ScopeName::Type => "type-position",
            ScopeName::PropertyName => "property-name",
            ScopeName::ClassProperty => "class-field-initializer",
            ScopeName::MaxNewDiagnostics => "max-new-diagnostics",
            ScopeName::FlowComment => "flow-comment",
        }
    }
}

impl fmt::Display for ScopeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Base,
    /// A class with an `extends` clause; its constructor may call `super()`.
    Derived,
}

/// A value on one of the scope stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeValue {
    Flag(bool),
    Class(ClassKind),
    Method(MethodKind),
    Budget(i32),
}

impl ScopeValue {
    pub const TRUE: ScopeValue = ScopeValue::Flag(true);
    pub const FALSE: ScopeValue = ScopeValue::Flag(false);

    /// Everything except the `false` sentinel counts as "in scope".
    pub fn is_set(self) -> bool {
        self != ScopeValue::FALSE
    }
}

#[derive(Debug, Clone, Default)]
pub struct NamedScopes {
    stacks: [Vec<ScopeValue>; SCOPE_COUNT],
}

impl NamedScopes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: ScopeName, value: ScopeValue) {
        self.stacks[name.slot()].push(value);
    }

    pub fn pop(&mut self, name: ScopeName) -> Result<ScopeValue, InternalError> {
        self.stacks[name.slot()]
            .pop()
            .ok_or(InternalError::EmptyScope(name))
    }

    pub fn top(&self, name: ScopeName) -> Option<ScopeValue> {
        self.stacks[name.slot()].last().copied()
    }

    pub fn top_mut(&mut self, name: ScopeName) -> Option<&mut ScopeValue> {
        self.stacks[name.slot()].last_mut()
    }

    pub fn top_or_default(&self, name: ScopeName, default: ScopeValue) -> ScopeValue {
        self.top(name).unwrap_or(default)
    }

    /// Non-empty, and the innermost value is not `false`.
    pub fn in_scope(&self, name: ScopeName) -> bool {
        self.top(name).is_some_and(ScopeValue::is_set)
    }

    pub fn is_empty(&self, name: ScopeName) -> bool {
        self.stacks[name.slot()].is_empty()
    }

    /// The first stack that still holds values.
    pub fn first_unbalanced(&self) -> Option<ScopeName> {
        ScopeName::ALL
            .into_iter()
            .find(|name| !self.stacks[name.slot()].is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_shadows_and_pop_restores() {
        let mut scopes = NamedScopes::new();
        assert!(!scopes.in_scope(ScopeName::Generator));
        scopes.push(ScopeName::Generator, ScopeValue::TRUE);
        assert!(scopes.in_scope(ScopeName::Generator));
        scopes.push(ScopeName::Generator, ScopeValue::FALSE);
        assert!(!scopes.in_scope(ScopeName::Generator));
        assert_eq!(scopes.pop(ScopeName::Generator), Ok(ScopeValue::FALSE));
        assert!(scopes.in_scope(ScopeName::Generator));
        assert_eq!(scopes.pop(ScopeName::Generator), Ok(ScopeValue::TRUE));
        assert!(scopes.is_empty(ScopeName::Generator));
    }

    #[test]
    fn test_pop_empty_is_error() {
        let mut scopes = NamedScopes::new();
        assert_eq!(
            scopes.pop(ScopeName::Type),
            Err(InternalError::EmptyScope(ScopeName::Type))
        );
    }

    #[test]
    fn test_non_flag_values_are_in_scope() {
        let mut scopes = NamedScopes::new();
        scopes.push(ScopeName::ClassKind, ScopeValue::Class(ClassKind::Base));
        scopes.push(ScopeName::MaxNewDiagnostics, ScopeValue::Budget(0));
        assert!(scopes.in_scope(ScopeName::ClassKind));
        assert!(scopes.in_scope(ScopeName::MaxNewDiagnostics));
        assert_eq!(
            scopes.top_or_default(ScopeName::MethodKind, ScopeValue::FALSE),
            ScopeValue::FALSE
        );
    }

    #[test]
    fn test_first_unbalanced() {
        let mut scopes = NamedScopes::new();
        assert_eq!(scopes.first_unbalanced(), None);
        scopes.push(ScopeName::Strict, ScopeValue::TRUE);
        assert_eq!(scopes.first_unbalanced(), Some(ScopeName::Strict));
        scopes.pop(ScopeName::Strict).unwrap();
        assert!(scopes.is_empty(ScopeName::Strict));
    }
}
