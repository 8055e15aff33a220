//! Speculation: snapshots of the parse state, diagnostic budgets and lookahead.
//!
//! A speculative attempt may be given a budget of new diagnostics. Every
//! emitted diagnostic decrements the innermost budget; going below zero
//! aborts the attempt with a [`ParseAbort`] that only this module can tell
//! apart from a fatal error. Grammar code just propagates it with `?`.

mod branch;

pub(crate) use branch::{BranchFinder, BranchOptions};

use crate::error::InternalError;
use crate::parser::Parser;
use crate::scope::{ScopeName, ScopeValue};
use crate::state::{LookaheadToken, ParseState};
use parsley_core::SourceSpan;
use parsley_diagnostics::{Diagnostic, DiagnosticMessage};

pub type PResult<T> = Result<T, ParseAbort>;

/// Why a grammar routine stopped early.
#[derive(Debug)]
pub struct ParseAbort(Abort);

#[derive(Debug)]
enum Abort {
    BudgetExceeded,
    Internal(InternalError),
}

impl ParseAbort {
    fn budget_exceeded() -> Self {
        ParseAbort(Abort::BudgetExceeded)
    }

    fn is_budget_exceeded(&self) -> bool {
        matches!(self.0, Abort::BudgetExceeded)
    }

    /// Collapse into the fatal error reported by `parse`. A budget signal
    /// that reaches this far escaped every branch that could have caught it.
    pub(crate) fn into_internal(self) -> InternalError {
        match self.0 {
            Abort::BudgetExceeded => InternalError::EscapedBudget,
            Abort::Internal(error) => error,
        }
    }
}

impl From<InternalError> for ParseAbort {
    fn from(error: InternalError) -> Self {
        ParseAbort(Abort::Internal(error))
    }
}

fn budget_of(state: &ParseState) -> Option<i32> {
    match state.scopes.top(ScopeName::MaxNewDiagnostics) {
        Some(ScopeValue::Budget(left)) => Some(left),
        _ => None,
    }
}

impl<'a> Parser<'a> {
    /// Record a diagnostic, charging it to the innermost budget.
    pub(crate) fn emit(
        &mut self,
        message: &DiagnosticMessage,
        args: &[&str],
        span: SourceSpan,
        corrupt: bool,
    ) -> PResult<()> {
        if self.state.is_lookahead {
            return Ok(());
        }
        if let Some(ScopeValue::Budget(left)) =
            self.state.scopes.top_mut(ScopeName::MaxNewDiagnostics)
        {
            *left -= 1;
            if *left < 0 {
                return Err(ParseAbort::budget_exceeded());
            }
        }
        if corrupt {
            self.state.corrupt = true;
        }
        let diagnostic = Diagnostic::new(self.filename.clone(), span, message, args);
        self.state.diagnostics.push(diagnostic);
        Ok(())
    }

    /// Put back a snapshot taken earlier, dropping everything done since.
    pub(crate) fn restore_state(&mut self, state: ParseState) {
        self.state = state;
    }

    /// Install the state a speculative attempt ended in.
    ///
    /// Diagnostics the attempt added that were not already charged to the
    /// enclosing budget (because the attempt ran under a budget of its own)
    /// are charged now.
    pub(crate) fn set_state(&mut self, mut incoming: ParseState) -> PResult<()> {
        let added = incoming
            .diagnostics
            .len()
            .saturating_sub(self.state.diagnostics.len()) as i32;
        let live_budget = budget_of(&self.state);
        if let (Some(live), Some(ScopeValue::Budget(left))) = (
            live_budget,
            incoming.scopes.top_mut(ScopeName::MaxNewDiagnostics),
        ) {
            let already_charged = live - *left;
            let owed = added - already_charged;
            if owed > 0 {
                *left -= owed;
            }
            if *left < 0 {
                return Err(ParseAbort::budget_exceeded());
            }
        }
        self.state = incoming;
        Ok(())
    }

    /// Scan the token after the current one without consuming anything.
    pub(crate) fn lookahead(&mut self) -> PResult<LookaheadToken> {
        self.look(|p| {
            p.next()?;
            Ok(LookaheadToken {
                kind: p.state.kind,
                value: p.state.value.clone(),
                start: p.state.start,
                line_break_before: p.state.line_break_before,
            })
        })
    }

    /// Run `f` against a throwaway copy of the state. Diagnostics it emits
    /// are dropped and the state is restored even when `f` fails.
    pub(crate) fn look<R>(&mut self, f: impl FnOnce(&mut Self) -> PResult<R>) -> PResult<R> {
        let saved = self.state.clone();
        self.state.is_lookahead = true;
        let result = f(self);
        self.restore_state(saved);
        result
    }

    /// Try a single production; keep its result only if it succeeds within
    /// the given budget.
    pub(crate) fn speculate<T>(
        &mut self,
        options: BranchOptions,
        f: impl FnOnce(&mut Self) -> PResult<Option<T>>,
    ) -> PResult<Option<T>> {
        let mut finder = BranchFinder::new();
        finder.add(self, options, f)?;
        finder.pick_optional(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;
    use bumpalo::Bump;
    use parsley_diagnostics::messages;

    fn with_parser<R>(source: &str, f: impl FnOnce(&mut Parser<'_>) -> R) -> R {
        let arena = Bump::new();
        let options = ParseOptions::new(source);
        let mut parser = Parser::new(&arena, &options);
        f(&mut parser)
    }

    #[test]
    fn test_emit_respects_budget() {
        with_parser("a", |p| {
            p.state.scopes.push(ScopeName::MaxNewDiagnostics, ScopeValue::Budget(1));
            let span = p.state.span();
            assert!(p.emit(&messages::UNEXPECTED_TOKEN, &["x"], span, true).is_ok());
            let second = p.emit(&messages::UNEXPECTED_TOKEN, &["x"], span, true);
            assert!(second.is_err_and(|abort| abort.is_budget_exceeded()));
        });
    }

    #[test]
    fn test_lookahead_drops_diagnostics() {
        with_parser("a \u{1} b", |p| {
            p.next().unwrap();
            let before = p.state.diagnostics.len();
            let token = p.lookahead().unwrap();
            assert_eq!(token.kind, parsley_scanner::TokenKind::Invalid);
            assert_eq!(p.state.diagnostics.len(), before);
            assert!(!p.state.is_lookahead);
        });
    }

    #[test]
    fn test_set_state_charges_unbudgeted_delta() {
        with_parser("a", |p| {
            p.state.scopes.push(ScopeName::MaxNewDiagnostics, ScopeValue::Budget(0));
            let mut incoming = p.state.clone();
            let span = p.state.span();
            incoming.diagnostics.push(Diagnostic::new(
                p.filename.clone(),
                span,
                &messages::UNEXPECTED_TOKEN,
                &["x"],
            ));
            let result = p.set_state(incoming);
            assert!(result.is_err_and(|abort| abort.is_budget_exceeded()));
        });
    }

    #[test]
    fn test_into_internal() {
        assert_eq!(
            ParseAbort::budget_exceeded().into_internal(),
            InternalError::EscapedBudget
        );
        assert_eq!(
            ParseAbort::from(InternalError::NoBranch).into_internal(),
            InternalError::NoBranch
        );
    }
}
