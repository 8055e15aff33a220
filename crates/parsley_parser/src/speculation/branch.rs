//! Resolving grammar ambiguities by trying every reading.
//!
//! Each candidate production runs against a clone of the live state. The
//! best attempt (fewest diagnostics, with priorities as tie-breakers) is kept
//! and installed when the caller picks; the others are thrown away along with
//! everything they scanned and reported.

use super::{PResult, ParseAbort};
use crate::error::InternalError;
use crate::parser::Parser;
use crate::scope::{ScopeName, ScopeValue};
use crate::state::ParseState;
use tracing::trace;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BranchOptions {
    /// Abort the attempt as soon as it reports more than this many diagnostics.
    pub max_new_diagnostics: Option<i32>,
    pub priority: Option<u32>,
}

impl BranchOptions {
    /// An attempt that must not report anything.
    pub const STRICT: BranchOptions = BranchOptions {
        max_new_diagnostics: Some(0),
        priority: None,
    };
}

struct ParserBranch<T> {
    value: T,
    state: ParseState,
    new_diagnostics: usize,
    total_diagnostics: usize,
    priority: Option<u32>,
    optimal: bool,
}

pub(crate) struct BranchFinder<T> {
    leader: Option<ParserBranch<T>>,
    attempts: usize,
    enclosing_exceeded: bool,
}

impl<T> BranchFinder<T> {
    pub fn new() -> Self {
        Self {
            leader: None,
            attempts: 0,
            enclosing_exceeded: false,
        }
    }

    pub fn has_optimal_branch(&self) -> bool {
        self.leader.as_ref().is_some_and(|branch| branch.optimal)
    }

    /// Run one candidate. `try_fn` returns `Ok(None)` when the input does not
    /// take the shape the candidate expects.
    pub fn add<'a, F>(
        &mut self,
        parser: &mut Parser<'a>,
        options: BranchOptions,
        try_fn: F,
    ) -> PResult<&mut Self>
    where
        F: FnOnce(&mut Parser<'a>) -> PResult<Option<T>>,
    {
        if self.has_optimal_branch() {
            return Ok(self);
        }
        self.attempts += 1;
        let attempt = self.attempts;

        let before = parser.state.clone();
        let before_count = before.diagnostics.len();
        if let Some(max) = options.max_new_diagnostics {
            parser
                .state
                .scopes
                .push(ScopeName::MaxNewDiagnostics, ScopeValue::Budget(max));
        }
        let result = try_fn(parser);
        let popped = match options.max_new_diagnostics {
            Some(_) => parser.state.scopes.pop(ScopeName::MaxNewDiagnostics).map(drop),
            None => Ok(()),
        };

        let value = match (result, popped) {
            (Err(abort), _) if abort.is_budget_exceeded() => {
                if options.max_new_diagnostics.is_none() {
                    // An attempt without a budget of its own spent an enclosing one.
                    self.enclosing_exceeded = true;
                }
                trace!(attempt, offset = before.start.index, "branch exceeded a diagnostic budget");
                parser.restore_state(before);
                return Ok(self);
            }
            (Err(abort), _) => return Err(abort),
            (Ok(_), Err(error)) => return Err(error.into()),
            (Ok(None), Ok(())) => {
                trace!(attempt, offset = before.start.index, "branch did not apply");
                parser.restore_state(before);
                return Ok(self);
            }
            (Ok(Some(value)), Ok(())) => value,
        };

        let total_diagnostics = parser.state.diagnostics.len();
        let new_diagnostics = total_diagnostics.saturating_sub(before_count);
        let state = std::mem::replace(&mut parser.state, before);
        let branch = ParserBranch {
            value,
            state,
            new_diagnostics,
            total_diagnostics,
            priority: options.priority,
            optimal: new_diagnostics == 0,
        };

        if self.should_promote(&branch) {
            trace!(
                attempt,
                new_diagnostics = branch.new_diagnostics,
                optimal = branch.optimal,
                "branch promoted"
            );
            self.leader = Some(branch);
        } else {
            trace!(attempt, new_diagnostics = branch.new_diagnostics, "branch discarded");
        }
        Ok(self)
    }

    fn should_promote(&self, candidate: &ParserBranch<T>) -> bool {
        let Some(leader) = &self.leader else {
            return true;
        };
        if candidate.optimal {
            return true;
        }
        match (leader.priority, candidate.priority) {
            (Some(_), None) => false,
            _ if candidate.total_diagnostics < leader.total_diagnostics => true,
            (None, Some(_)) => true,
            (Some(current), Some(new)) => new > current,
            (None, None) => false,
        }
    }

    /// Install the winning attempt and return its value.
    pub fn pick(self, parser: &mut Parser<'_>) -> PResult<T> {
        match self.pick_optional(parser)? {
            Some(value) => Ok(value),
            None => Err(InternalError::NoBranch.into()),
        }
    }

    /// Like [`pick`](Self::pick), but an empty finder yields `None`. When
    /// nothing succeeded because an enclosing budget ran out, the budget
    /// signal is passed on so the enclosing attempt fails instead.
    pub fn pick_optional(self, parser: &mut Parser<'_>) -> PResult<Option<T>> {
        match self.leader {
            Some(branch) => {
                parser.set_state(branch.state)?;
                Ok(Some(branch.value))
            }
            None if self.enclosing_exceeded => Err(ParseAbort::budget_exceeded()),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;
    use bumpalo::Bump;
    use parsley_diagnostics::messages;
    use parsley_scanner::TokenKind;

    fn with_parser<R>(source: &str, f: impl FnOnce(&mut Parser<'_>) -> R) -> R {
        let arena = Bump::new();
        let options = ParseOptions::new(source);
        let mut parser = Parser::new(&arena, &options);
        parser.next().unwrap();
        f(&mut parser)
    }

    fn complain(p: &mut Parser<'_>, times: usize) -> PResult<()> {
        for _ in 0..times {
            let span = p.state.span();
            p.emit(&messages::UNEXPECTED_TOKEN, &["x"], span, true)?;
        }
        Ok(())
    }

    #[test]
    fn test_optimal_branch_wins_and_stops_search() {
        with_parser("a b", |p| {
            let mut finder = BranchFinder::new();
            let mut third_ran = false;
            finder
                .add(p, BranchOptions::default(), |p| {
                    complain(p, 1)?;
                    Ok(Some("noisy"))
                })
                .unwrap()
                .add(p, BranchOptions::default(), |p| {
                    p.next()?;
                    Ok(Some("clean"))
                })
                .unwrap()
                .add(p, BranchOptions::default(), |_| {
                    third_ran = true;
                    Ok(Some("late"))
                })
                .unwrap();
            assert!(finder.has_optimal_branch());
            assert!(!third_ran);
            assert_eq!(p.state.kind, TokenKind::Name);
            assert_eq!(p.state.start.index, 0);
            assert_eq!(finder.pick(p).unwrap(), "clean");
            assert_eq!(p.state.start.index, 2);
            assert!(p.state.diagnostics.is_empty());
        });
    }

    #[test]
    fn test_fewer_diagnostics_win() {
        with_parser("a", |p| {
            let mut finder = BranchFinder::new();
            finder
                .add(p, BranchOptions::default(), |p| complain(p, 3).map(|_| Some(3)))
                .unwrap()
                .add(p, BranchOptions::default(), |p| complain(p, 1).map(|_| Some(1)))
                .unwrap()
                .add(p, BranchOptions::default(), |p| complain(p, 2).map(|_| Some(2)))
                .unwrap();
            assert_eq!(finder.pick(p).unwrap(), 1);
            assert_eq!(p.state.diagnostics.len(), 1);
        });
    }

    #[test]
    fn test_priority_rules() {
        with_parser("a", |p| {
            let prioritized = BranchOptions {
                max_new_diagnostics: None,
                priority: Some(1),
            };
            let mut finder = BranchFinder::new();
            finder
                .add(p, prioritized, |p| complain(p, 2).map(|_| Some("first")))
                .unwrap()
                .add(p, BranchOptions::default(), |p| complain(p, 1).map(|_| Some("unprioritized")))
                .unwrap()
                .add(
                    p,
                    BranchOptions {
                        max_new_diagnostics: None,
                        priority: Some(2),
                    },
                    |p| complain(p, 3).map(|_| Some("higher")),
                )
                .unwrap();
            assert_eq!(finder.pick(p).unwrap(), "higher");
        });
    }

    #[test]
    fn test_budget_and_none_discard_attempt() {
        with_parser("a b", |p| {
            let before = p.state.diagnostics.clone();
            let mut finder: BranchFinder<()> = BranchFinder::new();
            finder
                .add(p, BranchOptions::STRICT, |p| {
                    p.next()?;
                    complain(p, 1)?;
                    Ok(Some(()))
                })
                .unwrap()
                .add(p, BranchOptions::default(), |p| {
                    p.next()?;
                    Ok(None)
                })
                .unwrap();
            assert!(p.state.diagnostics.ptr_eq(&before));
            assert_eq!(p.state.start.index, 0);
            assert!(finder.pick_optional(p).unwrap().is_none());
        });
    }

    #[test]
    fn test_pick_without_branch_is_fatal() {
        with_parser("a", |p| {
            let finder: BranchFinder<()> = BranchFinder::new();
            let error = finder.pick(p).unwrap_err().into_internal();
            assert_eq!(error, InternalError::NoBranch);
        });
    }

    #[test]
    fn test_nested_budget_charged_on_pick() {
        with_parser("a", |p| {
            let mut outer: BranchFinder<()> = BranchFinder::new();
            outer
                .add(p, BranchOptions::STRICT, |p| {
                    let mut inner = BranchFinder::new();
                    inner.add(
                        p,
                        BranchOptions {
                            max_new_diagnostics: Some(5),
                            priority: None,
                        },
                        |p| complain(p, 1).map(|_| Some(())),
                    )?;
                    inner.pick(p)?;
                    Ok(Some(()))
                })
                .unwrap();
            assert!(outer.pick_optional(p).unwrap().is_none());
            assert!(p.state.diagnostics.is_empty());
        });
    }

    #[test]
    fn test_unbudgeted_attempt_fails_the_enclosing_one() {
        with_parser("a b", |p| {
            let mut outer: BranchFinder<&str> = BranchFinder::new();
            outer
                .add(p, BranchOptions::STRICT, |p| {
                    let mut inner = BranchFinder::new();
                    inner.add(p, BranchOptions::default(), |p| {
                        p.next()?;
                        complain(p, 1).map(|_| Some(()))
                    })?;
                    inner.pick(p)?;
                    Ok(Some("strict"))
                })
                .unwrap()
                .add(p, BranchOptions::default(), |p| {
                    complain(p, 1)?;
                    Ok(Some("fallback"))
                })
                .unwrap();
            assert_eq!(outer.pick(p).unwrap(), "fallback");
            assert_eq!(p.state.diagnostics.len(), 1);
            assert_eq!(p.state.start.index, 0);
        });
    }

    #[test]
    fn test_clean_sibling_survives_an_exhausted_enclosing_budget() {
        with_parser("a b", |p| {
            let mut outer: BranchFinder<&str> = BranchFinder::new();
            outer
                .add(p, BranchOptions::STRICT, |p| {
                    let mut inner = BranchFinder::new();
                    inner
                        .add(p, BranchOptions::default(), |p| complain(p, 1).map(|_| Some("noisy")))?
                        .add(p, BranchOptions::STRICT, |p| {
                            p.next()?;
                            Ok(Some("clean"))
                        })?;
                    inner.pick(p).map(Some)
                })
                .unwrap();
            assert_eq!(outer.pick(p).unwrap(), "clean");
            assert!(p.state.diagnostics.is_empty());
            assert_eq!(p.state.start.index, 2);
        });
    }

    #[test]
    fn test_unbudgeted_attempt_reports_freely_at_top_level() {
        with_parser("a", |p| {
            let mut finder = BranchFinder::new();
            finder
                .add(p, BranchOptions::default(), |p| complain(p, 2).map(|_| Some(2)))
                .unwrap();
            assert_eq!(finder.pick(p).unwrap(), 2);
            assert_eq!(p.state.diagnostics.len(), 2);
        });
    }
}
