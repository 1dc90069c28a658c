//! Events driving the suggestion controller and what it reports back.

use crate::session::Replacement;
use core_match::{Candidate, MatchOptions};
use core_symbols::SymbolRecord;
use core_text::Position;

/// Discrete UI events, delivered one at a time on the host's main sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestEvent {
    /// Keystroke or cursor motion: `line` is the full cursor line.
    Changed { line: String, cursor: Position },
    /// The user picked the candidate at this slot of the current list.
    Select(usize),
    /// Escape, focus loss, cursor moved away.
    Cancel,
}

/// Read-only inputs for one evaluation. Borrowed fresh per event so nothing
/// derived from the store outlives it.
#[derive(Debug, Clone, Copy)]
pub struct SuggestContext<'a> {
    pub records: &'a [SymbolRecord],
    pub trigger: Option<char>,
    pub options: MatchOptions,
}

impl<'a> SuggestContext<'a> {
    pub fn new(records: &'a [SymbolRecord], trigger: Option<char>, options: MatchOptions) -> Self {
        Self {
            records,
            trigger,
            options,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestOutcome {
    /// No session (or the session just ended without a commit).
    Idle,
    /// Session open; this is the refreshed candidate list (possibly empty).
    Candidates(Vec<Candidate>),
    /// Session committed; apply this edit, then the controller is idle.
    Commit(Replacement),
}
