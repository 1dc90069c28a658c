//! Suggestion session controller.
//!
//! States: `Idle` and `Active(QuerySession)`.
//! - `Idle -> Active`: detection reports a trigger before the cursor.
//! - `Active -> Active`: query or cursor changed; candidates re-evaluated.
//! - `Active -> Idle`: trigger gone, selection committed, or cancelled.
//!
//! A session holds the candidate snapshot of its latest evaluation; rows and
//! commits read that snapshot, never the live store. No state survives a
//! return to `Idle`.

use crate::event::{SuggestContext, SuggestEvent, SuggestOutcome};
use crate::trigger::{TriggerInfo, detect};
use core_match::{Candidate, evaluate};
use core_render::{SuggestionRow, build_rows};
use core_text::{Position, TextEditor};
use tracing::{debug, trace};

/// The single text edit emitted on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub start: Position,
    pub end: Position,
    pub text: String,
}

impl Replacement {
    /// Cursor position immediately after the inserted text.
    pub fn cursor_after(&self) -> Position {
        match self.text.rfind('\n') {
            None => self
                .start
                .with_ch(self.start.ch + self.text.chars().count()),
            Some(last_nl) => Position::new(
                self.start.line + self.text.matches('\n').count(),
                self.text[last_nl + 1..].chars().count(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySession {
    pub trigger: TriggerInfo,
    pub candidates: Vec<Candidate>,
}

impl QuerySession {
    pub fn query(&self) -> &str {
        &self.trigger.query
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Active(QuerySession),
}

#[derive(Debug, Default)]
pub struct SuggestController {
    state: SessionState,
}

impl SuggestController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&QuerySession> {
        match &self.state {
            SessionState::Active(s) => Some(s),
            SessionState::Idle => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session().is_some()
    }

    /// Candidate snapshot of the active session (empty when idle).
    pub fn candidates(&self) -> &[Candidate] {
        self.session().map(|s| s.candidates.as_slice()).unwrap_or(&[])
    }

    /// Re-derive the session from the cursor line and re-run matching.
    pub fn refresh(&mut self, line: &str, cursor: Position, ctx: &SuggestContext<'_>) -> &[Candidate] {
        let Some(trigger) = detect(line, cursor, ctx.trigger) else {
            if self.is_active() {
                debug!(target: "suggest.session", reason = "trigger_gone", "session_closed");
            }
            self.state = SessionState::Idle;
            return &[];
        };
        let candidates = evaluate(&trigger.query, ctx.records, ctx.options);
        let reopened = self
            .session()
            .is_none_or(|s| s.trigger.start != trigger.start);
        if reopened {
            debug!(target: "suggest.session", line = trigger.start.line, trigger_ch = trigger.start.ch, "session_opened");
        }
        trace!(target: "suggest.session", query_len = trigger.query.chars().count(), candidates = candidates.len(), "session_refreshed");
        self.state = SessionState::Active(QuerySession {
            trigger,
            candidates,
        });
        self.candidates()
    }

    /// Commit the candidate at `slot`. Returns `None` (and stays put) when idle
    /// or when `slot` is outside the snapshot.
    pub fn select(&mut self, slot: usize) -> Option<Replacement> {
        let session = self.session()?;
        let Some(candidate) = session.candidates.get(slot) else {
            debug!(target: "suggest.session", slot, candidates = session.candidates.len(), "select_out_of_range");
            return None;
        };
        let replacement = Replacement {
            start: session.trigger.start,
            end: session.trigger.end,
            text: candidate.record.glyph.clone(),
        };
        debug!(target: "suggest.session", slot, store_index = candidate.index, "session_committed");
        self.state = SessionState::Idle;
        Some(replacement)
    }

    /// Commit into an editor: one range replace, then cursor after the glyph.
    pub fn commit_into<E: TextEditor + ?Sized>(
        &mut self,
        editor: &mut E,
        slot: usize,
    ) -> Option<Replacement> {
        let replacement = self.select(slot)?;
        editor.replace_range(replacement.start, replacement.end, &replacement.text);
        editor.set_cursor(replacement.cursor_after());
        Some(replacement)
    }

    pub fn cancel(&mut self) {
        if self.is_active() {
            debug!(target: "suggest.session", reason = "cancel", "session_closed");
        }
        self.state = SessionState::Idle;
    }

    /// Display rows for the current snapshot.
    pub fn rows(&self, highlight: bool) -> Vec<SuggestionRow> {
        build_rows(self.candidates(), highlight)
    }

    pub fn handle(&mut self, event: SuggestEvent, ctx: &SuggestContext<'_>) -> SuggestOutcome {
        match event {
            SuggestEvent::Changed { line, cursor } => {
                self.refresh(&line, cursor, ctx);
                match &self.state {
                    SessionState::Active(s) => SuggestOutcome::Candidates(s.candidates.clone()),
                    SessionState::Idle => SuggestOutcome::Idle,
                }
            }
            SuggestEvent::Select(slot) => match self.select(slot) {
                Some(r) => SuggestOutcome::Commit(r),
                None => match &self.state {
                    SessionState::Active(s) => SuggestOutcome::Candidates(s.candidates.clone()),
                    SessionState::Idle => SuggestOutcome::Idle,
                },
            },
            SuggestEvent::Cancel => {
                self.cancel();
                SuggestOutcome::Idle
            }
        }
    }
}
