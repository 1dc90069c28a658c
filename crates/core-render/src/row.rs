//! Suggestion rows handed to the display collaborator.
//!
//! A row is built from a `Candidate` snapshot, so rows stay consistent with
//! the evaluation that produced them even if the store changed afterwards.
//! The primary label is highlighted only when highlighting is enabled and the
//! candidate actually carries positions; otherwise it is one plain run.

use crate::highlight::{HighlightRun, SegmentKind, highlight_runs};
use core_match::Candidate;
use unicode_width::UnicodeWidthStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestionRow {
    /// Position in the candidate list (what a selection event carries back).
    pub slot: usize,
    pub primary: Vec<HighlightRun>,
    pub secondary: String,
}

impl SuggestionRow {
    pub fn from_candidate(slot: usize, candidate: &Candidate, highlight: bool) -> Self {
        let id = &candidate.record.id;
        let primary = if highlight && !candidate.positions.is_empty() {
            highlight_runs(id, &candidate.positions)
        } else {
            vec![HighlightRun::plain(id.clone())]
        };
        Self {
            slot,
            primary,
            secondary: candidate.record.glyph.clone(),
        }
    }

    pub fn primary_text(&self) -> String {
        self.primary.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn has_highlight(&self) -> bool {
        self.primary.iter().any(|r| r.kind == SegmentKind::Matched)
    }

    /// Plain single-line form: `id glyph`.
    pub fn display_line(&self) -> String {
        format!("{} {}", self.primary_text(), self.secondary)
    }

    /// Terminal/monospace column width of `display_line()`.
    pub fn display_width(&self) -> usize {
        self.display_line().width()
    }
}

pub fn build_rows(candidates: &[Candidate], highlight: bool) -> Vec<SuggestionRow> {
    candidates
        .iter()
        .enumerate()
        .map(|(slot, c)| SuggestionRow::from_candidate(slot, c, highlight))
        .collect()
}
