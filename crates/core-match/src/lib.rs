//! Match engine: filters the symbol store against a live query.
//!
//! Two modes:
//! - `Containment`: the lowercased id contains the lowercased query as a
//!   contiguous substring. Never produces highlight positions.
//! - `Fuzzy`: the query is an ordered, case-insensitive subsequence of the id.
//!   A single greedy left-to-right scan picks the earliest position for each
//!   query character; no backtracking, no scoring.
//!
//! Candidates keep store iteration order. Each candidate owns a clone of its
//! record so a deferred render observes the store as it was at evaluation
//! time, even if the store mutates in between.
//!
//! Positions are char offsets into the original (not lowercased) id.

use core_symbols::SymbolRecord;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    Containment,
    #[default]
    Fuzzy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    pub mode: MatchMode,
    /// Record matched positions (fuzzy mode only).
    pub highlight: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            mode: MatchMode::Fuzzy,
            highlight: true,
        }
    }
}

/// Outcome of matching one id. `matched` is authoritative; `positions` may be
/// empty for a successful match (highlight off, containment mode, empty query).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchResult {
    pub matched: bool,
    pub positions: Vec<usize>,
}

impl MatchResult {
    pub fn miss() -> Self {
        Self::default()
    }

    pub fn hit(positions: Vec<usize>) -> Self {
        Self {
            matched: true,
            positions,
        }
    }
}

/// A store record that survived filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Index in the store at evaluation time.
    pub index: usize,
    pub record: SymbolRecord,
    pub matched: bool,
    pub positions: Vec<usize>,
}

/// Case-insensitive char equality via full lowercase expansion.
#[inline]
pub fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Greedy two-pointer subsequence scan. The id pointer advances every step,
/// the query pointer only on a match.
pub fn fuzzy_match(id: &str, query: &str, highlight: bool) -> MatchResult {
    let query: Vec<char> = query.chars().collect();
    let mut positions = Vec::new();
    let mut q = 0usize;
    for (t, c) in id.chars().enumerate() {
        if q == query.len() {
            break;
        }
        if chars_eq_ignore_case(c, query[q]) {
            if highlight {
                positions.push(t);
            }
            q += 1;
        }
    }
    if q == query.len() {
        MatchResult::hit(positions)
    } else {
        MatchResult::miss()
    }
}

pub fn contains_ignore_case(id: &str, query: &str) -> bool {
    id.to_lowercase().contains(&query.to_lowercase())
}

/// Match a single id under `opts`.
pub fn match_id(id: &str, query: &str, opts: MatchOptions) -> MatchResult {
    match opts.mode {
        MatchMode::Fuzzy => fuzzy_match(id, query, opts.highlight),
        MatchMode::Containment => {
            if contains_ignore_case(id, query) {
                MatchResult::hit(Vec::new())
            } else {
                MatchResult::miss()
            }
        }
    }
}

/// Filter `records` against `query`, preserving iteration order.
///
/// A query starting with a space yields no candidates at all.
pub fn evaluate(query: &str, records: &[SymbolRecord], opts: MatchOptions) -> Vec<Candidate> {
    if query.starts_with(' ') {
        trace!(target: "match.engine", "leading_space_no_suggestions");
        return Vec::new();
    }
    let out: Vec<Candidate> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let result = match_id(&record.id, query, opts);
            result.matched.then(|| Candidate {
                index,
                record: record.clone(),
                matched: true,
                positions: result.positions,
            })
        })
        .collect();
    trace!(
        target: "match.engine",
        mode = ?opts.mode,
        highlight = opts.highlight,
        query_len = query.chars().count(),
        scanned = records.len(),
        candidates = out.len(),
        "evaluate"
    );
    out
}
