//! Highlight renderer.
//!
//! Invariants:
//! * Output preserves every character of the input, in order.
//! * A character is `Matched` iff its char offset appears in `positions`.
//! * Offsets outside `[0, len)` are ignored. Duplicates and unsorted input
//!   are tolerated.
//! * Runs are maximal: two adjacent runs never share a kind.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Plain,
    Matched,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaggedChar {
    pub ch: char,
    pub kind: SegmentKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightRun {
    pub text: String,
    pub kind: SegmentKind,
}

impl HighlightRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SegmentKind::Plain,
        }
    }

    pub fn matched(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SegmentKind::Matched,
        }
    }
}

/// Tag each character of `text` as plain or matched.
pub fn tag_chars(text: &str, positions: &[usize]) -> Vec<TaggedChar> {
    let len = text.chars().count();
    let mut mask = vec![false; len];
    let mut ignored = 0usize;
    for &p in positions {
        match mask.get_mut(p) {
            Some(slot) => *slot = true,
            None => ignored += 1,
        }
    }
    if ignored > 0 {
        tracing::trace!(target: "render.highlight", ignored, len, "out_of_range_positions_ignored");
    }
    text.chars()
        .zip(mask)
        .map(|(ch, m)| TaggedChar {
            ch,
            kind: if m {
                SegmentKind::Matched
            } else {
                SegmentKind::Plain
            },
        })
        .collect()
}

/// Coalesce tagged characters into maximal same-kind runs.
pub fn highlight_runs(text: &str, positions: &[usize]) -> Vec<HighlightRun> {
    let mut out: Vec<HighlightRun> = Vec::new();
    for t in tag_chars(text, positions) {
        match out.last_mut() {
            Some(run) if run.kind == t.kind => run.text.push(t.ch),
            _ => out.push(HighlightRun {
                text: t.ch.to_string(),
                kind: t.kind,
            }),
        }
    }
    out
}
