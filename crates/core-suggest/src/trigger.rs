//! Trigger detector.
//!
//! Finds the last trigger character at or before the cursor on the cursor
//! line. The query is everything strictly between it and the cursor. A
//! missing (misconfigured) trigger never opens a session.

use core_text::Position;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerInfo {
    /// Offset of the trigger character itself.
    pub start: Position,
    /// The cursor.
    pub end: Position,
    pub query: String,
}

/// Detect an active query on `line` with the cursor at `cursor`.
///
/// `line` is the full text of `cursor.line`; a cursor past its end is
/// clamped to the line length.
pub fn detect(line: &str, cursor: Position, trigger: Option<char>) -> Option<TriggerInfo> {
    let trigger = trigger?;
    let before: Vec<char> = line.chars().take(cursor.ch).collect();
    let Some(at) = before.iter().rposition(|&c| c == trigger) else {
        trace!(target: "suggest.trigger", cursor_ch = cursor.ch, "no_trigger");
        return None;
    };
    let query: String = before[at + 1..].iter().collect();
    trace!(target: "suggest.trigger", trigger_ch = at, cursor_ch = before.len(), query_len = before.len() - at - 1, "trigger_found");
    Some(TriggerInfo {
        start: cursor.with_ch(at),
        end: cursor.with_ch(before.len()),
        query,
    })
}
