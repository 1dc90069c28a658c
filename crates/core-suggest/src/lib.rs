//! core-suggest: trigger detection and the suggestion session state machine.
//!
//! Data flow per keystroke:
//! line + cursor -> `trigger::detect` -> `core_match::evaluate` -> candidate
//! snapshot held by `SuggestController` -> rows for display -> selection ->
//! `Replacement` applied through the `TextEditor` collaborator.
//!
//! Everything here is synchronous and single-session. Detection is a
//! stateless re-derivation from the current line, so the controller never
//! patches a session incrementally.

pub mod event;
pub mod session;
pub mod trigger;

pub use event::{SuggestContext, SuggestEvent, SuggestOutcome};
pub use session::{QuerySession, Replacement, SessionState, SuggestController};
pub use trigger::{TriggerInfo, detect};
