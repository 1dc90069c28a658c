//! Display model for suggestion popups.
//!
//! This crate decides *what* is emphasized, never *how*: the host display
//! collaborator maps `SegmentKind::Matched` to bold, color, markup or whatever
//! its surface supports.
//!
//! Exposed Components:
//! - `highlight`: per-character plain/matched tagging of a label plus run
//!   coalescing for hosts that style spans rather than characters.
//! - `row`: `SuggestionRow` (primary label with optional highlight, secondary
//!   glyph label) built from a match candidate snapshot.

pub mod highlight;
pub mod row;

pub use highlight::{HighlightRun, SegmentKind, TaggedChar, highlight_runs, tag_chars};
pub use row::{SuggestionRow, build_rows};
