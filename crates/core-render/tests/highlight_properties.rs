//! Property-based tests for highlight tagging.

use core_render::{SegmentKind, highlight_runs, tag_chars};
use proptest::prelude::*;

proptest! {
    // Every input character survives, in order, and tagging follows the position set.
    #[test]
    fn tagging_preserves_text_and_marks_only_listed_positions(
        text in "\\PC{0,16}",
        positions in prop::collection::vec(0usize..24, 0..10),
    ) {
        let tagged = tag_chars(&text, &positions);
        let rebuilt: String = tagged.iter().map(|t| t.ch).collect();
        prop_assert_eq!(&rebuilt, &text);
        for (i, t) in tagged.iter().enumerate() {
            let expect = if positions.contains(&i) { SegmentKind::Matched } else { SegmentKind::Plain };
            prop_assert_eq!(t.kind, expect);
        }
    }

    // Runs concatenate back to the input and never repeat a kind back to back.
    #[test]
    fn runs_are_maximal(
        text in "[a-z]{0,16}",
        positions in prop::collection::vec(0usize..20, 0..10),
    ) {
        let runs = highlight_runs(&text, &positions);
        let rebuilt: String = runs.iter().map(|r| r.text.as_str()).collect();
        prop_assert_eq!(rebuilt, text);
        for w in runs.windows(2) {
            prop_assert_ne!(w[0].kind, w[1].kind);
        }
    }
}
