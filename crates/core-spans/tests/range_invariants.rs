//! Property tests: ranges stay inside the text across arbitrary edits.

use core_spans::{SpanFlags, Spanned, SpannedText, Style, StyleFilter, StyleRangeSnapshot};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Edit {
    Insert { at: usize, text: String },
    Delete { start: usize, len: usize },
    Span { start: usize, len: usize, flags: u32 },
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0usize..40, "[a-zé€ ]{0,6}").prop_map(|(at, text)| Edit::Insert { at, text }),
        (0usize..40, 0usize..8).prop_map(|(start, len)| Edit::Delete { start, len }),
        (
            0usize..40,
            0usize..8,
            prop::sample::select(vec![0x11u32, 0x12, 0x21, 0x22, 0x33])
        )
            .prop_map(|(start, len, flags)| Edit::Span { start, len, flags }),
    ]
}

fn apply(text: &mut SpannedText, edit: &Edit) {
    let len = text.len_chars();
    match edit {
        Edit::Insert { at, text: s } => text.insert((*at).min(len), s).unwrap(),
        Edit::Delete { start, len: n } => {
            let s = (*start).min(len);
            let e = (s + n).min(len);
            text.delete(s, e).unwrap();
        }
        Edit::Span { start, len: n, flags } => {
            let s = (*start).min(len);
            let e = (s + n).min(len);
            text.set_span(Style::Bold, s, e, SpanFlags::from_bits_retain(*flags))
                .unwrap();
        }
    }
}

proptest! {
    #[test]
    fn ranges_stay_in_bounds(edits in prop::collection::vec(edit_strategy(), 0..40)) {
        let mut text = SpannedText::new("seed text");
        for edit in &edits {
            apply(&mut text, edit);
            let len = text.len_chars();
            for r in text.ranges() {
                prop_assert!(r.start <= r.end, "inverted {:?}", r);
                prop_assert!(r.end <= len, "out of bounds {:?} len={}", r, len);
            }
        }
    }

    #[test]
    fn snapshot_matches_live_state_at_capture(edits in prop::collection::vec(edit_strategy(), 1..20)) {
        let mut text = SpannedText::new("");
        let (head, tail) = edits.split_at(edits.len() / 2);
        for edit in head {
            apply(&mut text, edit);
        }
        let snap = StyleRangeSnapshot::capture(&text);
        let expected_text = text.plain_text();
        let expected_ranges = text.ranges().to_vec();
        for edit in tail {
            apply(&mut text, edit);
        }
        prop_assert_eq!(snap.plain_text(), expected_text);
        prop_assert_eq!(snap.ranges().to_vec(), expected_ranges);
    }

    #[test]
    fn transition_never_exceeds_limit(edits in prop::collection::vec(edit_strategy(), 0..20), start in 0usize..20) {
        let mut text = SpannedText::new("0123456789");
        for edit in &edits {
            apply(&mut text, edit);
        }
        let limit = text.len_chars();
        let next = text.next_transition(start, limit, &StyleFilter::Any);
        prop_assert!(next <= limit);
        if start < limit {
            prop_assert!(next > start);
        }
    }
}
