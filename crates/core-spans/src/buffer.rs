//! Live, mutable formatted text.

use std::borrow::Cow;

use ropey::Rope;
use tracing::trace;

use crate::{SpanError, SpanFlags, SpanId, Spanned, Style, StyleRange, StyleRangeSnapshot, check_range};

/// Rope-backed text with style ranges that follow edits.
#[derive(Debug, Clone, Default)]
pub struct SpannedText {
    rope: Rope,
    ranges: Vec<StyleRange>,
    next_id: u64,
}

impl SpannedText {
    pub fn new(content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
            ranges: Vec::new(),
            next_id: 1,
        }
    }

    /// Attach `style` to `start..end`. Returns the new range's identity.
    pub fn set_span(
        &mut self,
        style: Style,
        start: usize,
        end: usize,
        flags: SpanFlags,
    ) -> Result<SpanId, SpanError> {
        check_range(start, end, self.len_chars())?;
        let id = SpanId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        trace!(target: "spans.buffer", id = id.0, kind = ?style.kind(), start, end, flags = flags.bits(), "set_span");
        self.ranges.push(StyleRange::new(id, style, start, end, flags));
        Ok(id)
    }

    /// Detach a range. Returns it when it existed.
    pub fn remove_span(&mut self, id: SpanId) -> Option<StyleRange> {
        let idx = self.ranges.iter().rposition(|r| r.id == id)?;
        trace!(target: "spans.buffer", id = id.0, "remove_span");
        Some(self.ranges.remove(idx))
    }

    /// Move an existing range to new bounds, keeping its identity and style.
    pub fn move_span(&mut self, id: SpanId, start: usize, end: usize) -> Result<(), SpanError> {
        check_range(start, end, self.len_chars())?;
        let range = self
            .ranges
            .iter_mut()
            .rev()
            .find(|r| r.id == id)
            .ok_or(SpanError::UnknownSpan(id))?;
        range.start = start;
        range.end = end;
        Ok(())
    }

    pub fn insert(&mut self, at: usize, text: &str) -> Result<(), SpanError> {
        self.replace(at, at, text)
    }

    pub fn delete(&mut self, start: usize, end: usize) -> Result<(), SpanError> {
        self.replace(start, end, "")
    }

    /// Replace `start..end` with `text`, shifting ranges.
    ///
    /// Range boundaries inside the replaced region collapse to `start`. Text
    /// inserted at a boundary joins the range when that boundary is inclusive
    /// (see `SpanFlags`). `EXCLUSIVE_EXCLUSIVE` ranges lying entirely inside a
    /// non-empty deleted region are dropped.
    pub fn replace(&mut self, start: usize, end: usize, text: &str) -> Result<(), SpanError> {
        check_range(start, end, self.len_chars())?;
        let removed = end - start;
        let inserted = text.chars().count();

        if removed > 0 {
            self.rope.remove(start..end);
        }
        if inserted > 0 {
            self.rope.insert(start, text);
        }

        let before = self.ranges.len();
        self.ranges.retain(|r| {
            !(removed > 0 && r.start >= start && r.end <= end && r.flags.removed_when_emptied())
        });
        for r in &mut self.ranges {
            let mut s = shift_deleted(r.start, start, end);
            let mut e = shift_deleted(r.end, start, end);
            if inserted > 0 {
                if s > start || (s == start && !r.flags.start_inclusive()) {
                    s += inserted;
                }
                if e > start || (e == start && r.flags.end_inclusive()) {
                    e += inserted;
                }
            }
            r.start = s.min(e);
            r.end = e;
        }
        trace!(
            target: "spans.buffer",
            start,
            end,
            inserted,
            dropped = before - self.ranges.len(),
            "replace"
        );
        Ok(())
    }

    /// Replace content and ranges with the snapshot's. Ids keep allocating above restored ones.
    pub fn restore(&mut self, snapshot: &StyleRangeSnapshot) {
        self.rope = Rope::from_str(snapshot.as_str());
        self.ranges = snapshot.ranges().to_vec();
        let max_id = self.ranges.iter().map(|r| r.id.0).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id + 1);
        trace!(target: "spans.buffer", len = self.len_chars(), ranges = self.ranges.len(), "restore");
    }

    /// Text in `start..end` (clamped).
    pub fn slice(&self, start: usize, end: usize) -> String {
        let len = self.len_chars();
        let s = start.min(len);
        let e = end.min(len);
        if s >= e {
            return String::new();
        }
        self.rope.slice(s..e).to_string()
    }

    pub fn snapshot(&self) -> StyleRangeSnapshot {
        StyleRangeSnapshot::capture(self)
    }
}

fn shift_deleted(offset: usize, start: usize, end: usize) -> usize {
    if offset <= start {
        offset
    } else if offset >= end {
        offset - (end - start)
    } else {
        start
    }
}

impl Spanned for SpannedText {
    fn text(&self) -> Cow<'_, str> {
        Cow::Owned(self.rope.to_string())
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn ranges(&self) -> &[StyleRange] {
        &self.ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StyleFilter;

    fn bounds(t: &SpannedText, id: SpanId) -> (usize, usize) {
        (t.span_start(id).unwrap(), t.span_end(id).unwrap())
    }

    #[test]
    fn set_span_checks_bounds() {
        let mut t = SpannedText::new("abc");
        assert_eq!(
            t.set_span(Style::Bold, 1, 4, SpanFlags::default()),
            Err(SpanError::OutOfBounds { start: 1, end: 4, len: 3 })
        );
        assert_eq!(
            t.set_span(Style::Bold, 2, 1, SpanFlags::default()),
            Err(SpanError::Inverted { start: 2, end: 1 })
        );
    }

    #[test]
    fn insert_at_boundaries_follows_flags() {
        let mut t = SpannedText::new("abcdef");
        let ex = t.set_span(Style::Bold, 2, 4, SpanFlags::EXCLUSIVE_EXCLUSIVE).unwrap();
        let inc = t.set_span(Style::Italic, 2, 4, SpanFlags::INCLUSIVE_INCLUSIVE).unwrap();
        let ie = t.set_span(Style::Underline, 2, 4, SpanFlags::INCLUSIVE_EXCLUSIVE).unwrap();

        t.insert(2, "XX").unwrap();
        assert_eq!(bounds(&t, ex), (4, 6));
        assert_eq!(bounds(&t, inc), (2, 6));
        assert_eq!(bounds(&t, ie), (2, 6));

        t.insert(6, "Y").unwrap();
        assert_eq!(bounds(&t, ex), (4, 6));
        assert_eq!(bounds(&t, inc), (2, 7));
        assert_eq!(bounds(&t, ie), (2, 6));
        assert_eq!(t.plain_text(), "abXXcdYef");
    }

    #[test]
    fn delete_shrinks_and_drops_swallowed_exclusive_ranges() {
        let mut t = SpannedText::new("0123456789");
        let inner = t.set_span(Style::Bold, 3, 5, SpanFlags::EXCLUSIVE_EXCLUSIVE).unwrap();
        let kept = t.set_span(Style::Italic, 3, 5, SpanFlags::INCLUSIVE_INCLUSIVE).unwrap();
        let spanning = t.set_span(Style::Underline, 1, 8, SpanFlags::EXCLUSIVE_EXCLUSIVE).unwrap();
        let after = t.set_span(Style::Strikethrough, 8, 10, SpanFlags::EXCLUSIVE_EXCLUSIVE).unwrap();

        t.delete(2, 6).unwrap();
        assert_eq!(t.plain_text(), "016789");
        assert!(t.span(inner).is_none());
        assert_eq!(bounds(&t, kept), (2, 2));
        assert_eq!(bounds(&t, spanning), (1, 4));
        assert_eq!(bounds(&t, after), (4, 6));
    }

    #[test]
    fn replace_inside_range_keeps_it() {
        let mut t = SpannedText::new("hello world");
        let id = t.set_span(Style::Bold, 0, 11, SpanFlags::EXCLUSIVE_EXCLUSIVE).unwrap();
        t.replace(6, 11, "there!").unwrap();
        assert_eq!(t.plain_text(), "hello there!");
        assert_eq!(bounds(&t, id), (0, 6));
    }

    #[test]
    fn restore_keeps_identities_and_fresh_ids_do_not_collide() {
        let mut t = SpannedText::new("abc");
        let id = t.set_span(Style::Bold, 0, 1, SpanFlags::default()).unwrap();
        let snap = t.snapshot();
        let mut other = SpannedText::new("");
        other.restore(&snap);
        assert_eq!(other.span_start(id), Some(0));
        let fresh = other.set_span(Style::Italic, 1, 2, SpanFlags::default()).unwrap();
        assert_ne!(fresh, id);
    }

    #[test]
    fn slice_and_query_use_char_offsets() {
        let mut t = SpannedText::new("añb€c");
        t.set_span(Style::Bold, 1, 4, SpanFlags::default()).unwrap();
        assert_eq!(t.slice(1, 4), "ñb€");
        assert_eq!(t.query_ranges(4, 5, &StyleFilter::Any).len(), 0);
        assert_eq!(t.query_ranges(3, 5, &StyleFilter::Any).len(), 1);
    }

    #[test]
    fn move_span_unknown_id_errors() {
        let mut t = SpannedText::new("abc");
        assert_eq!(t.move_span(SpanId(99), 0, 1), Err(SpanError::UnknownSpan(SpanId(99))));
    }
}
