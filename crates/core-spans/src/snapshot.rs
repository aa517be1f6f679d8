//! Frozen copy of a document's text and ranges.

use std::borrow::Cow;
use std::sync::Arc;

use crate::{SpanError, Spanned, StyleRange, check_range};

/// Immutable text + ranges captured at one instant.
///
/// Storage is shared (`Arc`) so clones are cheap, but there is no way to
/// mutate a snapshot after construction; edits to the live document always
/// produce a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRangeSnapshot {
    text: Arc<str>,
    len: usize,
    ranges: Arc<[StyleRange]>,
}

impl Default for StyleRangeSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl StyleRangeSnapshot {
    /// Empty text, no ranges.
    pub fn empty() -> Self {
        Self {
            text: Arc::from(""),
            len: 0,
            ranges: Arc::from(Vec::new()),
        }
    }

    /// Unformatted text.
    pub fn from_text(text: &str) -> Self {
        Self {
            text: Arc::from(text),
            len: text.chars().count(),
            ranges: Arc::from(Vec::new()),
        }
    }

    /// Build from explicit parts, validating every range against the text length.
    pub fn from_parts(text: &str, ranges: Vec<StyleRange>) -> Result<Self, SpanError> {
        let len = text.chars().count();
        for r in &ranges {
            check_range(r.start, r.end, len)?;
        }
        Ok(Self {
            text: Arc::from(text),
            len,
            ranges: Arc::from(ranges),
        })
    }

    /// Deep copy of `source`. Ranges are clamped into the text bounds.
    pub fn capture<S: Spanned + ?Sized>(source: &S) -> Self {
        let text = source.text();
        let len = source.len_chars();
        let ranges: Vec<StyleRange> = source
            .ranges()
            .iter()
            .map(|r| {
                let mut copy = r.clone();
                copy.start = copy.start.min(len);
                copy.end = copy.end.clamp(copy.start, len);
                copy
            })
            .collect();
        tracing::trace!(target: "spans.snapshot", len, ranges = ranges.len(), "capture");
        Self {
            text: Arc::from(text.as_ref()),
            len,
            ranges: Arc::from(ranges),
        }
    }

    /// Capture `source`, or an empty snapshot when there is no document.
    pub fn capture_or_empty<S: Spanned + ?Sized>(source: Option<&S>) -> Self {
        source.map(Self::capture).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Spanned for StyleRangeSnapshot {
    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }

    fn len_chars(&self) -> usize {
        self.len
    }

    fn ranges(&self) -> &[StyleRange] {
        &self.ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SpanFlags, SpanId, SpannedText, Style, StyleFilter};
    use pretty_assertions::assert_eq;

    #[test]
    fn absent_document_yields_empty_snapshot() {
        let snap = StyleRangeSnapshot::capture_or_empty::<SpannedText>(None);
        assert_eq!(snap, StyleRangeSnapshot::empty());
        assert!(snap.is_empty());
        assert!(snap.ranges().is_empty());
    }

    #[test]
    fn from_parts_rejects_out_of_bounds() {
        let bad = StyleRange::new(SpanId(1), Style::Bold, 2, 9, SpanFlags::default());
        let err = StyleRangeSnapshot::from_parts("abc", vec![bad]).unwrap_err();
        assert_eq!(err, SpanError::OutOfBounds { start: 2, end: 9, len: 3 });
    }

    #[test]
    fn capture_is_isolated_from_later_edits() {
        let mut live = SpannedText::new("Hello");
        live.set_span(Style::Bold, 0, 5, SpanFlags::EXCLUSIVE_EXCLUSIVE).unwrap();
        let snap = StyleRangeSnapshot::capture(&live);

        live.insert(5, " World").unwrap();
        live.set_span(Style::Italic, 6, 11, SpanFlags::default()).unwrap();

        assert_eq!(snap.as_str(), "Hello");
        assert_eq!(snap.ranges().len(), 1);
        assert_eq!(snap.ranges()[0].end, 5);
        assert_eq!(live.ranges().len(), 2);
    }

    #[test]
    fn lengths_count_chars_not_bytes() {
        let snap = StyleRangeSnapshot::from_text("héllo");
        assert_eq!(snap.len_chars(), 5);
        let q = snap.query_ranges(0, 100, &StyleFilter::Any);
        assert!(q.is_empty());
    }
}
