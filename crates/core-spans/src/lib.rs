//! Formatted text model: style ranges over a character sequence.
//!
//! Two containers share one read interface (`Spanned`):
//! - `SpannedText` is the live, mutable document buffer (rope-backed). Edits
//!   shift, extend or drop ranges according to their point/mark flags.
//! - `StyleRangeSnapshot` is a frozen value copy used by undo history. Once
//!   captured it never observes later edits to the buffer it came from.
//!
//! Offsets are character (Unicode scalar) offsets, never bytes. A range
//! always satisfies `start <= end <= len`.
//!
//! Lookup rules (`query_ranges`, `next_transition`) live in `query` so that
//! both containers answer identically.

use std::borrow::Cow;

use thiserror::Error;

pub mod buffer;
pub mod flags;
pub mod query;
pub mod range;
pub mod snapshot;
pub mod style;

pub use buffer::SpannedText;
pub use flags::SpanFlags;
pub use range::{SpanId, StyleRange};
pub use snapshot::StyleRangeSnapshot;
pub use style::{Alignment, Style, StyleFilter, StyleKind};

/// Errors raised when a caller addresses text or ranges that do not exist.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpanError {
    #[error("range {start}..{end} exceeds text length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("inverted range {start}..{end}")]
    Inverted { start: usize, end: usize },
    #[error("unknown span {0:?}")]
    UnknownSpan(SpanId),
}

/// Validate `start..end` against a text of `len` characters.
pub(crate) fn check_range(start: usize, end: usize, len: usize) -> Result<(), SpanError> {
    if start > end {
        return Err(SpanError::Inverted { start, end });
    }
    if end > len {
        return Err(SpanError::OutOfBounds { start, end, len });
    }
    Ok(())
}

/// Read access to text plus its style ranges.
pub trait Spanned {
    /// Full text content.
    fn text(&self) -> Cow<'_, str>;
    /// Length in characters.
    fn len_chars(&self) -> usize;
    /// All ranges in insertion order.
    fn ranges(&self) -> &[StyleRange];

    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Text with all formatting dropped.
    fn plain_text(&self) -> String {
        self.text().into_owned()
    }

    /// Ranges overlapping `[start, end]` that match `filter`, priority ordered.
    fn query_ranges(&self, start: usize, end: usize, filter: &StyleFilter) -> Vec<&StyleRange> {
        query::query_ranges(self.ranges(), start, end, filter)
    }

    /// Nearest range boundary strictly inside `(start, limit)`, else `limit`.
    fn next_transition(&self, start: usize, limit: usize, filter: &StyleFilter) -> usize {
        query::next_transition(self.ranges(), start, limit, filter)
    }

    fn span(&self, id: SpanId) -> Option<&StyleRange> {
        self.ranges().iter().rev().find(|r| r.id == id)
    }

    fn span_start(&self, id: SpanId) -> Option<usize> {
        self.span(id).map(|r| r.start)
    }

    fn span_end(&self, id: SpanId) -> Option<usize> {
        self.span(id).map(|r| r.end)
    }

    fn span_flags(&self, id: SpanId) -> Option<SpanFlags> {
        self.span(id).map(|r| r.flags)
    }
}
