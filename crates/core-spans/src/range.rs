use crate::{SpanFlags, Style};

/// Identity of a range within one document. Stable across snapshots of that document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpanId(pub u64);

/// A formatting attribute applied to `start..end` (character offsets).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleRange {
    pub id: SpanId,
    pub style: Style,
    pub start: usize,
    pub end: usize,
    pub flags: SpanFlags,
}

impl StyleRange {
    pub fn new(id: SpanId, style: Style, start: usize, end: usize, flags: SpanFlags) -> Self {
        Self {
            id,
            style,
            start,
            end,
            flags,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }
}
