use std::time::{Duration, Instant};

use anyhow::Result;
use core_spans::{Spanned, StyleRangeSnapshot};

use crate::{DocumentSurface, Selection, SuppressedSurface};

/// One undoable transition of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    before: StyleRangeSnapshot,
    after: StyleRangeSnapshot,
    selection_before: Selection,
    selection_after: Selection,
    timestamp: Instant,
}

impl Operation {
    /// Record a transition that completed now.
    pub fn new(
        before: StyleRangeSnapshot,
        after: StyleRangeSnapshot,
        selection_before: Selection,
        selection_after: Selection,
    ) -> Self {
        Self::new_at(before, after, selection_before, selection_after, Instant::now())
    }

    /// Record a transition that completed at `timestamp`.
    pub fn new_at(
        before: StyleRangeSnapshot,
        after: StyleRangeSnapshot,
        selection_before: Selection,
        selection_after: Selection,
        timestamp: Instant,
    ) -> Self {
        Self {
            before,
            after,
            selection_before,
            selection_after,
            timestamp,
        }
    }

    pub fn before(&self) -> &StyleRangeSnapshot {
        &self.before
    }
    pub fn after(&self) -> &StyleRangeSnapshot {
        &self.after
    }
    pub fn selection_before(&self) -> Selection {
        self.selection_before
    }
    pub fn selection_after(&self) -> Selection {
        self.selection_after
    }
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// True when the two operations were recorded less than `window` apart (either order).
    pub fn can_merge(&self, other: &Operation, window: Duration) -> bool {
        let gap = self
            .timestamp
            .saturating_duration_since(other.timestamp)
            .max(other.timestamp.saturating_duration_since(self.timestamp));
        gap < window
    }

    /// Fuse with an older operation: the result starts where `older` started
    /// and ends where `self` ends. The intermediate state is discarded.
    pub fn merge(self, older: Operation) -> Operation {
        Operation {
            before: older.before,
            selection_before: older.selection_before,
            ..self
        }
    }

    /// Before and after are indistinguishable.
    pub fn is_noop(&self) -> bool {
        self.selection_before == self.selection_after && self.before == self.after
    }

    /// Restore the before-state into `surface`.
    pub fn undo<S: DocumentSurface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        replay(surface, &self.before, self.selection_before)
    }

    /// Restore the after-state into `surface`.
    pub fn redo<S: DocumentSurface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        replay(surface, &self.after, self.selection_after)
    }
}

fn replay<S: DocumentSurface + ?Sized>(
    surface: &mut S,
    snapshot: &StyleRangeSnapshot,
    selection: Selection,
) -> Result<()> {
    let mut surface = SuppressedSurface::new(surface);
    surface.apply_snapshot(snapshot)?;
    surface.set_selection(selection.clamp_to(snapshot.len_chars()));
    Ok(())
}
