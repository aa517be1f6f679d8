//! Undo / redo history for rich-text documents.
//!
//! One `OperationManager` serves any number of open documents, each keyed by
//! a `DocumentId`. Every document owns an undo stack and a redo stack of
//! `Operation`s; an operation pairs a before/after `StyleRangeSnapshot` with
//! the selection on either side of the edit.
//!
//! Coalescing:
//! - Operations recorded less than `HistoryLimits::merge_window` apart (300ms
//!   by default) fuse into a single undo step: the fused operation starts at
//!   the oldest member's before-state and ends at the newest member's
//!   after-state. A typing burst therefore undoes in one step.
//! - Fusing happens once, when the operation is recorded. Stack entries never
//!   change afterwards, so undo and redo always move exactly one entry.
//!
//! Capacity:
//! - Each stack holds at most `HistoryLimits::max_operations` (50 by default).
//!   Pushing beyond that silently evicts the oldest entry. This bounds memory
//!   for long sessions; it is not reported to callers.
//!
//! Replay:
//! - Undo/redo write a snapshot back into a `DocumentSurface` while the
//!   surface's change notifications are suppressed (`SuppressedSurface`), so
//!   replaying history never records new history.

use std::time::Duration;

pub mod manager;
pub mod operation;
pub mod stack;
pub mod surface;

pub use manager::{HistoryState, OperationManager};
pub use operation::Operation;
pub use stack::OperationStack;
pub use surface::{DocumentSurface, SuppressedSurface};

/// Default per-document stack capacity.
pub const MAX_OPERATIONS: usize = 50;

/// Default coalescing window.
pub const MERGE_WINDOW: Duration = Duration::from_millis(300);

/// Stable identity of an open document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

/// Selection bounds in character offsets. `start > end` is allowed (backwards selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// `(min, max)` of the two ends.
    pub fn ordered(&self) -> (usize, usize) {
        (self.start.min(self.end), self.start.max(self.end))
    }

    /// Clamp both ends into `0..=len`, preserving direction.
    pub fn clamp_to(self, len: usize) -> Self {
        Self {
            start: self.start.min(len),
            end: self.end.min(len),
        }
    }
}

/// Tunables for `OperationManager`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimits {
    pub max_operations: usize,
    pub merge_window: Duration,
    /// Drop operations whose before and after state are identical.
    pub skip_unchanged: bool,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            max_operations: MAX_OPERATIONS,
            merge_window: MERGE_WINDOW,
            skip_unchanged: true,
        }
    }
}

impl HistoryLimits {
    /// Capacity is clamped to at least one entry.
    pub fn new(max_operations: usize, merge_window: Duration, skip_unchanged: bool) -> Self {
        Self {
            max_operations: max_operations.max(1),
            merge_window,
            skip_unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_clamp_preserves_direction() {
        let sel = Selection::new(9, 2).clamp_to(5);
        assert_eq!(sel, Selection::new(5, 2));
        assert_eq!(sel.ordered(), (2, 5));
    }

    #[test]
    fn limits_clamp_zero_capacity() {
        let limits = HistoryLimits::new(0, MERGE_WINDOW, false);
        assert_eq!(limits.max_operations, 1);
    }

    #[test]
    fn defaults_match_documented_values() {
        let limits = HistoryLimits::default();
        assert_eq!(limits.max_operations, 50);
        assert_eq!(limits.merge_window, Duration::from_millis(300));
    }
}
