//! Per-document undo/redo orchestration.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use tracing::{debug, trace};

use crate::{DocumentId, DocumentSurface, HistoryLimits, Operation, OperationStack};

/// Which stacks of a document currently hold entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    Idle,
    HasUndo,
    HasRedo,
    HasBoth,
}

#[derive(Debug)]
struct History {
    undo: OperationStack,
    redo: OperationStack,
}

impl History {
    fn new(capacity: usize) -> Self {
        Self {
            undo: OperationStack::new(capacity),
            redo: OperationStack::new(capacity),
        }
    }

    fn state(&self) -> HistoryState {
        match (self.undo.is_empty(), self.redo.is_empty()) {
            (true, true) => HistoryState::Idle,
            (false, true) => HistoryState::HasUndo,
            (true, false) => HistoryState::HasRedo,
            (false, false) => HistoryState::HasBoth,
        }
    }
}

/// Undo/redo stacks for every open document behind one lock.
///
/// Unknown document ids are never an error: their stack pair is created on
/// first use. `undo`/`redo` call into the surface while holding the lock, so
/// a surface must not call back into the same manager from
/// `apply_snapshot` / `set_selection`.
pub struct OperationManager {
    limits: HistoryLimits,
    histories: Mutex<HashMap<DocumentId, History>>,
    operations_skipped: AtomicU64,
}

impl Default for OperationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationManager {
    pub fn new() -> Self {
        Self::with_limits(HistoryLimits::default())
    }

    pub fn with_limits(limits: HistoryLimits) -> Self {
        Self {
            limits: HistoryLimits::new(limits.max_operations, limits.merge_window, limits.skip_unchanged),
            histories: Mutex::new(HashMap::new()),
            operations_skipped: AtomicU64::new(0),
        }
    }

    pub fn limits(&self) -> HistoryLimits {
        self.limits
    }

    /// Number of operations dropped because they changed nothing.
    pub fn operations_skipped(&self) -> u64 {
        self.operations_skipped.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<DocumentId, History>> {
        // Every stack mutation completes before the guard drops; a poisoned
        // lock still guards valid stacks.
        self.histories.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a completed edit on `doc`.
    ///
    /// Every predecessor recorded within the merge window is folded into `op`
    /// before it is pushed. Any redo history is discarded, including when an
    /// unchanged operation is skipped.
    pub fn executed(&self, doc: DocumentId, op: Operation) {
        let window = self.limits.merge_window;
        let mut histories = self.lock();
        let history = histories
            .entry(doc)
            .or_insert_with(|| History::new(self.limits.max_operations));
        let redo_cleared = history.redo.len();
        history.redo.clear();

        if self.limits.skip_unchanged && op.is_noop() {
            self.operations_skipped.fetch_add(1, Ordering::Relaxed);
            trace!(target: "history.manager", doc = doc.0, redo_cleared, "operation_noop_skip");
            return;
        }

        let mut op = op;
        let mut merged = 0usize;
        while history.undo.peek().is_some_and(|top| op.can_merge(top, window)) {
            if let Some(previous) = history.undo.pop() {
                op = op.merge(previous);
                merged += 1;
            }
        }
        if let Some(evicted) = history.undo.push(op) {
            debug!(
                target: "history.manager",
                doc = doc.0,
                evicted_len = evicted.before().as_str().len(),
                "undo_evicted"
            );
        }
        trace!(
            target: "history.manager",
            doc = doc.0,
            merged,
            undo_depth = history.undo.len(),
            redo_cleared,
            "executed"
        );
    }

    /// Revert the newest undo entry of `doc` into `surface`.
    ///
    /// Returns `Ok(false)` when there is nothing to undo. If the surface
    /// rejects the snapshot the entry stays on the undo stack.
    pub fn undo<S: DocumentSurface + ?Sized>(&self, doc: DocumentId, surface: &mut S) -> Result<bool> {
        let mut histories = self.lock();
        let history = histories
            .entry(doc)
            .or_insert_with(|| History::new(self.limits.max_operations));
        // `executed` already fused every mergeable neighbour, so one pop is one visible step.
        let Some(op) = history.undo.pop() else {
            trace!(target: "history.manager", doc = doc.0, "undo_empty");
            return Ok(false);
        };
        if let Err(err) = op.undo(surface) {
            history.undo.push(op);
            return Err(err);
        }
        history.redo.push(op);
        trace!(
            target: "history.manager",
            doc = doc.0,
            undo_depth = history.undo.len(),
            redo_depth = history.redo.len(),
            "undo_pop"
        );
        Ok(true)
    }

    /// Re-apply the newest redo entry of `doc` into `surface`.
    pub fn redo<S: DocumentSurface + ?Sized>(&self, doc: DocumentId, surface: &mut S) -> Result<bool> {
        let mut histories = self.lock();
        let history = histories
            .entry(doc)
            .or_insert_with(|| History::new(self.limits.max_operations));
        let Some(op) = history.redo.pop() else {
            trace!(target: "history.manager", doc = doc.0, "redo_empty");
            return Ok(false);
        };
        if let Err(err) = op.redo(surface) {
            history.redo.push(op);
            return Err(err);
        }
        history.undo.push(op);
        trace!(
            target: "history.manager",
            doc = doc.0,
            undo_depth = history.undo.len(),
            redo_depth = history.redo.len(),
            "redo_pop"
        );
        Ok(true)
    }

    /// Discard both stacks of `doc`, keeping the (now empty) entry.
    pub fn flush(&self, doc: DocumentId) {
        let mut histories = self.lock();
        if let Some(history) = histories.get_mut(&doc) {
            history.undo.clear();
            history.redo.clear();
        }
        debug!(target: "history.manager", doc = doc.0, "flush");
    }

    /// Drop everything known about `doc`.
    pub fn forget(&self, doc: DocumentId) {
        let removed = self.lock().remove(&doc).is_some();
        debug!(target: "history.manager", doc = doc.0, removed, "forget");
    }

    pub fn undo_depth(&self, doc: DocumentId) -> usize {
        self.lock().get(&doc).map_or(0, |h| h.undo.len())
    }

    pub fn redo_depth(&self, doc: DocumentId) -> usize {
        self.lock().get(&doc).map_or(0, |h| h.redo.len())
    }

    pub fn can_undo(&self, doc: DocumentId) -> bool {
        self.undo_depth(doc) > 0
    }

    pub fn can_redo(&self, doc: DocumentId) -> bool {
        self.redo_depth(doc) > 0
    }

    pub fn state(&self, doc: DocumentId) -> HistoryState {
        self.lock().get(&doc).map_or(HistoryState::Idle, History::state)
    }

    /// Number of documents with a stack pair.
    pub fn documents(&self) -> usize {
        self.lock().len()
    }

    /// Read both stacks of `doc` (undo, redo). Unknown documents read as empty.
    pub fn inspect<R>(&self, doc: DocumentId, f: impl FnOnce(&OperationStack, &OperationStack) -> R) -> R {
        let histories = self.lock();
        match histories.get(&doc) {
            Some(history) => f(&history.undo, &history.redo),
            None => {
                let empty = History::new(1);
                f(&empty.undo, &empty.redo)
            }
        }
    }
}
