//! Change notifications emitted by live documents.
//!
//! A document reports each completed logical edit (typing, an effect toggle,
//! clearing formatting, inserting media) as one `ChangeEvent` carrying the
//! before/after snapshots and selections. Whoever owns the undo history turns
//! events into operations via `ChangeEvent::into_operation`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use core_history::{DocumentId, Operation, Selection};
use core_spans::StyleRangeSnapshot;
use crossbeam_channel::{Receiver, Sender};

// -------------------------------------------------------------------------------------------------
// Telemetry
// -------------------------------------------------------------------------------------------------
// Relaxed atomic counters; inspected by tests and logged by the binary on exit.
// -------------------------------------------------------------------------------------------------
pub static CHANGE_EVENTS_EMITTED: AtomicU64 = AtomicU64::new(0);
pub static CHANGE_EVENTS_SUPPRESSED: AtomicU64 = AtomicU64::new(0); // edits applied while notifications were off
pub static CHANGE_SEND_FAILURES: AtomicU64 = AtomicU64::new(0); // receiver dropped

/// What kind of edit produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Text,
    Effect,
    ClearFormatting,
    Media,
}

/// One completed logical edit of a document.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub document: DocumentId,
    pub kind: ChangeKind,
    pub before: StyleRangeSnapshot,
    pub after: StyleRangeSnapshot,
    pub selection_before: Selection,
    pub selection_after: Selection,
    pub at: Instant,
}

impl ChangeEvent {
    pub fn into_operation(self) -> Operation {
        Operation::new_at(
            self.before,
            self.after,
            self.selection_before,
            self.selection_after,
            self.at,
        )
    }
}

/// Receives change events from a document. Implementations should not block.
pub trait ChangeListener: Send {
    fn on_change(&self, event: ChangeEvent);
}

/// Discards every event.
pub struct NoopChangeListener;

impl ChangeListener for NoopChangeListener {
    fn on_change(&self, _event: ChangeEvent) {}
}

/// Forwards events into a crossbeam channel.
#[derive(Clone)]
pub struct ChannelChangeListener {
    tx: Sender<ChangeEvent>,
}

impl ChannelChangeListener {
    pub fn new(tx: Sender<ChangeEvent>) -> Self {
        Self { tx }
    }
}

impl ChangeListener for ChannelChangeListener {
    fn on_change(&self, event: ChangeEvent) {
        let document = event.document.0;
        if self.tx.send(event).is_err() {
            CHANGE_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(target: "events.change", document, "change_send_failed");
        }
    }
}

/// Unbounded listener/receiver pair. Events are buffered until drained.
pub fn change_channel() -> (ChannelChangeListener, Receiver<ChangeEvent>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (ChannelChangeListener::new(tx), rx)
}

/// Record that an event was emitted (telemetry + trace).
pub fn note_emitted(event: &ChangeEvent) {
    CHANGE_EVENTS_EMITTED.fetch_add(1, Ordering::Relaxed);
    tracing::trace!(
        target: "events.change",
        document = event.document.0,
        kind = ?event.kind,
        before_len = event.before.as_str().len(),
        after_len = event.after.as_str().len(),
        "change_emitted"
    );
}

/// Record that an edit happened while notifications were suppressed.
pub fn note_suppressed(document: DocumentId) {
    CHANGE_EVENTS_SUPPRESSED.fetch_add(1, Ordering::Relaxed);
    tracing::trace!(target: "events.change", document = document.0, "change_suppressed");
}
