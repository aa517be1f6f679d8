use std::collections::VecDeque;

use tracing::trace;

use crate::Operation;

/// Bounded LIFO of operations. The oldest entry is evicted when full.
#[derive(Debug, Clone)]
pub struct OperationStack {
    entries: VecDeque<Operation>,
    capacity: usize,
}

impl OperationStack {
    /// `capacity` is clamped to at least one entry.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push on top. Returns the evicted bottom entry when the stack was full.
    pub fn push(&mut self, op: Operation) -> Option<Operation> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        if evicted.is_some() {
            trace!(target: "history.stack", capacity = self.capacity, "stack_trimmed");
        }
        self.entries.push_back(op);
        evicted
    }

    pub fn pop(&mut self) -> Option<Operation> {
        self.entries.pop_back()
    }

    pub fn peek(&self) -> Option<&Operation> {
        self.entries.back()
    }

    /// Oldest surviving entry.
    pub fn bottom(&self) -> Option<&Operation> {
        self.entries.front()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Operation> {
        self.entries.iter()
    }
}
