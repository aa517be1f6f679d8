//! The document seen from the history side.

use std::ops::{Deref, DerefMut};

use anyhow::Result;
use core_spans::StyleRangeSnapshot;
use tracing::trace;

use crate::Selection;

/// A live document that history can read from and write back into.
///
/// Implementors must not report changes made while suppressed; otherwise
/// replaying an operation would record a new one.
pub trait DocumentSurface {
    fn capture_snapshot(&self) -> StyleRangeSnapshot;
    fn apply_snapshot(&mut self, snapshot: &StyleRangeSnapshot) -> Result<()>;
    fn selection(&self) -> Selection;
    fn set_selection(&mut self, selection: Selection);
    fn suppress_changes(&mut self);
    fn resume_changes(&mut self);
}

/// Suppresses change notifications for its lifetime.
///
/// Resuming happens in `Drop`, so it runs on early returns and unwinding too.
pub struct SuppressedSurface<'a, S: DocumentSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: DocumentSurface + ?Sized> SuppressedSurface<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.suppress_changes();
        trace!(target: "history.surface", "changes_suppressed");
        Self { surface }
    }
}

impl<S: DocumentSurface + ?Sized> Deref for SuppressedSurface<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: DocumentSurface + ?Sized> DerefMut for SuppressedSurface<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: DocumentSurface + ?Sized> Drop for SuppressedSurface<'_, S> {
    fn drop(&mut self) {
        self.surface.resume_changes();
        trace!(target: "history.surface", "changes_resumed");
    }
}
