//! Rich-text editing model.
//!
//! `RichTextEditor` is a concrete `DocumentSurface`: it owns a live
//! `SpannedText`, tracks the selection, and reports every logical edit
//! (typing, effect toggles, clearing formatting, links, images) as a
//! `ChangeEvent` unless notifications are suppressed.
//!
//! `EditorModel` keeps the open editors keyed by `DocumentId` and routes
//! their events into one shared `OperationManager`. Closing a document
//! discards its history.
//!
//! Invariants (after every public call):
//! * `active`, when set, names a registered editor.
//! * No editor is left suppressed; replay suppression is scoped to the
//!   undo/redo call.

mod editor;
mod model;

pub use editor::{OBJECT_REPLACEMENT, RichTextEditor};
pub use model::EditorModel;
