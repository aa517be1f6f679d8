//! Multi-document coordination.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use core_events::{ChangeEvent, ChannelChangeListener, change_channel};
use core_history::{DocumentId, HistoryLimits, HistoryState, OperationManager};
use crossbeam_channel::Receiver;
use tracing::{debug, info};

use crate::RichTextEditor;

/// Owns open editors and the single `OperationManager` shared by all of them.
///
/// Editors report edits into a channel; `pump` drains it into history.
/// `undo`/`redo` pump first, so history is always current when replayed.
pub struct EditorModel {
    history: OperationManager,
    editors: BTreeMap<DocumentId, RichTextEditor>,
    active: Option<DocumentId>,
    listener: ChannelChangeListener,
    events: Receiver<ChangeEvent>,
}

impl Default for EditorModel {
    fn default() -> Self {
        Self::new(HistoryLimits::default())
    }
}

impl EditorModel {
    pub fn new(limits: HistoryLimits) -> Self {
        let (listener, events) = change_channel();
        Self {
            history: OperationManager::with_limits(limits),
            editors: BTreeMap::new(),
            active: None,
            listener,
            events,
        }
    }

    pub fn history(&self) -> &OperationManager {
        &self.history
    }

    /// Open a document. The first registered document becomes active.
    pub fn register(&mut self, id: DocumentId, content: &str) -> Result<&mut RichTextEditor> {
        if self.editors.contains_key(&id) {
            bail!("document {} already registered", id.0);
        }
        let editor = RichTextEditor::new(id, content).with_listener(self.listener.clone());
        info!(target: "model.manager", doc = id.0, len = content.len(), "register");
        if self.active.is_none() {
            self.active = Some(id);
        }
        Ok(self.editors.entry(id).or_insert(editor))
    }

    /// Close a document and discard its history. `saved` is informational.
    pub fn unregister(&mut self, id: DocumentId, saved: bool) -> Option<RichTextEditor> {
        self.pump();
        let editor = self.editors.remove(&id)?;
        self.history.forget(id);
        if self.active == Some(id) {
            self.active = self.editors.keys().next().copied();
        }
        info!(target: "model.manager", doc = id.0, saved, changed = editor.has_changed(), "unregister");
        Some(editor)
    }

    /// Close every document.
    pub fn close_all(&mut self, saved: bool) -> Vec<RichTextEditor> {
        let ids: Vec<DocumentId> = self.editors.keys().copied().collect();
        ids.into_iter().filter_map(|id| self.unregister(id, saved)).collect()
    }

    pub fn set_active(&mut self, id: DocumentId) -> Result<()> {
        if !self.editors.contains_key(&id) {
            bail!("document {} is not registered", id.0);
        }
        self.active = Some(id);
        Ok(())
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active
    }

    pub fn editor(&self, id: DocumentId) -> Option<&RichTextEditor> {
        self.editors.get(&id)
    }

    pub fn editor_mut(&mut self, id: DocumentId) -> Option<&mut RichTextEditor> {
        self.editors.get_mut(&id)
    }

    pub fn active_editor_mut(&mut self) -> Result<&mut RichTextEditor> {
        let id = self.active.context("no active document")?;
        self.editors
            .get_mut(&id)
            .with_context(|| format!("active document {} missing", id.0))
    }

    pub fn editors(&self) -> impl Iterator<Item = &RichTextEditor> {
        self.editors.values()
    }

    /// Move pending change events into history. Returns how many were recorded.
    pub fn pump(&mut self) -> usize {
        let mut recorded = 0;
        for event in self.events.try_iter() {
            let doc = event.document;
            if !self.editors.contains_key(&doc) {
                debug!(target: "model.manager", doc = doc.0, "event_for_closed_document_dropped");
                continue;
            }
            self.history.executed(doc, event.into_operation());
            recorded += 1;
        }
        recorded
    }

    pub fn undo(&mut self, id: DocumentId) -> Result<bool> {
        self.pump();
        let editor = self
            .editors
            .get_mut(&id)
            .with_context(|| format!("document {} is not registered", id.0))?;
        self.history.undo(id, editor)
    }

    pub fn redo(&mut self, id: DocumentId) -> Result<bool> {
        self.pump();
        let editor = self
            .editors
            .get_mut(&id)
            .with_context(|| format!("document {} is not registered", id.0))?;
        self.history.redo(id, editor)
    }

    pub fn history_state(&mut self, id: DocumentId) -> HistoryState {
        self.pump();
        self.history.state(id)
    }
}
