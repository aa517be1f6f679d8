//! Applies parsed script commands to an `EditorModel`.

use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use core_history::{DocumentId, DocumentSurface};
use core_model::{EditorModel, RichTextEditor};
use core_spans::Spanned;
use tracing::{debug, info};

use crate::script::ScriptCommand;

pub struct ScriptRunner<W: Write> {
    model: EditorModel,
    out: W,
    executed: usize,
}

impl<W: Write> ScriptRunner<W> {
    pub fn new(model: EditorModel, out: W) -> Self {
        Self {
            model,
            out,
            executed: 0,
        }
    }

    pub fn model(&self) -> &EditorModel {
        &self.model
    }

    pub fn into_parts(self) -> (EditorModel, W) {
        (self.model, self.out)
    }

    pub fn run(&mut self, commands: &[ScriptCommand]) -> Result<()> {
        for (idx, cmd) in commands.iter().enumerate() {
            self.step(cmd)
                .with_context(|| format!("command #{} ({cmd:?})", idx + 1))?;
            self.executed += 1;
        }
        info!(target: "runtime", executed = self.executed, "script_complete");
        Ok(())
    }

    fn step(&mut self, cmd: &ScriptCommand) -> Result<()> {
        debug!(target: "runtime", ?cmd, "step");
        match cmd {
            ScriptCommand::Open(id) => {
                self.model.register(*id, "")?;
                self.model.set_active(*id)?;
            }
            ScriptCommand::Use(id) => self.model.set_active(*id)?,
            ScriptCommand::Type(text) => {
                // One event per char, the way keystrokes arrive.
                let editor = self.model.active_editor_mut()?;
                for ch in text.chars() {
                    editor.replace_selection(ch.encode_utf8(&mut [0; 4]))?;
                }
            }
            ScriptCommand::Select(start, end) => self.model.active_editor_mut()?.select(*start, *end),
            ScriptCommand::Backspace => {
                self.model.active_editor_mut()?.delete_backward()?;
            }
            ScriptCommand::Effect { style, enabled } => {
                self.model
                    .active_editor_mut()?
                    .apply_effect(style.clone(), *enabled)?;
            }
            ScriptCommand::Link(url) => {
                self.model.active_editor_mut()?.set_link(url)?;
            }
            ScriptCommand::Unlink => {
                self.model.active_editor_mut()?.remove_link()?;
            }
            ScriptCommand::Image(path) => {
                self.model.active_editor_mut()?.insert_image(path)?;
            }
            ScriptCommand::ClearFormatting => {
                self.model.active_editor_mut()?.clear_formatting()?;
            }
            ScriptCommand::Wait(ms) => thread::sleep(Duration::from_millis(*ms)),
            ScriptCommand::Undo => {
                let id = self.active()?;
                if !self.model.undo(id)? {
                    debug!(target: "runtime", doc = id.0, "nothing_to_undo");
                }
            }
            ScriptCommand::Redo => {
                let id = self.active()?;
                if !self.model.redo(id)? {
                    debug!(target: "runtime", doc = id.0, "nothing_to_redo");
                }
            }
            ScriptCommand::Close { id, saved } => {
                let editor = self
                    .model
                    .unregister(*id, *saved)
                    .with_context(|| format!("document {} is not open", id.0))?;
                writeln!(self.out, "closed {} ({})", id.0, if *saved { "saved" } else { "discarded" })?;
                if !saved {
                    debug!(target: "runtime", doc = id.0, len = editor.plain_text().len(), "discarded");
                }
            }
            ScriptCommand::Print => {
                let id = self.active()?;
                self.print_document(id)?;
            }
        }
        Ok(())
    }

    fn active(&self) -> Result<DocumentId> {
        self.model.active_id().context("no active document")
    }

    /// Write every open document, in id order.
    pub fn print_all(&mut self) -> Result<()> {
        let ids: Vec<DocumentId> = self.model.editors().map(RichTextEditor::id).collect();
        for id in ids {
            self.print_document(id)?;
        }
        Ok(())
    }

    fn print_document(&mut self, id: DocumentId) -> Result<()> {
        let state = self.model.history_state(id);
        let editor = self
            .model
            .editor(id)
            .with_context(|| format!("document {} is not open", id.0))?;
        let sel = editor.selection();
        writeln!(
            self.out,
            "[{}] {:?} selection={}..{} history={:?}",
            id.0,
            editor.plain_text(),
            sel.start,
            sel.end,
            state
        )?;
        for range in editor.text().ranges() {
            writeln!(self.out, "    {}..{} {:?}", range.start, range.end, range.style)?;
        }
        Ok(())
    }
}
