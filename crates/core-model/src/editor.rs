//! A rich-text document surface.

use std::time::Instant;

use anyhow::Result;
use core_events::{ChangeEvent, ChangeKind, ChangeListener, NoopChangeListener, note_emitted, note_suppressed};
use core_history::{DocumentId, DocumentSurface, Selection, SuppressedSurface};
use core_spans::{
    SpanError, SpanFlags, SpanId, Spanned, SpannedText, Style, StyleFilter, StyleKind, StyleRange,
    StyleRangeSnapshot,
};
use tracing::trace;

/// Placeholder character carrying an `Image` range.
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// Live document: text, ranges, selection and change reporting.
///
/// Each public edit is one logical change and produces at most one
/// `ChangeEvent`. Nothing is reported while changes are suppressed or when
/// the edit left text, ranges and selection untouched.
pub struct RichTextEditor {
    id: DocumentId,
    text: SpannedText,
    selection: Selection,
    suppressed: bool,
    changed: bool,
    listener: Box<dyn ChangeListener>,
}

impl RichTextEditor {
    pub fn new(id: DocumentId, content: &str) -> Self {
        let text = SpannedText::new(content);
        let end = text.len_chars();
        Self {
            id,
            text,
            selection: Selection::caret(end),
            suppressed: false,
            changed: false,
            listener: Box::new(NoopChangeListener),
        }
    }

    pub fn with_listener(mut self, listener: impl ChangeListener + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    pub fn set_listener(&mut self, listener: Box<dyn ChangeListener>) {
        self.listener = listener;
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn text(&self) -> &SpannedText {
        &self.text
    }

    pub fn plain_text(&self) -> String {
        self.text.plain_text()
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Content changed since construction or the last `reset_has_changed`.
    pub fn has_changed(&self) -> bool {
        self.changed
    }

    pub fn reset_has_changed(&mut self) {
        self.changed = false;
    }

    /// Replace the whole content without recording history (e.g. loading a file).
    pub fn load(&mut self, content: &str) -> Result<()> {
        {
            let mut surface = SuppressedSurface::new(self);
            surface.apply_snapshot(&StyleRangeSnapshot::from_text(content))?;
            let end = surface.text.len_chars();
            surface.set_selection(Selection::caret(end));
        }
        self.changed = false;
        Ok(())
    }

    /// Move the selection. Ends are clamped to the text.
    pub fn select(&mut self, start: usize, end: usize) {
        self.selection = Selection::new(start, end).clamp_to(self.text.len_chars());
    }

    /// Replace the selection with `text`, leaving the caret after it.
    pub fn replace_selection(&mut self, text: &str) -> Result<bool> {
        let (start, end) = self.selection.ordered();
        self.edit(ChangeKind::Text, |buf, sel| {
            buf.replace(start, end, text)?;
            *sel = Selection::caret(start + text.chars().count());
            Ok(())
        })
    }

    pub fn insert(&mut self, at: usize, text: &str) -> Result<bool> {
        self.edit(ChangeKind::Text, |buf, sel| {
            buf.insert(at, text)?;
            *sel = Selection::caret(at + text.chars().count());
            Ok(())
        })
    }

    pub fn delete(&mut self, start: usize, end: usize) -> Result<bool> {
        self.edit(ChangeKind::Text, |buf, sel| {
            buf.delete(start, end)?;
            *sel = Selection::caret(start);
            Ok(())
        })
    }

    /// Delete the selection, or the character before the caret.
    pub fn delete_backward(&mut self) -> Result<bool> {
        let (start, end) = self.selection.ordered();
        if start != end {
            return self.delete(start, end);
        }
        if start == 0 {
            return Ok(false);
        }
        self.delete(start - 1, start)
    }

    /// Add (`enabled`) or remove `style` over the selection.
    ///
    /// Paragraph styles cover every paragraph touched by the selection.
    /// Character styles need a non-empty selection. Existing ranges of the
    /// same kind are trimmed to the outside of the affected region, so
    /// enabling a valued style (size, color) replaces the old value there.
    pub fn apply_effect(&mut self, style: Style, enabled: bool) -> Result<bool> {
        let kind = style.kind();
        let (start, end) = if kind.is_paragraph() {
            self.paragraph_bounds()
        } else {
            self.selection.ordered()
        };
        if start == end && !kind.is_paragraph() {
            return Ok(false);
        }
        let flags = if kind.is_paragraph() {
            SpanFlags::PARAGRAPH
        } else {
            SpanFlags::EXCLUSIVE_INCLUSIVE
        };
        self.edit(ChangeKind::Effect, |buf, _| {
            strip_kind(buf, kind, start, end)?;
            if enabled {
                buf.set_span(style, start, end, flags)?;
            }
            Ok(())
        })
    }

    /// Remove every formatting style (not links, images or paragraph styles) in the selection.
    pub fn clear_formatting(&mut self) -> Result<bool> {
        let (start, end) = self.selection.ordered();
        if start == end {
            return Ok(false);
        }
        let mut kinds: Vec<StyleKind> = self
            .text
            .query_ranges(start, end, &StyleFilter::Character)
            .into_iter()
            .map(|r| r.style.kind())
            .filter(|k| k.is_formatting())
            .collect();
        kinds.dedup();
        self.edit(ChangeKind::ClearFormatting, |buf, _| {
            for kind in kinds {
                strip_kind(buf, kind, start, end)?;
            }
            Ok(())
        })
    }

    /// Replace the selection with an image placeholder.
    pub fn insert_image(&mut self, source: &str) -> Result<bool> {
        let (start, end) = self.selection.ordered();
        let placeholder = OBJECT_REPLACEMENT.to_string();
        let style = Style::Image(source.to_string());
        self.edit(ChangeKind::Media, |buf, sel| {
            buf.replace(start, end, &placeholder)?;
            buf.set_span(style, start, start + 1, SpanFlags::EXCLUSIVE_EXCLUSIVE)?;
            *sel = Selection::caret(start + 1);
            Ok(())
        })
    }

    /// Link the selected text to `url`, replacing any link already there.
    pub fn set_link(&mut self, url: &str) -> Result<bool> {
        let (start, end) = self.selection.ordered();
        if start == end {
            return Ok(false);
        }
        let style = Style::Link(url.to_string());
        self.edit(ChangeKind::Effect, |buf, _| {
            strip_kind(buf, StyleKind::Link, start, end)?;
            buf.set_span(style, start, end, SpanFlags::EXCLUSIVE_EXCLUSIVE)?;
            Ok(())
        })
    }

    /// Unlink the selection. With a caret, the whole link under it goes.
    pub fn remove_link(&mut self) -> Result<bool> {
        let (start, end) = self.selection.ordered();
        self.edit(ChangeKind::Effect, |buf, _| {
            if start != end {
                return strip_kind(buf, StyleKind::Link, start, end);
            }
            let ids: Vec<SpanId> = buf
                .query_ranges(start, end, &StyleFilter::Kind(StyleKind::Link))
                .into_iter()
                .map(|r| r.id)
                .collect();
            for id in ids {
                buf.remove_span(id);
            }
            Ok(())
        })
    }

    /// Run one logical edit and report it.
    fn edit<F>(&mut self, kind: ChangeKind, f: F) -> Result<bool>
    where
        F: FnOnce(&mut SpannedText, &mut Selection) -> Result<(), SpanError>,
    {
        if self.suppressed {
            f(&mut self.text, &mut self.selection)?;
            self.changed = true;
            note_suppressed(self.id);
            return Ok(true);
        }

        let before = self.text.snapshot();
        let selection_before = self.selection;
        f(&mut self.text, &mut self.selection)?;
        let after = self.text.snapshot();
        if after == before && self.selection == selection_before {
            trace!(target: "model.editor", doc = self.id.0, ?kind, "edit_without_effect");
            return Ok(false);
        }
        self.changed = true;

        let event = ChangeEvent {
            document: self.id,
            kind,
            before,
            after,
            selection_before,
            selection_after: self.selection,
            at: Instant::now(),
        };
        note_emitted(&event);
        self.listener.on_change(event);
        Ok(true)
    }

    /// `[start, end)` covering every paragraph the selection touches.
    fn paragraph_bounds(&self) -> (usize, usize) {
        let (sel_start, sel_end) = self.selection.ordered();
        let chars: Vec<char> = self.text.text().chars().collect();
        let start = chars[..sel_start.min(chars.len())]
            .iter()
            .rposition(|c| *c == '\n')
            .map_or(0, |i| i + 1);
        let end = chars[sel_end.min(chars.len())..]
            .iter()
            .position(|c| *c == '\n')
            .map_or(chars.len(), |i| sel_end + i);
        (start, end)
    }
}

/// Trim ranges of `kind` so none covers `start..end`.
fn strip_kind(buf: &mut SpannedText, kind: StyleKind, start: usize, end: usize) -> Result<(), SpanError> {
    let hits: Vec<StyleRange> = buf
        .query_ranges(start, end, &StyleFilter::Kind(kind))
        .into_iter()
        .cloned()
        .collect();
    for r in hits {
        if r.start < start && r.end > end {
            buf.move_span(r.id, r.start, start)?;
            buf.set_span(r.style, end, r.end, r.flags)?;
        } else if r.start < start {
            buf.move_span(r.id, r.start, start)?;
        } else if r.end > end {
            buf.move_span(r.id, end, r.end)?;
        } else {
            buf.remove_span(r.id);
        }
    }
    Ok(())
}

impl DocumentSurface for RichTextEditor {
    fn capture_snapshot(&self) -> StyleRangeSnapshot {
        self.text.snapshot()
    }

    fn apply_snapshot(&mut self, snapshot: &StyleRangeSnapshot) -> Result<()> {
        self.text.restore(snapshot);
        self.changed = true;
        Ok(())
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamp_to(self.text.len_chars());
    }

    fn suppress_changes(&mut self) {
        self.suppressed = true;
    }

    fn resume_changes(&mut self) {
        self.suppressed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::change_channel;

    fn editor(content: &str) -> RichTextEditor {
        RichTextEditor::new(DocumentId(1), content)
    }

    #[test]
    fn typing_reports_before_and_after() {
        let (listener, rx) = change_channel();
        let mut ed = editor("Hello").with_listener(listener);
        assert!(ed.replace_selection(" World").unwrap());
        let ev = rx.try_recv().unwrap();
        assert_eq!(ev.kind, ChangeKind::Text);
        assert_eq!(ev.before.as_str(), "Hello");
        assert_eq!(ev.after.as_str(), "Hello World");
        assert_eq!(ev.selection_before, Selection::caret(5));
        assert_eq!(ev.selection_after, Selection::caret(11));
        assert!(ed.has_changed());
    }

    #[test]
    fn suppressed_edits_are_not_reported() {
        let (listener, rx) = change_channel();
        let mut ed = editor("abc").with_listener(listener);
        {
            let mut guard = SuppressedSurface::new(&mut ed);
            guard.insert(0, "x").unwrap();
        }
        assert!(rx.try_recv().is_err());
        assert!(!ed.is_suppressed());
        assert_eq!(ed.plain_text(), "xabc");
    }

    #[test]
    fn load_is_silent_and_resets_changed() {
        let (listener, rx) = change_channel();
        let mut ed = editor("").with_listener(listener);
        ed.load("fresh content").unwrap();
        assert!(rx.try_recv().is_err());
        assert!(!ed.has_changed());
        assert_eq!(ed.selection(), Selection::caret(13));
    }

    #[test]
    fn effect_toggle_splits_existing_range() {
        let mut ed = editor("bold text here");
        ed.select(0, 14);
        ed.apply_effect(Style::Bold, true).unwrap();
        ed.select(5, 9);
        ed.apply_effect(Style::Bold, false).unwrap();
        let mut bounds: Vec<_> = ed
            .text()
            .query_ranges(0, 14, &StyleFilter::Kind(StyleKind::Bold))
            .into_iter()
            .map(|r| (r.start, r.end))
            .collect();
        bounds.sort();
        assert_eq!(bounds, vec![(0, 5), (9, 14)]);
    }

    #[test]
    fn character_effect_on_caret_is_noop() {
        let (listener, rx) = change_channel();
        let mut ed = editor("abc").with_listener(listener);
        assert!(!ed.apply_effect(Style::Italic, true).unwrap());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn paragraph_effect_covers_whole_line() {
        let mut ed = editor("first\nsecond line\nthird");
        ed.select(8, 8);
        ed.apply_effect(Style::Bullet, true).unwrap();
        let r = &ed.text().query_ranges(0, 23, &StyleFilter::Paragraph)[0];
        assert_eq!((r.start, r.end), (6, 17));
        assert_eq!(r.flags, SpanFlags::PARAGRAPH);
    }

    #[test]
    fn clear_formatting_keeps_links() {
        let mut ed = editor("styled link");
        ed.select(0, 11);
        ed.apply_effect(Style::Bold, true).unwrap();
        ed.apply_effect(Style::ForegroundColor(0xFF00_00FF), true).unwrap();
        ed.set_link("https://example.org").unwrap();
        ed.clear_formatting().unwrap();
        let kinds: Vec<_> = ed.text().ranges().iter().map(|r| r.style.kind()).collect();
        assert_eq!(kinds, vec![StyleKind::Link]);
    }

    #[test]
    fn image_occupies_one_placeholder() {
        let mut ed = editor("ab");
        ed.select(1, 1);
        ed.insert_image("cat.png").unwrap();
        assert_eq!(ed.plain_text(), format!("a{OBJECT_REPLACEMENT}b"));
        let r = &ed.text().ranges()[0];
        assert_eq!((r.start, r.end), (1, 2));
        assert_eq!(r.style, Style::Image("cat.png".into()));
        ed.delete_backward().unwrap();
        assert!(ed.text().ranges().is_empty());
        assert_eq!(ed.plain_text(), "ab");
    }

    #[test]
    fn unlink_at_caret_removes_whole_link() {
        let mut ed = editor("see docs");
        ed.select(4, 8);
        ed.set_link("https://docs.rs").unwrap();
        ed.select(6, 6);
        assert!(ed.remove_link().unwrap());
        assert!(ed.text().ranges().is_empty());
    }

    #[test]
    fn backspace_at_start_does_nothing() {
        let mut ed = editor("abc");
        ed.select(0, 0);
        assert!(!ed.delete_backward().unwrap());
    }
}
