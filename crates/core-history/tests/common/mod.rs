#![allow(dead_code)] // Shared across test binaries; each uses a subset.

use anyhow::{Result, bail};
use core_history::{DocumentSurface, Operation, Selection};
use core_spans::{SpannedText, StyleRangeSnapshot};
use std::time::{Duration, Instant};

/// In-memory surface recording how many times suppression was toggled.
pub struct TestSurface {
    pub text: SpannedText,
    pub selection: Selection,
    pub suppressed: bool,
    pub suppress_calls: usize,
    pub resume_calls: usize,
    pub fail_apply: bool,
}

impl TestSurface {
    pub fn new(text: &str) -> Self {
        Self {
            text: SpannedText::new(text),
            selection: Selection::caret(text.chars().count()),
            suppressed: false,
            suppress_calls: 0,
            resume_calls: 0,
            fail_apply: false,
        }
    }

    pub fn snapshot(&self) -> StyleRangeSnapshot {
        self.text.snapshot()
    }
}

impl DocumentSurface for TestSurface {
    fn capture_snapshot(&self) -> StyleRangeSnapshot {
        self.text.snapshot()
    }

    fn apply_snapshot(&mut self, snapshot: &StyleRangeSnapshot) -> Result<()> {
        if self.fail_apply {
            bail!("surface refused snapshot");
        }
        self.text.restore(snapshot);
        Ok(())
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    fn suppress_changes(&mut self) {
        self.suppressed = true;
        self.suppress_calls += 1;
    }

    fn resume_changes(&mut self) {
        self.suppressed = false;
        self.resume_calls += 1;
    }
}

pub fn text_op(before: &str, after: &str, sel_before: Selection, sel_after: Selection, at: Instant) -> Operation {
    Operation::new_at(
        StyleRangeSnapshot::from_text(before),
        StyleRangeSnapshot::from_text(after),
        sel_before,
        sel_after,
        at,
    )
}

/// Operation `vN -> vN+1` stamped `n` seconds after `base` (never mergeable with neighbors).
pub fn versioned_op(n: usize, base: Instant) -> Operation {
    text_op(
        &format!("v{n}"),
        &format!("v{}", n + 1),
        Selection::caret(0),
        Selection::caret(0),
        base + Duration::from_secs(n as u64),
    )
}
