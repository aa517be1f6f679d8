//! Range lookup shared by the live buffer and snapshots.

use crate::{StyleFilter, StyleRange};

/// Ranges overlapping `[start, end]` that match `filter`.
///
/// Boundary rule: a range touching the query only at one edge is excluded
/// when both the range and the query are non-empty. Zero-length ranges and
/// zero-length queries match on touch.
///
/// Ordering: zero-priority ranges keep insertion order. A range with a
/// non-zero priority is placed before the first collected range whose
/// priority is strictly lower.
pub fn query_ranges<'a>(
    ranges: &'a [StyleRange],
    start: usize,
    end: usize,
    filter: &StyleFilter,
) -> Vec<&'a StyleRange> {
    let mut out: Vec<&StyleRange> = Vec::new();
    if start > end {
        return out;
    }
    for range in ranges {
        if !filter.matches(&range.style) {
            continue;
        }
        if range.start > end || range.end < start {
            continue;
        }
        if range.start != range.end && start != end && (range.start == end || range.end == start) {
            continue;
        }

        let priority = range.flags.priority();
        if priority == 0 || out.is_empty() {
            out.push(range);
        } else {
            let at = out
                .iter()
                .position(|collected| priority > collected.flags.priority())
                .unwrap_or(out.len());
            out.insert(at, range);
        }
    }
    out
}

/// Shrink `limit` to the nearest range boundary strictly between `start` and `limit`.
pub fn next_transition(
    ranges: &[StyleRange],
    start: usize,
    mut limit: usize,
    filter: &StyleFilter,
) -> usize {
    for range in ranges.iter().filter(|r| filter.matches(&r.style)) {
        if range.start > start && range.start < limit {
            limit = range.start;
        }
        if range.end > start && range.end < limit {
            limit = range.end;
        }
    }
    limit
}
