//! Fill timings for lyric tokens the ASR never matched.
//!
//! Timed entries are anchors. Untimed runs are filled from their neighbours:
//!
//! - between two anchors, the gap from the earlier anchor's end to the later
//!   anchor's begin is cut into `m + 1` equal slots for a run of `m` tokens,
//!   and token `k` takes slot `k` (so a lone missing token takes the first
//!   half of the gap)
//! - after the last anchor, tokens are chained forward in fixed-length slots
//! - before the first anchor, tokens are chained backward in fixed-length
//!   slots, clamped at 0 s

use crate::types::AlignmentEntry;

/// What an interpolation pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Number of entries that received synthetic timings
    Filled(usize),
    /// There were untimed entries but no timed entry to anchor them.
    NoAnchor,
}

fn set_timing(entry: &mut AlignmentEntry, begin: f64, end: f64) {
    entry.begin = Some(begin);
    entry.end = Some(end);
    entry.interpolated = true;
}

/// Fill every untimed entry. `fallback_duration` is the slot length used
/// outside the anchored span.
pub fn interpolate(entries: &mut [AlignmentEntry], fallback_duration: f64) -> Interpolation {
    let anchors: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_timed())
        .map(|(i, _)| i)
        .collect();

    if anchors.len() == entries.len() {
        return Interpolation::Filled(0);
    }
    let (Some(&first), Some(&last)) = (anchors.first(), anchors.last()) else {
        return Interpolation::NoAnchor;
    };

    let mut filled = 0usize;

    // Leading run, walked backwards from the first anchor
    let mut next_begin = entries[first].begin.unwrap_or(0.0);
    for entry in entries[..first].iter_mut().rev() {
        let end = next_begin;
        let begin = (end - fallback_duration).max(0.0).min(end);
        set_timing(entry, begin, end);
        next_begin = begin;
        filled += 1;
    }

    // Runs between consecutive anchors
    for pair in anchors.windows(2) {
        let (p, n) = (pair[0], pair[1]);
        let missing = n - p - 1;
        if missing == 0 {
            continue;
        }
        let gap_start = entries[p].end.unwrap_or(0.0);
        let gap_end = entries[n].begin.unwrap_or(gap_start);
        let slot = (gap_end - gap_start).max(0.0) / (missing + 1) as f64;

        for k in 1..=missing {
            let begin = gap_start + (k - 1) as f64 * slot;
            let end = gap_start + k as f64 * slot;
            set_timing(&mut entries[p + k], begin, end);
            filled += 1;
        }
    }

    // Trailing run, chained forward from the last anchor
    let mut prev_end = entries[last].end.unwrap_or(0.0);
    for entry in entries[last + 1..].iter_mut() {
        let begin = prev_end;
        let end = begin + fallback_duration;
        set_timing(entry, begin, end);
        prev_end = end;
        filled += 1;
    }

    Interpolation::Filled(filled)
}
