//! Raw per-lyric timings from the mapped ASR groups.

use crate::align::backtrace::MappedGroup;
use crate::types::{AlignmentEntry, AsrToken, LyricToken};

/// Build one entry per lyric token.
///
/// A lyric token with a mapped group spans from the earliest start to the
/// latest end of its ASR tokens. Tokens without a group stay untimed.
pub fn aggregate(
    lyrics: &[LyricToken],
    asr: &[AsrToken],
    groups: &[MappedGroup],
) -> Vec<AlignmentEntry> {
    let mut by_lyric: Vec<Option<&MappedGroup>> = vec![None; lyrics.len()];
    for group in groups {
        if let Some(slot) = by_lyric.get_mut(group.lyric_index) {
            if slot.is_none() {
                *slot = Some(group);
            }
        }
    }

    lyrics
        .iter()
        .zip(by_lyric)
        .map(|(token, group)| {
            let mut entry = AlignmentEntry::unaligned(token);
            let Some(group) = group else {
                return entry;
            };
            let Some(span) = asr.get(group.asr.clone()).filter(|s| !s.is_empty()) else {
                return entry;
            };

            let begin = span.iter().map(|t| t.start).fold(f64::INFINITY, f64::min);
            let end = span.iter().map(|t| t.end).fold(f64::NEG_INFINITY, f64::max);
            entry.begin = Some(begin);
            // Tokens deserialized directly may carry end < start
            entry.end = Some(end.max(begin));
            entry.matched_asr_indices = group.asr_indices();
            entry.cost = Some(group.cost);
            entry
        })
        .collect()
}
