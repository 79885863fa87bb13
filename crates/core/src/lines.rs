//! Group timed lyric entries into display lines for subtitle renderers.

use serde::{Deserialize, Serialize};

use crate::types::AlignmentEntry;

/// One lyrics line with its time span.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LyricLine {
    pub line_number: usize,
    /// Words joined with single spaces
    pub text: String,
    /// Earliest word begin (seconds)
    pub start: f64,
    /// Latest word end (seconds)
    pub end: f64,
    pub words: Vec<AlignmentEntry>,
}

fn close_line(words: Vec<AlignmentEntry>, lines: &mut Vec<LyricLine>) {
    if words.is_empty() {
        return;
    }
    let start = words
        .iter()
        .filter_map(|w| w.begin)
        .fold(f64::INFINITY, f64::min);
    let end = words
        .iter()
        .filter_map(|w| w.end)
        .fold(f64::NEG_INFINITY, f64::max);
    let text = words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    lines.push(LyricLine {
        line_number: lines.len(),
        text,
        start,
        end,
        words,
    });
}

/// Split entries into lines at `line_end` markers.
///
/// Entries without timing are left out entirely, including their
/// `line_end` marker. A trailing run without a marker still forms a final line.
pub fn group_into_lines(entries: &[AlignmentEntry]) -> Vec<LyricLine> {
    let mut lines = Vec::new();
    let mut current = Vec::new();

    for entry in entries {
        if !entry.is_timed() {
            continue;
        }
        current.push(entry.clone());
        if entry.line_end {
            close_line(std::mem::take(&mut current), &mut lines);
        }
    }
    close_line(current, &mut lines);

    lines
}
