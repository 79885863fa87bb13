use serde::{Deserialize, Serialize};

/// A word emitted by speech recognition, with timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AsrToken {
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds (never before `start`)
    pub end: f64,
    /// Recognizer word score, when the transcript carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl AsrToken {
    /// Build a token, clamping `end` so the interval is never inverted.
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        let start = start.max(0.0);
        Self {
            text: text.into(),
            start,
            end: end.max(start),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// A word from the canonical lyrics. Carries no timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LyricToken {
    pub text: String,
    /// Position in reading order
    pub index: usize,
    /// Last token of a lyrics line
    #[serde(default)]
    pub line_end: bool,
}

/// Timing for one lyric token, as handed to subtitle/video renderers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlignmentEntry {
    pub text: String,
    pub index: usize,
    pub begin: Option<f64>,
    pub end: Option<f64>,
    pub matched_asr_indices: Vec<usize>,
    pub interpolated: bool,
    #[serde(default)]
    pub line_end: bool,
    /// Normalized text cost of the mapping, when the token was matched
    #[serde(default)]
    pub cost: Option<f64>,
}

impl AlignmentEntry {
    /// An untimed entry for `token`.
    pub fn unaligned(token: &LyricToken) -> Self {
        Self {
            text: token.text.clone(),
            index: token.index,
            begin: None,
            end: None,
            matched_asr_indices: Vec::new(),
            interpolated: false,
            line_end: token.line_end,
            cost: None,
        }
    }

    pub fn is_timed(&self) -> bool {
        self.begin.is_some() && self.end.is_some()
    }

    /// Duration in seconds, if timed.
    pub fn duration(&self) -> Option<f64> {
        match (self.begin, self.end) {
            (Some(b), Some(e)) => Some(e - b),
            _ => None,
        }
    }
}

/// Recoverable conditions reported alongside an alignment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Diagnostic {
    /// The ASR or lyric sequence was empty.
    EmptyInput,
    /// The search never reached the terminal state.
    NoAlignmentPath,
    /// No lyric token was matched, so nothing could be interpolated.
    NoInterpolationAnchor,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Diagnostic::EmptyInput => "empty input: no ASR tokens or no lyric tokens",
            Diagnostic::NoAlignmentPath => "no alignment path reached the terminal state",
            Diagnostic::NoInterpolationAnchor => "no lyric token was aligned; timings left empty",
        };
        f.write_str(msg)
    }
}

/// Overall outcome of a non-fatal alignment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Warning,
}

/// Output of the alignment engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlignmentResult {
    /// One entry per lyric token, in reading order
    pub entries: Vec<AlignmentEntry>,
    /// Cost of the optimal path, if one was found
    pub total_cost: Option<f64>,
    pub diagnostics: Vec<Diagnostic>,
}

impl AlignmentResult {
    pub fn status(&self) -> Status {
        if self.diagnostics.is_empty() {
            Status::Success
        } else {
            Status::Warning
        }
    }

    pub fn has(&self, diagnostic: Diagnostic) -> bool {
        self.diagnostics.contains(&diagnostic)
    }

    /// Number of entries matched directly to ASR tokens.
    pub fn matched_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.matched_asr_indices.is_empty())
            .count()
    }

    /// Number of entries whose timing was interpolated.
    pub fn interpolated_count(&self) -> usize {
        self.entries.iter().filter(|e| e.interpolated).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asr_token_clamps_inverted_interval() {
        let t = AsrToken::new("hey", 1.0, 0.5);
        assert!((t.start - 1.0).abs() < f64::EPSILON);
        assert!((t.end - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_asr_token_clamps_negative_start() {
        let t = AsrToken::new("hey", -0.2, 0.5);
        assert_eq!(t.start, 0.0);
        assert!((t.end - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unaligned_entry() {
        let token = LyricToken { text: "love".into(), index: 3, line_end: true };
        let e = AlignmentEntry::unaligned(&token);
        assert_eq!(e.index, 3);
        assert!(e.line_end);
        assert!(!e.is_timed());
        assert!(e.duration().is_none());
        assert!(!e.interpolated);
    }

    #[test]
    fn test_entry_serializes_nulls() {
        let token = LyricToken { text: "love".into(), index: 0, line_end: false };
        let json = serde_json::to_value(AlignmentEntry::unaligned(&token)).unwrap();
        assert!(json["begin"].is_null());
        assert!(json["end"].is_null());
        assert_eq!(json["matched_asr_indices"], serde_json::json!([]));
        assert_eq!(json["interpolated"], serde_json::json!(false));
    }

    #[test]
    fn test_diagnostic_serde_names() {
        let json = serde_json::to_string(&Diagnostic::NoInterpolationAnchor).unwrap();
        assert_eq!(json, "\"no_interpolation_anchor\"");
    }

    #[test]
    fn test_result_status() {
        let mut result = AlignmentResult {
            entries: vec![],
            total_cost: Some(0.0),
            diagnostics: vec![],
        };
        assert_eq!(result.status(), Status::Success);
        result.diagnostics.push(Diagnostic::EmptyInput);
        assert_eq!(result.status(), Status::Warning);
        assert!(result.has(Diagnostic::EmptyInput));
    }
}
