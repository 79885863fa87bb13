//! ASR transcript ingestion.
//!
//! Accepts the word-timestamp JSON produced by Whisper-style recognizers:
//!
//! - `{"segments": [{"words": [{"word", "start", "end"}, ...]}, ...]}`
//! - `{"word_segments": [...]}` or `{"words": [...]}` (flat word list)
//! - a bare array of words
//!
//! `begin` is accepted in place of `start`, and a `score` (or `confidence`)
//! is kept as the token's confidence. Words without numeric timing, or with
//! no word-like text, are dropped without error.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::error::AlignError;
use crate::text::normalize_word;
use crate::types::AsrToken;

/// Convert one JSON word object into a token, if it is usable.
fn word_to_token(w: &Value) -> Option<AsrToken> {
    let raw = w["word"].as_str().or_else(|| w["text"].as_str())?;
    let start = w["start"].as_f64().or_else(|| w["begin"].as_f64())?;
    let end = w["end"].as_f64()?;

    let text = normalize_word(raw);
    if text.is_empty() {
        return None;
    }
    let token = AsrToken::new(text, start, end);
    match w["score"].as_f64().or_else(|| w["confidence"].as_f64()) {
        Some(score) => Some(token.with_confidence(score)),
        None => Some(token),
    }
}

fn collect_words<'a>(words: impl IntoIterator<Item = &'a Value>, out: &mut Vec<AsrToken>) {
    let mut dropped = 0usize;
    for w in words {
        match word_to_token(w) {
            Some(token) => out.push(token),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        log::debug!("Dropped {} ASR words without timing or text", dropped);
    }
}

/// Parse transcript JSON into time-ordered ASR tokens.
pub fn parse_transcript(json_str: &str) -> Result<Vec<AsrToken>> {
    let value: Value = serde_json::from_str(json_str).context("Failed to parse transcript JSON")?;

    let mut tokens = Vec::new();
    if let Some(segments) = value["segments"].as_array() {
        for segment in segments {
            if let Some(words) = segment["words"].as_array() {
                collect_words(words, &mut tokens);
            }
        }
    } else if let Some(words) = value["word_segments"].as_array() {
        collect_words(words, &mut tokens);
    } else if let Some(words) = value["words"].as_array() {
        collect_words(words, &mut tokens);
    } else if let Some(words) = value.as_array() {
        collect_words(words, &mut tokens);
    } else {
        return Err(AlignError::transcript(
            "expected \"segments\", \"word_segments\", \"words\" or a word array",
        )
        .into());
    }

    if tokens.windows(2).any(|w| w[1].start < w[0].start) {
        log::warn!("ASR words are not in chronological order; alignment assumes they are");
    }

    Ok(tokens)
}

/// Read and parse a transcript JSON file.
pub fn load_transcript(path: &Path) -> Result<Vec<AsrToken>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript: {}", path.display()))?;
    parse_transcript(&data).with_context(|| format!("Invalid transcript: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segments() {
        let json = r#"{
            "text": " Hello world",
            "language": "en",
            "segments": [
                {"words": [
                    {"word": " Hello,", "start": 0.0, "end": 0.5, "score": 0.9},
                    {"word": " world", "start": 0.5, "end": 1.0}
                ]},
                {"words": [
                    {"word": " again", "start": 1.2, "end": 1.6}
                ]}
            ]
        }"#;
        let tokens = parse_transcript(json).unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["hello", "world", "again"]);
        assert!((tokens[2].start - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_words_missing_timing_dropped() {
        let json = r#"{"segments": [{"words": [
            {"word": "one", "start": 0.0, "end": 0.3},
            {"word": "two"},
            {"word": "three", "start": 0.6},
            {"word": "four", "start": 0.9, "end": 1.1}
        ]}]}"#;
        let tokens = parse_transcript(json).unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "four"]);
    }

    #[test]
    fn test_punctuation_only_words_dropped() {
        let json = r#"[{"word": "...", "start": 0.0, "end": 0.1}, {"word": "Yeah!", "start": 0.1, "end": 0.4}]"#;
        let tokens = parse_transcript(json).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "yeah");
    }

    #[test]
    fn test_word_segments_and_text_key() {
        let json = r#"{"word_segments": [{"text": "Don’t", "start": 2.0, "end": 2.4}]}"#;
        let tokens = parse_transcript(json).unwrap();
        assert_eq!(tokens[0].text, "don't");
    }

    #[test]
    fn test_words_object_with_begin_key() {
        let json = r#"{"words": [
            {"text": "Shine", "begin": 0.5, "end": 0.9, "score": 0.82},
            {"text": "on", "start": 0.9, "end": 1.1}
        ]}"#;
        let tokens = parse_transcript(json).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "shine");
        assert!((tokens[0].start - 0.5).abs() < f64::EPSILON);
        assert_eq!(tokens[0].confidence, Some(0.82));
        assert_eq!(tokens[1].confidence, None);
    }

    #[test]
    fn test_score_kept_as_confidence() {
        let json = r#"{"segments": [{"words": [{"word": "hey", "start": 0.0, "end": 0.2, "score": 0.5}]}]}"#;
        let tokens = parse_transcript(json).unwrap();
        assert_eq!(tokens[0].confidence, Some(0.5));
    }

    #[test]
    fn test_inverted_interval_clamped() {
        let json = r#"[{"word": "oops", "start": 3.0, "end": 2.5}]"#;
        let tokens = parse_transcript(json).unwrap();
        assert!((tokens[0].end - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_segments_without_words() {
        let json = r#"{"segments": [{"text": "no words here"}]}"#;
        assert!(parse_transcript(json).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_shape_rejected() {
        let err = parse_transcript(r#"{"foo": 1}"#).unwrap_err();
        assert!(err.to_string().contains("invalid transcript"));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(parse_transcript("{not json").is_err());
    }

    #[test]
    fn test_load_transcript_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song_transcription.json");
        std::fs::write(&path, r#"[{"word": "hi", "start": 0.0, "end": 0.2}]"#).unwrap();
        let tokens = load_transcript(&path).unwrap();
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_transcript(Path::new("/nonexistent/transcript.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read transcript"));
    }
}
