//! Lyrics text → flat sequence of lowercase word tokens.
//!
//! A token is a maximal run of letters and apostrophes, case-folded.
//! Everything else (punctuation, digits, whitespace, newlines) separates
//! tokens. Typographic quotes are folded to ASCII `'` first so that
//! `don’t` and `don't` compare equal.

use std::collections::HashMap;

use crate::types::LyricToken;

lazy_static::lazy_static! {
    /// Apostrophe look-alikes folded to ASCII `'`.
    static ref APOSTROPHES: HashMap<char, char> = {
        let mut m = HashMap::new();
        m.insert('\u{2018}', '\''); // left single quotation mark
        m.insert('\u{2019}', '\''); // right single quotation mark
        m.insert('\u{201B}', '\''); // single high-reversed-9
        m.insert('\u{02BC}', '\''); // modifier letter apostrophe
        m.insert('\u{2032}', '\''); // prime
        m.insert('\u{FF07}', '\''); // fullwidth apostrophe
        m.insert('`', '\'');
        m.insert('\u{00B4}', '\''); // acute accent
        m
    };
}

/// Fold typographic apostrophes/quotes to ASCII `'`.
pub fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| *APOSTROPHES.get(&c).unwrap_or(&c))
        .collect()
}

fn is_token_char(c: char) -> bool {
    c.is_alphabetic() || c == '\''
}

/// Split one line of (quote-normalized) text into lowercase words.
///
/// Runs made only of apostrophes (stray quote marks) are dropped.
fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut cur = String::new();
    let mut has_letter = false;

    for c in line.chars() {
        if is_token_char(c) {
            has_letter |= c != '\'';
            cur.extend(c.to_lowercase());
            continue;
        }
        if has_letter {
            words.push(std::mem::take(&mut cur));
        }
        cur.clear();
        has_letter = false;
    }
    if has_letter {
        words.push(cur);
    }
    words
}

/// Tokenize a lyrics transcript.
///
/// Tokens are indexed in reading order. The last token of every non-empty
/// line is flagged with `line_end`.
pub fn tokenize_lyrics(text: &str) -> Vec<LyricToken> {
    let text = normalize_quotes(text);
    let mut tokens: Vec<LyricToken> = Vec::new();

    for line in text.lines() {
        let words = split_words(line);
        let n = words.len();
        for (wi, word) in words.into_iter().enumerate() {
            tokens.push(LyricToken {
                text: word,
                index: tokens.len(),
                line_end: wi + 1 == n,
            });
        }
    }

    tokens
}

/// Normalize a single ASR word the same way lyrics are normalized.
///
/// Recognizers attach punctuation and casing (`"Hello,"`). Inner separators
/// such as hyphens become single spaces. Returns an empty string when
/// nothing word-like remains.
pub fn normalize_word(text: &str) -> String {
    split_words(&normalize_quotes(text)).join(" ")
}
