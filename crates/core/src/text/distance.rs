//! Text dissimilarity between ASR token runs and lyric tokens.

use crate::types::{AsrToken, LyricToken};

/// Levenshtein distance over Unicode scalar values, unit weights.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single rolling row; prev[j] = distance(a[..i], b[..j])
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitute = prev[j] + usize::from(ca != cb);
            let delete = prev[j + 1] + 1;
            let insert = curr[j] + 1;
            curr[j + 1] = substitute.min(delete).min(insert);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Edit distance divided by the longer string's length (in chars).
///
/// Comparison is case-insensitive. Two empty strings have distance 0.
pub fn normalized_distance(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    edit_distance(&a, &b) as f64 / longest as f64
}

/// Cost of mapping a contiguous run of ASR tokens onto one lyric token.
///
/// The run's texts are joined with single spaces before comparison.
pub fn group_cost(asr_run: &[AsrToken], lyric: &LyricToken) -> f64 {
    let joined = asr_run
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    normalized_distance(&joined, &lyric.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asr(words: &[&str]) -> Vec<AsrToken> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| AsrToken::new(*w, i as f64, i as f64 + 1.0))
            .collect()
    }

    fn lyric(text: &str) -> LyricToken {
        LyricToken { text: text.into(), index: 0, line_end: false }
    }

    #[test]
    fn test_edit_distance_identical() {
        assert_eq!(edit_distance("hello", "hello"), 0);
        assert_eq!(edit_distance("", ""), 0);
    }

    #[test]
    fn test_edit_distance_classic() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
    }

    #[test]
    fn test_edit_distance_empty_side() {
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abcd", ""), 4);
    }

    #[test]
    fn test_edit_distance_counts_chars_not_bytes() {
        assert_eq!(edit_distance("été", "ete"), 2);
    }

    #[test]
    fn test_normalized_distance_bounds() {
        assert_eq!(normalized_distance("", ""), 0.0);
        assert_eq!(normalized_distance("abc", "xyz"), 1.0);
        assert_eq!(normalized_distance("Love", "love"), 0.0);
    }

    #[test]
    fn test_normalized_distance_uses_longer_length() {
        // 1 deletion over max(5, 4)
        assert!((normalized_distance("hello", "hell") - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_group_cost_joins_with_space() {
        // "hel lo" vs "hello": one deletion over six chars
        let cost = group_cost(&asr(&["hel", "lo"]), &lyric("hello"));
        assert!((cost - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_group_cost_single_exact() {
        assert_eq!(group_cost(&asr(&["world"]), &lyric("world")), 0.0);
    }

    #[test]
    fn test_group_cost_reproducible() {
        let run = asr(&["gonna", "be"]);
        let l = lyric("gonnabe");
        assert_eq!(group_cost(&run, &l).to_bits(), group_cost(&run, &l).to_bits());
    }
}
