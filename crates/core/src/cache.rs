//! File-based cache of alignment results.
//!
//! Results are keyed by a SHA-256 over the lyrics text, the ASR tokens and
//! the engine config, so any change to the inputs misses the cache.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::config::AlignConfig;
use crate::types::{AlignmentResult, AsrToken};

/// Get the cache directory.
///
/// Uses `LYRICSYNC_CACHE_DIR` env var if set, otherwise `~/.cache/lyricsync`.
pub fn cache_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LYRICSYNC_CACHE_DIR") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".cache").join("lyricsync")
}

/// Compute the cache key for one alignment run.
///
/// Returns a 64-character hex string.
pub fn alignment_key(lyrics: &str, asr: &[AsrToken], config: &AlignConfig) -> Result<String> {
    let mut hasher = Sha256::new();
    for part in [
        lyrics.as_bytes().to_vec(),
        serde_json::to_vec(asr)?,
        serde_json::to_vec(config)?,
    ] {
        // Length prefix keeps ("ab", "c") and ("a", "bc") apart
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(&part);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

fn entry_path(root: &Path, key: &str) -> PathBuf {
    root.join("align").join(format!("{}.json", key))
}

fn tmp_path(target: &Path) -> PathBuf {
    target.with_extension(format!("{}.tmp", std::process::id()))
}

/// Write through a per-process temp file, then rename over `target`.
fn atomic_write(target: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(target);
    std::fs::write(&tmp, data)?;
    std::fs::rename(&tmp, target)?;
    Ok(())
}

/// Return cached alignment result, or None if not cached or unreadable.
pub fn get_cached_alignment(root: &Path, key: &str) -> Option<AlignmentResult> {
    let path = entry_path(root, key);
    if !path.exists() {
        return None;
    }
    let data = std::fs::read_to_string(&path).ok()?;
    let result: AlignmentResult = serde_json::from_str(&data).ok()?;
    log::info!("Cache hit: alignment ({}...)", &key[..12.min(key.len())]);
    Some(result)
}

/// Store alignment result in cache. Returns the cache file path.
pub fn store_alignment_cache(root: &Path, key: &str, result: &AlignmentResult) -> Result<PathBuf> {
    let path = entry_path(root, key);
    let json = serde_json::to_string(result)?;
    atomic_write(&path, json.as_bytes())
        .with_context(|| format!("Failed to write cache entry: {}", path.display()))?;
    log::info!("Cached alignment ({}...)", &key[..12.min(key.len())]);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlignmentEntry, Diagnostic, LyricToken};

    fn sample_result() -> AlignmentResult {
        let token = LyricToken { text: "hello".into(), index: 0, line_end: true };
        let mut entry = AlignmentEntry::unaligned(&token);
        entry.begin = Some(0.0);
        entry.end = Some(0.6);
        entry.matched_asr_indices = vec![0, 1];
        entry.cost = Some(0.1667);
        AlignmentResult {
            entries: vec![entry],
            total_cost: Some(0.1667),
            diagnostics: vec![Diagnostic::NoInterpolationAnchor],
        }
    }

    fn tokens() -> Vec<AsrToken> {
        vec![AsrToken::new("hel", 0.0, 0.4), AsrToken::new("lo", 0.4, 0.6)]
    }

    #[test]
    fn test_key_deterministic() {
        let config = AlignConfig::default();
        let k1 = alignment_key("hello", &tokens(), &config).unwrap();
        let k2 = alignment_key("hello", &tokens(), &config).unwrap();
        assert_eq!(k1, k2);
        assert_eq!(k1.len(), 64);
    }

    #[test]
    fn test_key_changes_with_inputs() {
        let config = AlignConfig::default();
        let base = alignment_key("hello", &tokens(), &config).unwrap();
        assert_ne!(base, alignment_key("hello there", &tokens(), &config).unwrap());
        assert_ne!(base, alignment_key("hello", &tokens()[..1], &config).unwrap());
        let k2 = AlignConfig::default().with_max_group(2);
        assert_ne!(base, alignment_key("hello", &tokens(), &k2).unwrap());
    }

    #[test]
    fn test_atomic_write_replaces_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = entry_path(dir.path(), "abc123");

        atomic_write(&path, b"[]").unwrap();
        atomic_write(&path, b"[1]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1]");
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn test_store_and_retrieve() {
        let dir = tempfile::tempdir().unwrap();
        let key = alignment_key("hello", &tokens(), &AlignConfig::default()).unwrap();
        assert!(get_cached_alignment(dir.path(), &key).is_none());

        let result = sample_result();
        let path = store_alignment_cache(dir.path(), &key, &result).unwrap();
        assert!(path.exists());

        let cached = get_cached_alignment(dir.path(), &key).unwrap();
        assert_eq!(cached, result);
    }

    #[test]
    fn test_corrupt_entry_is_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = entry_path(dir.path(), "deadbeef");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"not json").unwrap();
        assert!(get_cached_alignment(dir.path(), "deadbeef").is_none());
    }

    #[test]
    fn test_cached_interpolated_times_are_exact() {
        let dir = tempfile::tempdir().unwrap();
        let config = AlignConfig::default();
        let lyrics = "a b c d e f g h i";

        for step in 0..200 {
            let first_end = 0.37 + step as f64 * 0.013;
            let asr = vec![
                AsrToken::new("a", 0.0, first_end),
                AsrToken::new("i", first_end + 1.9 + step as f64 * 0.007, 9.1),
            ];
            let fresh = crate::align_lyrics(&asr, lyrics, &config).unwrap();
            assert!(fresh.interpolated_count() > 0);

            let key = alignment_key(lyrics, &asr, &config).unwrap();
            store_alignment_cache(dir.path(), &key, &fresh).unwrap();
            let cached = get_cached_alignment(dir.path(), &key).unwrap();
            for (f, c) in fresh.entries.iter().zip(&cached.entries) {
                assert_eq!(f.begin.map(f64::to_bits), c.begin.map(f64::to_bits));
                assert_eq!(f.end.map(f64::to_bits), c.end.map(f64::to_bits));
            }
            assert_eq!(cached, fresh);
        }
    }

    #[test]
    fn test_cache_dir_env_override() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("LYRICSYNC_CACHE_DIR", dir.path());
        let resolved = cache_dir();
        std::env::remove_var("LYRICSYNC_CACHE_DIR");
        assert_eq!(resolved, dir.path());
        assert!(cache_dir().ends_with(".cache/lyricsync"));
    }
}
