//! Lyrics-to-ASR alignment engine.
//!
//! Pipeline: tokenize lyrics → search the state grid → backtrace the optimal
//! path → aggregate per-lyric timings → interpolate untimed tokens.
//!
//! Each call owns its state graph and drops it on return. The engine is
//! synchronous and deterministic; run independent songs in parallel by
//! calling it from several threads.

pub mod backtrace;
pub mod interpolate;
pub mod observer;
pub mod search;
pub mod timing;

use crate::config::AlignConfig;
use crate::error::AlignError;
use crate::text::tokenize_lyrics;
use crate::types::{AlignmentEntry, AlignmentResult, AsrToken, Diagnostic, LyricToken};

use self::interpolate::Interpolation;
use self::observer::{AlignObserver, LogObserver};

/// Aligns lyrics to ASR word timings with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct LyricsAligner {
    config: AlignConfig,
}

impl LyricsAligner {
    /// Create an aligner, rejecting invalid configs up front.
    pub fn new(config: AlignConfig) -> Result<Self, AlignError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    /// Align a raw lyrics transcript, narrating progress through `log`.
    pub fn align(&self, asr: &[AsrToken], lyrics: &str) -> Result<AlignmentResult, AlignError> {
        self.align_with(asr, lyrics, &mut LogObserver)
    }

    /// Align a raw lyrics transcript, reporting progress to `observer`.
    pub fn align_with(
        &self,
        asr: &[AsrToken],
        lyrics: &str,
        observer: &mut dyn AlignObserver,
    ) -> Result<AlignmentResult, AlignError> {
        let tokens = tokenize_lyrics(lyrics);
        self.align_tokens(asr, &tokens, observer)
    }

    /// Align pre-tokenized lyrics.
    ///
    /// Only a broken predecessor chain is an `Err`; every other problem is
    /// reported as a diagnostic on the returned result.
    pub fn align_tokens(
        &self,
        asr: &[AsrToken],
        lyrics: &[LyricToken],
        observer: &mut dyn AlignObserver,
    ) -> Result<AlignmentResult, AlignError> {
        let mut diagnostics = Vec::new();

        if lyrics.is_empty() || asr.is_empty() {
            report(&mut diagnostics, observer, Diagnostic::EmptyInput);
            let entries: Vec<AlignmentEntry> =
                lyrics.iter().map(AlignmentEntry::unaligned).collect();
            if !entries.is_empty() {
                report(&mut diagnostics, observer, Diagnostic::NoInterpolationAnchor);
            }
            return Ok(AlignmentResult {
                entries,
                total_cost: None,
                diagnostics,
            });
        }

        let outcome = search::search(asr, lyrics, &self.config, observer);
        let Some(terminal) = outcome.terminal else {
            report(&mut diagnostics, observer, Diagnostic::NoAlignmentPath);
            return Ok(AlignmentResult {
                entries: Vec::new(),
                total_cost: None,
                diagnostics,
            });
        };

        let steps = backtrace::backtrace(&outcome.graph, terminal, observer)?;
        let groups = backtrace::mapped_groups(&steps);
        let mut entries = timing::aggregate(lyrics, asr, &groups);

        let unresolved = entries.iter().filter(|e| !e.is_timed()).count();
        observer.interpolation_started(unresolved);
        if interpolate::interpolate(&mut entries, self.config.fallback_duration)
            == Interpolation::NoAnchor
        {
            report(&mut diagnostics, observer, Diagnostic::NoInterpolationAnchor);
        }

        Ok(AlignmentResult {
            entries,
            total_cost: outcome.total_cost(),
            diagnostics,
        })
    }
}

fn report(diagnostics: &mut Vec<Diagnostic>, observer: &mut dyn AlignObserver, d: Diagnostic) {
    observer.diagnostic(d);
    diagnostics.push(d);
}

/// One-shot alignment with the given config.
pub fn align_lyrics(
    asr: &[AsrToken],
    lyrics: &str,
    config: &AlignConfig,
) -> Result<AlignmentResult, AlignError> {
    LyricsAligner::new(config.clone())?.align(asr, lyrics)
}
