//! Engine tuning parameters.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::AlignError;

/// Tunable parameters for the alignment search and interpolation.
///
/// The defaults are heuristics, not derived values. Missing keys in a config
/// file fall back to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlignConfig {
    /// Max ASR tokens grouped under one lyric token (`k`).
    pub max_group: usize,
    /// Cost of discarding one ASR token.
    pub skip_asr_penalty: f64,
    /// Cost of leaving one lyric token unmatched.
    pub skip_lyric_penalty: f64,
    /// Duration (seconds) given to interpolated tokens at either end of the song.
    pub fallback_duration: f64,
}

impl AlignConfig {
    pub const DEFAULT_MAX_GROUP: usize = 3;
    pub const DEFAULT_SKIP_ASR_PENALTY: f64 = 0.5;
    pub const DEFAULT_SKIP_LYRIC_PENALTY: f64 = 1.0;
    pub const DEFAULT_FALLBACK_DURATION: f64 = 0.1;

    pub fn with_max_group(mut self, k: usize) -> Self {
        self.max_group = k;
        self
    }

    /// Read a JSON config file. Unknown keys are rejected, missing keys default.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: AlignConfig = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AlignError> {
        if self.max_group == 0 {
            return Err(AlignError::invalid_config("max_group must be at least 1"));
        }
        for (name, value) in [
            ("skip_asr_penalty", self.skip_asr_penalty),
            ("skip_lyric_penalty", self.skip_lyric_penalty),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AlignError::invalid_config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if !self.fallback_duration.is_finite() || self.fallback_duration <= 0.0 {
            return Err(AlignError::invalid_config(format!(
                "fallback_duration must be positive, got {}",
                self.fallback_duration
            )));
        }
        Ok(())
    }
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            max_group: Self::DEFAULT_MAX_GROUP,
            skip_asr_penalty: Self::DEFAULT_SKIP_ASR_PENALTY,
            skip_lyric_penalty: Self::DEFAULT_SKIP_LYRIC_PENALTY,
            fallback_duration: Self::DEFAULT_FALLBACK_DURATION,
        }
    }
}
