use thiserror::Error;

use crate::align::search::StatePos;

/// Fatal and input errors raised by the alignment engine.
///
/// Recoverable conditions (empty input, unreachable terminal, no anchors)
/// are not errors; they are reported as [`crate::types::Diagnostic`]s.
#[derive(Debug, Error)]
pub enum AlignError {
    #[error("inconsistent backtrace: predecessor chain broken at state ({}, {})", state.asr, state.lyric)]
    InconsistentBacktrace { state: StatePos },
    #[error("invalid config: {message}")]
    InvalidConfig { message: String },
    #[error("invalid transcript: {message}")]
    Transcript { message: String },
}

impl AlignError {
    pub(crate) fn broken_chain(state: StatePos) -> Self {
        Self::InconsistentBacktrace { state }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub(crate) fn transcript(message: impl Into<String>) -> Self {
        Self::Transcript {
            message: message.into(),
        }
    }

    /// True for errors that indicate an engine bug rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::InconsistentBacktrace { .. })
    }
}
