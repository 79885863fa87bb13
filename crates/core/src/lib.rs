//! Lyrics-to-ASR timing alignment.
//!
//! Maps word-level speech-recognition output onto a clean lyrics transcript
//! and assigns a time interval to every lyric word, interpolating the words
//! the recognizer missed.

pub mod align;
pub mod cache;
pub mod config;
pub mod error;
pub mod lines;
pub mod text;
pub mod transcript;
pub mod types;

pub use align::observer::{AlignObserver, LogObserver, NullObserver};
pub use align::{align_lyrics, LyricsAligner};
pub use config::AlignConfig;
pub use error::AlignError;
pub use lines::{group_into_lines, LyricLine};
pub use transcript::{load_transcript, parse_transcript};
pub use types::{AlignmentEntry, AlignmentResult, AsrToken, Diagnostic, LyricToken, Status};
