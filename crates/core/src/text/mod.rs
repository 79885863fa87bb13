//! Text normalization and dissimilarity.

pub mod distance;
pub mod tokenize;

pub use distance::{edit_distance, group_cost, normalized_distance};
pub use tokenize::{normalize_word, tokenize_lyrics};
