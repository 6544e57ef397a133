//! Text normalization
//!
//! Turns raw email text into stemmed, stop-word free token streams.

pub mod cleaner;
pub mod stopwords;

pub use cleaner::{CleaningStep, TextCleaner};
pub use stopwords::ENGLISH_STOPWORDS;
