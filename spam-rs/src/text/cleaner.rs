//! Fixed-order text cleaning
//!
//! Every document goes through the same six transforms in the same order:
//! lowercase, punctuation removal, stop-word removal, digit removal,
//! stemming and whitespace collapsing. Reordering them changes the output.

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

use super::stopwords::ENGLISH_STOPWORDS;
use crate::error::{Result, SpamError};

/// One transform of the cleaning pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleaningStep {
    Lowercase,
    RemovePunctuation,
    RemoveStopwords,
    RemoveNumbers,
    Stem,
    StripWhitespace,
}

impl CleaningStep {
    /// Application order
    pub const PIPELINE: [CleaningStep; 6] = [
        CleaningStep::Lowercase,
        CleaningStep::RemovePunctuation,
        CleaningStep::RemoveStopwords,
        CleaningStep::RemoveNumbers,
        CleaningStep::Stem,
        CleaningStep::StripWhitespace,
    ];
}

/// Email text cleaner
pub struct TextCleaner {
    punctuation: Regex,
    stopwords: Option<Regex>,
    digits: Regex,
    whitespace: Regex,
    stemmer: Stemmer,
}

impl TextCleaner {
    /// Create a cleaner with the English stop-word list
    pub fn new() -> Result<Self> {
        Self::with_stopwords(ENGLISH_STOPWORDS)
    }

    /// Create a cleaner removing a custom stop-word list
    pub fn with_stopwords(words: &[&str]) -> Result<Self> {
        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        let stopwords = if alternation.is_empty() {
            None
        } else {
            Some(compile(&format!(r"\b(?:{})\b", alternation))?)
        };

        Ok(Self {
            punctuation: compile(r"[[:punct:]\p{P}]+")?,
            stopwords,
            digits: compile(r"[[:digit:]]+")?,
            whitespace: compile(r"\s+")?,
            stemmer: Stemmer::create(Algorithm::English),
        })
    }

    /// Run the full pipeline on one document
    pub fn clean(&self, text: &str) -> String {
        CleaningStep::PIPELINE
            .iter()
            .fold(text.to_string(), |doc, step| self.apply(*step, &doc))
    }

    /// Clean every document, keeping order
    pub fn clean_all<S: AsRef<str>>(&self, docs: &[S]) -> Vec<String> {
        docs.iter().map(|d| self.clean(d.as_ref())).collect()
    }

    /// Apply a single transform
    pub fn apply(&self, step: CleaningStep, text: &str) -> String {
        match step {
            CleaningStep::Lowercase => text.to_lowercase(),
            CleaningStep::RemovePunctuation => self.punctuation.replace_all(text, "").into_owned(),
            CleaningStep::RemoveStopwords => match &self.stopwords {
                Some(re) => re.replace_all(text, "").into_owned(),
                None => text.to_string(),
            },
            CleaningStep::RemoveNumbers => self.digits.replace_all(text, "").into_owned(),
            CleaningStep::Stem => self.stem(text),
            CleaningStep::StripWhitespace => {
                self.whitespace.replace_all(text, " ").trim().to_string()
            }
        }
    }

    /// Stem whitespace-separated tokens
    fn stem(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|token| self.stemmer.stem(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| SpamError::Parse(format!("bad pattern {}: {}", pattern, e)))
}
