//! Document-term features
//!
//! Counts terms per document, prunes rare terms and produces the dense
//! labeled table the model trains on.

pub mod matrix;
pub mod table;

pub use matrix::DocumentTermMatrix;
pub use table::{sanitize_names, FeatureTable, Vectorizer};
