//! spam-rs: Spam/ham corpus classifier
//!
//! Downloads a public email corpus, turns every message into a bag of
//! stemmed terms and trains a random forest to tell spam from ham.
//!
//! # Pipeline
//!
//! 1. **Corpus**: scrape the index page, download and unpack the archives
//! 2. **Email**: split raw messages at the first blank line
//! 3. **Dataset**: label folders, balance the classes, shuffle
//! 4. **Text**: lowercase, strip punctuation/stop-words/digits, stem
//! 5. **Features**: document-term counts with rare terms pruned
//! 6. **Model**: stratified split, random forest, confusion matrix
//!
//! # Example
//!
//! ```no_run
//! use spam_rs::config::Config;
//! use spam_rs::pipeline::Pipeline;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Pipeline::new(Config::default())?;
//!     let report = pipeline.run().await?;
//!     println!("Accuracy: {:.2}%", report.accuracy_percent());
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`corpus`]: Index scraping, download and archive extraction
//! - [`email`]: Header/body splitting
//! - [`dataset`]: Labeled, balanced email rows
//! - [`text`]: Text cleaning
//! - [`features`]: Document-term matrix and feature table
//! - [`model`]: Random forest training and evaluation
//! - [`pipeline`]: Stage wiring

pub mod config;
pub mod corpus;
pub mod dataset;
pub mod email;
pub mod error;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod text;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, SpamError};
pub use pipeline::{Pipeline, PipelineReport};
