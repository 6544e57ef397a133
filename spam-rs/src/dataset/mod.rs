//! Labeled email dataset
//!
//! Reads corpus folders into labeled rows and balances the two classes.

pub mod builder;
pub mod types;

pub use builder::{balance, make_frame, DatasetBuilder};
pub use types::*;
