//! Classifier training and evaluation
//!
//! Stratified train/test split, a random forest classifier, and a
//! confusion matrix for scoring held-out predictions.

pub mod evaluate;
pub mod forest;
pub mod split;

pub use evaluate::ConfusionMatrix;
pub use forest::{ForestParams, RandomForest};
pub use split::{stratified_split, TrainTestSplit};
