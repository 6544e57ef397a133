use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dataset::Label;
use crate::error::{Result, SpamError};

/// Actual x predicted counts, categories in `Label::ALL` order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// `counts[actual][predicted]`
    pub counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn from_predictions(actual: &[Label], predicted: &[Label]) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(SpamError::Training(format!(
                "{} actual labels but {} predictions",
                actual.len(),
                predicted.len()
            )));
        }

        let mut matrix = Self::default();
        for (a, p) in actual.iter().zip(predicted) {
            matrix.counts[a.index()][p.index()] += 1;
        }
        Ok(matrix)
    }

    pub fn get(&self, actual: Label, predicted: Label) -> usize {
        self.counts[actual.index()][predicted.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        Label::ALL.iter().map(|&l| self.get(l, l)).sum()
    }

    /// Fraction of correct predictions; 0 when empty
    pub fn accuracy(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.correct() as f64 / total as f64,
        }
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>8} {:>8} {:>8}", "actual", "ham", "spam")?;
        for actual in Label::ALL {
            writeln!(
                f,
                "{:>8} {:>8} {:>8}",
                actual.as_str(),
                self.get(actual, Label::Ham),
                self.get(actual, Label::Spam)
            )?;
        }
        Ok(())
    }
}
