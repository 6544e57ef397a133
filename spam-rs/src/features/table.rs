//! Dense labeled feature table

use ndarray::{Array2, Axis};
use std::collections::HashSet;
use tracing::info;

use super::matrix::DocumentTermMatrix;
use crate::dataset::Label;
use crate::error::{Result, SpamError};

/// Documents x terms counts with one label per row
#[derive(Debug, Clone)]
pub struct FeatureTable {
    /// Sanitized column names
    pub columns: Vec<String>,
    /// Original terms, aligned with `columns`
    pub terms: Vec<String>,
    pub values: Array2<f64>,
    pub labels: Vec<Label>,
}

impl FeatureTable {
    pub fn new(terms: Vec<String>, values: Array2<f64>, labels: Vec<Label>) -> Result<Self> {
        if values.nrows() != labels.len() {
            return Err(SpamError::Dataset(format!(
                "{} feature rows but {} labels",
                values.nrows(),
                labels.len()
            )));
        }
        if values.ncols() != terms.len() {
            return Err(SpamError::Dataset(format!(
                "{} feature columns but {} terms",
                values.ncols(),
                terms.len()
            )));
        }
        Ok(Self {
            columns: sanitize_names(&terms),
            terms,
            values,
            labels,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }

    /// Value of a named column in a row
    pub fn get(&self, row: usize, column: &str) -> Option<f64> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.values.get([row, col]).copied()
    }

    /// Rows at `indices`, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            terms: self.terms.clone(),
            values: self.values.select(Axis(0), indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

/// Turns cleaned documents into a pruned feature table
pub struct Vectorizer {
    sparsity: f64,
}

impl Vectorizer {
    pub fn new(sparsity: f64) -> Self {
        Self { sparsity }
    }

    /// Build the table; `labels` must follow document order
    pub fn fit_transform<S: AsRef<str>>(&self, docs: &[S], labels: &[Label]) -> Result<FeatureTable> {
        if docs.len() != labels.len() {
            return Err(SpamError::Dataset(format!(
                "{} documents but {} labels",
                docs.len(),
                labels.len()
            )));
        }

        let dtm = DocumentTermMatrix::from_documents(docs);
        let pruned = dtm.remove_sparse_terms(self.sparsity);
        info!(
            "Vocabulary: {} terms, {} kept at sparsity {}",
            dtm.n_terms(),
            pruned.n_terms(),
            self.sparsity
        );

        FeatureTable::new(pruned.terms().to_vec(), pruned.to_dense(), labels.to_vec())
    }
}

/// Make terms usable as column identifiers.
///
/// Characters other than alphanumerics, `.` and `_` become `.`; names that do
/// not start with a letter (or a `.` not followed by a digit) get an `X`
/// prefix; repeated names get `.1`, `.2`, ... suffixes.
pub fn sanitize_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|name| {
            let base = sanitize_name(name.as_ref());
            let mut candidate = base.clone();
            let mut suffix = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            candidate
        })
        .collect()
}

fn sanitize_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '_' {
                c
            } else {
                '.'
            }
        })
        .collect();

    let mut chars = out.chars();
    let needs_prefix = match (chars.next(), chars.next()) {
        (None, _) => true,
        (Some('.'), Some(next)) => next.is_ascii_digit(),
        (Some('.'), None) => false,
        (Some(first), _) => !first.is_alphabetic(),
    };
    if needs_prefix {
        out.insert(0, 'X');
    }
    out
}
