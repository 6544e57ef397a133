//! Sparse document-term matrix

use ndarray::Array2;
use std::collections::{BTreeSet, HashMap};

/// Term counts per document, stored sparsely
#[derive(Debug, Clone, Default)]
pub struct DocumentTermMatrix {
    /// Column terms in alphabetical order
    terms: Vec<String>,
    /// Per document: (column, count), sorted by column
    rows: Vec<Vec<(usize, u32)>>,
}

impl DocumentTermMatrix {
    /// Count whitespace-separated terms of every document
    pub fn from_documents<S: AsRef<str>>(docs: &[S]) -> Self {
        let vocabulary: BTreeSet<&str> = docs
            .iter()
            .flat_map(|d| d.as_ref().split_whitespace())
            .collect();
        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (*term, i))
            .collect();

        let rows = docs
            .iter()
            .map(|doc| {
                let mut counts: HashMap<usize, u32> = HashMap::new();
                for term in doc.as_ref().split_whitespace() {
                    *counts.entry(index[term]).or_insert(0) += 1;
                }
                let mut row: Vec<(usize, u32)> = counts.into_iter().collect();
                row.sort_unstable();
                row
            })
            .collect();

        Self {
            terms: vocabulary.into_iter().map(str::to_string).collect(),
            rows,
        }
    }

    pub fn n_docs(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Count of `term` in document `doc`
    pub fn count(&self, doc: usize, term: &str) -> u32 {
        let Ok(col) = self.terms.binary_search_by(|t| t.as_str().cmp(term)) else {
            return 0;
        };
        self.rows
            .get(doc)
            .and_then(|row| row.binary_search_by_key(&col, |(c, _)| *c).ok().map(|i| row[i].1))
            .unwrap_or(0)
    }

    /// Number of documents containing each term
    pub fn document_frequencies(&self) -> Vec<usize> {
        let mut freq = vec![0; self.terms.len()];
        for row in &self.rows {
            for (col, _) in row {
                freq[*col] += 1;
            }
        }
        freq
    }

    /// Drop terms absent from more than `sparsity` of the documents.
    ///
    /// A term survives when its document frequency is at least
    /// `(1 - sparsity) * n_docs`.
    pub fn remove_sparse_terms(&self, sparsity: f64) -> Self {
        let min_docs = (1.0 - sparsity) * self.n_docs() as f64;
        let freq = self.document_frequencies();

        // old column -> new column
        let mut remap = vec![None; self.terms.len()];
        let mut terms = Vec::new();
        for (col, term) in self.terms.iter().enumerate() {
            if freq[col] as f64 + 1e-9 >= min_docs {
                remap[col] = Some(terms.len());
                terms.push(term.clone());
            }
        }

        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter_map(|(col, count)| remap[*col].map(|c| (c, *count)))
                    .collect()
            })
            .collect();

        Self { terms, rows }
    }

    /// Dense documents x terms matrix, zero where a term is absent
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.n_docs(), self.n_terms()));
        for (doc, row) in self.rows.iter().enumerate() {
            for (col, count) in row {
                dense[[doc, *col]] = *count as f64;
            }
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_vocabulary() {
        let dtm = DocumentTermMatrix::from_documents(&["free money free", "meet money", ""]);
        assert_eq!(dtm.n_docs(), 3);
        assert_eq!(dtm.terms(), &["free", "meet", "money"]);
        assert_eq!(dtm.count(0, "free"), 2);
        assert_eq!(dtm.count(1, "free"), 0);
        assert_eq!(dtm.count(1, "money"), 1);
        assert_eq!(dtm.count(2, "money"), 0);
        assert_eq!(dtm.count(0, "absent"), 0);
        assert_eq!(dtm.document_frequencies(), vec![1, 1, 2]);
    }

    #[test]
    fn test_remove_sparse_terms() {
        // 4 documents, sparsity 0.5 -> terms need at least 2 documents
        let dtm = DocumentTermMatrix::from_documents(&["a b", "a c", "a b", "d"]);
        let pruned = dtm.remove_sparse_terms(0.5);
        assert_eq!(pruned.terms(), &["a", "b"]);
        assert_eq!(pruned.n_docs(), 4);
        assert_eq!(pruned.count(3, "a"), 0);
        assert_eq!(pruned.count(2, "b"), 1);
    }

    #[test]
    fn test_pruning_keeps_terms_at_threshold() {
        // 200 documents, sparsity 0.995 -> a term in a single document sits
        // exactly on the 0.5% boundary and is kept
        let mut docs = vec!["common".to_string(); 200];
        docs[17] = "common rare".to_string();
        let pruned = DocumentTermMatrix::from_documents(&docs).remove_sparse_terms(0.995);
        assert_eq!(pruned.terms(), &["common", "rare"]);

        let mut docs = vec!["common".to_string(); 201];
        docs[0] = "common rare".to_string();
        let pruned = DocumentTermMatrix::from_documents(&docs).remove_sparse_terms(0.995);
        assert_eq!(pruned.terms(), &["common"]);
    }

    #[test]
    fn test_to_dense_has_every_cell() {
        let dtm = DocumentTermMatrix::from_documents(&["x y y", "z"]);
        let dense = dtm.to_dense();
        assert_eq!(dense.shape(), &[2, 3]);
        assert_eq!(dense[[0, 1]], 2.0);
        assert_eq!(dense[[1, 0]], 0.0);
        assert_eq!(dense[[1, 2]], 1.0);
    }
}
