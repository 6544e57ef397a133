//! Dataset assembly from corpus folders

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::types::*;
use crate::email::EmailParser;
use crate::error::Result;

/// Builds a balanced dataset from ham and spam folders
pub struct DatasetBuilder {
    ham_folders: Vec<PathBuf>,
    spam_folders: Vec<PathBuf>,
    seed: u64,
}

impl DatasetBuilder {
    /// Create a builder over folders resolved against `root`
    pub fn new(root: &Path, ham_folders: &[PathBuf], spam_folders: &[PathBuf], seed: u64) -> Self {
        Self {
            ham_folders: ham_folders.iter().map(|f| root.join(f)).collect(),
            spam_folders: spam_folders.iter().map(|f| root.join(f)).collect(),
            seed,
        }
    }

    /// Read every folder, returning all ham rows and all spam rows
    pub fn collect(&self) -> Result<(Vec<DatasetRow>, Vec<DatasetRow>)> {
        let mut ham = Vec::new();
        for folder in &self.ham_folders {
            ham.extend(make_frame(folder, Label::Ham)?);
        }

        let mut spam = Vec::new();
        for folder in &self.spam_folders {
            spam.extend(make_frame(folder, Label::Spam)?);
        }

        Ok((ham, spam))
    }

    /// Read, balance and shuffle. Also returns the counts before balancing.
    pub fn build(&self) -> Result<(Dataset, ClassCounts)> {
        let (ham, spam) = self.collect()?;
        let counts = ClassCounts {
            ham: ham.len(),
            spam: spam.len(),
        };
        info!("Collected {} emails ({})", counts.total(), counts);

        let dataset = balance(ham, spam, self.seed);
        info!("Balanced dataset has {} rows", dataset.len());

        Ok((dataset, counts))
    }
}

/// Parse every file of `folder` into rows carrying `label`.
///
/// Files are visited in name order. A folder that cannot be listed yields
/// no rows.
pub fn make_frame(folder: &Path, label: Label) -> Result<Vec<DatasetRow>> {
    let entries = match std::fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot list {}: {}", folder.display(), e);
            return Ok(Vec::new());
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    let mut rows = Vec::with_capacity(files.len());
    for path in &files {
        let parts = EmailParser::parse_file(path)?;
        rows.push(DatasetRow::new(parts, label));
    }

    debug!("{}: {} {} emails", folder.display(), rows.len(), label);
    Ok(rows)
}

/// Keep the first `min(ham, spam)` rows of each class and shuffle them with
/// a seeded RNG.
pub fn balance(mut ham: Vec<DatasetRow>, mut spam: Vec<DatasetRow>, seed: u64) -> Dataset {
    let n = ham.len().min(spam.len());
    ham.truncate(n);
    spam.truncate(n);

    let mut rows = ham;
    rows.append(&mut spam);

    let mut rng = StdRng::seed_from_u64(seed);
    rows.shuffle(&mut rng);

    Dataset { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::EmailParts;

    fn rows(label: Label, n: usize) -> Vec<DatasetRow> {
        (0..n)
            .map(|i| {
                let parts = EmailParts {
                    headers: format!("Subject: {} {}", label, i),
                    body: Some(format!("body {}", i)),
                };
                DatasetRow::new(parts, label)
            })
            .collect()
    }

    #[test]
    fn test_balance_truncates_ham() {
        let dataset = balance(rows(Label::Ham, 10), rows(Label::Spam, 4), 1);
        assert_eq!(dataset.len(), 8);
        assert_eq!(dataset.counts(), ClassCounts { ham: 4, spam: 4 });

        // The first ham rows are kept, not a random sample
        let mut kept: Vec<_> = dataset
            .rows
            .iter()
            .filter(|r| r.label == Label::Ham)
            .map(|r| r.parts.headers.clone())
            .collect();
        kept.sort();
        let expected: Vec<_> = (0..4).map(|i| format!("Subject: ham {}", i)).collect();
        assert_eq!(kept, expected);
    }

    #[test]
    fn test_balance_with_fewer_ham() {
        let dataset = balance(rows(Label::Ham, 2), rows(Label::Spam, 5), 1);
        assert_eq!(dataset.counts(), ClassCounts { ham: 2, spam: 2 });
    }

    #[test]
    fn test_balance_is_a_permutation() {
        let dataset = balance(rows(Label::Ham, 7), rows(Label::Spam, 7), 99);
        let mut headers: Vec<_> = dataset.rows.iter().map(|r| r.parts.headers.clone()).collect();
        headers.sort();
        headers.dedup();
        assert_eq!(headers.len(), 14);
    }

    #[test]
    fn test_balance_is_reproducible() {
        let a = balance(rows(Label::Ham, 20), rows(Label::Spam, 20), 42);
        let b = balance(rows(Label::Ham, 20), rows(Label::Spam, 20), 42);
        let c = balance(rows(Label::Ham, 20), rows(Label::Spam, 20), 43);
        assert_eq!(a.rows, b.rows);
        assert_ne!(a.rows, c.rows);
    }

    #[test]
    fn test_make_frame_missing_folder_is_empty() {
        let rows = make_frame(Path::new("/nonexistent/spam-rs/folder"), Label::Spam).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_make_frame_reads_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b"), "Subject: second\n\nbody b").unwrap();
        std::fs::write(dir.path().join("a"), "Subject: first\n\nbody a").unwrap();
        std::fs::write(dir.path().join("c"), "Subject: no body").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let rows = make_frame(dir.path(), Label::Ham).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].parts.headers, "Subject: first");
        assert_eq!(rows[1].parts.body.as_deref(), Some("body b"));
        assert!(rows[2].parts.body.is_none());
        assert!(rows.iter().all(|r| r.label == Label::Ham));
    }
}
