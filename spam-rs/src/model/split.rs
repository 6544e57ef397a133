//! Stratified train/test partitioning

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

use crate::dataset::Label;

/// Row indices of each partition, in ascending order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split row indices so each label keeps its proportion in both partitions.
///
/// Each class sends `ceil(train_fraction * n_class)` randomly chosen rows to
/// the training partition and the rest to the test partition.
pub fn stratified_split<R: Rng + ?Sized>(
    labels: &[Label],
    train_fraction: f64,
    rng: &mut R,
) -> TrainTestSplit {
    let mut by_class: BTreeMap<Label, Vec<usize>> = BTreeMap::new();
    for (i, label) in labels.iter().enumerate() {
        by_class.entry(*label).or_default().push(i);
    }

    let mut train = Vec::new();
    let mut test = Vec::new();
    for mut rows in by_class.into_values() {
        // Tolerance keeps exact products like 0.7 * 20 from rounding up
        let n_train = ((rows.len() as f64) * train_fraction - 1e-9).ceil().max(0.0) as usize;
        let n_train = n_train.min(rows.len());
        rows.shuffle(rng);
        train.extend_from_slice(&rows[..n_train]);
        test.extend_from_slice(&rows[n_train..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    TrainTestSplit { train, test }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn labels(ham: usize, spam: usize) -> Vec<Label> {
        let mut out = vec![Label::Ham; ham];
        out.extend(vec![Label::Spam; spam]);
        out
    }

    #[test]
    fn test_split_preserves_proportions() {
        let labels = labels(50, 50);
        let split = stratified_split(&labels, 0.7, &mut StdRng::seed_from_u64(3));

        assert_eq!(split.train.len(), 70);
        assert_eq!(split.test.len(), 30);
        let test_spam = split.test.iter().filter(|&&i| labels[i] == Label::Spam).count();
        assert_eq!(test_spam, 15);
    }

    #[test]
    fn test_split_partitions_all_rows() {
        let labels = labels(13, 8);
        let split = stratified_split(&labels, 0.7, &mut StdRng::seed_from_u64(11));

        // ceil(9.1) + ceil(5.6)
        assert_eq!(split.train.len(), 10 + 6);
        let mut all: Vec<_> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..21).collect::<Vec<_>>());
        assert!(split.train.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_split_is_seeded() {
        let labels = labels(30, 30);
        let a = stratified_split(&labels, 0.7, &mut StdRng::seed_from_u64(5));
        let b = stratified_split(&labels, 0.7, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }
}
