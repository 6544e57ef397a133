//! End-to-end classifier pipeline
//!
//! fetch -> dataset -> clean -> vectorize -> split -> train -> evaluate.
//! Every stage materializes its full output before the next one starts.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::corpus::CorpusFetcher;
use crate::dataset::{ClassCounts, Dataset, DatasetBuilder};
use crate::error::{Result, SpamError};
use crate::features::{FeatureTable, Vectorizer};
use crate::model::{stratified_split, ConfusionMatrix, ForestParams, RandomForest};
use crate::text::TextCleaner;

/// Held-out evaluation of one trained forest
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub train_rows: usize,
    pub test_rows: usize,
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
}

/// Summary of a full training run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Class counts before balancing
    pub counts: ClassCounts,
    pub balanced_rows: usize,
    pub features: usize,
    #[serde(flatten)]
    pub evaluation: Evaluation,
}

impl PipelineReport {
    pub fn accuracy_percent(&self) -> f64 {
        self.evaluation.accuracy * 100.0
    }
}

pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Download and unpack the corpus into the working directory
    pub async fn fetch(&self) -> Result<Vec<String>> {
        CorpusFetcher::new(&self.config.corpus)?.fetch_all().await
    }

    /// Read the configured folders into a balanced, shuffled dataset
    pub fn build_dataset(&self) -> Result<(Dataset, ClassCounts)> {
        let corpus = &self.config.corpus;
        DatasetBuilder::new(
            &corpus.work_dir,
            &corpus.ham_folders,
            &corpus.spam_folders,
            self.config.dataset.shuffle_seed,
        )
        .build()
    }

    /// Clean every email and build the pruned feature table
    pub fn vectorize(&self, dataset: &Dataset) -> Result<FeatureTable> {
        let cleaner = TextCleaner::new()?;
        let docs = cleaner.clean_all(&dataset.emails());
        info!("Cleaned {} documents", docs.len());

        Vectorizer::new(self.config.features.sparsity).fit_transform(&docs, &dataset.labels())
    }

    /// Stratified split, forest training and held-out scoring
    pub fn train_and_evaluate(&self, table: &FeatureTable) -> Result<Evaluation> {
        let training = &self.config.training;
        let mut rng = match training.split_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let split = stratified_split(&table.labels, training.train_fraction, &mut rng);
        if split.test.is_empty() {
            return Err(SpamError::Training("test partition is empty".to_string()));
        }

        let train = table.select_rows(&split.train);
        let test = table.select_rows(&split.test);
        info!("Split {} train / {} test rows", train.n_rows(), test.n_rows());

        let params = ForestParams {
            n_trees: training.n_trees,
            mtry: training.mtry,
            seed: training.forest_seed,
            ..Default::default()
        };
        let forest = RandomForest::fit(&train, &params)?;
        let predicted = forest.predict(&test)?;

        let confusion = ConfusionMatrix::from_predictions(&test.labels, &predicted)?;
        let accuracy = confusion.accuracy();
        info!("Accuracy {:.2}% on {} test rows", accuracy * 100.0, test.n_rows());

        Ok(Evaluation {
            train_rows: train.n_rows(),
            test_rows: test.n_rows(),
            confusion,
            accuracy,
        })
    }

    /// Train and evaluate from an already extracted corpus
    pub fn train(&self) -> Result<PipelineReport> {
        let (dataset, counts) = self.build_dataset()?;
        self.train_on(&dataset, counts)
    }

    /// Vectorize, train and evaluate a built dataset
    pub fn train_on(&self, dataset: &Dataset, counts: ClassCounts) -> Result<PipelineReport> {
        if dataset.is_empty() {
            return Err(SpamError::Dataset(format!(
                "no balanced rows under {} ({})",
                self.config.corpus.work_dir.display(),
                counts
            )));
        }

        let table = self.vectorize(dataset)?;
        let evaluation = self.train_and_evaluate(&table)?;

        Ok(PipelineReport {
            counts,
            balanced_rows: dataset.len(),
            features: table.n_features(),
            evaluation,
        })
    }

    /// Fetch the corpus, then train and evaluate
    pub async fn run(&self) -> Result<PipelineReport> {
        let entries = self.fetch().await?;
        info!("Working directory holds {} entries", entries.len());
        self.train()
    }
}
