use crate::error::{Result, SpamError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub corpus: CorpusConfig,
    pub dataset: DatasetConfig,
    pub features: FeatureConfig,
    pub training: TrainingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorpusConfig {
    /// Page listing the downloadable archives
    pub index_url: String,
    /// Base URL the index links are relative to
    pub base_url: String,
    /// First link to download (1-based, inclusive)
    pub link_start: usize,
    /// Last link to download (1-based, inclusive)
    pub link_end: usize,
    pub work_dir: PathBuf,
    /// Ham folders, relative to `work_dir`
    pub ham_folders: Vec<PathBuf>,
    /// Spam folders, relative to `work_dir`
    pub spam_folders: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetConfig {
    pub shuffle_seed: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeatureConfig {
    /// Terms missing from more than this fraction of documents are dropped
    pub sparsity: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingConfig {
    pub train_fraction: f64,
    pub n_trees: usize,
    /// Features tried per split; `floor(sqrt(p))` when unset
    pub mtry: Option<usize>,
    pub split_seed: Option<u64>,
    pub forest_seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SpamError::Config(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| SpamError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let corpus = &self.corpus;
        if corpus.link_start == 0 || corpus.link_end < corpus.link_start {
            return Err(SpamError::Config(format!(
                "invalid link range {}..={}",
                corpus.link_start, corpus.link_end
            )));
        }
        if !(0.0..1.0).contains(&self.features.sparsity) {
            return Err(SpamError::Config(format!(
                "sparsity must be in [0, 1), got {}",
                self.features.sparsity
            )));
        }
        let fraction = self.training.train_fraction;
        if fraction <= 0.0 || fraction >= 1.0 {
            return Err(SpamError::Config(format!(
                "train_fraction must be in (0, 1), got {}",
                fraction
            )));
        }
        if self.training.n_trees == 0 || self.training.n_trees > usize::from(u16::MAX) {
            return Err(SpamError::Config(format!(
                "n_trees must be in 1..=65535, got {}",
                self.training.n_trees
            )));
        }
        if self.training.mtry == Some(0) {
            return Err(SpamError::Config("mtry must be positive".to_string()));
        }
        Ok(())
    }

    pub fn default() -> Self {
        Self {
            corpus: CorpusConfig {
                index_url: "https://spamassassin.apache.org/old/publiccorpus/".to_string(),
                base_url: "https://spamassassin.apache.org/old/publiccorpus/".to_string(),
                link_start: 6,
                link_end: 14,
                work_dir: std::env::temp_dir().join("spam-rs"),
                ham_folders: vec![
                    PathBuf::from("20021010_easy_ham/easy_ham"),
                    PathBuf::from("20021010_hard_ham/hard_ham"),
                    PathBuf::from("20030228_easy_ham/easy_ham"),
                    PathBuf::from("20030228_easy_ham_2/easy_ham_2"),
                    PathBuf::from("20030228_hard_ham/hard_ham"),
                ],
                spam_folders: vec![
                    PathBuf::from("20021010_spam/spam"),
                    PathBuf::from("20030228_spam/spam"),
                    PathBuf::from("20030228_spam_2/spam_2"),
                    PathBuf::from("20050311_spam_2/spam_2"),
                ],
            },
            dataset: DatasetConfig { shuffle_seed: 1234 },
            features: FeatureConfig { sparsity: 0.995 },
            training: TrainingConfig {
                train_fraction: 0.7,
                n_trees: 500,
                mtry: None,
                split_seed: None,
                forest_seed: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
