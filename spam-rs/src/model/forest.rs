//! Random forest classifier
//!
//! Thin wrapper over smartcore's `RandomForestClassifier`: bootstrap
//! samples per tree, Gini splits over `mtry` random features, majority vote.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::info;

use crate::dataset::Label;
use crate::error::{Result, SpamError};
use crate::features::FeatureTable;

/// Forest hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    /// Features tried per split; `floor(sqrt(n_features))` when unset
    pub mtry: Option<usize>,
    pub min_node_size: usize,
    pub max_depth: Option<u16>,
    /// Fixed seed for reproducible forests; entropy when unset
    pub seed: Option<u64>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 500,
            mtry: None,
            min_node_size: 1,
            max_depth: None,
            seed: None,
        }
    }
}

type Classifier = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// Trained ensemble; immutable after `fit`
pub struct RandomForest {
    model: Classifier,
    n_trees: usize,
    n_features: usize,
    mtry: usize,
}

impl RandomForest {
    /// Train on every column of a feature table
    pub fn fit(table: &FeatureTable, params: &ForestParams) -> Result<Self> {
        let y: Vec<usize> = table.labels.iter().map(|l| l.index()).collect();
        Self::fit_matrix(&table.values, &y, Label::ALL.len(), params)
    }

    /// Train on a raw matrix with class indices in `0..n_classes`
    pub fn fit_matrix(
        x: &Array2<f64>,
        y: &[usize],
        n_classes: usize,
        params: &ForestParams,
    ) -> Result<Self> {
        let n = x.nrows();
        let n_features = x.ncols();
        if n == 0 || n_features == 0 {
            return Err(SpamError::Training(format!(
                "cannot train on a {}x{} matrix",
                n, n_features
            )));
        }
        if y.len() != n {
            return Err(SpamError::Training(format!(
                "{} rows but {} labels",
                n,
                y.len()
            )));
        }
        if let Some(bad) = y.iter().find(|&&c| c >= n_classes) {
            return Err(SpamError::Training(format!(
                "class {} out of range for {} classes",
                bad, n_classes
            )));
        }
        let n_trees = u16::try_from(params.n_trees)
            .ok()
            .filter(|&t| t > 0)
            .ok_or_else(|| {
                SpamError::Training(format!("n_trees must be in 1..=65535, got {}", params.n_trees))
            })?;

        let mtry = params
            .mtry
            .unwrap_or_else(|| (n_features as f64).sqrt().floor() as usize)
            .clamp(1, n_features);
        let seed = params.seed.unwrap_or_else(rand::random);

        let mut parameters = RandomForestClassifierParameters::default()
            .with_n_trees(n_trees)
            .with_m(mtry)
            .with_min_samples_leaf(params.min_node_size.max(1))
            .with_seed(seed);
        if let Some(depth) = params.max_depth {
            parameters = parameters.with_max_depth(depth);
        }

        info!(
            "Training random forest: {} trees, {} rows, {} features, mtry {}",
            n_trees, n, n_features, mtry
        );

        let targets: Vec<u32> = y.iter().map(|&c| c as u32).collect();
        let model = Classifier::fit(&dense(x), &targets, parameters)
            .map_err(|e| SpamError::Training(e.to_string()))?;

        Ok(Self {
            model,
            n_trees: params.n_trees,
            n_features,
            mtry,
        })
    }

    /// Predict a label for every row of a feature table
    pub fn predict(&self, table: &FeatureTable) -> Result<Vec<Label>> {
        self.predict_matrix(&table.values)?
            .into_iter()
            .map(|class| {
                Label::from_index(class)
                    .ok_or_else(|| SpamError::Training(format!("unknown class {}", class)))
            })
            .collect()
    }

    /// Majority vote of the trees for every row
    pub fn predict_matrix(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        if x.ncols() != self.n_features {
            return Err(SpamError::Training(format!(
                "model expects {} features, got {}",
                self.n_features,
                x.ncols()
            )));
        }
        if x.nrows() == 0 {
            return Ok(Vec::new());
        }

        let predicted = self
            .model
            .predict(&dense(x))
            .map_err(|e| SpamError::Training(e.to_string()))?;
        Ok(predicted.into_iter().map(|c| c as usize).collect())
    }

    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn mtry(&self) -> usize {
        self.mtry
    }
}

fn dense(x: &Array2<f64>) -> DenseMatrix<f64> {
    let rows: Vec<Vec<f64>> = x.rows().into_iter().map(|row| row.to_vec()).collect();
    DenseMatrix::from_2d_vec(&rows)
}
