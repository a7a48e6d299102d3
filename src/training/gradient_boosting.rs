//! Gradient boosting classifier
//!
//! Multinomial (softmax) gradient boosted decision trees over the graded
//! relevance label: one regression tree per class per boosting round, fitted
//! to the softmax residuals.

use ndarray::{Array1, Array2, Axis};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::decision_tree::RegressionTree;
use crate::error::{HotelSortError, Result};

/// Gradient boosting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingConfig {
    /// Number of boosting rounds
    pub n_estimators: usize,
    /// Learning rate (shrinkage)
    pub learning_rate: f64,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum samples per leaf
    pub min_samples_leaf: usize,
    /// Subsample ratio for each tree
    pub subsample: f64,
    /// Column subsample ratio
    pub colsample_bytree: f64,
    /// Random seed
    pub random_state: Option<u64>,
    /// Emit per-round progress
    pub verbose: bool,
}

impl Default for GradientBoostingConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 6,
            min_samples_leaf: 1,
            subsample: 0.8,
            colsample_bytree: 0.8,
            random_state: Some(42),
            verbose: false,
        }
    }
}

/// Gradient boosting classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingClassifier {
    config: GradientBoostingConfig,
    /// Distinct class labels, ascending
    classes: Vec<i64>,
    /// Per-class log-prior base scores
    initial_scores: Vec<f64>,
    trees: Vec<RegressionTree>,
    /// Class index each tree boosts
    tree_class: Vec<usize>,
    col_indices_per_tree: Vec<Vec<usize>>,
    feature_importances: Vec<f64>,
}

impl GradientBoostingClassifier {
    pub fn new(config: GradientBoostingConfig) -> Self {
        Self {
            config,
            classes: Vec::new(),
            initial_scores: Vec::new(),
            trees: Vec::new(),
            tree_class: Vec::new(),
            col_indices_per_tree: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    pub fn config(&self) -> &GradientBoostingConfig {
        &self.config
    }

    /// Fit the classifier
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples == 0 {
            return Err(HotelSortError::DataError("Empty training set".to_string()));
        }
        if n_samples != y.len() {
            return Err(HotelSortError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }

        // Distinct labels, ascending
        let mut classes: Vec<i64> = y.iter().map(|&v| v.round() as i64).collect();
        classes.sort_unstable();
        classes.dedup();
        if classes.len() < 2 {
            return Err(HotelSortError::ValidationError(
                "Need at least 2 classes to fit a classifier".to_string(),
            ));
        }
        self.classes = classes;
        let n_classes = self.classes.len();

        let class_idx: Vec<usize> = y
            .iter()
            .map(|&v| {
                self.classes
                    .binary_search(&(v.round() as i64))
                    .unwrap_or(0)
            })
            .collect();

        // Log-prior base scores
        self.initial_scores = (0..n_classes)
            .map(|k| {
                let count = class_idx.iter().filter(|&&c| c == k).count();
                ((count as f64 / n_samples as f64) + 1e-12).ln()
            })
            .collect();

        let mut scores = Array2::from_shape_fn((n_samples, n_classes), |(_, k)| {
            self.initial_scores[k]
        });

        let mut rng = match self.config.random_state {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        };

        self.feature_importances = vec![0.0; n_features];

        for round in 0..self.config.n_estimators {
            let probs = softmax_rows(&scores);

            if self.config.verbose {
                let loss = -(0..n_samples)
                    .map(|i| (probs[[i, class_idx[i]]] + 1e-12).ln())
                    .sum::<f64>()
                    / n_samples as f64;
                info!(round = round + 1, loss, "boosting round");
            }

            for k in 0..n_classes {
                // Softmax residuals for this class
                let residuals: Array1<f64> = (0..n_samples)
                    .map(|i| {
                        let target = if class_idx[i] == k { 1.0 } else { 0.0 };
                        target - probs[[i, k]]
                    })
                    .collect();

                let sample_indices = subsample_indices(n_samples, self.config.subsample, &mut rng);
                let col_indices =
                    subsample_indices(n_features, self.config.colsample_bytree, &mut rng);

                let x_sub = x
                    .select(Axis(0), &sample_indices)
                    .select(Axis(1), &col_indices);
                let y_sub: Array1<f64> =
                    Array1::from_vec(sample_indices.iter().map(|&i| residuals[i]).collect());

                let mut tree = RegressionTree::new()
                    .with_max_depth(self.config.max_depth)
                    .with_min_samples_leaf(self.config.min_samples_leaf);
                tree.fit(&x_sub, &y_sub)?;

                // Re-score every row so the next round's gradients stay consistent
                let x_cols = x.select(Axis(1), &col_indices);
                let tree_pred = tree.predict(&x_cols)?;
                for i in 0..n_samples {
                    scores[[i, k]] += self.config.learning_rate * tree_pred[i];
                }

                if let Some(tree_importance) = tree.feature_importances() {
                    for (j, &col_idx) in col_indices.iter().enumerate() {
                        if j < tree_importance.len() {
                            self.feature_importances[col_idx] += tree_importance[j];
                        }
                    }
                }

                self.trees.push(tree);
                self.tree_class.push(k);
                self.col_indices_per_tree.push(col_indices);
            }
        }

        // Normalize feature importances
        let total: f64 = self.feature_importances.iter().sum();
        if total > 0.0 {
            for imp in &mut self.feature_importances {
                *imp /= total;
            }
        }

        Ok(())
    }

    /// Predict class labels
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let probs = self.predict_proba(x)?;
        let labels: Vec<f64> = probs
            .rows()
            .into_iter()
            .map(|row| {
                let best = row
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                    .map(|(k, _)| k)
                    .unwrap_or(0);
                self.classes[best] as f64
            })
            .collect();
        Ok(Array1::from_vec(labels))
    }

    /// Predict per-class probabilities (columns follow `classes()` order)
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if self.trees.is_empty() {
            return Err(HotelSortError::ModelNotFitted);
        }

        let n = x.nrows();
        let n_classes = self.classes.len();
        let mut scores = Array2::from_shape_fn((n, n_classes), |(_, k)| self.initial_scores[k]);

        for ((tree, &k), col_indices) in self
            .trees
            .iter()
            .zip(self.tree_class.iter())
            .zip(self.col_indices_per_tree.iter())
        {
            let x_sub = x.select(Axis(1), col_indices);
            let tree_pred = tree.predict(&x_sub)?;
            for i in 0..n {
                scores[[i, k]] += self.config.learning_rate * tree_pred[i];
            }
        }

        Ok(softmax_rows(&scores))
    }

    /// Distinct class labels, ascending
    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }
}

/// Row-wise softmax, stabilized by the row maximum.
fn softmax_rows(scores: &Array2<f64>) -> Array2<f64> {
    let mut out = scores.clone();
    for mut row in out.rows_mut() {
        let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut sum = 0.0;
        for v in row.iter_mut() {
            *v = (*v - max).exp();
            sum += *v;
        }
        for v in row.iter_mut() {
            *v /= sum;
        }
    }
    out
}

/// Sample a sorted index subset of size ceil(n * ratio).
pub(crate) fn subsample_indices(
    n: usize,
    ratio: f64,
    rng: &mut Xoshiro256PlusPlus,
) -> Vec<usize> {
    let sample_size = ((n as f64) * ratio).ceil() as usize;
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices.truncate(sample_size);
    indices.sort_unstable();
    indices
}
