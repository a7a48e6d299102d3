//! LambdaMART ranking model
//!
//! Gradient boosted trees driven by pairwise LambdaRank gradients: within
//! each query group, document pairs with unequal relevance contribute a
//! gradient weighted by the NDCG change their swap would cause.

use ndarray::{Array1, Array2, Axis};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::decision_tree::RegressionTree;
use super::gradient_boosting::subsample_indices;
use crate::error::{HotelSortError, Result};

/// LambdaMART configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambdaMartConfig {
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
    /// Sigmoid steepness for pairwise gradients
    pub sigma: f64,
    /// Random seed
    pub random_state: Option<u64>,
    /// Emit per-round progress
    pub verbose: bool,
}

impl Default for LambdaMartConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 6,
            min_samples_leaf: 1,
            subsample: 0.8,
            colsample_bytree: 0.8,
            sigma: 1.0,
            random_state: Some(42),
            verbose: false,
        }
    }
}

/// LambdaMART ranker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambdaMart {
    config: LambdaMartConfig,
    trees: Vec<RegressionTree>,
    col_indices_per_tree: Vec<Vec<usize>>,
    feature_importances: Vec<f64>,
}

impl LambdaMart {
    pub fn new(config: LambdaMartConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            col_indices_per_tree: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    pub fn config(&self) -> &LambdaMartConfig {
        &self.config
    }

    /// Fit the ranker.
    ///
    /// `query_ids` partitions the rows into queries; rows of one query must
    /// be consecutive, which is how the cleaned search log is laid out.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>, query_ids: &[i64]) -> Result<()> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples == 0 {
            return Err(HotelSortError::DataError("Empty training set".to_string()));
        }
        if y.len() != n_samples {
            return Err(HotelSortError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if query_ids.len() != n_samples {
            return Err(HotelSortError::ShapeError {
                expected: format!("query_ids length = {}", n_samples),
                actual: format!("query_ids length = {}", query_ids.len()),
            });
        }

        let boundaries = group_boundaries(query_ids);

        // Ranking starts from a zero base score
        let mut scores = vec![0.0f64; n_samples];

        let mut rng = match self.config.random_state {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        };

        self.feature_importances = vec![0.0; n_features];

        let targets: Vec<f64> = y.to_vec();

        for round in 0..self.config.n_estimators {
            let gradients =
                lambda_gradients(&scores, &targets, &boundaries, self.config.sigma);

            if self.config.verbose {
                let mean_abs_lambda =
                    gradients.iter().map(|g| g.abs()).sum::<f64>() / n_samples as f64;
                info!(round = round + 1, mean_abs_lambda, "boosting round");
            }

            // Trees are fitted to the descent direction
            let response: Array1<f64> = gradients.iter().map(|g| -g).collect();

            let sample_indices = subsample_indices(n_samples, self.config.subsample, &mut rng);
            let col_indices =
                subsample_indices(n_features, self.config.colsample_bytree, &mut rng);

            let x_sub = x
                .select(Axis(0), &sample_indices)
                .select(Axis(1), &col_indices);
            let y_sub: Array1<f64> =
                Array1::from_vec(sample_indices.iter().map(|&i| response[i]).collect());

            let mut tree = RegressionTree::new()
                .with_max_depth(self.config.max_depth)
                .with_min_samples_leaf(self.config.min_samples_leaf);
            tree.fit(&x_sub, &y_sub)?;

            // Re-score every row; group-wise gradients need consistent scores
            let x_cols = x.select(Axis(1), &col_indices);
            let tree_pred = tree.predict(&x_cols)?;
            for i in 0..n_samples {
                scores[i] += self.config.learning_rate * tree_pred[i];
            }

            if let Some(tree_importance) = tree.feature_importances() {
                for (j, &col_idx) in col_indices.iter().enumerate() {
                    if j < tree_importance.len() {
                        self.feature_importances[col_idx] += tree_importance[j];
                    }
                }
            }

            self.trees.push(tree);
            self.col_indices_per_tree.push(col_indices);
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

    /// Predict ranking scores (higher means more relevant within a query)
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(HotelSortError::ModelNotFitted);
        }

        let n = x.nrows();
        let mut scores = Array1::zeros(n);

        for (tree, col_indices) in self.trees.iter().zip(self.col_indices_per_tree.iter()) {
            let x_sub = x.select(Axis(1), col_indices);
            let tree_pred = tree.predict(&x_sub)?;
            for i in 0..n {
                scores[i] += self.config.learning_rate * tree_pred[i];
            }
        }

        Ok(scores)
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }
}

/// Boundaries of consecutive query-id runs: `boundaries[q]` is the start row
/// of query `q`, with a final element at the row count.
pub fn group_boundaries(query_ids: &[i64]) -> Vec<usize> {
    let mut boundaries = vec![0];
    for i in 1..query_ids.len() {
        if query_ids[i] != query_ids[i - 1] {
            boundaries.push(i);
        }
    }
    boundaries.push(query_ids.len());
    boundaries
}

/// DCG gain for a relevance label.
#[inline]
fn gain(label: f64) -> f64 {
    2.0f64.powf(label) - 1.0
}

/// Position discount.
#[inline]
fn discount(pos: usize) -> f64 {
    1.0 / (2.0 + pos as f64).log2()
}

/// Ideal DCG for a query group.
fn ideal_dcg(labels: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = labels.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    sorted
        .iter()
        .enumerate()
        .map(|(pos, &label)| gain(label) * discount(pos))
        .sum()
}

/// Pairwise LambdaRank gradients.
///
/// For each in-group pair where document i is more relevant than j, both
/// sides receive a gradient scaled by the |ΔNDCG| of swapping the pair in
/// the current ranking.
fn lambda_gradients(
    predictions: &[f64],
    targets: &[f64],
    boundaries: &[usize],
    sigma: f64,
) -> Vec<f64> {
    let mut gradients = vec![0.0; predictions.len()];

    for window in boundaries.windows(2) {
        let (start, end) = (window[0], window[1]);
        if end <= start + 1 {
            continue; // need at least 2 docs to form pairs
        }

        let labels = &targets[start..end];
        let preds = &predictions[start..end];

        let idcg = ideal_dcg(labels);
        if idcg <= 0.0 {
            continue;
        }

        // Current ranking by score
        let mut order: Vec<usize> = (0..labels.len()).collect();
        order.sort_by(|&a, &b| {
            preds[b]
                .partial_cmp(&preds[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for (pos_i, &idx_i) in order.iter().enumerate() {
            for (pos_j, &idx_j) in order.iter().enumerate() {
                if pos_i == pos_j {
                    continue;
                }

                let label_i = labels[idx_i];
                let label_j = labels[idx_j];

                // Only pairs where i is more relevant
                if label_i <= label_j {
                    continue;
                }

                let s_ij = preds[idx_i] - preds[idx_j];
                let sigmoid = 1.0 / (1.0 + (-sigma * s_ij).exp());

                let delta_ndcg = ((gain(label_i) - gain(label_j))
                    * (discount(pos_i) - discount(pos_j))
                    / idcg)
                    .abs();

                let lambda = -sigma * (1.0 - sigmoid) * delta_ndcg;

                gradients[start + idx_i] += lambda;
                gradients[start + idx_j] -= lambda;
            }
        }
    }

    gradients
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_ranking_data() -> (Array2<f64>, Array1<f64>, Vec<i64>) {
        // 10 queries of 5 documents with labels 0,0,1,1,2; the first feature
        // tracks the label, the second is constant
        let n_queries = 10;
        let labels_per_query = [0.0, 0.0, 1.0, 1.0, 2.0];

        let mut rows = Vec::new();
        let mut y = Vec::new();
        let mut qids = Vec::new();

        for q in 0..n_queries {
            for (d, &label) in labels_per_query.iter().enumerate() {
                rows.push(label + (q * 5 + d) as f64 * 0.001);
                rows.push(1.0);
                y.push(label);
                qids.push(q as i64);
            }
        }

        let x = Array2::from_shape_vec((n_queries * 5, 2), rows).unwrap();
        (x, Array1::from_vec(y), qids)
    }

    #[test]
    fn test_group_boundaries() {
        let qids = vec![1, 1, 2, 2, 2, 3];
        assert_eq!(group_boundaries(&qids), vec![0, 2, 5, 6]);
    }

    #[test]
    fn test_gradients_push_relevant_up() {
        let scores = vec![0.0, 0.0, 0.0];
        let targets = vec![2.0, 1.0, 0.0];
        let boundaries = vec![0, 3];

        let grads = lambda_gradients(&scores, &targets, &boundaries, 1.0);

        // Descent direction -gradient must raise the most relevant doc
        // and lower the least relevant one
        assert!(grads[0] < 0.0);
        assert!(grads[2] > 0.0);
    }

    #[test]
    fn test_single_doc_groups_have_zero_gradient() {
        let scores = vec![0.0, 0.0];
        let targets = vec![2.0, 0.0];
        let boundaries = vec![0, 1, 2];

        let grads = lambda_gradients(&scores, &targets, &boundaries, 1.0);
        assert_eq!(grads, vec![0.0, 0.0]);
    }

    #[test]
    fn test_fit_ranks_relevant_higher() {
        let (x, y, qids) = create_ranking_data();
        let config = LambdaMartConfig {
            n_estimators: 20,
            max_depth: 3,
            ..Default::default()
        };

        let mut model = LambdaMart::new(config);
        model.fit(&x, &y, &qids).unwrap();

        let scores = model.predict(&x).unwrap();

        let mean_for = |label: f64| {
            let (sum, count) = y
                .iter()
                .zip(scores.iter())
                .filter(|(yi, _)| **yi == label)
                .fold((0.0, 0usize), |(s, c), (_, sc)| (s + sc, c + 1));
            sum / count as f64
        };

        assert!(
            mean_for(2.0) > mean_for(0.0),
            "booked documents should outscore ignored ones"
        );
    }

    #[test]
    fn test_feature_importances_favor_signal() {
        let (x, y, qids) = create_ranking_data();
        let config = LambdaMartConfig {
            n_estimators: 10,
            max_depth: 3,
            ..Default::default()
        };

        let mut model = LambdaMart::new(config);
        model.fit(&x, &y, &qids).unwrap();

        let importances = model.feature_importances();
        assert_eq!(importances.len(), 2);
        assert!(importances[0] >= importances[1]);
    }

    #[test]
    fn test_query_ids_length_mismatch() {
        let (x, y, _) = create_ranking_data();
        let mut model = LambdaMart::new(LambdaMartConfig::default());
        assert!(model.fit(&x, &y, &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_predict_before_fit() {
        let model = LambdaMart::new(LambdaMartConfig::default());
        let x = Array2::<f64>::zeros((1, 2));
        assert!(matches!(
            model.predict(&x),
            Err(HotelSortError::ModelNotFitted)
        ));
    }
}
