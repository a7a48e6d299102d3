//! Model training module
//!
//! Provides the two model families the trainer can fit:
//! - LambdaMART (gradient boosted ranking over query groups)
//! - Gradient boosting classifier (softmax over the graded relevance label)
//!
//! plus the regression tree they are built from, training-frame extraction,
//! and cross-validation.

mod frame;
pub mod cross_validation;
pub mod decision_tree;
pub mod gradient_boosting;
pub mod lambdamart;

pub use cross_validation::{cross_val_score, CVResults, CVSplit, CVStrategy, CrossValidator};
pub use decision_tree::{RegressionTree, TreeNode};
pub use frame::{TrainingFrame, EXCLUDED_COLUMNS};
pub use gradient_boosting::{GradientBoostingClassifier, GradientBoostingConfig};
pub use lambdamart::{group_boundaries, LambdaMart, LambdaMartConfig};
