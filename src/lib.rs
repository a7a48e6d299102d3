//! hotelsort - offline learning-to-rank pipeline for hotel search results
//!
//! Two command-line stages composed by file handoff:
//!
//! - [`preprocessing`] - clean a raw search log: drop unusable columns and
//!   resolve missing values with a fixed default policy
//! - [`training`] - fit a LambdaMART ranker or a gradient boosting
//!   classifier on the cleaned data and report feature importances
//!
//! Supporting modules:
//!
//! - [`data`] - CSV loading and writing
//! - [`model`] - fitted-model artifact (selection, persistence)
//! - [`cli`] - command-line interface

// Core error handling
pub mod error;

// Pipeline stages
pub mod data;
pub mod preprocessing;
pub mod training;
pub mod model;

// Services
pub mod cli;

pub use error::{HotelSortError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{HotelSortError, Result};

    // Preprocessing
    pub use crate::preprocessing::{Cleaner, CleaningConfig, FillRule};

    // Training
    pub use crate::training::{
        cross_val_score, CVResults, CVSplit, CVStrategy, CrossValidator,
        GradientBoostingClassifier, GradientBoostingConfig, LambdaMart, LambdaMartConfig,
        RegressionTree, TrainingFrame,
    };

    // Model artifact
    pub use crate::model::{ModelKind, SavedModel};
}
