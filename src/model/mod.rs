//! Fitted-model artifact
//!
//! Selection of the model family by CLI flag and persistence of the fitted
//! model as an opaque binary blob. The artifact carries no version metadata;
//! it is only guaranteed to load with the library that wrote it.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{HotelSortError, Result};
use crate::training::{GradientBoostingClassifier, LambdaMart};

/// Model family selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    /// Gradient boosted ranker over query groups
    LambdaMart,
    /// Gradient boosting classifier over the relevance label
    GradientBoosting,
}

impl ModelKind {
    /// Map the CLI flag to a model family (0 = LambdaMART, 1 = classifier).
    pub fn from_flag(flag: i64) -> Option<Self> {
        match flag {
            0 => Some(ModelKind::LambdaMart),
            1 => Some(ModelKind::GradientBoosting),
            _ => None,
        }
    }

    pub fn flag(&self) -> i64 {
        match self {
            ModelKind::LambdaMart => 0,
            ModelKind::GradientBoosting => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::LambdaMart => "LambdaMART",
            ModelKind::GradientBoosting => "GradientBoostingClassifier",
        }
    }
}

/// A fitted model of either family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SavedModel {
    LambdaMart(LambdaMart),
    GradientBoosting(GradientBoostingClassifier),
}

impl SavedModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            SavedModel::LambdaMart(_) => ModelKind::LambdaMart,
            SavedModel::GradientBoosting(_) => ModelKind::GradientBoosting,
        }
    }

    /// Feature importances of the fitted model
    pub fn feature_importances(&self) -> &[f64] {
        match self {
            SavedModel::LambdaMart(model) => model.feature_importances(),
            SavedModel::GradientBoosting(model) => model.feature_importances(),
        }
    }

    /// Relevance score per row: the ranking score for LambdaMART, the
    /// predicted label for the classifier.
    pub fn score(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            SavedModel::LambdaMart(model) => model.predict(x),
            SavedModel::GradientBoosting(model) => model.predict(x),
        }
    }

    /// Serialize the model to a binary file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = bincode::serialize(self).map_err(|e| {
            HotelSortError::SerializationError(format!("Failed to serialize model: {}", e))
        })?;

        let mut file = File::create(path)?;
        file.write_all(&bytes)?;

        Ok(())
    }

    /// Load a model from a binary file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        bincode::deserialize(&bytes).map_err(|e| {
            HotelSortError::SerializationError(format!("Failed to deserialize model: {}", e))
        })
    }
}
