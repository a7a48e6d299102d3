//! Cleaning pass over a raw search log

use polars::prelude::*;
use tracing::info;

use super::config::CleaningConfig;
use crate::error::{HotelSortError, Result};

/// Applies the fixed cleaning policy to a raw dataset.
///
/// The policy is stateless: nothing is learned from the data, every fill is
/// a constant. Missing columns are schema errors.
#[derive(Debug, Clone)]
pub struct Cleaner {
    config: CleaningConfig,
}

impl Cleaner {
    /// Create a cleaner with the default policy
    pub fn new() -> Self {
        Self::with_config(CleaningConfig::default())
    }

    /// Create a cleaner with a custom policy
    pub fn with_config(config: CleaningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Run the cleaning pass, producing a new DataFrame.
    ///
    /// Column order of the surviving columns is preserved.
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut df = df.clone();

        for name in &self.config.drop_columns {
            info!(column = %name, "dropping column");
            df = df.drop(name)?;
        }

        for rule in &self.config.fills {
            info!(column = %rule.column, value = rule.value, "filling missing values");
            fill_with_value(&mut df, &rule.column, rule.value)?;
        }

        self.fill_competitors(&mut df)?;

        Ok(df)
    }

    /// Fill the competitor column groups with 0 and integer-cast the rate
    /// and inventory columns. The cast must come after the fill; an integer
    /// column cannot hold the missing cells.
    fn fill_competitors(&self, df: &mut DataFrame) -> Result<()> {
        for i in 1..=self.config.competitor_groups {
            let rate_col = format!("comp{i}_rate");
            let inv_col = format!("comp{i}_inv");
            let rate_percent_diff_col = format!("comp{i}_rate_percent_diff");

            info!(column = %rate_col, "filling missing values");
            fill_with_value(df, &rate_col, 0.0)?;
            cast_to_int(df, &rate_col)?;

            info!(column = %inv_col, "filling missing values");
            fill_with_value(df, &inv_col, 0.0)?;
            cast_to_int(df, &inv_col)?;

            info!(column = %rate_percent_diff_col, "filling missing values");
            fill_with_value(df, &rate_percent_diff_col, 0.0)?;
        }

        Ok(())
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace every missing cell of `name` with `value`.
///
/// A column that has missing cells is rewritten as Float64 (mirroring what
/// the fill does to an integer column in a dataframe library); a column
/// without any keeps its original dtype untouched.
fn fill_with_value(df: &mut DataFrame, name: &str, value: f64) -> Result<()> {
    let col = df
        .column(name)
        .map_err(|_| HotelSortError::FeatureNotFound(name.to_string()))?;

    if col.null_count() == 0 {
        return Ok(());
    }

    let filled = col
        .as_materialized_series()
        .cast(&DataType::Float64)?
        .f64()?
        .fill_null_with_values(value)?
        .into_series();
    df.with_column(filled)?;

    Ok(())
}

/// Cast `name` to Int64, truncating any fractional part.
fn cast_to_int(df: &mut DataFrame, name: &str) -> Result<()> {
    let casted = df
        .column(name)
        .map_err(|_| HotelSortError::FeatureNotFound(name.to_string()))?
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    df.with_column(casted)?;

    Ok(())
}
