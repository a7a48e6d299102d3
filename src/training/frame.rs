//! Training frame extraction
//!
//! Turns a cleaned DataFrame into the feature matrix, relevance target, and
//! query grouping key the estimators consume.

use ndarray::{Array1, Array2};
use polars::prelude::*;

use crate::error::{HotelSortError, Result};

/// Identifier and outcome columns excluded from the feature matrix.
pub const EXCLUDED_COLUMNS: [&str; 4] = ["click_bool", "booking_bool", "srch_id", "prop_id"];

/// Feature matrix, target, and grouping key extracted from a cleaned dataset.
///
/// The target is `click_bool + booking_bool`, a graded relevance label in
/// {0, 1, 2}. Feature columns keep their dataset order.
#[derive(Debug, Clone)]
pub struct TrainingFrame {
    pub x: Array2<f64>,
    pub y: Array1<f64>,
    /// Query key (`srch_id`) per row, in dataset order
    pub query_ids: Vec<i64>,
    pub feature_names: Vec<String>,
}

impl TrainingFrame {
    /// Extract features, target, and query ids from a cleaned DataFrame.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let feature_names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .filter(|name| !EXCLUDED_COLUMNS.contains(&name.as_str()))
            .map(|name| name.to_string())
            .collect();

        if feature_names.is_empty() {
            return Err(HotelSortError::ValidationError(
                "No feature columns left after removing identifiers and outcomes".to_string(),
            ));
        }

        let clicks = column_as_f64(df, "click_bool")?;
        let bookings = column_as_f64(df, "booking_bool")?;
        let y: Array1<f64> = clicks
            .iter()
            .zip(bookings.iter())
            .map(|(click, booking)| click + booking)
            .collect();

        let query_ids: Vec<i64> = df
            .column("srch_id")
            .map_err(|_| HotelSortError::FeatureNotFound("srch_id".to_string()))?
            .as_materialized_series()
            .cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .map(|v| v.unwrap_or(0))
            .collect();

        let x = columns_to_array2(df, &feature_names)?;

        Ok(Self {
            x,
            y,
            query_ids,
            feature_names,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }
}

fn column_as_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df
        .column(name)
        .map_err(|_| HotelSortError::FeatureNotFound(name.to_string()))?
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|e| HotelSortError::DataError(e.to_string()))?;

    Ok(series
        .f64()
        .map_err(|e| HotelSortError::DataError(e.to_string()))?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect())
}

/// Extract named columns into a row-major Array2<f64>.
/// Uses `Array2::from_shape_fn` for cache-friendly construction from
/// column-major Polars data.
fn columns_to_array2(df: &DataFrame, col_names: &[String]) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let n_cols = col_names.len();

    let col_data: Vec<Vec<f64>> = col_names
        .iter()
        .map(|name| column_as_f64(df, name))
        .collect::<Result<Vec<Vec<f64>>>>()?;

    let col_refs: Vec<&[f64]> = col_data.iter().map(|c| c.as_slice()).collect();
    Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| {
        col_refs[c][r]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df!(
            "srch_id" => &[7i64, 7, 8],
            "prop_id" => &[100i64, 101, 102],
            "price_usd" => &[120.0, 89.5, 210.0],
            "prop_review_score" => &[4.5, 3.0, 5.0],
            "click_bool" => &[1i64, 0, 1],
            "booking_bool" => &[0i64, 0, 1],
        )
        .unwrap()
    }

    #[test]
    fn test_feature_exclusion() {
        let frame = TrainingFrame::from_dataframe(&sample_df()).unwrap();

        assert_eq!(
            frame.feature_names,
            vec!["price_usd".to_string(), "prop_review_score".to_string()],
            "exactly the identifier and outcome columns should be excluded"
        );
        assert_eq!(frame.x.ncols(), 2);
        assert_eq!(frame.x.nrows(), 3);
    }

    #[test]
    fn test_target_derivation() {
        let frame = TrainingFrame::from_dataframe(&sample_df()).unwrap();

        // click=1 booking=0 -> 1; click=0 booking=0 -> 0; click=1 booking=1 -> 2
        assert_eq!(frame.y[0], 1.0);
        assert_eq!(frame.y[1], 0.0);
        assert_eq!(frame.y[2], 2.0);
    }

    #[test]
    fn test_query_ids() {
        let frame = TrainingFrame::from_dataframe(&sample_df()).unwrap();
        assert_eq!(frame.query_ids, vec![7, 7, 8]);
    }

    #[test]
    fn test_matrix_values_in_column_order() {
        let frame = TrainingFrame::from_dataframe(&sample_df()).unwrap();
        assert_eq!(frame.x[[1, 0]], 89.5);
        assert_eq!(frame.x[[2, 1]], 5.0);
    }

    #[test]
    fn test_missing_outcome_column() {
        let df = df!(
            "srch_id" => &[1i64],
            "prop_id" => &[2i64],
            "price_usd" => &[10.0],
            "click_bool" => &[0i64],
        )
        .unwrap();

        assert!(matches!(
            TrainingFrame::from_dataframe(&df),
            Err(HotelSortError::FeatureNotFound(_))
        ));
    }
}
