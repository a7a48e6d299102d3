//! Cleaning configuration

use serde::{Deserialize, Serialize};

/// A fixed-value fill for one possibly-missing column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillRule {
    /// Column to fill
    pub column: String,
    /// Value substituted for every missing cell
    pub value: f64,
}

impl FillRule {
    pub fn new(column: impl Into<String>, value: f64) -> Self {
        Self {
            column: column.into(),
            value,
        }
    }
}

/// Configuration for the cleaning pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Columns removed before modeling
    pub drop_columns: Vec<String>,

    /// Constant fills, applied in order
    pub fills: Vec<FillRule>,

    /// Number of competitor column groups
    /// (`comp{i}_rate`, `comp{i}_inv`, `comp{i}_rate_percent_diff`)
    pub competitor_groups: usize,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            // date_time and gross_bookings_usd leak the outcome; position is
            // only present in training logs
            drop_columns: vec![
                "date_time".to_string(),
                "gross_bookings_usd".to_string(),
                "position".to_string(),
            ],
            fills: vec![
                // no review information available
                FillRule::new("prop_review_score", 0.0),
                // least desirable location; -1 might be worth trying
                FillRule::new("prop_location_score2", 0.0),
                // no star-rating history, assume the middle
                FillRule::new("visitor_hist_starrating", 3.0),
                // no purchase history
                FillRule::new("visitor_hist_adr_usd", 0.0),
                FillRule::new("srch_query_affinity_score", 0.0),
                // unknown-distance sentinel
                FillRule::new("orig_destination_distance", -1.0),
            ],
            competitor_groups: 8,
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to replace the dropped columns
    pub fn with_drop_columns(mut self, columns: Vec<String>) -> Self {
        self.drop_columns = columns;
        self
    }

    /// Builder method to replace the fill rules
    pub fn with_fills(mut self, fills: Vec<FillRule>) -> Self {
        self.fills = fills;
        self
    }

    /// Builder method to set the competitor group count
    pub fn with_competitor_groups(mut self, groups: usize) -> Self {
        self.competitor_groups = groups;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CleaningConfig::default();
        assert_eq!(config.drop_columns.len(), 3);
        assert_eq!(config.fills.len(), 6);
        assert_eq!(config.competitor_groups, 8);
    }

    #[test]
    fn test_default_fill_values() {
        let config = CleaningConfig::default();
        let find = |name: &str| {
            config
                .fills
                .iter()
                .find(|r| r.column == name)
                .map(|r| r.value)
        };

        assert_eq!(find("prop_review_score"), Some(0.0));
        assert_eq!(find("visitor_hist_starrating"), Some(3.0));
        assert_eq!(find("orig_destination_distance"), Some(-1.0));
    }

    #[test]
    fn test_builder_pattern() {
        let config = CleaningConfig::new()
            .with_competitor_groups(2)
            .with_fills(vec![FillRule::new("score", 1.0)]);

        assert_eq!(config.competitor_groups, 2);
        assert_eq!(config.fills.len(), 1);
    }
}
