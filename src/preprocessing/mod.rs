//! Data cleaning module
//!
//! Prepares a raw hotel-search log for model fitting:
//! - Removal of label-leaking and unusable columns
//! - Fixed-default fills for designated possibly-missing columns
//! - Competitor column groups: fill then integer-cast

mod cleaner;
mod config;

pub use cleaner::Cleaner;
pub use config::{CleaningConfig, FillRule};
