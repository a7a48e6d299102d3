//! Dataset loading and writing
//!
//! Both pipeline stages exchange data as headered CSV files. Reading infers
//! the schema from the first rows; writing preserves column order and never
//! adds a row-index column.

use polars::prelude::*;
use std::path::Path;

use crate::error::Result;

/// Load a headered CSV file into a DataFrame.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(1000))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    Ok(df)
}

/// Write a DataFrame as a headered CSV file.
pub fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    CsvWriter::new(&mut file).finish(&mut df.clone())?;
    Ok(())
}
