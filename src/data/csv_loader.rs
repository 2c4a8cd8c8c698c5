//! CSV loading and writing for restaurant listings

use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{PreprocessError, Result};

/// Columns removed before any processing
pub const DROPPED_COLUMNS: [&str; 6] = [
    "url",
    "phone",
    "listed_in(type)",
    "listed_in(city)",
    "reviews_list",
    "menu_item",
];

/// Columns the feature derivation reads
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "rate",
    "name",
    "online_order",
    "book_table",
    "rest_type",
    "location",
    "cuisines",
];

/// Load the listings CSV with every column read as text.
///
/// Type inference is disabled so that pass-through columns keep their
/// original formatting in the output and `rate` stays a raw string.
pub fn load_listings<P: AsRef<Path>>(csv_path: P) -> Result<DataFrame> {
    let path = csv_path.as_ref();
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    info!("Loaded {} rows x {} columns from {:?}", df.height(), df.width(), path);
    Ok(df)
}

/// Verify the frame carries every column the pipeline touches
pub fn check_schema(df: &DataFrame) -> Result<()> {
    for name in REQUIRED_COLUMNS.iter().chain(DROPPED_COLUMNS.iter()) {
        if df.get_column_index(name).is_none() {
            return Err(PreprocessError::MissingColumn(name.to_string()));
        }
    }
    Ok(())
}

/// Drop the named columns; every name must exist
pub fn drop_columns(df: DataFrame, names: &[&str]) -> Result<DataFrame> {
    let mut df = df;
    for name in names {
        if df.get_column_index(name).is_none() {
            return Err(PreprocessError::MissingColumn(name.to_string()));
        }
        df = df.drop(name)?;
        debug!("Dropped column {}", name);
    }
    Ok(df)
}

/// Write the processed table as CSV with a header row and no index
pub fn write_processed<P: AsRef<Path>>(df: &mut DataFrame, csv_path: P) -> Result<()> {
    let path = csv_path.as_ref();
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)?;

    info!("Wrote {} rows x {} columns to {:?}", df.height(), df.width(), path);
    Ok(())
}
