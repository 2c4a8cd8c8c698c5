//! Data loading, feature derivation and categorical encoding modules

pub mod csv_loader;
pub mod encoding;
pub mod features;
pub mod rating;

use polars::prelude::*;

use crate::error::{PreprocessError, Result};

// Re-export commonly used types
pub use csv_loader::{load_listings, write_processed, DROPPED_COLUMNS, REQUIRED_COLUMNS};
pub use encoding::{
    encode_cuisines, encode_neighborhoods, frequency_table, normalize_column_names,
    CuisineRanking,
};
pub use features::{add_binary_flags, add_chain_flag, filter_restaurant_types};
pub use rating::{add_final_rating, parse_rating};

/// Keep only the rows whose mask entry is `true`
pub(crate) fn retain_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice(PlSmallStr::from_static("keep"), keep);
    Ok(df.filter(&mask)?)
}

/// Append a derived column, refusing names that already exist.
///
/// Names are compared after [`encoding::normalize_column_name`] so that
/// `Cafe_bin` and `cafe_bin` count as the same column.
pub(crate) fn add_column(df: &mut DataFrame, column: Column) -> Result<()> {
    let name = encoding::normalize_column_name(column.name());
    if column_names(df)
        .iter()
        .any(|existing| encoding::normalize_column_name(existing) == name)
    {
        return Err(PreprocessError::DuplicateColumn(column.name().to_string()));
    }
    df.with_column(column)?;
    Ok(())
}

/// Copy a string column out of the frame so the frame can be mutated afterwards
pub(crate) fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let values = df.column(name)?.str()?;
    Ok(values
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Frame with its column names listed in order
pub(crate) fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retain_rows() {
        let df = df!("name" => ["a", "b", "c"]).unwrap();
        let kept = retain_rows(&df, &[true, false, true]).unwrap();
        assert_eq!(kept.height(), 2);
        assert_eq!(
            string_values(&kept, "name").unwrap(),
            vec![Some("a".to_string()), Some("c".to_string())]
        );
    }

    #[test]
    fn test_add_column() {
        let mut df = df!("name" => ["a", "b"]).unwrap();
        add_column(&mut df, Column::new("chain".into(), vec![1, 0])).unwrap();
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_add_column_rejects_existing_name() {
        let mut df = df!("Cafe_bin" => [1, 0]).unwrap();

        let err = add_column(&mut df, Column::new("Cafe_bin".into(), vec![0, 1])).unwrap_err();
        assert!(matches!(err, PreprocessError::DuplicateColumn(ref n) if n == "Cafe_bin"));

        // differs only by case, collides once names are normalized
        let err = add_column(&mut df, Column::new("cafe_bin".into(), vec![0, 1])).unwrap_err();
        assert!(matches!(err, PreprocessError::DuplicateColumn(_)));

        let flags = df.column("Cafe_bin").unwrap().i32().unwrap();
        assert_eq!(flags.get(0), Some(1));
    }

    #[test]
    fn test_string_values_keeps_nulls() {
        let df = df!("cuisines" => [Some("Cafe"), None]).unwrap();
        let values = string_values(&df, "cuisines").unwrap();
        assert_eq!(values, vec![Some("Cafe".to_string()), None]);
    }

    #[test]
    fn test_string_values_missing_column() {
        let df = df!("name" => ["a"]).unwrap();
        assert!(string_values(&df, "rate").is_err());
    }
}
