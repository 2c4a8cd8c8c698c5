//! Binary feature derivation
//!
//! Turn chain membership, yes/no listing attributes and restaurant type into
//! 0/1 integer columns.

use polars::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::config::Threshold;
use crate::data::csv_loader::drop_columns;
use crate::data::encoding::frequency_table;
use crate::data::{add_column, string_values};
use crate::error::Result;

/// Restaurant types retained for modeling
pub const RESTAURANT_TYPES: [&str; 2] = ["Casual Dining", "Quick Bites"];

/// Restaurant type flagged by `casual_dining_bin`
const CASUAL_DINING: &str = "Casual Dining";

/// Source columns consumed by the binary flags (plus the raw rating)
const CONSUMED_COLUMNS: [&str; 4] = ["online_order", "book_table", "rest_type", "rate"];

/// Keep only Casual Dining and Quick Bites listings
pub fn filter_restaurant_types(df: DataFrame) -> Result<DataFrame> {
    let before = df.height();
    let filtered = df
        .lazy()
        .filter(
            col("rest_type")
                .eq(lit(RESTAURANT_TYPES[0]))
                .or(col("rest_type").eq(lit(RESTAURANT_TYPES[1]))),
        )
        .collect()?;

    info!(
        "Restaurant type filter: {} of {} rows kept",
        filtered.height(),
        before
    );
    Ok(filtered)
}

/// 1 where the value equals `target` exactly, 0 otherwise (including missing)
pub fn equals_flag(values: &[Option<String>], target: &str) -> Vec<i32> {
    values
        .iter()
        .map(|v| i32::from(v.as_deref() == Some(target)))
        .collect()
}

/// Add `chain`: 1 for listings whose name occurs at least `threshold` times.
///
/// Returns the frame together with the chain names, most frequent first.
pub fn add_chain_flag(df: DataFrame, threshold: Threshold) -> Result<(DataFrame, Vec<String>)> {
    let names = string_values(&df, "name")?;
    let counts = frequency_table(names.iter().flatten().map(String::as_str));

    let frequencies: Vec<usize> = counts.iter().map(|(_, c)| *c).collect();
    let cutoff = threshold.resolve(&frequencies);

    let chains: Vec<String> = counts
        .into_iter()
        .filter(|(_, count)| Threshold::is_met(cutoff, *count))
        .map(|(name, _)| name)
        .collect();
    let chain_set: HashSet<&str> = chains.iter().map(String::as_str).collect();

    let flags: Vec<i32> = names
        .iter()
        .map(|n| i32::from(n.as_deref().is_some_and(|n| chain_set.contains(n))))
        .collect();

    let mut df = df;
    add_column(&mut df, Column::new("chain".into(), flags))?;

    info!(
        "Chains: {} names at threshold {} (cutoff {})",
        chains.len(),
        threshold,
        cutoff
    );
    Ok((df, chains))
}

/// Add `online_order_bin`, `book_table_bin` and `casual_dining_bin`, then drop
/// their source columns together with the raw rating.
pub fn add_binary_flags(df: DataFrame) -> Result<DataFrame> {
    let online = equals_flag(&string_values(&df, "online_order")?, "Yes");
    let booking = equals_flag(&string_values(&df, "book_table")?, "Yes");
    let casual = equals_flag(&string_values(&df, "rest_type")?, CASUAL_DINING);

    let mut df = df;
    add_column(&mut df, Column::new("online_order_bin".into(), online))?;
    add_column(&mut df, Column::new("book_table_bin".into(), booking))?;
    add_column(&mut df, Column::new("casual_dining_bin".into(), casual))?;
    debug!("Added online_order_bin, book_table_bin, casual_dining_bin");

    drop_columns(df, &CONSUMED_COLUMNS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_values(df: &DataFrame, name: &str) -> Vec<i32> {
        df.column(name)
            .unwrap()
            .i32()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    #[test]
    fn test_filter_restaurant_types() {
        let df = df!(
            "name" => ["a", "b", "c", "d", "e"],
            "rest_type" => [
                Some("Casual Dining"),
                Some("Cafe"),
                Some("Quick Bites"),
                None,
                Some("casual dining"),
            ]
        )
        .unwrap();

        let filtered = filter_restaurant_types(df).unwrap();
        assert_eq!(filtered.height(), 2);
        let types = string_values(&filtered, "rest_type").unwrap();
        assert!(types
            .iter()
            .all(|t| RESTAURANT_TYPES.contains(&t.as_deref().unwrap())));
    }

    #[test]
    fn test_equals_flag() {
        let values = vec![
            Some("Yes".to_string()),
            Some("No".to_string()),
            Some("yes".to_string()),
            None,
        ];
        assert_eq!(equals_flag(&values, "Yes"), vec![1, 0, 0, 0]);
    }

    #[test]
    fn test_add_chain_flag() {
        let df = df!(
            "name" => [Some("Empire"), Some("Empire"), Some("Empire"), Some("Truffles"), None]
        )
        .unwrap();

        let (df, chains) = add_chain_flag(df, Threshold::Count(3)).unwrap();
        assert_eq!(chains, vec!["Empire".to_string()]);
        assert_eq!(int_values(&df, "chain"), vec![1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_add_chain_flag_boundary() {
        let df = df!("name" => ["A", "A", "B"]).unwrap();

        let (df, chains) = add_chain_flag(df, Threshold::Count(2)).unwrap();
        assert_eq!(chains, vec!["A".to_string()]);
        assert_eq!(int_values(&df, "chain"), vec![1, 1, 0]);
    }

    #[test]
    fn test_add_chain_flag_median() {
        // counts: A=3, B=1, C=1 -> median 1, every name qualifies
        let df = df!("name" => ["A", "A", "A", "B", "C"]).unwrap();

        let (df, chains) = add_chain_flag(df, Threshold::Median).unwrap();
        assert_eq!(chains.len(), 3);
        assert_eq!(int_values(&df, "chain"), vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_add_binary_flags() {
        let df = df!(
            "name" => ["Truffles", "Dosa Hut"],
            "online_order" => ["Yes", "No"],
            "book_table" => ["No", "Yes"],
            "rest_type" => ["Casual Dining", "Quick Bites"],
            "rate" => ["4.1/5", "3.9/5"]
        )
        .unwrap();

        let df = add_binary_flags(df).unwrap();
        assert_eq!(int_values(&df, "online_order_bin"), vec![1, 0]);
        assert_eq!(int_values(&df, "book_table_bin"), vec![0, 1]);
        assert_eq!(int_values(&df, "casual_dining_bin"), vec![1, 0]);

        for name in CONSUMED_COLUMNS {
            assert!(df.get_column_index(name).is_none());
        }
        assert!(df.get_column_index("name").is_some());
    }
}
