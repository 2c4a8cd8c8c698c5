//! Categorical expansion
//!
//! Neighborhoods and cuisines become one 0/1 column per frequent value.
//! Frequency ties are broken by name so the column order is stable between runs.

use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::config::Threshold;
use crate::data::{add_column, column_names, retain_rows, string_values};
use crate::error::{PreprocessError, Result};

/// Suffix appended to every dummy column
pub const DUMMY_SUFFIX: &str = "_bin";
/// Column flagging cuisines outside the top ranking
pub const OTHER_COLUMN: &str = "other_bin";
/// Separator between tags in the `cuisines` field
pub const CUISINE_SEPARATOR: &str = ", ";

/// Count occurrences of each value, most frequent first
pub fn frequency_table<'a, I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut table: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    table.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    table
}

/// Dummy column name for a categorical value
pub fn dummy_column_name(value: &str) -> String {
    format!("{}{}", value, DUMMY_SUFFIX)
}

/// Drop rows whose `cuisines` field is missing or carries no tags
pub fn drop_missing_cuisines(df: DataFrame) -> Result<DataFrame> {
    let keep: Vec<bool> = string_values(&df, "cuisines")?
        .iter()
        .map(|v| v.as_deref().is_some_and(|v| !split_cuisines(v).is_empty()))
        .collect();
    let kept = retain_rows(&df, &keep)?;

    info!("Rows with cuisines: {} of {}", kept.height(), df.height());
    Ok(kept)
}

/// Keep listings in frequent neighborhoods and add one dummy per neighborhood.
///
/// Returns the frame and the retained neighborhoods, most frequent first.
pub fn encode_neighborhoods(
    df: DataFrame,
    threshold: Threshold,
) -> Result<(DataFrame, Vec<String>)> {
    let locations = string_values(&df, "location")?;
    let counts = frequency_table(locations.iter().flatten().map(String::as_str));

    let frequencies: Vec<usize> = counts.iter().map(|(_, c)| *c).collect();
    let cutoff = threshold.resolve(&frequencies);

    let neighborhoods: Vec<String> = counts
        .into_iter()
        .filter(|(_, count)| Threshold::is_met(cutoff, *count))
        .map(|(name, _)| name)
        .collect();
    let retained: HashSet<&str> = neighborhoods.iter().map(String::as_str).collect();

    let keep: Vec<bool> = locations
        .iter()
        .map(|l| l.as_deref().is_some_and(|l| retained.contains(l)))
        .collect();
    let mut df = retain_rows(&df, &keep)?;
    let locations: Vec<&str> = locations
        .iter()
        .zip(&keep)
        .filter(|(_, kept)| **kept)
        .filter_map(|(l, _)| l.as_deref())
        .collect();

    for hood in &neighborhoods {
        let flags: Vec<i32> = locations.iter().map(|l| i32::from(*l == hood.as_str())).collect();
        add_column(&mut df, Column::new(dummy_column_name(hood).into(), flags))?;
    }

    info!(
        "Neighborhoods: {} retained at threshold {} (cutoff {}), {} rows kept",
        neighborhoods.len(),
        threshold,
        cutoff,
        df.height()
    );
    if df.height() == 0 {
        warn!("No listings left after neighborhood filter");
    }
    Ok((df, neighborhoods))
}

/// Split a cuisines field into its tags; blank tags are skipped
pub fn split_cuisines(raw: &str) -> Vec<&str> {
    raw.split(CUISINE_SEPARATOR)
        .filter(|tag| !tag.trim().is_empty())
        .collect()
}

/// Cuisine tags ranked by frequency across all listings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CuisineRanking {
    /// Encoded individually, most frequent first
    pub top: Vec<String>,
    /// Collapsed into `other_bin`
    pub other: Vec<String>,
}

impl CuisineRanking {
    /// Rank the exploded tag lists and split at `top_n`
    pub fn from_lists(lists: &[Vec<&str>], top_n: usize) -> Self {
        let table = frequency_table(lists.iter().flatten().copied());
        let mut ranked: Vec<String> = table.into_iter().map(|(tag, _)| tag).collect();
        let other = ranked.split_off(top_n.min(ranked.len()));
        Self { top: ranked, other }
    }
}

/// Add one dummy per top cuisine plus `other_bin`.
///
/// A listing is flagged for every tag it carries, so each row with a
/// non-empty cuisines field has at least one cuisine flag set.
pub fn encode_cuisines(df: DataFrame, top_n: usize) -> Result<(DataFrame, CuisineRanking)> {
    let raw = string_values(&df, "cuisines")?;
    let lists: Vec<Vec<&str>> = raw
        .iter()
        .map(|c| c.as_deref().map(split_cuisines).unwrap_or_default())
        .collect();

    let ranking = CuisineRanking::from_lists(&lists, top_n);
    let top: HashSet<&str> = ranking.top.iter().map(String::as_str).collect();

    let mut df = df;
    for cuisine in &ranking.top {
        let flags: Vec<i32> = lists
            .iter()
            .map(|tags| i32::from(tags.contains(&cuisine.as_str())))
            .collect();
        add_column(&mut df, Column::new(dummy_column_name(cuisine).into(), flags))?;
    }

    let other: Vec<i32> = lists
        .iter()
        .map(|tags| i32::from(tags.iter().any(|t| !top.contains(t))))
        .collect();
    add_column(&mut df, Column::new(OTHER_COLUMN.into(), other))?;

    info!(
        "Cuisines: {} encoded individually, {} collapsed into {}",
        ranking.top.len(),
        ranking.other.len(),
        OTHER_COLUMN
    );
    debug!("Top cuisines: {:?}", ranking.top);
    Ok((df, ranking))
}

/// Lowercase a column name and replace spaces with underscores
pub fn normalize_column_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Apply [`normalize_column_name`] to every column of the frame.
///
/// Fails when two columns normalize to the same name.
pub fn normalize_column_names(df: &mut DataFrame) -> Result<()> {
    let names: Vec<String> = column_names(df)
        .iter()
        .map(|name| normalize_column_name(name))
        .collect();

    let mut seen = HashSet::new();
    if let Some(dup) = names.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(PreprocessError::DuplicateColumn(dup.clone()));
    }
    df.set_column_names(names)?;
    Ok(())
}
