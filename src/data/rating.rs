//! Rating normalization
//!
//! Ratings arrive as `"<number>/5"` strings (sometimes `"4.1 /5"`), or as the
//! sentinels `NEW` and `-` for unrated listings.

use polars::prelude::*;
use tracing::info;

use crate::data::{add_column, retain_rows, string_values};
use crate::error::Result;

/// Source column holding the raw rating text
pub const RATE_COLUMN: &str = "rate";
/// Derived numeric rating column
pub const RATING_COLUMN: &str = "final_rating";

/// Parse a raw rating into a number.
///
/// Missing values, sentinels and anything unparseable map to 0.
pub fn parse_rating(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };

    let score = raw.split('/').next().unwrap_or("").trim();
    match score {
        "NEW" | "-" => 0.0,
        _ => score
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0),
    }
}

/// Add `final_rating` and drop rows whose rating resolves to 0
pub fn add_final_rating(df: DataFrame) -> Result<DataFrame> {
    let ratings: Vec<f64> = string_values(&df, RATE_COLUMN)?
        .iter()
        .map(|raw| parse_rating(raw.as_deref()))
        .collect();

    let keep: Vec<bool> = ratings.iter().map(|r| *r != 0.0).collect();

    let mut df = df;
    add_column(&mut df, Column::new(RATING_COLUMN.into(), ratings))?;
    let rated = retain_rows(&df, &keep)?;

    info!(
        "Rated listings: {} of {} ({} unrated dropped)",
        rated.height(),
        df.height(),
        df.height() - rated.height()
    );
    Ok(rated)
}
