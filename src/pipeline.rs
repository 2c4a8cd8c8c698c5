//! Preprocessing pipeline
//!
//! Runs the listing transformation top to bottom:
//! load -> drop columns -> type filter -> rating -> binary flags ->
//! neighborhoods -> cuisines -> column names -> write.

use polars::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::data::csv_loader::{check_schema, drop_columns};
use crate::data::encoding::drop_missing_cuisines;
use crate::data::{
    add_binary_flags, add_chain_flag, add_final_rating, column_names, encode_cuisines,
    encode_neighborhoods, filter_restaurant_types, load_listings, normalize_column_names,
    write_processed, DROPPED_COLUMNS,
};
use crate::error::Result;

/// Row counts and encoding choices collected during a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub rows_read: usize,
    pub rows_after_type_filter: usize,
    pub rows_rated: usize,
    pub chain_names: Vec<String>,
    pub rows_with_cuisines: usize,
    pub neighborhoods: Vec<String>,
    pub top_cuisines: Vec<String>,
    pub other_cuisine_count: usize,
    pub rows_written: usize,
    pub columns: Vec<String>,
}

impl RunSummary {
    /// Pretty JSON rendering for machine consumption
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Progress notifications emitted by [`Preprocessor::process_file_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loading,
    /// Input read; carries the row count
    Loaded(usize),
    Processing,
    Writing,
    /// Output written; carries the row count
    Written(usize),
}

/// Processed feature table with the summary of how it was produced
pub struct ProcessedData {
    pub frame: DataFrame,
    pub summary: RunSummary,
}

/// Listing preprocessor
pub struct Preprocessor {
    config: PipelineConfig,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl Preprocessor {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Transform a raw listings frame into the feature table
    pub fn run(&self, df: DataFrame) -> Result<ProcessedData> {
        let mut summary = RunSummary {
            rows_read: df.height(),
            ..Default::default()
        };

        check_schema(&df)?;
        let df = drop_columns(df, &DROPPED_COLUMNS)?;

        let df = filter_restaurant_types(df)?;
        summary.rows_after_type_filter = df.height();

        let df = add_final_rating(df)?;
        summary.rows_rated = df.height();
        if df.height() == 0 {
            warn!("No rated Casual Dining or Quick Bites listings in input");
        }

        let (df, chains) = add_chain_flag(df, self.config.chain_threshold)?;
        summary.chain_names = chains;

        let df = add_binary_flags(df)?;

        let df = drop_missing_cuisines(df)?;
        summary.rows_with_cuisines = df.height();

        let (df, neighborhoods) = encode_neighborhoods(df, self.config.neighborhood_threshold)?;
        summary.neighborhoods = neighborhoods;

        let (mut df, ranking) = encode_cuisines(df, self.config.top_cuisines)?;
        summary.top_cuisines = ranking.top;
        summary.other_cuisine_count = ranking.other.len();

        normalize_column_names(&mut df)?;
        summary.rows_written = df.height();
        summary.columns = column_names(&df);

        Ok(ProcessedData { frame: df, summary })
    }

    /// Read `input`, transform it and write the feature table to `output`
    pub fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<RunSummary> {
        self.process_file_with(input, output, |_| {})
    }

    /// Same as [`Preprocessor::process_file`], reporting each stage to `on_stage`
    pub fn process_file_with<P, Q, F>(
        &self,
        input: P,
        output: Q,
        mut on_stage: F,
    ) -> Result<RunSummary>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        F: FnMut(Stage),
    {
        on_stage(Stage::Loading);
        let df = load_listings(input)?;
        info!("Finished reading in {} rows", df.height());
        on_stage(Stage::Loaded(df.height()));

        on_stage(Stage::Processing);
        let ProcessedData { mut frame, summary } = self.run(df)?;

        on_stage(Stage::Writing);
        write_processed(&mut frame, output)?;
        info!("Successfully processed data");
        on_stage(Stage::Written(summary.rows_written));

        Ok(summary)
    }
}
