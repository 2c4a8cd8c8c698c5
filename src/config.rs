//! Pipeline configuration
//!
//! Defaults reproduce the thresholds fixed for the Bangalore dataset. Every
//! threshold can instead be resolved from the data as a median.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::PreprocessError;

/// Minimum number of listings sharing a name for it to count as a chain
pub const DEFAULT_CHAIN_THRESHOLD: usize = 15;
/// Minimum number of listings in a neighborhood for it to get its own column.
/// 167 is the median neighborhood size of the source dataset.
pub const DEFAULT_NEIGHBORHOOD_THRESHOLD: usize = 167;
/// Number of cuisines encoded individually; the rest collapse into `other_bin`
pub const DEFAULT_TOP_CUISINES: usize = 30;

/// Frequency cutoff used to select chains and neighborhoods
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Threshold {
    /// Keep values occurring at least this many times
    Count(usize),
    /// Keep values occurring at least as often as the median frequency
    Median,
}

impl Threshold {
    /// Resolve to a concrete cutoff given the frequency of every distinct value
    pub fn resolve(&self, counts: &[usize]) -> f64 {
        match self {
            Threshold::Count(n) => *n as f64,
            Threshold::Median => median(counts),
        }
    }

    /// Check whether a value with `count` occurrences meets the cutoff
    pub fn is_met(cutoff: f64, count: usize) -> bool {
        count as f64 >= cutoff
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Count(n) => write!(f, "{}", n),
            Threshold::Median => write!(f, "median"),
        }
    }
}

impl FromStr for Threshold {
    type Err = PreprocessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("median") {
            return Ok(Threshold::Median);
        }
        s.parse::<usize>()
            .map(Threshold::Count)
            .map_err(|_| PreprocessError::InvalidThreshold(s.to_string()))
    }
}

/// Median of a frequency table; 0 for an empty table
fn median(counts: &[usize]) -> f64 {
    if counts.is_empty() {
        return 0.0;
    }
    let mut sorted = counts.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    } else {
        sorted[mid] as f64
    }
}

/// Preprocessing pipeline configuration
#[derive(Debug, Clone, Serialize)]
pub struct PipelineConfig {
    pub chain_threshold: Threshold,
    pub neighborhood_threshold: Threshold,
    pub top_cuisines: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chain_threshold: Threshold::Count(DEFAULT_CHAIN_THRESHOLD),
            neighborhood_threshold: Threshold::Count(DEFAULT_NEIGHBORHOOD_THRESHOLD),
            top_cuisines: DEFAULT_TOP_CUISINES,
        }
    }
}

impl PipelineConfig {
    pub fn with_chain_threshold(mut self, threshold: Threshold) -> Self {
        self.chain_threshold = threshold;
        self
    }

    pub fn with_neighborhood_threshold(mut self, threshold: Threshold) -> Self {
        self.neighborhood_threshold = threshold;
        self
    }

    pub fn with_top_cuisines(mut self, top: usize) -> Self {
        self.top_cuisines = top;
        self
    }
}
