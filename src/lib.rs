//! Zomato Prep - restaurant listing preprocessor
//!
//! This library turns the Zomato Bangalore listings CSV into a flat numeric
//! feature table for statistical modeling:
//! - Rating normalization (`"4.1/5"` -> `4.1`, unrated listings dropped)
//! - Binary flags for chains, online ordering, table booking and dining type
//! - Dummy encoding of frequent neighborhoods and the top cuisines
//!
//! # Example
//!
//! ```no_run
//! use zomato_prep::{PipelineConfig, Preprocessor};
//!
//! let preprocessor = Preprocessor::new(PipelineConfig::default());
//! let summary = preprocessor
//!     .process_file("data/zomato.csv", "processed_data.csv")
//!     .unwrap();
//! println!("Wrote {} rows", summary.rows_written);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;

// Re-export commonly used types
pub use config::{PipelineConfig, Threshold};
pub use data::CuisineRanking;
pub use error::{PreprocessError, Result};
pub use pipeline::{Preprocessor, ProcessedData, RunSummary, Stage};
