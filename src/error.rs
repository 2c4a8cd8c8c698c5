use polars::prelude::PolarsError;
use thiserror::Error;

/// Preprocessing error types
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Dataframe operation failed: {0}")]
    Polars(#[from] PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize summary: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Input CSV lacks a column the pipeline depends on
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Derived column name collides with an existing column
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Invalid threshold '{0}': expected a non-negative count or 'median'")]
    InvalidThreshold(String),
}

pub type Result<T> = std::result::Result<T, PreprocessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PreprocessError::MissingColumn("rate".to_string());
        assert_eq!(err.to_string(), "Missing required column: rate");

        let err = PreprocessError::DuplicateColumn("cafe_bin".to_string());
        assert_eq!(err.to_string(), "Duplicate column name: cafe_bin");

        let err = PreprocessError::InvalidThreshold("abc".to_string());
        assert!(err.to_string().contains("'abc'"));
    }

    #[test]
    fn test_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "zomato.csv");
        let err: PreprocessError = io.into();
        assert!(matches!(err, PreprocessError::Io(_)));
    }
}
