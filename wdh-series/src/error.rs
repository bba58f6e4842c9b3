/// Error types for the series library
use thiserror::Error;

/// Main error type for series parsing and normalization.
#[derive(Error, Debug)]
pub enum SeriesError {
    /// Failed to parse RDB statistics data
    #[error("Failed to parse RDB: {0}")]
    Rdb(String),

    /// Failed to parse CSV/TSV data
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A composite series key did not match "{methodId}:{tsKey}:{period}"
    #[error("Invalid series key: {0}")]
    BadSeriesKey(String),

    /// Unrecognized time-series key (expected current, compare, or median)
    #[error("Invalid time-series key: {0}")]
    BadTsKey(String),

    /// Unrecognized period token (expected P7D, P30D, P1Y, or custom)
    #[error("Invalid period: {0}")]
    BadPeriod(String),

    /// Date parsing failed
    #[error("Failed to parse date: {0}")]
    Date(String),
}

/// Type alias for Results using SeriesError
pub type Result<T> = std::result::Result<T, SeriesError>;
