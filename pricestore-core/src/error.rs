//! Structured error types for price store operations.

use polars::prelude::{DataType, PolarsError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while scanning a dataset or reading price tables.
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("unsupported timeframe '{timeframe}' (expected 'day' or 'hour')")]
    UnsupportedTimeframe { timeframe: String },

    #[error("symbol not found: {symbol} ({timeframe} data)")]
    SymbolNotFound { symbol: String, timeframe: String },

    #[error("date column error in {}: {reason}", path.display())]
    DateColumn { path: PathBuf, reason: String },

    #[error("column not found: '{column}'")]
    ColumnNotFound { column: String },

    #[error("column '{column}' has non-numeric type {dtype:?}")]
    ColumnType { column: String, dtype: DataType },

    #[error("failed to read parquet file {}: {reason}", path.display())]
    ParquetRead { path: PathBuf, reason: String },

    #[error("dataset root {} is not accessible: {source}", path.display())]
    DatasetRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

impl MarketDataError {
    /// Whether this error concerns a single symbol's data.
    ///
    /// Batch reads skip symbols failing with one of these kinds and
    /// propagate everything else.
    pub fn is_symbol_failure(&self) -> bool {
        matches!(
            self,
            Self::SymbolNotFound { .. }
                | Self::DateColumn { .. }
                | Self::ColumnNotFound { .. }
                | Self::ColumnType { .. }
                | Self::ParquetRead { .. }
        )
    }
}
