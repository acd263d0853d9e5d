//! Date-indexed price tables.

use crate::dates::{self, DATE_COLUMN, INDEX_DTYPE};
use crate::error::MarketDataError;
use chrono::NaiveDateTime;
use polars::prelude::*;

/// A table of price columns indexed by datetime.
///
/// The index is kept apart from the value columns: `data` never contains a
/// `date` column, and every column of `data` has the same length as `index`.
#[derive(Debug, Clone)]
pub struct PriceTable {
    index: Series,
    data: DataFrame,
}

impl PriceTable {
    pub(crate) fn new(index: Series, data: DataFrame) -> Self {
        debug_assert_eq!(index.dtype(), &INDEX_DTYPE);
        debug_assert!(data.width() == 0 || data.height() == index.len());
        Self { index, data }
    }

    /// A table with no rows and no columns.
    pub fn empty() -> Self {
        Self {
            index: Series::new_empty(DATE_COLUMN.into(), &INDEX_DTYPE),
            data: DataFrame::empty(),
        }
    }

    /// Split a raw frame into index and value columns by parsing `date`.
    pub(crate) fn from_frame(
        frame: DataFrame,
        source: &std::path::Path,
    ) -> Result<Self, MarketDataError> {
        let date_error = |reason: String| MarketDataError::DateColumn {
            path: source.to_path_buf(),
            reason,
        };

        let raw_dates = frame
            .column(DATE_COLUMN)
            .map_err(|_| date_error(format!("missing '{DATE_COLUMN}' column")))?;
        let index = dates::parse_date_index(raw_dates).map_err(date_error)?;
        let data = frame.drop(DATE_COLUMN)?;

        Ok(Self::new(index, data))
    }

    /// The datetime index.
    pub fn index(&self) -> &Series {
        &self.index
    }

    /// Value columns, without the index.
    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Index values as microseconds since the epoch. Null dates are `None`.
    pub fn timestamps(&self) -> Result<Vec<Option<i64>>, MarketDataError> {
        Ok(dates::index_micros(&self.index)?)
    }

    /// Index values as naive datetimes. Null dates are `None`.
    pub fn dates(&self) -> Result<Vec<Option<NaiveDateTime>>, MarketDataError> {
        self.timestamps()?
            .into_iter()
            .map(|m| match m {
                None => Ok(None),
                Some(m) => dates::micros_to_datetime(m).map(Some).ok_or_else(|| {
                    MarketDataError::Polars(PolarsError::ComputeError(
                        format!("timestamp {m} out of range").into(),
                    ))
                }),
            })
            .collect()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect()
    }

    /// Look up a value column by name.
    pub fn column(&self, name: &str) -> Result<&Column, MarketDataError> {
        self.data
            .column(name)
            .map_err(|_| MarketDataError::ColumnNotFound {
                column: name.to_string(),
            })
    }

    /// Values of a numeric column as `f64`, nulls preserved.
    pub fn price_values(&self, name: &str) -> Result<Vec<Option<f64>>, MarketDataError> {
        let column = self.column(name)?;
        let dtype = column.dtype();
        let numeric =
            dtype.is_float() || dtype.is_integer() || matches!(dtype, DataType::Decimal(_, _));
        if !numeric {
            return Err(MarketDataError::ColumnType {
                column: name.to_string(),
                dtype: dtype.clone(),
            });
        }
        let values = column.cast(&DataType::Float64)?;
        Ok(values.f64()?.iter().collect())
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.index.len()
    }

    /// Number of value columns.
    pub fn width(&self) -> usize {
        self.data.width()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0 && self.width() == 0
    }

    /// Recombine index and values into a single frame, `date` first.
    pub fn to_frame(&self) -> Result<DataFrame, MarketDataError> {
        let mut columns = Vec::with_capacity(self.width() + 1);
        columns.push(Column::from(self.index.clone()));
        columns.extend(self.data.get_columns().iter().cloned());
        Ok(DataFrame::new(columns)?)
    }
}

impl PartialEq for PriceTable {
    fn eq(&self, other: &Self) -> bool {
        self.index.equals_missing(&other.index) && self.data.equals_missing(&other.data)
    }
}
