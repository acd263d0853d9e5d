//! Multi-symbol time alignment.
//!
//! Given one price series per symbol, lay them out on the union of their
//! timestamps. A symbol with no observation on a date gets null there; no
//! forward-fill. Exact zeros and NaN are treated as missing as well, so null
//! is the only missing-value marker in the result. Rows with a null date have
//! no place on the axis and are dropped.

use crate::dates;
use crate::error::MarketDataError;
use crate::table::PriceTable;
use polars::prelude::*;
use std::collections::{BTreeSet, HashMap};

/// One symbol's price series, timestamps in microseconds (`None` = null date).
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSeries {
    pub symbol: String,
    pub timestamps: Vec<Option<i64>>,
    pub values: Vec<Option<f64>>,
}

impl SymbolSeries {
    pub fn new<T: Into<Option<i64>>>(
        symbol: impl Into<String>,
        timestamps: Vec<T>,
        values: Vec<Option<f64>>,
    ) -> Self {
        debug_assert_eq!(timestamps.len(), values.len());
        Self {
            symbol: symbol.into(),
            timestamps: timestamps.into_iter().map(Into::into).collect(),
            values,
        }
    }
}

/// Zero prices mark "no trade" in the source data, never a real quote.
/// NaN is folded into null.
pub fn clean(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

/// Align symbol series into a wide table, one column per symbol.
///
/// Rows are the sorted union of all timestamps. When a symbol repeats a
/// timestamp the last observation wins. Zero series yield an empty table.
pub fn align_price_series(series: Vec<SymbolSeries>) -> Result<PriceTable, MarketDataError> {
    if series.is_empty() {
        return Ok(PriceTable::empty());
    }

    let axis: Vec<i64> = series
        .iter()
        .flat_map(|s| s.timestamps.iter().flatten().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut columns = Vec::with_capacity(series.len());
    for s in &series {
        let by_ts: HashMap<i64, Option<f64>> = s
            .timestamps
            .iter()
            .zip(s.values.iter().copied())
            .filter_map(|(ts, v)| ts.map(|ts| (ts, v)))
            .collect();

        let values: Vec<Option<f64>> = axis
            .iter()
            .map(|ts| by_ts.get(ts).copied().flatten())
            .map(clean)
            .collect();

        columns.push(Column::new(s.symbol.as_str().into(), values));
    }

    let index = dates::index_from_micros(axis.into_iter().map(Some).collect())?;
    let data = DataFrame::new(columns)?;
    Ok(PriceTable::new(index, data))
}
