//! Normalisation of the stored `date` column into a datetime index.
//!
//! Files in the wild carry the date as a polars `Date`, a `Datetime` of any
//! unit (optionally tz-aware) or an ISO-8601 string. All of them become a
//! naive microsecond `Datetime` series named `date`, in row order.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Name of the date column in storage and of the resulting index.
pub const DATE_COLUMN: &str = "date";

/// Physical dtype of every price table index.
pub const INDEX_DTYPE: DataType = DataType::Datetime(TimeUnit::Microseconds, None);

const MICROS_PER_DAY: i64 = 86_400_000_000;

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a raw `date` column into an index series.
///
/// Null dates stay null in the index. Returns the failure reason as a plain
/// string; the caller attaches the file path.
pub fn parse_date_index(column: &Column) -> Result<Series, String> {
    let micros = match column.dtype() {
        DataType::Date => {
            let days = column
                .cast(&DataType::Int32)
                .map_err(|e| format!("date cast: {e}"))?;
            let days = days.i32().map_err(|e| format!("date cast: {e}"))?;
            days.iter()
                .enumerate()
                .map(|(i, d)| match d {
                    None => Ok(None),
                    Some(d) => i64::from(d)
                        .checked_mul(MICROS_PER_DAY)
                        .map(Some)
                        .ok_or_else(|| format!("date out of range at row {i}")),
                })
                .collect::<Result<Vec<_>, String>>()?
        }
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let raw = column
                .cast(&DataType::Int64)
                .map_err(|e| format!("datetime cast: {e}"))?;
            let raw = raw.i64().map_err(|e| format!("datetime cast: {e}"))?;
            raw.iter()
                .enumerate()
                .map(|(i, v)| match v {
                    None => Ok(None),
                    Some(v) => to_micros(v, unit)
                        .map(Some)
                        .ok_or_else(|| format!("date out of range at row {i}")),
                })
                .collect::<Result<Vec<_>, String>>()?
        }
        DataType::String => {
            let strings = column.str().map_err(|e| format!("string column: {e}"))?;
            strings
                .iter()
                .enumerate()
                .map(|(i, s)| match s {
                    None => Ok(None),
                    Some(s) => parse_datetime_str(s)
                        .map(|dt| Some(dt.and_utc().timestamp_micros()))
                        .ok_or_else(|| format!("unparseable date '{s}' at row {i}")),
                })
                .collect::<Result<Vec<_>, String>>()?
        }
        other => return Err(format!("unsupported date column type {other:?}")),
    };

    index_from_micros(micros).map_err(|e| format!("index construction: {e}"))
}

/// Build an index series from microsecond timestamps; `None` is a null date.
pub fn index_from_micros(micros: Vec<Option<i64>>) -> PolarsResult<Series> {
    Series::new(DATE_COLUMN.into(), micros).cast(&INDEX_DTYPE)
}

/// Physical microsecond timestamps of an index series, nulls preserved.
pub fn index_micros(index: &Series) -> PolarsResult<Vec<Option<i64>>> {
    let raw = index.cast(&DataType::Int64)?;
    Ok(raw.i64()?.iter().collect())
}

/// Convert a microsecond timestamp back into a naive datetime.
pub fn micros_to_datetime(micros: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_micros(micros).map(|dt| dt.naive_utc())
}

fn to_micros(value: i64, unit: TimeUnit) -> Option<i64> {
    match unit {
        TimeUnit::Nanoseconds => Some(value.div_euclid(1_000)),
        TimeUnit::Microseconds => Some(value),
        TimeUnit::Milliseconds => value.checked_mul(1_000),
    }
}

/// Parse an ISO-8601-like date or datetime string.
///
/// Offsets are converted to UTC and dropped.
pub fn parse_datetime_str(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
