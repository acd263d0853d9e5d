//! The `MarketData` accessor.
//!
//! Bound to a dataset root, it scans once at construction and then serves
//! single-symbol tables and wide multi-symbol price tables straight from the
//! Parquet files. Nothing is cached between reads.

use crate::align::{align_price_series, SymbolSeries};
use crate::config::{BatchOptions, MarketDataConfig};
use crate::error::MarketDataError;
use crate::progress::{BatchProgress, NoProgress};
use crate::scan::{scan_dataset, SymbolIndex};
use crate::table::PriceTable;
use crate::timeframe::Timeframe;
use polars::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Read-only access to a directory of per-symbol price files.
#[derive(Debug, Clone)]
pub struct MarketData {
    dataset_dir: PathBuf,
    symbols: SymbolIndex,
}

/// A symbol left out of a batch, with the reason.
#[derive(Debug)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub error: MarketDataError,
}

/// Which symbols a batch read used and which it skipped.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub loaded: Vec<String>,
    pub skipped: Vec<SkippedSymbol>,
}

impl BatchReport {
    pub fn skipped_symbols(&self) -> Vec<&str> {
        self.skipped.iter().map(|s| s.symbol.as_str()).collect()
    }
}

impl MarketData {
    /// Scan `dataset_dir` and build the symbol mappings.
    pub fn open(dataset_dir: impl Into<PathBuf>) -> Result<Self, MarketDataError> {
        let dataset_dir = dataset_dir.into();
        let symbols = scan_dataset(&dataset_dir)?;
        info!(
            "indexed {} hourly and {} daily symbols under {}",
            symbols.hourly.len(),
            symbols.daily.len(),
            dataset_dir.display()
        );
        Ok(Self {
            dataset_dir,
            symbols,
        })
    }

    pub fn from_config(config: &MarketDataConfig) -> Result<Self, MarketDataError> {
        Self::open(config.dataset_dir.clone())
    }

    /// Root directory this store was opened on.
    pub fn dataset_dir(&self) -> &Path {
        &self.dataset_dir
    }

    /// Known symbols for a timeframe, sorted.
    pub fn symbols(&self, timeframe: Timeframe) -> Vec<&str> {
        let mut symbols: Vec<&str> = self
            .symbols
            .get(timeframe)
            .keys()
            .map(String::as_str)
            .collect();
        symbols.sort_unstable();
        symbols
    }

    /// File backing a symbol, if any.
    pub fn path(&self, symbol: &str, timeframe: Timeframe) -> Option<&Path> {
        self.symbols.get(timeframe).get(symbol).map(PathBuf::as_path)
    }

    pub fn contains(&self, symbol: &str, timeframe: Timeframe) -> bool {
        self.symbols.get(timeframe).contains_key(symbol)
    }

    /// Number of symbols known for a timeframe.
    pub fn len(&self, timeframe: Timeframe) -> usize {
        self.symbols.get(timeframe).len()
    }

    pub fn is_empty(&self) -> bool {
        Timeframe::ALL.iter().all(|tf| self.len(*tf) == 0)
    }

    /// Load one symbol's table, indexed by its parsed `date` column.
    pub fn read(&self, symbol: &str, timeframe: Timeframe) -> Result<PriceTable, MarketDataError> {
        let path = self
            .path(symbol, timeframe)
            .ok_or_else(|| MarketDataError::SymbolNotFound {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            })?;

        let frame = read_parquet(path)?;
        debug!("read {symbol} ({timeframe}): {} rows", frame.height());
        PriceTable::from_frame(frame, path)
    }

    /// [`read`](Self::read) with the timeframe given as `"day"` or `"hour"`.
    pub fn read_str(&self, symbol: &str, timeframe: &str) -> Result<PriceTable, MarketDataError> {
        self.read(symbol, timeframe.parse()?)
    }

    /// Wide table of one price column across `symbols`.
    ///
    /// Symbols that cannot be read, or lack the price column, are left out.
    /// Exact zero prices come back as null.
    pub fn read_batch<S: AsRef<str>>(
        &self,
        symbols: &[S],
        options: &BatchOptions,
    ) -> Result<PriceTable, MarketDataError> {
        self.read_batch_with_report(symbols, options)
            .map(|(table, _)| table)
    }

    /// Like [`read_batch`](Self::read_batch), also returning which symbols
    /// were skipped and why.
    pub fn read_batch_with_report<S: AsRef<str>>(
        &self,
        symbols: &[S],
        options: &BatchOptions,
    ) -> Result<(PriceTable, BatchReport), MarketDataError> {
        self.read_batch_with_progress(symbols, options, &NoProgress)
    }

    /// Batch read reporting per-symbol progress.
    pub fn read_batch_with_progress<S: AsRef<str>>(
        &self,
        symbols: &[S],
        options: &BatchOptions,
        progress: &dyn BatchProgress,
    ) -> Result<(PriceTable, BatchReport), MarketDataError> {
        // Column names must be unique; repeats add nothing.
        let mut seen = HashSet::new();
        let unique: Vec<&str> = symbols
            .iter()
            .map(AsRef::as_ref)
            .filter(|s| seen.insert(*s))
            .collect();

        let total = unique.len();
        let mut series = Vec::with_capacity(total);
        let mut report = BatchReport::default();

        for (i, symbol) in unique.into_iter().enumerate() {
            progress.on_start(symbol, i, total);
            match self.read_price_series(symbol, options) {
                Ok(s) => {
                    progress.on_complete(symbol, i, total, Ok(()));
                    report.loaded.push(symbol.to_string());
                    series.push(s);
                }
                Err(e) if e.is_symbol_failure() => {
                    debug!("skipping {symbol}: {e}");
                    progress.on_complete(symbol, i, total, Err(&e));
                    report.skipped.push(SkippedSymbol {
                        symbol: symbol.to_string(),
                        error: e,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        progress.on_batch_complete(report.loaded.len(), report.skipped.len(), total);
        info!(
            "batch {} ({}): {} loaded, {} skipped",
            options.price_source,
            options.timeframe,
            report.loaded.len(),
            report.skipped.len()
        );

        Ok((align_price_series(series)?, report))
    }

    fn read_price_series(
        &self,
        symbol: &str,
        options: &BatchOptions,
    ) -> Result<SymbolSeries, MarketDataError> {
        let table = self.read(symbol, options.timeframe)?;
        let values = table.price_values(&options.price_source)?;
        Ok(SymbolSeries::new(symbol, table.timestamps()?, values))
    }
}

fn read_parquet(path: &Path) -> Result<DataFrame, MarketDataError> {
    let read_error = |reason: String| MarketDataError::ParquetRead {
        path: path.to_path_buf(),
        reason,
    };
    let file = File::open(path).map_err(|e| read_error(format!("open: {e}")))?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| read_error(format!("read: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_prices(root: &Path, rel: &str, dates: &[&str], closes: &[f64]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut df = df!(
            "date" => dates,
            "open" => closes,
            "close" => closes,
        )
        .unwrap();
        let file = File::create(path).unwrap();
        ParquetWriter::new(file).finish(&mut df).unwrap();
    }

    #[test]
    fn read_unknown_symbol_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = MarketData::open(dir.path()).unwrap();
        let err = store.read("MISSING", Timeframe::Day).unwrap_err();
        assert!(matches!(err, MarketDataError::SymbolNotFound { .. }));
    }

    #[test]
    fn read_str_rejects_unsupported_timeframe_before_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let store = MarketData::open(dir.path()).unwrap();
        let err = store.read_str("MISSING", "week").unwrap_err();
        assert!(matches!(err, MarketDataError::UnsupportedTimeframe { .. }));
    }

    #[test]
    fn corrupt_file_is_a_parquet_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A/price_daily/BAD.parquet");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"not parquet").unwrap();

        let store = MarketData::open(dir.path()).unwrap();
        let err = store.read("BAD", Timeframe::Day).unwrap_err();
        assert!(matches!(err, MarketDataError::ParquetRead { .. }));
        assert!(err.is_symbol_failure());
    }

    #[test]
    fn repeated_symbols_appear_once() {
        let dir = tempfile::tempdir().unwrap();
        write_prices(dir.path(), "A/price_daily/FOO.parquet", &["2024-01-02"], &[1.0]);
        let store = MarketData::open(dir.path()).unwrap();

        let (table, report) = store
            .read_batch_with_report(&["FOO", "FOO"], &BatchOptions::default())
            .unwrap();
        assert_eq!(table.column_names(), vec!["FOO"]);
        assert_eq!(report.loaded, vec!["FOO"]);
    }

    #[test]
    fn introspection_reflects_scan() {
        let dir = tempfile::tempdir().unwrap();
        write_prices(dir.path(), "A/price_daily/FOO.parquet", &["2024-01-02"], &[1.0]);
        write_prices(dir.path(), "A/price_daily/BAR.parquet", &["2024-01-02"], &[1.0]);
        let store = MarketData::open(dir.path()).unwrap();

        assert_eq!(store.symbols(Timeframe::Day), vec!["BAR", "FOO"]);
        assert!(store.symbols(Timeframe::Hour).is_empty());
        assert!(store.contains("FOO", Timeframe::Day));
        assert!(!store.contains("FOO", Timeframe::Hour));
        assert_eq!(store.len(Timeframe::Day), 2);
        assert!(!store.is_empty());
        assert_eq!(store.dataset_dir(), dir.path());
    }
}
