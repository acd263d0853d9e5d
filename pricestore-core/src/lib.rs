//! PriceStore Core — read access to per-symbol Parquet price series.
//!
//! A dataset root holds one directory per partition, each with `price/`
//! (hourly) and `price_daily/` (daily) folders of `<SYMBOL>.parquet` files.
//! This crate provides:
//! - Symbol discovery for both timeframes, snapshotted at construction
//! - Single-symbol reads with the `date` column parsed into a datetime index
//! - Wide batch tables of one price column across many symbols, outer-aligned
//!   on date, with zero prices treated as missing

pub mod align;
pub mod config;
pub mod dates;
pub mod error;
pub mod progress;
pub mod scan;
pub mod store;
pub mod table;
pub mod timeframe;

pub use config::{BatchOptions, MarketDataConfig};
pub use error::MarketDataError;
pub use progress::{BatchProgress, NoProgress, StderrProgress};
pub use store::{BatchReport, MarketData, SkippedSymbol};
pub use table::PriceTable;
pub use timeframe::Timeframe;
