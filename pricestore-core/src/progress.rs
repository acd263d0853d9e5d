//! Progress callbacks for batch reads.

use crate::error::MarketDataError;

/// Progress callback for multi-symbol reads.
pub trait BatchProgress: Send {
    /// Called before reading a symbol.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called after a symbol was loaded or skipped.
    fn on_complete(
        &self,
        symbol: &str,
        index: usize,
        total: usize,
        result: Result<(), &MarketDataError>,
    );

    /// Called once the whole batch is done.
    fn on_batch_complete(&self, loaded: usize, skipped: usize, total: usize);
}

/// Reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl BatchProgress for NoProgress {
    fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}

    fn on_complete(
        &self,
        _symbol: &str,
        _index: usize,
        _total: usize,
        _result: Result<(), &MarketDataError>,
    ) {
    }

    fn on_batch_complete(&self, _loaded: usize, _skipped: usize, _total: usize) {}
}

/// Simple progress reporter that prints to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrProgress;

impl BatchProgress for StderrProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        eprintln!("[{}/{}] Reading {symbol}...", index + 1, total);
    }

    fn on_complete(
        &self,
        symbol: &str,
        _index: usize,
        _total: usize,
        result: Result<(), &MarketDataError>,
    ) {
        if let Err(e) = result {
            eprintln!("  SKIP: {symbol}: {e}");
        }
    }

    fn on_batch_complete(&self, loaded: usize, skipped: usize, total: usize) {
        eprintln!("Batch complete: {loaded}/{total} loaded, {skipped} skipped");
    }
}
