//! Store configuration.
//!
//! ```toml
//! dataset_dir = "/data/prices"
//!
//! [batch]
//! price_source = "close"
//! timeframe = "day"
//! ignore_not_found = false
//! ```

use crate::error::MarketDataError;
use crate::timeframe::Timeframe;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PRICE_SOURCE: &str = "close";

/// Options for a batch read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Column extracted from each symbol's table.
    pub price_source: String,
    pub timeframe: Timeframe,
    /// Accepted for compatibility; per-symbol failures are skipped either way.
    pub ignore_not_found: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            price_source: DEFAULT_PRICE_SOURCE.to_string(),
            timeframe: Timeframe::Day,
            ignore_not_found: false,
        }
    }
}

impl BatchOptions {
    pub fn with_price_source(mut self, price_source: impl Into<String>) -> Self {
        self.price_source = price_source.into();
        self
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = timeframe;
        self
    }

    pub fn with_ignore_not_found(mut self, ignore_not_found: bool) -> Self {
        self.ignore_not_found = ignore_not_found;
        self
    }
}

/// Top-level store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketDataConfig {
    pub dataset_dir: PathBuf,
    #[serde(default)]
    pub batch: BatchOptions,
}

impl MarketDataConfig {
    pub fn new(dataset_dir: impl Into<PathBuf>) -> Self {
        Self {
            dataset_dir: dataset_dir.into(),
            batch: BatchOptions::default(),
        }
    }

    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, MarketDataError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MarketDataError::Config(format!("read config file {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, MarketDataError> {
        toml::from_str(content)
            .map_err(|e| MarketDataError::Config(format!("parse config TOML: {e}")))
    }
}
