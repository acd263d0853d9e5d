//! Price series granularity.

use crate::error::MarketDataError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity of a stored price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// Daily bars, stored under `<partition>/price_daily/`.
    #[default]
    Day,
    /// Hourly bars, stored under `<partition>/price/`.
    Hour,
}

impl Timeframe {
    pub const ALL: [Self; 2] = [Self::Day, Self::Hour];

    /// Name of the per-partition folder holding this timeframe's files.
    pub fn folder(self) -> &'static str {
        match self {
            Self::Day => "price_daily",
            Self::Hour => "price",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Hour => "hour",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "hour" => Ok(Self::Hour),
            other => Err(MarketDataError::UnsupportedTimeframe {
                timeframe: other.to_string(),
            }),
        }
    }
}
