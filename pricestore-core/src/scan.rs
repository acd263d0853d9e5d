//! Dataset discovery.
//!
//! Layout: `{root}/{partition}/price/{SYMBOL}.parquet` (hourly) and
//! `{root}/{partition}/price_daily/{SYMBOL}.parquet` (daily).
//!
//! Partitions and files are visited in lexicographic order; when a symbol
//! appears under several partitions the last one visited wins. Names starting
//! with `.` are ignored at both levels, as a shell glob would.

use crate::error::MarketDataError;
use crate::timeframe::Timeframe;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const PARQUET_EXTENSION: &str = "parquet";

/// Symbol → file path, one map per timeframe.
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    pub hourly: HashMap<String, PathBuf>,
    pub daily: HashMap<String, PathBuf>,
}

impl SymbolIndex {
    pub fn get(&self, timeframe: Timeframe) -> &HashMap<String, PathBuf> {
        match timeframe {
            Timeframe::Day => &self.daily,
            Timeframe::Hour => &self.hourly,
        }
    }
}

/// Scan a dataset root for both timeframes.
///
/// Only an unreadable root is an error; missing timeframe folders simply
/// contribute nothing.
pub fn scan_dataset(root: &Path) -> Result<SymbolIndex, MarketDataError> {
    let root_error = |source: io::Error| MarketDataError::DatasetRoot {
        path: root.to_path_buf(),
        source,
    };

    let mut partitions = Vec::new();
    for entry in fs::read_dir(root).map_err(root_error)? {
        let path = entry.map_err(root_error)?.path();
        if path.is_dir() && !is_hidden(&path) {
            partitions.push(path);
        }
    }
    partitions.sort();

    Ok(SymbolIndex {
        hourly: scan_timeframe(&partitions, Timeframe::Hour),
        daily: scan_timeframe(&partitions, Timeframe::Day),
    })
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn scan_timeframe(partitions: &[PathBuf], timeframe: Timeframe) -> HashMap<String, PathBuf> {
    let mut mapping = HashMap::new();

    for partition in partitions {
        let dir = partition.join(timeframe.folder());
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                warn!("skipping unreadable directory {}: {e}", dir.display());
                continue;
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && !is_hidden(path)
                    && path.extension().and_then(|e| e.to_str()) == Some(PARQUET_EXTENSION)
            })
            .collect();
        files.sort();

        for path in files {
            let Some(symbol) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some(previous) = mapping.insert(symbol.to_string(), path.clone()) {
                debug!(
                    "{symbol} ({timeframe}) at {} replaces {}",
                    path.display(),
                    previous.display()
                );
            }
        }
    }

    mapping
}
