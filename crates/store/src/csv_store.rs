use crate::error::StoreError;
use crate::{LoadReport, ObservationStore, SkippedSource};
use core_types::{CalendarZone, Observation};
use csv::StringRecord;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads price observations from a directory of CSV files.
///
/// Each symbol has one file named `<SYMBOL><file_suffix>` (e.g.
/// `BTC_values.csv`) with a header row containing at least `timestamp`
/// (epoch milliseconds) and `price` columns. A `symbol` column may be present
/// but the file name is authoritative.
#[derive(Debug, Clone)]
pub struct CsvStore {
    directory: PathBuf,
    file_suffix: String,
    zone: CalendarZone,
}

impl CsvStore {
    pub fn new(
        directory: impl Into<PathBuf>,
        file_suffix: impl Into<String>,
        zone: CalendarZone,
    ) -> Self {
        Self {
            directory: directory.into(),
            file_suffix: file_suffix.into(),
            zone,
        }
    }

    /// Maps every upper-cased symbol to its price file. If two files differ
    /// only in case, the one sorting first by file name wins.
    fn source_files(&self) -> Result<BTreeMap<String, PathBuf>, StoreError> {
        let entries = fs::read_dir(&self.directory).map_err(|source| StoreError::Directory {
            path: self.directory.clone(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut files = BTreeMap::new();
        for path in paths {
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some(stem) = name.strip_suffix(self.file_suffix.as_str()) else {
                continue;
            };
            if stem.is_empty() {
                continue;
            }
            files.entry(stem.to_uppercase()).or_insert(path);
        }
        Ok(files)
    }

    fn sources_or_empty(&self) -> BTreeMap<String, PathBuf> {
        self.source_files().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Price directory unavailable, treating it as empty.");
            BTreeMap::new()
        })
    }

    /// Loads one file, turning a failure into a skipped source.
    fn load_file(&self, symbol: &str, path: &Path) -> LoadReport {
        match self.read_file(symbol, path) {
            Ok(report) => {
                tracing::debug!(
                    symbol,
                    path = %path.display(),
                    rows = report.observations.len(),
                    skipped_rows = report.skipped_rows,
                    "Loaded price file."
                );
                report
            }
            Err(e) => {
                tracing::warn!(symbol, path = %path.display(), error = %e, "Skipping unreadable price file.");
                LoadReport {
                    skipped_sources: vec![SkippedSource {
                        symbol: symbol.to_string(),
                        reason: e.to_string(),
                    }],
                    ..LoadReport::default()
                }
            }
        }
    }

    fn read_file(&self, symbol: &str, path: &Path) -> Result<LoadReport, StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let timestamp_idx = column_index(&headers, "timestamp").ok_or_else(|| {
            StoreError::MissingColumn {
                path: path.to_path_buf(),
                column: "timestamp",
            }
        })?;
        let price_idx =
            column_index(&headers, "price").ok_or_else(|| StoreError::MissingColumn {
                path: path.to_path_buf(),
                column: "price",
            })?;

        let mut report = LoadReport::default();
        for (row, record) in reader.records().enumerate() {
            let parsed = record
                .map_err(|e| e.to_string())
                .and_then(|record| self.parse_row(symbol, &record, timestamp_idx, price_idx));

            match parsed {
                Ok(observation) => report.observations.push(observation),
                Err(reason) => {
                    report.skipped_rows += 1;
                    // Header is line 1.
                    tracing::warn!(symbol, path = %path.display(), line = row + 2, %reason, "Skipping malformed price row.");
                }
            }
        }
        Ok(report)
    }

    fn parse_row(
        &self,
        symbol: &str,
        record: &StringRecord,
        timestamp_idx: usize,
        price_idx: usize,
    ) -> Result<Observation, String> {
        let raw_timestamp = record
            .get(timestamp_idx)
            .ok_or_else(|| "missing timestamp field".to_string())?;
        let millis: i64 = raw_timestamp
            .parse()
            .map_err(|e| format!("invalid timestamp '{raw_timestamp}': {e}"))?;
        let timestamp = self
            .zone
            .from_epoch_millis(millis)
            .ok_or_else(|| format!("timestamp {millis} is out of range"))?;

        let raw_price = record
            .get(price_idx)
            .ok_or_else(|| "missing price field".to_string())?;
        let price: f64 = raw_price
            .parse()
            .map_err(|e| format!("invalid price '{raw_price}': {e}"))?;
        if !price.is_finite() || price < 0.0 {
            return Err(format!("price {price} is not a finite non-negative number"));
        }

        Ok(Observation::new(symbol, timestamp, price))
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
}

impl ObservationStore for CsvStore {
    fn list_symbols(&self) -> BTreeSet<String> {
        self.sources_or_empty().into_keys().collect()
    }

    fn load_symbol(&self, symbol: &str) -> LoadReport {
        let wanted = symbol.trim().to_uppercase();
        match self.sources_or_empty().get(&wanted) {
            Some(path) => self.load_file(&wanted, path),
            None => {
                tracing::debug!(symbol = %wanted, "No price file for symbol.");
                LoadReport::default()
            }
        }
    }

    fn load_all(&self) -> LoadReport {
        let mut report = LoadReport::default();
        for (symbol, path) in self.sources_or_empty() {
            report.merge(self.load_file(&symbol, &path));
        }
        report
    }
}
