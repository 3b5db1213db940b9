use crate::{LoadReport, ObservationStore, SkippedSource};
use chrono::NaiveDateTime;
use core_types::Observation;
use std::collections::{BTreeMap, BTreeSet};

/// A store over fixed, in-memory price series.
///
/// Symbols are normalized to upper case on insertion. A symbol can also be
/// registered as failing, in which case it is listed but every load of it is
/// reported as a skipped source.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    series: BTreeMap<String, Vec<Observation>>,
    failing: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `(timestamp, price)` samples to `symbol`, creating it if needed.
    /// An empty `samples` still registers the symbol.
    pub fn with_series(
        mut self,
        symbol: &str,
        samples: impl IntoIterator<Item = (NaiveDateTime, f64)>,
    ) -> Self {
        let symbol = symbol.to_uppercase();
        let series = self.series.entry(symbol.clone()).or_default();
        series.extend(
            samples
                .into_iter()
                .map(|(timestamp, price)| Observation::new(symbol.clone(), timestamp, price)),
        );
        self
    }

    /// Registers a symbol whose source cannot be read.
    pub fn with_failing_source(mut self, symbol: &str, reason: impl Into<String>) -> Self {
        self.failing.insert(symbol.to_uppercase(), reason.into());
        self
    }
}

impl ObservationStore for MemoryStore {
    fn list_symbols(&self) -> BTreeSet<String> {
        self.series
            .keys()
            .chain(self.failing.keys())
            .cloned()
            .collect()
    }

    fn load_symbol(&self, symbol: &str) -> LoadReport {
        let wanted = symbol.trim().to_uppercase();
        if let Some(reason) = self.failing.get(&wanted) {
            tracing::warn!(symbol = %wanted, %reason, "Skipping unreadable in-memory source.");
            return LoadReport {
                skipped_sources: vec![SkippedSource {
                    symbol: wanted,
                    reason: reason.clone(),
                }],
                ..LoadReport::default()
            };
        }
        LoadReport::new(self.series.get(&wanted).cloned().unwrap_or_default())
    }
}
