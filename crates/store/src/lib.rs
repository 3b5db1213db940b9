//! # Observation Store
//!
//! This crate is the only place that knows where price observations come
//! from. Everything above it (statistics, ranking, the query service) works on
//! the `Observation`s it hands out.
//!
//! ## Architectural Principles
//!
//! - **Best-effort loading:** a missing or corrupt source never fails a query.
//!   It degrades to "no observations" and is reported in the `LoadReport` so
//!   callers and tests can see what was skipped.
//! - **Re-read by default:** stores read their source on every call. Caching is
//!   an opt-in decorator (`CachedStore`) layered on top of any store.
//!
//! ## Public API
//!
//! - `ObservationStore`: the trait every store implements.
//! - `CsvStore`: a directory of `<SYMBOL>_values.csv` files.
//! - `MemoryStore`: fixed in-memory series.
//! - `CachedStore`: a time-boxed memoizing decorator.

pub mod cached;
pub mod csv_store;
pub mod error;
pub mod memory;

pub use cached::CachedStore;
pub use csv_store::CsvStore;
pub use error::StoreError;
pub use memory::MemoryStore;

use core_types::Observation;
use std::collections::BTreeSet;
use std::sync::Arc;

/// A source that failed to load and was treated as holding no observations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    pub symbol: String,
    pub reason: String,
}

/// The outcome of a best-effort load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub observations: Vec<Observation>,
    /// Sources that could not be read at all.
    pub skipped_sources: Vec<SkippedSource>,
    /// Rows dropped because they could not be parsed.
    pub skipped_rows: usize,
}

impl LoadReport {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self {
            observations,
            ..Self::default()
        }
    }

    /// True if anything was dropped while loading.
    pub fn is_degraded(&self) -> bool {
        !self.skipped_sources.is_empty() || self.skipped_rows > 0
    }

    pub fn merge(&mut self, other: LoadReport) {
        self.observations.extend(other.observations);
        self.skipped_sources.extend(other.skipped_sources);
        self.skipped_rows += other.skipped_rows;
    }

    pub fn into_observations(self) -> Vec<Observation> {
        self.observations
    }
}

/// Read-only access to per-symbol price observations.
///
/// Implementations must be safe to share between concurrently running
/// queries; none of the methods mutate the underlying source.
pub trait ObservationStore: Send + Sync {
    /// Upper-cased, de-duplicated symbols that have a data source.
    fn list_symbols(&self) -> BTreeSet<String>;

    /// All observations of one symbol. The lookup is case-insensitive and the
    /// returned observations carry the upper-cased symbol. A symbol without a
    /// readable source yields an empty report, never an error.
    fn load_symbol(&self, symbol: &str) -> LoadReport;

    /// Every observation of every known symbol, visited in `list_symbols` order.
    fn load_all(&self) -> LoadReport {
        let mut report = LoadReport::default();
        for symbol in self.list_symbols() {
            report.merge(self.load_symbol(&symbol));
        }
        report
    }
}

impl<S: ObservationStore + ?Sized> ObservationStore for Arc<S> {
    fn list_symbols(&self) -> BTreeSet<String> {
        (**self).list_symbols()
    }

    fn load_symbol(&self, symbol: &str) -> LoadReport {
        (**self).load_symbol(symbol)
    }

    fn load_all(&self) -> LoadReport {
        (**self).load_all()
    }
}

impl<S: ObservationStore + ?Sized> ObservationStore for Box<S> {
    fn list_symbols(&self) -> BTreeSet<String> {
        (**self).list_symbols()
    }

    fn load_symbol(&self, symbol: &str) -> LoadReport {
        (**self).load_symbol(symbol)
    }

    fn load_all(&self) -> LoadReport {
        (**self).load_all()
    }
}
