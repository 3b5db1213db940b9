use crate::{LoadReport, ObservationStore};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    loaded_at: Instant,
}

impl<T: Clone> Entry<T> {
    fn fresh(&self, ttl: Duration) -> Option<T> {
        (self.loaded_at.elapsed() < ttl).then(|| self.value.clone())
    }
}

/// Memoizes another store's results for a fixed time-to-live.
///
/// A zero TTL turns the decorator into a pass-through. Degraded loads (with
/// skipped sources or rows) are never cached so a transient failure is
/// retried on the next call. Per-symbol entries are only kept for symbols
/// that returned observations, and expired ones are dropped on insert. Loads run outside the locks; two concurrent
/// misses for the same key may both hit the inner store.
#[derive(Debug)]
pub struct CachedStore<S> {
    inner: S,
    ttl: Duration,
    symbols: Mutex<Option<Entry<BTreeSet<String>>>>,
    series: Mutex<HashMap<String, Entry<LoadReport>>>,
    all: Mutex<Option<Entry<LoadReport>>>,
}

impl<S: ObservationStore> CachedStore<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            symbols: Mutex::new(None),
            series: Mutex::new(HashMap::new()),
            all: Mutex::new(None),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drops every cached entry.
    pub fn invalidate(&self) {
        *lock(&self.symbols) = None;
        lock(&self.series).clear();
        *lock(&self.all) = None;
    }

    fn enabled(&self) -> bool {
        !self.ttl.is_zero()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Entries are replaced wholesale, so a poisoned lock still holds valid data.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: ObservationStore> ObservationStore for CachedStore<S> {
    fn list_symbols(&self) -> BTreeSet<String> {
        if !self.enabled() {
            return self.inner.list_symbols();
        }
        if let Some(symbols) = lock(&self.symbols).as_ref().and_then(|e| e.fresh(self.ttl)) {
            return symbols;
        }
        let symbols = self.inner.list_symbols();
        *lock(&self.symbols) = Some(Entry {
            value: symbols.clone(),
            loaded_at: Instant::now(),
        });
        symbols
    }

    fn load_symbol(&self, symbol: &str) -> LoadReport {
        if !self.enabled() {
            return self.inner.load_symbol(symbol);
        }
        let key = symbol.trim().to_uppercase();
        if let Some(report) = lock(&self.series).get(&key).and_then(|e| e.fresh(self.ttl)) {
            tracing::trace!(symbol = %key, "Serving cached series.");
            return report;
        }
        let report = self.inner.load_symbol(&key);
        // Empty reports are not kept, so arbitrary unknown keys cannot grow the map.
        if !report.is_degraded() && !report.observations.is_empty() {
            let mut series = lock(&self.series);
            series.retain(|_, entry| entry.loaded_at.elapsed() < self.ttl);
            series.insert(
                key,
                Entry {
                    value: report.clone(),
                    loaded_at: Instant::now(),
                },
            );
        }
        report
    }

    fn load_all(&self) -> LoadReport {
        if !self.enabled() {
            return self.inner.load_all();
        }
        if let Some(report) = lock(&self.all).as_ref().and_then(|e| e.fresh(self.ttl)) {
            return report;
        }
        let report = self.inner.load_all();
        if !report.is_degraded() {
            *lock(&self.all) = Some(Entry {
                value: report.clone(),
                loaded_at: Instant::now(),
            });
        }
        report
    }
}
