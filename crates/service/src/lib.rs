//! # Query Service
//!
//! The four public price-statistics queries, composed from the observation
//! store, the statistics functions and the ranking functions. This is the
//! only layer that knows *why* a series is empty and therefore the only one
//! that turns emptiness into a `QueryError`.

pub mod error;

pub use error::{ErrorKind, QueryError};

use chrono::{NaiveDate, NaiveDateTime};
use core_types::{CalendarZone, DailySpread, Observation, PeriodUnit, SpreadResult, StatsResult};
use std::collections::BTreeSet;
use configuration::DataSettings;
use store::{CachedStore, CsvStore, LoadReport, ObservationStore};

/// A service over whichever store the configuration selected.
pub type DynQueryService = QueryService<Box<dyn ObservationStore>>;

/// Answers price-statistics queries against an `ObservationStore`.
///
/// Holds no per-query state: every call loads what it needs from the store,
/// so one instance can serve concurrent queries.
#[derive(Debug)]
pub struct QueryService<S> {
    store: S,
    zone: CalendarZone,
}

impl DynQueryService {
    /// Builds a service over the CSV directory described by `settings`,
    /// wrapped in a cache when `cache_ttl_secs` is non-zero.
    pub fn from_settings(settings: &DataSettings) -> Self {
        let csv = CsvStore::new(&settings.directory, &settings.file_suffix, settings.zone);
        let store: Box<dyn ObservationStore> = if settings.cache_ttl_secs > 0 {
            Box::new(CachedStore::new(csv, settings.cache_ttl()))
        } else {
            Box::new(csv)
        };
        tracing::info!(
            directory = %settings.directory.display(),
            zone = ?settings.zone,
            cache_ttl_secs = settings.cache_ttl_secs,
            "Observation store ready."
        );
        QueryService::new(store, settings.zone)
    }
}

impl<S: ObservationStore> QueryService<S> {
    /// `zone` supplies "now" for trailing-window queries and must match the
    /// zone the store uses to build observation timestamps.
    pub fn new(store: S, zone: CalendarZone) -> Self {
        Self { store, zone }
    }

    /// Symbols that currently have a data source.
    pub fn symbols(&self) -> BTreeSet<String> {
        self.store.list_symbols()
    }

    /// All symbols ranked by normalized range over their whole history,
    /// widest first. An empty store yields an empty ranking.
    pub fn ranked_spread(&self) -> Vec<SpreadResult> {
        let observations = observations_of(self.store.load_all(), "*");
        let ranked = analyzer::rank_by_spread(&observations);
        tracing::debug!(symbols = ranked.len(), "Ranked symbols by normalized range.");
        ranked
    }

    /// Oldest, newest, minimum and maximum price of `symbol` over all history.
    pub fn stats(&self, symbol: &str) -> Result<StatsResult, QueryError> {
        let symbol = normalize(symbol);
        if !self.store.list_symbols().contains(&symbol) {
            return Err(QueryError::SymbolNotFound(symbol));
        }

        let observations = self.load(&symbol);
        analytics::summarize(&symbol, &observations).ok_or(QueryError::NoData(symbol))
    }

    /// Statistics of `symbol` over the trailing window `amount * unit`
    /// ending now.
    pub fn stats_for_period(
        &self,
        symbol: &str,
        amount: i64,
        unit: PeriodUnit,
    ) -> Result<StatsResult, QueryError> {
        self.stats_for_period_at(symbol, amount, unit, self.zone.now())
    }

    /// Like `stats_for_period`, with an explicit clock.
    ///
    /// There is no existence check: an unknown symbol simply loads nothing
    /// and is reported as `NoData`.
    pub fn stats_for_period_at(
        &self,
        symbol: &str,
        amount: i64,
        unit: PeriodUnit,
        now: NaiveDateTime,
    ) -> Result<StatsResult, QueryError> {
        let symbol = normalize(symbol);
        let observations = self.load(&symbol);
        if observations.is_empty() {
            return Err(QueryError::NoData(symbol));
        }

        let window = analytics::filter_by_window(&observations, now, amount, unit);
        tracing::debug!(
            symbol = %symbol,
            amount,
            %unit,
            total = observations.len(),
            in_window = window.len(),
            "Applied trailing window."
        );

        analytics::summarize(&symbol, &window).ok_or(QueryError::NoDataInWindow {
            symbol,
            amount,
            unit,
        })
    }

    /// The symbol with the widest normalized range on the calendar day given
    /// as `YYYY-MM-DD` (surrounding whitespace is ignored). `Ok(None)` means
    /// no symbol has an observation on that day.
    pub fn best_for_date(&self, date: &str) -> Result<Option<DailySpread>, QueryError> {
        let date = parse_date(date)?;
        let best = analyzer::best_for_date(self.store.list_symbols(), |symbol| self.load(symbol), date);
        match &best {
            Some(found) => tracing::debug!(%date, symbol = %found.symbol, "Found widest daily range."),
            None => tracing::debug!(%date, "No observations on date."),
        }
        Ok(best)
    }

    fn load(&self, symbol: &str) -> Vec<Observation> {
        observations_of(self.store.load_symbol(symbol), symbol)
    }
}

fn observations_of(report: LoadReport, scope: &str) -> Vec<Observation> {
    if report.is_degraded() {
        tracing::warn!(
            scope,
            skipped_sources = report.skipped_sources.len(),
            skipped_rows = report.skipped_rows,
            "Answering from a partial load."
        );
    }
    report.into_observations()
}

fn normalize(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

fn parse_date(input: &str) -> Result<NaiveDate, QueryError> {
    let trimmed = input.trim();
    let invalid = |reason: String| QueryError::InvalidDate {
        input: input.to_string(),
        reason,
    };

    let bytes = trimmed.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(invalid("not in YYYY-MM-DD form".to_string()));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use store::MemoryStore;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 2, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn days_ago(days: i64) -> NaiveDateTime {
        now() - Duration::days(days)
    }

    fn service(store: MemoryStore) -> QueryService<MemoryStore> {
        QueryService::new(store, CalendarZone::Utc)
    }

    #[test]
    fn stats_cover_the_whole_series() {
        let svc = service(MemoryStore::new().with_series(
            "BTC",
            [(days_ago(2), 100.0), (days_ago(1), 200.0), (days_ago(0), 150.0)],
        ));

        let stats = svc.stats("BTC").unwrap();

        assert_eq!(
            stats,
            StatsResult {
                symbol: "BTC".to_string(),
                oldest_price: 100.0,
                newest_price: 150.0,
                min_price: 100.0,
                max_price: 200.0,
            }
        );
    }

    #[test]
    fn stats_symbol_lookup_is_case_insensitive() {
        let svc = service(MemoryStore::new().with_series("BTC", [(days_ago(0), 1.0)]));

        assert_eq!(svc.stats(" btc ").unwrap().symbol, "BTC");
    }

    #[test]
    fn stats_for_unknown_symbol_is_not_found() {
        let svc = service(MemoryStore::new().with_series("BTC", [(days_ago(0), 1.0)]));

        let err = svc.stats("ETH").unwrap_err();

        assert_eq!(err, QueryError::SymbolNotFound("ETH".to_string()));
        assert_eq!(err.kind(), ErrorKind::SymbolNotFound);
        assert!(err.to_string().contains("doesn't exist"));
    }

    #[test]
    fn stats_for_known_symbol_without_rows_is_no_data() {
        let svc = service(MemoryStore::new().with_series("BTC", []));

        let err = svc.stats("BTC").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NoData);
    }

    #[test]
    fn unreadable_source_degrades_to_no_data() {
        let svc = service(MemoryStore::new().with_failing_source("BTC", "truncated file"));

        assert_eq!(svc.stats("BTC").unwrap_err(), QueryError::NoData("BTC".to_string()));
    }

    #[test]
    fn period_stats_only_use_the_window() {
        let svc = service(MemoryStore::new().with_series(
            "BTC",
            [(days_ago(40), 100.0), (days_ago(10), 200.0), (days_ago(5), 150.0)],
        ));

        let stats = svc
            .stats_for_period_at("BTC", 30, PeriodUnit::Days, now())
            .unwrap();

        assert_eq!(stats.oldest_price, 200.0);
        assert_eq!(stats.newest_price, 150.0);
        assert_eq!(stats.min_price, 150.0);
        assert_eq!(stats.max_price, 200.0);
    }

    #[test]
    fn period_stats_with_empty_window_report_not_found_kind() {
        let svc = service(MemoryStore::new().with_series("BTC", [(days_ago(400), 100.0)]));

        let err = svc
            .stats_for_period_at("BTC", 1, PeriodUnit::Years, now())
            .unwrap_err();

        assert_eq!(
            err,
            QueryError::NoDataInWindow {
                symbol: "BTC".to_string(),
                amount: 1,
                unit: PeriodUnit::Years,
            }
        );
        assert_eq!(err.kind(), ErrorKind::SymbolNotFound);
        assert!(err.to_string().starts_with("No data"));
    }

    #[test]
    fn period_stats_without_any_rows_is_no_data() {
        let svc = service(MemoryStore::new());

        let err = svc
            .stats_for_period_at("FAKECOIN", 10, PeriodUnit::Years, now())
            .unwrap_err();

        assert_eq!(err, QueryError::NoData("FAKECOIN".to_string()));
        assert_eq!(err.kind(), ErrorKind::NoData);
    }

    #[test]
    fn period_stats_against_the_real_clock() {
        let svc = service(MemoryStore::new().with_series(
            "BTC",
            [(CalendarZone::Utc.now() - Duration::hours(1), 42.0)],
        ));

        let stats = svc.stats_for_period("BTC", 1, PeriodUnit::Days).unwrap();

        assert_eq!(stats.newest_price, 42.0);
    }

    #[test]
    fn ranking_puts_the_widest_swing_first() {
        let svc = service(
            MemoryStore::new()
                .with_series("BTC", [(days_ago(0), 100.0), (days_ago(0), 200.0)])
                .with_series("ETH", [(days_ago(0), 50.0), (days_ago(0), 150.0)]),
        );

        let ranked = svc.ranked_spread();

        let symbols: Vec<&str> = ranked.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ETH", "BTC"]);
        assert_eq!(ranked[0].normalized_range, 2.0);
        assert_eq!(ranked[1].normalized_range, 1.0);
    }

    #[test]
    fn ranking_of_an_empty_store_is_empty() {
        assert!(service(MemoryStore::new()).ranked_spread().is_empty());
    }

    #[test]
    fn best_for_date_returns_the_widest_daily_swing() {
        let day = now().date();
        let svc = service(
            MemoryStore::new()
                .with_series("BTC", [(now(), 100.0), (now() + Duration::hours(1), 200.0)])
                .with_series("ETH", [(now(), 10.0), (now() + Duration::hours(1), 12.0)]),
        );

        let best = svc.best_for_date("2022-02-01").unwrap().unwrap();

        assert_eq!(
            best,
            DailySpread {
                symbol: "BTC".to_string(),
                normalized_range: 1.0,
                date: day,
            }
        );
    }

    #[test]
    fn best_for_date_trims_whitespace() {
        let svc = service(MemoryStore::new().with_series("BTC", [(now(), 100.0)]));

        assert!(svc.best_for_date("  2022-02-01\n").unwrap().is_some());
    }

    #[test]
    fn best_for_date_without_matches_is_empty_not_an_error() {
        let svc = service(MemoryStore::new().with_series("BTC", [(now(), 100.0)]));

        assert_eq!(svc.best_for_date("1900-01-01").unwrap(), None);
    }

    #[test]
    fn settings_build_a_csv_backed_service() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("BTC_values.csv"),
            "timestamp,symbol,price\n1641009600000,BTC,100.0\n1641020400000,BTC,200.0\n",
        )
        .unwrap();
        let settings = DataSettings {
            directory: dir.path().to_path_buf(),
            zone: CalendarZone::Utc,
            cache_ttl_secs: 60,
            ..DataSettings::default()
        };

        let svc = DynQueryService::from_settings(&settings);

        assert_eq!(svc.symbols().into_iter().collect::<Vec<_>>(), vec!["BTC"]);
        assert_eq!(svc.stats("btc").unwrap().max_price, 200.0);
        let best = svc.best_for_date("2022-01-01").unwrap().unwrap();
        assert_eq!(best.normalized_range, 1.0);
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let svc = service(MemoryStore::new());

        for input in ["", "2022-13-01", "2022-02-30", "13/01/2022", "2022-1-13", "22-01-13"] {
            let err = svc.best_for_date(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidDate, "input {input:?}");
        }
    }
}
