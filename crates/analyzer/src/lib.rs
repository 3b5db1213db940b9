//! # Ranking
//!
//! Orders symbols by their normalized range, either over a full set of
//! observations or restricted to one calendar day.

use analytics::{filter_by_calendar_date, normalized_range};
use chrono::NaiveDate;
use core_types::{DailySpread, Observation, SpreadResult};
use std::collections::HashMap;

/// Groups `observations` by symbol and ranks the groups by normalized range,
/// widest first.
///
/// Groups are formed in first-seen order and the sort is stable, so symbols
/// with equal ranges keep the order in which they first appear in the input.
pub fn rank_by_spread(observations: &[Observation]) -> Vec<SpreadResult> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<Observation>)> = Vec::new();

    for observation in observations {
        let slot = *index.entry(observation.symbol.as_str()).or_insert_with(|| {
            groups.push((observation.symbol.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(observation.clone());
    }

    let mut ranked: Vec<SpreadResult> = groups
        .into_iter()
        .map(|(symbol, series)| SpreadResult {
            symbol: symbol.to_string(),
            normalized_range: normalized_range(&series),
        })
        .collect();

    ranked.sort_by(|a, b| b.normalized_range.total_cmp(&a.normalized_range));
    ranked
}

/// Finds the symbol with the widest normalized range on `date`.
///
/// `load` is called once per symbol, in the order given. Symbols without an
/// observation on `date` are skipped. The comparison is strict, so on a tie
/// the symbol visited first wins. Returns `None` if no symbol has data for
/// the day.
pub fn best_for_date<I, S, F>(symbols: I, mut load: F, date: NaiveDate) -> Option<DailySpread>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: FnMut(&str) -> Vec<Observation>,
{
    let mut best: Option<DailySpread> = None;

    for symbol in symbols {
        let symbol = symbol.as_ref();
        let day = filter_by_calendar_date(&load(symbol), date);
        if day.is_empty() {
            continue;
        }

        let range = normalized_range(&day);
        tracing::trace!(symbol, %date, range, "Daily range computed.");

        if best.as_ref().is_none_or(|current| range > current.normalized_range) {
            best = Some(DailySpread {
                symbol: symbol.to_string(),
                normalized_range: range,
                date,
            });
        }
    }

    best
}
