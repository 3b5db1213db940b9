use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single price sample for one symbol.
///
/// The timestamp is a wall-clock time in the calendar zone the store was
/// configured with, so `timestamp.date()` is the calendar day the sample
/// belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub symbol: String,
    pub timestamp: NaiveDateTime,
    pub price: f64,
}

impl Observation {
    pub fn new(symbol: impl Into<String>, timestamp: NaiveDateTime, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            price,
        }
    }
}

/// Summary statistics of one symbol over all history or a trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResult {
    pub symbol: String,
    pub oldest_price: f64,
    pub newest_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}

/// One entry of the global normalized-range ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadResult {
    pub symbol: String,
    pub normalized_range: f64,
}

/// The symbol with the widest normalized range on a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySpread {
    pub symbol: String,
    pub normalized_range: f64,
    pub date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_result_serializes_with_camel_case_fields() {
        let stats = StatsResult {
            symbol: "BTC".to_string(),
            oldest_price: 100.0,
            newest_price: 150.0,
            min_price: 100.0,
            max_price: 200.0,
        };

        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["symbol"], "BTC");
        assert_eq!(json["oldestPrice"], 100.0);
        assert_eq!(json["newestPrice"], 150.0);
        assert_eq!(json["minPrice"], 100.0);
        assert_eq!(json["maxPrice"], 200.0);
    }

    #[test]
    fn daily_spread_serializes_date_as_iso_day() {
        let spread = DailySpread {
            symbol: "ETH".to_string(),
            normalized_range: 0.5,
            date: NaiveDate::from_ymd_opt(2022, 1, 13).unwrap(),
        };

        let json = serde_json::to_value(&spread).unwrap();

        assert_eq!(json["date"], "2022-01-13");
        assert_eq!(json["normalizedRange"], 0.5);
    }
}
