use analyzer::rank_by_spread;
use chrono::{Duration, NaiveDate};
use core_types::Observation;
use proptest::prelude::*;
use std::collections::BTreeSet;

const SYMBOLS: [&str; 5] = ["ADA", "BTC", "DOGE", "ETH", "XRP"];

fn any_observations() -> impl Strategy<Value = Vec<Observation>> {
    let base = NaiveDate::from_ymd_opt(2022, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    prop::collection::vec((0usize..SYMBOLS.len(), 0i64..1_000, 0.0f64..1_000.0), 0..80).prop_map(
        move |samples| {
            samples
                .into_iter()
                .map(|(s, minutes, price)| {
                    Observation::new(SYMBOLS[s], base + Duration::minutes(minutes), price)
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn ranking_is_sorted_descending(observations in any_observations()) {
        let ranked = rank_by_spread(&observations);

        for pair in ranked.windows(2) {
            prop_assert!(pair[0].normalized_range >= pair[1].normalized_range);
        }
    }

    #[test]
    fn every_symbol_appears_exactly_once(observations in any_observations()) {
        let ranked = rank_by_spread(&observations);

        let expected: BTreeSet<&str> = observations.iter().map(|o| o.symbol.as_str()).collect();
        let actual: BTreeSet<&str> = ranked.iter().map(|r| r.symbol.as_str()).collect();

        prop_assert_eq!(ranked.len(), expected.len());
        prop_assert_eq!(actual, expected);
    }
}
