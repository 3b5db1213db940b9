use core_types::{Observation, StatsResult};

/// The lowest price in the series, or `0.0` for an empty series.
pub fn min_price(observations: &[Observation]) -> f64 {
    observations
        .iter()
        .map(|o| o.price)
        .reduce(f64::min)
        .unwrap_or(0.0)
}

/// The highest price in the series, or `0.0` for an empty series.
pub fn max_price(observations: &[Observation]) -> f64 {
    observations
        .iter()
        .map(|o| o.price)
        .reduce(f64::max)
        .unwrap_or(0.0)
}

/// The sample with the earliest timestamp.
pub fn oldest(observations: &[Observation]) -> Option<&Observation> {
    observations
        .iter()
        .reduce(|best, o| if o.timestamp < best.timestamp { o } else { best })
}

/// The sample with the latest timestamp.
pub fn newest(observations: &[Observation]) -> Option<&Observation> {
    observations
        .iter()
        .reduce(|best, o| if o.timestamp > best.timestamp { o } else { best })
}

/// `(max - min) / min`, or `0.0` when `min` is not positive.
pub fn spread_of(min: f64, max: f64) -> f64 {
    if min > 0.0 { (max - min) / min } else { 0.0 }
}

/// Relative price spread of the series: `(max - min) / min`.
///
/// Scale independent, so symbols with very different absolute prices can be
/// compared. Empty series and series whose minimum is zero yield `0.0`.
pub fn normalized_range(observations: &[Observation]) -> f64 {
    spread_of(min_price(observations), max_price(observations))
}

/// Oldest, newest, minimum and maximum price of a non-empty series.
pub fn summarize(symbol: &str, observations: &[Observation]) -> Option<StatsResult> {
    let oldest = oldest(observations)?;
    let newest = newest(observations)?;

    Some(StatsResult {
        symbol: symbol.to_string(),
        oldest_price: oldest.price,
        newest_price: newest.price,
        min_price: min_price(observations),
        max_price: max_price(observations),
    })
}
