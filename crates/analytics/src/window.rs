use core_types::{Observation, PeriodUnit};
use chrono::{Months, NaiveDate, NaiveDateTime, TimeDelta};

/// `now - amount * unit`.
///
/// Units of a month or longer use calendar arithmetic: the day of month is
/// kept and clamped to the last day of the target month (March 31 minus one
/// month is the last day of February). Shorter units are fixed durations.
/// A negative `amount` moves forward in time. Returns `None` if the result
/// is not representable.
pub fn window_start(now: NaiveDateTime, amount: i64, unit: PeriodUnit) -> Option<NaiveDateTime> {
    if let Some(months_per_unit) = unit.calendar_months() {
        let months = amount.checked_mul(i64::from(months_per_unit))?;
        let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
        return if months >= 0 {
            now.checked_sub_months(magnitude)
        } else {
            now.checked_add_months(magnitude)
        };
    }

    // i128 so long windows in small units do not overflow before chrono's own range check.
    let nanos = i128::from(unit.fixed_nanos()?) * i128::from(amount);
    let secs = i64::try_from(nanos.div_euclid(1_000_000_000)).ok()?;
    let subsec = u32::try_from(nanos.rem_euclid(1_000_000_000)).ok()?;
    now.checked_sub_signed(TimeDelta::new(secs, subsec)?)
}

/// Keeps the observations strictly newer than `now - amount * unit`.
///
/// When the window start is not representable, a window reaching into the
/// past keeps everything and one reaching into the future keeps nothing.
pub fn filter_by_window(
    observations: &[Observation],
    now: NaiveDateTime,
    amount: i64,
    unit: PeriodUnit,
) -> Vec<Observation> {
    match window_start(now, amount, unit) {
        Some(start) => observations
            .iter()
            .filter(|o| o.timestamp > start)
            .cloned()
            .collect(),
        None if amount > 0 => observations.to_vec(),
        None => Vec::new(),
    }
}

/// Keeps the observations whose wall-clock date is exactly `date`.
pub fn filter_by_calendar_date(observations: &[Observation], date: NaiveDate) -> Vec<Observation> {
    observations
        .iter()
        .filter(|o| o.timestamp.date() == date)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn month_subtraction_clamps_to_month_end() {
        assert_eq!(
            window_start(at(2022, 3, 31, 9), 1, PeriodUnit::Months),
            Some(at(2022, 2, 28, 9))
        );
        assert_eq!(
            window_start(at(2024, 3, 31, 9), 1, PeriodUnit::Months),
            Some(at(2024, 2, 29, 9))
        );
    }

    #[test]
    fn years_are_calendar_years() {
        assert_eq!(
            window_start(at(2024, 2, 29, 0), 1, PeriodUnit::Years),
            Some(at(2023, 2, 28, 0))
        );
        assert_eq!(
            window_start(at(2022, 6, 15, 0), 1, PeriodUnit::Decades),
            Some(at(2012, 6, 15, 0))
        );
    }

    #[test]
    fn fixed_units_are_exact_durations() {
        let now = at(2022, 1, 10, 12);
        assert_eq!(window_start(now, 30, PeriodUnit::Days), Some(now - Duration::days(30)));
        assert_eq!(window_start(now, 3, PeriodUnit::HalfDays), Some(now - Duration::hours(36)));
        assert_eq!(window_start(now, 2, PeriodUnit::Weeks), Some(now - Duration::days(14)));
        assert_eq!(window_start(now, 90, PeriodUnit::Seconds), Some(now - Duration::seconds(90)));
        assert_eq!(window_start(now, 1_500, PeriodUnit::Micros), Some(now - Duration::microseconds(1_500)));
        assert_eq!(window_start(now, 7, PeriodUnit::Nanos), Some(now - Duration::nanoseconds(7)));
        assert_eq!(window_start(now, -250, PeriodUnit::Millis), Some(now + Duration::milliseconds(250)));
    }

    #[test]
    fn negative_amount_moves_forward() {
        assert_eq!(
            window_start(at(2022, 1, 31, 0), -1, PeriodUnit::Months),
            Some(at(2022, 2, 28, 0))
        );
    }

    #[test]
    fn window_boundary_is_exclusive() {
        let now = at(2022, 1, 10, 12);
        let series = vec![
            Observation::new("BTC", now - Duration::days(40), 100.0),
            Observation::new("BTC", now - Duration::days(30), 125.0),
            Observation::new("BTC", now - Duration::days(10), 200.0),
            Observation::new("BTC", now - Duration::days(5), 150.0),
        ];

        let kept = filter_by_window(&series, now, 30, PeriodUnit::Days);

        let prices: Vec<f64> = kept.iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![200.0, 150.0]);
    }

    #[test]
    fn unrepresentable_window_keeps_everything_or_nothing() {
        let now = at(2022, 1, 10, 12);
        let series = vec![Observation::new("BTC", now, 1.0)];

        assert_eq!(filter_by_window(&series, now, i64::MAX, PeriodUnit::Millennia).len(), 1);
        assert!(filter_by_window(&series, now, i64::MIN, PeriodUnit::Millennia).is_empty());
    }

    #[test]
    fn calendar_date_filter_matches_whole_day_only() {
        let series = vec![
            Observation::new("BTC", at(2022, 1, 12, 23), 1.0),
            Observation::new("BTC", at(2022, 1, 13, 0), 2.0),
            Observation::new("BTC", at(2022, 1, 13, 23), 3.0),
            Observation::new("BTC", at(2022, 1, 14, 0), 4.0),
        ];

        let day = filter_by_calendar_date(&series, NaiveDate::from_ymd_opt(2022, 1, 13).unwrap());

        let prices: Vec<f64> = day.iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![2.0, 3.0]);
    }
}
