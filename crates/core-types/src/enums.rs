use crate::error::CoreError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The unit of a trailing time window, e.g. the `DAYS` in "last 30 days".
///
/// Names follow the upper-case spelling clients already send
/// (`MONTHS`, `HALF_DAYS`, ...). Parsing is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum PeriodUnit {
    Nanos,
    Micros,
    Millis,
    Seconds,
    Minutes,
    Hours,
    HalfDays,
    Days,
    Weeks,
    Months,
    Years,
    Decades,
    Centuries,
    Millennia,
}

impl PeriodUnit {
    pub const ALL: [PeriodUnit; 14] = [
        PeriodUnit::Nanos,
        PeriodUnit::Micros,
        PeriodUnit::Millis,
        PeriodUnit::Seconds,
        PeriodUnit::Minutes,
        PeriodUnit::Hours,
        PeriodUnit::HalfDays,
        PeriodUnit::Days,
        PeriodUnit::Weeks,
        PeriodUnit::Months,
        PeriodUnit::Years,
        PeriodUnit::Decades,
        PeriodUnit::Centuries,
        PeriodUnit::Millennia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodUnit::Nanos => "NANOS",
            PeriodUnit::Micros => "MICROS",
            PeriodUnit::Millis => "MILLIS",
            PeriodUnit::Seconds => "SECONDS",
            PeriodUnit::Minutes => "MINUTES",
            PeriodUnit::Hours => "HOURS",
            PeriodUnit::HalfDays => "HALF_DAYS",
            PeriodUnit::Days => "DAYS",
            PeriodUnit::Weeks => "WEEKS",
            PeriodUnit::Months => "MONTHS",
            PeriodUnit::Years => "YEARS",
            PeriodUnit::Decades => "DECADES",
            PeriodUnit::Centuries => "CENTURIES",
            PeriodUnit::Millennia => "MILLENNIA",
        }
    }

    /// The number of calendar months in one unit, or `None` for units that
    /// are a fixed duration.
    pub fn calendar_months(&self) -> Option<u32> {
        match self {
            PeriodUnit::Months => Some(1),
            PeriodUnit::Years => Some(12),
            PeriodUnit::Decades => Some(120),
            PeriodUnit::Centuries => Some(1_200),
            PeriodUnit::Millennia => Some(12_000),
            _ => None,
        }
    }

    /// The length of one unit in nanoseconds, for fixed-duration units.
    pub fn fixed_nanos(&self) -> Option<i64> {
        const MILLI: i64 = 1_000_000;
        match self {
            PeriodUnit::Nanos => Some(1),
            PeriodUnit::Micros => Some(1_000),
            PeriodUnit::Millis => Some(MILLI),
            PeriodUnit::Seconds => Some(1_000 * MILLI),
            PeriodUnit::Minutes => Some(60_000 * MILLI),
            PeriodUnit::Hours => Some(3_600_000 * MILLI),
            PeriodUnit::HalfDays => Some(43_200_000 * MILLI),
            PeriodUnit::Days => Some(86_400_000 * MILLI),
            PeriodUnit::Weeks => Some(604_800_000 * MILLI),
            _ => None,
        }
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PeriodUnit::ALL
            .into_iter()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownPeriodUnit(s.to_string()))
    }
}

impl TryFrom<String> for PeriodUnit {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Which calendar the epoch-millisecond timestamps of a source are read in.
///
/// Calendar-date queries and trailing windows are evaluated on the resulting
/// wall-clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarZone {
    /// The zone of the host the process runs on.
    #[default]
    Local,
    Utc,
}

impl CalendarZone {
    /// Converts epoch milliseconds into a wall-clock time in this zone.
    /// Returns `None` when the instant is outside chrono's representable range.
    pub fn from_epoch_millis(&self, millis: i64) -> Option<NaiveDateTime> {
        let instant = DateTime::<Utc>::from_timestamp_millis(millis)?;
        Some(match self {
            CalendarZone::Local => instant.with_timezone(&chrono::Local).naive_local(),
            CalendarZone::Utc => instant.naive_utc(),
        })
    }

    /// The current wall-clock time in this zone.
    pub fn now(&self) -> NaiveDateTime {
        match self {
            CalendarZone::Local => chrono::Local::now().naive_local(),
            CalendarZone::Utc => Utc::now().naive_utc(),
        }
    }
}

impl FromStr for CalendarZone {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(CalendarZone::Local),
            "utc" => Ok(CalendarZone::Utc),
            _ => Err(CoreError::UnknownZone(s.to_string())),
        }
    }
}
