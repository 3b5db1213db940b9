//! # Price Statistics
//!
//! Pure functions over a slice of `Observation`s: extrema, oldest/newest
//! sample, the normalized range, and the two filters (trailing window and
//! calendar date) the query layer applies before aggregating.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** nothing here knows where observations come from, and
//!   nothing here fails. Empty input yields `0.0` for the price aggregates
//!   and `None` for the sample lookups; deciding what an empty series *means*
//!   is the caller's job.
//! - **Input order is irrelevant to the result** except for ties on equal
//!   timestamps, where the first sample in input order wins.

pub mod stats;
pub mod window;

pub use stats::{max_price, min_price, newest, normalized_range, oldest, spread_of, summarize};
pub use window::{filter_by_calendar_date, filter_by_window, window_start};
