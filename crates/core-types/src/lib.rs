//! # Core Types
//!
//! Plain data shared by every layer: the `Observation` loaded from a price
//! source, the result records produced by the statistics and ranking code,
//! and the small enums used to describe time windows and calendar zones.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{CalendarZone, PeriodUnit};
pub use error::CoreError;
pub use structs::{DailySpread, Observation, SpreadResult, StatsResult};
