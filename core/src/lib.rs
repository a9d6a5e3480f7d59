//! Time-block resolution for quarter-hour market tables.
//!
//! Given the current wall-clock time of day and a table of labeled
//! quarter-hour intervals, this crate deterministically selects the single
//! row that best represents "now", with a total fallback policy when no
//! exact match exists or the matched row carries no data.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`interval`] | Interval label parsing ("20:30-20:45", midnight wrap aware) |
//! | [`classify`] | Empty-row detection over the payload columns |
//! | [`resolve`] | The resolution state machine and its diagnostics |
//! | [`boundary`] | Next aligned quarter-hour boundary (display hint only) |
//! | [`retry`] | The `TableSource` seam and bounded acquisition retries |
//!
//! The resolver is synchronous and pure: the current time is always injected
//! as a parameter, so boundary and wraparound behavior is fully testable.
//! Only the acquisition retry path is async, and only for its inter-attempt
//! delay.

pub mod boundary;
pub mod classify;
pub mod interval;
pub mod resolve;
pub mod retry;

pub use boundary::next_quarter_hour;
pub use classify::is_empty_row;
pub use interval::{ParsedInterval, parse_interval};
pub use resolve::{Resolution, ResolveError, Selection, resolve};
pub use retry::{RetryPolicy, TableSource, acquire_with_retry};
