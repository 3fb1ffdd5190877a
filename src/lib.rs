//! AWS EventBridge cron expressions parser and upcoming schedule generator.
#![deny(unsafe_code, missing_docs)]

//! This crate is intended to:
//! - parse and validate six-field cron expressions in the format used by AWS EventBridge (CloudWatch Events) rules;
//! - calculate the next N moments when such an expression fires.
//!
//! _This is not a cron jobs scheduler or runner._ Nothing is executed or awaited here,
//! all calculations are pure and synchronous.
//!
//! ## Cron expression format
//!
//! An expression always has six whitespace-separated fields: minutes, hours, day of month, month, day of week and year.
//! There are no seconds, aliases or optional fields.
//!
//! The table below describes valid values and patterns of each field:
//!
//! | Field        | Allowed values  | Allowed special characters |
//! |--------------|-----------------|----------------------------|
//! | Minutes      | 0-59            | * , - /                    |
//! | Hours        | 0-23            | * , - /                    |
//! | Day of Month | 1-31            | * , - / ? L W              |
//! | Month        | 1-12 or JAN-DEC | * , - /                    |
//! | Day of Week  | 1-7 or SUN-SAT  | * , - / ? L #              |
//! | Year         | 1970-2199       | * , - /                    |
//!
//! Patterns meanings:
//! - `*` - each possible value, i.e. `0,1,2,...,59` for minutes;
//! - `,` - list of values or patterns, i.e. `1,7,12`, `SUN,FRI`;
//! - `-` - range of values, i.e. `0-15`, `JAN-MAR`;
//! - `/` - repeating values, i.e. `*/12`, `10/5`, `30-59/2`;
//! - `L` - last day of the month in the day of month field, or the last particular weekday of the month in the day of week field, i.e. `L` or `6L`;
//! - `W` - the weekday (not Sunday or Saturday) nearest to the specified day of month in the same month, i.e. `22W`;
//! - `#` - n-th particular weekday of the month, i.e. `fri#1`, `2#4`;
//! - `?` - in one of the day fields means the value doesn't matter. Exactly one of day of month and day of week should be `?`.
//!
//! Days of week are numbered from `1` (Sunday) to `7` (Saturday). Names of months and days are case-insensitive.
//!
//! Detailed description of the format is available in the
//! [EventBridge documentation](https://docs.aws.amazon.com/eventbridge/latest/userguide/eb-cron-expressions.html).
//!
//! ## Timezones
//!
//! An expression is evaluated against the wall-clock time in the offset of the provided reference instant,
//! and returned instants have the same timezone. Fixed offsets like [`chrono::Utc`] and [`chrono::FixedOffset`] are supported,
//! there is no timezone database.
//!
//! ## How to use
//!
//! The central entity of the crate is an [`Expression`] structure:
//! - [new()](Expression::new): constructor to parse and validate provided expression;
//! - [upcoming()](Expression::upcoming): returns time of the next event after the provided timestamp;
//! - [next_n()](Expression::next_n): returns up to N next events;
//! - [iter()](Expression::iter): returns an `Iterator` which produces a series of timestamps.
//!
//! ### Example with `next_n`
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use cronplan::{format::format_schedule, Expression, Result};
//!
//! fn next_n() -> Result<()> {
//!     let expression = Expression::new("0/15 10 ? * FRI *")?;
//!     let reference = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//!
//!     let schedule = expression.next_n(&reference, 3);
//!     assert_eq!(
//!         format_schedule(&schedule),
//!         vec![
//!             "Fri, 05 Jan 2024 10:00:00",
//!             "Fri, 05 Jan 2024 10:15:00",
//!             "Fri, 05 Jan 2024 10:30:00",
//!         ]
//!     );
//!
//!     Ok(())
//! }
//! # next_n().unwrap();
//! ```
//!
//! ### Example with `iter`
//! ```rust
//! use chrono::Utc;
//! use cronplan::{Expression, Result};
//!
//! fn iterator() -> Result<()> {
//!     let expression = Expression::new("0 0 L * ? *")?;
//!     let now = Utc::now();
//!
//!     // Get the last days of the next 10 months
//!     expression.iter(&now).take(10).for_each(|t| println!("next: {t}"));
//!
//!     Ok(())
//! }
//! # iterator().unwrap();
//! ```
//!
//! ### Parsing errors
//! ```rust
//! use cronplan::{CronError, ErrorKind, Expression, FieldKind};
//!
//! let error = Expression::new("5 0 * 13 ? *").unwrap_err();
//! assert_eq!(error.kind(), ErrorKind::Syntax);
//! assert_eq!(error.field(), Some(FieldKind::Month));
//! assert_eq!(error.value(), "13");
//!
//! let error = Expression::new("* * * * * *").unwrap_err();
//! assert!(matches!(error, CronError::InvalidDaysPattern(_)));
//! ```
//!
//! # Feature flags
//! * `serde`: adds [`Serialize`](https://docs.rs/serde/latest/serde/trait.Serialize.html) and [`Deserialize`](https://docs.rs/serde/latest/serde/trait.Deserialize.html) trait implementation for [`Expression`].
//! * `cli`: builds the `cronplan` command line tool.

mod calendar;
/// Crate specific Error implementation.
pub mod error;
/// Cron expression parser and upcoming events generator.
pub mod expression;
/// Single field rules.
pub mod field;
/// Rendering of calculated schedules.
pub mod format;
mod search;

#[cfg(test)]
use rstest_reuse;

// Re-export of public entities.
pub use error::{CronError, ErrorKind};
pub use expression::Expression;
pub use field::{CronField, FieldKind, MAX_YEAR, MIN_YEAR};

/// Convenient alias for `Result`.
pub type Result<T, E = CronError> = std::result::Result<T, E>;
