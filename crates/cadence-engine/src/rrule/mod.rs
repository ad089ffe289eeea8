//! Recurrence rule engine for the RRULE subset used by job schedules.
//!
//! - `core`: rule, weekday and window types
//! - `parse`: parser and validator for rule strings
//! - `build`: canonical serialization and human-readable descriptions
//! - `expand`: occurrence generation, due/next queries and zone resolution
//!
//! ## Example
//!
//! ```rust
//! use cadence_engine::rrule::{OccurrenceWindow, parse};
//! use chrono::{TimeZone, Utc};
//!
//! let rule = parse("FREQ=WEEKLY;INTERVAL=1;BYHOUR=9;BYMINUTE=0;BYDAY=MO,WE,FR")?;
//!
//! let anchor = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
//! let end = Utc.with_ymd_and_hms(2025, 1, 13, 0, 0, 0).unwrap();
//! let window = OccurrenceWindow::new(anchor, anchor, end);
//!
//! assert_eq!(rule.occurrences(&window).count(), 3);
//! # Ok::<(), cadence_engine::rrule::ParseError>(())
//! ```

pub mod build;
pub mod core;
pub mod expand;
pub mod parse;

#[cfg(test)]
mod tests;

pub use build::{describe, serialize};
pub use core::{Frequency, OccurrenceWindow, RecurrenceRule, RulePart, Weekday, WeekdaySet};
pub use expand::{Occurrences, is_due, next_occurrence, next_occurrences, occurrences};
pub use parse::{ParseError, ParseErrorKind, ParseResult, RuleBuilder, is_valid, parse};
