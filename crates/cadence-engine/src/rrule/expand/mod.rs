//! Occurrence expansion for recurrence rules.
//!
//! - `occurrences`: the lazy generator over a bounded window
//! - `query`: due-now and next-run searches on top of it
//! - `timezone`: resolution of zone names for schedule anchors

mod calendar;
mod occurrences;
mod query;
mod timezone;

pub use occurrences::{Occurrences, occurrences};
pub use query::{
    DEFAULT_SEARCH_HORIZON_DAYS, default_search_horizon, is_due, next_occurrence,
    next_occurrence_within, next_occurrences, next_occurrences_within,
};
pub use timezone::{ZoneError, ZoneResolver, resolve_zone};
