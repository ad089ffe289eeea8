//! Type definitions for recurrence rules and query windows.

mod rule;
mod weekday;
mod window;

pub use rule::{Frequency, RecurrenceRule, RulePart};
pub use weekday::{Weekday, WeekdaySet};
pub use window::OccurrenceWindow;
