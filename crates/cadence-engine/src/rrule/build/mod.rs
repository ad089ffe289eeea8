//! Serialization of recurrence rules.
//!
//! - `serialize`: the canonical rule string, as stored alongside a job
//! - `describe`: a human-readable summary for listings

mod describe;

pub use describe::describe;

use crate::rrule::core::RecurrenceRule;

/// Serializes a rule to its canonical string form.
///
/// The output always parses back to an equal rule.
#[must_use]
pub fn serialize(rule: &RecurrenceRule) -> String {
    rule.to_string()
}
