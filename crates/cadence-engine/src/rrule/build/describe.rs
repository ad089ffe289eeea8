//! Human-readable rendering of recurrence rules.

use crate::rrule::core::{Frequency, RecurrenceRule, Weekday};

/// ## Summary
/// Renders a rule as a short English sentence, e.g. `Every 5 minutes` or
/// `Every week on Mon, Wed, Fri at 09:00`.
///
/// Components taken from the anchor at run time are left out.
#[must_use]
pub fn describe(rule: &RecurrenceRule) -> String {
    let (singular, plural) = rule.frequency().unit_names();
    let mut text = match rule.interval() {
        1 => format!("Every {singular}"),
        n => format!("Every {n} {plural}"),
    };

    if rule.frequency() == Frequency::Weekly && !rule.by_day().is_empty() {
        let days: Vec<_> = rule.by_day().iter().map(Weekday::label).collect();
        text.push_str(&format!(" on {}", days.join(", ")));
    }

    if let Some(day) = rule.by_month_day() {
        text.push_str(&format!(" on day {day}"));
    }

    if let Some(time) = describe_time_of_day(rule) {
        text.push_str(&time);
    }

    text
}

/// Clock-style time; components inherited from the anchor show as `??`.
fn describe_time_of_day(rule: &RecurrenceRule) -> Option<String> {
    let (hour, minute, second) = (rule.by_hour(), rule.by_minute(), rule.by_second());
    if hour.is_none() && minute.is_none() && second.is_none() {
        return None;
    }

    let field = |value: Option<u8>| value.map_or_else(|| "??".to_string(), |v| format!("{v:02}"));
    let mut time = format!(" at {}:{}", field(hour), field(minute));
    if second.is_some() {
        time.push(':');
        time.push_str(&field(second));
    }
    Some(time)
}
