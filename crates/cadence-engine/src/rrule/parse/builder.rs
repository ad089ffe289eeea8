//! Programmatic construction of recurrence rules.
//!
//! The builder mirrors the form-based rule builder of the admin console: pick
//! a frequency, then optionally an interval, a time of day, weekdays or a day
//! of the month. [`RuleBuilder::build`] applies the same checks as the string
//! parser, so a rule built here always serializes to a string that parses back
//! to an equal rule.

use std::num::NonZeroU32;

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rrule::core::{Frequency, RecurrenceRule, RulePart, Weekday, WeekdaySet};

/// Builder for [`RecurrenceRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleBuilder {
    frequency: Frequency,
    interval: u32,
    by_hour: Option<u8>,
    by_minute: Option<u8>,
    by_second: Option<u8>,
    by_day: Option<WeekdaySet>,
    by_month_day: Option<u8>,
}

impl RuleBuilder {
    #[must_use]
    pub const fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            by_hour: None,
            by_minute: None,
            by_second: None,
            by_day: None,
            by_month_day: None,
        }
    }

    #[must_use]
    pub const fn interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub const fn at_hour(mut self, hour: u8) -> Self {
        self.by_hour = Some(hour);
        self
    }

    #[must_use]
    pub const fn at_minute(mut self, minute: u8) -> Self {
        self.by_minute = Some(minute);
        self
    }

    #[must_use]
    pub const fn at_second(mut self, second: u8) -> Self {
        self.by_second = Some(second);
        self
    }

    /// Sets BYDAY. An empty list is rejected by [`build`](Self::build).
    #[must_use]
    pub fn on_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.by_day = Some(days.into_iter().collect());
        self
    }

    #[must_use]
    pub const fn on_month_day(mut self, day: u8) -> Self {
        self.by_month_day = Some(day);
        self
    }

    /// ## Summary
    /// Validates the collected parts and produces the rule.
    ///
    /// ## Errors
    /// Returns the same error kinds as the string parser, with position 0 and
    /// the offending rule part named in the context.
    pub fn build(self) -> ParseResult<RecurrenceRule> {
        let fail = |kind, part: RulePart| Err(ParseError::new(kind, 0).with_context(part.as_str()));

        let Some(interval) = NonZeroU32::new(self.interval) else {
            return fail(ParseErrorKind::InvalidInterval, RulePart::Interval);
        };

        let time_parts = [
            (RulePart::ByHour, self.by_hour),
            (RulePart::ByMinute, self.by_minute),
            (RulePart::BySecond, self.by_second),
        ];
        for (part, value) in time_parts {
            let Some(value) = value else { continue };
            if let Err(kind) = check_applicable(self.frequency, part) {
                return fail(kind, part);
            }
            if value > time_field_max(part) {
                return fail(ParseErrorKind::InvalidFieldRange, part);
            }
        }

        if let Some(days) = self.by_day {
            if let Err(kind) = check_applicable(self.frequency, RulePart::ByDay) {
                return fail(kind, RulePart::ByDay);
            }
            if days.is_empty() {
                return fail(ParseErrorKind::InvalidWeekday, RulePart::ByDay);
            }
        }

        if let Some(day) = self.by_month_day {
            if let Err(kind) = check_applicable(self.frequency, RulePart::ByMonthDay) {
                return fail(kind, RulePart::ByMonthDay);
            }
            if !(1..=31).contains(&day) {
                return fail(ParseErrorKind::InvalidDayOfMonth, RulePart::ByMonthDay);
            }
        }

        Ok(RecurrenceRule {
            frequency: self.frequency,
            interval,
            by_hour: self.by_hour,
            by_minute: self.by_minute,
            by_second: self.by_second,
            by_day: self.by_day.unwrap_or_default(),
            by_month_day: self.by_month_day,
        })
    }
}

impl RecurrenceRule {
    /// Starts a [`RuleBuilder`] for the given frequency.
    #[must_use]
    pub const fn builder(frequency: Frequency) -> RuleBuilder {
        RuleBuilder::new(frequency)
    }
}

/// Checks whether `part` may appear alongside `frequency`.
///
/// Time-of-day parts on MINUTELY/HOURLY are reported as `InvalidFieldRange`;
/// BYDAY and BYMONTHDAY on the wrong frequency as `FieldNotApplicableForFrequency`.
pub(crate) fn check_applicable(frequency: Frequency, part: RulePart) -> Result<(), ParseErrorKind> {
    match part {
        RulePart::ByHour | RulePart::ByMinute | RulePart::BySecond
            if !frequency.supports_time_of_day() =>
        {
            Err(ParseErrorKind::InvalidFieldRange)
        }
        RulePart::ByDay if frequency != Frequency::Weekly => {
            Err(ParseErrorKind::FieldNotApplicableForFrequency)
        }
        RulePart::ByMonthDay if frequency != Frequency::Monthly => {
            Err(ParseErrorKind::FieldNotApplicableForFrequency)
        }
        _ => Ok(()),
    }
}

/// Largest accepted value for a time-of-day part.
pub(crate) const fn time_field_max(part: RulePart) -> u8 {
    match part {
        RulePart::ByHour => 23,
        _ => 59,
    }
}
