//! Recurrence rule value type for the RRULE subset produced by the rule builder.

use std::fmt;
use std::num::NonZeroU32;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use super::WeekdaySet;

/// Recurrence frequency.
///
/// SECONDLY and YEARLY from RFC 5545 are not part of the supported subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minutely => "MINUTELY",
            Self::Hourly => "HOURLY",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
        }
    }

    /// Parses a frequency from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "MINUTELY" => Self::Minutely,
            "HOURLY" => Self::Hourly,
            "DAILY" => Self::Daily,
            "WEEKLY" => Self::Weekly,
            "MONTHLY" => Self::Monthly,
            _ => return None,
        })
    }

    /// Returns all frequencies from shortest to longest unit.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Minutely,
            Self::Hourly,
            Self::Daily,
            Self::Weekly,
            Self::Monthly,
        ]
    }

    /// Whether BYHOUR, BYMINUTE and BYSECOND may be used with this frequency.
    #[must_use]
    pub const fn supports_time_of_day(self) -> bool {
        matches!(self, Self::Daily | Self::Weekly | Self::Monthly)
    }

    /// Singular and plural unit names, as used in descriptions.
    #[must_use]
    pub const fn unit_names(self) -> (&'static str, &'static str) {
        match self {
            Self::Minutely => ("minute", "minutes"),
            Self::Hourly => ("hour", "hours"),
            Self::Daily => ("day", "days"),
            Self::Weekly => ("week", "weeks"),
            Self::Monthly => ("month", "months"),
        }
    }

    /// Upper bound on the elapsed time of one unit.
    ///
    /// Months use 31 days; calendar units ignore DST offsets.
    #[must_use]
    pub fn nominal_unit(self) -> TimeDelta {
        match self {
            Self::Minutely => TimeDelta::minutes(1),
            Self::Hourly => TimeDelta::hours(1),
            Self::Daily => TimeDelta::days(1),
            Self::Weekly => TimeDelta::weeks(1),
            Self::Monthly => TimeDelta::days(31),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the rule parts the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RulePart {
    Freq,
    Interval,
    ByHour,
    ByMinute,
    BySecond,
    ByDay,
    ByMonthDay,
}

impl RulePart {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Freq => "FREQ",
            Self::Interval => "INTERVAL",
            Self::ByHour => "BYHOUR",
            Self::ByMinute => "BYMINUTE",
            Self::BySecond => "BYSECOND",
            Self::ByDay => "BYDAY",
            Self::ByMonthDay => "BYMONTHDAY",
        }
    }

    /// Parses a rule part name (case-insensitive). Unknown names yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "FREQ" => Self::Freq,
            "INTERVAL" => Self::Interval,
            "BYHOUR" => Self::ByHour,
            "BYMINUTE" => Self::ByMinute,
            "BYSECOND" => Self::BySecond,
            "BYDAY" => Self::ByDay,
            "BYMONTHDAY" => Self::ByMonthDay,
            _ => return None,
        })
    }

    pub(crate) const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for RulePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated recurrence rule.
///
/// Instances only come out of [`parse`](crate::rrule::parse::parse) or
/// [`RuleBuilder::build`](crate::rrule::parse::RuleBuilder::build), so the
/// field invariants always hold:
/// - `interval >= 1`
/// - time-of-day overrides only with DAILY, WEEKLY or MONTHLY
/// - `by_day` only non-empty with WEEKLY
/// - `by_month_day` only with MONTHLY, and within 1..=31
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecurrenceRule {
    pub(crate) frequency: Frequency,
    pub(crate) interval: NonZeroU32,
    pub(crate) by_hour: Option<u8>,
    pub(crate) by_minute: Option<u8>,
    pub(crate) by_second: Option<u8>,
    pub(crate) by_day: WeekdaySet,
    pub(crate) by_month_day: Option<u8>,
}

impl RecurrenceRule {
    /// A rule firing every `interval` units of `frequency` from the anchor.
    #[must_use]
    pub const fn every(frequency: Frequency, interval: NonZeroU32) -> Self {
        Self {
            frequency,
            interval,
            by_hour: None,
            by_minute: None,
            by_second: None,
            by_day: WeekdaySet::EMPTY,
            by_month_day: None,
        }
    }

    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    #[must_use]
    pub const fn interval(&self) -> u32 {
        self.interval.get()
    }

    #[must_use]
    pub const fn by_hour(&self) -> Option<u8> {
        self.by_hour
    }

    #[must_use]
    pub const fn by_minute(&self) -> Option<u8> {
        self.by_minute
    }

    #[must_use]
    pub const fn by_second(&self) -> Option<u8> {
        self.by_second
    }

    #[must_use]
    pub const fn by_day(&self) -> WeekdaySet {
        self.by_day
    }

    #[must_use]
    pub const fn by_month_day(&self) -> Option<u8> {
        self.by_month_day
    }

    /// True if any of BYHOUR, BYMINUTE or BYSECOND is set.
    #[must_use]
    pub const fn has_time_of_day(&self) -> bool {
        self.by_hour.is_some() || self.by_minute.is_some() || self.by_second.is_some()
    }

    /// True if the rule is a plain "every `interval` units" rule.
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        !self.has_time_of_day() && self.by_day.is_empty() && self.by_month_day.is_none()
    }

    /// Elapsed time covered by one step of the rule, using [`Frequency::nominal_unit`].
    ///
    /// Returns `None` if the product overflows.
    #[must_use]
    pub fn nominal_step(&self) -> Option<TimeDelta> {
        let interval = i32::try_from(self.interval.get()).ok()?;
        self.frequency.nominal_unit().checked_mul(interval)
    }
}

/// Canonical form, in the order the rule builder emits parts:
/// `FREQ;INTERVAL;BYHOUR;BYMINUTE;BYSECOND;BYDAY;BYMONTHDAY`.
impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FREQ={};INTERVAL={}", self.frequency, self.interval)?;

        if let Some(hour) = self.by_hour {
            write!(f, ";BYHOUR={hour}")?;
        }
        if let Some(minute) = self.by_minute {
            write!(f, ";BYMINUTE={minute}")?;
        }
        if let Some(second) = self.by_second {
            write!(f, ";BYSECOND={second}")?;
        }
        if !self.by_day.is_empty() {
            write!(f, ";BYDAY={}", self.by_day)?;
        }
        if let Some(day) = self.by_month_day {
            write!(f, ";BYMONTHDAY={day}")?;
        }

        Ok(())
    }
}
