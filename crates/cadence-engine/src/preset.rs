//! The preset chips offered next to the rule builder.

use std::fmt;
use std::num::NonZeroU32;

use crate::rrule::{Frequency, RecurrenceRule};

/// A one-click schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    EveryMinute,
    EveryFiveMinutes,
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl Preset {
    /// The rule string the chip stores.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EveryMinute => "FREQ=MINUTELY;INTERVAL=1",
            Self::EveryFiveMinutes => "FREQ=MINUTELY;INTERVAL=5",
            Self::Hourly => "FREQ=HOURLY;INTERVAL=1",
            Self::Daily => "FREQ=DAILY;INTERVAL=1",
            Self::Weekly => "FREQ=WEEKLY;INTERVAL=1",
            Self::Monthly => "FREQ=MONTHLY;INTERVAL=1",
        }
    }

    /// The chip's label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EveryMinute => "Every minute",
            Self::EveryFiveMinutes => "Every 5 minutes",
            Self::Hourly => "Hourly",
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }

    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::EveryMinute,
            Self::EveryFiveMinutes,
            Self::Hourly,
            Self::Daily,
            Self::Weekly,
            Self::Monthly,
        ]
    }

    /// The parsed rule.
    #[must_use]
    pub const fn rule(self) -> RecurrenceRule {
        let (frequency, interval) = match self {
            Self::EveryMinute => (Frequency::Minutely, NonZeroU32::MIN),
            Self::EveryFiveMinutes => (Frequency::Minutely, FIVE),
            Self::Hourly => (Frequency::Hourly, NonZeroU32::MIN),
            Self::Daily => (Frequency::Daily, NonZeroU32::MIN),
            Self::Weekly => (Frequency::Weekly, NonZeroU32::MIN),
            Self::Monthly => (Frequency::Monthly, NonZeroU32::MIN),
        };
        RecurrenceRule::every(frequency, interval)
    }

    /// Matches a preset by its rule string, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// The preset equal to `rule`, if any.
    #[must_use]
    pub fn from_rule(rule: &RecurrenceRule) -> Option<Self> {
        Self::all().into_iter().find(|preset| preset.rule() == *rule)
    }
}

const FIVE: NonZeroU32 = match NonZeroU32::new(5) {
    Some(n) => n,
    None => NonZeroU32::MIN,
};

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
