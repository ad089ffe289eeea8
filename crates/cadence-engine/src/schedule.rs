//! Binding of job metadata to a recurrence rule.
//!
//! [`ScheduleRecord`] is the JSON form the scheduler stores and hands over;
//! [`JobSchedule`] is the resolved, typed form queries run against.

use std::num::NonZeroU32;

use chrono::{DateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ScheduleError, ScheduleResult};
use crate::rrule::expand::{
    default_search_horizon, next_occurrence_within, next_occurrences_within, resolve_zone,
};
use crate::rrule::{OccurrenceWindow, Occurrences, RecurrenceRule, parse};

/// How many times a job may run in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunLimit {
    #[default]
    Unlimited,
    AtMost(NonZeroU32),
}

impl RunLimit {
    /// Interprets the stored `maxRun`/`runForever` pair.
    ///
    /// `run_forever` wins; a `max_run` of 0 means no limit.
    #[must_use]
    pub const fn from_parts(max_run: u32, run_forever: bool) -> Self {
        if run_forever {
            return Self::Unlimited;
        }
        match NonZeroU32::new(max_run) {
            Some(max) => Self::AtMost(max),
            None => Self::Unlimited,
        }
    }

    /// Runs left after `run_count`, or `None` if unlimited.
    #[must_use]
    pub const fn remaining(self, run_count: u32) -> Option<u32> {
        match self {
            Self::Unlimited => None,
            Self::AtMost(max) => Some(max.get().saturating_sub(run_count)),
        }
    }
}

/// A job's schedule: metadata, rule, active range and run budget.
///
/// `end_date` is inclusive. The rule's anchor is `start_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSchedule<Z: TimeZone> {
    pub job_id: Uuid,
    pub name: String,
    pub enabled: bool,
    pub rule: RecurrenceRule,
    pub start_date: DateTime<Z>,
    pub end_date: Option<DateTime<Z>>,
    pub run_limit: RunLimit,
    pub run_count: u32,
}

impl<Z: TimeZone> JobSchedule<Z> {
    /// An enabled, unlimited schedule with no end date.
    #[must_use]
    pub fn new(
        job_id: Uuid,
        name: impl Into<String>,
        rule: RecurrenceRule,
        start_date: DateTime<Z>,
    ) -> Self {
        Self {
            job_id,
            name: name.into(),
            enabled: true,
            rule,
            start_date,
            end_date: None,
            run_limit: RunLimit::Unlimited,
            run_count: 0,
        }
    }

    /// True once the run budget is used up.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.run_limit.remaining(self.run_count) == Some(0)
    }

    /// True if `instant` is not past the end date.
    fn within_end<Z2: TimeZone>(&self, instant: &DateTime<Z2>) -> bool {
        self.end_date.as_ref().is_none_or(|end| instant <= end)
    }

    fn can_run(&self) -> bool {
        self.enabled && !self.is_exhausted()
    }

    /// ## Summary
    /// The next run strictly after `after`, or `None` if the job is disabled,
    /// exhausted, or has no run left before its end date.
    #[must_use]
    pub fn next_run<Z2: TimeZone>(&self, after: &DateTime<Z2>) -> Option<DateTime<Z>> {
        self.next_run_within(after, default_search_horizon())
    }

    /// Like [`JobSchedule::next_run`] with an explicit search horizon.
    #[must_use]
    pub fn next_run_within<Z2: TimeZone>(
        &self,
        after: &DateTime<Z2>,
        horizon: TimeDelta,
    ) -> Option<DateTime<Z>> {
        if !self.can_run() {
            return None;
        }
        next_occurrence_within(&self.rule, &self.start_date, after, horizon)
            .filter(|t| self.within_end(t))
    }

    /// ## Summary
    /// Whether the job should run at `now`, accepting fire times up to
    /// `tolerance` in the past.
    #[must_use]
    pub fn is_due<Z2: TimeZone>(&self, now: &DateTime<Z2>, tolerance: TimeDelta) -> bool {
        self.can_run()
            && self.within_end(now)
            && self.rule.is_due(&self.start_date, now, tolerance)
    }

    /// ## Summary
    /// Up to `count` upcoming runs after `after`, honoring the end date and
    /// the remaining run budget.
    #[must_use]
    pub fn upcoming<Z2: TimeZone>(&self, after: &DateTime<Z2>, count: usize) -> Vec<DateTime<Z>> {
        if !self.can_run() {
            return Vec::new();
        }
        let count = match self.run_limit.remaining(self.run_count) {
            Some(left) => count.min(usize::try_from(left).unwrap_or(usize::MAX)),
            None => count,
        };

        let mut runs = next_occurrences_within(
            &self.rule,
            &self.start_date,
            after,
            count,
            default_search_horizon(),
        );
        runs.retain(|t| self.within_end(t));
        runs
    }

    /// ## Summary
    /// A window over `[range_start, range_end)` anchored at the start date,
    /// clipped so that it ends right after the (inclusive) end date.
    #[must_use]
    pub fn window(&self, range_start: DateTime<Z>, range_end: DateTime<Z>) -> OccurrenceWindow<Z> {
        let range_end = match &self.end_date {
            Some(end) => match end.clone().checked_add_signed(TimeDelta::nanoseconds(1)) {
                Some(limit) if limit < range_end => limit,
                _ => range_end,
            },
            None => range_end,
        };
        OccurrenceWindow::new(self.start_date.clone(), range_start, range_end)
    }

    /// Occurrences of the schedule's rule in `[range_start, range_end)`,
    /// ignoring the enabled flag and run budget.
    #[must_use]
    pub fn occurrences(&self, range_start: DateTime<Z>, range_end: DateTime<Z>) -> Occurrences<Z> {
        self.rule.occurrences(&self.window(range_start, range_end))
    }
}

/// A stored job as the scheduler serializes it (camelCase JSON).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    pub job_id: Uuid,
    pub job_name: String,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    pub repeat_interval: String,
    /// Epoch milliseconds.
    pub start_date: i64,
    /// Epoch milliseconds, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<i64>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub max_run: u32,
    #[serde(default)]
    pub run_forever: bool,
    #[serde(default)]
    pub run_count: u32,
}

const fn default_enabled() -> bool {
    true
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl ScheduleRecord {
    /// ## Summary
    /// Parses the rule and resolves the zone, producing a typed schedule.
    ///
    /// ## Errors
    /// Returns an error if the rule does not parse, the zone is unknown, or a
    /// timestamp is outside the representable range.
    pub fn into_schedule(self) -> ScheduleResult<JobSchedule<Tz>> {
        let zone = resolve_zone(&self.timezone)?;
        self.into_schedule_in(zone)
    }

    /// Like [`ScheduleRecord::into_schedule`] with an already resolved zone.
    ///
    /// ## Errors
    /// Returns an error if the rule does not parse or a timestamp is outside
    /// the representable range.
    pub fn into_schedule_in(self, zone: Tz) -> ScheduleResult<JobSchedule<Tz>> {
        let rule: RecurrenceRule = parse(&self.repeat_interval)?;
        let start_date = from_millis(&zone, self.start_date)?;
        let end_date = self
            .end_date
            .map(|ms| from_millis(&zone, ms))
            .transpose()?;

        tracing::debug!(
            job_id = %self.job_id,
            rule = %rule,
            zone = %zone,
            "Bound schedule record"
        );

        Ok(JobSchedule {
            job_id: self.job_id,
            name: self.job_name,
            enabled: self.is_enabled,
            rule,
            start_date,
            end_date,
            run_limit: RunLimit::from_parts(self.max_run, self.run_forever),
            run_count: self.run_count,
        })
    }
}

fn from_millis(zone: &Tz, ms: i64) -> ScheduleResult<DateTime<Tz>> {
    zone.timestamp_millis_opt(ms)
        .single()
        .ok_or(ScheduleError::TimestampOutOfRange(ms))
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
