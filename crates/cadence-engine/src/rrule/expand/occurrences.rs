//! Occurrence generation for recurrence rules.
//!
//! MINUTELY and HOURLY rules step through elapsed time from the anchor.
//! DAILY, WEEKLY and MONTHLY rules step through the calendar of the anchor's
//! zone, one period (day run, week or month) at a time. Both cursors jump
//! straight to the period containing the window start, so the cost of a call
//! depends on the window, not on how far the anchor lies in the past.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, TimeZone};

use super::calendar::{add_days, date_in_month, fire_time, month_index, resolve_local, week_start};
use crate::rrule::core::{Frequency, OccurrenceWindow, RecurrenceRule, WeekdaySet};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;

/// ## Summary
/// Returns the occurrences of `rule` inside `window`, in ascending order.
///
/// The sequence is lazy, finite and deterministic: every call with the same
/// arguments yields the same instants. Nothing precedes the anchor. An empty
/// range, or one that ends before the anchor, yields nothing.
#[must_use]
pub fn occurrences<Tz: TimeZone>(
    rule: &RecurrenceRule,
    window: &OccurrenceWindow<Tz>,
) -> Occurrences<Tz> {
    Occurrences::new(rule, window)
}

impl RecurrenceRule {
    /// Shorthand for [`occurrences`].
    #[must_use]
    pub fn occurrences<Tz: TimeZone>(&self, window: &OccurrenceWindow<Tz>) -> Occurrences<Tz> {
        occurrences(self, window)
    }
}

/// Iterator over the fire times of a rule within a window.
#[derive(Clone)]
pub struct Occurrences<Tz: TimeZone> {
    zone: Tz,
    anchor: DateTime<Tz>,
    lower: DateTime<Tz>,
    end: DateTime<Tz>,
    cursor: Cursor,
    pending: VecDeque<DateTime<Tz>>,
}

#[derive(Debug, Clone, Copy)]
enum Cursor {
    /// Step `next` of a fixed elapsed-time progression from the anchor.
    Elapsed { step_ms: i64, next: i64 },
    /// Calendar periods `next..=last`, all firing at `time`.
    Calendar {
        layout: Layout,
        time: NaiveTime,
        next: i64,
        last: i64,
    },
    Exhausted,
}

/// Which dates belong to calendar period `n`.
#[derive(Debug, Clone, Copy)]
enum Layout {
    /// The single date `base + n * stride` days.
    Days { base: NaiveDate, stride: i64 },
    /// The selected weekdays of the week starting `base + n * stride` days.
    Weekdays {
        base: NaiveDate,
        stride: i64,
        days: WeekdaySet,
    },
    /// Day `day` of month counter `base + n * stride`, if that month has it.
    Months { base: i64, stride: i64, day: u32 },
}

impl Layout {
    fn for_rule(rule: &RecurrenceRule, anchor: NaiveDate) -> Option<Self> {
        let interval = i64::from(rule.interval());
        Some(match rule.frequency() {
            Frequency::Weekly if !rule.by_day().is_empty() => Self::Weekdays {
                base: week_start(anchor)?,
                stride: 7 * interval,
                days: rule.by_day(),
            },
            Frequency::Weekly => Self::Days {
                base: anchor,
                stride: 7 * interval,
            },
            Frequency::Monthly => Self::Months {
                base: month_index(anchor),
                stride: interval,
                day: rule
                    .by_month_day()
                    .map_or_else(|| anchor.day(), u32::from),
            },
            Frequency::Daily | Frequency::Minutely | Frequency::Hourly => Self::Days {
                base: anchor,
                stride: interval,
            },
        })
    }

    /// The period containing `date` (may be negative).
    fn period_of(self, date: NaiveDate) -> i64 {
        match self {
            Self::Days { base, stride } | Self::Weekdays { base, stride, .. } => {
                date.signed_duration_since(base).num_days().div_euclid(stride)
            }
            Self::Months { base, stride, .. } => (month_index(date) - base).div_euclid(stride),
        }
    }

    /// Dates of period `n`, ascending.
    fn dates(self, n: i64) -> Vec<NaiveDate> {
        match self {
            Self::Days { base, stride } => n
                .checked_mul(stride)
                .and_then(|offset| add_days(base, offset))
                .into_iter()
                .collect(),
            Self::Weekdays { base, stride, days } => n
                .checked_mul(stride)
                .and_then(|offset| add_days(base, offset))
                .map(|start| {
                    days.iter()
                        .filter_map(|day| add_days(start, i64::from(day.days_from_monday())))
                        .collect()
                })
                .unwrap_or_default(),
            Self::Months { base, stride, day } => {
                let Some(index) = n.checked_mul(stride).and_then(|o| o.checked_add(base)) else {
                    return Vec::new();
                };
                match date_in_month(index, day) {
                    Some(date) => vec![date],
                    None => {
                        tracing::trace!(month_index = index, day, "Month has no such day, skipping");
                        Vec::new()
                    }
                }
            }
        }
    }
}

impl<Tz: TimeZone> Occurrences<Tz> {
    fn new(rule: &RecurrenceRule, window: &OccurrenceWindow<Tz>) -> Self {
        let zone = window.anchor.timezone();
        let anchor = window.anchor.clone();
        let start = window.range_start.with_timezone(&zone);
        let lower = if start > anchor { start } else { anchor.clone() };
        let end = window.range_end.with_timezone(&zone);

        let cursor = if lower >= end {
            Cursor::Exhausted
        } else {
            match rule.frequency() {
                Frequency::Minutely => Self::elapsed_cursor(rule, &anchor, &lower, MINUTE_MS),
                Frequency::Hourly => Self::elapsed_cursor(rule, &anchor, &lower, HOUR_MS),
                Frequency::Daily | Frequency::Weekly | Frequency::Monthly => {
                    Self::calendar_cursor(rule, &anchor, &lower, &end)
                }
            }
        };

        tracing::trace!(%rule, ?cursor, "Expanding recurrence rule");

        Self {
            zone,
            anchor,
            lower,
            end,
            cursor,
            pending: VecDeque::new(),
        }
    }

    /// First step index at or after `lower`, computed in closed form.
    fn elapsed_cursor(
        rule: &RecurrenceRule,
        anchor: &DateTime<Tz>,
        lower: &DateTime<Tz>,
        unit_ms: i64,
    ) -> Cursor {
        let step_ms = i64::from(rule.interval()) * unit_ms;
        let elapsed = lower.clone().signed_duration_since(anchor).num_milliseconds();
        let next = elapsed.div_euclid(step_ms) + i64::from(elapsed.rem_euclid(step_ms) != 0);
        Cursor::Elapsed { step_ms, next }
    }

    fn calendar_cursor(
        rule: &RecurrenceRule,
        anchor: &DateTime<Tz>,
        lower: &DateTime<Tz>,
        end: &DateTime<Tz>,
    ) -> Cursor {
        let anchor_local = anchor.naive_local();
        let Some(layout) = Layout::for_rule(rule, anchor_local.date()) else {
            return Cursor::Exhausted;
        };

        // One period of slack on each side absorbs fire times that land on
        // the other side of a window bound than their date suggests.
        let first = (layout.period_of(lower.naive_local().date()) - 1).max(0);
        let last = layout.period_of(end.naive_local().date()).saturating_add(1);

        Cursor::Calendar {
            layout,
            time: fire_time(rule, anchor_local.time()),
            next: first,
            last,
        }
    }

    /// Queues the candidates of the next step or period.
    ///
    /// Returns `false` once the cursor is exhausted.
    fn refill(&mut self) -> bool {
        match self.cursor {
            Cursor::Exhausted => false,
            Cursor::Elapsed { step_ms, next } => {
                self.cursor = Cursor::Elapsed {
                    step_ms,
                    next: next.saturating_add(1),
                };
                let candidate = step_ms
                    .checked_mul(next)
                    .and_then(TimeDelta::try_milliseconds)
                    .and_then(|offset| self.anchor.clone().checked_add_signed(offset));
                match candidate {
                    // A step can fall short of `lower` by less than a millisecond.
                    Some(t) if t < self.lower => {}
                    Some(t) => self.pending.push_back(t),
                    None => self.cursor = Cursor::Exhausted,
                }
                true
            }
            Cursor::Calendar {
                layout,
                time,
                next,
                last,
            } => {
                if next > last {
                    self.cursor = Cursor::Exhausted;
                    return false;
                }
                self.cursor = Cursor::Calendar {
                    layout,
                    time,
                    next: next + 1,
                    last,
                };
                for date in layout.dates(next) {
                    match resolve_local(&self.zone, date.and_time(time)) {
                        Some(t) if t >= self.lower => self.pending.push_back(t),
                        _ => {}
                    }
                }
                true
            }
        }
    }
}

impl<Tz: TimeZone> Iterator for Occurrences<Tz> {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(t) = self.pending.pop_front() {
                if t < self.end {
                    return Some(t);
                }
                self.pending.clear();
                self.cursor = Cursor::Exhausted;
                return None;
            }
            if !self.refill() {
                return None;
            }
        }
    }
}

impl<Tz: TimeZone> FusedIterator for Occurrences<Tz> {}

#[cfg(test)]
#[path = "occurrences_tests.rs"]
mod tests;
