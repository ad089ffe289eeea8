//! Due-now and next-run queries built on [`occurrences`].

use chrono::{DateTime, TimeDelta, TimeZone};

use super::occurrences::occurrences;
use crate::rrule::core::{OccurrenceWindow, RecurrenceRule};

/// How far ahead `next_occurrence` searches before giving up (about 10 years).
pub const DEFAULT_SEARCH_HORIZON_DAYS: i64 = 3_660;

/// The default search horizon as a duration.
#[must_use]
pub fn default_search_horizon() -> TimeDelta {
    TimeDelta::days(DEFAULT_SEARCH_HORIZON_DAYS)
}

/// ## Summary
/// Returns `true` if `rule`, anchored at `anchor`, has an occurrence in
/// `[now - tolerance, now]`.
///
/// A negative tolerance is treated as zero.
#[must_use]
pub fn is_due<Tz: TimeZone, Tz2: TimeZone>(
    rule: &RecurrenceRule,
    anchor: &DateTime<Tz>,
    now: &DateTime<Tz2>,
    tolerance: TimeDelta,
) -> bool {
    let zone = anchor.timezone();
    let now = now.with_timezone(&zone);
    let tolerance = tolerance.max(TimeDelta::zero());

    // Nothing fires before the anchor, so it bounds tolerances that reach
    // past the representable range.
    let start = now
        .clone()
        .checked_sub_signed(tolerance)
        .unwrap_or_else(|| anchor.clone());
    let Some(end) = now.checked_add_signed(TimeDelta::nanoseconds(1)) else {
        return false;
    };

    let window = OccurrenceWindow::new(anchor.clone(), start, end);
    occurrences(rule, &window).next().is_some()
}

/// ## Summary
/// Returns the earliest occurrence strictly after `after`, searching up to
/// [`DEFAULT_SEARCH_HORIZON_DAYS`] ahead.
#[must_use]
pub fn next_occurrence<Tz: TimeZone, Tz2: TimeZone>(
    rule: &RecurrenceRule,
    anchor: &DateTime<Tz>,
    after: &DateTime<Tz2>,
) -> Option<DateTime<Tz>> {
    next_occurrence_within(rule, anchor, after, default_search_horizon())
}

/// ## Summary
/// Returns the earliest occurrence strictly after `after` and no later than
/// `horizon` past the search start.
///
/// The search starts with a window of one rule step and doubles it until an
/// occurrence turns up or the horizon is reached. Each window starts where
/// the previous one ended, so no instant is scanned twice.
#[must_use]
pub fn next_occurrence_within<Tz: TimeZone, Tz2: TimeZone>(
    rule: &RecurrenceRule,
    anchor: &DateTime<Tz>,
    after: &DateTime<Tz2>,
    horizon: TimeDelta,
) -> Option<DateTime<Tz>> {
    let (mut start, cap) = search_bounds(anchor, after, horizon)?;
    let mut span = rule.nominal_step().unwrap_or(horizon).min(horizon);

    while start < cap {
        let end = start
            .clone()
            .checked_add_signed(span)
            .map_or_else(|| cap.clone(), |end| end.min(cap.clone()));

        tracing::trace!(%rule, span_ms = span.num_milliseconds(), "Searching for next occurrence");

        let window = OccurrenceWindow::new(anchor.clone(), start, end.clone());
        if let Some(found) = occurrences(rule, &window).next() {
            return Some(found);
        }

        start = end;
        span = span.checked_mul(2).unwrap_or(horizon);
    }

    tracing::debug!(%rule, horizon_days = horizon.num_days(), "No occurrence within horizon");
    None
}

/// ## Summary
/// Returns up to `count` occurrences strictly after `after`, searching up to
/// [`DEFAULT_SEARCH_HORIZON_DAYS`] ahead.
#[must_use]
pub fn next_occurrences<Tz: TimeZone, Tz2: TimeZone>(
    rule: &RecurrenceRule,
    anchor: &DateTime<Tz>,
    after: &DateTime<Tz2>,
    count: usize,
) -> Vec<DateTime<Tz>> {
    next_occurrences_within(rule, anchor, after, count, default_search_horizon())
}

/// ## Summary
/// Returns up to `count` occurrences strictly after `after` and no later
/// than `horizon` past the search start.
#[must_use]
pub fn next_occurrences_within<Tz: TimeZone, Tz2: TimeZone>(
    rule: &RecurrenceRule,
    anchor: &DateTime<Tz>,
    after: &DateTime<Tz2>,
    count: usize,
    horizon: TimeDelta,
) -> Vec<DateTime<Tz>> {
    if count == 0 {
        return Vec::new();
    }
    let Some(first) = next_occurrence_within(rule, anchor, after, horizon) else {
        return Vec::new();
    };
    let Some((_, cap)) = search_bounds(anchor, after, horizon) else {
        return Vec::new();
    };

    // The first hit is known; the rest come from one window up to the cap.
    let window = OccurrenceWindow::new(anchor.clone(), first, cap);
    occurrences(rule, &window).take(count).collect()
}

/// Search start (`max(after + 1ns, anchor)`) and the exclusive cap
/// `start + horizon`, in the anchor's zone.
fn search_bounds<Tz: TimeZone, Tz2: TimeZone>(
    anchor: &DateTime<Tz>,
    after: &DateTime<Tz2>,
    horizon: TimeDelta,
) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
    if horizon <= TimeDelta::zero() {
        return None;
    }
    let after = after
        .with_timezone(&anchor.timezone())
        .checked_add_signed(TimeDelta::nanoseconds(1))?;
    let start = if after > *anchor { after } else { anchor.clone() };
    let cap = start.clone().checked_add_signed(horizon)?;
    Some((start, cap))
}

impl RecurrenceRule {
    /// Shorthand for [`is_due`].
    #[must_use]
    pub fn is_due<Tz: TimeZone, Tz2: TimeZone>(
        &self,
        anchor: &DateTime<Tz>,
        now: &DateTime<Tz2>,
        tolerance: TimeDelta,
    ) -> bool {
        is_due(self, anchor, now, tolerance)
    }

    /// Shorthand for [`next_occurrence`].
    #[must_use]
    pub fn next_occurrence<Tz: TimeZone, Tz2: TimeZone>(
        &self,
        anchor: &DateTime<Tz>,
        after: &DateTime<Tz2>,
    ) -> Option<DateTime<Tz>> {
        next_occurrence(self, anchor, after)
    }

    /// Shorthand for [`next_occurrences`].
    #[must_use]
    pub fn next_occurrences<Tz: TimeZone, Tz2: TimeZone>(
        &self,
        anchor: &DateTime<Tz>,
        after: &DateTime<Tz2>,
        count: usize,
    ) -> Vec<DateTime<Tz>> {
        next_occurrences(self, anchor, after, count)
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
