//! Calendar helpers for occurrence generation in a caller-supplied zone.

use chrono::{
    DateTime, Datelike, Days, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
    TimeZone, Timelike,
};

use crate::rrule::core::RecurrenceRule;

/// ## Summary
/// Resolves a wall-clock time in `zone` to an instant.
///
/// Ambiguous times (DST fold) resolve to the earlier instant. Times inside a
/// DST gap are shifted forward one hour; if that still does not exist the
/// occurrence is dropped.
pub(crate) fn resolve_local<Tz: TimeZone>(zone: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _latest) => Some(earliest),
        LocalResult::None => {
            let shifted = local.checked_add_signed(TimeDelta::hours(1))?;
            tracing::trace!(%local, %shifted, "Local time falls in a DST gap, shifting forward");
            zone.from_local_datetime(&shifted).earliest()
        }
    }
}

/// Time of day at which calendar-based rules fire.
///
/// Each component comes from BYHOUR/BYMINUTE/BYSECOND when set, otherwise
/// from the anchor's local time. Sub-second precision is kept only when the
/// second itself is inherited.
pub(crate) fn fire_time(rule: &RecurrenceRule, anchor: NaiveTime) -> NaiveTime {
    let hour = rule.by_hour().map_or(anchor.hour(), u32::from);
    let minute = rule.by_minute().map_or(anchor.minute(), u32::from);
    let (second, nano) = match rule.by_second() {
        Some(second) => (u32::from(second), 0),
        None => (anchor.second(), anchor.nanosecond()),
    };

    NaiveTime::from_hms_nano_opt(hour, minute, second, nano)
        .or_else(|| NaiveTime::from_hms_opt(hour, minute, second))
        .unwrap_or(anchor)
}

/// Months since year 0, used as a linear month counter.
pub(crate) fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// The date with the given month counter and day of month, if it exists.
pub(crate) fn date_in_month(index: i64, day: u32) -> Option<NaiveDate> {
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `date` moved forward by `days`, if representable.
pub(crate) fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

/// Monday of the week containing `date`.
pub(crate) fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    let offset = date.weekday().num_days_from_monday();
    date.checked_sub_days(Days::new(u64::from(offset)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rrule::parse::parse;
    use chrono::Utc;
    use chrono_tz::America::New_York;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn time(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).expect("valid time")
    }

    #[test]
    fn resolve_local_in_utc_is_identity() {
        let local = date(2026, 3, 8).and_time(time(2, 30, 0));
        let resolved = resolve_local(&Utc, local).expect("exists in UTC");
        assert_eq!(resolved.naive_utc(), local);
    }

    #[test]
    fn resolve_local_shifts_out_of_dst_gap() {
        // 2026-03-08 02:30 does not exist in New York.
        let local = date(2026, 3, 8).and_time(time(2, 30, 0));
        let resolved = resolve_local(&New_York, local).expect("shifted");
        assert_eq!(resolved.naive_local(), date(2026, 3, 8).and_time(time(3, 30, 0)));
    }

    #[test]
    fn resolve_local_picks_earlier_instant_in_fold() {
        // 2026-11-01 01:30 happens twice in New York; the first is EDT (UTC-4).
        let local = date(2026, 11, 1).and_time(time(1, 30, 0));
        let resolved = resolve_local(&New_York, local).expect("ambiguous");
        assert_eq!(resolved.naive_utc(), date(2026, 11, 1).and_time(time(5, 30, 0)));
    }

    #[test]
    fn fire_time_mixes_rule_and_anchor() {
        let rule = parse("FREQ=DAILY;BYHOUR=9").expect("valid rule");
        let anchor = NaiveTime::from_hms_milli_opt(17, 45, 12, 250).expect("valid time");

        let fire = fire_time(&rule, anchor);
        assert_eq!(fire, NaiveTime::from_hms_milli_opt(9, 45, 12, 250).expect("valid time"));

        let rule = parse("FREQ=DAILY;BYHOUR=9;BYMINUTE=0;BYSECOND=0").expect("valid rule");
        assert_eq!(fire_time(&rule, anchor), time(9, 0, 0));
    }

    #[test]
    fn month_counter_round_trips() {
        let index = month_index(date(2025, 12, 15));
        assert_eq!(date_in_month(index, 15), Some(date(2025, 12, 15)));
        assert_eq!(date_in_month(index + 1, 31), Some(date(2026, 1, 31)));
        assert_eq!(date_in_month(index + 2, 29), None);
    }

    #[test]
    fn week_start_is_monday() {
        // 2026-01-08 is a Thursday.
        assert_eq!(week_start(date(2026, 1, 8)), Some(date(2026, 1, 5)));
        assert_eq!(week_start(date(2026, 1, 5)), Some(date(2026, 1, 5)));
        assert_eq!(week_start(date(2026, 1, 11)), Some(date(2026, 1, 5)));
    }

    #[test]
    fn add_days_handles_negative_offsets() {
        assert_eq!(add_days(date(2026, 1, 5), -5), Some(date(2025, 12, 31)));
        assert_eq!(add_days(date(2026, 1, 5), 0), Some(date(2026, 1, 5)));
    }
}
