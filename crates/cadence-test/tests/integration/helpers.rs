//! Shared helpers for integration tests.

use cadence_test::cadence::config::Settings;
use cadence_test::cadence::rrule::{RecurrenceRule, parse};
use cadence_test::cadence::ScheduleRecord;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

pub fn utc(y: i32, m: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, mi, 0)
        .single()
        .expect("valid UTC time")
}

pub fn rule(input: &str) -> RecurrenceRule {
    parse(input).expect(input)
}

/// Default settings, as loaded with no file and no environment.
pub fn settings() -> Settings {
    Settings::defaults()
        .expect("defaults")
        .build()
        .expect("build")
        .try_deserialize()
        .expect("deserialize")
}

/// A record starting at 2025-01-01T00:00:00Z.
pub fn record(name: &str, rule: &str, timezone: &str) -> ScheduleRecord {
    ScheduleRecord {
        job_id: Uuid::new_v4(),
        job_name: name.to_string(),
        is_enabled: true,
        repeat_interval: rule.to_string(),
        start_date: 1_735_689_600_000,
        end_date: None,
        timezone: timezone.to_string(),
        max_run: 0,
        run_forever: false,
        run_count: 0,
    }
}

/// Rules that exercise every frequency and BY part.
pub const SAMPLE_RULES: &[&str] = &[
    "FREQ=MINUTELY;INTERVAL=1",
    "FREQ=MINUTELY;INTERVAL=45",
    "FREQ=HOURLY;INTERVAL=7",
    "FREQ=DAILY;INTERVAL=1",
    "FREQ=DAILY;INTERVAL=3;BYHOUR=2;BYMINUTE=30;BYSECOND=0",
    "FREQ=WEEKLY;INTERVAL=1;BYHOUR=9;BYMINUTE=0;BYDAY=MO,WE,FR",
    "FREQ=WEEKLY;INTERVAL=2",
    "FREQ=MONTHLY;INTERVAL=1;BYMONTHDAY=31",
    "FREQ=MONTHLY;INTERVAL=5;BYHOUR=23",
];
