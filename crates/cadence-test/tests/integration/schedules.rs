//! Stored job records evaluated end to end.

use cadence_test::cadence::commands::evaluate;
use cadence_test::cadence::{ScheduleError, ScheduleRecord};
use chrono::{TimeDelta, Utc};

use super::helpers::{record, settings, utc};

#[test_log::test]
fn records_from_scheduler_json() {
    let json = r#"[
        {
            "jobId": "00000000-0000-0000-0000-000000000001",
            "jobName": "ledger-close",
            "isEnabled": true,
            "repeatInterval": "FREQ=MONTHLY;INTERVAL=1;BYMONTHDAY=31;BYHOUR=23;BYMINUTE=0;BYSECOND=0",
            "startDate": 1735689600000,
            "timezone": "Asia/Seoul",
            "maxRun": 0,
            "runForever": true,
            "runCount": 12
        },
        {
            "jobId": "00000000-0000-0000-0000-000000000002",
            "jobName": "limited",
            "repeatInterval": "FREQ=HOURLY;INTERVAL=1",
            "startDate": 1735689600000,
            "endDate": 1735700400000,
            "maxRun": 10,
            "runCount": 9
        }
    ]"#;

    let records: Vec<ScheduleRecord> = serde_json::from_str(json).expect("valid records");
    let mut schedules = records
        .into_iter()
        .map(ScheduleRecord::into_schedule)
        .collect::<Result<Vec<_>, ScheduleError>>()
        .expect("valid schedules")
        .into_iter();

    // 2025-01-31 23:00 in Seoul is 14:00 UTC; February has no 31st.
    let ledger = schedules.next().expect("first schedule");
    let runs: Vec<_> = ledger
        .upcoming(&utc(2025, 1, 1, 0, 0), 3)
        .into_iter()
        .map(|t| t.with_timezone(&Utc))
        .collect();
    assert_eq!(
        runs,
        vec![
            utc(2025, 1, 31, 14, 0),
            utc(2025, 3, 31, 14, 0),
            utc(2025, 5, 31, 14, 0),
        ]
    );

    // One run left, and the end date (03:00 UTC) is inclusive.
    let limited = schedules.next().expect("second schedule");
    assert_eq!(
        limited
            .upcoming(&utc(2025, 1, 1, 0, 0), 5)
            .into_iter()
            .map(|t| t.with_timezone(&Utc))
            .collect::<Vec<_>>(),
        vec![utc(2025, 1, 1, 1, 0)]
    );
    assert!(limited.is_due(&utc(2025, 1, 1, 3, 0), TimeDelta::zero()));
    assert!(!limited.is_due(&utc(2025, 1, 1, 4, 0), TimeDelta::hours(1)));
}

#[test]
fn tick_over_many_jobs() {
    let now = utc(2025, 3, 3, 9, 0).fixed_offset();

    let records: Vec<_> = (0..200)
        .map(|i| {
            let rule = match i % 4 {
                0 => "FREQ=MINUTELY;INTERVAL=5",
                1 => "FREQ=HOURLY;INTERVAL=3",
                2 => "FREQ=WEEKLY;BYDAY=MO;BYHOUR=9;BYMINUTE=0;BYSECOND=0",
                _ => "FREQ=MONTHLY;BYMONTHDAY=31",
            };
            record(&format!("job-{i}"), rule, "UTC")
        })
        .collect();

    let reports = evaluate(records, &now, &settings()).expect("valid settings");
    assert_eq!(reports.len(), 200);
    assert!(reports.iter().all(|r| r.error.is_none()));

    // 2025-03-03 is a Monday; only the monthly jobs are not due at 09:00.
    let due = reports.iter().filter(|r| r.due).count();
    assert_eq!(due, 150);

    let monthly = reports
        .iter()
        .find(|r| r.job_name == "job-3")
        .expect("monthly job");
    assert_eq!(monthly.next_run.as_deref(), Some("2025-03-31T00:00:00+00:00"));
}
