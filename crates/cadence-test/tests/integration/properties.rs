//! Properties every rule and window must satisfy.

use cadence_test::cadence::Preset;
use cadence_test::cadence::rrule::{OccurrenceWindow, is_due, occurrences, parse};
use chrono::{Datelike, Months, TimeDelta, Utc, Weekday as ChronoWeekday};
use chrono_tz::America::New_York;
use chrono_tz::Australia::Lord_Howe;

use super::helpers::{SAMPLE_RULES, rule, utc};

fn sample_windows() -> Vec<OccurrenceWindow<Utc>> {
    let anchor = utc(2024, 1, 31, 13, 17);
    vec![
        OccurrenceWindow::new(anchor, anchor, utc(2024, 6, 1, 0, 0)),
        OccurrenceWindow::new(anchor, utc(2023, 1, 1, 0, 0), utc(2024, 3, 1, 0, 0)),
        OccurrenceWindow::new(anchor, utc(2030, 2, 27, 5, 0), utc(2030, 3, 5, 0, 0)),
        OccurrenceWindow::new(anchor, utc(2024, 2, 29, 0, 0), utc(2024, 2, 29, 0, 1)),
    ]
}

#[test]
fn presets_round_trip() {
    for preset in Preset::all() {
        let parsed = parse(preset.as_str()).expect(preset.as_str());
        let again = parse(&parsed.to_string()).expect("canonical form parses");
        assert_eq!(parsed, again);
        assert_eq!(again.to_string(), preset.as_str());
    }
}

#[test_log::test]
fn monotonic_and_contained() {
    for input in SAMPLE_RULES {
        let rule = rule(input);
        for window in sample_windows() {
            let got: Vec<_> = occurrences(&rule, &window).collect();
            assert!(got.windows(2).all(|p| p[0] < p[1]), "{input}");
            assert!(got.iter().all(|t| window.contains(t)), "{input}");
            assert!(got.iter().all(|t| *t >= window.anchor), "{input}");
        }
    }
}

#[test]
fn plain_rules_are_evenly_spaced() {
    let anchor = utc(2024, 1, 31, 13, 17);
    let end = utc(2026, 1, 1, 0, 0);
    let window = OccurrenceWindow::new(anchor, anchor, end);

    for (input, step) in [
        ("FREQ=MINUTELY;INTERVAL=45", TimeDelta::minutes(45)),
        ("FREQ=HOURLY;INTERVAL=7", TimeDelta::hours(7)),
        ("FREQ=DAILY;INTERVAL=3", TimeDelta::days(3)),
        ("FREQ=WEEKLY;INTERVAL=2", TimeDelta::weeks(2)),
    ] {
        let got: Vec<_> = occurrences(&rule(input), &window).collect();
        assert_eq!(got.first(), Some(&anchor), "{input}");
        assert!(got.windows(2).all(|p| p[1] - p[0] == step), "{input}");
    }

    // Months vary in length; spacing is one calendar month per step.
    let monthly = rule("FREQ=MONTHLY;INTERVAL=2");
    let anchor = utc(2024, 1, 15, 6, 0);
    let window = OccurrenceWindow::new(anchor, anchor, end);
    let got: Vec<_> = occurrences(&monthly, &window).collect();
    for pair in got.windows(2) {
        assert_eq!(pair[0].checked_add_months(Months::new(2)), Some(pair[1]));
    }
}

#[test]
fn month_end_skip() {
    let window = OccurrenceWindow::new(
        utc(2025, 1, 1, 0, 0),
        utc(2025, 1, 1, 0, 0),
        utc(2025, 4, 1, 0, 0),
    );
    let got: Vec<_> =
        occurrences(&rule("FREQ=MONTHLY;INTERVAL=1;BYMONTHDAY=31"), &window).collect();

    let months: Vec<_> = got.iter().map(Datelike::month).collect();
    assert_eq!(months, vec![1, 3]);
}

#[test]
fn weekly_multi_day() {
    // 2025-03-03 is a Monday.
    let anchor = utc(2025, 3, 3, 0, 0);
    let window = OccurrenceWindow::new(anchor, anchor, anchor + TimeDelta::weeks(1));
    let got: Vec<_> =
        occurrences(&rule("FREQ=WEEKLY;INTERVAL=1;BYDAY=MO,WE,FR"), &window).collect();

    let days: Vec<_> = got.iter().map(Datelike::weekday).collect();
    assert_eq!(
        days,
        vec![ChronoWeekday::Mon, ChronoWeekday::Wed, ChronoWeekday::Fri]
    );
}

#[test]
fn empty_window() {
    let at = utc(2025, 1, 1, 0, 0);
    for input in SAMPLE_RULES {
        let window = OccurrenceWindow::new(at, at, at);
        assert_eq!(occurrences(&rule(input), &window).count(), 0, "{input}");
    }
}

#[test]
fn due_now() {
    let every_five = rule("FREQ=MINUTELY;INTERVAL=5");
    let anchor = utc(2025, 1, 1, 0, 0);
    assert!(is_due(&every_five, &anchor, &utc(2025, 1, 1, 0, 10), TimeDelta::zero()));
    assert!(!is_due(&every_five, &anchor, &utc(2025, 1, 1, 0, 11), TimeDelta::zero()));
}

#[test]
fn repeated_calls_agree() {
    for input in SAMPLE_RULES {
        let rule = rule(input);
        for window in sample_windows() {
            let first: Vec<_> = rule.occurrences(&window).collect();
            let second: Vec<_> = rule.occurrences(&window).collect();
            assert_eq!(first, second, "{input}");
        }
    }
}

#[test]
fn zones_with_dst_stay_monotonic() {
    // New York shifts by an hour, Lord Howe by half an hour.
    let ny_anchor = utc(2026, 1, 1, 6, 30).with_timezone(&New_York);
    let ny = OccurrenceWindow::new(
        ny_anchor,
        utc(2026, 3, 1, 0, 0).with_timezone(&New_York),
        utc(2026, 11, 15, 0, 0).with_timezone(&New_York),
    );
    let lh_anchor = utc(2026, 1, 1, 0, 0).with_timezone(&Lord_Howe);
    let lh = OccurrenceWindow::new(
        lh_anchor,
        utc(2026, 3, 25, 0, 0).with_timezone(&Lord_Howe),
        utc(2026, 10, 15, 0, 0).with_timezone(&Lord_Howe),
    );

    for input in [
        "FREQ=HOURLY;INTERVAL=1",
        "FREQ=DAILY;BYHOUR=2;BYMINUTE=15",
        "FREQ=DAILY;BYHOUR=1;BYMINUTE=45",
        "FREQ=WEEKLY;BYDAY=SU;BYHOUR=2",
    ] {
        let rule = rule(input);
        for got in [
            occurrences(&rule, &ny).map(|t| t.with_timezone(&Utc)).collect::<Vec<_>>(),
            occurrences(&rule, &lh).map(|t| t.with_timezone(&Utc)).collect::<Vec<_>>(),
        ] {
            assert!(!got.is_empty(), "{input}");
            assert!(got.windows(2).all(|p| p[0] < p[1]), "{input}");
        }
    }
}
