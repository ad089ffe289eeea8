//! Rules and schedules shared across threads without synchronization.

use std::thread;

use cadence_test::cadence::JobSchedule;
use cadence_test::cadence::rrule::{OccurrenceWindow, next_occurrence};
use chrono::TimeDelta;
use chrono_tz::Europe::Berlin;
use rayon::prelude::*;
use uuid::Uuid;

use super::helpers::{SAMPLE_RULES, rule, utc};

#[test]
fn scoped_threads_see_identical_sequences() {
    let rules: Vec<_> = SAMPLE_RULES.iter().map(|input| rule(input)).collect();
    let anchor = utc(2025, 1, 1, 0, 0).with_timezone(&Berlin);
    let window = OccurrenceWindow::new(
        anchor,
        utc(2025, 2, 1, 0, 0).with_timezone(&Berlin),
        utc(2025, 5, 1, 0, 0).with_timezone(&Berlin),
    );

    let expected: Vec<Vec<_>> = rules.iter().map(|r| r.occurrences(&window).collect()).collect();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    rules
                        .iter()
                        .map(|r| r.occurrences(&window).collect::<Vec<_>>())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().expect("thread completes"), expected);
        }
    });
}

#[test]
fn parallel_next_run_matches_sequential() {
    let schedule = JobSchedule::new(
        Uuid::nil(),
        "shared",
        rule("FREQ=WEEKLY;INTERVAL=1;BYHOUR=9;BYMINUTE=0;BYDAY=MO,WE,FR"),
        utc(2025, 1, 6, 0, 0).with_timezone(&Berlin),
    );

    let instants: Vec<_> = (0..500)
        .map(|i| utc(2025, 1, 6, 0, 0) + TimeDelta::hours(i * 7))
        .collect();

    let sequential: Vec<_> = instants.iter().map(|t| schedule.next_run(t)).collect();
    let parallel: Vec<_> = instants.par_iter().map(|t| schedule.next_run(t)).collect();
    assert_eq!(sequential, parallel);

    for (after, next) in instants.iter().zip(&sequential) {
        let next = next.as_ref().expect("weekly rule always has a next run");
        assert!(*next > *after);
        assert_eq!(
            Some(*next),
            next_occurrence(&schedule.rule, &schedule.start_date, after)
        );
    }
}
