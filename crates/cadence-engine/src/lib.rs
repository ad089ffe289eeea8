//! Recurrence engine for batch job schedules.
//!
//! Parses the RRULE subset produced by the scheduler console, generates fire
//! times within bounded windows, and answers due-now and next-run queries for
//! stored jobs.

pub mod error;
pub mod preset;
pub mod rrule;
pub mod schedule;

pub use error::{ScheduleError, ScheduleResult};
pub use preset::Preset;
pub use schedule::{JobSchedule, RunLimit, ScheduleRecord};
