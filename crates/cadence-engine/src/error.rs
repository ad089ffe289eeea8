use thiserror::Error;

use crate::rrule::ParseError;
use crate::rrule::expand::ZoneError;

/// Errors binding a stored job to a schedule
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(#[from] ParseError),

    #[error(transparent)]
    Zone(#[from] ZoneError),

    #[error("Timestamp out of range: {0} ms")]
    TimestampOutOfRange(i64),
}

pub type ScheduleResult<T> = std::result::Result<T, ScheduleError>;
