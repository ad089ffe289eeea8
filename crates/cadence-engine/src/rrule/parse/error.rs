//! Recurrence rule parsing error types.

use std::fmt;

/// Result type for recurrence rule parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Error type for recurrence rule parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Kind of error.
    pub kind: ParseErrorKind,
    /// Byte offset of the offending rule part in the input (0-based).
    pub position: usize,
    /// Additional context about the error.
    pub context: Option<String>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self {
            kind,
            position,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.kind, self.position)?;
        if let Some(ref ctx) = self.context {
            write!(f, ": {ctx}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Kinds of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// FREQ is absent or not one of the supported frequencies.
    MissingFrequency,
    /// INTERVAL is not a positive integer.
    InvalidInterval,
    /// BYHOUR, BYMINUTE or BYSECOND is out of range or used with MINUTELY/HOURLY.
    InvalidFieldRange,
    /// BYDAY contains something other than the seven weekday tokens.
    InvalidWeekday,
    /// BYMONTHDAY is not an integer in 1..=31.
    InvalidDayOfMonth,
    /// BYDAY or BYMONTHDAY used with a frequency that does not support it.
    FieldNotApplicableForFrequency,
    /// A rule part is not of the form `KEY=VALUE`.
    MalformedPart,
    /// A rule part appears more than once.
    DuplicatePart,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFrequency => write!(f, "missing or unsupported frequency"),
            Self::InvalidInterval => write!(f, "invalid interval"),
            Self::InvalidFieldRange => write!(f, "time field out of range"),
            Self::InvalidWeekday => write!(f, "invalid weekday"),
            Self::InvalidDayOfMonth => write!(f, "invalid day of month"),
            Self::FieldNotApplicableForFrequency => {
                write!(f, "rule part not applicable for frequency")
            }
            Self::MalformedPart => write!(f, "malformed rule part"),
            Self::DuplicatePart => write!(f, "duplicate rule part"),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
