//! Parser for the RRULE subset emitted by the admin console's rule builder.
//!
//! Grammar: `;`-separated `KEY=VALUE` parts, keys and enumerated values
//! case-insensitive, part order insignificant. FREQ is resolved before any
//! other part is looked at. Unknown keys are skipped.

use std::str::FromStr;

use super::builder::{RuleBuilder, check_applicable, time_field_max};
use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rrule::core::{Frequency, RecurrenceRule, RulePart, Weekday};

const RRULE_PREFIX: &str = "RRULE:";

/// A recognized `KEY=VALUE` part with its byte offset in the input.
#[derive(Debug, Clone, Copy)]
struct Part<'a> {
    name: RulePart,
    value: &'a str,
    position: usize,
}

/// ## Summary
/// Parses and validates a recurrence rule string.
///
/// Accepts exactly what the rule builder and preset chips emit, e.g.
/// `FREQ=WEEKLY;INTERVAL=1;BYHOUR=9;BYMINUTE=0;BYDAY=MO,WE,FR`, with an
/// optional leading `RRULE:`.
///
/// ## Errors
/// Returns a [`ParseError`] whose kind identifies the first violated rule and
/// whose position is the byte offset of the offending part.
pub fn parse(input: &str) -> ParseResult<RecurrenceRule> {
    let parts = split_parts(input)?;

    let freq_part = parts
        .iter()
        .find(|p| p.name == RulePart::Freq)
        .ok_or_else(|| {
            ParseError::new(ParseErrorKind::MissingFrequency, 0).with_context("FREQ is required")
        })?;
    let frequency = Frequency::parse(freq_part.value).ok_or_else(|| {
        ParseError::new(ParseErrorKind::MissingFrequency, freq_part.position)
            .with_context(freq_part.value.to_string())
    })?;

    let mut builder = RuleBuilder::new(frequency);
    for part in parts.iter().filter(|p| p.name != RulePart::Freq) {
        builder = apply_part(builder, frequency, part)?;
    }

    let rule = builder.build()?;
    tracing::trace!(input, %rule, "Parsed recurrence rule");
    Ok(rule)
}

/// Returns `true` if `input` is a valid recurrence rule.
#[must_use]
pub fn is_valid(input: &str) -> bool {
    parse(input).is_ok()
}

impl FromStr for RecurrenceRule {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Splits the input into recognized parts, tracking byte offsets.
fn split_parts(input: &str) -> ParseResult<Vec<Part<'_>>> {
    let trimmed = input.trim_start();
    let mut offset = input.len() - trimmed.len();
    let body = match trimmed.get(..RRULE_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(RRULE_PREFIX) => {
            offset += RRULE_PREFIX.len();
            &trimmed[RRULE_PREFIX.len()..]
        }
        _ => trimmed,
    };

    let mut parts = Vec::new();
    let mut seen = 0u8;

    for raw in body.split(';') {
        let piece = raw.trim_start();
        let position = offset + (raw.len() - piece.len());
        offset += raw.len() + 1;

        let piece = piece.trim_end();
        if piece.is_empty() {
            continue;
        }

        let (key, value) = piece
            .split_once('=')
            .map(|(key, value)| (key.trim_end(), value))
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| {
                ParseError::new(ParseErrorKind::MalformedPart, position)
                    .with_context(piece.to_string())
            })?;

        let Some(name) = RulePart::parse(key) else {
            tracing::trace!(key, "Skipping unknown rule part");
            continue;
        };

        if seen & name.bit() != 0 {
            return Err(ParseError::new(ParseErrorKind::DuplicatePart, position)
                .with_context(name.as_str()));
        }
        seen |= name.bit();

        parts.push(Part {
            name,
            value: value.trim(),
            position,
        });
    }

    Ok(parts)
}

/// Validates one non-FREQ part against the frequency and records it.
fn apply_part(builder: RuleBuilder, frequency: Frequency, part: &Part<'_>) -> ParseResult<RuleBuilder> {
    let error = |kind: ParseErrorKind| {
        ParseError::new(kind, part.position).with_context(format!("{}={}", part.name, part.value))
    };

    check_applicable(frequency, part.name).map_err(error)?;

    Ok(match part.name {
        RulePart::Interval => {
            let interval = parse_unsigned(part.value)
                .filter(|n| *n > 0)
                .ok_or_else(|| error(ParseErrorKind::InvalidInterval))?;
            builder.interval(interval)
        }
        RulePart::ByHour | RulePart::ByMinute | RulePart::BySecond => {
            let value = parse_unsigned(part.value)
                .and_then(|n| u8::try_from(n).ok())
                .filter(|n| *n <= time_field_max(part.name))
                .ok_or_else(|| error(ParseErrorKind::InvalidFieldRange))?;
            match part.name {
                RulePart::ByHour => builder.at_hour(value),
                RulePart::ByMinute => builder.at_minute(value),
                _ => builder.at_second(value),
            }
        }
        RulePart::ByDay => {
            let days = part
                .value
                .split(',')
                .map(|token| {
                    Weekday::parse(token.trim()).ok_or_else(|| {
                        ParseError::new(ParseErrorKind::InvalidWeekday, part.position)
                            .with_context(token.trim().to_string())
                    })
                })
                .collect::<ParseResult<Vec<_>>>()?;
            builder.on_days(days)
        }
        RulePart::ByMonthDay => {
            let day = parse_unsigned(part.value)
                .and_then(|n| u8::try_from(n).ok())
                .filter(|n| (1..=31).contains(n))
                .ok_or_else(|| error(ParseErrorKind::InvalidDayOfMonth))?;
            builder.on_month_day(day)
        }
        RulePart::Freq => builder,
    })
}

/// Parses a plain run of ASCII digits. Signs, lists and whitespace are rejected.
fn parse_unsigned(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
