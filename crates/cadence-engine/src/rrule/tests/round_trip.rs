//! Round-trip parsing and serialization tests for rule strings.
//!
//! These verify that the canonical form is a fixed point of parse-then-display
//! and that the builder and the parser agree on every rule the console emits.

use super::fixtures::*;
use crate::rrule::build::{describe, serialize};
use crate::rrule::core::{Frequency, Weekday};
use crate::rrule::parse::{RuleBuilder, parse};

/// Parse a rule, serialize it, then parse again and compare.
fn round_trip(input: &str) -> Result<String, String> {
    let first = parse(input).map_err(|e| format!("First parse failed: {e}"))?;
    let serialized = serialize(&first);
    let second =
        parse(&serialized).map_err(|e| format!("Second parse failed: {e}\n{serialized}"))?;

    if first != second {
        return Err(format!("Rule mismatch: {first:?} vs {second:?}"));
    }
    if serialized != serialize(&second) {
        return Err(format!("Serialization is not stable: {serialized}"));
    }
    Ok(serialized)
}

#[test]
fn presets_are_fixed_points() {
    for input in PRESETS {
        assert_eq!(round_trip(input).as_deref(), Ok(*input));
    }
}

#[test]
fn builder_output_is_fixed_point() {
    for input in BUILDER_OUTPUT {
        assert_eq!(round_trip(input).as_deref(), Ok(*input));
    }
}

#[test]
fn non_canonical_spellings_normalize() {
    for (input, canonical) in NON_CANONICAL {
        assert_eq!(round_trip(input).as_deref(), Ok(*canonical), "{input}");
    }
}

#[test]
fn builder_and_parser_agree() {
    let built = RuleBuilder::new(Frequency::Weekly)
        .at_hour(9)
        .at_minute(0)
        .on_days([Weekday::Friday, Weekday::Monday, Weekday::Wednesday])
        .build()
        .expect("valid rule");

    let parsed = parse("FREQ=WEEKLY;INTERVAL=1;BYHOUR=9;BYMINUTE=0;BYDAY=MO,WE,FR")
        .expect("valid rule");

    assert_eq!(built, parsed);
}

#[test]
fn every_fixture_has_a_description() {
    for input in PRESETS.iter().chain(BUILDER_OUTPUT) {
        let rule = parse(input).expect(input);
        assert!(describe(&rule).starts_with("Every "), "{input}");
    }
}
