//! Command implementations. Output goes to the supplied writer so commands
//! can be exercised without a terminal.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use cadence_core::config::Settings;
use cadence_core::error::CoreError;
use cadence_engine::rrule::expand::{
    ZoneResolver, default_search_horizon, next_occurrences_within, resolve_zone,
};
use cadence_engine::rrule::{describe, parse};
use cadence_engine::{Preset, ScheduleRecord};
use chrono::{DateTime, FixedOffset, SecondsFormat, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use rayon::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::cli::Command;

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The input was rejected; the reason has been written out.
    Rejected,
}

/// ## Summary
/// Runs `command` against `settings`, writing results to `out`.
///
/// ## Errors
/// Returns an error if an argument cannot be used (bad rule, unknown zone,
/// unreadable jobs file) or writing fails.
pub fn execute(command: &Command, settings: &Settings, out: &mut dyn Write) -> Result<Outcome> {
    match command {
        Command::Validate { rule } => validate(rule, out),
        Command::Describe { rule } => {
            let rule = parse(rule)?;
            writeln!(out, "{}", describe(&rule))?;
            Ok(Outcome::Success)
        }
        Command::Preview {
            rule,
            anchor,
            after,
            count,
            tz,
        } => {
            let zone = zone_or_default(tz.as_deref(), settings)?;
            let after = after.unwrap_or_else(|| Utc::now().fixed_offset());
            let count = count.unwrap_or(settings.engine.preview_count);
            preview(rule, &anchor.with_timezone(&zone), &after, count, settings, out)
        }
        Command::Due {
            rule,
            anchor,
            now,
            tolerance_ms,
            tz,
        } => {
            let zone = zone_or_default(tz.as_deref(), settings)?;
            let now = now.unwrap_or_else(|| Utc::now().fixed_offset());
            let tolerance =
                due_tolerance(tolerance_ms.unwrap_or(settings.engine.due_tolerance_ms))?;
            due(rule, &anchor.with_timezone(&zone), &now, tolerance, settings, out)
        }
        Command::Tick { jobs, now } => {
            let now = now.unwrap_or_else(|| Utc::now().fixed_offset());
            tick(jobs, &now, settings, out)
        }
        Command::Presets => {
            for preset in Preset::all() {
                writeln!(out, "{}\t{}", preset.as_str(), preset.label())?;
            }
            Ok(Outcome::Success)
        }
    }
}

fn validate(input: &str, out: &mut dyn Write) -> Result<Outcome> {
    match parse(input) {
        Ok(rule) => {
            writeln!(out, "{rule}")?;
            Ok(Outcome::Success)
        }
        Err(e) => {
            tracing::debug!(input, error = %e, "Rule rejected");
            writeln!(out, "invalid rule: {e}")?;
            Ok(Outcome::Rejected)
        }
    }
}

fn preview(
    input: &str,
    anchor: &DateTime<Tz>,
    after: &DateTime<FixedOffset>,
    count: usize,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let rule = parse(input)?;
    let runs = next_occurrences_within(&rule, anchor, after, count, horizon(settings));
    for run in &runs {
        writeln!(out, "{}", format_instant(run))?;
    }
    if runs.is_empty() {
        tracing::info!(%rule, "No fire time within the search horizon");
    }
    Ok(Outcome::Success)
}

fn due(
    input: &str,
    anchor: &DateTime<Tz>,
    now: &DateTime<FixedOffset>,
    tolerance: TimeDelta,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let rule = parse(input)?;
    let is_due = rule.is_due(anchor, now, tolerance);
    writeln!(out, "{}", if is_due { "due" } else { "not due" })?;

    let next = next_occurrences_within(&rule, anchor, now, 1, horizon(settings));
    if let Some(next) = next.first() {
        writeln!(out, "next: {}", format_instant(next))?;
    }
    Ok(Outcome::Success)
}

/// One job's result in `cadence tick`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    pub job_id: Uuid,
    pub job_name: String,
    pub due: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_run: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn tick(
    jobs: &Path,
    now: &DateTime<FixedOffset>,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let text = std::fs::read_to_string(jobs)
        .with_context(|| format!("Failed to read jobs file {}", jobs.display()))?;
    let records: Vec<ScheduleRecord> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse jobs file {}", jobs.display()))?;

    let reports = evaluate(records, now, settings)?;
    let due = reports.iter().filter(|r| r.due).count();
    tracing::info!(jobs = reports.len(), due, "Tick evaluated");

    serde_json::to_writer_pretty(&mut *out, &reports)?;
    writeln!(out)?;
    Ok(Outcome::Success)
}

/// ## Summary
/// Evaluates every record at `now` in parallel.
///
/// Zones are resolved up front so that each distinct name is looked up once.
/// A record that fails to bind is reported with its error instead of
/// aborting the batch.
///
/// ## Errors
/// Returns an error if `engine.due_tolerance_ms` is not a usable tolerance.
pub fn evaluate(
    records: Vec<ScheduleRecord>,
    now: &DateTime<FixedOffset>,
    settings: &Settings,
) -> Result<Vec<TickReport>> {
    let tolerance = due_tolerance(settings.engine.due_tolerance_ms)?;
    let search_horizon = horizon(settings);

    let mut resolver = ZoneResolver::new();
    let resolved: Vec<_> = records
        .into_iter()
        .map(|record| {
            let zone = resolver.resolve(&record.timezone);
            (record, zone)
        })
        .collect();

    let reports = resolved
        .into_par_iter()
        .map(|(record, zone)| {
            let job_id = record.job_id;
            let job_name = record.job_name.clone();
            let schedule = zone
                .map_err(Into::into)
                .and_then(|zone| record.into_schedule_in(zone));

            match schedule {
                Ok(schedule) => TickReport {
                    job_id,
                    job_name,
                    due: schedule.is_due(now, tolerance),
                    next_run: schedule
                        .next_run_within(now, search_horizon)
                        .map(|t| format_instant(&t)),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!(%job_id, error = %e, "Skipping job with invalid schedule");
                    TickReport {
                        job_id,
                        job_name,
                        due: false,
                        next_run: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect();
    Ok(reports)
}

fn zone_or_default(name: Option<&str>, settings: &Settings) -> Result<Tz> {
    let name = name.unwrap_or(&settings.engine.default_timezone);
    Ok(resolve_zone(name)?)
}

fn due_tolerance(ms: i64) -> Result<TimeDelta> {
    if ms < 0 {
        return Err(CoreError::InvalidInput(format!(
            "due tolerance must not be negative, got {ms} ms"
        ))
        .into());
    }
    TimeDelta::try_milliseconds(ms).ok_or_else(|| {
        CoreError::InvalidInput(format!("due tolerance out of range: {ms} ms")).into()
    })
}

fn horizon(settings: &Settings) -> TimeDelta {
    TimeDelta::try_days(settings.engine.search_horizon_days)
        .unwrap_or_else(default_search_horizon)
}

fn format_instant<Z: TimeZone>(instant: &DateTime<Z>) -> String
where
    Z::Offset: std::fmt::Display,
{
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
