//! Command line definition.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};

/// Recurrence rule tooling for the batch scheduler.
#[derive(Parser, Debug)]
#[command(name = "cadence", version, about)]
pub struct Cli {
    /// Path to a cadence.toml config file.
    #[arg(long, env = "CADENCE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check a rule and print its canonical form.
    Validate { rule: String },

    /// Print a human-readable summary of a rule.
    Describe { rule: String },

    /// List upcoming fire times of a rule.
    Preview {
        rule: String,

        /// Schedule start (RFC 3339).
        #[arg(long, value_parser = parse_instant)]
        anchor: DateTime<FixedOffset>,

        /// List fire times strictly after this instant (RFC 3339). Defaults to now.
        #[arg(long, value_parser = parse_instant)]
        after: Option<DateTime<FixedOffset>>,

        /// Number of fire times. Defaults to `engine.preview_count`.
        #[arg(long)]
        count: Option<usize>,

        /// Zone for calendar arithmetic. Defaults to `engine.default_timezone`.
        #[arg(long)]
        tz: Option<String>,
    },

    /// Check whether a rule is due at an instant.
    Due {
        rule: String,

        /// Schedule start (RFC 3339).
        #[arg(long, value_parser = parse_instant)]
        anchor: DateTime<FixedOffset>,

        /// Instant to check (RFC 3339). Defaults to now.
        #[arg(long, value_parser = parse_instant)]
        now: Option<DateTime<FixedOffset>>,

        /// Accept fire times this far in the past. Defaults to `engine.due_tolerance_ms`.
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
        tolerance_ms: Option<i64>,

        /// Zone for calendar arithmetic. Defaults to `engine.default_timezone`.
        #[arg(long)]
        tz: Option<String>,
    },

    /// Evaluate a JSON array of schedule records and report due jobs.
    Tick {
        /// Path to the jobs file.
        jobs: PathBuf,

        /// Instant to evaluate at (RFC 3339). Defaults to now.
        #[arg(long, value_parser = parse_instant)]
        now: Option<DateTime<FixedOffset>>,
    },

    /// List the preset rules.
    Presets,
}

fn parse_instant(s: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}
