//! The `cadence` command line tool: rule validation, previews and due checks
//! over stored job schedules.

pub mod cli;
pub mod commands;
