//! Shared building blocks for the cadence workspace: settings, errors and constants.

pub mod config;
pub mod constants;
pub mod error;
