//! Cross-crate integration tests.

mod concurrency;
mod helpers;
mod properties;
mod schedules;
