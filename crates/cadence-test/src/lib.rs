//! Cadence workspace - integration test support.
//!
//! Re-exports the workspace crates so integration tests can use `cadence::`
//! paths.

pub mod cadence {
    pub use cadence_app::{cli, commands};
    pub use cadence_core::{config, constants};
    pub use cadence_engine::*;
}
