//! racex: a static data-race detector over SSA-form concurrent programs.
//!
//! The crate root re-exports the pieces a driver (the `racex` binary, or
//! `cargo-racex`) needs: a `Program` to analyse, a `DetectorConfig`, and
//! `analysis::race::RaceDetector` to run over them.

pub mod analysis;
pub mod config;
pub mod error;
pub mod logger;
pub mod ssa;

pub use analysis::race::{RaceDetector, RaceReport, Reporter};
pub use config::DetectorConfig;
pub use error::{RacexError, Result};
