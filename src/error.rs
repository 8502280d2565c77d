//! Error kinds from SPEC_FULL.md §4.O / §7, built with `snafu` the way the
//! teacher's workspace already depends on it.
//!
//! Only `LoadError` and `MalformedPackagePath` are ever surfaced as `Err`
//! from the driver; `UnanalysableCallee`, `RecursionCycle` and
//! `BlockCycle` are recovered locally and only ever logged (see
//! `logger.rs`) — the analyser never aborts on an analysable program.

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RacexError {
    #[snafu(display("failed to load the SSA program: {reason}"))]
    LoadError { reason: String },

    #[snafu(display("could not derive a top-level package identifier from {path:?}"))]
    MalformedPackagePath { path: String },
}

pub type Result<T> = std::result::Result<T, RacexError>;
