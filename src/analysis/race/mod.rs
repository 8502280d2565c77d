//! The data-race analysis (SPEC_FULL.md §3-§4), assembled from its pieces
//! the way the teacher's `DeadlockDetector` (`analysis/deadlock/mod.rs`)
//! assembles `LockSetAnalyzer` + `DeadlockReporter`.

pub mod classifier;
pub mod context;
pub mod dispatch;
mod driver;
mod interpreter;
pub mod function_state;
pub mod guarded_access;
pub mod lockset;
pub mod primitives;
pub mod report;
mod traversal;

use crate::config::DetectorConfig;
use crate::error::Result;
use crate::racex_info;
use crate::ssa::Program;

pub use classifier::{find_races, RacePair};
pub use driver::Driver;
pub use report::{JsonReporter, RaceReport, Reporter, TextReporter};

/// Orchestrates one end-to-end run: drive the interprocedural analysis to
/// a flat access list, classify racing pairs, and build the report.
pub struct RaceDetector<'p> {
    program: &'p dyn Program,
    config: DetectorConfig,
}

impl<'p> RaceDetector<'p> {
    pub fn new(program: &'p dyn Program, config: DetectorConfig) -> Self {
        Self { program, config }
    }

    pub fn run(&self) -> Result<RaceReport> {
        racex_info!("starting race analysis");
        let mut driver = Driver::new(self.program, self.config.clone());
        let accesses = driver.analyse()?;
        racex_info!("collected {} guarded accesses", accesses.len());

        let races = find_races(&accesses);
        racex_info!("found {} racing pair(s)", races.len());

        Ok(RaceReport::build(self.program, &races))
    }
}
