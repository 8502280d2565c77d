//! Analyses racex can run, mirroring the teacher's `analysis/` layout
//! (`analysis/deadlock`, `analysis/core`, ...) with one module per
//! analysis kind.

pub mod race;
