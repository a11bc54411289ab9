//! Calculation tasks running over a trimmed view: per-conformer spectrum
//! synthesis and Boltzmann population averaging.

pub mod averaging;
pub mod synthesis;
