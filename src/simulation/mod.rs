//! Top-level game driver
//!
//! Bundles one match's state, rules and scheduler behind a small API the
//! headless binary, benchmarks and integration tests drive.

mod runner;
mod summary;

pub use runner::Simulation;
pub use summary::{PlayerSummary, SimulationSummary};
