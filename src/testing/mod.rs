//! Scenario replay
//!
//! Reads YAML recordings of lifecycle callbacks and replays them through
//! the adapter, so reporters can be exercised against fixed input.

mod config;
mod runner;

pub use config::*;
pub use runner::{load_scenario, run_scenario, ReplaySummary};
