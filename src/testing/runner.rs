//! Replay runner implementation
//!
//! Feeds a recorded callback sequence through a [`LifecycleAdapter`] so the
//! normalized event stream can be inspected without a live test runner.

use std::path::Path;

use crate::common::{Error, Result};
use crate::reporter::{EventSink, LifecycleAdapter, ReporterOptions};
use crate::stack::StackFilter;

use super::config::ReplayScenario;

/// Result of a replay
#[derive(Debug)]
pub struct ReplaySummary {
    pub name: String,
    pub steps_run: usize,
    pub failed: usize,
    /// Suites still open after the last step
    pub unclosed_suites: usize,
}

impl ReplaySummary {
    pub fn passed(&self) -> bool {
        self.failed == 0
    }
}

/// Load and parse a replay scenario from a YAML file
pub fn load_scenario(path: &Path) -> Result<ReplayScenario> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;

    serde_yaml::from_str(&content).map_err(|e| {
        Error::Scenario(format!(
            "Failed to parse replay scenario '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Replay every step of `scenario` into `sink`
pub fn run_scenario<S: EventSink>(
    scenario: ReplayScenario,
    options: ReporterOptions,
    filter: StackFilter,
    sink: S,
) -> (ReplaySummary, S) {
    let mut adapter = LifecycleAdapter::new(sink, options).with_filter(filter);

    tracing::info!(name = %scenario.name, steps = scenario.steps.len(), "Replaying scenario");

    let steps_run = scenario.steps.len();
    for step in scenario.steps {
        step.deliver(&mut adapter);
    }

    let unclosed_suites = adapter.open_suites();
    if unclosed_suites > 0 {
        tracing::warn!(count = unclosed_suites, "Scenario ended with suites still open");
    }

    let summary = ReplaySummary {
        name: scenario.name,
        steps_run,
        failed: adapter.failed_count(),
        unclosed_suites,
    };
    (summary, adapter.into_sink())
}
