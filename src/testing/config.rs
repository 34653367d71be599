//! Replay scenario configuration types
//!
//! Defines the data structures for deserializing YAML replay scenarios: a
//! recorded sequence of lifecycle callbacks plus the worker metadata the
//! adapter needs.

use serde::Deserialize;
use serde_json::Value;

use crate::common::config::ReporterConfig;
use crate::reporter::{LifecycleListener, ReporterOptions, SpecInfo, SuiteInfo};

/// A complete replay scenario loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct ReplayScenario {
    /// Name of the scenario
    pub name: String,
    /// Optional description of what the recording shows
    pub description: Option<String>,
    /// Worker id; falls back to the configured default
    pub cid: Option<String>,
    /// Spec files copied onto every event
    #[serde(default)]
    pub specs: Value,
    /// Environment description
    #[serde(default)]
    pub capabilities: Value,
    /// Overrides the configured stack cleaning
    pub clean_stack: Option<bool>,
    /// Callbacks in delivery order
    pub steps: Vec<Callback>,
}

/// One recorded lifecycle callback
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Callback {
    SuiteStarted(SuiteInfo),
    SpecStarted(SpecInfo),
    SpecDone(SpecInfo),
    SuiteDone(SuiteInfo),
}

impl Callback {
    /// Deliver this callback to a listener
    pub fn deliver(self, listener: &mut impl LifecycleListener) {
        match self {
            Callback::SuiteStarted(suite) => listener.suite_started(suite),
            Callback::SpecStarted(spec) => listener.spec_started(spec),
            Callback::SpecDone(spec) => listener.spec_done(spec),
            Callback::SuiteDone(suite) => listener.suite_done(suite),
        }
    }
}

impl ReplayScenario {
    /// Adapter options, with the scenario's own values taking precedence
    pub fn reporter_options(&self, defaults: &ReporterConfig) -> ReporterOptions {
        ReporterOptions::new(self.cid.clone().unwrap_or_else(|| defaults.cid.clone()))
            .with_capabilities(self.capabilities.clone())
            .with_specs(self.specs.clone())
            .with_clean_stack(self.clean_stack.unwrap_or(defaults.clean_stack))
    }
}
