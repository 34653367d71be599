//! Adapter construction options

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Options fixed for the lifetime of one adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterOptions {
    /// Worker id stamped on every event
    #[serde(default)]
    pub cid: String,
    /// Environment description, passed through untouched
    #[serde(default)]
    pub capabilities: Value,
    /// Spec files run by this worker, copied onto every event
    #[serde(default)]
    pub specs: Value,
    /// Strip noise lines from failure stacks; anything but a boolean means `true`
    #[serde(default = "default_clean_stack", deserialize_with = "lenient_bool")]
    pub clean_stack: bool,
}

fn default_clean_stack() -> bool {
    true
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_bool().unwrap_or_else(default_clean_stack))
}

impl Default for ReporterOptions {
    fn default() -> Self {
        Self {
            cid: String::new(),
            capabilities: Value::Null,
            specs: Value::Null,
            clean_stack: default_clean_stack(),
        }
    }
}

impl ReporterOptions {
    pub fn new(cid: impl Into<String>) -> Self {
        Self {
            cid: cid.into(),
            ..Default::default()
        }
    }

    pub fn with_capabilities(mut self, capabilities: Value) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_specs(mut self, specs: Value) -> Self {
        self.specs = specs;
        self
    }

    pub fn with_clean_stack(mut self, clean_stack: bool) -> Self {
        self.clean_stack = clean_stack;
        self
    }
}
