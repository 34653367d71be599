//! Callback record types
//!
//! These are the shapes the test runner hands to the lifecycle callbacks.
//! Field aliases accept the runner's native names (`failedExpectations`,
//! `fullName`) next to the generic ones.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A failure attached to a spec or suite
///
/// Only `name`, `message` and `stack` are interpreted; any other fields
/// the runner attaches (matcher name, expected/actual values) pass through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    #[serde(default = "default_error_name")]
    pub name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_error_name() -> String {
    "Error".to_string()
}

impl FailureRecord {
    /// Create a plain `Error` record without a stack trace
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            name: default_error_name(),
            message: message.into(),
            stack: None,
            extra: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// Final status reported for a spec
///
/// Kept as the runner's own vocabulary; unrecognized statuses survive as
/// [`SpecStatus::Other`] so their event name can still be derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpecStatus {
    Passed,
    Failed,
    Pending,
    /// Runner-specific skip category, reported downstream as `Pending`
    Excluded,
    Other(String),
}

impl SpecStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SpecStatus::Passed => "passed",
            SpecStatus::Failed => "failed",
            SpecStatus::Pending => "pending",
            SpecStatus::Excluded => "excluded",
            SpecStatus::Other(status) => status,
        }
    }

    /// Event suffix: the status text without a trailing `ed`
    ///
    /// `failed` becomes `fail` and `passed` becomes `pass`; `pending` has
    /// no such suffix and stays `pending`.
    pub fn event_suffix(&self) -> &str {
        let status = self.as_str();
        status.strip_suffix("ed").unwrap_or(status)
    }
}

impl From<String> for SpecStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "passed" => SpecStatus::Passed,
            "failed" => SpecStatus::Failed,
            "pending" => SpecStatus::Pending,
            "excluded" => SpecStatus::Excluded,
            _ => SpecStatus::Other(status),
        }
    }
}

impl From<&str> for SpecStatus {
    fn from(status: &str) -> Self {
        status.to_string().into()
    }
}

impl From<SpecStatus> for String {
    fn from(status: SpecStatus) -> Self {
        match status {
            SpecStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for SpecStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record passed to suite-start and suite-done
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteInfo {
    pub description: String,
    #[serde(alias = "identifier")]
    pub id: String,
    #[serde(default, alias = "fullName", skip_serializing_if = "Option::is_none")]
    pub full_title: Option<String>,
    /// Errors raised in the suite body itself (hooks, top-level code)
    #[serde(default, alias = "failedExpectations", alias = "failureRecords")]
    pub failures: Vec<FailureRecord>,
}

impl SuiteInfo {
    pub fn new(description: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_full_title(mut self, full_title: impl Into<String>) -> Self {
        self.full_title = Some(full_title.into());
        self
    }

    pub fn with_failures(mut self, failures: Vec<FailureRecord>) -> Self {
        self.failures = failures;
        self
    }
}

/// Record passed to spec-start and spec-done
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecInfo {
    pub description: String,
    #[serde(alias = "identifier")]
    pub id: String,
    #[serde(default, alias = "fullName", skip_serializing_if = "Option::is_none")]
    pub full_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SpecStatus>,
    #[serde(default, alias = "failedExpectations", alias = "failureRecords")]
    pub failures: Vec<FailureRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_reason: Option<String>,
}

impl SpecInfo {
    pub fn new(description: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_full_title(mut self, full_title: impl Into<String>) -> Self {
        self.full_title = Some(full_title.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<SpecStatus>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_failures(mut self, failures: Vec<FailureRecord>) -> Self {
        self.failures = failures;
        self
    }

    pub fn with_pending_reason(mut self, reason: impl Into<String>) -> Self {
        self.pending_reason = Some(reason.into());
        self
    }
}
