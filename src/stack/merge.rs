//! Merging a command-site error with its saved call-site trace
//!
//! A deferred command fails far away from the line that issued it. The
//! caller captures a trace when issuing the command and, once the command
//! settles with an error, merges both traces: command-site frames first,
//! call-site frames after, noise removed, repeated lines dropped.

use serde_json::Value;

use super::filter::StackFilter;
use crate::common::{Error, Result};
use crate::reporter::FailureRecord;

/// Whatever a failed command settled with
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// A proper error with name, message, and possibly a trace
    Error(FailureRecord),
    /// Any other rejection value
    Value(Value),
}

impl From<FailureRecord> for CommandError {
    fn from(error: FailureRecord) -> Self {
        CommandError::Error(error)
    }
}

impl From<Value> for CommandError {
    fn from(value: Value) -> Self {
        CommandError::Value(value)
    }
}

impl From<&str> for CommandError {
    fn from(message: &str) -> Self {
        CommandError::Value(Value::String(message.to_string()))
    }
}

/// Message text for a non-error rejection value
fn value_message(value: Value) -> String {
    match value {
        Value::String(message) => message,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Merge `command_error` with the trace saved at the call site, using the
/// built-in noise filter
///
/// Fails with [`Error::MissingStackTrace`] when `saved` has no trace.
pub fn sanitize_error(
    command_error: impl Into<CommandError>,
    saved: &FailureRecord,
) -> Result<FailureRecord> {
    sanitize_error_with(&StackFilter::default(), command_error, saved)
}

/// [`sanitize_error`] with a caller-supplied noise filter
pub fn sanitize_error_with(
    filter: &StackFilter,
    command_error: impl Into<CommandError>,
    saved: &FailureRecord,
) -> Result<FailureRecord> {
    let saved_stack = saved
        .stack
        .as_deref()
        .filter(|stack| !stack.is_empty())
        .ok_or(Error::MissingStackTrace)?;

    let (name, message, command_stack) = match command_error.into() {
        CommandError::Error(error) => (error.name, error.message, error.stack),
        CommandError::Value(value) => ("Error".to_string(), value_message(value), None),
    };

    let mut saved_lines: Vec<&str> = saved_stack.split('\n').collect();
    let command_stack = command_stack
        .filter(|stack| !stack.is_empty())
        .map(|stack| stack.replacen(&format!("{name}: {name}"), &name, 1));

    let lines: Vec<&str> = match command_stack.as_deref() {
        Some(command_stack) => {
            // the call-site header is superseded by the command's own
            saved_lines[0] = "";
            command_stack.split('\n').chain(saved_lines).collect()
        }
        None => saved_lines,
    };

    let mut merged: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.trim().is_empty() || filter.is_noise(line) || merged.contains(&line) {
            continue;
        }
        merged.push(line);
    }

    Ok(FailureRecord::new(message)
        .with_name(name)
        .with_stack(merged.join("\n").trim()))
}
