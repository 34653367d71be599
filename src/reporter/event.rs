//! Normalized events and the sinks that receive them

use std::io::Write;
use std::sync::mpsc::Sender;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{FailureRecord, SpecStatus};

/// Whether an event describes a suite or a single test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Suite,
    Test,
}

/// Uniform payload published for every lifecycle callback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    /// Worker that produced the event
    pub cid: String,
    /// `description + id` of the suite or test
    pub uid: String,
    pub event: String,
    pub title: String,
    pub full_title: Option<String>,
    pub pending: bool,
    pub pending_reason: Option<String>,
    /// `uid` of the innermost open suite, `None` at the top level
    pub parent: Option<String>,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SpecStatus>,
    /// First entry of `errors`, for listeners that only read one error
    pub error: Option<FailureRecord>,
    pub errors: Option<Vec<FailureRecord>>,
    #[serde(rename = "duration")]
    pub duration_ms: u64,
    pub specs: Value,
    pub start: DateTime<Utc>,
}

/// Downstream consumer of normalized events
///
/// Delivery is fire-and-forget: a sink that cannot deliver drops the event
/// rather than reporting back to the adapter.
pub trait EventSink {
    fn publish(&mut self, event: &str, payload: &NormalizedEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn publish(&mut self, event: &str, payload: &NormalizedEvent) {
        (**self).publish(event, payload)
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn publish(&mut self, event: &str, payload: &NormalizedEvent) {
        (**self).publish(event, payload)
    }
}

/// An event name paired with its payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Published {
    pub event: String,
    pub payload: NormalizedEvent,
}

impl EventSink for Sender<Published> {
    fn publish(&mut self, event: &str, payload: &NormalizedEvent) {
        // receiver gone means nobody is listening any more
        let _ = self.send(Published {
            event: event.to_string(),
            payload: payload.clone(),
        });
    }
}

/// Keeps every published event in arrival order
#[derive(Debug, Default)]
pub struct RecordingSink {
    published: Vec<Published>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Event names in the order they were published
    pub fn event_names(&self) -> Vec<&str> {
        self.published.iter().map(|p| p.event.as_str()).collect()
    }

    pub fn published(&self) -> &[Published] {
        &self.published
    }

    /// Payloads published under the given event name
    pub fn payloads_for(&self, event: &str) -> Vec<&NormalizedEvent> {
        self.published
            .iter()
            .filter(|p| p.event == event)
            .map(|p| &p.payload)
            .collect()
    }

    pub fn into_published(self) -> Vec<Published> {
        self.published
    }
}

impl EventSink for RecordingSink {
    fn publish(&mut self, event: &str, payload: &NormalizedEvent) {
        self.published.push(Published {
            event: event.to_string(),
            payload: payload.clone(),
        });
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    event: &'a str,
    payload: &'a NormalizedEvent,
}

/// Writes one `{"event": ..., "payload": ...}` JSON object per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, event: &str, payload: &NormalizedEvent) -> crate::Result<()> {
        serde_json::to_writer(&mut self.writer, &JsonLine { event, payload })?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn publish(&mut self, event: &str, payload: &NormalizedEvent) {
        if let Err(e) = self.write_line(event, payload) {
            tracing::warn!(event, error = %e, "Dropping event, sink write failed");
        }
    }
}
