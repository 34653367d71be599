//! Lifecycle adapter
//!
//! Turns the runner's nested suite/spec callbacks into a flat stream of
//! [`NormalizedEvent`]s. The adapter keeps a stack of open suites so every
//! event can name its parent, and makes sure a failure raised in a suite
//! body before any spec started still reaches the sink as a failed test.

use chrono::{DateTime, Utc};
use tracing::Dispatch;

use super::clock::{elapsed_ms, Clock, SystemClock};
use super::event::{EntityKind, EventSink, NormalizedEvent};
use super::options::ReporterOptions;
use super::types::{FailureRecord, SpecInfo, SpecStatus, SuiteInfo};
use crate::stack::StackFilter;

/// Description and title given to a synthesized placeholder test
pub const UNKNOWN_TEST: &str = "<unknown test>";

/// The four callbacks a test runner delivers, in the order it runs things
///
/// Every call returns before the runner moves on; nothing is deferred.
pub trait LifecycleListener {
    fn suite_started(&mut self, suite: SuiteInfo);
    fn spec_started(&mut self, spec: SpecInfo);
    fn spec_done(&mut self, spec: SpecInfo);
    fn suite_done(&mut self, suite: SuiteInfo);
}

/// `uid` of a suite or spec
///
/// Not globally unique: two entities with the same description and a
/// reused id collide.
pub fn unique_identifier(description: &str, id: &str) -> String {
    format!("{description}{id}")
}

/// A suite between its start and done callbacks
#[derive(Debug, Clone)]
struct SuiteFrame {
    description: String,
    id: String,
    /// Specs started while this frame was innermost
    tests: usize,
    start: DateTime<Utc>,
}

impl SuiteFrame {
    fn uid(&self) -> String {
        unique_identifier(&self.description, &self.id)
    }
}

/// Normalizes lifecycle callbacks and publishes them to a sink
pub struct LifecycleAdapter<S: EventSink> {
    cid: String,
    capabilities: serde_json::Value,
    specs: serde_json::Value,
    clean_stack: bool,
    sink: S,
    clock: Box<dyn Clock>,
    dispatch: Dispatch,
    filter: StackFilter,
    parent: Vec<SuiteFrame>,
    failed_count: usize,
    suite_start: Option<DateTime<Utc>>,
    test_start: Option<DateTime<Utc>>,
}

impl<S: EventSink> LifecycleAdapter<S> {
    /// Create an adapter publishing to `sink`
    ///
    /// Diagnostics go to the dispatcher that is current at construction.
    pub fn new(sink: S, options: ReporterOptions) -> Self {
        Self {
            cid: options.cid,
            capabilities: options.capabilities,
            specs: options.specs,
            clean_stack: options.clean_stack,
            sink,
            clock: Box::new(SystemClock),
            dispatch: tracing::dispatcher::get_default(|current| current.clone()),
            filter: StackFilter::default(),
            parent: Vec::new(),
            failed_count: 0,
            suite_start: None,
            test_start: None,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Route diagnostics to `dispatch` instead of the ambient dispatcher
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_filter(mut self, filter: StackFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Number of specs that finished with status `failed`
    pub fn failed_count(&self) -> usize {
        self.failed_count
    }

    /// Number of suites started but not yet done
    pub fn open_suites(&self) -> usize {
        self.parent.len()
    }

    pub fn cid(&self) -> &str {
        &self.cid
    }

    pub fn capabilities(&self) -> &serde_json::Value {
        &self.capabilities
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn with_diagnostics<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Payload skeleton; `parent` is whatever suite is innermost right now
    fn payload(
        &self,
        kind: EntityKind,
        description: &str,
        id: &str,
        full_title: Option<String>,
        start: DateTime<Utc>,
    ) -> NormalizedEvent {
        NormalizedEvent {
            cid: self.cid.clone(),
            uid: unique_identifier(description, id),
            event: String::new(),
            title: description.to_string(),
            full_title,
            pending: false,
            pending_reason: None,
            parent: self.parent.last().map(SuiteFrame::uid),
            kind,
            status: None,
            error: None,
            errors: None,
            duration_ms: 0,
            specs: self.specs.clone(),
            start,
        }
    }

    fn emit(&mut self, event: &str, payload: &mut NormalizedEvent) {
        payload.event = event.to_string();
        self.with_diagnostics(|| {
            tracing::debug!(cid = %self.cid, uid = %payload.uid, parent = ?payload.parent, "{event}");
        });
        self.sink.publish(event, payload);
    }

    /// Attach suite-body failures to a placeholder test so they show up
    /// as a regular failed test
    fn report_orphaned_failures(&mut self, failures: Vec<FailureRecord>) {
        let id = format!("spec{}", rand::random::<f64>());
        self.with_diagnostics(|| {
            tracing::debug!(
                id = %id,
                count = failures.len(),
                "Suite failed before any spec started, reporting placeholder test"
            );
        });

        self.spec_started(SpecInfo::new(UNKNOWN_TEST, id.clone()).with_full_title(UNKNOWN_TEST));
        self.spec_done(
            SpecInfo::new(UNKNOWN_TEST, id)
                .with_full_title(UNKNOWN_TEST)
                .with_status(SpecStatus::Failed)
                .with_failures(failures),
        );
    }
}

impl<S: EventSink> LifecycleListener for LifecycleAdapter<S> {
    fn suite_started(&mut self, suite: SuiteInfo) {
        let now = self.clock.now();
        self.suite_start = Some(now);

        let uid = unique_identifier(&suite.description, &suite.id);
        if self.parent.iter().any(|frame| frame.uid() == uid) {
            self.with_diagnostics(|| {
                tracing::debug!(uid = %uid, "Suite uid is already open; reporters may merge these suites");
            });
        }

        let mut payload = self.payload(
            EntityKind::Suite,
            &suite.description,
            &suite.id,
            suite.full_title,
            now,
        );
        self.emit("suite:start", &mut payload);

        self.parent.push(SuiteFrame {
            description: suite.description,
            id: suite.id,
            tests: 0,
            start: now,
        });
    }

    fn spec_started(&mut self, spec: SpecInfo) {
        let now = self.clock.now();
        self.test_start = Some(now);

        match self.parent.last_mut() {
            Some(frame) => frame.tests += 1,
            None => self.with_diagnostics(|| {
                tracing::warn!(
                    spec = %spec.description,
                    "No root suite was defined! This can cause reporters to malfunction. \
                     Please always start a spec file with a top-level suite."
                );
            }),
        }

        let mut payload = self.payload(
            EntityKind::Test,
            &spec.description,
            &spec.id,
            spec.full_title,
            now,
        );
        payload.pending = spec.status == Some(SpecStatus::Pending);
        payload.pending_reason = spec.pending_reason;
        payload.status = spec.status;
        self.emit("test:start", &mut payload);
    }

    fn spec_done(&mut self, spec: SpecInfo) {
        let status = spec.status.map(|status| match status {
            SpecStatus::Excluded => SpecStatus::Pending,
            other => other,
        });

        let errors = if spec.failures.is_empty() {
            None
        } else {
            let mut failures = spec.failures;
            if self.clean_stack {
                for failure in &mut failures {
                    self.filter.clean(failure);
                }
            }
            Some(failures)
        };

        let now = self.clock.now();
        let start = self.test_start.unwrap_or(now);
        let mut payload = self.payload(
            EntityKind::Test,
            &spec.description,
            &spec.id,
            spec.full_title,
            start,
        );
        payload.pending = status == Some(SpecStatus::Pending);
        payload.pending_reason = spec.pending_reason;
        payload.error = errors.as_ref().and_then(|errors| errors.first().cloned());
        payload.errors = errors;
        payload.duration_ms = elapsed_ms(start, now);

        let suffix = status.as_ref().map_or("unknown", SpecStatus::event_suffix);
        let event = format!("test:{suffix}");
        let failed = status == Some(SpecStatus::Failed);
        payload.status = status;

        self.emit(&event, &mut payload);
        if failed {
            self.failed_count += 1;
        }
        self.emit("test:end", &mut payload);
    }

    fn suite_done(&mut self, suite: SuiteInfo) {
        let orphaned = match self.parent.last() {
            Some(frame) => frame.tests == 0 && !suite.failures.is_empty(),
            None => {
                self.with_diagnostics(|| {
                    tracing::warn!(suite = %suite.description, "Suite finished without a matching start");
                });
                false
            }
        };
        if orphaned {
            self.report_orphaned_failures(suite.failures.clone());
        }

        let frame = self.parent.pop();
        let now = self.clock.now();
        let start = frame.map_or(now, |frame| frame.start);

        let mut payload = self.payload(
            EntityKind::Suite,
            &suite.description,
            &suite.id,
            suite.full_title,
            start,
        );
        payload.duration_ms = elapsed_ms(self.suite_start.unwrap_or(now), now);
        self.emit("suite:end", &mut payload);
    }
}
