//! Spec relay - test lifecycle event normalization
//!
//! This library turns the nested suite/spec callbacks a test runner emits
//! into a flat stream of uniform events for downstream reporters, and
//! cleans and merges stack traces attached to failures.

pub mod cli;
pub mod commands;
pub mod common;
pub mod reporter;
pub mod stack;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use reporter::{
    EventSink, FailureRecord, LifecycleAdapter, LifecycleListener, NormalizedEvent,
    ReporterOptions, SpecInfo, SpecStatus, SuiteInfo,
};
