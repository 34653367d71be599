//! Suite/spec lifecycle normalization
//!
//! The runner calls into a [`LifecycleListener`]; the [`LifecycleAdapter`]
//! implementation turns each callback into a [`NormalizedEvent`] and hands
//! it to an [`EventSink`].

mod adapter;
pub mod clock;
mod event;
mod options;
mod types;

pub use adapter::{unique_identifier, LifecycleAdapter, LifecycleListener, UNKNOWN_TEST};
pub use clock::{Clock, ManualClock, SystemClock};
pub use event::{EntityKind, EventSink, JsonLinesSink, NormalizedEvent, Published, RecordingSink};
pub use options::ReporterOptions;
pub use types::{FailureRecord, SpecInfo, SpecStatus, SuiteInfo};
