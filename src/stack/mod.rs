//! Stack trace cleanup
//!
//! Pure functions over failure records: dropping noise frames from one
//! trace, and reconciling a command-site error with a saved call-site trace.

mod filter;
mod merge;

pub use filter::{clean_stack, is_noise_line, StackFilter, NOISE_PATTERN};
pub use merge::{sanitize_error, sanitize_error_with, CommandError};
