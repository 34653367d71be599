//! Noise-line filtering for stack traces

use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::{Error, Result};
use crate::reporter::FailureRecord;

/// Lines from installed dependencies, the sync compatibility layer, and
/// `- - - - -` separators
pub const NOISE_PATTERN: &str = r"(node_modules(/|\\)(\w+)*|@wdio/sync/(build|src)|- - - - -)";

static BUILTIN_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(NOISE_PATTERN).expect("built-in noise pattern compiles"));

static BUILTIN_FILTER: Lazy<StackFilter> = Lazy::new(StackFilter::default);

/// Decides which stack lines are noise
#[derive(Debug, Clone)]
pub struct StackFilter {
    patterns: Vec<Regex>,
}

impl Default for StackFilter {
    fn default() -> Self {
        Self {
            patterns: vec![BUILTIN_NOISE.clone()],
        }
    }
}

impl StackFilter {
    /// Built-in noise pattern plus the given extra regexes
    pub fn with_extra_patterns<I, S>(extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::default();
        for pattern in extra {
            let pattern = pattern.as_ref();
            let regex = Regex::new(pattern).map_err(|e| Error::invalid_pattern(pattern, e))?;
            filter.patterns.push(regex);
        }
        Ok(filter)
    }

    pub fn is_noise(&self, line: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(line))
    }

    /// Drop noise lines from a newline-separated trace
    pub fn clean_trace(&self, trace: &str) -> String {
        trace
            .split('\n')
            .filter(|line| !self.is_noise(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Clean the record's stack in place and hand the same record back
    ///
    /// A record without a stack is returned untouched.
    pub fn clean<'a>(&self, error: &'a mut FailureRecord) -> &'a mut FailureRecord {
        if let Some(stack) = error.stack.as_deref() {
            if !stack.is_empty() {
                error.stack = Some(self.clean_trace(stack));
            }
        }
        error
    }
}

/// Whether a line matches the built-in noise pattern
pub fn is_noise_line(line: &str) -> bool {
    BUILTIN_NOISE.is_match(line)
}

/// Remove built-in noise lines from the record's stack, in place
pub fn clean_stack(error: &mut FailureRecord) -> &mut FailureRecord {
    BUILTIN_FILTER.clean(error)
}
