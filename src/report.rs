//! Error reporting side channel.
//!
//! Batch translation and language detection swallow per-item failures instead
//! of aborting; every swallowed failure is handed to an [`ErrorReporter`]
//! exactly once. The reporter is injected at provider construction so tests
//! can observe reports without global state.

use log::error;

use crate::error::SuggestError;

/// Side channel for failures that are caught rather than propagated
pub trait ErrorReporter: Send + Sync {
    /// Report one caught failure together with a short context label
    fn report(&self, context: &str, error: &SuggestError);
}

/// Default reporter that forwards to the `log` facade
#[derive(Debug, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, context: &str, error: &SuggestError) {
        error!("{}: {}", context, error);
    }
}

/// Test reporter that records every report it receives
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct CollectingReporter {
    reports: parking_lot::Mutex<Vec<(String, SuggestError)>>,
}

#[cfg(test)]
impl CollectingReporter {
    pub(crate) fn reports(&self) -> Vec<(String, SuggestError)> {
        self.reports.lock().clone()
    }

    pub(crate) fn count(&self) -> usize {
        self.reports.lock().len()
    }
}

#[cfg(test)]
impl ErrorReporter for CollectingReporter {
    fn report(&self, context: &str, error: &SuggestError) {
        self.reports.lock().push((context.to_string(), error.clone()));
    }
}
