//! Observable events for sqljudge
//!
//! Events are explicit and typed; their names are stable log identifiers.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file parsed and validated
    ConfigLoaded,

    // Check lifecycle
    /// A predicted/reference pair was accepted for checking
    CheckBegin,
    /// A check reached a passed/failed decision
    CheckComplete,
    /// A check exceeded its deadline
    CheckTimeout,
    /// The engine rejected one of the queries
    CheckEngineFault,
    /// The requested match policy does not exist
    CheckUnknownMethod,
    /// The deadline was not a positive finite number of seconds
    CheckInvalidDeadline,
    /// The deadline worker panicked or could not start
    CheckWorkerFailed,
    /// The engine was asked to abandon orphaned work
    EngineInterrupted,

    // Batch
    /// Batch grading started
    BatchBegin,
    /// Batch grading finished
    BatchComplete,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::CheckBegin => "CHECK_BEGIN",
            Event::CheckComplete => "CHECK_COMPLETE",
            Event::CheckTimeout => "CHECK_TIMEOUT",
            Event::CheckEngineFault => "CHECK_ENGINE_FAULT",
            Event::CheckUnknownMethod => "CHECK_UNKNOWN_METHOD",
            Event::CheckInvalidDeadline => "CHECK_INVALID_DEADLINE",
            Event::CheckWorkerFailed => "CHECK_WORKER_FAILED",
            Event::EngineInterrupted => "ENGINE_INTERRUPTED",

            Event::BatchBegin => "BATCH_BEGIN",
            Event::BatchComplete => "BATCH_COMPLETE",
        }
    }

    /// Events that indicate a configuration or internal failure rather than
    /// a verdict about the predicted query
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Event::CheckUnknownMethod | Event::CheckInvalidDeadline | Event::CheckWorkerFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
