//! Observability subsystem for sqljudge
//!
//! Provides:
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//! - Elapsed-time fields
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. Logging never changes a verdict
//! 3. Deterministic output (sorted keys, no timestamps)
//!
//! # Usage
//!
//! ```ignore
//! use sqljudge::observability::{log_event_with_fields, Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Warn);
//! log_event_with_fields(Event::CheckTimeout, &[("check_id", "...")]);
//! ```

mod events;
mod logger;
mod timer;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use timer::Timer;

/// Log a lifecycle event with fields
///
/// Error events are written at ERROR, timeouts and faults at WARN, the rest
/// at INFO.
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_error() {
        Severity::Error
    } else if matches!(event, Event::CheckTimeout | Event::CheckEngineFault) {
        Severity::Warn
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}
