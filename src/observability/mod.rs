//! Observability
//!
//! - Structured logging (JSON lines, deterministic key order)
//! - Typed events
//! - Counters
//! - Diagnostics carried alongside errors
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on transpilation results
//! 3. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use filterstore::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::ListCompleted, &[("items", "42")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_filters_transpiled();
//! ```

mod diagnostic;
mod events;
mod logger;
mod metrics;

pub use diagnostic::Diagnostic;
pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log an event with fields; store failures log at ERROR, rejections at WARN
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_of(event), event.as_str(), fields);
}

fn severity_of(event: Event) -> Severity {
    match event {
        Event::StoreFailed => Severity::Error,
        e if e.is_failure() => Severity::Warn,
        _ => Severity::Info,
    }
}
