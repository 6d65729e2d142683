//! Observable events
//!
//! Events are explicit and typed; each renders as an upper snake case name.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration file parsed and validated
    ConfigLoaded,
    /// Seed documents loaded into the store
    StoreLoaded,
    /// HTTP listener bound, ready for requests
    Serving,

    // List requests
    /// List request received
    ListReceived,
    /// List request answered
    ListCompleted,
    /// Filter or page size rejected as invalid argument
    FilterRejected,
    /// Walker met an expression shape it cannot classify
    UnexpectedExpression,
    /// Store execution failed
    StoreFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreLoaded => "STORE_LOADED",
            Event::Serving => "SERVING",
            Event::ListReceived => "LIST_RECEIVED",
            Event::ListCompleted => "LIST_COMPLETED",
            Event::FilterRejected => "FILTER_REJECTED",
            Event::UnexpectedExpression => "UNEXPECTED_EXPRESSION",
            Event::StoreFailed => "STORE_FAILED",
        }
    }

    /// True for events that indicate a failed operation
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::FilterRejected | Event::UnexpectedExpression | Event::StoreFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
