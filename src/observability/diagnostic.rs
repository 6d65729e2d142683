//! Diagnostics attached to errors
//!
//! Pure code paths describe what went wrong as a `Diagnostic` and return it
//! with the error; the caller decides whether to emit it.

use super::events::Event;
use super::log_event_with_fields;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    event: Event,
    fields: Vec<(String, String)>,
}

impl Diagnostic {
    pub fn new(event: Event) -> Self {
        Self {
            event,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    pub fn event(&self) -> Event {
        self.event
    }

    /// Value of the first field named `key`
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Writes the diagnostic as a structured log line
    pub fn emit(&self) {
        let fields: Vec<(&str, &str)> = self
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        log_event_with_fields(self.event, &fields);
    }
}
