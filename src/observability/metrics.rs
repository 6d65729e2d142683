//! Metrics registry
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Thread-safe but lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for list requests
///
/// Uses Relaxed ordering; counters are independent of each other.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Filters successfully transpiled and executed
    filters_transpiled: AtomicU64,
    /// Filters or page sizes rejected as invalid argument
    filters_rejected: AtomicU64,
    /// Store execution failures
    store_failures: AtomicU64,
    /// Documents returned across all pages
    documents_returned: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_filters_transpiled(&self) {
        self.filters_transpiled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_filters_rejected(&self) {
        self.filters_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_store_failures(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_documents_returned(&self, count: u64) {
        self.documents_returned.fetch_add(count, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            filters_transpiled: self.filters_transpiled.load(Ordering::Relaxed),
            filters_rejected: self.filters_rejected.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            documents_returned: self.documents_returned.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub filters_transpiled: u64,
    pub filters_rejected: u64,
    pub store_failures: u64,
    pub documents_returned: u64,
}
