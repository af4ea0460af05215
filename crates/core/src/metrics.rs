//! Metrics definitions for the collection resolver and mutations.
//!
//! Metrics are collected using the `metrics` crate and can be exported
//! to Prometheus via `metrics-exporter-prometheus`.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

use crate::models::RecordKind;

/// Initialize all metric descriptions.
/// Call this once at startup before any metrics are recorded.
pub fn init_metrics() {
    describe_counter!(
        "connections_resolved_total",
        "Total number of connection pages resolved"
    );
    describe_counter!(
        "connection_edges_total",
        "Total number of edges returned across all pages"
    );
    describe_counter!(
        "counts_resolved_total",
        "Total number of collection counts resolved"
    );
    describe_counter!(
        "cursor_rejections_total",
        "Total number of after cursors that failed to decode"
    );
    describe_counter!(
        "order_key_rejections_total",
        "Total number of unknown order keys"
    );
    describe_counter!(
        "mutations_total",
        "Total number of mutations by name and outcome"
    );
    describe_histogram!(
        "connection_resolve_duration_seconds",
        "Time taken to resolve a connection page in seconds"
    );
}

/// Record a resolved page and its size.
pub fn record_connection_resolved(kind: RecordKind, edges: usize) {
    counter!("connections_resolved_total", "kind" => kind.as_str()).increment(1);
    counter!("connection_edges_total", "kind" => kind.as_str()).increment(edges as u64);
}

/// Record a resolved count.
pub fn record_count_resolved(kind: RecordKind) {
    counter!("counts_resolved_total", "kind" => kind.as_str()).increment(1);
}

/// Record a cursor that failed to decode or did not fit the order.
pub fn record_cursor_rejected(kind: RecordKind) {
    counter!("cursor_rejections_total", "kind" => kind.as_str()).increment(1);
}

/// Record an unknown order key.
pub fn record_order_key_rejected(kind: RecordKind) {
    counter!("order_key_rejections_total", "kind" => kind.as_str()).increment(1);
}

/// Record a mutation outcome.
///
/// # Arguments
/// * `name` - The mutation ("create_user", "create_vote", ...)
/// * `outcome` - "ok" or "rejected"
pub fn record_mutation(name: &'static str, outcome: &'static str) {
    counter!("mutations_total", "name" => name, "outcome" => outcome).increment(1);
}

/// A timer that records the resolve duration of a page when dropped.
pub struct ResolveTimer {
    kind: RecordKind,
    start: Instant,
}

impl ResolveTimer {
    /// Start a new timer for a page of `kind`.
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            start: Instant::now(),
        }
    }
}

impl Drop for ResolveTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        histogram!("connection_resolve_duration_seconds", "kind" => self.kind.as_str())
            .record(duration);
    }
}
