// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

// --- Static Sink Access ---

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global `MetricsSink` implementation.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns a static reference to the configured index metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn index_metrics() -> &'static dyn IndexMetricsSink {
    match SINK.get().copied() {
        Some(sink) => sink.as_index_sink(),
        None => &NOP_SINK,
    }
}

/// Returns a static reference to the configured error metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    match SINK.get().copied() {
        Some(sink) => sink.as_error_sink(),
        None => &NOP_SINK,
    }
}

// --- Trait Definitions ---

/// A sink for metrics related to the content index.
pub trait IndexMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter of objects added to the index.
    fn inc_inserts(&self);
    /// Increments the counter of inserts suppressed as exact duplicates.
    fn inc_duplicates(&self);
    /// Increments the counter of content references that no longer resolved.
    fn inc_stale_refs(&self);
    /// Increments the search counter, labeled by selector and outcome.
    fn inc_search(&self, selector: &'static str, hit: bool);
    /// Observes the latency of a single search.
    fn observe_search_duration(&self, duration_secs: f64);
    /// Increments the counter of enumeration requests answered immediately or on insert.
    fn inc_enumeration_answered(&self);
    /// Increments the counter of enumeration requests parked until new children appear.
    fn inc_enumeration_deferred(&self);
}
impl IndexMetricsSink for NopSink {
    fn inc_inserts(&self) {}
    fn inc_duplicates(&self) {}
    fn inc_stale_refs(&self) {}
    fn inc_search(&self, _selector: &'static str, _hit: bool) {}
    fn observe_search_duration(&self, _duration_secs: f64) {}
    fn inc_enumeration_answered(&self) {}
    fn inc_enumeration_deferred(&self) {}
}

/// A sink for recording structured error metrics.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a specific error, categorized by its kind and variant.
    fn inc_error(&self, kind: &'static str, variant: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _kind: &'static str, _variant: &'static str) {}
}

/// A unified sink that implements all domain-specific traits, providing a single
/// point of implementation for metrics backends like Prometheus.
pub trait MetricsSink: IndexMetricsSink + ErrorMetricsSink {
    /// Views this sink through its index metrics interface.
    fn as_index_sink(&self) -> &dyn IndexMetricsSink;
    /// Views this sink through its error metrics interface.
    fn as_error_sink(&self) -> &dyn ErrorMetricsSink;
}

// Blanket implementation to allow any type that implements all sub-traits
// to be used as a `MetricsSink`.
impl<T> MetricsSink for T
where
    T: IndexMetricsSink + ErrorMetricsSink,
{
    fn as_index_sink(&self) -> &dyn IndexMetricsSink {
        self
    }
    fn as_error_sink(&self) -> &dyn ErrorMetricsSink {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_fall_back_to_nop_sink() {
        // No sink is installed in unit tests; every call must be a silent no-op.
        index_metrics().inc_inserts();
        index_metrics().inc_search("leftmost", true);
        error_metrics().inc_error("config", "parse");
        let sink: &dyn MetricsSink = &NopSink;
        sink.as_index_sink().inc_duplicates();
    }
}
