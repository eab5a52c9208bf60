// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_histogram, register_int_counter, register_int_counter_vec,
    Histogram, IntCounter, IntCounterVec,
};

// --- Metric Statics ---
// We use OnceCell to hold the metric collectors. They will be initialized
// exactly once by the `install` function.

static INDEX_INSERTS_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static INDEX_DUPLICATES_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static INDEX_STALE_REFS_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static INDEX_SEARCHES_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static INDEX_SEARCH_DURATION_SECONDS: OnceCell<Histogram> = OnceCell::new();
static INDEX_ENUMERATIONS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();

#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

/// Helper macro to reduce boilerplate for getting a metric from OnceCell.
/// A metric that was never installed is skipped rather than reported.
macro_rules! with_metric {
    ($metric:ident, $m:ident => $body:expr) => {
        if let Some($m) = $metric.get() {
            $body;
        }
    };
}

impl IndexMetricsSink for PrometheusSink {
    fn inc_inserts(&self) {
        with_metric!(INDEX_INSERTS_TOTAL, m => m.inc());
    }
    fn inc_duplicates(&self) {
        with_metric!(INDEX_DUPLICATES_TOTAL, m => m.inc());
    }
    fn inc_stale_refs(&self) {
        with_metric!(INDEX_STALE_REFS_TOTAL, m => m.inc());
    }
    fn inc_search(&self, selector: &'static str, hit: bool) {
        let outcome = if hit { "hit" } else { "miss" };
        with_metric!(INDEX_SEARCHES_TOTAL, m => m.with_label_values(&[selector, outcome]).inc());
    }
    fn observe_search_duration(&self, duration_secs: f64) {
        with_metric!(INDEX_SEARCH_DURATION_SECONDS, m => m.observe(duration_secs));
    }
    fn inc_enumeration_answered(&self) {
        with_metric!(INDEX_ENUMERATIONS_TOTAL, m => m.with_label_values(&["answered"]).inc());
    }
    fn inc_enumeration_deferred(&self) {
        with_metric!(INDEX_ENUMERATIONS_TOTAL, m => m.with_label_values(&["deferred"]).inc());
    }
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, kind: &'static str, variant: &'static str) {
        with_metric!(ERRORS_TOTAL, m => m.with_label_values(&[kind, variant]).inc());
    }
}

fn already_installed() -> prometheus::Error {
    prometheus::Error::Msg("prometheus sink already installed".into())
}

/// Initializes all Prometheus metrics collectors and returns a static reference to the sink.
/// This function must be called only once at application startup.
pub fn install() -> Result<&'static dyn MetricsSink, prometheus::Error> {
    INDEX_INSERTS_TOTAL
        .set(register_int_counter!(
            "nrepo_index_inserts_total",
            "Total number of objects added to the content index."
        )?)
        .map_err(|_| already_installed())?;
    INDEX_DUPLICATES_TOTAL
        .set(register_int_counter!(
            "nrepo_index_duplicates_total",
            "Total number of inserts suppressed as exact duplicates."
        )?)
        .map_err(|_| already_installed())?;
    INDEX_STALE_REFS_TOTAL
        .set(register_int_counter!(
            "nrepo_index_stale_refs_total",
            "Total number of content references that no longer resolved."
        )?)
        .map_err(|_| already_installed())?;
    INDEX_SEARCHES_TOTAL
        .set(register_int_counter_vec!(
            "nrepo_index_searches_total",
            "Total searches, labeled by child selector and outcome.",
            &["selector", "outcome"]
        )?)
        .map_err(|_| already_installed())?;
    INDEX_SEARCH_DURATION_SECONDS
        .set(register_histogram!(
            "nrepo_index_search_duration_seconds",
            "Latency of a single Interest search.",
            exponential_buckets(0.000_001, 2.0, 20)?
        )?)
        .map_err(|_| already_installed())?;
    INDEX_ENUMERATIONS_TOTAL
        .set(register_int_counter_vec!(
            "nrepo_index_enumerations_total",
            "Total name enumeration requests, labeled by whether they were answered or deferred.",
            &["result"]
        )?)
        .map_err(|_| already_installed())?;
    ERRORS_TOTAL
        .set(register_int_counter_vec!(
            "nrepo_errors_total",
            "Total number of errors, categorized by type and variant.",
            &["kind", "variant"]
        )?)
        .map_err(|_| already_installed())?;

    static SINK: PrometheusSink = PrometheusSink;
    Ok(&SINK)
}
