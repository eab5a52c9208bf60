// Path: crates/telemetry/src/time.rs
use crate::sinks::IndexMetricsSink;
use std::time::Instant;

/// Measures one Interest search.
///
/// Latency is observed when the guard drops, on every path out of the search.
/// The hit/miss counter is only bumped by [`SearchTimer::finish`].
pub struct SearchTimer<'a> {
    sink: &'a dyn IndexMetricsSink,
    selector: &'static str,
    start: Instant,
}

impl<'a> SearchTimer<'a> {
    pub fn start(sink: &'a dyn IndexMetricsSink, selector: &'static str) -> Self {
        Self {
            sink,
            selector,
            start: Instant::now(),
        }
    }

    /// Records the outcome; latency follows when `self` drops.
    pub fn finish(self, hit: bool) {
        self.sink.inc_search(self.selector, hit);
    }
}

impl Drop for SearchTimer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_search_duration(self.start.elapsed().as_secs_f64());
    }
}
