// Path: crates/telemetry/tests/init.rs

//! `init` with metrics enabled. Runs in its own process because it installs
//! the global subscriber, the Prometheus collectors, and the global sink.

use anyhow::Result;
use nrepo_telemetry::init::init;
use nrepo_telemetry::sinks::SINK;
use nrepo_telemetry::{error_metrics, index_metrics};
use nrepo_types::config::{LogFormat, TelemetryConfig};

fn counter_value(name: &str) -> Option<f64> {
    prometheus::gather()
        .into_iter()
        .find(|family| family.get_name() == name)
        .and_then(|family| family.get_metric().first().map(|m| m.get_counter().get_value()))
}

#[test]
fn init_with_metrics_routes_sinks_to_prometheus() -> Result<()> {
    let config = TelemetryConfig {
        log_filter: "info".into(),
        log_format: LogFormat::Json,
        metrics: true,
    };
    init(&config)?;
    assert!(SINK.get().is_some());

    index_metrics().inc_inserts();
    index_metrics().inc_inserts();
    index_metrics().inc_duplicates();
    error_metrics().inc_error("config", "CONFIG_INVALID");
    assert_eq!(counter_value("nrepo_index_inserts_total"), Some(2.0));
    assert_eq!(counter_value("nrepo_index_duplicates_total"), Some(1.0));
    assert_eq!(counter_value("nrepo_errors_total"), Some(1.0));

    // Everything is global and set-once.
    assert!(init(&config).is_err());
    Ok(())
}
