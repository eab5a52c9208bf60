// Path: crates/telemetry/src/init.rs
use nrepo_types::config::{LogFormat, TelemetryConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Initializes the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_filter`. Fails if a global
/// subscriber or `log` bridge has already been installed.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))?;
    tracing_log::LogTracer::init()?;
    match config.log_format {
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339());
            let subscriber = Registry::default().with(filter).with(fmt_layer);
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_writer(std::io::stderr)
                .with_target(true);
            let subscriber = Registry::default().with(filter).with(fmt_layer);
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

/// Installs logging and, if `config.metrics` is set, the Prometheus sink as
/// the global metrics sink.
pub fn init(config: &TelemetryConfig) -> Result<(), anyhow::Error> {
    init_tracing(config)?;
    if config.metrics {
        let sink = crate::prometheus::install()?;
        crate::sinks::SINK
            .set(sink)
            .map_err(|_| anyhow::anyhow!("metrics sink already set"))?;
        tracing::info!(target: "telemetry", "prometheus metrics sink installed");
    }
    Ok(())
}
