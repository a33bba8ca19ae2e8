//! Logging and metrics helpers.
//!
//! The library only emits `tracing` events and `metrics` samples; the host
//! process decides where they go. [`init_tracing`] is the standard way to
//! install a subscriber from [`LoggingConfig`].

use std::time::Instant;

use crate::config::LoggingConfig;

/// Initialize tracing (logging) from the logging config.
///
/// Call this once at process startup. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_tracing(config: &LoggingConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    match config.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

/// Record the result of one processed bundle.
pub fn record_bundle(disposition: &'static str, accepted: usize, rejected: usize, start: Instant) {
    metrics::counter!("charge_bundles_total", "disposition" => disposition).increment(1);
    metrics::counter!("charge_operations_total", "outcome" => "accepted").increment(accepted as u64);
    metrics::counter!("charge_operations_total", "outcome" => "rejected").increment(rejected as u64);
    metrics::histogram!("charge_bundle_duration_seconds", "disposition" => disposition)
        .record(start.elapsed().as_secs_f64());
}

/// Count an invalid timeline mutation that slipped past business validation.
pub fn record_timeline_fault() {
    metrics::counter!("charge_timeline_faults_total").increment(1);
}

/// Count outcome events a subscriber missed because it fell behind.
pub fn record_events_lagged(missed: u64) {
    metrics::counter!("charge_events_lagged_total").increment(missed);
}
