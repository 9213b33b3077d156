use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
///
/// Only one recorder can be installed per process; a second call fails.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Pre-register counters so they appear even before the first increment.
    counter!("matches_settled_total").absolute(0);
    counter!("settlement_failures_total").absolute(0);
    counter!("predictions_submitted_total").absolute(0);
    counter!("users_registered_total").absolute(0);
    for result in ["exact", "outcome", "miss"] {
        counter!("predictions_scored_total", "result" => result).absolute(0);
    }

    // Histogram is lazily created on first record; force creation.
    histogram!("settlement_duration_seconds").record(0.0);

    Ok(handle)
}
