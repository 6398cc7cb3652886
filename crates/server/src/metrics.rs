//! Prometheus metrics

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(error) => {
            tracing::warn!(%error, "metrics recorder not installed");
            None
        }
    }
}

/// Count a handled request per endpoint
pub fn record_request(endpoint: &'static str) {
    metrics::counter!("portal_assist_requests_total", "endpoint" => endpoint).increment(1);
}

/// Record end-to-end query latency
pub fn record_query_latency(elapsed_ms: u64) {
    metrics::histogram!("portal_assist_query_latency_ms").record(elapsed_ms as f64);
}

/// Count operator escalations
pub fn record_escalation() {
    metrics::counter!("portal_assist_escalations_total").increment(1);
}
