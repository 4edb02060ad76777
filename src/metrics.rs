use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "cloudview_poll_success_total",
            "Successful poll attempts per source."
        );
        describe_counter!(
            "cloudview_poll_failure_total",
            "Failed or timed-out poll attempts per source."
        );
        describe_histogram!(
            "cloudview_poll_duration_ms",
            "Poll attempt duration in milliseconds."
        );
        describe_gauge!(
            "cloudview_source_consecutive_failures",
            "Current failure streak per source."
        );
        describe_counter!(
            "cloudview_snapshot_reads_total",
            "Snapshot store reads served to query handlers."
        );
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize the Prometheus recorder and register series descriptions.
    pub fn init() -> Self {
        // Use default buckets to avoid API differences across crate versions.
        let builder = PrometheusBuilder::new();

        let handle = builder
            .install_recorder()
            .expect("prometheus: install recorder");

        ensure_metrics_described();

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
