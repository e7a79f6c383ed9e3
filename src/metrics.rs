use axum::{routing::get, Router};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

use crate::report::AnalysisReport;

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder once per process; later calls reuse it.
    pub fn init() -> Self {
        let handle = HANDLE
            .get_or_init(|| {
                PrometheusBuilder::new()
                    .install_recorder()
                    .unwrap_or_else(|e| {
                        // Another recorder already owns the global slot; keep a detached handle.
                        tracing::warn!(target: "metrics", error = %e, "prometheus recorder not installed");
                        PrometheusBuilder::new().build_recorder().handle()
                    })
            })
            .clone();

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

/// One successful analysis.
pub fn record_analysis(report: &AnalysisReport, analyzed_messages: usize) {
    counter!("feed_analyze_requests_total").increment(1);
    counter!("feed_messages_analyzed_total").increment(analyzed_messages as u64);
    histogram!("feed_analyze_duration_ms").record(report.processing_time_ms as f64);

    let d = &report.anomaly_details;
    for (kind, hit) in [
        ("burst_activity", d.burst_activity),
        ("alternating_sentiment", d.alternating_sentiment),
        ("synchronized_posting", d.synchronized_posting),
    ] {
        if hit {
            counter!("feed_anomalies_total", "kind" => kind).increment(1);
        }
    }
}

/// One request rejected before reaching the analyzer.
pub fn record_rejection(code: &'static str) {
    counter!("feed_analyze_rejected_total", "code" => code).increment(1);
}
