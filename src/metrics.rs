//! Prometheus exporter for the pipeline counters and `/metrics` route.

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::gauge;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

use crate::config::PipelineConfig;

/// Run-time buckets in ms; a run over a few hundred records is sub-10ms.
const RUN_MS_BUCKETS: [f64; 8] = [1.0, 2.5, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0];

pub struct Metrics {
    pub handle: PrometheusHandle,
}

fn builder() -> Result<PrometheusBuilder> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full("pipeline_run_ms".to_string()), &RUN_MS_BUCKETS)
        .context("prometheus: run-time buckets")
}

impl Metrics {
    /// Install the global Prometheus recorder and publish the active
    /// pipeline settings as gauges. Call once per process.
    pub fn init(config: &PipelineConfig) -> Result<Self> {
        let handle = builder()?
            .install_recorder()
            .context("prometheus: install recorder")?;

        gauge!("pipeline_trending_window_hours").set(f64::from(config.trending_window_days) * 24.0);
        gauge!("pipeline_top_n").set(config.top_n as f64);

        Ok(Self { handle })
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
