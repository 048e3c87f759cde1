//! HTTP surface: hand the service scraped batches, get a report back.
//!
//! - `GET  /health`
//! - `POST /report`      → report as JSON
//! - `POST /report/csv`  → report posts as CSV

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::config::PipelineConfig;
use crate::export;
use crate::pipeline::Pipeline;
use crate::raw::RawRecord;
use crate::report::Report;
use crate::scrape::CategoryBatch;

pub const DEFAULT_REPORT_NAME: &str = "report";

#[derive(Clone)]
pub struct AppState {
    config: Arc<PipelineConfig>,
}

impl AppState {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Config from `$PIPELINE_CONFIG_PATH` / `config/pipeline.*` / defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(PipelineConfig::load_default()?))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/report", post(report_json))
        .route("/report/csv", post(report_csv))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub batches: Vec<BatchIn>,
}

/// One scraped category as posted by the scraping harness.
#[derive(Debug, Deserialize)]
pub struct BatchIn {
    pub category: String,
    #[serde(default)]
    pub records: Vec<RawRecord>,
    /// Set when the harness could not scrape this category.
    #[serde(default)]
    pub error: Option<String>,
}

impl From<BatchIn> for CategoryBatch {
    fn from(b: BatchIn) -> Self {
        match b.error {
            Some(e) => CategoryBatch::failed(b.category, e),
            None if b.records.is_empty() => CategoryBatch::failed(b.category, "no records scraped"),
            None => CategoryBatch::ok(b.category, b.records),
        }
    }
}

fn run(state: &AppState, req: ReportRequest) -> Report {
    let name = req
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REPORT_NAME.to_string());
    let batches = req.batches.into_iter().map(CategoryBatch::from).collect();
    Pipeline::new((*state.config).clone()).run(batches, &name)
}

async fn report_json(State(state): State<AppState>, Json(req): Json<ReportRequest>) -> Json<Report> {
    Json(run(&state, req))
}

async fn report_csv(
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> impl IntoResponse {
    let report = run(&state, req);
    (
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        export::to_csv(&report),
    )
}
