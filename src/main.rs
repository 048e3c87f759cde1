//! Report service binary entrypoint.
//! Boots the Axum HTTP server with the report routes and `/metrics`.

use anyhow::Context;
use tracing::info;

use social_digest::{api, logging, metrics::Metrics};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    logging::init_tracing();

    let state = api::AppState::from_env().context("loading pipeline config")?;
    let metrics = Metrics::init(state.config())?;
    let app = api::router(state).merge(metrics.router());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "report service listening");

    axum::serve(listener, app).await.context("serving http")?;
    Ok(())
}
