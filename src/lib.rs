// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod config;
pub mod raw;
pub mod post;

// Pipeline stages, leaf-first
pub mod normalize;
pub mod validate;
pub mod dedup;
pub mod scoring;
pub mod report;
pub mod pipeline;

// Boundaries: scrapers in, serializers / HTTP out
pub mod scrape;
pub mod export;
pub mod api;
pub mod metrics;
pub mod logging;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::config::{PipelineConfig, ScoreWeights};
pub use crate::normalize::Normalizer;
pub use crate::pipeline::Pipeline;
pub use crate::post::{Author, Engagement, Post};
pub use crate::raw::{RawRecord, SourceFamily};
pub use crate::report::{build_report, Report};
pub use crate::scoring::{Scorer, Scores};
pub use crate::scrape::{CategoryBatch, Scraper};
pub use crate::validate::{Rejection, ValidationRules, Validator};

use tracing::info;

/// Scrape every category through `scraper` and run the pipeline over the
/// combined result.
///
/// ```ignore
/// let scraper = social_digest::scrape::FixtureScraper::from_path("fixtures/sample_scrape.json".as_ref())?;
/// let report = social_digest::scrape_and_report(&scraper, &scraper.categories(), PipelineConfig::default(), "daily").await;
/// ```
pub async fn scrape_and_report(
    scraper: &dyn Scraper,
    categories: &[String],
    config: PipelineConfig,
    name: &str,
) -> Report {
    let batches = scrape::collect(scraper, categories).await;
    info!(scraper = scraper.name(), categories = categories.len(), "scrape finished");
    Pipeline::new(config).run(batches, name)
}
