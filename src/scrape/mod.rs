// src/scrape/mod.rs
//! Boundary to the browser-automation scrapers.
//!
//! Scrapers are external collaborators; the pipeline only needs "give me the
//! raw records for this category". A failed or empty category becomes an
//! error entry in its batch and never stops the others.

pub mod fixture;

use anyhow::Result;
use async_trait::async_trait;
use metrics::counter;

use crate::raw::RawRecord;

pub use fixture::FixtureScraper;

/// Records scraped for one category, or why there are none.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBatch {
    pub category: String,
    pub outcome: Result<Vec<RawRecord>, String>,
}

impl CategoryBatch {
    pub fn ok(category: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            category: category.into(),
            outcome: Ok(records),
        }
    }

    pub fn failed(category: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            outcome: Err(error.into()),
        }
    }
}

#[async_trait]
pub trait Scraper: Send + Sync {
    async fn scrape(&self, category: &str) -> Result<Vec<RawRecord>>;
    fn name(&self) -> &'static str;
}

/// Scrape each category in turn and wrap the outcome in a batch.
pub async fn collect(scraper: &dyn Scraper, categories: &[String]) -> Vec<CategoryBatch> {
    let mut batches = Vec::with_capacity(categories.len());
    for category in categories {
        let batch = match scraper.scrape(category).await {
            Ok(records) if records.is_empty() => {
                tracing::warn!(scraper = scraper.name(), %category, "scrape returned no records");
                CategoryBatch::failed(category.as_str(), "no records scraped")
            }
            Ok(records) => {
                tracing::debug!(
                    scraper = scraper.name(),
                    %category,
                    records = records.len(),
                    "scraped category"
                );
                CategoryBatch::ok(category.as_str(), records)
            }
            Err(e) => {
                tracing::warn!(error = ?e, scraper = scraper.name(), %category, "scrape failed");
                counter!("scrape_errors_total").increment(1);
                CategoryBatch::failed(category.as_str(), format!("{e:#}"))
            }
        };
        batches.push(batch);
    }
    batches
}
