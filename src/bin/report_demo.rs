//! Offline demo: run the pipeline over a captured scrape and print the report.
//!
//! REPORT_FIXTURE_PATH  fixture to read (default fixtures/sample_scrape.json)
//! REPORT_FORMAT        json | csv (default json)

use std::path::PathBuf;

use anyhow::Context;
use social_digest::{export, logging, scrape::FixtureScraper, PipelineConfig};

const DEFAULT_FIXTURE: &str = "fixtures/sample_scrape.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    logging::init_tracing();

    let path = std::env::var("REPORT_FIXTURE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_FIXTURE));
    let scraper = FixtureScraper::from_path(&path)?;
    let config = PipelineConfig::load_default().context("loading pipeline config")?;

    let report =
        social_digest::scrape_and_report(&scraper, &scraper.categories(), config, "demo").await;

    let format = std::env::var("REPORT_FORMAT").unwrap_or_default();
    if format.eq_ignore_ascii_case("csv") {
        print!("{}", export::to_csv(&report));
    } else {
        println!("{}", export::to_json_pretty(&report)?);
    }
    Ok(())
}
