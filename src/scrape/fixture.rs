// src/scrape/fixture.rs
//! Scraper backed by a captured JSON document:
//! `{ "<category>": [ {"source": "reddit", ...}, ... ], ... }`.
//!
//! Used by the demo binary and tests in place of live browser sessions.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::Scraper;
use crate::raw::RawRecord;

#[derive(Debug, Clone, Default)]
pub struct FixtureScraper {
    categories: HashMap<String, Vec<RawRecord>>,
}

impl FixtureScraper {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let categories: HashMap<String, Vec<RawRecord>> =
            serde_json::from_str(s).context("parsing scrape fixture json")?;
        Ok(Self { categories })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading scrape fixture from {}", path.display()))?;
        Self::from_json_str(&content)
    }

    /// Categories present in the fixture, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut v: Vec<String> = self.categories.keys().cloned().collect();
        v.sort();
        v
    }
}

#[async_trait]
impl Scraper for FixtureScraper {
    async fn scrape(&self, category: &str) -> Result<Vec<RawRecord>> {
        self.categories
            .get(category)
            .cloned()
            .ok_or_else(|| anyhow!("category {category:?} not captured in fixture"))
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_captured_categories() {
        let s = FixtureScraper::from_json_str(
            r#"{"rust": [{"source": "reddit", "title": "x"}], "ask": []}"#,
        )
        .unwrap();
        assert_eq!(s.categories(), vec!["ask".to_string(), "rust".to_string()]);
        assert_eq!(s.scrape("rust").await.unwrap().len(), 1);
        assert!(s.scrape("missing").await.is_err());
    }

    #[test]
    fn malformed_fixture_is_an_error() {
        assert!(FixtureScraper::from_json_str(r#"{"rust": [{"title": "no source"}]}"#).is_err());
    }

    #[tokio::test]
    async fn listing_shaped_capture_loads_whole() {
        let s = FixtureScraper::from_json_str(
            r#"{"rust": [
                {"source": "reddit", "title": "x", "score": 5, "ups": 5,
                 "created": 1.7e9, "created_utc": 1.7e9,
                 "url": "https://a.example", "permalink": "/r/rust/comments/1/x/"},
                {"source": "hackernews", "title": 123, "descendants": true}
            ]}"#,
        )
        .unwrap();
        assert_eq!(s.scrape("rust").await.unwrap().len(), 2);
    }
}
