//! One batch pass from scraped categories to a finished [`Report`]:
//! normalize → validate → dedupe → score → aggregate.
//!
//! Each stage's output is handed to the next as a plain value; nothing is
//! stashed between calls.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;

use crate::config::PipelineConfig;
use crate::dedup::dedupe;
use crate::normalize::Normalizer;
use crate::post::Post;
use crate::report::{build_report, CategoryError, Report, ReportMetadata, RunStats};
use crate::scoring::Scorer;
use crate::scrape::CategoryBatch;
use crate::validate::{Rejection, Validator};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "pipeline_raw_records_total",
            "Raw records handed to the normalizer."
        );
        describe_counter!(
            "pipeline_invalid_total",
            "Posts dropped by validation rules."
        );
        describe_counter!(
            "pipeline_duplicates_total",
            "Posts collapsed into an earlier duplicate."
        );
        describe_counter!("pipeline_posts_total", "Posts that made it into a report.");
        describe_counter!(
            "pipeline_category_errors_total",
            "Categories whose scrape produced nothing."
        );
        describe_counter!("scrape_errors_total", "Scraper errors per category.");
        describe_histogram!("pipeline_run_ms", "Pipeline run time in milliseconds.");
    });
}

/// Posts that passed validation, plus what was dropped on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validated {
    pub posts: Vec<Post>,
    pub raw_records: usize,
    pub dropped_invalid: usize,
    pub rejections: BTreeMap<Rejection, usize>,
    pub errors: Vec<CategoryError>,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    normalizer: Normalizer,
    validator: Validator,
    scorer: Scorer,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            normalizer: Normalizer::default(),
            validator: Validator::new(config.validation_rules()),
            scorer: config.scorer(),
            config,
        }
    }

    /// Pin the clock used for relative ages and report metadata.
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.normalizer = Normalizer::new(now);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Normalize every record and keep the valid ones. Failed batches are
    /// turned into category errors.
    pub fn normalize_and_validate(&self, batches: Vec<CategoryBatch>) -> Validated {
        let mut out = Validated::default();

        for batch in batches {
            let records = match batch.outcome {
                Ok(records) => records,
                Err(error) => {
                    out.errors.push(CategoryError {
                        category: batch.category,
                        error,
                    });
                    continue;
                }
            };

            out.raw_records += records.len();
            for (ordinal, raw) in records.iter().enumerate() {
                let post = self.normalizer.normalize(raw, &batch.category, ordinal);
                match self.validator.check(&post) {
                    Ok(()) => out.posts.push(post),
                    Err(reason) => {
                        tracing::debug!(
                            id = %post.id,
                            category = %batch.category,
                            reason = reason.as_str(),
                            "dropping invalid post"
                        );
                        out.dropped_invalid += 1;
                        *out.rejections.entry(reason).or_default() += 1;
                    }
                }
            }
        }
        out
    }

    /// Full run over scraped batches. Always yields a report, even when every
    /// category failed.
    pub fn run(&self, batches: Vec<CategoryBatch>, name: &str) -> Report {
        ensure_metrics_described();
        let t0 = Instant::now();

        let categories: Vec<String> = batches.iter().map(|b| b.category.clone()).collect();
        let validated = self.normalize_and_validate(batches);

        let deduped = dedupe(validated.posts, &self.scorer);
        let scored: Vec<Post> = deduped
            .posts
            .into_iter()
            .map(|p| self.scorer.apply(p))
            .collect();

        let stats = RunStats {
            raw_records: validated.raw_records,
            dropped_invalid: validated.dropped_invalid,
            dropped_duplicates: deduped.dropped,
            rejections: validated.rejections,
            errors: validated.errors,
        };

        counter!("pipeline_raw_records_total").increment(stats.raw_records as u64);
        counter!("pipeline_invalid_total").increment(stats.dropped_invalid as u64);
        counter!("pipeline_duplicates_total").increment(stats.dropped_duplicates as u64);
        counter!("pipeline_posts_total").increment(scored.len() as u64);
        counter!("pipeline_category_errors_total").increment(stats.errors.len() as u64);

        tracing::info!(
            report = name,
            raw = stats.raw_records,
            invalid = stats.dropped_invalid,
            duplicates = stats.dropped_duplicates,
            posts = scored.len(),
            failed_categories = stats.errors.len(),
            "pipeline run finished"
        );

        let metadata = ReportMetadata::new(name, self.normalizer.now(), categories);
        let report = build_report(scored, metadata, stats, &self.config.report_options());

        histogram!("pipeline_run_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{MetricValue, RawRecord, RedditRaw};
    use chrono::TimeZone;

    fn reddit(title: &str, author: &str, upvotes: u64) -> RawRecord {
        RawRecord::Reddit(RedditRaw {
            title: Some(title.into()),
            author: Some(crate::raw::AuthorField::Text(author.into())),
            upvotes: Some(MetricValue::from(upvotes)),
            ..RedditRaw::default()
        })
    }

    #[test]
    fn counts_rejections_by_reason() {
        let p = Pipeline::new(PipelineConfig::default())
            .with_clock(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        let v = p.normalize_and_validate(vec![
            CategoryBatch::ok(
                "rust",
                vec![
                    reddit("", "a", 3),
                    reddit("short", "a", 3),
                    reddit("Long enough title", "a", 3),
                    reddit("Long enough title too", "a", 0),
                ],
            ),
            CategoryBatch::failed("ask", "timeout"),
        ]);
        assert_eq!(v.raw_records, 4);
        assert_eq!(v.posts.len(), 1);
        assert_eq!(v.dropped_invalid, 3);
        assert_eq!(v.rejections[&Rejection::EmptyTitle], 1);
        assert_eq!(v.rejections[&Rejection::TitleTooShort], 1);
        assert_eq!(v.rejections[&Rejection::NoContentSignal], 1);
        assert_eq!(v.errors.len(), 1);
        assert_eq!(v.errors[0].category, "ask");
    }

    #[test]
    fn all_failed_still_reports() {
        let r = Pipeline::new(PipelineConfig::default()).run(
            vec![
                CategoryBatch::failed("a", "boom"),
                CategoryBatch::failed("b", "boom"),
            ],
            "empty",
        );
        assert_eq!(r.summary.total_posts, 0);
        assert_eq!(r.summary.errors.len(), 2);
        assert_eq!(r.category_breakdown.len(), 2);
        assert_eq!(r.metadata.categories, vec!["a".to_string(), "b".to_string()]);
    }
}
