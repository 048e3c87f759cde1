//! Report aggregation: category breakdown, summary statistics, rankings.
//!
//! The report is the canonical in-memory object handed to serializers; this
//! module never renders text itself.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::post::Post;
use crate::validate::Rejection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub top_n: usize,
    pub trending_window_days: u32,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_n: 10,
            trending_window_days: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub name: String,
    pub generated_at: DateTime<Utc>,
    /// Requested categories, in request order.
    pub categories: Vec<String>,
    pub trending_window_days: u32,
    pub top_n: usize,
}

impl ReportMetadata {
    pub fn new(name: impl Into<String>, generated_at: DateTime<Utc>, categories: Vec<String>) -> Self {
        let opts = ReportOptions::default();
        Self {
            name: name.into(),
            generated_at,
            categories,
            trending_window_days: opts.trending_window_days,
            top_n: opts.top_n,
        }
    }
}

/// A category whose scrape produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryError {
    pub category: String,
    pub error: String,
}

/// Counters gathered by the stages before aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub raw_records: usize,
    pub dropped_invalid: usize,
    pub dropped_duplicates: usize,
    pub rejections: BTreeMap<Rejection, usize>,
    pub errors: Vec<CategoryError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPost {
    pub id: String,
    pub title: String,
    pub category: String,
    pub url: String,
    pub engagement_score: f64,
    pub trending_score: Option<f64>,
}

impl From<&Post> for RankedPost {
    fn from(p: &Post) -> Self {
        Self {
            id: p.id.clone(),
            title: p.title.clone(),
            category: p.category.clone(),
            url: p.url.clone(),
            engagement_score: p.engagement_score,
            trending_score: p.trending_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_posts: usize,
    /// Comments plus replies across all posts.
    pub total_comments: u64,
    pub total_engagement: f64,
    pub top_author: Option<String>,
    pub top_posts: Vec<RankedPost>,
    pub trending: Vec<RankedPost>,
    pub raw_records: usize,
    pub dropped_invalid: usize,
    pub dropped_duplicates: usize,
    pub rejections: BTreeMap<Rejection, usize>,
    pub errors: Vec<CategoryError>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub count: usize,
    pub total_engagement: f64,
    pub average_engagement: f64,
    pub total_comments: u64,
    pub failed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summary: Summary,
    pub posts: Vec<Post>,
    pub category_breakdown: BTreeMap<String, CategoryStats>,
}

/// Assemble the report from scored posts (in pipeline order).
pub fn build_report(
    posts: Vec<Post>,
    mut metadata: ReportMetadata,
    stats: RunStats,
    options: &ReportOptions,
) -> Report {
    metadata.top_n = options.top_n;
    metadata.trending_window_days = options.trending_window_days;

    let category_breakdown = breakdown(&posts, &metadata.categories, &stats.errors);

    let summary = Summary {
        total_posts: posts.len(),
        total_comments: posts.iter().map(discussion_count).sum(),
        total_engagement: posts.iter().map(|p| p.engagement_score).sum(),
        top_author: top_author(&posts),
        top_posts: rank(&posts, options.top_n, |p| Some(p.engagement_score)),
        trending: rank(&posts, options.top_n, |p| p.trending_score),
        raw_records: stats.raw_records,
        dropped_invalid: stats.dropped_invalid,
        dropped_duplicates: stats.dropped_duplicates,
        rejections: stats.rejections,
        errors: stats.errors,
    };

    Report {
        metadata,
        summary,
        posts,
        category_breakdown,
    }
}

fn discussion_count(p: &Post) -> u64 {
    p.engagement.comments.saturating_add(p.engagement.replies)
}

fn breakdown(
    posts: &[Post],
    categories: &[String],
    errors: &[CategoryError],
) -> BTreeMap<String, CategoryStats> {
    let mut out: BTreeMap<String, CategoryStats> = categories
        .iter()
        .map(|c| (c.clone(), CategoryStats::default()))
        .collect();

    for p in posts {
        let s = out.entry(p.category.clone()).or_default();
        s.count += 1;
        s.total_engagement += p.engagement_score;
        s.total_comments += discussion_count(p);
    }
    for e in errors {
        out.entry(e.category.clone()).or_default().failed = true;
    }
    for s in out.values_mut() {
        s.average_engagement = if s.count > 0 {
            s.total_engagement / s.count as f64
        } else {
            0.0
        };
    }
    out
}

/// Most frequent `author.name`; ties go to the name seen first.
fn top_author(posts: &[Post]) -> Option<String> {
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for p in posts {
        let name = p.author.name.as_str();
        match index.get(name) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(name, order.len());
                order.push((name, 1));
            }
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (name, count) in order {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((name, count));
        }
    }
    best.map(|(name, _)| name.to_string())
}

/// Top `n` posts by `key`, descending; posts without a key are skipped and
/// equal keys keep their original order.
fn rank(posts: &[Post], n: usize, key: impl Fn(&Post) -> Option<f64>) -> Vec<RankedPost> {
    let mut keyed: Vec<(f64, &Post)> = posts
        .iter()
        .filter_map(|p| key(p).map(|k| (k, p)))
        .collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    keyed
        .into_iter()
        .take(n)
        .map(|(_, p)| RankedPost::from(p))
        .collect()
}
