//! Raw record → canonical [`Post`].
//!
//! One mapping function per source family produces a [`Draft`]; the shared
//! tail (`Draft::finish`) applies the default policy every family agrees on:
//!
//! | field      | default                                   |
//! |------------|-------------------------------------------|
//! | `id`       | raw id → URL segment → `post_<ordinal>`   |
//! | `title`    | `""`                                      |
//! | `content`  | `""`                                      |
//! | `author`   | `Unknown` / `unknown`                     |
//! | `category` | batch category → family hint → `uncategorized` |
//! | counters   | `0`                                       |
//! | `tags`     | explicit list, else `#\w+` from text      |
//! | `url`      | `""`                                      |
//!
//! Normalization never fails; garbage in a field degrades to its default.

pub mod fields;

mod hackernews;
mod indiehackers;
mod reddit;
mod twitter;

use chrono::{DateTime, Utc};

use crate::post::{Author, Engagement, Post};
use crate::raw::{RawRecord, SourceFamily, TagsField, TimestampField};
use fields::IdMarker;

pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// Converts raw records into posts relative to a fixed clock, so relative
/// ages and absolute timestamps resolve to the same `age_in_hours`.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    now: DateTime<Utc>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Normalizer {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// `ordinal` is the record's position in its batch; it only feeds the
    /// synthesized id when neither the record nor its URL carries one.
    pub fn normalize(&self, raw: &RawRecord, category: &str, ordinal: usize) -> Post {
        let draft = match raw {
            RawRecord::Reddit(r) => reddit::draft(r),
            RawRecord::Twitter(r) => twitter::draft(r),
            RawRecord::HackerNews(r) => hackernews::draft(r),
            RawRecord::IndieHackers(r) => indiehackers::draft(r),
        };
        draft.finish(category, ordinal, self.now)
    }
}

/// Family-specific view of a record, before the shared defaults apply.
pub(crate) struct Draft<'a> {
    pub source: SourceFamily,
    pub id: Option<&'a str>,
    pub id_marker: IdMarker,
    pub url: Option<&'a str>,
    pub title: String,
    pub content: String,
    pub author: Author,
    pub category_hint: Option<&'a str>,
    pub timestamp: Option<&'a TimestampField>,
    pub engagement: Engagement,
    pub tags: Option<&'a TagsField>,
    pub mentions: Option<&'a TagsField>,
}

impl Draft<'_> {
    fn finish(self, category: &str, ordinal: usize, now: DateTime<Utc>) -> Post {
        let url = self.url.map(str::trim).unwrap_or_default().to_string();

        let id = self
            .id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| fields::id_from_url(&url, self.id_marker))
            .unwrap_or_else(|| format!("post_{ordinal}"));

        let category = [Some(category), self.category_hint]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string();

        let (timestamp, age_in_hours) = fields::parse_timestamp(self.timestamp, now);
        let tags = fields::collect_tags(self.tags, &self.title, &self.content);
        let mentions = fields::collect_mentions(self.mentions, &self.title, &self.content);

        Post {
            id,
            source: self.source,
            title: self.title,
            content: self.content,
            author: self.author,
            category,
            timestamp,
            age_in_hours,
            engagement: self.engagement,
            tags,
            mentions,
            url,
            engagement_score: 0.0,
            trending_score: None,
        }
    }
}

/// Title/body resolution shared by the forum families: an explicit title
/// wins; untitled records borrow a headline from their text.
pub(crate) fn title_and_body(
    title: Option<&str>,
    body: Option<&str>,
    text: Option<&str>,
) -> (String, String) {
    let body = body
        .filter(|b| !b.trim().is_empty())
        .or(text)
        .map(|b| fields::normalize_text(b, fields::CONTENT_MAX_CHARS))
        .unwrap_or_default();

    let title = title
        .map(|t| fields::normalize_text(t, fields::TITLE_MAX_CHARS))
        .filter(|t| !t.is_empty())
        .or_else(|| text.map(fields::headline))
        .unwrap_or_default();

    (title, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{HnRaw, IhRaw, MetricValue, RedditRaw, TwitterRaw};
    use chrono::TimeZone;

    fn normalizer() -> Normalizer {
        Normalizer::new(Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap())
    }

    #[test]
    fn empty_records_get_documented_defaults() {
        let n = normalizer();
        for raw in [
            RawRecord::Reddit(RedditRaw::default()),
            RawRecord::Twitter(TwitterRaw::default()),
            RawRecord::HackerNews(HnRaw::default()),
            RawRecord::IndieHackers(IhRaw::default()),
        ] {
            let p = n.normalize(&raw, "", 7);
            assert_eq!(p.id, "post_7");
            assert_eq!(p.title, "");
            assert_eq!(p.content, "");
            assert_eq!(p.author, Author::default());
            assert_eq!(p.category, DEFAULT_CATEGORY);
            assert_eq!(p.engagement, Engagement::default());
            assert!(p.tags.is_empty());
            assert_eq!(p.url, "");
            assert_eq!(p.timestamp, None);
            assert_eq!(p.age_in_hours, None);
            assert_eq!(p.source, raw.family());
        }
    }

    #[test]
    fn batch_category_wins_over_hint() {
        let raw = RawRecord::Reddit(RedditRaw {
            subreddit: Some("rust".into()),
            ..RedditRaw::default()
        });
        let n = normalizer();
        assert_eq!(n.normalize(&raw, "trending", 0).category, "trending");
        assert_eq!(n.normalize(&raw, "  ", 0).category, "rust");
    }

    #[test]
    fn explicit_id_beats_url() {
        let raw = RawRecord::HackerNews(HnRaw {
            id: Some("42".into()),
            url: Some("https://news.ycombinator.com/item?id=8863".into()),
            upvotes: Some(MetricValue::Number(1.0)),
            ..HnRaw::default()
        });
        assert_eq!(normalizer().normalize(&raw, "top", 0).id, "42");
    }

    #[test]
    fn untitled_text_borrows_headline() {
        let (t, b) = title_and_body(None, None, Some("First line\nsecond line"));
        assert_eq!(t, "First line second line");
        assert_eq!(b, "First line second line");

        let (t, b) = title_and_body(Some("  "), Some("body"), None);
        assert_eq!(t, "");
        assert_eq!(b, "body");
    }
}
