//! Canonical post entity every scraper family converges on.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::raw::{
    AuthorField, AuthorProfile, HnRaw, IhRaw, MetricValue, RawRecord, RedditRaw, SourceFamily,
    TagsField, TimestampField, TwitterRaw,
};

pub const UNKNOWN_HANDLE: &str = "unknown";
pub const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub handle: String,
}

impl Default for Author {
    fn default() -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            handle: UNKNOWN_HANDLE.to_string(),
        }
    }
}

/// Interaction counters. Every field is present; sources fill the subset
/// they expose and leave the rest at 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub upvotes: u64,
    pub comments: u64,
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub impressions: u64,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub source: SourceFamily,
    pub title: String,
    pub content: String,
    pub author: Author,
    pub category: String,
    /// Timestamp as scraped (ISO-8601 or relative age), if any.
    pub timestamp: Option<String>,
    pub age_in_hours: Option<f64>,
    pub engagement: Engagement,
    pub tags: BTreeSet<String>,
    pub mentions: BTreeSet<String>,
    pub url: String,
    pub engagement_score: f64,
    pub trending_score: Option<f64>,
}

/// Composite key used to detect the same item seen through different
/// categories or searches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub title: String,
    pub handle: String,
}

/// Case-fold and collapse runs of whitespace.
pub fn fold_title(title: &str) -> String {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

impl Post {
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            title: fold_title(&self.title),
            handle: self.author.handle.trim().to_lowercase(),
        }
    }

    /// Primary approval metric: likes for feeds, upvotes for forums.
    pub fn points(&self) -> u64 {
        if self.source.is_feed() {
            self.engagement.likes
        } else {
            self.engagement.upvotes
        }
    }

    /// Discussion depth: replies for feeds, comments for forums.
    pub fn discussion(&self) -> u64 {
        if self.source.is_feed() {
            self.engagement.replies
        } else {
            self.engagement.comments
        }
    }

    /// Raw interaction count used by the validator's engagement floor.
    pub fn interaction_total(&self) -> u64 {
        let e = &self.engagement;
        if self.source.is_feed() {
            e.likes.saturating_add(e.retweets).saturating_add(e.replies)
        } else {
            e.upvotes.saturating_add(e.comments)
        }
    }

    /// Re-express this post as a raw record of its own family.
    ///
    /// Feeding the result back through the normalizer yields the same
    /// canonical fields; scores are not carried over.
    pub fn to_raw(&self) -> RawRecord {
        let e = &self.engagement;
        let author = Some(AuthorField::Profile(AuthorProfile {
            name: Some(self.author.name.clone()),
            handle: Some(self.author.handle.clone()),
            ..AuthorProfile::default()
        }));
        let id = Some(self.id.clone());
        let timestamp = self.timestamp.clone().map(TimestampField::Text);
        let url = non_empty(&self.url);
        let tags = Some(TagsField::List(self.tags.iter().cloned().collect()));
        let mentions = Some(TagsField::List(self.mentions.iter().cloned().collect()));
        let title = non_empty(&self.title);
        let content = non_empty(&self.content);
        let m = |v: u64| Some(MetricValue::from(v));

        match self.source {
            SourceFamily::Reddit => RawRecord::Reddit(RedditRaw {
                id,
                title,
                content,
                author,
                upvotes: m(e.upvotes),
                comments: m(e.comments),
                views: m(e.views),
                timestamp,
                url,
                tags,
                mentions,
                ..RedditRaw::default()
            }),
            SourceFamily::Twitter => RawRecord::Twitter(TwitterRaw {
                id,
                text: content.or(title),
                author,
                likes: m(e.likes),
                retweets: m(e.retweets),
                replies: m(e.replies),
                impressions: m(e.impressions),
                timestamp,
                url,
                hashtags: tags,
                mentions,
                ..TwitterRaw::default()
            }),
            SourceFamily::HackerNews => RawRecord::HackerNews(HnRaw {
                id,
                title,
                text: content,
                author,
                upvotes: m(e.upvotes),
                comments: m(e.comments),
                timestamp,
                url,
                tags,
                mentions,
                ..HnRaw::default()
            }),
            SourceFamily::IndieHackers => RawRecord::IndieHackers(IhRaw {
                id,
                title,
                content,
                author,
                upvotes: m(e.upvotes),
                comments: m(e.comments),
                views: m(e.views),
                timestamp,
                url,
                tags,
                mentions,
                ..IhRaw::default()
            }),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
