//! Raw scrape records, one shape per source family.
//!
//! Scrapers hand over loosely-shaped data: any field may be missing, names
//! drift between pages (`score` vs `points`, `selftext` vs `body`), the same
//! value often arrives under two names at once (Reddit listings carry both
//! `score` and `ups`), and counters come either as numbers or as display
//! strings like `"1.2K"`.
//!
//! Decoding never fails on field content. Each wire name that can co-occur
//! with another gets its own optional field and the normalizer picks the
//! first usable one. Loosely typed values keep an `Other` variant for shapes
//! nobody expected, and text fields read anything that is not a string or a
//! number as absent. Only the `"source"` tag itself is a hard requirement.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Which site a record (and the resulting post) came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFamily {
    Reddit,
    Twitter,
    HackerNews,
    IndieHackers,
}

impl SourceFamily {
    /// Feed-style sources rank by likes/retweets/replies; forum-style ones
    /// by upvotes/comments/views.
    pub fn is_feed(self) -> bool {
        matches!(self, SourceFamily::Twitter)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceFamily::Reddit => "reddit",
            SourceFamily::Twitter => "twitter",
            SourceFamily::HackerNews => "hackernews",
            SourceFamily::IndieHackers => "indiehackers",
        }
    }
}

/// Strings pass through, numbers are rendered (HN and Twitter ids arrive as
/// numbers), anything else reads as absent.
fn lenient_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// A counter as scraped: either a JSON number or a display string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    /// Booleans, objects, arrays: counts as missing.
    Other(Value),
}

impl From<u64> for MetricValue {
    fn from(v: u64) -> Self {
        MetricValue::Number(v as f64)
    }
}

impl From<&str> for MetricValue {
    fn from(v: &str) -> Self {
        MetricValue::Text(v.to_string())
    }
}

/// Author as scraped: a bare string (possibly `"Name @handle"`) or an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorField {
    Text(String),
    Profile(AuthorProfile),
    Other(Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorProfile {
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(alias = "displayName")]
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(alias = "screenName")]
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
}

impl AuthorProfile {
    pub fn name(&self) -> Option<&str> {
        first_non_blank([self.name.as_deref(), self.display_name.as_deref()])
    }

    pub fn handle(&self) -> Option<&str> {
        first_non_blank([
            self.handle.as_deref(),
            self.username.as_deref(),
            self.screen_name.as_deref(),
        ])
    }
}

fn first_non_blank<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<&'a str> {
    candidates.into_iter().flatten().find(|s| !s.trim().is_empty())
}

/// Unix seconds, an ISO-8601 string, or a relative age such as `"2h ago"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimestampField {
    Unix(f64),
    Text(String),
    Other(Value),
}

/// Tags as a list, or as one comma/space separated string (Reddit flair).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagsField {
    List(Vec<String>),
    Text(String),
    /// Mixed arrays keep their string items; other shapes yield nothing.
    Other(Value),
}

impl TagsField {
    pub fn items(&self) -> Vec<&str> {
        match self {
            TagsField::List(v) => v.iter().map(String::as_str).collect(),
            TagsField::Text(s) => s
                .split(|c: char| c == ',' || c.is_whitespace())
                .collect(),
            TagsField::Other(Value::Array(v)) => v.iter().filter_map(Value::as_str).collect(),
            TagsField::Other(_) => Vec::new(),
        }
    }
}

/// Reddit post. Listing JSON sends `score`/`ups`, `created`/`created_utc` and
/// `url`/`permalink` side by side; each keeps its own field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedditRaw {
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub selftext: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorField>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ups: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_comments: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<TimestampField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_utc: Option<TimestampField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<TimestampField>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagsField>,
    #[serde(alias = "link_flair_text")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flair: Option<TagsField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentions: Option<TagsField>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitterRaw {
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id_str: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorField>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_count: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retweets: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retweet_count: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reposts: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impressions: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<TimestampField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<TimestampField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<TimestampField>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<TagsField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagsField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentions: Option<TagsField>,
}

/// Covers both the Firebase item shape (`by`, `score`, `descendants`, `time`)
/// and scraped listing rows (`points`, `age`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HnRaw {
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by: Option<AuthorField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descendants: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_comments: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<TimestampField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<TimestampField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<TimestampField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<TimestampField>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagsField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentions: Option<TagsField>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IhRaw {
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorField>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<MetricValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<TimestampField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<TimestampField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<TimestampField>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagsField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentions: Option<TagsField>,
}

/// One scraped record, tagged by `"source"` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum RawRecord {
    Reddit(RedditRaw),
    Twitter(TwitterRaw),
    HackerNews(HnRaw),
    IndieHackers(IhRaw),
}

impl RawRecord {
    pub fn family(&self) -> SourceFamily {
        match self {
            RawRecord::Reddit(_) => SourceFamily::Reddit,
            RawRecord::Twitter(_) => SourceFamily::Twitter,
            RawRecord::HackerNews(_) => SourceFamily::HackerNews,
            RawRecord::IndieHackers(_) => SourceFamily::IndieHackers,
        }
    }
}
