//! Structural/semantic acceptance rules for normalized posts.
//!
//! Rejection is an expected outcome of scraping gated or partial pages, not
//! a fault: the pipeline drops rejected posts and only counts them.

use serde::{Deserialize, Serialize};

use crate::post::{Post, UNKNOWN_HANDLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    /// Minimum title length in characters, after trimming.
    pub min_title_length: usize,
    /// Interaction total that lets a body-less post through.
    pub min_engagement_floor: u64,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_title_length: 10,
            min_engagement_floor: 1,
        }
    }
}

/// Why a post was dropped. Checked in declaration order; the first failing
/// rule is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    EmptyTitle,
    TitleTooShort,
    NoContentSignal,
    ScrapeFailure,
}

impl Rejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Rejection::EmptyTitle => "empty_title",
            Rejection::TitleTooShort => "title_too_short",
            Rejection::NoContentSignal => "no_content_signal",
            Rejection::ScrapeFailure => "scrape_failure",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    rules: ValidationRules,
}

impl Validator {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    pub fn is_valid(&self, post: &Post) -> bool {
        self.check(post).is_ok()
    }

    pub fn check(&self, post: &Post) -> Result<(), Rejection> {
        let title = post.title.trim();
        if title.is_empty() {
            return Err(Rejection::EmptyTitle);
        }
        if title.chars().count() < self.rules.min_title_length {
            return Err(Rejection::TitleTooShort);
        }

        let interactions = post.interaction_total();
        let has_body = !post.content.trim().is_empty();
        if !has_body && interactions < self.rules.min_engagement_floor {
            return Err(Rejection::NoContentSignal);
        }

        // "unknown" is what a failed author scrape leaves behind; real
        // engagement is enough evidence the post itself exists.
        if post.author.handle == UNKNOWN_HANDLE && interactions == 0 {
            return Err(Rejection::ScrapeFailure);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::{Author, Engagement};
    use crate::raw::SourceFamily;
    use std::collections::BTreeSet;

    fn post(title: &str, content: &str, handle: &str, upvotes: u64, comments: u64) -> Post {
        Post {
            id: "p1".into(),
            source: SourceFamily::Reddit,
            title: title.into(),
            content: content.into(),
            author: Author {
                name: "Someone".into(),
                handle: handle.into(),
            },
            category: "trending".into(),
            timestamp: None,
            age_in_hours: None,
            engagement: Engagement {
                upvotes,
                comments,
                ..Engagement::default()
            },
            tags: BTreeSet::new(),
            mentions: BTreeSet::new(),
            url: String::new(),
            engagement_score: 0.0,
            trending_score: None,
        }
    }

    #[test]
    fn empty_title_rejected_even_with_engagement() {
        let v = Validator::default();
        assert_eq!(v.check(&post("   ", "", "x", 5, 2)), Err(Rejection::EmptyTitle));
    }

    #[test]
    fn short_titles_rejected() {
        let v = Validator::default();
        assert_eq!(
            v.check(&post("Untitled", "body", "x", 5, 2)),
            Err(Rejection::TitleTooShort)
        );
        // exactly at the floor passes
        assert!(v.is_valid(&post("0123456789", "body", "x", 0, 0)));
    }

    #[test]
    fn gated_post_passes_on_engagement_alone() {
        let v = Validator::default();
        assert!(v.is_valid(&post("IH+ members only post", "", "founder", 3, 0)));
        assert_eq!(
            v.check(&post("IH+ members only post", "", "founder", 0, 0)),
            Err(Rejection::NoContentSignal)
        );
    }

    #[test]
    fn unknown_handle_needs_engagement() {
        let v = Validator::default();
        assert_eq!(
            v.check(&post("A perfectly fine title", "body", "unknown", 0, 0)),
            Err(Rejection::ScrapeFailure)
        );
        assert!(v.is_valid(&post("A perfectly fine title", "body", "unknown", 0, 1)));
    }

    #[test]
    fn feed_posts_count_likes_retweets_replies() {
        let v = Validator::new(ValidationRules {
            min_title_length: 1,
            min_engagement_floor: 10,
        });
        let mut p = post("tweet text", "", "jack", 50, 50);
        p.source = SourceFamily::Twitter;
        assert!(!v.is_valid(&p));
        p.engagement.likes = 4;
        p.engagement.retweets = 3;
        p.engagement.replies = 3;
        assert!(v.is_valid(&p));
    }
}
