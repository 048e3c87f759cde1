//! Engagement and time-decayed trending scores.
//!
//! engagement (forum) = comments*w_comment + upvotes*w_upvote + views*w_view
//! engagement (feed)  = likes*w_like + retweets*w_retweet + replies*w_reply
//!                      + impressions*w_impression
//!
//! trending = (points + discussion*2) / (max(age_h, 1) + 2)^1.5
//!
//! Trending is only defined when the post's age is known and inside the
//! configured window; otherwise it is `None` and the post stays out of the
//! trending ranking altogether.

use serde::{Deserialize, Serialize};

use crate::config::ScoreWeights;
use crate::post::Post;

/// Ages below this many hours are treated as this many hours.
pub const MIN_AGE_HOURS: f64 = 1.0;
const AGE_OFFSET_HOURS: f64 = 2.0;
const GRAVITY: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub engagement_score: f64,
    pub trending_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorer {
    weights: ScoreWeights,
    trending_window_days: u32,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(ScoreWeights::default(), 2)
    }
}

impl Scorer {
    pub fn new(weights: ScoreWeights, trending_window_days: u32) -> Self {
        Self {
            weights: weights.sanitized(),
            trending_window_days,
        }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn trending_window_hours(&self) -> f64 {
        f64::from(self.trending_window_days) * 24.0
    }

    pub fn engagement_score(&self, post: &Post) -> f64 {
        let e = &post.engagement;
        let w = &self.weights;
        if post.source.is_feed() {
            e.likes as f64 * w.like
                + e.retweets as f64 * w.retweet
                + e.replies as f64 * w.reply
                + e.impressions as f64 * w.impression
        } else {
            e.comments as f64 * w.comment + e.upvotes as f64 * w.upvote + e.views as f64 * w.view
        }
    }

    pub fn trending_score(&self, post: &Post) -> Option<f64> {
        let age = post.age_in_hours.filter(|a| a.is_finite())?;
        if age > self.trending_window_hours() {
            return None;
        }
        let age = age.max(MIN_AGE_HOURS);
        let heat = post.points() as f64 + post.discussion() as f64 * 2.0;
        Some(heat / (age + AGE_OFFSET_HOURS).powf(GRAVITY))
    }

    pub fn score(&self, post: &Post) -> Scores {
        Scores {
            engagement_score: self.engagement_score(post),
            trending_score: self.trending_score(post),
        }
    }

    /// Attach both scores to the post.
    pub fn apply(&self, mut post: Post) -> Post {
        let s = self.score(&post);
        post.engagement_score = s.engagement_score;
        post.trending_score = s.trending_score;
        post
    }
}
