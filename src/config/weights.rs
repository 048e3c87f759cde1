//! Engagement weighting policy.
//!
//! The constants are heuristics: discussion (comments, replies) weighs more
//! than passive approval (upvotes, likes). They are configurable, not law.
//!
//! TOML shape (all keys optional):
//! ```toml
//! [weights]
//! comment = 3.0
//! upvote = 2.0
//! view = 0.1
//! like = 2.0
//! retweet = 2.0
//! reply = 3.0
//! impression = 0.0
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    // forum-style sources
    pub comment: f64,
    pub upvote: f64,
    pub view: f64,
    // feed-style sources
    pub like: f64,
    pub retweet: f64,
    pub reply: f64,
    pub impression: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            comment: 3.0,
            upvote: 2.0,
            view: 0.1,
            like: 2.0,
            retweet: 2.0,
            reply: 3.0,
            impression: 0.0,
        }
    }
}

impl ScoreWeights {
    /// Replace negative or non-finite weights with their defaults so scores
    /// stay non-negative.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let pick = |v: f64, fallback: f64| if v.is_finite() && v >= 0.0 { v } else { fallback };
        Self {
            comment: pick(self.comment, d.comment),
            upvote: pick(self.upvote, d.upvote),
            view: pick(self.view, d.view),
            like: pick(self.like, d.like),
            retweet: pick(self.retweet, d.retweet),
            reply: pick(self.reply, d.reply),
            impression: pick(self.impression, d.impression),
        }
    }
}
