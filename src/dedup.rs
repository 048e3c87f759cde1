//! Collapse posts that are the same item seen through different categories
//! or searches.
//!
//! Identity is `(folded title, folded handle)`. On collision the post with
//! the strictly higher engagement score takes over the slot of the first
//! occurrence; ties keep the first-seen post. Output order is the order in
//! which each key first appeared.

use std::collections::HashMap;

use crate::post::{IdentityKey, Post};
use crate::scoring::Scorer;

#[derive(Debug, Clone, PartialEq)]
pub struct Dedup {
    pub posts: Vec<Post>,
    /// Number of input posts that lost a collision.
    pub dropped: usize,
}

pub fn dedupe(posts: Vec<Post>, scorer: &Scorer) -> Dedup {
    let mut slots: HashMap<IdentityKey, usize> = HashMap::with_capacity(posts.len());
    let mut kept: Vec<(Post, f64)> = Vec::with_capacity(posts.len());
    let mut dropped = 0usize;

    for post in posts {
        let score = scorer.engagement_score(&post);
        let key = post.identity_key();
        match slots.get(&key).copied() {
            Some(i) => {
                dropped += 1;
                if score > kept[i].1 {
                    tracing::debug!(
                        kept = %post.id,
                        replaced = %kept[i].0.id,
                        "duplicate with higher engagement replaces earlier post"
                    );
                    kept[i] = (post, score);
                }
            }
            None => {
                slots.insert(key, kept.len());
                kept.push((post, score));
            }
        }
    }

    Dedup {
        posts: kept.into_iter().map(|(p, _)| p).collect(),
        dropped,
    }
}
