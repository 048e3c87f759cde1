// tests/dedup_invariants.rs
use std::collections::{HashMap, HashSet};

use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::json;
use social_digest::dedup::dedupe;
use social_digest::raw::RawRecord;
use social_digest::{Normalizer, Post, Scorer};

fn reddit(title: &str, handle: &str, upvotes: u64, comments: u64, category: &str) -> Post {
    let r: RawRecord = serde_json::from_value(json!({
        "source": "reddit",
        "title": title,
        "author": { "name": handle, "handle": handle },
        "upvotes": upvotes,
        "comments": comments
    }))
    .unwrap();
    Normalizer::new(Utc::now()).normalize(&r, category, 0)
}

#[test]
fn case_and_whitespace_variants_collapse_to_richest() {
    let posts = vec![
        reddit("Hello World", "x", 10, 1, "trending"),
        reddit("hello   world", "x", 3, 20, "search:hello"),
    ];
    let s = Scorer::default();
    // 10*2 + 1*3 = 23 vs 3*2 + 20*3 = 66
    let out = dedupe(posts, &s);
    assert_eq!(out.posts.len(), 1);
    assert_eq!(out.dropped, 1);
    assert_eq!(out.posts[0].engagement.comments, 20);
    assert_eq!(out.posts[0].category, "search:hello");
}

#[test]
fn random_batches_hold_invariants() {
    let mut rng = StdRng::seed_from_u64(42);
    let titles = ["Alpha story", "alpha  STORY", "Beta story", "Gamma story", "beta story"];
    let handles = ["a", "A", "b"];
    let s = Scorer::default();

    for _ in 0..200 {
        let n = rng.random_range(0..30);
        let input: Vec<Post> = (0..n)
            .map(|_| {
                reddit(
                    titles[rng.random_range(0..titles.len())],
                    handles[rng.random_range(0..handles.len())],
                    rng.random_range(0..50),
                    rng.random_range(0..50),
                    "c",
                )
            })
            .collect();

        let mut best: HashMap<_, f64> = HashMap::new();
        let mut first_seen = Vec::new();
        for p in &input {
            let k = p.identity_key();
            let score = s.engagement_score(p);
            let e = best.entry(k.clone()).or_insert(f64::MIN);
            if score > *e {
                *e = score;
            }
            if !first_seen.contains(&k) {
                first_seen.push(k);
            }
        }

        let out = dedupe(input.clone(), &s);
        assert!(out.posts.len() <= input.len());
        assert_eq!(out.posts.len() + out.dropped, input.len());

        let keys: Vec<_> = out.posts.iter().map(Post::identity_key).collect();
        let unique: HashSet<_> = keys.iter().cloned().collect();
        assert_eq!(unique.len(), keys.len(), "duplicate identity keys survived");
        assert_eq!(keys, first_seen, "survivors not in first-occurrence order");

        for p in &out.posts {
            assert_eq!(s.engagement_score(p), best[&p.identity_key()]);
        }
    }
}
