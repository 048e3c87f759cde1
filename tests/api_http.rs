// tests/api_http.rs

use axum::body::{self, Body};
use http::{Request, StatusCode};
use serde_json::{json, Value};
use social_digest::api::AppState;
use social_digest::{router, PipelineConfig};
use tower::ServiceExt; // for `oneshot`

const BODY_LIMIT: usize = 1024 * 1024;

fn app() -> axum::Router {
    router(AppState::new(PipelineConfig::default()))
}

fn post_json(uri: &str, v: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(v.to_string()))
        .expect("failed to build request")
}

fn sample_request() -> Value {
    json!({
        "name": "weekly",
        "batches": [
            {
                "category": "rust",
                "records": [
                    {
                        "source": "reddit",
                        "title": "Hello World, from a new crate",
                        "author": "u/x",
                        "score": 10,
                        "num_comments": 1
                    },
                    {
                        "source": "reddit",
                        "title": "hello   world, from a new crate",
                        "author": "u/x",
                        "score": 3,
                        "num_comments": 20
                    }
                ]
            },
            { "category": "ask", "error": "navigation timeout" },
            { "category": "empty" }
        ]
    })
}

#[tokio::test]
async fn health_ok() {
    let resp = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn report_json_endpoint() {
    let resp = app()
        .oneshot(post_json("/report", &sample_request()))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v: Value = serde_json::from_slice(&bytes).expect("json body");

    assert_eq!(v["metadata"]["name"], "weekly");
    assert_eq!(v["summary"]["totalPosts"], 1);
    assert_eq!(v["summary"]["droppedDuplicates"], 1);
    assert_eq!(v["posts"][0]["engagement"]["comments"], 20);
    assert_eq!(v["summary"]["errors"].as_array().unwrap().len(), 2);
    assert_eq!(v["categoryBreakdown"]["ask"]["failed"], true);
    assert_eq!(v["categoryBreakdown"]["empty"]["failed"], true);
}

#[tokio::test]
async fn report_csv_endpoint() {
    let resp = app()
        .oneshot(post_json("/report/csv", &sample_request()))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(ct.starts_with("text/csv"), "unexpected content-type {ct}");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let mut lines = text.lines();
    assert!(lines.next().unwrap().starts_with("id,source,category,title"));
    let row = lines.next().expect("one post row");
    // whitespace is collapsed, the comma forces quoting
    assert!(row.contains(",\"hello world, from a new crate\","));
    assert!(lines.next().is_none());
}

#[tokio::test]
async fn unnamed_report_gets_default_name() {
    let resp = app()
        .oneshot(post_json("/report", &json!({ "batches": [] })))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["metadata"]["name"], "report");
    assert_eq!(v["summary"]["totalPosts"], 0);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let resp = app()
        .oneshot(post_json("/report", &json!({ "batches": [{ "records": [] }] })))
        .await
        .expect("request failed");
    assert!(resp.status().is_client_error());
}

async fn report_for(request: &Value) -> Value {
    let resp = app()
        .oneshot(post_json("/report", request))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn reddit_listing_item_with_every_wire_name() {
    let report = report_for(&json!({
        "batches": [{
            "category": "rust",
            "records": [{
                "source": "reddit",
                "id": "t3_17abc",
                "title": "Announcing the Tokio 2.0 roadmap",
                "selftext": "",
                "author": "carllerche",
                "subreddit": "rust",
                "score": 640,
                "ups": 655,
                "num_comments": 91,
                "created": 1700000000.0,
                "created_utc": 1700000000.0,
                "url": "https://tokio.rs/blog/2.0",
                "permalink": "https://www.reddit.com/r/rust/comments/17abc/announcing_tokio/",
                "link_flair_text": "News",
                "over_18": false
            }]
        }]
    }))
    .await;

    assert_eq!(report["summary"]["totalPosts"], 1);
    let post = &report["posts"][0];
    assert_eq!(post["engagement"]["upvotes"], 640);
    assert_eq!(post["engagement"]["comments"], 91);
    assert_eq!(post["url"], "https://www.reddit.com/r/rust/comments/17abc/announcing_tokio/");
    assert_eq!(post["timestamp"], "2023-11-14T22:13:20Z");
    assert_eq!(post["tags"], json!(["news"]));
}

#[tokio::test]
async fn mistyped_fields_do_not_sink_the_request() {
    let report = report_for(&json!({
        "batches": [{
            "category": "hn",
            "records": [
                {
                    "source": "hackernews",
                    "id": 38_000_001u64,
                    "title": "Show HN: A lenient scraper in Rust",
                    "by": false,
                    "points": "88",
                    "descendants": true,
                    "time": { "seconds": 1 },
                    "tags": ["rust", 7, null]
                },
                { "source": "reddit", "title": 12345, "score": 3 },
                {
                    "source": "reddit",
                    "title": "Weekly what are you working on",
                    "author": "u/ferris",
                    "score": { "value": 9 },
                    "ups": 12,
                    "num_comments": "n/a"
                }
            ]
        }]
    }))
    .await;

    assert_eq!(report["summary"]["rawRecords"], 3);
    assert_eq!(report["summary"]["totalPosts"], 2);
    assert_eq!(report["summary"]["droppedInvalid"], 1);

    let posts = report["posts"].as_array().unwrap();
    let hn = posts.iter().find(|p| p["source"] == "hackernews").unwrap();
    assert_eq!(hn["id"], "38000001");
    assert_eq!(hn["engagement"]["upvotes"], 88);
    assert_eq!(hn["engagement"]["comments"], 0);
    assert_eq!(hn["author"]["handle"], "unknown");
    assert_eq!(hn["timestamp"], Value::Null);
    assert_eq!(hn["tags"], json!(["rust"]));

    let reddit = posts.iter().find(|p| p["source"] == "reddit").unwrap();
    assert_eq!(reddit["engagement"]["upvotes"], 12);
    assert_eq!(reddit["engagement"]["comments"], 0);
}
