//! Field-level parsers shared by every source family.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::post::{Author, UNKNOWN_HANDLE, UNKNOWN_NAME};
use crate::raw::{AuthorField, MetricValue, TagsField, TimestampField};

pub const TITLE_MAX_CHARS: usize = 300;
pub const HEADLINE_MAX_CHARS: usize = 120;
pub const CONTENT_MAX_CHARS: usize = 5_000;

// a tag name must follow `<` directly, so `a < b` in prose survives
static RE_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<!--.*?-->|</?[a-z][a-z0-9-]*(?:\s[^<>]*)?/?>").unwrap()
});
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static RE_METRIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*([0-9]{1,3}(?:[,_ ][0-9]{3})+|[0-9]+)(\.[0-9]+)?\s*([kKmMbB])?\+?(?:\s+[^0-9\s].*)?\s*$",
    )
    .unwrap()
});
static RE_HASHTAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+)").unwrap());
static RE_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@(\w+)").unwrap());
static RE_RELATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:about\s+|~\s*)?(\d+(?:\.\d+)?|an?|one)\s*([a-z]+?)\.?\s*(?:ago)?$").unwrap()
});

/// Normalize scraped text: strip tags, decode entities, fold typographic
/// quotes, collapse whitespace, trim, cap at `max_chars`.
///
/// Tags go first so escaped markup (`&lt;` in code or math) stays text.
pub fn normalize_text(s: &str, max_chars: usize) -> String {
    let mut out = RE_TAGS.replace_all(s, "").to_string();
    out = html_escape::decode_html_entities(&out).to_string();

    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    out = RE_WS.replace_all(&out, " ").trim().to_string();

    if out.chars().count() > max_chars {
        out = out.chars().take(max_chars).collect();
        out.truncate(out.trim_end().len());
    }
    out
}

/// Short single-line title derived from free text (tweets, untitled posts).
pub fn headline(text: &str) -> String {
    normalize_text(text, HEADLINE_MAX_CHARS)
}

/// Parse a scraped counter; 0 when it is not a usable count.
///
/// Accepted text: digits with `,` `_` or space as thousands separators
/// (groups of three), an optional fraction, an optional `K`/`M`/`B` suffix
/// and `+`, then optionally a trailing unit word as scraped listings print
/// it (`"312 points"`, `"1.2K likes"`). Anything else, negatives included,
/// yields 0.
pub fn parse_metric(v: &MetricValue) -> u64 {
    try_parse_metric(v).unwrap_or(0)
}

pub fn metric_or_zero(v: Option<&MetricValue>) -> u64 {
    v.map(parse_metric).unwrap_or(0)
}

/// First candidate that parses as a count, in priority order.
pub fn first_metric<'a>(candidates: impl IntoIterator<Item = Option<&'a MetricValue>>) -> u64 {
    candidates
        .into_iter()
        .flatten()
        .find_map(try_parse_metric)
        .unwrap_or(0)
}

fn try_parse_metric(v: &MetricValue) -> Option<u64> {
    match v {
        MetricValue::Number(n) => to_count(*n),
        MetricValue::Text(s) => parse_metric_str(s),
        MetricValue::Other(_) => None,
    }
}

fn parse_metric_str(s: &str) -> Option<u64> {
    let caps = RE_METRIC.captures(s)?;
    let int: String = caps[1].chars().filter(char::is_ascii_digit).collect();
    let frac = caps.get(2).map_or("", |m| m.as_str());
    let mult = match caps.get(3).map(|m| m.as_str()) {
        Some("k" | "K") => 1e3,
        Some("m" | "M") => 1e6,
        Some("b" | "B") => 1e9,
        _ => 1.0,
    };
    format!("{int}{frac}")
        .parse::<f64>()
        .ok()
        .and_then(|n| to_count(n * mult))
}

fn to_count(n: f64) -> Option<u64> {
    if n.is_finite() && n >= 0.0 {
        Some(n.round() as u64)
    } else {
        None
    }
}

/// First candidate holding non-blank text, in priority order.
pub fn first_text<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<&'a str> {
    candidates.into_iter().flatten().find(|s| !s.trim().is_empty())
}

/// First candidate with a timestamp shape worth parsing.
pub fn first_timestamp<'a>(
    candidates: impl IntoIterator<Item = Option<&'a TimestampField>>,
) -> Option<&'a TimestampField> {
    candidates.into_iter().flatten().find(|t| match t {
        TimestampField::Unix(_) => true,
        TimestampField::Text(s) => !s.trim().is_empty(),
        TimestampField::Other(_) => false,
    })
}

/// First candidate that carries an author at all.
pub fn first_author<'a>(
    candidates: impl IntoIterator<Item = Option<&'a AuthorField>>,
) -> Option<&'a AuthorField> {
    candidates
        .into_iter()
        .flatten()
        .find(|a| !matches!(a, AuthorField::Other(_)))
}

/// How a family writes bare author strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BareAuthor {
    /// A display name; the handle stays unknown unless given elsewhere.
    DisplayName,
    /// A username; it fills both name and handle.
    Username,
}

/// Resolve author name/handle from whatever the scraper supplied.
///
/// `"Name @handle"` splits on the first `@`. An explicit `handle` field
/// wins over one parsed from the author string.
pub fn parse_author(field: Option<&AuthorField>, handle: Option<&str>, bare: BareAuthor) -> Author {
    let (name, parsed_handle) = match field {
        Some(AuthorField::Text(s)) => match s.split_once('@') {
            Some((name, rest)) => (
                name.trim().to_string(),
                rest.split_whitespace().next().unwrap_or_default().to_string(),
            ),
            None => {
                let s = clean_username(s);
                match bare {
                    BareAuthor::Username if !s.contains(' ') => (s.clone(), s),
                    _ => (s, String::new()),
                }
            }
        },
        Some(AuthorField::Profile(p)) => (
            p.name().unwrap_or_default().trim().to_string(),
            p.handle().map(clean_handle).unwrap_or_default(),
        ),
        Some(AuthorField::Other(_)) | None => (String::new(), String::new()),
    };

    let handle = handle
        .map(clean_handle)
        .filter(|h| !h.is_empty())
        .unwrap_or(parsed_handle);

    Author {
        name: if name.is_empty() {
            UNKNOWN_NAME.to_string()
        } else {
            name
        },
        handle: if handle.is_empty() {
            UNKNOWN_HANDLE.to_string()
        } else {
            handle
        },
    }
}

fn clean_handle(h: &str) -> String {
    h.trim().trim_start_matches('@').trim().to_string()
}

fn clean_username(s: &str) -> String {
    let s = s.trim();
    s.strip_prefix("u/")
        .or_else(|| s.strip_prefix("/u/"))
        .unwrap_or(s)
        .trim()
        .to_string()
}

/// Tags from an explicit list, or `#\w+` occurrences in the text.
pub fn collect_tags(explicit: Option<&TagsField>, title: &str, content: &str) -> BTreeSet<String> {
    collect_marked(explicit, title, content, '#', &RE_HASHTAG)
}

/// Mentions from an explicit list, or `@\w+` occurrences in the text.
pub fn collect_mentions(
    explicit: Option<&TagsField>,
    title: &str,
    content: &str,
) -> BTreeSet<String> {
    collect_marked(explicit, title, content, '@', &RE_MENTION)
}

fn collect_marked(
    explicit: Option<&TagsField>,
    title: &str,
    content: &str,
    marker: char,
    re: &Regex,
) -> BTreeSet<String> {
    match explicit {
        Some(field) => field
            .items()
            .into_iter()
            .filter_map(|t| clean_tag(t, marker))
            .collect(),
        None => [title, content]
            .iter()
            .flat_map(|text| re.captures_iter(text))
            .filter_map(|c| clean_tag(&c[1], marker))
            .collect(),
    }
}

fn clean_tag(t: &str, marker: char) -> Option<String> {
    let t = t.trim().trim_start_matches(marker).trim().to_lowercase();
    if t.is_empty() {
        None
    } else {
        Some(t)
    }
}

/// Resolve a scraped timestamp into `(raw string, age in hours)`.
///
/// Unix numbers (seconds, or milliseconds when implausibly large) are kept
/// as RFC 3339 strings. Relative ages keep their original wording. Future
/// timestamps clamp to age 0.
pub fn parse_timestamp(
    ts: Option<&TimestampField>,
    now: DateTime<Utc>,
) -> (Option<String>, Option<f64>) {
    match ts {
        None => (None, None),
        Some(TimestampField::Unix(secs)) => match unix_to_datetime(*secs) {
            Some(dt) => (
                Some(dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
                Some(age_between(dt, now)),
            ),
            None => (None, None),
        },
        Some(TimestampField::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return (None, None);
            }
            let age = parse_absolute(s)
                .map(|dt| age_between(dt, now))
                .or_else(|| parse_relative_hours(s));
            (Some(s.to_string()), age)
        }
        Some(TimestampField::Other(_)) => (None, None),
    }
}

fn unix_to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() || secs <= 0.0 {
        return None;
    }
    let secs = if secs > 1e11 { secs / 1000.0 } else { secs };
    DateTime::from_timestamp(secs as i64, 0)
}

fn age_between(then: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let secs = (now - then).num_seconds().max(0);
    secs as f64 / 3600.0
}

fn parse_absolute(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `"2h ago"`, `"3 hours ago"`, `"an hour ago"`, `"5m"`, `"yesterday"`.
pub fn parse_relative_hours(s: &str) -> Option<f64> {
    let lower = s.trim().to_lowercase();
    match lower.as_str() {
        "now" | "just now" | "moments ago" => return Some(0.0),
        "yesterday" => return Some(24.0),
        _ => {}
    }

    let caps = RE_RELATIVE.captures(&lower)?;
    let qty = match &caps[1] {
        "a" | "an" | "one" => 1.0,
        n => n.parse::<f64>().ok()?,
    };
    let unit_hours = match &caps[2] {
        "s" | "sec" | "secs" | "second" | "seconds" => 1.0 / 3600.0,
        "m" | "min" | "mins" | "minute" | "minutes" => 1.0 / 60.0,
        "h" | "hr" | "hrs" | "hour" | "hours" => 1.0,
        "d" | "day" | "days" => 24.0,
        "w" | "wk" | "wks" | "week" | "weeks" => 24.0 * 7.0,
        "mo" | "mos" | "month" | "months" => 24.0 * 30.0,
        "y" | "yr" | "yrs" | "year" | "years" => 24.0 * 365.0,
        _ => return None,
    };
    Some(qty * unit_hours)
}

/// Where a family's URLs carry the post id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdMarker {
    /// Segment following a fixed one (`comments/<id>`, `status/<id>`).
    After(&'static str),
    /// Query parameter (`item?id=<id>`).
    Query(&'static str),
    LastSegment,
}

/// Derive a stable id from a post URL; `None` when nothing usable is found.
pub fn id_from_url(url: &str, marker: IdMarker) -> Option<String> {
    let url = url.trim();
    let url = url.split('#').next().unwrap_or_default();
    let (path, query) = match url.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (url, None),
    };
    let path = match path.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, p)| p).unwrap_or_default(),
        None => path,
    };
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let found = match marker {
        IdMarker::After(seg) => segments
            .iter()
            .position(|s| *s == seg)
            .and_then(|i| segments.get(i + 1))
            .map(|s| s.to_string()),
        IdMarker::Query(key) => query.and_then(|q| {
            q.split('&').find_map(|pair| match pair.split_once('=') {
                Some((k, v)) if k == key && !v.is_empty() => Some(v.to_string()),
                _ => None,
            })
        }),
        IdMarker::LastSegment => None,
    };

    found.or_else(|| segments.last().map(|s| s.to_string()))
}
