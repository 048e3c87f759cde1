//! Serializers over a finished [`Report`]: JSON (lossless) and CSV
//! (one row per post, fixed column order).

use std::io::{self, Write};

use anyhow::{Context, Result};

use crate::report::Report;

pub const CSV_HEADER: [&str; 18] = [
    "id",
    "source",
    "category",
    "title",
    "author",
    "handle",
    "url",
    "upvotes",
    "comments",
    "likes",
    "retweets",
    "replies",
    "impressions",
    "views",
    "engagement_score",
    "trending_score",
    "age_in_hours",
    "tags",
];

pub fn to_json(report: &Report) -> Result<String> {
    serde_json::to_string(report).context("serializing report to json")
}

pub fn to_json_pretty(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).context("serializing report to json")
}

pub fn from_json(s: &str) -> Result<Report> {
    serde_json::from_str(s).context("parsing report json")
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Quote a field when it contains a separator, quote or line break;
/// embedded quotes are doubled.
pub fn escape_field(field: &str) -> String {
    if needs_quotes(field) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let line = row
        .iter()
        .map(|c| escape_field(c))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(w, "{line}")
}

pub fn write_csv<W: Write>(mut w: W, report: &Report) -> io::Result<()> {
    let header: Vec<String> = CSV_HEADER.iter().map(|s| s.to_string()).collect();
    write_row(&mut w, &header)?;

    for p in &report.posts {
        let e = &p.engagement;
        let row = vec![
            p.id.clone(),
            p.source.as_str().to_string(),
            p.category.clone(),
            p.title.clone(),
            p.author.name.clone(),
            p.author.handle.clone(),
            p.url.clone(),
            e.upvotes.to_string(),
            e.comments.to_string(),
            e.likes.to_string(),
            e.retweets.to_string(),
            e.replies.to_string(),
            e.impressions.to_string(),
            e.views.to_string(),
            format!("{:.2}", p.engagement_score),
            p.trending_score.map(|t| format!("{t:.4}")).unwrap_or_default(),
            p.age_in_hours.map(|a| format!("{a:.1}")).unwrap_or_default(),
            p.tags.iter().cloned().collect::<Vec<_>>().join(";"),
        ];
        write_row(&mut w, &row)?;
    }
    Ok(())
}

pub fn to_csv(report: &Report) -> String {
    let mut buf = Vec::new();
    // writing into a Vec cannot fail
    let _ = write_csv(&mut buf, report);
    String::from_utf8_lossy(&buf).into_owned()
}
