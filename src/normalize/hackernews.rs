use super::fields::{self, BareAuthor, IdMarker};
use super::{title_and_body, Draft};
use crate::post::Engagement;
use crate::raw::{HnRaw, SourceFamily};

pub(super) fn draft(r: &HnRaw) -> Draft<'_> {
    // comment-style items have no title; they borrow a headline from the text
    let (title, content) =
        title_and_body(r.title.as_deref(), r.text.as_deref(), r.text.as_deref());

    Draft {
        source: SourceFamily::HackerNews,
        id: r.id.as_deref(),
        id_marker: IdMarker::Query("id"),
        url: fields::first_text([r.url.as_deref(), r.link.as_deref()]),
        title,
        content,
        author: fields::parse_author(
            fields::first_author([r.author.as_ref(), r.by.as_ref()]),
            None,
            BareAuthor::Username,
        ),
        category_hint: None,
        timestamp: fields::first_timestamp([
            r.timestamp.as_ref(),
            r.age.as_ref(),
            r.time.as_ref(),
            r.created_at.as_ref(),
        ]),
        engagement: Engagement {
            upvotes: fields::first_metric([
                r.upvotes.as_ref(),
                r.points.as_ref(),
                r.score.as_ref(),
            ]),
            comments: fields::first_metric([
                r.comments.as_ref(),
                r.descendants.as_ref(),
                r.num_comments.as_ref(),
            ]),
            ..Engagement::default()
        },
        tags: r.tags.as_ref(),
        mentions: r.mentions.as_ref(),
    }
}
