use super::fields::{self, BareAuthor, IdMarker};
use super::{title_and_body, Draft};
use crate::post::Engagement;
use crate::raw::{RedditRaw, SourceFamily};

pub(super) fn draft(r: &RedditRaw) -> Draft<'_> {
    let body = fields::first_text([
        r.content.as_deref(),
        r.selftext.as_deref(),
        r.body.as_deref(),
    ]);
    let (title, content) = title_and_body(r.title.as_deref(), body, r.text.as_deref());

    Draft {
        source: SourceFamily::Reddit,
        id: r.id.as_deref(),
        id_marker: IdMarker::After("comments"),
        // listing `url` is the outbound link for link posts; the permalink is the post
        url: fields::first_text([r.permalink.as_deref(), r.url.as_deref()]),
        title,
        content,
        author: fields::parse_author(
            r.author.as_ref(),
            fields::first_text([r.handle.as_deref(), r.username.as_deref()]),
            BareAuthor::Username,
        ),
        category_hint: r
            .subreddit
            .as_deref()
            .map(|s| s.trim().trim_start_matches("r/")),
        timestamp: fields::first_timestamp([
            r.timestamp.as_ref(),
            r.created_utc.as_ref(),
            r.created.as_ref(),
        ]),
        engagement: Engagement {
            upvotes: fields::first_metric([r.upvotes.as_ref(), r.score.as_ref(), r.ups.as_ref()]),
            comments: fields::first_metric([r.comments.as_ref(), r.num_comments.as_ref()]),
            views: fields::metric_or_zero(r.views.as_ref()),
            ..Engagement::default()
        },
        tags: r.tags.as_ref().or(r.flair.as_ref()),
        mentions: r.mentions.as_ref(),
    }
}
