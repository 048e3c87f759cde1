use super::fields::{self, BareAuthor, IdMarker};
use super::Draft;
use crate::post::Engagement;
use crate::raw::{SourceFamily, TwitterRaw};

/// Tweets have no title; the headline of the text stands in for one.
pub(super) fn draft(r: &TwitterRaw) -> Draft<'_> {
    let content = fields::first_text([
        r.text.as_deref(),
        r.full_text.as_deref(),
        r.content.as_deref(),
    ])
    .map(|t| fields::normalize_text(t, fields::CONTENT_MAX_CHARS))
    .unwrap_or_default();
    let title = fields::headline(&content);

    Draft {
        source: SourceFamily::Twitter,
        id: fields::first_text([r.id_str.as_deref(), r.id.as_deref()]),
        id_marker: IdMarker::After("status"),
        url: r.url.as_deref(),
        title,
        content,
        author: fields::parse_author(
            r.author.as_ref(),
            fields::first_text([
                r.handle.as_deref(),
                r.username.as_deref(),
                r.screen_name.as_deref(),
            ]),
            BareAuthor::DisplayName,
        ),
        category_hint: None,
        timestamp: fields::first_timestamp([
            r.timestamp.as_ref(),
            r.created_at.as_ref(),
            r.time.as_ref(),
        ]),
        engagement: Engagement {
            likes: fields::first_metric([r.likes.as_ref(), r.favorite_count.as_ref()]),
            retweets: fields::first_metric([
                r.retweets.as_ref(),
                r.retweet_count.as_ref(),
                r.reposts.as_ref(),
            ]),
            replies: fields::first_metric([r.replies.as_ref(), r.reply_count.as_ref()]),
            impressions: fields::first_metric([r.impressions.as_ref(), r.views.as_ref()]),
            ..Engagement::default()
        },
        tags: r.hashtags.as_ref().or(r.tags.as_ref()),
        mentions: r.mentions.as_ref(),
    }
}
