use super::fields::{self, BareAuthor, IdMarker};
use super::{title_and_body, Draft};
use crate::post::Engagement;
use crate::raw::{IhRaw, SourceFamily};

/// IndieHackers+ gated posts arrive with a title and counters but no body.
pub(super) fn draft(r: &IhRaw) -> Draft<'_> {
    let body = fields::first_text([r.content.as_deref(), r.body.as_deref()]);
    let (title, content) = title_and_body(r.title.as_deref(), body, r.text.as_deref());

    Draft {
        source: SourceFamily::IndieHackers,
        id: r.id.as_deref(),
        id_marker: IdMarker::LastSegment,
        url: r.url.as_deref(),
        title,
        content,
        author: fields::parse_author(
            r.author.as_ref(),
            fields::first_text([r.handle.as_deref(), r.username.as_deref()]),
            BareAuthor::DisplayName,
        ),
        category_hint: None,
        timestamp: fields::first_timestamp([
            r.timestamp.as_ref(),
            r.date.as_ref(),
            r.age.as_ref(),
        ]),
        engagement: Engagement {
            upvotes: fields::first_metric([r.upvotes.as_ref(), r.votes.as_ref()]),
            comments: fields::metric_or_zero(r.comments.as_ref()),
            views: fields::metric_or_zero(r.views.as_ref()),
            ..Engagement::default()
        },
        tags: r.tags.as_ref(),
        mentions: r.mentions.as_ref(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{AuthorField, MetricValue};

    #[test]
    fn gated_post_keeps_counters_without_body() {
        let r = IhRaw {
            title: Some("How I reached $10k MRR in 6 months".into()),
            author: Some(AuthorField::Text("Courtland Allen".into())),
            upvotes: Some(MetricValue::Number(64.0)),
            comments: Some(MetricValue::Number(12.0)),
            views: Some(MetricValue::Text("3,400".into())),
            ..IhRaw::default()
        };
        let d = draft(&r);
        assert_eq!(d.content, "");
        assert_eq!(d.engagement.views, 3400);
        assert_eq!(d.author.name, "Courtland Allen");
        assert_eq!(d.author.handle, "unknown");
    }
}
