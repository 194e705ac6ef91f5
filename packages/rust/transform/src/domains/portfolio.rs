//! Portfolio projects and case studies.

use serde_json::json;

use contentseed_shared::slugify;

use crate::Fields;
use crate::build::{Ctx, Obj, keyed_filter, media_field, media_list, slug_value};
use crate::record::Record;

use super::common::{ALT, DESCRIPTION};

pub(crate) fn project(ctx: Ctx<'_>, rec: Record<'_>) -> Fields {
    let title = rec.text(&["title", "name", "projectName"]);
    let mut doc = Obj::new();
    doc.set("title", title.clone())
        .set("client", rec.text(&["client", "clientName", "company"]))
        .set("category", rec.text(&["category", "industry", "type"]))
        .set("summary", rec.text(&["summary", "description", "excerpt"]))
        .set("services", json!(rec.strings(&["services", "tags"])))
        .set("technologies", json!(rec.strings(&["technologies", "techStack", "stack", "tools"])))
        .set_opt(
            "coverImage",
            media_field(rec, &["coverImage", "thumbnail", "image", "cover"], ALT, Some(title.as_str())),
        )
        .set_nonempty("gallery", media_list(ctx, "gallery", rec, &["gallery", "images", "screenshots"]))
        .set_nonempty("results", metrics(ctx, "results", "metric", rec, &["results", "metrics", "outcomes"]))
        .set_opt("liveUrl", rec.opt_text(&["liveUrl", "url", "website", "link"]))
        .set_opt("year", rec.number(&["year"]).map(|y| y as i64))
        .set("featured", rec.flag(&["featured", "highlight"]).unwrap_or(false));

    if let Some(quote) = rec.section(&["testimonial", "review"]) {
        let mut obj = Obj::new();
        obj.set("quote", quote.text(&["quote", "text", "content"]))
            .set("author", quote.text(&["author", "name"]))
            .set_opt("role", quote.opt_text(&["role", "position", "title"]));
        doc.set("testimonial", obj.into_value());
    }

    doc.into_fields()
}

/// Case studies are keyed by title; the slug is derived from it for routing.
pub(crate) fn case_study(ctx: Ctx<'_>, rec: Record<'_>) -> Fields {
    let title = rec.opt_text(&["title", "name", "projectName"]);
    let mut doc = Obj::new();
    doc.set_opt("title", title.clone());
    if let Some(title) = &title {
        doc.set("slug", slug_value(&slugify(title)));
    }
    doc.set("client", rec.text(&["client", "clientName", "company"]))
        .set("industry", rec.text(&["industry", "category", "sector"]))
        .set("challenge", rec.text(&["challenge", "problem", "brief"]))
        .set("solution", rec.text(&["solution", "approach", "strategy"]))
        .set("outcome", rec.text(&["outcome", "result", "impact"]))
        .set_nonempty("metrics", metrics(ctx, "metrics", "label", rec, &["metrics", "results", "kpis"]))
        .set_opt(
            "heroImage",
            media_field(rec, &["heroImage", "coverImage", "image"], ALT, title.as_deref()),
        )
        .set_nonempty("gallery", media_list(ctx, "gallery", rec, &["gallery", "images"]))
        .set("services", json!(rec.strings(&["services", "tags"])))
        .set_opt("duration", rec.opt_text(&["duration", "timeline", "timeframe"]));
    doc.into_fields()
}

/// Result figures; the source may name the label `metric` or `label`,
/// the output uses `label_key`.
fn metrics(
    ctx: Ctx<'_>,
    field: &str,
    label_key: &str,
    rec: Record<'_>,
    aliases: &[&str],
) -> serde_json::Value {
    keyed_filter(ctx, field, rec.records(aliases), |item, _| {
        let value = item.opt_text(&["value", "number", "stat"])?;
        let mut obj = Obj::new();
        obj.set(label_key, item.text(&["metric", "label", "title", "name"]))
            .set("value", value)
            .set_opt("description", item.opt_text(DESCRIPTION));
        Some(obj)
    })
}
