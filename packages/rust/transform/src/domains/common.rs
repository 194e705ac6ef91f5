//! Sections shared by several page types.

use serde_json::{Value, json};

use crate::build::{Ctx, Obj, keyed, keyed_filter, media_field};
use crate::record::Record;

pub(crate) const TITLE: &[&str] = &["title", "name", "heading"];
pub(crate) const HEADING: &[&str] = &["heading", "title", "headline"];
pub(crate) const SUBHEADING: &[&str] = &["subheading", "subtitle", "tagline", "subHeading"];
pub(crate) const DESCRIPTION: &[&str] = &["description", "text", "body", "content", "summary"];
pub(crate) const IMAGE: &[&str] = &["image", "img", "src", "backgroundImage", "heroImage"];
pub(crate) const ALT: &[&str] = &["imageAlt", "alt", "altText"];
pub(crate) const HREF: &[&str] = &["href", "link", "url", "path"];
pub(crate) const LABEL: &[&str] = &["label", "text", "title", "name"];

/// A single button-style link: `{label, href}`.
///
/// Reads a nested `cta`/`button` object first, then flat `ctaText` /
/// `ctaLink` pairs.
pub(crate) fn button(rec: Record<'_>, aliases: &[&str]) -> Option<Value> {
    if let Some(section) = rec.section(aliases) {
        let mut obj = Obj::typed("link");
        obj.set_opt("label", section.opt_text(&["label", "text", "buttonText", "title"]))
            .set_opt("href", section.opt_text(&["href", "link", "url", "buttonLink"]));
        return obj.into_opt();
    }
    let mut obj = Obj::typed("link");
    obj.set_opt("label", rec.opt_text(&["ctaText", "buttonText", "ctaLabel"]))
        .set_opt("href", rec.opt_text(&["ctaLink", "buttonLink", "ctaHref"]));
    obj.into_opt()
}

/// Page hero. Included only when the source has one.
pub(crate) fn hero(rec: Record<'_>) -> Option<Value> {
    let section = rec.section(&["hero", "heroSection", "banner"])?;
    let heading = section.opt_text(HEADING);
    let mut obj = Obj::new();
    obj.set("heading", heading.clone().unwrap_or_default())
        .set_opt("subheading", section.opt_text(SUBHEADING))
        .set_opt("description", section.opt_text(&["description", "text", "intro"]))
        .set_opt(
            "image",
            media_field(section, IMAGE, ALT, heading.as_deref()),
        )
        .set_opt("cta", button(section, &["cta", "button", "primaryCta"]));
    Some(obj.into_value())
}

/// Closing call-to-action block.
pub(crate) fn cta_section(rec: Record<'_>) -> Option<Value> {
    let section = rec.section(&["cta", "callToAction", "ctaSection"])?;
    let mut obj = Obj::new();
    obj.set("heading", section.text(HEADING))
        .set_opt("description", section.opt_text(&["description", "text", "subheading"]))
        .set(
            "buttonText",
            section.text(&["buttonText", "label", "ctaText", "text"]),
        )
        .set(
            "buttonLink",
            section.text(&["buttonLink", "href", "link", "url", "ctaLink"]),
        );
    Some(obj.into_value())
}

/// Search metadata block.
pub(crate) fn seo_meta(rec: Record<'_>) -> Option<Value> {
    let section = rec.section(&["seo", "meta", "metadata"])?;
    let title = section.opt_text(&["metaTitle", "title"]);
    let mut obj = Obj::typed("seo");
    obj.set_opt("metaTitle", title.clone())
        .set_opt(
            "metaDescription",
            section.opt_text(&["metaDescription", "description"]),
        )
        .set_nonempty("keywords", json!(section.strings(&["keywords", "tags"])))
        .set_opt(
            "ogImage",
            media_field(section, &["ogImage", "image", "shareImage"], ALT, title.as_deref()),
        );
    obj.into_opt()
}

/// `{title, description, icon}` cards (benefits, features, values...).
pub(crate) fn cards(ctx: Ctx<'_>, field: &str, rec: Record<'_>, aliases: &[&str]) -> Value {
    keyed(ctx, field, rec.records(aliases), |item, _| {
        let mut obj = Obj::new();
        obj.set("title", item.text(TITLE))
            .set("description", item.text(DESCRIPTION))
            .set_opt("icon", item.opt_text(&["icon", "emoji"]));
        obj
    })
}

/// Numbered process steps; missing step numbers default to position.
pub(crate) fn steps(ctx: Ctx<'_>, rec: Record<'_>) -> Value {
    keyed(
        ctx,
        "process",
        rec.records(&["process", "processSteps", "steps"]),
        |item, index| {
            let step = item
                .number(&["step", "number", "order"])
                .map(|n| n as u64)
                .unwrap_or(index as u64 + 1);
            let mut obj = Obj::new();
            obj.set("step", step)
                .set("title", item.text(TITLE))
                .set("description", item.text(DESCRIPTION));
            obj
        },
    )
}

/// `{value, label}` figures.
pub(crate) fn stats(ctx: Ctx<'_>, rec: Record<'_>) -> Value {
    keyed_filter(
        ctx,
        "stats",
        rec.records(&["stats", "statistics", "numbers"]),
        |item, _| {
            let value = item.opt_text(&["value", "number", "stat"])?;
            let mut obj = Obj::new();
            obj.set("value", value)
                .set("label", item.text(&["label", "title", "description"]));
            Some(obj)
        },
    )
}

/// Question/answer pairs. Items without a question are dropped.
pub(crate) fn faqs(ctx: Ctx<'_>, rec: Record<'_>, aliases: &[&str]) -> Value {
    keyed_filter(ctx, "faqs", rec.records(aliases), |item, _| {
        let question = item.opt_text(&["question", "q", "title"])?;
        let mut obj = Obj::new();
        obj.set("question", question)
            .set("answer", item.text(&["answer", "a", "description", "text"]));
        Some(obj)
    })
}

/// Social links, from `[{platform, url}]` or `{"linkedin": "https://..."}`.
pub(crate) fn socials(ctx: Ctx<'_>, rec: Record<'_>, aliases: &[&str]) -> Value {
    if rec.array(aliases).is_some() {
        return keyed_filter(ctx, "socials", rec.records(aliases), |item, _| {
            let url = item.opt_text(&["url", "href", "link"])?;
            let mut obj = Obj::new();
            obj.set("platform", item.text(&["platform", "name", "label", "icon"]))
                .set("url", url);
            Some(obj)
        });
    }

    let Some(map) = rec.section(aliases) else {
        return json!([]);
    };
    let items = map
        .entries()
        .filter_map(|(platform, url)| url.as_str().map(|u| (platform, u.trim())))
        .filter(|(_, url)| !url.is_empty())
        .enumerate()
        .map(|(index, (platform, url))| {
            json!({
                "_key": ctx.key("socials", index),
                "platform": platform,
                "url": url,
            })
        })
        .collect();
    Value::Array(items)
}

/// `{label, href}` links, used by navigation blocks.
pub(crate) fn links(ctx: Ctx<'_>, field: &str, rec: Record<'_>, aliases: &[&str]) -> Value {
    keyed_filter(ctx, field, rec.records(aliases), |item, _| {
        let label = item.opt_text(LABEL)?;
        let mut obj = Obj::new();
        obj.set("label", label).set("href", item.text(HREF));
        if item.flag(&["external", "newTab"]) == Some(true) {
            obj.set("external", true);
        }
        Some(obj)
    })
}
