//! Blog posts. The body becomes portable-text blocks.

use serde_json::{Value, json};

use crate::Fields;
use crate::build::{Ctx, Obj, media_field};
use crate::record::{Record, scalar_text};

use super::common::ALT;

pub(crate) fn post(ctx: Ctx<'_>, rec: Record<'_>) -> Fields {
    let title = rec.text(&["title", "headline"]);
    let mut doc = Obj::new();
    doc.set("title", title.clone())
        .set("excerpt", rec.text(&["excerpt", "summary", "description"]))
        .set("author", author(rec))
        .set_opt("publishedAt", rec.opt_text(&["publishedAt", "date", "published"]))
        .set_opt(
            "coverImage",
            media_field(rec, &["coverImage", "image", "featuredImage", "thumbnail"], ALT, Some(title.as_str())),
        )
        .set("categories", json!(rec.strings(&["categories", "tags", "category"])))
        .set_nonempty("body", body_blocks(ctx, rec.raw(&["body", "content", "paragraphs"])))
        .set_opt("readTime", read_time(rec));
    doc.into_fields()
}

/// `"Jane"` or `{"name": "Jane"}`.
fn author(rec: Record<'_>) -> String {
    match rec.section(&["author"]) {
        Some(author) => author.text(&["name", "fullName"]),
        None => rec.text(&["author", "authorName", "by"]),
    }
}

/// `"5 min read"`, `5`, or `"5"`; stored as minutes.
fn read_time(rec: Record<'_>) -> Option<i64> {
    if let Some(minutes) = rec.number(&["readTime", "readingTime"]) {
        return Some(minutes.round() as i64);
    }
    let text = rec.opt_text(&["readTime", "readingTime"])?;
    text.split_whitespace()
        .next()
        .and_then(|n| n.parse::<f64>().ok())
        .map(|n| n.round() as i64)
}

/// Turn a string (paragraphs separated by blank lines) or an array of
/// strings into keyed `block` objects, one span each.
fn body_blocks(ctx: Ctx<'_>, raw: Option<&Value>) -> Value {
    let paragraphs: Vec<String> = match raw {
        Some(Value::String(text)) => text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    };

    let blocks = paragraphs
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let key = ctx.key("body", index);
            json!({
                "_type": "block",
                "_key": key,
                "style": "normal",
                "markDefs": [],
                "children": [{
                    "_type": "span",
                    "_key": format!("{key}-span"),
                    "text": text,
                    "marks": [],
                }],
            })
        })
        .collect();
    Value::Array(blocks)
}
