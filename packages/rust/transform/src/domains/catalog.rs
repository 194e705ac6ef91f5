//! Title-keyed catalog documents: pricing plans and FAQ categories.

use serde_json::json;

use crate::Fields;
use crate::build::{Ctx, Obj};
use crate::record::{Record, scalar_text};

use super::common::{DESCRIPTION, button, faqs};

pub(crate) fn pricing_plan(ctx: Ctx<'_>, rec: Record<'_>) -> Fields {
    let mut doc = Obj::new();
    doc.set_opt("title", rec.opt_text(&["title", "name", "plan", "tier"]))
        .set("price", rec.text(&["price", "amount", "cost"]))
        .set("period", rec.text(&["period", "billing", "interval", "frequency"]))
        .set("description", rec.text(DESCRIPTION))
        .set_nonempty("features", features(ctx, rec))
        .set(
            "highlighted",
            rec.flag(&["highlighted", "popular", "featured", "recommended"])
                .unwrap_or(false),
        )
        .set_opt("cta", button(rec, &["cta", "button"]));
    doc.into_fields()
}

/// Plan features: plain strings or `{text, included}` objects.
fn features(ctx: Ctx<'_>, rec: Record<'_>) -> serde_json::Value {
    let Some(items) = rec.array(&["features", "includes", "items"]) else {
        return json!([]);
    };
    let mut out = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if let Some(text) = scalar_text(item) {
            out.push(json!({
                "_key": ctx.key("features", index),
                "text": text,
                "included": true,
            }));
            continue;
        }
        let Some(feature) = Record::new(item) else {
            continue;
        };
        let Some(text) = feature.opt_text(&["text", "name", "label", "title"]) else {
            continue;
        };
        out.push(json!({
            "_key": feature.opt_text(&["_key"]).unwrap_or_else(|| ctx.key("features", index)),
            "text": text,
            "included": feature.flag(&["included", "available"]).unwrap_or(true),
        }));
    }
    serde_json::Value::Array(out)
}

pub(crate) fn faq_category(ctx: Ctx<'_>, rec: Record<'_>) -> Fields {
    let mut doc = Obj::new();
    doc.set_opt("title", rec.opt_text(&["title", "category", "name"]))
        .set_opt("description", rec.opt_text(&["description", "intro"]))
        .set("items", faqs(ctx, rec, &["items", "questions", "faqs"]))
        .set_opt("order", rec.number(&["order"]).map(|n| n as i64));
    doc.into_fields()
}
