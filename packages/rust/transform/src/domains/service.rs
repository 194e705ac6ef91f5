//! Service landing pages (SEO, web development, social media, paid ads,
//! branding). All five share one layout.

use serde_json::json;

use crate::Fields;
use crate::build::{Ctx, Obj, media_list};
use crate::record::Record;

use super::common::{
    self, DESCRIPTION, cards, cta_section, faqs, hero, seo_meta, stats, steps,
};

pub(crate) fn transform(ctx: Ctx<'_>, rec: Record<'_>) -> Fields {
    let mut doc = Obj::new();
    doc.set("title", rec.text(&["title", "name", "serviceName"]))
        .set("description", rec.text(&["description", "summary", "excerpt", "intro"]))
        .set_opt("icon", rec.opt_text(&["icon"]))
        .set_opt("hero", hero(rec))
        .set_nonempty(
            "benefits",
            cards(ctx, "benefits", rec, &["benefits", "features", "whyChooseUs"]),
        )
        .set_nonempty("process", steps(ctx, rec))
        .set_nonempty("stats", stats(ctx, rec))
        .set_nonempty("faqs", faqs(ctx, rec, &["faqs", "faq", "questions"]))
        .set_nonempty("gallery", media_list(ctx, "gallery", rec, &["gallery", "images"]))
        .set_nonempty("deliverables", json!(rec.strings(&["deliverables", "includes"])))
        .set_opt("cta", cta_section(rec))
        .set_opt("seo", seo_meta(rec));

    if let Some(pricing) = rec.section(&["pricing", "price"]) {
        let mut obj = Obj::new();
        obj.set("startingAt", pricing.text(&["startingAt", "from", "amount", "price"]))
            .set_opt("note", pricing.opt_text(&["note", "period", "description"]));
        doc.set("pricing", obj.into_value());
    }

    // Older files keep a single long-form intro paragraph next to the hero.
    if let Some(body) = rec.opt_text(&["overview", "longDescription"]) {
        doc.set("overview", body);
    } else if let Some(section) = rec.section(&["overview"]) {
        let mut obj = Obj::new();
        obj.set("heading", section.text(common::HEADING))
            .set("body", section.text(DESCRIPTION));
        doc.set("overview", obj.into_value());
    }

    doc.into_fields()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ASSET_SLOT;

    fn ctx() -> Ctx<'static> {
        Ctx { domain: "seo", entry: "acme" }
    }

    #[test]
    fn minimal_record() {
        let value = json!({"title": "Acme SEO", "hero": {"heading": "Grow"}});
        let doc = transform(ctx(), Record::new(&value).unwrap());
        assert_eq!(doc["title"], "Acme SEO");
        assert_eq!(doc["hero"]["heading"], "Grow");
        assert_eq!(doc["description"], "");
        assert!(doc.get("benefits").is_none());
        assert!(doc.get("cta").is_none());
    }

    #[test]
    fn full_record() {
        let value = json!({
            "name": "Local SEO",
            "summary": "Be found nearby",
            "features": [{"title": "Maps", "text": "Rank in maps", "icon": "pin"}],
            "steps": [{"title": "Audit"}, {"title": "Optimise"}],
            "stats": [{"value": "3x", "label": "traffic"}, {"label": "no value"}],
            "faq": [{"question": "How long?", "answer": "90 days"}],
            "images": ["/img/one.png", {"src": "/img/two.png", "alt": "Two"}],
            "cta": {"title": "Ready?", "buttonText": "Call", "href": "/contact"},
            "seo": {"metaTitle": "Local SEO"},
            "pricing": {"from": 499},
            "overview": {"heading": "Why", "body": "Because"}
        });
        let doc = transform(ctx(), Record::new(&value).unwrap());

        assert_eq!(doc["title"], "Local SEO");
        assert_eq!(doc["description"], "Be found nearby");
        assert_eq!(doc["benefits"][0]["description"], "Rank in maps");
        assert_eq!(doc["benefits"][0]["_key"], "seo-benefits-0");
        assert_eq!(doc["process"][1]["step"], 2);
        assert_eq!(doc["stats"].as_array().unwrap().len(), 1);
        assert_eq!(doc["faqs"][0]["_key"], "seo-faqs-0");
        assert_eq!(doc["gallery"][1][ASSET_SLOT]["alt"], "Two");
        assert_eq!(doc["cta"]["heading"], "Ready?");
        assert_eq!(doc["cta"]["buttonLink"], "/contact");
        assert_eq!(doc["pricing"]["startingAt"], "499");
        assert_eq!(doc["overview"]["heading"], "Why");
    }
}
