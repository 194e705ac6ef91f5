//! Singleton pages: home, about, contact.

use serde_json::{Value, json};

use crate::Fields;
use crate::build::{Ctx, Obj, keyed, keyed_filter, media, media_field};
use crate::record::{Record, scalar_text};

use super::common::{
    ALT, DESCRIPTION, HEADING, IMAGE, SUBHEADING, TITLE, button, cards, cta_section, hero,
    seo_meta, socials, stats,
};

pub(crate) fn home(ctx: Ctx<'_>, rec: Record<'_>) -> Fields {
    let mut doc = Obj::new();
    doc.set_opt("hero", home_hero(rec))
        .set_nonempty("services", cards(ctx, "services", rec, &["services", "serviceHighlights"]))
        .set_nonempty("clients", clients(ctx, rec))
        .set_nonempty("stats", stats(ctx, rec))
        .set_nonempty("featuredWork", featured_work(ctx, rec))
        .set_opt("cta", cta_section(rec))
        .set_opt("seo", seo_meta(rec));
    doc.into_fields()
}

/// The home hero carries a background video (file asset) with a poster
/// image and two buttons.
fn home_hero(rec: Record<'_>) -> Option<Value> {
    let section = rec.section(&["hero", "heroSection", "banner"])?;
    let heading = section.opt_text(HEADING);
    let mut obj = Obj::new();
    obj.set("heading", heading.clone().unwrap_or_default())
        .set_opt("subheading", section.opt_text(SUBHEADING))
        .set_opt("description", section.opt_text(&["description", "text", "intro"]))
        .set_opt(
            "video",
            media_field(section, &["video", "videoSrc", "backgroundVideo", "videoUrl"], &[], None),
        )
        .set_opt(
            "poster",
            media_field(section, &["poster", "posterImage", "image", "backgroundImage"], ALT, heading.as_deref()),
        )
        .set_opt("primaryCta", button(section, &["primaryCta", "cta", "primaryButton"]))
        .set_opt("secondaryCta", secondary_button(section));
    Some(obj.into_value())
}

fn secondary_button(section: Record<'_>) -> Option<Value> {
    let button = section.section(&["secondaryCta", "secondaryButton"])?;
    let mut obj = Obj::typed("link");
    obj.set_opt("label", button.opt_text(&["label", "text", "title"]))
        .set_opt("href", button.opt_text(&["href", "link", "url"]));
    obj.into_opt()
}

/// Client logos: `{name, logo, url}`; a bare string is a name.
fn clients(ctx: Ctx<'_>, rec: Record<'_>) -> Value {
    let Some(items) = rec.array(&["clients", "clientLogos", "logos"]) else {
        return json!([]);
    };
    let mut out = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let mut obj = Obj::new();
        if let Some(name) = scalar_text(item) {
            obj.set("name", name);
        } else if let Some(client) = Record::new(item) {
            let Some(name) = client.opt_text(&["name", "title", "alt"]) else {
                continue;
            };
            obj.set_opt("logo", media_field(client, &["logo", "image", "src"], ALT, Some(name.as_str())))
                .set_opt("url", client.opt_text(&["url", "href", "website"]))
                .set("name", name);
            if let Some(key) = client.opt_text(&["_key"]) {
                obj.set("_key", key);
            }
        } else {
            continue;
        }
        let mut value = obj.into_fields();
        value
            .entry("_key")
            .or_insert_with(|| json!(ctx.key("clients", index)));
        out.push(Value::Object(value));
    }
    Value::Array(out)
}

fn featured_work(ctx: Ctx<'_>, rec: Record<'_>) -> Value {
    keyed_filter(ctx, "featuredWork", rec.records(&["featuredWork", "portfolio", "projects"]), |item, _| {
        let title = item.opt_text(TITLE)?;
        let mut obj = Obj::new();
        obj.set_opt("image", media_field(item, IMAGE, ALT, Some(title.as_str())))
            .set("title", title)
            .set("category", item.text(&["category", "type"]))
            .set_opt("href", item.opt_text(&["href", "link", "url", "slug"]));
        Some(obj)
    })
}

pub(crate) fn about(ctx: Ctx<'_>, rec: Record<'_>) -> Fields {
    let mut doc = Obj::new();
    doc.set_opt("hero", hero(rec))
        .set_opt("story", story(rec))
        .set_opt("mission", rec.opt_text(&["mission", "missionStatement"]))
        .set_opt("vision", rec.opt_text(&["vision", "visionStatement"]))
        .set_nonempty("values", cards(ctx, "values", rec, &["values", "coreValues"]))
        .set_nonempty("team", team(ctx, rec))
        .set_nonempty("stats", stats(ctx, rec))
        .set_opt("cta", cta_section(rec))
        .set_opt("seo", seo_meta(rec));
    doc.into_fields()
}

fn story(rec: Record<'_>) -> Option<Value> {
    let section = rec.section(&["story", "ourStory", "history"])?;
    let heading = section.opt_text(HEADING);
    let paragraphs = match section.strings(&["paragraphs", "content", "body", "text"]) {
        list if list.len() == 1 => list[0]
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect(),
        list => list,
    };
    let mut obj = Obj::new();
    obj.set("heading", heading.clone().unwrap_or_default())
        .set("paragraphs", json!(paragraphs))
        .set_opt("image", media_field(section, IMAGE, ALT, heading.as_deref()));
    Some(obj.into_value())
}

/// Team members embedded in the about page.
fn team(ctx: Ctx<'_>, rec: Record<'_>) -> Value {
    keyed(ctx, "team", rec.records(&["team", "teamMembers", "members"]), |item, _| {
        let name = item.text(&["name", "fullName"]);
        let mut obj = Obj::new();
        obj.set_opt("image", media_field(item, &["image", "photo", "avatar"], ALT, Some(name.as_str())))
            .set("name", name)
            .set("role", item.text(&["role", "position", "title"]))
            .set_opt("bio", item.opt_text(&["bio", "description"]));
        obj
    })
}

pub(crate) fn contact(ctx: Ctx<'_>, rec: Record<'_>) -> Fields {
    let mut doc = Obj::new();
    doc.set("heading", rec.text(HEADING))
        .set_opt("subheading", rec.opt_text(SUBHEADING))
        .set("email", rec.text(&["email", "contactEmail"]))
        .set("phone", rec.text(&["phone", "telephone", "phoneNumber"]))
        .set("address", address(rec))
        .set_nonempty("hours", hours(ctx, rec))
        .set_opt(
            "mapImage",
            rec.raw(&["mapImage", "map"]).and_then(|v| media(v, Some("Map"))),
        )
        .set_nonempty("socials", socials(ctx, rec, &["socials", "social", "socialLinks"]))
        .set_opt("seo", seo_meta(rec));
    if let Some(form) = rec.section(&["form", "contactForm"]) {
        let mut obj = Obj::new();
        obj.set_opt("heading", form.opt_text(HEADING))
            .set_opt("description", form.opt_text(DESCRIPTION))
            .set_opt("submitLabel", form.opt_text(&["submitLabel", "buttonText", "submitText"]));
        doc.set_opt("form", obj.into_opt());
    }
    doc.into_fields()
}

/// A plain string, or `{street, city, state, zip, country}` joined with
/// `", "`.
fn address(rec: Record<'_>) -> String {
    if let Some(text) = rec.opt_text(&["address", "location"]) {
        return text;
    }
    let Some(parts) = rec.section(&["address", "location"]) else {
        return String::new();
    };
    ["street", "line1", "line2", "city", "state", "zip", "postalCode", "country"]
        .iter()
        .filter_map(|part| parts.opt_text(&[*part]))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Opening hours: `[{day, hours}]` or `{"Mon-Fri": "9-5"}`.
fn hours(ctx: Ctx<'_>, rec: Record<'_>) -> Value {
    const ALIASES: &[&str] = &["hours", "openingHours", "businessHours"];
    if rec.array(ALIASES).is_some() {
        return keyed_filter(ctx, "hours", rec.records(ALIASES), |item, _| {
            let day = item.opt_text(&["day", "days", "label"])?;
            let mut obj = Obj::new();
            obj.set("day", day)
                .set("hours", item.text(&["hours", "time", "value"]));
            Some(obj)
        });
    }
    let Some(map) = rec.section(ALIASES) else {
        return json!([]);
    };
    let items = map
        .entries()
        .filter_map(|(day, hours)| scalar_text(hours).map(|h| (day, h)))
        .enumerate()
        .map(|(index, (day, hours))| {
            json!({"_key": ctx.key("hours", index), "day": day, "hours": hours})
        })
        .collect();
    Value::Array(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ASSET_SLOT;

    #[test]
    fn home_hero_video_and_buttons() {
        let value = json!({
            "hero": {
                "heading": "We grow brands",
                "video": "/videos/hero.mp4",
                "poster": "/images/hero-poster.jpg",
                "primaryCta": {"text": "Start", "href": "/contact"},
                "secondaryCta": {"text": "Work", "href": "/portfolio"}
            },
            "clients": ["Acme", {"name": "Crumbs", "logo": "/logos/crumbs.svg"}, {"logo": "/x.svg"}],
            "featuredWork": [{"title": "Bakery", "image": "/w/b.jpg", "slug": "bakery"}]
        });
        let ctx = Ctx { domain: "home", entry: "homePage" };
        let doc = home(ctx, Record::new(&value).unwrap());
        assert_eq!(doc["hero"]["video"][ASSET_SLOT]["path"], "/videos/hero.mp4");
        assert_eq!(doc["hero"]["poster"][ASSET_SLOT]["alt"], "We grow brands");
        assert_eq!(doc["hero"]["primaryCta"]["label"], "Start");
        assert_eq!(doc["hero"]["secondaryCta"]["href"], "/portfolio");

        let clients = doc["clients"].as_array().unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0]["name"], "Acme");
        assert_eq!(clients[1]["_key"], "home-clients-1");
        assert_eq!(clients[1]["logo"][ASSET_SLOT]["alt"], "Crumbs");
        assert_eq!(doc["featuredWork"][0]["href"], "bakery");
    }

    #[test]
    fn home_hero_video_accepts_object_shape() {
        let value = json!({
            "hero": {
                "heading": "Motion",
                "video": {"src": "/videos/loop.webm", "alt": "Looping reel"}
            }
        });
        let ctx = Ctx { domain: "home", entry: "homePage" };
        let doc = home(ctx, Record::new(&value).unwrap());
        assert_eq!(doc["hero"]["video"][ASSET_SLOT]["path"], "/videos/loop.webm");
        assert_eq!(doc["hero"]["video"][ASSET_SLOT]["alt"], "Looping reel");
    }

    #[test]
    fn about_story_paragraphs() {
        let value = json!({
            "story": {"heading": "Our story", "content": "Founded 2015.\n\nStill here."},
            "mission": "Help",
            "values": [{"title": "Honesty"}],
            "team": [{"name": "Ann", "role": "CEO"}]
        });
        let ctx = Ctx { domain: "about", entry: "aboutPage" };
        let doc = about(ctx, Record::new(&value).unwrap());
        assert_eq!(doc["story"]["paragraphs"], json!(["Founded 2015.", "Still here."]));
        assert_eq!(doc["mission"], "Help");
        assert_eq!(doc["values"][0]["_key"], "about-values-0");
        assert_eq!(doc["team"][0]["role"], "CEO");
        assert!(doc.get("vision").is_none());
    }

    #[test]
    fn contact_address_and_hours() {
        let value = json!({
            "title": "Talk to us",
            "email": "hi@example.com",
            "address": {"street": "1 Main St", "city": "Springfield", "zip": "12345"},
            "hours": {"Mon-Fri": "9am-5pm", "Sat": "Closed"},
            "map": {"src": "/images/map.png", "alt": "Office map"}
        });
        let ctx = Ctx { domain: "contact", entry: "contactPage" };
        let doc = contact(ctx, Record::new(&value).unwrap());
        assert_eq!(doc["heading"], "Talk to us");
        assert_eq!(doc["address"], "1 Main St, Springfield, 12345");
        assert_eq!(doc["hours"][1]["day"], "Sat");
        assert_eq!(doc["hours"][1]["_key"], "contact-hours-1");
        assert_eq!(doc["mapImage"][ASSET_SLOT]["alt"], "Office map");
        assert_eq!(doc["phone"], "");
    }

    #[test]
    fn contact_address_string() {
        let value = json!({"address": "12 High St, Leeds"});
        let ctx = Ctx { domain: "contact", entry: "contactPage" };
        let doc = contact(ctx, Record::new(&value).unwrap());
        assert_eq!(doc["address"], "12 High St, Leeds");
        assert!(doc.get("hours").is_none());
    }
}
