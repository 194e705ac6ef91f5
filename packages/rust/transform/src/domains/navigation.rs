//! Site chrome: navbar and footer.

use serde_json::Value;

use crate::Fields;
use crate::build::{Ctx, Obj, keyed_filter, media_field};
use crate::record::Record;

use super::common::{HREF, LABEL, TITLE, button, links, socials};

const LOGO: &[&str] = &["logo", "logoImage", "image"];

pub(crate) fn navbar(ctx: Ctx<'_>, rec: Record<'_>) -> Fields {
    let mut doc = Obj::new();
    doc.set_opt("logo", media_field(rec, LOGO, &["logoAlt", "alt"], Some("Logo")))
        .set("links", nav_links(ctx, rec))
        .set_opt("cta", button(rec, &["cta", "button", "ctaButton"]));
    doc.into_fields()
}

/// Top-level links with an optional dropdown of children. Children are
/// keyed under their parent: `navbar-links-2-children-0`.
fn nav_links(ctx: Ctx<'_>, rec: Record<'_>) -> Value {
    const ALIASES: &[&str] = &["links", "navLinks", "menu", "items"];
    keyed_filter(ctx, "links", rec.records(ALIASES), |item, index| {
        let label = item.opt_text(LABEL)?;
        let mut obj = Obj::new();
        obj.set("label", label).set("href", item.text(HREF));
        let field = format!("links-{index}-children");
        obj.set_nonempty(
            "children",
            links(ctx, &field, item, &["children", "dropdown", "subLinks", "items"]),
        );
        Some(obj)
    })
}

pub(crate) fn footer(ctx: Ctx<'_>, rec: Record<'_>) -> Fields {
    let mut doc = Obj::new();
    doc.set_opt("logo", media_field(rec, LOGO, &["logoAlt", "alt"], Some("Logo")))
        .set("tagline", rec.text(&["tagline", "description", "about"]))
        .set_nonempty("columns", columns(ctx, rec))
        .set_nonempty("socials", socials(ctx, rec, &["socials", "social", "socialLinks"]))
        .set_opt("contact", contact_block(rec))
        .set("copyright", rec.text(&["copyright", "copyrightText"]))
        .set_nonempty("legalLinks", links(ctx, "legalLinks", rec, &["legalLinks", "legal", "bottomLinks"]));
    doc.into_fields()
}

fn columns(ctx: Ctx<'_>, rec: Record<'_>) -> Value {
    keyed_filter(ctx, "columns", rec.records(&["columns", "linkGroups", "sections"]), |column, index| {
        let title = column.opt_text(TITLE)?;
        let field = format!("columns-{index}-links");
        let mut obj = Obj::new();
        obj.set("title", title)
            .set("links", links(ctx, &field, column, &["links", "items"]));
        Some(obj)
    })
}

fn contact_block(rec: Record<'_>) -> Option<Value> {
    let section = rec.section(&["contact", "contactInfo"]).unwrap_or(rec);
    let mut obj = Obj::new();
    obj.set_opt("email", section.opt_text(&["email"]))
        .set_opt("phone", section.opt_text(&["phone", "telephone"]))
        .set_opt("address", section.opt_text(&["address"]));
    obj.into_opt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ASSET_SLOT;
    use serde_json::json;

    #[test]
    fn navbar_links_with_children() {
        let value = json!({
            "logo": {"src": "/logo.svg", "alt": "Acme"},
            "links": [
                {"label": "Home", "href": "/"},
                {"label": "Services", "href": "/services", "children": [
                    {"label": "SEO", "href": "/services/seo"},
                    {"href": "/no-label"}
                ]},
                {"href": "/orphan"}
            ],
            "cta": {"label": "Get a quote", "href": "/contact"}
        });
        let ctx = Ctx { domain: "navbar", entry: "navbar" };
        let doc = navbar(ctx, Record::new(&value).unwrap());
        assert_eq!(doc["logo"][ASSET_SLOT]["alt"], "Acme");
        let links = doc["links"].as_array().unwrap();
        assert_eq!(links.len(), 2);
        assert!(links[0].get("children").is_none());
        let children = links[1]["children"].as_array().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0]["_key"], "navbar-links-1-children-0");
        assert_eq!(doc["cta"]["label"], "Get a quote");
    }

    #[test]
    fn footer_fields() {
        let value = json!({
            "tagline": "Digital growth",
            "columns": [{"title": "Company", "links": [{"label": "About", "href": "/about"}]}],
            "social": [{"platform": "x", "url": "https://x.com/acme"}],
            "email": "hi@acme.test",
            "copyright": "© Acme",
            "legalLinks": [{"label": "Privacy", "href": "/privacy", "external": true}]
        });
        let ctx = Ctx { domain: "footer", entry: "footer" };
        let doc = footer(ctx, Record::new(&value).unwrap());
        assert_eq!(doc["columns"][0]["links"][0]["_key"], "footer-columns-0-links-0");
        assert_eq!(doc["socials"][0]["url"], "https://x.com/acme");
        assert_eq!(doc["contact"]["email"], "hi@acme.test");
        assert_eq!(doc["legalLinks"][0]["external"], true);
        assert!(doc.get("logo").is_none());
    }
}
