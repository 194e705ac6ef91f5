//! Testimonials and team members.

use crate::Fields;
use crate::build::{Ctx, Obj, media_field};
use crate::record::Record;

use super::common::socials;

const NAME: &[&str] = &["name", "author", "clientName", "fullName"];
const ROLE: &[&str] = &["role", "position", "title", "jobTitle"];

pub(crate) fn testimonial(_ctx: Ctx<'_>, rec: Record<'_>) -> Fields {
    let name = rec.text(NAME);
    let mut doc = Obj::new();
    doc.set("name", name.clone())
        .set("role", rec.text(ROLE))
        .set("company", rec.text(&["company", "organization", "business"]))
        .set("quote", rec.text(&["quote", "testimonial", "text", "content", "review"]))
        .set_opt("rating", rec.number(&["rating", "stars"]).map(clamp_rating))
        .set_opt(
            "avatar",
            media_field(rec, &["avatar", "image", "photo"], &["avatarAlt", "alt"], Some(name.as_str())),
        )
        .set("featured", rec.flag(&["featured"]).unwrap_or(false));
    doc.into_fields()
}

pub(crate) fn team_member(ctx: Ctx<'_>, rec: Record<'_>) -> Fields {
    let name = rec.text(NAME);
    let mut doc = Obj::new();
    doc.set("name", name.clone())
        .set("role", rec.text(ROLE))
        .set("bio", rec.text(&["bio", "description", "about"]))
        .set_opt(
            "photo",
            media_field(rec, &["photo", "image", "avatar", "headshot"], &["photoAlt", "alt"], Some(name.as_str())),
        )
        .set_nonempty("socials", socials(ctx, rec, &["socials", "social", "socialLinks", "links"]))
        .set_opt("order", rec.number(&["order", "position", "sortOrder"]).map(|n| n as i64));
    doc.into_fields()
}

/// Ratings are whole stars in `1..=5`.
fn clamp_rating(raw: f64) -> i64 {
    (raw.round() as i64).clamp(1, 5)
}
